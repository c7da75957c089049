// Panic payload inspection for joined worker threads
use std::any::Any;

/// Extract a readable message from a panic payload
///
/// `panic!("literal")` carries a `&str`, `panic!("{}", x)` a `String`;
/// anything else is reported as unknown.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
