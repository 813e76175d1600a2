use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Best-effort text of a panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s_ref) = payload.downcast_ref::<&'static str>() {
        (*s_ref).to_string()
    } else if let Some(s_obj) = payload.downcast_ref::<String>() {
        s_obj.clone()
    } else {
        "Unknown panic reason".to_string()
    }
}

/// Run plugin-supplied code, turning a panic into its message.
pub fn catch_panic<R>(f: impl FnOnce() -> R) -> Result<R, String> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| panic_message(payload.as_ref()))
}
