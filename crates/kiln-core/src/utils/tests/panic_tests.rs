use crate::utils::{catch_panic, panic_message};

#[test]
fn test_catch_panic_passes_value_through() {
    assert_eq!(catch_panic(|| 42), Ok(42));
}

#[test]
fn test_catch_panic_static_str_message() {
    let result = catch_panic(|| -> u8 { panic!("static message") });
    assert_eq!(result, Err("static message".to_string()));
}

#[test]
fn test_catch_panic_formatted_message() {
    let code = 7;
    let result = catch_panic(|| -> u8 { panic!("failed with {}", code) });
    assert_eq!(result, Err("failed with 7".to_string()));
}

#[test]
fn test_unknown_payload() {
    let payload: Box<dyn std::any::Any + Send> = Box::new(17_u32);
    assert_eq!(panic_message(payload.as_ref()), "Unknown panic reason");
}
