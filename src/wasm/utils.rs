//! WASM utility functions

use crate::error::BindError;
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages in browser
#[wasm_bindgen]
pub fn init_panic_hook() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// Log a message to the browser console
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    pub fn log(s: &str);
}

/// Macro for console.log from Rust
#[macro_export]
macro_rules! console_log {
    ($($t:tt)*) => {
        $crate::wasm::utils::log(&format_args!($($t)*).to_string())
    }
}

/// Bind errors surface in JavaScript as `TypeError`s
impl From<BindError> for JsValue {
    fn from(err: BindError) -> Self {
        js_sys::TypeError::new(&err.to_string()).into()
    }
}

/// Short description of an arbitrary JS value for error messages
pub(crate) fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .map(|s| format!("\"{}\"", s))
        .unwrap_or_else(|| format!("{:?}", value))
}
