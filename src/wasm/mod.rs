//! WASM bindings for TextSync
//!
//! Adapters that let the binding drive a real browser text control and a
//! JavaScript collaborative string, plus the `#[wasm_bindgen]` exports.

#[cfg(feature = "wasm")]
pub mod bindings;

#[cfg(feature = "wasm")]
pub mod scheduler;

#[cfg(feature = "wasm")]
pub mod shared;

#[cfg(feature = "wasm")]
pub mod surface;

#[cfg(feature = "wasm")]
pub mod utils;

// Re-export main types
#[cfg(feature = "wasm")]
pub use bindings::WasmBinding;

#[cfg(feature = "wasm")]
pub use scheduler::TimeoutScheduler;

#[cfg(feature = "wasm")]
pub use shared::JsSharedString;

#[cfg(feature = "wasm")]
pub use surface::ElementSurface;
