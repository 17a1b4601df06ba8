//! JavaScript bindings for TextSync

use super::scheduler::TimeoutScheduler;
use super::shared::JsSharedString;
use super::surface::ElementSurface;
use crate::binding::{bind_with_config, Binding, BindingConfig};
use crate::diff::edit_script;
use crate::error::BindError;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// JavaScript-friendly handle for a live binding
#[wasm_bindgen]
pub struct WasmBinding {
    inner: Binding<JsSharedString, ElementSurface>,
}

#[wasm_bindgen]
impl WasmBinding {
    /// Detach the element from the string. Returns false if already unbound.
    #[wasm_bindgen(js_name = unbind)]
    pub fn unbind(&self) -> bool {
        self.inner.unbind()
    }

    #[wasm_bindgen(js_name = isBound)]
    pub fn is_bound(&self) -> bool {
        self.inner.is_bound()
    }

    /// The bound collaborative string object
    #[wasm_bindgen(getter, js_name = collaborativeObject)]
    pub fn collaborative_object(&self) -> JsValue {
        self.inner.string().object().clone()
    }

    /// The bound DOM element
    #[wasm_bindgen(getter, js_name = domElement)]
    pub fn dom_element(&self) -> web_sys::Element {
        self.inner.surface().element().clone()
    }
}

/// Bind a text input or textarea element to a collaborative string
///
/// Throws a `TypeError` if `string` lacks the collaborative string API or
/// `element` is not a text/textarea element.
#[wasm_bindgen(js_name = bindString)]
pub fn bind_string(string: JsValue, element: JsValue) -> Result<WasmBinding, JsValue> {
    bind_js(string, element, &BindingConfig::default())
}

/// Same as `bindString`, with a JSON binding config, e.g.
/// `{"events": ["keyup", "paste"]}`
#[wasm_bindgen(js_name = bindStringWithConfig)]
pub fn bind_string_with_config(
    string: JsValue,
    element: JsValue,
    config_json: &str,
) -> Result<WasmBinding, JsValue> {
    let config: BindingConfig = serde_json::from_str(config_json)
        .map_err(|e| BindError::invalid_argument("config", "binding config JSON", e.to_string()))?;
    bind_js(string, element, &config)
}

fn bind_js(
    string: JsValue,
    element: JsValue,
    config: &BindingConfig,
) -> Result<WasmBinding, JsValue> {
    let string = JsSharedString::from_js(string)?;
    let surface = ElementSurface::from_js(&element)?;
    let inner = bind_with_config(
        Rc::new(string),
        Rc::new(surface),
        Rc::new(TimeoutScheduler),
        config,
    )?;
    Ok(WasmBinding { inner })
}

/// Compute the operations turning `before` into `after`
///
/// # Returns
/// JSON array of `{"op":"insert","index","text"}` / `{"op":"remove","start","end"}`
/// with char offsets
#[wasm_bindgen(js_name = computeEditScript)]
pub fn compute_edit_script(before: &str, after: &str) -> Result<String, JsValue> {
    serde_json::to_string(&edit_script(before, after))
        .map_err(|e| JsValue::from_str(&format!("JSON serialization failed: {}", e)))
}
