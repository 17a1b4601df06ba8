//! JsSharedString: a JavaScript collaborative string as a [`SharedString`]
//!
//! Any object exposing `getText()`, `insertString(index, text)`,
//! `removeRange(start, end)`, `onTextInserted(handler)` and
//! `onTextDeleted(handler)` can be bound. Handlers receive event objects with
//! `index()`, `text()` and `isLocal()` methods; subscriptions return an object
//! with `unregister()`.
//!
//! JS strings are indexed in UTF-16 code units. Indices are converted against
//! the string's current text, which shares the prefix before any change
//! position with the pre-change text.

use super::utils::describe;
use crate::console_log;
use crate::error::{BindError, Result};
use crate::shared::{Registration, SharedString, TextEvent, TextHandler};
use crate::text::{char_to_utf16, utf16_to_char};
use js_sys::{Array, Function, Reflect};
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

const REQUIRED_METHODS: [&str; 5] = [
    "getText",
    "insertString",
    "removeRange",
    "onTextInserted",
    "onTextDeleted",
];

/// Wrapper around a JS collaborative string object
#[derive(Clone)]
pub struct JsSharedString {
    object: JsValue,
}

impl JsSharedString {
    /// Wrap `value`, rejecting objects that lack the collaborative string API
    pub fn from_js(value: JsValue) -> Result<Self> {
        let is_string = value.is_object()
            && REQUIRED_METHODS.iter().all(|method| {
                Reflect::get(&value, &JsValue::from_str(method))
                    .map(|f| f.is_function())
                    .unwrap_or(false)
            });
        if !is_string {
            return Err(BindError::invalid_argument(
                "string",
                "CollaborativeString",
                describe(&value),
            ));
        }
        Ok(Self { object: value })
    }

    /// The wrapped JS object
    pub fn object(&self) -> &JsValue {
        &self.object
    }

    fn current_text(&self) -> std::result::Result<String, JsValue> {
        Ok(invoke(&self.object, "getText", &[])?
            .as_string()
            .unwrap_or_default())
    }

    fn subscribe(&self, method: &'static str, handler: TextHandler) -> Box<dyn Registration> {
        let string = self.clone();
        let callback = Closure::wrap(Box::new(move |event: JsValue| {
            match string.event_from_js(&event) {
                Ok(event) => handler(&event),
                Err(err) => console_log!("dropping malformed {} event: {:?}", method, err),
            }
        }) as Box<dyn Fn(JsValue)>);

        let registration = invoke(&self.object, method, &[callback.as_ref().clone()]);
        match registration {
            Ok(registration) => Box::new(JsRegistration {
                registration,
                callback: RefCell::new(Some(callback)),
            }),
            Err(err) => {
                console_log!("{} failed: {:?}", method, err);
                Box::new(JsRegistration {
                    registration: JsValue::UNDEFINED,
                    callback: RefCell::new(None),
                })
            }
        }
    }

    fn event_from_js(&self, event: &JsValue) -> std::result::Result<TextEvent, JsValue> {
        let index = invoke(event, "index", &[])?.as_f64().unwrap_or(0.0) as usize;
        let text = invoke(event, "text", &[])?.as_string().unwrap_or_default();
        let is_local = invoke(event, "isLocal", &[])?.as_bool().unwrap_or(false);
        let current = self.current_text()?;
        Ok(TextEvent::new(utf16_to_char(&current, index), text, is_local))
    }
}

/// Call `object[method](...args)`
fn invoke(
    object: &JsValue,
    method: &str,
    args: &[JsValue],
) -> std::result::Result<JsValue, JsValue> {
    let function: Function = Reflect::get(object, &JsValue::from_str(method))?.dyn_into()?;
    let args: Array = args.iter().collect();
    function.apply(object, &args)
}

impl SharedString for JsSharedString {
    fn text(&self) -> String {
        self.current_text().unwrap_or_else(|err| {
            console_log!("getText failed: {:?}", err);
            String::new()
        })
    }

    fn insert_string(&self, index: usize, text: &str) {
        let index = char_to_utf16(&self.text(), index);
        let args = [JsValue::from_f64(index as f64), JsValue::from_str(text)];
        if let Err(err) = invoke(&self.object, "insertString", &args) {
            console_log!("insertString failed: {:?}", err);
        }
    }

    fn remove_range(&self, start: usize, end: usize) {
        let current = self.text();
        let args = [
            JsValue::from_f64(char_to_utf16(&current, start) as f64),
            JsValue::from_f64(char_to_utf16(&current, end) as f64),
        ];
        if let Err(err) = invoke(&self.object, "removeRange", &args) {
            console_log!("removeRange failed: {:?}", err);
        }
    }

    fn on_text_inserted(&self, handler: TextHandler) -> Box<dyn Registration> {
        self.subscribe("onTextInserted", handler)
    }

    fn on_text_deleted(&self, handler: TextHandler) -> Box<dyn Registration> {
        self.subscribe("onTextDeleted", handler)
    }
}

/// JS registration object plus the closure it calls
struct JsRegistration {
    registration: JsValue,
    callback: RefCell<Option<Closure<dyn Fn(JsValue)>>>,
}

impl Registration for JsRegistration {
    fn unregister(&self) {
        if self.callback.borrow_mut().take().is_some() {
            if let Err(err) = invoke(&self.registration, "unregister", &[]) {
                console_log!("unregister failed: {:?}", err);
            }
        }
    }
}

impl Drop for JsRegistration {
    fn drop(&mut self) {
        // Still subscribed on the JS side: keep the closure alive so the JS
        // string never calls into freed memory
        if let Some(callback) = self.callback.get_mut().take() {
            callback.forget();
        }
    }
}
