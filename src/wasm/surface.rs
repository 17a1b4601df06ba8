//! ElementSurface: a `<textarea>` or `<input type="text">` as a [`Surface`]
//!
//! The DOM counts selection offsets in UTF-16 code units; they are converted
//! to char offsets against the element's current value on the way in and
//! back on the way out.

use super::utils::describe;
use crate::console_log;
use crate::cursor::Selection;
use crate::error::{BindError, Result};
use crate::surface::{EventKind, Listener, ListenerId, Surface, SurfaceKind};
use crate::text::{char_to_utf16, utf16_to_char};
use js_sys::{Function, Reflect};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlInputElement, HtmlTextAreaElement};

enum Control {
    TextArea(HtmlTextAreaElement),
    Input(HtmlInputElement),
}

struct Registered {
    event: EventKind,
    callback: Closure<dyn Fn()>,
}

/// DOM text control driven by a binding
pub struct ElementSurface {
    element: Element,
    control: Control,
    listeners: RefCell<HashMap<ListenerId, Registered>>,
    next_listener: Cell<u64>,
}

impl ElementSurface {
    /// Wrap an arbitrary JS value, rejecting anything that is not an element
    pub fn from_js(value: &JsValue) -> Result<Self> {
        let element = value
            .dyn_ref::<Element>()
            .ok_or_else(|| BindError::invalid_argument("element", "Element", describe(value)))?;
        Self::from_element(element.clone())
    }

    /// Wrap an element, rejecting anything but text inputs and textareas
    pub fn from_element(element: Element) -> Result<Self> {
        let control = if let Some(textarea) = element.dyn_ref::<HtmlTextAreaElement>() {
            Control::TextArea(textarea.clone())
        } else if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            let type_attr = input.type_();
            if !SurfaceKind::from_type_attr(&type_attr).is_editable_text() {
                return Err(BindError::invalid_argument(
                    "element",
                    "text or textarea element",
                    format!("input[type={}]", type_attr),
                ));
            }
            Control::Input(input.clone())
        } else {
            return Err(BindError::invalid_argument(
                "element",
                "text or textarea element",
                element.tag_name().to_lowercase(),
            ));
        };

        Ok(Self {
            element,
            control,
            listeners: RefCell::new(HashMap::new()),
            next_listener: Cell::new(0),
        })
    }

    /// The wrapped element
    pub fn element(&self) -> &Element {
        &self.element
    }

    fn raw_selection(&self) -> (Option<u32>, Option<u32>) {
        let (start, end) = match &self.control {
            Control::TextArea(el) => (el.selection_start(), el.selection_end()),
            Control::Input(el) => (el.selection_start(), el.selection_end()),
        };
        (start.ok().flatten(), end.ok().flatten())
    }

    /// Call `addEventListener`, or `attachEvent('on' + name)` on hosts that
    /// only have the legacy API
    fn attach(&self, event: EventKind, callback: &Function) {
        let target: &JsValue = self.element.as_ref();
        let result = if has_method(target, "addEventListener") {
            self.element
                .add_event_listener_with_callback(event.dom_name(), callback)
        } else {
            call_legacy(target, "attachEvent", event, callback)
        };
        if let Err(err) = result {
            console_log!("failed to listen for {}: {:?}", event.dom_name(), err);
        }
    }

    fn detach(&self, event: EventKind, callback: &Function) {
        let target: &JsValue = self.element.as_ref();
        let result = if has_method(target, "removeEventListener") {
            self.element
                .remove_event_listener_with_callback(event.dom_name(), callback)
        } else {
            call_legacy(target, "detachEvent", event, callback)
        };
        if let Err(err) = result {
            console_log!("failed to stop listening for {}: {:?}", event.dom_name(), err);
        }
    }
}

fn has_method(target: &JsValue, name: &str) -> bool {
    Reflect::get(target, &JsValue::from_str(name))
        .map(|value| value.is_function())
        .unwrap_or(false)
}

fn call_legacy(
    target: &JsValue,
    method: &str,
    event: EventKind,
    callback: &Function,
) -> std::result::Result<(), JsValue> {
    let function: Function = Reflect::get(target, &JsValue::from_str(method))?.dyn_into()?;
    let name = JsValue::from_str(&format!("on{}", event.dom_name()));
    function.call2(target, &name, callback)?;
    Ok(())
}

impl Surface for ElementSurface {
    fn kind(&self) -> SurfaceKind {
        match &self.control {
            Control::TextArea(_) => SurfaceKind::TextArea,
            Control::Input(el) => SurfaceKind::from_type_attr(&el.type_()),
        }
    }

    fn value(&self) -> String {
        match &self.control {
            Control::TextArea(el) => el.value(),
            Control::Input(el) => el.value(),
        }
    }

    fn set_value(&self, value: &str) {
        match &self.control {
            Control::TextArea(el) => el.set_value(value),
            Control::Input(el) => el.set_value(value),
        }
    }

    fn selection(&self) -> Selection {
        let value = self.value();
        let (start, end) = self.raw_selection();
        let start = start.map(|s| utf16_to_char(&value, s as usize)).unwrap_or(0);
        let end = end.map(|e| utf16_to_char(&value, e as usize)).unwrap_or(start);
        Selection::new(start, end)
    }

    fn set_selection(&self, selection: Selection) {
        let value = self.value();
        let start = Some(char_to_utf16(&value, selection.start) as u32);
        let end = Some(char_to_utf16(&value, selection.end) as u32);
        let result = match &self.control {
            Control::TextArea(el) => el
                .set_selection_start(start)
                .and_then(|_| el.set_selection_end(end)),
            Control::Input(el) => el
                .set_selection_start(start)
                .and_then(|_| el.set_selection_end(end)),
        };
        if let Err(err) = result {
            console_log!("failed to restore selection: {:?}", err);
        }
    }

    fn scroll_top(&self) -> i32 {
        self.element.scroll_top()
    }

    fn set_scroll_top(&self, scroll_top: i32) {
        self.element.set_scroll_top(scroll_top);
    }

    fn has_focus(&self) -> bool {
        web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.active_element())
            .map(|active| js_sys::Object::is(active.as_ref(), self.element.as_ref()))
            .unwrap_or(false)
    }

    fn add_listener(&self, event: EventKind, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);

        let callback = Closure::wrap(Box::new(move || listener()) as Box<dyn Fn()>);
        self.attach(event, callback.as_ref().unchecked_ref());
        self.listeners
            .borrow_mut()
            .insert(id, Registered { event, callback });
        id
    }

    fn remove_listener(&self, event: EventKind, id: ListenerId) {
        let removed = self.listeners.borrow_mut().remove(&id);
        if let Some(registered) = removed {
            debug_assert_eq!(registered.event, event);
            self.detach(event, registered.callback.as_ref().unchecked_ref());
        }
    }
}

impl Drop for ElementSurface {
    fn drop(&mut self) {
        // Closures are about to be freed; make sure the DOM no longer calls them
        let listeners: Vec<_> = self.listeners.borrow_mut().drain().collect();
        for (_, registered) in listeners {
            self.detach(registered.event, registered.callback.as_ref().unchecked_ref());
        }
    }
}
