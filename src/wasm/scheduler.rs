//! TimeoutScheduler: next-tick execution via `setTimeout(fn, 0)`

use crate::console_log;
use crate::schedule::{Scheduler, Task};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// [`Scheduler`] backed by the browser's timer queue
///
/// A zero-delay timeout runs after the current event has finished
/// propagating, so the control's value already reflects the edit.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    fn defer(&self, task: Task) {
        let Some(window) = web_sys::window() else {
            console_log!("no window, dropping deferred task");
            return;
        };

        let callback = Closure::once_into_js(move || task());
        if let Err(err) = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), 0)
        {
            console_log!("setTimeout failed: {:?}", err);
        }
    }
}
