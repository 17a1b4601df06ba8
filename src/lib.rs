//! TextSync Core - Collaborative text surface binding
//!
//! Keeps an editable text control synchronized with a text value that remote
//! collaborators mutate concurrently. Compiled to both native and WASM.
//! It implements:
//! - Binding lifecycle (validation, initial sync, listener wiring, unbind)
//! - Local -> remote: semantic diff of settled edits into ordered
//!   insert/remove operations
//! - Remote -> local: splicing notifications into the control while keeping
//!   the user's selection and scroll position
//! - Echo suppression for operations this replica issued itself
//!
//! The collaborative string and the text control are collaborators reached
//! through the [`SharedString`] and [`Surface`] traits. In-memory
//! implementations ([`LocalString`], [`MemorySurface`]) drive the bridge
//! outside a browser; the `wasm` feature adds DOM and JS adapters.
//!
//! # Examples
//!
//! ```rust
//! use std::rc::Rc;
//! use textsync_core::{bind, LocalString, MemorySurface, SharedString, TaskQueue};
//!
//! let string = Rc::new(LocalString::new("draft"));
//! let surface = Rc::new(MemorySurface::textarea());
//! let queue = Rc::new(TaskQueue::new());
//!
//! let binding = bind(string.clone(), surface.clone(), queue.clone()).unwrap();
//! surface.move_caret(0);
//! surface.type_text("final ");
//! queue.run_pending();
//!
//! assert_eq!(string.text(), "final draft");
//! binding.unbind();
//! ```

pub mod binding;
pub mod cursor;
pub mod diff;
pub mod error;
pub mod schedule;
pub mod shared;
pub mod surface;
pub mod text;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-exports for convenience
pub use binding::{bind, bind_with_config, Binding, BindingConfig};
pub use cursor::Selection;
pub use diff::{edit_script, Operation};
pub use error::{BindError, Result};
pub use schedule::{Scheduler, TaskQueue};
pub use shared::{LocalString, Registration, SharedString, TextEvent};
pub use surface::{EventKind, MemorySurface, Surface, SurfaceKind};
