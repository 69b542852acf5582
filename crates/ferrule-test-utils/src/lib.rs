//! Test utilities for Ferrule widget crates.
//!
//! - [`RecordingListener`] - listener that remembers every event it saw
//! - [`MockBehavior`] - widget behavior that records its hook calls
//! - [`ContainerBehavior`] - behavior owning child widgets, released with
//!   its parent
//!
//! # Example
//!
//! ```rust
//! use ferrule_test_utils::{MockBehavior, RecordingListener};
//! use ferrule_widgets::{Display, EventKind, Style, Widget};
//!
//! let display = Display::new();
//! let widget = Widget::new_root(display, Style::NONE, MockBehavior::new("Label")).unwrap();
//! let recorder = RecordingListener::new();
//! widget.add_dispose_listener(recorder.listener()).unwrap();
//!
//! widget.dispose().unwrap();
//! assert_eq!(recorder.kinds(), vec![EventKind::Dispose]);
//! ```

mod behavior;
mod listener;

pub use behavior::{BehaviorCall, CallLog, ContainerBehavior, MockBehavior};
pub use listener::{RecordedEvent, RecordingListener};
