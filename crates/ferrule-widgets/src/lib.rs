//! Ferrule Widgets - toolkit-neutral widget core
//!
//! This crate provides the bookkeeping every native widget binding needs:
//! - Lifecycle state machine with dispose/release sequencing
//! - Per-widget event listener tables with filter and posting support
//! - Generic key/value property store
//! - Owning-thread enforcement
//! - Routing of native signal ids to per-kind handlers
//! - Translation of native key events
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrule_widgets::{Display, Event, EventKind, ListenerRef, Style, Widget, WidgetBehavior};
//!
//! struct Button;
//!
//! impl WidgetBehavior for Button {
//!     fn kind_name(&self) -> &'static str {
//!         "Button"
//!     }
//! }
//!
//! let display = Display::new();
//! let button = Widget::new_root(display.clone(), Style::BORDER, Button).unwrap();
//!
//! button
//!     .add_listener(
//!         EventKind::Selection,
//!         ListenerRef::new(|event: &mut Event| println!("clicked at {}", event.time)),
//!     )
//!     .unwrap();
//! button.notify(EventKind::Selection).unwrap();
//!
//! // Posted events wait for the run loop.
//! button.post_event(EventKind::Selection, None).unwrap();
//! display.read_and_dispatch().unwrap();
//!
//! button.dispose().unwrap();
//! ```

pub mod display;
pub mod error;
pub mod event;
pub mod event_table;
pub mod input;
pub mod listener;
pub mod property;
pub mod session;
pub mod signal;
pub mod state;
pub mod style;
pub mod thread_guard;
pub mod widget;

pub use display::{DeferredStats, Display, DisplayConfig};
pub use error::{WidgetError, WidgetResult};
pub use event::{Event, EventKind, KeyLocation, ModifierMask};
pub use event_table::EventTable;
pub use input::{BasicKeymap, Keymap, NativeKeyEvent, translate_key_event};
pub use listener::{Listener, ListenerRef};
pub use property::{PropertyData, PropertyValue, property};
pub use session::{NativeHandle, Session};
pub use signal::{CallbackResult, NativeEvent, Signal, SignalArgs, SignalHandler, SignalHandlers, SignalRouter};
pub use state::{Lifecycle, StateFlags};
pub use style::{Style, check_bits, check_orientation};
pub use thread_guard::ThreadGuard;
pub use widget::{ReskinScope, Widget, WidgetBehavior, WidgetId};
