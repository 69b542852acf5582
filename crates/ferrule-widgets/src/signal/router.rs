//! Signal id to per-kind handler dispatch.
//!
//! Instead of one giant switch per widget kind, each behavior type registers
//! a [`SignalHandlers`] table. Lookup is by the behavior's `TypeId`, then by
//! signal; anything missing falls through as [`CallbackResult::Unhandled`].

use super::Signal;
use crate::input::NativeKeyEvent;
use crate::session::{NativeHandle, Session};
use crate::widget::{Widget, WidgetBehavior};
use ferrule_core::alloc::HashMap;
use ferrule_core::profiling::profile_function;
use indexmap::IndexMap;
use std::any::TypeId;

/// Native event record attached to a signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeEvent {
    Key(NativeKeyEvent),
    /// Any other input event: pointer, crossing, scroll.
    Input { time: u32, state: u32 },
}

/// Arguments of one native callback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalArgs {
    /// Raw callback arguments after the handle, unused slots zero.
    pub params: [u64; 4],
    pub event: Option<NativeEvent>,
}

impl SignalArgs {
    pub fn with_event(event: NativeEvent) -> Self {
        Self {
            event: Some(event),
            ..Self::default()
        }
    }

    pub fn key_event(&self) -> Option<&NativeKeyEvent> {
        match &self.event {
            Some(NativeEvent::Key(key)) => Some(key),
            _ => None,
        }
    }
}

/// What a handler reports back to the native toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallbackResult {
    /// Let the native default handler run.
    #[default]
    Unhandled,
    /// Stop native processing of the signal.
    Handled,
}

impl CallbackResult {
    /// Value returned through the native callback.
    #[inline]
    pub const fn to_native(self) -> u64 {
        match self {
            CallbackResult::Unhandled => 0,
            CallbackResult::Handled => 1,
        }
    }
}

impl From<bool> for CallbackResult {
    fn from(handled: bool) -> Self {
        if handled {
            CallbackResult::Handled
        } else {
            CallbackResult::Unhandled
        }
    }
}

pub type SignalHandler = fn(&Widget, &SignalArgs) -> CallbackResult;

/// Handler table of one widget kind.
pub struct SignalHandlers {
    /// Human-readable name for diagnostics.
    pub name: &'static str,
    handlers: IndexMap<Signal, SignalHandler>,
}

impl SignalHandlers {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            handlers: IndexMap::new(),
        }
    }

    /// Set the handler for `signal`.
    pub fn with(mut self, signal: Signal, handler: SignalHandler) -> Self {
        self.handlers.insert(signal, handler);
        self
    }

    pub fn get(&self, signal: Signal) -> Option<SignalHandler> {
        self.handlers.get(&signal).copied()
    }

    /// Signals with a handler, in registration order. The native side
    /// connects exactly these.
    pub fn signals(&self) -> impl Iterator<Item = Signal> + '_ {
        self.handlers.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for SignalHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalHandlers")
            .field("name", &self.name)
            .field("signals", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Registry mapping behavior `TypeId` to its [`SignalHandlers`].
#[derive(Debug, Default)]
pub struct SignalRouter {
    kinds: HashMap<TypeId, SignalHandlers>,
}

impl SignalRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler table for widgets whose behavior is a `B`.
    pub fn register<B: WidgetBehavior>(&mut self, handlers: SignalHandlers) {
        tracing::debug!(
            "Registering {} signal handler(s) for {}",
            handlers.len(),
            handlers.name
        );
        self.kinds.insert(TypeId::of::<B>(), handlers);
    }

    pub fn get(&self, type_id: TypeId) -> Option<&SignalHandlers> {
        self.kinds.get(&type_id)
    }

    pub fn contains<B: WidgetBehavior>(&self) -> bool {
        self.kinds.contains_key(&TypeId::of::<B>())
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Route a raw native callback.
    ///
    /// The widget is found through the session's handle registry. Unknown
    /// ids, unknown handles, disposed widgets and unhandled signals all yield
    /// [`CallbackResult::Unhandled`].
    pub fn dispatch(
        &self,
        session: &dyn Session,
        handle: NativeHandle,
        id: u16,
        args: &SignalArgs,
    ) -> CallbackResult {
        profile_function!();
        let Some(signal) = Signal::from_id(id) else {
            tracing::warn!("Unknown signal id {} for handle {}", id, handle);
            return CallbackResult::Unhandled;
        };
        let Some(widget) = session.find_widget(handle) else {
            tracing::trace!("No widget registered for handle {} ({})", handle, signal);
            return CallbackResult::Unhandled;
        };
        self.dispatch_to(&widget, signal, args)
    }

    /// Route `signal` to the handler registered for `widget`'s kind.
    pub fn dispatch_to(&self, widget: &Widget, signal: Signal, args: &SignalArgs) -> CallbackResult {
        if widget.is_disposed() {
            return CallbackResult::Unhandled;
        }
        let Some(handler) = self
            .kinds
            .get(&widget.behavior_type_id())
            .and_then(|handlers| handlers.get(signal))
        else {
            return CallbackResult::Unhandled;
        };
        tracing::trace!("Routing {} to {}", signal, widget.id());
        handler(widget, args)
    }
}
