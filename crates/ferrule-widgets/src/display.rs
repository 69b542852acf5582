//! The in-process display: filters, deferred queue and handle registry.

use crate::error::WidgetResult;
use crate::event::{Event, EventKind};
use crate::event_table::EventTable;
use crate::input::{BasicKeymap, Keymap};
use crate::listener::ListenerRef;
use crate::session::{NativeHandle, Session};
use crate::thread_guard::ThreadGuard;
use crate::widget::Widget;
use ferrule_core::alloc::{HashMap, HashSet};
use ferrule_core::profiling::{new_frame, profile_function};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use std::thread::ThreadId;

/// Display settings.
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    /// Initial capacity of the posted-event queue.
    pub deferred_queue_capacity: usize,
    /// Widget kinds that may be instantiated. `None` allows every kind.
    pub allowed_kinds: Option<HashSet<String>>,
    /// Last-event time reported before any native event has been seen.
    pub default_event_time: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            deferred_queue_capacity: 64,
            allowed_kinds: None,
            default_event_time: 0,
        }
    }
}

/// Counters for the posted-event queue.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct DeferredStats {
    pub events_posted: usize,
    pub events_delivered: usize,
    /// Posted events whose widget was disposed before delivery.
    pub events_dropped: usize,
}

/// The session implementation used by applications and tests.
///
/// Owned by the thread that created it. Filters, the posted-event queue and
/// skin processing may only be driven from that thread.
pub struct Display {
    guard: ThreadGuard,
    config: DisplayConfig,
    keymap: Box<dyn Keymap>,
    filter_table: Mutex<EventTable>,
    deferred: Mutex<VecDeque<Event>>,
    widgets: Mutex<HashMap<NativeHandle, Weak<Widget>>>,
    skin_list: Mutex<Vec<Weak<Widget>>>,
    last_event_time: AtomicU32,
    input_state: Mutex<Option<u32>>,
    send_depth: AtomicUsize,
    stats: Mutex<DeferredStats>,
}

impl Display {
    /// Create a display owned by the calling thread.
    pub fn new() -> Arc<Self> {
        Self::with_config(DisplayConfig::default())
    }

    pub fn with_config(config: DisplayConfig) -> Arc<Self> {
        Self::with_keymap(config, Box::new(BasicKeymap))
    }

    pub fn with_keymap(config: DisplayConfig, keymap: Box<dyn Keymap>) -> Arc<Self> {
        tracing::debug!("Creating display on {:?}", std::thread::current().id());
        Arc::new(Self {
            guard: ThreadGuard::current(),
            deferred: Mutex::new(VecDeque::with_capacity(config.deferred_queue_capacity)),
            last_event_time: AtomicU32::new(config.default_event_time),
            config,
            keymap,
            filter_table: Mutex::new(EventTable::new()),
            widgets: Mutex::new(HashMap::new()),
            skin_list: Mutex::new(Vec::new()),
            input_state: Mutex::new(None),
            send_depth: AtomicUsize::new(0),
            stats: Mutex::new(DeferredStats::default()),
        })
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Register a filter that sees every event of `kind` on this display
    /// before widget listeners do. A filter vetoes an event by setting its
    /// kind to [`EventKind::None`].
    pub fn add_filter(&self, kind: EventKind, listener: ListenerRef) -> WidgetResult<()> {
        self.guard.check()?;
        self.filter_table.lock().hook(kind, listener);
        Ok(())
    }

    pub fn remove_filter(&self, kind: EventKind, listener: &ListenerRef) -> WidgetResult<()> {
        self.guard.check()?;
        self.filter_table.lock().unhook(kind, listener);
        Ok(())
    }

    /// Record the timestamp and modifier state of the native event being
    /// processed.
    pub fn set_current_event(&self, time: u32, input_state: Option<u32>) -> WidgetResult<()> {
        self.guard.check()?;
        self.last_event_time.store(time, Ordering::Relaxed);
        *self.input_state.lock() = input_state;
        Ok(())
    }

    /// Number of events waiting in the posted-event queue.
    pub fn pending_events(&self) -> usize {
        self.deferred.lock().len()
    }

    pub fn stats(&self) -> DeferredStats {
        self.stats.lock().clone()
    }

    /// Number of live widgets registered by native handle.
    pub fn registered_widgets(&self) -> usize {
        self.widgets
            .lock()
            .values()
            .filter(|widget| widget.strong_count() > 0)
            .count()
    }

    /// Deliver every posted event, including events posted while draining.
    ///
    /// Events whose widget was disposed after posting are dropped. Returns the
    /// number of events delivered.
    pub fn run_deferred_events(&self) -> WidgetResult<usize> {
        profile_function!();
        self.guard.check()?;

        let mut delivered = 0;
        loop {
            // The queue lock is released before delivery so listeners may post.
            let Some(mut event) = self.deferred.lock().pop_front() else {
                break;
            };
            let Some(widget) = event.widget.clone() else {
                tracing::warn!("Dropping posted {:?} event without a widget", event.kind);
                self.stats.lock().events_dropped += 1;
                continue;
            };
            if widget.is_disposed() {
                tracing::trace!("Dropping posted {:?} event for disposed {}", event.kind, widget);
                self.stats.lock().events_dropped += 1;
                continue;
            }
            widget.deliver(&mut event);
            delivered += 1;
            self.stats.lock().events_delivered += 1;
        }
        Ok(delivered)
    }

    /// Send a Skin event to every widget queued for skinning.
    ///
    /// Only the widgets queued when the call starts are skinned. Requests made
    /// by Skin listeners wait for the next call. Returns true if at least one
    /// widget was skinned.
    pub fn run_skin(&self) -> WidgetResult<bool> {
        profile_function!();
        self.guard.check()?;

        let pending = std::mem::take(&mut *self.skin_list.lock());
        let mut skinned = false;
        for widget in pending.iter().filter_map(Weak::upgrade) {
            if widget.take_skin_request() {
                widget.send_skin_event();
                skinned = true;
            }
        }
        Ok(skinned)
    }

    /// Number of widgets waiting for a Skin event.
    pub fn pending_skins(&self) -> usize {
        self.skin_list.lock().len()
    }

    /// One turn of the run loop: skinning, then posted events.
    ///
    /// Returns true if any work was done.
    pub fn read_and_dispatch(&self) -> WidgetResult<bool> {
        let skinned = self.run_skin()?;
        let delivered = self.run_deferred_events()?;
        new_frame();
        Ok(skinned || delivered > 0)
    }
}

impl Session for Display {
    fn owner_thread(&self) -> ThreadId {
        self.guard.owner()
    }

    fn filters(&self, kind: EventKind) -> bool {
        self.filter_table.lock().hooks(kind)
    }

    fn filter_event(&self, event: &mut Event) -> bool {
        let filters = self.filter_table.lock().listeners(event.kind);
        if filters.is_empty() {
            return false;
        }
        self.send_event(&filters, event);
        event.kind == EventKind::None
    }

    fn send_event(&self, listeners: &[ListenerRef], event: &mut Event) {
        profile_function!();
        let depth = self.send_depth.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(
            "Sending {:?} to {} listener(s) at depth {}",
            event.kind,
            listeners.len(),
            depth
        );
        for listener in listeners {
            if event.kind == EventKind::None {
                break;
            }
            listener.handle_event(event);
        }
        self.send_depth.fetch_sub(1, Ordering::Relaxed);
    }

    fn post_event(&self, event: Event) {
        tracing::trace!("Posting {:?} event", event.kind);
        self.deferred.lock().push_back(event);
        self.stats.lock().events_posted += 1;
    }

    fn last_event_time(&self) -> u32 {
        self.last_event_time.load(Ordering::Relaxed)
    }

    fn current_input_state(&self) -> Option<u32> {
        *self.input_state.lock()
    }

    fn add_widget(&self, handle: NativeHandle, widget: &Arc<Widget>) {
        let previous = self.widgets.lock().insert(handle, Arc::downgrade(widget));
        if previous.is_some_and(|old| old.strong_count() > 0) {
            tracing::warn!("Native handle {} registered twice", handle);
        }
    }

    fn remove_widget(&self, handle: NativeHandle) {
        self.widgets.lock().remove(&handle);
    }

    fn find_widget(&self, handle: NativeHandle) -> Option<Arc<Widget>> {
        self.widgets.lock().get(&handle).and_then(Weak::upgrade)
    }

    fn add_skinnable_widget(&self, widget: &Arc<Widget>) {
        self.skin_list.lock().push(Arc::downgrade(widget));
    }

    fn is_valid_kind(&self, kind: &str) -> bool {
        self.config
            .allowed_kinds
            .as_ref()
            .is_none_or(|allowed| allowed.contains(kind))
    }

    fn keymap(&self) -> &dyn Keymap {
        self.keymap.as_ref()
    }
}

impl std::fmt::Debug for Display {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Display")
            .field("owner", &self.guard.owner())
            .field("pending_events", &self.pending_events())
            .field("registered_widgets", &self.widgets.lock().len())
            .finish_non_exhaustive()
    }
}
