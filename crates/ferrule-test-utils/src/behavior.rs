//! Mock widget behaviors.

use ferrule_widgets::{NativeHandle, ReskinScope, Widget, WidgetBehavior, WidgetId};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Records a behavior hook call for verification in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorCall {
    CreateHandle,
    HookEvents,
    ReleaseChildren { destroy: bool },
    ReleaseParent,
    ReleaseWidget,
    DestroyHandle(NativeHandle),
    ReleaseHandle(NativeHandle),
    ReskinChildren(ReskinScope),
}

/// Hook calls of one or more widgets, in call order.
#[derive(Debug, Default)]
pub struct CallLog {
    calls: Mutex<Vec<(WidgetId, BehaviorCall)>>,
}

impl CallLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn record(&self, widget: &Widget, call: BehaviorCall) {
        self.calls.lock().push((widget.id(), call));
    }

    pub fn entries(&self) -> Vec<(WidgetId, BehaviorCall)> {
        self.calls.lock().clone()
    }

    /// Calls made on `widget`.
    pub fn calls_for(&self, widget: WidgetId) -> Vec<BehaviorCall> {
        self.calls
            .lock()
            .iter()
            .filter(|(id, _)| *id == widget)
            .map(|(_, call)| *call)
            .collect()
    }

    pub fn count(&self, call: BehaviorCall) -> usize {
        self.calls.lock().iter().filter(|(_, c)| *c == call).count()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

/// Behavior that records every hook call and otherwise does nothing.
#[derive(Debug)]
pub struct MockBehavior {
    kind: &'static str,
    handle: Option<NativeHandle>,
    active: AtomicBool,
    log: Arc<CallLog>,
}

impl MockBehavior {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            handle: None,
            active: AtomicBool::new(true),
            log: CallLog::new(),
        }
    }

    /// Create the given native handle when the widget is built.
    pub fn with_handle(mut self, raw: u64) -> Self {
        self.handle = NativeHandle::new(raw);
        self
    }

    /// Record into a log shared with other widgets.
    pub fn with_log(mut self, log: Arc<CallLog>) -> Self {
        self.log = log;
        self
    }

    pub fn log(&self) -> &Arc<CallLog> {
        &self.log
    }

    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Relaxed);
    }
}

impl WidgetBehavior for MockBehavior {
    fn kind_name(&self) -> &'static str {
        self.kind
    }

    fn create_handle(&self, widget: &Widget) -> Option<NativeHandle> {
        self.log.record(widget, BehaviorCall::CreateHandle);
        self.handle
    }

    fn hook_events(&self, widget: &Widget) {
        self.log.record(widget, BehaviorCall::HookEvents);
    }

    fn release_children(&self, widget: &Widget, destroy: bool) {
        self.log.record(widget, BehaviorCall::ReleaseChildren { destroy });
    }

    fn release_parent(&self, widget: &Widget) {
        self.log.record(widget, BehaviorCall::ReleaseParent);
    }

    fn release_widget(&self, widget: &Widget) {
        self.log.record(widget, BehaviorCall::ReleaseWidget);
    }

    fn destroy_handle(&self, widget: &Widget, handle: NativeHandle) {
        self.log.record(widget, BehaviorCall::DestroyHandle(handle));
    }

    fn release_handle(&self, widget: &Widget, handle: NativeHandle) {
        self.log.record(widget, BehaviorCall::ReleaseHandle(handle));
    }

    fn reskin_children(&self, widget: &Widget, scope: ReskinScope) {
        self.log.record(widget, BehaviorCall::ReskinChildren(scope));
    }

    fn is_active(&self, _widget: &Widget) -> bool {
        self.active.load(Ordering::Relaxed)
    }
}

/// Behavior of a widget that owns children.
///
/// Children are released, not destroyed, when the container goes away:
/// their native resources die with the container's.
#[derive(Debug)]
pub struct ContainerBehavior {
    inner: MockBehavior,
    children: Mutex<Vec<Arc<Widget>>>,
}

impl ContainerBehavior {
    pub fn new(kind: &'static str) -> Self {
        Self {
            inner: MockBehavior::new(kind),
            children: Mutex::new(Vec::new()),
        }
    }

    pub fn with_handle(mut self, raw: u64) -> Self {
        self.inner = self.inner.with_handle(raw);
        self
    }

    pub fn with_log(mut self, log: Arc<CallLog>) -> Self {
        self.inner = self.inner.with_log(log);
        self
    }

    pub fn log(&self) -> &Arc<CallLog> {
        self.inner.log()
    }

    pub fn add_child(&self, child: Arc<Widget>) {
        self.children.lock().push(child);
    }

    pub fn children(&self) -> Vec<Arc<Widget>> {
        self.children.lock().clone()
    }
}

impl WidgetBehavior for ContainerBehavior {
    fn kind_name(&self) -> &'static str {
        self.inner.kind_name()
    }

    fn create_handle(&self, widget: &Widget) -> Option<NativeHandle> {
        self.inner.create_handle(widget)
    }

    fn hook_events(&self, widget: &Widget) {
        self.inner.hook_events(widget);
    }

    fn release_children(&self, widget: &Widget, destroy: bool) {
        self.inner.release_children(widget, destroy);
        let children = std::mem::take(&mut *self.children.lock());
        for child in children {
            // Children share the container's thread, which already passed the guard.
            let _ = child.release(false);
        }
    }

    fn release_parent(&self, widget: &Widget) {
        self.inner.release_parent(widget);
    }

    fn release_widget(&self, widget: &Widget) {
        self.inner.release_widget(widget);
    }

    fn destroy_handle(&self, widget: &Widget, handle: NativeHandle) {
        self.inner.destroy_handle(widget, handle);
    }

    fn release_handle(&self, widget: &Widget, handle: NativeHandle) {
        self.inner.release_handle(widget, handle);
    }

    fn reskin_children(&self, widget: &Widget, scope: ReskinScope) {
        self.inner.reskin_children(widget, scope);
        for child in self.children() {
            if !child.is_disposed() {
                let _ = child.reskin(scope);
            }
        }
    }

    fn is_active(&self, widget: &Widget) -> bool {
        self.inner.is_active(widget)
    }
}
