//! Extension points for concrete widget kinds.

use super::Widget;
use crate::session::NativeHandle;
use std::any::Any;

/// How far a reskin request reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReskinScope {
    /// Only the widget itself.
    Widget,
    /// The widget and, through [`WidgetBehavior::reskin_children`], its
    /// descendants.
    Subtree,
}

/// Kind-specific behavior plugged into a [`Widget`].
///
/// Every hook has a do-nothing default, so a kind overrides only the hooks
/// it cares about. Hooks receive the widget they belong to; they run on the
/// owning thread with no widget lock held, so calling back into the widget
/// is allowed.
///
/// # Example
///
/// ```rust
/// use ferrule_widgets::{Widget, WidgetBehavior};
///
/// struct Label;
///
/// impl WidgetBehavior for Label {
///     fn kind_name(&self) -> &'static str {
///         "Label"
///     }
///
///     fn name_text(&self, widget: &Widget) -> String {
///         widget.data_as::<String>().ok().flatten().map(|s| s.to_string()).unwrap_or_default()
///     }
/// }
/// ```
pub trait WidgetBehavior: Any + Send + Sync {
    /// Name of the widget kind, used in diagnostics and subclass checks.
    fn kind_name(&self) -> &'static str;

    /// Create the native resource backing the widget.
    fn create_handle(&self, _widget: &Widget) -> Option<NativeHandle> {
        None
    }

    /// Connect native signals once the handle exists.
    fn hook_events(&self, _widget: &Widget) {}

    /// Release owned child widgets, typically with `child.release(false)`.
    fn release_children(&self, _widget: &Widget, _destroy: bool) {}

    /// Detach from the parent container before the native handle is destroyed.
    fn release_parent(&self, _widget: &Widget) {}

    /// Let go of kind-specific resources. Runs while the widget is still
    /// usable.
    fn release_widget(&self, _widget: &Widget) {}

    /// Destroy a native handle the widget owns.
    fn destroy_handle(&self, _widget: &Widget, _handle: NativeHandle) {}

    /// Drop the reference to a native handle without destroying it. Used for
    /// foreign handles and for handles being reparented.
    fn release_handle(&self, _widget: &Widget, _handle: NativeHandle) {}

    /// Forward a reskin request to descendants.
    fn reskin_children(&self, _widget: &Widget, _scope: ReskinScope) {}

    /// Short description shown when the widget is formatted.
    fn name_text(&self, _widget: &Widget) -> String {
        String::new()
    }

    /// Returns true if the widget currently accepts user input.
    fn is_active(&self, _widget: &Widget) -> bool {
        true
    }
}
