//! Application data attached to a widget.

use super::{ReskinScope, Widget};
use crate::error::{WidgetError, WidgetResult};
use crate::property::{PropertyValue, property};
use crate::state::StateFlags;
use std::any::Any;
use std::sync::Arc;

/// Toggles native subwindow checking. Takes a `bool`; never stored.
pub const CHECK_SUBWINDOW_KEY: &str = "ferrule.internal.checkSubwindow";
/// Read-only. Reports whether the widget currently accepts input.
pub const IS_ACTIVE_KEY: &str = "ferrule.internal.isActive";
/// Setting it queues the widget and its descendants for skinning.
pub const SKIN_CLASS_KEY: &str = "ferrule.skin.class";
/// Setting it queues the widget and its descendants for skinning.
pub const SKIN_ID_KEY: &str = "ferrule.skin.id";

impl Widget {
    /// The unnamed application value.
    pub fn data(&self) -> WidgetResult<Option<PropertyValue>> {
        self.check_widget()?;
        Ok(self.inner.lock().data.get())
    }

    /// The unnamed application value, if it is a `T`.
    pub fn data_as<T: Any + Send + Sync>(&self) -> WidgetResult<Option<Arc<T>>> {
        Ok(self.data()?.and_then(|value| value.downcast::<T>().ok()))
    }

    /// Replace the unnamed application value. Named entries are unaffected.
    pub fn set_data(&self, value: Option<PropertyValue>) -> WidgetResult<()> {
        self.check_widget()?;
        let previous = {
            let mut inner = self.inner.lock();
            let previous = inner.data.get();
            inner.data.set(value);
            previous
        };
        // The last reference may run arbitrary drop code, so it goes after the lock.
        drop(previous);
        Ok(())
    }

    /// The value stored under `key`.
    ///
    /// # Errors
    ///
    /// [`WidgetError::NullArgument`] if `key` is empty.
    pub fn data_for(&self, key: &str) -> WidgetResult<Option<PropertyValue>> {
        self.check_widget()?;
        if key.is_empty() {
            return Err(WidgetError::NullArgument);
        }
        match key {
            CHECK_SUBWINDOW_KEY => Ok(Some(property(
                self.state().contains(StateFlags::CHECK_SUBWINDOW),
            ))),
            IS_ACTIVE_KEY => Ok(Some(property(self.behavior.is_active(self)))),
            _ => Ok(self.inner.lock().data.get_keyed(key)),
        }
    }

    /// Store `value` under `key`, or remove the entry when `value` is `None`.
    ///
    /// # Errors
    ///
    /// [`WidgetError::NullArgument`] if `key` is empty.
    pub fn set_data_for(&self, key: &str, value: Option<PropertyValue>) -> WidgetResult<()> {
        self.check_widget()?;
        if key.is_empty() {
            return Err(WidgetError::NullArgument);
        }
        if key == CHECK_SUBWINDOW_KEY {
            let enabled = value
                .as_ref()
                .and_then(|value| value.downcast_ref::<bool>())
                .copied()
                .unwrap_or(false);
            self.inner
                .lock()
                .state
                .set(StateFlags::CHECK_SUBWINDOW, enabled);
            return Ok(());
        }

        let previous = {
            let mut inner = self.inner.lock();
            let previous = inner.data.get_keyed(key);
            inner.data.set_keyed(key, value);
            let keyed = inner.data.is_keyed();
            inner.state.set(StateFlags::KEYED_DATA, keyed);
            previous
        };
        drop(previous);

        if key == SKIN_CLASS_KEY || key == SKIN_ID_KEY {
            self.reskin(ReskinScope::Subtree)?;
        }
        Ok(())
    }

    /// Names of the keyed entries, in storage order.
    pub fn data_keys(&self) -> WidgetResult<Vec<String>> {
        self.check_widget()?;
        Ok(self.inner.lock().data.keys())
    }
}
