//! Generic per-widget property storage.
//!
//! Most widgets carry at most one application value, so the store starts out
//! as a bare slot and only grows a keyed list once a named property is set.

use std::any::Any;
use std::sync::Arc;

/// An application-defined value attached to a widget.
pub type PropertyValue = Arc<dyn Any + Send + Sync>;

/// Wrap `value` for storage.
pub fn property<T: Any + Send + Sync>(value: T) -> PropertyValue {
    Arc::new(value)
}

/// Property data of one widget.
///
/// Invariant: `Keyed` always holds at least one entry. Removing the last
/// named entry collapses the store back to `Single` (or `Empty` when the
/// unnamed slot is unset).
#[derive(Clone, Default)]
pub enum PropertyData {
    #[default]
    Empty,
    Single(PropertyValue),
    Keyed {
        unnamed: Option<PropertyValue>,
        entries: Vec<(String, PropertyValue)>,
    },
}

impl PropertyData {
    /// The unnamed slot.
    pub fn get(&self) -> Option<PropertyValue> {
        match self {
            PropertyData::Empty => None,
            PropertyData::Single(value) => Some(value.clone()),
            PropertyData::Keyed { unnamed, .. } => unnamed.clone(),
        }
    }

    /// Replace the unnamed slot, leaving named entries alone.
    pub fn set(&mut self, value: Option<PropertyValue>) {
        match self {
            PropertyData::Keyed { unnamed, .. } => *unnamed = value,
            _ => {
                *self = match value {
                    Some(value) => PropertyData::Single(value),
                    None => PropertyData::Empty,
                }
            }
        }
    }

    /// Look up a named entry.
    pub fn get_keyed(&self, key: &str) -> Option<PropertyValue> {
        match self {
            PropertyData::Keyed { entries, .. } => entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, value)| value.clone()),
            _ => None,
        }
    }

    /// Set or remove a named entry.
    ///
    /// Setting an existing key overwrites it in place; a new key is appended.
    /// Removing keeps the remaining keys in their relative order.
    pub fn set_keyed(&mut self, key: &str, value: Option<PropertyValue>) {
        match value {
            Some(value) => self.insert_keyed(key, value),
            None => self.remove_keyed(key),
        }
    }

    fn insert_keyed(&mut self, key: &str, value: PropertyValue) {
        if let PropertyData::Keyed { entries, .. } = self {
            match entries.iter_mut().find(|(k, _)| k == key) {
                Some(entry) => entry.1 = value,
                None => entries.push((key.to_owned(), value)),
            }
            return;
        }

        let unnamed = self.get();
        *self = PropertyData::Keyed {
            unnamed,
            entries: vec![(key.to_owned(), value)],
        };
    }

    fn remove_keyed(&mut self, key: &str) {
        let PropertyData::Keyed { unnamed, entries } = self else {
            return;
        };
        let Some(index) = entries.iter().position(|(k, _)| k == key) else {
            return;
        };
        entries.remove(index);
        if entries.is_empty() {
            *self = match unnamed.take() {
                Some(value) => PropertyData::Single(value),
                None => PropertyData::Empty,
            };
        }
    }

    /// Returns true if any named entry is present.
    #[inline]
    pub fn is_keyed(&self) -> bool {
        matches!(self, PropertyData::Keyed { .. })
    }

    /// Names of the stored entries, in storage order.
    pub fn keys(&self) -> Vec<String> {
        match self {
            PropertyData::Keyed { entries, .. } => {
                entries.iter().map(|(k, _)| k.clone()).collect()
            }
            _ => Vec::new(),
        }
    }
}

impl std::fmt::Debug for PropertyData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyData::Empty => write!(f, "Empty"),
            PropertyData::Single(_) => write!(f, "Single(..)"),
            PropertyData::Keyed { unnamed, entries } => f
                .debug_struct("Keyed")
                .field("unnamed", &unnamed.is_some())
                .field("keys", &entries.iter().map(|(k, _)| k).collect::<Vec<_>>())
                .finish(),
        }
    }
}
