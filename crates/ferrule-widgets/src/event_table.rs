//! Per-widget listener registry.

use crate::event::EventKind;
use crate::listener::ListenerRef;
use indexmap::IndexMap;

/// Ordered multi-map from event kind to listeners.
///
/// Listeners of one kind are kept in registration order, which is also the
/// order they are notified in. The same listener may be registered more than
/// once; each registration is delivered and removed separately.
#[derive(Debug, Default, Clone)]
pub struct EventTable {
    listeners: IndexMap<EventKind, Vec<ListenerRef>>,
}

impl EventTable {
    pub fn new() -> Self {
        Self {
            listeners: IndexMap::new(),
        }
    }

    /// Append `listener` to the listeners of `kind`.
    pub fn hook(&mut self, kind: EventKind, listener: ListenerRef) {
        self.listeners.entry(kind).or_default().push(listener);
    }

    /// Remove the first registration of `listener` for `kind`.
    ///
    /// Returns true if a registration was removed.
    pub fn unhook(&mut self, kind: EventKind, listener: &ListenerRef) -> bool {
        let Some(list) = self.listeners.get_mut(&kind) else {
            return false;
        };
        let Some(index) = list.iter().position(|l| l == listener) else {
            return false;
        };
        list.remove(index);
        if list.is_empty() {
            self.listeners.shift_remove(&kind);
        }
        true
    }

    /// Returns true if at least one listener is registered for `kind`.
    pub fn hooks(&self, kind: EventKind) -> bool {
        self.listeners.get(&kind).is_some_and(|list| !list.is_empty())
    }

    /// Snapshot of the listeners registered for `kind`.
    pub fn listeners(&self, kind: EventKind) -> Vec<ListenerRef> {
        self.listeners.get(&kind).cloned().unwrap_or_default()
    }

    /// Number of registrations across all kinds.
    pub fn len(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Kinds with at least one listener, in first-registration order.
    pub fn kinds(&self) -> impl Iterator<Item = EventKind> + '_ {
        self.listeners.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;

    fn listener() -> ListenerRef {
        ListenerRef::new(|_: &mut Event| {})
    }

    #[test]
    fn test_hook_preserves_order() {
        let mut table = EventTable::new();
        let (a, b, c) = (listener(), listener(), listener());
        table.hook(EventKind::Selection, a.clone());
        table.hook(EventKind::Selection, b.clone());
        table.hook(EventKind::Selection, c.clone());

        assert_eq!(table.listeners(EventKind::Selection), vec![a, b, c]);
        assert!(table.listeners(EventKind::Dispose).is_empty());
    }

    #[test]
    fn test_unhook_keeps_relative_order() {
        let mut table = EventTable::new();
        let (a, b, c) = (listener(), listener(), listener());
        for l in [&a, &b, &c] {
            table.hook(EventKind::Modify, l.clone());
        }

        assert!(table.unhook(EventKind::Modify, &b));
        assert_eq!(table.listeners(EventKind::Modify), vec![a, c]);
        assert!(!table.unhook(EventKind::Modify, &b));
    }

    #[test]
    fn test_unhook_wrong_kind_is_noop() {
        let mut table = EventTable::new();
        let a = listener();
        table.hook(EventKind::Modify, a.clone());

        assert!(!table.unhook(EventKind::Verify, &a));
        assert!(table.hooks(EventKind::Modify));
    }

    #[test]
    fn test_duplicate_registration() {
        let mut table = EventTable::new();
        let a = listener();
        table.hook(EventKind::Show, a.clone());
        table.hook(EventKind::Show, a.clone());
        assert_eq!(table.len(), 2);

        table.unhook(EventKind::Show, &a);
        assert!(table.hooks(EventKind::Show));
        table.unhook(EventKind::Show, &a);
        assert!(!table.hooks(EventKind::Show));
        assert!(table.is_empty());
    }

    #[test]
    fn test_kinds_in_registration_order() {
        let mut table = EventTable::new();
        table.hook(EventKind::Hide, listener());
        table.hook(EventKind::Show, listener());
        table.hook(EventKind::Hide, listener());

        let kinds: Vec<_> = table.kinds().collect();
        assert_eq!(kinds, vec![EventKind::Hide, EventKind::Show]);
    }
}
