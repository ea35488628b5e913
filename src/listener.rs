// SPDX-License-Identifier: MIT
//
// Resize listeners, addressed by the handle returned when they were added.

use std::fmt;

use cellscreen_term::Size;

/// Handle for removing a listener. Never reused within one registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Callback = Box<dyn FnMut(Size)>;

/// Registered resize callbacks, notified in registration order.
#[derive(Default)]
pub struct ResizeListeners {
    next: u64,
    entries: Vec<(ListenerId, Callback)>,
}

impl ResizeListeners {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` and return its handle.
    pub fn add(&mut self, callback: impl FnMut(Size) + 'static) -> ListenerId {
        let id = ListenerId(self.next);
        self.next += 1;
        self.entries.push((id, Box::new(callback)));
        id
    }

    /// Deregister a listener. Returns `false` if `id` was not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    /// Call every listener with `size`.
    pub fn notify(&mut self, size: Size) {
        for (_, callback) in &mut self.entries {
            callback(size);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ResizeListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(id, _)| id))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<(char, Size)>>>, impl Fn(char) -> Box<dyn FnMut(Size)>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let make = move |tag: char| -> Box<dyn FnMut(Size)> {
            let sink = Rc::clone(&sink);
            Box::new(move |size| sink.borrow_mut().push((tag, size)))
        };
        (log, make)
    }

    #[test]
    fn notifies_in_registration_order() {
        let (log, make) = recorder();
        let mut listeners = ResizeListeners::new();
        listeners.add(make('a'));
        listeners.add(make('b'));
        listeners.notify(Size::new(80, 24));
        assert_eq!(
            *log.borrow(),
            vec![('a', Size::new(80, 24)), ('b', Size::new(80, 24))]
        );
    }

    #[test]
    fn removed_listener_is_not_called() {
        let (log, make) = recorder();
        let mut listeners = ResizeListeners::new();
        let a = listeners.add(make('a'));
        listeners.add(make('b'));
        assert!(listeners.remove(a));
        assert!(!listeners.remove(a));
        listeners.notify(Size::new(1, 1));
        assert_eq!(*log.borrow(), vec![('b', Size::new(1, 1))]);
        assert_eq!(listeners.len(), 1);
    }

    #[test]
    fn handles_are_distinct() {
        let mut listeners = ResizeListeners::new();
        let a = listeners.add(|_| {});
        assert!(listeners.remove(a));
        let b = listeners.add(|_| {});
        assert_ne!(a, b);
        assert!(!listeners.remove(a));
        assert!(!listeners.is_empty());
    }
}
