// SPDX-License-Identifier: GPL-3.0-only

//! Observer lists for outbound view notifications.
//!
//! Each notification kind owns an [`Observers`] list. Subscribers are invoked
//! in subscription order on the UI thread and receive a mutable reference to
//! the notification, so a receiver can mark a shortcut as handled before the
//! next one sees it. Unsubscribing is the explicit lifecycle hook a page uses
//! when it unloads.

use std::fmt;

/// Identifier returned by [`Observers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Observer<T> = Box<dyn FnMut(&mut T)>;

/// An ordered list of observers for notifications of type `T`.
pub struct Observers<T> {
    next_id: u64,
    entries: Vec<(SubscriptionId, Observer<T>)>,
}

impl<T> Default for Observers<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<T> fmt::Debug for Observers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl<T> Observers<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an observer and returns the id used to remove it again.
    pub fn subscribe(&mut self, observer: impl FnMut(&mut T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns `false` if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Delivers a notification to every observer in subscription order.
    pub fn notify(&mut self, notification: &mut T) {
        for (_, observer) in &mut self.entries {
            observer(notification);
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_notify_in_subscription_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut observers = Observers::<u32>::new();

        let first = Rc::clone(&seen);
        observers.subscribe(move |value| first.borrow_mut().push(("first", *value)));
        let second = Rc::clone(&seen);
        observers.subscribe(move |value| second.borrow_mut().push(("second", *value)));

        observers.notify(&mut 7);

        assert_eq!(*seen.borrow(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut observers = Observers::<()>::new();

        let counter = Rc::clone(&count);
        let id = observers.subscribe(move |_| *counter.borrow_mut() += 1);
        observers.notify(&mut ());
        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));
        observers.notify(&mut ());

        assert_eq!(*count.borrow(), 1);
        assert!(observers.is_empty());
    }

    #[test]
    fn test_observers_can_mutate_notification() {
        let mut observers = Observers::<bool>::new();
        observers.subscribe(|handled| *handled = true);

        let mut handled = false;
        observers.notify(&mut handled);
        assert!(handled);
    }
}
