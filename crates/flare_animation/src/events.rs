//! Timeline event listeners

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Handle returned when registering a listener, used to remove it
    pub struct ListenerId;
}

/// Events a timeline can emit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimelineEvent {
    /// Every variable has moved past its last keyframe
    Completed,
}

/// A no-argument event callback
pub type Listener = Box<dyn FnMut()>;

/// Listeners for [`TimelineEvent::Completed`], called in registration order
#[derive(Default)]
pub struct Listeners {
    callbacks: SlotMap<ListenerId, Listener>,
    order: SmallVec<[ListenerId; 4]>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut() + 'static,
    {
        let id = self.callbacks.insert(Box::new(listener));
        self.order.push(id);
        id
    }

    /// Remove a listener; unknown or already removed ids are ignored
    pub fn remove(&mut self, id: ListenerId) -> bool {
        if self.callbacks.remove(id).is_none() {
            return false;
        }
        self.order.retain(|entry| *entry != id);
        true
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Invoke every listener once
    pub fn notify(&mut self) {
        for id in &self.order {
            if let Some(callback) = self.callbacks.get_mut(*id) {
                callback();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn notifies_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::new();
        for name in ["a", "b", "c"] {
            let log = log.clone();
            listeners.add(move || log.borrow_mut().push(name));
        }
        listeners.notify();
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn removed_listener_is_not_called() {
        let hits = Rc::new(RefCell::new(0));
        let mut listeners = Listeners::new();
        let counter = hits.clone();
        let id = listeners.add(move || *counter.borrow_mut() += 1);

        assert!(listeners.remove(id));
        assert!(!listeners.remove(id), "second removal is a no-op");
        listeners.notify();
        assert_eq!(*hits.borrow(), 0);
        assert!(listeners.is_empty());
    }

    #[test]
    fn reused_slot_keeps_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::new();
        let first = {
            let log = log.clone();
            listeners.add(move || log.borrow_mut().push(1))
        };
        {
            let log = log.clone();
            listeners.add(move || log.borrow_mut().push(2));
        }
        listeners.remove(first);
        {
            let log = log.clone();
            listeners.add(move || log.borrow_mut().push(3));
        }
        listeners.notify();
        assert_eq!(*log.borrow(), vec![2, 3]);
        assert_eq!(listeners.len(), 2);
    }
}
