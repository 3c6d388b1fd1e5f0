//! Reset-notification registry.
//!
//! Listeners are called synchronously in registration order. The registry is
//! a cheap clonable handle, so a callback may hold a clone and subscribe or
//! unsubscribe (itself or others) while a broadcast is running:
//!
//! - a listener removed mid-broadcast that has not run yet is skipped;
//! - a listener added mid-broadcast first runs on the next broadcast;
//! - a nested broadcast from inside a callback skips listeners that are
//!   currently executing.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Handle returned by [`ResetObservers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Callback = Box<dyn FnMut()>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    order: Vec<ListenerId>,
    /// `None` while the callback is executing.
    callbacks: HashMap<ListenerId, Option<Callback>>,
}

#[derive(Clone, Default)]
pub struct ResetObservers {
    inner: Rc<RefCell<Registry>>,
}

impl std::fmt::Debug for ResetObservers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResetObservers")
            .field("listeners", &self.len())
            .finish()
    }
}

impl ResetObservers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, callback: impl FnMut() + 'static) -> ListenerId {
        let mut reg = self.inner.borrow_mut();
        let id = ListenerId(reg.next_id);
        reg.next_id += 1;
        reg.order.push(id);
        reg.callbacks.insert(id, Some(Box::new(callback)));
        id
    }

    /// Returns false if `id` was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut reg = self.inner.borrow_mut();
        reg.order.retain(|&l| l != id);
        reg.callbacks.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invoke every listener registered when the broadcast starts.
    /// Returns how many callbacks ran.
    pub fn broadcast(&self) -> usize {
        let snapshot = self.inner.borrow().order.clone();
        let mut delivered = 0;

        for id in snapshot {
            // No borrow is held while the callback runs
            let taken = self
                .inner
                .borrow_mut()
                .callbacks
                .get_mut(&id)
                .and_then(Option::take);
            let Some(mut callback) = taken else {
                continue;
            };

            callback();
            delivered += 1;

            if let Some(slot) = self.inner.borrow_mut().callbacks.get_mut(&id) {
                *slot = Some(callback);
            }
        }

        delivered
    }
}
