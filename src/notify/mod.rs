use std::collections::BTreeMap;

use crate::currency::CurrencyId;

/// Opaque handle identifying one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Subscription(u64);

type Listener = Box<dyn FnMut(CurrencyId, i64)>;

/// Synchronous in-process broadcast of (currency, new balance) events.
///
/// Delivery happens on the caller's stack, in subscription order. There is
/// no queuing and no replay: a listener registered after a mutation never
/// sees that event.
#[derive(Default)]
pub struct ChangeNotifier {
    listeners: BTreeMap<u64, Listener>,
    next_id: u64,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(CurrencyId, i64) + 'static) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.insert(id, Box::new(listener));
        Subscription(id)
    }

    /// Removes a listener. Unknown handles are ignored.
    pub fn unsubscribe(&mut self, subscription: Subscription) {
        self.listeners.remove(&subscription.0);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub(crate) fn emit(&mut self, currency: CurrencyId, balance: i64) {
        for listener in self.listeners.values_mut() {
            listener(currency, balance);
        }
    }
}
