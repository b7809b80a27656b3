use std::collections::BTreeMap;

use crate::currency::CurrencyId;
use crate::errors::{Result, WalletError};
use crate::notify::{ChangeNotifier, Subscription};
use crate::storage::PrefStore;

use super::grant::GrantPolicy;

/// Reserved storage key recording whether the one-time grant was issued.
pub const INITIAL_REWARD_KEY: &str = "initial_reward";

/// In-memory ledger of per-currency balances.
///
/// Every mutating operation runs the same fixed sequence: validate, mutate
/// the in-memory balance, emit one change event, then persist the full
/// balance set and flush. The persisted state therefore never lags the
/// in-memory state by more than the in-flight call.
///
/// There is no global instance; the host constructs one wallet and passes
/// it to whoever needs it.
pub struct Wallet {
    balances: BTreeMap<CurrencyId, i64>,
    store: Box<dyn PrefStore>,
    notifier: ChangeNotifier,
}

impl Wallet {
    /// Opens a wallet against `store`, running the full startup sequence:
    /// zero-initialize every currency, load persisted balances, apply the
    /// one-time initial grant, then broadcast the resulting state.
    pub fn open(store: Box<dyn PrefStore>, policy: &GrantPolicy) -> Result<Self> {
        Self::open_with(store, policy, ChangeNotifier::new())
    }

    /// Like [`Wallet::open`], but with a pre-wired notifier so listeners
    /// subscribed before construction observe the startup broadcast.
    pub fn open_with(
        store: Box<dyn PrefStore>,
        policy: &GrantPolicy,
        notifier: ChangeNotifier,
    ) -> Result<Self> {
        let mut wallet = Self {
            balances: BTreeMap::new(),
            store,
            notifier,
        };
        wallet.initialize();
        wallet.load();
        wallet.apply_initial_grant(policy)?;
        wallet.notify_all();
        Ok(wallet)
    }

    /// Inserts a zero balance for every declared currency not yet present.
    /// Idempotent; never touches an existing entry.
    fn initialize(&mut self) {
        for currency in CurrencyId::ALL {
            self.balances.entry(currency).or_insert(0);
        }
    }

    /// Overwrites in-memory balances with whatever the store holds; keys
    /// absent from the store stay at zero.
    fn load(&mut self) {
        for currency in CurrencyId::ALL {
            let stored = self.store.get_int(currency.as_key()).unwrap_or(0);
            self.balances.insert(currency, stored);
        }
    }

    fn apply_initial_grant(&mut self, policy: &GrantPolicy) -> Result<()> {
        if self.store.get_int(INITIAL_REWARD_KEY).unwrap_or(0) != 0 {
            return Ok(());
        }
        for (&currency, &amount) in &policy.amounts {
            self.set_balance(currency, amount)?;
        }
        self.store.set_int(INITIAL_REWARD_KEY, 1);
        self.store.flush()?;
        tracing::info!("initial grant applied");
        Ok(())
    }

    /// Current balance for `currency`. Defensively zero for an entry that
    /// is somehow missing; cannot happen after construction.
    pub fn balance(&self, currency: CurrencyId) -> i64 {
        match self.balances.get(&currency) {
            Some(&value) => value,
            None => {
                tracing::warn!(%currency, "balance queried before initialization");
                0
            }
        }
    }

    /// Iterates over all (currency, balance) pairs in canonical order.
    pub fn balances(&self) -> impl Iterator<Item = (CurrencyId, i64)> + '_ {
        self.balances.iter().map(|(&currency, &value)| (currency, value))
    }

    /// Conditionally debits `amount` from `currency`.
    ///
    /// On sufficient balance, `on_success` fires before the deduction is
    /// applied or announced; callers must not expect the new balance inside
    /// the callback. On insufficient balance, `on_insufficient` fires and
    /// nothing changes. Negative amounts are rejected outright.
    pub fn charge(
        &mut self,
        currency: CurrencyId,
        amount: i64,
        on_success: impl FnOnce(),
        on_insufficient: impl FnOnce(),
    ) -> Result<bool> {
        if amount < 0 {
            return Err(WalletError::InvalidAmount(amount));
        }
        if self.balance(currency) < amount {
            tracing::debug!(%currency, amount, "charge rejected, insufficient balance");
            on_insufficient();
            return Ok(false);
        }
        on_success();
        self.apply_delta(currency, -amount)?;
        Ok(true)
    }

    /// Charge variant carrying a caller-supplied label (an item name, say)
    /// into the success callback, for purchase tracking.
    pub fn charge_labeled(
        &mut self,
        currency: CurrencyId,
        amount: i64,
        label: &str,
        on_success: impl FnOnce(&str),
        on_insufficient: impl FnOnce(),
    ) -> Result<bool> {
        if amount < 0 {
            return Err(WalletError::InvalidAmount(amount));
        }
        if self.balance(currency) < amount {
            tracing::debug!(%currency, amount, label, "charge rejected, insufficient balance");
            on_insufficient();
            return Ok(false);
        }
        on_success(label);
        self.apply_delta(currency, -amount)?;
        Ok(true)
    }

    /// Unconditionally credits `amount`. Zero is a valid no-op credit;
    /// negative amounts are rejected.
    pub fn reward(&mut self, currency: CurrencyId, amount: i64) -> Result<()> {
        if amount < 0 {
            return Err(WalletError::InvalidAmount(amount));
        }
        self.apply_delta(currency, amount)
    }

    /// Reward variant whose callback fires before the credit is applied.
    pub fn reward_with(
        &mut self,
        currency: CurrencyId,
        amount: i64,
        on_increase: impl FnOnce(),
    ) -> Result<()> {
        if amount < 0 {
            return Err(WalletError::InvalidAmount(amount));
        }
        on_increase();
        self.apply_delta(currency, amount)
    }

    /// Unconditionally overwrites the balance. Administrative path used by
    /// the initial grant, debugging, and restores.
    pub fn set_balance(&mut self, currency: CurrencyId, amount: i64) -> Result<()> {
        self.balances.insert(currency, amount);
        self.commit(currency)
    }

    /// Broadcasts the full balance set, one event per currency. Called once
    /// at startup; every later mutation emits a single-currency event.
    pub fn notify_all(&mut self) {
        for (&currency, &value) in &self.balances {
            self.notifier.emit(currency, value);
        }
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(CurrencyId, i64) + 'static,
    ) -> Subscription {
        self.notifier.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) {
        self.notifier.unsubscribe(subscription);
    }

    /// Read access to the injected store, for diagnostics and tests.
    pub fn store(&self) -> &dyn PrefStore {
        self.store.as_ref()
    }

    /// Tears the wallet down and hands the store back, so a later session
    /// can reopen against the same persisted state.
    pub fn into_store(self) -> Box<dyn PrefStore> {
        self.store
    }

    fn apply_delta(&mut self, currency: CurrencyId, delta: i64) -> Result<()> {
        let entry = self.balances.entry(currency).or_insert(0);
        *entry += delta;
        self.commit(currency)
    }

    /// Notify-then-persist tail shared by every mutation.
    fn commit(&mut self, currency: CurrencyId) -> Result<()> {
        let value = self.balance(currency);
        tracing::debug!(%currency, value, "balance changed");
        self.notifier.emit(currency, value);
        self.persist_all()
    }

    fn persist_all(&mut self) -> Result<()> {
        for (&currency, &value) in &self.balances {
            self.store.set_int(currency.as_key(), value);
        }
        self.store.flush()
    }
}
