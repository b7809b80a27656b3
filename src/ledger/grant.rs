use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::currency::CurrencyId;

/// One-time starting allocation handed out to a fresh installation.
///
/// Applied at most once per store; the `initial_reward` flag records that
/// the grant went through and later sessions skip it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantPolicy {
    pub amounts: BTreeMap<CurrencyId, i64>,
}

impl GrantPolicy {
    pub fn new(amounts: BTreeMap<CurrencyId, i64>) -> Self {
        Self { amounts }
    }

    /// Policy with no starting allocation.
    pub fn none() -> Self {
        Self {
            amounts: BTreeMap::new(),
        }
    }

    pub fn amount_for(&self, currency: CurrencyId) -> i64 {
        self.amounts.get(&currency).copied().unwrap_or(0)
    }
}

impl Default for GrantPolicy {
    fn default() -> Self {
        let mut amounts = BTreeMap::new();
        amounts.insert(CurrencyId::Coins, 10);
        amounts.insert(CurrencyId::Gems, 10);
        amounts.insert(CurrencyId::Energy, 5);
        Self { amounts }
    }
}
