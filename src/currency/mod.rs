use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of currencies tracked by the wallet.
///
/// New kinds are added here at build time; every variant gets a balance
/// entry the moment a wallet is opened.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum CurrencyId {
    Coins,
    Gems,
    Energy,
}

impl CurrencyId {
    /// Every declared currency, in canonical order.
    pub const ALL: [CurrencyId; 3] = [CurrencyId::Coins, CurrencyId::Gems, CurrencyId::Energy];

    /// Canonical storage key for this currency.
    pub fn as_key(&self) -> &'static str {
        match self {
            CurrencyId::Coins => "coins",
            CurrencyId::Gems => "gems",
            CurrencyId::Energy => "energy",
        }
    }

    /// Parses a storage key or user-typed name back into an identifier.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "coins" => Some(CurrencyId::Coins),
            "gems" => Some(CurrencyId::Gems),
            "energy" => Some(CurrencyId::Energy),
            _ => None,
        }
    }
}

impl fmt::Display for CurrencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CurrencyId::Coins => "Coins",
            CurrencyId::Gems => "Gems",
            CurrencyId::Energy => "Energy",
        };
        write!(f, "{}", name)
    }
}
