//! Wallet domain: the balance-mutation engine and its grant policy.

pub mod grant;
pub mod wallet;

pub use grant::GrantPolicy;
pub use wallet::{Wallet, INITIAL_REWARD_KEY};
