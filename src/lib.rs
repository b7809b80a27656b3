#![doc(test(attr(deny(warnings))))]

//! Wallet Core offers an in-memory multi-currency ledger with durable
//! key-value persistence and synchronous balance-change notifications.

pub mod cli;
pub mod config;
pub mod currency;
pub mod errors;
pub mod ledger;
pub mod notify;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Wallet Core tracing initialized.");
    });
}
