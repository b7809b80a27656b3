use std::{fs, path::Path};

use tempfile::tempdir;
use wallet_core::{
    currency::CurrencyId,
    ledger::{GrantPolicy, Wallet, INITIAL_REWARD_KEY},
    storage::{JsonPrefStore, PrefStore},
};

fn open_at(dir: &Path) -> Wallet {
    let store = JsonPrefStore::new(Some(dir.to_path_buf())).expect("json store");
    Wallet::open(Box::new(store), &GrantPolicy::default()).expect("wallet")
}

/// Reads the store file independently of the live wallet.
fn snapshot(dir: &Path) -> JsonPrefStore {
    JsonPrefStore::new(Some(dir.to_path_buf())).expect("snapshot store")
}

#[test]
fn every_mutation_reaches_disk_before_returning() {
    let temp = tempdir().unwrap();
    let mut wallet = open_at(temp.path());

    wallet.reward(CurrencyId::Coins, 5).expect("reward");
    assert_eq!(snapshot(temp.path()).get_int("coins"), Some(15));

    wallet
        .charge(CurrencyId::Coins, 3, || {}, || {})
        .expect("charge");
    assert_eq!(snapshot(temp.path()).get_int("coins"), Some(12));

    wallet.set_balance(CurrencyId::Energy, 99).expect("set");
    assert_eq!(snapshot(temp.path()).get_int("energy"), Some(99));
}

#[test]
fn grant_flag_survives_reload() {
    let temp = tempdir().unwrap();
    drop(open_at(temp.path()));

    let store = snapshot(temp.path());
    assert_eq!(store.get_int(INITIAL_REWARD_KEY), Some(1));
    assert!(store.has_key("coins"));
    assert!(store.has_key("gems"));
    assert!(store.has_key("energy"));
}

#[test]
fn reconstructed_wallet_matches_for_all_currencies() {
    let temp = tempdir().unwrap();
    let mut wallet = open_at(temp.path());
    wallet.reward(CurrencyId::Gems, 7).expect("reward");
    wallet
        .charge(CurrencyId::Energy, 2, || {}, || {})
        .expect("charge");

    let expected: Vec<(CurrencyId, i64)> = wallet.balances().collect();
    drop(wallet);

    let reopened = open_at(temp.path());
    let actual: Vec<(CurrencyId, i64)> = reopened.balances().collect();
    assert_eq!(actual, expected);
}

#[test]
fn store_directory_contains_only_the_wallet_file() {
    let temp = tempdir().unwrap();
    let mut wallet = open_at(temp.path());
    wallet.reward(CurrencyId::Coins, 1).expect("reward");

    let names: Vec<String> = fs::read_dir(temp.path())
        .expect("read dir")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["wallet.json".to_string()], "no temp residue");
}
