//! Store-backed [`BondEscrow`].
//!
//! [`CoinKeeper`] keeps one bincode-encoded [`Account`] per address in the
//! `accounts` namespace, keyed by the raw 20 address bytes. Empty accounts
//! are deleted rather than stored.

use tcr_store::{KvStore, Namespace};
use tcr_types::Address;

use crate::error::{BankError, BankResult};
use crate::traits::BondEscrow;
use crate::types::Account;

/// Stateless escrow over the `accounts` namespace.
#[derive(Clone, Copy, Debug, Default)]
pub struct CoinKeeper;

impl CoinKeeper {
    pub fn new() -> Self {
        Self
    }
}

impl BondEscrow for CoinKeeper {
    fn get_account(&self, store: &dyn KvStore, address: &Address) -> BankResult<Account> {
        match store.get(Namespace::Accounts, address.as_bytes())? {
            None => Ok(Account::empty(*address)),
            Some(bytes) => {
                bincode::deserialize(&bytes).map_err(|e| BankError::Corrupt {
                    address: *address,
                    reason: e.to_string(),
                })
            }
        }
    }

    fn set_account(&self, store: &mut dyn KvStore, account: &Account) -> BankResult<()> {
        let key = account.address.as_bytes();
        if account.coins.is_empty() {
            store.delete(Namespace::Accounts, key)?;
            return Ok(());
        }
        let bytes =
            bincode::serialize(account).map_err(|e| BankError::Serialization(e.to_string()))?;
        store.set(Namespace::Accounts, key, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcr_store::{CacheKvStore, InMemoryKvStore};
    use tcr_types::{Coin, REGISTRY_DENOM};

    fn alice() -> Address {
        Address::derive(&[1u8; 32])
    }

    fn funded(amount: u64) -> InMemoryKvStore {
        let mut store = InMemoryKvStore::new();
        CoinKeeper
            .add_coins(&mut store, &alice(), &Coin::registry(amount))
            .unwrap();
        store
    }

    // ---- Reads ----

    #[test]
    fn unknown_account_is_empty() {
        let store = InMemoryKvStore::new();
        let account = CoinKeeper.get_account(&store, &alice()).unwrap();
        assert!(account.coins.is_empty());
        assert_eq!(account.address, alice());
    }

    #[test]
    fn balance_reads_back_credit() {
        let store = funded(100);
        assert_eq!(
            CoinKeeper.balance(&store, &alice(), REGISTRY_DENOM).unwrap(),
            100
        );
    }

    #[test]
    fn corrupt_record_is_fatal() {
        let mut store = InMemoryKvStore::new();
        store
            .set(Namespace::Accounts, alice().as_bytes(), vec![0xff])
            .unwrap();
        let err = CoinKeeper.get_account(&store, &alice()).unwrap_err();
        assert!(matches!(err, BankError::Corrupt { .. }));
        assert!(err.is_fatal());
    }

    // ---- Debits ----

    #[test]
    fn subtract_reports_balance_change() {
        let mut store = funded(100);
        let change = CoinKeeper
            .subtract_coins(&mut store, &alice(), &Coin::registry(30))
            .unwrap();
        assert_eq!((change.before, change.after), (100, 70));
        assert_eq!(change.delta(), -30);
    }

    #[test]
    fn overdraw_fails_without_writing() {
        let mut store = funded(10);
        let err = CoinKeeper
            .subtract_coins(&mut store, &alice(), &Coin::registry(11))
            .unwrap_err();
        assert!(matches!(
            err,
            BankError::InsufficientFunds {
                needed: 11,
                available: 10,
                ..
            }
        ));
        assert_eq!(err.code(), 5);
        assert!(!err.is_fatal());
        assert_eq!(store, funded(10));
    }

    #[test]
    fn draining_an_account_deletes_it() {
        let mut store = funded(50);
        CoinKeeper
            .subtract_coins(&mut store, &alice(), &Coin::registry(50))
            .unwrap();
        assert_eq!(store.namespace_len(Namespace::Accounts), 0);
    }

    #[test]
    fn debit_through_cache_is_discarded_on_drop() {
        let store = funded(100);
        {
            let mut cache = CacheKvStore::new(&store);
            CoinKeeper
                .subtract_coins(&mut cache, &alice(), &Coin::registry(100))
                .unwrap();
            assert_eq!(
                CoinKeeper.balance(&cache, &alice(), REGISTRY_DENOM).unwrap(),
                0
            );
        }
        assert_eq!(
            CoinKeeper.balance(&store, &alice(), REGISTRY_DENOM).unwrap(),
            100
        );
    }

    #[test]
    fn denominations_are_independent() {
        let mut store = funded(10);
        let err = CoinKeeper
            .subtract_coins(&mut store, &alice(), &Coin::new("steak", 1))
            .unwrap_err();
        assert!(matches!(err, BankError::InsufficientFunds { available: 0, .. }));
    }
}
