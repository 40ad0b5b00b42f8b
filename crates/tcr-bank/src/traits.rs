//! The [`BondEscrow`] trait.

use tcr_store::KvStore;
use tcr_types::{Address, Coin};
use tracing::debug;

use crate::error::{BankError, BankResult};
use crate::types::{Account, BalanceChange};

/// Debits and credits participant balances held in a [`KvStore`].
///
/// The escrow carries no state of its own; every call receives the store it
/// operates on, so debits made through a transaction cache are discarded
/// with it.
pub trait BondEscrow: Send + Sync {
    /// Read the account at `address`. Unknown addresses hold no coins.
    fn get_account(&self, store: &dyn KvStore, address: &Address) -> BankResult<Account>;

    /// Persist `account`, replacing any previous record.
    fn set_account(&self, store: &mut dyn KvStore, account: &Account) -> BankResult<()>;

    /// Amount of `denom` held at `address`.
    fn balance(&self, store: &dyn KvStore, address: &Address, denom: &str) -> BankResult<u64> {
        Ok(self.get_account(store, address)?.coins.amount_of(denom))
    }

    /// Debit `coin` from `address`.
    ///
    /// Fails with [`BankError::InsufficientFunds`] without writing anything
    /// if the account holds less than `coin.amount`.
    fn subtract_coins(
        &self,
        store: &mut dyn KvStore,
        address: &Address,
        coin: &Coin,
    ) -> BankResult<BalanceChange> {
        let mut account = self.get_account(&*store, address)?;
        let before = account.coins.amount_of(&coin.denom);
        if !account.coins.try_sub(coin) {
            return Err(BankError::InsufficientFunds {
                address: *address,
                denom: coin.denom.clone(),
                needed: coin.amount,
                available: before,
            });
        }
        self.set_account(store, &account)?;
        let after = account.coins.amount_of(&coin.denom);
        debug!(address = %address.short_id(), %coin, before, after, "debited");
        Ok(BalanceChange {
            address: *address,
            denom: coin.denom.clone(),
            before,
            after,
        })
    }

    /// Credit `coin` to `address`.
    fn add_coins(
        &self,
        store: &mut dyn KvStore,
        address: &Address,
        coin: &Coin,
    ) -> BankResult<BalanceChange> {
        let mut account = self.get_account(&*store, address)?;
        let before = account.coins.amount_of(&coin.denom);
        account.coins.add(coin);
        self.set_account(store, &account)?;
        let after = account.coins.amount_of(&coin.denom);
        debug!(address = %address.short_id(), %coin, before, after, "credited");
        Ok(BalanceChange {
            address: *address,
            denom: coin.denom.clone(),
            before,
            after,
        })
    }
}
