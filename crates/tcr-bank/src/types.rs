//! Balance types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tcr_types::{Address, Coin};

/// Multi-denomination balance.
///
/// Zero amounts are never stored, so two balances holding the same coins
/// always compare and encode identically.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coins(BTreeMap<String, u64>);

impl Coins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Amount held in `denom`, zero if absent.
    pub fn amount_of(&self, denom: &str) -> u64 {
        self.0.get(denom).copied().unwrap_or(0)
    }

    /// Add `coin`, saturating at `u64::MAX`.
    pub fn add(&mut self, coin: &Coin) {
        if coin.amount == 0 {
            return;
        }
        let entry = self.0.entry(coin.denom.clone()).or_insert(0);
        *entry = entry.saturating_add(coin.amount);
    }

    /// Subtract `coin`. Returns `false` and leaves the balance unchanged if
    /// the held amount is too small.
    pub fn try_sub(&mut self, coin: &Coin) -> bool {
        let held = self.amount_of(&coin.denom);
        if held < coin.amount {
            return false;
        }
        let left = held - coin.amount;
        if left == 0 {
            self.0.remove(&coin.denom);
        } else {
            self.0.insert(coin.denom.clone(), left);
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(denom, amount)` pairs in denomination order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(denom, amount)| (denom.as_str(), *amount))
    }
}

impl FromIterator<Coin> for Coins {
    fn from_iter<I: IntoIterator<Item = Coin>>(iter: I) -> Self {
        let mut coins = Coins::new();
        for coin in iter {
            coins.add(&coin);
        }
        coins
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (denom, amount) in self.iter() {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{amount}{denom}")?;
            first = false;
        }
        Ok(())
    }
}

/// A participant's balance record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: Address,
    pub coins: Coins,
}

impl Account {
    /// An account with no coins.
    pub fn empty(address: Address) -> Self {
        Self {
            address,
            coins: Coins::new(),
        }
    }
}

/// One escrow movement, as observed by the account it touched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceChange {
    pub address: Address,
    pub denom: String,
    pub before: u64,
    pub after: u64,
}

impl BalanceChange {
    /// Signed difference `after - before`.
    pub fn delta(&self) -> i128 {
        i128::from(self.after) - i128::from(self.before)
    }
}

impl fmt::Display for BalanceChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} -> {}",
            self.address.short_id(),
            self.denom,
            self.before,
            self.after
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcr_types::REGISTRY_DENOM;

    #[test]
    fn amount_of_missing_denom_is_zero() {
        assert_eq!(Coins::new().amount_of(REGISTRY_DENOM), 0);
    }

    #[test]
    fn add_and_subtract() {
        let mut coins = Coins::new();
        coins.add(&Coin::registry(100));
        assert!(coins.try_sub(&Coin::registry(40)));
        assert_eq!(coins.amount_of(REGISTRY_DENOM), 60);
    }

    #[test]
    fn overdraw_leaves_balance_unchanged() {
        let mut coins: Coins = [Coin::registry(10)].into_iter().collect();
        assert!(!coins.try_sub(&Coin::registry(11)));
        assert_eq!(coins.amount_of(REGISTRY_DENOM), 10);
    }

    #[test]
    fn zero_balances_are_not_stored() {
        let mut coins: Coins = [Coin::registry(10)].into_iter().collect();
        assert!(coins.try_sub(&Coin::registry(10)));
        assert!(coins.is_empty());
        assert_eq!(coins, Coins::new());

        coins.add(&Coin::registry(0));
        assert!(coins.is_empty());
    }

    #[test]
    fn display_lists_denominations_in_order() {
        let coins: Coins = [Coin::new("steak", 2), Coin::registry(5)].into_iter().collect();
        assert_eq!(coins.to_string(), "5RegistryCoin,2steak");
    }

    #[test]
    fn balance_change_delta() {
        let change = BalanceChange {
            address: Address::derive(&[1; 32]),
            denom: REGISTRY_DENOM.into(),
            before: 100,
            after: 30,
        };
        assert_eq!(change.delta(), -70);
    }

    #[test]
    fn account_serde_json() {
        let mut account = Account::empty(Address::derive(&[3; 32]));
        account.coins.add(&Coin::registry(7));
        let json = serde_json::to_string(&account).unwrap();
        let back: Account = serde_json::from_str(&json).unwrap();
        assert_eq!(account, back);
    }
}
