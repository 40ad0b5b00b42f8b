use serde::{Deserialize, Serialize};
use tcr_bank::{BalanceChange, BondEscrow, CoinKeeper};
use tcr_gate::{AnteGate, GateConfig, GateDecision};
use tcr_ledger::{RegistryLedger, RegistryParams, Settlement};
use tcr_store::{CacheKvStore, InMemoryKvStore, KvStore};
use tcr_types::{Address, Ballot, Coin, Listing, StdTx, REGISTRY_DENOM};
use tracing::{debug, info, warn};

use crate::config::{AppConfig, ConfigError};
use crate::error::{BlockError, TxError};
use crate::handler::{dispatch, HandlerContext};

/// Record of an accepted transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// Message kind, e.g. `"propose"`.
    pub kind: String,
    pub signer: Address,
    pub identifier: String,
    pub height: u64,
    /// Escrow movements made by the handler.
    pub balance_changes: Vec<BalanceChange>,
}

/// The registry application: gate, handlers, and block lifecycle over one
/// exclusively owned store.
pub struct RegistryApp<S: KvStore = InMemoryKvStore> {
    store: S,
    gate: AnteGate,
    ledger: RegistryLedger,
    escrow: CoinKeeper,
    params: RegistryParams,
    height: u64,
}

impl RegistryApp<InMemoryKvStore> {
    /// An application over a fresh in-memory store.
    pub fn in_memory(config: AppConfig) -> Result<Self, ConfigError> {
        Self::new(config, InMemoryKvStore::new())
    }
}

impl<S: KvStore> RegistryApp<S> {
    /// Create an application over `store`.
    pub fn new(config: AppConfig, store: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let params = config.params;
        Ok(Self {
            store,
            gate: AnteGate::with_default_stages(GateConfig::with_min_bond(params.min_deposit)),
            ledger: RegistryLedger::new(),
            escrow: CoinKeeper::new(),
            params,
            height: 0,
        })
    }

    // ---- Accessors ----

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn params(&self) -> &RegistryParams {
        &self.params
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    /// Registry-coin balance of `address`.
    pub fn balance(&self, address: &Address) -> Result<u64, TxError> {
        Ok(self.escrow.balance(&self.store, address, REGISTRY_DENOM)?)
    }

    pub fn get_listing(&self, identifier: &str) -> Result<Option<Listing>, TxError> {
        Ok(self.ledger.get_listing(&self.store, identifier)?)
    }

    pub fn get_ballot(&self, identifier: &str) -> Result<Option<Ballot>, TxError> {
        Ok(self.ledger.get_ballot(&self.store, identifier)?)
    }

    // ---- Lifecycle ----

    /// Credit starting balances.
    pub fn init_accounts<I>(&mut self, accounts: I) -> Result<(), TxError>
    where
        I: IntoIterator<Item = (Address, Coin)>,
    {
        for (address, coin) in accounts {
            self.escrow.add_coins(&mut self.store, &address, &coin)?;
            debug!(address = %address.short_id(), %coin, "account initialized");
        }
        Ok(())
    }

    /// Start a block at `height`.
    ///
    /// Heights must strictly increase. A ballot's round is the height it was
    /// challenged at, so reusing a height could merge two rounds.
    pub fn begin_block(&mut self, height: u64) -> Result<(), BlockError> {
        if height <= self.height {
            return Err(BlockError::StaleHeight {
                current: self.height,
                requested: height,
            });
        }
        self.height = height;
        debug!(height, "begin block");
        Ok(())
    }

    /// Run every check that needs no writes: message validation and the
    /// authentication gate.
    pub fn check_tx(&self, tx: &StdTx) -> Result<(), TxError> {
        tx.msg.validate_basic()?;
        let result = self.gate.evaluate(tx, &self.store, &self.escrow)?;
        match result.decision {
            GateDecision::Accepted => Ok(()),
            GateDecision::Rejected {
                stage,
                code,
                reason,
            } => Err(TxError::Unauthorized {
                stage,
                code,
                reason,
            }),
        }
    }

    /// Check `tx` and apply its message.
    ///
    /// The handler writes into a cache over the block store. The cache is
    /// flushed only if the handler succeeds, so a rejected transaction
    /// leaves no trace, including any escrow debit made before the failure.
    pub fn deliver_tx(&mut self, tx: &StdTx) -> Result<TxReceipt, TxError> {
        let kind = tx.msg.kind();
        let result = self.check_tx(tx).and_then(|()| self.execute(tx));
        match &result {
            Ok(receipt) => info!(
                kind,
                signer = %receipt.signer.short_id(),
                identifier = %receipt.identifier,
                height = self.height,
                "transaction accepted"
            ),
            Err(e) => warn!(
                kind,
                identifier = tx.msg.identifier(),
                codespace = e.codespace(),
                code = e.code(),
                error = %e,
                "transaction rejected"
            ),
        }
        result
    }

    fn execute(&mut self, tx: &StdTx) -> Result<TxReceipt, TxError> {
        let mut cache = CacheKvStore::new(&self.store);
        let mut ctx = HandlerContext {
            store: &mut cache,
            ledger: &self.ledger,
            escrow: &self.escrow,
            height: self.height,
        };
        let balance_changes = dispatch(&mut ctx, &tx.msg)?;
        let changes = cache.into_changeset();
        self.store.apply(changes)?;

        Ok(TxReceipt {
            kind: tx.msg.kind().to_string(),
            signer: tx.msg.signer(),
            identifier: tx.msg.identifier().to_string(),
            height: self.height,
            balance_changes,
        })
    }

    /// Advance every listing to the current height and credit the payouts.
    ///
    /// Either every settlement and payout of the block is applied or none
    /// is.
    pub fn end_block(&mut self) -> Result<Vec<Settlement>, TxError> {
        let mut cache = CacheKvStore::new(&self.store);
        let settlements = self
            .ledger
            .advance_all(&mut cache, self.height, &self.params)?;
        for settlement in &settlements {
            for payout in &settlement.payouts {
                self.escrow.add_coins(
                    &mut cache,
                    &payout.recipient,
                    &Coin::registry(payout.amount),
                )?;
            }
        }
        let changes = cache.into_changeset();
        self.store.apply(changes)?;

        for settlement in &settlements {
            info!(
                identifier = %settlement.identifier,
                height = self.height,
                transition = %settlement.transition,
                paid = settlement.total_paid(),
                "settled"
            );
        }
        Ok(settlements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tcr_crypto::{commit_vote, SigningKey};
    use tcr_ledger::Transition;
    use tcr_store::{Namespace, StoreError, StoreResult};
    use tcr_types::{BallotPhase, ListingStatus, RegistryMsg, Verdict, Vote};

    fn key(seed: u8) -> SigningKey {
        SigningKey::from_bytes([seed; 32])
    }

    /// Small stages and a low minimum so scenarios fit in a few blocks.
    fn config() -> AppConfig {
        AppConfig {
            params: RegistryParams {
                min_deposit: 10,
                apply_stage: 5,
                commit_stage: 2,
                reveal_stage: 2,
                dispensation_pct: 50,
                quorum_pct: 50,
            },
        }
    }

    fn app_with(balances: &[(&SigningKey, u64)]) -> RegistryApp {
        let mut app = RegistryApp::in_memory(config()).unwrap();
        app.init_accounts(
            balances
                .iter()
                .map(|(k, amount)| (k.address(), Coin::registry(*amount))),
        )
        .unwrap();
        app.begin_block(1).unwrap();
        app
    }

    fn send(app: &mut RegistryApp, signer: &SigningKey, msg: RegistryMsg) -> Result<TxReceipt, TxError> {
        let tx = signer.sign_tx(msg).unwrap();
        app.deliver_tx(&tx)
    }

    fn propose(k: &SigningKey, id: &str, amount: u64) -> RegistryMsg {
        RegistryMsg::propose(k.address(), id, Coin::registry(amount))
    }

    fn challenge(k: &SigningKey, id: &str, amount: u64) -> RegistryMsg {
        RegistryMsg::challenge(k.address(), id, Coin::registry(amount))
    }

    fn commit(k: &SigningKey, id: &str, choice: bool, nonce: &[u8], weight: u64) -> RegistryMsg {
        let digest = commit_vote(&Vote::new(choice, nonce, weight)).unwrap();
        RegistryMsg::commit(k.address(), id, digest)
    }

    fn reveal(k: &SigningKey, id: &str, choice: bool, nonce: &[u8], weight: u64) -> RegistryMsg {
        RegistryMsg::reveal(k.address(), id, choice, nonce.to_vec(), Coin::registry(weight))
    }

    fn step(app: &mut RegistryApp, height: u64) -> Vec<Settlement> {
        app.begin_block(height).unwrap();
        app.end_block().unwrap()
    }

    // -----------------------------------------------------------------------
    // Walkthrough: propose, duplicate, challenge, commit, reveal, mismatch
    // -----------------------------------------------------------------------

    #[test]
    fn registry_walkthrough() {
        let owner = key(1);
        let challenger = key(2);
        let mut app = app_with(&[(&owner, 100), (&challenger, 50)]);

        // Propose "foo" with the whole balance.
        let receipt = send(&mut app, &owner, propose(&owner, "foo", 100)).unwrap();
        assert_eq!(receipt.kind, "propose");
        assert_eq!(receipt.balance_changes[0].after, 0);
        assert_eq!(app.balance(&owner.address()).unwrap(), 0);
        let listing = app.get_listing("foo").unwrap().unwrap();
        assert_eq!(listing.status, ListingStatus::Pending);
        assert_eq!(listing.bond, 100);

        // Proposing again is rejected. With an empty balance the minimum-bond
        // check fires before the handler could report the duplicate.
        let err = send(&mut app, &owner, propose(&owner, "foo", 50)).unwrap_err();
        assert_eq!((err.codespace(), err.code()), ("auth", 13));
        assert_eq!(app.balance(&owner.address()).unwrap(), 0);

        // Challenge.
        send(&mut app, &challenger, challenge(&challenger, "foo", 50)).unwrap();
        let listing = app.get_listing("foo").unwrap().unwrap();
        assert_eq!(listing.status, ListingStatus::Challenged);
        let ballot = app.get_ballot("foo").unwrap().unwrap();
        assert_eq!((ballot.approve, ballot.deny), (0, 0));
    }

    #[test]
    fn duplicate_propose_is_already_exists() {
        let owner = key(1);
        let mut app = app_with(&[(&owner, 200)]);
        send(&mut app, &owner, propose(&owner, "foo", 100)).unwrap();

        let err = send(&mut app, &owner, propose(&owner, "foo", 50)).unwrap_err();
        assert_eq!((err.codespace(), err.code()), ("registry", 102));
        // The debit made before the failure was rolled back.
        assert_eq!(app.balance(&owner.address()).unwrap(), 100);
    }

    #[test]
    fn commit_and_reveal_count_weight() {
        let owner = key(1);
        let challenger = key(2);
        let voter = key(3);
        let mut app = app_with(&[(&owner, 100), (&challenger, 50), (&voter, 100)]);
        send(&mut app, &owner, propose(&owner, "foo", 100)).unwrap();
        send(&mut app, &challenger, challenge(&challenger, "foo", 50)).unwrap();

        send(&mut app, &voter, commit(&voter, "foo", true, &[1, 2, 3], 20)).unwrap();
        assert!(step(&mut app, 3)
            .iter()
            .any(|s| s.transition == Transition::RevealOpened));

        let receipt = send(&mut app, &voter, reveal(&voter, "foo", true, &[1, 2, 3], 20)).unwrap();
        assert_eq!(receipt.balance_changes[0].delta(), -20);
        assert_eq!(app.get_ballot("foo").unwrap().unwrap().approve, 20);

        // Wrong nonce: mismatch, weight refunded, tally unchanged.
        let err = send(&mut app, &voter, reveal(&voter, "foo", true, &[9, 9, 9], 20)).unwrap_err();
        assert_eq!(err.code(), 106);
        assert_eq!(app.balance(&voter.address()).unwrap(), 80);
        assert_eq!(app.get_ballot("foo").unwrap().unwrap().approve, 20);
    }

    // -----------------------------------------------------------------------
    // Authentication and validation
    // -----------------------------------------------------------------------

    #[test]
    fn unsigned_tx_rejected_without_mutation() {
        let owner = key(1);
        let mut app = app_with(&[(&owner, 100)]);
        let before = app.store().clone();

        let tx = StdTx::unsigned(propose(&owner, "foo", 100));
        let err = app.deliver_tx(&tx).unwrap_err();
        assert_eq!((err.codespace(), err.code()), ("auth", 4));
        assert_eq!(app.store(), &before);
    }

    #[test]
    fn doubly_signed_tx_rejected_without_mutation() {
        let owner = key(1);
        let mut app = app_with(&[(&owner, 100)]);
        let before = app.store().clone();

        let mut tx = owner.sign_tx(propose(&owner, "foo", 100)).unwrap();
        tx.signatures.push(tx.signatures[0].clone());
        let err = app.deliver_tx(&tx).unwrap_err();
        assert_eq!(err.code(), 4);
        assert_eq!(app.store(), &before);
    }

    #[test]
    fn wrong_denomination_rejected_before_gate() {
        let owner = key(1);
        let mut app = app_with(&[(&owner, 100)]);
        let msg = RegistryMsg::propose(owner.address(), "foo", Coin::new("steak", 100));
        let err = send(&mut app, &owner, msg).unwrap_err();
        assert_eq!((err.codespace(), err.code()), ("registry", 101));
    }

    #[test]
    fn empty_identifier_rejected() {
        let owner = key(1);
        let mut app = app_with(&[(&owner, 100)]);
        let err = send(&mut app, &owner, propose(&owner, "", 100)).unwrap_err();
        assert_eq!(err.code(), 111);
    }

    #[test]
    fn insufficient_funds_rejected() {
        let owner = key(1);
        let mut app = app_with(&[(&owner, 50)]);
        let err = send(&mut app, &owner, propose(&owner, "foo", 60)).unwrap_err();
        assert_eq!((err.codespace(), err.code()), ("bank", 5));
        assert!(app.get_listing("foo").unwrap().is_none());
    }

    #[test]
    fn challenge_of_unknown_listing_refunds() {
        let challenger = key(2);
        let mut app = app_with(&[(&challenger, 50)]);
        let err = send(&mut app, &challenger, challenge(&challenger, "ghost", 50)).unwrap_err();
        assert_eq!(err.code(), 103);
        assert_eq!(app.balance(&challenger.address()).unwrap(), 50);
    }

    #[test]
    fn check_tx_does_not_write() {
        let owner = key(1);
        let app = app_with(&[(&owner, 100)]);
        let before = app.store().clone();
        let tx = owner.sign_tx(propose(&owner, "foo", 100)).unwrap();
        app.check_tx(&tx).unwrap();
        assert_eq!(app.store(), &before);
    }

    // -----------------------------------------------------------------------
    // Block lifecycle
    // -----------------------------------------------------------------------

    #[test]
    fn block_height_must_increase() {
        let owner = key(1);
        let mut app = app_with(&[(&owner, 100)]);
        app.begin_block(4).unwrap();

        assert_eq!(
            app.begin_block(4),
            Err(BlockError::StaleHeight {
                current: 4,
                requested: 4
            })
        );
        assert!(app.begin_block(2).is_err());
        assert_eq!(app.height(), 4);
        app.begin_block(5).unwrap();
    }

    /// In-memory store whose writes to one namespace always fail.
    struct BrokenNamespace {
        inner: InMemoryKvStore,
        broken: Namespace,
    }

    impl KvStore for BrokenNamespace {
        fn get(&self, namespace: Namespace, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
            self.inner.get(namespace, key)
        }

        fn set(&mut self, namespace: Namespace, key: &[u8], value: Vec<u8>) -> StoreResult<()> {
            if namespace == self.broken {
                return Err(StoreError::Backend {
                    namespace,
                    reason: "disk full".into(),
                });
            }
            self.inner.set(namespace, key, value)
        }

        fn delete(&mut self, namespace: Namespace, key: &[u8]) -> StoreResult<bool> {
            self.inner.delete(namespace, key)
        }

        fn scan_prefix(
            &self,
            namespace: Namespace,
            prefix: &[u8],
        ) -> StoreResult<Vec<(Vec<u8>, Vec<u8>)>> {
            self.inner.scan_prefix(namespace, prefix)
        }
    }

    #[test]
    fn backend_write_failure_is_fatal() {
        let owner = key(1);
        let store = BrokenNamespace {
            inner: InMemoryKvStore::new(),
            broken: Namespace::Listings,
        };
        let mut app = RegistryApp::new(config(), store).unwrap();
        app.init_accounts([(owner.address(), Coin::registry(100))])
            .unwrap();
        app.begin_block(1).unwrap();

        let err = app
            .deliver_tx(&owner.sign_tx(propose(&owner, "foo", 100)).unwrap())
            .unwrap_err();
        assert!(matches!(err, TxError::Store(StoreError::Backend { .. })));
        assert!(err.is_fatal());
        assert_eq!((err.codespace(), err.code()), ("store", 1));
    }

    #[test]
    fn backend_failure_while_funding_is_fatal() {
        let store = BrokenNamespace {
            inner: InMemoryKvStore::new(),
            broken: Namespace::Accounts,
        };
        let mut app = RegistryApp::new(config(), store).unwrap();
        let err = app
            .init_accounts([(key(1).address(), Coin::registry(100))])
            .unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(err.codespace(), "store");
    }

    // -----------------------------------------------------------------------
    // Resolution
    // -----------------------------------------------------------------------

    #[test]
    fn unchallenged_listing_is_whitelisted() {
        let owner = key(1);
        let mut app = app_with(&[(&owner, 100)]);
        send(&mut app, &owner, propose(&owner, "foo", 100)).unwrap();

        assert!(step(&mut app, 5).is_empty());
        let settled = step(&mut app, 6);
        assert_eq!(settled.len(), 1);
        assert_eq!(settled[0].transition, Transition::Whitelisted);
        assert!(app.get_listing("foo").unwrap().unwrap().display);
    }

    #[test]
    fn successful_challenge_removes_listing_and_pays_out() {
        let owner = key(1);
        let challenger = key(2);
        let voter = key(3);
        let mut app = app_with(&[(&owner, 100), (&challenger, 50), (&voter, 30)]);
        send(&mut app, &owner, propose(&owner, "foo", 100)).unwrap();
        send(&mut app, &challenger, challenge(&challenger, "foo", 50)).unwrap();
        send(&mut app, &voter, commit(&voter, "foo", false, &[4], 30)).unwrap();
        step(&mut app, 3);
        send(&mut app, &voter, reveal(&voter, "foo", false, &[4], 30)).unwrap();

        let settled = step(&mut app, 5);
        assert_eq!(settled[0].transition, Transition::Resolved(Verdict::Removed));
        assert!(app.get_listing("foo").unwrap().is_none());
        assert_eq!(
            app.get_ballot("foo").unwrap().unwrap().phase,
            BallotPhase::Resolved(Verdict::Removed)
        );

        // Challenger: own 50 back plus half of the listing bond.
        assert_eq!(app.balance(&challenger.address()).unwrap(), 100);
        // Voter: own 30 back plus the other half.
        assert_eq!(app.balance(&voter.address()).unwrap(), 80);
        assert_eq!(app.balance(&owner.address()).unwrap(), 0);
    }

    #[test]
    fn failed_challenge_keeps_listing() {
        let owner = key(1);
        let challenger = key(2);
        let mut app = app_with(&[(&owner, 100), (&challenger, 50)]);
        send(&mut app, &owner, propose(&owner, "foo", 100)).unwrap();
        send(&mut app, &challenger, challenge(&challenger, "foo", 50)).unwrap();

        let settled = step(&mut app, 5);
        assert_eq!(settled[0].transition, Transition::Resolved(Verdict::Kept));
        assert!(app.get_listing("foo").unwrap().unwrap().is_whitelisted());
        assert_eq!(app.balance(&owner.address()).unwrap(), 50);
        assert_eq!(app.balance(&challenger.address()).unwrap(), 0);
    }

    proptest! {
        #[test]
        fn failed_propose_leaves_balance(balance in 10u64..1_000, bond in 1u64..1_000) {
            let owner = key(1);
            let mut app = app_with(&[(&owner, balance)]);
            send(&mut app, &owner, propose(&owner, "taken", balance.min(bond))).unwrap();
            let before = app.balance(&owner.address()).unwrap();

            // Any further propose of the same identifier fails and refunds.
            let result = send(&mut app, &owner, propose(&owner, "taken", 1));
            prop_assert!(result.is_err());
            prop_assert_eq!(app.balance(&owner.address()).unwrap(), before);
        }
    }
}
