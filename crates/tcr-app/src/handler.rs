//! Transaction handlers, one per message kind.
//!
//! Each handler is a deterministic function of the store it is handed and
//! an authenticated message. Handlers write only through that store; the
//! caller decides whether the writes are kept.

use tcr_bank::{BalanceChange, BondEscrow};
use tcr_ledger::{RegistryError, RegistryLedger};
use tcr_store::KvStore;
use tcr_types::{ChallengeMsg, CommitMsg, ProposeMsg, RegistryMsg, RevealMsg};

use crate::error::TxError;

/// Everything a handler may touch.
pub struct HandlerContext<'a> {
    pub store: &'a mut dyn KvStore,
    pub ledger: &'a RegistryLedger,
    pub escrow: &'a dyn BondEscrow,
    /// Height of the block being delivered.
    pub height: u64,
}

/// Route `msg` to its handler. Returns the escrow movements it made.
pub fn dispatch(
    ctx: &mut HandlerContext<'_>,
    msg: &RegistryMsg,
) -> Result<Vec<BalanceChange>, TxError> {
    match msg {
        RegistryMsg::Propose(m) => handle_propose(ctx, m),
        RegistryMsg::Challenge(m) => handle_challenge(ctx, m),
        RegistryMsg::Commit(m) => handle_commit(ctx, m),
        RegistryMsg::Reveal(m) => handle_reveal(ctx, m),
    }
}

fn handle_propose(
    ctx: &mut HandlerContext<'_>,
    msg: &ProposeMsg,
) -> Result<Vec<BalanceChange>, TxError> {
    let debit = ctx.escrow.subtract_coins(ctx.store, &msg.owner, &msg.bond)?;
    ctx.ledger.add_listing(
        ctx.store,
        &msg.identifier,
        msg.owner,
        msg.bond.amount,
        ctx.height,
    )?;
    Ok(vec![debit])
}

fn handle_challenge(
    ctx: &mut HandlerContext<'_>,
    msg: &ChallengeMsg,
) -> Result<Vec<BalanceChange>, TxError> {
    let debit = ctx
        .escrow
        .subtract_coins(ctx.store, &msg.challenger, &msg.bond)?;
    let listing = ctx
        .ledger
        .get_listing(&*ctx.store, &msg.identifier)?
        .ok_or_else(|| RegistryError::NotFound {
            identifier: msg.identifier.clone(),
        })?;
    ctx.ledger.challenge_listing(
        ctx.store,
        listing.owner,
        msg.challenger,
        &msg.identifier,
        msg.bond.amount,
        ctx.height,
    )?;
    Ok(vec![debit])
}

fn handle_commit(
    ctx: &mut HandlerContext<'_>,
    msg: &CommitMsg,
) -> Result<Vec<BalanceChange>, TxError> {
    ctx.ledger
        .commit_listing(ctx.store, msg.owner, &msg.identifier, msg.commitment)?;
    Ok(Vec::new())
}

fn handle_reveal(
    ctx: &mut HandlerContext<'_>,
    msg: &RevealMsg,
) -> Result<Vec<BalanceChange>, TxError> {
    let debit = ctx.escrow.subtract_coins(ctx.store, &msg.owner, &msg.bond)?;
    ctx.ledger.reveal_listing(
        ctx.store,
        msg.owner,
        &msg.identifier,
        msg.choice,
        &msg.nonce,
        msg.bond.amount,
    )?;
    Ok(vec![debit])
}
