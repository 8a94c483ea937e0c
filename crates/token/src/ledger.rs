//! The token ledger: create, issue, transfer, provision.
//!
//! Every operation runs as one transaction:
//!
//! ```text
//! call
//!   ↓
//! 1. Authorize + validate (rejections abort before anything is staged)
//!   ↓
//! 2. Stage reads/writes on a Transaction over the committed store
//!   ↓
//! 3. Commit the change set (all or nothing)
//!   ↓
//! 4. Publish notifications (fire-and-forget)
//! ```
//!
//! Mutating operations take `&mut self`: one writer at a time.

use rankblock_auth::{AccountDirectory, Authorizer, SignerSet};
use rankblock_core::{AccountName, Amount, Symbol, SymbolCode, TransactionId};
use rankblock_events::{Event, EventBus};

use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::event::{
    AccountProvisioned, LedgerEvent, Notification, SupplyIssued, TokenCreated, Transferred,
};
use crate::registry::SupplyStats;
use crate::store::LedgerStore;
use crate::transaction::Transaction;

/// Outcome of a committed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub transaction_id: TransactionId,
    pub events: Vec<LedgerEvent>,
}

/// Fungible-token ledger over a store `S`, an account directory `D` and a
/// notification bus `B`.
#[derive(Debug)]
pub struct TokenLedger<S, D, B> {
    config: LedgerConfig,
    store: S,
    directory: D,
    bus: B,
}

impl<S, D, B> TokenLedger<S, D, B> {
    pub fn new(config: LedgerConfig, store: S, directory: D, bus: B) -> Self {
        Self {
            config,
            store,
            directory,
            bus,
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Committed state.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn into_parts(self) -> (S, D, B) {
        (self.store, self.directory, self.bus)
    }
}

impl<S, D, B> TokenLedger<S, D, B>
where
    S: LedgerStore,
    D: AccountDirectory,
    B: EventBus<Notification>,
{
    /// Register a new token symbol with its issuer and supply cap.
    ///
    /// Only the contract account may create tokens.
    pub fn create_token(
        &mut self,
        auth: &dyn Authorizer,
        issuer: AccountName,
        maximum_supply: Amount,
    ) -> LedgerResult<Receipt> {
        self.execute("create", |rules, tx| {
            rules.create_token(tx, auth, &issuer, &maximum_supply)
        })
    }

    /// Mint `quantity` to the issuer and forward it to `to`.
    ///
    /// Only the symbol's issuer may issue.
    pub fn issue(
        &mut self,
        auth: &dyn Authorizer,
        to: AccountName,
        quantity: Amount,
        memo: &str,
    ) -> LedgerResult<Receipt> {
        self.execute("issue", |rules, tx| rules.issue(tx, auth, &to, &quantity, memo))
    }

    /// Move `quantity` from `from` to `to`. Requires `from`'s authority.
    pub fn transfer(
        &mut self,
        auth: &dyn Authorizer,
        from: AccountName,
        to: AccountName,
        quantity: Amount,
        memo: &str,
    ) -> LedgerResult<Receipt> {
        self.execute("transfer", |rules, tx| {
            rules.transfer(tx, auth, &from, &to, &quantity, memo)
        })
    }

    /// Pre-register `receiver` under the airdrop symbol with an empty balance.
    ///
    /// Anyone may call this. A second call for the same receiver fails with
    /// [`LedgerError::AlreadyRegistered`].
    pub fn provision_account(&mut self, receiver: AccountName) -> LedgerResult<Receipt> {
        self.execute("regairdrop", |rules, tx| rules.provision_account(tx, &receiver))
    }

    /// Committed stats of a symbol.
    pub fn supply(&self, code: &SymbolCode) -> LedgerResult<Option<SupplyStats>> {
        Ok(self.store.load_stats(code)?)
    }

    /// Committed balance of `owner` in `symbol`; zero when no record exists.
    pub fn balance(&self, owner: &AccountName, symbol: &Symbol) -> LedgerResult<Amount> {
        let row = self
            .store
            .load_balance(&(owner.clone(), symbol.code().clone()))?;
        Ok(row
            .map(|row| row.balance().clone())
            .unwrap_or_else(|| Amount::zero(symbol.clone())))
    }

    /// Whether a balance record exists for `owner` under `code`.
    pub fn has_balance_record(&self, owner: &AccountName, code: &SymbolCode) -> LedgerResult<bool> {
        Ok(self
            .store
            .load_balance(&(owner.clone(), code.clone()))?
            .is_some())
    }

    fn execute<F>(&mut self, operation: &'static str, apply: F) -> LedgerResult<Receipt>
    where
        F: FnOnce(&Rules<'_, D>, &mut Transaction<'_, S>) -> LedgerResult<()>,
    {
        let rules = Rules {
            config: &self.config,
            directory: &self.directory,
        };

        let mut tx = Transaction::begin(&self.store);
        if let Err(err) = apply(&rules, &mut tx) {
            tracing::warn!(
                operation,
                transaction_id = %tx.id(),
                error = %err,
                "ledger operation rejected"
            );
            return Err(err);
        }
        let (transaction_id, changes, events) = tx.into_parts();
        tracing::debug!(
            operation,
            %transaction_id,
            writes = changes.stats().count() + changes.balances().count(),
            "committing change set"
        );

        if let Err(err) = self.store.commit(changes) {
            tracing::warn!(operation, %transaction_id, error = %err, "ledger commit failed");
            return Err(err.into());
        }

        self.notify(transaction_id, &events);
        tracing::info!(
            operation,
            %transaction_id,
            events = events.len(),
            "ledger operation committed"
        );

        Ok(Receipt {
            transaction_id,
            events,
        })
    }

    /// Publish one envelope per (event, recipient). Delivery failures are
    /// logged; the operation has already committed.
    fn notify(&self, transaction_id: TransactionId, events: &[LedgerEvent]) {
        let mut sequence_number = 0;
        for event in events {
            let event_type = event.event_type();
            for recipient in event.recipients() {
                sequence_number += 1;
                tracing::debug!(
                    %transaction_id,
                    sequence_number,
                    event_type,
                    version = event.version(),
                    %recipient,
                    "publishing notification"
                );
                let envelope =
                    Notification::new(transaction_id, recipient, sequence_number, event.clone());
                if let Err(err) = self.bus.publish(envelope) {
                    tracing::warn!(
                        %transaction_id,
                        sequence_number,
                        event_type,
                        error = ?err,
                        "notification delivery failed"
                    );
                }
            }
        }
    }
}

/// Validation and state transitions, independent of how the ledger commits.
struct Rules<'a, D> {
    config: &'a LedgerConfig,
    directory: &'a D,
}

impl<D> Rules<'_, D>
where
    D: AccountDirectory,
{
    fn create_token<S>(
        &self,
        tx: &mut Transaction<'_, S>,
        auth: &dyn Authorizer,
        issuer: &AccountName,
        maximum_supply: &Amount,
    ) -> LedgerResult<()>
    where
        S: LedgerStore + ?Sized,
    {
        auth.require_auth(&self.config.contract)?;

        let symbol = maximum_supply.symbol();
        if !symbol.is_valid() {
            return Err(LedgerError::InvalidSymbol(symbol.to_string()));
        }
        if !maximum_supply.is_valid() {
            return Err(LedgerError::InvalidAmount(maximum_supply.to_string()));
        }
        if !maximum_supply.is_positive() {
            return Err(LedgerError::NonPositiveMax(maximum_supply.to_string()));
        }

        tx.registry().insert(issuer.clone(), maximum_supply.clone())?;
        let occurred_at = tx.started_at();
        tx.record(LedgerEvent::TokenCreated(TokenCreated {
            issuer: issuer.clone(),
            maximum_supply: maximum_supply.clone(),
            occurred_at,
        }));
        Ok(())
    }

    fn issue<S>(
        &self,
        tx: &mut Transaction<'_, S>,
        auth: &dyn Authorizer,
        to: &AccountName,
        quantity: &Amount,
        memo: &str,
    ) -> LedgerResult<()>
    where
        S: LedgerStore + ?Sized,
    {
        let symbol = quantity.symbol();
        if !symbol.is_valid() {
            return Err(LedgerError::InvalidSymbol(symbol.to_string()));
        }
        self.check_memo(memo)?;

        let stats = tx
            .registry()
            .find(symbol.code())?
            .ok_or_else(|| LedgerError::UnknownToken(symbol.code().clone()))?;
        let issuer = stats.issuer().clone();

        auth.require_auth(&issuer)?;
        self.check_quantity(quantity, &stats)?;

        let available = stats.available();
        if quantity.value() > available.value() {
            return Err(LedgerError::SupplyExceeded {
                available: available.to_string(),
                requested: quantity.to_string(),
            });
        }

        tx.registry().increase_supply(symbol.code(), quantity)?;
        tx.balances().credit(&issuer, quantity, &issuer)?;
        let occurred_at = tx.started_at();
        tx.record(LedgerEvent::SupplyIssued(SupplyIssued {
            issuer: issuer.clone(),
            to: to.clone(),
            quantity: quantity.clone(),
            memo: memo.to_string(),
            occurred_at,
        }));

        if to != &issuer {
            // Forwarded under the issuer's own authority, inside this transaction.
            let inline = SignerSet::single(issuer.clone());
            self.transfer(tx, &inline, &issuer, to, quantity, memo)?;
        }
        Ok(())
    }

    fn transfer<S>(
        &self,
        tx: &mut Transaction<'_, S>,
        auth: &dyn Authorizer,
        from: &AccountName,
        to: &AccountName,
        quantity: &Amount,
        memo: &str,
    ) -> LedgerResult<()>
    where
        S: LedgerStore + ?Sized,
    {
        if from == to {
            return Err(LedgerError::SelfTransfer);
        }
        auth.require_auth(from)?;
        if !self.directory.is_account(to) {
            return Err(LedgerError::UnknownAccount(to.clone()));
        }

        let code = quantity.symbol().code();
        let stats = tx
            .registry()
            .find(code)?
            .ok_or_else(|| LedgerError::UnknownToken(code.clone()))?;

        self.check_quantity(quantity, &stats)?;
        self.check_memo(memo)?;

        tx.balances().debit(from, quantity)?;
        tx.balances().credit(to, quantity, from)?;
        let occurred_at = tx.started_at();
        tx.record(LedgerEvent::Transferred(Transferred {
            from: from.clone(),
            to: to.clone(),
            quantity: quantity.clone(),
            memo: memo.to_string(),
            occurred_at,
        }));
        Ok(())
    }

    fn provision_account<S>(
        &self,
        tx: &mut Transaction<'_, S>,
        receiver: &AccountName,
    ) -> LedgerResult<()>
    where
        S: LedgerStore + ?Sized,
    {
        let row = tx.balances().provision(receiver, &self.config.airdrop_symbol)?;
        let occurred_at = tx.started_at();
        tx.record(LedgerEvent::AccountProvisioned(AccountProvisioned {
            receiver: receiver.clone(),
            balance: row.balance().clone(),
            occurred_at,
        }));
        Ok(())
    }

    /// Valid, strictly positive, and of exactly the registered symbol.
    fn check_quantity(&self, quantity: &Amount, stats: &SupplyStats) -> LedgerResult<()> {
        if !quantity.is_valid() {
            return Err(LedgerError::InvalidAmount(quantity.to_string()));
        }
        if !quantity.is_positive() {
            return Err(LedgerError::NonPositiveAmount(quantity.to_string()));
        }
        if quantity.symbol() != stats.symbol() {
            return Err(LedgerError::SymbolMismatch {
                expected: stats.symbol().to_string(),
                actual: quantity.symbol().to_string(),
            });
        }
        Ok(())
    }

    fn check_memo(&self, memo: &str) -> LedgerResult<()> {
        let max = self.config.memo_limit();
        if memo.len() > max {
            return Err(LedgerError::MemoTooLong {
                len: memo.len(),
                max,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rankblock_auth::InMemoryAccountDirectory;
    use rankblock_events::{InMemoryBusError, InMemoryEventBus, Subscription};

    use super::*;
    use crate::store::{BalanceKey, ChangeSet, InMemoryLedgerStore, StoreError};

    type TestLedger = TokenLedger<
        InMemoryLedgerStore,
        InMemoryAccountDirectory,
        Arc<InMemoryEventBus<Notification>>,
    >;

    fn name(s: &str) -> AccountName {
        AccountName::new(s).unwrap()
    }

    fn rb(value: i64) -> Amount {
        Amount::new(value, Symbol::new(4, "RB"))
    }

    fn signed(account: &str) -> SignerSet {
        SignerSet::single(name(account))
    }

    fn ledger() -> TestLedger {
        let directory = InMemoryAccountDirectory::with_accounts(
            ["rankblock", "alice", "bob", "carol"].map(name),
        );
        TokenLedger::new(
            LedgerConfig::new(name("rankblock")),
            InMemoryLedgerStore::new(),
            directory,
            Arc::new(InMemoryEventBus::new()),
        )
    }

    /// Ledger with RB (cap 1,000,000.0000) issued by alice.
    fn ledger_with_token() -> TestLedger {
        let mut ledger = ledger();
        ledger
            .create_token(&signed("rankblock"), name("alice"), rb(10_000_000_000))
            .unwrap();
        ledger
    }

    fn code() -> SymbolCode {
        SymbolCode::new("RB")
    }

    #[test]
    fn create_requires_the_contract_authority() {
        let mut ledger = ledger();
        let err = ledger
            .create_token(&signed("alice"), name("alice"), rb(100))
            .unwrap_err();
        assert_eq!(err, LedgerError::Unauthorized(name("rankblock")));
        assert_eq!(ledger.supply(&code()).unwrap(), None);
    }

    #[test]
    fn create_validates_the_maximum_supply() {
        let mut ledger = ledger();
        let auth = signed("rankblock");

        let err = ledger
            .create_token(&auth, name("alice"), Amount::new(100, Symbol::new(4, "rb")))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidSymbol(_)));

        let err = ledger
            .create_token(&auth, name("alice"), rb(rankblock_core::MAX_AMOUNT + 1))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));

        let err = ledger.create_token(&auth, name("alice"), rb(0)).unwrap_err();
        assert!(matches!(err, LedgerError::NonPositiveMax(_)));

        let err = ledger.create_token(&auth, name("alice"), rb(-5)).unwrap_err();
        assert!(matches!(err, LedgerError::NonPositiveMax(_)));
    }

    #[test]
    fn create_records_issuer_and_cap() {
        let ledger = ledger_with_token();
        let stats = ledger.supply(&code()).unwrap().unwrap();
        assert_eq!(stats.issuer(), &name("alice"));
        assert_eq!(stats.max_supply(), &rb(10_000_000_000));
        assert!(stats.supply().is_zero());
    }

    #[test]
    fn issue_requires_the_issuer_authority() {
        let mut ledger = ledger_with_token();
        let err = ledger
            .issue(&signed("bob"), name("bob"), rb(10), "")
            .unwrap_err();
        assert_eq!(err, LedgerError::Unauthorized(name("alice")));
    }

    #[test]
    fn issue_of_unknown_symbol_is_rejected() {
        let mut ledger = ledger_with_token();
        let err = ledger
            .issue(&signed("alice"), name("alice"), Amount::new(1, Symbol::new(4, "XYZ")), "")
            .unwrap_err();
        assert_eq!(err, LedgerError::UnknownToken(SymbolCode::new("XYZ")));
    }

    #[test]
    fn issue_checks_quantity_shape() {
        let mut ledger = ledger_with_token();
        let auth = signed("alice");

        let err = ledger.issue(&auth, name("alice"), rb(0), "").unwrap_err();
        assert!(matches!(err, LedgerError::NonPositiveAmount(_)));

        let err = ledger.issue(&auth, name("alice"), rb(-1), "").unwrap_err();
        assert!(matches!(err, LedgerError::NonPositiveAmount(_)));

        let err = ledger
            .issue(&auth, name("alice"), Amount::new(1, Symbol::new(2, "RB")), "")
            .unwrap_err();
        assert!(matches!(err, LedgerError::SymbolMismatch { .. }));

        let err = ledger
            .issue(&auth, name("alice"), rb(1), &"x".repeat(257))
            .unwrap_err();
        assert_eq!(err, LedgerError::MemoTooLong { len: 257, max: 256 });
    }

    #[test]
    fn memo_of_exactly_the_limit_is_accepted() {
        let mut ledger = ledger_with_token();
        ledger
            .issue(&signed("alice"), name("alice"), rb(1), &"x".repeat(256))
            .unwrap();
    }

    #[test]
    fn issue_to_another_account_lands_on_the_issuer_first() {
        let mut ledger = ledger_with_token();
        let receipt = ledger
            .issue(&signed("alice"), name("bob"), rb(5_000), "welcome")
            .unwrap();

        assert_eq!(receipt.events.len(), 2);
        assert!(matches!(receipt.events[0], LedgerEvent::SupplyIssued(_)));
        assert!(matches!(receipt.events[1], LedgerEvent::Transferred(_)));

        assert_eq!(ledger.balance(&name("bob"), &Symbol::new(4, "RB")).unwrap(), rb(5_000));
        // The issuer's transient credit was fully forwarded, so its record is gone.
        assert!(!ledger.has_balance_record(&name("alice"), &code()).unwrap());

        let bob_row = ledger
            .store()
            .load_balance(&(name("bob"), code()))
            .unwrap()
            .unwrap();
        assert_eq!(bob_row.payer(), &name("alice"));
    }

    #[test]
    fn failed_forward_rolls_back_the_whole_issue() {
        let mut ledger = ledger_with_token();
        ledger.issue(&signed("alice"), name("alice"), rb(100), "").unwrap();

        // "dave" is not a known account, so the forwarding transfer fails.
        let err = ledger
            .issue(&signed("alice"), name("dave"), rb(50), "")
            .unwrap_err();
        assert_eq!(err, LedgerError::UnknownAccount(name("dave")));

        let stats = ledger.supply(&code()).unwrap().unwrap();
        assert_eq!(stats.supply(), &rb(100));
        assert_eq!(ledger.balance(&name("alice"), &Symbol::new(4, "RB")).unwrap(), rb(100));
    }

    #[test]
    fn transfer_requires_the_sender_authority() {
        let mut ledger = ledger_with_token();
        ledger.issue(&signed("alice"), name("alice"), rb(100), "").unwrap();

        let err = ledger
            .transfer(&signed("bob"), name("alice"), name("bob"), rb(10), "")
            .unwrap_err();
        assert_eq!(err, LedgerError::Unauthorized(name("alice")));
    }

    #[test]
    fn transfer_to_unknown_account_is_rejected() {
        let mut ledger = ledger_with_token();
        ledger.issue(&signed("alice"), name("alice"), rb(100), "").unwrap();

        let err = ledger
            .transfer(&signed("alice"), name("alice"), name("zed"), rb(10), "")
            .unwrap_err();
        assert_eq!(err, LedgerError::UnknownAccount(name("zed")));
    }

    #[test]
    fn transfer_from_empty_account_is_no_balance() {
        let mut ledger = ledger_with_token();
        let err = ledger
            .transfer(&signed("bob"), name("bob"), name("carol"), rb(10), "")
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::NoBalance {
                owner: name("bob"),
                symbol: code()
            }
        );
    }

    /// Alice holds 100 of the token.
    fn funded_ledger() -> TestLedger {
        let mut ledger = ledger_with_token();
        ledger.issue(&signed("alice"), name("alice"), rb(100), "").unwrap();
        ledger
    }

    /// (alice, bob, supply) as committed.
    fn snapshot(ledger: &TestLedger) -> (Amount, Amount, Amount) {
        let symbol = Symbol::new(4, "RB");
        (
            ledger.balance(&name("alice"), &symbol).unwrap(),
            ledger.balance(&name("bob"), &symbol).unwrap(),
            ledger.supply(&code()).unwrap().unwrap().supply().clone(),
        )
    }

    #[test]
    fn issue_rejects_malformed_symbols_and_amounts() {
        let mut ledger = funded_ledger();
        let before = snapshot(&ledger);
        let auth = signed("alice");

        let err = ledger
            .issue(&auth, name("alice"), Amount::new(1, Symbol::new(4, "rb")), "")
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidSymbol(_)));

        let err = ledger
            .issue(&auth, name("alice"), Amount::new(1, Symbol::new(19, "RB")), "")
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidSymbol(_)));

        let err = ledger
            .issue(&auth, name("alice"), rb(rankblock_core::MAX_AMOUNT + 1), "")
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));

        assert_eq!(snapshot(&ledger), before);
    }

    #[test]
    fn transfer_of_unknown_token_is_rejected() {
        let mut ledger = funded_ledger();
        let before = snapshot(&ledger);

        let err = ledger
            .transfer(
                &signed("alice"),
                name("alice"),
                name("bob"),
                Amount::new(1, Symbol::new(4, "XYZ")),
                "",
            )
            .unwrap_err();
        assert_eq!(err, LedgerError::UnknownToken(SymbolCode::new("XYZ")));
        assert_eq!(snapshot(&ledger), before);
    }

    #[test]
    fn transfer_checks_quantity_shape() {
        let mut ledger = funded_ledger();
        let before = snapshot(&ledger);
        let auth = signed("alice");
        let mut send = |quantity: Amount, memo: &str| {
            ledger
                .transfer(&auth, name("alice"), name("bob"), quantity, memo)
                .unwrap_err()
        };

        assert!(matches!(
            send(rb(rankblock_core::MAX_AMOUNT + 1), ""),
            LedgerError::InvalidAmount(_)
        ));
        assert!(matches!(send(rb(0), ""), LedgerError::NonPositiveAmount(_)));
        assert!(matches!(send(rb(-10), ""), LedgerError::NonPositiveAmount(_)));
        assert!(matches!(
            send(Amount::new(10, Symbol::new(2, "RB")), ""),
            LedgerError::SymbolMismatch { .. }
        ));
        assert_eq!(
            send(rb(10), &"x".repeat(257)),
            LedgerError::MemoTooLong { len: 257, max: 256 }
        );

        assert_eq!(snapshot(&ledger), before);
    }

    #[test]
    fn transfer_checks_the_memo_after_the_quantity() {
        let mut ledger = funded_ledger();
        let before = snapshot(&ledger);

        let err = ledger
            .transfer(
                &signed("alice"),
                name("alice"),
                name("bob"),
                Amount::new(10, Symbol::new(2, "RB")),
                &"x".repeat(257),
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::SymbolMismatch { .. }));
        assert_eq!(snapshot(&ledger), before);
    }

    #[test]
    fn memo_limit_is_capped_even_when_configured_higher() {
        let mut config = LedgerConfig::new(name("rankblock"));
        config.max_memo_bytes = 4096;
        let mut ledger = TokenLedger::new(
            config,
            InMemoryLedgerStore::new(),
            InMemoryAccountDirectory::with_accounts([name("bob")]),
            InMemoryEventBus::<Notification>::new(),
        );
        ledger
            .create_token(&signed("rankblock"), name("alice"), rb(1_000))
            .unwrap();

        let err = ledger
            .issue(&signed("alice"), name("bob"), rb(10), &"x".repeat(1000))
            .unwrap_err();
        assert_eq!(err, LedgerError::MemoTooLong { len: 1000, max: 256 });
        assert!(ledger.supply(&code()).unwrap().unwrap().supply().is_zero());
    }

    #[test]
    fn memo_limit_can_be_lowered() {
        let mut config = LedgerConfig::new(name("rankblock"));
        config.max_memo_bytes = 8;
        let mut ledger = TokenLedger::new(
            config,
            InMemoryLedgerStore::new(),
            InMemoryAccountDirectory::new(),
            InMemoryEventBus::<Notification>::new(),
        );
        ledger
            .create_token(&signed("rankblock"), name("alice"), rb(1_000))
            .unwrap();

        ledger.issue(&signed("alice"), name("alice"), rb(1), "12345678").unwrap();
        let err = ledger
            .issue(&signed("alice"), name("alice"), rb(1), "123456789")
            .unwrap_err();
        assert_eq!(err, LedgerError::MemoTooLong { len: 9, max: 8 });
    }

    #[test]
    fn transfer_notifies_both_parties_after_commit() {
        let mut ledger = ledger_with_token();
        let subscription: Subscription<Notification> = ledger.bus().subscribe();

        ledger.issue(&signed("alice"), name("alice"), rb(100), "").unwrap();
        let receipt = ledger
            .transfer(&signed("alice"), name("alice"), name("bob"), rb(40), "lunch")
            .unwrap();

        let delivered = subscription.drain();
        // issue: alice; transfer: alice + bob
        assert_eq!(delivered.len(), 3);

        let transfer_notes: Vec<_> = delivered
            .iter()
            .filter(|n| n.transaction_id() == receipt.transaction_id)
            .collect();
        let recipients: Vec<_> = transfer_notes.iter().map(|n| n.recipient().clone()).collect();
        assert_eq!(recipients, vec![name("alice"), name("bob")]);
        assert_eq!(
            transfer_notes.iter().map(|n| n.sequence_number()).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert!(transfer_notes.iter().all(|n| n.event_type() == "token.transferred"));
    }

    #[test]
    fn rejected_operations_notify_nobody() {
        let mut ledger = ledger_with_token();
        let subscription = ledger.bus().subscribe();

        let _ = ledger.transfer(&signed("alice"), name("alice"), name("alice"), rb(1), "");
        let _ = ledger.issue(&signed("bob"), name("bob"), rb(1), "");

        assert!(subscription.drain().is_empty());
    }

    #[test]
    fn provisioning_creates_an_empty_record_charged_to_the_receiver() {
        let mut ledger = ledger();
        let receipt = ledger.provision_account(name("carol")).unwrap();
        assert!(matches!(receipt.events[0], LedgerEvent::AccountProvisioned(_)));

        let row = ledger
            .store()
            .load_balance(&(name("carol"), code()))
            .unwrap()
            .unwrap();
        assert!(row.balance().is_zero());
        assert_eq!(row.payer(), &name("carol"));
    }

    #[test]
    fn provisioned_account_can_receive_and_spend() {
        let mut ledger = ledger_with_token();
        ledger.provision_account(name("carol")).unwrap();
        ledger.issue(&signed("alice"), name("carol"), rb(30), "").unwrap();

        let row = ledger
            .store()
            .load_balance(&(name("carol"), code()))
            .unwrap()
            .unwrap();
        assert_eq!(row.balance(), &rb(30));
        assert_eq!(row.payer(), &name("carol"));

        ledger
            .transfer(&signed("carol"), name("carol"), name("bob"), rb(30), "")
            .unwrap();
        assert!(!ledger.has_balance_record(&name("carol"), &code()).unwrap());
    }

    /// Store whose commits always fail.
    #[derive(Debug, Default)]
    struct ReadOnlyStore(InMemoryLedgerStore);

    impl LedgerStore for ReadOnlyStore {
        fn load_stats(&self, code: &SymbolCode) -> Result<Option<SupplyStats>, StoreError> {
            self.0.load_stats(code)
        }

        fn load_balance(
            &self,
            key: &BalanceKey,
        ) -> Result<Option<crate::AccountBalance>, StoreError> {
            self.0.load_balance(key)
        }

        fn commit(&mut self, _changes: ChangeSet) -> Result<(), StoreError> {
            Err(StoreError::CommitRejected("read-only".to_string()))
        }
    }

    #[test]
    fn commit_failures_surface_as_storage_errors() {
        let mut ledger = TokenLedger::new(
            LedgerConfig::new(name("rankblock")),
            ReadOnlyStore::default(),
            InMemoryAccountDirectory::new(),
            InMemoryEventBus::<Notification>::new(),
        );
        let err = ledger.provision_account(name("carol")).unwrap_err();
        assert_eq!(
            err,
            LedgerError::Storage(StoreError::CommitRejected("read-only".to_string()))
        );
    }

    /// Bus that refuses every message.
    #[derive(Debug)]
    struct ClosedBus;

    impl EventBus<Notification> for ClosedBus {
        type Error = InMemoryBusError;

        fn publish(&self, _message: Notification) -> Result<(), Self::Error> {
            Err(InMemoryBusError::Poisoned)
        }

        fn subscribe(&self) -> Subscription<Notification> {
            let (_tx, rx) = std::sync::mpsc::channel();
            Subscription::new(rx)
        }
    }

    #[test]
    fn delivery_failures_do_not_fail_the_operation() {
        let mut ledger = TokenLedger::new(
            LedgerConfig::new(name("rankblock")),
            InMemoryLedgerStore::new(),
            InMemoryAccountDirectory::with_accounts([name("bob")]),
            ClosedBus,
        );
        ledger
            .create_token(&signed("rankblock"), name("alice"), rb(1_000))
            .unwrap();
        ledger.issue(&signed("alice"), name("bob"), rb(10), "").unwrap();
        assert_eq!(ledger.balance(&name("bob"), &Symbol::new(4, "RB")).unwrap(), rb(10));
    }
}
