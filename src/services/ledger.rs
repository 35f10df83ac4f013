//! Ledger engine
//!
//! Posts income and expenses against the single fund, keeps the cached
//! balance equal to the replayed journals, and never lets it go negative.

use chrono::NaiveDate;

use crate::audit::{AuditEntry, EntityType};
use crate::auth::{require, Operation, Session};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Category, Department, Money, Transaction, TransactionId, TransactionKind, TransactionStatus,
};
use crate::storage::{LedgerState, Storage};

use super::user::UserService;

/// Input for a posting
#[derive(Debug, Clone)]
pub struct PostingInput {
    /// Counterparty name
    pub name: String,
    pub category: Category,
    pub description: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub department: Department,
    /// Defaults to Pending
    pub status: Option<TransactionStatus>,
    pub receipt_path: Option<String>,
}

/// Result of replaying the journals against the cached balance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityReport {
    /// Balance stored on the fund
    pub cached: Money,
    /// Σ income − Σ expenses
    pub replayed: Money,
    pub income_total: Money,
    pub expense_total: Money,
    pub income_count: usize,
    pub expense_count: usize,
    /// First entry, in posting order, after which the running balance is negative
    pub overdrawn_at: Option<TransactionId>,
}

impl IntegrityReport {
    /// Replay `state` in posting order
    pub fn replay(state: &LedgerState) -> LedgerResult<Self> {
        let overflow = || LedgerError::Storage("Ledger totals overflow".into());

        let mut income_total = Money::zero();
        let mut expense_total = Money::zero();
        let mut running = Money::zero();
        let mut overdrawn_at = None;

        for txn in state.entries_by_posting_order() {
            match txn.kind {
                TransactionKind::Income => {
                    income_total = income_total.checked_add(txn.amount).ok_or_else(overflow)?;
                }
                TransactionKind::Expense => {
                    expense_total = expense_total.checked_add(txn.amount).ok_or_else(overflow)?;
                }
            }
            running = running
                .checked_add(txn.signed_amount())
                .ok_or_else(overflow)?;
            if running.is_negative() && overdrawn_at.is_none() {
                overdrawn_at = Some(txn.id);
            }
        }

        Ok(Self {
            cached: state.balance(),
            replayed: running,
            income_total,
            expense_total,
            income_count: state.income.len(),
            expense_count: state.expenses.len(),
            overdrawn_at,
        })
    }

    /// Cached balance matches the replay and the replay never dipped below zero
    pub fn is_consistent(&self) -> bool {
        self.cached == self.replayed && self.overdrawn_at.is_none()
    }
}

/// Service for posting to and checking the ledger
pub struct LedgerService<'a> {
    storage: &'a Storage,
}

impl<'a> LedgerService<'a> {
    /// Create a new ledger service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Post income; the fund balance grows by `amount`
    pub fn post_income(&self, session: &Session, input: PostingInput) -> LedgerResult<TransactionId> {
        self.post(session, TransactionKind::Income, input)
    }

    /// Post an expense; rejected with `InsufficientFunds` if it would overdraw
    pub fn post_expense(
        &self,
        session: &Session,
        input: PostingInput,
    ) -> LedgerResult<TransactionId> {
        self.post(session, TransactionKind::Expense, input)
    }

    fn post(
        &self,
        session: &Session,
        kind: TransactionKind,
        input: PostingInput,
    ) -> LedgerResult<TransactionId> {
        let entity = entity_for(kind);
        let name = input.name.trim().to_string();

        let result = self.build(session, kind, input).and_then(|txn| {
            self.storage.ledger.append(txn)
        });

        match result {
            Ok(txn) => {
                tracing::info!(
                    id = %txn.id,
                    kind = %txn.kind,
                    amount = %txn.amount,
                    user = %session.username(),
                    "posted"
                );
                self.storage.record(
                    AuditEntry::create(entity, txn.id.as_uuid().to_string(), Some(txn.name.clone()), &txn)
                        .by(session.username()),
                );
                Ok(txn.id)
            }
            Err(e) => {
                tracing::warn!(kind = %kind, user = %session.username(), error = %e, "posting rejected");
                self.storage.record(
                    AuditEntry::reject(entity, Some(name), e.to_string()).by(session.username()),
                );
                Err(e)
            }
        }
    }

    /// Authorize against the stored role and validate the entry's shape
    fn build(
        &self,
        session: &Session,
        kind: TransactionKind,
        input: PostingInput,
    ) -> LedgerResult<Transaction> {
        let user = UserService::new(self.storage).current_user(session)?;
        require(user.role, Operation::PostTransaction)?;

        let mut txn = Transaction::new(
            user.id,
            input.name.trim(),
            input.category,
            input.description.trim(),
            input.amount,
            input.date,
            input.department,
            input.status.unwrap_or_default(),
        );
        // Kind comes from the operation, so a mismatched category fails validation
        txn.kind = kind;
        txn.receipt_path = input
            .receipt_path
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        txn.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        Ok(txn)
    }

    /// The cached fund balance
    pub fn current_balance(&self) -> LedgerResult<Money> {
        self.storage.ledger.balance()
    }

    /// Whether the cached balance matches a full replay of the journals
    pub fn verify_integrity(&self) -> LedgerResult<bool> {
        Ok(self.integrity_report()?.is_consistent())
    }

    /// Replay the journals and report totals against the cached balance
    pub fn integrity_report(&self) -> LedgerResult<IntegrityReport> {
        let state = self.storage.ledger.snapshot()?;
        let report = IntegrityReport::replay(&state)?;

        if !report.is_consistent() {
            tracing::warn!(
                cached = %report.cached,
                replayed = %report.replayed,
                "ledger integrity check failed"
            );
        }

        Ok(report)
    }

    /// Overwrite the cached balance with the replayed one.
    ///
    /// Leaves the ledger alone when it is already consistent. Returns the
    /// report as it stands after the rebuild.
    pub fn rebuild_balance(&self, session: &Session) -> LedgerResult<IntegrityReport> {
        let user = UserService::new(self.storage).current_user(session)?;
        require(user.role, Operation::PostTransaction)?;

        let before = self.integrity_report()?;
        if before.cached == before.replayed {
            return Ok(before);
        }

        let (previous, replayed) = self
            .storage
            .ledger
            .reset_balance(|state| Ok(IntegrityReport::replay(state)?.replayed))?;

        tracing::info!(from = %previous, to = %replayed, user = %user.username, "balance rebuilt");
        self.storage.record(
            AuditEntry::update(
                EntityType::Fund,
                crate::models::FUND_ID.to_string(),
                None,
                &serde_json::json!({ "balance": previous }),
                &serde_json::json!({ "balance": replayed }),
                Some(format!("balance: {} -> {}", previous, replayed)),
            )
            .by(user.username),
        );

        self.integrity_report()
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> LedgerResult<Option<Transaction>> {
        self.storage.ledger.get(id)
    }
}

fn entity_for(kind: TransactionKind) -> EntityType {
    match kind {
        TransactionKind::Income => EntityType::Income,
        TransactionKind::Expense => EntityType::Expense,
    }
}
