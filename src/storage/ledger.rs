//! Ledger repository for JSON storage
//!
//! The fund row and both journals live in one document (ledger.json) so a
//! posting is a single atomic rename: either the entry and the new balance
//! are both on disk, or neither is.
//!
//! Writers hold an in-process lock and an advisory lock on ledger.json.lock,
//! and re-read the document under both, so separate processes sharing a data
//! directory never check a balance that another writer has already moved.

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard, TryLockError};
use std::thread;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Fund, Money, Transaction, TransactionId, TransactionKind};

use super::file_io::{read_json, write_json_atomic};

/// Poll interval while waiting for the ledger lock
const LOCK_RETRY_INTERVAL: Duration = Duration::from_millis(5);

/// On-disk ledger document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerState {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// The fund and its cached balance
    #[serde(default)]
    pub fund: Fund,

    /// Sequence number of the most recent posting
    #[serde(default)]
    pub last_sequence: u64,

    /// Income journal, in posting order
    #[serde(default)]
    pub income: Vec<Transaction>,

    /// Expense journal, in posting order
    #[serde(default)]
    pub expenses: Vec<Transaction>,
}

fn default_schema_version() -> u32 {
    1
}

impl Default for LedgerState {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            fund: Fund::default(),
            last_sequence: 0,
            income: Vec::new(),
            expenses: Vec::new(),
        }
    }
}

impl LedgerState {
    /// The cached balance
    pub fn balance(&self) -> Money {
        self.fund.balance
    }

    /// Every entry, income journal first
    pub fn entries(&self) -> impl Iterator<Item = &Transaction> {
        self.income.iter().chain(self.expenses.iter())
    }

    /// Every entry in the order it was committed
    pub fn entries_by_posting_order(&self) -> Vec<&Transaction> {
        let mut entries: Vec<_> = self.entries().collect();
        // Entries written before sequencing carry 0 and fall back to timestamps
        entries.sort_by_key(|t| (t.sequence, t.created_at));
        entries
    }

    /// Look up an entry in either journal
    pub fn find(&self, id: TransactionId) -> Option<&Transaction> {
        self.entries().find(|t| t.id == id)
    }

    fn journal_mut(&mut self, kind: TransactionKind) -> &mut Vec<Transaction> {
        match kind {
            TransactionKind::Income => &mut self.income,
            TransactionKind::Expense => &mut self.expenses,
        }
    }
}

/// Sibling file carrying the cross-process writer lock
pub fn lock_path_for(path: &Path) -> PathBuf {
    path.with_extension("json.lock")
}

/// Repository for the fund and its journals
pub struct LedgerRepository {
    path: PathBuf,
    state: RwLock<LedgerState>,
    lock_timeout: Duration,
}

impl LedgerRepository {
    /// Create a new ledger repository
    pub fn new(path: PathBuf, lock_timeout: Duration) -> Self {
        Self {
            path,
            state: RwLock::new(LedgerState::default()),
            lock_timeout,
        }
    }

    /// Load the ledger from disk
    pub fn load(&self) -> LedgerResult<()> {
        let file_data: LedgerState = read_json(&self.path)?;

        let mut state = self.write_guard()?;
        tracing::debug!(
            income = file_data.income.len(),
            expenses = file_data.expenses.len(),
            balance = %file_data.fund.balance,
            "loaded ledger"
        );
        *state = file_data;
        Ok(())
    }

    /// Save the ledger to disk
    pub fn save(&self) -> LedgerResult<()> {
        let state = self.read_guard()?;
        write_json_atomic(&self.path, &*state)
    }

    /// Current cached balance
    pub fn balance(&self) -> LedgerResult<Money> {
        Ok(self.read_guard()?.balance())
    }

    /// Copy of the fund row
    pub fn fund(&self) -> LedgerResult<Fund> {
        Ok(self.read_guard()?.fund.clone())
    }

    /// Get an entry by ID
    pub fn get(&self, id: TransactionId) -> LedgerResult<Option<Transaction>> {
        Ok(self.read_guard()?.find(id).cloned())
    }

    /// All entries, income journal first
    pub fn get_all(&self) -> LedgerResult<Vec<Transaction>> {
        Ok(self.read_guard()?.entries().cloned().collect())
    }

    /// Consistent copy of the whole ledger
    pub fn snapshot(&self) -> LedgerResult<LedgerState> {
        Ok(self.read_guard()?.clone())
    }

    /// Append an entry and move the balance as one unit.
    ///
    /// The balance is checked against the document as it is on disk once the
    /// writer locks are held. The entry's sequence number and `created_at` are
    /// stamped at the same point, so posting order is commit order.
    pub fn append(&self, mut txn: Transaction) -> LedgerResult<Transaction> {
        self.transact(|state| {
            let available = state.fund.balance;
            let new_balance = match txn.kind {
                TransactionKind::Income => available.checked_add(txn.amount),
                TransactionKind::Expense => {
                    if !state.fund.can_cover(txn.amount) {
                        return Err(LedgerError::InsufficientFunds {
                            attempted: txn.amount,
                            available,
                        });
                    }
                    available.checked_sub(txn.amount)
                }
            }
            .ok_or_else(|| LedgerError::Validation("Amount overflows the fund balance".into()))?;

            let now = Utc::now();
            state.last_sequence += 1;
            txn.sequence = state.last_sequence;
            txn.created_at = now;

            state.journal_mut(txn.kind).push(txn.clone());
            state.fund.balance = new_balance;
            state.fund.updated_at = now;
            Ok(txn)
        })
    }

    /// Overwrite the cached balance with a value computed from the journals.
    ///
    /// `compute` runs under the writer locks on the freshly read document, so
    /// no posting can slip in between the replay and the overwrite. Returns
    /// the previous and new balance.
    pub fn reset_balance<F>(&self, compute: F) -> LedgerResult<(Money, Money)>
    where
        F: FnOnce(&LedgerState) -> LedgerResult<Money>,
    {
        self.transact(|state| {
            let replayed = compute(state)?;
            let previous = state.fund.balance;
            state.fund.balance = replayed;
            state.fund.updated_at = Utc::now();
            Ok((previous, replayed))
        })
    }

    /// Re-read the document, apply `update` and persist the result, all under
    /// the in-process lock and the file lock.
    ///
    /// On any error nothing is written and the in-memory copy is left equal
    /// to what is on disk.
    fn transact<T, F>(&self, update: F) -> LedgerResult<T>
    where
        F: FnOnce(&mut LedgerState) -> LedgerResult<T>,
    {
        let deadline = Instant::now() + self.lock_timeout;
        let mut state = self.write_guard_until(deadline)?;
        let mut file_lock = fd_lock::RwLock::new(self.open_lock_file()?);

        loop {
            match file_lock.try_write() {
                Ok(_held) => return self.commit(&mut state, update),
                Err(e) if e.kind() == ErrorKind::WouldBlock => {}
                Err(e) => {
                    return Err(LedgerError::Storage(format!(
                        "Failed to lock {}: {}",
                        lock_path_for(&self.path).display(),
                        e
                    )))
                }
            }

            if Instant::now() >= deadline {
                return Err(self.timed_out());
            }
            thread::sleep(LOCK_RETRY_INTERVAL);
        }
    }

    fn commit<T, F>(&self, state: &mut LedgerState, update: F) -> LedgerResult<T>
    where
        F: FnOnce(&mut LedgerState) -> LedgerResult<T>,
    {
        let current: LedgerState = read_json(&self.path)?;
        let mut next = current.clone();

        let outcome = update(&mut next).and_then(|value| {
            write_json_atomic(&self.path, &next).map_err(|e| {
                tracing::warn!(error = %e, "ledger write rolled back");
                e
            })?;
            Ok(value)
        });

        *state = if outcome.is_ok() { next } else { current };
        outcome
    }

    fn open_lock_file(&self) -> LedgerResult<File> {
        let path = lock_path_for(&self.path);
        OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| LedgerError::Storage(format!("Failed to open {}: {}", path.display(), e)))
    }

    fn read_guard(&self) -> LedgerResult<RwLockReadGuard<'_, LedgerState>> {
        self.state
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    /// Exclusive access, waiting at most `lock_timeout`
    fn write_guard(&self) -> LedgerResult<RwLockWriteGuard<'_, LedgerState>> {
        self.write_guard_until(Instant::now() + self.lock_timeout)
    }

    fn write_guard_until(
        &self,
        deadline: Instant,
    ) -> LedgerResult<RwLockWriteGuard<'_, LedgerState>> {
        loop {
            match self.state.try_write() {
                Ok(guard) => return Ok(guard),
                Err(TryLockError::Poisoned(e)) => {
                    return Err(LedgerError::Storage(format!(
                        "Failed to acquire write lock: {}",
                        e
                    )))
                }
                Err(TryLockError::WouldBlock) => {
                    if Instant::now() >= deadline {
                        return Err(self.timed_out());
                    }
                    thread::sleep(LOCK_RETRY_INTERVAL);
                }
            }
        }
    }

    fn timed_out(&self) -> LedgerError {
        LedgerError::Storage(format!(
            "Timed out after {}ms waiting for the ledger lock",
            self.lock_timeout.as_millis()
        ))
    }
}
