//! Audit trail for FundLedger
//!
//! Every committed posting, rejected posting, registration, role change and
//! balance rebuild is appended to a JSONL log next to the ledger.
//!
//! - `AuditEntry`: one line of the log, carrying the actor and an optional
//!   JSON snapshot of the entity.
//! - `AuditLogger`: appends entries and reads them back.
//!
//! ```rust,ignore
//! use fundledger::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! let entry = AuditEntry::create(EntityType::Income, txn.id.to_string(), Some(txn.name.clone()), &txn)
//!     .by(session.username());
//! logger.log(&entry)?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
