//! FundLedger - single-fund income and expense ledger
//!
//! This library provides the core of the FundLedger application: a ledger
//! that posts income and expenses atomically against one fund whose balance
//! may never go negative, reports over the posted transactions, and
//! role-based access for the people who use it.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (transactions, categories, users, the fund)
//! - `storage`: JSON file storage layer
//! - `auth`: Password hashing, sessions and role checks
//! - `services`: Business logic layer (ledger engine, queries, users)
//! - `reports`: Category breakdowns and the financial summary
//! - `export`: CSV and PDF output
//! - `audit`: Audit logging system
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use fundledger::config::{paths::LedgerPaths, settings::Settings};
//! use fundledger::services::LedgerService;
//! use fundledger::storage::Storage;
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::with_lock_timeout(paths, settings.lock_timeout())?;
//! storage.load_all()?;
//!
//! let balance = LedgerService::new(&storage).current_balance()?;
//! ```

pub mod audit;
pub mod auth;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
