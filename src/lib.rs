//! pocket-ledger - personal finance tracking core
//!
//! Accounts, categories, transactions, budgets and savings goals stored as
//! JSON files, with category and cash-flow reports and AI-assisted receipt
//! scanning.
//!
//! # Architecture
//!
//! - `config`: path resolution and user settings
//! - `error`: error types
//! - `models`: domain types (money, ids, transactions, categories, ...)
//! - `validation`: field rules for user input
//! - `storage`: JSON file repositories
//! - `services`: business rules on top of storage
//! - `scan`: receipt scan pipeline
//! - `reports`: category breakdowns and cash flow
//! - `display`: terminal formatting
//! - `cli`: command handlers for the `pocket` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use pocket_ledger::config::{PocketPaths, Settings};
//! use pocket_ledger::storage::Storage;
//!
//! let paths = PocketPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(paths)?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod reports;
pub mod scan;
pub mod services;
pub mod storage;
pub mod validation;

pub use error::{PocketError, PocketResult};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Environment variable holding the log filter, e.g. `POCKET_LOG=debug`
pub const LOG_ENV: &str = "POCKET_LOG";

/// Install the stderr log subscriber; later calls do nothing
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

        // try_init: a host application may already own the global subscriber
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
