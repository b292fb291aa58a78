//! Immutable in-memory budget model with an undoable command layer.
//!
//! A [`ledger::Budget`] owns accounts, category groups, categories with
//! repeating spending rules, and transactions. Every structural mutation
//! returns a new budget; derived balances are memoized per instance. The
//! [`commands`] module applies named mutations through a pure reducer and can
//! synthesize, for any command, the inverse command that restores the prior
//! state exactly.

pub mod commands;
pub mod currency;
pub mod dates;
pub mod errors;
pub mod ledger;
pub mod record;
pub mod storage;
pub mod validation;

pub use commands::{invert, reduce, Command, CommandKind};
pub use currency::Currency;
pub use dates::PDate;
pub use errors::{BudgetError, Result};
pub use ledger::{
    Account, Budget, Category, CategoryGroup, CategoryRule, RulePeriod, SchemaVersion,
    Transaction, TransactionDetail, SCHEMA_VERSION,
};
pub use record::Record;
pub use validation::{Severity, ValidationContext, ValidationIssue, ValidationResult};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init() {
    INIT_TRACING.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("budget_engine=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
        tracing::info!("budget engine tracing initialized");
    });
}
