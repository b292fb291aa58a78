//! Domain entities and the budget aggregate.

pub mod account;
pub mod budget;
pub mod category;
pub mod rule;
pub mod transaction;

pub use account::Account;
pub use budget::{Budget, SchemaVersion, SCHEMA_VERSION};
pub use category::{Category, CategoryGroup};
pub use rule::{CategoryRule, RulePeriod};
pub use transaction::{Transaction, TransactionDetail};
