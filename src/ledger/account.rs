use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::currency::is_known_currency;
use crate::errors::{BudgetError, Result};
use crate::record::Record;
use crate::validation::ValidationContext;

/// A financial account (checking, savings, cash, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Account {
    pub id: Option<i64>,
    pub name: String,
    /// Balance before any transaction applies, in minor units.
    pub initial_balance: i64,
    pub currency_code: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl Default for Account {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            initial_balance: 0,
            currency_code: "USD".into(),
            metadata: Map::new(),
        }
    }
}

impl Account {
    pub fn new(name: impl Into<String>, currency_code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            currency_code: currency_code.into(),
            ..Self::default()
        }
    }
}

impl Record for Account {
    fn check_invariants(&self) -> Result<()> {
        if let Some(id) = self.id {
            if id <= 0 {
                return Err(BudgetError::InvariantViolation(format!(
                    "account id must be positive, got {id}"
                )));
            }
        }
        Ok(())
    }

    fn validate(&self, ctx: &mut ValidationContext<'_>) {
        if !is_known_currency(&self.currency_code) {
            ctx.add_warning(
                Some("currency"),
                format!(
                    "currency `{}` is not in the currency table",
                    self.currency_code
                ),
            );
        }
    }
}
