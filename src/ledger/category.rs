use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::currency::is_known_currency;
use crate::errors::{BudgetError, Result};
use crate::record::Record;

use super::rule::CategoryRule;

/// A named bucket that groups categories in the user's chosen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryGroup {
    pub id: Option<i64>,
    pub name: String,
}

impl CategoryGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

impl Record for CategoryGroup {
    fn check_invariants(&self) -> Result<()> {
        if let Some(id) = self.id {
            if id <= 0 {
                return Err(BudgetError::InvariantViolation(format!(
                    "category group id must be positive, got {id}"
                )));
            }
        }
        Ok(())
    }
}

/// A spending category.
///
/// `rules: None` marks the category as automatic: its budgeted amount is
/// derived from realized transactions instead of rules. A present-but-empty
/// rule list still defines the budget (as zero).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Category {
    pub id: Option<i64>,
    pub name: String,
    pub notes: String,
    pub currency_code: String,
    pub group_id: Option<i64>,
    pub rules: Option<Vec<CategoryRule>>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl Default for Category {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            notes: String::new(),
            currency_code: "USD".into(),
            group_id: None,
            rules: Some(Vec::new()),
            metadata: Map::new(),
        }
    }
}

impl Category {
    pub fn new(name: impl Into<String>, currency_code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            currency_code: currency_code.into(),
            ..Self::default()
        }
    }

    /// Whether the budgeted amount tracks realized spending.
    pub fn is_automatic(&self) -> bool {
        self.rules.is_none()
    }
}

impl Record for Category {
    fn check_invariants(&self) -> Result<()> {
        if let Some(id) = self.id {
            if id <= 0 {
                return Err(BudgetError::InvariantViolation(format!(
                    "category id must be positive, got {id}"
                )));
            }
        }
        if let Some(group_id) = self.group_id {
            if group_id <= 0 {
                return Err(BudgetError::InvariantViolation(format!(
                    "category group reference must be positive, got {group_id}"
                )));
            }
        }
        if !is_known_currency(&self.currency_code) {
            return Err(BudgetError::UnknownCurrency(self.currency_code.clone()));
        }
        if let Some(rules) = &self.rules {
            for rule in rules {
                rule.check_invariants()?;
            }
        }
        Ok(())
    }
}
