use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dates::PDate;
use crate::errors::{BudgetError, Result};
use crate::record::Record;
use crate::validation::ValidationContext;

/// One leg of a potentially split transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionDetail {
    /// Signed amount in minor units of the account's currency.
    pub amount: i64,
    pub description: String,
    pub category_id: Option<i64>,
}

impl TransactionDetail {
    pub fn new(amount: i64, description: impl Into<String>, category_id: Option<i64>) -> Self {
        Self {
            amount,
            description: description.into(),
            category_id,
        }
    }
}

/// A dated money movement, possibly split across several categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Transaction {
    pub id: Option<i64>,
    pub date: Option<PDate>,
    pub account_id: Option<i64>,
    /// Payee or payer.
    pub who: String,
    pub user_id: Option<i64>,
    pub detail: Vec<TransactionDetail>,
    /// Pending transactions are excluded from account balances.
    pub pending: bool,
    /// Transfers between accounts carry no categories on any detail.
    pub is_transfer: bool,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl Default for Transaction {
    fn default() -> Self {
        Self {
            id: None,
            date: None,
            account_id: None,
            who: String::new(),
            user_id: None,
            detail: vec![TransactionDetail::default()],
            pending: false,
            is_transfer: false,
            metadata: Map::new(),
        }
    }
}

impl Transaction {
    /// Total across all detail legs.
    pub fn amount(&self) -> i64 {
        self.detail.iter().map(|d| d.amount).sum()
    }

    pub fn is_split(&self) -> bool {
        self.detail.len() > 1
    }
}

impl Record for Transaction {
    fn check_invariants(&self) -> Result<()> {
        for (field, value) in [
            ("id", self.id),
            ("account", self.account_id),
            ("user", self.user_id),
        ] {
            if let Some(id) = value {
                if id <= 0 {
                    return Err(BudgetError::InvariantViolation(format!(
                        "transaction {field} id must be positive, got {id}"
                    )));
                }
            }
        }
        if self.detail.is_empty() {
            return Err(BudgetError::InvariantViolation(
                "transaction detail must not be empty".into(),
            ));
        }
        if self.is_transfer && self.detail.iter().any(|d| d.category_id.is_some()) {
            return Err(BudgetError::InvariantViolation(
                "transfer transaction details must not carry categories".into(),
            ));
        }
        Ok(())
    }

    fn validate(&self, ctx: &mut ValidationContext<'_>) {
        let budget = ctx.budget();
        let nonzero = self.amount() != 0;

        if self.account_id.is_none() && !self.pending && nonzero {
            ctx.add_warning(Some("account"), "transaction is not linked to any account");
        }

        let account_currency = self
            .account_id
            .and_then(|id| budget.account(id))
            .map(|account| account.currency_code.clone());

        for detail in &self.detail {
            match detail.category_id {
                None => {
                    if !self.pending && !self.is_transfer && nonzero {
                        ctx.add_warning(Some("category"), "transaction detail has no category");
                    }
                }
                Some(category_id) => {
                    if let Some(category) = budget.category(category_id) {
                        if let Some(currency) = &account_currency {
                            if &category.currency_code != currency {
                                ctx.add_error(
                                    Some("category"),
                                    format!(
                                        "category `{}` uses {} but the account uses {}",
                                        category.name, category.currency_code, currency
                                    ),
                                );
                            }
                        }
                    }
                }
            }
        }
    }
}
