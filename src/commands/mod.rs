//! Named mutations over a budget.
//!
//! Commands are plain tagged records sharing the `BUDGET/` type prefix. The
//! [`reducer`] applies them; the [`inverter`] synthesizes, for any command,
//! the command that undoes it.
//!
//! `data` payloads are partial maps: a present key replaces the whole field
//! value (overwriting metadata drops its prior keys), an absent key leaves
//! the field alone. Fields that are themselves nullable use a second
//! `Option` layer so "set to null" and "leave alone" stay distinct.

pub mod inverter;
pub mod reducer;

pub use inverter::invert;
pub use reducer::reduce;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::dates::PDate;
use crate::errors::Result;
use crate::ledger::{Account, Category, CategoryGroup, CategoryRule, Transaction, TransactionDetail};

/// Every engine command type starts with this prefix.
pub const COMMAND_PREFIX: &str = "BUDGET/";

/// A command, optionally scoped to one budget id. A set `budget_id` that does
/// not match the target budget makes the command a no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    #[serde(
        default,
        rename = "budgetId",
        skip_serializing_if = "Option::is_none"
    )]
    pub budget_id: Option<i64>,
    #[serde(flatten)]
    pub kind: CommandKind,
}

impl Command {
    pub fn new(kind: CommandKind) -> Self {
        Self {
            budget_id: None,
            kind,
        }
    }

    pub fn for_budget(budget_id: Option<i64>, kind: CommandKind) -> Self {
        Self { budget_id, kind }
    }

    /// Parses a JSON command. `None` means the value does not carry the
    /// engine prefix and must be passed through unchanged by the caller.
    pub fn parse(value: Value) -> Option<Result<Command>> {
        let tag = value.get("type")?.as_str()?;
        if !tag.starts_with(COMMAND_PREFIX) {
            return None;
        }
        Some(serde_json::from_value(value).map_err(Into::into))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CommandKind {
    #[serde(rename = "BUDGET/NOOP")]
    Noop,
    #[serde(rename = "BUDGET/SET_NAME")]
    SetName { name: String },
    #[serde(rename = "BUDGET/SET_CURRENCY", rename_all = "camelCase")]
    SetCurrency { currency_code: String },
    #[serde(rename = "BUDGET/SET_DATE", rename_all = "camelCase")]
    SetDate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start_date: Option<PDate>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end_date: Option<PDate>,
    },
    #[serde(rename = "BUDGET/UPDATE_ACCOUNT", rename_all = "camelCase")]
    UpdateAccount {
        id: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<AccountPatch>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
        /// On insertion only: transactions whose `account_id` is currently
        /// null become linked to the new account.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        link_null_transactions: Option<Vec<i64>>,
    },
    #[serde(rename = "BUDGET/DELETE_ACCOUNT")]
    DeleteAccount { id: i64 },
    #[serde(rename = "BUDGET/UPDATE_CATEGORY", rename_all = "camelCase")]
    UpdateCategory {
        id: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<CategoryPatch>,
        /// Position within the category's own group.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
        /// On insertion only: `(transaction id, detail index)` rows whose
        /// `category_id` is currently null become linked to the new category.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        link_transaction_details: Option<Vec<(i64, usize)>>,
    },
    #[serde(rename = "BUDGET/DELETE_CATEGORY")]
    DeleteCategory { id: i64 },
    #[serde(rename = "BUDGET/UPDATE_CATEGORY_GROUP", rename_all = "camelCase")]
    UpdateCategoryGroup {
        id: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<CategoryGroupPatch>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
    },
    #[serde(rename = "BUDGET/DELETE_CATEGORY_GROUP")]
    DeleteCategoryGroup { id: i64 },
    #[serde(rename = "BUDGET/UPDATE_TRANSACTION")]
    UpdateTransaction { id: i64, data: TransactionPatch },
    #[serde(rename = "BUDGET/DELETE_TRANSACTION")]
    DeleteTransaction { id: i64 },
    /// The only compound command: applies each sub-command in order. Every
    /// sub-command must be an UPDATE_TRANSACTION or DELETE_TRANSACTION.
    #[serde(rename = "BUDGET/UPDATE_MULTIPLE_TRANSACTIONS", rename_all = "camelCase")]
    UpdateMultipleTransactions { sub_actions: Vec<Command> },
}

/// Keeps `Some(None)` ("set to null") distinct from a missing key when a
/// nullable field appears in JSON as an explicit `null`.
fn double_option<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_balance: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl AccountPatch {
    pub fn apply_to(&self, account: &mut Account) {
        if let Some(name) = &self.name {
            account.name = name.clone();
        }
        if let Some(initial_balance) = self.initial_balance {
            account.initial_balance = initial_balance;
        }
        if let Some(currency_code) = &self.currency_code {
            account.currency_code = currency_code.clone();
        }
        if let Some(metadata) = &self.metadata {
            account.metadata = metadata.clone();
        }
    }

    /// Prior values of every field where `before` and `after` disagree.
    pub fn diff(before: &Account, after: &Account) -> Self {
        Self {
            name: (before.name != after.name).then(|| before.name.clone()),
            initial_balance: (before.initial_balance != after.initial_balance)
                .then_some(before.initial_balance),
            currency_code: (before.currency_code != after.currency_code)
                .then(|| before.currency_code.clone()),
            metadata: (before.metadata != after.metadata).then(|| before.metadata.clone()),
        }
    }

    /// Full serialization of an account, for delete inversion.
    pub fn from_account(account: &Account) -> Self {
        Self {
            name: Some(account.name.clone()),
            initial_balance: Some(account.initial_balance),
            currency_code: Some(account.currency_code.clone()),
            metadata: Some(account.metadata.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryGroupPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CategoryGroupPatch {
    pub fn apply_to(&self, group: &mut CategoryGroup) {
        if let Some(name) = &self.name {
            group.name = name.clone();
        }
    }

    pub fn diff(before: &CategoryGroup, after: &CategoryGroup) -> Self {
        Self {
            name: (before.name != after.name).then(|| before.name.clone()),
        }
    }

    pub fn from_group(group: &CategoryGroup) -> Self {
        Self {
            name: Some(group.name.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    #[serde(
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub group_id: Option<Option<i64>>,
    #[serde(
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub rules: Option<Option<Vec<CategoryRule>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl CategoryPatch {
    pub fn apply_to(&self, category: &mut Category) {
        if let Some(name) = &self.name {
            category.name = name.clone();
        }
        if let Some(notes) = &self.notes {
            category.notes = notes.clone();
        }
        if let Some(currency_code) = &self.currency_code {
            category.currency_code = currency_code.clone();
        }
        if let Some(group_id) = self.group_id {
            category.group_id = group_id;
        }
        if let Some(rules) = &self.rules {
            category.rules = rules.clone();
        }
        if let Some(metadata) = &self.metadata {
            category.metadata = metadata.clone();
        }
    }

    pub fn diff(before: &Category, after: &Category) -> Self {
        Self {
            name: (before.name != after.name).then(|| before.name.clone()),
            notes: (before.notes != after.notes).then(|| before.notes.clone()),
            currency_code: (before.currency_code != after.currency_code)
                .then(|| before.currency_code.clone()),
            group_id: (before.group_id != after.group_id).then_some(before.group_id),
            rules: (before.rules != after.rules).then(|| before.rules.clone()),
            metadata: (before.metadata != after.metadata).then(|| before.metadata.clone()),
        }
    }

    pub fn from_category(category: &Category) -> Self {
        Self {
            name: Some(category.name.clone()),
            notes: Some(category.notes.clone()),
            currency_code: Some(category.currency_code.clone()),
            group_id: Some(category.group_id),
            rules: Some(category.rules.clone()),
            metadata: Some(category.metadata.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionPatch {
    #[serde(
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<Option<PDate>>,
    #[serde(
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub account_id: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub who: Option<String>,
    #[serde(
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Vec<TransactionDetail>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_transfer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl TransactionPatch {
    pub fn apply_to(&self, txn: &mut Transaction) {
        if let Some(date) = self.date {
            txn.date = date;
        }
        if let Some(account_id) = self.account_id {
            txn.account_id = account_id;
        }
        if let Some(who) = &self.who {
            txn.who = who.clone();
        }
        if let Some(user_id) = self.user_id {
            txn.user_id = user_id;
        }
        if let Some(detail) = &self.detail {
            txn.detail = detail.clone();
        }
        if let Some(pending) = self.pending {
            txn.pending = pending;
        }
        if let Some(is_transfer) = self.is_transfer {
            txn.is_transfer = is_transfer;
        }
        if let Some(metadata) = &self.metadata {
            txn.metadata = metadata.clone();
        }
    }

    pub fn diff(before: &Transaction, after: &Transaction) -> Self {
        Self {
            date: (before.date != after.date).then_some(before.date),
            account_id: (before.account_id != after.account_id).then_some(before.account_id),
            who: (before.who != after.who).then(|| before.who.clone()),
            user_id: (before.user_id != after.user_id).then_some(before.user_id),
            detail: (before.detail != after.detail).then(|| before.detail.clone()),
            pending: (before.pending != after.pending).then_some(before.pending),
            is_transfer: (before.is_transfer != after.is_transfer).then_some(before.is_transfer),
            metadata: (before.metadata != after.metadata).then(|| before.metadata.clone()),
        }
    }

    pub fn from_transaction(txn: &Transaction) -> Self {
        Self {
            date: Some(txn.date),
            account_id: Some(txn.account_id),
            who: Some(txn.who.clone()),
            user_id: Some(txn.user_id),
            detail: Some(txn.detail.clone()),
            pending: Some(txn.pending),
            is_transfer: Some(txn.is_transfer),
            metadata: Some(txn.metadata.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
