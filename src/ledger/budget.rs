use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Utc};
use once_cell::unsync::OnceCell;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::currency::is_known_currency;
use crate::dates::{PDate, MAX_YEAR, MIN_YEAR, NULL_DATE_SENTINEL};
use crate::errors::{BudgetError, Result};
use crate::record::Record;
use crate::validation::{Severity, ValidationIssue, ValidationResult};

use super::account::Account;
use super::category::{Category, CategoryGroup};
use super::transaction::Transaction;

/// Persisted-form schema version. `major` bumps on incompatible changes,
/// `minor` on additive ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaVersion {
    pub major: u32,
    pub minor: u32,
}

pub const SCHEMA_VERSION: SchemaVersion = SchemaVersion { major: 1, minor: 0 };

/// Running-balance tables, computed once per budget instance.
#[derive(Debug, Clone, Default)]
struct BalanceTables {
    account: HashMap<i64, i64>,
    by_transaction: HashMap<i64, i64>,
}

/// The aggregate root: owns every entity and enforces cross-entity
/// invariants.
///
/// Budgets are immutable; every structural mutator returns a new instance
/// and leaves the receiver untouched. Collections keep a disciplined order:
/// accounts and groups in user order, categories sorted primarily by group
/// order and secondarily by user order within each group, transactions in
/// chronological order with undated ones last.
#[derive(Debug)]
pub struct Budget {
    id: Option<i64>,
    name: String,
    currency_code: String,
    start_date: PDate,
    end_date: PDate,
    accounts: Vec<Account>,
    category_groups: Vec<CategoryGroup>,
    categories: Vec<Category>,
    transactions: Vec<Transaction>,
    balances: OnceCell<BalanceTables>,
}

impl Clone for Budget {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            currency_code: self.currency_code.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            accounts: self.accounts.clone(),
            category_groups: self.category_groups.clone(),
            categories: self.categories.clone(),
            transactions: self.transactions.clone(),
            // Derived caches never travel to a new instance.
            balances: OnceCell::new(),
        }
    }
}

impl PartialEq for Budget {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.currency_code == other.currency_code
            && self.start_date == other.start_date
            && self.end_date == other.end_date
            && self.accounts == other.accounts
            && self.category_groups == other.category_groups
            && self.categories == other.categories
            && self.transactions == other.transactions
    }
}

impl Default for Budget {
    fn default() -> Self {
        let year = Utc::now().year().clamp(MIN_YEAR, MAX_YEAR);
        Self {
            id: None,
            name: String::new(),
            currency_code: "USD".into(),
            start_date: PDate::from_ymd(year, 1, 1).expect("clamped year is in range"),
            end_date: PDate::from_ymd(year, 12, 31).expect("clamped year is in range"),
            accounts: Vec::new(),
            category_groups: Vec::new(),
            categories: Vec::new(),
            transactions: Vec::new(),
            balances: OnceCell::new(),
        }
    }
}

impl Budget {
    pub fn new(name: impl Into<String>, currency_code: impl Into<String>) -> Result<Self> {
        let budget = Self {
            name: name.into(),
            currency_code: currency_code.into(),
            ..Self::default()
        };
        budget.check_invariants()?;
        Ok(budget)
    }

    /// Assembles a budget from already-built entities, restoring the ordering
    /// discipline and checking every invariant.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: Option<i64>,
        name: impl Into<String>,
        currency_code: impl Into<String>,
        start_date: PDate,
        end_date: PDate,
        accounts: Vec<Account>,
        category_groups: Vec<CategoryGroup>,
        categories: Vec<Category>,
        transactions: Vec<Transaction>,
    ) -> Result<Self> {
        let mut budget = Self {
            id,
            name: name.into(),
            currency_code: currency_code.into(),
            start_date,
            end_date,
            accounts,
            category_groups,
            categories,
            transactions,
            balances: OnceCell::new(),
        };
        budget.sort_categories();
        budget.sort_transactions();
        budget.check_invariants()?;
        Ok(budget)
    }

    pub fn with_id(self, id: Option<i64>) -> Result<Self> {
        self.modified(|b| b.id = id)
    }

    // ---- accessors -------------------------------------------------------

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn currency_code(&self) -> &str {
        &self.currency_code
    }

    pub fn start_date(&self) -> PDate {
        self.start_date
    }

    pub fn end_date(&self) -> PDate {
        self.end_date
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn account(&self, id: i64) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == Some(id))
    }

    pub fn account_index(&self, id: i64) -> Option<usize> {
        self.accounts.iter().position(|a| a.id == Some(id))
    }

    pub fn category_groups(&self) -> &[CategoryGroup] {
        &self.category_groups
    }

    pub fn category_group(&self, id: i64) -> Option<&CategoryGroup> {
        self.category_groups.iter().find(|g| g.id == Some(id))
    }

    pub fn category_group_index(&self, id: i64) -> Option<usize> {
        self.category_groups.iter().position(|g| g.id == Some(id))
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, id: i64) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == Some(id))
    }

    pub fn category_index(&self, id: i64) -> Option<usize> {
        self.categories.iter().position(|c| c.id == Some(id))
    }

    /// Position of a category among the categories of its own group.
    pub fn category_index_in_group(&self, id: i64) -> Option<usize> {
        let category = self.category(id)?;
        self.categories
            .iter()
            .filter(|c| c.group_id == category.group_id)
            .position(|c| c.id == Some(id))
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn transaction(&self, id: i64) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == Some(id))
    }

    pub fn transaction_index(&self, id: i64) -> Option<usize> {
        self.transactions.iter().position(|t| t.id == Some(id))
    }

    // ---- scalar mutators -------------------------------------------------

    pub fn set_name(&self, name: impl Into<String>) -> Result<Self> {
        self.modified(|b| b.name = name.into())
    }

    pub fn set_currency(&self, currency_code: impl Into<String>) -> Result<Self> {
        self.modified(|b| b.currency_code = currency_code.into())
    }

    /// Sets either or both period bounds; `None` leaves a bound alone.
    pub fn set_dates(&self, start_date: Option<PDate>, end_date: Option<PDate>) -> Result<Self> {
        self.modified(|b| {
            if let Some(start) = start_date {
                b.start_date = start;
            }
            if let Some(end) = end_date {
                b.end_date = end;
            }
        })
    }

    // ---- account mutators ------------------------------------------------

    /// Upserts an account by id; insertion appends at the end of the order.
    pub fn update_account(&self, account: Account) -> Result<Self> {
        let id = required_id(account.id, "account")?;
        debug!(account = id, "upserting account");
        self.modified(|b| match b.account_index(id) {
            Some(index) => b.accounts[index] = account,
            None => b.accounts.push(account),
        })
    }

    pub fn position_account(&self, id: i64, new_index: usize) -> Result<Self> {
        let current = self
            .account_index(id)
            .ok_or_else(|| BudgetError::InvalidReference(format!("account {id} not found")))?;
        check_position(new_index, self.accounts.len(), "account")?;
        self.modified(|b| {
            let account = b.accounts.remove(current);
            let target = new_index.min(b.accounts.len());
            b.accounts.insert(target, account);
        })
    }

    /// Removes an account and detaches its transactions. Unknown ids are a
    /// no-op so deletes stay idempotent.
    pub fn delete_account(&self, id: i64) -> Result<Self> {
        if self.account_index(id).is_none() {
            return Ok(self.clone());
        }
        debug!(account = id, "deleting account");
        self.modified(|b| {
            b.accounts.retain(|a| a.id != Some(id));
            for txn in &mut b.transactions {
                if txn.account_id == Some(id) {
                    txn.account_id = None;
                }
            }
        })
    }

    /// Attaches the listed transactions to `account_id` where they currently
    /// have no account.
    pub fn link_null_transactions(&self, account_id: i64, transaction_ids: &[i64]) -> Result<Self> {
        if self.account(account_id).is_none() {
            return Err(BudgetError::InvalidReference(format!(
                "account {account_id} not found"
            )));
        }
        self.modified(|b| {
            for txn in &mut b.transactions {
                let Some(id) = txn.id else { continue };
                if transaction_ids.contains(&id) && txn.account_id.is_none() {
                    txn.account_id = Some(account_id);
                }
            }
        })
    }

    // ---- category group mutators ----------------------------------------

    pub fn update_category_group(&self, group: CategoryGroup) -> Result<Self> {
        let id = required_id(group.id, "category group")?;
        debug!(group = id, "upserting category group");
        self.modified(|b| match b.category_group_index(id) {
            Some(index) => b.category_groups[index] = group,
            None => b.category_groups.push(group),
        })
    }

    pub fn position_category_group(&self, id: i64, new_index: usize) -> Result<Self> {
        let current = self.category_group_index(id).ok_or_else(|| {
            BudgetError::InvalidReference(format!("category group {id} not found"))
        })?;
        check_position(new_index, self.category_groups.len(), "category group")?;
        self.modified(|b| {
            let group = b.category_groups.remove(current);
            let target = new_index.min(b.category_groups.len());
            b.category_groups.insert(target, group);
            b.sort_categories();
        })
    }

    /// Removes a group; only permitted when no category belongs to it.
    pub fn delete_category_group(&self, id: i64) -> Result<Self> {
        if self.category_group_index(id).is_none() {
            return Ok(self.clone());
        }
        if self.categories.iter().any(|c| c.group_id == Some(id)) {
            return Err(BudgetError::InvariantViolation(format!(
                "category group {id} still contains categories"
            )));
        }
        self.modified(|b| b.category_groups.retain(|g| g.id != Some(id)))
    }

    // ---- category mutators -----------------------------------------------

    /// Upserts a category. A new category, or one whose group changed, lands
    /// at the end of its group's segment; otherwise it is replaced in place.
    pub fn update_category(&self, category: Category) -> Result<Self> {
        let id = required_id(category.id, "category")?;
        debug!(category = id, "upserting category");
        self.modified(|b| match b.category_index(id) {
            Some(index) if b.categories[index].group_id == category.group_id => {
                b.categories[index] = category;
            }
            Some(index) => {
                b.categories.remove(index);
                b.categories.push(category);
                b.sort_categories();
            }
            None => {
                b.categories.push(category);
                b.sort_categories();
            }
        })
    }

    /// Moves a category to `new_index` within its own group; other groups'
    /// internal order is untouched.
    pub fn position_category(&self, id: i64, new_index: usize) -> Result<Self> {
        let global = self
            .category_index(id)
            .ok_or_else(|| BudgetError::InvalidReference(format!("category {id} not found")))?;
        let group_id = self.categories[global].group_id;
        let group_len = self
            .categories
            .iter()
            .filter(|c| c.group_id == group_id)
            .count();
        check_position(new_index, group_len, "category")?;
        self.modified(|b| {
            let category = b.categories.remove(global);
            let members: Vec<usize> = b
                .categories
                .iter()
                .enumerate()
                .filter(|(_, c)| c.group_id == group_id)
                .map(|(index, _)| index)
                .collect();
            let target = match members.get(new_index) {
                Some(&index) => index,
                // Past the last member: either the slot after the segment or,
                // for a now-empty group, the original position.
                None => members.last().map(|&index| index + 1).unwrap_or(global),
            };
            b.categories.insert(target, category);
        })
    }

    /// Removes a category and uncouples every detail row pointing at it.
    pub fn delete_category(&self, id: i64) -> Result<Self> {
        if self.category_index(id).is_none() {
            return Ok(self.clone());
        }
        debug!(category = id, "deleting category");
        self.modified(|b| {
            b.categories.retain(|c| c.id != Some(id));
            for txn in &mut b.transactions {
                for detail in &mut txn.detail {
                    if detail.category_id == Some(id) {
                        detail.category_id = None;
                    }
                }
            }
        })
    }

    /// Re-attaches specific detail rows to `category_id` where they currently
    /// have no category.
    pub fn link_transaction_details(
        &self,
        category_id: i64,
        links: &[(i64, usize)],
    ) -> Result<Self> {
        if self.category(category_id).is_none() {
            return Err(BudgetError::InvalidReference(format!(
                "category {category_id} not found"
            )));
        }
        self.modified(|b| {
            for &(transaction_id, detail_index) in links {
                let Some(index) = b.transaction_index(transaction_id) else {
                    continue;
                };
                if let Some(detail) = b.transactions[index].detail.get_mut(detail_index) {
                    if detail.category_id.is_none() {
                        detail.category_id = Some(category_id);
                    }
                }
            }
        })
    }

    // ---- transaction mutators --------------------------------------------

    /// Upserts a transaction, keeping chronological order. Updates that keep
    /// the date skip the re-sort.
    pub fn update_transaction(&self, transaction: Transaction) -> Result<Self> {
        let id = required_id(transaction.id, "transaction")?;
        if let Some(account_id) = transaction.account_id {
            if self.account(account_id).is_none() {
                return Err(BudgetError::InvalidReference(format!(
                    "transaction {id} references unknown account {account_id}"
                )));
            }
        }
        debug!(transaction = id, "upserting transaction");
        self.modified(|b| match b.transaction_index(id) {
            Some(index) => {
                let date_changed = b.transactions[index].date != transaction.date;
                b.transactions[index] = transaction;
                if date_changed {
                    b.sort_transactions();
                }
            }
            None => {
                b.transactions.push(transaction);
                b.sort_transactions();
            }
        })
    }

    pub fn delete_transaction(&self, id: i64) -> Result<Self> {
        if self.transaction_index(id).is_none() {
            return Ok(self.clone());
        }
        debug!(transaction = id, "deleting transaction");
        self.modified(|b| b.transactions.retain(|t| t.id != Some(id)))
    }

    // ---- derived balances ------------------------------------------------

    fn balance_tables(&self) -> &BalanceTables {
        self.balances.get_or_init(|| {
            let mut account: HashMap<i64, i64> = self
                .accounts
                .iter()
                .filter_map(|a| a.id.map(|id| (id, a.initial_balance)))
                .collect();
            let mut by_transaction = HashMap::new();
            for txn in &self.transactions {
                if txn.pending {
                    continue;
                }
                let Some(account_id) = txn.account_id else {
                    continue;
                };
                let running = account.entry(account_id).or_insert(0);
                *running += txn.amount();
                if let Some(id) = txn.id {
                    by_transaction.insert(id, *running);
                }
            }
            BalanceTables {
                account,
                by_transaction,
            }
        })
    }

    /// Final balance of every account: initial balance plus all non-pending
    /// transactions.
    pub fn account_balances(&self) -> &HashMap<i64, i64> {
        &self.balance_tables().account
    }

    /// Running balance of `account_id` as of `transaction_id` in the
    /// chronological order. `None` for undated or pending transactions.
    pub fn account_balance_as_of_transaction(
        &self,
        transaction_id: i64,
        account_id: i64,
    ) -> Option<i64> {
        let index = self.transaction_index(transaction_id)?;
        let txn = &self.transactions[index];
        if txn.date.is_none() || txn.pending {
            return None;
        }
        if txn.account_id == Some(account_id) {
            return self
                .balance_tables()
                .by_transaction
                .get(&transaction_id)
                .copied();
        }
        for prev in self.transactions[..index].iter().rev() {
            if prev.account_id == Some(account_id) && prev.date.is_some() && !prev.pending {
                let id = prev.id?;
                return self.balance_tables().by_transaction.get(&id).copied();
            }
        }
        self.account(account_id).map(|a| a.initial_balance)
    }

    /// Cumulative spending per category over all transactions dated on or
    /// before `date`. Pending transactions count here. Every category id is
    /// present, zero when untouched.
    pub fn category_balances_on_date(&self, date: PDate) -> HashMap<i64, i64> {
        debug_assert!(self.start_date <= date && date <= self.end_date);
        let mut balances: HashMap<i64, i64> = self
            .categories
            .iter()
            .filter_map(|c| c.id.map(|id| (id, 0)))
            .collect();
        for txn in &self.transactions {
            let Some(txn_date) = txn.date else { break };
            if txn_date > date {
                break;
            }
            for detail in &txn.detail {
                if let Some(category_id) = detail.category_id {
                    *balances.entry(category_id).or_insert(0) += detail.amount;
                }
            }
        }
        balances
    }

    pub fn category_balance_by_date(&self, category_id: i64, date: PDate) -> i64 {
        self.category_balances_on_date(date)
            .get(&category_id)
            .copied()
            .unwrap_or(0)
    }

    /// Budgeted amount per category on `date`: realized spending for
    /// automatic categories, rule occurrences times amount otherwise.
    pub fn category_budgets_on_date(&self, date: PDate) -> HashMap<i64, i64> {
        let balances = self.category_balances_on_date(date);
        let mut budgets = HashMap::new();
        for category in &self.categories {
            let Some(id) = category.id else { continue };
            let amount = match &category.rules {
                None => balances.get(&id).copied().unwrap_or(0),
                Some(rules) => rules
                    .iter()
                    .map(|rule| rule.amount * rule.count_occurrences_between(self.start_date, date))
                    .sum(),
            };
            budgets.insert(id, amount);
        }
        budgets
    }

    // ---- validation ------------------------------------------------------

    /// Runs every owned record's contextual validation and combines the
    /// results.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();
        if !is_known_currency(&self.currency_code) {
            result.push(ValidationIssue {
                severity: Severity::Warning,
                field: Some("currency".into()),
                message: format!(
                    "currency `{}` is not in the currency table",
                    self.currency_code
                ),
            });
        }
        for account in &self.accounts {
            result.merge(account.validate_for_budget(self));
        }
        for group in &self.category_groups {
            result.merge(group.validate_for_budget(self));
        }
        for category in &self.categories {
            result.merge(category.validate_for_budget(self));
        }
        for txn in &self.transactions {
            result.merge(txn.validate_for_budget(self));
        }
        result
    }

    // ---- internals -------------------------------------------------------

    /// Clones, applies `mutate`, and re-checks every invariant before the
    /// new budget becomes visible.
    fn modified(&self, mutate: impl FnOnce(&mut Self)) -> Result<Self> {
        let mut next = self.clone();
        mutate(&mut next);
        next.check_invariants()?;
        Ok(next)
    }

    fn group_positions(&self) -> HashMap<i64, usize> {
        self.category_groups
            .iter()
            .enumerate()
            .filter_map(|(index, g)| g.id.map(|id| (id, index)))
            .collect()
    }

    fn sort_categories(&mut self) {
        let positions = self.group_positions();
        self.categories.sort_by_key(|c| {
            c.group_id
                .and_then(|id| positions.get(&id).copied())
                .unwrap_or(usize::MAX)
        });
    }

    fn sort_transactions(&mut self) {
        self.transactions.sort_by_key(transaction_sort_key);
    }

    pub(crate) fn check_invariants(&self) -> Result<()> {
        if self.end_date < self.start_date {
            return Err(BudgetError::InvariantViolation(format!(
                "budget period end {} precedes start {}",
                self.end_date, self.start_date
            )));
        }

        let mut account_ids = HashSet::new();
        for account in &self.accounts {
            account.check_invariants()?;
            let id = required_id(account.id, "account")?;
            if !account_ids.insert(id) {
                return Err(BudgetError::InvariantViolation(format!(
                    "duplicate account id {id}"
                )));
            }
        }

        let mut group_ids = HashSet::new();
        for group in &self.category_groups {
            group.check_invariants()?;
            let id = required_id(group.id, "category group")?;
            if !group_ids.insert(id) {
                return Err(BudgetError::InvariantViolation(format!(
                    "duplicate category group id {id}"
                )));
            }
        }

        let mut category_ids = HashSet::new();
        for category in &self.categories {
            category.check_invariants()?;
            let id = required_id(category.id, "category")?;
            if !category_ids.insert(id) {
                return Err(BudgetError::InvariantViolation(format!(
                    "duplicate category id {id}"
                )));
            }
            match category.group_id {
                Some(group_id) if group_ids.contains(&group_id) => {}
                Some(group_id) => {
                    return Err(BudgetError::InvariantViolation(format!(
                        "category {id} references unknown group {group_id}"
                    )));
                }
                None => {
                    return Err(BudgetError::InvariantViolation(format!(
                        "category {id} belongs to no group"
                    )));
                }
            }
        }

        let mut transaction_ids = HashSet::new();
        for txn in &self.transactions {
            txn.check_invariants()?;
            let id = required_id(txn.id, "transaction")?;
            if !transaction_ids.insert(id) {
                return Err(BudgetError::InvariantViolation(format!(
                    "duplicate transaction id {id}"
                )));
            }
            if let Some(account_id) = txn.account_id {
                if !account_ids.contains(&account_id) {
                    return Err(BudgetError::InvariantViolation(format!(
                        "transaction {id} references unknown account {account_id}"
                    )));
                }
            }
        }

        self.check_rule_overlap()?;
        self.check_ordering()
    }

    /// No two rules of one category may overlap over the budget period. The
    /// test counts one rule's occurrences over the other rule's effective
    /// window, for all ordered pairs.
    fn check_rule_overlap(&self) -> Result<()> {
        for category in &self.categories {
            let Some(rules) = &category.rules else {
                continue;
            };
            for (i, rule) in rules.iter().enumerate() {
                for (j, other) in rules.iter().enumerate() {
                    if i == j {
                        continue;
                    }
                    let begin = other
                        .start_date
                        .map_or(self.start_date, |d| d.max(self.start_date));
                    let end = other
                        .end_date
                        .map_or(self.end_date, |d| d.min(self.end_date));
                    if end < begin {
                        continue;
                    }
                    if rule.count_occurrences_between(begin, end) != 0 {
                        return Err(BudgetError::InvariantViolation(format!(
                            "category `{}` has overlapping rules",
                            category.name
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn check_ordering(&self) -> Result<()> {
        let keys: Vec<i64> = self.transactions.iter().map(transaction_sort_key).collect();
        if keys.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(BudgetError::InvariantViolation(
                "transactions out of chronological order".into(),
            ));
        }
        let positions = self.group_positions();
        let order: Vec<usize> = self
            .categories
            .iter()
            .map(|c| {
                c.group_id
                    .and_then(|id| positions.get(&id).copied())
                    .unwrap_or(usize::MAX)
            })
            .collect();
        if order.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(BudgetError::InvariantViolation(
                "categories out of group order".into(),
            ));
        }
        Ok(())
    }
}

fn transaction_sort_key(txn: &Transaction) -> i64 {
    txn.date.map(|d| d.value()).unwrap_or(NULL_DATE_SENTINEL)
}

fn required_id(id: Option<i64>, kind: &str) -> Result<i64> {
    id.ok_or_else(|| BudgetError::InvariantViolation(format!("{kind} record lacks an id")))
}

fn check_position(new_index: usize, len: usize, kind: &str) -> Result<()> {
    if new_index > len {
        return Err(BudgetError::InvariantViolation(format!(
            "{kind} position {new_index} out of bounds (size {len})"
        )));
    }
    Ok(())
}

// ---- persisted form ------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BudgetEnvelopeRef<'a> {
    version: SchemaVersion,
    id: Option<i64>,
    name: &'a str,
    start_date: PDate,
    end_date: PDate,
    currency_code: &'a str,
    accounts: &'a [Account],
    category_groups: &'a [CategoryGroup],
    categories: &'a [Category],
    transactions: &'a [Transaction],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BudgetEnvelope {
    version: SchemaVersion,
    #[serde(default)]
    id: Option<i64>,
    name: String,
    start_date: PDate,
    end_date: PDate,
    currency_code: String,
    accounts: Vec<Account>,
    category_groups: Vec<CategoryGroup>,
    categories: Vec<Category>,
    transactions: Vec<Transaction>,
}

impl Serialize for Budget {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        BudgetEnvelopeRef {
            version: SCHEMA_VERSION,
            id: self.id,
            name: &self.name,
            start_date: self.start_date,
            end_date: self.end_date,
            currency_code: &self.currency_code,
            accounts: &self.accounts,
            category_groups: &self.category_groups,
            categories: &self.categories,
            transactions: &self.transactions,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Budget {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let envelope = BudgetEnvelope::deserialize(deserializer)?;
        if envelope.version.major > SCHEMA_VERSION.major {
            return Err(D::Error::custom(format!(
                "budget schema version {}.{} is newer than supported {}.{}",
                envelope.version.major,
                envelope.version.minor,
                SCHEMA_VERSION.major,
                SCHEMA_VERSION.minor
            )));
        }
        Budget::from_parts(
            envelope.id,
            envelope.name,
            envelope.currency_code,
            envelope.start_date,
            envelope.end_date,
            envelope.accounts,
            envelope.category_groups,
            envelope.categories,
            envelope.transactions,
        )
        .map_err(D::Error::custom)
    }
}
