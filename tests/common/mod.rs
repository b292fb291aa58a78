#![allow(dead_code)]

use budget_engine::ledger::{
    Account, Budget, Category, CategoryGroup, CategoryRule, Transaction, TransactionDetail,
};
use budget_engine::PDate;

pub fn date(year: i32, month: u32, day: u32) -> PDate {
    PDate::from_ymd(year, month, day).expect("valid date")
}

/// An empty budget spanning calendar year 2016.
pub fn budget_2016() -> Budget {
    Budget::new("Test Budget", "USD")
        .expect("budget")
        .set_dates(Some(date(2016, 1, 1)), Some(date(2016, 12, 31)))
        .expect("period")
}

pub fn account(id: i64, name: &str) -> Account {
    Account {
        id: Some(id),
        ..Account::new(name, "USD")
    }
}

pub fn group(id: i64, name: &str) -> CategoryGroup {
    CategoryGroup {
        id: Some(id),
        name: name.into(),
    }
}

/// A category with an empty rule list (budgeted at zero).
pub fn category(id: i64, group_id: i64, name: &str) -> Category {
    Category {
        id: Some(id),
        group_id: Some(group_id),
        ..Category::new(name, "USD")
    }
}

/// A category whose budget tracks realized spending.
pub fn automatic_category(id: i64, group_id: i64, name: &str) -> Category {
    Category {
        rules: None,
        ..category(id, group_id, name)
    }
}

pub fn monthly_rule(amount: i64) -> CategoryRule {
    CategoryRule {
        amount,
        ..CategoryRule::default()
    }
}

/// A single-detail transaction.
pub fn txn(
    id: i64,
    when: Option<PDate>,
    account_id: Option<i64>,
    amount: i64,
    category_id: Option<i64>,
) -> Transaction {
    Transaction {
        id: Some(id),
        date: when,
        account_id,
        detail: vec![TransactionDetail::new(amount, "", category_id)],
        ..Transaction::default()
    }
}

/// Ids of transactions in their stored (chronological) order.
pub fn transaction_ids(budget: &Budget) -> Vec<i64> {
    budget.transactions().iter().filter_map(|t| t.id).collect()
}

/// Ids of categories in their stored (dual) order.
pub fn category_ids(budget: &Budget) -> Vec<i64> {
    budget.categories().iter().filter_map(|c| c.id).collect()
}
