//! Pure command application.

use tracing::trace;

use crate::errors::{BudgetError, Result};
use crate::ledger::{Account, Budget, Category, CategoryGroup, Transaction};
use crate::record::Record;

use super::{Command, CommandKind};

/// Applies `command` to `state`, returning the next state. Commands whose
/// `budget_id` names a different budget leave the state untouched. Errors
/// propagate; the caller's state is unchanged on failure.
pub fn reduce(state: Budget, command: &Command) -> Result<Budget> {
    if let Some(budget_id) = command.budget_id {
        if state.id() != Some(budget_id) {
            return Ok(state);
        }
    }
    trace!(kind = ?command.kind, "reducing command");

    match &command.kind {
        CommandKind::Noop => Ok(state),
        CommandKind::SetName { name } => state.set_name(name.clone()),
        CommandKind::SetCurrency { currency_code } => state.set_currency(currency_code.clone()),
        CommandKind::SetDate {
            start_date,
            end_date,
        } => state.set_dates(*start_date, *end_date),

        CommandKind::UpdateAccount {
            id,
            data,
            index,
            link_null_transactions,
        } => {
            let mut next = match state.account(*id).cloned() {
                Some(account) => {
                    let account = match data {
                        Some(patch) => account.edit(|a| patch.apply_to(a))?,
                        None => account,
                    };
                    state.update_account(account)?
                }
                None => {
                    let mut account = Account {
                        id: Some(*id),
                        ..Account::default()
                    };
                    if let Some(patch) = data {
                        account = account.edit(|a| patch.apply_to(a))?;
                    }
                    let mut next = state.update_account(account)?;
                    if let Some(transaction_ids) = link_null_transactions {
                        next = next.link_null_transactions(*id, transaction_ids)?;
                    }
                    next
                }
            };
            if let Some(index) = index {
                next = next.position_account(*id, *index)?;
            }
            Ok(next)
        }
        CommandKind::DeleteAccount { id } => state.delete_account(*id),

        CommandKind::UpdateCategory {
            id,
            data,
            index,
            link_transaction_details,
        } => {
            let mut next = match state.category(*id).cloned() {
                Some(category) => {
                    let category = match data {
                        Some(patch) => category.edit(|c| patch.apply_to(c))?,
                        None => category,
                    };
                    state.update_category(category)?
                }
                None => {
                    let mut category = Category {
                        id: Some(*id),
                        ..Category::default()
                    };
                    if let Some(patch) = data {
                        category = category.edit(|c| patch.apply_to(c))?;
                    }
                    let mut next = state.update_category(category)?;
                    if let Some(links) = link_transaction_details {
                        next = next.link_transaction_details(*id, links)?;
                    }
                    next
                }
            };
            if let Some(index) = index {
                next = next.position_category(*id, *index)?;
            }
            Ok(next)
        }
        CommandKind::DeleteCategory { id } => state.delete_category(*id),

        CommandKind::UpdateCategoryGroup { id, data, index } => {
            let mut next = match state.category_group(*id).cloned() {
                Some(group) => {
                    let group = match data {
                        Some(patch) => group.edit(|g| patch.apply_to(g))?,
                        None => group,
                    };
                    state.update_category_group(group)?
                }
                None => {
                    let mut group = CategoryGroup {
                        id: Some(*id),
                        ..CategoryGroup::default()
                    };
                    if let Some(patch) = data {
                        group = group.edit(|g| patch.apply_to(g))?;
                    }
                    state.update_category_group(group)?
                }
            };
            if let Some(index) = index {
                next = next.position_category_group(*id, *index)?;
            }
            Ok(next)
        }
        CommandKind::DeleteCategoryGroup { id } => state.delete_category_group(*id),

        CommandKind::UpdateTransaction { id, data } => {
            let base = state.transaction(*id).cloned().unwrap_or_else(|| Transaction {
                id: Some(*id),
                ..Transaction::default()
            });
            let txn = base.edit(|t| data.apply_to(t))?;
            state.update_transaction(txn)
        }
        CommandKind::DeleteTransaction { id } => state.delete_transaction(*id),

        CommandKind::UpdateMultipleTransactions { sub_actions } => {
            let mut next = state;
            for sub in sub_actions {
                if !matches!(
                    sub.kind,
                    CommandKind::UpdateTransaction { .. } | CommandKind::DeleteTransaction { .. }
                ) {
                    return Err(BudgetError::InvalidInput(
                        "compound command may only contain transaction updates and deletes".into(),
                    ));
                }
                if sub.budget_id.is_some() && sub.budget_id != next.id() {
                    return Err(BudgetError::InvalidInput(
                        "sub-command targets a different budget".into(),
                    ));
                }
                next = reduce(next, sub)?;
            }
            Ok(next)
        }
    }
}
