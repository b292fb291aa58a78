//! Undo synthesis: for every command, the command that restores the prior
//! state when applied after it.

use crate::errors::Result;
use crate::ledger::Budget;

use super::reducer::reduce;
use super::{
    AccountPatch, CategoryGroupPatch, CategoryPatch, Command, CommandKind, TransactionPatch,
};

/// Produces the inverse of `command` against the pre-state `state`, such that
/// `reduce(reduce(state, command), inverse)` equals `state` structurally.
/// Returns `None` when the command is scoped to a different budget (the
/// reducer ignores it, so there is nothing to undo).
pub fn invert(state: &Budget, command: &Command) -> Result<Option<Command>> {
    if let Some(budget_id) = command.budget_id {
        if state.id() != Some(budget_id) {
            return Ok(None);
        }
    }

    let kind = match &command.kind {
        CommandKind::Noop => CommandKind::Noop,
        CommandKind::SetName { .. } => CommandKind::SetName {
            name: state.name().to_owned(),
        },
        CommandKind::SetCurrency { .. } => CommandKind::SetCurrency {
            currency_code: state.currency_code().to_owned(),
        },
        // Only the keys present in the forward command come back.
        CommandKind::SetDate {
            start_date,
            end_date,
        } => CommandKind::SetDate {
            start_date: start_date.map(|_| state.start_date()),
            end_date: end_date.map(|_| state.end_date()),
        },

        CommandKind::DeleteAccount { id } => match state.account(*id) {
            None => CommandKind::Noop,
            Some(account) => CommandKind::UpdateAccount {
                id: *id,
                data: Some(AccountPatch::from_account(account)),
                index: state.account_index(*id),
                link_null_transactions: Some(
                    state
                        .transactions()
                        .iter()
                        .filter(|t| t.account_id == Some(*id))
                        .filter_map(|t| t.id)
                        .collect(),
                ),
            },
        },
        CommandKind::UpdateAccount {
            id, data, index, ..
        } => match state.account(*id) {
            None => CommandKind::DeleteAccount { id: *id },
            Some(before) => {
                let mut after = before.clone();
                if let Some(patch) = data {
                    patch.apply_to(&mut after);
                }
                let diff = AccountPatch::diff(before, &after);
                CommandKind::UpdateAccount {
                    id: *id,
                    data: (!diff.is_empty()).then_some(diff),
                    index: prior_index(*index, state.account_index(*id)),
                    link_null_transactions: None,
                }
            }
        },

        CommandKind::DeleteCategory { id } => match state.category(*id) {
            None => CommandKind::Noop,
            Some(category) => CommandKind::UpdateCategory {
                id: *id,
                data: Some(CategoryPatch::from_category(category)),
                index: state.category_index_in_group(*id),
                link_transaction_details: Some(
                    state
                        .transactions()
                        .iter()
                        .flat_map(|t| {
                            t.detail
                                .iter()
                                .enumerate()
                                .filter(|(_, d)| d.category_id == Some(*id))
                                .filter_map(move |(detail_index, _)| {
                                    t.id.map(|txn_id| (txn_id, detail_index))
                                })
                        })
                        .collect(),
                ),
            },
        },
        CommandKind::UpdateCategory {
            id, data, index, ..
        } => match state.category(*id) {
            None => CommandKind::DeleteCategory { id: *id },
            Some(before) => {
                let mut after = before.clone();
                if let Some(patch) = data {
                    patch.apply_to(&mut after);
                }
                let diff = CategoryPatch::diff(before, &after);
                CommandKind::UpdateCategory {
                    id: *id,
                    data: (!diff.is_empty()).then_some(diff),
                    index: prior_index(*index, state.category_index_in_group(*id)),
                    link_transaction_details: None,
                }
            }
        },

        CommandKind::DeleteCategoryGroup { id } => match state.category_group(*id) {
            None => CommandKind::Noop,
            Some(group) => CommandKind::UpdateCategoryGroup {
                id: *id,
                data: Some(CategoryGroupPatch::from_group(group)),
                index: None,
            },
        },
        CommandKind::UpdateCategoryGroup { id, data, index } => match state.category_group(*id) {
            None => CommandKind::DeleteCategoryGroup { id: *id },
            Some(before) => {
                let mut after = before.clone();
                if let Some(patch) = data {
                    patch.apply_to(&mut after);
                }
                let diff = CategoryGroupPatch::diff(before, &after);
                CommandKind::UpdateCategoryGroup {
                    id: *id,
                    data: (!diff.is_empty()).then_some(diff),
                    index: prior_index(*index, state.category_group_index(*id)),
                }
            }
        },

        CommandKind::DeleteTransaction { id } => match state.transaction(*id) {
            None => CommandKind::Noop,
            Some(txn) => CommandKind::UpdateTransaction {
                id: *id,
                data: TransactionPatch::from_transaction(txn),
            },
        },
        CommandKind::UpdateTransaction { id, data } => match state.transaction(*id) {
            None => CommandKind::DeleteTransaction { id: *id },
            Some(before) => {
                let mut after = before.clone();
                data.apply_to(&mut after);
                CommandKind::UpdateTransaction {
                    id: *id,
                    data: TransactionPatch::diff(before, &after),
                }
            }
        },

        // Sub-actions invert against the running state, then replay in
        // reverse order.
        CommandKind::UpdateMultipleTransactions { sub_actions } => {
            let mut running = state.clone();
            let mut inverses = Vec::with_capacity(sub_actions.len());
            for sub in sub_actions {
                if let Some(inverse) = invert(&running, sub)? {
                    inverses.push(inverse);
                }
                running = reduce(running, sub)?;
            }
            inverses.reverse();
            CommandKind::UpdateMultipleTransactions {
                sub_actions: inverses,
            }
        }
    };

    Ok(Some(Command::for_budget(state.id(), kind)))
}

/// The prior position, carried only when the forward command repositioned.
fn prior_index(forward: Option<usize>, current: Option<usize>) -> Option<usize> {
    match (forward, current) {
        (Some(new_index), Some(old_index)) if new_index != old_index => Some(old_index),
        _ => None,
    }
}
