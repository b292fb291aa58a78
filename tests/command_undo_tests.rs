mod common;

use common::*;

use budget_engine::commands::{
    invert, reduce, AccountPatch, CategoryGroupPatch, CategoryPatch, Command, CommandKind,
    TransactionPatch,
};
use budget_engine::ledger::{Budget, TransactionDetail};

fn cmd(kind: CommandKind) -> Command {
    Command::new(kind)
}

/// Applies a command, inverts it against the pre-state, replays the inverse,
/// and checks the round trip restores the pre-state exactly.
fn assert_undoable(state: &Budget, command: &Command) -> Budget {
    let inverse = invert(state, command)
        .expect("invert succeeds")
        .expect("command targets this budget");
    let next = reduce(state.clone(), command).expect("forward reduce");
    let restored = reduce(next.clone(), &inverse).expect("inverse reduce");
    assert_eq!(
        &restored, state,
        "undo of {:?} did not restore the pre-state",
        command.kind
    );
    next
}

#[test]
fn setters_invert_to_prior_values() {
    let budget = budget_2016();
    assert_undoable(&budget, &cmd(CommandKind::SetName { name: "Renamed".into() }));
    assert_undoable(
        &budget,
        &cmd(CommandKind::SetCurrency {
            currency_code: "EUR".into(),
        }),
    );
    assert_undoable(
        &budget,
        &cmd(CommandKind::SetDate {
            start_date: Some(date(2016, 2, 1)),
            end_date: None,
        }),
    );
}

#[test]
fn set_date_inverse_carries_only_present_keys() {
    let budget = budget_2016();
    let forward = cmd(CommandKind::SetDate {
        start_date: None,
        end_date: Some(date(2016, 11, 30)),
    });
    let inverse = invert(&budget, &forward)
        .expect("invert")
        .expect("same budget");
    assert_eq!(
        inverse.kind,
        CommandKind::SetDate {
            start_date: None,
            end_date: Some(date(2016, 12, 31)),
        }
    );
}

#[test]
fn account_creation_inverts_to_delete() {
    let budget = budget_2016();
    let create = cmd(CommandKind::UpdateAccount {
        id: 1,
        data: Some(AccountPatch {
            name: Some("Checking".into()),
            initial_balance: Some(10_000),
            ..AccountPatch::default()
        }),
        index: None,
        link_null_transactions: None,
    });
    let inverse = invert(&budget, &create).expect("invert").expect("same budget");
    assert_eq!(inverse.kind, CommandKind::DeleteAccount { id: 1 });
    assert_undoable(&budget, &create);
}

#[test]
fn account_update_inverts_to_changed_keys_only() {
    let budget = budget_2016()
        .update_account(account(1, "Checking"))
        .expect("account");
    let forward = cmd(CommandKind::UpdateAccount {
        id: 1,
        data: Some(AccountPatch {
            name: Some("Everyday".into()),
            ..AccountPatch::default()
        }),
        index: None,
        link_null_transactions: None,
    });
    let inverse = invert(&budget, &forward).expect("invert").expect("same budget");
    match &inverse.kind {
        CommandKind::UpdateAccount { data: Some(patch), index, .. } => {
            assert_eq!(patch.name.as_deref(), Some("Checking"));
            assert!(patch.initial_balance.is_none());
            assert!(patch.currency_code.is_none());
            assert!(index.is_none());
        }
        other => panic!("unexpected inverse {other:?}"),
    }
    assert_undoable(&budget, &forward);
}

#[test]
fn delete_account_inverse_restores_position_and_links() {
    let budget = budget_2016()
        .update_account(account(1, "Checking"))
        .expect("a1")
        .update_account(account(2, "Savings"))
        .expect("a2")
        .update_account(account(3, "Cash"))
        .expect("a3")
        .update_transaction(txn(1, Some(date(2016, 1, 5)), Some(2), -100, None))
        .expect("txn 1")
        .update_transaction(txn(2, Some(date(2016, 1, 6)), None, -200, None))
        .expect("txn 2");

    let forward = cmd(CommandKind::DeleteAccount { id: 2 });
    let inverse = invert(&budget, &forward).expect("invert").expect("same budget");
    match &inverse.kind {
        CommandKind::UpdateAccount {
            id,
            data: Some(patch),
            index,
            link_null_transactions: Some(links),
        } => {
            assert_eq!(*id, 2);
            assert_eq!(patch.name.as_deref(), Some("Savings"));
            assert_eq!(*index, Some(1));
            // Only the transaction that pointed at the account comes back.
            assert_eq!(links, &vec![1]);
        }
        other => panic!("unexpected inverse {other:?}"),
    }
    assert_undoable(&budget, &forward);
}

#[test]
fn delete_of_missing_record_inverts_to_noop() {
    let budget = budget_2016();
    for forward in [
        cmd(CommandKind::DeleteAccount { id: 9 }),
        cmd(CommandKind::DeleteCategory { id: 9 }),
        cmd(CommandKind::DeleteCategoryGroup { id: 9 }),
        cmd(CommandKind::DeleteTransaction { id: 9 }),
    ] {
        let inverse = invert(&budget, &forward).expect("invert").expect("same budget");
        assert_eq!(inverse.kind, CommandKind::Noop);
        assert_undoable(&budget, &forward);
    }
}

#[test]
fn delete_category_inverse_restores_group_position_and_details() {
    let mut budget = budget_2016()
        .update_category_group(group(1, "Everyday"))
        .expect("group");
    for id in [10, 11, 12] {
        budget = budget.update_category(category(id, 1, "c")).expect("category");
    }
    let budget = budget
        .update_transaction(txn(1, Some(date(2016, 1, 5)), None, -100, Some(11)))
        .expect("txn");

    let forward = cmd(CommandKind::DeleteCategory { id: 11 });
    let inverse = invert(&budget, &forward).expect("invert").expect("same budget");
    match &inverse.kind {
        CommandKind::UpdateCategory {
            id,
            data: Some(patch),
            index,
            link_transaction_details: Some(links),
        } => {
            assert_eq!(*id, 11);
            assert_eq!(*index, Some(1));
            assert_eq!(patch.group_id, Some(Some(1)));
            assert_eq!(links, &vec![(1, 0)]);
        }
        other => panic!("unexpected inverse {other:?}"),
    }
    assert_undoable(&budget, &forward);
}

#[test]
fn reposition_inverts_to_prior_index() {
    let budget = budget_2016()
        .update_account(account(1, "A"))
        .expect("a")
        .update_account(account(2, "B"))
        .expect("b")
        .update_account(account(3, "C"))
        .expect("c");

    let forward = cmd(CommandKind::UpdateAccount {
        id: 3,
        data: None,
        index: Some(0),
        link_null_transactions: None,
    });
    let inverse = invert(&budget, &forward).expect("invert").expect("same budget");
    match inverse.kind {
        CommandKind::UpdateAccount { index, data, .. } => {
            assert_eq!(index, Some(2));
            assert!(data.is_none());
        }
        other => panic!("unexpected inverse {other:?}"),
    }
    assert_undoable(&budget, &forward);
}

#[test]
fn transaction_upsert_and_delete_obey_the_undo_law() {
    let budget = budget_2016()
        .update_account(account(1, "Checking"))
        .expect("account");
    let create = cmd(CommandKind::UpdateTransaction {
        id: 1,
        data: TransactionPatch {
            date: Some(Some(date(2016, 4, 1))),
            account_id: Some(Some(1)),
            detail: Some(vec![TransactionDetail::new(-4200, "groceries", None)]),
            ..TransactionPatch::default()
        },
    });
    let with_txn = assert_undoable(&budget, &create);

    let edit = cmd(CommandKind::UpdateTransaction {
        id: 1,
        data: TransactionPatch {
            date: Some(Some(date(2016, 5, 1))),
            pending: Some(true),
            ..TransactionPatch::default()
        },
    });
    let edited = assert_undoable(&with_txn, &edit);

    assert_undoable(&edited, &cmd(CommandKind::DeleteTransaction { id: 1 }));
}

#[test]
fn commands_scoped_to_other_budgets_are_ignored() {
    let budget = budget_2016().with_id(Some(7)).expect("budget id");
    let foreign = Command::for_budget(
        Some(8),
        CommandKind::SetName {
            name: "Other".into(),
        },
    );
    let next = reduce(budget.clone(), &foreign).expect("reduce");
    assert_eq!(next, budget);
    assert!(invert(&budget, &foreign).expect("invert").is_none());

    let scoped = Command::for_budget(
        Some(7),
        CommandKind::SetName {
            name: "Mine".into(),
        },
    );
    let next = reduce(budget.clone(), &scoped).expect("reduce");
    assert_eq!(next.name(), "Mine");
    let inverse = invert(&budget, &scoped).expect("invert").expect("same budget");
    assert_eq!(inverse.budget_id, Some(7));
}

#[test]
fn compound_command_rejects_foreign_sub_actions() {
    let budget = budget_2016();
    let bad_kind = cmd(CommandKind::UpdateMultipleTransactions {
        sub_actions: vec![cmd(CommandKind::Noop)],
    });
    assert!(reduce(budget.clone(), &bad_kind).is_err());

    let bad_scope = cmd(CommandKind::UpdateMultipleTransactions {
        sub_actions: vec![Command::for_budget(
            Some(99),
            CommandKind::DeleteTransaction { id: 1 },
        )],
    });
    assert!(reduce(budget, &bad_scope).is_err());
}

#[test]
fn compound_command_obeys_the_undo_law() {
    let budget = budget_2016()
        .update_account(account(1, "Checking"))
        .expect("account")
        .update_transaction(txn(1, Some(date(2016, 1, 5)), Some(1), -100, None))
        .expect("txn");

    let compound = cmd(CommandKind::UpdateMultipleTransactions {
        sub_actions: vec![
            cmd(CommandKind::UpdateTransaction {
                id: 2,
                data: TransactionPatch {
                    date: Some(Some(date(2016, 2, 1))),
                    account_id: Some(Some(1)),
                    detail: Some(vec![TransactionDetail::new(-999, "new", None)]),
                    ..TransactionPatch::default()
                },
            }),
            cmd(CommandKind::UpdateTransaction {
                id: 1,
                data: TransactionPatch {
                    pending: Some(true),
                    ..TransactionPatch::default()
                },
            }),
            cmd(CommandKind::DeleteTransaction { id: 1 }),
        ],
    });
    assert_undoable(&budget, &compound);
}

/// Build up a budget with a long mixed command sequence, then unwind it
/// entirely: the empty starting budget must come back bit for bit.
#[test]
fn long_command_sequence_unwinds_to_the_empty_budget() {
    let initial = budget_2016();

    let euro = |amount: i64, category: Option<i64>| TransactionDetail::new(amount, "", category);
    let commands = vec![
        cmd(CommandKind::SetName { name: "Family".into() }),
        cmd(CommandKind::SetCurrency { currency_code: "EUR".into() }),
        cmd(CommandKind::SetDate {
            start_date: Some(date(2017, 1, 1)),
            end_date: Some(date(2017, 12, 31)),
        }),
        // Accounts.
        cmd(CommandKind::UpdateAccount {
            id: 1,
            data: Some(AccountPatch {
                name: Some("Checking".into()),
                currency_code: Some("EUR".into()),
                initial_balance: Some(50_000),
                ..AccountPatch::default()
            }),
            index: None,
            link_null_transactions: None,
        }),
        cmd(CommandKind::UpdateAccount {
            id: 2,
            data: Some(AccountPatch {
                name: Some("Savings".into()),
                currency_code: Some("EUR".into()),
                ..AccountPatch::default()
            }),
            index: None,
            link_null_transactions: None,
        }),
        cmd(CommandKind::UpdateAccount {
            id: 2,
            data: Some(AccountPatch {
                initial_balance: Some(250_000),
                ..AccountPatch::default()
            }),
            index: None,
            link_null_transactions: None,
        }),
        cmd(CommandKind::UpdateAccount {
            id: 2,
            data: None,
            index: Some(0),
            link_null_transactions: None,
        }),
        // Groups and categories.
        cmd(CommandKind::UpdateCategoryGroup {
            id: 1,
            data: Some(CategoryGroupPatch { name: Some("Essentials".into()) }),
            index: None,
        }),
        cmd(CommandKind::UpdateCategoryGroup {
            id: 2,
            data: Some(CategoryGroupPatch { name: Some("Lifestyle".into()) }),
            index: None,
        }),
        cmd(CommandKind::UpdateCategory {
            id: 1,
            data: Some(CategoryPatch {
                name: Some("Rent".into()),
                currency_code: Some("EUR".into()),
                group_id: Some(Some(1)),
                rules: Some(Some(vec![monthly_rule(-60_000)])),
                ..CategoryPatch::default()
            }),
            index: None,
            link_transaction_details: None,
        }),
        cmd(CommandKind::UpdateCategory {
            id: 2,
            data: Some(CategoryPatch {
                name: Some("Dining".into()),
                currency_code: Some("EUR".into()),
                group_id: Some(Some(2)),
                ..CategoryPatch::default()
            }),
            index: None,
            link_transaction_details: None,
        }),
        cmd(CommandKind::UpdateCategory {
            id: 3,
            data: Some(CategoryPatch {
                name: Some("Income".into()),
                currency_code: Some("EUR".into()),
                group_id: Some(Some(1)),
                rules: Some(None),
                ..CategoryPatch::default()
            }),
            index: None,
            link_transaction_details: None,
        }),
        cmd(CommandKind::UpdateCategory {
            id: 3,
            data: None,
            index: Some(0),
            link_transaction_details: None,
        }),
        cmd(CommandKind::UpdateCategory {
            id: 2,
            data: Some(CategoryPatch {
                notes: Some("weekends only".into()),
                ..CategoryPatch::default()
            }),
            index: None,
            link_transaction_details: None,
        }),
        // Transactions.
        cmd(CommandKind::UpdateTransaction {
            id: 1,
            data: TransactionPatch {
                date: Some(Some(date(2017, 1, 10))),
                account_id: Some(Some(1)),
                who: Some("Landlord".into()),
                detail: Some(vec![euro(-60_000, Some(1))]),
                ..TransactionPatch::default()
            },
        }),
        cmd(CommandKind::UpdateTransaction {
            id: 2,
            data: TransactionPatch {
                date: Some(Some(date(2017, 1, 14))),
                account_id: Some(Some(1)),
                detail: Some(vec![euro(-2_500, Some(2)), euro(-1_500, None)]),
                ..TransactionPatch::default()
            },
        }),
        cmd(CommandKind::UpdateTransaction {
            id: 3,
            data: TransactionPatch {
                who: Some("Unknown payee".into()),
                detail: Some(vec![euro(-700, None)]),
                ..TransactionPatch::default()
            },
        }),
        cmd(CommandKind::UpdateAccount {
            id: 3,
            data: Some(AccountPatch {
                name: Some("Cash".into()),
                currency_code: Some("EUR".into()),
                ..AccountPatch::default()
            }),
            index: None,
            link_null_transactions: Some(vec![3]),
        }),
        cmd(CommandKind::UpdateTransaction {
            id: 2,
            data: TransactionPatch {
                date: Some(Some(date(2017, 2, 2))),
                ..TransactionPatch::default()
            },
        }),
        cmd(CommandKind::DeleteTransaction { id: 1 }),
        cmd(CommandKind::UpdateMultipleTransactions {
            sub_actions: vec![
                cmd(CommandKind::UpdateTransaction {
                    id: 4,
                    data: TransactionPatch {
                        date: Some(Some(date(2017, 3, 1))),
                        account_id: Some(Some(1)),
                        detail: Some(vec![euro(150_000, Some(3))]),
                        ..TransactionPatch::default()
                    },
                }),
                cmd(CommandKind::UpdateTransaction {
                    id: 2,
                    data: TransactionPatch {
                        pending: Some(true),
                        ..TransactionPatch::default()
                    },
                }),
                cmd(CommandKind::DeleteTransaction { id: 3 }),
            ],
        }),
        // Restructuring.
        cmd(CommandKind::UpdateCategory {
            id: 2,
            data: Some(CategoryPatch {
                group_id: Some(Some(1)),
                ..CategoryPatch::default()
            }),
            index: None,
            link_transaction_details: None,
        }),
        cmd(CommandKind::DeleteCategory { id: 3 }),
        cmd(CommandKind::DeleteCategoryGroup { id: 2 }),
        cmd(CommandKind::DeleteAccount { id: 1 }),
        cmd(CommandKind::Noop),
    ];
    assert_eq!(commands.len(), 26);

    // Apply forward, collecting the inverse of each command against its
    // pre-state and checking the stepwise round trip as we go.
    let mut state = initial.clone();
    let mut inverses = Vec::new();
    for command in &commands {
        let inverse = invert(&state, command)
            .expect("invert succeeds")
            .expect("command targets this budget");
        let next = reduce(state.clone(), command).expect("forward reduce");
        let restored = reduce(next.clone(), &inverse).expect("stepwise undo");
        assert_eq!(restored, state, "stepwise undo failed for {:?}", command.kind);
        inverses.push(inverse);
        state = next;
    }

    // Spot-check the final state.
    assert_eq!(state.name(), "Family");
    assert_eq!(state.currency_code(), "EUR");
    assert!(state.account(1).is_none());
    assert_eq!(state.accounts().len(), 2);
    assert_eq!(state.category_groups().len(), 1);
    assert_eq!(category_ids(&state), vec![1, 2]);
    assert_eq!(transaction_ids(&state), vec![2, 4]);
    // Deleting account 1 detached its transactions.
    assert!(state.transactions().iter().all(|t| t.account_id != Some(1)));

    // Replay the inverses in reverse order; the empty budget must return.
    for inverse in inverses.iter().rev() {
        state = reduce(state, inverse).expect("unwind");
    }
    assert_eq!(state, initial);
}
