//! Property tests for the ledger engine

use chrono::NaiveDate;
use proptest::prelude::*;

use splitledger::engine::{compute_balances, compute_splits, plan_settlements};
use splitledger::models::{
    Balance, Expense, GroupId, Money, Participant, ParticipantId, SplitData, SplitMode,
};

/// (amount in cents, payer index, bitmask of covered participants)
type RawExpense = (i64, usize, u8);

fn people(n: usize) -> (GroupId, Vec<Participant>) {
    let group_id = GroupId::new();
    let members = (0..n)
        .map(|i| Participant::new(group_id, format!("P{}", i)))
        .collect();
    (group_id, members)
}

fn build_expenses(group_id: GroupId, members: &[Participant], raw: &[RawExpense]) -> Vec<Expense> {
    raw.iter()
        .map(|&(cents, payer, mask)| {
            let covered: Vec<ParticipantId> = members
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1u8 << *i) != 0)
                .map(|(_, p)| p.id)
                .collect();
            let covered = if covered.is_empty() {
                vec![members[0].id]
            } else {
                covered
            };

            let amount = Money::from_cents(cents);
            let splits =
                compute_splits(amount, SplitMode::Equal, &covered, &SplitData::none()).unwrap();
            let mut expense = Expense::new(
                group_id,
                amount,
                "Shared",
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                members[payer % members.len()].id,
            );
            expense.set_splits(SplitMode::Equal, covered, splits);
            expense
        })
        .collect()
}

fn balances_for(members: &[Participant], expenses: &[Expense]) -> Vec<Balance> {
    let (owner, rest) = members.split_first().unwrap();
    compute_balances(expenses, rest, owner)
}

/// Apply transfers to balances: the payer's debt shrinks, the receiver's credit shrinks
fn apply(balances: &[Balance], plan: &[splitledger::models::Settlement]) -> Vec<i64> {
    balances
        .iter()
        .map(|b| {
            let paid: i64 = plan
                .iter()
                .filter(|s| s.from == b.participant_id)
                .map(|s| s.amount.cents())
                .sum();
            let received: i64 = plan
                .iter()
                .filter(|s| s.to == b.participant_id)
                .map(|s| s.amount.cents())
                .sum();
            b.net_balance.cents() - paid + received
        })
        .collect()
}

fn expense_strategy() -> impl Strategy<Value = RawExpense> {
    (1i64..1_000_000, 0usize..8, any::<u8>())
}

proptest! {
    #[test]
    fn equal_splits_sum_to_amount(cents in 1i64..10_000_000, n in 1usize..10) {
        let ids: Vec<ParticipantId> = (0..n).map(|_| ParticipantId::new()).collect();
        let splits = compute_splits(
            Money::from_cents(cents),
            SplitMode::Equal,
            &ids,
            &SplitData::none(),
        ).unwrap();

        prop_assert_eq!(splits.len(), n);
        prop_assert_eq!(splits.iter().map(|s| s.amount.cents()).sum::<i64>(), cents);
        // Every share but the first is the same rounded quotient
        for split in &splits[1..] {
            prop_assert_eq!(split.amount, splits[1].amount);
        }
    }

    #[test]
    fn balances_sum_to_zero(
        n in 2usize..=4,
        raw in prop::collection::vec(expense_strategy(), 0..20),
    ) {
        let (group_id, members) = people(n);
        let expenses = build_expenses(group_id, &members, &raw);
        let balances = balances_for(&members, &expenses);

        prop_assert_eq!(balances.len(), n);
        prop_assert_eq!(balances.iter().map(|b| b.net_balance.cents()).sum::<i64>(), 0);
    }

    #[test]
    fn settlements_are_well_formed(
        n in 2usize..=4,
        raw in prop::collection::vec(expense_strategy(), 1..20),
    ) {
        let (group_id, members) = people(n);
        let expenses = build_expenses(group_id, &members, &raw);
        let balances = balances_for(&members, &expenses);
        let plan = plan_settlements(&balances);

        let open = balances.iter().filter(|b| !b.net_balance.is_negligible()).count();
        prop_assert!(plan.len() <= open.saturating_sub(1));
        for settlement in &plan {
            prop_assert!(settlement.amount.is_positive());
            prop_assert_ne!(settlement.from, settlement.to);
        }

        // Balances of a cent are left alone, so at most one cent per member can remain
        for residual in apply(&balances, &plan) {
            prop_assert!(residual.abs() <= n as i64, "residual {} cents", residual);
        }
    }

    #[test]
    fn whole_unit_balances_settle_exactly(
        units in prop::collection::vec(-500i64..500, 1..8),
    ) {
        // Close the set with one last balance so everything sums to zero
        let mut cents: Vec<i64> = units.iter().map(|u| u * 100).collect();
        cents.push(-cents.iter().sum::<i64>());

        let balances: Vec<Balance> = cents
            .iter()
            .enumerate()
            .map(|(i, c)| Balance::new(ParticipantId::new(), format!("P{}", i), Money::from_cents(*c)))
            .collect();
        let plan = plan_settlements(&balances);

        let open = cents.iter().filter(|c| **c != 0).count();
        prop_assert!(plan.len() <= open.saturating_sub(1));
        prop_assert!(apply(&balances, &plan).iter().all(|r| *r == 0));
    }
}

#[test]
fn three_way_dinner_scenario() {
    let (group_id, members) = people(3);
    let expenses = build_expenses(group_id, &members, &[(10_000, 0, 0b111)]);

    assert_eq!(
        expenses[0]
            .splits
            .iter()
            .map(|s| s.amount.cents())
            .collect::<Vec<_>>(),
        vec![3334, 3333, 3333]
    );

    let balances = balances_for(&members, &expenses);
    // Owner (P0) is reported last
    let cents: Vec<i64> = balances.iter().map(|b| b.net_balance.cents()).collect();
    assert_eq!(cents, vec![3333, 3333, -6666]);

    let plan = plan_settlements(&balances);
    assert_eq!(plan.len(), 2);
    assert!(plan.iter().all(|s| s.to == members[0].id));
    assert!(plan.iter().all(|s| s.amount == Money::from_cents(3333)));
}
