//! Group totals from one participant's point of view

use crate::models::{Balance, Expense, GroupTotals, Money, ParticipantId};

/// Aggregate spending and the user's outstanding position
pub fn compute_totals(
    expenses: &[Expense],
    balances: &[Balance],
    user_participant_id: ParticipantId,
) -> GroupTotals {
    let total_spent: Money = expenses.iter().map(|e| e.amount).sum();

    let user_balance = balances
        .iter()
        .find(|b| b.participant_id == user_participant_id)
        .map(|b| b.net_balance)
        .unwrap_or_default();

    let mut totals = GroupTotals {
        total_spent,
        ..GroupTotals::default()
    };

    if !user_balance.is_negligible() {
        if user_balance.is_positive() {
            totals.total_owed = user_balance;
        } else {
            totals.total_owed_to_user = user_balance.abs();
        }
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GroupId;
    use chrono::NaiveDate;

    fn expense(cents: i64) -> Expense {
        Expense::new(
            GroupId::new(),
            Money::from_cents(cents),
            "Test",
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            ParticipantId::new(),
        )
    }

    #[test]
    fn test_user_is_owed() {
        let user = ParticipantId::new();
        let balances = vec![Balance::new(user, "Me", Money::from_cents(-6666))];
        let totals = compute_totals(&[expense(10000), expense(250)], &balances, user);

        assert_eq!(totals.total_spent, Money::from_cents(10250));
        assert_eq!(totals.total_owed, Money::zero());
        assert_eq!(totals.total_owed_to_user, Money::from_cents(6666));
    }

    #[test]
    fn test_user_owes() {
        let user = ParticipantId::new();
        let balances = vec![Balance::new(user, "Me", Money::from_cents(1200))];
        let totals = compute_totals(&[], &balances, user);
        assert_eq!(totals.total_owed, Money::from_cents(1200));
        assert_eq!(totals.total_owed_to_user, Money::zero());
    }

    #[test]
    fn test_negligible_and_missing_balance() {
        let user = ParticipantId::new();
        let balances = vec![Balance::new(user, "Me", Money::from_cents(-1))];
        assert_eq!(compute_totals(&[], &balances, user), GroupTotals::default());
        assert_eq!(
            compute_totals(&[], &[], ParticipantId::new()),
            GroupTotals::default()
        );
    }
}
