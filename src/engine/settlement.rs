//! Settlement planning
//!
//! Greedy two-pointer pairing of the largest debtor with the largest creditor.
//! Not always the theoretical minimum number of transfers, but never more than
//! one fewer than the number of unsettled participants.

use crate::models::{Balance, Money, ParticipantId, Settlement};

/// Plan the transfers that settle a set of balances
///
/// Balances within a cent of zero are treated as settled and left out.
pub fn plan_settlements(balances: &[Balance]) -> Vec<Settlement> {
    let mut open: Vec<(ParticipantId, Money)> = balances
        .iter()
        .filter(|b| !b.net_balance.is_negligible())
        .map(|b| (b.participant_id, b.net_balance))
        .collect();

    // Stable: ties keep their input order
    open.sort_by(|a, b| b.1.cmp(&a.1));

    let mut settlements = Vec::new();
    if open.len() < 2 {
        return settlements;
    }

    let mut i = 0;
    let mut j = open.len() - 1;

    while i < j {
        if open[i].1.is_zero() {
            i += 1;
            continue;
        }
        if open[j].1.is_zero() {
            j -= 1;
            continue;
        }

        let (debtor, debt) = open[i];
        let (creditor, credit) = open[j];
        if !debt.is_positive() || !credit.is_negative() {
            break;
        }

        let amount = debt.min(credit.abs());
        settlements.push(Settlement::new(debtor, creditor, amount));

        open[i].1 -= amount;
        open[j].1 += amount;

        if open[i].1.is_zero() {
            i += 1;
        }
        if open[j].1.is_zero() {
            j -= 1;
        }
    }

    settlements
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balance(cents: i64) -> Balance {
        Balance::new(ParticipantId::new(), "P", Money::from_cents(cents))
    }

    #[test]
    fn test_two_debtors_one_creditor() {
        let balances = vec![balance(3333), balance(3333), balance(-6666)];
        let plan = plan_settlements(&balances);

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].from, balances[0].participant_id);
        assert_eq!(plan[0].to, balances[2].participant_id);
        assert_eq!(plan[0].amount, Money::from_cents(3333));
        assert_eq!(plan[1].from, balances[1].participant_id);
        assert_eq!(plan[1].amount, Money::from_cents(3333));
    }

    #[test]
    fn test_most_negative_creditor_paid_first() {
        // X owes 50, Y is owed 30, Z is owed 20; descending order puts Y last
        let balances = vec![balance(5000), balance(-3000), balance(-2000)];
        let plan = plan_settlements(&balances);

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].from, balances[0].participant_id);
        assert_eq!(plan[0].to, balances[1].participant_id);
        assert_eq!(plan[0].amount, Money::from_cents(3000));
        assert_eq!(plan[1].from, balances[0].participant_id);
        assert_eq!(plan[1].to, balances[2].participant_id);
        assert_eq!(plan[1].amount, Money::from_cents(2000));
    }

    #[test]
    fn test_negligible_balances_dropped() {
        assert!(plan_settlements(&[balance(1), balance(-1)]).is_empty());
        assert!(plan_settlements(&[balance(0), balance(0), balance(0)]).is_empty());
        assert!(plan_settlements(&[]).is_empty());
    }

    #[test]
    fn test_residue_never_pairs_two_debtors() {
        // Unbalanced input: 8.00 of debt against 2.00 of credit
        let balances = vec![balance(500), balance(300), balance(-200)];
        let plan = plan_settlements(&balances);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].from, balances[0].participant_id);
        assert_eq!(plan[0].amount, Money::from_cents(200));
        assert!(plan.iter().all(|s| s.from != s.to && s.amount.is_positive()));
    }

    #[test]
    fn test_settlements_clear_all_balances() {
        let balances = vec![balance(2500), balance(-4000), balance(1500), balance(0)];
        let plan = plan_settlements(&balances);
        assert!(plan.len() <= 2);

        let mut remaining: Vec<(ParticipantId, Money)> = balances
            .iter()
            .map(|b| (b.participant_id, b.net_balance))
            .collect();
        for s in &plan {
            for entry in remaining.iter_mut() {
                if entry.0 == s.from {
                    entry.1 -= s.amount;
                }
                if entry.0 == s.to {
                    entry.1 += s.amount;
                }
            }
        }
        assert!(remaining.iter().all(|(_, m)| m.is_negligible()));
    }
}
