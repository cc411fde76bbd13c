//! Balance calculation
//!
//! Nets every expense into a running total per participant: the payer is
//! credited with the full amount and each covered participant is debited with
//! their split.

use std::collections::HashMap;

use crate::models::{Balance, Expense, Money, Participant, ParticipantId};

/// Compute net balances for a group
///
/// One balance is returned per entry of `participants`, in the order given,
/// followed by the group owner. Participants referenced by expenses but absent
/// from the list are still netted but not reported.
pub fn compute_balances(
    expenses: &[Expense],
    participants: &[Participant],
    owner: &Participant,
) -> Vec<Balance> {
    let mut totals: HashMap<ParticipantId, Money> = HashMap::new();

    for expense in expenses {
        *totals.entry(expense.payer_id).or_default() -= expense.amount;
        for split in &expense.splits {
            *totals.entry(split.participant_id).or_default() += split.amount;
        }
    }

    participants
        .iter()
        .filter(|p| p.id != owner.id)
        .chain(std::iter::once(owner))
        .map(|p| {
            let net = totals.get(&p.id).copied().unwrap_or_default();
            Balance::new(p.id, p.name.clone(), net)
        })
        .collect()
}
