//! Split allocation
//!
//! Turns an expense amount and a split mode into per-participant amounts.

use std::collections::HashSet;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, ParticipantId, Split, SplitData, SplitMode};

/// Compute the per-participant splits of an expense
///
/// - `Equal`: every participant gets `amount / n` rounded to the cent and the
///   first listed participant absorbs the remainder, so the splits always sum
///   to `amount` exactly.
/// - `Custom`: the supplied amounts are used as given.
/// - `Percentage`: each share is `amount * pct / 100` rounded to the cent.
///
/// Custom and percentage inputs are not checked against the total here; see
/// [`validate_splits`].
///
/// # Errors
///
/// `InvalidSplitConfiguration` when equal mode has no participants, or when
/// custom / percentage mode is missing its data.
pub fn compute_splits(
    amount: Money,
    mode: SplitMode,
    participant_ids: &[ParticipantId],
    data: &SplitData,
) -> LedgerResult<Vec<Split>> {
    match mode {
        SplitMode::Equal => equal_splits(amount, participant_ids),
        SplitMode::Custom => {
            let amounts = data.custom_amounts.as_ref().ok_or_else(|| {
                LedgerError::InvalidSplitConfiguration(
                    "custom split mode requires custom amounts".into(),
                )
            })?;
            Ok(amounts
                .iter()
                .map(|c| Split::new(c.participant_id, c.amount))
                .collect())
        }
        SplitMode::Percentage => {
            let shares = data.percentages.as_ref().ok_or_else(|| {
                LedgerError::InvalidSplitConfiguration(
                    "percentage split mode requires percentages".into(),
                )
            })?;
            shares
                .iter()
                .map(|share| {
                    amount
                        .mul_ratio_rounded(share.percentage.basis_points(), 10_000)
                        .map(|value| Split::new(share.participant_id, value))
                        .ok_or_else(|| {
                            LedgerError::InvalidSplitConfiguration(
                                "percentage denominator is zero".into(),
                            )
                        })
                })
                .collect()
        }
    }
}

fn equal_splits(amount: Money, participant_ids: &[ParticipantId]) -> LedgerResult<Vec<Split>> {
    let share = amount.div_rounded(participant_ids.len()).ok_or_else(|| {
        LedgerError::InvalidSplitConfiguration(
            "equal split mode requires at least one participant".into(),
        )
    })?;

    let mut splits: Vec<Split> = participant_ids
        .iter()
        .map(|id| Split::new(*id, share))
        .collect();

    let allocated: Money = splits.iter().map(|s| s.amount).sum();
    let remainder = amount - allocated;
    if let Some(first) = splits.first_mut() {
        first.amount += remainder;
    }

    Ok(splits)
}

/// Check resolved splits against the expense amount
///
/// Splits must be non-negative, name each participant at most once, and sum to
/// `amount` within [`Money::TOLERANCE`].
pub fn validate_splits(amount: Money, splits: &[Split]) -> LedgerResult<()> {
    if splits.is_empty() {
        return Err(LedgerError::InvalidSplitConfiguration(
            "expense has no splits".into(),
        ));
    }

    let mut seen = HashSet::new();
    for split in splits {
        if split.amount.is_negative() {
            return Err(LedgerError::InvalidSplitConfiguration(format!(
                "split for {} is negative ({})",
                split.participant_id, split.amount
            )));
        }
        if !seen.insert(split.participant_id) {
            return Err(LedgerError::InvalidSplitConfiguration(format!(
                "participant {} appears in more than one split",
                split.participant_id
            )));
        }
    }

    let total = splits
        .iter()
        .try_fold(Money::zero(), |acc, s| acc.checked_add(s.amount))
        .ok_or_else(|| {
            LedgerError::InvalidSplitConfiguration("splits overflow the amount range".into())
        })?;
    if (total - amount).abs() > Money::TOLERANCE {
        return Err(LedgerError::InvalidSplitConfiguration(format!(
            "splits total {} but the expense amount is {}",
            total, amount
        )));
    }

    Ok(())
}
