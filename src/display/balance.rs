//! Balance and settlement display formatting

use crate::models::{Balance, GroupTotals, Settlement};

use super::column_width;

/// Format net balances as a table
pub fn format_balance_table(balances: &[Balance], symbol: &str) -> String {
    let name_width = column_width(
        "Participant",
        balances.iter().map(|b| b.participant_name.as_str()),
    );

    let mut output = format!(
        "{:<name_width$}  {:>12}  {}\n",
        "Participant", "Balance", "Status",
    );
    output.push_str(&format!("{:-<name_width$}  {:->12}  {:-<10}\n", "", "", ""));

    for balance in balances {
        let status = if balance.net_balance.is_negligible() {
            "settled"
        } else if balance.owes() {
            "owes"
        } else {
            "is owed"
        };
        output.push_str(&format!(
            "{:<name_width$}  {:>12}  {}\n",
            balance.participant_name,
            balance.net_balance.format_with_symbol(symbol),
            status,
        ));
    }

    output
}

/// Format suggested transfers, resolving names from the balances
pub fn format_settlements(settlements: &[Settlement], balances: &[Balance], symbol: &str) -> String {
    if settlements.is_empty() {
        return "All balances are settled!\n".to_string();
    }

    let name = |id| {
        balances
            .iter()
            .find(|b| b.participant_id == id)
            .map(|b| b.participant_name.as_str())
            .unwrap_or("Someone")
    };

    settlements
        .iter()
        .enumerate()
        .map(|(i, s)| {
            format!(
                "{}. {} pays {} {}\n",
                i + 1,
                name(s.from),
                name(s.to),
                s.amount.format_with_symbol(symbol)
            )
        })
        .collect()
}

/// Format group totals from the user's point of view
pub fn format_totals(totals: &GroupTotals, symbol: &str) -> String {
    format!(
        "Total spent:      {:>12}\nYou owe:          {:>12}\nYou are owed:     {:>12}\n",
        totals.total_spent.format_with_symbol(symbol),
        totals.total_owed.format_with_symbol(symbol),
        totals.total_owed_to_user.format_with_symbol(symbol),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, ParticipantId};

    #[test]
    fn test_balance_table_status() {
        let balances = vec![
            Balance::new(ParticipantId::new(), "Bob", Money::from_cents(3333)),
            Balance::new(ParticipantId::new(), "Carol", Money::from_cents(1)),
            Balance::new(ParticipantId::new(), "Alice", Money::from_cents(-3334)),
        ];
        let output = format_balance_table(&balances, "$");
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[2].ends_with("owes"));
        assert!(lines[3].ends_with("settled"));
        assert!(lines[4].contains("-$33.34"));
        assert!(lines[4].ends_with("is owed"));
    }

    #[test]
    fn test_settlement_lines() {
        let bob = Balance::new(ParticipantId::new(), "Bob", Money::from_cents(500));
        let alice = Balance::new(ParticipantId::new(), "Alice", Money::from_cents(-500));
        let settlements = vec![Settlement::new(
            bob.participant_id,
            alice.participant_id,
            Money::from_cents(500),
        )];

        assert_eq!(
            format_settlements(&settlements, &[bob, alice], "$"),
            "1. Bob pays Alice $5.00\n"
        );
        assert_eq!(format_settlements(&[], &[], "$"), "All balances are settled!\n");
    }

    #[test]
    fn test_totals() {
        let totals = GroupTotals {
            total_spent: Money::from_cents(10000),
            total_owed: Money::zero(),
            total_owed_to_user: Money::from_cents(6666),
        };
        let output = format_totals(&totals, "$");
        assert!(output.contains("$100.00"));
        assert!(output.contains("$66.66"));
    }
}
