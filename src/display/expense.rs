//! Expense display formatting

use crate::models::{Expense, Participant, ParticipantId};

use super::column_width;

fn name_of(members: &[Participant], id: ParticipantId) -> String {
    members
        .iter()
        .find(|p| p.id == id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| id.to_string())
}

/// Format a group's expenses as a table
pub fn format_expense_list(expenses: &[Expense], members: &[Participant], symbol: &str) -> String {
    if expenses.is_empty() {
        return "No expenses recorded.".to_string();
    }

    let payers: Vec<String> = expenses
        .iter()
        .map(|e| name_of(members, e.payer_id))
        .collect();
    let desc_width = column_width(
        "Description",
        expenses.iter().map(|e| e.description.as_str()),
    )
    .min(40);
    let payer_width = column_width("Paid by", payers.iter().map(String::as_str));

    let mut output = format!(
        "{:<12}  {:<10}  {:<desc_width$}  {:<payer_width$}  {:>12}  {}\n",
        "ID", "Date", "Description", "Paid by", "Amount", "Split",
    );
    output.push_str(&format!(
        "{:-<12}  {:-<10}  {:-<desc_width$}  {:-<payer_width$}  {:->12}  {:-<10}\n",
        "", "", "", "", "", "",
    ));

    for (expense, payer) in expenses.iter().zip(&payers) {
        let description: String = expense.description.chars().take(desc_width).collect();
        output.push_str(&format!(
            "{:<12}  {:<10}  {:<desc_width$}  {:<payer_width$}  {:>12}  {}\n",
            expense.id.to_string(),
            expense.date.format("%Y-%m-%d").to_string(),
            description,
            payer,
            expense.amount.format_with_symbol(symbol),
            expense.split_mode,
        ));
    }

    output
}

/// Format one expense with its per-participant splits
pub fn format_expense_details(expense: &Expense, members: &[Participant], symbol: &str) -> String {
    let mut output = format!("Expense: {}\n", expense.description);
    output.push_str(&format!("  ID:        {}\n", expense.id));
    output.push_str(&format!("  Date:      {}\n", expense.date.format("%Y-%m-%d")));
    output.push_str(&format!(
        "  Amount:    {}\n",
        expense.amount.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Paid by:   {}\n",
        name_of(members, expense.payer_id)
    ));
    output.push_str(&format!("  Split:     {}\n", expense.split_mode));

    output.push_str("\nSplits:\n");
    for split in &expense.splits {
        output.push_str(&format!(
            "  {:<20}  {:>12}\n",
            name_of(members, split.participant_id),
            split.amount.format_with_symbol(symbol)
        ));
    }

    let difference = expense.amount - expense.splits_total();
    if !difference.is_zero() {
        output.push_str(&format!(
            "  (splits differ from the amount by {})\n",
            difference.format_with_symbol(symbol)
        ));
    }

    output
}
