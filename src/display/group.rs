//! Group and participant display formatting

use crate::models::{Group, Money, Participant};

use super::column_width;

/// One row of the group list
pub struct GroupRow<'a> {
    pub group: &'a Group,
    pub expense_count: usize,
    pub total_spent: Money,
}

/// Format the user's groups as a table
pub fn format_group_list(rows: &[GroupRow<'_>], symbol: &str) -> String {
    if rows.is_empty() {
        return "No groups found. Create one with 'splitledger group create'.".to_string();
    }

    let name_width = column_width("Name", rows.iter().map(|r| r.group.name.as_str()));

    let mut output = format!(
        "{:<12}  {:<name_width$}  {:>7}  {:>8}  {:>12}\n",
        "ID", "Name", "Members", "Expenses", "Spent",
    );
    output.push_str(&format!(
        "{:-<12}  {:-<name_width$}  {:->7}  {:->8}  {:->12}\n",
        "", "", "", "", "",
    ));

    for row in rows {
        output.push_str(&format!(
            "{:<12}  {:<name_width$}  {:>7}  {:>8}  {:>12}\n",
            row.group.id.to_string(),
            row.group.name,
            row.group.participant_ids.len() + 1,
            row.expense_count,
            row.total_spent.format_with_symbol(symbol),
        ));
    }

    output
}

/// Format a group's details with its members, owner first
pub fn format_group_details(
    group: &Group,
    members: &[Participant],
    expense_count: usize,
    total_spent: Money,
    symbol: &str,
) -> String {
    let mut output = format!("Group: {}\n", group.name);
    output.push_str(&format!("  ID:        {}\n", group.id));
    output.push_str(&format!(
        "  Created:   {}\n",
        group.created_at.format("%Y-%m-%d")
    ));
    output.push_str(&format!("  Expenses:  {}\n", expense_count));
    output.push_str(&format!(
        "  Spent:     {}\n",
        total_spent.format_with_symbol(symbol)
    ));
    output.push_str("\nMembers:\n");
    output.push_str(&format_participant_list(members, group));
    output
}

/// Format group members as a table, marking the owner
pub fn format_participant_list(members: &[Participant], group: &Group) -> String {
    if members.is_empty() {
        return "No participants.\n".to_string();
    }

    let name_width = column_width("Name", members.iter().map(|p| p.name.as_str()));

    let mut output = format!(
        "  {:<12}  {:<name_width$}  {:<7}  {:<6}  {}\n",
        "ID", "Name", "Color", "Avatar", "Role",
    );
    for member in members {
        let role = if member.id == group.owner_participant_id() {
            "owner"
        } else {
            ""
        };
        output.push_str(&format!(
            "  {:<12}  {:<name_width$}  {:<7}  {:<6}  {}\n",
            member.id.to_string(),
            member.name,
            member.display_color(),
            member.avatar.as_deref().unwrap_or("-"),
            role,
        ));
    }
    output
}
