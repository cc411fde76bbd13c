//! Balance service
//!
//! Runs the ledger engine over a stored group and shapes the result for the
//! CLI: a serializable report and a plain-text summary.

use serde::{Deserialize, Serialize};

use crate::engine::GroupLedger;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Balance, GroupId, GroupTotals, Money, ParticipantId, Settlement};
use crate::storage::Storage;

/// Balances, suggested settlements and totals of one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceReport {
    pub balances: Vec<Balance>,
    pub settlements: Vec<Settlement>,
    pub totals: GroupTotals,
}

impl BalanceReport {
    /// Display name for a participant appearing in the report
    pub fn name_of(&self, id: ParticipantId) -> &str {
        self.balances
            .iter()
            .find(|b| b.participant_id == id)
            .map(|b| b.participant_name.as_str())
            .unwrap_or("Someone")
    }
}

impl From<&GroupLedger> for BalanceReport {
    fn from(ledger: &GroupLedger) -> Self {
        Self {
            balances: ledger.balances(),
            settlements: ledger.settlements(),
            totals: ledger.totals(),
        }
    }
}

/// Service for balance queries
pub struct BalanceService<'a> {
    storage: &'a Storage,
}

impl<'a> BalanceService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn ledger(&self, group_id: GroupId) -> LedgerResult<GroupLedger> {
        GroupLedger::load(self.storage, group_id)
    }

    /// Compute the full balance report for a group
    pub fn report(&self, group_id: GroupId) -> LedgerResult<BalanceReport> {
        Ok(BalanceReport::from(&self.ledger(group_id)?))
    }

    /// Plain-text summary of a group: spending, members, balances, settlements
    pub fn summary(&self, group_id: GroupId, currency_symbol: &str) -> LedgerResult<String> {
        let group = self
            .storage
            .groups
            .get(group_id)?
            .ok_or_else(|| LedgerError::group_not_found(group_id.to_string()))?;
        let ledger = self.ledger(group_id)?;
        let report = BalanceReport::from(&ledger);
        let money = |m: Money| m.format_with_symbol(currency_symbol);

        let count = ledger.expenses.len();
        let mut out = format!("Group Summary for \"{}\":\n\n", group.name);
        out.push_str(&format!(
            "Total Expenses: {} expense{}\n",
            count,
            if count == 1 { "" } else { "s" }
        ));
        out.push_str(&format!(
            "Total Amount: {}\n\n",
            money(report.totals.total_spent)
        ));

        out.push_str(&format!(
            "Participants: {} (including you)\n",
            ledger.participants.len() + 1
        ));
        for participant in &ledger.participants {
            out.push_str(&format!("- {}\n", participant.name));
        }

        out.push_str("\nCurrent Balances:\n");
        for balance in &report.balances {
            let line = if balance.owes() {
                format!(
                    "- {} owes {}",
                    balance.participant_name,
                    money(balance.net_balance)
                )
            } else if balance.is_owed() {
                format!(
                    "- {} is owed {}",
                    balance.participant_name,
                    money(balance.net_balance.abs())
                )
            } else {
                format!("- {} is settled", balance.participant_name)
            };
            out.push_str(&line);
            out.push('\n');
        }

        if report.settlements.is_empty() {
            out.push_str("\nAll balances are settled!\n");
        } else {
            out.push_str("\nSettlement Suggestions:\n");
            for (index, settlement) in report.settlements.iter().enumerate() {
                out.push_str(&format!(
                    "{}. {} should pay {} {}\n",
                    index + 1,
                    report.name_of(settlement.from),
                    report.name_of(settlement.to),
                    money(settlement.amount)
                ));
            }
        }

        Ok(out)
    }
}
