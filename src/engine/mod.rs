//! Ledger engine
//!
//! Pure functions that turn a group's expenses into splits, net balances,
//! suggested settlements and totals. The engine reads its inputs through
//! [`LedgerSource`] so it does not care where expenses are stored.

pub mod balance;
pub mod settlement;
pub mod split;
pub mod totals;

pub use balance::compute_balances;
pub use settlement::plan_settlements;
pub use split::{compute_splits, validate_splits};
pub use totals::compute_totals;

use crate::error::LedgerResult;
use crate::models::{
    Balance, Expense, GroupId, GroupTotals, Participant, ParticipantId, Settlement,
};

/// Read access to the data a group ledger needs
pub trait LedgerSource {
    /// All expenses recorded in a group
    fn group_expenses(&self, group_id: GroupId) -> LedgerResult<Vec<Expense>>;

    /// The group's participants, excluding the owner
    fn group_participants(&self, group_id: GroupId) -> LedgerResult<Vec<Participant>>;

    /// The owning user, expressed as a participant of the group
    fn group_owner(&self, group_id: GroupId) -> LedgerResult<Participant>;
}

/// An immutable snapshot of one group's ledger
#[derive(Debug, Clone)]
pub struct GroupLedger {
    pub group_id: GroupId,
    pub owner: Participant,
    pub participants: Vec<Participant>,
    pub expenses: Vec<Expense>,
}

impl GroupLedger {
    /// Load a snapshot from a source
    pub fn load<S: LedgerSource + ?Sized>(source: &S, group_id: GroupId) -> LedgerResult<Self> {
        Ok(Self {
            group_id,
            owner: source.group_owner(group_id)?,
            participants: source.group_participants(group_id)?,
            expenses: source.group_expenses(group_id)?,
        })
    }

    /// Net balance per participant, owner last
    pub fn balances(&self) -> Vec<Balance> {
        compute_balances(&self.expenses, &self.participants, &self.owner)
    }

    /// Suggested transfers that settle the group
    pub fn settlements(&self) -> Vec<Settlement> {
        plan_settlements(&self.balances())
    }

    /// Totals from the owner's point of view
    pub fn totals(&self) -> GroupTotals {
        compute_totals(&self.expenses, &self.balances(), self.owner.id)
    }

    /// Look up a participant (owner included) by id
    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        std::iter::once(&self.owner)
            .chain(self.participants.iter())
            .find(|p| p.id == id)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::MemorySource;
    use super::*;
    use crate::models::{Money, SplitData, SplitMode, User};
    use chrono::NaiveDate;

    fn add_expense(
        source: &mut MemorySource,
        group_id: GroupId,
        cents: i64,
        payer: &Participant,
        covered: &[&Participant],
    ) {
        let ids: Vec<_> = covered.iter().map(|p| p.id).collect();
        let amount = Money::from_cents(cents);
        let splits = compute_splits(amount, SplitMode::Equal, &ids, &SplitData::none()).unwrap();
        let mut expense = Expense::new(
            group_id,
            amount,
            "Shared",
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            payer.id,
        );
        expense.set_splits(SplitMode::Equal, ids, splits);
        source.expenses.push(expense);
    }

    #[test]
    fn test_three_way_dinner() {
        let group_id = GroupId::new();
        let user = User::new("Alice");
        let a = user.as_participant(group_id);
        let b = Participant::new(group_id, "Bob");
        let c = Participant::new(group_id, "Carol");

        let mut source = MemorySource::default();
        source.owners.insert(group_id, a.clone());
        source.participants = vec![b.clone(), c.clone()];
        add_expense(&mut source, group_id, 10000, &a, &[&a, &b, &c]);

        let ledger = GroupLedger::load(&source, group_id).unwrap();

        let nets: Vec<i64> = ledger
            .balances()
            .iter()
            .map(|b| b.net_balance.cents())
            .collect();
        assert_eq!(nets, vec![3333, 3333, -6666]);

        let settlements = ledger.settlements();
        assert_eq!(settlements.len(), 2);
        assert!(settlements.iter().all(|s| s.to == a.id));
        assert!(settlements
            .iter()
            .all(|s| s.amount == Money::from_cents(3333)));

        let totals = ledger.totals();
        assert_eq!(totals.total_spent, Money::from_cents(10000));
        assert_eq!(totals.total_owed_to_user, Money::from_cents(6666));
        assert_eq!(totals.total_owed, Money::zero());

        assert_eq!(ledger.participant(b.id).map(|p| p.name.as_str()), Some("Bob"));
    }

    #[test]
    fn test_even_split_between_two() {
        let group_id = GroupId::new();
        let owner = User::new("Owner").as_participant(group_id);
        let friend = Participant::new(group_id, "Friend");

        let mut source = MemorySource::default();
        source.owners.insert(group_id, owner.clone());
        source.participants.push(friend.clone());
        add_expense(&mut source, group_id, 1000, &friend, &[&owner, &friend]);

        let ledger = GroupLedger::load(&source, group_id).unwrap();
        let settlements = ledger.settlements();
        assert_eq!(settlements.len(), 1);
        assert_eq!(settlements[0].from, owner.id);
        assert_eq!(settlements[0].to, friend.id);
        assert_eq!(settlements[0].amount, Money::from_cents(500));
        assert_eq!(ledger.totals().total_owed, Money::from_cents(500));
    }

    #[test]
    fn test_empty_group() {
        let group_id = GroupId::new();
        let mut source = MemorySource::default();
        source
            .owners
            .insert(group_id, User::new("Solo").as_participant(group_id));

        let ledger = GroupLedger::load(&source, group_id).unwrap();
        assert_eq!(ledger.balances().len(), 1);
        assert!(ledger.settlements().is_empty());
        assert_eq!(ledger.totals(), GroupTotals::default());
    }

    #[test]
    fn test_missing_group() {
        let source = MemorySource::default();
        let err = GroupLedger::load(&source, GroupId::new()).unwrap_err();
        assert!(err.is_not_found());
    }
}
