//! Expense service
//!
//! Validates expense commands against the group, resolves splits with the
//! engine and persists the result.

use chrono::NaiveDate;

use crate::audit::{generate_diff, EntityType};
use crate::engine::{compute_splits, validate_splits};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Expense, ExpenseId, Group, GroupId, Money, ParticipantId, Split, SplitData, SplitMode,
};
use crate::storage::Storage;

/// Command for recording a new expense
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub group_id: GroupId,
    pub amount: Money,
    pub description: String,
    pub date: NaiveDate,
    pub payer_id: ParticipantId,
    pub participant_ids: Vec<ParticipantId>,
    pub split_mode: SplitMode,
    pub split_data: SplitData,
}

/// Changes to apply to an expense; `None` leaves a field untouched
///
/// Splits are recomputed when the amount, participants, split mode or split
/// data change.
#[derive(Debug, Clone, Default)]
pub struct ExpenseUpdate {
    pub amount: Option<Money>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub payer_id: Option<ParticipantId>,
    pub participant_ids: Option<Vec<ParticipantId>>,
    pub split_mode: Option<SplitMode>,
    pub split_data: Option<SplitData>,
}

impl ExpenseUpdate {
    fn changes_splits(&self) -> bool {
        self.amount.is_some()
            || self.participant_ids.is_some()
            || self.split_mode.is_some()
            || self.split_data.is_some()
    }
}

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
    strict: bool,
}

impl<'a> ExpenseService<'a> {
    /// Create an expense service that rejects splits not adding up to the amount
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            strict: true,
        }
    }

    /// Turn split total checking on or off
    pub fn with_strict_validation(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Record a new expense
    pub fn create(&self, command: NewExpense) -> LedgerResult<Expense> {
        let group = self.group(command.group_id)?;

        let mut expense = Expense::new(
            command.group_id,
            command.amount,
            command.description.trim(),
            command.date,
            command.payer_id,
        );
        let splits = self.resolve_splits(
            &group,
            command.amount,
            command.payer_id,
            &command.participant_ids,
            command.split_mode,
            &command.split_data,
        )?;
        expense.split_data = stored_split_data(command.split_mode, command.split_data);
        expense.set_splits(command.split_mode, command.participant_ids, splits);

        expense
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;

        self.storage.log_create(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &expense,
        )?;

        Ok(expense)
    }

    pub fn get(&self, id: ExpenseId) -> LedgerResult<Option<Expense>> {
        self.storage.expenses.get(id)
    }

    /// Find an expense in a group by ID string
    pub fn find(&self, group_id: GroupId, identifier: &str) -> LedgerResult<Option<Expense>> {
        Ok(self
            .list(group_id)?
            .into_iter()
            .find(|e| e.id.matches(identifier)))
    }

    /// Like `find`, but a miss is an error
    pub fn require(&self, group_id: GroupId, identifier: &str) -> LedgerResult<Expense> {
        self.find(group_id, identifier)?
            .ok_or_else(|| LedgerError::expense_not_found(identifier))
    }

    /// A group's expenses ordered by date
    pub fn list(&self, group_id: GroupId) -> LedgerResult<Vec<Expense>> {
        self.storage.expenses.get_by_group(group_id)
    }

    /// Apply an update, recomputing splits when needed
    pub fn update(&self, id: ExpenseId, update: ExpenseUpdate) -> LedgerResult<Expense> {
        let mut expense = self
            .get(id)?
            .ok_or_else(|| LedgerError::expense_not_found(id.to_string()))?;
        let group = self.group(expense.group_id)?;
        let before = expense.clone();
        let recompute = update.changes_splits();

        if let Some(amount) = update.amount {
            expense.amount = amount;
        }
        if let Some(description) = update.description {
            expense.description = description.trim().to_string();
        }
        if let Some(date) = update.date {
            expense.date = date;
        }
        if let Some(payer_id) = update.payer_id {
            if !group.is_member(payer_id) {
                return Err(LedgerError::Validation(format!(
                    "Payer {} is not a member of {}",
                    payer_id, group.name
                )));
            }
            expense.payer_id = payer_id;
        }

        if recompute {
            let mode = update.split_mode.unwrap_or(expense.split_mode);
            let participant_ids = update
                .participant_ids
                .unwrap_or_else(|| expense.participant_ids.clone());
            let data = match update.split_data {
                Some(data) => data,
                None if mode == expense.split_mode => expense.split_data.clone(),
                None => SplitData::none(),
            };

            let splits = self.resolve_splits(
                &group,
                expense.amount,
                expense.payer_id,
                &participant_ids,
                mode,
                &data,
            )?;
            expense.split_data = stored_split_data(mode, data);
            expense.set_splits(mode, participant_ids, splits);
        } else {
            expense.touch();
        }

        expense
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;

        let diff = match (
            serde_json::to_value(&before),
            serde_json::to_value(&expense),
        ) {
            (Ok(mut old), Ok(mut new)) => {
                strip_timestamps(&mut old);
                strip_timestamps(&mut new);
                generate_diff(&old, &new)
            }
            _ => None,
        };
        self.storage.log_update(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &before,
            &expense,
            diff,
        )?;

        Ok(expense)
    }

    pub fn delete(&self, id: ExpenseId) -> LedgerResult<Expense> {
        let expense = self
            .storage
            .expenses
            .delete(id)?
            .ok_or_else(|| LedgerError::expense_not_found(id.to_string()))?;
        self.storage.expenses.save()?;

        self.storage.log_delete(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &expense,
        )?;

        Ok(expense)
    }

    fn group(&self, group_id: GroupId) -> LedgerResult<Group> {
        self.storage
            .groups
            .get(group_id)?
            .ok_or_else(|| LedgerError::group_not_found(group_id.to_string()))
    }

    /// Check the command against the group and compute its splits
    fn resolve_splits(
        &self,
        group: &Group,
        amount: Money,
        payer_id: ParticipantId,
        participant_ids: &[ParticipantId],
        mode: SplitMode,
        data: &SplitData,
    ) -> LedgerResult<Vec<Split>> {
        if !amount.is_positive() {
            return Err(LedgerError::Validation(format!(
                "Expense amount must be positive, got {}",
                amount
            )));
        }

        if !amount.is_within_limit() {
            return Err(LedgerError::Validation(format!(
                "Expense amount {} exceeds the maximum of {}",
                amount,
                Money::MAX_AMOUNT
            )));
        }

        if !group.is_member(payer_id) {
            return Err(LedgerError::Validation(format!(
                "Payer {} is not a member of {}",
                payer_id, group.name
            )));
        }

        if participant_ids.is_empty() {
            return Err(LedgerError::Validation(
                "Expense must cover at least one participant".into(),
            ));
        }

        for (index, id) in participant_ids.iter().enumerate() {
            if !group.is_member(*id) {
                return Err(LedgerError::Validation(format!(
                    "{} is not a member of {}",
                    id, group.name
                )));
            }
            if participant_ids[..index].contains(id) {
                return Err(LedgerError::Validation(format!(
                    "{} is listed more than once",
                    id
                )));
            }
        }

        let named: Vec<ParticipantId> = match mode {
            SplitMode::Equal => Vec::new(),
            SplitMode::Custom => data
                .custom_amounts
                .iter()
                .flatten()
                .map(|c| c.participant_id)
                .collect(),
            SplitMode::Percentage => data
                .percentages
                .iter()
                .flatten()
                .map(|p| p.participant_id)
                .collect(),
        };
        if let Some(stranger) = named.iter().find(|id| !participant_ids.contains(id)) {
            return Err(LedgerError::InvalidSplitConfiguration(format!(
                "{} has a share but is not covered by the expense",
                stranger
            )));
        }

        if let Some(share) = data
            .custom_amounts
            .iter()
            .flatten()
            .find(|c| !c.amount.is_within_limit())
        {
            return Err(LedgerError::InvalidSplitConfiguration(format!(
                "custom amount {} for {} must be between $0.00 and {}",
                share.amount,
                share.participant_id,
                Money::MAX_AMOUNT
            )));
        }
        if let Some(share) = data
            .percentages
            .iter()
            .flatten()
            .find(|p| !p.percentage.is_valid())
        {
            return Err(LedgerError::InvalidSplitConfiguration(format!(
                "percentage {} for {} must be between 0% and 100%",
                share.percentage, share.participant_id
            )));
        }

        let splits = compute_splits(amount, mode, participant_ids, data)?;
        if self.strict {
            validate_splits(amount, &splits)?;
        }
        Ok(splits)
    }
}

/// Equal splits carry no data worth keeping
fn stored_split_data(mode: SplitMode, data: SplitData) -> SplitData {
    match mode {
        SplitMode::Equal => SplitData::none(),
        SplitMode::Custom => SplitData {
            custom_amounts: data.custom_amounts,
            percentages: None,
        },
        SplitMode::Percentage => SplitData {
            custom_amounts: None,
            percentages: data.percentages,
        },
    }
}

fn strip_timestamps(value: &mut serde_json::Value) {
    if let Some(object) = value.as_object_mut() {
        object.remove("created_at");
        object.remove("updated_at");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CustomAmount, Percentage, PercentageShare, User};
    use crate::services::testing::create_test_storage;
    use crate::services::{GroupService, UserService};

    struct Fixture {
        group: Group,
        owner: ParticipantId,
        bob: ParticipantId,
        carol: ParticipantId,
    }

    fn setup(storage: &Storage) -> Fixture {
        let user: User = UserService::new(storage).create("Alice", None).unwrap();
        let group = GroupService::new(storage)
            .create(user.id, "Trip", &["Bob".to_string(), "Carol".to_string()])
            .unwrap();
        Fixture {
            owner: user.participant_id(),
            bob: group.participant_ids[0],
            carol: group.participant_ids[1],
            group,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 2).unwrap()
    }

    fn dinner(f: &Fixture) -> NewExpense {
        NewExpense {
            group_id: f.group.id,
            amount: Money::from_cents(10000),
            description: "Dinner".into(),
            date: date(),
            payer_id: f.owner,
            participant_ids: vec![f.owner, f.bob, f.carol],
            split_mode: SplitMode::Equal,
            split_data: SplitData::none(),
        }
    }

    #[test]
    fn test_create_equal() {
        let (_temp, storage) = create_test_storage();
        let f = setup(&storage);
        let service = ExpenseService::new(&storage);

        let expense = service.create(dinner(&f)).unwrap();
        let amounts: Vec<i64> = expense.splits.iter().map(|s| s.amount.cents()).collect();
        assert_eq!(amounts, vec![3334, 3333, 3333]);
        assert!(expense.split_data.is_empty());
        assert_eq!(service.list(f.group.id).unwrap().len(), 1);
    }

    #[test]
    fn test_create_rejects_out_of_range_amounts() {
        let (_temp, storage) = create_test_storage();
        let f = setup(&storage);
        let huge = Money::parse("92233720368547758").unwrap();

        let service = ExpenseService::new(&storage);
        let err = service
            .create(NewExpense {
                amount: huge,
                ..dinner(&f)
            })
            .unwrap_err();
        assert!(err.is_validation());

        // Oversized shares are refused even without split total checking
        let lenient = ExpenseService::new(&storage).with_strict_validation(false);
        let err = lenient
            .create(NewExpense {
                amount: Money::from_cents(10000),
                participant_ids: vec![f.owner, f.bob],
                split_mode: SplitMode::Custom,
                split_data: SplitData::custom(vec![
                    CustomAmount {
                        participant_id: f.owner,
                        amount: huge,
                    },
                    CustomAmount {
                        participant_id: f.bob,
                        amount: huge,
                    },
                ]),
                ..dinner(&f)
            })
            .unwrap_err();
        assert!(err.is_invalid_split());

        let err = lenient
            .create(NewExpense {
                participant_ids: vec![f.owner],
                split_mode: SplitMode::Percentage,
                split_data: SplitData::percentages(vec![PercentageShare {
                    participant_id: f.owner,
                    percentage: Percentage::from_basis_points(i64::MAX),
                }]),
                ..dinner(&f)
            })
            .unwrap_err();
        assert!(err.is_invalid_split());

        assert!(service.list(f.group.id).unwrap().is_empty());

        // The largest allowed amount still sums safely across expenses
        for _ in 0..2 {
            service
                .create(NewExpense {
                    amount: Money::MAX_AMOUNT,
                    ..dinner(&f)
                })
                .unwrap();
        }
        let report = crate::services::BalanceService::new(&storage)
            .report(f.group.id)
            .unwrap();
        assert_eq!(
            report.totals.total_spent,
            Money::from_cents(Money::MAX_AMOUNT.cents() * 2)
        );
    }

    #[test]
    fn test_create_rejects_invalid_commands() {
        let (_temp, storage) = create_test_storage();
        let f = setup(&storage);
        let service = ExpenseService::new(&storage);

        let mut zero = dinner(&f);
        zero.amount = Money::zero();
        assert!(service.create(zero).unwrap_err().is_validation());

        let mut outsider = dinner(&f);
        outsider.payer_id = ParticipantId::new();
        assert!(service.create(outsider).unwrap_err().is_validation());

        let mut nobody = dinner(&f);
        nobody.participant_ids.clear();
        assert!(service.create(nobody).unwrap_err().is_validation());

        let mut twice = dinner(&f);
        twice.participant_ids = vec![f.bob, f.bob];
        assert!(service.create(twice).unwrap_err().is_validation());

        let mut blank = dinner(&f);
        blank.description = "  ".into();
        assert!(service.create(blank).unwrap_err().is_validation());

        assert!(service.list(f.group.id).unwrap().is_empty());
    }

    #[test]
    fn test_custom_split_strictness() {
        let (_temp, storage) = create_test_storage();
        let f = setup(&storage);

        let mut command = dinner(&f);
        command.split_mode = SplitMode::Custom;
        command.participant_ids = vec![f.bob, f.carol];
        command.split_data = SplitData::custom(vec![
            CustomAmount {
                participant_id: f.bob,
                amount: Money::from_cents(6000),
            },
            CustomAmount {
                participant_id: f.carol,
                amount: Money::from_cents(3000),
            },
        ]);

        let strict = ExpenseService::new(&storage);
        assert!(strict.create(command.clone()).unwrap_err().is_invalid_split());

        let lenient = ExpenseService::new(&storage).with_strict_validation(false);
        let expense = lenient.create(command).unwrap();
        assert_eq!(expense.splits_total(), Money::from_cents(9000));
    }

    #[test]
    fn test_split_data_must_name_covered_participants() {
        let (_temp, storage) = create_test_storage();
        let f = setup(&storage);

        let mut command = dinner(&f);
        command.split_mode = SplitMode::Percentage;
        command.participant_ids = vec![f.bob];
        command.split_data = SplitData::percentages(vec![
            PercentageShare {
                participant_id: f.bob,
                percentage: Percentage::from_basis_points(5000),
            },
            PercentageShare {
                participant_id: f.carol,
                percentage: Percentage::from_basis_points(5000),
            },
        ]);

        let err = ExpenseService::new(&storage).create(command).unwrap_err();
        assert!(err.is_invalid_split());
    }

    #[test]
    fn test_missing_split_data() {
        let (_temp, storage) = create_test_storage();
        let f = setup(&storage);

        let mut command = dinner(&f);
        command.split_mode = SplitMode::Custom;
        let err = ExpenseService::new(&storage).create(command).unwrap_err();
        assert!(err.is_invalid_split());
    }

    #[test]
    fn test_update_recomputes_with_stored_percentages() {
        let (_temp, storage) = create_test_storage();
        let f = setup(&storage);
        let service = ExpenseService::new(&storage);

        let mut command = dinner(&f);
        command.split_mode = SplitMode::Percentage;
        command.participant_ids = vec![f.owner, f.bob];
        command.split_data = SplitData::percentages(vec![
            PercentageShare {
                participant_id: f.owner,
                percentage: Percentage::from_basis_points(7500),
            },
            PercentageShare {
                participant_id: f.bob,
                percentage: Percentage::from_basis_points(2500),
            },
        ]);
        let expense = service.create(command).unwrap();

        let updated = service
            .update(
                expense.id,
                ExpenseUpdate {
                    amount: Some(Money::from_cents(2000)),
                    ..ExpenseUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(updated.split_for(f.owner), Some(Money::from_cents(1500)));
        assert_eq!(updated.split_for(f.bob), Some(Money::from_cents(500)));

        let log = storage.audit().read_recent(1).unwrap();
        let diff = log[0].diff_summary.as_deref().unwrap();
        assert!(diff.contains("amount: 10000 -> 2000"));
        assert!(!diff.contains("updated_at"));
    }

    #[test]
    fn test_update_switch_to_equal_and_description_only() {
        let (_temp, storage) = create_test_storage();
        let f = setup(&storage);
        let service = ExpenseService::new(&storage);
        let expense = service.create(dinner(&f)).unwrap();

        let renamed = service
            .update(
                expense.id,
                ExpenseUpdate {
                    description: Some("Late dinner".into()),
                    ..ExpenseUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(renamed.description, "Late dinner");
        assert_eq!(renamed.splits, expense.splits);

        let narrowed = service
            .update(
                expense.id,
                ExpenseUpdate {
                    participant_ids: Some(vec![f.bob, f.carol]),
                    ..ExpenseUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(narrowed.split_for(f.bob), Some(Money::from_cents(5000)));
        assert_eq!(narrowed.split_for(f.owner), None);

        let err = service
            .update(
                expense.id,
                ExpenseUpdate {
                    payer_id: Some(ParticipantId::new()),
                    ..ExpenseUpdate::default()
                },
            )
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_find_and_delete() {
        let (_temp, storage) = create_test_storage();
        let f = setup(&storage);
        let service = ExpenseService::new(&storage);
        let expense = service.create(dinner(&f)).unwrap();

        let found = service.require(f.group.id, &expense.id.to_string()).unwrap();
        assert_eq!(found.id, expense.id);
        assert!(service
            .require(GroupId::new(), &expense.id.to_string())
            .unwrap_err()
            .is_not_found());

        service.delete(expense.id).unwrap();
        assert!(service.get(expense.id).unwrap().is_none());
        assert!(service.delete(expense.id).unwrap_err().is_not_found());
    }
}
