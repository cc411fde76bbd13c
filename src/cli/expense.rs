//! Expense CLI commands

use chrono::{Local, NaiveDate};
use clap::Subcommand;

use super::{parse_amount, parse_date, resolve_group};
use crate::config::settings::Settings;
use crate::display::expense::{format_expense_details, format_expense_list};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    CustomAmount, GroupId, Participant, ParticipantId, Percentage, PercentageShare, SplitData,
    SplitMode,
};
use crate::services::{
    parse_expense_text, ExpenseService, ExpenseUpdate, NewExpense, ParticipantService,
};
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a new expense
    Add {
        /// Group name or ID
        group: String,
        /// Amount (e.g., "42.50")
        amount: String,
        /// What the money was spent on
        description: String,
        /// Who paid (default: you)
        #[arg(long)]
        payer: Option<String>,
        /// Who the expense covers (default: everyone, or the names in --share)
        #[arg(short, long, value_delimiter = ',')]
        participants: Vec<String>,
        /// Split mode (equal, custom, percentage)
        #[arg(short, long, default_value = "equal")]
        split: String,
        /// Per-participant share as NAME=VALUE (amount or percentage)
        #[arg(long = "share", value_delimiter = ',')]
        shares: Vec<String>,
        /// Expense date (YYYY-MM-DD, default: today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List a group's expenses
    List {
        /// Group name or ID
        group: String,
    },
    /// Show an expense with its splits
    Show {
        /// Group name or ID
        group: String,
        /// Expense ID
        expense: String,
    },
    /// Edit an expense; splits are recomputed when needed
    Edit {
        /// Group name or ID
        group: String,
        /// Expense ID
        expense: String,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(long)]
        payer: Option<String>,
        #[arg(short, long, value_delimiter = ',')]
        participants: Option<Vec<String>>,
        #[arg(short, long)]
        split: Option<String>,
        #[arg(long = "share", value_delimiter = ',')]
        shares: Option<Vec<String>>,
    },
    /// Delete an expense
    Delete {
        /// Group name or ID
        group: String,
        /// Expense ID
        expense: String,
    },
    /// Parse a sentence like "paid $45 for dinner yesterday"
    Parse {
        /// The sentence to parse
        text: String,
        /// Record the parsed expense in this group, split equally
        #[arg(short, long)]
        group: Option<String>,
    },
}

fn parse_split_mode(input: &str) -> LedgerResult<SplitMode> {
    input.parse().map_err(LedgerError::Validation)
}

fn resolve_members(
    service: &ParticipantService<'_>,
    group_id: GroupId,
    names: &[String],
) -> LedgerResult<Vec<ParticipantId>> {
    names
        .iter()
        .map(|name| service.require(group_id, name).map(|p| p.id))
        .collect()
}

/// Split `NAME=VALUE` into its parts
fn split_share(share: &str) -> LedgerResult<(&str, &str)> {
    share
        .split_once('=')
        .map(|(name, value)| (name.trim(), value.trim()))
        .filter(|(name, value)| !name.is_empty() && !value.is_empty())
        .ok_or_else(|| {
            LedgerError::Validation(format!(
                "Invalid share '{}'. Use NAME=VALUE, e.g. Bob=12.50 or Bob=40%",
                share
            ))
        })
}

/// Turn `--share` arguments into split data plus the participants they name
fn build_split_data(
    service: &ParticipantService<'_>,
    group_id: GroupId,
    mode: SplitMode,
    shares: &[String],
) -> LedgerResult<(SplitData, Vec<ParticipantId>)> {
    let mut named = Vec::with_capacity(shares.len());
    match mode {
        SplitMode::Equal => {
            if !shares.is_empty() {
                return Err(LedgerError::InvalidSplitConfiguration(
                    "--share is only used with custom or percentage splits".into(),
                ));
            }
            Ok((SplitData::none(), named))
        }
        SplitMode::Custom => {
            let mut amounts = Vec::with_capacity(shares.len());
            for share in shares {
                let (name, value) = split_share(share)?;
                let participant_id = service.require(group_id, name)?.id;
                amounts.push(CustomAmount {
                    participant_id,
                    amount: parse_amount(value)?,
                });
                named.push(participant_id);
            }
            Ok((SplitData::custom(amounts), named))
        }
        SplitMode::Percentage => {
            let mut percentages = Vec::with_capacity(shares.len());
            for share in shares {
                let (name, value) = split_share(share)?;
                let participant_id = service.require(group_id, name)?.id;
                percentages.push(PercentageShare {
                    participant_id,
                    percentage: Percentage::parse(value).map_err(LedgerError::Validation)?,
                });
                named.push(participant_id);
            }
            Ok((SplitData::percentages(percentages), named))
        }
    }
}

fn ids(members: &[Participant]) -> Vec<ParticipantId> {
    members.iter().map(|p| p.id).collect()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> LedgerResult<()> {
    let service =
        ExpenseService::new(storage).with_strict_validation(settings.strict_split_validation);
    let participants = ParticipantService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        ExpenseCommands::Add {
            group,
            amount,
            description,
            payer,
            participants: names,
            split,
            shares,
            date,
        } => {
            let group = resolve_group(storage, settings, &group)?;
            let mode = parse_split_mode(&split)?;
            let (split_data, named) = build_split_data(&participants, group.id, mode, &shares)?;

            let participant_ids = if !names.is_empty() {
                resolve_members(&participants, group.id, &names)?
            } else if !named.is_empty() {
                named
            } else {
                ids(&participants.members(group.id)?)
            };
            let payer_id = match payer {
                Some(payer) => participants.require(group.id, &payer)?.id,
                None => group.owner_participant_id(),
            };
            let date = match date {
                Some(date) => parse_date(&date)?,
                None => today(),
            };

            let expense = service.create(NewExpense {
                group_id: group.id,
                amount: parse_amount(&amount)?,
                description,
                date,
                payer_id,
                participant_ids,
                split_mode: mode,
                split_data,
            })?;

            let members = participants.members(group.id)?;
            println!("Recorded expense {}", expense.id);
            print!("{}", format_expense_details(&expense, &members, symbol));
        }

        ExpenseCommands::List { group } => {
            let group = resolve_group(storage, settings, &group)?;
            let members = participants.members(group.id)?;
            let expenses = service.list(group.id)?;
            print!("{}", format_expense_list(&expenses, &members, symbol));
        }

        ExpenseCommands::Show { group, expense } => {
            let group = resolve_group(storage, settings, &group)?;
            let members = participants.members(group.id)?;
            let expense = service.require(group.id, &expense)?;
            print!("{}", format_expense_details(&expense, &members, symbol));
        }

        ExpenseCommands::Edit {
            group,
            expense,
            amount,
            description,
            date,
            payer,
            participants: names,
            split,
            shares,
        } => {
            let group = resolve_group(storage, settings, &group)?;
            let found = service.require(group.id, &expense)?;

            let split_mode = split.as_deref().map(parse_split_mode).transpose()?;
            let split_data = match &shares {
                Some(shares) => {
                    let mode = split_mode.unwrap_or(found.split_mode);
                    Some(build_split_data(&participants, group.id, mode, shares)?.0)
                }
                None => None,
            };

            let update = ExpenseUpdate {
                amount: amount.as_deref().map(parse_amount).transpose()?,
                description,
                date: date.as_deref().map(parse_date).transpose()?,
                payer_id: payer
                    .as_deref()
                    .map(|p| participants.require(group.id, p).map(|p| p.id))
                    .transpose()?,
                participant_ids: names
                    .as_deref()
                    .map(|n| resolve_members(&participants, group.id, n))
                    .transpose()?,
                split_mode,
                split_data,
            };

            let updated = service.update(found.id, update)?;
            let members = participants.members(group.id)?;
            println!("Updated expense {}", updated.id);
            print!("{}", format_expense_details(&updated, &members, symbol));
        }

        ExpenseCommands::Delete { group, expense } => {
            let group = resolve_group(storage, settings, &group)?;
            let found = service.require(group.id, &expense)?;
            let deleted = service.delete(found.id)?;
            println!("Deleted expense: {}", deleted);
        }

        ExpenseCommands::Parse { text, group } => {
            let parsed = parse_expense_text(&text, today());
            println!(
                "Amount:      {}",
                parsed
                    .amount
                    .map(|a| a.format_with_symbol(symbol))
                    .unwrap_or_else(|| "(not found)".to_string())
            );
            println!("Description: {}", parsed.description);
            println!("Date:        {}", parsed.date);
            println!("Category:    {}", parsed.category);
            println!("Confidence:  {:.0}%", parsed.confidence * 100.0);

            if let Some(group) = group {
                let group = resolve_group(storage, settings, &group)?;
                let amount = parsed.amount.ok_or_else(|| {
                    LedgerError::Validation(format!("No amount found in '{}'", text))
                })?;
                let expense = service.create(NewExpense {
                    group_id: group.id,
                    amount,
                    description: parsed.description,
                    date: parsed.date,
                    payer_id: group.owner_participant_id(),
                    participant_ids: ids(&participants.members(group.id)?),
                    split_mode: SplitMode::Equal,
                    split_data: SplitData::none(),
                })?;
                println!();
                println!("Recorded expense {} in {}", expense.id, group.name);
            }
        }
    }

    Ok(())
}
