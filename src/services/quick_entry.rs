//! Quick entry parsing
//!
//! Turns a free-form sentence such as "paid $45.50 for dinner at Luigi's
//! yesterday" into a draft expense. Parsing is heuristic and never fails;
//! `confidence` reflects whether an amount was found.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::fmt;

use crate::models::Money;

/// Rough expense category guessed from keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    #[serde(rename = "Food & Dining")]
    FoodAndDining,
    Transportation,
    Accommodation,
    Shopping,
    Entertainment,
    Utilities,
    Other,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::FoodAndDining => "Food & Dining",
            Category::Transportation => "Transportation",
            Category::Accommodation => "Accommodation",
            Category::Shopping => "Shopping",
            Category::Entertainment => "Entertainment",
            Category::Utilities => "Utilities",
            Category::Other => "Other",
        };
        f.write_str(label)
    }
}

/// Checked in order; the first category with a matching keyword wins
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::FoodAndDining,
        &["food", "restaurant", "dinner", "lunch", "breakfast", "eat", "meal"],
    ),
    (
        Category::Transportation,
        &["gas", "fuel", "petrol", "uber", "taxi", "transport", "travel"],
    ),
    (Category::Accommodation, &["hotel", "accommodation", "stay", "room"]),
    (Category::Shopping, &["grocery", "shopping", "store", "buy"]),
    (
        Category::Entertainment,
        &["entertainment", "movie", "concert", "show", "game"],
    ),
    (
        Category::Utilities,
        &["utility", "bill", "electric", "water", "internet", "phone"],
    ),
];

const AMOUNT_KEYWORDS: &[&str] = &["paid", "spent", "cost", "for"];
const DESCRIPTION_KEYWORDS: &[&str] = &["for", "on", "at"];

/// A draft expense extracted from text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedExpense {
    #[serde(with = "optional_decimal")]
    pub amount: Option<Money>,
    pub description: String,
    pub date: NaiveDate,
    pub category: Category,
    pub confidence: f64,
}

/// Parse a sentence describing an expense
///
/// `today` anchors relative dates ("yesterday") and is the fallback date.
pub fn parse_expense_text(text: &str, today: NaiveDate) -> ParsedExpense {
    let lower = text.to_lowercase();
    let amount = find_amount(&lower);

    let description = find_description(text);
    let description = if description.is_empty() {
        "Expense".to_string()
    } else {
        description
    };

    ParsedExpense {
        amount,
        description,
        date: find_date(&lower, today),
        category: categorize(&lower),
        confidence: if amount.is_some() { 0.8 } else { 0.5 },
    }
}

/// Amount after a keyword, after a `$`, or before "dollars"/"bucks"
fn find_amount(lower: &str) -> Option<Money> {
    after_keyword(lower)
        .or_else(|| after_dollar_sign(lower))
        .or_else(|| before_unit(lower))
}

fn after_keyword(lower: &str) -> Option<Money> {
    (0..lower.len())
        .filter(|i| lower.is_char_boundary(*i))
        .find_map(|i| {
            let rest = &lower[i..];
            let keyword = AMOUNT_KEYWORDS.iter().find(|k| rest.starts_with(*k))?;
            let rest = rest[keyword.len()..].trim_start();
            let rest = rest.strip_prefix('$').unwrap_or(rest);
            leading_number(rest).map(|(money, _)| money)
        })
}

fn after_dollar_sign(lower: &str) -> Option<Money> {
    lower
        .match_indices('$')
        .find_map(|(i, _)| leading_number(&lower[i + 1..]).map(|(money, _)| money))
}

fn before_unit(lower: &str) -> Option<Money> {
    (0..lower.len())
        .filter(|i| lower.is_char_boundary(*i))
        .filter(|i| *i == 0 || !lower.as_bytes()[i - 1].is_ascii_digit())
        .find_map(|i| {
            let (money, len) = leading_number(&lower[i..])?;
            let rest = lower[i + len..].trim_start();
            ["dollar", "buck"]
                .iter()
                .any(|unit| rest.starts_with(unit))
                .then_some(money)
        })
}

/// Parse `\d+(\.\d\d)?` at the start of `s`, returning the amount and bytes used
fn leading_number(s: &str) -> Option<(Money, usize)> {
    let digits = s.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    let bytes = s.as_bytes();
    let has_cents = bytes.get(digits) == Some(&b'.')
        && bytes.get(digits + 1).is_some_and(u8::is_ascii_digit)
        && bytes.get(digits + 2).is_some_and(u8::is_ascii_digit);
    let len = if has_cents { digits + 3 } else { digits };

    Money::parse(&s[..len]).ok().map(|money| (money, len))
}

/// Words after "for"/"on"/"at" up to the first number, else the words before it
fn find_description(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let starts_number = |w: &&str| w.starts_with('$') || w.starts_with(|c: char| c.is_ascii_digit());

    let after_keyword = words.iter().enumerate().find_map(|(i, word)| {
        let is_keyword = DESCRIPTION_KEYWORDS
            .iter()
            .any(|k| word.eq_ignore_ascii_case(k));
        if !is_keyword {
            return None;
        }
        let phrase: Vec<&str> = words[i + 1..]
            .iter()
            .take_while(|w| !starts_number(w))
            .copied()
            .collect();
        (!phrase.is_empty()).then(|| phrase.join(" "))
    });
    if let Some(description) = after_keyword {
        return description;
    }

    match words.iter().position(|w| starts_number(w)) {
        Some(index) if index > 0 => words[..index].join(" "),
        _ => text.trim().to_string(),
    }
}

fn categorize(lower: &str) -> Category {
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}

fn find_date(lower: &str, today: NaiveDate) -> NaiveDate {
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric() && c != '/')
        .filter(|w| !w.is_empty())
        .collect();

    if words.iter().any(|w| *w == "yesterday" || *w == "yday") {
        return today - Duration::days(1);
    }
    if words.iter().any(|w| *w == "today" || *w == "now") {
        return today;
    }

    words
        .iter()
        .find_map(|w| slash_date(w, today.year()))
        .unwrap_or(today)
}

/// `m/d` or `m/d/y`, with two-digit years read as 20yy
fn slash_date(word: &str, current_year: i32) -> Option<NaiveDate> {
    let parts: Vec<&str> = word.split('/').collect();
    if !(2..=3).contains(&parts.len()) || parts.iter().any(|p| p.is_empty()) {
        return None;
    }

    let month: u32 = parts[0].parse().ok()?;
    let day: u32 = parts[1].parse().ok()?;
    let year = match parts.get(2) {
        Some(y) if y.len() == 2 => 2000 + y.parse::<i32>().ok()?,
        Some(y) if (3..=4).contains(&y.len()) => y.parse().ok()?,
        Some(_) => return None,
        None => current_year,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

mod optional_decimal {
    use serde::Serializer;

    use crate::models::Money;

    pub fn serialize<S: Serializer>(value: &Option<Money>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(money) => serializer.serialize_f64(money.to_decimal()),
            None => serializer.serialize_none(),
        }
    }
}
