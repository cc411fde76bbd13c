//! Split types
//!
//! A split is the portion of an expense assigned to one participant. The split
//! mode says how the portions are derived; custom amounts and percentages carry
//! the mode-specific input.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::ParticipantId;
use super::money::Money;

/// How an expense is divided among its participants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// Same share for everyone, first participant absorbs the rounding remainder
    #[default]
    Equal,
    /// Explicit amount per participant
    Custom,
    /// Percentage of the total per participant
    Percentage,
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "equal"),
            Self::Custom => write!(f, "custom"),
            Self::Percentage => write!(f, "percentage"),
        }
    }
}

impl FromStr for SplitMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "equal" => Ok(Self::Equal),
            "custom" => Ok(Self::Custom),
            "percentage" | "percent" => Ok(Self::Percentage),
            other => Err(format!(
                "unknown split mode '{}' (expected equal, custom or percentage)",
                other
            )),
        }
    }
}

/// One participant's resolved share of an expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub participant_id: ParticipantId,
    pub amount: Money,
}

impl Split {
    pub fn new(participant_id: ParticipantId, amount: Money) -> Self {
        Self {
            participant_id,
            amount,
        }
    }
}

/// A percentage with two decimal places, stored as basis points (100.00% = 10000)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(i64);

impl Percentage {
    /// One hundred percent
    pub const FULL: Percentage = Percentage(10_000);

    pub const fn from_basis_points(bp: i64) -> Self {
        Self(bp)
    }

    pub const fn basis_points(&self) -> i64 {
        self.0
    }

    /// Parse "25", "33.33" or "33.33%"
    pub fn parse(s: &str) -> Result<Self, String> {
        let trimmed = s.trim();
        let number = trimmed.strip_suffix('%').unwrap_or(trimmed);
        if number.starts_with('-') || number.starts_with('$') {
            return Err(format!("Invalid percentage: {}", s));
        }
        // Two-decimal parsing is shared with money amounts
        let parsed = Money::parse(number)
            .map(|hundredths| Self(hundredths.cents()))
            .map_err(|_| format!("Invalid percentage: {}", s))?;
        if !parsed.is_valid() {
            return Err(format!("Percentage must be between 0 and 100: {}", s));
        }
        Ok(parsed)
    }

    /// Between 0% and 100% inclusive
    pub const fn is_valid(&self) -> bool {
        self.0 >= 0 && self.0 <= Self::FULL.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, (self.0 % 100).abs())
    }
}

impl std::iter::Sum for Percentage {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|p| p.0).sum())
    }
}

/// Custom amount requested for one participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomAmount {
    pub participant_id: ParticipantId,
    pub amount: Money,
}

/// Percentage requested for one participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentageShare {
    pub participant_id: ParticipantId,
    pub percentage: Percentage,
}

/// Mode-specific input for the split allocator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_amounts: Option<Vec<CustomAmount>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentages: Option<Vec<PercentageShare>>,
}

impl SplitData {
    /// No mode-specific data (equal splits)
    pub fn none() -> Self {
        Self::default()
    }

    pub fn custom(amounts: Vec<CustomAmount>) -> Self {
        Self {
            custom_amounts: Some(amounts),
            percentages: None,
        }
    }

    pub fn percentages(shares: Vec<PercentageShare>) -> Self {
        Self {
            custom_amounts: None,
            percentages: Some(shares),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.custom_amounts.is_none() && self.percentages.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_mode_parse() {
        assert_eq!("equal".parse::<SplitMode>(), Ok(SplitMode::Equal));
        assert_eq!("Custom".parse::<SplitMode>(), Ok(SplitMode::Custom));
        assert_eq!("percent".parse::<SplitMode>(), Ok(SplitMode::Percentage));
        assert!("shares".parse::<SplitMode>().is_err());
    }

    #[test]
    fn test_split_mode_serialization() {
        let json = serde_json::to_string(&SplitMode::Percentage).unwrap();
        assert_eq!(json, "\"percentage\"");
    }

    #[test]
    fn test_percentage_parse() {
        assert_eq!(Percentage::parse("25").unwrap().basis_points(), 2500);
        assert_eq!(Percentage::parse("33.33").unwrap().basis_points(), 3333);
        assert_eq!(Percentage::parse("12.5%").unwrap().basis_points(), 1250);
        assert!(Percentage::parse("-5").is_err());
        assert!(Percentage::parse("lots").is_err());
        assert!(Percentage::parse("100").is_ok());
        assert!(Percentage::parse("100.01").is_err());
        assert!(!Percentage::from_basis_points(i64::MAX).is_valid());
    }

    #[test]
    fn test_percentage_display_and_sum() {
        let shares = vec![
            Percentage::from_basis_points(3333),
            Percentage::from_basis_points(3333),
            Percentage::from_basis_points(3334),
        ];
        assert_eq!(shares[0].to_string(), "33.33%");
        let total: Percentage = shares.into_iter().sum();
        assert_eq!(total, Percentage::FULL);
    }
}
