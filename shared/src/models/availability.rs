//! Availability windows shared by categories and products
//!
//! In memory an entity carries an [`Availability`] variant, so the three
//! mode-specific time fields can never be populated together. Forms and the
//! gateway use the flat [`AvailabilityFields`] shape.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use validator::ValidationError;

/// Availability mode (wire values are kebab-case)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AvailabilityMode {
    #[default]
    Always,
    #[serde(alias = "time_based", alias = "timeBased")]
    TimeBased,
    #[serde(alias = "time_range", alias = "timeRange")]
    TimeRange,
    #[serde(alias = "out_of_stock", alias = "outOfStock")]
    OutOfStock,
}

impl AvailabilityMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::TimeBased => "time-based",
            Self::TimeRange => "time-range",
            Self::OutOfStock => "out-of-stock",
        }
    }
}

impl std::fmt::Display for AvailabilityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolved availability of a category or product
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum Availability {
    #[default]
    Always,
    /// Orderable after the given time of day
    TimeBased { after: String },
    /// Orderable between two times of day
    TimeRange { from: String, to: String },
    OutOfStock,
}

impl Availability {
    pub fn mode(&self) -> AvailabilityMode {
        match self {
            Self::Always => AvailabilityMode::Always,
            Self::TimeBased { .. } => AvailabilityMode::TimeBased,
            Self::TimeRange { .. } => AvailabilityMode::TimeRange,
            Self::OutOfStock => AvailabilityMode::OutOfStock,
        }
    }

    /// Build from flat fields. `None` when the mode's own fields are missing.
    pub fn from_fields(fields: &AvailabilityFields) -> Option<Self> {
        let normalized = fields.normalized();
        match normalized.availability_mode {
            AvailabilityMode::Always => Some(Self::Always),
            AvailabilityMode::OutOfStock => Some(Self::OutOfStock),
            AvailabilityMode::TimeBased => normalized
                .available_after_time
                .map(|after| Self::TimeBased { after }),
            AvailabilityMode::TimeRange => match (
                normalized.available_from_time,
                normalized.available_to_time,
            ) {
                (Some(from), Some(to)) => Some(Self::TimeRange { from, to }),
                _ => None,
            },
        }
    }
}

/// Flat availability shape used by forms and the gateway
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityFields {
    #[serde(default)]
    pub availability_mode: AvailabilityMode,
    pub available_after_time: Option<String>,
    pub available_from_time: Option<String>,
    pub available_to_time: Option<String>,
}

impl AvailabilityFields {
    pub fn always() -> Self {
        Self::default()
    }

    pub fn time_based(after: impl Into<String>) -> Self {
        Self {
            availability_mode: AvailabilityMode::TimeBased,
            available_after_time: Some(after.into()),
            ..Self::default()
        }
    }

    pub fn time_range(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            availability_mode: AvailabilityMode::TimeRange,
            available_from_time: Some(from.into()),
            available_to_time: Some(to.into()),
            ..Self::default()
        }
    }

    pub fn out_of_stock() -> Self {
        Self {
            availability_mode: AvailabilityMode::OutOfStock,
            ..Self::default()
        }
    }

    /// Keep only the field group matching `availability_mode`; all others
    /// become null. Blank strings count as missing.
    pub fn normalized(&self) -> Self {
        let after = crate::util::non_blank(self.available_after_time.as_deref());
        let from = crate::util::non_blank(self.available_from_time.as_deref());
        let to = crate::util::non_blank(self.available_to_time.as_deref());

        let mut out = Self {
            availability_mode: self.availability_mode,
            ..Self::default()
        };
        match self.availability_mode {
            AvailabilityMode::TimeBased => out.available_after_time = after,
            AvailabilityMode::TimeRange => {
                out.available_from_time = from;
                out.available_to_time = to;
            }
            AvailabilityMode::Always | AvailabilityMode::OutOfStock => {}
        }
        out
    }

    /// Check that the active mode has its fields and that they are `HH:MM` times
    pub fn check(&self) -> Result<(), ValidationError> {
        let normalized = self.normalized();
        match normalized.availability_mode {
            AvailabilityMode::TimeBased => {
                require_time("availableAfterTime", normalized.available_after_time.as_deref())
            }
            AvailabilityMode::TimeRange => {
                require_time("availableFromTime", normalized.available_from_time.as_deref())?;
                require_time("availableToTime", normalized.available_to_time.as_deref())
            }
            AvailabilityMode::Always | AvailabilityMode::OutOfStock => Ok(()),
        }
    }
}

impl From<&Availability> for AvailabilityFields {
    fn from(availability: &Availability) -> Self {
        match availability {
            Availability::Always => Self::always(),
            Availability::OutOfStock => Self::out_of_stock(),
            Availability::TimeBased { after } => Self::time_based(after.clone()),
            Availability::TimeRange { from, to } => Self::time_range(from.clone(), to.clone()),
        }
    }
}

fn require_time(field: &'static str, value: Option<&str>) -> Result<(), ValidationError> {
    let Some(value) = value else {
        return Err(super::validation_error(
            "availability_time_missing",
            format!("{} is required for this availability mode", field),
        ));
    };
    if parse_time_of_day(value).is_none() {
        return Err(super::validation_error(
            "availability_time_format",
            format!("{} must be HH:MM, got '{}'", field, value),
        ));
    }
    Ok(())
}

/// Parse `HH:MM` or `HH:MM:SS`
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}
