//! Installed parts, usage accounting and the maintenance-alert rule.
//!
//! A part's "needs maintenance" status is never stored. It is derived at
//! query time from `(usage_hours, usage_limit_hours, threshold)` through
//! [`usage_percent`], the single place that arithmetic lives.

use std::fmt;

use chrono::{DateTime, Utc};

use super::text::bounded_text;
use super::{Plane, PlaneId, TextLengthError};

/// Default alert threshold, in percent of the certified limit.
pub const DEFAULT_MAINTENANCE_THRESHOLD: f64 = 80.0;

/// Percentage of the certified limit consumed by `hours`.
///
/// Returns `0.0` when `limit` is not positive instead of dividing.
///
/// # Examples
/// ```
/// use aircraft_backend::domain::usage_percent;
///
/// assert_eq!(usage_percent(400.0, 500.0), 80.0);
/// assert_eq!(usage_percent(10.0, 0.0), 0.0);
/// ```
pub fn usage_percent(hours: f64, limit: f64) -> f64 {
    if limit <= 0.0 {
        return 0.0;
    }
    hours / limit * 100.0
}

/// Validation errors raised by part field constructors.
#[derive(Debug, Clone, PartialEq)]
pub enum PartValidationError {
    Length(TextLengthError),
    NotFinite { field: &'static str },
    NegativeUsage,
    NonPositiveLimit,
    ThresholdOutOfRange { value: f64 },
}

impl fmt::Display for PartValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length(err) => err.fmt(f),
            Self::NotFinite { field } => write!(f, "{field} must be a finite number"),
            Self::NegativeUsage => write!(f, "usage_hours must not be negative"),
            Self::NonPositiveLimit => write!(f, "usage_limit_hours must be greater than zero"),
            Self::ThresholdOutOfRange { value } => {
                write!(f, "threshold must be between 0 and 100, got {value}")
            }
        }
    }
}

impl std::error::Error for PartValidationError {}

impl From<TextLengthError> for PartValidationError {
    fn from(value: TextLengthError) -> Self {
        Self::Length(value)
    }
}

/// Store-generated part identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartId(i64);

impl PartId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

bounded_text!(
    /// Human-readable part description.
    PartName,
    "part_name",
    2,
    255
);

bounded_text!(
    /// Manufacturer serial number; unique across every installed part.
    SerialNumber,
    "serial_number",
    2,
    100
);

bounded_text!(
    /// Free-form grouping used to filter a plane's parts.
    Category,
    "category",
    2,
    150
);

/// Accumulated operating hours, finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct UsageHours(f64);

impl UsageHours {
    pub fn new(hours: f64) -> Result<Self, PartValidationError> {
        if !hours.is_finite() {
            return Err(PartValidationError::NotFinite {
                field: "usage_hours",
            });
        }
        if hours < 0.0 {
            return Err(PartValidationError::NegativeUsage);
        }
        Ok(Self(hours))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

/// Certified operating-hour limit, finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct UsageLimitHours(f64);

impl UsageLimitHours {
    pub fn new(hours: f64) -> Result<Self, PartValidationError> {
        if !hours.is_finite() {
            return Err(PartValidationError::NotFinite {
                field: "usage_limit_hours",
            });
        }
        if hours <= 0.0 {
            return Err(PartValidationError::NonPositiveLimit);
        }
        Ok(Self(hours))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

/// Alert threshold in percent, inclusive range 0 to 100.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct MaintenanceThreshold(f64);

impl MaintenanceThreshold {
    pub fn new(percent: f64) -> Result<Self, PartValidationError> {
        if !(0.0..=100.0).contains(&percent) {
            return Err(PartValidationError::ThresholdOutOfRange { value: percent });
        }
        Ok(Self(percent))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for MaintenanceThreshold {
    fn default() -> Self {
        Self(DEFAULT_MAINTENANCE_THRESHOLD)
    }
}

/// Persisted part installed on a plane.
///
/// ## Invariants
/// - `plane_id` never changes after creation.
/// - `usage_hours <= usage_limit_hours` holds after every usage update; a
///   details update may lower the limit below current usage.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub id: PartId,
    pub plane_id: PlaneId,
    pub part_name: PartName,
    pub serial_number: SerialNumber,
    pub category: Category,
    pub usage_hours: UsageHours,
    pub usage_limit_hours: UsageLimitHours,
    pub installed_at: DateTime<Utc>,
}

impl Part {
    /// Derived usage percentage; see [`usage_percent`].
    pub fn usage_percent(&self) -> f64 {
        usage_percent(self.usage_hours.get(), self.usage_limit_hours.get())
    }

    /// Check a proposed usage value against the certified limit.
    pub fn check_usage(&self, hours: UsageHours) -> Result<(), UsageExceedsLimit> {
        if hours.get() > self.usage_limit_hours.get() {
            return Err(UsageExceedsLimit {
                requested: hours.get(),
                limit: self.usage_limit_hours.get(),
            });
        }
        Ok(())
    }

    /// Apply `changes`, returning the updated record and whether the serial
    /// number moved to a different value. Usage hours are left untouched.
    pub fn apply(mut self, changes: PartChanges) -> (Self, bool) {
        let mut serial_changed = false;
        if let Some(part_name) = changes.part_name {
            self.part_name = part_name;
        }
        if let Some(serial_number) = changes.serial_number {
            serial_changed = serial_number != self.serial_number;
            self.serial_number = serial_number;
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        if let Some(limit) = changes.usage_limit_hours {
            self.usage_limit_hours = limit;
        }
        (self, serial_changed)
    }
}

/// Rejection raised when usage would pass the certified limit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageExceedsLimit {
    pub requested: f64,
    pub limit: f64,
}

/// Fields supplied when installing a part.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPart {
    pub plane_id: PlaneId,
    pub part_name: PartName,
    pub serial_number: SerialNumber,
    pub category: Category,
    pub usage_hours: UsageHours,
    pub usage_limit_hours: UsageLimitHours,
}

/// Partial details update. Usage hours change only through the usage path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartChanges {
    pub part_name: Option<PartName>,
    pub serial_number: Option<SerialNumber>,
    pub category: Option<Category>,
    pub usage_limit_hours: Option<UsageLimitHours>,
}

/// A plane together with every part installed on it, ordered by id.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneWithParts {
    pub plane: Plane,
    pub parts: Vec<Part>,
}

/// Parts at or above `threshold`, highest usage first.
///
/// The sort is stable, so parts with equal usage keep their input order.
pub fn parts_needing_maintenance(parts: Vec<Part>, threshold: MaintenanceThreshold) -> Vec<Part> {
    let mut flagged: Vec<(f64, Part)> = parts
        .into_iter()
        .map(|part| (part.usage_percent(), part))
        .filter(|(percent, _)| *percent >= threshold.get())
        .collect();
    flagged.sort_by(|(left, _), (right, _)| right.total_cmp(left));
    flagged.into_iter().map(|(_, part)| part).collect()
}
