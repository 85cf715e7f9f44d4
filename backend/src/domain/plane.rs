//! Aircraft records owned by the fleet service.

use std::fmt;

use chrono::{DateTime, Utc};

use super::text::bounded_text;

/// Store-generated plane identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaneId(i64);

impl PlaneId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PlaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

bounded_text!(
    /// Registration mark painted on the airframe; unique across the fleet.
    TailNumber,
    "tail_number",
    2,
    50
);

bounded_text!(
    /// Manufacturer model designation, e.g. `737` or `A320`.
    PlaneModel,
    "model",
    2,
    100
);

/// Persisted aircraft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plane {
    pub id: PlaneId,
    pub tail_number: TailNumber,
    pub model: PlaneModel,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when registering a new aircraft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlane {
    pub tail_number: TailNumber,
    pub model: PlaneModel,
}

/// Partial aircraft update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaneChanges {
    pub tail_number: Option<TailNumber>,
    pub model: Option<PlaneModel>,
}

impl Plane {
    /// Apply `changes`, returning the updated record and whether the tail
    /// number moved to a different value.
    pub fn apply(mut self, changes: PlaneChanges) -> (Self, bool) {
        let mut tail_changed = false;
        if let Some(tail_number) = changes.tail_number {
            tail_changed = tail_number != self.tail_number;
            self.tail_number = tail_number;
        }
        if let Some(model) = changes.model {
            self.model = model;
        }
        (self, tail_changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TextLengthError;
    use rstest::rstest;

    fn plane() -> Plane {
        Plane {
            id: PlaneId::new(1),
            tail_number: TailNumber::new("N12345").expect("tail"),
            model: PlaneModel::new("737").expect("model"),
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[rstest]
    fn tail_number_limits() {
        assert_eq!(
            TailNumber::new("N").expect_err("too short"),
            TextLengthError::TooShort {
                field: "tail_number",
                min: 2
            }
        );
        assert!(TailNumber::new("N".repeat(50)).is_ok());
        assert!(TailNumber::new("N".repeat(51)).is_err());
    }

    #[rstest]
    fn model_only_update_keeps_tail_number() {
        let changes = PlaneChanges {
            model: Some(PlaneModel::new("A320").expect("model")),
            ..PlaneChanges::default()
        };
        let (updated, tail_changed) = plane().apply(changes);
        assert!(!tail_changed);
        assert_eq!(updated.tail_number.as_str(), "N12345");
        assert_eq!(updated.model.as_str(), "A320");
    }

    #[rstest]
    #[case("N12345", false)]
    #[case("N54321", true)]
    fn tail_change_is_detected(#[case] tail: &str, #[case] expected: bool) {
        let changes = PlaneChanges {
            tail_number: Some(TailNumber::new(tail).expect("tail")),
            ..PlaneChanges::default()
        };
        let (_, tail_changed) = plane().apply(changes);
        assert_eq!(tail_changed, expected);
    }
}
