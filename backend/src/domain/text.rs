//! Length-bounded text newtypes shared by the fleet and part records.

use std::fmt;

/// Length violation raised by a bounded text constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextLengthError {
    TooShort { field: &'static str, min: usize },
    TooLong { field: &'static str, max: usize },
}

impl fmt::Display for TextLengthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { field, min } => {
                write!(f, "{field} must be at least {min} characters")
            }
            Self::TooLong { field, max } => write!(f, "{field} must be at most {max} characters"),
        }
    }
}

impl std::error::Error for TextLengthError {}

pub(crate) fn bounded(
    field: &'static str,
    raw: &str,
    min: usize,
    max: usize,
) -> Result<String, TextLengthError> {
    let trimmed = raw.trim();
    let length = trimmed.chars().count();
    if length < min {
        return Err(TextLengthError::TooShort { field, min });
    }
    if length > max {
        return Err(TextLengthError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

/// Declares a trimmed, length-checked string newtype.
macro_rules! bounded_text {
    ($(#[$meta:meta])* $name:ident, $field:literal, $min:expr, $max:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            /// Shortest accepted value, in characters.
            pub const MIN: usize = $min;
            /// Longest accepted value, in characters.
            pub const MAX: usize = $max;

            pub fn new(
                raw: impl AsRef<str>,
            ) -> Result<Self, $crate::domain::TextLengthError> {
                $crate::domain::text::bounded($field, raw.as_ref(), Self::MIN, Self::MAX).map(Self)
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_ref())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

pub(crate) use bounded_text;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("N1", Ok("N1".to_owned()))]
    #[case("  N1  ", Ok("N1".to_owned()))]
    #[case(" N ", Err(TextLengthError::TooShort { field: "tail_number", min: 2 }))]
    #[case("N12345", Err(TextLengthError::TooLong { field: "tail_number", max: 5 }))]
    fn bounds_are_inclusive_after_trimming(
        #[case] raw: &str,
        #[case] expected: Result<String, TextLengthError>,
    ) {
        assert_eq!(bounded("tail_number", raw, 2, 5), expected);
    }

    #[rstest]
    fn length_counts_characters_not_bytes() {
        assert!(bounded("model", "éé", 2, 2).is_ok());
    }
}
