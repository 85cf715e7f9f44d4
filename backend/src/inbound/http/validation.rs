//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper turns a rejected value into an `invalid_request` error whose
//! `details` name the offending field and a stable machine-readable code.

use serde_json::json;

use crate::domain::{
    Error, MaintenanceThreshold, PartValidationError, Role, TextLengthError, UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidId,
    TooShort,
    TooLong,
    NotFinite,
    Negative,
    NotPositive,
    OutOfRange,
    InvalidNumber,
    UnknownRole,
    EmptyField,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::TooShort => "too_short",
            ErrorCode::TooLong => "too_long",
            ErrorCode::NotFinite => "not_finite",
            ErrorCode::Negative => "negative",
            ErrorCode::NotPositive => "not_positive",
            ErrorCode::OutOfRange => "out_of_range",
            ErrorCode::InvalidNumber => "invalid_number",
            ErrorCode::UnknownRole => "unknown_role",
            ErrorCode::EmptyField => "empty_field",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

/// Parse a numeric path identifier, failing with `message` (for example
/// `"invalid plane ID"`).
pub(crate) fn parse_id(raw: &str, field: FieldName, message: &str) -> Result<i64, Error> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::new(field.as_str(), message).with_value(ErrorCode::InvalidId, raw))
}

pub(crate) fn text_length_error(err: TextLengthError) -> Error {
    let (field, code) = match err {
        TextLengthError::TooShort { field, .. } => (field, ErrorCode::TooShort),
        TextLengthError::TooLong { field, .. } => (field, ErrorCode::TooLong),
    };
    ValidationError::new(field, err.to_string()).with_code(code)
}

pub(crate) fn part_validation_error(err: PartValidationError) -> Error {
    let (field, code) = match &err {
        PartValidationError::Length(length) => return text_length_error(length.clone()),
        PartValidationError::NotFinite { field } => (*field, ErrorCode::NotFinite),
        PartValidationError::NegativeUsage => ("usage_hours", ErrorCode::Negative),
        PartValidationError::NonPositiveLimit => ("usage_limit_hours", ErrorCode::NotPositive),
        PartValidationError::ThresholdOutOfRange { .. } => ("threshold", ErrorCode::OutOfRange),
    };
    ValidationError::new(field, err.to_string()).with_code(code)
}

pub(crate) fn user_validation_error(err: UserValidationError) -> Error {
    let (field, code) = match &err {
        UserValidationError::NameTooShort { .. } => ("name", ErrorCode::TooShort),
        UserValidationError::NameTooLong { .. } => ("name", ErrorCode::TooLong),
        UserValidationError::PasswordTooShort { .. } => ("password", ErrorCode::TooShort),
        UserValidationError::UnknownRole { .. } => ("role", ErrorCode::UnknownRole),
    };
    ValidationError::new(field, err.to_string()).with_code(code)
}

pub(crate) fn empty_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must not be empty")).with_code(ErrorCode::EmptyField)
}

fn role_from(raw: &str, allowed: &[Role]) -> Result<Role, Error> {
    let listed = allowed
        .iter()
        .map(|role| role.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    raw.parse::<Role>()
        .ok()
        .filter(|role| allowed.contains(role))
        .ok_or_else(|| {
            ValidationError::new("role", format!("role must be one of: {listed}"))
                .with_value(ErrorCode::UnknownRole, raw)
        })
}

/// Role accepted at registration. Blank or absent means [`Role::User`].
pub(crate) fn registration_role(raw: Option<&str>) -> Result<Role, Error> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Role::User),
        Some(value) => role_from(value, &[Role::User, Role::Mechanic, Role::Admin]),
    }
}

/// Role accepted by an account update. `mechanic` can only be granted at
/// registration.
pub(crate) fn update_role(raw: Option<&str>) -> Result<Option<Role>, Error> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => role_from(value, &[Role::User, Role::Admin]).map(Some),
    }
}

/// Parse the maintenance alert threshold. Absent means the default of 80.
pub(crate) fn parse_threshold(raw: Option<&str>) -> Result<MaintenanceThreshold, Error> {
    let Some(raw) = raw.map(str::trim) else {
        return Ok(MaintenanceThreshold::default());
    };
    let value = raw.parse::<f64>().map_err(|_| {
        ValidationError::new("threshold", "invalid threshold value")
            .with_value(ErrorCode::InvalidNumber, raw)
    })?;
    MaintenanceThreshold::new(value).map_err(|_| {
        ValidationError::new("threshold", "invalid threshold value")
            .with_value(ErrorCode::OutOfRange, raw)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as DomainErrorCode;
    use rstest::rstest;
    use serde_json::Value;

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a str> {
        error.details()?.get(key).and_then(Value::as_str)
    }

    #[rstest]
    #[case("42", Some(42))]
    #[case(" 7 ", Some(7))]
    #[case("abc", None)]
    #[case("1.5", None)]
    #[case("", None)]
    fn ids_parse_as_integers(#[case] raw: &str, #[case] expected: Option<i64>) {
        let result = parse_id(raw, FieldName::new("id"), "invalid plane ID");
        match expected {
            Some(id) => assert_eq!(result.expect("valid id"), id),
            None => {
                let err = result.expect_err("invalid id");
                assert_eq!(err.code(), DomainErrorCode::InvalidRequest);
                assert_eq!(err.message(), "invalid plane ID");
                assert_eq!(detail(&err, "code"), Some("invalid_id"));
            }
        }
    }

    #[rstest]
    #[case(None, Some(Role::User))]
    #[case(Some(""), Some(Role::User))]
    #[case(Some("mechanic"), Some(Role::Mechanic))]
    #[case(Some("admin"), Some(Role::Admin))]
    #[case(Some("pilot"), None)]
    fn registration_accepts_three_roles(#[case] raw: Option<&str>, #[case] expected: Option<Role>) {
        assert_eq!(registration_role(raw).ok(), expected);
    }

    #[rstest]
    #[case(None, Some(None))]
    #[case(Some("user"), Some(Some(Role::User)))]
    #[case(Some("admin"), Some(Some(Role::Admin)))]
    #[case(Some("mechanic"), None)]
    fn updates_accept_only_user_and_admin(
        #[case] raw: Option<&str>,
        #[case] expected: Option<Option<Role>>,
    ) {
        assert_eq!(update_role(raw).ok(), expected);
    }

    #[rstest]
    #[case(None, Some(80.0))]
    #[case(Some("0"), Some(0.0))]
    #[case(Some("100"), Some(100.0))]
    #[case(Some("55.5"), Some(55.5))]
    #[case(Some("abc"), None)]
    #[case(Some("-1"), None)]
    #[case(Some("100.1"), None)]
    #[case(Some("NaN"), None)]
    fn thresholds_are_bounded(#[case] raw: Option<&str>, #[case] expected: Option<f64>) {
        let result = parse_threshold(raw);
        match expected {
            Some(value) => assert_eq!(result.expect("valid").get(), value),
            None => assert_eq!(
                result.expect_err("invalid").message(),
                "invalid threshold value"
            ),
        }
    }

    #[rstest]
    fn text_errors_name_their_field() {
        let err = text_length_error(TextLengthError::TooShort {
            field: "tail_number",
            min: 2,
        });
        assert_eq!(detail(&err, "field"), Some("tail_number"));
        assert_eq!(detail(&err, "code"), Some("too_short"));
    }

    #[rstest]
    fn usage_errors_name_their_field() {
        let err = part_validation_error(PartValidationError::NegativeUsage);
        assert_eq!(detail(&err, "field"), Some("usage_hours"));
        assert_eq!(detail(&err, "code"), Some("negative"));
    }
}
