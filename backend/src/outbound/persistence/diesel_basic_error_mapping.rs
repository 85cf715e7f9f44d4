//! Classification of pool, Diesel and timeout failures shared by every
//! repository.
//!
//! Repositories wrap each store call in [`with_store_timeout`] and convert
//! the resulting [`StoreFailure`] into their port error. Messages are
//! prefixed with the operation name so logs show which call failed.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::ports::{PartPersistenceError, PlanePersistenceError, UserPersistenceError};

use super::pool::PoolError;

/// Upper bound for a single repository operation.
pub(crate) const STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Store failure before it is mapped onto a port error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreFailure {
    Connection(String),
    Query(String),
    Duplicate(String),
    NotFound(String),
}

pub(crate) fn map_pool_error(operation: &'static str, error: PoolError) -> StoreFailure {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    StoreFailure::Connection(format!("{operation}: {message}"))
}

pub(crate) fn map_diesel_error(
    operation: &'static str,
    error: diesel::result::Error,
) -> StoreFailure {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), operation, "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            operation,
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => StoreFailure::NotFound(format!("{operation}: record not found")),
        DieselError::QueryBuilderError(_) => {
            StoreFailure::Query(format!("{operation}: database query error"))
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            let constraint = info.constraint_name().unwrap_or("unique constraint");
            StoreFailure::Duplicate(format!("{operation}: {constraint}"))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            StoreFailure::Connection(format!("{operation}: database connection error"))
        }
        _ => StoreFailure::Query(format!("{operation}: database error")),
    }
}

/// A stored row that no longer satisfies the domain's field rules.
pub(crate) fn invalid_row(operation: &'static str, reason: impl std::fmt::Display) -> StoreFailure {
    warn!(operation, %reason, "stored row failed domain validation");
    StoreFailure::Query(format!("{operation}: invalid stored row: {reason}"))
}

/// Run `fut` under [`STORE_TIMEOUT`]. Dropping the returned future cancels
/// the in-flight store call.
pub(crate) async fn with_store_timeout<T, F>(
    operation: &'static str,
    fut: F,
) -> Result<T, StoreFailure>
where
    F: Future<Output = Result<T, StoreFailure>>,
{
    match tokio::time::timeout(STORE_TIMEOUT, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!(operation, timeout_secs = STORE_TIMEOUT.as_secs(), "store call timed out");
            Err(StoreFailure::Connection(format!(
                "{operation}: timed out after {}s",
                STORE_TIMEOUT.as_secs()
            )))
        }
    }
}

macro_rules! impl_from_store_failure {
    ($($error:ty),* $(,)?) => {
        $(
            impl From<StoreFailure> for $error {
                fn from(failure: StoreFailure) -> Self {
                    match failure {
                        StoreFailure::Connection(message) => Self::connection(message),
                        StoreFailure::Query(message) => Self::query(message),
                        StoreFailure::Duplicate(message) => Self::duplicate(message),
                        StoreFailure::NotFound(message) => Self::not_found(message),
                    }
                }
            }
        )*
    };
}

impl_from_store_failure!(
    UserPersistenceError,
    PlanePersistenceError,
    PartPersistenceError
);

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    struct Info {
        constraint: Option<&'static str>,
    }

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.constraint
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info { constraint }))
    }

    #[rstest]
    #[case(
        database_error(DatabaseErrorKind::UniqueViolation, Some("planes_tail_number_key")),
        StoreFailure::Duplicate("insert plane: planes_tail_number_key".to_owned())
    )]
    #[case(
        database_error(DatabaseErrorKind::ClosedConnection, None),
        StoreFailure::Connection("insert plane: database connection error".to_owned())
    )]
    #[case(
        database_error(DatabaseErrorKind::CheckViolation, None),
        StoreFailure::Query("insert plane: database error".to_owned())
    )]
    #[case(
        DieselError::NotFound,
        StoreFailure::NotFound("insert plane: record not found".to_owned())
    )]
    fn diesel_errors_are_classified(#[case] error: DieselError, #[case] expected: StoreFailure) {
        assert_eq!(map_diesel_error("insert plane", error), expected);
    }

    #[rstest]
    fn pool_errors_are_connection_failures() {
        let failure = map_pool_error("list parts", PoolError::checkout("timed out"));
        assert_eq!(
            failure,
            StoreFailure::Connection("list parts: timed out".to_owned())
        );
    }

    #[rstest]
    fn failures_convert_into_port_errors() {
        let error: PartPersistenceError =
            StoreFailure::Duplicate("insert part: plane_parts_serial_number_key".to_owned())
                .into();
        assert_eq!(
            error,
            PartPersistenceError::duplicate("insert part: plane_parts_serial_number_key")
        );
    }

    #[rstest]
    fn vanished_rows_convert_into_not_found() {
        let error: PlanePersistenceError =
            map_diesel_error("update plane", DieselError::NotFound).into();
        assert_eq!(
            error,
            PlanePersistenceError::not_found("update plane: record not found")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_calls_time_out_as_connection_failures() {
        let result: Result<(), StoreFailure> = with_store_timeout("find plane", async {
            tokio::time::sleep(STORE_TIMEOUT * 2).await;
            Ok(())
        })
        .await;
        assert_eq!(
            result,
            Err(StoreFailure::Connection(
                "find plane: timed out after 5s".to_owned()
            ))
        );
    }
}
