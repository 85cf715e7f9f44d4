//! Tests for the identity service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rstest::rstest;

use super::*;
use crate::domain::ports::{
    IssuedToken, MockPasswordHasher, MockTokenService, MockUserRepository, TokenError,
};
use crate::domain::{ErrorCode, Password, PasswordDigest, Role};

type Service = UserAccountService<MockUserRepository, MockPasswordHasher, MockTokenService>;

fn stored_user(id: i64, name: &str, role: Role) -> User {
    User {
        id: UserId::new(id),
        name: UserName::new(name).expect("fixture name"),
        password_digest: PasswordDigest::new(format!("digest-of-{name}")),
        role,
        created_at: DateTime::<Utc>::UNIX_EPOCH,
    }
}

fn service(
    repo: MockUserRepository,
    hasher: MockPasswordHasher,
    tokens: MockTokenService,
) -> Service {
    UserAccountService::new(Arc::new(repo), Arc::new(hasher), Arc::new(tokens))
}

fn registration(name: &str, password: &str) -> Registration {
    Registration {
        name: UserName::new(name).expect("name"),
        password: Password::new(password).expect("password"),
        role: Role::default(),
    }
}

#[tokio::test]
async fn register_hashes_password_and_defaults_role() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_name()
        .withf(|name| name.as_str() == "alice")
        .times(1)
        .return_once(|_| Ok(None));
    repo.expect_insert()
        .withf(|user| {
            user.name.as_str() == "alice"
                && user.role == Role::User
                && user.password_digest.as_str() == "hashed"
        })
        .times(1)
        .return_once(|user| {
            Ok(User {
                id: UserId::new(1),
                name: user.name.clone(),
                password_digest: user.password_digest.clone(),
                role: user.role,
                created_at: DateTime::<Utc>::UNIX_EPOCH,
            })
        });
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .withf(|password| password.expose() == "secret1")
        .times(1)
        .return_once(|_| Ok(PasswordDigest::new("hashed")));

    let user = service(repo, hasher, MockTokenService::new())
        .register(registration("alice", "secret1"))
        .await
        .expect("registration succeeds");

    assert_eq!(user.id, UserId::new(1));
    assert_eq!(user.role, Role::User);
}

#[tokio::test]
async fn register_rejects_taken_name_without_hashing() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_name()
        .return_once(|_| Ok(Some(stored_user(1, "alice", Role::User))));
    repo.expect_insert().times(0);
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_hash().times(0);

    let error = service(repo, hasher, MockTokenService::new())
        .register(registration("alice", "secret1"))
        .await
        .expect_err("duplicate name");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.message(), "user already exists");
}

#[tokio::test]
async fn register_maps_unique_violation_race_to_conflict() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_name().return_once(|_| Ok(None));
    repo.expect_insert()
        .return_once(|_| Err(UserPersistenceError::duplicate("insert user: users_name_key")));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .return_once(|_| Ok(PasswordDigest::new("hashed")));

    let error = service(repo, hasher, MockTokenService::new())
        .register(registration("alice", "secret1"))
        .await
        .expect_err("race lost");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn login_issues_token_for_valid_credentials() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_name()
        .return_once(|_| Ok(Some(stored_user(4, "alice", Role::Mechanic))));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_verify()
        .withf(|password, digest| password == "secret1" && digest.as_str() == "digest-of-alice")
        .return_once(|_, _| Ok(true));
    let mut tokens = MockTokenService::new();
    tokens
        .expect_issue()
        .withf(|user| user.id == UserId::new(4))
        .return_once(|_| {
            Ok(IssuedToken {
                token: "signed".to_owned(),
                ttl_seconds: 86_400,
            })
        });

    let credentials = LoginCredentials::try_from_parts("alice", "secret1").expect("creds");
    let outcome = service(repo, hasher, tokens)
        .login(&credentials)
        .await
        .expect("login succeeds");

    assert_eq!(outcome.token, "signed");
    assert_eq!(outcome.ttl_seconds, 86_400);
    assert_eq!(outcome.user.role, Role::Mechanic);
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_name()
        .return_once(|_| Ok(Some(stored_user(4, "alice", Role::User))));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().return_once(|_, _| Ok(false));
    let mut tokens = MockTokenService::new();
    tokens.expect_issue().times(0);

    let credentials = LoginCredentials::try_from_parts("alice", "wrong!").expect("creds");
    let error = service(repo, hasher, tokens)
        .login(&credentials)
        .await
        .expect_err("bad password");

    assert_eq!(error.code(), ErrorCode::Unauthorized);
    assert_eq!(error.message(), "invalid credentials");
}

#[rstest]
#[case("bob")]
#[case("b")]
#[tokio::test]
async fn login_reports_unknown_user_as_not_found(#[case] name: &str) {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_name().returning(|_| Ok(None));

    let credentials = LoginCredentials::try_from_parts(name, "secret1").expect("creds");
    let error = service(repo, MockPasswordHasher::new(), MockTokenService::new())
        .login(&credentials)
        .await
        .expect_err("unknown user");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn login_maps_signing_failure_to_internal() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_name()
        .return_once(|_| Ok(Some(stored_user(4, "alice", Role::User))));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().return_once(|_, _| Ok(true));
    let mut tokens = MockTokenService::new();
    tokens
        .expect_issue()
        .return_once(|_| Err(TokenError::signing("bad key")));

    let credentials = LoginCredentials::try_from_parts("alice", "secret1").expect("creds");
    let error = service(repo, hasher, tokens)
        .login(&credentials)
        .await
        .expect_err("signing failed");

    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[tokio::test]
async fn update_rehashes_only_when_password_supplied() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .return_once(|_| Ok(Some(stored_user(2, "alice", Role::User))));
    repo.expect_find_by_name().times(0);
    repo.expect_update()
        .withf(|user| {
            user.name.as_str() == "alice"
                && user.role == Role::Admin
                && user.password_digest.as_str() == "digest-of-alice"
        })
        .return_once(|user| Ok(user.clone()));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_hash().times(0);

    let changes = UserChanges {
        role: Some(Role::Admin),
        ..UserChanges::default()
    };
    let user = service(repo, hasher, MockTokenService::new())
        .update(UserId::new(2), changes)
        .await
        .expect("update succeeds");

    assert_eq!(user.role, Role::Admin);
}

#[tokio::test]
async fn update_rejects_rename_onto_existing_name() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .return_once(|_| Ok(Some(stored_user(2, "alice", Role::User))));
    repo.expect_find_by_name()
        .withf(|name| name.as_str() == "bob")
        .return_once(|_| Ok(Some(stored_user(3, "bob", Role::User))));
    repo.expect_update().times(0);

    let changes = UserChanges {
        name: Some(UserName::new("bob").expect("name")),
        ..UserChanges::default()
    };
    let error = service(repo, MockPasswordHasher::new(), MockTokenService::new())
        .update(UserId::new(2), changes)
        .await
        .expect_err("rename collides");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn update_missing_user_is_not_found() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().return_once(|_| Ok(None));

    let error = service(repo, MockPasswordHasher::new(), MockTokenService::new())
        .update(UserId::new(9), UserChanges::default())
        .await
        .expect_err("missing user");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "user not found");
}

#[tokio::test]
async fn update_of_account_deleted_meanwhile_is_not_found() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .return_once(|_| Ok(Some(stored_user(2, "alice", Role::User))));
    repo.expect_update().return_once(|_| {
        Err(UserPersistenceError::not_found(
            "update user: record not found",
        ))
    });

    let changes = UserChanges {
        role: Some(Role::Admin),
        ..UserChanges::default()
    };
    let error = service(repo, MockPasswordHasher::new(), MockTokenService::new())
        .update(UserId::new(2), changes)
        .await
        .expect_err("row gone");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "user not found");
}

#[rstest]
#[case(true, None)]
#[case(false, Some(ErrorCode::NotFound))]
#[tokio::test]
async fn delete_reports_missing_rows(#[case] deleted: bool, #[case] expected: Option<ErrorCode>) {
    let mut repo = MockUserRepository::new();
    repo.expect_delete()
        .withf(|id| *id == UserId::new(5))
        .return_once(move |_| Ok(deleted));

    let result = service(repo, MockPasswordHasher::new(), MockTokenService::new())
        .delete(UserId::new(5))
        .await;

    assert_eq!(result.err().map(|err| err.code()), expected);
}

#[rstest]
#[case(UserPersistenceError::connection("pool closed"), ErrorCode::ServiceUnavailable)]
#[case(UserPersistenceError::query("list users: syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn get_all_maps_repository_failures(
    #[case] failure: UserPersistenceError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockUserRepository::new();
    repo.expect_list_all().return_once(move || Err(failure));

    let error = service(repo, MockPasswordHasher::new(), MockTokenService::new())
        .get_all()
        .await
        .expect_err("repository failure");

    assert_eq!(error.code(), expected);
}

#[tokio::test]
async fn get_me_loads_principal_record() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .withf(|id| *id == UserId::new(4))
        .return_once(|_| Ok(Some(stored_user(4, "alice", Role::User))));

    let principal = Principal {
        user_id: UserId::new(4),
        name: "alice".to_owned(),
        role: Role::User,
    };
    let user = service(repo, MockPasswordHasher::new(), MockTokenService::new())
        .get_me(&principal)
        .await
        .expect("principal exists");

    assert_eq!(user.name.as_str(), "alice");
}
