//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    MockFleet, MockPartLifecycle, MockTokenService, MockUserAccounts, TokenError,
};
use crate::domain::{
    Category, PartId, PartName, Plane, PlaneId, PlaneModel, Principal, Role, SerialNumber,
    TailNumber, UsageHours, UsageLimitHours, UserId,
};
use crate::domain::{Part, PasswordDigest, User, UserName};

use super::state::{HttpState, HttpStatePorts};

/// Bearer token accepted by [`MockPorts::authenticated_as`].
pub const VALID_TOKEN: &str = "valid-token";

/// Mocked driving ports; set expectations, then call [`MockPorts::into_state`].
#[derive(Default)]
pub struct MockPorts {
    pub users: MockUserAccounts,
    pub fleet: MockFleet,
    pub parts: MockPartLifecycle,
    pub tokens: MockTokenService,
}

impl MockPorts {
    /// Ports whose token service resolves [`VALID_TOKEN`] to `principal` and
    /// rejects everything else.
    pub fn authenticated_as(principal: Principal) -> Self {
        let mut ports = Self::default();
        ports.tokens.expect_verify().returning(move |token| {
            if token == VALID_TOKEN {
                Ok(principal.clone())
            } else {
                Err(TokenError::invalid())
            }
        });
        ports
    }

    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(
            HttpStatePorts {
                users: Arc::new(self.users),
                fleet: Arc::new(self.fleet),
                parts: Arc::new(self.parts),
                tokens: Arc::new(self.tokens),
            },
            false,
        ))
    }
}

pub fn bearer() -> (&'static str, String) {
    ("Authorization", format!("Bearer {VALID_TOKEN}"))
}

pub fn principal(role: Role) -> Principal {
    Principal {
        user_id: UserId::new(1),
        name: "alice".to_owned(),
        role,
    }
}

pub fn fixed_time() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

pub fn user(id: i64, name: &str, role: Role) -> User {
    User {
        id: UserId::new(id),
        name: UserName::new(name).expect("valid name"),
        password_digest: PasswordDigest::new("$argon2id$stub"),
        role,
        created_at: fixed_time(),
    }
}

pub fn plane(id: i64, tail_number: &str, model: &str) -> Plane {
    Plane {
        id: PlaneId::new(id),
        tail_number: TailNumber::new(tail_number).expect("valid tail number"),
        model: PlaneModel::new(model).expect("valid model"),
        created_at: fixed_time(),
    }
}

pub fn part(id: i64, plane_id: i64, usage_hours: f64, usage_limit_hours: f64) -> Part {
    Part {
        id: PartId::new(id),
        plane_id: PlaneId::new(plane_id),
        part_name: PartName::new("Left engine").expect("valid name"),
        serial_number: SerialNumber::new(format!("SN-{id}")).expect("valid serial"),
        category: Category::new("engine").expect("valid category"),
        usage_hours: UsageHours::new(usage_hours).expect("valid usage"),
        usage_limit_hours: UsageLimitHours::new(usage_limit_hours).expect("valid limit"),
        installed_at: fixed_time(),
    }
}
