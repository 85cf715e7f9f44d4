//! Shared helpers for HTTP-level integration tests.
//!
//! [`InMemoryStore`] implements every repository port over plain vectors so
//! the real domain services, the Argon2 hasher and the JWT token service can
//! be driven through the actix app without PostgreSQL.

#![allow(dead_code, reason = "each test crate uses a different subset")]

use std::sync::{Arc, Mutex, MutexGuard};

use actix_web::test::TestRequest;
use actix_web::web;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use serde_json::json;

use aircraft_backend::domain::ports::{
    PartPersistenceError, PartRepository, PlanePersistenceError, PlaneRepository, TokenService,
    UserPersistenceError, UserRepository,
};
use aircraft_backend::domain::{
    Category, FleetService, NewPart, NewPlane, NewUser, Part, PartId, PartLifecycleService,
    PasswordDigest, Plane, PlaneId, Role, SerialNumber, TailNumber, UsageHours, User,
    UserAccountService, UserId, UserName,
};
use aircraft_backend::inbound::http::state::{HttpState, HttpStatePorts};
use aircraft_backend::outbound::security::{Argon2PasswordHasher, JwtTokenService};

pub const SECRET: &str = "integration-secret";

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        let start = Utc
            .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp");
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock lock");
        *now += by;
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    planes: Vec<Plane>,
    parts: Vec<Part>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Repository double enforcing the same unique keys as the SQL schema.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().expect("store lock")
    }

    pub fn part(&self, id: i64) -> Option<Part> {
        self.tables()
            .parts
            .iter()
            .find(|part| part.id.get() == id)
            .cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut tables = self.tables();
        if tables.users.iter().any(|row| row.name == user.name) {
            return Err(UserPersistenceError::duplicate("users_name_key"));
        }
        let row = User {
            id: UserId::new(tables.next_id()),
            name: user.name.clone(),
            password_digest: user.password_digest.clone(),
            role: user.role,
            created_at: Utc::now(),
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.tables().users.iter().find(|row| row.id == id).cloned())
    }

    async fn find_by_name(&self, name: &UserName) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|row| &row.name == name)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.tables().users.clone())
    }

    async fn update(&self, user: &User) -> Result<User, UserPersistenceError> {
        let mut tables = self.tables();
        if tables
            .users
            .iter()
            .any(|row| row.id != user.id && row.name == user.name)
        {
            return Err(UserPersistenceError::duplicate("users_name_key"));
        }
        let row = tables
            .users
            .iter_mut()
            .find(|row| row.id == user.id)
            .ok_or_else(|| UserPersistenceError::not_found("record not found"))?;
        *row = user.clone();
        Ok(row.clone())
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        let mut tables = self.tables();
        let before = tables.users.len();
        tables.users.retain(|row| row.id != id);
        Ok(tables.users.len() < before)
    }
}

#[async_trait]
impl PlaneRepository for InMemoryStore {
    async fn insert(&self, plane: &NewPlane) -> Result<Plane, PlanePersistenceError> {
        let mut tables = self.tables();
        if tables
            .planes
            .iter()
            .any(|row| row.tail_number == plane.tail_number)
        {
            return Err(PlanePersistenceError::duplicate("planes_tail_number_key"));
        }
        let row = Plane {
            id: PlaneId::new(tables.next_id()),
            tail_number: plane.tail_number.clone(),
            model: plane.model.clone(),
            created_at: Utc::now(),
        };
        tables.planes.push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: PlaneId) -> Result<Option<Plane>, PlanePersistenceError> {
        Ok(self.tables().planes.iter().find(|row| row.id == id).cloned())
    }

    async fn find_by_tail_number(
        &self,
        tail_number: &TailNumber,
    ) -> Result<Option<Plane>, PlanePersistenceError> {
        Ok(self
            .tables()
            .planes
            .iter()
            .find(|row| &row.tail_number == tail_number)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Plane>, PlanePersistenceError> {
        Ok(self.tables().planes.clone())
    }

    async fn update(&self, plane: &Plane) -> Result<Plane, PlanePersistenceError> {
        let mut tables = self.tables();
        let row = tables
            .planes
            .iter_mut()
            .find(|row| row.id == plane.id)
            .ok_or_else(|| PlanePersistenceError::not_found("record not found"))?;
        *row = plane.clone();
        Ok(row.clone())
    }

    async fn delete(&self, id: PlaneId) -> Result<bool, PlanePersistenceError> {
        let mut tables = self.tables();
        let before = tables.planes.len();
        tables.planes.retain(|row| row.id != id);
        Ok(tables.planes.len() < before)
    }
}

#[async_trait]
impl PartRepository for InMemoryStore {
    async fn insert(&self, part: &NewPart) -> Result<Part, PartPersistenceError> {
        let mut tables = self.tables();
        if tables
            .parts
            .iter()
            .any(|row| row.serial_number == part.serial_number)
        {
            return Err(PartPersistenceError::duplicate("plane_parts_serial_number_key"));
        }
        let row = Part {
            id: PartId::new(tables.next_id()),
            plane_id: part.plane_id,
            part_name: part.part_name.clone(),
            serial_number: part.serial_number.clone(),
            category: part.category.clone(),
            usage_hours: part.usage_hours,
            usage_limit_hours: part.usage_limit_hours,
            installed_at: Utc::now(),
        };
        tables.parts.push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: PartId) -> Result<Option<Part>, PartPersistenceError> {
        Ok(self.tables().parts.iter().find(|row| row.id == id).cloned())
    }

    async fn find_by_serial_number(
        &self,
        serial_number: &SerialNumber,
    ) -> Result<Option<Part>, PartPersistenceError> {
        Ok(self
            .tables()
            .parts
            .iter()
            .find(|row| &row.serial_number == serial_number)
            .cloned())
    }

    async fn list_by_plane(
        &self,
        plane_id: PlaneId,
        category: Option<Category>,
    ) -> Result<Vec<Part>, PartPersistenceError> {
        Ok(self
            .tables()
            .parts
            .iter()
            .filter(|row| row.plane_id == plane_id)
            .filter(|row| category.as_ref().is_none_or(|wanted| &row.category == wanted))
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Part>, PartPersistenceError> {
        Ok(self.tables().parts.clone())
    }

    async fn update_details(&self, part: &Part) -> Result<Part, PartPersistenceError> {
        let mut tables = self.tables();
        let row = tables
            .parts
            .iter_mut()
            .find(|row| row.id == part.id)
            .ok_or_else(|| PartPersistenceError::not_found("record not found"))?;
        *row = Part {
            usage_hours: row.usage_hours,
            ..part.clone()
        };
        Ok(row.clone())
    }

    async fn update_usage(
        &self,
        id: PartId,
        usage_hours: UsageHours,
    ) -> Result<Part, PartPersistenceError> {
        let mut tables = self.tables();
        let row = tables
            .parts
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| PartPersistenceError::not_found("record not found"))?;
        if usage_hours.get() > row.usage_limit_hours.get() {
            return Err(PartPersistenceError::usage_limit_exceeded(
                row.usage_limit_hours.get().to_string(),
            ));
        }
        row.usage_hours = usage_hours;
        Ok(row.clone())
    }

    async fn delete(&self, id: PartId) -> Result<bool, PartPersistenceError> {
        let mut tables = self.tables();
        let before = tables.parts.len();
        tables.parts.retain(|row| row.id != id);
        Ok(tables.parts.len() < before)
    }
}

/// Real services over an [`InMemoryStore`], with handles kept for
/// assertions and token minting.
pub struct TestHarness {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<ManualClock>,
    pub tokens: Arc<JwtTokenService>,
    pub state: web::Data<HttpState>,
}

impl TestHarness {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::default());
        let clock = Arc::new(ManualClock::new());
        let tokens = Arc::new(JwtTokenService::new(SECRET, 1, clock.clone()));
        let ports = HttpStatePorts {
            users: Arc::new(UserAccountService::new(
                store.clone(),
                Arc::new(Argon2PasswordHasher),
                tokens.clone(),
            )),
            fleet: Arc::new(FleetService::new(store.clone())),
            parts: Arc::new(PartLifecycleService::new(store.clone(), store.clone())),
            tokens: tokens.clone(),
        };
        let state = web::Data::new(HttpState::new(ports, false));
        Self {
            store,
            clock,
            tokens,
            state,
        }
    }

    /// Insert an account directly and sign a token for it, skipping the
    /// password hash.
    pub async fn token_for(&self, name: &str, role: Role) -> String {
        let user = UserRepository::insert(
            self.store.as_ref(),
            &NewUser {
                name: UserName::new(name).expect("valid name"),
                password_digest: PasswordDigest::new("unused"),
                role,
            },
        )
        .await
        .expect("insert user");
        self.tokens.issue(&user).expect("issue token").token
    }
}

/// Build the full `/api` app with trace middleware around `state`.
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($state)
                .wrap(aircraft_backend::Trace)
                .service(aircraft_backend::inbound::http::api_scope()),
        )
        .await
    };
}

pub fn authed(request: TestRequest, token: &str) -> TestRequest {
    request.insert_header(("Authorization", format!("Bearer {token}")))
}

pub fn create_plane_request(token: &str, tail_number: &str, model: &str) -> TestRequest {
    authed(TestRequest::post().uri("/api/planes"), token)
        .set_json(json!({"tail_number": tail_number, "model": model}))
}

pub fn add_part_request(
    token: &str,
    plane_id: i64,
    serial_number: &str,
    usage_hours: f64,
    usage_limit_hours: f64,
) -> TestRequest {
    authed(
        TestRequest::post().uri(&format!("/api/planes/{plane_id}/parts")),
        token,
    )
    .set_json(json!({
        "part_name": "Hydraulic pump",
        "serial_number": serial_number,
        "category": "hydraulics",
        "usage_hours": usage_hours,
        "usage_limit_hours": usage_limit_hours,
    }))
}
