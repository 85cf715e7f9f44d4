//! Wire repositories, security adapters and domain services into the HTTP
//! state bundle.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use aircraft_backend::domain::ports::{PartRepository, PlaneRepository, UserRepository};
use aircraft_backend::domain::{FleetService, PartLifecycleService, UserAccountService};
use aircraft_backend::inbound::http::state::{HttpState, HttpStatePorts};
use aircraft_backend::outbound::persistence::{
    DieselPartRepository, DieselPlaneRepository, DieselUserRepository, UnconfiguredStore,
};
use aircraft_backend::outbound::security::{Argon2PasswordHasher, JwtTokenService};

use super::ServerConfig;

/// Build the driving ports over one set of repositories.
fn build_ports<U, P, Q>(
    users: Arc<U>,
    planes: Arc<P>,
    parts: Arc<Q>,
    tokens: Arc<JwtTokenService>,
) -> HttpStatePorts
where
    U: UserRepository + 'static,
    P: PlaneRepository + 'static,
    Q: PartRepository + 'static,
{
    HttpStatePorts {
        users: Arc::new(UserAccountService::new(
            users,
            Arc::new(Argon2PasswordHasher),
            tokens.clone(),
        )),
        fleet: Arc::new(FleetService::new(planes.clone())),
        parts: Arc::new(PartLifecycleService::new(parts, planes)),
        tokens,
    }
}

/// Build the HTTP state, backed by Diesel when a pool is configured and by
/// [`UnconfiguredStore`] otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let tokens = Arc::new(JwtTokenService::new(
        &config.secret,
        config.token_exp_hours,
        Arc::new(DefaultClock),
    ));

    let ports = match &config.db_pool {
        Some(pool) => build_ports(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselPlaneRepository::new(pool.clone())),
            Arc::new(DieselPartRepository::new(pool.clone())),
            tokens,
        ),
        None => {
            let store = Arc::new(UnconfiguredStore);
            build_ports(store.clone(), store.clone(), store, tokens)
        }
    };

    web::Data::new(HttpState::new(ports, config.cookie_secure))
}
