use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use domain::services::{BandService, EventService, InvitationService, MembershipService};
use domain::store::{
    BandStore, EventStore, InMemoryStore, InvitationStore, MembershipStore, ProfileStore,
};
use persistence::repositories::{
    BandRepository, EventRepository, InvitationRepository, MembershipRepository,
    ProfileRepository,
};
use shared::jwt::{JwtConfig, JwtError};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{bands, events, health, invitations, memberships, profiles};

/// Store implementations backing the services.
#[derive(Clone)]
pub struct Stores {
    pub invitations: Arc<dyn InvitationStore>,
    pub memberships: Arc<dyn MembershipStore>,
    pub bands: Arc<dyn BandStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pub events: Arc<dyn EventStore>,
    /// Set when backed by PostgreSQL; used by health checks.
    pub pool: Option<PgPool>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            invitations: Arc::new(InvitationRepository::new(pool.clone())),
            memberships: Arc::new(MembershipRepository::new(pool.clone())),
            bands: Arc::new(BandRepository::new(pool.clone())),
            profiles: Arc::new(ProfileRepository::new(pool.clone())),
            events: Arc::new(EventRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            invitations: store.clone(),
            memberships: store.clone(),
            bands: store.clone(),
            profiles: store.clone(),
            events: store,
            pool: None,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
    pub pool: Option<PgPool>,
    pub invitations: Arc<InvitationService>,
    pub memberships: Arc<MembershipService>,
    pub bands: Arc<BandService>,
    pub events: Arc<EventService>,
}

impl AppState {
    pub fn new(config: Config, stores: Stores) -> Result<Self, JwtError> {
        let jwt = JwtConfig::with_leeway(&config.jwt.secret, config.jwt.leeway_secs)?;

        let invitations = InvitationService::new(
            stores.invitations.clone(),
            stores.memberships.clone(),
            stores.profiles.clone(),
            config.invites.links(),
        );
        let memberships = MembershipService::new(stores.memberships.clone(), stores.profiles);
        let events = EventService::new(stores.events, stores.memberships.clone());
        let bands = BandService::new(stores.bands, stores.memberships);

        Ok(Self {
            config: Arc::new(config),
            jwt: Arc::new(jwt),
            pool: stores.pool,
            invitations: Arc::new(invitations),
            memberships: Arc::new(memberships),
            bands: Arc::new(bands),
            events: Arc::new(events),
        })
    }
}

pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Authentication is enforced per handler through the UserAuth extractor.
    let api_routes = Router::new()
        .route(
            "/api/v1/bands",
            post(bands::create_band).get(bands::list_bands),
        )
        .route(
            "/api/v1/bands/:band_id/invitations",
            post(invitations::create_invitation).get(invitations::list_invitations),
        )
        .route(
            "/api/v1/bands/:band_id/invitations/:invitation_id",
            delete(invitations::revoke_invitation),
        )
        .route(
            "/api/v1/bands/:band_id/events",
            post(events::create_event).get(events::list_upcoming_events),
        )
        .route(
            "/api/v1/bands/:band_id/events/:event_id",
            get(events::get_event)
                .patch(events::update_event)
                .delete(events::delete_event),
        )
        .route(
            "/api/v1/bands/:band_id/members/invite",
            post(memberships::invite_member),
        )
        .route(
            "/api/v1/invitations/:token",
            get(invitations::validate_invitation),
        )
        .route(
            "/api/v1/invitations/:token/accept",
            post(invitations::accept_invitation),
        )
        .route("/api/v1/profiles/lookup", get(profiles::lookup_user))
        .route(
            "/api/v1/memberships/pending",
            get(memberships::list_pending),
        )
        .route(
            "/api/v1/memberships/:membership_id/confirm",
            post(memberships::confirm_membership),
        )
        .route(
            "/api/v1/memberships/:membership_id",
            delete(memberships::decline_membership),
        );

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
