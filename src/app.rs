use axum::{
    extract::DefaultBodyLimit,
    http::{request::Parts, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::SecurityConfig;
use crate::database::models::{Coach, Credential, League, Player, Team};
use crate::error::ErrorReply;
use crate::handlers::auth::{AuthReply, CredentialsRequest};
use crate::handlers::resources::{coaches, leagues, players, roster, teams};
use crate::handlers::{auth, health};
use crate::middleware::authentication_gate;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(title = "Deportes API", description = "Ligas, equipos, jugadores y entrenadores"),
    paths(
        auth::register::register,
        auth::login::login,
        leagues::list,
        leagues::show,
        leagues::create,
        leagues::update,
        leagues::delete,
        teams::list,
        teams::show,
        teams::create,
        teams::update,
        teams::delete,
        roster::team_players,
        players::list,
        players::show,
        players::create,
        players::update,
        players::delete,
        coaches::list,
        coaches::show,
        coaches::create,
        coaches::update,
        coaches::delete,
        health::health,
    ),
    components(schemas(
        League,
        Team,
        Player,
        Coach,
        Credential,
        CredentialsRequest,
        AuthReply,
        ErrorReply
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Registro e inicio de sesión"),
        (name = "ligas", description = "Ligas y sus equipos"),
        (name = "equipos", description = "Equipos y plantillas"),
        (name = "jugadores", description = "Jugadores"),
        (name = "entrenadores", description = "Entrenadores"),
        (name = "health", description = "Estado del servicio")
    )
)]
pub struct ApiDoc;

/// `bearer_auth` scheme referenced by every write operation.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub fn app(state: AppState) -> Router {
    let body_limit = state.config.api.max_request_size_bytes;
    let cors = cors_layer(&state.config.security);

    let mut router = Router::new()
        // Public
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .merge(auth_routes())
        // Entities, under their Spanish paths and English aliases
        .merge(leagues::routes("ligas"))
        .merge(leagues::routes("leagues"))
        .merge(teams::routes("equipos"))
        .merge(teams::routes("teams"))
        .merge(players::routes("jugadores"))
        .merge(players::routes("players"))
        .merge(coaches::routes("entrenadores"))
        .merge(coaches::routes("coaches"))
        .route("/api/equipos/:id/jugadores", get(roster::team_players))
        .route("/api/teams/:id/players", get(roster::team_players))
        // Global middleware, outermost first
        .layer(
            ServiceBuilder::new()
                .layer(cors)
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(middleware::from_fn_with_state(state.clone(), authentication_gate)),
        );

    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let allowed: Vec<String> = security.cors_origins.clone();

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _: &Parts| {
            origin.to_str().map_or(false, |origin| {
                is_localhost(origin) || allowed.iter().any(|a| a == origin)
            })
        }))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

/// `http://localhost` on any port.
fn is_localhost(origin: &str) -> bool {
    match origin.strip_prefix("http://localhost") {
        Some("") => true,
        Some(rest) => rest
            .strip_prefix(':')
            .is_some_and(|port| !port.is_empty() && port.chars().all(|c| c.is_ascii_digit())),
        None => false,
    }
}
