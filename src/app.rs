use std::sync::Arc;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::database::Store;
use crate::handlers::{blogs, persons, public, users};
use crate::middleware::jwt_auth_middleware;
use crate::services::{AccountService, BlogService, PersonService};

/// Per-process state handed to every request: built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    pub fn blogs(&self) -> BlogService {
        BlogService::new(self.store.clone())
    }

    pub fn accounts(&self) -> AccountService {
        AccountService::new(self.store.clone())
    }

    pub fn persons(&self) -> PersonService {
        PersonService::new(self.store.clone())
    }
}

pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security);

    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/info", get(public::info))
        .route("/health", get(public::health))
        .merge(blog_routes(state.clone()))
        .merge(user_routes())
        .merge(person_routes())
        .fallback(public::unknown_endpoint)
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn blog_routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/blogs", get(blogs::list))
        .route("/api/blogs/:id", get(blogs::get));

    // Mutations need a resolved account
    let owned = Router::new()
        .route("/api/blogs", post(blogs::create))
        .route("/api/blogs/:id", put(blogs::update).delete(blogs::delete))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware));

    public.merge(owned)
}

fn user_routes() -> Router<AppState> {
    Router::new().route("/api/users", get(users::list).post(users::create))
}

fn person_routes() -> Router<AppState> {
    Router::new()
        .route("/api/persons", get(persons::list).post(persons::create))
        .route(
            "/api/persons/:id",
            get(persons::get).put(persons::update).delete(persons::delete),
        )
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}
