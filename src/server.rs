use axum::{
    extract::Request,
    http::{HeaderValue, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{Config, ConfigError};
use crate::tmdb::TmdbClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tmdb: Arc<TmdbClient>,
}

impl AppState {
    pub fn new(config: Config, tmdb: TmdbClient) -> Self {
        Self {
            config: Arc::new(config),
            tmdb: Arc::new(tmdb),
        }
    }
}

pub fn build_router(state: AppState) -> Result<Router, ConfigError> {
    let movie_routes = Router::new()
        .route("/api/movies", get(crate::tmdb::movies))
        .route("/api/movies/popular", get(crate::tmdb::popular_movies))
        .route("/api/movies/top_rated", get(crate::tmdb::top_rated_movies))
        .route("/api/movies/upcoming", get(crate::tmdb::upcoming_movies))
        .route("/api/movies/now_playing", get(crate::tmdb::now_playing_movies))
        .route("/api/movies/:id", get(crate::tmdb::movie_details))
        .route("/api/movies/:id/credits", get(crate::tmdb::movie_credits))
        .route("/api/movies/:id/videos", get(crate::tmdb::movie_videos))
        .route("/api/movies/:id/similar", get(crate::tmdb::similar_movies))
        .route(
            "/api/movies/:id/recommendations",
            get(crate::tmdb::movie_recommendations),
        );

    let other_routes = Router::new()
        .route("/api/tv/popular", get(crate::tmdb::popular_tv))
        .route("/api/tv/:id", get(crate::tmdb::tv_details))
        .route("/api/person/:id", get(crate::tmdb::person_details))
        .route("/api/genres/movie", get(crate::tmdb::movie_genres))
        .route("/api/genres/tv", get(crate::tmdb::tv_genres))
        .route("/api/discover/movie", get(crate::tmdb::discover_movies))
        .route("/api/discover/tv", get(crate::tmdb::discover_tv))
        .route("/api/search/multi", get(crate::tmdb::search_multi))
        .route("/api/search/movie", get(crate::tmdb::search_movie))
        .route(
            "/api/search/movies",
            get(crate::tmdb::search_movies_redirect),
        );

    let cors = cors_layer(state.config.cors_allow_origin()?);

    let router = Router::new()
        .route("/", get(root_handler))
        .merge(movie_routes)
        .merge(other_routes)
        .fallback(fallback_handler)
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(router)
}

fn cors_layer(origin: Option<HeaderValue>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin {
        Some(origin) => layer.allow_origin(AllowOrigin::exact(origin)),
        None => layer.allow_origin(Any),
    }
}

async fn root_handler() -> &'static str {
    "TMDB proxy server is running"
}

async fn fallback_handler(req: Request) -> impl IntoResponse {
    if req.method() == axum::http::Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}
