use axum::{
    extract::{Path, Query, RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::error;

use super::endpoint::{Endpoint, MediaKind, MovieList, MovieResource};
use super::error::ApiError;
use crate::server::AppState;
use crate::util::QueryParams;

/// Resolve `endpoint`, make the one upstream call and relay its answer.
pub async fn forward(
    state: &AppState,
    endpoint: Endpoint,
    params: &QueryParams,
) -> Result<Response, ApiError> {
    let request = endpoint.resolve(params)?;

    match state.tmdb.get(&request.path, &request.params).await {
        Ok(upstream) => Ok((
            upstream.status,
            [(header::CONTENT_TYPE, "application/json")],
            upstream.body,
        )
            .into_response()),
        Err(e) => {
            error!("Error fetching {}: {}", request.what, e);
            Err(ApiError::Upstream {
                what: request.what,
                source: e,
            })
        }
    }
}

pub async fn movies(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    forward(&state, Endpoint::Movies, &params).await
}

pub async fn popular_movies(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    forward(&state, Endpoint::MovieList(MovieList::Popular), &params).await
}

pub async fn top_rated_movies(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    forward(&state, Endpoint::MovieList(MovieList::TopRated), &params).await
}

pub async fn upcoming_movies(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    forward(&state, Endpoint::MovieList(MovieList::Upcoming), &params).await
}

pub async fn now_playing_movies(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    forward(&state, Endpoint::MovieList(MovieList::NowPlaying), &params).await
}

pub async fn movie_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    forward(&state, Endpoint::MovieDetails(id), &params).await
}

pub async fn movie_credits(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    forward(&state, Endpoint::Movie(id, MovieResource::Credits), &params).await
}

pub async fn movie_videos(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    forward(&state, Endpoint::Movie(id, MovieResource::Videos), &params).await
}

pub async fn similar_movies(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    forward(&state, Endpoint::Movie(id, MovieResource::Similar), &params).await
}

pub async fn movie_recommendations(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    forward(
        &state,
        Endpoint::Movie(id, MovieResource::Recommendations),
        &params,
    )
    .await
}

pub async fn popular_tv(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    forward(&state, Endpoint::PopularTv, &params).await
}

pub async fn tv_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    forward(&state, Endpoint::TvDetails(id), &params).await
}

pub async fn person_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    forward(&state, Endpoint::PersonDetails(id), &params).await
}

pub async fn movie_genres(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    forward(&state, Endpoint::Genres(MediaKind::Movie), &params).await
}

pub async fn tv_genres(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    forward(&state, Endpoint::Genres(MediaKind::Tv), &params).await
}

pub async fn discover_movies(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    forward(&state, Endpoint::Discover(MediaKind::Movie), &params).await
}

pub async fn discover_tv(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    forward(&state, Endpoint::Discover(MediaKind::Tv), &params).await
}

pub async fn search_multi(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    forward(&state, Endpoint::SearchMulti, &params).await
}

pub async fn search_movie(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    forward(&state, Endpoint::SearchMovie, &params).await
}

/// Deprecated alias: `/api/search/movies` moved to `/api/search/movie`.
/// The query string is passed along untouched.
pub async fn search_movies_redirect(RawQuery(query): RawQuery) -> impl IntoResponse {
    let location = match query {
        Some(q) if !q.is_empty() => format!("/api/search/movie?{}", q),
        _ => "/api/search/movie".to_string(),
    };
    (StatusCode::FOUND, [(header::LOCATION, location)])
}
