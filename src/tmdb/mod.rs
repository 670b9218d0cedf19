pub mod client;
pub mod endpoint;
pub mod error;
pub mod handlers;
pub mod params;

pub use client::{TmdbClient, UpstreamResponse};
pub use endpoint::{Endpoint, MediaKind, MovieList, MovieResource, UpstreamRequest};
pub use error::{ApiError, TmdbError};
pub use handlers::*;
pub use params::UpstreamParams;
