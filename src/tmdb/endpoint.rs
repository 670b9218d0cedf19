//! Mapping from inbound routes to upstream TMDB calls.
//!
//! Every inbound route resolves to one [`Endpoint`]. An endpoint knows the
//! upstream path it targets and which inbound query parameters it forwards,
//! under which names and with which defaults.

use super::error::ApiError;
use super::params::UpstreamParams;
use crate::util::QueryParams;

pub const DEFAULT_PAGE: &str = "1";
pub const DEFAULT_SORT: &str = "popularity.desc";

/// Sub-resources fetched together with a movie or tv show.
pub const TITLE_APPENDS: &str = "videos,credits,similar,recommendations";
/// Sub-resources fetched together with a person.
pub const PERSON_APPENDS: &str = "movie_credits,tv_credits";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }
}

/// Curated movie lists, `/movie/{list}` upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieList {
    Popular,
    TopRated,
    Upcoming,
    NowPlaying,
}

impl MovieList {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovieList::Popular => "popular",
            MovieList::TopRated => "top_rated",
            MovieList::Upcoming => "upcoming",
            MovieList::NowPlaying => "now_playing",
        }
    }
}

/// Per-movie sub-resources with their own route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieResource {
    Credits,
    Videos,
    Similar,
    Recommendations,
}

impl MovieResource {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovieResource::Credits => "credits",
            MovieResource::Videos => "videos",
            MovieResource::Similar => "similar",
            MovieResource::Recommendations => "recommendations",
        }
    }

    fn paged(&self) -> bool {
        matches!(self, MovieResource::Similar | MovieResource::Recommendations)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `/api/movies`: search when `query` is given, discover otherwise.
    Movies,
    MovieList(MovieList),
    MovieDetails(String),
    Movie(String, MovieResource),
    PopularTv,
    TvDetails(String),
    PersonDetails(String),
    Genres(MediaKind),
    Discover(MediaKind),
    SearchMulti,
    SearchMovie,
}

/// A fully resolved upstream call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    pub path: String,
    pub params: UpstreamParams,
    /// What is being fetched, used in the failure message.
    pub what: &'static str,
}

impl Endpoint {
    /// Resolve this endpoint against the inbound query string.
    ///
    /// Fails only for search routes called without a `query`.
    pub fn resolve(&self, query: &QueryParams) -> Result<UpstreamRequest, ApiError> {
        let mut params = UpstreamParams::new();

        let (path, what) = match self {
            Endpoint::Movies => match query.get_non_empty("query") {
                Some(text) => {
                    params.insert("query", text);
                    params.insert("page", page(query));
                    ("/search/movie".to_string(), "movies")
                }
                None => {
                    params.insert("sort_by", query.get_non_empty("sort_by").unwrap_or(DEFAULT_SORT));
                    params.insert("page", page(query));
                    ("/discover/movie".to_string(), "movies")
                }
            },
            Endpoint::MovieList(list) => {
                params.insert("page", page(query));
                (format!("/movie/{}", list.as_str()), "movie list")
            }
            Endpoint::MovieDetails(id) => {
                params.insert("append_to_response", TITLE_APPENDS);
                (format!("/movie/{}", segment(id)), "movie details")
            }
            Endpoint::Movie(id, resource) => {
                if resource.paged() {
                    params.insert("page", page(query));
                }
                (
                    format!("/movie/{}/{}", segment(id), resource.as_str()),
                    match resource {
                        MovieResource::Credits => "movie credits",
                        MovieResource::Videos => "movie videos",
                        MovieResource::Similar => "similar movies",
                        MovieResource::Recommendations => "movie recommendations",
                    },
                )
            }
            Endpoint::PopularTv => {
                params.insert("page", page(query));
                ("/tv/popular".to_string(), "popular tv shows")
            }
            Endpoint::TvDetails(id) => {
                params.insert("append_to_response", TITLE_APPENDS);
                (format!("/tv/{}", segment(id)), "tv show details")
            }
            Endpoint::PersonDetails(id) => {
                params.insert("append_to_response", PERSON_APPENDS);
                (format!("/person/{}", segment(id)), "person details")
            }
            Endpoint::Genres(kind) => (format!("/genre/{}/list", kind.as_str()), "genres"),
            Endpoint::Discover(kind) => {
                params
                    .insert("page", page(query))
                    .insert("sort_by", query.get_non_empty("sort_by").unwrap_or(DEFAULT_SORT))
                    .insert_opt("with_genres", query.get_non_empty("with_genres"));
                match kind {
                    MediaKind::Movie => {
                        params.insert_opt("year", query.get_non_empty("year"));
                    }
                    MediaKind::Tv => {
                        params.insert_opt("first_air_date_year", query.get_non_empty("first_air_date_year"));
                    }
                }
                params.insert_opt("vote_average.gte", query.get_non_empty("vote_average_gte"));
                if *kind == MediaKind::Movie {
                    params.insert_opt("with_watch_providers", query.get_non_empty("with_watch_providers"));
                }
                (format!("/discover/{}", kind.as_str()), "discover results")
            }
            Endpoint::SearchMulti => {
                params
                    .insert("query", required_query(query)?)
                    .insert("page", page(query));
                ("/search/multi".to_string(), "search results")
            }
            Endpoint::SearchMovie => {
                params
                    .insert("query", required_query(query)?)
                    .insert("page", page(query));
                match query.get_non_empty("primary_release_year") {
                    Some(year) => params.insert("primary_release_year", year),
                    None => params.insert_opt("year", query.get_non_empty("year")),
                };
                params.insert_bool("include_adult", query.flag("include_adult"));
                ("/search/movie".to_string(), "movie search results")
            }
        };

        Ok(UpstreamRequest { path, params, what })
    }
}

fn page(query: &QueryParams) -> &str {
    query.get_non_empty("page").unwrap_or(DEFAULT_PAGE)
}

fn required_query(query: &QueryParams) -> Result<&str, ApiError> {
    query.get_non_empty("query").ok_or(ApiError::MissingQuery)
}

/// Identifiers come straight from the inbound path; keep them to one segment.
fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> QueryParams {
        pairs.iter().copied().collect()
    }

    fn pairs(req: &UpstreamRequest) -> Vec<(&'static str, &str)> {
        req.params.iter().collect()
    }

    #[test]
    fn test_movie_details_appends() {
        let req = Endpoint::MovieDetails("550".into())
            .resolve(&query(&[]))
            .unwrap();
        assert_eq!(req.path, "/movie/550");
        assert_eq!(
            pairs(&req),
            vec![("append_to_response", "videos,credits,similar,recommendations")]
        );
    }

    #[test]
    fn test_detail_routes_always_append() {
        let q = query(&[("append_to_response", "images"), ("page", "4")]);
        for (endpoint, appends) in [
            (Endpoint::MovieDetails("1".into()), TITLE_APPENDS),
            (Endpoint::TvDetails("1".into()), TITLE_APPENDS),
            (Endpoint::PersonDetails("1".into()), PERSON_APPENDS),
        ] {
            let req = endpoint.resolve(&q).unwrap();
            assert_eq!(pairs(&req), vec![("append_to_response", appends)]);
        }
    }

    #[test]
    fn test_id_is_single_segment() {
        let req = Endpoint::TvDetails("1/../../account".into())
            .resolve(&query(&[]))
            .unwrap();
        assert_eq!(req.path, "/tv/1%2F..%2F..%2Faccount");
    }

    #[test]
    fn test_search_requires_query() {
        for endpoint in [Endpoint::SearchMulti, Endpoint::SearchMovie] {
            let err = endpoint.resolve(&query(&[("page", "2")])).unwrap_err();
            assert!(matches!(err, ApiError::MissingQuery));
            let err = endpoint.resolve(&query(&[("query", "")])).unwrap_err();
            assert!(matches!(err, ApiError::MissingQuery));
        }
    }

    #[test]
    fn test_movies_search_or_discover() {
        let req = Endpoint::Movies
            .resolve(&query(&[("query", "alien")]))
            .unwrap();
        assert_eq!(req.path, "/search/movie");
        assert_eq!(pairs(&req), vec![("query", "alien"), ("page", "1")]);

        let req = Endpoint::Movies.resolve(&query(&[("page", "3")])).unwrap();
        assert_eq!(req.path, "/discover/movie");
        assert_eq!(
            pairs(&req),
            vec![("sort_by", "popularity.desc"), ("page", "3")]
        );
    }

    #[test]
    fn test_search_movie_year_precedence() {
        let req = Endpoint::SearchMovie
            .resolve(&query(&[
                ("query", "dune"),
                ("year", "1984"),
                ("primary_release_year", "2021"),
            ]))
            .unwrap();
        assert_eq!(req.params.get("primary_release_year"), Some("2021"));
        assert!(!req.params.contains("year"));

        let req = Endpoint::SearchMovie
            .resolve(&query(&[("query", "dune"), ("year", "1984")]))
            .unwrap();
        assert_eq!(req.params.get("year"), Some("1984"));
        assert!(!req.params.contains("primary_release_year"));
    }

    #[test]
    fn test_empty_values_count_as_absent() {
        let req = Endpoint::SearchMovie
            .resolve(&query(&[
                ("query", "dune"),
                ("primary_release_year", ""),
                ("year", "2000"),
                ("page", ""),
            ]))
            .unwrap();
        assert_eq!(
            pairs(&req),
            vec![
                ("query", "dune"),
                ("page", "1"),
                ("year", "2000"),
                ("include_adult", "false"),
            ]
        );

        let req = Endpoint::Discover(MediaKind::Movie)
            .resolve(&query(&[
                ("sort_by", ""),
                ("with_genres", ""),
                ("year", ""),
                ("vote_average_gte", ""),
                ("with_watch_providers", ""),
            ]))
            .unwrap();
        assert_eq!(
            pairs(&req),
            vec![("page", "1"), ("sort_by", "popularity.desc")]
        );

        let req = Endpoint::Discover(MediaKind::Tv)
            .resolve(&query(&[("first_air_date_year", "")]))
            .unwrap();
        assert!(!req.params.contains("first_air_date_year"));
    }

    #[test]
    fn test_include_adult_coercion() {
        for (value, expected) in [
            (Some("true"), "true"),
            (Some("True"), "false"),
            (Some("1"), "false"),
            (Some("yes"), "false"),
            (None, "false"),
        ] {
            let mut q = vec![("query", "x")];
            if let Some(v) = value {
                q.push(("include_adult", v));
            }
            let req = Endpoint::SearchMovie.resolve(&query(&q)).unwrap();
            assert_eq!(req.params.get("include_adult"), Some(expected), "{value:?}");
        }
    }

    #[test]
    fn test_discover_movie_filters() {
        let req = Endpoint::Discover(MediaKind::Movie)
            .resolve(&query(&[
                ("vote_average_gte", "7"),
                ("with_genres", "28"),
                ("first_air_date_year", "2001"),
            ]))
            .unwrap();
        assert_eq!(req.path, "/discover/movie");
        assert_eq!(
            pairs(&req),
            vec![
                ("page", "1"),
                ("sort_by", "popularity.desc"),
                ("with_genres", "28"),
                ("vote_average.gte", "7"),
            ]
        );
        assert!(!req.params.contains("vote_average_gte"));
    }

    #[test]
    fn test_discover_tv_filters() {
        let req = Endpoint::Discover(MediaKind::Tv)
            .resolve(&query(&[
                ("sort_by", "vote_average.desc"),
                ("first_air_date_year", "2008"),
                ("year", "1999"),
                ("with_watch_providers", "8"),
            ]))
            .unwrap();
        assert_eq!(req.path, "/discover/tv");
        assert_eq!(
            pairs(&req),
            vec![
                ("page", "1"),
                ("sort_by", "vote_average.desc"),
                ("first_air_date_year", "2008"),
            ]
        );
    }

    #[test]
    fn test_movie_resources() {
        let q = query(&[("page", "2")]);
        let req = Endpoint::Movie("550".into(), MovieResource::Credits)
            .resolve(&q)
            .unwrap();
        assert_eq!(req.path, "/movie/550/credits");
        assert!(req.params.is_empty());

        let req = Endpoint::Movie("550".into(), MovieResource::Recommendations)
            .resolve(&q)
            .unwrap();
        assert_eq!(req.path, "/movie/550/recommendations");
        assert_eq!(pairs(&req), vec![("page", "2")]);
    }

    #[test]
    fn test_lists_and_genres() {
        let req = Endpoint::MovieList(MovieList::NowPlaying)
            .resolve(&query(&[]))
            .unwrap();
        assert_eq!(req.path, "/movie/now_playing");
        assert_eq!(pairs(&req), vec![("page", "1")]);

        let req = Endpoint::Genres(MediaKind::Tv).resolve(&query(&[])).unwrap();
        assert_eq!(req.path, "/genre/tv/list");
        assert!(req.params.is_empty());
    }
}
