use super::{ApiRequest, MovieId};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

// Common

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: MovieId,
    /// Empty when the backend omits it; one untitled record must not fail
    /// the whole listing
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
}

// Requests

#[derive(Default, Debug, Clone, Serialize)]
pub struct ListPopularMovies;

impl ListPopularMovies {
    pub fn new() -> Self {
        Self
    }
}

impl ApiRequest for ListPopularMovies {
    type Response = Vec<Movie>;

    fn endpoint(&self) -> Cow<'_, str> {
        "/movies/popular".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_movie_wire_format() {
        let movies: Vec<Movie> = serde_json::from_value(json!([
            { "id": 7, "title": "Heat", "genre": "Crime", "posterUrl": "https://img/heat.jpg" },
            { "id": "tt0113277", "title": "Heat (1995)", "genre": null }
        ]))
        .unwrap();

        assert_eq!(movies[0].id, MovieId::Number(7));
        assert_eq!(movies[0].poster_url.as_deref(), Some("https://img/heat.jpg"));
        assert_eq!(movies[1].id, MovieId::from("tt0113277"));
        assert_eq!(movies[1].genre, None);
        assert_eq!(movies[1].poster_url, None);
    }

    #[test]
    fn test_missing_title_keeps_the_listing() {
        let movies: Vec<Movie> = serde_json::from_value(json!([
            { "id": 1, "title": "Ran" },
            { "id": 2, "genre": "Noir" }
        ]))
        .unwrap();

        assert_eq!(movies.len(), 2);
        assert_eq!(movies[1].title, "");
        assert_eq!(movies[1].genre.as_deref(), Some("Noir"));
    }
}
