use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Ranking;

/// A movie genre
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub genre_id: i32,
    pub genre_name: String,
}

impl Genre {
    pub fn new(genre_id: i32, genre_name: impl Into<String>) -> Self {
        Self {
            genre_id,
            genre_name: genre_name.into(),
        }
    }
}

/// A movie in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    /// IMDB identifier, the catalog key (e.g. "tt1375666")
    pub imdb_id: String,
    pub title: String,
    pub poster_path: String,
    pub youtube_id: String,
    #[serde(default)]
    pub genre: Vec<Genre>,
    /// Free-text review written by an admin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_review: Option<String>,
    /// Present once the admin review has been classified at least once
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranking: Option<Ranking>,
}

impl Movie {
    /// Whether any of this movie's genres is in `genres`
    pub fn has_any_genre(&self, genres: &[String]) -> bool {
        self.genre
            .iter()
            .any(|g| genres.iter().any(|name| *name == g.genre_name))
    }

    pub fn ranking_weight(&self) -> Option<i32> {
        self.ranking.as_ref().map(|r| r.weight)
    }
}

/// Request body for adding a movie
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMovieRequest {
    #[validate(length(min = 1, message = "imdb_id is required"))]
    pub imdb_id: String,
    #[validate(length(min = 1, max = 500, message = "title must be 1-500 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "poster_path is required"))]
    pub poster_path: String,
    #[validate(length(min = 1, message = "youtube_id is required"))]
    pub youtube_id: String,
    #[validate(length(min = 1, message = "at least one genre is required"))]
    pub genre: Vec<Genre>,
}

impl From<CreateMovieRequest> for Movie {
    fn from(request: CreateMovieRequest) -> Self {
        Movie {
            imdb_id: request.imdb_id,
            title: request.title,
            poster_path: request.poster_path,
            youtube_id: request.youtube_id,
            genre: request.genre,
            admin_review: None,
            ranking: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(genres: &[&str]) -> Movie {
        Movie {
            imdb_id: "tt0133093".to_string(),
            title: "The Matrix".to_string(),
            poster_path: "/matrix.jpg".to_string(),
            youtube_id: "vKQi3bBA1y8".to_string(),
            genre: genres
                .iter()
                .enumerate()
                .map(|(i, name)| Genre::new(i as i32, *name))
                .collect(),
            admin_review: None,
            ranking: None,
        }
    }

    #[test]
    fn test_has_any_genre() {
        let m = movie(&["Action", "Sci-Fi"]);
        assert!(m.has_any_genre(&["Sci-Fi".to_string()]));
        assert!(!m.has_any_genre(&["Drama".to_string()]));
        assert!(!m.has_any_genre(&[]));
    }

    #[test]
    fn test_unranked_movie_omits_ranking() {
        let json = serde_json::to_value(movie(&["Action"])).unwrap();
        assert!(json.get("ranking").is_none());
        assert!(json.get("admin_review").is_none());
    }

    #[test]
    fn test_create_movie_request_validation() {
        let valid = CreateMovieRequest {
            imdb_id: "tt0133093".to_string(),
            title: "The Matrix".to_string(),
            poster_path: "/matrix.jpg".to_string(),
            youtube_id: "vKQi3bBA1y8".to_string(),
            genre: vec![Genre::new(1, "Action")],
        };
        assert!(valid.validate().is_ok());

        let no_genre = CreateMovieRequest {
            genre: vec![],
            ..valid.clone()
        };
        assert!(no_genre.validate().is_err());

        let no_title = CreateMovieRequest {
            title: String::new(),
            ..valid
        };
        assert!(no_title.validate().is_err());
    }
}
