use serde::{Deserialize, Serialize};

pub mod movie;
pub mod ranking;
pub mod user_preferences;

pub use movie::{CreateMovieRequest, Genre, Movie};
pub use ranking::{Ranking, RankingCategory, UNRANKED_WEIGHT};
pub use user_preferences::{favourite_genre_names, PreferencesLookup};

/// Request body for an admin review update
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewUpdateRequest {
    #[serde(alias = "reviewText", alias = "AdminReview")]
    pub admin_review: String,
}

/// Response returned after a review has been classified and stored
///
/// Serialized as `{"categoryName", "reviewText"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewUpdateResponse {
    pub category_name: String,
    pub review_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_update_request_aliases() {
        let a: ReviewUpdateRequest =
            serde_json::from_str(r#"{"admin_review": "Loved it"}"#).unwrap();
        let b: ReviewUpdateRequest =
            serde_json::from_str(r#"{"reviewText": "Loved it"}"#).unwrap();
        assert_eq!(a.admin_review, "Loved it");
        assert_eq!(b.admin_review, "Loved it");
    }

    #[test]
    fn test_review_update_response_field_names() {
        let json = serde_json::to_value(ReviewUpdateResponse {
            category_name: "Good".to_string(),
            review_text: "Fun".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"categoryName": "Good", "reviewText": "Fun"}));
    }
}
