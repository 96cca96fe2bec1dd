use serde::{Deserialize, Serialize};

/// Weight reserved for the placeholder category that is never offered to the oracle
pub const UNRANKED_WEIGHT: i32 = 999;

/// A sentiment category in the ranking catalog
///
/// Lower weights rank better.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RankingCategory {
    #[serde(rename = "ranking_name")]
    pub name: String,
    #[serde(rename = "ranking_value")]
    pub weight: i32,
}

impl RankingCategory {
    pub fn new(name: impl Into<String>, weight: i32) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }

    /// Whether this is the placeholder category excluded from classification
    pub fn is_unranked(&self) -> bool {
        self.weight == UNRANKED_WEIGHT
    }

    /// Copies this category into a snapshot stored on a movie
    pub fn snapshot(&self) -> Ranking {
        Ranking {
            weight: self.weight,
            category_name: self.name.clone(),
        }
    }
}

/// Ranking snapshot stored on a movie
///
/// This is a copy taken at classification time, so later catalog edits never change
/// movies that were already classified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ranking {
    #[serde(rename = "ranking_value")]
    pub weight: i32,
    #[serde(rename = "ranking_name")]
    pub category_name: String,
}
