use std::future::Future;
use std::time::Duration;

use crate::error::{AppError, AppResult};

pub mod catalog;
pub mod classifier;
pub mod oracle;
pub mod recommendations;
pub mod review;

pub use classifier::SentimentClassifier;
pub use oracle::{OpenAiOracle, Oracle};
pub use recommendations::RecommendationEngine;

/// Runs an external call under a time budget.
///
/// On expiry the call is dropped (cancelling it) and `on_timeout` builds the error.
pub async fn bounded<T, F>(
    budget: Duration,
    call: F,
    on_timeout: impl FnOnce() -> AppError,
) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(budget, call).await {
        Ok(result) => result,
        Err(_) => {
            let err = on_timeout();
            tracing::warn!(budget_ms = budget.as_millis() as u64, error = %err, "External call timed out");
            Err(err)
        }
    }
}

/// Dependencies that never answer, for exercising time budgets
#[cfg(test)]
pub(crate) mod stalled {
    use std::future::pending;

    use crate::{
        db::{MovieStore, PreferencesStore, RankingCatalog},
        error::AppResult,
        models::{Movie, PreferencesLookup, Ranking, RankingCategory},
        services::Oracle,
    };

    pub struct Stalled;

    #[async_trait::async_trait]
    impl RankingCatalog for Stalled {
        async fn load_all(&self) -> AppResult<Vec<RankingCategory>> {
            pending().await
        }
    }

    #[async_trait::async_trait]
    impl Oracle for Stalled {
        async fn call(&self, _prompt: &str) -> AppResult<String> {
            pending().await
        }

        fn name(&self) -> &'static str {
            "stalled"
        }
    }

    #[async_trait::async_trait]
    impl PreferencesStore for Stalled {
        async fn favourite_genres(&self, _user_id: &str) -> AppResult<PreferencesLookup> {
            pending().await
        }
    }

    #[async_trait::async_trait]
    impl MovieStore for Stalled {
        async fn list(&self) -> AppResult<Vec<Movie>> {
            pending().await
        }

        async fn find_by_id(&self, _imdb_id: &str) -> AppResult<Option<Movie>> {
            pending().await
        }

        async fn insert(&self, _movie: Movie) -> AppResult<Movie> {
            pending().await
        }

        async fn update_review(
            &self,
            _imdb_id: &str,
            _admin_review: &str,
            _ranking: &Ranking,
        ) -> AppResult<bool> {
            pending().await
        }

        async fn find_by_genres(&self, _genres: &[String], _limit: i64) -> AppResult<Vec<Movie>> {
            pending().await
        }
    }
}
