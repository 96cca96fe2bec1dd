//! Sentiment ranking classifier
//!
//! Maps a free-text admin review onto one of the ranking catalog's categories by
//! asking the oracle to pick among the rankable category names.
use std::sync::Arc;

use crate::{
    config::ClassifierSettings,
    db::RankingCatalog,
    error::{AppError, AppResult},
    models::{Ranking, RankingCategory},
    services::{bounded, oracle::Oracle},
};

/// Placeholder in the prompt template replaced by the candidate list
pub const RANKINGS_PLACEHOLDER: &str = "{rankings}";

const CANDIDATE_DELIMITER: &str = ",";

/// Joins the names of every category except the unranked placeholder, in catalog order
pub fn candidate_list(catalog: &[RankingCategory]) -> String {
    catalog
        .iter()
        .filter(|category| !category.is_unranked())
        .map(|category| category.name.as_str())
        .collect::<Vec<_>>()
        .join(CANDIDATE_DELIMITER)
}

/// Substitutes the candidates into the template (first placeholder only) and appends the review
pub fn build_prompt(template: &str, candidates: &str, review_text: &str) -> String {
    let mut prompt = template.replacen(RANKINGS_PLACEHOLDER, candidates, 1);
    prompt.push_str(review_text);
    prompt
}

/// Finds the category whose name equals the oracle's answer exactly.
///
/// The whole catalog is searched, including the unranked placeholder.
pub fn resolve<'a>(catalog: &'a [RankingCategory], answer: &str) -> Option<&'a RankingCategory> {
    catalog.iter().find(|category| category.name == answer)
}

pub struct SentimentClassifier {
    catalog: Arc<dyn RankingCatalog>,
    oracle: Arc<dyn Oracle>,
    settings: ClassifierSettings,
}

impl SentimentClassifier {
    pub fn new(
        catalog: Arc<dyn RankingCatalog>,
        oracle: Arc<dyn Oracle>,
        settings: ClassifierSettings,
    ) -> Self {
        Self {
            catalog,
            oracle,
            settings,
        }
    }

    /// Classifies a review into a ranking snapshot.
    ///
    /// Makes exactly one oracle call. Results are never cached and the oracle may
    /// answer differently for the same text.
    pub async fn classify(&self, review_text: &str) -> AppResult<Ranking> {
        let catalog = bounded(self.settings.store_timeout, self.catalog.load_all(), || {
            AppError::CatalogUnavailable("timed out loading ranking catalog".to_string())
        })
        .await?;

        if catalog.is_empty() {
            return Err(AppError::CatalogUnavailable(
                "ranking catalog is empty".to_string(),
            ));
        }

        let candidates = candidate_list(&catalog);
        let prompt = build_prompt(&self.settings.prompt_template, &candidates, review_text);

        let answer = bounded(self.settings.oracle_timeout, self.oracle.call(&prompt), || {
            AppError::Oracle(format!("{} oracle timed out", self.oracle.name()))
        })
        .await?;

        // TODO: decide whether answers should be trimmed/case-folded before matching;
        // today a stray newline from the oracle fails the classification.
        let category = resolve(&catalog, &answer).ok_or_else(|| {
            tracing::warn!(
                oracle = self.oracle.name(),
                answer = %answer,
                candidates = %candidates,
                "Oracle answer does not match any ranking category"
            );
            AppError::Oracle(format!("unrecognized ranking category: {:?}", answer))
        })?;

        tracing::info!(
            category = %category.name,
            weight = category.weight,
            "Review classified"
        );

        Ok(category.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::MockRankingCatalog;
    use crate::models::UNRANKED_WEIGHT;
    use crate::services::oracle::MockOracle;
    use crate::services::stalled::Stalled;
    use mockall::predicate::eq;
    use std::time::Duration;

    fn catalog() -> Vec<RankingCategory> {
        vec![
            RankingCategory::new("Good", 1),
            RankingCategory::new("Bad", 2),
            RankingCategory::new("Unranked", UNRANKED_WEIGHT),
        ]
    }

    fn settings() -> ClassifierSettings {
        ClassifierSettings {
            prompt_template: "Pick one of {rankings}. Review: ".to_string(),
            oracle_timeout: Duration::from_secs(5),
            store_timeout: Duration::from_secs(5),
        }
    }

    fn classifier_with(
        categories: Vec<RankingCategory>,
        oracle: MockOracle,
    ) -> SentimentClassifier {
        let mut store = MockRankingCatalog::new();
        store
            .expect_load_all()
            .returning(move || Ok(categories.clone()));
        SentimentClassifier::new(Arc::new(store), Arc::new(oracle), settings())
    }

    fn oracle_answering(answer: &'static str) -> MockOracle {
        let mut oracle = MockOracle::new();
        oracle
            .expect_call()
            .times(1)
            .returning(move |_| Ok(answer.to_string()));
        oracle.expect_name().return_const("mock");
        oracle
    }

    #[test]
    fn test_candidate_list_excludes_unranked() {
        assert_eq!(candidate_list(&catalog()), "Good,Bad");
    }

    #[test]
    fn test_candidate_list_keeps_duplicates_and_order() {
        let categories = vec![
            RankingCategory::new("Bad", 2),
            RankingCategory::new("Good", 1),
            RankingCategory::new("Bad", 2),
        ];
        assert_eq!(candidate_list(&categories), "Bad,Good,Bad");
    }

    #[test]
    fn test_candidate_list_only_unranked() {
        let categories = vec![RankingCategory::new("Unranked", UNRANKED_WEIGHT)];
        assert_eq!(candidate_list(&categories), "");
    }

    #[test]
    fn test_build_prompt_substitutes_first_placeholder_only() {
        let prompt = build_prompt("{rankings} / {rankings}: ", "Good,Bad", "Great fun");
        assert_eq!(prompt, "Good,Bad / {rankings}: Great fun");
    }

    #[test]
    fn test_resolve_is_exact() {
        let categories = catalog();
        assert_eq!(resolve(&categories, "Bad").map(|c| c.weight), Some(2));
        assert!(resolve(&categories, "bad").is_none());
        assert!(resolve(&categories, "Bad ").is_none());
        assert_eq!(
            resolve(&categories, "Unranked").map(|c| c.weight),
            Some(UNRANKED_WEIGHT)
        );
    }

    #[tokio::test]
    async fn test_classify_returns_catalog_weight() {
        let mut oracle = MockOracle::new();
        oracle
            .expect_call()
            .with(eq("Pick one of Good,Bad. Review: A triumph"))
            .times(1)
            .returning(|_| Ok("Good".to_string()));
        oracle.expect_name().return_const("mock");

        let ranking = classifier_with(catalog(), oracle)
            .classify("A triumph")
            .await
            .unwrap();

        assert_eq!(
            ranking,
            Ranking {
                weight: 1,
                category_name: "Good".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_classify_accepts_echoed_unranked_category() {
        let ranking = classifier_with(catalog(), oracle_answering("Unranked"))
            .classify("meh")
            .await
            .unwrap();
        assert_eq!(ranking.weight, UNRANKED_WEIGHT);
    }

    #[tokio::test]
    async fn test_classify_rejects_unknown_answer() {
        let err = classifier_with(catalog(), oracle_answering("Fantastic"))
            .classify("wow")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Oracle(_)));
    }

    #[tokio::test]
    async fn test_classify_rejects_untrimmed_answer() {
        let err = classifier_with(catalog(), oracle_answering("Good\n"))
            .classify("wow")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Oracle(_)));
    }

    #[tokio::test]
    async fn test_classify_empty_catalog_skips_oracle() {
        let mut oracle = MockOracle::new();
        oracle.expect_call().never();
        oracle.expect_name().return_const("mock");

        let err = classifier_with(vec![], oracle)
            .classify("anything")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CatalogUnavailable(_)));
    }

    #[tokio::test]
    async fn test_classify_catalog_failure_skips_oracle() {
        let mut store = MockRankingCatalog::new();
        store
            .expect_load_all()
            .returning(|| Err(AppError::CatalogUnavailable("connection refused".to_string())));
        let mut oracle = MockOracle::new();
        oracle.expect_call().never();

        let classifier = SentimentClassifier::new(Arc::new(store), Arc::new(oracle), settings());
        let err = classifier.classify("anything").await.unwrap_err();
        assert!(matches!(err, AppError::CatalogUnavailable(_)));
    }

    #[tokio::test]
    async fn test_classify_propagates_oracle_failure() {
        let mut oracle = MockOracle::new();
        oracle
            .expect_call()
            .times(1)
            .returning(|_| Err(AppError::Oracle("503".to_string())));
        oracle.expect_name().return_const("mock");

        let err = classifier_with(catalog(), oracle)
            .classify("anything")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Oracle(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_catalog_is_catalog_unavailable() {
        let mut oracle = MockOracle::new();
        oracle.expect_call().never();
        oracle.expect_name().return_const("mock");

        let classifier = SentimentClassifier::new(Arc::new(Stalled), Arc::new(oracle), settings());
        let err = classifier.classify("anything").await.unwrap_err();
        assert!(matches!(err, AppError::CatalogUnavailable(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_oracle_is_oracle_error() {
        let mut store = MockRankingCatalog::new();
        store.expect_load_all().returning(|| Ok(catalog()));

        let classifier = SentimentClassifier::new(Arc::new(store), Arc::new(Stalled), settings());
        let err = classifier.classify("anything").await.unwrap_err();
        assert!(matches!(err, AppError::Oracle(_)));
    }
}
