use std::sync::Arc;
use std::time::Duration;

use crate::{
    config::{ClassifierSettings, Config, RecommendationSettings},
    db::{GenreStore, MovieStore, PreferencesStore, RankingCatalog},
    middleware::TokenValidator,
    services::{Oracle, RecommendationEngine, SentimentClassifier},
};

/// Store collaborators shared by the handlers
#[derive(Clone)]
pub struct Stores {
    pub movies: Arc<dyn MovieStore>,
    pub rankings: Arc<dyn RankingCatalog>,
    pub preferences: Arc<dyn PreferencesStore>,
    pub genres: Arc<dyn GenreStore>,
}

/// Process-wide settings handed to the services at construction
#[derive(Debug, Clone)]
pub struct Settings {
    pub classifier: ClassifierSettings,
    pub recommendations: RecommendationSettings,
    pub store_timeout: Duration,
    pub jwt_secret: String,
}

impl From<&Config> for Settings {
    fn from(config: &Config) -> Self {
        Self {
            classifier: config.classifier_settings(),
            recommendations: config.recommendation_settings(),
            store_timeout: config.store_timeout(),
            jwt_secret: config.jwt_secret.clone(),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub movies: Arc<dyn MovieStore>,
    pub genres: Arc<dyn GenreStore>,
    pub classifier: Arc<SentimentClassifier>,
    pub recommendations: Arc<RecommendationEngine>,
    pub tokens: Arc<TokenValidator>,
    pub store_timeout: Duration,
}

impl AppState {
    pub fn new(stores: Stores, oracle: Arc<dyn Oracle>, settings: Settings) -> Self {
        let classifier = SentimentClassifier::new(stores.rankings, oracle, settings.classifier);
        let recommendations = RecommendationEngine::new(
            stores.preferences,
            stores.movies.clone(),
            settings.recommendations,
        );

        Self {
            movies: stores.movies,
            genres: stores.genres,
            classifier: Arc::new(classifier),
            recommendations: Arc::new(recommendations),
            tokens: Arc::new(TokenValidator::new(&settings.jwt_secret)),
            store_timeout: settings.store_timeout,
        }
    }
}
