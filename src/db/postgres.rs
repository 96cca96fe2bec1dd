use sqlx::{postgres::PgPoolOptions, types::Json, FromRow, PgPool};

use crate::{
    db::store::{GenreStore, MovieStore, PreferencesStore, RankingCatalog},
    error::{AppError, AppResult},
    models::{Genre, Movie, PreferencesLookup, Ranking, RankingCategory},
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the bundled schema migrations
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

const MOVIE_COLUMNS: &str =
    "imdb_id, title, poster_path, youtube_id, genre, admin_review, ranking_name, ranking_value";

#[derive(Debug, FromRow)]
struct MovieRow {
    imdb_id: String,
    title: String,
    poster_path: String,
    youtube_id: String,
    genre: Json<Vec<Genre>>,
    admin_review: Option<String>,
    ranking_name: Option<String>,
    ranking_value: Option<i32>,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        let ranking = match (row.ranking_name, row.ranking_value) {
            (Some(category_name), Some(weight)) => Some(Ranking {
                weight,
                category_name,
            }),
            _ => None,
        };

        Movie {
            imdb_id: row.imdb_id,
            title: row.title,
            poster_path: row.poster_path,
            youtube_id: row.youtube_id,
            genre: row.genre.0,
            admin_review: row.admin_review,
            ranking,
        }
    }
}

/// Postgres-backed implementation of every store trait
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl MovieStore for PgStore {
    async fn list(&self) -> AppResult<Vec<Movie>> {
        let rows = sqlx::query_as::<_, MovieRow>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies ORDER BY imdb_id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn find_by_id(&self, imdb_id: &str) -> AppResult<Option<Movie>> {
        let row = sqlx::query_as::<_, MovieRow>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE imdb_id = $1"
        ))
        .bind(imdb_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Movie::from))
    }

    async fn insert(&self, movie: Movie) -> AppResult<Movie> {
        let result = sqlx::query(
            r#"
            INSERT INTO movies (imdb_id, title, poster_path, youtube_id, genre)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&movie.imdb_id)
        .bind(&movie.title)
        .bind(&movie.poster_path)
        .bind(&movie.youtube_id)
        .bind(Json(&movie.genre))
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(movie),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::Validation(
                format!("movie {} already exists", movie.imdb_id),
            )),
            Err(e) => Err(AppError::Persistence(e.to_string())),
        }
    }

    async fn update_review(
        &self,
        imdb_id: &str,
        admin_review: &str,
        ranking: &Ranking,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE movies
            SET admin_review = $2, ranking_name = $3, ranking_value = $4
            WHERE imdb_id = $1
            "#,
        )
        .bind(imdb_id)
        .bind(admin_review)
        .bind(&ranking.category_name)
        .bind(ranking.weight)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Persistence(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_genres(&self, genres: &[String], limit: i64) -> AppResult<Vec<Movie>> {
        if genres.is_empty() || limit <= 0 {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, MovieRow>(&format!(
            r#"
            SELECT {MOVIE_COLUMNS}
            FROM movies
            WHERE EXISTS (
                SELECT 1 FROM jsonb_array_elements(genre) AS g
                WHERE g->>'genre_name' = ANY($1)
            )
            ORDER BY ranking_value ASC NULLS LAST
            LIMIT $2
            "#
        ))
        .bind(genres)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Movie::from).collect())
    }
}

#[async_trait::async_trait]
impl RankingCatalog for PgStore {
    async fn load_all(&self) -> AppResult<Vec<RankingCategory>> {
        let rows: Vec<(String, i32)> =
            sqlx::query_as("SELECT ranking_name, ranking_value FROM rankings ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| AppError::CatalogUnavailable(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(name, weight)| RankingCategory { name, weight })
            .collect())
    }
}

#[async_trait::async_trait]
impl PreferencesStore for PgStore {
    async fn favourite_genres(&self, user_id: &str) -> AppResult<PreferencesLookup> {
        let row: Option<(Option<Json<serde_json::Value>>,)> =
            sqlx::query_as("SELECT favourite_genres FROM users WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AppError::Preferences(e.to_string()))?;

        Ok(match row {
            None => PreferencesLookup::NotFound,
            Some((field,)) => PreferencesLookup::from_stored(field.as_ref().map(|json| &json.0)),
        })
    }
}

#[async_trait::async_trait]
impl GenreStore for PgStore {
    async fn list(&self) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, (i32, String)>(
            "SELECT genre_id, genre_name FROM genres ORDER BY genre_id",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|(genre_id, genre_name)| Genre {
            genre_id,
            genre_name,
        })
        .collect();

        Ok(genres)
    }
}
