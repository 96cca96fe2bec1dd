//! Text-classification oracle abstraction
//!
//! The oracle is an external, possibly non-deterministic service. Services depend on
//! this trait so tests can substitute a scripted stub.
use crate::error::AppResult;

pub mod openai;

pub use openai::OpenAiOracle;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Oracle: Send + Sync {
    /// Sends one prompt and returns the raw textual answer
    async fn call(&self, prompt: &str) -> AppResult<String>;

    /// Oracle name for logging and debugging
    fn name(&self) -> &'static str;
}
