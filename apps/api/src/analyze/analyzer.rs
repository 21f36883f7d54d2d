//! Resume analyzer: pluggable, trait-based backend that turns resume text into the
//! free-text ATS report the client parses.
//!
//! Default: `LlmResumeAnalyzer` (prompted completion via `llm_client`).
//! `AppState` holds an `Arc<dyn ResumeAnalyzer>`, chosen at startup.

use async_trait::async_trait;

use crate::errors::AppError;
use crate::llm_client::prompts::{build_analyze_prompt, ANALYZE_SYSTEM};
use crate::llm_client::LlmClient;

#[async_trait]
pub trait ResumeAnalyzer: Send + Sync {
    async fn analyze(&self, resume_text: &str, role: &str) -> Result<String, AppError>;
}

pub struct LlmResumeAnalyzer(pub LlmClient);

#[async_trait]
impl ResumeAnalyzer for LlmResumeAnalyzer {
    async fn analyze(&self, resume_text: &str, role: &str) -> Result<String, AppError> {
        let prompt = build_analyze_prompt(role, resume_text);
        self.0
            .call_text(&prompt, ANALYZE_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Resume analysis failed: {e}")))
    }
}
