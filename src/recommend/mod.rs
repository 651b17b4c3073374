pub mod fallback;
pub mod parser;

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::LlmResult;
use crate::instrumentation::{RequestLog, RequestLogger};
use crate::llm::Completion;
use crate::prompt::build_prompt;

pub use fallback::select_fallback;
pub use parser::Recommendation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Api,
    Fallback,
}

/// Text produced by one pipeline run, always in the `KEY: value` convention
/// when it came from the fallback table.
#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub source: ReplySource,
    pub latency_ms: u64,
}

impl Reply {
    pub fn recommendation(&self) -> Option<Recommendation> {
        Recommendation::parse(&self.text)
    }
}

pub struct Recommender<C> {
    llm: C,
    logger: Option<RequestLogger>,
}

impl<C: Completion> Recommender<C> {
    pub fn new(llm: C) -> Self {
        Self { llm, logger: None }
    }

    pub fn with_logger(mut self, logger: RequestLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Prompt -> completion -> fallback. Only a configuration error is
    /// returned; every other failure is replaced by a canned recommendation.
    pub async fn recommend(&self, category: Category, user_input: &str) -> LlmResult<Reply> {
        let start = Instant::now();
        let prompt = build_prompt(category, user_input);

        let (text, source) = match self.llm.complete(&prompt).await {
            Ok(text) => (text, ReplySource::Api),
            Err(e) if e.is_config() => {
                tracing::error!(error = %e, "completion client is not configured");
                return Err(e);
            }
            Err(e) => {
                tracing::warn!(error = %e, %category, "LLM call failed, using fallback recommendation");
                let rec = select_fallback(category, user_input);
                (rec.to_block(), ReplySource::Fallback)
            }
        };

        let reply = Reply {
            text,
            source,
            latency_ms: start.elapsed().as_millis() as u64,
        };

        if let Some(logger) = &self.logger {
            let log = RequestLog::new(category, user_input, &reply);
            if let Err(e) = logger.write(&log) {
                tracing::warn!(error = %e, "failed to write request log");
            }
        }

        Ok(reply)
    }

    /// Like [`Recommender::recommend`] but for a raw category name.
    pub async fn recommend_for(&self, category: &str, user_input: &str) -> LlmResult<Reply> {
        self.recommend(Category::resolve(category), user_input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records prompts and answers with a fixed result.
    struct FakeLlm {
        answer: fn() -> LlmResult<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeLlm {
        fn new(answer: fn() -> LlmResult<String>) -> Self {
            Self {
                answer,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Completion for FakeLlm {
        async fn complete(&self, prompt: &str) -> LlmResult<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            (self.answer)()
        }
    }

    #[tokio::test]
    async fn api_text_is_returned_verbatim() {
        let llm = FakeLlm::new(|| Ok("TITLE: Frieren\nGENRE: Fantasy\nRATING: 9/10\nDESCRIPTION: Elf.".into()));
        let recommender = Recommender::new(llm);
        let reply = recommender.recommend(Category::Anime, "slow fantasy").await.unwrap();
        assert_eq!(reply.source, ReplySource::Api);
        assert_eq!(reply.text, "TITLE: Frieren\nGENRE: Fantasy\nRATING: 9/10\nDESCRIPTION: Elf.");
        assert_eq!(reply.recommendation().unwrap().title, "Frieren");
    }

    #[tokio::test]
    async fn prompt_carries_user_text() {
        let recommender = Recommender::new(FakeLlm::new(|| Ok("hi".into())));
        recommender.recommend(Category::WebSeries, "korean drama").await.unwrap();
        let prompts = recommender.llm.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("User preference: korean drama"));
        assert!(prompts[0].contains("PLATFORM:"));
    }

    #[tokio::test]
    async fn http_error_falls_back() {
        let llm = FakeLlm::new(|| {
            Err(LlmError::Status {
                status: reqwest::StatusCode::TOO_MANY_REQUESTS,
                body: "rate limited".into(),
            })
        });
        let reply = Recommender::new(llm)
            .recommend(Category::Movies, "a thriller")
            .await
            .unwrap();
        assert_eq!(reply.source, ReplySource::Fallback);
        assert_eq!(reply.recommendation().unwrap().title, "Parasite");
    }

    #[tokio::test]
    async fn malformed_response_falls_back() {
        let llm = FakeLlm::new(|| Err(LlmError::MalformedResponse("no choices".into())));
        let reply = Recommender::new(llm)
            .recommend(Category::Anime, "")
            .await
            .unwrap();
        assert_eq!(reply.source, ReplySource::Fallback);
        assert_eq!(reply.text, select_fallback(Category::Anime, "").to_block());
    }

    #[tokio::test]
    async fn missing_key_is_surfaced() {
        let llm = FakeLlm::new(|| Err(LlmError::MissingApiKey));
        let err = Recommender::new(llm)
            .recommend(Category::Anime, "action")
            .await
            .unwrap_err();
        assert!(err.is_config());
    }

    #[tokio::test]
    async fn unknown_category_name_uses_movies() {
        let llm = FakeLlm::new(|| Err(LlmError::MalformedResponse("x".into())));
        let recommender = Recommender::new(llm);
        let reply = recommender.recommend_for("podcasts", "whatever").await.unwrap();
        assert_eq!(reply.recommendation().unwrap().title, "Inception");
        let prompts = recommender.llm.prompts.lock().unwrap();
        assert!(prompts[0].starts_with("You are a movie recommendation expert."));
    }

    #[tokio::test]
    async fn writes_request_log_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let logger = RequestLogger::new(dir.path()).unwrap();
        let recommender = Recommender::new(FakeLlm::new(|| Err(LlmError::MalformedResponse("x".into()))))
            .with_logger(logger);
        recommender.recommend(Category::Anime, "fight").await.unwrap();

        let contents = std::fs::read_to_string(dir.path().join("requests.jsonl")).unwrap();
        let line: serde_json::Value = serde_json::from_str(contents.trim()).unwrap();
        assert_eq!(line["category"], "anime");
        assert_eq!(line["source"], "fallback");
        assert_eq!(line["title"], "Demon Slayer: Kimetsu no Yaiba");
    }
}
