pub mod render;

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::category::Category;
use crate::llm::Completion;
use crate::recommend::{Recommendation, Recommender, ReplySource};
use crate::storage::Storage;
use crate::watchlist::{SaveOutcome, Watchlist};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// Where a message's content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSource {
    Api,
    Fallback,
    Local,
}

impl From<ReplySource> for MessageSource {
    fn from(source: ReplySource) -> Self {
        match source {
            ReplySource::Api => MessageSource::Api,
            ReplySource::Fallback => MessageSource::Fallback,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub source: MessageSource,
}

impl ChatMessage {
    fn new(role: Role, content: String, source: MessageSource) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content,
            timestamp: Utc::now(),
            source,
        }
    }

    pub fn is_from_api(&self) -> bool {
        self.source == MessageSource::Api
    }

    /// Structured view of an assistant message, if it parses.
    pub fn recommendation(&self) -> Option<Recommendation> {
        match self.role {
            Role::Assistant => Recommendation::parse(&self.content),
            Role::User => None,
        }
    }
}

pub fn technical_difficulties(category: Category) -> String {
    format!(
        "I apologize, but I'm having technical difficulties right now. However, I can still provide you with an excellent {} recommendation! Let me know what specific genres or themes you're interested in.",
        category
    )
}

/// One chat page: an append-only message log plus the watchlist action.
///
/// `submit` borrows the session mutably, so a session never has more than
/// one recommendation request in flight.
pub struct ChatSession<C, S> {
    category: Category,
    recommender: Recommender<C>,
    watchlist: Watchlist<S>,
    messages: Vec<ChatMessage>,
}

impl<C: Completion, S: Storage> ChatSession<C, S> {
    pub fn new(category: Category, recommender: Recommender<C>, watchlist: Watchlist<S>) -> Self {
        let greeting = ChatMessage::new(Role::Assistant, category.greeting(), MessageSource::Local);
        Self {
            category,
            recommender,
            watchlist,
            messages: vec![greeting],
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn examples(&self) -> [&'static str; 3] {
        self.category.examples()
    }

    pub fn watchlist(&self) -> &Watchlist<S> {
        &self.watchlist
    }

    /// Sends `input` through the recommendation pipeline and returns the
    /// assistant's answer. Blank input is ignored.
    pub async fn submit(&mut self, input: &str) -> Option<&ChatMessage> {
        if input.trim().is_empty() {
            return None;
        }

        self.messages.push(ChatMessage::new(
            Role::User,
            input.to_string(),
            MessageSource::Local,
        ));

        let answer = match self.recommender.recommend(self.category, input).await {
            Ok(reply) => ChatMessage::new(Role::Assistant, reply.text, reply.source.into()),
            Err(e) => {
                tracing::error!(error = %e, "error getting recommendation");
                ChatMessage::new(
                    Role::Assistant,
                    technical_difficulties(self.category),
                    MessageSource::Local,
                )
            }
        };

        self.messages.push(answer);
        self.messages.last()
    }

    /// The most recent assistant message that parsed as a recommendation.
    pub fn last_recommendation(&self) -> Option<Recommendation> {
        self.messages.iter().rev().find_map(ChatMessage::recommendation)
    }

    /// Saves the latest recommendation's title. `None` when nothing
    /// structured has been recommended yet.
    pub fn save_last(&mut self) -> Result<Option<(String, SaveOutcome)>> {
        let Some(rec) = self.last_recommendation() else {
            return Ok(None);
        };
        let outcome = self.watchlist.save(&rec.title)?;
        Ok(Some((rec.title, outcome)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LlmError, LlmResult};
    use crate::storage::MemoryStore;
    use async_trait::async_trait;

    struct Offline;

    #[async_trait]
    impl Completion for Offline {
        async fn complete(&self, _prompt: &str) -> LlmResult<String> {
            Err(LlmError::MalformedResponse("offline".into()))
        }
    }

    struct Unconfigured;

    #[async_trait]
    impl Completion for Unconfigured {
        async fn complete(&self, _prompt: &str) -> LlmResult<String> {
            Err(LlmError::MissingApiKey)
        }
    }

    struct Chatty;

    #[async_trait]
    impl Completion for Chatty {
        async fn complete(&self, _prompt: &str) -> LlmResult<String> {
            Ok("You might enjoy Mushishi, it is very calm.".into())
        }
    }

    fn session<C: Completion>(llm: C, category: Category) -> ChatSession<C, MemoryStore> {
        ChatSession::new(
            category,
            Recommender::new(llm),
            Watchlist::new(MemoryStore::new()),
        )
    }

    #[test]
    fn starts_with_greeting() {
        let chat = session(Offline, Category::WebSeries);
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.messages()[0].role, Role::Assistant);
        assert!(!chat.messages()[0].is_from_api());
        assert!(chat.messages()[0].content.contains("web series & k-drama assistant"));
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let mut chat = session(Offline, Category::Anime);
        assert!(chat.submit("   ").await.is_none());
        assert_eq!(chat.messages().len(), 1);
    }

    #[tokio::test]
    async fn fallback_reply_is_structured() {
        let mut chat = session(Offline, Category::Anime);
        let answer = chat.submit("I love action anime").await.unwrap();
        assert_eq!(answer.source, MessageSource::Fallback);
        let rec = answer.recommendation().unwrap();
        assert_eq!(rec.title, "Demon Slayer: Kimetsu no Yaiba");
        assert_eq!(chat.messages().len(), 3);
        assert_eq!(chat.messages()[1].role, Role::User);
    }

    #[tokio::test]
    async fn config_error_becomes_apology() {
        let mut chat = session(Unconfigured, Category::Movies);
        let answer = chat.submit("anything").await.unwrap();
        assert_eq!(answer.content, technical_difficulties(Category::Movies));
        assert!(answer.recommendation().is_none());
    }

    #[tokio::test]
    async fn prose_reply_is_not_saveable() {
        let mut chat = session(Chatty, Category::Anime);
        let answer = chat.submit("calm").await.unwrap();
        assert!(answer.is_from_api());
        assert!(answer.recommendation().is_none());
        assert_eq!(chat.save_last().unwrap(), None);
    }

    #[tokio::test]
    async fn save_last_is_idempotent() {
        let mut chat = session(Offline, Category::Movies);
        chat.submit("a thriller").await.unwrap();
        assert_eq!(
            chat.save_last().unwrap(),
            Some(("Parasite".to_string(), SaveOutcome::Added))
        );
        assert_eq!(
            chat.save_last().unwrap(),
            Some(("Parasite".to_string(), SaveOutcome::AlreadyPresent))
        );
        assert_eq!(chat.watchlist().items().unwrap(), vec!["Parasite"]);
    }

    #[test]
    fn user_messages_never_parse_as_cards() {
        let msg = ChatMessage::new(
            Role::User,
            "TITLE: x\nGENRE: y\nRATING: z\nDESCRIPTION: w".into(),
            MessageSource::Local,
        );
        assert!(msg.recommendation().is_none());
    }
}
