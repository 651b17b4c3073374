//! Single-shot entertainment recommendations from a chat-completion API,
//! with a canned fallback and a local watchlist.

pub mod category;
pub mod chat;
pub mod config;
pub mod credentials;
pub mod error;
pub mod instrumentation;
pub mod llm;
pub mod prompt;
pub mod recommend;
pub mod storage;
pub mod watchlist;
