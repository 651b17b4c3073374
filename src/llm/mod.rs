pub mod client;

pub use client::{Completion, KeyCheck, LlmClient};
