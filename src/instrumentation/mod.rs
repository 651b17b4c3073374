pub mod logger;

pub use logger::{RequestLog, RequestLogger};
