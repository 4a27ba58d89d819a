#![allow(clippy::missing_docs_in_private_items, clippy::result_large_err)]

pub mod pipeline;
pub mod types;
pub mod utils;
pub mod window;

pub use pipeline::{
    ChatSource, ChatStore, IngestionPipeline, PassSummary, SentimentClassifier, SurrealChatStore,
};
pub use types::ChatMessage;
pub use utils::{sentiment::LlmSentimentClassifier, youtube_chat::YouTubeChatSource};
pub use window::{resolve_span, PassWindow, ResolvedSpan, DEFAULT_SPAN_MINUTES};
