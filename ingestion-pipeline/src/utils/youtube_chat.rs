use async_trait::async_trait;
use chrono::DateTime;
use common::{error::AppError, storage::types::video_info::VideoInfo};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::{pipeline::ChatSource, types::ChatMessage};

/// Largest page size the live chat endpoint accepts.
const MAX_RESULTS: u32 = 2000;
/// Hard cap on continuation pages so one pass stays bounded even when the
/// API keeps handing out tokens.
const MAX_PAGES: usize = 10;

/// Fetches live chat history from the YouTube Data API v3.
pub struct YouTubeChatSource {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LiveChatMessageList {
    #[serde(default)]
    items: Vec<LiveChatMessageItem>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LiveChatMessageItem {
    snippet: Option<LiveChatMessageSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LiveChatMessageSnippet {
    author_channel_id: Option<String>,
    display_message: Option<String>,
    published_at: Option<String>,
}

impl YouTubeChatSource {
    pub fn new(http: reqwest::Client, api_key: &str, api_base: &str) -> Result<Self, AppError> {
        Url::parse(api_base)
            .map_err(|_| AppError::Validation(format!("Invalid chat API base URL: {api_base}")))?;

        Ok(Self {
            http,
            api_key: api_key.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    fn messages_url(&self, chat_id: &str, page_token: Option<&str>) -> Result<Url, AppError> {
        let mut params: Vec<(&str, String)> = vec![
            ("liveChatId", chat_id.to_string()),
            ("part", "snippet".to_string()),
            ("maxResults", MAX_RESULTS.to_string()),
            ("key", self.api_key.clone()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_string()));
        }

        Url::parse_with_params(&format!("{}/liveChat/messages", self.api_base), params)
            .map_err(|e| AppError::InternalError(format!("Failed to build live chat URL: {e}")))
    }
}

#[async_trait]
impl ChatSource for YouTubeChatSource {
    async fn fetch_messages(&self, video: &VideoInfo) -> Result<Vec<ChatMessage>, AppError> {
        if video.chat_id.is_empty() {
            return Err(AppError::ChatFetch(format!(
                "Video {} has no live chat session id",
                video.source_id
            )));
        }

        let mut collected: Vec<ChatMessage> = Vec::new();
        let mut page_token: Option<String> = None;

        for page in 0..MAX_PAGES {
            let url = self.messages_url(&video.chat_id, page_token.as_deref())?;
            let response = self.http.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(AppError::ChatFetch(format!(
                    "Live chat request for video {} failed with status {status}",
                    video.source_id
                )));
            }

            let body = response.text().await?;
            let (mut messages, next) = parse_page(&body, &video.source_id)?;
            collected.append(&mut messages);
            debug!(page, total = collected.len(), "fetched live chat page");

            match next {
                Some(token) => page_token = Some(token),
                None => return Ok(collected),
            }
        }

        warn!(
            pages = MAX_PAGES,
            total = collected.len(),
            "live chat pagination cap reached; returning partial history"
        );
        Ok(collected)
    }
}

fn parse_page(body: &str, source_id: &str) -> Result<(Vec<ChatMessage>, Option<String>), AppError> {
    let page: LiveChatMessageList = serde_json::from_str(body)
        .map_err(|e| AppError::ChatFetch(format!("Failed to decode live chat response: {e}")))?;

    let total = page.items.len();
    let messages: Vec<ChatMessage> = page
        .items
        .into_iter()
        .filter_map(|item| item.snippet)
        .filter_map(|snippet| to_chat_message(snippet, source_id))
        .collect();

    let skipped = total.saturating_sub(messages.len());
    if skipped > 0 {
        debug!(skipped, "skipped live chat items without display content");
    }

    Ok((messages, page.next_page_token))
}

/// System events and deleted messages come back without a display message
/// or author; those items carry no chat text to classify.
fn to_chat_message(snippet: LiveChatMessageSnippet, source_id: &str) -> Option<ChatMessage> {
    let author_channel_id = snippet.author_channel_id?;
    let message = snippet.display_message?;
    let published_at = DateTime::parse_from_rfc3339(&snippet.published_at?)
        .ok()?
        .timestamp();

    Some(ChatMessage {
        author_channel_id,
        message,
        published_at,
        source_id: source_id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
    };

    use axum::{
        extract::{Query, State},
        http::StatusCode,
        routing::get,
        Json, Router,
    };
    use serde_json::{json, Value};

    use super::*;

    fn source() -> YouTubeChatSource {
        YouTubeChatSource::new(
            reqwest::Client::new(),
            "test-key",
            "https://chat.example.com/v3/",
        )
        .expect("valid base url")
    }

    #[test]
    fn rejects_invalid_base_url() {
        let result = YouTubeChatSource::new(reqwest::Client::new(), "test-key", "not a url");
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn builds_first_page_url() {
        let url = source()
            .messages_url("chat456", None)
            .expect("url builds");

        assert_eq!(url.path(), "/v3/liveChat/messages");
        let query: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(query.contains(&("liveChatId".to_string(), "chat456".to_string())));
        assert!(query.contains(&("key".to_string(), "test-key".to_string())));
        assert!(query.contains(&("part".to_string(), "snippet".to_string())));
        assert!(!query.iter().any(|(k, _)| k == "pageToken"));
    }

    #[test]
    fn builds_continuation_url_with_token() {
        let url = source()
            .messages_url("chat456", Some("token789"))
            .expect("url builds");

        let query: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(query.contains(&("pageToken".to_string(), "token789".to_string())));
    }

    #[test]
    fn parses_page_and_skips_items_without_display_content() {
        let body = r#"{
            "kind": "youtube#liveChatMessageListResponse",
            "nextPageToken": "token789",
            "items": [
                {
                    "id": "msg-1",
                    "snippet": {
                        "type": "textMessageEvent",
                        "authorChannelId": "channel-a",
                        "displayMessage": "hello stream",
                        "publishedAt": "2024-01-01T12:00:00Z"
                    }
                },
                {
                    "id": "msg-2",
                    "snippet": {
                        "type": "messageDeletedEvent",
                        "authorChannelId": "channel-b",
                        "publishedAt": "2024-01-01T12:00:05Z"
                    }
                },
                {
                    "id": "msg-3",
                    "snippet": {
                        "type": "textMessageEvent",
                        "authorChannelId": "channel-c",
                        "displayMessage": "boo",
                        "publishedAt": "2024-01-01T12:00:10.500Z"
                    }
                }
            ]
        }"#;

        let (messages, next) = parse_page(body, "video123").expect("parses");

        assert_eq!(next.as_deref(), Some("token789"));
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].author_channel_id, "channel-a");
        assert_eq!(messages[0].message, "hello stream");
        assert_eq!(messages[0].source_id, "video123");
        assert_eq!(
            messages[0].published_at,
            DateTime::parse_from_rfc3339("2024-01-01T12:00:00Z")
                .expect("valid timestamp")
                .timestamp()
        );
        assert_eq!(messages[1].message, "boo");
    }

    #[test]
    fn parses_last_page_without_token() {
        let body = r#"{"items": []}"#;

        let (messages, next) = parse_page(body, "video123").expect("parses");
        assert!(messages.is_empty());
        assert!(next.is_none());
    }

    #[test]
    fn rejects_malformed_body() {
        let result = parse_page("<html>rate limited</html>", "video123");
        assert!(matches!(result, Err(AppError::ChatFetch(_))));
    }

    fn video(chat_id: &str) -> VideoInfo {
        VideoInfo::new(
            "video123".to_string(),
            "live".to_string(),
            chat_id.to_string(),
        )
    }

    fn chat_item(author: &str, text: &str, published_at: &str) -> Value {
        json!({
            "snippet": {
                "type": "textMessageEvent",
                "authorChannelId": author,
                "displayMessage": text,
                "publishedAt": published_at,
            }
        })
    }

    /// Serves `stub` on an ephemeral local port and returns its base URL.
    async fn spawn_stub(stub: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub listener address");
        tokio::spawn(async move {
            axum::serve(listener, stub).await.expect("serve stub");
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn fetch_messages_follows_continuation_tokens() {
        let stub = Router::new().route(
            "/liveChat/messages",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let body = match params.get("pageToken").map(String::as_str) {
                    None => json!({
                        "items": [chat_item("channel-a", "first page", "2024-01-01T12:00:00Z")],
                        "nextPageToken": "page-2",
                    }),
                    Some("page-2") => json!({
                        "items": [chat_item("channel-b", "second page", "2024-01-01T12:00:30Z")],
                    }),
                    Some(other) => json!({ "items": [], "unexpectedToken": other }),
                };
                Json(body)
            }),
        );
        let base = spawn_stub(stub).await;
        let source = YouTubeChatSource::new(reqwest::Client::new(), "test-key", &base)
            .expect("valid base url");

        let messages = source
            .fetch_messages(&video("chat456"))
            .await
            .expect("fetch succeeds");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].message, "first page");
        assert_eq!(messages[1].message, "second page");
        assert_eq!(messages[1].author_channel_id, "channel-b");
    }

    #[tokio::test]
    async fn fetch_messages_stops_at_the_page_cap() {
        let hits = Arc::new(AtomicUsize::new(0));
        let stub = Router::new()
            .route(
                "/liveChat/messages",
                get(|State(hits): State<Arc<AtomicUsize>>| async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(json!({
                        "items": [chat_item("channel-a", "still chatting", "2024-01-01T12:00:00Z")],
                        "nextPageToken": "again",
                    }))
                }),
            )
            .with_state(Arc::clone(&hits));
        let base = spawn_stub(stub).await;
        let source = YouTubeChatSource::new(reqwest::Client::new(), "test-key", &base)
            .expect("valid base url");

        let messages = source
            .fetch_messages(&video("chat456"))
            .await
            .expect("fetch returns the partial history");

        assert_eq!(messages.len(), MAX_PAGES, "one message per fetched page");
        assert_eq!(hits.load(Ordering::SeqCst), MAX_PAGES);
    }

    #[tokio::test]
    async fn fetch_messages_surfaces_api_rejection() {
        let stub = Router::new().route(
            "/liveChat/messages",
            get(|| async { (StatusCode::FORBIDDEN, "quota exceeded") }),
        );
        let base = spawn_stub(stub).await;
        let source = YouTubeChatSource::new(reqwest::Client::new(), "test-key", &base)
            .expect("valid base url");

        let result = source.fetch_messages(&video("chat456")).await;

        assert!(
            matches!(result, Err(AppError::ChatFetch(ref message)) if message.contains("403")),
            "expected a chat fetch error carrying the status, got {result:?}"
        );
    }

    #[tokio::test]
    async fn fetch_messages_rejects_missing_chat_session() {
        let result = source().fetch_messages(&video("")).await;

        assert!(
            matches!(result, Err(AppError::ChatFetch(ref message)) if message.contains("video123")),
            "expected a missing chat session error, got {result:?}"
        );
    }
}
