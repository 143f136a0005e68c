//! Resolve-service clients.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use signify_core::SequenceResolver;
use signify_types::{ResolveRequest, ResolveResponse};

use crate::error::ResolveError;

/// Path of the resolve endpoint on a signify backend.
pub const RESOLVE_PATH: &str = "/api/asl/video-map";

/// Something that turns caption words into a playback sequence.
#[async_trait]
pub trait ResolveClient: Send + Sync {
    async fn resolve(&self, request: &ResolveRequest) -> Result<ResolveResponse, ResolveError>;
}

/// Talks to a backend over HTTP.
pub struct HttpResolveClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpResolveClient {
    pub fn new(backend_url: &str, timeout: Duration) -> Result<Self, ResolveError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ResolveError::Unreachable(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: format!("{}{RESOLVE_PATH}", backend_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ResolveClient for HttpResolveClient {
    async fn resolve(&self, request: &ResolveRequest) -> Result<ResolveResponse, ResolveError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| ResolveError::Unreachable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(str::to_string))
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            return Err(ResolveError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let response: ResolveResponse = resp
            .json()
            .await
            .map_err(|e| ResolveError::Decode(e.to_string()))?;
        debug!(
            items = response.sequence.len(),
            not_found = response.not_found_words.len(),
            "resolve response received"
        );
        Ok(response)
    }
}

/// Resolves in-process against a local [`SequenceResolver`].
pub struct LocalResolveClient {
    resolver: Arc<SequenceResolver>,
}

impl LocalResolveClient {
    pub fn new(resolver: Arc<SequenceResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl ResolveClient for LocalResolveClient {
    async fn resolve(&self, request: &ResolveRequest) -> Result<ResolveResponse, ResolveError> {
        self.resolver
            .resolve_request(request)
            .map_err(|e| ResolveError::Rejected(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use signify_core::{LetterImageStore, VocabularyIndex};
    use signify_types::{MatchSource, MediaKind};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> HttpResolveClient {
        HttpResolveClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn posts_words_and_decodes_sequence() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(RESOLVE_PATH))
            .and(body_json(json!({ "words": ["hello", "world"] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "sequence": [{
                    "word": "hello",
                    "gloss": "hello",
                    "type": "video",
                    "url": "http://h/asl/hello/1.mp4",
                    "matchSource": "word-level-dataset"
                }],
                "foundWords": ["hello"],
                "notFoundWords": ["world"]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = ResolveRequest::from_words(vec!["hello".into(), "world".into()]);
        let resp = client(&server).resolve(&request).await.unwrap();
        assert_eq!(resp.sequence.len(), 1);
        assert_eq!(resp.sequence[0].media_type, MediaKind::Video);
        assert_eq!(resp.not_found_words, vec!["world"]);
        assert!(resp.mappings.is_empty());
    }

    #[tokio::test]
    async fn client_error_carries_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({ "success": false, "error": "either text or words is required" })),
            )
            .mount(&server)
            .await;

        let err = client(&server)
            .resolve(&ResolveRequest::default())
            .await
            .unwrap_err();
        match err {
            ResolveError::Status { status, message } => {
                assert_eq!(status, 400);
                assert!(message.contains("text or words"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn garbage_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client(&server)
            .resolve(&ResolveRequest::from_text("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_backend() {
        let c = HttpResolveClient::new("http://127.0.0.1:1/", Duration::from_secs(1)).unwrap();
        assert_eq!(c.endpoint(), "http://127.0.0.1:1/api/asl/video-map");
        let err = c.resolve(&ResolveRequest::from_text("hi")).await.unwrap_err();
        assert!(matches!(err, ResolveError::Unreachable(_)));
    }

    #[tokio::test]
    async fn local_client_uses_resolver() {
        let index = VocabularyIndex::from_json_str(r#"{"book":["b.mp4"]}"#, "/asl").unwrap();
        let resolver = SequenceResolver::new(index, LetterImageStore::new(), "http://h");
        let local = LocalResolveClient::new(Arc::new(resolver));

        let resp = local.resolve(&ResolveRequest::from_text("the book")).await.unwrap();
        assert_eq!(resp.sequence[0].match_source, MatchSource::WordLevelDataset);
        assert_eq!(resp.sequence[0].url, "http://h/asl/book/b.mp4");

        let err = local.resolve(&ResolveRequest::default()).await.unwrap_err();
        assert!(matches!(err, ResolveError::Rejected(_)));
    }
}
