//! Club news client.
//!
//! Wraps a newsapi-style `GET /v2/everything?q=...&apiKey=...` endpoint
//! with a 10-second timeout. Articles are mapped into the local
//! [`NewsItem`] shape; a timeout or transport failure becomes one
//! readable error string and zero items.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use terrace_common::config::NewsConfig;
use terrace_common::{AppError, AppResult};

/// A news article in the shape the app displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsItem {
    /// Publishing outlet name.
    pub source: String,
    /// Headline.
    pub title: String,
    /// Summary (optional).
    pub description: Option<String>,
    /// Link to the full article.
    pub url: String,
    /// Header image URL (optional).
    pub image_url: Option<String>,
    /// Publication time.
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Article {
    source: ArticleSource,
    title: String,
    description: Option<String>,
    url: String,
    url_to_image: Option<String>,
    published_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct ArticleSource {
    name: String,
}

impl From<Article> for NewsItem {
    fn from(article: Article) -> Self {
        Self {
            source: article.source.name,
            title: article.title,
            description: article.description,
            url: article.url,
            image_url: article.url_to_image,
            published_at: article.published_at,
        }
    }
}

/// Client for the news provider.
#[derive(Clone)]
pub struct NewsClient {
    http: Client,
    base_url: String,
    api_key: String,
    query: String,
}

impl NewsClient {
    /// Create a client with the configured request timeout.
    pub fn new(config: &NewsConfig) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build news client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            query: config.query.clone(),
        })
    }

    /// Fetch the latest articles matching the configured club query.
    pub async fn latest(&self) -> AppResult<Vec<NewsItem>> {
        let url = format!("{}/v2/everything", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("q", self.query.as_str()), ("apiKey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::ExternalService("News request timed out".to_string())
                } else {
                    AppError::ExternalService(format!("Failed to fetch news: {e}"))
                }
            })?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "Failed to fetch news: provider returned {}",
                response.status()
            )));
        }

        let body: EverythingResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Invalid news response: {e}")))?;

        tracing::debug!(count = body.articles.len(), "Fetched news articles");
        Ok(body.articles.into_iter().map(NewsItem::from).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_article_maps_to_news_item() {
        let raw = serde_json::json!({
            "status": "ok",
            "totalResults": 1,
            "articles": [{
                "source": { "id": null, "name": "Local Gazette" },
                "author": "A. Reporter",
                "title": "Rovers sign striker",
                "description": "A deadline-day move.",
                "url": "https://gazette.example.com/rovers-striker",
                "urlToImage": "https://gazette.example.com/img.jpg",
                "publishedAt": "2026-08-29T09:30:00Z",
                "content": "..."
            }]
        });

        let response: EverythingResponse = serde_json::from_value(raw).unwrap();
        let items: Vec<NewsItem> = response.articles.into_iter().map(NewsItem::from).collect();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].source, "Local Gazette");
        assert_eq!(items[0].title, "Rovers sign striker");
        assert_eq!(
            items[0].image_url.as_deref(),
            Some("https://gazette.example.com/img.jpg")
        );
    }

    #[test]
    fn test_missing_optional_fields_still_map() {
        let raw = serde_json::json!({
            "articles": [{
                "source": { "name": "Wire" },
                "title": "Match report",
                "description": null,
                "url": "https://wire.example.com/report",
                "urlToImage": null,
                "publishedAt": "2026-08-29T17:00:00Z"
            }]
        });

        let response: EverythingResponse = serde_json::from_value(raw).unwrap();
        let item = NewsItem::from(response.articles.into_iter().next().unwrap());
        assert!(item.description.is_none());
        assert!(item.image_url.is_none());
    }

    #[tokio::test]
    async fn test_stalled_provider_maps_to_timeout_message() {
        // A bound listener that never responds: the connection succeeds
        // but the request stalls until the client timeout fires.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let config = NewsConfig {
            base_url: format!("http://{addr}"),
            api_key: "key".to_string(),
            query: "Bristol Rovers".to_string(),
            timeout_secs: 1,
        };

        let client = NewsClient::new(&config).unwrap();
        match client.latest().await {
            Err(AppError::ExternalService(msg)) => assert_eq!(msg, "News request timed out"),
            other => panic!("Expected timeout error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_an_error_not_a_panic() {
        let config = NewsConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            api_key: "key".to_string(),
            query: "Bristol Rovers".to_string(),
            timeout_secs: 10,
        };

        let client = NewsClient::new(&config).unwrap();
        let result = client.latest().await;
        assert!(matches!(result, Err(AppError::ExternalService(_))));
    }
}
