//! NewsAPI client for location-related headlines

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::instrument;

use crate::SkycastError;
use crate::models::NewsArticle;

/// Articles requested per query
const PAGE_SIZE: usize = 10;

/// Client for the NewsAPI `everything` endpoint
pub struct NewsClient {
    http: ClientWithMiddleware,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    status: String,
    message: Option<String>,
    #[serde(default)]
    articles: Vec<ArticleEntry>,
}

#[derive(Debug, Deserialize)]
struct SourceInfo {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArticleEntry {
    title: String,
    description: Option<String>,
    url: String,
    source: SourceInfo,
    published_at: DateTime<Utc>,
}

impl From<ArticleEntry> for NewsArticle {
    fn from(entry: ArticleEntry) -> Self {
        Self {
            title: entry.title,
            description: entry.description,
            url: entry.url,
            source: entry.source.name,
            published_at: entry.published_at,
        }
    }
}

impl NewsClient {
    #[must_use]
    pub fn new(http: ClientWithMiddleware, base_url: String, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    /// Recent articles mentioning the given location name.
    #[instrument(skip(self))]
    pub async fn headlines(&self, location: &str) -> Result<Vec<NewsArticle>> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| SkycastError::config("News API key not configured"))?;

        let url = format!(
            "{}/everything?q={}&apiKey={}&pageSize={}",
            self.base_url,
            urlencoding::encode(location),
            api_key,
            PAGE_SIZE
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| "Failed to reach the news endpoint")?;

        let status = response.status();
        if !status.is_success() {
            return Err(SkycastError::api(format!(
                "News API request failed with status {}",
                status.as_u16()
            ))
            .into());
        }

        let payload: NewsResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse the news response")?;

        if payload.status != "ok" {
            return Err(SkycastError::api(
                payload.message.unwrap_or_else(|| "News API error".to_string()),
            )
            .into());
        }

        Ok(payload.articles.into_iter().map(NewsArticle::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_news_response_parses() {
        let payload = r#"{
            "status": "ok",
            "totalResults": 1,
            "articles": [
                {
                    "source": {"id": null, "name": "Example Times"},
                    "author": "A. Reporter",
                    "title": "Local festival draws record crowds",
                    "description": "Thousands attended this weekend.",
                    "url": "https://example.com/festival",
                    "publishedAt": "2025-06-01T09:30:00Z"
                }
            ]
        }"#;

        let response: NewsResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(response.status, "ok");

        let article = NewsArticle::from(response.articles.into_iter().next().unwrap());
        assert_eq!(article.title, "Local festival draws record crowds");
        assert_eq!(article.source, "Example Times");
        assert_eq!(article.published_at.to_rfc3339(), "2025-06-01T09:30:00+00:00");
    }

    #[test]
    fn test_error_response_parses_without_articles() {
        let payload = r#"{"status": "error", "code": "apiKeyInvalid", "message": "Bad key"}"#;

        let response: NewsResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(response.status, "error");
        assert_eq!(response.message.as_deref(), Some("Bad key"));
        assert!(response.articles.is_empty());
    }
}
