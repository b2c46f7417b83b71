//! News article model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One news article about the selected location
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewsArticle {
    /// Headline
    pub title: String,
    /// Short summary, when the provider supplies one
    pub description: Option<String>,
    /// Link to the full article
    pub url: String,
    /// Publisher name
    pub source: String,
    /// Publication time
    pub published_at: DateTime<Utc>,
}
