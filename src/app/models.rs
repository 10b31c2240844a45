//! Data models for the news feed
//!
//! These types mirror the remote JSON documents. They are retrieved and stored
//! wholesale: a category index or a category's article list is never merged
//! with a previously cached copy.

use serde::{Deserialize, Serialize};

/// A named topic channel in the remote index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Stable identifier, also the relative path of the category document
    pub file: String,
    /// Display label
    pub name: String,
}

impl Category {
    /// Create a new category
    pub fn new(file: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            name: name.into(),
        }
    }
}

/// The category index served at `{base}/index.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryIndex {
    /// Publication time of the index (epoch seconds)
    pub timestamp: i64,
    /// Categories in remote order
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl CategoryIndex {
    /// Look up a category by its file identifier
    pub fn find(&self, file: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.file == file)
    }

    /// All category identifiers in index order
    pub fn files(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.file.clone()).collect()
    }
}

/// A news source cited by a perspective
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
}

/// One source group's take on a story
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perspective {
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub text: String,
}

/// A dated event in a story's timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub content: String,
}

/// A publisher domain that contributed to a story
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub name: String,
}

/// An image attached to a cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterImage {
    pub url: String,
    #[serde(default)]
    pub caption: String,
}

/// One AI-summarized story
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleCluster {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub short_summary: String,
    #[serde(default)]
    pub talking_points: Vec<String>,
    #[serde(default)]
    pub perspectives: Vec<Perspective>,
    #[serde(default)]
    pub timeline: Vec<TimelineEvent>,
    #[serde(default)]
    pub domains: Vec<Domain>,
    #[serde(default)]
    pub primary_image: Option<ClusterImage>,
    #[serde(default)]
    pub secondary_image: Option<ClusterImage>,
}

impl ArticleCluster {
    /// Image URLs referenced by this cluster, primary first
    pub fn image_urls(&self) -> impl Iterator<Item = &str> {
        self.primary_image
            .iter()
            .chain(self.secondary_image.iter())
            .map(|image| image.url.as_str())
            .filter(|url| !url.is_empty())
    }
}

/// The per-category document served at `{base}/{category_file}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryArticles {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub clusters: Vec<ArticleCluster>,
}

impl CategoryArticles {
    /// Every image URL referenced by the clusters, in cluster order
    pub fn image_urls(&self) -> Vec<String> {
        self.clusters
            .iter()
            .flat_map(|cluster| cluster.image_urls())
            .map(str::to_string)
            .collect()
    }
}
