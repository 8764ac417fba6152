//! Typed view over the blog and project groups

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::{index::kind_of, ContentIndex};
use crate::config::SiteConfig;

/// A blog post entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogPost {
    pub id: Option<u64>,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    /// Publication date as written in the data file (`YYYY-MM-DD`)
    pub date: String,
    pub category: String,
    pub read_time: String,

    /// Any additional fields, passed through to templates
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A portfolio project entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub id: Option<u64>,
    pub slug: String,
    pub title: String,
    pub domain: String,
    pub description: String,
    pub tech: Vec<String>,
    pub metrics: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("content group {group:?} has an unexpected shape: {reason}")]
    InvalidGroup { group: String, reason: String },
}

/// Blog posts, projects and the free-form portfolio document
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    portfolio: Option<Value>,
    posts: Vec<BlogPost>,
    projects: Vec<Project>,
}

impl Catalog {
    /// Build the catalog from the groups named in the site config
    ///
    /// A group that is absent from the index yields an empty list. A group
    /// that is present but has the wrong shape is an error.
    pub fn from_index(index: &ContentIndex, config: &SiteConfig) -> Result<Self, CatalogError> {
        Ok(Self {
            portfolio: index.get(&config.portfolio_group).cloned(),
            posts: entries(index, &config.blog_group, "posts")?,
            projects: entries(index, &config.project_group, "projects")?,
        })
    }

    pub fn portfolio(&self) -> Option<&Value> {
        self.portfolio.as_ref()
    }

    pub fn posts(&self) -> &[BlogPost] {
        &self.posts
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Find a blog post by slug
    pub fn post(&self, slug: &str) -> Option<&BlogPost> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    /// Find a project by slug
    pub fn project(&self, slug: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.slug == slug)
    }
}

/// Pull a list out of a group that is either a bare array or an object
/// holding the array under `field` (or `items`)
fn entries<T: DeserializeOwned>(
    index: &ContentIndex,
    group: &str,
    field: &str,
) -> Result<Vec<T>, CatalogError> {
    let Some(value) = index.get(group) else {
        return Ok(Vec::new());
    };

    let invalid = |reason: String| CatalogError::InvalidGroup {
        group: group.to_string(),
        reason,
    };

    let list = match value {
        Value::Array(_) => value,
        Value::Object(map) => map.get(field).or_else(|| map.get("items")).ok_or_else(|| {
            invalid(format!(
                "expected an array or an object with a \"{}\" list",
                field
            ))
        })?,
        other => {
            return Err(invalid(format!(
                "expected an array or an object, found {}",
                kind_of(other)
            )))
        }
    };

    Vec::<T>::deserialize(list).map_err(|e| invalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn index(groups: Value) -> ContentIndex {
        let map: BTreeMap<String, Value> = serde_json::from_value(groups).unwrap();
        ContentIndex::from_groups(map)
    }

    #[test]
    fn test_bare_arrays() {
        let index = index(json!({
            "blogs": [{"slug": "one", "title": "One", "date": "2025-11-15"}],
            "projects": [{"slug": "p", "title": "P", "tech": ["Rust", "Redis"]}],
        }));

        let catalog = Catalog::from_index(&index, &SiteConfig::default()).unwrap();

        assert_eq!(catalog.posts().len(), 1);
        assert_eq!(catalog.post("one").unwrap().date, "2025-11-15");
        assert_eq!(catalog.project("p").unwrap().tech, vec!["Rust", "Redis"]);
        assert!(catalog.portfolio().is_none());
    }

    #[test]
    fn test_wrapped_lists_and_extra_fields() {
        let index = index(json!({
            "blogs": {"posts": [{"slug": "a", "hero": "/static/a.png"}]},
            "projects": {"items": [{"id": 3, "slug": "b"}]},
            "merge_data": {"name": "Jane"},
        }));

        let catalog = Catalog::from_index(&index, &SiteConfig::default()).unwrap();

        let post = catalog.post("a").unwrap();
        assert_eq!(post.extra.get("hero"), Some(&json!("/static/a.png")));
        assert_eq!(catalog.project("b").unwrap().id, Some(3));
        assert_eq!(catalog.portfolio(), Some(&json!({"name": "Jane"})));
    }

    #[test]
    fn test_missing_groups_are_empty() {
        let catalog = Catalog::from_index(&ContentIndex::default(), &SiteConfig::default()).unwrap();
        assert!(catalog.posts().is_empty());
        assert!(catalog.projects().is_empty());
        assert!(catalog.post("anything").is_none());
    }

    #[test]
    fn test_wrong_shape_is_error() {
        let index = index(json!({"blogs": "not a list"}));
        let err = Catalog::from_index(&index, &SiteConfig::default()).unwrap_err();
        assert!(err.to_string().contains("blogs"));
        assert!(err.to_string().contains("string"));
    }

    #[test]
    fn test_object_without_list_is_error() {
        let index = index(json!({"projects": {"count": 2}}));
        assert!(Catalog::from_index(&index, &SiteConfig::default()).is_err());
    }

    #[test]
    fn test_custom_group_names() {
        let index = index(json!({"writing": [{"slug": "w"}]}));
        let config = SiteConfig {
            blog_group: "writing".to_string(),
            ..Default::default()
        };

        let catalog = Catalog::from_index(&index, &config).unwrap();
        assert!(catalog.post("w").is_some());
    }
}
