//! Content module - loads data groups and articles

pub mod catalog;
mod error;
mod index;
pub mod loader;
mod markdown;
pub mod relaxed;

pub use catalog::{BlogPost, Catalog, CatalogError, Project};
pub use error::ContentError;
pub use index::{describe, kind_of, ContentIndex};
pub use loader::ContentLoader;
pub use markdown::MarkdownRenderer;
