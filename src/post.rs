//! Defines the [`PostSummary`] and [`Manifest`] types. The manifest is a static
//! JSON document listing every post in display order:
//!
//! ```json
//! { "posts": [ { "slug": "hello", "title": "Hello", "description": "...", "date": "2024-01-05" } ] }
//! ```

use serde::Deserialize;

/// The metadata for a single post as listed in the manifest.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PostSummary {
    /// URL-safe identifier. Used as the `post` query value and as the file
    /// name of the post's markdown source.
    pub slug: String,

    /// The title of the post.
    pub title: String,

    /// A one-line description shown on the post's card.
    pub description: String,

    /// The publication date as an ISO-8601 date (`YYYY-MM-DD`).
    pub date: String,
}

/// The ordered list of posts. Order in the source document is display order.
#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Manifest {
    pub posts: Vec<PostSummary>,
}

impl Manifest {
    pub fn from_json(input: &str) -> serde_json::Result<Manifest> {
        serde_json::from_str(input)
    }

    /// Looks up a post by slug.
    pub fn find(&self, slug: &str) -> Option<&PostSummary> {
        self.posts.iter().find(|post| post.slug == slug)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_json_keeps_order() -> serde_json::Result<()> {
        let manifest = Manifest::from_json(
            r#"{"posts": [
                {"slug": "b", "title": "B", "description": "", "date": "2024-02-01"},
                {"slug": "a", "title": "A", "description": "", "date": "2024-03-01"}
            ]}"#,
        )?;
        let slugs: Vec<&str> =
            manifest.posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(vec!["b", "a"], slugs);
        Ok(())
    }

    #[test]
    fn test_find() -> serde_json::Result<()> {
        let manifest = Manifest::from_json(
            r#"{"posts": [{"slug": "hello", "title": "Hello", "description": "d", "date": "2024-01-05"}]}"#,
        )?;
        assert_eq!(Some("Hello"), manifest.find("hello").map(|p| p.title.as_str()));
        assert_eq!(None, manifest.find("missing"));
        Ok(())
    }

    #[test]
    fn test_from_json_rejects_wrong_shape() {
        assert!(Manifest::from_json(r#"[{"slug": "a"}]"#).is_err());
        assert!(Manifest::from_json(r#"{"posts": [{"slug": "a"}]}"#).is_err());
    }
}
