//! Defines the [`Config`] type which holds the site-wide settings: where the
//! manifest and article files live, and the labels shown in the breadcrumb and
//! the document title. The configuration is a YAML document (`blog.yaml`)
//! embedded into the binary at build time; any key missing from it falls back
//! to a default.

use serde::Deserialize;
use std::fmt;

const EMBEDDED: &str = include_str!("../blog.yaml");

#[derive(Deserialize)]
struct LogLevel(String);
impl Default for LogLevel {
    fn default() -> Self {
        LogLevel("info".to_owned())
    }
}

#[derive(Deserialize)]
struct Project {
    pub site_name: String,

    #[serde(default)]
    pub manifest_path: Option<String>,

    #[serde(default)]
    pub articles_path: Option<String>,

    #[serde(default)]
    pub list_href: Option<String>,

    #[serde(default)]
    pub list_title: Option<String>,

    #[serde(default)]
    pub list_crumb: Option<String>,

    #[serde(default)]
    pub error_crumb: Option<String>,

    #[serde(default)]
    pub log_level: LogLevel,
}

/// Site configuration. See `blog.yaml` for the shipped values.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Appended to every document title, e.g. `Blog — keipa`.
    pub site_name: String,

    /// Relative URL of the post manifest.
    pub manifest_path: String,

    /// Relative URL of the directory holding `{slug}.md` files. No trailing
    /// slash.
    pub articles_path: String,

    /// The history entry pushed when returning to the post list.
    pub list_href: String,

    /// Heading of the list view, used in the document title.
    pub list_title: String,

    /// Breadcrumb text while the list is shown.
    pub list_crumb: String,

    /// Breadcrumb text after a post failed to load.
    pub error_crumb: String,

    /// A `tracing` filter directive, e.g. `info` or `keipa_blog=debug`.
    pub log_level: String,
}

impl Config {
    /// Parses the `blog.yaml` shipped with the crate.
    pub fn embedded() -> Result<Config> {
        Config::from_yaml(EMBEDDED)
    }

    pub fn from_yaml(input: &str) -> Result<Config> {
        let project: Project = serde_yaml::from_str(input)?;
        Ok(Config {
            site_name: project.site_name,
            manifest_path: project
                .manifest_path
                .unwrap_or_else(|| "posts.json".to_owned()),
            articles_path: project
                .articles_path
                .map(|path| path.trim_end_matches('/').to_owned())
                .unwrap_or_else(|| "posts".to_owned()),
            list_href: project.list_href.unwrap_or_else(|| "./".to_owned()),
            list_title: project.list_title.unwrap_or_else(|| "Blog".to_owned()),
            list_crumb: project.list_crumb.unwrap_or_else(|| "blog".to_owned()),
            error_crumb: project.error_crumb.unwrap_or_else(|| "error".to_owned()),
            log_level: project.log_level.0,
        })
    }

    /// Formats a document title for a page whose own heading is `heading`.
    pub fn page_title(&self, heading: &str) -> String {
        format!("{} — {}", heading, self.site_name)
    }

    /// The document title shown alongside the post list.
    pub fn list_page_title(&self) -> String {
        self.page_title(&self.list_title)
    }

    /// The URL of the markdown source for `slug`. The slug is percent-encoded
    /// since it becomes a path segment.
    pub fn article_url(&self, slug: &str) -> String {
        format!("{}/{}.md", self.articles_path, urlencoding::encode(slug))
    }
}

/// Represents the result of loading a [`Config`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading a [`Config`].
#[derive(Debug)]
pub enum Error {
    /// Returned when the configuration isn't valid YAML or is missing
    /// `site_name`.
    DeserializeYaml(serde_yaml::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::DeserializeYaml(err) => {
                write!(f, "Loading configuration: {}", err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::DeserializeYaml(err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}
