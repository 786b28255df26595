//! Pure rendering functions. Each takes data and returns markup or display
//! text; mounting the result into the page is the [`crate::controller::Page`]
//! implementation's job, which keeps everything here testable without a
//! browser.

use crate::config::Config;
use crate::date::format_date;
use crate::history::article_href;
use crate::markdown::article_html;
use crate::post::PostSummary;
use pulldown_cmark::escape::escape_html;
use std::fmt::Write;

/// Breadcrumb text while an article is loading.
pub const LOADING_CRUMB: &str = "…";

const NO_POSTS: &str = "No posts yet.";
const POSTS_UNAVAILABLE: &str = "Could not load posts.";
const ARTICLE_UNAVAILABLE: &str = "Could not load this post.";

/// Renders the post list: one clickable card per post in manifest order, or
/// a message when there are none.
pub fn post_list(posts: &[PostSummary]) -> String {
    if posts.is_empty() {
        return error_message(NO_POSTS);
    }

    let mut out = String::from("<div class=\"posts-list\">");
    for post in posts {
        post_card(&mut out, post);
    }
    out.push_str("</div>");
    out
}

fn post_card(out: &mut String, post: &PostSummary) {
    let _ = write!(
        out,
        "<a class=\"post-card\" href=\"{}\" data-slug=\"{}\">\
         <div class=\"post-date\">{}</div>\
         <div class=\"post-title\">{}</div>\
         <div class=\"post-desc\">{}</div>\
         </a>",
        escape(&article_href(&post.slug)),
        escape(&post.slug),
        escape(&format_date(&post.date)),
        escape(&post.title),
        escape(&post.description),
    );
}

/// Shown in place of the post list when the manifest can't be loaded.
pub fn post_list_error() -> String {
    error_message(POSTS_UNAVAILABLE)
}

/// The placeholder shown in the article body while it loads.
pub fn article_loader() -> String {
    concat!(
        "<div class=\"loader\" aria-label=\"Loading article\">",
        "<div class=\"loader-dot\"></div>",
        "<div class=\"loader-dot\"></div>",
        "<div class=\"loader-dot\"></div>",
        "</div>",
    )
    .to_owned()
}

/// Shown in the article body when the post can't be loaded.
pub fn article_error() -> String {
    error_message(ARTICLE_UNAVAILABLE)
}

fn error_message(message: &str) -> String {
    format!("<p class=\"error-msg\">{}</p>", message)
}

/// Everything the article view displays for one post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// Plain text for the title element.
    pub title: String,

    /// Plain text for the date element.
    pub date: String,

    /// Markup for the article body.
    pub body: String,

    /// Plain text for the breadcrumb.
    pub crumb: String,

    /// The document (tab) title.
    pub document_title: String,
}

/// Renders `post` with its markdown source.
pub fn article(post: &PostSummary, markdown: &str, config: &Config) -> Article {
    Article {
        title: post.title.clone(),
        date: format_date(&post.date),
        body: article_html(markdown),
        crumb: post.title.clone(),
        document_title: config.page_title(&post.title),
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let _ = escape_html(&mut out, s);
    out
}
