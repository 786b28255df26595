//! Maps between the address bar and [`ViewState`]. The whole navigation state
//! lives in one query parameter, `post`: absent (or empty) means the post
//! list, present means that post's article. Back/forward navigation is
//! reconciled by [`reconcile`], which the page's `popstate` listener calls.

use crate::controller::{Page, ViewController};
use crate::fetch::Fetch;
use url::form_urlencoded;

/// The query parameter carrying the open post's slug.
pub const POST_PARAM: &str = "post";

/// What the page is presenting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    List,
    Article(String),
}

impl ViewState {
    /// Derives the state from `location.search` (with or without the leading
    /// `?`). Parsing follows `URLSearchParams`: `+` is a space and the first
    /// `post` value wins.
    pub fn from_query(search: &str) -> ViewState {
        let query = search.strip_prefix('?').unwrap_or(search);
        form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == POST_PARAM)
            .map(|(_, slug)| slug.into_owned())
            .filter(|slug| !slug.is_empty())
            .map_or(ViewState::List, ViewState::Article)
    }
}

/// Whether a transition records a new history entry. Transitions caused by
/// the browser's own back/forward navigation must not, because the browser
/// has already moved its history pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    Push,
    Replay,
}

/// The relative URL of a post's article view, e.g. `?post=hello`.
pub fn article_href(slug: &str) -> String {
    format!("?{}={}", POST_PARAM, urlencoding::encode(slug))
}

/// Brings the visible view in line with the URL after a back/forward
/// navigation. `search` is the new `location.search`.
pub async fn reconcile<P: Page, F: Fetch + 'static>(
    controller: &ViewController<P, F>,
    search: &str,
) {
    controller
        .navigate(ViewState::from_query(search), HistoryMode::Replay)
        .await
}
