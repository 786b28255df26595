//! Defines the [`ViewController`], which owns the blog's two-state view
//! machine (`List` / `Article`), and the [`Page`] trait it renders through.
//!
//! Every transition takes a fresh navigation token. Article loads are
//! asynchronous; when one finishes, its result is only rendered if its token
//! is still the current one. A slow fetch for a post the reader has already
//! navigated away from is dropped instead of overwriting the newer view.

use crate::config::Config;
use crate::fetch::{Fetch, FetchError};
use crate::history::{article_href, HistoryMode, ViewState};
use crate::progress::{ProgressBar, ScrollMetrics};
use crate::store::{ManifestUnavailable, PostStore};
use crate::view::{self, Article};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// The two top-level views of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Article,
}

/// The page surface the controller draws on. Markup arguments are trusted
/// HTML from [`crate::view`]; text arguments are set as plain text.
pub trait Page {
    /// Makes `view` the visible one and scrolls to the top.
    fn show_view(&self, view: View);

    /// Replaces the contents of the post list region with `markup`.
    fn render_list(&self, markup: &str);

    /// Sets the article title and date text and the body markup.
    fn render_article(&self, title: &str, date: &str, body: &str);

    fn set_crumb(&self, text: &str);

    fn set_document_title(&self, title: &str);

    fn set_progress(&self, bar: ProgressBar);

    /// Records a new history entry for `href` without reloading.
    fn push_history(&self, href: &str);
}

/// Drives the page. See the module docs.
pub struct ViewController<P, F> {
    page: P,
    fetcher: Rc<F>,
    store: PostStore<F>,
    config: Config,
    state: RefCell<ViewState>,
    navigation: Cell<u64>,
}

impl<P: Page, F: Fetch + 'static> ViewController<P, F> {
    pub fn new(page: P, fetcher: Rc<F>, config: Config) -> Self {
        let store = PostStore::new(Rc::clone(&fetcher), config.manifest_path.clone());
        ViewController {
            page,
            fetcher,
            store,
            config,
            state: RefCell::new(ViewState::List),
            navigation: Cell::new(0),
        }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn store(&self) -> &PostStore<F> {
        &self.store
    }

    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Loads the initial view for a page whose `location.search` is
    /// `search`. The post list is always rendered; a `post` parameter also
    /// opens that article, without pushing history.
    pub async fn start(&self, search: &str) {
        match ViewState::from_query(search) {
            ViewState::Article(slug) => {
                info!(slug = %slug, "starting on article");
                futures::join!(
                    self.load_list(),
                    self.open_post(&slug, HistoryMode::Replay)
                );
            }
            ViewState::List => {
                info!("starting on post list");
                self.load_list().await
            }
        }
    }

    /// Transitions to `state`.
    pub async fn navigate(&self, state: ViewState, mode: HistoryMode) {
        match state {
            ViewState::Article(slug) => self.open_post(&slug, mode).await,
            ViewState::List => self.go_back(mode).await,
        }
    }

    /// Renders the post list region from the (possibly cached) manifest.
    pub async fn load_list(&self) {
        let markup = match self.store.posts().await {
            Ok(manifest) => view::post_list(&manifest.posts),
            Err(err) => {
                warn!(error = %err, "post list unavailable");
                view::post_list_error()
            }
        };
        self.page.render_list(&markup);
    }

    /// `List -> Article(slug)`.
    pub async fn open_post(&self, slug: &str, mode: HistoryMode) {
        let token = self.begin(ViewState::Article(slug.to_owned()));
        if mode == HistoryMode::Push {
            self.page.push_history(&article_href(slug));
        }

        self.page.show_view(View::Article);
        self.page.set_progress(ProgressBar::at(0.0));
        self.page.set_crumb(view::LOADING_CRUMB);
        self.page.render_article("", "", &view::article_loader());

        let result = self.load_article(slug).await;
        if !self.is_current(token) {
            debug!(slug, token, "discarding superseded article");
            return;
        }

        match result {
            Ok(article) => {
                self.page
                    .render_article(&article.title, &article.date, &article.body);
                self.page.set_crumb(&article.crumb);
                self.page.set_document_title(&article.document_title);
            }
            Err(err) => {
                warn!(slug, error = %err, "article unavailable");
                self.page.render_article("", "", &view::article_error());
                self.page.set_crumb(&self.config.error_crumb);
                self.page
                    .set_document_title(&self.config.page_title(&self.config.error_crumb));
            }
        }
    }

    /// Fetches the manifest (if not cached) and the article source
    /// concurrently and renders the article. Has no effect on the page.
    pub async fn load_article(&self, slug: &str) -> Result<Article, ArticleUnavailable> {
        let url = self.config.article_url(slug);
        let (manifest, markdown) =
            futures::join!(self.store.posts(), self.fetcher.get_text(&url));

        let manifest = manifest?;
        let post = manifest
            .find(slug)
            .ok_or_else(|| ArticleUnavailable::NotInManifest(slug.to_owned()))?;
        let markdown = markdown?;
        Ok(view::article(post, &markdown, &self.config))
    }

    /// `Article -> List`.
    pub async fn go_back(&self, mode: HistoryMode) {
        self.begin(ViewState::List);
        if mode == HistoryMode::Push {
            self.page.push_history(&self.config.list_href);
        }

        self.page.set_crumb(&self.config.list_crumb);
        self.page.set_progress(ProgressBar::hidden());
        self.page.set_document_title(&self.config.list_page_title());
        self.page.show_view(View::List);
        self.load_list().await;
    }

    /// Updates the reading-progress bar. Ignored outside the article view
    /// and on pages too short to scroll.
    pub fn on_scroll(&self, metrics: ScrollMetrics) {
        if !matches!(*self.state.borrow(), ViewState::Article(_)) {
            return;
        }
        if let Some(percent) = metrics.percent() {
            self.page.set_progress(ProgressBar::at(percent));
        }
    }

    fn begin(&self, state: ViewState) -> u64 {
        let token = self.navigation.get() + 1;
        self.navigation.set(token);
        *self.state.borrow_mut() = state;
        token
    }

    fn is_current(&self, token: u64) -> bool {
        self.navigation.get() == token
    }
}

/// Represents a failure to show an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleUnavailable {
    /// Returned when the manifest couldn't be loaded.
    Manifest(ManifestUnavailable),

    /// Returned when the manifest loaded but has no post with this slug.
    NotInManifest(String),

    /// Returned when the article's markdown couldn't be fetched.
    Fetch(FetchError),
}

impl fmt::Display for ArticleUnavailable {
    /// Displays an [`ArticleUnavailable`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ArticleUnavailable::Manifest(err) => err.fmt(f),
            ArticleUnavailable::NotInManifest(slug) => {
                write!(f, "Post `{}` not found in manifest", slug)
            }
            ArticleUnavailable::Fetch(err) => {
                write!(f, "Could not load markdown: {}", err)
            }
        }
    }
}

impl std::error::Error for ArticleUnavailable {
    /// Implements the [`std::error::Error`] trait for [`ArticleUnavailable`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArticleUnavailable::Manifest(err) => Some(err),
            ArticleUnavailable::NotInManifest(_) => None,
            ArticleUnavailable::Fetch(err) => Some(err),
        }
    }
}

impl From<ManifestUnavailable> for ArticleUnavailable {
    /// Converts a [`ManifestUnavailable`] into an [`ArticleUnavailable`]. It
    /// allows us to use the `?` operator on [`PostStore::posts`].
    fn from(err: ManifestUnavailable) -> ArticleUnavailable {
        ArticleUnavailable::Manifest(err)
    }
}

impl From<FetchError> for ArticleUnavailable {
    /// Converts a [`FetchError`] into an [`ArticleUnavailable`]. It allows us
    /// to use the `?` operator on article fetches.
    fn from(err: FetchError) -> ArticleUnavailable {
        ArticleUnavailable::Fetch(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::history::reconcile;
    use crate::testutil::{FakePage, MockFetcher, AB_MANIFEST, HELLO_MANIFEST};
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;

    type Controller = ViewController<FakePage, MockFetcher>;

    fn controller(fetcher: MockFetcher) -> (Controller, Rc<MockFetcher>) {
        let fetcher = Rc::new(fetcher);
        let config = Config::embedded().unwrap();
        (
            ViewController::new(FakePage::default(), Rc::clone(&fetcher), config),
            fetcher,
        )
    }

    fn hello_fetcher() -> MockFetcher {
        let fetcher = MockFetcher::new();
        fetcher.respond("posts.json", HELLO_MANIFEST);
        fetcher.respond("posts/hello.md", "# Hello\nBody text");
        fetcher
    }

    #[test]
    fn test_start_on_list() {
        let (controller, fetcher) = controller(hello_fetcher());
        block_on(controller.start(""));

        let page = controller.page();
        assert_eq!(ViewState::List, controller.state());
        assert_eq!(1, page.list.borrow().matches("class=\"post-card\"").count());
        assert!(page.list.borrow().contains("5 January 2024"));
        assert!(page.history.borrow().is_empty());
        assert_eq!(0, fetcher.calls("posts/hello.md"));
    }

    #[test]
    fn test_empty_manifest() {
        let fetcher = MockFetcher::new();
        fetcher.respond("posts.json", r#"{"posts": []}"#);
        let (controller, _) = controller(fetcher);
        block_on(controller.load_list());

        let list = controller.page().list.borrow();
        assert!(list.contains("No posts yet."));
        assert!(!list.contains("post-card"));
    }

    #[test]
    fn test_manifest_failure_renders_list_error() {
        let fetcher = MockFetcher::new();
        fetcher.fail("posts.json", FetchError::Status(500));
        let (controller, _) = controller(fetcher);
        block_on(controller.load_list());

        assert!(controller.page().list.borrow().contains("Could not load posts."));
    }

    #[test]
    fn test_open_post() {
        let (controller, fetcher) = controller(hello_fetcher());
        block_on(controller.open_post("hello", HistoryMode::Push));

        let page = controller.page();
        assert_eq!(Some(View::Article), page.view.get());
        assert_eq!("Hello", *page.title.borrow());
        assert_eq!("5 January 2024", *page.date.borrow());
        assert_eq!("<p>Body text</p>\n", *page.body.borrow());
        assert!(!page.body.borrow().contains("<h1>"));
        assert_eq!("Hello", *page.crumb.borrow());
        assert_eq!("Hello — keipa", *page.document_title.borrow());
        assert_eq!(vec!["?post=hello".to_owned()], *page.history.borrow());
        assert_eq!(ProgressBar::at(0.0), page.progress.get());
        assert_eq!(1, fetcher.calls("posts.json"));
    }

    #[test]
    fn test_start_on_article_fetches_manifest_once() {
        let (controller, fetcher) = controller(hello_fetcher());
        block_on(controller.start("?post=hello"));

        let page = controller.page();
        assert_eq!(ViewState::Article("hello".to_owned()), controller.state());
        assert_eq!("Hello", *page.title.borrow());
        assert!(page.list.borrow().contains("post-card"));
        assert!(page.history.borrow().is_empty());
        assert_eq!(1, fetcher.calls("posts.json"));
    }

    #[test]
    fn test_missing_slug() {
        let fetcher = MockFetcher::new();
        fetcher.respond("posts.json", AB_MANIFEST);
        fetcher.respond("posts/c.md", "# C\nstray file");
        let (controller, fetcher) = controller(fetcher);

        block_on(controller.load_list());
        assert!(controller.store().is_loaded());

        assert_eq!(
            Err(ArticleUnavailable::NotInManifest("c".to_owned())),
            block_on(controller.load_article("c"))
        );

        block_on(controller.open_post("c", HistoryMode::Push));
        let page = controller.page();
        assert!(page.body.borrow().contains("Could not load this post."));
        assert_eq!("error", *page.crumb.borrow());
        assert_eq!("error — keipa", *page.document_title.borrow());

        assert!(controller.store().is_loaded());
        assert_eq!(1, fetcher.calls("posts.json"));
        let manifest = block_on(controller.store().posts()).unwrap();
        assert_eq!(2, manifest.posts.len());
    }

    #[test]
    fn test_markdown_missing() {
        let fetcher = MockFetcher::new();
        fetcher.respond("posts.json", HELLO_MANIFEST);
        let (controller, _) = controller(fetcher);

        assert_eq!(
            Err(ArticleUnavailable::Fetch(FetchError::Status(404))),
            block_on(controller.load_article("hello"))
        );
    }

    #[test]
    fn test_manifest_failure_fails_article() {
        let fetcher = MockFetcher::new();
        fetcher.fail("posts.json", FetchError::Network("offline".to_owned()));
        fetcher.respond("posts/hello.md", "# Hello\nBody text");
        let (controller, _) = controller(fetcher);

        assert!(matches!(
            block_on(controller.load_article("hello")),
            Err(ArticleUnavailable::Manifest(_))
        ));
    }

    #[test]
    fn test_round_trip_back() {
        let (controller, fetcher) = controller(hello_fetcher());
        block_on(controller.start(""));
        block_on(controller.open_post("hello", HistoryMode::Push));
        block_on(controller.go_back(HistoryMode::Push));

        let page = controller.page();
        assert_eq!(ViewState::List, controller.state());
        assert_eq!(Some(View::List), page.view.get());
        assert_eq!("blog", *page.crumb.borrow());
        assert_eq!("Blog — keipa", *page.document_title.borrow());
        assert_eq!(ProgressBar::hidden(), page.progress.get());
        assert!(page.list.borrow().contains("post-card"));

        let last = page.history.borrow().last().cloned().unwrap();
        assert_eq!(ViewState::List, ViewState::from_query(&last));
        assert_eq!(1, fetcher.calls("posts.json"));
    }

    #[test]
    fn test_history_replay_does_not_push() {
        let (controller, _) = controller(hello_fetcher());
        block_on(controller.open_post("hello", HistoryMode::Push));
        assert_eq!(1, controller.page().history.borrow().len());

        block_on(reconcile(&controller, ""));
        assert_eq!(ViewState::List, controller.state());
        let page = controller.page();
        assert_eq!(Some(View::List), page.view.get());
        assert_eq!("blog", *page.crumb.borrow());
        assert_eq!("Blog — keipa", *page.document_title.borrow());
        assert_eq!(ProgressBar::hidden(), page.progress.get());
        assert!(page.list.borrow().contains("<div class=\"post-title\">Hello</div>"));

        block_on(reconcile(&controller, "?post=hello"));
        assert_eq!(ViewState::Article("hello".to_owned()), controller.state());
        assert_eq!("Hello", *controller.page().title.borrow());

        assert_eq!(1, controller.page().history.borrow().len());
    }

    #[test]
    fn test_scroll_progress() {
        let (controller, _) = controller(hello_fetcher());
        let bottom = ScrollMetrics {
            scroll_y: 2000.0,
            scroll_height: 3000.0,
            viewport_height: 1000.0,
        };
        let top = ScrollMetrics {
            scroll_y: 0.0,
            ..bottom
        };

        controller.on_scroll(bottom);
        assert_eq!(ProgressBar::hidden(), controller.page().progress.get());

        block_on(controller.open_post("hello", HistoryMode::Push));
        controller.on_scroll(bottom);
        assert_eq!("100%", controller.page().progress.get().width());
        controller.on_scroll(top);
        assert_eq!("0%", controller.page().progress.get().width());

        block_on(controller.go_back(HistoryMode::Push));
        controller.on_scroll(bottom);
        assert_eq!(ProgressBar::hidden(), controller.page().progress.get());
    }

    #[test]
    fn test_superseded_article_is_discarded() {
        let fetcher = MockFetcher::new();
        fetcher.respond("posts.json", AB_MANIFEST);
        fetcher.respond("posts/a.md", "# A\nslow body");
        fetcher.respond("posts/b.md", "# B\nfast body");
        let release_a = fetcher.gate("posts/a.md");
        let (controller, _) = controller(fetcher);
        let controller = Rc::new(controller);

        let mut pool = LocalPool::new();
        let spawner = pool.spawner();
        {
            let controller = Rc::clone(&controller);
            spawner
                .spawn_local(async move {
                    controller.open_post("a", HistoryMode::Push).await
                })
                .unwrap();
        }
        pool.run_until_stalled();
        assert!(controller.page().body.borrow().contains("loader"));

        {
            let controller = Rc::clone(&controller);
            spawner
                .spawn_local(async move {
                    controller.open_post("b", HistoryMode::Push).await
                })
                .unwrap();
        }
        pool.run_until_stalled();
        assert_eq!("B", *controller.page().title.borrow());

        release_a.send(()).unwrap();
        pool.run();

        let page = controller.page();
        assert_eq!("B", *page.title.borrow());
        assert!(page.body.borrow().contains("fast body"));
        assert_eq!("B", *page.crumb.borrow());
        assert_eq!(ViewState::Article("b".to_owned()), controller.state());
    }

    #[test]
    fn test_back_discards_pending_article() {
        let fetcher = hello_fetcher();
        let release = fetcher.gate("posts/hello.md");
        let (controller, _) = controller(fetcher);
        let controller = Rc::new(controller);

        let mut pool = LocalPool::new();
        let spawner = pool.spawner();
        {
            let controller = Rc::clone(&controller);
            spawner
                .spawn_local(async move {
                    controller.open_post("hello", HistoryMode::Push).await
                })
                .unwrap();
        }
        pool.run_until_stalled();

        {
            let controller = Rc::clone(&controller);
            spawner
                .spawn_local(async move { controller.go_back(HistoryMode::Push).await })
                .unwrap();
        }
        pool.run_until_stalled();
        release.send(()).unwrap();
        pool.run();

        let page = controller.page();
        assert_eq!("blog", *page.crumb.borrow());
        assert_eq!("Blog — keipa", *page.document_title.borrow());
        assert_eq!(Some(View::List), page.view.get());
    }
}
