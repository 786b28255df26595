//! Test doubles shared by the unit tests: a scripted [`MockFetcher`] and a
//! [`FakePage`] that records what the controller drew.

use crate::controller::{Page, View};
use crate::fetch::{Fetch, FetchError};
use crate::progress::ProgressBar;
use futures::channel::oneshot;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

pub const HELLO_MANIFEST: &str = r#"{"posts": [
    {"slug": "hello", "title": "Hello", "description": "d", "date": "2024-01-05"}
]}"#;

pub const AB_MANIFEST: &str = r#"{"posts": [
    {"slug": "a", "title": "A", "description": "first", "date": "2024-01-01"},
    {"slug": "b", "title": "B", "description": "second", "date": "2024-01-02"}
]}"#;

/// Answers each URL with a scripted response; unknown URLs get a 404. Every
/// request is counted, and a URL can be gated so its response is held back
/// until the test releases it.
#[derive(Default)]
pub struct MockFetcher {
    responses: RefCell<HashMap<String, Result<String, FetchError>>>,
    gates: RefCell<HashMap<String, oneshot::Receiver<()>>>,
    calls: RefCell<HashMap<String, usize>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        MockFetcher::default()
    }

    pub fn respond(&self, url: &str, body: &str) {
        self.responses
            .borrow_mut()
            .insert(url.to_owned(), Ok(body.to_owned()));
    }

    pub fn fail(&self, url: &str, err: FetchError) {
        self.responses.borrow_mut().insert(url.to_owned(), Err(err));
    }

    /// Holds the next request for `url` until the returned sender fires.
    pub fn gate(&self, url: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().insert(url.to_owned(), rx);
        tx
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.borrow().get(url).copied().unwrap_or(0)
    }
}

impl Fetch for MockFetcher {
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        *self.calls.borrow_mut().entry(url.to_owned()).or_insert(0) += 1;
        let gate = self.gates.borrow_mut().remove(url);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        let response = self.responses.borrow().get(url).cloned();
        response.unwrap_or(Err(FetchError::Status(404)))
    }
}

/// Records the latest value of every region of the page.
pub struct FakePage {
    pub view: Cell<Option<View>>,
    pub list: RefCell<String>,
    pub title: RefCell<String>,
    pub date: RefCell<String>,
    pub body: RefCell<String>,
    pub crumb: RefCell<String>,
    pub document_title: RefCell<String>,
    pub progress: Cell<ProgressBar>,
    pub history: RefCell<Vec<String>>,
}

impl Default for FakePage {
    fn default() -> Self {
        FakePage {
            view: Cell::new(None),
            list: RefCell::default(),
            title: RefCell::default(),
            date: RefCell::default(),
            body: RefCell::default(),
            crumb: RefCell::default(),
            document_title: RefCell::default(),
            progress: Cell::new(ProgressBar::hidden()),
            history: RefCell::default(),
        }
    }
}

impl Page for FakePage {
    fn show_view(&self, view: View) {
        self.view.set(Some(view));
    }

    fn render_list(&self, markup: &str) {
        *self.list.borrow_mut() = markup.to_owned();
    }

    fn render_article(&self, title: &str, date: &str, body: &str) {
        *self.title.borrow_mut() = title.to_owned();
        *self.date.borrow_mut() = date.to_owned();
        *self.body.borrow_mut() = body.to_owned();
    }

    fn set_crumb(&self, text: &str) {
        *self.crumb.borrow_mut() = text.to_owned();
    }

    fn set_document_title(&self, title: &str) {
        *self.document_title.borrow_mut() = title.to_owned();
    }

    fn set_progress(&self, bar: ProgressBar) {
        self.progress.set(bar);
    }

    fn push_history(&self, href: &str) {
        self.history.borrow_mut().push(href.to_owned());
    }
}
