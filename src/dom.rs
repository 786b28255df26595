//! [`DomPage`], the browser implementation of [`Page`]. It binds to the
//! elements of `index.html` by id and does nothing but copy what the
//! controller hands it into the DOM.

use crate::controller::{Page, View};
use crate::progress::{ProgressBar, ScrollMetrics};
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, Window};

const ACTIVE: &str = "active";
const VISIBLE: &str = "visible";

pub struct DomPage {
    pub(crate) window: Window,
    document: Document,
    progress_bar: HtmlElement,
    view_list: Element,
    view_article: Element,
    pub(crate) posts_container: Element,
    article_title: Element,
    article_date: Element,
    article_body: Element,
    nav_crumb: Element,
    pub(crate) back_button: Element,
}

impl DomPage {
    /// Looks up every element the blog draws into. Fails if any is missing.
    pub fn mount() -> Result<DomPage, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let page = DomPage {
            progress_bar: element(&document, "progress-bar")?
                .dyn_into::<HtmlElement>()
                .map_err(|_| JsValue::from_str("#progress-bar is not an HTML element"))?,
            view_list: element(&document, "view-list")?,
            view_article: element(&document, "view-article")?,
            posts_container: element(&document, "posts-container")?,
            article_title: element(&document, "article-title")?,
            article_date: element(&document, "article-date")?,
            article_body: element(&document, "article-body")?,
            nav_crumb: element(&document, "nav-crumb")?,
            back_button: element(&document, "back-btn")?,
            window,
            document,
        };

        if let Some(footer_year) = page.document.get_element_by_id("footer-year") {
            let year = js_sys::Date::new_0().get_full_year();
            footer_year.set_text_content(Some(&year.to_string()));
        }
        Ok(page)
    }

    /// The current `location.search`, or empty if it can't be read.
    pub fn search(&self) -> String {
        self.window.location().search().unwrap_or_default()
    }

    pub fn scroll_metrics(&self) -> Option<ScrollMetrics> {
        let root = self.document.document_element()?;
        Some(ScrollMetrics {
            scroll_y: self.window.scroll_y().ok()?,
            scroll_height: f64::from(root.scroll_height()),
            viewport_height: self.window.inner_height().ok()?.as_f64()?,
        })
    }
}

fn element(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{}", id)))
}

fn toggle_class(element: &Element, class: &str, on: bool) {
    if let Err(err) = element.class_list().toggle_with_force(class, on) {
        warn!(class, error = ?err, "updating class list");
    }
}

impl Page for DomPage {
    fn show_view(&self, view: View) {
        toggle_class(&self.view_list, ACTIVE, view == View::List);
        toggle_class(&self.view_article, ACTIVE, view == View::Article);
        self.window.scroll_to_with_x_and_y(0.0, 0.0);
    }

    fn render_list(&self, markup: &str) {
        self.posts_container.set_inner_html(markup);
    }

    fn render_article(&self, title: &str, date: &str, body: &str) {
        self.article_title.set_text_content(Some(title));
        self.article_date.set_text_content(Some(date));
        self.article_body.set_inner_html(body);
    }

    fn set_crumb(&self, text: &str) {
        self.nav_crumb.set_text_content(Some(text));
    }

    fn set_document_title(&self, title: &str) {
        self.document.set_title(title);
    }

    fn set_progress(&self, bar: ProgressBar) {
        toggle_class(&self.progress_bar, VISIBLE, bar.visible);
        if let Err(err) = self.progress_bar.style().set_property("width", &bar.width()) {
            warn!(error = ?err, "updating progress bar");
        }
    }

    fn push_history(&self, href: &str) {
        let pushed = self
            .window
            .history()
            .and_then(|history| history.push_state_with_url(&JsValue::NULL, "", Some(href)));
        if let Err(err) = pushed {
            warn!(href, error = ?err, "pushing history entry");
        }
    }
}
