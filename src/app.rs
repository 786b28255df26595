//! The WASM entry point: mounts the [`DomPage`], wires the page's event
//! listeners to the [`ViewController`], and loads the initial view.

use crate::config::Config;
use crate::controller::ViewController;
use crate::dom::DomPage;
use crate::fetch::HttpFetcher;
use crate::history::{self, HistoryMode};
use crate::logging;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, EventTarget};

type Controller = ViewController<DomPage, HttpFetcher>;

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    let config = Config::embedded().map_err(|e| JsValue::from_str(&e.to_string()))?;
    logging::init(&config.log_level);

    let page = DomPage::mount()?;
    let search = page.search();
    let controller = Rc::new(ViewController::new(page, Rc::new(HttpFetcher), config));

    listen_post_cards(&controller)?;
    listen_back_button(&controller)?;
    listen_history(&controller)?;
    listen_scroll(&controller)?;

    spawn_local(async move { controller.start(&search).await });
    Ok(())
}

fn listen<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    // The listeners live as long as the page.
    closure.forget();
    Ok(())
}

/// Card clicks are delegated to the list container, which outlives the cards
/// it re-renders.
fn listen_post_cards(controller: &Rc<Controller>) -> Result<(), JsValue> {
    let target = controller.page().posts_container.clone();
    let controller = Rc::clone(controller);
    listen(&target, "click", move |event: Event| {
        let Some(slug) = clicked_slug(&event) else {
            return;
        };
        event.prevent_default();
        let controller = Rc::clone(&controller);
        spawn_local(async move { controller.open_post(&slug, HistoryMode::Push).await });
    })
}

fn clicked_slug(event: &Event) -> Option<String> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let card = target.closest(".post-card").ok()??;
    card.get_attribute("data-slug")
}

fn listen_back_button(controller: &Rc<Controller>) -> Result<(), JsValue> {
    let target = controller.page().back_button.clone();
    let controller = Rc::clone(controller);
    listen(&target, "click", move |_| {
        let controller = Rc::clone(&controller);
        spawn_local(async move { controller.go_back(HistoryMode::Push).await });
    })
}

fn listen_history(controller: &Rc<Controller>) -> Result<(), JsValue> {
    let target = controller.page().window.clone();
    let controller = Rc::clone(controller);
    listen(&target, "popstate", move |_| {
        let controller = Rc::clone(&controller);
        let search = controller.page().search();
        spawn_local(async move { history::reconcile(&controller, &search).await });
    })
}

fn listen_scroll(controller: &Rc<Controller>) -> Result<(), JsValue> {
    let target = controller.page().window.clone();
    let controller = Rc::clone(controller);
    listen(&target, "scroll", move |_| {
        if let Some(metrics) = controller.page().scroll_metrics() {
            controller.on_scroll(metrics);
        }
    })
}
