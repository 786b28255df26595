//! Defines [`PostStore`], the lazily loaded cache of the post [`Manifest`].
//!
//! The manifest is fetched at most once per page load. Callers that ask for it
//! while the first fetch is still in flight wait on that same fetch rather
//! than starting their own. A failed fetch leaves the store empty so that a
//! later navigation can try again; a successful one is kept for the lifetime
//! of the page.

use crate::fetch::{Fetch, FetchError};
use crate::post::Manifest;
use futures::future::{FutureExt, LocalBoxFuture, Shared};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info, warn};

type PendingManifest =
    Shared<LocalBoxFuture<'static, Result<Rc<Manifest>, ManifestUnavailable>>>;

enum StoreState {
    Empty,
    Loading(PendingManifest),
    Ready(Rc<Manifest>),
}

/// Owns the manifest cache. See the module docs for the loading rules.
pub struct PostStore<F> {
    fetcher: Rc<F>,
    manifest_url: String,
    state: RefCell<StoreState>,
}

impl<F: Fetch + 'static> PostStore<F> {
    pub fn new(fetcher: Rc<F>, manifest_url: impl Into<String>) -> Self {
        PostStore {
            fetcher,
            manifest_url: manifest_url.into(),
            state: RefCell::new(StoreState::Empty),
        }
    }

    /// Returns the manifest, fetching it first if this is the first call (or
    /// every previous attempt failed).
    pub async fn posts(&self) -> Result<Rc<Manifest>, ManifestUnavailable> {
        let pending = {
            let mut state = self.state.borrow_mut();
            if let StoreState::Ready(manifest) = &*state {
                return Ok(Rc::clone(manifest));
            }
            if let StoreState::Loading(pending) = &*state {
                pending.clone()
            } else {
                let pending =
                    load(Rc::clone(&self.fetcher), self.manifest_url.clone())
                        .boxed_local()
                        .shared();
                *state = StoreState::Loading(pending.clone());
                pending
            }
        };

        let result = pending.await;
        let mut state = self.state.borrow_mut();
        match &result {
            Ok(manifest) => {
                if !matches!(*state, StoreState::Ready(_)) {
                    *state = StoreState::Ready(Rc::clone(manifest));
                }
            }
            Err(_) => {
                if matches!(*state, StoreState::Loading(_)) {
                    *state = StoreState::Empty;
                }
            }
        }
        result
    }

    /// Reports whether the manifest has been fetched and cached.
    pub fn is_loaded(&self) -> bool {
        matches!(*self.state.borrow(), StoreState::Ready(_))
    }
}

async fn load<F: Fetch>(
    fetcher: Rc<F>,
    url: String,
) -> Result<Rc<Manifest>, ManifestUnavailable> {
    debug!(url = %url, "fetching manifest");
    let result = match fetcher.get_text(&url).await {
        Ok(body) => Manifest::from_json(&body)
            .map(Rc::new)
            .map_err(|e| ManifestUnavailable::Parse(e.to_string())),
        Err(err) => Err(ManifestUnavailable::from(err)),
    };
    match &result {
        Ok(manifest) => info!(posts = manifest.posts.len(), "manifest loaded"),
        Err(err) => warn!(url = %url, error = %err, "manifest unavailable"),
    }
    result
}

/// Returned when the manifest couldn't be fetched or isn't shaped like a
/// [`Manifest`]. Cloneable because every caller waiting on a shared fetch
/// receives its own copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestUnavailable {
    /// Returned when the manifest request failed.
    Fetch(FetchError),

    /// Returned when the manifest body isn't valid manifest JSON.
    Parse(String),
}

impl fmt::Display for ManifestUnavailable {
    /// Displays a [`ManifestUnavailable`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ManifestUnavailable::Fetch(err) => {
                write!(f, "Could not load manifest: {}", err)
            }
            ManifestUnavailable::Parse(err) => {
                write!(f, "Could not parse manifest: {}", err)
            }
        }
    }
}

impl std::error::Error for ManifestUnavailable {
    /// Implements the [`std::error::Error`] trait for [`ManifestUnavailable`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ManifestUnavailable::Fetch(err) => Some(err),
            ManifestUnavailable::Parse(_) => None,
        }
    }
}

impl From<FetchError> for ManifestUnavailable {
    /// Converts a [`FetchError`] into a [`ManifestUnavailable`].
    fn from(err: FetchError) -> ManifestUnavailable {
        ManifestUnavailable::Fetch(err)
    }
}
