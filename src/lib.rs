//! The library code for the `keipa` blog reader, a client-side front end for a
//! blog made entirely of static files. The page loads a manifest of posts
//! (`posts.json`), shows them as a list, and when one is picked fetches and
//! renders its markdown source (`posts/{slug}.md`) in place. The architecture
//! can be broken down into three layers:
//!
//! 1. Data: the post [`post::Manifest`] and its cache ([`store`])
//! 2. Rendering: pure functions from data to markup ([`view`], [`markdown`],
//!    [`highlight`], [`date`])
//! 3. Navigation: the [`controller::ViewController`] state machine and its
//!    URL mapping ([`history`])
//!
//! The controller draws through the [`controller::Page`] trait and fetches
//! through the [`fetch::Fetch`] trait. On `wasm32` these are backed by the DOM
//! and the browser's `fetch`; everywhere else the crate builds without any
//! browser dependency, which is how it is tested.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod config;
pub mod controller;
pub mod date;
pub mod fetch;
pub mod highlight;
pub mod history;
pub mod markdown;
pub mod post;
pub mod progress;
pub mod store;
pub mod view;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
mod logging;

#[cfg(test)]
mod testutil;
