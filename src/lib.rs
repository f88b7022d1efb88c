//! # spa-navigator
//!
//! Client-side router for single-page applications.
//!
//! The router maps the address of the page to handlers. In **history mode**
//! the path (below a configurable root) is the routed fragment; in **hash
//! mode** it's the part after `#`. Routes are string rules with placeholders
//! (`user/{id}`, `post/:num`, `tag/:word`) or raw regular expressions, tried in
//! insertion order.
//!
//! ## Features
//!
//! - History and hash modes, with automatic hash fallback
//! - Placeholder rules and regex rules, compiled once and cached (`cache`)
//! - Query string parsing with value-less flags
//! - Before and secure hooks, customizable not-found handler
//! - Unload callbacks that can veto or defer leaving a page
//! - Hash-mode history emulation with `go`, `back` and `forward`
//! - Browser platform via `web-sys` (`web`), in-memory platform for tests
//!
//! ## Quick Start
//!
//! ```
//! use spa_navigator::{MemoryPlatform, Mode, Router, RouterSettings};
//!
//! let mut router = Router::new(
//!     MemoryPlatform::new("/"),
//!     RouterSettings::new().mode(Mode::Hash),
//! );
//!
//! router
//!     .add("about", |_page| Ok(()))
//!     .add("user/:num", |page| {
//!         println!("user #{}", page.params[0]);
//!         Ok(())
//!     });
//!
//! router.add_uri_listener();
//! router.navigate_to("user/42", None, false).unwrap();
//! assert_eq!(router.current(), Some("user/42"));
//!
//! router.navigate_to("about", None, false).unwrap();
//! router.back().unwrap();
//! assert_eq!(router.current(), Some("user/42"));
//! ```
//!
//! ## Cargo features
//!
//! | Feature   | Default | Effect                                          |
//! |-----------|---------|-------------------------------------------------|
//! | `log`     | yes     | log through the `log` crate                     |
//! | `tracing` | no      | log through the `tracing` crate                 |
//! | `cache`   | yes     | LRU cache of compiled rules                     |
//! | `web`     | no      | `WebPlatform` on `wasm32`                       |

#[macro_use]
mod logging;

#[cfg(feature = "cache")]
pub mod cache;
pub mod error;
pub mod fragment;
pub mod history;
pub mod lifecycle;
pub mod memory;
pub mod page;
pub mod params;
pub mod platform;
pub mod route;
pub mod router;
pub mod rule;
pub mod settings;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

/// State attached to a navigation and handed to the page.
pub type NavState = serde_json::Value;

pub use error::{CheckOutcome, HandlerError, HandlerResult, NavigationError, ParseModeError};
pub use history::{HistoryEntry, HistoryMode, HistoryStack};
pub use lifecycle::{UnloadDecision, UnloadFuture, UnloadReason};
pub use memory::MemoryPlatform;
pub use page::{Page, PageOptions, UnloadCallback};
pub use params::{QueryParams, QueryValue, RouteParams};
pub use platform::{ExitCheck, ListenerKind, Location, NavigationEvent, Platform};
pub use route::{handler, Handler, Route, RouteEntry, RouteKey, RouteTable};
pub use router::Router;
pub use rule::{CompiledRule, Rule};
pub use settings::{Hooks, Mode, RouterSettings};
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web::WebPlatform;
