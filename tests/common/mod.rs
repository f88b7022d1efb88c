//! Test utilities for router integration tests
//!
//! Provides router fixtures, visit recorders and assertion helpers.

#![allow(dead_code)]

use spa_navigator::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared log of handler invocations, one `tag:uri` line per call.
pub type Visits = Rc<RefCell<Vec<String>>>;

/// Install `env_logger` once; `RUST_LOG=spa_navigator=trace` shows dispatch.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn visits() -> Visits {
    Rc::default()
}

/// Handler recording `tag:uri` into `visits`.
pub fn record(visits: &Visits, tag: &'static str) -> impl Fn(&Page) -> HandlerResult + 'static {
    let visits = visits.clone();
    move |page| {
        visits.borrow_mut().push(format!("{}:{}", tag, page.uri));
        Ok(())
    }
}

/// Handler keeping every page it receives.
pub fn capture(pages: &Rc<RefCell<Vec<Page>>>) -> impl Fn(&Page) -> HandlerResult + 'static {
    let pages = pages.clone();
    move |page| {
        pages.borrow_mut().push(page.clone());
        Ok(())
    }
}

/// Hash-mode router on a blank in-memory page.
pub fn hash_router() -> Router<MemoryPlatform> {
    init_logging();
    Router::new(
        MemoryPlatform::new("/"),
        RouterSettings::new().mode(Mode::Hash),
    )
}

/// History-mode router starting at `url` with the given root.
pub fn history_router(url: &str, root: &str) -> Router<MemoryPlatform> {
    init_logging();
    Router::new(
        MemoryPlatform::new(url),
        RouterSettings::new().mode(Mode::History).root(root),
    )
}

/// Paths of the hash history, oldest first.
pub fn history_paths<P: Platform>(router: &Router<P>) -> Vec<String> {
    router
        .history()
        .iter()
        .map(|entry| entry.path.clone())
        .collect()
}

/// Assert the visit log equals `expected`.
pub fn assert_visits(visits: &Visits, expected: &[&str]) {
    assert_eq!(
        visits.borrow().as_slice(),
        expected,
        "Unexpected handler invocations"
    );
}
