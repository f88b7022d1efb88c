//! Hash mode: fragment resolution, hash history emulation and traversal.

mod common;

use common::*;
use serde_json::json;
use spa_navigator::*;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn test_hash_fragment_and_query() {
    let pages = Rc::new(RefCell::new(Vec::new()));
    let mut router = Router::new(
        MemoryPlatform::new("/index.html#/user/7/?tab=posts&compact"),
        RouterSettings::new().mode(Mode::Hash),
    );
    router.add("user/:num", capture(&pages));

    router.check().unwrap();

    let pages = pages.borrow();
    assert_eq!(pages[0].uri, "user/7");
    assert_eq!(pages[0].query.get_text("tab"), Some("posts"));
    assert!(pages[0].query.get("compact").is_some_and(QueryValue::is_flag));
}

#[test]
fn test_branching_after_back_truncates_future() {
    let mut router = hash_router();
    router.add(":word", |_| Ok(()));

    for path in ["a", "b", "c"] {
        router.navigate_to(path, None, false).unwrap();
    }
    router.back().unwrap();
    assert_eq!(router.current(), Some("b"));
    assert_eq!(history_paths(&router), ["a", "b", "c"]);

    router.navigate_to("d", None, false).unwrap();

    assert_eq!(history_paths(&router), ["a", "b", "d"]);
    assert_eq!(router.history().cursor(), Some(2));
    assert!(!router.history().can_go_forward());
}

#[test]
fn test_back_and_forward_walk_the_stack() {
    let visits = visits();
    let mut router = hash_router();
    router.add(":word", record(&visits, "page"));

    router.navigate_to("a", None, false).unwrap();
    router.navigate_to("b", None, false).unwrap();
    router.back().unwrap();
    router.back().unwrap();
    router.forward().unwrap();
    router.forward().unwrap();
    router.forward().unwrap();

    assert_visits(&visits, &["page:a", "page:b", "page:a", "page:b"]);
    assert_eq!(history_paths(&router), ["a", "b"]);
    assert_eq!(router.history().cursor(), Some(1));
}

#[test]
fn test_go_uses_absolute_index() {
    let mut router = hash_router();
    router.add(":word", |_| Ok(()));
    for path in ["first", "second", "third"] {
        router.navigate_to(path, None, false).unwrap();
    }

    router.go(0).unwrap();
    assert_eq!(router.current(), Some("first"));
    assert_eq!(router.history().cursor(), Some(0));

    router.go(2).unwrap();
    assert_eq!(router.current(), Some("third"));

    router.go(7).unwrap();
    router.go(-1).unwrap();
    assert_eq!(router.current(), Some("third"));
    assert_eq!(router.history().len(), 3);
}

#[test]
fn test_traversal_restores_entry_state() {
    let pages = Rc::new(RefCell::new(Vec::new()));
    let mut router = hash_router();
    router.add(":word", capture(&pages));

    router.navigate_to("list", Some(json!({"scroll": 480})), false).unwrap();
    router.navigate_to("detail", None, false).unwrap();
    router.back().unwrap();

    let pages = pages.borrow();
    assert_eq!(pages.len(), 3);
    assert_eq!(pages[2].uri, "list");
    assert_eq!(pages[2].state, Some(json!({"scroll": 480})));
}

#[test]
fn test_redirect_replaces_current_entry() {
    let mut router = hash_router();
    router.add(":word", |_| Ok(()));

    router.navigate_to("home", None, false).unwrap();
    router.navigate_to("login", None, false).unwrap();
    router.redirect_to("dashboard", None, false).unwrap();

    assert_eq!(history_paths(&router), ["home", "dashboard"]);
    assert_eq!(router.platform().location().hash, "#dashboard");
    assert_eq!(router.platform().history_len(), 3);
}

#[test]
fn test_refresh_does_not_grow_history() {
    let visits = visits();
    let mut router = hash_router();
    router.add(":word", record(&visits, "page"));

    router.navigate_to("inbox", None, false).unwrap();
    router.refresh().unwrap();

    assert_visits(&visits, &["page:inbox", "page:inbox"]);
    assert_eq!(history_paths(&router), ["inbox"]);
}

#[test]
fn test_refresh_after_silent_navigation_records_the_new_fragment() {
    let pages = Rc::new(RefCell::new(Vec::new()));
    let mut router = hash_router();
    router.add(":word", capture(&pages));

    router.navigate_to("a", Some(json!({"k": "a-state"})), false).unwrap();
    router.navigate_to("quiet", None, true).unwrap();
    router.refresh().unwrap();

    let pages = pages.borrow();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[1].uri, "quiet");
    assert_eq!(pages[1].state, None);
    assert_eq!(history_paths(&router), ["a", "quiet"]);
    assert_eq!(router.history().cursor(), Some(1));
}

#[test]
fn test_query_only_hash_change_is_dispatched() {
    let pages = Rc::new(RefCell::new(Vec::new()));
    let mut router = hash_router();
    router.add("list", capture(&pages));
    router.add_uri_listener();

    router.navigate_to("list?page=1", None, false).unwrap();
    router.process_events().unwrap();
    router.platform_mut().set_hash("list?page=2").unwrap();
    let outcomes = router.process_events().unwrap();

    assert_eq!(outcomes, [CheckOutcome::Dispatched { uri: "list".into() }]);
    assert_eq!(pages.borrow()[1].query.get_text("page"), Some("2"));
}

#[test]
fn test_history_is_bounded() {
    let mut router = Router::new(
        MemoryPlatform::new("/"),
        RouterSettings::new().mode(Mode::Hash).history_capacity(3),
    );
    router.add(":word", |_| Ok(()));

    for path in ["a", "b", "c", "d", "e"] {
        router.navigate_to(path, None, false).unwrap();
    }

    assert_eq!(history_paths(&router), ["c", "d", "e"]);
    router.go(0).unwrap();
    assert_eq!(router.current(), Some("c"));
}

#[test]
fn test_own_writes_are_not_dispatched_twice() {
    let visits = visits();
    let mut router = hash_router();
    router.add(":word", record(&visits, "page"));
    router.add_uri_listener();

    router.navigate_to("a", None, false).unwrap();
    router.navigate_to("b", None, false).unwrap();
    router.back().unwrap();
    let outcomes = router.process_events().unwrap();

    assert!(outcomes.iter().all(|outcome| *outcome == CheckOutcome::Skipped));
    assert_visits(&visits, &["page:a", "page:b", "page:a"]);
}

#[test]
fn test_external_hash_change_is_dispatched_and_recorded() {
    let visits = visits();
    let mut router = hash_router();
    router.add(":word", record(&visits, "page"));
    router.add_uri_listener();

    router.navigate_to("a", None, false).unwrap();
    router.process_events().unwrap();
    router.platform_mut().set_hash("typed").unwrap();
    let outcomes = router.process_events().unwrap();

    assert_eq!(outcomes, [CheckOutcome::Dispatched { uri: "typed".into() }]);
    assert_eq!(history_paths(&router), ["a", "typed"]);
    assert_visits(&visits, &["page:a", "page:typed"]);
}

#[test]
fn test_popstate_is_ignored_in_hash_mode() {
    let mut router = hash_router();
    router.add_uri_listener();
    assert_eq!(router.platform().listener(), Some(ListenerKind::HashChange));

    let outcome = router.handle_event(NavigationEvent::PopState).unwrap();
    assert_eq!(outcome, CheckOutcome::Skipped);
}

#[test]
fn test_reset_clears_hash_history() {
    let mut router = hash_router();
    router.add(":word", |_| Ok(()));
    router.navigate_to("a", None, false).unwrap();

    router.reset();

    assert!(router.history().is_empty());
    assert_eq!(router.mode(), Mode::History);
    router.back().unwrap();
}
