//! Unload callbacks: vetoing, deferring and the exit guard.

mod common;

use common::*;
use spa_navigator::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Page options whose unload callback answers `decision()` and counts calls.
fn guarded<F>(calls: &Rc<Cell<usize>>, decision: F) -> PageOptions
where
    F: Fn(UnloadReason) -> UnloadDecision + 'static,
{
    let calls = calls.clone();
    PageOptions::new().on_unload(move |reason| {
        calls.set(calls.get() + 1);
        decision(reason)
    })
}

#[test]
fn test_veto_keeps_fragment_in_history_mode() {
    let visits = visits();
    let calls = Rc::new(Cell::new(0));
    let mut router = history_router("/editor", "/");
    router
        .add_with_options("editor", record(&visits, "editor"), guarded(&calls, |_| UnloadDecision::Stay))
        .add("next", record(&visits, "next"));
    router.check().unwrap();
    let before = router.fragment();

    router.navigate_to("next", None, false).unwrap();

    assert_eq!(router.fragment(), before);
    assert_eq!(router.current(), Some("editor"));
    assert_eq!(calls.get(), 1);
    assert_visits(&visits, &["editor:editor"]);
}

#[test]
fn test_veto_keeps_fragment_in_hash_mode() {
    let visits = visits();
    let calls = Rc::new(Cell::new(0));
    let mut router = hash_router();
    router
        .add_with_options("editor", record(&visits, "editor"), guarded(&calls, |_| false.into()))
        .add("next", record(&visits, "next"));
    router.navigate_to("editor", None, false).unwrap();

    router.navigate_to("next", None, false).unwrap();

    assert_eq!(router.fragment(), "editor");
    assert_eq!(history_paths(&router), ["editor"]);
    assert_visits(&visits, &["editor:editor"]);
}

#[test]
fn test_veto_correction_event_is_skipped() {
    let visits = visits();
    let calls = Rc::new(Cell::new(0));
    let mut router = hash_router();
    router
        .add_with_options("form", record(&visits, "form"), guarded(&calls, |_| UnloadDecision::Stay))
        .add(":word", record(&visits, "other"));
    router.add_uri_listener();
    router.navigate_to("form", None, false).unwrap();
    router.process_events().unwrap();

    router.platform_mut().set_hash("away").unwrap();
    let outcomes = router.process_events().unwrap();

    // The hash reset fires its own hashchange, drained in the same pass.
    assert_eq!(outcomes, [CheckOutcome::Reverted, CheckOutcome::Skipped]);
    assert_eq!(router.platform().location().hash, "#form");
    assert_eq!(router.platform().pending_events(), 0);
    assert_eq!(calls.get(), 1);
    assert_visits(&visits, &["form:form"]);
}

#[test]
fn test_veto_after_browser_back_keeps_history_entries() {
    let visits = visits();
    let calls = Rc::new(Cell::new(0));
    let mut router = history_router("/", "/");
    router
        .add("a", record(&visits, "a"))
        .add_with_options("b", record(&visits, "b"), guarded(&calls, |_| UnloadDecision::Stay));
    router.add_uri_listener();
    router.navigate_to("a", None, false).unwrap();
    router.navigate_to("b", None, false).unwrap();

    router.platform_mut().go(-1).unwrap();
    let outcomes = router.process_events().unwrap();

    assert_eq!(outcomes, [CheckOutcome::Reverted]);
    assert_eq!(router.platform().location().pathname, "/b");
    assert_eq!(router.platform().history_urls(), ["/", "/a", "/b"]);
    assert_eq!(calls.get(), 1);
    assert_visits(&visits, &["a:a", "b:b"]);

    router.platform_mut().go(-1).unwrap();
    assert_eq!(router.platform().location().pathname, "/a");
}

#[test]
fn test_veto_of_redirect_restores_address_in_place() {
    let calls = Rc::new(Cell::new(0));
    let mut router = history_router("/", "/");
    router
        .add_with_options("draft", |_| Ok(()), guarded(&calls, |_| UnloadDecision::Stay))
        .add("published", |_| Ok(()));
    router.navigate_to("draft", None, false).unwrap();
    let entries = router.platform().history_len();

    router.redirect_to("published", None, false).unwrap();

    assert_eq!(router.platform().history_len(), entries);
    assert_eq!(router.platform().location().pathname, "/draft");
}

#[test]
fn test_leave_lets_navigation_through() {
    let visits = visits();
    let calls = Rc::new(Cell::new(0));
    let mut router = hash_router();
    router
        .add_with_options("form", record(&visits, "form"), guarded(&calls, |_| UnloadDecision::Leave))
        .add("next", record(&visits, "next"));

    router.navigate_to("form", None, false).unwrap();
    router.navigate_to("next", None, false).unwrap();
    router.navigate_to("form", None, false).unwrap();

    assert_eq!(calls.get(), 1);
    assert_visits(&visits, &["form:form", "next:next", "form:form"]);
}

#[test]
fn test_deferred_decision_settles_to_leave() {
    let visits = visits();
    let calls = Rc::new(Cell::new(0));
    let mut router = hash_router();
    router
        .add_with_options(
            "form",
            record(&visits, "form"),
            guarded(&calls, |_| UnloadDecision::deferred(async { true })),
        )
        .add("next", record(&visits, "next"));
    router.navigate_to("form", None, false).unwrap();

    router.navigate_to("next", None, false).unwrap();
    assert!(router.is_suspended());
    assert_eq!(router.current(), Some("form"));

    let outcome = pollster::block_on(router.settle()).unwrap();

    assert_eq!(outcome, CheckOutcome::Dispatched { uri: "next".into() });
    assert!(!router.is_suspended());
    assert_eq!(history_paths(&router), ["form", "next"]);
    assert_visits(&visits, &["form:form", "next:next"]);
}

#[test]
fn test_deferred_decision_settles_to_stay() {
    let calls = Rc::new(Cell::new(0));
    let mut router = hash_router();
    router
        .add_with_options(
            "form",
            |_| Ok(()),
            guarded(&calls, |_| UnloadDecision::deferred(async { false })),
        )
        .add("next", |_| Ok(()));
    router.navigate_to("form", None, false).unwrap();
    router.navigate_to("next", None, false).unwrap();

    let outcome = pollster::block_on(router.settle()).unwrap();

    assert_eq!(outcome, CheckOutcome::Reverted);
    assert_eq!(router.fragment(), "form");
    assert_eq!(router.current(), Some("form"));
}

#[test]
fn test_suspended_router_is_busy() {
    let visits = visits();
    let calls = Rc::new(Cell::new(0));
    let mut router = hash_router();
    router
        .add_with_options(
            "form",
            record(&visits, "form"),
            guarded(&calls, |_| UnloadDecision::deferred(async { true })),
        )
        .add(":word", record(&visits, "other"));
    router.navigate_to("form", None, false).unwrap();
    router.navigate_to("first", None, false).unwrap();

    assert_eq!(router.check().unwrap(), CheckOutcome::Busy);
    router.navigate_to("second", None, false).unwrap();
    router.refresh().unwrap();
    assert_eq!(router.fragment(), "first");
    assert_eq!(calls.get(), 1);

    let decision = router.take_unload_decision().unwrap();
    assert!(router.take_unload_decision().is_none());
    assert_eq!(pollster::block_on(router.settle()).unwrap(), CheckOutcome::Busy);

    let leave = pollster::block_on(decision);
    let outcome = router.resume(leave).unwrap();

    assert_eq!(outcome, CheckOutcome::Dispatched { uri: "first".into() });
    assert_visits(&visits, &["form:form", "other:first"]);
    assert_eq!(router.resume(true).unwrap(), CheckOutcome::Skipped);
}

#[test]
fn test_confirm_exit_and_guard() {
    let calls = Rc::new(Cell::new(0));
    let reasons = Rc::new(RefCell::new(Vec::new()));
    let seen = reasons.clone();
    let mut router = hash_router();
    router
        .add_with_options(
            "editor",
            |_| Ok(()),
            guarded(&calls, move |reason| {
                seen.borrow_mut().push(reason);
                UnloadDecision::Stay
            }),
        )
        .add("about", |_| Ok(()));

    assert!(router.confirm_exit());
    router.navigate_to("editor", None, false).unwrap();
    assert!(router.platform().exit_guard_armed());
    assert!(!router.confirm_exit());
    assert_eq!(*reasons.borrow(), [UnloadReason::PageExit]);

    router.reset();
    assert!(!router.platform().exit_guard_armed());
    assert!(router.confirm_exit());
}

#[test]
fn test_exit_check_asks_the_router() {
    let calls = Rc::new(Cell::new(0));
    let leave = Rc::new(Cell::new(false));
    let answer = leave.clone();
    let slot: Rc<RefCell<Option<Router<MemoryPlatform>>>> = Rc::default();
    let exit = Rc::downgrade(&slot);
    let platform = MemoryPlatform::new("/").on_exit_check(move || {
        let Some(slot) = exit.upgrade() else {
            return true;
        };
        let allowed = slot.borrow().as_ref().map_or(true, |router| router.confirm_exit());
        allowed
    });
    let mut router = Router::new(platform, RouterSettings::new().mode(Mode::Hash));
    router.add_with_options("editor", |_| Ok(()), guarded(&calls, move |_| answer.get().into()));
    router.navigate_to("editor", None, false).unwrap();
    *slot.borrow_mut() = Some(router);

    let prompted = || {
        slot.borrow()
            .as_ref()
            .is_some_and(|router| router.platform().exit_prompted())
    };
    assert!(prompted());
    leave.set(true);
    assert!(!prompted());
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_deferred_exit_counts_as_leaving() {
    let calls = Rc::new(Cell::new(0));
    let mut router = hash_router();
    router.add_with_options(
        "editor",
        |_| Ok(()),
        guarded(&calls, |_| UnloadDecision::deferred(async { false })),
    );
    router.navigate_to("editor", None, false).unwrap();

    assert!(router.confirm_exit());
    assert!(!router.is_suspended());
}
