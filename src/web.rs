//! Browser platform (feature `web`, `wasm32` only).
//!
//! [`WebPlatform`] drives `window.location` and `window.history`. Navigation
//! state is stored in the history entry as JSON text.
//!
//! Browser events arrive asynchronously, outside any call into the router.
//! The attached listener queues them and calls the wake callback registered
//! with [`WebPlatform::on_event`]; the host then drains the queue with
//! [`Router::process_events`](crate::Router::process_events):
//!
//! ```ignore
//! use spa_navigator::{Router, RouterSettings, WebPlatform};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let router = Rc::new(RefCell::new(None::<Router<WebPlatform>>));
//! let handle = router.clone();
//! let exit = Rc::downgrade(&router);
//! let platform = WebPlatform::new()?
//!     .on_event(move || {
//!         let handle = handle.clone();
//!         wasm_bindgen_futures::spawn_local(async move {
//!             if let Some(router) = handle.borrow_mut().as_mut() {
//!                 let _ = router.process_events();
//!             }
//!         });
//!     })
//!     .on_exit_check(move || {
//!         let Some(router) = exit.upgrade() else { return true };
//!         let allowed = router
//!             .try_borrow()
//!             .map_or(true, |router| router.as_ref().map_or(true, Router::confirm_exit));
//!         allowed
//!     });
//! *router.borrow_mut() = Some(Router::new(platform, RouterSettings::new()));
//! ```
//!
//! The exit guard installs a `beforeunload` handler that asks the browser for
//! its native confirmation prompt. The browser cannot wait for the router, so
//! the handler only asks the predicate set with [`WebPlatform::on_exit_check`],
//! typically [`Router::confirm_exit`](crate::Router::confirm_exit) behind the
//! same shared handle; without one the prompt always shows.

use crate::error::NavigationError;
use crate::platform::{exit_prompt_due, ExitCheck, ListenerKind, Location, NavigationEvent, Platform};
use crate::NavState;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

type EventQueue = Rc<RefCell<VecDeque<NavigationEvent>>>;

struct AttachedListener {
    kind: ListenerKind,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

/// [`Platform`] over the browser window.
pub struct WebPlatform {
    window: web_sys::Window,
    events: EventQueue,
    wake: Option<Rc<dyn Fn()>>,
    listener: Option<AttachedListener>,
    exit_check: Option<ExitCheck>,
    exit_guard: Option<Closure<dyn FnMut(web_sys::BeforeUnloadEvent)>>,
}

impl WebPlatform {
    /// Bind to the global `window`.
    pub fn new() -> Result<Self, NavigationError> {
        let window =
            web_sys::window().ok_or_else(|| NavigationError::platform("no global window"))?;
        Ok(Self {
            window,
            events: Rc::default(),
            wake: None,
            listener: None,
            exit_check: None,
            exit_guard: None,
        })
    }

    /// Called after each queued browser event.
    pub fn on_event<F>(mut self, wake: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.wake = Some(Rc::new(wake));
        self
    }

    /// Asked on `beforeunload` while the exit guard is armed; `true` lets
    /// the page go without the native prompt.
    pub fn on_exit_check<F>(mut self, check: F) -> Self
    where
        F: Fn() -> bool + 'static,
    {
        self.exit_check = Some(ExitCheck::new(check));
        self
    }

    fn history(&self) -> Result<web_sys::History, NavigationError> {
        self.window.history().map_err(js_error)
    }

    fn detach_listener(&mut self) {
        if let Some(attached) = self.listener.take() {
            let _ = self.window.remove_event_listener_with_callback(
                event_name(attached.kind),
                attached.closure.as_ref().unchecked_ref(),
            );
        }
    }

    fn detach_exit_guard(&mut self) {
        if let Some(closure) = self.exit_guard.take() {
            let _ = self.window.remove_event_listener_with_callback(
                "beforeunload",
                closure.as_ref().unchecked_ref(),
            );
        }
    }
}

impl Platform for WebPlatform {
    fn supports_push_state(&self) -> bool {
        self.window.history().is_ok_and(|history| {
            js_sys::Reflect::has(&history, &JsValue::from_str("pushState")).unwrap_or(false)
        })
    }

    fn location(&self) -> Location {
        let location = self.window.location();
        Location {
            pathname: location.pathname().unwrap_or_else(|_| "/".to_string()),
            search: location.search().unwrap_or_default(),
            hash: location.hash().unwrap_or_default(),
        }
    }

    fn history_state(&self) -> Option<NavState> {
        let state = self.history().ok()?.state().ok()?;
        serde_json::from_str(&state.as_string()?).ok()
    }

    fn push_state(&mut self, state: Option<&NavState>, url: &str) -> Result<(), NavigationError> {
        self.history()?
            .push_state_with_url(&state_value(state), "", Some(url))
            .map_err(js_error)
    }

    fn replace_state(
        &mut self,
        state: Option<&NavState>,
        url: &str,
    ) -> Result<(), NavigationError> {
        self.history()?
            .replace_state_with_url(&state_value(state), "", Some(url))
            .map_err(js_error)
    }

    fn set_hash(&mut self, hash: &str) -> Result<(), NavigationError> {
        self.window.location().set_hash(hash).map_err(js_error)
    }

    fn replace_hash(&mut self, hash: &str) -> Result<(), NavigationError> {
        let current = self.location();
        let hash = hash.strip_prefix('#').unwrap_or(hash);
        let url = format!("{}{}#{}", current.pathname, current.search, hash);
        self.window.location().replace(&url).map_err(js_error)
    }

    fn go(&mut self, delta: i32) -> Result<(), NavigationError> {
        self.history()?.go_with_delta(delta).map_err(js_error)
    }

    fn listen(&mut self, kind: ListenerKind) {
        self.detach_listener();

        let events = self.events.clone();
        let wake = self.wake.clone();
        let event = match kind {
            ListenerKind::PopState => NavigationEvent::PopState,
            ListenerKind::HashChange => NavigationEvent::HashChange,
        };
        let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            events.borrow_mut().push_back(event);
            if let Some(wake) = &wake {
                wake();
            }
        }) as Box<dyn FnMut(_)>);

        match self
            .window
            .add_event_listener_with_callback(event_name(kind), closure.as_ref().unchecked_ref())
        {
            Ok(()) => {
                debug_log!("Attached {} listener", event_name(kind));
                self.listener = Some(AttachedListener { kind, closure });
            }
            Err(_err) => {
                warn_log!("Failed to attach {} listener: {:?}", event_name(kind), _err);
            }
        }
    }

    fn unlisten(&mut self) {
        self.detach_listener();
        self.events.borrow_mut().clear();
    }

    fn set_exit_guard(&mut self, armed: bool) {
        if !armed {
            self.detach_exit_guard();
            return;
        }
        if self.exit_guard.is_some() {
            return;
        }
        let check = self.exit_check.clone();
        let closure = Closure::wrap(Box::new(move |event: web_sys::BeforeUnloadEvent| {
            if exit_prompt_due(check.as_ref()) {
                event.prevent_default();
                event.set_return_value("");
            }
        }) as Box<dyn FnMut(_)>);
        match self
            .window
            .add_event_listener_with_callback("beforeunload", closure.as_ref().unchecked_ref())
        {
            Ok(()) => self.exit_guard = Some(closure),
            Err(_err) => {
                warn_log!("Failed to attach beforeunload guard: {:?}", _err);
            }
        }
    }

    fn poll_event(&mut self) -> Option<NavigationEvent> {
        self.events.borrow_mut().pop_front()
    }
}

impl Drop for WebPlatform {
    fn drop(&mut self) {
        self.detach_listener();
        self.detach_exit_guard();
    }
}

impl fmt::Debug for WebPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebPlatform")
            .field("listener", &self.listener.as_ref().map(|l| l.kind))
            .field("queued", &self.events.borrow().len())
            .field("exit_check", &self.exit_check.is_some())
            .field("exit_guard", &self.exit_guard.is_some())
            .finish_non_exhaustive()
    }
}

fn event_name(kind: ListenerKind) -> &'static str {
    match kind {
        ListenerKind::PopState => "popstate",
        ListenerKind::HashChange => "hashchange",
    }
}

fn state_value(state: Option<&NavState>) -> JsValue {
    state.map_or(JsValue::NULL, |state| JsValue::from_str(&state.to_string()))
}

fn js_error(err: JsValue) -> NavigationError {
    NavigationError::platform(
        err.as_string()
            .unwrap_or_else(|| format!("{:?}", err)),
    )
}
