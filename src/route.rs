//! Routes and the route table.
//!
//! A [`Route`] pairs a compiled rule with a handler and per-route
//! [`PageOptions`]. The [`RouteTable`] keeps routes in insertion order, which
//! is also match priority: the first route whose rule matches wins.
//!
//! Handlers are reference-counted so a route can be removed later by the
//! handler it was registered with ([`RouteKey::Handler`]), compared by
//! pointer identity. Removing by [`RouteKey::Rule`] compares the canonical
//! form of the compiled rule instead.

use crate::error::HandlerResult;
use crate::page::{Page, PageOptions};
use crate::rule::{CompiledRule, Rule, RuleCompiler};
use std::fmt;
use std::rc::Rc;

/// Route handler. Receives the page as its only argument.
pub type Handler = Rc<dyn Fn(&Page) -> HandlerResult>;

/// Wrap a closure as a [`Handler`], keeping the `Rc` for later removal.
///
/// ```
/// use spa_navigator::handler;
///
/// let show_user = handler(|page| {
///     println!("user {}", page.params[0]);
///     Ok(())
/// });
/// let same = show_user.clone();
/// assert!(std::rc::Rc::ptr_eq(&show_user, &same));
/// ```
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&Page) -> HandlerResult + 'static,
{
    Rc::new(f)
}

/// A rule bound to a handler.
#[derive(Clone)]
pub struct Route {
    pub(crate) rule: Rule,
    pub(crate) handler: Handler,
    pub(crate) options: PageOptions,
}

impl Route {
    /// Route from a rule and a closure.
    pub fn new<F>(rule: impl Into<Rule>, f: F) -> Self
    where
        F: Fn(&Page) -> HandlerResult + 'static,
    {
        Self::with_handler(rule, handler(f))
    }

    /// Route from a rule and an existing handler.
    pub fn with_handler(rule: impl Into<Rule>, handler: Handler) -> Self {
        Self {
            rule: rule.into(),
            handler,
            options: PageOptions::default(),
        }
    }

    /// Attach page options.
    pub fn options(mut self, options: PageOptions) -> Self {
        self.options = options;
        self
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("rule", &self.rule.to_string())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// How to identify a route for removal.
#[derive(Clone)]
pub enum RouteKey {
    /// The handler the route was registered with.
    Handler(Handler),
    /// A rule compiling to the same canonical pattern.
    Rule(Rule),
}

impl From<&str> for RouteKey {
    fn from(rule: &str) -> Self {
        RouteKey::Rule(rule.into())
    }
}

impl From<String> for RouteKey {
    fn from(rule: String) -> Self {
        RouteKey::Rule(rule.into())
    }
}

impl From<regex::Regex> for RouteKey {
    fn from(pattern: regex::Regex) -> Self {
        RouteKey::Rule(pattern.into())
    }
}

impl From<&Handler> for RouteKey {
    fn from(handler: &Handler) -> Self {
        RouteKey::Handler(handler.clone())
    }
}

impl From<Handler> for RouteKey {
    fn from(handler: Handler) -> Self {
        RouteKey::Handler(handler)
    }
}

/// A compiled route in the table.
#[derive(Clone)]
pub struct RouteEntry {
    pub pattern: CompiledRule,
    pub handler: Handler,
    pub options: PageOptions,
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("pattern", &self.pattern.as_str())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Result of matching a fragment against the table.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub entry: &'a RouteEntry,
    pub params: Vec<String>,
}

/// Ordered list of routes.
#[derive(Debug, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    compiler: RuleCompiler,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile and append a route. Duplicates are allowed.
    pub fn push(&mut self, route: Route) {
        let pattern = self.compiler.compile(&route.rule);
        debug_log!("Compiled rule '{}' into '{}'", route.rule, pattern.as_str());
        self.entries.push(RouteEntry {
            pattern,
            handler: route.handler,
            options: route.options,
        });
    }

    /// Remove the first route identified by `key`. Returns the removed entry.
    pub fn remove(&mut self, key: &RouteKey) -> Option<RouteEntry> {
        let index = match key {
            RouteKey::Handler(handler) => self
                .entries
                .iter()
                .position(|entry| Rc::ptr_eq(&entry.handler, handler)),
            RouteKey::Rule(rule) => {
                let pattern = self.compiler.compile(rule);
                self.entries
                    .iter()
                    .position(|entry| entry.pattern == pattern)
            }
        }?;
        Some(self.entries.remove(index))
    }

    /// First route whose rule matches the whole fragment.
    pub fn find(&self, fragment: &str) -> Option<RouteMatch<'_>> {
        self.entries.iter().find_map(|entry| {
            trace_log!("Trying '{}' against '{}'", entry.pattern.as_str(), fragment);
            entry
                .pattern
                .captures(fragment)
                .map(|params| RouteMatch { entry, params })
        })
    }

    /// Drop every route and forget cached compilations.
    pub fn clear(&mut self) {
        self.entries.clear();
        #[cfg(feature = "cache")]
        self.compiler.clear_cache();
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rule compiler shared by `push` and `remove`.
    pub fn compiler(&self) -> &RuleCompiler {
        &self.compiler
    }
}
