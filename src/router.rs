use std::sync::RwLock;
use std::time::Duration;

use http::request::Parts;
use http::{Method, Request};
use http_body_util::BodyExt;
use log::{debug, warn};

use crate::error::{DispatchError, InsertError};
use crate::events::EventRegistry;
use crate::handler::{Handler, Responder};
use crate::params::Params;
use crate::path::{self, Template};

// Reserved registration names for the two sentinels. Registration keys are
// either `/`-prefixed or contain the key separator, so these can never
// collide with a real route.
const NOT_FOUND_EVENT: &str = "router-not-found";
const ALL_EVENT: &str = "router-all";

const DEFAULT_BODY_TIMEOUT: Duration = Duration::from_secs(30);

/// One entry of a bulk [`routes`](Router::routes) registration: a handler,
/// optionally pinned to a method. A per-entry method takes precedence over
/// the method passed to `routes`.
pub struct RouteSpec {
    callback: Handler,
    method: Option<Method>,
}

impl RouteSpec {
    /// A handler whose method comes from the `routes` call, if any.
    pub fn new(callback: Handler) -> Self {
        Self {
            callback,
            method: None,
        }
    }

    /// A handler pinned to `method`, regardless of the `routes` call.
    pub fn with_method(method: Method, callback: Handler) -> Self {
        Self {
            callback,
            method: Some(method),
        }
    }
}

impl From<Handler> for RouteSpec {
    fn from(callback: Handler) -> Self {
        Self::new(callback)
    }
}

/// An HTTP request router.
///
/// Routes are registered against a `Router` instance during startup and
/// dispatched against for the lifetime of the process, typically behind an
/// [`Arc`](std::sync::Arc). A route is a (method, path) pair, the method
/// optional and the path either exact or a template with `:name` segments,
/// mapped to an ordered list of handlers.
///
/// ```
/// use http::Method;
/// use signpost::{handler, Router};
///
/// let mut router = Router::new();
/// router.add("/home", handler(|_req, res, _params| res.end(b"home")), Some(Method::GET))?;
/// router.add("/user/:id", handler(|_req, res, params| {
///     res.end(format!("user {}", params.get("id").unwrap()).as_bytes());
/// }), None)?;
/// # Ok::<(), signpost::InsertError>(())
/// ```
///
/// Dispatch is not first-match-wins: every registration applicable to a
/// request fires, in a defined order. Matching templates fire in registration
/// order, then the method-scoped key, then the method-agnostic key, then
/// the not-found sentinel (only if none of the former matched), then the
/// catch-all sentinel. All of them receive the same request head, responder
/// and merged parameters.
pub struct Router {
    events: RwLock<EventRegistry<Handler>>,
    templates: Vec<Template>,
    body_timeout: Option<Duration>,
}

impl Router {
    /// Creates an empty router with the default body-wait bound of 30
    /// seconds.
    pub fn new() -> Self {
        Self {
            events: RwLock::new(EventRegistry::new()),
            templates: Vec::new(),
            body_timeout: Some(DEFAULT_BODY_TIMEOUT),
        }
    }

    /// Overrides the bound on waiting for a request body to fully arrive.
    ///
    /// `None` removes the bound entirely: a request whose body never ends
    /// then holds its dispatch indefinitely.
    pub fn body_timeout(mut self, timeout: impl Into<Option<Duration>>) -> Self {
        self.body_timeout = timeout.into();
        self
    }

    /// Registers `handler` for `path`, scoped to `method` when given,
    /// otherwise matching any method.
    ///
    /// The path is normalized (leading slash ensured, one trailing slash
    /// stripped). Registering the same (method, path) again appends another
    /// handler; both fire on a match, in registration order.
    ///
    /// Fails if `path` is a template that declares the same `:name` twice;
    /// nothing is registered in that case.
    pub fn add(
        &mut self,
        path: &str,
        handler: Handler,
        method: Option<Method>,
    ) -> Result<(), InsertError> {
        let path = path::normalize(path);
        let name = path::route_key(method.as_ref(), &path);
        let template = if path::is_template(&path) {
            Some(Template::parse(name.clone(), method, &path)?)
        } else {
            None
        };
        self.events
            .get_mut()
            .unwrap()
            .subscribe(&name, handler);
        if let Some(template) = template {
            self.templates.push(template);
        }
        Ok(())
    }

    /// Bulk registration from `(path, RouteSpec)` entries.
    ///
    /// The paths `404`/`/404` and `*`/`/*` are routed to
    /// [`not_found`](Self::not_found) and [`all`](Self::all) instead of
    /// normal registration. An entry that fails to register is skipped with
    /// a warning; the rest of the batch still registers.
    ///
    /// ```
    /// use http::Method;
    /// use signpost::{handler, RouteSpec, Router};
    ///
    /// let mut router = Router::new();
    /// router.routes(
    ///     [
    ///         ("/", RouteSpec::new(handler(|_, res, _| res.end(b"index")))),
    ///         ("/health", RouteSpec::with_method(Method::GET, handler(|_, res, _| res.end(b"ok")))),
    ///         ("404", RouteSpec::new(handler(|_, res, _| res.end(b"not found")))),
    ///     ],
    ///     Some(Method::PUT),
    /// );
    /// ```
    pub fn routes<I, S>(&mut self, entries: I, method: Option<Method>)
    where
        I: IntoIterator<Item = (S, RouteSpec)>,
        S: AsRef<str>,
    {
        for (path, spec) in entries {
            let path = path::normalize(path.as_ref());
            let RouteSpec {
                callback,
                method: route_method,
            } = spec;
            if path == "/404" {
                self.not_found(callback);
                continue;
            }
            if path == "/*" {
                self.all(callback);
                continue;
            }
            let method = route_method.or_else(|| method.clone());
            if let Err(err) = self.add(&path, callback, method) {
                warn!("skipping route '{path}': {err}");
            }
        }
    }

    /// [`routes`](Self::routes) with the method fixed to `GET`.
    pub fn get<I, S>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (S, RouteSpec)>,
        S: AsRef<str>,
    {
        self.routes(entries, Some(Method::GET));
    }

    /// [`routes`](Self::routes) with the method fixed to `POST`.
    pub fn post<I, S>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (S, RouteSpec)>,
        S: AsRef<str>,
    {
        self.routes(entries, Some(Method::POST));
    }

    /// Registers a handler that fires when a dispatched request matches no
    /// route at all.
    pub fn not_found(&mut self, handler: Handler) {
        self.events
            .get_mut()
            .unwrap()
            .subscribe(NOT_FOUND_EVENT, handler);
    }

    /// Registers a handler that fires on every dispatched request, matched
    /// or not, after all route handlers.
    pub fn all(&mut self, handler: Handler) {
        self.events
            .get_mut()
            .unwrap()
            .subscribe(ALL_EVENT, handler);
    }

    /// Dispatches one request: the entry point an HTTP listener calls per
    /// accepted request.
    ///
    /// Query parameters are decoded into a fresh parameter map first. For
    /// bodied methods (`POST`, `PUT`, `PATCH`) the full body is awaited,
    /// bounded by [`body_timeout`](Self::body_timeout), then decoded as flat
    /// url-encoded pairs, overwriting query keys. Matching templates then
    /// contribute their captures (overwriting both) before any handler
    /// fires.
    ///
    /// A request matching nothing is not an error: zero route handlers run,
    /// the sentinels fire as described on [`Router`], and the embedder is
    /// responsible for terminating the response. Errors are reported only
    /// for a body that failed or timed out, in which case no handler has
    /// run. Handler panics are not caught.
    pub async fn dispatch<B>(
        &self,
        request: Request<B>,
        res: &dyn Responder,
    ) -> Result<(), DispatchError>
    where
        B: http_body::Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let (parts, body) = request.into_parts();
        let path = path::normalize(parts.uri.path());

        let mut params = Params::new();
        if let Some(query) = parts.uri.query() {
            for (key, value) in form_urlencoded::parse(query.as_bytes()) {
                params.insert(key, value);
            }
        }

        if expects_body(&parts.method) {
            let collect = async {
                body.collect()
                    .await
                    .map_err(|err| DispatchError::Body(err.into()))
            };
            let collected = match self.body_timeout {
                Some(limit) => tokio::time::timeout(limit, collect)
                    .await
                    .map_err(|_| DispatchError::BodyTimeout)??,
                None => collect.await?,
            };
            let bytes = collected.to_bytes();
            for (key, value) in form_urlencoded::parse(&bytes) {
                params.insert(key, value);
            }
        }

        self.resolve(&parts, res, params, &path);
        Ok(())
    }

    fn resolve(&self, parts: &Parts, res: &dyn Responder, mut params: Params, path: &str) {
        let mut matched_templates = Vec::new();
        for template in &self.templates {
            if let Some(captures) = template.matches(&parts.method, path) {
                // every matching template contributes its captures before
                // any handler fires; later templates overwrite earlier ones
                for (name, value) in captures {
                    params.insert(name, value);
                }
                matched_templates.push(template.name.as_str());
            }
        }

        let method_key = path::route_key(Some(&parts.method), path);
        let matched = {
            let events = self.events.read().unwrap();
            !matched_templates.is_empty()
                || events.contains(&method_key)
                || events.contains(path)
        };
        debug!(
            "dispatch {} {} ({} template match(es), matched={})",
            parts.method,
            path,
            matched_templates.len(),
            matched
        );

        for name in &matched_templates {
            self.trigger(name, parts, res, &params);
        }
        self.trigger(&method_key, parts, res, &params);
        self.trigger(path, parts, res, &params);
        if !matched {
            self.trigger(NOT_FOUND_EVENT, parts, res, &params);
        }
        self.trigger(ALL_EVENT, parts, res, &params);
    }

    // Fires every handler registered under `name`. Handlers run outside the
    // registry lock; concurrent dispatches only contend on the snapshot.
    fn trigger(&self, name: &str, parts: &Parts, res: &dyn Responder, params: &Params) {
        let events = self.events.read().unwrap();
        let normal = events.snapshot(name);
        let has_once = events.has_once(name);
        drop(events);

        let once = if has_once {
            self.events.write().unwrap().take_once(name)
        } else {
            Vec::new()
        };

        for handler in normal.iter().chain(once.iter()) {
            (handler.as_ref())(parts, res, params);
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

fn expects_body(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT || *method == Method::PATCH
}
