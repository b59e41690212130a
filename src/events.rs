use std::collections::HashMap;

/// A handle identifying a single registration in an [`EventRegistry`].
///
/// Returned by [`subscribe`](EventRegistry::subscribe) and
/// [`subscribe_once`](EventRegistry::subscribe_once), and consumed by
/// [`unsubscribe_handler`](EventRegistry::unsubscribe_handler). Two
/// structurally identical handlers registered separately receive distinct
/// tokens, so removing one never removes the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerToken(u64);

/// An ordered name → handler-list registry with synchronous fan-out.
///
/// Handlers registered under the same name are kept in registration order
/// and are all invoked by [`publish`](EventRegistry::publish). A separate
/// once-list holds handlers that fire at most one time, after the normal
/// handlers, and are discarded afterwards.
///
/// The registry is generic over the handler type; `publish` takes an invoker
/// closure so callers decide how a handler is called:
///
/// ```
/// use signpost::EventRegistry;
///
/// let mut events: EventRegistry<&str> = EventRegistry::new();
/// events.subscribe("greet", "hello");
/// events.subscribe("greet", "world");
///
/// let mut seen = Vec::new();
/// events.publish("greet", |label| seen.push(*label));
/// assert_eq!(seen, ["hello", "world"]);
/// ```
pub struct EventRegistry<H> {
    handlers: HashMap<String, Vec<(HandlerToken, H)>>,
    once: HashMap<String, Vec<(HandlerToken, H)>>,
    next_token: u64,
}

impl<H> EventRegistry<H> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            once: HashMap::new(),
            next_token: 0,
        }
    }

    fn token(&mut self) -> HandlerToken {
        let token = HandlerToken(self.next_token);
        self.next_token += 1;
        token
    }

    /// Appends `handler` to the list for `name`, returning its removal token.
    pub fn subscribe(&mut self, name: &str, handler: H) -> HandlerToken {
        let token = self.token();
        self.handlers
            .entry(name.to_owned())
            .or_default()
            .push((token, handler));
        token
    }

    /// Like [`subscribe`](Self::subscribe), but the handler fires at most
    /// once, after the normal handlers for `name`, and is then discarded.
    pub fn subscribe_once(&mut self, name: &str, handler: H) -> HandlerToken {
        let token = self.token();
        self.once
            .entry(name.to_owned())
            .or_default()
            .push((token, handler));
        token
    }

    /// Removes every handler, normal and once, registered under `name`.
    ///
    /// A name with no registrations is a no-op.
    pub fn unsubscribe(&mut self, name: &str) {
        self.handlers.remove(name);
        self.once.remove(name);
    }

    /// Removes the single registration identified by `token` from `name`,
    /// searching both the normal and the once list.
    ///
    /// Returns `true` if a registration was removed.
    pub fn unsubscribe_handler(&mut self, name: &str, token: HandlerToken) -> bool {
        let mut removed = false;
        for list in [&mut self.handlers, &mut self.once] {
            if let Some(entries) = list.get_mut(name) {
                let before = entries.len();
                entries.retain(|(t, _)| *t != token);
                removed |= entries.len() != before;
                if entries.is_empty() {
                    list.remove(name);
                }
            }
        }
        removed
    }

    /// Clears every registration.
    pub fn unsubscribe_all(&mut self) {
        self.handlers.clear();
        self.once.clear();
    }

    /// Returns `true` if any handler, normal or once, is registered under
    /// `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name) || self.once.contains_key(name)
    }

    /// Synchronously applies `invoke` to every handler under `name`:
    /// normal handlers in registration order, then once-handlers, whose
    /// entry for `name` is discarded afterwards.
    ///
    /// A name with no registrations is a no-op. Nothing is aggregated;
    /// panics from `invoke` propagate to the caller.
    pub fn publish<F>(&mut self, name: &str, mut invoke: F)
    where
        F: FnMut(&H),
    {
        if let Some(entries) = self.handlers.get(name) {
            for (_, handler) in entries {
                invoke(handler);
            }
        }
        for (_, handler) in self.once.remove(name).unwrap_or_default() {
            invoke(&handler);
        }
    }

    pub(crate) fn has_once(&self, name: &str) -> bool {
        self.once.contains_key(name)
    }

    pub(crate) fn take_once(&mut self, name: &str) -> Vec<H> {
        self.once
            .remove(name)
            .map(|entries| entries.into_iter().map(|(_, h)| h).collect())
            .unwrap_or_default()
    }
}

impl<H: Clone> EventRegistry<H> {
    // Snapshot of the normal handlers so the router can invoke them without
    // holding its lock.
    pub(crate) fn snapshot(&self, name: &str) -> Vec<H> {
        self.handlers
            .get(name)
            .map(|entries| entries.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default()
    }
}

impl<H> Default for EventRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}
