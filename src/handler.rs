use std::sync::Arc;

use http::request::Parts;

use crate::params::Params;

/// The response side of a dispatched request.
///
/// The router never builds or inspects responses itself; it hands every
/// invoked handler the responder the embedder passed into
/// [`dispatch`](crate::Router::dispatch). Implementations expose a single
/// terminal operation: write the body and close the exchange. What "close"
/// means is up to the embedder: buffering the body for a hyper service to
/// return, writing to a socket, recording it in a test.
///
/// Since several handlers can fire for one request, implementations should
/// decide how to treat writes after the first; a first-write-wins slot is
/// the simplest (see `demos/hyper.rs`).
///
/// `Sync` is a supertrait because dispatch holds the responder across its
/// body await, and the resulting future must stay `Send` for `tokio::spawn`.
pub trait Responder: Sync {
    /// Writes the response body and closes the exchange.
    fn end(&self, body: &[u8]);
}

/// A route handler.
///
/// Handlers are invoked synchronously with the request head, the embedder's
/// [`Responder`], and the merged [`Params`] for this request. Every handler
/// resolved for one request receives the same three references.
pub type Handler = Arc<dyn Fn(&Parts, &dyn Responder, &Params) + Send + Sync>;

/// Boxes a closure as a [`Handler`].
///
/// ```
/// use signpost::handler;
///
/// let hello = handler(|_req, res, params| {
///     res.end(format!("hello, id={}", params.get("id").unwrap_or("-")).as_bytes());
/// });
/// # let _ = hello;
/// ```
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&Parts, &dyn Responder, &Params) + Send + Sync + 'static,
{
    Arc::new(f)
}
