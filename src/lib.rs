//! A lightweight, embeddable HTTP request router.
//!
//! `signpost` resolves an incoming request's method and path against a set
//! of registered routes (exact paths, `:name` templates, method-scoped and
//! method-agnostic) and invokes *every* applicable handler with the merged
//! query, body and path parameters. It is aimed at library authors embedding
//! routing inside a larger server process: the router consumes an
//! already-parsed [`http::Request`] and an embedder-supplied [`Responder`],
//! and never touches wire-level HTTP itself.
//!
//! ```
//! use http::Method;
//! use signpost::{handler, Responder, Router};
//!
//! struct Print;
//!
//! impl Responder for Print {
//!     fn end(&self, body: &[u8]) {
//!         println!("{}", String::from_utf8_lossy(body));
//!     }
//! }
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut router = Router::new();
//! router.add("/hello/:name", handler(|_req, res, params| {
//!     res.end(format!("hello, {}", params.get("name").unwrap()).as_bytes());
//! }), Some(Method::GET))?;
//!
//! let request = http::Request::builder()
//!     .method(Method::GET)
//!     .uri("/hello/world?from=docs")
//!     .body(http_body_util::Empty::<bytes::Bytes>::new())?;
//! router.dispatch(request, &Print).await?;
//! # Ok(())
//! # }
//! ```
//!
//! Matching is deliberately not first-match-wins: a single request can fire
//! a method-scoped handler, a method-agnostic handler for the same path,
//! any number of matching templates, and the catch-all; see [`Router`] for
//! the exact order. A `not_found` handler fires only when nothing else
//! matched. Unmatched requests with no sentinels registered invoke nothing,
//! and the embedder owns the default response.
//!
//! Route handlers are dispatched through an [`EventRegistry`], an ordered
//! publish/subscribe table that is also usable standalone.

#![deny(clippy::all)]
#![forbid(unsafe_code)]

mod error;
mod events;
mod handler;
mod params;
mod path;
mod router;

pub use error::{DispatchError, InsertError};
pub use events::{EventRegistry, HandlerToken};
pub use handler::{handler, Handler, Responder};
pub use params::Params;
pub use router::{RouteSpec, Router};
