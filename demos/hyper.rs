//! Embedding the router in a hyper server.
//!
//! Run with `cargo run --example hyper`, then e.g.:
//!
//! ```text
//! curl 'http://127.0.0.1:3000/home?id=7'
//! curl 'http://127.0.0.1:3000/item/5/page/bio'
//! curl -d 'name=ferris' 'http://127.0.0.1:3000/submit'
//! ```

use std::convert::Infallible;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http::Method;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1::Builder as ConnectionBuilder;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use signpost::{handler, Responder, RouteSpec, Router};
use tokio::net::TcpListener;

// First-write-wins response slot; the service turns it into a hyper
// response once dispatch returns.
#[derive(Default)]
struct Reply {
    body: Mutex<Option<Vec<u8>>>,
}

impl Reply {
    fn take(&self) -> Option<Vec<u8>> {
        self.body.lock().unwrap().take()
    }
}

impl Responder for Reply {
    fn end(&self, body: &[u8]) {
        let mut slot = self.body.lock().unwrap();
        if slot.is_none() {
            *slot = Some(body.to_vec());
        }
    }
}

fn build_router() -> Router {
    let mut router = Router::new();

    // single registration, method-scoped
    router
        .add(
            "/home",
            handler(|_req, res, params| {
                res.end(format!("hello, id={}", params.get("id").unwrap_or("-")).as_bytes());
            }),
            Some(Method::GET),
        )
        .unwrap();

    // path parameters, any method
    router
        .add(
            "/item/:id/page/:name",
            handler(|_req, res, params| {
                res.end(
                    format!(
                        "item {} page {}",
                        params.get("id").unwrap(),
                        params.get("name").unwrap()
                    )
                    .as_bytes(),
                );
            }),
            None,
        )
        .unwrap();

    // bulk GET routes
    router.get([
        ("/", RouteSpec::new(handler(|_req, res, _| res.end(b"index")))),
        ("/blog", RouteSpec::new(handler(|_req, res, _| res.end(b"...")))),
    ]);

    // bulk POST routes: decoded body pairs land in params
    router.post([(
        "/submit",
        RouteSpec::new(handler(|_req, res, params| {
            res.end(format!("submitted name={}", params.get("name").unwrap_or("-")).as_bytes());
        })),
    )]);

    // mixed batch: a per-route method and the not-found sentinel path
    router.routes(
        [
            (
                "/ping",
                RouteSpec::with_method(Method::GET, handler(|_req, res, _| res.end(b"pong"))),
            ),
            ("404", RouteSpec::new(handler(|_req, res, _| res.end(b"hello 404")))),
        ],
        None,
    );

    // fires on every request, after the route handlers
    router.all(handler(|req, _res, _params| {
        println!("{} {}", req.method, req.uri);
    }));

    router
}

async fn serve(
    router: Arc<Router>,
    request: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let reply = Reply::default();
    if let Err(err) = router.dispatch(request, &reply).await {
        eprintln!("dispatch failed: {err}");
        let response = Response::builder()
            .status(400)
            .body(Full::new(Bytes::new()))
            .unwrap();
        return Ok(response);
    }

    Ok(match reply.take() {
        Some(body) => Response::new(Full::new(Bytes::from(body))),
        // no handler wrote anything: the embedder owns the default response
        None => Response::builder()
            .status(404)
            .body(Full::new(Bytes::from_static(b"no route")))
            .unwrap(),
    })
}

#[tokio::main]
async fn main() {
    let router = Arc::new(build_router());

    let listener = TcpListener::bind(("127.0.0.1", 3000)).await.unwrap();
    println!("listening on http://127.0.0.1:3000");

    loop {
        let router = router.clone();
        let (tcp, _) = listener.accept().await.unwrap();
        tokio::task::spawn(async move {
            if let Err(err) = ConnectionBuilder::new()
                .serve_connection(
                    TokioIo::new(tcp),
                    hyper::service::service_fn(move |request: Request<Incoming>| {
                        serve(router.clone(), request)
                    }),
                )
                .await
            {
                println!("Error serving connection: {:?}", err);
            }
        });
    }
}
