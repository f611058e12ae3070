// Copyright (c) 2025 Zensical and contributors

// SPDX-License-Identifier: MIT
// Third-party contributions licensed under DCO

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to
// deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NON-INFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS
// IN THE SOFTWARE.

// ----------------------------------------------------------------------------

//! Router.
//!
//! Routes map a method and a path pattern to an [`Action`], optionally
//! wrapped in middlewares. Middlewares can also be scoped to path prefixes,
//! applying to all routes registered after them. Every route is composed
//! into a single handler chain when it is registered, so dispatching a
//! request is a linear scan over the routes followed by one call, no matter
//! how many middlewares are involved.

use std::fmt;

use super::handler::Handler;
use super::http::{Method, Request, Response, ResponseExt, Status, Uri};

mod action;
mod builder;
mod chain;
mod error;
mod item;
mod params;
mod path;
mod segment;

pub use action::Action;
pub use builder::Builder;
use chain::Chain;
pub use error::{Error, Result};
pub use item::Item;
pub use params::Params;
pub use path::normalize;
pub use segment::{Pattern, Segment};

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Parameter holding the unmatched rest of the path for prefix routes.
pub const PATH_PARAM: &str = "path";

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// Route verb.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Verb {
    /// Single method, matched with the exact pattern.
    Method(Method),
    /// Any method, matched with the pattern as prefix.
    All,
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Router.
///
/// Routers are created with [`Router::builder`] and are immutable once
/// built, so they can be shared freely between threads. Requests are handled
/// in three steps:
///
/// 1. Paths that are not normalized, e.g. `/a/../b` or `//x`, are answered
///    with a redirect to their normalized form, keeping the query string.
/// 2. Routes are tried in registration order, and the first match wins.
/// 3. If no route matches, the request is answered with `404 Not Found`.
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use pow_serve::handler::Handler;
/// use pow_serve::http::{Request, Response, ResponseExt, Status};
/// use pow_serve::router::{Item, Params, Router};
///
/// let router = Router::builder()
///     .get("/", Item::action(|_: Request, _: Params| {
///         Response::from_text("Home")
///     }))
///     .get("/u/:name/", Item::action(|_: Request, params: Params| {
///         let name = params.get("name").unwrap_or_default();
///         Response::from_text(format!("Hello, {name}!"))
///     }))
///     .build()?;
///
/// let res = router.handle(Request::new().uri("/u/chilts/"));
/// assert_eq!(res.status, Status::Ok);
/// assert_eq!(res.text_body(), Some("Hello, chilts!"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Router {
    /// Routes in registration order.
    routes: Vec<Route>,
}

/// Route.
#[derive(Debug)]
struct Route {
    /// Route verb.
    verb: Verb,
    /// Path pattern.
    pattern: Pattern,
    /// Composed handler chain.
    chain: Chain,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Router {
    /// Creates a router builder.
    #[inline]
    #[must_use]
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Returns the number of routes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns whether there are no routes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Route {
    /// Returns the parameters, if the route matches the given segments.
    ///
    /// The normalized path is needed to extract the unmatched rest for
    /// prefix routes.
    fn resolve(
        &self, method: Method, path: &str, segments: &[&str],
    ) -> Option<Params> {
        match self.verb {
            Verb::Method(verb) if verb != method => None,
            Verb::Method(_) => {
                let captures = self.pattern.match_exact(segments)?;
                Some(captures.into_iter().collect())
            }
            Verb::All => {
                let consumed = self.pattern.match_prefix(segments)?;

                // Skip the consumed segments along with their slashes
                let offset: usize =
                    segments[..consumed].iter().map(|s| s.len() + 1).sum();
                let mut rest = &path[offset..];
                if self.pattern.is_root() {
                    rest = rest.strip_prefix('/').unwrap_or(rest);
                }
                Some(Params::from_iter([(PATH_PARAM, rest)]))
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Handler for Router {
    /// Dispatches the request to the first matching route.
    fn handle(&self, req: Request) -> Response {
        let path = normalize(&req.uri.path);
        if path != req.uri.path {
            let uri = Uri::from_parts(path, req.uri.query.clone());
            tracing::debug!(from = %req.uri, to = %uri, "normalized path");
            return Response::redirect(uri);
        }

        // Scan routes in registration order
        let segments = segment::split(&path);
        for route in &self.routes {
            if let Some(params) = route.resolve(req.method, &path, &segments) {
                return route.chain.call(req, &params);
            }
        }

        // No route matched
        Response::from_status(Status::NotFound)
    }
}

impl fmt::Display for Router {
    /// Formats the routing table, one route per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for route in &self.routes {
            let verb = match route.verb {
                Verb::Method(method) => method.name(),
                Verb::All => "ALL",
            };
            writeln!(f, "{verb:<7} {}", route.pattern)?;
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{Error, Item, Params, Router};
    use crate::handler::Handler;
    use crate::http::{Header, Method, Request, Response, ResponseExt, Status};

    /// Creates an action answering with the given text.
    fn text(body: &'static str) -> Item {
        Item::action(move |_: Request, _: Params| Response::from_text(body))
    }

    /// Creates a middleware recording its name before passing on.
    fn record(log: &Arc<Mutex<Vec<String>>>, name: &'static str) -> Item {
        let log = Arc::clone(log);
        Item::middleware(move |req: Request, next: &dyn Handler| {
            log.lock().expect("lock").push(name.to_string());
            next.handle(req)
        })
    }

    fn get(router: &Router, uri: &'static str) -> Response {
        router.handle(Request::new().uri(uri))
    }

    #[test]
    fn greets_by_name() {
        let router = Router::builder()
            .get("/", text("Home"))
            .get(
                "/u/:name/",
                Item::action(|_: Request, params: Params| {
                    let name = params.get("name").unwrap_or_default();
                    Response::from_text(format!("Hello, {name}!"))
                }),
            )
            .build()
            .expect("valid routes");

        let res = get(&router, "/u/chilts/");
        assert_eq!(res.status, Status::Ok);
        assert_eq!(res.text_body(), Some("Hello, chilts!"));
        assert_eq!(get(&router, "/").text_body(), Some("Home"));
    }

    #[test]
    fn binds_captures_in_order() {
        let router = Router::builder()
            .get(
                "/:a/x/:b",
                Item::action(|_: Request, params: Params| {
                    let pairs: Vec<_> = params
                        .iter()
                        .map(|(k, v)| format!("{k}={v}"))
                        .collect();
                    Response::from_text(pairs.join(","))
                }),
            )
            .build()
            .expect("valid routes");

        let res = get(&router, "/one/x/two");
        assert_eq!(res.text_body(), Some("a=one,b=two"));
        assert_eq!(get(&router, "/one/y/two").status, Status::NotFound);
    }

    #[test]
    fn repeated_capture_keeps_last_value() {
        let router = Router::builder()
            .get(
                "/:a/:a",
                Item::action(|_: Request, params: Params| {
                    let a = params.get("a").unwrap_or_default();
                    Response::from_text(format!("{a} {}", params.len()))
                }),
            )
            .build()
            .expect("valid routes");

        assert_eq!(get(&router, "/one/two").text_body(), Some("two 1"));
    }

    #[test]
    fn matches_method() {
        let router = Router::builder()
            .get("/new", text("form"))
            .post("/new", text("created"))
            .build()
            .expect("valid routes");

        let req = Request::new().method(Method::Post).uri("/new");
        assert_eq!(router.handle(req).text_body(), Some("created"));
        let req = Request::new().method(Method::Delete).uri("/new");
        assert_eq!(router.handle(req).status, Status::NotFound);
    }

    #[test]
    fn first_registered_route_wins() {
        let router = Router::builder()
            .get("/:id", text("capture"))
            .get("/new", text("literal"))
            .build()
            .expect("valid routes");
        assert_eq!(get(&router, "/new").text_body(), Some("capture"));

        let router = Router::builder()
            .get("/new", text("literal"))
            .get("/:id", text("capture"))
            .build()
            .expect("valid routes");
        assert_eq!(get(&router, "/new").text_body(), Some("literal"));
    }

    #[test]
    fn trailing_slash_is_significant() {
        let router = Router::builder()
            .get("/x/", text("slash"))
            .get("/y", text("plain"))
            .build()
            .expect("valid routes");

        assert_eq!(get(&router, "/x/").text_body(), Some("slash"));
        assert_eq!(get(&router, "/x").status, Status::NotFound);
        assert_eq!(get(&router, "/y").text_body(), Some("plain"));
        assert_eq!(get(&router, "/y/").status, Status::NotFound);
    }

    #[test]
    fn unmatched_request_is_not_found() {
        let router = Router::builder()
            .get("/", text("Home"))
            .build()
            .expect("valid routes");
        let res = get(&router, "/missing");
        assert_eq!(res.status, Status::NotFound);
        assert_eq!(res.text_body(), Some("Not Found"));
    }

    #[test]
    fn scopes_run_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let router = Router::builder()
            .scope("/", record(&log, "a"))
            .scope("/", record(&log, "b"))
            .get(
                "/x",
                [
                    record(&log, "c"),
                    Item::action({
                        let log = Arc::clone(&log);
                        move |_: Request, _: Params| {
                            log.lock().expect("lock").push("handler".into());
                            Response::new()
                        }
                    }),
                ],
            )
            .build()
            .expect("valid routes");

        get(&router, "/x");
        let log = log.lock().expect("lock");
        assert_eq!(*log, ["a", "b", "c", "handler"]);
    }

    #[test]
    fn later_scope_does_not_apply() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let router = Router::builder()
            .get("/x", text("x"))
            .scope("/", record(&log, "late"))
            .get("/y", text("y"))
            .build()
            .expect("valid routes");

        assert_eq!(get(&router, "/x").text_body(), Some("x"));
        assert!(log.lock().expect("lock").is_empty());
        assert_eq!(get(&router, "/y").text_body(), Some("y"));
        assert_eq!(*log.lock().expect("lock"), ["late"]);
    }

    #[test]
    fn scope_applies_by_prefix() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let router = Router::builder()
            .scope("/admin", record(&log, "admin"))
            .get("/admin/users", text("users"))
            .get("/about", text("about"))
            .build()
            .expect("valid routes");

        get(&router, "/about");
        assert!(log.lock().expect("lock").is_empty());
        get(&router, "/admin/users");
        assert_eq!(*log.lock().expect("lock"), ["admin"]);
    }

    #[test]
    fn scope_trailing_slash_is_literal() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let router = Router::builder()
            .scope("/profile/", record(&log, "profile"))
            .get("/profile/settings", text("settings"))
            .get("/profile/", text("profile"))
            .build()
            .expect("valid routes");

        get(&router, "/profile/settings");
        assert!(log.lock().expect("lock").is_empty());
        get(&router, "/profile/");
        assert_eq!(*log.lock().expect("lock"), ["profile"]);
    }

    #[test]
    fn scope_middleware_can_answer() {
        let router = Router::builder()
            .scope(
                "/",
                Item::middleware(|req: Request, next: &dyn Handler| {
                    if req.headers.contains(Header::Authorization) {
                        next.handle(req)
                    } else {
                        Response::from_status(Status::Unauthorized)
                    }
                }),
            )
            .get("/", text("Home"))
            .build()
            .expect("valid routes");

        assert_eq!(get(&router, "/").status, Status::Unauthorized);
        let req = Request::new().header(Header::Authorization, "token");
        assert_eq!(router.handle(req).text_body(), Some("Home"));
    }

    #[test]
    fn redirects_unclean_paths() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let router = Router::builder()
            .scope("/", record(&log, "scope"))
            .get("/b", text("b"))
            .build()
            .expect("valid routes");

        let res = get(&router, "/a/../b");
        assert_eq!(res.status, Status::Found);
        assert_eq!(res.headers.get(Header::Location), Some("/b"));
        assert!(log.lock().expect("lock").is_empty());

        let res = get(&router, "//b/?q=1");
        assert_eq!(res.headers.get(Header::Location), Some("/b/?q=1"));
    }

    #[test]
    fn all_binds_rest_of_path() {
        let echo = Item::action(|req: Request, params: Params| {
            let rest = params.get("path").unwrap_or_default();
            Response::from_text(format!("{} {rest}", req.method))
        });
        let router = Router::builder()
            .all("/s", echo.clone())
            .all("/files/", echo)
            .build()
            .expect("valid routes");

        let req = Request::new().method(Method::Post).uri("/s/js/app.js");
        assert_eq!(router.handle(req).text_body(), Some("POST /js/app.js"));
        assert_eq!(get(&router, "/s").text_body(), Some("GET "));
        assert_eq!(get(&router, "/files/").text_body(), Some("GET "));
        assert_eq!(get(&router, "/files/a/b").status, Status::NotFound);
        assert_eq!(get(&router, "/files").status, Status::NotFound);
        assert_eq!(get(&router, "/style.css").status, Status::NotFound);
    }

    #[test]
    fn scope_with_action_is_catch_all() {
        let router = Router::builder()
            .get("/", text("Home"))
            .scope("/", text("fallback"))
            .build()
            .expect("valid routes");

        assert_eq!(get(&router, "/").text_body(), Some("Home"));
        assert_eq!(get(&router, "/other").text_body(), Some("fallback"));
    }

    #[test]
    fn first_error_sticks() {
        let builder = Router::builder()
            .get("/", text("Home"))
            .get("nope", text("a"))
            .get("/x", [text("a"), text("b")]);
        assert_eq!(
            builder.error(),
            Some(&Error::PathMustStartWithSlash("nope".into()))
        );

        let err = builder.build().expect_err("invalid routes");
        assert_eq!(err, Error::PathMustStartWithSlash("nope".into()));
    }

    #[test]
    fn routes_after_error_are_dropped() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let builder = Router::builder()
            .get("/a", text("a"))
            .get("b", text("b"))
            .get("/c", text("c"))
            .scope("/", record(&log, "ignored"));
        assert!(builder.error().is_some());
        assert_eq!(format!("{builder:?}").matches("Route {").count(), 1);
    }

    #[test]
    fn rejects_misordered_items() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let res = Router::builder()
            .get("/", [text("a"), record(&log, "m")])
            .build();
        assert_eq!(res.err(), Some(Error::MiddlewareAfterAction("/".into())));

        let res = Router::builder().get("/", [text("a"), text("b")]).build();
        assert_eq!(res.err(), Some(Error::MultipleActions("/".into())));

        let res = Router::builder().get("/", record(&log, "m")).build();
        assert_eq!(res.err(), Some(Error::MissingAction("/".into())));

        let res = Router::builder().scope("/", record(&log, "m")).build();
        assert!(res.is_ok());
    }

    #[test]
    fn add_accepts_verb_names() {
        let router = Router::builder()
            .add("PUT", "/x", text("put"))
            .add("ALL", "/y", text("all"))
            .build()
            .expect("valid routes");

        let req = Request::new().method(Method::Put).uri("/x");
        assert_eq!(router.handle(req).text_body(), Some("put"));
        assert_eq!(get(&router, "/y/z").text_body(), Some("all"));
        assert_eq!(router.len(), 2);
    }

    #[test]
    fn lists_routes() {
        let router = Router::builder()
            .get("/", text("Home"))
            .all("/s", text("static"))
            .build()
            .expect("valid routes");
        assert_eq!(router.to_string(), "GET     /\nALL     /s\n");
    }
}
