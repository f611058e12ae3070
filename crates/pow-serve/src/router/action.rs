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

//! Action.

use crate::http::{Request, Response};

use super::params::Params;

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Action.
///
/// Actions are the end of every route's chain. The router passes the request
/// together with the [`Params`] captured for it, which are empty if the route
/// has no captures. Routes registered with [`Builder::all`][] receive the
/// unmatched rest of the path as the `path` parameter.
///
/// Like handlers, actions are infallible and must answer every request. They
/// are shared between all requests and must be thread-safe.
///
/// [`Builder::all`]: crate::router::Builder::all
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use pow_serve::handler::Handler;
/// use pow_serve::http::{Request, Response, ResponseExt, Status};
/// use pow_serve::router::{Action, Item, Params, Router};
///
/// // Action answering with the captured name
/// struct Greet;
///
/// impl Action for Greet {
///     fn handle(&self, _req: Request, params: Params) -> Response {
///         match params.get("name") {
///             Some(name) => Response::from_text(format!("Hello, {name}!")),
///             None => Response::from_status(Status::BadRequest),
///         }
///     }
/// }
///
/// let router = Router::builder()
///     .get("/u/:name/", Item::action(Greet))
///     .build()?;
///
/// let res = router.handle(Request::new().uri("/u/chilts/"));
/// assert_eq!(res.text_body(), Some("Hello, chilts!"));
/// # Ok(())
/// # }
/// ```
pub trait Action: Send + Sync + 'static {
    /// Handles the given request with the captured parameters.
    fn handle(&self, req: Request, params: Params) -> Response;
}

// ----------------------------------------------------------------------------
// Blanket implementations
// ----------------------------------------------------------------------------

impl<F, R> Action for F
where
    F: Fn(Request, Params) -> R + Send + Sync + 'static,
    R: Into<Response>,
{
    #[inline]
    fn handle(&self, req: Request, params: Params) -> Response {
        self(req, params).into()
    }
}
