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

//! Handler.
//!
//! Besides the [`Handler`] trait, this module provides ready-made actions for
//! use with [`Router`][], serving static files and redirecting requests.
//!
//! [`Router`]: crate::router::Router

use super::http::response::ResponseExt;
use super::http::{Request, Response, Status};

mod files;
mod redirect;

pub use files::{File, StaticFiles};
pub use redirect::Redirect;

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Handler.
///
/// Handlers represent the executable form of a request processing chain.
/// Unlike middlewares, which define composable layers of request processing,
/// handlers package those layers into a single unit of execution, always
/// returning a [`Response`] for every given [`Request`]. The [`Router`][] is
/// the handler passed to the server, and every middleware receives the rest
/// of its chain as a handler.
///
/// [`Router`]: crate::router::Router
pub trait Handler {
    /// Handles the given request.
    ///
    /// This method is invoked with a request and is required to return a
    /// response. It must be infallible and should not panic.
    ///
    /// # Examples
    ///
    /// ```
    /// use pow_serve::handler::Handler;
    /// use pow_serve::http::{Method, Request, Response, ResponseExt, Status};
    ///
    /// // Define handler answering `GET /ping`
    /// let handler = |req: Request| {
    ///     if req.method == Method::Get && req.uri.path == "/ping" {
    ///         Response::from_text("pong")
    ///     } else {
    ///         Response::from_status(Status::NotFound)
    ///     }
    /// };
    ///
    /// // Handle request with handler
    /// let res = handler.handle(Request::new().uri("/ping"));
    /// assert_eq!(res.text_body(), Some("pong"));
    /// ```
    fn handle(&self, req: Request) -> Response;
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Fallback handler.
///
/// This handler always returns "404 Not Found", which makes it a convenient
/// end of the chain when testing middlewares in isolation.
#[derive(Clone, Copy, Debug, Default)]
pub struct NotFound;

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Handler for NotFound {
    /// Handles the given request.
    ///
    /// # Examples
    ///
    /// ```
    /// use pow_serve::handler::{Handler, NotFound};
    /// use pow_serve::http::{Request, Status};
    ///
    /// let res = NotFound.handle(Request::new());
    /// assert_eq!(res.status, Status::NotFound);
    /// ```
    #[inline]
    fn handle(&self, _req: Request) -> Response {
        Response::from_status(Status::NotFound)
    }
}

// ----------------------------------------------------------------------------
// Blanket implementations
// ----------------------------------------------------------------------------

impl<F, R> Handler for F
where
    F: Fn(Request) -> R,
    R: Into<Response>,
{
    #[inline]
    fn handle(&self, req: Request) -> Response {
        self(req).into()
    }
}
