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

//! Composed route handlers.

use std::fmt;
use std::sync::Arc;

use crate::handler::Handler;
use crate::http::{Request, Response};
use crate::middleware::Middleware;

use super::action::Action;
use super::params::Params;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Composed route handler.
///
/// A chain is built once, when a route is registered, from the middlewares
/// of all scopes that applied at that moment, followed by the route's own
/// middlewares and its action. Middlewares run in order, each wrapping the
/// rest of the chain.
#[derive(Clone)]
pub struct Chain {
    /// Middlewares, outermost first.
    middlewares: Vec<Arc<dyn Middleware>>,
    /// Action ending the chain.
    action: Arc<dyn Action>,
}

/// Chain handler.
///
/// Tracks the middlewares not invoked yet for the request in flight, and the
/// parameters handed to the action once no middleware is left.
struct ChainHandler<'a> {
    /// Remaining middlewares.
    middlewares: &'a [Arc<dyn Middleware>],
    /// Action ending the chain.
    action: &'a dyn Action,
    /// Parameters for the action.
    params: &'a Params,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Chain {
    /// Creates a chain.
    pub fn new(
        middlewares: Vec<Arc<dyn Middleware>>, action: Arc<dyn Action>,
    ) -> Self {
        Self { middlewares, action }
    }

    /// Passes the request through the chain.
    pub fn call(&self, req: Request, params: &Params) -> Response {
        let handler = ChainHandler {
            middlewares: &self.middlewares,
            action: self.action.as_ref(),
            params,
        };
        handler.handle(req)
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Handler for ChainHandler<'_> {
    fn handle(&self, req: Request) -> Response {
        match self.middlewares {
            [] => self.action.handle(req, self.params.clone()),
            [middleware, middlewares @ ..] => {
                let next = ChainHandler { middlewares, ..*self };
                middleware.process(req, &next)
            }
        }
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("middlewares", &self.middlewares.len())
            .finish_non_exhaustive()
    }
}
