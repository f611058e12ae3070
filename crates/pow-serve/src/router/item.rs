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

//! Registration items.

use std::fmt;
use std::iter;
use std::sync::Arc;

use crate::middleware::Middleware;

use super::action::Action;

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// Registration item.
///
/// Routes are registered with a list of items, which must be zero or more
/// middlewares followed by at most one action. Middlewares run in the order
/// they are given, the action ends the chain. A single item can be passed
/// where a list is expected.
///
/// # Examples
///
/// ```
/// use pow_serve::handler::Handler;
/// use pow_serve::http::{Request, Response, ResponseExt};
/// use pow_serve::router::{Item, Params, Router};
///
/// let builder = Router::builder().get("/", [
///     Item::middleware(|req: Request, next: &dyn Handler| next.handle(req)),
///     Item::action(|_: Request, _: Params| Response::from_text("Home")),
/// ]);
/// assert!(builder.error().is_none());
/// ```
#[derive(Clone)]
pub enum Item {
    /// Middleware wrapping everything after it.
    Middleware(Arc<dyn Middleware>),
    /// Action answering the request.
    Action(Arc<dyn Action>),
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Item {
    /// Creates a middleware item.
    pub fn middleware<M>(middleware: M) -> Self
    where
        M: Middleware,
    {
        Item::Middleware(Arc::new(middleware))
    }

    /// Creates an action item.
    pub fn action<A>(action: A) -> Self
    where
        A: Action,
    {
        Item::Action(Arc::new(action))
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl IntoIterator for Item {
    type Item = Item;
    type IntoIter = iter::Once<Item>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        iter::once(self)
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Middleware(_) => f.write_str("Item::Middleware"),
            Item::Action(_) => f.write_str("Item::Action"),
        }
    }
}
