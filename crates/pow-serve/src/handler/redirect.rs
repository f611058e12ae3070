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

//! Action for redirecting requests.

use crate::http::response::ResponseExt;
use crate::http::{Request, Response};
use crate::router::{Action, Params};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Action answering every request with a "302 Found" to a fixed location.
///
/// # Examples
///
/// ```
/// use pow_serve::handler::Redirect;
/// use pow_serve::http::{Header, Request, Status};
/// use pow_serve::router::{Action, Params};
///
/// let redirect = Redirect::new("/new");
/// let res = redirect.handle(Request::new(), Params::new());
/// assert_eq!(res.status, Status::Found);
/// assert_eq!(res.headers.get(Header::Location), Some("/new"));
/// ```
#[derive(Clone, Debug)]
pub struct Redirect {
    /// Target location.
    location: String,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Redirect {
    /// Creates an action redirecting to the given location.
    pub fn new<L>(location: L) -> Self
    where
        L: Into<String>,
    {
        Self { location: location.into() }
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Action for Redirect {
    #[inline]
    fn handle(&self, _req: Request, _params: Params) -> Response {
        Response::redirect(&self.location)
    }
}
