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

//! Middleware for access logging.

use std::time::Instant;
use uuid::Uuid;

use crate::handler::Handler;
use crate::http::{Header, Request, Response};
use crate::middleware::Middleware;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Middleware for access logging.
///
/// Every request passing through is tagged with a request identifier, which
/// is taken from the `X-Request-Id` header if the client sent one, or else
/// generated as a random UUID. The identifier is attached to the request for
/// later handlers, echoed in the response, and recorded with the events this
/// middleware emits before and after the rest of the chain runs.
///
/// # Examples
///
/// ```
/// use pow_serve::handler::{Handler, NotFound};
/// use pow_serve::http::{Header, Request, Status};
/// use pow_serve::middleware::{Logger, Middleware};
///
/// let res = Logger.process(Request::new().uri("/missing"), &NotFound);
/// assert_eq!(res.status, Status::NotFound);
/// assert!(res.headers.contains(Header::XRequestId));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Logger;

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Middleware for Logger {
    fn process(&self, mut req: Request, next: &dyn Handler) -> Response {
        let id = match req.headers.get(Header::XRequestId) {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().to_string(),
        };
        req.headers.insert(Header::XRequestId, id.clone());

        // Log before handing off, so slow handlers are visible
        let method = req.method;
        let uri = req.uri.to_string();
        tracing::info!(%id, %method, %uri, "request-start");

        let start = Instant::now();
        let mut res = next.handle(req);
        tracing::info!(
            %id,
            %method,
            %uri,
            status = res.status.code(),
            size = res.body.len(),
            duration = ?start.elapsed(),
            "request-end"
        );

        res.headers.insert(Header::XRequestId, id);
        res
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::Logger;
    use crate::http::{Header, Request, Response, ResponseExt};
    use crate::middleware::Middleware;

    #[test]
    fn passes_request_id_on() {
        let echo = |req: Request| {
            let id = req.headers.get(Header::XRequestId).unwrap_or_default();
            Response::from_text(id.to_string())
        };

        let req = Request::new().header(Header::XRequestId, "abc");
        let res = Logger.process(req, &echo);
        assert_eq!(res.text_body(), Some("abc"));
        assert_eq!(res.headers.get(Header::XRequestId), Some("abc"));
    }

    #[test]
    fn generates_request_id() {
        let echo = |req: Request| {
            let id = req.headers.get(Header::XRequestId).unwrap_or_default();
            Response::from_text(id.to_string())
        };

        let res = Logger.process(Request::new(), &echo);
        let id = res.headers.get(Header::XRequestId).expect("request id");
        assert_eq!(id.len(), 36);
        assert_eq!(res.text_body(), Some(id));
    }
}
