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

//! HTTP request.

use std::borrow::Cow;
use std::fmt;
use std::str::{self, FromStr};

use super::component::{Header, Method, Status};

mod error;
mod headers;
mod uri;

pub use error::{Error, Result};
pub use headers::Headers;
pub use uri::{Query, Uri};

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Maximum size of a request, including headers and body.
const MAX_REQUEST_SIZE: usize = 8 * 1024 * 1024;

/// Maximum length of the request target.
const MAX_URI_LENGTH: usize = 2 * 1024;

/// Maximum length of a single header value.
const MAX_HEADER_LENGTH: usize = 4 * 1024;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// HTTP request.
///
/// Requests parsed with [`Request::from_bytes`] borrow from the read buffer of
/// the connection. Requests built by hand, e.g., in tests, start out with the
/// defaults of `GET /` and are refined with the builder methods.
///
/// # Examples
///
/// ```
/// use pow_serve::http::{Method, Request};
///
/// let req = Request::new()
///     .method(Method::Post)
///     .uri("/new")
///     .body("url=https%3A%2F%2Fexample.com");
/// assert_eq!(req.form().get("url"), Some("https://example.com"));
/// ```
#[derive(Clone, Debug)]
pub struct Request<'a> {
    /// Request method.
    pub method: Method,
    /// Request URI.
    pub uri: Uri<'a>,
    /// Request headers.
    pub headers: Headers<'a>,
    /// Request body.
    pub body: Cow<'a, [u8]>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl<'a> Request<'a> {
    /// Creates a request.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a request from the given bytes.
    ///
    /// The request line and headers are parsed with [`httparse`]. Requests
    /// that carry a `Content-Length` header are only complete once the whole
    /// body has been received, and any bytes beyond it are ignored. Unknown
    /// headers are skipped. The path is percent-decoded but otherwise left
    /// untouched, so `.` and `..` segments reach the handler, which is free
    /// to normalize or reject them.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Incomplete`], if more data is needed,
    /// [`Error::Parser`], if the data is malformed, [`Error::Component`], if
    /// the method is unknown, and [`Error::Validation`], if one of the size
    /// limits is exceeded or the target is not an absolute path.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use pow_serve::http::{Method, Request};
    ///
    /// let req = Request::from_bytes(b"GET /abcd+ HTTP/1.1\r\n\r\n")?;
    /// assert_eq!(req.method, Method::Get);
    /// assert_eq!(req.uri.path, "/abcd+");
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() > MAX_REQUEST_SIZE {
            return Err(Error::Validation(Status::PayloadTooLarge));
        }

        // Parse request line and headers
        let mut headers = [httparse::EMPTY_HEADER; 64];
        let mut req = httparse::Request::new(&mut headers);
        let httparse::Status::Complete(offset) = req.parse(bytes)? else {
            return Err(Error::Incomplete);
        };

        // A complete parse always yields method and path
        let (Some(method), Some(path)) = (req.method, req.path) else {
            return Err(Error::Validation(Status::BadRequest));
        };
        let method = Method::from_str(method)?;
        if path.len() > MAX_URI_LENGTH {
            return Err(Error::Validation(Status::UriTooLong));
        }

        // Proxy requests with absolute targets are not supported
        let uri = Uri::from(path);
        if !uri.path.starts_with('/') {
            return Err(Error::Validation(Status::BadRequest));
        }

        // Collect known headers, skipping unknown ones
        let mut map = Headers::new();
        for header in req.headers.iter() {
            if header.value.len() > MAX_HEADER_LENGTH {
                let status = Status::RequestHeaderFieldsTooLarge;
                return Err(Error::Validation(status));
            }
            let Ok(name) = Header::from_str(header.name) else {
                continue;
            };
            if let Ok(value) = str::from_utf8(header.value) {
                map.insert(name, value);
            }
        }

        // Wait for the body, if a length was announced
        let body = &bytes[offset..];
        let body = match map.get(Header::ContentLength) {
            None => body,
            Some(value) => {
                let Ok(length) = value.trim().parse::<usize>() else {
                    return Err(Error::Validation(Status::BadRequest));
                };
                if body.len() < length {
                    return Err(Error::Incomplete);
                }
                &body[..length]
            }
        };

        // Return request
        Ok(Request {
            method,
            uri,
            headers: map,
            body: Cow::Borrowed(body),
        })
    }

    /// Sets the method of the request.
    #[inline]
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the URI of the request.
    ///
    /// # Examples
    ///
    /// ```
    /// use pow_serve::http::Request;
    ///
    /// let req = Request::new().uri("/u/chilts/?tab=links");
    /// assert_eq!(req.uri.path, "/u/chilts/");
    /// assert_eq!(req.uri.query.get("tab"), Some("links"));
    /// ```
    #[inline]
    #[must_use]
    pub fn uri<U>(mut self, uri: U) -> Self
    where
        U: Into<Uri<'a>>,
    {
        self.uri = uri.into();
        self
    }

    /// Adds a header to the request.
    #[allow(clippy::needless_pass_by_value)]
    #[inline]
    #[must_use]
    pub fn header<V>(mut self, header: Header, value: V) -> Self
    where
        V: ToString,
    {
        self.headers.insert(header, value.to_string());
        self
    }

    /// Sets the body of the request.
    #[inline]
    #[must_use]
    pub fn body<B>(mut self, body: B) -> Self
    where
        B: Into<Vec<u8>>,
    {
        self.body = Cow::Owned(body.into());
        self
    }
}

impl Request<'_> {
    /// Parses the body as an URL-encoded form.
    ///
    /// Bodies that are not valid UTF-8 yield an empty form. The content type
    /// is not checked, as browsers submit plain forms URL-encoded anyway.
    #[must_use]
    pub fn form(&self) -> Query<'_> {
        str::from_utf8(&self.body).map(Query::from).unwrap_or_default()
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Default for Request<'_> {
    #[inline]
    fn default() -> Self {
        Self {
            method: Method::Get,
            uri: Uri::default(),
            headers: Headers::default(),
            body: Cow::Borrowed(&[]),
        }
    }
}

impl fmt::Display for Request<'_> {
    /// Formats the request line, headers and body size.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} HTTP/1.1\r\n", self.method, self.uri)?;
        write!(f, "{}\r\n", self.headers)?;
        write!(f, "[Body: {} bytes]\r\n", self.body.len())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::{Error, Request};
    use crate::http::{Header, Method, Status};

    #[test]
    fn keeps_traversal_segments() {
        let req = Request::from_bytes(b"GET /a/../b HTTP/1.1\r\n\r\n");
        assert!(matches!(req, Ok(req) if req.uri.path == "/a/../b"));
    }

    #[test]
    fn waits_for_announced_body() {
        let bytes = b"POST /new HTTP/1.1\r\nContent-Length: 5\r\n\r\nurl=";
        assert!(matches!(Request::from_bytes(bytes), Err(Error::Incomplete)));

        let bytes = b"POST /new HTTP/1.1\r\nContent-Length: 5\r\n\r\nurl=x";
        let req = Request::from_bytes(bytes).expect("complete request");
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.headers.get(Header::ContentLength), Some("5"));
        assert_eq!(req.body.as_ref(), b"url=x");
    }

    #[test]
    fn rejects_invalid_content_length() {
        let bytes = b"POST / HTTP/1.1\r\nContent-Length: abc\r\n\r\n";
        let err = Request::from_bytes(bytes).expect_err("invalid length");
        assert_eq!(err.status(), Some(Status::BadRequest));
    }

    #[test]
    fn rejects_unknown_method() {
        let err = Request::from_bytes(b"BREW /pot HTTP/1.1\r\n\r\n")
            .expect_err("unknown method");
        assert_eq!(err.status(), Some(Status::NotImplemented));
    }

    #[test]
    fn incomplete_head() {
        let req = Request::from_bytes(b"GET / HTTP/1.1\r\nHost: x");
        assert!(matches!(req, Err(Error::Incomplete)));
    }
}
