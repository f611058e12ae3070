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

//! HTTP response constructors.

use httpdate::fmt_http_date;
use std::fs;
use std::path::Path;

use crate::http::{Header, Status};

use super::{Response, Result};

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Convenience constructors for [`Response`].
///
/// Every constructor sets `Content-Type` and `Content-Length` where a body is
/// involved, so the resulting responses can be written to the wire as is.
pub trait ResponseExt: Sized {
    /// Creates a response from a file on disk.
    ///
    /// The content type is derived from the file extension, and the
    /// modification time is sent as `Last-Modified`, if available.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Io`][], if the file can't be read.
    ///
    /// [`Error::Io`]: super::Error::Io
    fn from_file<P>(path: P) -> Result<Response>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let content = fs::read(path)?;
        let res = Response::new()
            .header(Header::ContentType, content_type(path))
            .header(Header::ContentLength, content.len())
            .body(content);

        // Add modification time, if the platform provides one
        let modified = fs::metadata(path)?.modified().ok();
        Ok(match modified {
            Some(time) => res.header(Header::LastModified, fmt_http_date(time)),
            None => res,
        })
    }

    /// Creates a `200 OK` response with a plain text body.
    fn from_text<S>(content: S) -> Response
    where
        S: Into<String>,
    {
        Response::new().text(content)
    }

    /// Creates a `200 OK` response with an HTML body.
    ///
    /// # Examples
    ///
    /// ```
    /// use pow_serve::http::{Header, Response, ResponseExt};
    ///
    /// let res = Response::from_html("<h1>pow</h1>");
    /// assert_eq!(
    ///     res.headers.get(Header::ContentType),
    ///     Some("text/html; charset=utf-8")
    /// );
    /// ```
    fn from_html<S>(content: S) -> Response
    where
        S: Into<String>,
    {
        let content = content.into();
        Response::new()
            .header(Header::ContentType, "text/html; charset=utf-8")
            .header(Header::ContentLength, content.len())
            .body(content)
    }

    /// Creates a response with the given status and its reason as text.
    ///
    /// # Examples
    ///
    /// ```
    /// use pow_serve::http::{Response, ResponseExt, Status};
    ///
    /// let res = Response::from_status(Status::NotFound);
    /// assert_eq!(res.text_body(), Some("Not Found"));
    /// ```
    #[must_use]
    fn from_status(status: Status) -> Response {
        Response::new().status(status).text(status.reason())
    }

    /// Creates a `302 Found` redirect.
    #[must_use]
    fn redirect<L>(location: L) -> Response
    where
        L: ToString,
    {
        redirect_with(Status::Found, location)
    }

    /// Creates a `301 Moved Permanently` redirect.
    ///
    /// # Examples
    ///
    /// ```
    /// use pow_serve::http::{Header, Response, ResponseExt, Status};
    ///
    /// let res = Response::redirect_permanent("https://example.com/");
    /// assert_eq!(res.status, Status::MovedPermanently);
    /// assert_eq!(
    ///     res.headers.get(Header::Location),
    ///     Some("https://example.com/")
    /// );
    /// ```
    #[must_use]
    fn redirect_permanent<L>(location: L) -> Response
    where
        L: ToString,
    {
        redirect_with(Status::MovedPermanently, location)
    }

    /// Sets the given text as the body of the response.
    #[must_use]
    fn text<S>(self, content: S) -> Response
    where
        S: Into<String>;
}

// ----------------------------------------------------------------------------
// Blanket implementations
// ----------------------------------------------------------------------------

impl ResponseExt for Response {
    fn text<S>(self, content: S) -> Response
    where
        S: Into<String>,
    {
        let content = content.into();
        self.header(Header::ContentType, "text/plain; charset=utf-8")
            .header(Header::ContentLength, content.len())
            .body(content)
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Returns the content type for the given path, derived from its extension.
pub(crate) fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("txt") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}

/// Creates a redirect with an empty body.
fn redirect_with<L>(status: Status, location: L) -> Response
where
    L: ToString,
{
    Response::new()
        .status(status)
        .header(Header::Location, location)
        .header(Header::ContentLength, 0)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{content_type, ResponseExt};
    use crate::http::{Header, Response, Status};

    #[test]
    fn redirect_is_found() {
        let res = Response::redirect("/b");
        assert_eq!(res.status, Status::Found);
        assert_eq!(res.headers.get(Header::ContentLength), Some("0"));
    }

    #[test]
    fn guesses_content_types() {
        let cases = [
            ("robots.txt", "text/plain; charset=utf-8"),
            ("favicon.ico", "image/x-icon"),
            ("LICENSE", "application/octet-stream"),
        ];
        for (path, expected) in cases {
            assert_eq!(content_type(Path::new(path)), expected);
        }
    }

    #[test]
    fn missing_file_is_error() {
        assert!(Response::from_file("/does/not/exist.css").is_err());
    }
}
