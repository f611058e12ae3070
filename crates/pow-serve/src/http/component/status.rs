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

//! HTTP status.

use std::fmt;

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Status {
    /// Returns the numeric status code.
    ///
    /// # Examples
    ///
    /// ```
    /// use pow_serve::http::Status;
    ///
    /// assert_eq!(Status::MovedPermanently.code(), 301);
    /// ```
    #[must_use]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Returns whether the status is in the 2xx class.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.code(), 200..=299)
    }

    /// Returns whether the status is in the 3xx class.
    ///
    /// # Examples
    ///
    /// ```
    /// use pow_serve::http::Status;
    ///
    /// assert!(Status::Found.is_redirect());
    /// assert!(!Status::NotFound.is_redirect());
    /// ```
    #[must_use]
    pub const fn is_redirect(&self) -> bool {
        matches!(self.code(), 300..=399)
    }

    /// Returns whether the status is in the 4xx class.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self.code(), 400..=499)
    }

    /// Returns whether the status is in the 5xx class.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.code() >= 500
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl AsRef<str> for Status {
    #[inline]
    fn as_ref(&self) -> &str {
        self.reason()
    }
}

impl fmt::Display for Status {
    /// Formats the status as it appears in a status line, e.g. `404 Not Found`.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.reason())
    }
}

// ----------------------------------------------------------------------------
// Macros
// ----------------------------------------------------------------------------

/// Defines HTTP status codes together with their reason phrases.
macro_rules! define_and_impl_status {
    (
        $(
            $(#[$comment:meta])*
            $name:ident = $code:literal, $reason:literal
        ),+
        $(,)?
    ) => {
        /// HTTP status.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum Status {
            $(
                $(#[$comment])*
                $name = $code,
            )+
        }

        impl Status {
            /// Returns the reason phrase.
            ///
            /// # Examples
            ///
            /// ```
            /// use pow_serve::http::Status;
            ///
            /// assert_eq!(Status::NotModified.reason(), "Not Modified");
            /// ```
            #[must_use]
            pub const fn reason(&self) -> &'static str {
                match self {
                    $(
                        Status::$name => $reason,
                    )+
                }
            }

            /// Returns the status for the given numeric code, if known.
            #[must_use]
            pub const fn from_code(code: u16) -> Option<Self> {
                match code {
                    $(
                        $code => Some(Status::$name),
                    )+
                    _ => None,
                }
            }
        }
    };
}

// ----------------------------------------------------------------------------

define_and_impl_status! {
    /// 200 OK
    Ok = 200, "OK",
    /// 201 Created
    Created = 201, "Created",
    /// 204 No Content
    NoContent = 204, "No Content",
    /// 301 Moved Permanently
    MovedPermanently = 301, "Moved Permanently",
    /// 302 Found
    Found = 302, "Found",
    /// 303 See Other
    SeeOther = 303, "See Other",
    /// 304 Not Modified
    NotModified = 304, "Not Modified",
    /// 307 Temporary Redirect
    TemporaryRedirect = 307, "Temporary Redirect",
    /// 308 Permanent Redirect
    PermanentRedirect = 308, "Permanent Redirect",
    /// 400 Bad Request
    BadRequest = 400, "Bad Request",
    /// 401 Unauthorized
    Unauthorized = 401, "Unauthorized",
    /// 403 Forbidden
    Forbidden = 403, "Forbidden",
    /// 404 Not Found
    NotFound = 404, "Not Found",
    /// 405 Method Not Allowed
    MethodNotAllowed = 405, "Method Not Allowed",
    /// 408 Request Timeout
    RequestTimeout = 408, "Request Timeout",
    /// 411 Length Required
    LengthRequired = 411, "Length Required",
    /// 413 Payload Too Large
    PayloadTooLarge = 413, "Payload Too Large",
    /// 414 URI Too Long
    UriTooLong = 414, "URI Too Long",
    /// 422 Unprocessable Entity
    UnprocessableEntity = 422, "Unprocessable Entity",
    /// 429 Too Many Requests
    TooManyRequests = 429, "Too Many Requests",
    /// 431 Request Header Fields Too Large
    RequestHeaderFieldsTooLarge = 431, "Request Header Fields Too Large",
    /// 500 Internal Server Error
    InternalServerError = 500, "Internal Server Error",
    /// 501 Not Implemented
    NotImplemented = 501, "Not Implemented",
    /// 503 Service Unavailable
    ServiceUnavailable = 503, "Service Unavailable",
    /// 505 HTTP Version Not Supported
    HttpVersionNotSupported = 505, "HTTP Version Not Supported",
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::Status;

    #[test]
    fn formats_status_line() {
        assert_eq!(Status::NotFound.to_string(), "404 Not Found");
        assert_eq!(Status::Ok.to_string(), "200 OK");
    }

    #[test]
    fn classifies_codes() {
        assert!(Status::Created.is_success());
        assert!(Status::MovedPermanently.is_redirect());
        assert!(Status::BadRequest.is_client_error());
        assert!(Status::InternalServerError.is_server_error());
        assert_eq!(Status::from_code(302), Some(Status::Found));
        assert_eq!(Status::from_code(299), None);
    }
}
