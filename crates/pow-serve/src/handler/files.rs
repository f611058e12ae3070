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

//! Actions for serving files.

use httpdate::{fmt_http_date, parse_http_date};
use std::fs;
use std::io::Result;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::http::response::ResponseExt;
use crate::http::{Header, Method, Request, Response, Status};
use crate::router::{Action, PATH_PARAM, Params};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Action for serving static files from a directory.
///
/// This action is meant to be registered with [`Builder::all`][], as it reads
/// the file path from the `path` parameter bound by prefix routes, ignoring
/// leading slashes. Paths that end in a slash resolve to `index.html`. Only
/// `GET` and `HEAD` requests are served, and anything that can't be resolved
/// to a file inside the base directory is answered with "404 Not Found".
///
/// [`Builder::all`]: crate::router::Builder::all
///
/// # Examples
///
/// ```no_run
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use pow_serve::handler::StaticFiles;
/// use pow_serve::router::{Item, Router};
///
/// let router = Router::builder()
///     .all("/s", Item::action(StaticFiles::new("static")?))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct StaticFiles {
    /// Base path.
    base: PathBuf,
}

/// Action for serving a single file.
///
/// Useful for well-known files like `favicon.ico` or `robots.txt`, which live
/// at fixed locations outside of the static files prefix.
#[derive(Debug)]
pub struct File {
    /// File path.
    path: PathBuf,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl StaticFiles {
    /// Creates an action for serving static files.
    ///
    /// # Errors
    ///
    /// This method returns an I/O error, if the base path can't be resolved.
    pub fn new<P>(path: P) -> Result<Self>
    where
        P: Into<PathBuf>,
    {
        let path = path.into();
        path.canonicalize().map(|base| Self { base })
    }

    /// Resolves the given relative path to a file inside the base path.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        let traversal = relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_)));
        if traversal {
            return None;
        }

        // Paths ending in a slash point to the directory index
        let mut full = self.base.join(relative);
        if path.is_empty() || path.ends_with('/') {
            full.push("index.html");
        }

        // Refuse symbolic links pointing outside of the base path
        let full = full.canonicalize().ok()?;
        full.starts_with(&self.base).then_some(full)
    }
}

impl File {
    /// Creates an action for serving a single file.
    pub fn new<P>(path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self { path: path.into() }
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Action for StaticFiles {
    fn handle(&self, req: Request, params: Params) -> Response {
        let path = params.get(PATH_PARAM).unwrap_or_default();
        match self.resolve(path) {
            Some(full) => serve(&req, &full),
            None => Response::from_status(Status::NotFound),
        }
    }
}

impl Action for File {
    #[inline]
    fn handle(&self, req: Request, _params: Params) -> Response {
        serve(&req, &self.path)
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Serves the file at the given path.
fn serve(req: &Request, full: &Path) -> Response {
    if !matches!(req.method, Method::Get | Method::Head) {
        return Response::from_status(Status::NotFound);
    }

    // Attempt to load file, which also fails for directories
    let Ok(mut res) = Response::from_file(full) else {
        return Response::from_status(Status::NotFound);
    };

    // Ensure a date is always set, as required by HTTP/1.1
    res.headers.insert(Header::Date, fmt_http_date(SystemTime::now()));
    if not_modified(req, full) {
        return Response::new()
            .status(Status::NotModified)
            .header(Header::Date, fmt_http_date(SystemTime::now()))
            .header(Header::ContentLength, 0);
    }

    // Keep the headers of the file for head requests
    if req.method == Method::Head {
        res.body([])
    } else {
        res
    }
}

/// Returns whether the client's copy of the file is still fresh.
fn not_modified(req: &Request, full: &Path) -> bool {
    let header = req.headers.get(Header::IfModifiedSince);
    let Some(Ok(date)) = header.map(parse_http_date) else {
        return false;
    };

    // Subtract one second to account for rounding issues
    let modified = fs::metadata(full).and_then(|meta| meta.modified());
    modified.is_ok_and(|last| date >= last - Duration::from_secs(1))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use httpdate::fmt_http_date;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime};

    use super::{File, StaticFiles};
    use crate::http::{Header, Method, Request, Status};
    use crate::router::{Action, Params};

    /// Creates a directory with an index and a stylesheet.
    fn fixture(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("pow-serve-{name}-{}", std::process::id()));
        fs::create_dir_all(dir.join("css")).expect("create dir");
        fs::write(dir.join("index.html"), "<h1>Home</h1>").expect("write");
        fs::write(dir.join("css/app.css"), "body {}").expect("write");
        dir
    }

    fn params(path: &str) -> Params {
        Params::from_iter([("path", path)])
    }

    #[test]
    fn serves_files() {
        let files = StaticFiles::new(fixture("serve")).expect("base");
        let res = files.handle(Request::new(), params("/css/app.css"));
        assert_eq!(res.status, Status::Ok);
        assert_eq!(res.text_body(), Some("body {}"));
        let content_type = res.headers.get(Header::ContentType);
        assert_eq!(content_type, Some("text/css; charset=utf-8"));
        assert!(res.headers.contains(Header::Date));
    }

    #[test]
    fn serves_index() {
        let files = StaticFiles::new(fixture("index")).expect("base");
        let res = files.handle(Request::new(), params(""));
        assert_eq!(res.text_body(), Some("<h1>Home</h1>"));
    }

    #[test]
    fn refuses_traversal() {
        let files = StaticFiles::new(fixture("traversal")).expect("base");
        for path in ["../index.html", "css/../../etc/passwd", "/../css"] {
            let res = files.handle(Request::new(), params(path));
            assert_eq!(res.status, Status::NotFound);
        }
    }

    #[test]
    fn missing_file_is_not_found() {
        let files = StaticFiles::new(fixture("missing")).expect("base");
        let res = files.handle(Request::new(), params("nope.js"));
        assert_eq!(res.status, Status::NotFound);
        let res = files.handle(Request::new(), params("css"));
        assert_eq!(res.status, Status::NotFound);
    }

    #[test]
    fn head_keeps_length() {
        let files = StaticFiles::new(fixture("head")).expect("base");
        let req = Request::new().method(Method::Head);
        let res = files.handle(req, params("css/app.css"));
        assert!(res.body.is_empty());
        assert_eq!(res.headers.get(Header::ContentLength), Some("7"));
    }

    #[test]
    fn post_is_not_found() {
        let files = StaticFiles::new(fixture("post")).expect("base");
        let req = Request::new().method(Method::Post);
        let res = files.handle(req, params("css/app.css"));
        assert_eq!(res.status, Status::NotFound);
    }

    #[test]
    fn fresh_copy_is_not_modified() {
        let files = StaticFiles::new(fixture("fresh")).expect("base");
        let date = fmt_http_date(SystemTime::now() + Duration::from_secs(60));
        let req = Request::new().header(Header::IfModifiedSince, date);
        let res = files.handle(req, params("css/app.css"));
        assert_eq!(res.status, Status::NotModified);
        assert!(res.body.is_empty());

        let date = fmt_http_date(SystemTime::UNIX_EPOCH);
        let req = Request::new().header(Header::IfModifiedSince, date);
        let res = files.handle(req, params("css/app.css"));
        assert_eq!(res.status, Status::Ok);
    }

    #[test]
    fn serves_single_file() {
        let dir = fixture("single");
        let file = File::new(dir.join("css/app.css"));
        let res = file.handle(Request::new(), Params::new());
        assert_eq!(res.text_body(), Some("body {}"));

        let file = File::new(dir.join("favicon.ico"));
        let res = file.handle(Request::new(), Params::new());
        assert_eq!(res.status, Status::NotFound);
    }
}
