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

//! Request handlers.

use anyhow::Context;
use chrono::Utc;
use minijinja::context;
use pow_serve::handler::{File, StaticFiles};
use pow_serve::http::{Request, Response, ResponseExt, Status};
use pow_serve::middleware::Logger;
use pow_serve::router::{Item, Params, Router};
use std::sync::Arc;

use super::config::Config;
use super::counter::HitCounter;
use super::shorten;
use super::stats;
use super::store::Store;
use super::template::Templates;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Application state shared by all handlers.
#[derive(Debug)]
pub struct App {
    /// Configuration.
    pub config: Config,
    /// Record store.
    pub store: Arc<Store>,
    /// Hit counter.
    pub counter: Arc<HitCounter>,
    /// Templates.
    pub templates: Templates,
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Creates the router of the application.
///
/// Static files are registered before the logger, so requests for assets
/// don't show up in the access log.
///
/// # Errors
///
/// This function returns an error, if the static directory can't be resolved
/// or a route is invalid.
pub fn router(app: &Arc<App>) -> anyhow::Result<Router> {
    let dir = &app.config.static_dir;
    let files = StaticFiles::new(dir.join("s"))
        .with_context(|| format!("static directory {}", dir.display()))?;

    let router = Router::builder()
        .all("/s", Item::action(files))
        .get("/favicon.ico", Item::action(File::new(dir.join("favicon.ico"))))
        .get("/robots.txt", Item::action(File::new(dir.join("robots.txt"))))
        .scope("/", Item::middleware(Logger))
        .get("/", action(app, index))
        .get("/new", action(app, new))
        .post("/new", action(app, create))
        .get("/:id", action(app, show))
        .build()?;

    tracing::debug!("routes:\n{router}");
    Ok(router)
}

/// Creates an action item passing the application state to the given function.
fn action<F>(app: &Arc<App>, f: F) -> Item
where
    F: Fn(&App, Request, Params) -> Response + Send + Sync + 'static,
{
    let app = Arc::clone(app);
    Item::action(move |req: Request, params: Params| f(&app, req, params))
}

/// Renders the index page.
fn index(app: &App, _req: Request, _params: Params) -> Response {
    let html = app.templates.render("index.html", context! {
        naked_domain => app.config.naked_domain,
        base_url => app.config.base_url,
    });
    html.map(Response::from_html).into()
}

/// Renders the form for shortening a URL.
fn new(app: &App, _req: Request, _params: Params) -> Response {
    let html = app.templates.render("new.html", context! {
        base_url => app.config.base_url,
    });
    html.map(Response::from_html).into()
}

/// Shortens the submitted URL and redirects to its preview.
fn create(app: &App, req: Request, _params: Params) -> Response {
    let form = req.form();
    let url = match shorten::validate(form.get("url").unwrap_or_default()) {
        Ok(url) => url,
        Err(err) => {
            tracing::info!(%err, "rejected URL");
            return Response::from_status(Status::BadRequest)
                .text(err.to_string());
        }
    };

    // Draw an unused short code and store the record
    match shorten::create(&app.store, &url, Utc::now()) {
        Ok(short) => {
            tracing::info!(id = %short.id, %url, "shortened URL");
            Response::redirect(format!("/{}+", short.id))
        }
        Err(err) => {
            tracing::error!(%err, "could not store URL");
            Response::from_status(Status::InternalServerError)
        }
    }
}

/// Redirects to the target of a short code, or renders its preview, if the
/// short code ends with a `+`.
fn show(app: &App, _req: Request, params: Params) -> Response {
    let id = params.get("id").unwrap_or_default();
    let (id, preview) = match id.strip_suffix('+') {
        Some(id) => (id, true),
        None => (id, false),
    };

    // Look up record, distinguishing missing codes from store failures
    let short = match shorten::lookup(&app.store, id) {
        Ok(Some(short)) => short,
        Ok(None) => return Response::from_status(Status::NotFound),
        Err(err) => {
            tracing::error!(%err, %id, "could not read URL");
            return Response::from_status(Status::InternalServerError);
        }
    };

    if !preview {
        app.counter.record(id, Utc::now());
        return Response::redirect_permanent(&short.url);
    }

    // Stats are optional, so failing to read them doesn't fail the preview
    let stats = stats::lookup(&app.store, id).unwrap_or_else(|err| {
        tracing::warn!(%err, %id, "could not read stats");
        None
    });
    let html = app.templates.render("preview.html", context! {
        base_url => app.config.base_url,
        short_url => short,
        stats => stats,
    });
    html.map(Response::from_html).into()
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pow_serve::handler::Handler;
    use pow_serve::http::{Header, Method, Request, Status};
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;

    use super::{App, router};
    use crate::config::Config;
    use crate::counter::{HitCounter, hour_key};
    use crate::shorten;
    use crate::store::Store;
    use crate::template::Templates;

    /// Creates the application with a fresh static directory.
    fn app(name: &str) -> Arc<App> {
        let dir = std::env::temp_dir()
            .join(format!("pow-app-{name}-{}", std::process::id()));
        fs::create_dir_all(dir.join("s/css")).expect("create dir");
        fs::write(dir.join("s/css/pow.css"), "body {}").expect("write");
        fs::write(dir.join("robots.txt"), "User-agent: *").expect("write");

        Arc::new(App {
            config: Config {
                port: 8080,
                base_url: "https://pow.gd".into(),
                naked_domain: "pow.gd".into(),
                db: PathBuf::from("pow.db"),
                static_dir: dir,
                templates: None,
                stats_interval: Duration::from_secs(3),
            },
            store: Arc::new(Store::memory()),
            counter: Arc::new(HitCounter::new()),
            templates: Templates::new(None),
        })
    }

    fn post(url: &'static str) -> Request<'static> {
        Request::new()
            .method(Method::Post)
            .uri("/new")
            .header(Header::ContentType, "application/x-www-form-urlencoded")
            .body(format!("url={url}"))
    }

    #[test]
    fn serves_pages_and_assets() {
        let router = router(&app("pages")).expect("router");
        let res = router.handle(Request::new().uri("/"));
        assert_eq!(res.status, Status::Ok);
        assert!(res.text_body().is_some_and(|html| html.contains("pow.gd")));

        let res = router.handle(Request::new().uri("/s/css/pow.css"));
        assert_eq!(res.text_body(), Some("body {}"));
        let res = router.handle(Request::new().uri("/robots.txt"));
        assert_eq!(res.text_body(), Some("User-agent: *"));
        let res = router.handle(Request::new().uri("/favicon.ico"));
        assert_eq!(res.status, Status::NotFound);
    }

    #[test]
    fn logs_pages_only() {
        let router = router(&app("logger")).expect("router");
        let res = router.handle(Request::new().uri("/s/css/pow.css"));
        assert!(!res.headers.contains(Header::XRequestId));
        let res = router.handle(Request::new().uri("/new"));
        assert!(res.headers.contains(Header::XRequestId));
    }

    #[test]
    fn shortens_and_redirects() {
        let app = app("shorten");
        let router = router(&app).expect("router");

        let res = router.handle(post("https%3A%2F%2Fexample.com%2Fa"));
        assert_eq!(res.status, Status::Found);
        let location = res.headers.get(Header::Location).expect("location");
        assert!(location.starts_with('/') && location.ends_with('+'));
        let id = &location[1..location.len() - 1];

        let res = router.handle(Request::new().uri(location));
        assert_eq!(res.status, Status::Ok);
        assert!(res.text_body().is_some_and(|html| html.contains(id)));

        let res = router.handle(Request::new().uri(&location[..5]));
        assert_eq!(res.status, Status::MovedPermanently);
        let target = res.headers.get(Header::Location);
        assert_eq!(target, Some("https://example.com/a"));
        assert_eq!(app.counter.count(&hour_key(Utc::now()), id), 1);
    }

    #[test]
    fn rejects_invalid_urls() {
        let router = router(&app("invalid")).expect("router");
        let res = router.handle(post("ftp%3A%2F%2Fexample.com"));
        assert_eq!(res.status, Status::BadRequest);
        let reason = shorten::Error::InvalidScheme.to_string();
        assert_eq!(res.text_body(), Some(reason.as_str()));
    }

    #[test]
    fn unknown_code_is_not_found() {
        let router = router(&app("unknown")).expect("router");
        let res = router.handle(Request::new().uri("/abcd"));
        assert_eq!(res.status, Status::NotFound);
        let res = router.handle(Request::new().uri("/abcd+"));
        assert_eq!(res.status, Status::NotFound);
    }

    #[test]
    fn missing_static_dir_is_error() {
        let mut app = Arc::try_unwrap(app("missing")).expect("unique");
        app.config.static_dir = PathBuf::from("/does/not/exist");
        assert!(router(&Arc::new(app)).is_err());
    }
}
