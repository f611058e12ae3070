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

//! Router builder.

use std::str::FromStr;
use std::sync::Arc;

use crate::http::Method;
use crate::middleware::Middleware;

use super::action::Action;
use super::chain::Chain;
use super::error::{Error, Result};
use super::item::Item;
use super::segment::{self, Pattern};
use super::{Route, Router, Verb};

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// Kind of registration.
#[derive(Clone, Copy, Debug)]
enum Kind {
    /// Route for a single method, matched exactly.
    Method(Method),
    /// Route for all methods, matched by prefix.
    All,
    /// Middleware scope, matched by prefix.
    Scope,
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Router builder.
///
/// Registrations are processed in the order they are made. Each route is
/// composed right away with the middlewares of all scopes registered before
/// it whose pattern is a prefix of the route's pattern, so a scope only
/// affects routes registered after it.
///
/// The first failing registration is remembered and turns all further
/// registrations into no-ops, so routes can be registered fluently and the
/// error checked once with [`Builder::build`].
///
/// # Examples
///
/// ```
/// use pow_serve::http::{Request, Response, ResponseExt};
/// use pow_serve::router::{Error, Item, Params, Router};
///
/// let home =
///     Item::action(|_: Request, _: Params| Response::from_text("Home"));
/// let res = Router::builder()
///     .get("about", home.clone())
///     .get("/", home)
///     .build();
/// assert_eq!(res.err(), Some(Error::PathMustStartWithSlash("about".into())));
/// ```
#[derive(Debug, Default)]
pub struct Builder {
    /// Routes in registration order.
    routes: Vec<Route>,
    /// Scopes in registration order.
    scopes: Vec<Scope>,
    /// First registration error.
    error: Option<Error>,
}

/// Middleware scope.
#[derive(Clone)]
struct Scope {
    /// Prefix pattern.
    pattern: Pattern,
    /// Middlewares, in order of registration.
    middlewares: Vec<Arc<dyn Middleware>>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Builder {
    /// Creates a router builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a `GET` route.
    #[must_use]
    pub fn get<P, I>(self, path: P, items: I) -> Self
    where
        P: AsRef<str>,
        I: IntoIterator<Item = Item>,
    {
        self.register(Kind::Method(Method::Get), path.as_ref(), items)
    }

    /// Registers a `POST` route.
    #[must_use]
    pub fn post<P, I>(self, path: P, items: I) -> Self
    where
        P: AsRef<str>,
        I: IntoIterator<Item = Item>,
    {
        self.register(Kind::Method(Method::Post), path.as_ref(), items)
    }

    /// Registers a `PUT` route.
    #[must_use]
    pub fn put<P, I>(self, path: P, items: I) -> Self
    where
        P: AsRef<str>,
        I: IntoIterator<Item = Item>,
    {
        self.register(Kind::Method(Method::Put), path.as_ref(), items)
    }

    /// Registers a `PATCH` route.
    #[must_use]
    pub fn patch<P, I>(self, path: P, items: I) -> Self
    where
        P: AsRef<str>,
        I: IntoIterator<Item = Item>,
    {
        self.register(Kind::Method(Method::Patch), path.as_ref(), items)
    }

    /// Registers a `DELETE` route.
    #[must_use]
    pub fn delete<P, I>(self, path: P, items: I) -> Self
    where
        P: AsRef<str>,
        I: IntoIterator<Item = Item>,
    {
        self.register(Kind::Method(Method::Delete), path.as_ref(), items)
    }

    /// Registers an `OPTIONS` route.
    #[must_use]
    pub fn options<P, I>(self, path: P, items: I) -> Self
    where
        P: AsRef<str>,
        I: IntoIterator<Item = Item>,
    {
        self.register(Kind::Method(Method::Options), path.as_ref(), items)
    }

    /// Registers a `HEAD` route.
    #[must_use]
    pub fn head<P, I>(self, path: P, items: I) -> Self
    where
        P: AsRef<str>,
        I: IntoIterator<Item = Item>,
    {
        self.register(Kind::Method(Method::Head), path.as_ref(), items)
    }

    /// Registers a middleware scope.
    ///
    /// The middlewares wrap every route registered afterwards whose pattern
    /// starts with the given prefix. No action is needed, but if one is
    /// given, it also answers every request under the prefix that reaches
    /// it, like a route registered with [`Builder::all`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use pow_serve::handler::Handler;
    /// use pow_serve::http::{Header, Request, Response, ResponseExt};
    /// use pow_serve::router::{Item, Params, Router};
    ///
    /// let router = Router::builder()
    ///     .scope("/", Item::middleware(|req: Request, next: &dyn Handler| {
    ///         next.handle(req).header(Header::Server, "pow")
    ///     }))
    ///     .get("/", Item::action(|_: Request, _: Params| {
    ///         Response::from_text("Home")
    ///     }))
    ///     .build()?;
    ///
    /// let res = router.handle(Request::new());
    /// assert_eq!(res.headers.get(Header::Server), Some("pow"));
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn scope<P, I>(self, path: P, items: I) -> Self
    where
        P: AsRef<str>,
        I: IntoIterator<Item = Item>,
    {
        self.register(Kind::Scope, path.as_ref(), items)
    }

    /// Registers a route for all methods, matched by prefix.
    ///
    /// The part of the path after the prefix is passed to the action as the
    /// `path` parameter.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use pow_serve::handler::Handler;
    /// use pow_serve::http::{Request, Response, ResponseExt};
    /// use pow_serve::router::{Item, Params, Router};
    ///
    /// let router = Router::builder()
    ///     .all("/s", Item::action(|_: Request, params: Params| {
    ///         Response::from_text(params.get("path").unwrap_or_default())
    ///     }))
    ///     .build()?;
    ///
    /// let res = router.handle(Request::new().uri("/s/css/app.css"));
    /// assert_eq!(res.text_body(), Some("/css/app.css"));
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn all<P, I>(self, path: P, items: I) -> Self
    where
        P: AsRef<str>,
        I: IntoIterator<Item = Item>,
    {
        self.register(Kind::All, path.as_ref(), items)
    }

    /// Registers a route for the given verb.
    ///
    /// Besides method names, the verb may be `USE` for [`Builder::scope`],
    /// or `ALL` for [`Builder::all`]. Verbs are case-sensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// use pow_serve::http::{Request, Response};
    /// use pow_serve::router::{Error, Item, Params, Router};
    ///
    /// let action = Item::action(|_: Request, _: Params| Response::new());
    /// let builder = Router::builder()
    ///     .add("GET", "/", action.clone())
    ///     .add("FETCH", "/", action);
    /// assert_eq!(
    ///     builder.error(),
    ///     Some(&Error::UnrecognizedArgument("FETCH".into()))
    /// );
    /// ```
    #[must_use]
    pub fn add<P, I>(mut self, verb: &str, path: P, items: I) -> Self
    where
        P: AsRef<str>,
        I: IntoIterator<Item = Item>,
    {
        let kind = match verb {
            "USE" => Kind::Scope,
            "ALL" => Kind::All,
            _ => match Method::from_str(verb) {
                Ok(method) => Kind::Method(method),
                Err(_) => {
                    if self.error.is_none() {
                        let verb = verb.to_string();
                        self.error = Some(Error::UnrecognizedArgument(verb));
                    }
                    return self;
                }
            },
        };
        self.register(kind, path.as_ref(), items)
    }

    /// Returns the first registration error, if any.
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Finishes registration and returns the router.
    ///
    /// # Errors
    ///
    /// This method returns the first registration error, if any.
    pub fn build(self) -> Result<Router> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(Router { routes: self.routes }),
        }
    }

    /// Registers the given items, unless an earlier registration failed.
    fn register<I>(mut self, kind: Kind, path: &str, items: I) -> Self
    where
        I: IntoIterator<Item = Item>,
    {
        if self.error.is_none() {
            if let Err(err) = self.try_register(kind, path, items) {
                tracing::debug!(error = %err, "registration failed");
                self.error = Some(err);
            }
        }
        self
    }

    /// Registers the given items.
    fn try_register<I>(&mut self, kind: Kind, path: &str, items: I) -> Result
    where
        I: IntoIterator<Item = Item>,
    {
        let pattern = Pattern::from_str(path)?;
        let (middlewares, action) = split_items(path, items)?;

        // Scopes only need an action to act as catch-all
        if let Kind::Scope = kind {
            if let Some(action) = action {
                let chain = self.compose(&pattern, &middlewares, action);
                self.routes.push(Route {
                    verb: Verb::All,
                    pattern: pattern.clone(),
                    chain,
                });
            }
            self.scopes.push(Scope { pattern, middlewares });
            return Ok(());
        }

        // Routes always need an action
        let Some(action) = action else {
            return Err(Error::MissingAction(path.to_string()));
        };
        let verb = match kind {
            Kind::Method(method) => Verb::Method(method),
            _ => Verb::All,
        };
        let chain = self.compose(&pattern, &middlewares, action);
        self.routes.push(Route { verb, pattern, chain });
        Ok(())
    }

    /// Composes the chain for a route, outermost scope first.
    fn compose(
        &self, pattern: &Pattern, own: &[Arc<dyn Middleware>],
        action: Arc<dyn Action>,
    ) -> Chain {
        let segments = segment::split(pattern.as_str());
        let scoped = self
            .scopes
            .iter()
            .filter(|scope| scope.pattern.match_prefix(&segments).is_some())
            .flat_map(|scope| scope.middlewares.iter());

        // Scope middlewares wrap the route's own middlewares
        let middlewares = scoped.chain(own).cloned().collect();
        Chain::new(middlewares, action)
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("pattern", &self.pattern.as_str())
            .field("middlewares", &self.middlewares.len())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Splits items into middlewares and the action, if any.
fn split_items<I>(
    path: &str, items: I,
) -> Result<(Vec<Arc<dyn Middleware>>, Option<Arc<dyn Action>>)>
where
    I: IntoIterator<Item = Item>,
{
    let mut middlewares = Vec::new();
    let mut action = None;
    for item in items {
        if action.is_some() {
            return Err(match item {
                Item::Middleware(_) => {
                    Error::MiddlewareAfterAction(path.to_string())
                }
                Item::Action(_) => Error::MultipleActions(path.to_string()),
            });
        }
        match item {
            Item::Middleware(middleware) => middlewares.push(middleware),
            Item::Action(next) => action = Some(next),
        }
    }
    Ok((middlewares, action))
}
