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

//! MiniJinja templates.

use minijinja::{Environment, Error, path_loader};
use serde::Serialize;
use std::path::Path;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// MiniJinja templates.
///
/// The pages of the application are embedded into the binary, and can be
/// overridden one by one from a directory, which is consulted first.
/// Templates are auto-escaped based on their file extension.
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use minijinja::context;
/// use pow::template::Templates;
///
/// let templates = Templates::new(None);
/// let html = templates.render("new.html", context! {
///     base_url => "https://pow.gd",
/// })?;
/// assert!(html.contains("https:&#x2f;&#x2f;pow.gd/new"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Templates {
    /// Template environment.
    env: Environment<'static>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Templates {
    /// Creates the templates, with overrides from the given directory.
    #[must_use]
    pub fn new(dir: Option<&Path>) -> Self {
        let mut env = Environment::new();

        // Create template loader with support for overrides
        let overrides = dir.map(path_loader);
        env.set_loader(move |name| {
            if let Some(load) = &overrides {
                if let Some(source) = load(name)? {
                    return Ok(Some(source));
                }
            }
            Ok(embedded(name).map(String::from))
        });
        Self { env }
    }

    /// Renders the template with the given context.
    pub fn render<C>(&self, name: &str, context: C) -> Result<String, Error>
    where
        C: Serialize,
    {
        let template = self.env.get_template(name)?;
        template.render(context)
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Returns the embedded template with the given name.
fn embedded(name: &str) -> Option<&'static str> {
    match name {
        "index.html" => Some(include_str!("../templates/index.html")),
        "new.html" => Some(include_str!("../templates/new.html")),
        "preview.html" => Some(include_str!("../templates/preview.html")),
        _ => None,
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use minijinja::context;
    use std::fs;

    use super::Templates;

    #[test]
    fn renders_embedded() {
        let templates = Templates::new(None);
        let ctx = context! {
            naked_domain => "pow.gd",
            base_url => "https://pow.gd",
        };
        let html = templates.render("index.html", ctx).expect("render");
        assert!(html.contains("pow.gd"));
    }

    #[test]
    fn escapes_html() {
        let templates = Templates::new(None);
        let html = templates
            .render(
                "preview.html",
                context! {
                    base_url => "https://pow.gd",
                    short_url => context! {
                        id => "abcd",
                        url => "https://example.com/?a=<b>",
                    },
                },
            )
            .expect("render");
        assert!(html.contains("abcd"));
        assert!(html.contains("&lt;b&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn prefers_overrides() {
        let dir = std::env::temp_dir()
            .join(format!("pow-templates-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("create dir");
        let source = "custom {{ base_url }}";
        fs::write(dir.join("new.html"), source).expect("write");

        let templates = Templates::new(Some(&dir));
        let ctx = context! { base_url => "x" };
        let html = templates.render("new.html", &ctx).expect("render");
        assert_eq!(html, "custom x");
        assert!(templates.render("index.html", &ctx).is_ok());
        assert!(templates.render("missing.html", &ctx).is_err());
    }
}
