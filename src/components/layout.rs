//! Base layout components for the web UI.
//!
//! This module provides the HTML skeleton shared by every page: head,
//! header navigation and footer.

use maud::{html, Markup, DOCTYPE};

/// Name shown in page titles and the header.
pub const SITE_NAME: &str = "Twitter Board";

/// Base page layout builder.
///
/// # Example
///
/// ```ignore
/// use maud::html;
/// use crate::components::layout::BaseLayout;
///
/// let content = html! { h1 { "Hello World" } };
/// let page = BaseLayout::new("My Page").render(content);
/// ```
#[derive(Debug, Clone)]
pub struct BaseLayout<'a> {
    title: &'a str,
}

impl<'a> BaseLayout<'a> {
    /// Create a new base layout with the given page title.
    #[must_use]
    pub fn new(title: &'a str) -> Self {
        Self { title }
    }

    /// Render the complete HTML page with the given content.
    ///
    /// The content will be placed inside the `<main class="container">` element.
    #[must_use]
    pub fn render(self, content: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (self.title) " - " (SITE_NAME) }
                    link rel="stylesheet" href="/static/css/style.css";
                }
                body {
                    (Self::render_header())
                    main class="container" {
                        (content)
                    }
                    (Self::render_footer())
                }
            }
        }
    }

    fn render_header() -> Markup {
        html! {
            header class="container" {
                nav {
                    a href="/" {
                        strong class="site-logo" { (SITE_NAME) }
                    }
                }
            }
        }
    }

    fn render_footer() -> Markup {
        html! {
            footer class="container" {
                small { "Newest posts first." }
            }
        }
    }
}
