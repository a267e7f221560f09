//! Board page: the compose form followed by every post, newest first.

use chrono::NaiveDateTime;
use maud::{html, Markup, Render};

use crate::components::{Alert, BaseLayout};
use crate::db::Post;

/// Format used for post timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single post in the board listing.
struct PostItem<'a> {
    post: &'a Post,
    now: NaiveDateTime,
}

impl Render for PostItem<'_> {
    fn render(&self) -> Markup {
        let stamp = self.post.display_time(self.now);

        html! {
            article class="twitter" id=(format!("twitter-{}", self.post.id)) {
                p class="twitter-content" { (self.post.content) }
                footer {
                    time datetime=(stamp.format("%Y-%m-%dT%H:%M:%S").to_string()) {
                        (stamp.format(TIMESTAMP_FORMAT).to_string())
                    }
                }
            }
        }
    }
}

fn render_compose_form() -> Markup {
    html! {
        form method="post" action="/new" class="compose" {
            label for="content" { "What's happening?" }
            textarea id="content" name="content" rows="3" {}
            button type="submit" { "Post" }
        }
    }
}

/// Render the board page.
///
/// `posts` is rendered in the order given. `now` stands in for any post
/// without a stored timestamp.
#[must_use]
pub fn render_index_page(posts: &[Post], now: NaiveDateTime) -> Markup {
    let content = html! {
        h1 { "Twitters" }
        (render_compose_form())
        section class="twitters" {
            @if posts.is_empty() {
                (Alert::info("No twitters yet. Be the first to post one."))
            } @else {
                @for post in posts {
                    (PostItem { post, now })
                }
            }
        }
    };

    BaseLayout::new("Twitters").render(content)
}
