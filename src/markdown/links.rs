//! Rewrites links to Markdown sources so they point at the rendered pages.

use pulldown_cmark::{CowStr, Event, Tag};

const MD_SUFFIX: &str = ".md";

/// Strips `.md` from the `href` of every link element.
///
/// Only link tags are touched. Link text, image sources and raw HTML pass
/// through unchanged.
#[derive(Debug, Default)]
pub struct LinkRewriter;

impl LinkRewriter {
    pub fn new() -> Self {
        Self
    }

    pub fn transform<'a>(&self, events: Vec<Event<'a>>) -> Vec<Event<'a>> {
        events
            .into_iter()
            .map(|event| match event {
                Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    id,
                }) => {
                    let dest_url = match strip_md_extension(&dest_url) {
                        Some(stripped) => CowStr::from(stripped.to_string()),
                        None => dest_url,
                    };
                    Event::Start(Tag::Link {
                        link_type,
                        dest_url,
                        title,
                        id,
                    })
                }
                other => other,
            })
            .collect()
    }
}

/// `href` without its trailing `.md`, or `None` when it should be left alone
/// (no `.md` suffix, or an `http`/`https` URL).
pub fn strip_md_extension(href: &str) -> Option<&str> {
    if href.starts_with("http") {
        return None;
    }
    href.strip_suffix(MD_SUFFIX)
}
