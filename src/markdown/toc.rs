//! Heading ids and `[TOC]` expansion.

use super::html_escape;
use deunicode::deunicode;
use pulldown_cmark::{CowStr, Event, Tag, TagEnd};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

const TOC_MARKER: &str = "[TOC]";

#[derive(Debug, Clone, PartialEq)]
struct TocItem {
    level: u32,
    title: String,
    id: String,
}

/// Gives every heading an id and replaces a `[TOC]` paragraph with a
/// nested list of links to the headings.
#[derive(Debug, Default)]
pub struct TocTransformer;

impl TocTransformer {
    pub fn new() -> Self {
        Self
    }

    pub fn transform<'a>(&self, events: Vec<Event<'a>>) -> Vec<Event<'a>> {
        let mut events = events;
        let headings = assign_heading_ids(&mut events);
        replace_toc_markers(events, &headings)
    }
}

fn assign_heading_ids(events: &mut [Event<'_>]) -> Vec<TocItem> {
    // Explicit ids are reserved before any id is generated
    let mut used: HashSet<String> = events
        .iter()
        .filter_map(|event| match event {
            Event::Start(Tag::Heading { id: Some(id), .. }) => Some(id.to_string()),
            _ => None,
        })
        .collect();
    let mut headings = Vec::new();
    let mut i = 0;

    while i < events.len() {
        let Event::Start(Tag::Heading { level, .. }) = &events[i] else {
            i += 1;
            continue;
        };
        let level = *level as u32;
        let start = i;

        let mut title = String::new();
        i += 1;
        while i < events.len() && !matches!(events[i], Event::End(TagEnd::Heading(_))) {
            if let Event::Text(text) | Event::Code(text) = &events[i] {
                title.push_str(text);
            }
            i += 1;
        }

        if let Event::Start(Tag::Heading { id, .. }) = &mut events[start] {
            if id.is_none() {
                *id = Some(CowStr::from(unique_id(slugify(&title), &used)));
            }
            let anchor = id.as_deref().unwrap_or_default().to_string();
            used.insert(anchor.clone());
            headings.push(TocItem {
                level,
                title,
                id: anchor,
            });
        }
        i += 1;
    }

    headings
}

fn replace_toc_markers<'a>(events: Vec<Event<'a>>, headings: &[TocItem]) -> Vec<Event<'a>> {
    let mut result = Vec::with_capacity(events.len());
    let mut i = 0;

    while i < events.len() {
        if matches!(events[i], Event::Start(Tag::Paragraph)) {
            if let Some(end) = toc_paragraph_end(&events, i) {
                result.push(Event::Html(CowStr::from(render_toc(headings))));
                i = end + 1;
                continue;
            }
        }
        result.push(events[i].clone());
        i += 1;
    }

    result
}

/// Index of the closing paragraph event when the paragraph starting at
/// `start` holds nothing but the `[TOC]` marker.
fn toc_paragraph_end(events: &[Event<'_>], start: usize) -> Option<usize> {
    let mut text = String::new();
    for (offset, event) in events[start + 1..].iter().enumerate() {
        match event {
            Event::Text(t) => text.push_str(t),
            Event::End(TagEnd::Paragraph) => {
                return (text.trim() == TOC_MARKER).then_some(start + 1 + offset);
            }
            _ => return None,
        }
    }
    None
}

fn render_toc(headings: &[TocItem]) -> String {
    let mut html = String::from("<div class=\"toc\">\n");
    let mut levels: Vec<u32> = Vec::new();

    for item in headings {
        match levels.last().copied() {
            None => {
                html.push_str("<ul>\n");
                levels.push(item.level);
            }
            Some(last) if item.level > last => {
                html.push_str("\n<ul>\n");
                levels.push(item.level);
            }
            Some(_) => {
                html.push_str("</li>\n");
                while levels.len() > 1 && levels.last().is_some_and(|&l| item.level < l) {
                    levels.pop();
                    html.push_str("</ul>\n</li>\n");
                }
            }
        }
        html.push_str(&format!(
            "<li><a href=\"#{}\">{}</a>",
            html_escape(&item.id),
            html_escape(&item.title)
        ));
    }

    for _ in 0..levels.len() {
        html.push_str("</li>\n</ul>\n");
    }
    html.push_str("</div>\n");
    html
}

fn unique_id(base: String, used: &HashSet<String>) -> String {
    if !base.is_empty() && !used.contains(&base) {
        return base;
    }
    (1..)
        .map(|n| format!("{}_{}", base, n))
        .find(|candidate| !used.contains(candidate))
        .unwrap_or(base)
}

static STRIP_REGEX: OnceLock<Regex> = OnceLock::new();
static SEPARATOR_REGEX: OnceLock<Regex> = OnceLock::new();

/// Convert heading text to an anchor id: transliterate to ASCII, drop
/// anything that is not a word character, whitespace or hyphen, lowercase,
/// then collapse whitespace and hyphen runs into a single `-`.
pub fn slugify(s: &str) -> String {
    let strip = STRIP_REGEX.get_or_init(|| Regex::new(r"[^\w\s-]").expect("valid regex"));
    let separator = SEPARATOR_REGEX.get_or_init(|| Regex::new(r"[-\s]+").expect("valid regex"));

    let ascii = deunicode(s);
    let cleaned = strip.replace_all(&ascii, "");
    let lowered = cleaned.trim().to_lowercase();
    separator.replace_all(&lowered, "-").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulldown_cmark::{html, Options, Parser};

    fn render(markdown: &str) -> String {
        let events: Vec<Event<'_>> =
            Parser::new_ext(markdown, Options::ENABLE_HEADING_ATTRIBUTES).collect();
        let events = TocTransformer::new().transform(events);
        let mut out = String::new();
        html::push_html(&mut out, events.into_iter());
        out
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  spaced  out  "), "spaced-out");
        assert_eq!(slugify("Rust & Safety"), "rust-safety");
        assert_eq!(slugify("snake_case stays"), "snake_case-stays");
        assert_eq!(slugify("a -- b"), "a-b");
    }

    #[test]
    fn test_unique_id() {
        let mut used = HashSet::new();
        assert_eq!(unique_id("intro".to_string(), &used), "intro");
        used.insert("intro".to_string());
        assert_eq!(unique_id("intro".to_string(), &used), "intro_1");
        used.insert("intro_1".to_string());
        assert_eq!(unique_id("intro".to_string(), &used), "intro_2");
        assert_eq!(unique_id(String::new(), &used), "_1");
    }

    #[test]
    fn test_heading_ids_assigned() {
        let html = render("# Intro\n\n## Intro\n\n### `code` title\n");
        assert!(html.contains("<h1 id=\"intro\">Intro</h1>"));
        assert!(html.contains("<h2 id=\"intro_1\">Intro</h2>"));
        assert!(html.contains("<h3 id=\"code-title\">"));
    }

    #[test]
    fn test_slugify_non_ascii() {
        assert_eq!(slugify("Café Menu"), "cafe-menu");
        assert_eq!(slugify("Über uns"), "uber-uns");
    }

    #[test]
    fn test_later_explicit_id_reserved() {
        let html = render("# Intro\n\n## Other {#intro}\n");
        assert!(html.contains("<h1 id=\"intro_1\">Intro</h1>"), "{}", html);
        assert!(html.contains("<h2 id=\"intro\">Other</h2>"), "{}", html);
    }

    #[test]
    fn test_explicit_id_kept() {
        let html = render("# Intro {#start}\n");
        assert!(html.contains("<h1 id=\"start\">Intro</h1>"));
    }

    #[test]
    fn test_toc_marker_replaced() {
        let html = render("[TOC]\n\n# One\n\n## Two\n\n# Three\n");
        assert!(!html.contains("[TOC]"));
        let expected = "<div class=\"toc\">\n<ul>\n\
            <li><a href=\"#one\">One</a>\n<ul>\n\
            <li><a href=\"#two\">Two</a></li>\n</ul>\n</li>\n\
            <li><a href=\"#three\">Three</a></li>\n</ul>\n</div>\n";
        assert!(html.contains(expected), "unexpected toc: {}", html);
    }

    #[test]
    fn test_toc_marker_inside_text_kept() {
        let html = render("See [TOC] below.\n\n# One\n");
        assert!(html.contains("See [TOC] below."));
        assert!(!html.contains("class=\"toc\""));
    }

    #[test]
    fn test_toc_without_headings() {
        let html = render("[TOC]\n");
        assert!(html.contains("<div class=\"toc\">\n</div>\n"));
    }
}
