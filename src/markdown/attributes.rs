//! Attribute lists: `{: #id .class key="value" }`.
//!
//! A list at the end of a heading applies to the heading. A list on the
//! last line of a paragraph applies to the paragraph. A list written right
//! after a link, image, emphasis or strong span applies to that span.

use super::html_escape;
use pulldown_cmark::{CowStr, Event, HeadingLevel, LinkType, Tag, TagEnd};
use regex::Regex;
use std::sync::OnceLock;

static HEADING_LIST: OnceLock<Regex> = OnceLock::new();
static BLOCK_LIST: OnceLock<Regex> = OnceLock::new();
static INLINE_LIST: OnceLock<Regex> = OnceLock::new();
static TOKEN: OnceLock<Regex> = OnceLock::new();

fn heading_list_regex() -> &'static Regex {
    HEADING_LIST.get_or_init(|| {
        Regex::new(r"[ \t]+\{:?[ \t]*([^}\n \t][^}\n]*?)[ \t]*\}[ \t]*$").expect("valid regex")
    })
}

fn block_list_regex() -> &'static Regex {
    BLOCK_LIST.get_or_init(|| {
        Regex::new(r"^[ \t]*\{:?[ \t]*([^}\n \t][^}\n]*?)[ \t]*\}[ \t]*$").expect("valid regex")
    })
}

fn inline_list_regex() -> &'static Regex {
    INLINE_LIST.get_or_init(|| {
        Regex::new(r"^\{:?[ \t]*([^}\n \t][^}\n]*?)[ \t]*\}").expect("valid regex")
    })
}

fn token_regex() -> &'static Regex {
    TOKEN.get_or_init(|| Regex::new(r#"(?:"[^"]*"|'[^']*'|[^\s"'])+"#).expect("valid regex"))
}

/// Parsed attribute list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub pairs: Vec<(String, String)>,
}

impl Attributes {
    /// Parse the inside of an attribute list (without braces)
    pub fn parse(list: &str) -> Self {
        let mut attributes = Self::default();
        let list = list.trim_start().trim_start_matches(':');
        for token in token_regex().find_iter(list) {
            attributes.apply_token(token.as_str());
        }
        attributes
    }

    fn apply_token(&mut self, token: &str) {
        if let Some(id) = token.strip_prefix('#') {
            if !id.is_empty() {
                self.id = Some(id.to_string());
            }
        } else if let Some(class) = token.strip_prefix('.') {
            if !class.is_empty() {
                self.classes.push(class.to_string());
            }
        } else if let Some((key, value)) = token.split_once('=') {
            let value = unquote(value);
            match key {
                "id" => self.id = Some(value.to_string()),
                "class" => self
                    .classes
                    .extend(value.split_whitespace().map(str::to_string)),
                _ => self.pairs.push((key.to_string(), value.to_string())),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.classes.is_empty() && self.pairs.is_empty()
    }

    /// Render as HTML attributes, each preceded by a space
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        if let Some(id) = &self.id {
            html.push_str(&format!(" id=\"{}\"", html_escape(id)));
        }
        if !self.classes.is_empty() {
            html.push_str(&format!(" class=\"{}\"", html_escape(&self.classes.join(" "))));
        }
        for (key, value) in &self.pairs {
            html.push_str(&format!(" {}=\"{}\"", html_escape(key), html_escape(value)));
        }
        html
    }
}

fn unquote(value: &str) -> &str {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Applies attribute lists to headings and paragraphs
#[derive(Debug, Default)]
pub struct AttributeListTransformer;

impl AttributeListTransformer {
    pub fn new() -> Self {
        Self
    }

    pub fn transform<'a>(&self, events: Vec<Event<'a>>) -> Vec<Event<'a>> {
        let events = apply_inline_lists(events);
        let mut result = Vec::with_capacity(events.len());
        let mut events = events.into_iter();

        while let Some(event) = events.next() {
            match event {
                Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }) => {
                    let mut inner = Vec::new();
                    let mut end = None;
                    for next in events.by_ref() {
                        if matches!(next, Event::End(TagEnd::Heading(_))) {
                            end = Some(next);
                            break;
                        }
                        inner.push(next);
                    }
                    result.extend(transform_heading(level, id, classes, attrs, inner));
                    result.extend(end);
                }
                Event::Start(Tag::Paragraph) => {
                    let mut inner = Vec::new();
                    let mut closed = false;
                    for next in events.by_ref() {
                        if matches!(next, Event::End(TagEnd::Paragraph)) {
                            closed = true;
                            break;
                        }
                        inner.push(next);
                    }
                    result.extend(transform_paragraph(inner, closed));
                }
                other => result.push(other),
            }
        }

        result
    }
}

fn apply_inline_lists<'a>(events: Vec<Event<'a>>) -> Vec<Event<'a>> {
    let mut result: Vec<Event<'a>> = Vec::with_capacity(events.len());
    let mut open: Vec<usize> = Vec::new();
    let mut closed: Option<usize> = None;

    for event in events {
        let just_closed = closed.take();
        match event {
            Event::Start(Tag::Link { .. } | Tag::Image { .. } | Tag::Emphasis | Tag::Strong) => {
                open.push(result.len());
                result.push(event);
            }
            Event::End(TagEnd::Link | TagEnd::Image | TagEnd::Emphasis | TagEnd::Strong) => {
                closed = open.pop();
                result.push(event);
            }
            Event::Text(text) => match (just_closed, leading_inline_list(&text)) {
                (Some(start), Some((attributes, rest))) => {
                    wrap_inline(&mut result, start, &attributes);
                    if !rest.is_empty() {
                        result.push(Event::Text(CowStr::from(rest)));
                    }
                }
                _ => result.push(Event::Text(text)),
            },
            other => result.push(other),
        }
    }

    result
}

/// A non-empty attribute list at the very start of `text`, with the text
/// that follows it
fn leading_inline_list(text: &str) -> Option<(Attributes, String)> {
    let captures = inline_list_regex().captures(text)?;
    let end = captures.get(0)?.end();
    let attributes = Attributes::parse(captures.get(1)?.as_str());
    if attributes.is_empty() {
        return None;
    }
    Some((attributes, text[end..].to_string()))
}

/// Render the span opened at `events[start]` and closed by the last event
/// with `attributes` on its start tag
fn wrap_inline(events: &mut Vec<Event<'_>>, start: usize, attributes: &Attributes) {
    let attrs = attributes.to_html();
    let (open, close) = match &events[start] {
        Event::Start(Tag::Emphasis) => (format!("<em{attrs}>"), Some("</em>")),
        Event::Start(Tag::Strong) => (format!("<strong{attrs}>"), Some("</strong>")),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            ..
        }) => {
            let scheme = if *link_type == LinkType::Email { "mailto:" } else { "" };
            let open = format!(
                "<a href=\"{}{}\"{}{}>",
                scheme,
                html_escape(dest_url),
                title_attr(title),
                attrs
            );
            (open, Some("</a>"))
        }
        Event::Start(Tag::Image { dest_url, title, .. }) => {
            let alt: String = events[start + 1..]
                .iter()
                .filter_map(|e| match e {
                    Event::Text(t) | Event::Code(t) => Some(&**t),
                    _ => None,
                })
                .collect();
            let img = format!(
                "<img src=\"{}\" alt=\"{}\"{}{} />",
                html_escape(dest_url),
                html_escape(&alt),
                title_attr(title),
                attrs
            );
            (img, None)
        }
        _ => return,
    };

    match close {
        Some(close) => {
            let end = events.len() - 1;
            events[start] = Event::InlineHtml(CowStr::from(open));
            events[end] = Event::InlineHtml(CowStr::from(close));
        }
        None => {
            events.truncate(start);
            events.push(Event::InlineHtml(CowStr::from(open)));
        }
    }
}

fn title_attr(title: &str) -> String {
    if title.is_empty() {
        String::new()
    } else {
        format!(" title=\"{}\"", html_escape(title))
    }
}

fn transform_heading<'a>(
    level: HeadingLevel,
    mut id: Option<CowStr<'a>>,
    mut classes: Vec<CowStr<'a>>,
    attrs: Vec<(CowStr<'a>, Option<CowStr<'a>>)>,
    mut inner: Vec<Event<'a>>,
) -> Vec<Event<'a>> {
    let mut extra = Attributes::default();
    let mut kept_attrs = Vec::with_capacity(attrs.len());
    for (key, value) in attrs {
        // `{: ...}` leaves the colon behind as a bare attribute
        if value.is_none() {
            if let Some(token) = key.strip_prefix(':') {
                extra.apply_token(token);
                continue;
            }
        }
        kept_attrs.push((key, value));
    }

    let trailing = match inner.last() {
        Some(Event::Text(text)) => heading_list_regex().captures(text).map(|captures| {
            let start = captures.get(0).map_or(text.len(), |m| m.start());
            let list = captures.get(1).map_or("", |m| m.as_str());
            (text[..start].to_string(), Attributes::parse(list))
        }),
        _ => None,
    };
    if let Some((remaining, parsed)) = trailing {
        merge(&mut extra, parsed);
        inner.pop();
        if !remaining.is_empty() {
            inner.push(Event::Text(CowStr::from(remaining)));
        }
    }

    if let Some(new_id) = extra.id {
        id = Some(CowStr::from(new_id));
    }
    classes.extend(extra.classes.into_iter().map(CowStr::from));
    kept_attrs.extend(
        extra
            .pairs
            .into_iter()
            .map(|(k, v)| (CowStr::from(k), Some(CowStr::from(v)))),
    );

    let mut events = vec![Event::Start(Tag::Heading {
        level,
        id,
        classes,
        attrs: kept_attrs,
    })];
    events.extend(inner);
    events
}

fn transform_paragraph<'a>(inner: Vec<Event<'a>>, closed: bool) -> Vec<Event<'a>> {
    let plain = |inner: Vec<Event<'a>>| {
        let mut events = vec![Event::Start(Tag::Paragraph)];
        events.extend(inner);
        if closed {
            events.push(Event::End(TagEnd::Paragraph));
        }
        events
    };

    let Some(break_at) = inner
        .iter()
        .rposition(|e| matches!(e, Event::SoftBreak | Event::HardBreak))
    else {
        return plain(inner);
    };

    let mut last_line = String::new();
    for event in &inner[break_at + 1..] {
        match event {
            Event::Text(text) => last_line.push_str(text),
            _ => return plain(inner),
        }
    }

    let attributes = match block_list_regex().captures(&last_line) {
        Some(captures) => Attributes::parse(captures.get(1).map_or("", |m| m.as_str())),
        None => return plain(inner),
    };

    let mut events = vec![Event::Html(CowStr::from(format!(
        "<p{}>",
        attributes.to_html()
    )))];
    events.extend(inner.into_iter().take(break_at));
    events.push(Event::Html(CowStr::from("</p>\n")));
    events
}

fn merge(into: &mut Attributes, from: Attributes) {
    if from.id.is_some() {
        into.id = from.id;
    }
    into.classes.extend(from.classes);
    into.pairs.extend(from.pairs);
}
