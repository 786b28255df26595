//! Converts a post's markdown source into the HTML shown in the article body.

use crate::highlight::{highlight_code, plain_code};
use once_cell::sync::Lazy;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag};
use regex::Regex;
use tracing::warn;

// A single ATX heading at the very top of the source, plus its line break.
static LEADING_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*#{1,6}\s+[^\n]*\n?").unwrap());

/// Removes the post's leading `#` heading. The title is already shown above
/// the article body, so repeating it in the body would show it twice.
pub fn strip_leading_heading(markdown: &str) -> &str {
    match LEADING_HEADING.find(markdown) {
        Some(heading) => &markdown[heading.end()..],
        None => markdown,
    }
}

/// Converts markdown to HTML. The dialect is GitHub-flavoured (tables,
/// strikethrough, task lists, footnotes); single newlines are not line
/// breaks. Code blocks come out syntax-highlighted.
pub fn to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut event_converter = EventConverter::default();
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(
        &mut out,
        Parser::new_ext(markdown, options)
            .filter_map(|ev| event_converter.convert(ev)),
    );
    out
}

/// Renders an article body: the leading heading is dropped and the rest
/// converted with [`to_html`].
pub fn article_html(markdown: &str) -> String {
    to_html(strip_leading_heading(markdown))
}

#[derive(Default)]
struct CodeBlock {
    language: Option<String>,
    source: String,
}

/// Collapses each code block's start, text, and end events into a single
/// [`Event::Html`] holding the highlighted block.
#[derive(Default)]
struct EventConverter {
    code: Option<CodeBlock>,
}

impl EventConverter {
    fn convert<'a>(&mut self, ev: Event<'a>) -> Option<Event<'a>> {
        match ev {
            Event::Start(Tag::CodeBlock(kind)) => {
                self.code = Some(CodeBlock {
                    language: match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(|lang| lang.to_owned()),
                        CodeBlockKind::Indented => None,
                    },
                    source: String::new(),
                });
                None
            }
            Event::Text(text) if self.code.is_some() => {
                if let Some(block) = self.code.as_mut() {
                    block.source.push_str(&text);
                }
                None
            }
            Event::End(Tag::CodeBlock(_)) => self.code.take().map(|block| {
                Event::Html(CowStr::Boxed(render_code_block(&block).into_boxed_str()))
            }),
            _ => Some(ev),
        }
    }
}

fn render_code_block(block: &CodeBlock) -> String {
    let language = block.language.as_deref();
    match highlight_code(language, &block.source) {
        Ok(html) => html,
        Err(err) => {
            warn!(error = %err, "falling back to plain code block");
            plain_code(language, &block.source)
        }
    }
}
