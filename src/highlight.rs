//! Syntax highlighting for code blocks. Tokens are wrapped in CSS classes
//! rather than inline styles so the site's stylesheet picks the theme.

use once_cell::sync::Lazy;
use pulldown_cmark::escape::escape_html;
use std::fmt;
use syntect::{
    html::{ClassStyle, ClassedHTMLGenerator},
    parsing::{SyntaxReference, SyntaxSet},
    util::LinesWithEndings,
};

static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);

const PLAIN_TEXT: &str = "text";

/// Highlights `code` written in `language` (a fence info token such as
/// `rust` or `py`) and returns a complete `<pre><code>` block. Unknown
/// languages are rendered, and labelled, as plain text.
pub fn highlight_code(language: Option<&str>, code: &str) -> Result<String, Error> {
    let requested = language.filter(|l| !l.is_empty()).unwrap_or(PLAIN_TEXT);
    let (lang_token, syntax) = match find_syntax(&SYNTAX_SET, requested) {
        Some(syntax) => (requested, syntax),
        None => (PLAIN_TEXT, SYNTAX_SET.find_syntax_plain_text()),
    };

    let mut code_with_newline = code.to_string();
    if !code_with_newline.ends_with('\n') {
        code_with_newline.push('\n');
    }

    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, ClassStyle::Spaced);
    for line in LinesWithEndings::from(code_with_newline.as_str()) {
        generator
            .parse_html_for_line_which_includes_newline(line)
            .map_err(|err| Error {
                language: lang_token.to_owned(),
                message: err.to_string(),
            })?;
    }

    let lang = escape_attr(&lang_token.to_ascii_lowercase());
    Ok(format!(
        "<pre class=\"syntax-highlight syntax-lang-{lang}\" data-language=\"{lang}\"><code class=\"language-{lang} syntax-code\">{}</code></pre>\n",
        generator.finalize()
    ))
}

/// Renders `code` as an escaped, unhighlighted block. Used when
/// [`highlight_code`] fails.
pub fn plain_code(language: Option<&str>, code: &str) -> String {
    let mut out = String::from("<pre><code");
    if let Some(lang) = language.filter(|l| !l.is_empty()) {
        out.push_str(" class=\"language-");
        out.push_str(&escape_attr(lang));
        out.push('"');
    }
    out.push('>');
    let _ = escape_html(&mut out, code);
    out.push_str("</code></pre>\n");
    out
}

fn find_syntax<'a>(syntax_set: &'a SyntaxSet, token: &str) -> Option<&'a SyntaxReference> {
    let lowercase = token.to_ascii_lowercase();
    syntax_set
        .find_syntax_by_token(&lowercase)
        .or_else(|| syntax_set.find_syntax_by_name(&lowercase))
        .or_else(|| syntax_set.find_syntax_by_extension(&lowercase))
}

fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let _ = escape_html(&mut out, s);
    out
}

/// Returned when syntect fails partway through a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub language: String,
    pub message: String,
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "highlighting `{}` block: {}", self.language, self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_highlight_known_language() -> Result<(), Error> {
        let html = highlight_code(Some("rust"), "fn main() {}")?;
        assert!(html.starts_with("<pre class=\"syntax-highlight syntax-lang-rust\""));
        assert!(html.contains("class=\"language-rust syntax-code\""));
        assert!(html.contains("<span class="));
        assert!(html.contains("main"));
        Ok(())
    }

    #[test]
    fn test_highlight_unknown_language_escapes() -> Result<(), Error> {
        let html = highlight_code(Some("no-such-lang"), "a < b && c")?;
        assert!(html.contains("a &lt; b &amp;&amp; c"));
        assert!(html.starts_with("<pre class=\"syntax-highlight syntax-lang-text\" data-language=\"text\">"));
        assert!(html.contains("class=\"language-text syntax-code\""));
        assert!(!html.contains("no-such-lang"));
        Ok(())
    }

    #[test]
    fn test_plain_code() {
        assert_eq!(
            "<pre><code class=\"language-sh\">echo &lt;hi&gt;</code></pre>\n",
            plain_code(Some("sh"), "echo <hi>")
        );
        assert_eq!("<pre><code>x</code></pre>\n", plain_code(None, "x"));
    }
}
