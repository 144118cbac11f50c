//! Markdown rendering service
//!
//! Converts article bodies from Markdown to HTML with syntax-highlighted
//! code blocks, and extracts a table of contents from the headings. Uses
//! pulldown-cmark for parsing and syntect for highlighting.
//!
//! # Example
//!
//! ```
//! use minipress::services::markdown::MarkdownRenderer;
//!
//! let renderer = MarkdownRenderer::new();
//! let rendered = renderer.render_with_toc("# Hello World\n\nThis is **bold** text.");
//! assert!(rendered.html.contains("<h1 id=\"hello-world\">"));
//! assert_eq!(rendered.toc[0].title, "Hello World");
//! ```

use pulldown_cmark::{html, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

/// One heading in a rendered document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Heading depth, 1 through 6
    pub level: u8,
    /// Heading text with inline markup stripped
    pub title: String,
    /// The `id` attribute injected into the rendered heading tag
    pub anchor: String,
}

/// Result of rendering a Markdown document.
#[derive(Debug, Clone)]
pub struct RenderedMarkdown {
    pub html: String,
    pub toc: Vec<TocEntry>,
}

/// A thread-safe Markdown renderer with syntax highlighting support.
///
/// Supported features:
/// - Headings (h1-h6), with anchors for the table of contents
/// - Lists, links, images, blockquotes
/// - Code blocks with syntax highlighting, inline code
/// - Bold, italic, strikethrough
/// - Tables and footnotes
#[derive(Clone)]
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: Arc<ThemeSet>,
    theme_name: String,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Creates a renderer with default syntax definitions and the
    /// "base16-ocean.dark" highlighting theme.
    pub fn new() -> Self {
        Self::with_theme("base16-ocean.dark")
    }

    /// Creates a renderer with a specific syntect theme, falling back to
    /// "base16-ocean.dark" if the theme is not found.
    pub fn with_theme(theme_name: &str) -> Self {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let theme_set = ThemeSet::load_defaults();

        let validated_theme = if theme_set.themes.contains_key(theme_name) {
            theme_name.to_string()
        } else {
            "base16-ocean.dark".to_string()
        };

        Self {
            syntax_set,
            theme_set: Arc::new(theme_set),
            theme_name: validated_theme,
        }
    }

    /// Renders Markdown to HTML, discarding the table of contents.
    pub fn render(&self, markdown: &str) -> String {
        self.render_with_toc(markdown).html
    }

    /// Renders Markdown to HTML and collects a table of contents.
    ///
    /// Every heading gets an `id` attribute derived from its text; the
    /// returned entries carry the same anchors, so a TOC rendered from them
    /// links into the document.
    pub fn render_with_toc(&self, markdown: &str) -> RenderedMarkdown {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_FOOTNOTES);

        let parser = Parser::new_ext(markdown, options);

        let mut toc = Vec::new();
        let events = self.process_events(parser, &mut toc);

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        RenderedMarkdown {
            html: html_output,
            toc,
        }
    }

    /// Processes parser events: code blocks are syntax highlighted and
    /// headings are rewritten to carry anchors, recorded into `toc`.
    fn process_events<'a>(&self, parser: Parser<'a>, toc: &mut Vec<TocEntry>) -> Vec<Event<'a>> {
        let mut events = Vec::new();
        let mut seen_slugs: HashMap<String, usize> = HashMap::new();

        let mut in_code_block = false;
        let mut code_lang: Option<String> = None;
        let mut code_content = String::new();

        // Events between a heading start and end are buffered so the start
        // tag can be emitted with its anchor once the text is known.
        let mut heading_level: Option<u8> = None;
        let mut heading_events: Vec<Event<'a>> = Vec::new();
        let mut heading_text = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_content.clear();
                    code_lang = match kind {
                        CodeBlockKind::Fenced(lang) => {
                            let lang_str = lang.to_string();
                            if lang_str.is_empty() {
                                None
                            } else {
                                Some(lang_str)
                            }
                        }
                        CodeBlockKind::Indented => None,
                    };
                }
                Event::End(TagEnd::CodeBlock) => {
                    in_code_block = false;

                    let highlighted = if let Some(ref lang) = code_lang {
                        self.highlight_code(&code_content, lang)
                    } else {
                        self.plain_code_block(&code_content)
                    };

                    events.push(Event::Html(highlighted.into()));
                    code_lang = None;
                }
                Event::Text(text) if in_code_block => {
                    code_content.push_str(&text);
                }
                Event::Start(Tag::Heading { level, .. }) => {
                    heading_level = Some(level as u8);
                    heading_events.clear();
                    heading_text.clear();
                }
                Event::End(TagEnd::Heading(level)) => {
                    let anchor = unique_slug(&heading_text, &mut seen_slugs);
                    toc.push(TocEntry {
                        level: heading_level.take().unwrap_or(level as u8),
                        title: heading_text.trim().to_string(),
                        anchor: anchor.clone(),
                    });

                    events.push(Event::Html(
                        format!("<{} id=\"{}\">", level, anchor).into(),
                    ));
                    events.append(&mut heading_events);
                    events.push(Event::Html(format!("</{}>", level).into()));
                }
                other => {
                    if heading_level.is_some() {
                        match &other {
                            Event::Text(text) => heading_text.push_str(text),
                            Event::Code(code) => heading_text.push_str(code),
                            _ => {}
                        }
                        heading_events.push(other);
                    } else {
                        events.push(other);
                    }
                }
            }
        }

        events
    }

    /// Applies syntax highlighting to a code block, falling back to a plain
    /// escaped block when the language is unknown.
    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang));

        match syntax {
            Some(syntax) => {
                let theme = &self.theme_set.themes[&self.theme_name];
                match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
                    Ok(html) => html,
                    Err(_) => self.plain_code_block(code),
                }
            }
            None => self.plain_code_block_with_lang(code, lang),
        }
    }

    fn plain_code_block(&self, code: &str) -> String {
        format!("<pre><code>{}</code></pre>", html_escape(code))
    }

    fn plain_code_block_with_lang(&self, code: &str, lang: &str) -> String {
        format!(
            "<pre><code class=\"language-{}\">{}</code></pre>",
            html_escape(lang),
            html_escape(code)
        )
    }
}

/// Turns heading text into an anchor slug: lowercase alphanumerics with
/// single dashes between words.
fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_dash = true;

    for ch in text.chars() {
        if ch.is_alphanumeric() {
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        "section".to_string()
    } else {
        slug
    }
}

/// Slugify with a numeric suffix for repeated headings.
fn unique_slug(text: &str, seen: &mut HashMap<String, usize>) -> String {
    let base = slugify(text);
    let count = seen.entry(base.clone()).or_insert(0);
    *count += 1;
    if *count == 1 {
        base
    } else {
        format!("{}-{}", base, *count - 1)
    }
}

/// Escapes HTML special characters in a string.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
