//! Markdown rendering for articles

use pulldown_cmark::{html, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

/// Markdown renderer
pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_SMART_PUNCTUATION,
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_output, parser);
        html_output
    }

    /// Plain text of the first level-1 heading, used as the page title
    pub fn title(&self, markdown: &str) -> Option<String> {
        let mut in_title = false;
        let mut title = String::new();

        for event in Parser::new_ext(markdown, self.options) {
            match event {
                Event::Start(Tag::Heading {
                    level: HeadingLevel::H1,
                    ..
                }) => in_title = true,
                Event::End(TagEnd::Heading(HeadingLevel::H1)) => break,
                Event::Text(text) | Event::Code(text) if in_title => title.push_str(&text),
                _ => {}
            }
        }

        let title = title.trim();
        if title.is_empty() {
            None
        } else {
            Some(title.to_string())
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}
