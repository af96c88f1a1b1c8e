//! Markdown rendering for research summaries.
//!
//! Summaries come back from the model as Markdown; the page receives
//! pre-rendered HTML so the client stays free of parsing logic.

use pulldown_cmark::{html, Options, Parser};

/// Render a Markdown summary to an HTML fragment.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}
