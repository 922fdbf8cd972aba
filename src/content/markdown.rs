use pulldown_cmark::{html, Options, Parser};

/// Converts Markdown to an HTML fragment.
///
/// Tables, footnotes, strikethrough and task lists are enabled. Raw HTML in
/// the source passes through unchanged; sanitizing is the caller's job.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    // Markdown output is typically a bit larger than its source
    let mut html_buf = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut html_buf, parser);
    html_buf
}
