use pulldown_cmark::{html, Event, Options, Parser};

/// Convert markdown text to HTML.
///
/// Raw HTML in model output is shown as text rather than injected into the
/// page.
pub fn markdown_to_html(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(text, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_basic_markdown() {
        let html = markdown_to_html("# Title\n\n- one\n- **two**\n");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<li><strong>two</strong></li>"));
    }

    #[test]
    fn renders_code_blocks() {
        let html = markdown_to_html("```rust\nfn main() {}\n```\n");
        assert!(html.contains("<pre><code class=\"language-rust\">fn main() {}"));
    }

    #[test]
    fn extensions_are_enabled() {
        assert!(markdown_to_html("~~gone~~").contains("<del>gone</del>"));
        assert!(markdown_to_html("| a |\n|---|\n| 1 |\n").contains("<table>"));
    }

    #[test]
    fn raw_html_is_escaped() {
        let html = markdown_to_html("hi <script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert_eq!(markdown_to_html(""), "");
    }
}
