use ammonia::{Builder, UrlRelative};
use pulldown_cmark::{html, Options, Parser};

/// Converts Markdown content to sanitized HTML to prevent XSS attacks.
pub fn safe_markdown_to_html(markdown: &str) -> String {
    let options = Options::all();
    let parser = Parser::new_ext(markdown, options);

    let mut raw_html = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut raw_html, parser);

    sanitize_markdown_content(&raw_html)
}

/// Sanitizes stored Markdown to remove unsafe inline HTML.
pub fn sanitize_markdown_content(content: &str) -> String {
    Builder::default()
        .link_rel(Some("nofollow noopener noreferrer"))
        .url_relative(UrlRelative::Deny)
        .clean(content)
        .to_string()
}

/// Checks whether a given Markdown string is structurally valid.
pub fn is_valid_markdown(content: &str) -> bool {
    let parser = Parser::new_ext(content, Options::all());
    parser.into_iter().next().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_and_strips_script_tags() {
        let html = safe_markdown_to_html("# Hi\n\n<script>alert(1)</script>");
        assert!(html.contains("<h1>"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn relative_links_are_denied() {
        let html = safe_markdown_to_html("[x](/rel)");
        assert!(!html.contains("href=\"/rel\""));
    }
}
