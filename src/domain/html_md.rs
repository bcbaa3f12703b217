//! Best-effort HTML to Markdown conversion.
//!
//! Input is first normalized through ammonia with a whitelist of the tags
//! the converter models, which yields balanced, quoted, entity-escaped
//! markup. The cleaned result is then tokenized and walked as a node stack,
//! emitting Markdown per node type. Anything outside the modeled set
//! (tables, nested inline styles) is stripped; the conversion is lossy and
//! one-directional.

use std::collections::HashSet;

use ammonia::{Builder, UrlRelative};

const HANDLED_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "br", "hr", "strong", "b", "em", "i", "a", "img",
    "ul", "ol", "li", "blockquote", "pre", "code",
];

/// Convert an HTML fragment to Markdown.
pub fn html_to_markdown(html: &str) -> String {
    let cleaned = clean_html(html);
    let tokens = tokenize(&cleaned);
    render(&tokens)
}

fn clean_html(html: &str) -> String {
    Builder::default()
        .tags(HashSet::from_iter(HANDLED_TAGS.iter().copied()))
        .link_rel(None)
        .url_relative(UrlRelative::PassThrough)
        .clean(html)
        .to_string()
}

#[derive(Debug, PartialEq)]
enum Token {
    Open { name: String, attrs: Vec<(String, String)> },
    Close { name: String },
    Text(String),
}

/// Tokenize sanitized HTML. Attribute values are always double-quoted in
/// ammonia output, so `>` inside a quoted value is handled.
fn tokenize(html: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let bytes = html.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        match find_byte(bytes, pos, b'<') {
            Some(lt) => {
                if lt > pos {
                    tokens.push(Token::Text(html[pos..lt].to_string()));
                }
                match parse_tag(html, lt) {
                    Some((token, next)) => {
                        if let Some(token) = token {
                            tokens.push(token);
                        }
                        pos = next;
                    }
                    None => {
                        // Stray '<' without a closing '>'; treat the rest as text.
                        tokens.push(Token::Text(html[lt..].to_string()));
                        break;
                    }
                }
            }
            None => {
                tokens.push(Token::Text(html[pos..].to_string()));
                break;
            }
        }
    }

    tokens
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes[from..].iter().position(|&b| b == needle).map(|i| from + i)
}

/// Parse one tag starting at the `<` at `start`. Returns the token (None for
/// comments and other ignorable constructs) and the index just past the `>`.
fn parse_tag(html: &str, start: usize) -> Option<(Option<Token>, usize)> {
    let bytes = html.as_bytes();
    let mut pos = start + 1;

    let closing = bytes.get(pos) == Some(&b'/');
    if closing {
        pos += 1;
    }

    let name_start = pos;
    while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric()) {
        pos += 1;
    }
    let name = html[name_start..pos].to_ascii_lowercase();

    // Scan to the closing '>' while skipping quoted attribute values.
    let mut attrs = Vec::new();
    loop {
        if pos >= bytes.len() {
            return None;
        }
        match bytes[pos] {
            b'>' => {
                pos += 1;
                break;
            }
            b'"' => {
                // Shouldn't happen outside parse_attr, skip defensively.
                pos += 1;
            }
            b'/' => {
                pos += 1;
            }
            c if c.is_ascii_whitespace() => {
                pos += 1;
            }
            _ if !closing => {
                let (attr, next) = parse_attr(html, pos)?;
                if let Some(attr) = attr {
                    attrs.push(attr);
                }
                pos = next;
            }
            _ => {
                pos += 1;
            }
        }
    }

    if name.is_empty() {
        return Some((None, pos));
    }

    let token = if closing {
        Some(Token::Close { name })
    } else {
        Some(Token::Open { name, attrs })
    };
    Some((token, pos))
}

fn parse_attr(html: &str, start: usize) -> Option<(Option<(String, String)>, usize)> {
    let bytes = html.as_bytes();
    let mut pos = start;

    let name_start = pos;
    while pos < bytes.len() && bytes[pos] != b'=' && bytes[pos] != b'>' && !bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    let name = html[name_start..pos].to_ascii_lowercase();

    if bytes.get(pos) != Some(&b'=') {
        // Bare attribute without a value.
        return Some((Some((name, String::new())), pos));
    }
    pos += 1;

    if bytes.get(pos) == Some(&b'"') {
        pos += 1;
        let value_start = pos;
        let end = find_byte(bytes, pos, b'"')?;
        let value = decode_entities(&html[value_start..end]);
        Some((Some((name, value)), end + 1))
    } else {
        let value_start = pos;
        while pos < bytes.len() && bytes[pos] != b'>' && !bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        let value = decode_entities(&html[value_start..pos]);
        Some((Some((name, value)), pos))
    }
}

enum ListKind {
    Unordered,
    Ordered(u32),
}

struct Renderer {
    out: String,
    lists: Vec<ListKind>,
    links: Vec<String>,
    pre_depth: usize,
    quote_depth: usize,
}

fn render(tokens: &[Token]) -> String {
    let mut r = Renderer {
        out: String::new(),
        lists: Vec::new(),
        links: Vec::new(),
        pre_depth: 0,
        quote_depth: 0,
    };

    for token in tokens {
        match token {
            Token::Text(text) => r.text(text),
            Token::Open { name, attrs } => r.open(name, attrs),
            Token::Close { name } => r.close(name),
        }
    }

    collapse_blank_runs(r.out.trim())
}

impl Renderer {
    fn text(&mut self, raw: &str) {
        let decoded = decode_entities(raw);
        if self.pre_depth > 0 {
            self.out.push_str(&decoded);
            return;
        }

        // Outside <pre>, whitespace runs carry no meaning.
        let mut collapsed = String::with_capacity(decoded.len());
        let mut last_was_space = false;
        for c in decoded.chars() {
            if c.is_whitespace() {
                if !last_was_space {
                    collapsed.push(' ');
                }
                last_was_space = true;
            } else {
                collapsed.push(c);
                last_was_space = false;
            }
        }

        if collapsed == " " && (self.out.is_empty() || self.out.ends_with(['\n', ' '])) {
            return;
        }
        if collapsed.starts_with(' ') && (self.out.is_empty() || self.out.ends_with(['\n', ' '])) {
            self.out.push_str(collapsed.trim_start());
        } else {
            self.out.push_str(&collapsed);
        }
    }

    fn open(&mut self, name: &str, attrs: &[(String, String)]) {
        match name {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = name[1..].parse::<usize>().unwrap_or(1);
                self.block_break();
                self.out.push_str(&"#".repeat(level));
                self.out.push(' ');
            }
            "p" => self.block_break(),
            "blockquote" => {
                self.quote_depth += 1;
                self.block_break();
            }
            "ul" => self.lists.push(ListKind::Unordered),
            "ol" => self.lists.push(ListKind::Ordered(1)),
            "li" => {
                if !self.out.is_empty() && !self.out.ends_with('\n') {
                    self.out.push('\n');
                }
                self.push_quote_prefix();
                let depth = self.lists.len().saturating_sub(1);
                self.out.push_str(&"  ".repeat(depth));
                match self.lists.last_mut() {
                    Some(ListKind::Ordered(counter)) => {
                        self.out.push_str(&format!("{}. ", counter));
                        *counter += 1;
                    }
                    _ => self.out.push_str("- "),
                }
            }
            "strong" | "b" => self.out.push_str("**"),
            "em" | "i" => self.out.push('*'),
            "a" => {
                let href = attr_value(attrs, "href").unwrap_or_default();
                self.links.push(href.to_string());
                self.out.push('[');
            }
            "img" => {
                let src = attr_value(attrs, "src").unwrap_or_default();
                let alt = attr_value(attrs, "alt").unwrap_or_default();
                self.out.push_str(&format!("![{}]({})", alt, src));
            }
            "pre" => {
                self.block_break();
                self.out.push_str("```\n");
                self.pre_depth += 1;
            }
            "code" => {
                if self.pre_depth == 0 {
                    self.out.push('`');
                }
            }
            "br" => self.out.push('\n'),
            "hr" => {
                self.block_break();
                self.out.push_str("---");
                self.out.push('\n');
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &str) {
        match name {
            "blockquote" => self.quote_depth = self.quote_depth.saturating_sub(1),
            "ul" | "ol" => {
                self.lists.pop();
            }
            "strong" | "b" => self.out.push_str("**"),
            "em" | "i" => self.out.push('*'),
            "a" => {
                let href = self.links.pop().unwrap_or_default();
                self.out.push_str(&format!("]({})", href));
            }
            "pre" => {
                self.pre_depth = self.pre_depth.saturating_sub(1);
                if !self.out.ends_with('\n') {
                    self.out.push('\n');
                }
                self.out.push_str("```");
            }
            "code" => {
                if self.pre_depth == 0 {
                    self.out.push('`');
                }
            }
            _ => {}
        }
    }

    /// Terminate the current block and start a new one, applying the
    /// blockquote prefix for the current depth.
    fn block_break(&mut self) {
        // Drop an empty trailing quote-prefix line rather than stacking on it.
        let line_start = self.out.rfind('\n').map(|i| i + 1).unwrap_or(0);
        if self.out[line_start..].chars().all(|c| c == '>' || c == ' ') {
            self.out.truncate(line_start);
        }
        while self.out.ends_with(' ') {
            self.out.pop();
        }
        if self.out.is_empty() {
            self.push_quote_prefix();
            return;
        }
        while self.out.ends_with('\n') {
            self.out.pop();
        }
        self.out.push_str("\n\n");
        self.push_quote_prefix();
    }

    fn push_quote_prefix(&mut self) {
        for _ in 0..self.quote_depth {
            self.out.push_str("> ");
        }
    }
}

fn attr_value<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
}

fn collapse_blank_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newline_run = 0;
    for c in text.chars() {
        if c == '\n' {
            newline_run += 1;
            if newline_run <= 2 {
                out.push(c);
            }
        } else {
            newline_run = 0;
            out.push(c);
        }
    }
    out
}

/// Decode the entities ammonia emits plus numeric character references.
fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c != '&' {
            out.push(c);
            continue;
        }

        let rest = &text[start + 1..];
        let Some(end) = rest.find(';') else {
            out.push(c);
            continue;
        };
        let entity = &rest[..end];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some(' '),
            _ => decode_numeric_entity(entity),
        };

        match decoded {
            Some(ch) => {
                out.push(ch);
                // Skip past the entity body and the ';'.
                for _ in 0..end + 1 {
                    chars.next();
                }
            }
            None => out.push(c),
        }
    }

    out
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    let body = entity.strip_prefix('#')?;
    let code = if let Some(hex) = body.strip_prefix('x').or_else(|| body.strip_prefix('X')) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        body.parse::<u32>().ok()?
    };
    char::from_u32(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_and_paragraphs() {
        let md = html_to_markdown("<h1>Title</h1><p>Hello <strong>world</strong>.</p>");
        assert_eq!(md, "# Title\n\nHello **world**.");
    }

    #[test]
    fn links_and_images() {
        let md = html_to_markdown(r#"<p><a href="https://example.com">site</a> and <img src="https://example.com/x.png" alt="pic"></p>"#);
        assert_eq!(md, "[site](https://example.com) and ![pic](https://example.com/x.png)");
    }

    #[test]
    fn consecutive_links_keep_their_own_targets() {
        let md = html_to_markdown(
            r#"<p><a href="https://a.test">one</a> <a href="https://b.test">two</a></p>"#,
        );
        assert_eq!(md, "[one](https://a.test) [two](https://b.test)");
    }

    #[test]
    fn unordered_and_ordered_lists() {
        let md = html_to_markdown("<ul><li>one</li><li>two</li></ul>");
        assert_eq!(md, "- one\n- two");

        let md = html_to_markdown("<ol><li>first</li><li>second</li></ol>");
        assert_eq!(md, "1. first\n2. second");
    }

    #[test]
    fn blockquote_and_rule() {
        let md = html_to_markdown("<blockquote><p>quoted</p></blockquote><hr><p>after</p>");
        assert!(md.contains("> quoted"));
        assert!(md.contains("---"));
        assert!(md.ends_with("after"));
    }

    #[test]
    fn inline_and_fenced_code() {
        let md = html_to_markdown("<p>use <code>cargo</code></p>");
        assert_eq!(md, "use `cargo`");

        let md = html_to_markdown("<pre><code>let x = 1;\nlet y = 2;</code></pre>");
        assert_eq!(md, "```\nlet x = 1;\nlet y = 2;\n```");
    }

    #[test]
    fn unknown_tags_are_stripped() {
        let md = html_to_markdown("<p>keep</p><script>alert(1)</script><table><tr><td>cell</td></tr></table>");
        assert!(md.contains("keep"));
        assert!(!md.contains("alert"));
        assert!(!md.contains("<"));
    }

    #[test]
    fn entities_are_decoded() {
        let md = html_to_markdown("<p>a &amp; b &lt; c &#169;</p>");
        assert_eq!(md, "a & b < c ©");
    }

    #[test]
    fn malformed_html_does_not_panic() {
        for input in ["<p>unclosed", "<a href=\"x", "<<<>>>", "</div></div>", "<em><strong>x</em></strong>"] {
            let _ = html_to_markdown(input);
        }
    }

    #[test]
    fn whitespace_between_blocks_is_normalized() {
        let md = html_to_markdown("<h2>A</h2>\n\n   <p>b   c</p>");
        assert_eq!(md, "## A\n\nb c");
    }
}
