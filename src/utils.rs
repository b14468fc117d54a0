// src/utils.rs

use once_cell::sync::Lazy;
use regex::Regex;

const ALLOWED_TAGS: [&str; 4] = ["b", "ul", "ol", "li"];

static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static ORDERED_ITEM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s*").unwrap());
static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<(/?)([a-zA-Z][a-zA-Z0-9]*)(?:\s[^<>]*)?/?>").unwrap());
static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^&(?:[a-zA-Z]+|#[0-9]+|#x[0-9a-fA-F]+);").unwrap());
static NUMBERED_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)(?:^|[ \t]+)(\d{1,2})\.[ \t]+").unwrap());
static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?(?:-->|$)").unwrap());
static BREAK_BEFORE_LIST_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br>\s*(</?(?:ul|ol|li)>)").unwrap());
static BREAK_AFTER_LIST_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(</?(?:ul|ol|li)>)\s*<br>").unwrap());
static BR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static LIST_OPEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<(?:ul|ol)>\s*").unwrap());
static ITEM_OPEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<li>").unwrap());
static ITEM_CLOSE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</li>\s*").unwrap());
static ANY_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<>]*>").unwrap());
static BLANK_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Converts the light markdown produced by the model into HTML restricted to
/// `b`, `ul`, `ol` and `li`.
pub fn markdown_to_html(markdown: &str) -> String {
    let bolded = BOLD_RE.replace_all(markdown, "<b>$1</b>");

    let mut new_lines: Vec<String> = Vec::new();
    let mut in_ul = false;
    let mut in_ol = false;

    for line in bolded.split('\n') {
        let stripped = line.trim();

        if let Some(item) = stripped.strip_prefix('*') {
            if in_ol {
                new_lines.push("</ol>".to_string());
                in_ol = false;
            }
            if !in_ul {
                new_lines.push("<ul>".to_string());
                in_ul = true;
            }
            new_lines.push(format!("<li>{}</li>", item.trim()));
        } else if ORDERED_ITEM_RE.is_match(stripped) {
            if in_ul {
                new_lines.push("</ul>".to_string());
                in_ul = false;
            }
            if !in_ol {
                new_lines.push("<ol>".to_string());
                in_ol = true;
            }
            let item = ORDERED_ITEM_RE.replace(stripped, "");
            new_lines.push(format!("<li>{}</li>", item));
        } else {
            if in_ul {
                new_lines.push("</ul>".to_string());
                in_ul = false;
            }
            if in_ol {
                new_lines.push("</ol>".to_string());
                in_ol = false;
            }
            new_lines.push(line.to_string());
        }
    }

    if in_ul {
        new_lines.push("</ul>".to_string());
    }
    if in_ol {
        new_lines.push("</ol>".to_string());
    }

    sanitize_html(&new_lines.join("\n"))
}

/// Strips every tag outside the allow-list, drops attributes from allowed
/// ones and escapes stray `<`, `>` and `&`.
pub fn sanitize_html(html: &str) -> String {
    let uncommented = COMMENT_RE.replace_all(html, "");
    let mut out = String::with_capacity(uncommented.len());
    let mut rest: &str = &uncommented;

    while let Some(c) = rest.chars().next() {
        match c {
            '<' => {
                if let Some(caps) = TAG_RE.captures(rest) {
                    let end = caps.get(0).map_or(1, |m| m.end());
                    let name = caps[2].to_ascii_lowercase();
                    if ALLOWED_TAGS.contains(&name.as_str()) {
                        out.push('<');
                        out.push_str(&caps[1]);
                        out.push_str(&name);
                        out.push('>');
                    }
                    rest = &rest[end..];
                    continue;
                }
                out.push_str("&lt;");
            }
            '>' => out.push_str("&gt;"),
            '&' if !ENTITY_RE.is_match(rest) => out.push_str("&amp;"),
            _ => out.push(c),
        }
        rest = &rest[c.len_utf8()..];
    }

    out
}

/// Light reformatting applied to a reply before it is shown as markup:
/// inline numbered items start on their own line and newlines become `<br>`.
pub fn format_reply(reply: &str) -> String {
    let split_items = split_numbered_items(reply.trim());
    let with_breaks = split_items.replace("\r\n", "\n").replace('\n', "<br>");
    let tidy = BREAK_BEFORE_LIST_TAG_RE.replace_all(&with_breaks, "$1");
    BREAK_AFTER_LIST_TAG_RE.replace_all(&tidy, "$1").into_owned()
}

/// Moves the items of an inline `1. … 2. …` list onto their own lines.
/// Only runs counting up from 1 with at least two items are split, so a
/// sentence ending in a number stays intact.
fn split_numbered_items(reply: &str) -> String {
    let mut runs: Vec<Vec<(usize, usize)>> = Vec::new();
    let mut current: Vec<(usize, usize)> = Vec::new();

    for caps in NUMBERED_MARKER_RE.captures_iter(reply) {
        let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let Ok(n) = number.as_str().parse::<usize>() else {
            continue;
        };
        let gap = (whole.start(), number.start());

        if n == current.len() + 1 {
            current.push(gap);
        } else if n == 1 {
            runs.push(std::mem::replace(&mut current, vec![gap]));
        }
    }
    runs.push(current);

    let mut out = String::with_capacity(reply.len() + 8);
    let mut last = 0;
    for (start, end) in runs.into_iter().filter(|run| run.len() >= 2).flatten() {
        // A marker at the start of a line already begins its own line.
        if start == end {
            continue;
        }
        out.push_str(&reply[last..start]);
        out.push('\n');
        last = end;
    }
    out.push_str(&reply[last..]);
    out
}

/// Flattens reply markup into plain text for hosts that cannot render HTML.
pub fn html_to_text(html: &str) -> String {
    let text = BR_RE.replace_all(html, "\n");
    let text = LIST_OPEN_RE.replace_all(&text, "");
    let text = ITEM_OPEN_RE.replace_all(&text, "• ");
    let text = ITEM_CLOSE_RE.replace_all(&text, "\n");
    let text = ANY_TAG_RE.replace_all(&text, "");
    let text = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    BLANK_RUN_RE.replace_all(&text, "\n\n").trim().to_string()
}

/// Detects the MIME type of a corpus document based on the file extension.
pub fn detect_mime_type(file_path: &str) -> Option<&'static str> {
    let extension = std::path::Path::new(file_path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match extension.as_str() {
        "pdf" => Some("application/pdf"),
        "txt" => Some("text/plain"),
        "md" => Some("text/markdown"),
        _ => None,
    }
}
