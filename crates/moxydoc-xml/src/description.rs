//! Conversion of Doxygen description markup to Markdown.
//!
//! Cross references are emitted as `[text]({#ref id #})` markers; the output
//! stage turns them into links once it knows which document holds the target.

use std::sync::OnceLock;

use regex::Regex;
use roxmltree::Node;

/// Markdown for a `briefdescription`/`detaileddescription` style element.
/// Missing elements convert to an empty string.
pub fn to_markdown(node: Option<Node<'_, '_>>) -> String {
    let Some(node) = node else {
        return String::new();
    };
    let mut out = String::new();
    write_children(node, &mut out);
    tidy(&out)
}

/// Concatenated text of `node` with markup dropped.
pub fn plain_text(node: Option<Node<'_, '_>>) -> String {
    let Some(node) = node else {
        return String::new();
    };
    let mut out = String::new();
    for descendant in node.descendants() {
        if descendant.is_text() {
            out.push_str(descendant.text().unwrap_or_default());
        } else if descendant.has_tag_name("sp") {
            out.push(' ');
        }
    }
    collapse_spaces(&out).trim().to_string()
}

fn write_children(node: Node<'_, '_>, out: &mut String) {
    for child in node.children() {
        write_node(child, out);
    }
}

fn inline(node: Node<'_, '_>) -> String {
    let mut out = String::new();
    write_children(node, &mut out);
    collapse_spaces(&out).trim().to_string()
}

fn write_node(node: Node<'_, '_>, out: &mut String) {
    if node.is_text() {
        let text = collapse_spaces(node.text().unwrap_or_default());
        if out.is_empty() || out.ends_with(char::is_whitespace) {
            out.push_str(text.trim_start());
        } else {
            out.push_str(&text);
        }
        return;
    }
    if !node.is_element() {
        return;
    }

    match node.tag_name().name() {
        "para" => {
            out.push_str("\n\n");
            write_children(node, out);
            out.push_str("\n\n");
        }
        "ref" => {
            let text = inline(node);
            match node.attribute("refid") {
                Some(refid) => out.push_str(&format!("[{text}]({{#ref {refid} #}})")),
                None => out.push_str(&text),
            }
        }
        "computeroutput" => out.push_str(&format!("`{}`", plain_text(Some(node)))),
        "bold" => out.push_str(&format!("**{}**", inline(node))),
        "emphasis" => out.push_str(&format!("*{}*", inline(node))),
        "ulink" => {
            let text = inline(node);
            let url = node.attribute("url").unwrap_or_default();
            out.push_str(&format!("[{text}]({url})"));
        }
        "linebreak" => out.push('\n'),
        "sp" => out.push(' '),
        "itemizedlist" => write_list(node, out, false),
        "orderedlist" => write_list(node, out, true),
        "programlisting" => {
            out.push_str("\n\n```\n");
            for line in node.children().filter(|child| child.has_tag_name("codeline")) {
                out.push_str(&code_line(line));
                out.push('\n');
            }
            out.push_str("```\n\n");
        }
        "simplesect" => {
            let kind = node.attribute("kind").unwrap_or("note");
            out.push_str(&format!("\n\n#### {}\n\n", simplesect_title(kind)));
            write_children(node, out);
            out.push_str("\n\n");
        }
        "parameterlist" => write_parameters(node, out),
        "heading" => {
            let level = node
                .attribute("level")
                .and_then(|level| level.parse::<usize>().ok())
                .unwrap_or(1)
                .clamp(1, 6);
            out.push_str(&format!("\n\n{} {}\n\n", "#".repeat(level), inline(node)));
        }
        "anchor" | "indexentry" => {}
        _ => write_children(node, out),
    }
}

fn write_list(node: Node<'_, '_>, out: &mut String, ordered: bool) {
    out.push_str("\n\n");
    let items = node.children().filter(|child| child.has_tag_name("listitem"));
    for (idx, item) in items.enumerate() {
        let mut body = String::new();
        write_children(item, &mut body);
        let body = tidy(&body).replace('\n', "\n   ");
        if ordered {
            out.push_str(&format!("{}. {body}\n", idx + 1));
        } else {
            out.push_str(&format!("* {body}\n"));
        }
    }
    out.push_str("\n\n");
}

fn write_parameters(node: Node<'_, '_>, out: &mut String) {
    let title = match node.attribute("kind").unwrap_or("param") {
        "retval" => "Return values",
        "exception" => "Exceptions",
        "templateparam" => "Template parameters",
        _ => "Parameters",
    };
    out.push_str(&format!("\n\n#### {title}\n"));

    for item in node.children().filter(|child| child.has_tag_name("parameteritem")) {
        let names: Vec<String> = item
            .descendants()
            .filter(|child| child.has_tag_name("parametername"))
            .map(|name| plain_text(Some(name)))
            .collect();
        let description = item
            .children()
            .find(|child| child.has_tag_name("parameterdescription"));
        let description = to_markdown(description).replace('\n', " ");
        out.push_str(&format!("* `{}` {description}\n", names.join(", ")));
    }
    out.push_str("\n\n");
}

fn code_line(node: Node<'_, '_>) -> String {
    let mut line = String::new();
    for descendant in node.descendants() {
        if descendant.is_text() {
            line.push_str(descendant.text().unwrap_or_default());
        } else if descendant.has_tag_name("sp") {
            line.push(' ');
        }
    }
    line
}

fn simplesect_title(kind: &str) -> String {
    match kind {
        "return" => "Returns".to_string(),
        "see" => "See also".to_string(),
        "pre" => "Precondition".to_string(),
        "post" => "Postcondition".to_string(),
        "par" => "Remarks".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

/// Collapse runs of whitespace (including newlines) to one space.
fn collapse_spaces(text: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));
    pattern.replace_all(text, " ").into_owned()
}

/// Trim line ends and limit blank lines to one.
fn tidy(text: &str) -> String {
    static BLANKS: OnceLock<Regex> = OnceLock::new();
    let blanks = BLANKS.get_or_init(|| Regex::new(r"\n{3,}").expect("blank line pattern is valid"));

    let trimmed: Vec<&str> = text.lines().map(str::trim_end).collect();
    let joined = trimmed.join("\n");
    blanks.replace_all(joined.trim(), "\n\n").into_owned()
}
