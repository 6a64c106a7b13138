//! Parser for `gradle.properties` files (Java properties syntax)

use crate::models::syntax::{NodeKind, SyntaxTree, TreeBuilder};

/// Builds a tree with one `Property` node per entry
///
/// The node is named by the key and holds the value in a `Literal` child.
/// Malformed lines never fail the parse; a line without separator is a key
/// with an empty value, as Java reads it.
pub struct PropertiesParser;

impl PropertiesParser {
    pub fn parse(src: &str) -> SyntaxTree {
        let mut builder = TreeBuilder::new();
        builder.start_node(NodeKind::Script, None, src);

        for line in logical_lines(src) {
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }
            let (key, value) = split_entry(trimmed);
            builder.start_node(NodeKind::Property, Some(&key), trimmed);
            builder.leaf(NodeKind::Literal, None, &value);
            builder.finish_node();
        }

        builder.finish_node();
        builder.build()
    }
}

/// Join lines ending in an odd number of backslashes with the next line
fn logical_lines(src: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut continuing = false;

    for raw in src.lines() {
        let line = if continuing { raw.trim_start() } else { raw };
        let trailing = line.chars().rev().take_while(|c| *c == '\\').count();
        if trailing % 2 == 1 {
            current.push_str(&line[..line.len() - 1]);
            continuing = true;
        } else {
            current.push_str(line);
            lines.push(std::mem::take(&mut current));
            continuing = false;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Split at the first unescaped `=`, `:` or whitespace
fn split_entry(line: &str) -> (String, String) {
    let mut key = String::new();
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    key.push(unescape(next));
                }
            }
            '=' | ':' => break,
            c if c.is_whitespace() => {
                while chars.peek().is_some_and(|c| c.is_whitespace()) {
                    chars.next();
                }
                if matches!(chars.peek(), Some('=') | Some(':')) {
                    chars.next();
                }
                break;
            }
            c => key.push(c),
        }
    }

    let rest: String = chars.collect();
    let mut value = String::new();
    let mut rest = rest.trim_start().chars();
    while let Some(c) = rest.next() {
        if c == '\\' {
            if let Some(next) = rest.next() {
                value.push(unescape(next));
            }
        } else {
            value.push(c);
        }
    }

    (key, value)
}

fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::syntax::NodeId;

    fn entries(src: &str) -> Vec<(String, String)> {
        let tree = PropertiesParser::parse(src);
        tree.children(tree.root())
            .iter()
            .map(|id| {
                let value: NodeId = tree.children(*id)[0];
                (tree.name(*id).unwrap().to_string(), tree.text(value).to_string())
            })
            .collect()
    }

    #[test]
    fn test_separators_and_comments() {
        let src = "# comment\n! also comment\norg.gradle.jvmargs=-Xmx2048m\nkotlin.code.style : official\nandroid.useAndroidX true\n\n";
        assert_eq!(
            entries(src),
            vec![
                ("org.gradle.jvmargs".to_string(), "-Xmx2048m".to_string()),
                ("kotlin.code.style".to_string(), "official".to_string()),
                ("android.useAndroidX".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_continuation_and_escapes() {
        let src = "list=a,\\\n    b,\\\n    c\npath=C\\:\\\\tools\nkey\\ with\\ space=1\n";
        assert_eq!(
            entries(src),
            vec![
                ("list".to_string(), "a,b,c".to_string()),
                ("path".to_string(), "C:\\tools".to_string()),
                ("key with space".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_key_without_value() {
        assert_eq!(entries("flag\n"), vec![("flag".to_string(), String::new())]);
    }
}
