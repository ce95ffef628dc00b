//! DOT format utilities for graph visualization.
//!
//! The control flow graph, the dominator tree and the structured-control tree can all
//! be rendered as Graphviz documents. This module holds the pieces they share: label
//! escaping and a small document builder that keeps the three renderings consistent.

use std::fmt::Write;

/// Escapes a string for safe use in DOT format labels and identifiers.
///
/// This function handles all characters that have special meaning in DOT format,
/// including quotes, backslashes, newlines, and angle brackets.
///
/// # Examples
///
/// ```rust
/// use cfgflow::utils::escape_dot;
///
/// assert_eq!(escape_dot("$a = \"x\""), "$a = \\\"x\\\"");
/// ```
#[must_use]
pub fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "")
        .replace('<', "\\<")
        .replace('>', "\\>")
}

/// Incremental builder for a `digraph` document.
///
/// Node and edge identifiers are emitted verbatim; labels are escaped.
#[derive(Debug)]
pub struct DotWriter {
    out: String,
}

impl DotWriter {
    /// Starts a new digraph with the given graph name and an optional title.
    #[must_use]
    pub fn new(name: &str, title: Option<&str>) -> Self {
        let mut out = String::new();
        let _ = writeln!(out, "digraph {name} {{");
        if let Some(title) = title {
            let _ = writeln!(out, "    label=\"{}\";", escape_dot(title));
            out.push_str("    labelloc=t;\n");
        }
        out.push_str("    node [shape=box, fontname=\"Courier\", fontsize=10];\n");
        out.push_str("    edge [fontname=\"Courier\", fontsize=9];\n\n");
        Self { out }
    }

    /// Emits a node with a left-aligned, multi-line label.
    pub fn node(&mut self, id: &str, lines: &[String]) {
        let mut label = String::new();
        for line in lines {
            label.push_str(&escape_dot(line));
            label.push_str("\\l");
        }
        let _ = writeln!(self.out, "    {id} [label=\"{label}\"];");
    }

    /// Emits an edge with an optional label.
    pub fn edge(&mut self, from: &str, to: &str, label: Option<&str>) {
        match label {
            Some(label) => {
                let _ = writeln!(
                    self.out,
                    "    {from} -> {to} [label=\"{}\"];",
                    escape_dot(label)
                );
            }
            None => {
                let _ = writeln!(self.out, "    {from} -> {to};");
            }
        }
    }

    /// Closes the document and returns its text.
    #[must_use]
    pub fn finish(mut self) -> String {
        self.out.push_str("}\n");
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_dot_basic() {
        assert_eq!(escape_dot("hello"), "hello");
    }

    #[test]
    fn test_escape_dot_quotes() {
        assert_eq!(escape_dot("say \"hello\""), "say \\\"hello\\\"");
    }

    #[test]
    fn test_escape_dot_newlines() {
        assert_eq!(escape_dot("line1\r\nline2"), "line1\\nline2");
    }

    #[test]
    fn test_escape_dot_angle_brackets() {
        assert_eq!(escape_dot("$a <= $b"), "$a \\<= $b");
    }

    #[test]
    fn test_dot_writer_document() {
        let mut dot = DotWriter::new("CFG", Some("main"));
        dot.node("n0", &["entry".to_string()]);
        dot.node("n1", &["$a = 1".to_string(), "jmp L1".to_string()]);
        dot.edge("n0", "n1", None);
        dot.edge("n1", "n0", Some("true"));
        let text = dot.finish();

        assert!(text.starts_with("digraph CFG {\n"));
        assert!(text.contains("label=\"main\";"));
        assert!(text.contains("n1 [label=\"$a = 1\\ljmp L1\\l\"];"));
        assert!(text.contains("n0 -> n1;"));
        assert!(text.contains("n1 -> n0 [label=\"true\"];"));
        assert!(text.ends_with("}\n"));
    }
}
