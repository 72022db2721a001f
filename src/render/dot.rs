//! DOT text writer.

use std::fmt::Write;

/// Prefix that makes Graphviz draw a border around a subgraph.
pub const CLUSTER_PREFIX: &str = "cluster_";

/// Escape special characters for quoted DOT strings.
pub fn escape(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "")
}

/// Write indentation to output.
fn write_indent(output: &mut String, level: usize) {
    for _ in 0..level {
        output.push_str("  ");
    }
}

fn write_attrs(output: &mut String, attrs: &[(&str, &str)]) {
    output.push('[');
    for (i, (key, value)) in attrs.iter().enumerate() {
        if i > 0 {
            output.push_str(", ");
        }
        let _ = write!(output, "{}=\"{}\"", key, escape(value));
    }
    output.push(']');
}

/// Builder for a `digraph` description. Every id is emitted quoted.
pub struct DotBuilder {
    output: String,
    indent: usize,
}

impl DotBuilder {
    /// Start a new directed graph with the given name.
    pub fn new(name: &str) -> Self {
        let mut output = String::with_capacity(4096);
        let _ = writeln!(output, "digraph \"{}\" {{", escape(name));
        Self { output, indent: 1 }
    }

    /// Add a graph attribute in the current scope.
    pub fn attr(&mut self, key: &str, value: &str) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "{}=\"{}\";", key, escape(value));
        self
    }

    /// Set default node attributes in the current scope.
    pub fn node_defaults(&mut self, attrs: &[(&str, &str)]) -> &mut Self {
        self.defaults("node", attrs)
    }

    /// Set default edge attributes in the current scope.
    pub fn edge_defaults(&mut self, attrs: &[(&str, &str)]) -> &mut Self {
        self.defaults("edge", attrs)
    }

    fn defaults(&mut self, target: &str, attrs: &[(&str, &str)]) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        self.output.push_str(target);
        self.output.push(' ');
        write_attrs(&mut self.output, attrs);
        self.output.push_str(";\n");
        self
    }

    /// Add a blank line for readability.
    pub fn blank(&mut self) -> &mut Self {
        self.output.push('\n');
        self
    }

    /// Add a node with attributes.
    pub fn node(&mut self, id: &str, attrs: &[(&str, &str)]) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = write!(self.output, "\"{}\" ", escape(id));
        write_attrs(&mut self.output, attrs);
        self.output.push_str(";\n");
        self
    }

    /// Add an edge.
    pub fn edge(&mut self, from: &str, to: &str) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "\"{}\" -> \"{}\";", escape(from), escape(to));
        self
    }

    /// Open a subgraph. A bordered subgraph gets the `cluster_` name prefix,
    /// a flat one keeps the bare name.
    pub fn start_subgraph(&mut self, name: &str, bordered: bool) -> &mut Self {
        let prefix = if bordered { CLUSTER_PREFIX } else { "" };
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "subgraph \"{}{}\" {{", prefix, escape(name));
        self.indent += 1;
        self
    }

    /// Close the current subgraph.
    pub fn end_subgraph(&mut self) -> &mut Self {
        self.indent = self.indent.saturating_sub(1).max(1);
        write_indent(&mut self.output, self.indent);
        self.output.push_str("}\n");
        self
    }

    /// Finish building and return the DOT string.
    pub fn build(mut self) -> String {
        self.output.push_str("}\n");
        self.output
    }
}
