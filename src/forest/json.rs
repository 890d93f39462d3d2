//! JSON output for whole forests
//!
//! Produces the same text as serializing `&[Node]` with serde_json, but walks
//! the forest with an explicit stack so a deep chain only costs heap.

use std::io::{self, Write};

use super::node::Node;

/// Write `forest` as compact JSON
pub fn write_forest<W: Write>(writer: W, forest: &[Node]) -> io::Result<()> {
    ForestWriter::new(writer, false).write(forest)
}

/// Write `forest` as JSON indented two spaces per level
pub fn write_forest_pretty<W: Write>(writer: W, forest: &[Node]) -> io::Result<()> {
    ForestWriter::new(writer, true).write(forest)
}

/// Compact JSON for `forest` as bytes
pub fn forest_to_vec(forest: &[Node]) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_forest(&mut buf, forest)?;
    Ok(buf)
}

enum Step<'a> {
    /// Emit a node object; `depth` is 0 for roots
    Open { node: &'a Node, depth: usize, first: bool },
    /// Close the children array and object of a node at `depth`
    Close { depth: usize },
}

struct ForestWriter<W> {
    out: W,
    pretty: bool,
}

impl<W: Write> ForestWriter<W> {
    fn new(out: W, pretty: bool) -> Self {
        Self { out, pretty }
    }

    fn write(mut self, forest: &[Node]) -> io::Result<()> {
        self.out.write_all(b"[")?;
        if forest.is_empty() {
            return self.out.write_all(b"]");
        }

        let mut stack = Self::children_steps(forest, 0);
        while let Some(step) = stack.pop() {
            match step {
                Step::Open { node, depth, first } => {
                    if !first {
                        self.out.write_all(b",")?;
                    }
                    // Array elements sit one level in, fields two, grandchildren three.
                    let object = 1 + 2 * depth;
                    self.newline(object)?;
                    self.out.write_all(b"{")?;

                    self.field(object + 1, "id")?;
                    write!(self.out, "{}", node.id)?;
                    self.out.write_all(b",")?;

                    self.field(object + 1, "label")?;
                    serde_json::to_writer(&mut self.out, node.label.as_str())?;
                    self.out.write_all(b",")?;

                    self.field(object + 1, "children")?;
                    self.out.write_all(b"[")?;
                    if node.children.is_empty() {
                        self.out.write_all(b"]")?;
                        self.newline(object)?;
                        self.out.write_all(b"}")?;
                    } else {
                        stack.push(Step::Close { depth });
                        stack.extend(Self::children_steps(&node.children, depth + 1));
                    }
                }
                Step::Close { depth } => {
                    let object = 1 + 2 * depth;
                    self.newline(object + 1)?;
                    self.out.write_all(b"]")?;
                    self.newline(object)?;
                    self.out.write_all(b"}")?;
                }
            }
        }

        self.newline(0)?;
        self.out.write_all(b"]")?;
        self.out.flush()
    }

    /// Steps for one array of nodes, reversed so the first pops first
    fn children_steps(nodes: &[Node], depth: usize) -> Vec<Step<'_>> {
        nodes
            .iter()
            .enumerate()
            .rev()
            .map(|(i, node)| Step::Open {
                node,
                depth,
                first: i == 0,
            })
            .collect()
    }

    fn field(&mut self, level: usize, name: &str) -> io::Result<()> {
        self.newline(level)?;
        write!(self.out, "\"{}\":", name)?;
        if self.pretty {
            self.out.write_all(b" ")?;
        }
        Ok(())
    }

    fn newline(&mut self, level: usize) -> io::Result<()> {
        if self.pretty {
            self.out.write_all(b"\n")?;
            for _ in 0..level {
                self.out.write_all(b"  ")?;
            }
        }
        Ok(())
    }
}
