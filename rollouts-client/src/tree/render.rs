use std::io::{self, Write};

use crate::ansi::AnsiFormatter;
use crate::structs::RenderOptions;
use crate::table_format::format_table;

use super::node::ResourceNode;
use super::prefix::prefix_for;

pub const HEADER: [&str; 5] = ["NAME", "KIND", "STATUS", "AGE", "INFO"];

/// Renders a resource tree as an aligned, colorized table.
///
/// Holds no state besides the formatter, so rendering the same tree twice
/// produces the same bytes.
#[derive(Debug, Clone, Copy)]
pub struct TreeRenderer {
    formatter: AnsiFormatter,
}

impl TreeRenderer {
    pub fn new(options: &RenderOptions) -> Self {
        Self {
            formatter: AnsiFormatter::new(options),
        }
    }

    pub fn with_formatter(formatter: AnsiFormatter) -> Self {
        Self { formatter }
    }

    /// Header row followed by one row per node, depth first.
    pub fn rows(&self, root: &ResourceNode) -> Vec<Vec<String>> {
        let mut rows = Vec::with_capacity(root.len() + 1);
        rows.push(HEADER.iter().map(|h| h.to_string()).collect());
        self.push_rows(root, "", "", &mut rows);
        rows
    }

    fn push_rows(
        &self,
        node: &ResourceNode,
        line_prefix: &str,
        sub_prefix: &str,
        rows: &mut Vec<Vec<String>>,
    ) {
        rows.push(self.row(node, line_prefix));

        let last = node.children.len().saturating_sub(1);
        for (i, child) in node.children.iter().enumerate() {
            let (child_prefix, child_sub_prefix) = prefix_for(i == last, sub_prefix);
            self.push_rows(child, &child_prefix, &child_sub_prefix, rows);
        }
    }

    fn row(&self, node: &ResourceNode, prefix: &str) -> Vec<String> {
        let name = format!("{prefix}{}{}", node.kind.icon(), node.name);

        let status = node
            .status
            .as_ref()
            .map(|s| {
                format!(
                    "{} {}",
                    self.formatter.colorize(s.icon.glyph()),
                    self.formatter.colorize_status(&s.text, &s.text)
                )
            })
            .unwrap_or_default();

        let info = node
            .info
            .iter()
            .map(|tag| self.formatter.colorize_status(tag, tag_token(tag)))
            .collect::<Vec<_>>()
            .join(",");

        vec![
            name,
            node.kind.label().to_string(),
            status,
            node.age.clone(),
            info,
        ]
    }

    /// Aligned lines of the whole frame, header included.
    pub fn lines(&self, root: &ResourceNode) -> Vec<String> {
        format_table(&self.rows(root))
    }

    pub fn render_to_string(&self, root: &ResourceNode) -> String {
        let mut frame = String::new();
        for line in self.lines(root) {
            frame.push_str(&line);
            frame.push('\n');
        }
        frame
    }

    /// Writes the frame with a single `write_all` so a reader never sees
    /// half of it.
    pub fn render<W: Write + ?Sized>(&self, root: &ResourceNode, out: &mut W) -> io::Result<()> {
        out.write_all(self.render_to_string(root).as_bytes())
    }
}

/// Renders `root` to `out` with `options`.
pub fn render<W: Write + ?Sized>(
    root: &ResourceNode,
    options: &RenderOptions,
    out: &mut W,
) -> io::Result<()> {
    TreeRenderer::new(options).render(root, out)
}

/// A tag is colored by its leading word, so `✔ 3` takes the color of `✔`.
fn tag_token(tag: &str) -> &str {
    tag.split_whitespace().next().unwrap_or(tag)
}
