//! Table formatting for terminal display.
//!
//! Aligns rows of cells into columns the way a tab writer does: every column
//! but the last is padded to its widest cell plus a fixed gap. Widths are
//! measured on the visible text, so cells carrying color sequences line up
//! with plain ones.

use crate::ansi::visible_width;

/// Spaces between two columns.
pub const COLUMN_PADDING: usize = 2;

/// Widest visible cell per column. The last column is left out because it
/// is never padded.
#[inline]
fn column_widths(rows: &[Vec<String>]) -> Vec<usize> {
    let ncols = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; ncols.saturating_sub(1)];

    for row in rows {
        for (col_idx, cell) in row.iter().enumerate().take(widths.len()) {
            widths[col_idx] = widths[col_idx].max(visible_width(cell));
        }
    }

    widths
}

/// Format rows into aligned lines. Trailing blanks are trimmed from each line.
#[tracing::instrument(skip(rows), fields(row_count = rows.len()))]
pub fn format_table(rows: &[Vec<String>]) -> Vec<String> {
    let widths = column_widths(rows);
    let total_width: usize = widths.iter().map(|w| w + COLUMN_PADDING).sum();

    rows.iter()
        .map(|row| {
            let mut line = String::with_capacity(total_width);
            for (col_idx, cell) in row.iter().enumerate() {
                line.push_str(cell);
                if let Some(width) = widths.get(col_idx) {
                    let pad = width - visible_width(cell) + COLUMN_PADDING;
                    line.push_str(&" ".repeat(pad));
                }
            }
            line.truncate(line.trim_end().len());
            line
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ansi::{strip_ansi, AnsiFormatter};

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_format_empty_table() {
        assert!(format_table(&[]).is_empty());
    }

    #[test]
    fn test_format_simple_table() {
        let lines = format_table(&[row(&["NAME", "STATUS"]), row(&["test-pod", "Running"])]);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "NAME      STATUS");
        assert_eq!(lines[1], "test-pod  Running");
    }

    #[test]
    fn test_trailing_empty_cells_are_trimmed() {
        let lines = format_table(&[row(&["NAME", "INFO"]), row(&["a", ""])]);
        assert_eq!(lines[1], "a");
    }

    #[test]
    fn test_colored_cells_align_with_plain_ones() {
        let color = AnsiFormatter::with_color(true);
        let plain = AnsiFormatter::with_color(false);

        let table = |fmt: &AnsiFormatter| {
            format_table(&[
                row(&["NAME", "STATUS", "INFO"]),
                vec!["guestbook".into(), fmt.colorize("✔"), fmt.colorize("stable")],
                vec!["└──pod".into(), fmt.colorize("◌"), fmt.colorize("canary")],
            ])
        };

        let colored: Vec<String> = table(&color)
            .iter()
            .map(|l| strip_ansi(l).into_owned())
            .collect();
        assert_eq!(colored, table(&plain));
    }

    #[test]
    fn test_wide_box_drawing_prefix_counts_once_per_char() {
        let lines = format_table(&[row(&["NAME", "KIND"]), row(&["   └──□pod", "Pod"])]);
        let kind_col = lines[0].find("KIND").unwrap();
        assert_eq!(lines[1].chars().position(|c| c == 'P'), Some(kind_col));
    }
}
