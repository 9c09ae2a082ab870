//! Aligned plain-text tables

use owo_colors::OwoColorize;
use std::fmt::Write as _;

/// Column alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Pad on the right
    Left,
    /// Pad on the left
    Right,
}

/// A table built row by row and rendered with padded columns.
///
/// # Example
/// ```
/// use nearby_cli::table::{Align, Table};
///
/// let mut table = Table::new(&[("#", Align::Right), ("name", Align::Left)]);
/// table.row(vec!["1".into(), "Cafe".into()]);
/// assert!(table.render_plain().contains("Cafe"));
/// ```
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<(String, Align)>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates a table with the given header labels
    pub fn new(headers: &[(&str, Align)]) -> Self {
        Self {
            headers: headers.iter().map(|(h, a)| (h.to_string(), *a)).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row; missing cells render empty, extra cells are dropped
    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when no rows were added
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, (header, _))| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    fn line(&self, cells: &[String], widths: &[usize]) -> String {
        let mut line = String::new();
        for (i, ((_, align), width)) in self.headers.iter().zip(widths).enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            if i > 0 {
                line.push_str("  ");
            }
            let _ = match align {
                Align::Left => write!(line, "{:<width$}", cell, width = width),
                Align::Right => write!(line, "{:>width$}", cell, width = width),
            };
        }
        line.trim_end().to_string()
    }

    /// Renders without colors
    pub fn render_plain(&self) -> String {
        let widths = self.widths();
        let header: Vec<String> = self.headers.iter().map(|(h, _)| h.clone()).collect();

        let mut out = self.line(&header, &widths);
        for row in &self.rows {
            out.push('\n');
            out.push_str(&self.line(row, &widths));
        }
        out
    }

    /// Prints to stdout with a bold header row
    pub fn print(&self) {
        let rendered = self.render_plain();
        let mut lines = rendered.lines();
        if let Some(header) = lines.next() {
            println!("{}", header.bold());
        }
        for line in lines {
            println!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment() {
        let mut table = Table::new(&[("#", Align::Right), ("name", Align::Left), ("km", Align::Right)]);
        table.row(vec!["1".into(), "Bakery".into(), "0.45".into()]);
        table.row(vec!["10".into(), "Cafe".into(), "12.30".into()]);

        let rendered = table.render_plain();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], " #  name       km");
        assert_eq!(lines[1], " 1  Bakery   0.45");
        assert_eq!(lines[2], "10  Cafe    12.30");
    }

    #[test]
    fn test_short_rows() {
        let mut table = Table::new(&[("a", Align::Left), ("b", Align::Left)]);
        table.row(vec!["x".into()]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.render_plain().lines().nth(1), Some("x"));
    }
}
