//! Plain-text column table

use std::fmt;

#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Rows shorter than the header are padded with blanks; extra cells are cut
    pub fn push_row(&mut self, mut cells: Vec<String>) {
        cells.resize(self.headers.len(), String::new());
        self.rows.push(cells);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                self.rows
                    .iter()
                    .map(|r| r[i].chars().count())
                    .chain(std::iter::once(h.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}

fn write_line(f: &mut fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> fmt::Result {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(f, "{}", line.trim_end())
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        write_line(f, &self.headers, &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_line(f, &rule, &widths)?;
        for row in &self.rows {
            write_line(f, row, &widths)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_aligned() {
        let mut table = Table::new(&["Name", "ID"]);
        table.push_row(vec!["Brass: Birmingham".into(), "12".into()]);
        table.push_row(vec!["Azul".into(), "3".into()]);
        let out = table.to_string();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Name               ID");
        assert_eq!(lines[1], "-----------------  --");
        assert_eq!(lines[2], "Brass: Birmingham  12");
        assert_eq!(lines[3], "Azul               3");
    }

    #[test]
    fn test_short_rows_padded() {
        let mut table = Table::new(&["A", "B", "C"]);
        table.push_row(vec!["x".into()]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.to_string().lines().nth(2), Some("x"));
    }

    #[test]
    fn test_unicode_width_by_chars() {
        let mut table = Table::new(&["Name"]);
        table.push_row(vec!["Café".into()]);
        assert_eq!(table.to_string().lines().nth(1), Some("----"));
    }

    #[test]
    fn test_empty_table_has_header_only() {
        let table = Table::new(&["Date", "Winner"]);
        assert!(table.is_empty());
        assert_eq!(table.to_string().lines().count(), 2);
    }
}
