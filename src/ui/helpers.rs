use std::io::{self, Write};

use anyhow::{bail, Context, Error, Result};

/// Print a label, flush, and read one trimmed line from stdin. A closed input
/// stream becomes an error so the menu loop can terminate instead of spinning
/// on empty reads.
pub(crate) fn prompt(label: &str) -> Result<String> {
    print!("{label}: ");
    io::stdout().flush().context("failed to flush prompt")?;

    let mut line = String::new();
    let bytes = io::stdin()
        .read_line(&mut line)
        .context("failed to read input")?;
    if bytes == 0 {
        bail!("input stream closed");
    }
    Ok(line.trim().to_string())
}

/// Prompt for an integer. Typed columns (pilot id, gate count) need a real
/// number to bind; anything else reports through the handler's error path.
pub(crate) fn prompt_i64(label: &str) -> Result<i64> {
    let raw = prompt(label)?;
    raw.parse()
        .with_context(|| format!("'{raw}' is not a whole number"))
}

/// Render a nullable column value, leaving the cell blank for NULL.
pub(crate) fn cell<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(T::to_string).unwrap_or_default()
}

/// Assemble a bordered text grid with a header row. Column widths grow to the
/// widest cell so departure strings and long city names stay aligned.
pub(crate) fn render_grid(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths = column_widths(headers, rows);

    let mut border = String::from("+");
    for width in &widths {
        border.push_str(&"-".repeat(width + 2));
        border.push('+');
    }

    let format_row = |cells: &[String]| {
        let mut line = String::from("|");
        for (idx, width) in widths.iter().copied().enumerate() {
            let content = cells.get(idx).map(String::as_str).unwrap_or("");
            line.push_str(&format!(" {content:<width$} |"));
        }
        line
    };

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut out = String::new();
    out.push_str(&border);
    out.push('\n');
    out.push_str(&format_row(&header_cells));
    out.push('\n');
    out.push_str(&border);
    out.push('\n');
    for row in rows {
        out.push_str(&format_row(row));
        out.push('\n');
    }
    out.push_str(&border);
    out.push('\n');
    out
}

/// Assemble a borderless two-space-separated table, used for the short pilot
/// reference list where a full grid would be noise.
pub(crate) fn render_simple(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths = column_widths(headers, rows);

    let format_row = |cells: &[&str]| {
        let mut line = String::new();
        for (idx, width) in widths.iter().copied().enumerate() {
            let content = cells.get(idx).copied().unwrap_or("");
            if idx + 1 == widths.len() {
                line.push_str(content);
            } else {
                line.push_str(&format!("{content:<width$}  "));
            }
        }
        line.trim_end().to_string()
    };

    let mut out = String::new();
    out.push_str(&format_row(headers));
    out.push('\n');
    let rules: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let rule_cells: Vec<&str> = rules.iter().map(String::as_str).collect();
    out.push_str(&format_row(&rule_cells));
    out.push('\n');
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&format_row(&cells));
        out.push('\n');
    }
    out
}

fn column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            if idx < widths.len() && cell.len() > widths[idx] {
                widths[idx] = cell.len();
            }
        }
    }
    widths
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_pads_columns_to_the_widest_cell() {
        let rows = vec![
            vec!["1".to_string(), "AA101".to_string()],
            vec!["2".to_string(), "BA2".to_string()],
        ];
        let grid = render_grid(&["ID", "Code"], &rows);
        let lines: Vec<&str> = grid.lines().collect();

        assert_eq!(lines[0], "+----+-------+");
        assert_eq!(lines[1], "| ID | Code  |");
        assert_eq!(lines[3], "| 1  | AA101 |");
        assert_eq!(lines.last(), Some(&"+----+-------+"));
    }

    #[test]
    fn simple_table_keeps_header_rule_aligned() {
        let rows = vec![vec!["12".to_string(), "A. Earhart".to_string()]];
        let table = render_simple(&["ID", "Name"], &rows);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "ID  Name");
        assert_eq!(lines[1], "--  ----------");
        assert_eq!(lines[2], "12  A. Earhart");
    }

    #[test]
    fn null_cells_render_blank() {
        assert_eq!(cell(&Some(7_i64)), "7");
        assert_eq!(cell::<i64>(&None), "");
    }
}
