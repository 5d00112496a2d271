use crate::cli::output::current_preferences;

/// Describes how a column should align its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    pub header: &'static str,
    pub max_width: Option<usize>,
    pub alignment: Alignment,
}

impl TableColumn {
    pub const fn left(header: &'static str) -> Self {
        Self {
            header,
            max_width: None,
            alignment: Alignment::Left,
        }
    }

    pub const fn right(header: &'static str) -> Self {
        Self {
            header,
            max_width: None,
            alignment: Alignment::Right,
        }
    }

    pub fn capped(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }
}

/// Column-aligned text table.
pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<TableColumn>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let mut width = column.header.chars().count();
                for row in &self.rows {
                    if let Some(cell) = row.get(idx) {
                        width = width.max(cell.chars().count());
                    }
                }
                match column.max_width {
                    Some(max) => width.min(max),
                    None => width,
                }
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let widths = self.compute_widths();
        let plain = current_preferences().plain_mode;
        let mut lines = Vec::with_capacity(self.rows.len() + 2);

        let header: Vec<String> = self.columns.iter().map(|c| c.header.to_string()).collect();
        lines.push(self.render_row(&header, &widths));
        let rule = if plain { "-" } else { "─" };
        let total = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        lines.push(rule.repeat(total));

        for row in &self.rows {
            lines.push(self.render_row(row, &widths));
        }
        lines.join("\n")
    }

    fn render_row(&self, row: &[String], widths: &[usize]) -> String {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let text = row.get(idx).map(String::as_str).unwrap_or("");
                render_cell(text, widths[idx], column.alignment)
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    }
}

fn truncate_text(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut kept: String = text.chars().take(width - 1).collect();
    kept.push('…');
    kept
}

fn render_cell(text: &str, width: usize, alignment: Alignment) -> String {
    let fitted = truncate_text(text, width);
    let pad = width.saturating_sub(fitted.chars().count());
    match alignment {
        Alignment::Left => format!("{fitted}{}", " ".repeat(pad)),
        Alignment::Right => format!("{}{fitted}", " ".repeat(pad)),
    }
}
