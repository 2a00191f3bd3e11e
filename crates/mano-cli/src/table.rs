//! Plain-text tables for the terminal front end.

use mano_rs::{LogEntry, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// `+---+` borders.
    Grid,
    /// Box-drawing borders with a rule between rows.
    Fancy,
    /// Header, dashes, columns; no borders.
    Simple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    align: Vec<Align>,
}

impl Table {
    pub fn new() -> Self {
        Self { headers: Vec::new(), rows: Vec::new(), align: Vec::new() }
    }

    pub fn headers<I: IntoIterator<Item = S>, S: Into<String>>(mut self, h: I) -> Self {
        self.headers = h.into_iter().map(Into::into).collect();
        self
    }

    pub fn align(mut self, align: &[Align]) -> Self {
        self.align = align.to_vec();
        self
    }

    pub fn row<I: IntoIterator<Item = S>, S: Into<String>>(mut self, r: I) -> Self {
        self.rows.push(r.into_iter().map(Into::into).collect());
        self
    }

    fn columns(&self) -> usize {
        self.rows.iter().map(Vec::len).chain([self.headers.len()]).max().unwrap_or(0)
    }

    fn widths(&self) -> Vec<usize> {
        let mut w = vec![0usize; self.columns()];
        for r in self.rows.iter().chain([&self.headers]) {
            for (i, cell) in r.iter().enumerate() {
                for line in cell.lines() {
                    w[i] = w[i].max(line.chars().count());
                }
            }
        }
        w
    }

    fn cell_align(&self, col: usize) -> Align {
        self.align.get(col).copied().unwrap_or(Align::Left)
    }

    pub fn render(&self, style: Style) -> String {
        let widths = self.widths();
        let mut out = Vec::new();
        match style {
            Style::Simple => {
                if !self.headers.is_empty() {
                    out.extend(self.render_row(&self.headers, &widths, ("", "  ", "")));
                    out.push(widths.iter().map(|&w| "-".repeat(w)).collect::<Vec<_>>().join("  "));
                }
                for r in &self.rows {
                    out.extend(self.render_row(r, &widths, ("", "  ", "")));
                }
            }
            Style::Grid => {
                let rule = border(&widths, ("+", "+", "+"), '-');
                out.push(rule.clone());
                if !self.headers.is_empty() {
                    out.extend(self.render_row(&self.headers, &widths, ("| ", " | ", " |")));
                    out.push(border(&widths, ("+", "+", "+"), '='));
                }
                for r in &self.rows {
                    out.extend(self.render_row(r, &widths, ("| ", " | ", " |")));
                    out.push(rule.clone());
                }
            }
            Style::Fancy => {
                out.push(border(&widths, ("╒", "╤", "╕"), '═'));
                if !self.headers.is_empty() {
                    out.extend(self.render_row(&self.headers, &widths, ("│ ", " │ ", " │")));
                    out.push(border(&widths, ("╞", "╪", "╡"), '═'));
                }
                for (i, r) in self.rows.iter().enumerate() {
                    out.extend(self.render_row(r, &widths, ("│ ", " │ ", " │")));
                    if i + 1 < self.rows.len() {
                        out.push(border(&widths, ("├", "┼", "┤"), '─'));
                    }
                }
                out.push(border(&widths, ("╘", "╧", "╛"), '═'));
            }
        }
        out.join("\n")
    }

    // One physical line per line of the tallest cell.
    fn render_row(&self, row: &[String], widths: &[usize], (l, sep, r): (&str, &str, &str)) -> Vec<String> {
        let cells: Vec<Vec<&str>> = (0..widths.len())
            .map(|i| row.get(i).map(|c| c.lines().collect()).unwrap_or_default())
            .collect();
        let height = cells.iter().map(Vec::len).max().unwrap_or(0).max(1);
        (0..height)
            .map(|h| {
                let parts: Vec<String> = cells
                    .iter()
                    .enumerate()
                    .map(|(i, c)| pad(c.get(h).copied().unwrap_or(""), widths[i], self.cell_align(i)))
                    .collect();
                format!("{l}{}{r}", parts.join(sep))
            })
            .collect()
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

fn border(widths: &[usize], (l, mid, r): (&str, &str, &str), fill: char) -> String {
    let segs: Vec<String> = widths.iter().map(|&w| fill.to_string().repeat(w + 2)).collect();
    format!("{l}{}{r}", segs.join(mid))
}

fn pad(s: &str, width: usize, align: Align) -> String {
    let n = s.chars().count();
    let gap = width.saturating_sub(n);
    match align {
        Align::Left => format!("{s}{}", " ".repeat(gap)),
        Align::Right => format!("{}{s}", " ".repeat(gap)),
        Align::Center => {
            let left = gap / 2;
            format!("{}{s}{}", " ".repeat(left), " ".repeat(gap - left))
        }
    }
}

/// A message in a single bordered cell, padded with blank lines.
pub fn boxed(message: &str) -> String {
    format!("\n{}\n", Table::new().row([message]).render(Style::Grid))
}

pub fn registers(s: &Snapshot) -> String {
    let mut t = Table::new().headers(["Register", "Value"]).align(&[Align::Left, Align::Right]);
    for (r, v) in s.iter() {
        t = t.row([r.name().to_string(), v.to_string()]);
    }
    t.render(Style::Simple)
}

pub fn log_entries(entries: &[LogEntry]) -> String {
    let mut t = Table::new()
        .headers(["Timestamp", "Operation", "Register", "Value", "AR", "PC", "DR", "AC", "IR"])
        .align(&[Align::Left, Align::Left, Align::Left, Align::Right]);
    for e in entries {
        let regs = e.registers.iter().map(|(_, v)| format!("{v:#06x}"));
        let row: Vec<String> = [
            e.timestamp.clone(),
            e.operation.to_string(),
            e.register.to_string(),
            format!("{:#06x}", e.value),
        ]
        .into_iter()
        .chain(regs)
        .collect();
        t = t.row(row);
    }
    t.render(Style::Simple)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn grid_box() {
        assert_eq!(boxed("hi"), "\n+----+\n| hi |\n+----+\n");
    }

    #[test]
    fn multiline_cell_pads_each_line() {
        let t = Table::new().row(["ab\nc"]).render(Style::Grid);
        assert_eq!(t, "+----+\n| ab |\n| c  |\n+----+");
    }

    #[test]
    fn simple_register_table() {
        let s = Snapshot { ar: 0x102, pc: 4, ..Default::default() };
        let txt = registers(&s);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[0], "Register  Value");
        assert_eq!(lines[1], "--------  -----");
        assert_eq!(lines[2], "AR          258");
        assert_eq!(lines[3], "PC            4");
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn fancy_centered() {
        let t = Table::new().row(["1", "x"]).row(["10", "abc"]).align(&[Align::Center, Align::Center]);
        assert_eq!(
            t.render(Style::Fancy),
            "╒════╤═════╕\n│ 1  │  x  │\n├────┼─────┤\n│ 10 │ abc │\n╘════╧═════╛"
        );
    }
}
