use tradeviz_core::{AugmentedSeries, CloseTable};
use tradeviz_indicators::{ColumnSummary, StudyFailure};

const WIDTH: usize = 14;

fn cell(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:>WIDTH$.4}", v),
        None => format!("{:>WIDTH$}", "-"),
    }
}

fn header(first: &str, names: &[&str]) -> String {
    let mut line = format!("{:<12}", first);
    for name in names {
        line.push_str(&format!("{:>WIDTH$}", name));
    }
    line
}

/// The last `rows` bars: date, close and every indicator column.
pub fn latest_rows(augmented: &AugmentedSeries, rows: usize) -> String {
    let series = augmented.series();
    let closes = series.close();
    let mut names = vec!["close"];
    names.extend(augmented.column_names());

    let mut lines = vec![header("date", &names)];
    for row in series.len().saturating_sub(rows)..series.len() {
        let mut line = format!("{:<12}", series.index()[row].format("%Y-%m-%d"));
        line.push_str(&cell(closes.map(|c| c[row])));
        for column in augmented.columns() {
            line.push_str(&cell(column.get(row)));
        }
        lines.push(line);
    }
    lines.join("\n")
}

pub fn summary_table(summaries: &[ColumnSummary]) -> String {
    let names = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];
    let mut lines = vec![header("column", &names)];
    for s in summaries {
        let mut line = format!("{:<12}{:>WIDTH$}", s.column, s.count);
        for value in [s.mean, s.std, s.min, s.p25, s.median, s.p75, s.max] {
            line.push_str(&cell(value));
        }
        lines.push(line);
    }
    lines.join("\n")
}

/// The last `rows` dates of a close table, one column per symbol.
pub fn close_table(table: &CloseTable, rows: usize) -> String {
    let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
    let mut lines = vec![header("date", &names)];
    for row in table.index.len().saturating_sub(rows)..table.index.len() {
        let mut line = format!("{:<12}", table.index[row].format("%Y-%m-%d"));
        for column in &table.columns {
            line.push_str(&cell(column.get(row)));
        }
        lines.push(line);
    }
    lines.join("\n")
}

pub fn failures(failures: &[StudyFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("  skipped {}: {}", f.study, f.error))
        .collect::<Vec<_>>()
        .join("\n")
}
