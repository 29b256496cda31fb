/// Renders a pipe table: header row, separator, one line per row.
pub fn pipe_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(pipe_row(headers));
    lines.push(pipe_row(&vec!["---".to_string(); headers.len()]));
    for row in rows {
        lines.push(pipe_row(row));
    }
    lines.join("\n")
}

fn pipe_row(cells: &[String]) -> String {
    let escaped: Vec<String> = cells
        .iter()
        .map(|cell| cell.replace('|', "\\|").replace('\n', " "))
        .collect();
    format!("| {} |", escaped.join(" | "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_header_separator_and_rows() {
        let table = pipe_table(
            &["name".into(), "dept".into()],
            &[vec!["Ana".into(), "".into()], vec!["B|C".into(), "Ops".into()]],
        );
        assert_eq!(
            table,
            "| name | dept |\n| --- | --- |\n| Ana |  |\n| B\\|C | Ops |"
        );
    }
}
