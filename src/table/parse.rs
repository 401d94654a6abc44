// src/table/parse.rs

/// Split `text` into a header and data rows.
///
/// Trailing whitespace is trimmed first, then the text is split on `\n`
/// and every line on `separator`. The first line is always the header, so
/// an empty input yields a single empty column and no rows. No quoting: a
/// separator inside a field simply produces an extra field.
///
/// Because the trim runs over the whole text, a serialized table does not
/// always parse back unchanged: trailing empty rows are dropped, and so
/// are trailing whitespace fields on the last row when the separator is
/// itself whitespace.
pub fn parse_text(text: &str, separator: &str) -> (Vec<String>, Vec<Vec<String>>) {
    let mut lines = text
        .trim_end()
        .split('\n')
        .map(|line| split_line(line, separator));

    // `split` always yields at least one item
    let columns = lines.next().unwrap_or_else(|| vec![String::new()]);
    let rows = lines.collect();
    (columns, rows)
}

fn split_line(line: &str, separator: &str) -> Vec<String> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    line.split(separator).map(str::to_string).collect()
}

/// Join header and rows back into newline-delimited text.
pub fn serialize(columns: &[String], rows: &[Vec<String>], separator: &str) -> String {
    std::iter::once(columns)
        .chain(rows.iter().map(Vec::as_slice))
        .map(|fields| fields.join(separator))
        .collect::<Vec<_>>()
        .join("\n")
}
