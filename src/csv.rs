/// UTF-8 byte-order mark. Spreadsheet tools need it to pick the right
/// encoding for names and the rupee prefix.
pub const BOM: &str = "\u{FEFF}";

/// Escape one CSV field.
///
/// A value containing a comma, double quote, CR or LF is wrapped in double
/// quotes with inner quotes doubled. Anything else is written as is.
pub fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Escape raw values and join them into one record line (without terminator).
pub fn record<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fields
        .into_iter()
        .map(|f| escape_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Assemble a whole document: BOM, header, rows, `\r\n` line endings.
pub fn document(header: &[String], rows: &[Vec<String>]) -> String {
    let mut out = String::from(BOM);
    out.push_str(&record(header));
    out.push_str("\r\n");
    for row in rows {
        out.push_str(&record(row));
        out.push_str("\r\n");
    }
    out
}
