//! Shared helpers for mangle's integration tests: golden fixture loading, template
//! snapshots and line diffs.

pub mod golden;
pub mod snapshot;

/// Escapes control characters, quotes and backslashes so snapshot lines stay one line.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch < ' ' => {
                use std::fmt::Write;
                let _ = write!(&mut out, "\\u{{{:02X}}}", ch as u32);
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Human-readable report of the first mismatching line, with two lines of context.
pub fn diff_lines(expected: &[String], actual: &[String]) -> String {
    use std::fmt::Write;
    fn line(lines: &[String], i: usize) -> &str {
        lines.get(i).map(String::as_str).unwrap_or("<missing>")
    }
    let max = expected.len().max(actual.len());
    let mismatch = (0..max).find(|&i| line(expected, i) != line(actual, i));

    let mut out = String::new();
    match mismatch {
        Some(i) => {
            let start = i.saturating_sub(2);
            let end = (i + 3).min(max);
            let _ = writeln!(
                &mut out,
                "first mismatch at line {} (showing {}..={}):",
                i + 1,
                start + 1,
                end
            );
            for idx in start..end {
                let marker = if idx == i { ">" } else { " " };
                let (left, right) = (line(expected, idx), line(actual, idx));
                let _ = writeln!(&mut out, "{marker} {:>4}  expected: {left}", idx + 1);
                let _ = writeln!(&mut out, "{marker} {:>4}    actual: {right}", idx + 1);
            }
        }
        None if expected.len() != actual.len() => {
            let _ = writeln!(&mut out, "prefix matched but lengths differ");
        }
        None => {}
    }
    let _ = writeln!(
        &mut out,
        "expected {} lines, actual {} lines",
        expected.len(),
        actual.len()
    );
    out
}
