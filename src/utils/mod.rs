/// Renders an engagement count with thousands separators, e.g. `1234567` as `1,234,567`.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let lead = match digits.len() % 3 {
        0 => 3,
        n => n,
    };

    let mut groups = vec![&digits[..lead]];
    groups.extend(
        digits.as_bytes()[lead..]
            .chunks(3)
            .filter_map(|group| std::str::from_utf8(group).ok()),
    );
    groups.join(",")
}

/// Returns `true` when the text has nothing but whitespace in it.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
