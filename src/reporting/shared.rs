pub(crate) fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

/// Fixed-precision score for tables.
pub(crate) fn score(value: f64) -> String {
    format!("{value:.4}")
}

/// Pads or truncates `text` to exactly `width` characters.
pub(crate) fn cell(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count > width {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('~');
        cut
    } else {
        format!("{text:<width$}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_truncates_long_ids() {
        assert_eq!(cell("abcdef", 4), "abc~");
        assert_eq!(cell("ab", 4), "ab  ");
    }
}
