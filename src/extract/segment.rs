/// Splits a card's text into trimmed, non-empty lines, preserving order.
pub fn segment(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_blank_lines_and_trims() {
        let lines = segment("  Mabel Matiz \n\n\t\nCongresium Ankara\r\n  24 Aralık ");
        assert_eq!(lines, vec!["Mabel Matiz", "Congresium Ankara", "24 Aralık"]);
    }

    #[test]
    fn whitespace_only_text_yields_nothing() {
        assert!(segment("   \n \t \r\n").is_empty());
        assert!(segment("").is_empty());
    }
}
