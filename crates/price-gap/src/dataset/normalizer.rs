/// Folds a column header into its lookup form: invisible characters removed,
/// whitespace collapsed, lowercase.
pub(crate) fn normalize_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}', '\u{00a0}'], " ");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

/// Trims a text cell, treating blanks and missing markers as absent.
pub(crate) fn normalize_text(value: &str) -> Option<String> {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() || collapsed.eq_ignore_ascii_case("n/a") || collapsed == "-" {
        None
    } else {
        Some(collapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_loses_bom_and_extra_whitespace() {
        let source = "\u{feff}Government  Unit Price 2026 (million VND/m²)";
        assert_eq!(
            normalize_header(source),
            "government unit price 2026 (million vnd/m²)"
        );
    }

    #[test]
    fn text_cells_collapse_to_none_when_blank() {
        assert_eq!(normalize_text("  Le   Loi "), Some("Le Loi".to_string()));
        assert_eq!(normalize_text("   "), None);
        assert_eq!(normalize_text("N/A"), None);
    }
}
