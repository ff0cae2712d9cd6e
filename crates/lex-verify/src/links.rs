//! Rewrites reference ids in response text into in-document anchor links.

use lex_core::{anchor_for, find_references};

/// Turn every reference id in `text` into `[id](#anchor)`.
///
/// An id already wrapped in square brackets keeps a single pair: the existing
/// brackets become the link text brackets.
#[must_use]
pub fn format_links(text: &str) -> String {
    let mut replacements: Vec<(usize, usize, String)> = find_references(text)
        .map(|m| {
            let reference = m.as_str();
            let link = format!("[{reference}](#{})", anchor_for(reference));
            let bracketed =
                text[..m.start()].ends_with('[') && text[m.end()..].starts_with(']');
            if bracketed {
                (m.start() - 1, m.end() + 1, link)
            } else {
                (m.start(), m.end(), link)
            }
        })
        .collect();

    // Highest offset first so the spans still to be applied stay valid.
    replacements.sort_by(|a, b| b.0.cmp(&a.0));

    let mut result = text.to_string();
    for (start, end, link) in replacements {
        result.replace_range(start..end, &link);
    }
    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("See ABC123-45-6 for details", "See [ABC123-45-6](#abc-123-45-6) for details")]
    #[case("See [ABC123-45-6] here", "See [ABC123-45-6](#abc-123-45-6) here")]
    #[case("[ABC123-45-6 only opens", "[[ABC123-45-6](#abc-123-45-6) only opens")]
    #[case(
        "BILL-SCDRAFT7-1-2 cites CA1961-160-1.",
        "[BILL-SCDRAFT7-1-2](#bill-scdraft7-1-2) cites [CA1961-160-1](#ca-1961-160-1)."
    )]
    #[case("no references here", "no references here")]
    #[case("", "")]
    fn rewrites_references(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(format_links(input), expected);
    }

    #[test]
    fn every_occurrence_is_linked() {
        let text = "[X1-1-1] and X1-1-1 and [X1-1-1]";
        assert_eq!(
            format_links(text),
            "[X1-1-1](#x-1-1-1) and [X1-1-1](#x-1-1-1) and [X1-1-1](#x-1-1-1)"
        );
    }

    #[test]
    fn multibyte_text_keeps_offsets() {
        let text = "Voir « CA1961-160-1 » et [SA2002-8-1].";
        assert_eq!(
            format_links(text),
            "Voir « [CA1961-160-1](#ca-1961-160-1) » et [SA2002-8-1](#sa-2002-8-1)."
        );
    }
}
