//! Reference-id grammar and the anchor rule derived from it.
//!
//! A reference id names one fragment of an act: an act code followed by two
//! numeric components, e.g. `CA1961-160-1`. One act in the corpus carries the
//! literal `BILL-SCDRAFT` prefix instead of a plain letter run; the grammar
//! admits it as a fixed alternate.
//!
//! The same production is used to extract ids from free text and to validate
//! them, so the two can never disagree.

use std::sync::LazyLock;

use regex::{Match, Regex};

/// The one act-code prefix that is not a plain uppercase letter run.
pub const ALTERNATE_PREFIX: &str = "BILL-SCDRAFT";

static REFERENCE_BODY: LazyLock<String> = LazyLock::new(|| {
    format!(
        r"(?:[A-Z]{{1,15}}\d{{1,10}}|{}\d{{1,10}})-\d{{1,7}}-\d{{1,5}}",
        regex::escape(ALTERNATE_PREFIX)
    )
});

static REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&REFERENCE_BODY).expect("reference pattern is valid"));

static REFERENCE_EXACT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{}$", *REFERENCE_BODY)).expect("reference pattern is valid")
});

/// Dash variants folded to ASCII hyphen when deriving an anchor.
const DASH_VARIANTS: [char; 6] = [
    '\u{2013}', '\u{2014}', '\u{2212}', '\u{2012}', '\u{2010}', '\u{2043}',
];

/// All reference-id matches in `text`, left to right, non-overlapping.
pub fn find_references(text: &str) -> impl Iterator<Item = Match<'_>> {
    REFERENCE.find_iter(text)
}

/// Whether `candidate` is exactly one reference id.
#[must_use]
pub fn is_reference(candidate: &str) -> bool {
    REFERENCE_EXACT.is_match(candidate)
}

/// In-document anchor for a reference id.
///
/// Folds dash variants to `-`, lowercases, then separates a leading letter run
/// from a directly following digit run with a hyphen:
/// `ABC123-45-6` becomes `abc-123-45-6`.
#[must_use]
pub fn anchor_for(reference: &str) -> String {
    let folded: String = reference
        .chars()
        .map(|c| if DASH_VARIANTS.contains(&c) { '-' } else { c })
        .collect::<String>()
        .to_lowercase();

    let letters = folded
        .bytes()
        .take_while(u8::is_ascii_lowercase)
        .count();
    let digit_follows = folded
        .as_bytes()
        .get(letters)
        .is_some_and(u8::is_ascii_digit);

    if letters > 0 && digit_follows {
        format!("{}-{}", &folded[..letters], &folded[letters..])
    } else {
        folded
    }
}

/// Top-level document token of a fragment name: everything before the first `-`.
#[must_use]
pub fn document_prefix(name: &str) -> &str {
    name.split_once('-').map_or(name, |(prefix, _)| prefix)
}
