//! Latin fallback for debtor names.

/// Replacement table, applied in order.
const FOLDS: [(char, &str); 7] = [
    ('ä', "ae"),
    ('ö', "oe"),
    ('ü', "ue"),
    ('Ä', "AE"),
    ('Ö', "OE"),
    ('Ü', "UE"),
    ('ß', "ss"),
];

/// Fold German umlauts and ß to their two-letter ASCII spelling.
///
/// Matching is case-sensitive and no other character is touched, so accented
/// letters such as `é` pass through unchanged.
///
/// ```
/// use lastschrift::core::fold_umlauts;
///
/// assert_eq!(fold_umlauts("Müller Straße"), "Mueller Strasse");
/// ```
pub fn fold_umlauts(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match FOLDS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => out.push_str(to),
            None => out.push(c),
        }
    }
    out
}
