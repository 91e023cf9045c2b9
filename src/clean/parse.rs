//! Parsers for the messy string fields of a raw listings extract.
//!
//! Both parsers are total: any input that cannot be interpreted yields
//! `None` (a missing value), never an error. The downstream filter stage
//! drops rows with missing price/area uniformly, so parse failures need no
//! special handling at call sites.

/// Parse a price string into rupees.
///
/// Recognized forms:
///
/// - `"50 Cr"` → 50 × 1e7 (crore)
/// - `"5 Lakh"` / `"5 Lac"` / `"5 Lacs"` → 5 × 1e5 (lakh)
/// - `"7,500,000"` → plain number with thousands separators
///
/// The `Cr`/`Lac`/`Lakh`/`Lacs` tokens are matched case-sensitively, as they
/// appear in the source data. Empty strings and `nan` literals are missing.
pub fn parse_price(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("nan") {
        return None;
    }

    if s.contains("Cr") {
        return parse_plain(&s.replace("Cr", "")).map(|v| v * 1e7);
    }
    if s.contains("Lac") || s.contains("Lakh") {
        // Strip the longer token first so `Lacs` does not leave a stray `s`.
        let stripped = s.replace("Lacs", "").replace("Lakh", "").replace("Lac", "");
        return parse_plain(&stripped).map(|v| v * 1e5);
    }

    parse_plain(s)
}

/// Parse an area string into square feet.
///
/// Takes the longest run of digits, `.` and `,` characters found anywhere in
/// the string (so `"1,200 sq.ft"` → 1200.0), strips separators, and parses.
/// A string with no digit-bearing run is missing.
pub fn parse_area(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("nan") {
        return None;
    }

    let mut best: Option<&str> = None;
    let mut start: Option<usize> = None;
    for (i, ch) in s.char_indices() {
        let numeric = ch.is_ascii_digit() || ch == '.' || ch == ',';
        match (numeric, start) {
            (true, None) => start = Some(i),
            (false, Some(st)) => {
                best = longest_digit_run(best, &s[st..i]);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(st) = start {
        best = longest_digit_run(best, &s[st..]);
    }

    parse_plain(best?)
}

/// Keep whichever candidate run is longer, ignoring runs without any digit
/// (a bare `.` from `sq.ft` is not a number).
fn longest_digit_run<'a>(best: Option<&'a str>, candidate: &'a str) -> Option<&'a str> {
    if !candidate.chars().any(|c| c.is_ascii_digit()) {
        return best;
    }
    match best {
        Some(b) if b.len() >= candidate.len() => Some(b),
        _ => Some(candidate),
    }
}

/// Strip thousands separators and whitespace, then parse as `f64`.
/// Non-finite results count as parse failures.
fn parse_plain(s: &str) -> Option<f64> {
    let v = s.replace(',', "").trim().parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
