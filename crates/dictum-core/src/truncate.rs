use dictum_types::TailSpec;
use unicode_normalization::UnicodeNormalization;

/// Shorten `text` to `limit` characters, eliding the middle with `ellipsis`.
///
/// Characters are counted after canonical composition, so a letter followed by
/// a combining accent counts once and is never split. The unit is still the
/// scalar value, not the grapheme cluster: flags, ZWJ emoji sequences and
/// marks with no precomposed form count as several characters and may be cut
/// between them. Text that already fits is returned untouched. With an empty
/// ellipsis the text is simply cut.
///
/// `tail` decides how many trailing characters survive: `Chars(n)` keeps
/// exactly `n`, `Ratio(r)` keeps `ceil(r * budget)` where the budget is what
/// remains of `limit` after the ellipsis.
pub fn truncate(text: &str, limit: usize, ellipsis: &str, tail: TailSpec) -> String {
    let chars: Vec<char> = text.nfc().collect();

    if chars.len() <= limit {
        return text.to_string();
    }

    if ellipsis.is_empty() {
        return chars[..limit].iter().collect();
    }

    let budget = limit.saturating_sub(ellipsis.nfc().count());
    let tail_len = match tail {
        TailSpec::Chars(n) => n,
        TailSpec::Ratio(ratio) => (ratio * budget as f64).ceil().max(0.0) as usize,
    };
    let head_len = budget.saturating_sub(tail_len);

    // Head and tail may overlap when the tail asks for more than the budget.
    let head = &chars[..head_len.min(chars.len())];
    let tail = &chars[chars.len() - tail_len.min(chars.len())..];

    let mut out = String::with_capacity(text.len());
    out.extend(head);
    out.push_str(ellipsis);
    out.extend(tail);
    out
}
