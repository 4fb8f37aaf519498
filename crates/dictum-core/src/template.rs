pub const HEADWORD: &str = "<headword>";
pub const DATABASE: &str = "<database>";
pub const DEFINITION: &str = "<definition>";
pub const MATCHES: &str = "<matches>";
pub const PHRASE: &str = "<phrase>";
pub const STRATEGY: &str = "<strategy>";
pub const DATABASES: &str = "<databases>";
pub const ID: &str = "<id>";
pub const DESCRIPTION: &str = "<description>";

/// Substitute placeholders in `template`, one binding at a time, in order.
///
/// Each pass runs over the output of the previous one, so a value that
/// contains a placeholder not yet processed gets substituted as well.
/// Placeholders are plain literals; nothing is escaped.
// FIXME: the re-substitution of earlier values is almost certainly accidental,
// but templates in the wild may rely on it. Keep it until someone decides.
pub fn render(template: &str, bindings: &[(&str, &str)]) -> String {
    bindings
        .iter()
        .filter(|(placeholder, _)| !placeholder.is_empty())
        .fold(template.to_string(), |acc, (placeholder, value)| {
            acc.replace(placeholder, value)
        })
}
