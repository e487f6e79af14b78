use std::collections::HashSet;

/// Curly apostrophe -> ASCII, uppercase. Shared with query building so the
/// feed's `dba` filter sees the same spelling the tokenizer does.
pub fn normalize_name(text: &str) -> String {
    text.replace('\u{2019}', "'").to_uppercase()
}

/// Uppercased word set, split on anything that is not alphanumeric.
pub fn tokenize(text: &str) -> HashSet<String> {
    normalize_name(text)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Number of shared tokens. Not normalised by either set's size.
pub fn overlap(a: &HashSet<String>, b: &HashSet<String>) -> usize {
    a.intersection(b).count()
}
