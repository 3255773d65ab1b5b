//! "Did you mean" suggestions for schema mistakes.

/// Levenshtein distance between two strings, in characters.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();

    // Single rolling row: `row[j]` is the distance between the current
    // prefix of `a` and the first `j` chars of `b`.
    let mut row: Vec<usize> = (0..=b_chars.len()).collect();
    for (i, a_char) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let substitution = diagonal + usize::from(a_char != *b_char);
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(diagonal + 1);
        }
    }
    row[b_chars.len()]
}

/// The closest candidate within two edits, if any.
pub fn find_closest<'a>(unknown: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .map(|&candidate| (candidate, levenshtein_distance(unknown, candidate)))
        .filter(|(_, distance)| *distance <= 2)
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

pub fn format_unknown_key_error(unknown: &str, valid: &[&str]) -> String {
    let mut msg = format!("unknown descriptor key `{unknown}`");
    if let Some(suggestion) = find_closest(unknown, valid) {
        msg.push_str(&format!("\n\nDid you mean `{suggestion}`?"));
    }
    msg.push_str("\n\nValid keys are: ");
    msg.push_str(&valid.join(", "));
    msg
}

pub fn format_duplicate_error(attribute: &str) -> String {
    format!("attribute `{attribute}` is declared more than once")
}
