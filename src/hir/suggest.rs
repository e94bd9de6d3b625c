//! "Did you mean?" candidate ranking for unresolved names.
//!
//! Ranking is part of the diagnostic contract and must stay bit-for-bit
//! stable:
//!
//! 1. prefix matches in either direction (rank 0) before everything else (rank 1)
//! 2. ascending Levenshtein distance
//! 3. alphabetical

/// Levenshtein edit distance between two strings, counted in chars.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a_len = a.chars().count();
    let b_len = b.chars().count();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    // Two-row dynamic programming.
    let mut prev_row: Vec<usize> = (0..=b_len).collect();
    let mut curr_row: Vec<usize> = vec![0; b_len + 1];

    for (i, a_char) in a.chars().enumerate() {
        curr_row[0] = i + 1;

        for (j, b_char) in b.chars().enumerate() {
            let cost = usize::from(a_char != b_char);

            curr_row[j + 1] = (prev_row[j + 1] + 1) // deletion
                .min(curr_row[j] + 1) // insertion
                .min(prev_row[j] + cost); // substitution
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_len]
}

/// Rank key of one candidate: `(prefix rank, distance, name)`.
fn rank_key<'a>(name: &str, candidate: &'a str) -> (u8, usize, &'a str) {
    let prefix = candidate.starts_with(name) || name.starts_with(candidate);
    (u8::from(!prefix), edit_distance(name, candidate), candidate)
}

/// Return up to `limit` candidates ordered by the ranking contract.
///
/// The name itself is never suggested and duplicate candidates collapse.
pub fn rank_candidates<'a>(
    name: &str,
    candidates: impl IntoIterator<Item = &'a str>,
    limit: usize,
) -> Vec<&'a str> {
    let mut ranked: Vec<_> = candidates
        .into_iter()
        .filter(|c| !c.is_empty() && *c != name)
        .map(|c| rank_key(name, c))
        .collect();
    ranked.sort();
    ranked.dedup();
    ranked.into_iter().take(limit).map(|(_, _, c)| c).collect()
}
