/// Overlap between the k-shingle sets of `query` and `doc`, normalized by
/// the query's own shingle count: how much of the query is covered by the
/// document. `k=4` by default; strings shorter than `k` are right-padded
/// with spaces first.
pub fn shingle_overlap_score(query: &str, doc: &str, k: usize) -> f64 {
    let query_shingles = shingles(&format!(" {} ", normalize(query)), k);
    if query_shingles.is_empty() {
        return 0.0;
    }
    let doc_shingles = shingles(&format!(" {} ", normalize(doc)), k);

    let intersection = query_shingles.intersection(&doc_shingles).count();
    intersection as f64 / query_shingles.len() as f64
}

fn normalize(s: &str) -> String {
    let lowered = s.to_lowercase();
    let alphanumeric_and_space: String = lowered
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    alphanumeric_and_space
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn shingles(s: &str, k: usize) -> std::collections::HashSet<String> {
    let chars: Vec<char> = s.chars().collect();
    let padded: Vec<char> = if chars.len() < k {
        let mut padded = chars;
        padded.resize(k, ' ');
        padded
    } else {
        chars
    };
    (0..=padded.len() - k)
        .map(|i| padded[i..i + k].iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_one() {
        let score = shingle_overlap_score("moonlight diner", "moonlight diner", 4);
        assert!((score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unrelated_strings_score_low() {
        let score = shingle_overlap_score("moonlight diner", "zzzzzzzzzzzzzzzz", 4);
        assert!(score < 0.2);
    }

    #[test]
    fn empty_query_scores_zero() {
        assert_eq!(shingle_overlap_score("", "anything", 4), 0.0);
    }

    #[test]
    fn normalization_strips_punctuation_and_case() {
        let a = shingle_overlap_score("Moonlight, Diner!", "moonlight diner", 4);
        let b = shingle_overlap_score("moonlight diner", "moonlight diner", 4);
        assert!((a - b).abs() < f64::EPSILON);
    }
}
