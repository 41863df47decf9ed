use crate::types::{Miscue, MiscueKind};

/// Normalize one token for comparison: trim surrounding punctuation,
/// lowercase. Comparison is positional and case-insensitive; the original
/// word forms are what miscues report.
pub fn normalize_token(token: &str) -> String {
    token
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

/// Split text into word tokens, preserving original forms.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(|w| w.to_string()).collect()
}

/// Aligns a transcript against the reference word sequence and reports every
/// non-matching position as a miscue.
///
/// Word-level minimum-edit-distance alignment: unit cost for substitution,
/// insertion and deletion, zero cost for a match. When several minimum-cost
/// paths exist the diagonal wins, so a mismatched pair is reported as one
/// substitution rather than an insertion plus a deletion.
///
/// Miscues come back ordered by reference position, insertions anchored
/// right after the reference token they follow. `align(x, x)` is empty for
/// any token sequence `x`.
pub fn align(reference: &[String], transcript: &[String]) -> Vec<Miscue> {
    let m = reference.len();
    let n = transcript.len();

    let ref_norm: Vec<String> = reference.iter().map(|w| normalize_token(w)).collect();
    let hyp_norm: Vec<String> = transcript.iter().map(|w| normalize_token(w)).collect();

    // Full DP matrix; the backtrack needs every cell, not just two rows.
    let mut dp = vec![vec![0usize; n + 1]; m + 1];
    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=n {
        dp[0][j] = j;
    }
    for i in 1..=m {
        for j in 1..=n {
            let cost = usize::from(ref_norm[i - 1] != hyp_norm[j - 1]);
            dp[i][j] = (dp[i - 1][j - 1] + cost)
                .min(dp[i - 1][j] + 1)
                .min(dp[i][j - 1] + 1);
        }
    }

    let mut miscues = Vec::new();
    let (mut i, mut j) = (m, n);
    while i > 0 || j > 0 {
        if i > 0 && j > 0 {
            let cost = usize::from(ref_norm[i - 1] != hyp_norm[j - 1]);
            // Diagonal preferred on ties.
            if dp[i][j] == dp[i - 1][j - 1] + cost {
                if cost == 1 {
                    miscues.push(Miscue {
                        kind: MiscueKind::Substitution,
                        reference_index: Some(i - 1),
                        transcript_index: Some(j - 1),
                        reference_word: Some(reference[i - 1].clone()),
                        transcript_word: Some(transcript[j - 1].clone()),
                    });
                }
                i -= 1;
                j -= 1;
                continue;
            }
        }
        if i > 0 && dp[i][j] == dp[i - 1][j] + 1 {
            miscues.push(Miscue {
                kind: MiscueKind::Deletion,
                reference_index: Some(i - 1),
                transcript_index: None,
                reference_word: Some(reference[i - 1].clone()),
                transcript_word: None,
            });
            i -= 1;
        } else {
            miscues.push(Miscue {
                kind: MiscueKind::Insertion,
                reference_index: None,
                transcript_index: Some(j - 1),
                reference_word: None,
                transcript_word: Some(transcript[j - 1].clone()),
            });
            j -= 1;
        }
    }
    miscues.reverse();
    miscues
}

/// Convenience wrapper: tokenize both texts, then align.
pub fn align_texts(reference: &str, transcript: &str) -> Vec<Miscue> {
    align(&tokenize(reference), &tokenize(transcript))
}

/// Flattens miscues to the word strings the feedback generator receives:
/// the expected word where one exists, the stray transcript word otherwise.
pub fn miscue_words(miscues: &[Miscue]) -> Vec<String> {
    miscues
        .iter()
        .filter_map(|m| m.reference_word.clone().or_else(|| m.transcript_word.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        tokenize(text)
    }

    fn kinds(miscues: &[Miscue]) -> Vec<MiscueKind> {
        miscues.iter().map(|m| m.kind).collect()
    }

    #[test]
    fn test_identity_alignment_is_empty() {
        let x = words("the quick brown fox");
        assert!(align(&x, &x).is_empty());
        assert!(align(&[], &[]).is_empty());
    }

    #[test]
    fn test_deletion_of_one_word() {
        let miscues = align_texts("the quick brown fox", "the quick fox");
        assert_eq!(kinds(&miscues), vec![MiscueKind::Deletion]);
        assert_eq!(miscues[0].reference_word.as_deref(), Some("brown"));
        assert_eq!(miscues[0].reference_index, Some(2));
        assert_eq!(miscues[0].transcript_word, None);
    }

    #[test]
    fn test_substitution_preferred_over_insert_plus_delete() {
        let miscues = align_texts("the quick brown fox", "the quick brow fox");
        assert_eq!(kinds(&miscues), vec![MiscueKind::Substitution]);
        assert_eq!(miscues[0].reference_word.as_deref(), Some("brown"));
        assert_eq!(miscues[0].transcript_word.as_deref(), Some("brow"));
    }

    #[test]
    fn test_insertion_of_one_word() {
        let miscues = align_texts("the quick fox", "the very quick fox");
        assert_eq!(kinds(&miscues), vec![MiscueKind::Insertion]);
        assert_eq!(miscues[0].transcript_word.as_deref(), Some("very"));
        assert_eq!(miscues[0].transcript_index, Some(1));
    }

    #[test]
    fn test_empty_reference_is_all_insertions() {
        let miscues = align(&[], &words("hello there"));
        assert_eq!(
            kinds(&miscues),
            vec![MiscueKind::Insertion, MiscueKind::Insertion]
        );
    }

    #[test]
    fn test_empty_transcript_is_all_deletions() {
        let miscues = align(&words("hello there"), &[]);
        assert_eq!(
            kinds(&miscues),
            vec![MiscueKind::Deletion, MiscueKind::Deletion]
        );
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        let miscues = align_texts("Hello, world!", "hello world");
        assert!(miscues.is_empty());
    }

    #[test]
    fn test_duplicate_words_stay_positional() {
        // Dropping ONE of the repeated words must yield exactly one deletion,
        // not a set-difference of zero.
        let miscues = align_texts("the dog chased the cat", "the dog chased cat");
        assert_eq!(kinds(&miscues), vec![MiscueKind::Deletion]);
        assert_eq!(miscues[0].reference_word.as_deref(), Some("the"));
        assert_eq!(miscues[0].reference_index, Some(3));
    }

    #[test]
    fn test_empty_string_token_is_a_token() {
        let reference = vec!["".to_string(), "fox".to_string()];
        let transcript = vec!["fox".to_string()];
        let miscues = align(&reference, &transcript);
        assert_eq!(kinds(&miscues), vec![MiscueKind::Deletion]);
    }

    #[test]
    fn test_miscues_ordered_by_position() {
        let miscues = align_texts("a b c d e", "a x c e f");
        let positions: Vec<usize> = miscues
            .iter()
            .map(|m| m.reference_index.or(m.transcript_index).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    // Every token of both sequences is covered by exactly one alignment
    // decision: subs + dels + matches == len(reference) and
    // subs + ins + matches == len(transcript).
    #[test]
    fn test_alignment_covers_every_token_once() {
        let cases = [
            ("the quick brown fox", "the quick fox"),
            ("a b c", "x y z w"),
            ("", "something said"),
            ("repeat repeat repeat", "repeat repeat"),
            ("one two three four five", "one too three for five six"),
        ];
        for (reference, transcript) in cases {
            let r = words(reference);
            let t = words(transcript);
            let miscues = align(&r, &t);
            let subs = miscues.iter().filter(|m| m.kind == MiscueKind::Substitution).count();
            let dels = miscues.iter().filter(|m| m.kind == MiscueKind::Deletion).count();
            let ins = miscues.iter().filter(|m| m.kind == MiscueKind::Insertion).count();
            let matches_from_ref = r.len() - subs - dels;
            let matches_from_hyp = t.len() - subs - ins;
            assert_eq!(
                matches_from_ref, matches_from_hyp,
                "match count must agree for ({reference:?}, {transcript:?})"
            );
            assert!(miscues.len() <= r.len().max(t.len()));
        }
    }

    #[test]
    fn test_miscue_words_flattening() {
        let deleted = align_texts("the quick brown fox", "the quick fox");
        assert_eq!(miscue_words(&deleted), vec!["brown"]);

        // An insertion has no reference word; the stray transcript word is used.
        let inserted = align_texts("the fox", "the big fox");
        assert_eq!(miscue_words(&inserted), vec!["big"]);

        let substituted = align_texts("a brown fox", "a braun fox");
        assert_eq!(miscue_words(&substituted), vec!["brown"]);
    }
}
