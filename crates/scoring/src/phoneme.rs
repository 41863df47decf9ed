use crate::types::{AssessedErrorType, PhonemeTally, WordAssessment};

/// Tallies one attempt's phoneme errors.
///
/// Only words the assessor flagged (`error_type != None`) contribute, and
/// within a flagged word only the phonemes scoring below `threshold` — not
/// every phoneme of the word.
pub fn tally_attempt(words: &[WordAssessment], threshold: f64) -> PhonemeTally {
    let mut tally = PhonemeTally::new();
    for word in words {
        if word.error_type == AssessedErrorType::None {
            continue;
        }
        for phoneme in &word.phonemes {
            if phoneme.accuracy_score < threshold {
                *tally.entry(phoneme.phoneme.clone()).or_insert(0) += 1;
            }
        }
    }
    tally
}

/// Adds an attempt's tally into a running total, in place. Per-key integer
/// addition, so merging attempts in any order yields the same mapping.
pub fn merge_into(total: &mut PhonemeTally, attempt: &PhonemeTally) {
    for (phoneme, count) in attempt {
        *total.entry(phoneme.clone()).or_insert(0) += count;
    }
}

/// Non-destructive merge of two tallies.
pub fn merge_totals(existing: &PhonemeTally, attempt: &PhonemeTally) -> PhonemeTally {
    let mut merged = existing.clone();
    merge_into(&mut merged, attempt);
    merged
}

/// The `n` most frequent phonemes, count descending, ties broken by the
/// phoneme symbol's natural ordering so the view is deterministic.
pub fn top_phonemes(tally: &PhonemeTally, n: usize) -> Vec<(String, u32)> {
    let mut entries: Vec<(String, u32)> =
        tally.iter().map(|(p, c)| (p.clone(), *c)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(n);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PhonemeScore;

    fn word(text: &str, error_type: AssessedErrorType, phonemes: &[(&str, f64)]) -> WordAssessment {
        WordAssessment {
            word: text.to_string(),
            error_type,
            phonemes: phonemes
                .iter()
                .map(|(p, s)| PhonemeScore {
                    phoneme: p.to_string(),
                    accuracy_score: *s,
                })
                .collect(),
        }
    }

    fn tally(entries: &[(&str, u32)]) -> PhonemeTally {
        entries.iter().map(|(p, c)| (p.to_string(), *c)).collect()
    }

    #[test]
    fn test_tally_counts_only_low_phonemes_of_flagged_words() {
        let words = vec![
            // Flagged: /θ/ low, /ə/ fine -> only /θ/ counted.
            word(
                "think",
                AssessedErrorType::Mispronunciation,
                &[("/θ/", 32.0), ("/ɪ/", 88.0), ("/ŋ/", 55.0)],
            ),
            // Unflagged: low phonemes here do NOT count.
            word("the", AssessedErrorType::None, &[("/ð/", 10.0)]),
        ];
        let result = tally_attempt(&words, 60.0);
        assert_eq!(result, tally(&[("/θ/", 1), ("/ŋ/", 1)]));
    }

    #[test]
    fn test_tally_empty_for_clean_attempt() {
        let words = vec![word(
            "hello",
            AssessedErrorType::None,
            &[("/h/", 99.0), ("/ə/", 97.0)],
        )];
        assert!(tally_attempt(&words, 60.0).is_empty());
    }

    #[test]
    fn test_repeated_phoneme_accumulates_within_attempt() {
        let words = vec![
            word("three", AssessedErrorType::Mispronunciation, &[("/θ/", 20.0)]),
            word("throw", AssessedErrorType::Mispronunciation, &[("/θ/", 40.0)]),
        ];
        assert_eq!(tally_attempt(&words, 60.0), tally(&[("/θ/", 2)]));
    }

    #[test]
    fn test_merge_sums_counts() {
        let existing = tally(&[("/θ/", 2)]);
        let attempt = tally(&[("/θ/", 3), ("/ð/", 1)]);
        assert_eq!(
            merge_totals(&existing, &attempt),
            tally(&[("/θ/", 5), ("/ð/", 1)])
        );
    }

    #[test]
    fn test_merge_is_commutative_and_associative() {
        let a = tally(&[("/θ/", 2), ("/s/", 1)]);
        let b = tally(&[("/θ/", 1), ("/ð/", 4)]);
        let empty = PhonemeTally::new();

        let ab = merge_totals(&merge_totals(&empty, &a), &b);
        let ba = merge_totals(&merge_totals(&empty, &b), &a);
        assert_eq!(ab, ba);

        let c = tally(&[("/s/", 7)]);
        assert_eq!(
            merge_totals(&merge_totals(&a, &b), &c),
            merge_totals(&a, &merge_totals(&b, &c))
        );
    }

    #[test]
    fn test_top_phonemes_breaks_ties_by_symbol() {
        let totals = tally(&[("/z/", 3), ("/a/", 3), ("/m/", 5), ("/k/", 1)]);
        assert_eq!(
            top_phonemes(&totals, 3),
            vec![
                ("/m/".to_string(), 5),
                ("/a/".to_string(), 3),
                ("/z/".to_string(), 3),
            ]
        );
    }
}
