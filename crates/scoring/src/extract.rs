use serde_json::Value;

use crate::assess::RawAssessment;
use crate::error::{ScoringError, ScoringResult};
use crate::types::{
    AssessedErrorType, AttemptAssessment, PhonemeScore, SubScoreSet, WordAssessment,
};

/// Builds the validated attempt view from the raw assessment payload.
///
/// Assessment services disagree on field naming (camelCase, PascalCase,
/// snake_case), so every lookup goes through an alias list. The transcript
/// is required — it falls back to joining the recognized words, and only
/// fails when neither is present. Unknown error-type labels map to the
/// generic mispronunciation bucket.
pub fn attempt_from_raw(raw: &RawAssessment) -> ScoringResult<AttemptAssessment> {
    let root = &raw.0;

    let word_assessments = extract_words(root);

    let transcript = field(root, &["transcript", "Transcript", "displayText", "DisplayText", "display_text"])
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| {
            if word_assessments.is_empty() {
                None
            } else {
                Some(
                    word_assessments
                        .iter()
                        .map(|w| w.word.as_str())
                        .collect::<Vec<_>>()
                        .join(" "),
                )
            }
        })
        .ok_or_else(|| {
            ScoringError::invalid_input("transcript", "missing from assessment payload")
        })?;

    Ok(AttemptAssessment {
        transcript,
        sub_scores: extract_sub_scores(root),
        word_assessments,
    })
}

/// Missing sub-scores default to 0 here, at the boundary — the band scorer
/// itself requires all four fields present and in range.
fn extract_sub_scores(root: &Value) -> SubScoreSet {
    let scope = field(root, &["subScores", "sub_scores", "SubScores", "scores"]).unwrap_or(root);

    SubScoreSet {
        accuracy: number(scope, &["accuracy", "accuracyScore", "AccuracyScore", "accuracy_score"]),
        fluency: number(scope, &["fluency", "fluencyScore", "FluencyScore", "fluency_score"]),
        completeness: number(
            scope,
            &["completeness", "completenessScore", "CompletenessScore", "completeness_score"],
        ),
        pronunciation: number(
            scope,
            &["pronunciation", "pronScore", "PronScore", "pronunciation_score"],
        ),
    }
}

fn extract_words(root: &Value) -> Vec<WordAssessment> {
    let Some(entries) = field(root, &["wordAssessments", "word_assessments", "Words", "words"])
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let word = field(entry, &["word", "Word"])?.as_str()?.to_string();
            let error_type = field(entry, &["errorType", "error_type", "ErrorType"])
                .and_then(Value::as_str)
                .map(AssessedErrorType::parse)
                .unwrap_or(AssessedErrorType::None);
            Some(WordAssessment {
                word,
                error_type,
                phonemes: extract_phonemes(entry),
            })
        })
        .collect()
}

fn extract_phonemes(entry: &Value) -> Vec<PhonemeScore> {
    let Some(items) = field(entry, &["phonemes", "Phonemes"]).and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let phoneme = field(item, &["phoneme", "Phoneme"])?.as_str()?.to_string();
            let accuracy_score =
                number(item, &["accuracyScore", "accuracy_score", "AccuracyScore"]);
            Some(PhonemeScore {
                phoneme,
                accuracy_score,
            })
        })
        .collect()
}

fn field<'a>(value: &'a Value, names: &[&str]) -> Option<&'a Value> {
    let object = value.as_object()?;
    names.iter().find_map(|name| object.get(*name))
}

fn number(value: &Value, names: &[&str]) -> f64 {
    field(value, names).and_then(Value::as_f64).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_camel_case_payload() {
        let raw = RawAssessment(json!({
            "transcript": "the quick fox",
            "subScores": {
                "accuracy": 85.0,
                "fluency": 80.0,
                "completeness": 90.0,
                "pronunciation": 75.0,
            },
            "wordAssessments": [
                {
                    "word": "quick",
                    "errorType": "Mispronunciation",
                    "phonemes": [
                        { "phoneme": "/k/", "accuracyScore": 42.0 },
                        { "phoneme": "/w/", "accuracyScore": 91.0 },
                    ],
                },
            ],
        }));

        let attempt = attempt_from_raw(&raw).unwrap();
        assert_eq!(attempt.transcript, "the quick fox");
        assert_eq!(attempt.sub_scores.pronunciation, 75.0);
        assert_eq!(attempt.word_assessments.len(), 1);
        assert_eq!(
            attempt.word_assessments[0].error_type,
            AssessedErrorType::Mispronunciation
        );
        assert_eq!(attempt.word_assessments[0].phonemes[0].accuracy_score, 42.0);
    }

    #[test]
    fn test_extract_pascal_case_payload() {
        let raw = RawAssessment(json!({
            "DisplayText": "hello world",
            "AccuracyScore": 70.0,
            "FluencyScore": 60.0,
            "CompletenessScore": 100.0,
            "PronScore": 65.0,
            "Words": [
                {
                    "Word": "hello",
                    "ErrorType": "None",
                    "Phonemes": [ { "Phoneme": "/h/", "AccuracyScore": 95.0 } ],
                },
            ],
        }));

        let attempt = attempt_from_raw(&raw).unwrap();
        assert_eq!(attempt.transcript, "hello world");
        assert_eq!(attempt.sub_scores.accuracy, 70.0);
        assert_eq!(attempt.sub_scores.completeness, 100.0);
        assert_eq!(attempt.word_assessments[0].error_type, AssessedErrorType::None);
    }

    #[test]
    fn test_transcript_falls_back_to_word_list() {
        let raw = RawAssessment(json!({
            "word_assessments": [
                { "word": "good", "error_type": "None" },
                { "word": "morning", "error_type": "Omission" },
            ],
        }));

        let attempt = attempt_from_raw(&raw).unwrap();
        assert_eq!(attempt.transcript, "good morning");
    }

    #[test]
    fn test_missing_transcript_names_the_field() {
        let raw = RawAssessment(json!({ "subScores": { "accuracy": 50.0 } }));
        match attempt_from_raw(&raw).unwrap_err() {
            ScoringError::InvalidInput { field, .. } => assert_eq!(field, "transcript"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_sub_scores_default_to_zero() {
        let raw = RawAssessment(json!({ "transcript": "short answer" }));
        let attempt = attempt_from_raw(&raw).unwrap();
        assert_eq!(attempt.sub_scores.accuracy, 0.0);
        assert_eq!(attempt.sub_scores.fluency, 0.0);
    }

    #[test]
    fn test_unknown_error_type_is_permissive() {
        let raw = RawAssessment(json!({
            "transcript": "uh hello",
            "wordAssessments": [
                { "word": "uh", "errorType": "Hesitation" },
            ],
        }));
        let attempt = attempt_from_raw(&raw).unwrap();
        assert_eq!(
            attempt.word_assessments[0].error_type,
            AssessedErrorType::Mispronunciation
        );
    }
}
