use crate::error::{ScoringError, ScoringResult};
use crate::types::{BandResult, SubScoreSet};

const ACCURACY_WEIGHT: f64 = 0.25;
const FLUENCY_WEIGHT: f64 = 0.20;
const COMPLETENESS_WEIGHT: f64 = 0.25;
const PRONUNCIATION_WEIGHT: f64 = 0.30;

/// Computes the composite proficiency band from the four sub-scores.
///
/// Each sub-score is rescaled from [0,100] to [0,9], combined with fixed
/// weights, and rounded to the nearest allowed half band. All four fields
/// must be present and in range; defaulting missing values is the caller's
/// job, not this function's.
pub fn score_band(sub: &SubScoreSet) -> ScoringResult<BandResult> {
    validate_range("accuracy", sub.accuracy)?;
    validate_range("fluency", sub.fluency)?;
    validate_range("completeness", sub.completeness)?;
    validate_range("pronunciation", sub.pronunciation)?;

    let composite = normalize(sub.accuracy) * ACCURACY_WEIGHT
        + normalize(sub.fluency) * FLUENCY_WEIGHT
        + normalize(sub.completeness) * COMPLETENESS_WEIGHT
        + normalize(sub.pronunciation) * PRONUNCIATION_WEIGHT;

    Ok(BandResult {
        band: round_to_band(composite),
        raw_weighted_score: composite,
    })
}

fn normalize(score: f64) -> f64 {
    score * 9.0 / 100.0
}

/// Rounds a composite to the band scale {0, 0.5, 1.0, ..., 9.0}.
///
/// Fractional part below .25 rounds down, from .25 up to (but excluding)
/// .75 rounds to the half band, .75 and above rounds up. The boundaries are
/// non-strict on the lower side, which is what the half-band convention
/// requires.
pub fn round_to_band(composite: f64) -> f64 {
    let whole = composite.floor();
    let frac = composite - whole;
    if frac < 0.25 {
        whole
    } else if frac < 0.75 {
        whole + 0.5
    } else {
        whole + 1.0
    }
}

fn validate_range(field: &'static str, value: f64) -> ScoringResult<()> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(ScoringError::invalid_input(
            field,
            format!("sub-score {value} outside [0, 100]"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(accuracy: f64, fluency: f64, completeness: f64, pronunciation: f64) -> SubScoreSet {
        SubScoreSet {
            accuracy,
            fluency,
            completeness,
            pronunciation,
        }
    }

    #[test]
    fn test_reference_scenario() {
        // 85/80/90/75 -> normalized 7.65/7.2/8.1/6.75 -> composite 7.4025 -> 7.5
        let result = score_band(&sub(85.0, 80.0, 90.0, 75.0)).unwrap();
        assert!((result.raw_weighted_score - 7.4025).abs() < 1e-9);
        assert_eq!(result.band, 7.5);
    }

    #[test]
    fn test_rounding_boundaries_exact() {
        assert_eq!(round_to_band(3.2499999), 3.0);
        assert_eq!(round_to_band(3.25), 3.5);
        assert_eq!(round_to_band(3.5), 3.5);
        assert_eq!(round_to_band(3.7499999), 3.5);
        assert_eq!(round_to_band(3.75), 4.0);
        assert_eq!(round_to_band(0.0), 0.0);
        assert_eq!(round_to_band(9.0), 9.0);
    }

    #[test]
    fn test_extremes() {
        let zero = score_band(&sub(0.0, 0.0, 0.0, 0.0)).unwrap();
        assert_eq!(zero.band, 0.0);
        let full = score_band(&sub(100.0, 100.0, 100.0, 100.0)).unwrap();
        assert_eq!(full.band, 9.0);
        assert!((full.raw_weighted_score - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_band_is_on_half_step_grid() {
        for accuracy in (0..=100).step_by(5) {
            for pronunciation in (0..=100).step_by(5) {
                let result =
                    score_band(&sub(accuracy as f64, 50.0, 50.0, pronunciation as f64)).unwrap();
                let doubled = result.band * 2.0;
                assert_eq!(doubled, doubled.round(), "band {} off grid", result.band);
                assert!((0.0..=9.0).contains(&result.band));
            }
        }
    }

    #[test]
    fn test_raising_one_sub_score_never_lowers_band() {
        for field in 0..4 {
            let mut previous = -1.0f64;
            for value in 0..=100 {
                let value = value as f64;
                let scores = match field {
                    0 => sub(value, 40.0, 55.0, 70.0),
                    1 => sub(40.0, value, 55.0, 70.0),
                    2 => sub(40.0, 55.0, value, 70.0),
                    _ => sub(40.0, 55.0, 70.0, value),
                };
                let band = score_band(&scores).unwrap().band;
                assert!(band >= previous, "band dropped when raising field {field}");
                previous = band;
            }
        }
    }

    #[test]
    fn test_out_of_range_sub_score_names_the_field() {
        let err = score_band(&sub(50.0, 101.0, 50.0, 50.0)).unwrap_err();
        match err {
            ScoringError::InvalidInput { field, .. } => assert_eq!(field, "fluency"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }

        let err = score_band(&sub(50.0, 50.0, 50.0, -0.5)).unwrap_err();
        match err {
            ScoringError::InvalidInput { field, .. } => assert_eq!(field, "pronunciation"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }
}
