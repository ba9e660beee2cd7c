//! MET-based calorie burn estimates.

use crate::{Exercise, Intensity};

/// Body weight assumed when the profile has none
pub const DEFAULT_WEIGHT_KG: f64 = 70.0;

/// MET used when no exercise data is available for an intensity
pub fn fallback_met(intensity: Intensity) -> f64 {
    match intensity {
        Intensity::Low => 3.0,
        Intensity::Medium => 5.0,
        Intensity::High => 7.0,
    }
}

/// Pick the MET value of `exercise` for an intensity
///
/// Low uses `mets_low`, high uses `mets_high`, medium their average. Unknown
/// exercises or non-positive MET data fall back to 3/5/7.
pub fn met_for(exercise: Option<&Exercise>, intensity: Intensity) -> f64 {
    let Some(exercise) = exercise else {
        return fallback_met(intensity);
    };
    let met = match intensity {
        Intensity::Low => exercise.mets_low,
        Intensity::Medium => exercise.average_met(),
        Intensity::High => exercise.mets_high,
    };
    if met > 0.0 && met.is_finite() {
        met
    } else {
        fallback_met(intensity)
    }
}

/// `round(MET * weight * hours)`
pub fn calories_for_met(met: f64, duration_minutes: u32, weight_kg: f64) -> u32 {
    let hours = f64::from(duration_minutes) / 60.0;
    (met * weight_kg * hours).round().max(0.0) as u32
}

/// Estimated calories for `duration_minutes` of `exercise`
///
/// `weight_kg` of `None` (or a non-positive value) uses 70 kg.
pub fn estimate_calories(
    exercise: Option<&Exercise>,
    duration_minutes: u32,
    intensity: Intensity,
    weight_kg: Option<f64>,
) -> u32 {
    let weight = weight_kg
        .filter(|w| *w > 0.0 && w.is_finite())
        .unwrap_or(DEFAULT_WEIGHT_KG);
    calories_for_met(met_for(exercise, intensity), duration_minutes, weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rowing() -> Exercise {
        Exercise {
            name: "Rowing".into(),
            body_parts: vec!["back".into(), "arms".into()],
            mets_low: 4.0,
            mets_high: 8.0,
        }
    }

    #[test]
    fn test_formula() {
        assert_eq!(calories_for_met(5.0, 60, 70.0), 350);
        assert_eq!(calories_for_met(7.0, 30, 80.0), 280);
    }

    #[test]
    fn test_met_selection() {
        let row = rowing();
        assert_eq!(met_for(Some(&row), Intensity::Low), 4.0);
        assert_eq!(met_for(Some(&row), Intensity::Medium), 6.0);
        assert_eq!(met_for(Some(&row), Intensity::High), 8.0);
    }

    #[test]
    fn test_fallback_without_exercise() {
        assert_eq!(estimate_calories(None, 60, Intensity::Medium, None), 350);
        assert_eq!(estimate_calories(None, 60, Intensity::Low, Some(100.0)), 300);
    }

    #[test]
    fn test_default_weight_when_unset() {
        let row = rowing();
        assert_eq!(
            estimate_calories(Some(&row), 30, Intensity::High, None),
            estimate_calories(Some(&row), 30, Intensity::High, Some(70.0))
        );
        assert_eq!(estimate_calories(Some(&row), 30, Intensity::High, Some(0.0)), 280);
    }
}
