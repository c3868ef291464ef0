//! Built-in exercise catalog.
//!
//! The catalog is an ordered list: selection fallbacks ("first match, else
//! first unused") depend on this order, so entries are kept in a Vec rather
//! than a map.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// The complete, ordered exercise catalog.
#[derive(Clone, Debug)]
pub struct Catalog {
    pub exercises: Vec<ExerciseDef>,
}

impl Catalog {
    pub fn new(exercises: Vec<ExerciseDef>) -> Self {
        Self { exercises }
    }

    pub fn get(&self, id: &str) -> Option<&ExerciseDef> {
        self.exercises.iter().find(|e| e.id == id)
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        if self.exercises.is_empty() {
            errors.push("Catalog is empty".to_string());
            return errors;
        }

        for exercise in &self.exercises {
            if exercise.id.is_empty() {
                errors.push("Exercise has empty ID".to_string());
            }
            if !seen.insert(exercise.id.as_str()) {
                errors.push(format!("Duplicate exercise ID '{}'", exercise.id));
            }
            if exercise.name.is_empty() {
                errors.push(format!("Exercise '{}' has empty name", exercise.id));
            }
            if exercise.patterns.is_empty() {
                errors.push(format!("Exercise '{}' has no movement patterns", exercise.id));
            }
            if exercise.default_rest_seconds == 0 {
                errors.push(format!(
                    "Exercise '{}' has zero default rest",
                    exercise.id
                ));
            }
        }

        // Every movement pattern must be served by at least one exercise,
        // otherwise the primary-focus selector always degrades to fallback.
        for pattern in MovementPattern::ALL {
            if !self.exercises.iter().any(|e| e.serves(pattern)) {
                errors.push(format!(
                    "No exercise serves pattern '{}'",
                    pattern.as_str()
                ));
            }
        }

        // The integrated role needs at least one push+pull exercise.
        let has_push_pull = self.exercises.iter().any(|e| {
            e.serves(MovementPattern::Push) && e.serves(MovementPattern::Pull)
        });
        if !has_push_pull {
            errors.push("No exercise serves both push and pull".to_string());
        }

        // The core role needs at least one stability-capacity exercise.
        let has_stability = self
            .exercises
            .iter()
            .any(|e| e.primary_capacity == Capacity::Stability);
        if !has_stability {
            errors.push("No exercise with stability as primary capacity".to_string());
        }

        errors
    }
}

fn exercise(
    id: &str,
    name: &str,
    patterns: &[MovementPattern],
    capacity: Capacity,
    risk: RiskLevel,
    contraindications: &[&str],
    default_rest_seconds: u32,
) -> ExerciseDef {
    ExerciseDef {
        id: id.into(),
        name: name.into(),
        patterns: patterns.to_vec(),
        primary_capacity: capacity,
        risk,
        contraindications: contraindications.iter().map(|c| (*c).into()).collect(),
        default_rest_seconds,
    }
}

/// Builds the default catalog of exercises
///
/// **Note**: For production use, prefer `default_catalog()` which returns a
/// cached reference. This function is retained for testing and custom
/// catalog creation.
pub fn build_default_catalog() -> Catalog {
    use Capacity::*;
    use MovementPattern::*;
    use RiskLevel::*;

    Catalog::new(vec![
        exercise(
            "goblet_squat",
            "Agachamento Goblet",
            &[Squat],
            Strength,
            Low,
            &[],
            60,
        ),
        exercise(
            "kb_deadlift",
            "Levantamento Terra com Kettlebell",
            &[Hinge],
            Strength,
            Low,
            &["lombar"],
            75,
        ),
        exercise(
            "reverse_lunge",
            "Afundo Reverso",
            &[Lunge, Squat],
            Strength,
            Low,
            &["joelho"],
            60,
        ),
        exercise(
            "hip_thrust",
            "Elevacao de Quadril",
            &[Hinge],
            Strength,
            Low,
            &[],
            75,
        ),
        exercise(
            "pushup",
            "Flexao de Bracos",
            &[Push],
            Strength,
            Low,
            &[],
            45,
        ),
        exercise(
            "inverted_row",
            "Remada Invertida",
            &[Pull],
            Strength,
            Low,
            &[],
            60,
        ),
        exercise(
            "kb_overhead_press",
            "Desenvolvimento com Kettlebell",
            &[Push],
            Strength,
            Moderate,
            &["ombro"],
            90,
        ),
        exercise(
            "renegade_row",
            "Remada Renegada",
            &[Push, Pull],
            Strength,
            Moderate,
            &["punho"],
            90,
        ),
        exercise(
            "band_press_row",
            "Press e Remada com Elastico",
            &[Push, Pull],
            Coordination,
            Low,
            &[],
            45,
        ),
        exercise(
            "pallof_press",
            "Pallof Press",
            &[Rotation],
            Stability,
            Low,
            &[],
            40,
        ),
        exercise(
            "dead_bug",
            "Dead Bug",
            &[Rotation],
            Stability,
            Low,
            &[],
            30,
        ),
        exercise(
            "side_plank",
            "Prancha Lateral",
            &[Rotation],
            Stability,
            Low,
            &["ombro"],
            35,
        ),
        exercise(
            "farmer_carry",
            "Caminhada do Fazendeiro",
            &[Gait],
            Strength,
            Low,
            &[],
            60,
        ),
        exercise(
            "suitcase_carry",
            "Caminhada Unilateral",
            &[Gait, Rotation],
            Stability,
            Low,
            &[],
            60,
        ),
        exercise(
            "step_up",
            "Subida no Banco",
            &[Lunge, Gait],
            Strength,
            Low,
            &["joelho"],
            60,
        ),
    ])
}
