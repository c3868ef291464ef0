//! Workout assembly: turns an assessment into a structured daily plan.
//!
//! The assembler derives a training level and the most deficient movement
//! pattern, then builds 2 or 3 blocks of three exercises each (primary
//! focus, integrated push/pull, core), a fixed preparation phase and an
//! optional goal-dependent closing protocol. Every decision branch taken is
//! appended to the plan's audit log, which is reproducible for identical
//! input.

use crate::catalog::Catalog;
use crate::types::*;
use crate::{Error, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

// Role rest bounds are method rules, not configuration.
const PRIMARY_REST_BOUNDS: (u32, u32) = (45, 90);
const PRIMARY_REST_BOUNDS_WEIGHT_LOSS: (u32, u32) = (30, 60);
const INTEGRATED_REST_BOUNDS: (u32, u32) = (30, 60);
const CORE_REST_BOUNDS: (u32, u32) = (20, 40);

const PRIMARY_REPS: &str = "6-12";
const INTEGRATED_REPS: &str = "8-12";
const CORE_HOLD: &str = "30-45s";

/// Tunable assembly parameters, loadable from the config file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssemblyParams {
    /// Fixed rest between blocks, seconds.
    #[serde(default = "default_inter_block_rest")]
    pub inter_block_rest_seconds: u32,

    /// Duration of the preparation phase, minutes.
    #[serde(default = "default_preparation_minutes")]
    pub preparation_minutes: u32,

    /// Pain intensity at or above which primary rest is floored.
    #[serde(default = "default_pain_threshold")]
    pub pain_intensity_threshold: u8,

    /// Minimum primary rest when the pain threshold is reached, seconds.
    #[serde(default = "default_pain_rest_floor")]
    pub pain_rest_floor_seconds: u32,
}

fn default_inter_block_rest() -> u32 {
    120
}
fn default_preparation_minutes() -> u32 {
    10
}
fn default_pain_threshold() -> u8 {
    6
}
fn default_pain_rest_floor() -> u32 {
    90
}

impl Default for AssemblyParams {
    fn default() -> Self {
        Self {
            inter_block_rest_seconds: default_inter_block_rest(),
            preparation_minutes: default_preparation_minutes(),
            pain_intensity_threshold: default_pain_threshold(),
            pain_rest_floor_seconds: default_pain_rest_floor(),
        }
    }
}

// ============================================================================
// Derivations
// ============================================================================

/// Training level: explicit override, else derived from weekly frequency.
pub fn derive_level(assessment: &Assessment) -> TrainingLevel {
    if let Some(level) = assessment.level {
        return level;
    }
    match assessment.frequency_per_week {
        0..=2 => TrainingLevel::Iniciante,
        3..=4 => TrainingLevel::Intermediario,
        _ => TrainingLevel::Avancado,
    }
}

/// Block count by level. Iniciante plans get 2 blocks; the validator's
/// hard "exactly 3" rule intentionally disagrees, see `validator`.
pub fn block_count(level: TrainingLevel) -> usize {
    match level {
        TrainingLevel::Iniciante => 2,
        TrainingLevel::Intermediario | TrainingLevel::Avancado => 3,
    }
}

/// The movement pattern with the lowest score. Ties break by pattern
/// declaration order (squat first, gait last).
pub fn primary_deficient_pattern(assessment: &Assessment) -> MovementPattern {
    let mut best = MovementPattern::Squat;
    let mut best_score = f64::INFINITY;
    for pattern in MovementPattern::ALL {
        if let Some(score) = assessment.movement_scores.get(&pattern) {
            if *score < best_score {
                best = pattern;
                best_score = *score;
            }
        }
    }
    best
}

// ============================================================================
// Exercise Selection
// ============================================================================

/// One step in a selection fallback chain.
pub struct Selector<'a> {
    pub name: &'static str,
    pub predicate: Box<dyn Fn(&ExerciseDef) -> bool + 'a>,
}

impl<'a> Selector<'a> {
    pub fn new(
        name: &'static str,
        predicate: impl Fn(&ExerciseDef) -> bool + 'a,
    ) -> Self {
        Self {
            name,
            predicate: Box::new(predicate),
        }
    }
}

/// Try each selector in order over the unused portion of the catalog,
/// keeping catalog order within each step. Returns the exercise and the
/// name of the selector that produced it, or None when the whole chain
/// comes up empty (callers then take the catalog's first entry).
///
/// The chain is explicit so the tie-break policy stays auditable and
/// testable in isolation.
pub fn select_exercise<'c>(
    catalog: &'c Catalog,
    used: &HashSet<String>,
    chain: &[Selector<'_>],
) -> Option<(&'c ExerciseDef, &'static str)> {
    for selector in chain {
        let found = catalog
            .exercises
            .iter()
            .filter(|e| !used.contains(&e.id))
            .find(|e| (selector.predicate)(e));
        if let Some(exercise) = found {
            return Some((exercise, selector.name));
        }
    }
    None
}

fn primary_chain(pattern: MovementPattern) -> Vec<Selector<'static>> {
    vec![Selector::new("deficient_pattern", move |e| e.serves(pattern))]
}

fn integrated_chain() -> Vec<Selector<'static>> {
    vec![
        Selector::new("push_pull", |e| {
            e.serves(MovementPattern::Push) && e.serves(MovementPattern::Pull)
        }),
        Selector::new("any_unused", |_| true),
    ]
}

fn core_chain() -> Vec<Selector<'static>> {
    vec![
        Selector::new("stability", |e| e.primary_capacity == Capacity::Stability),
        Selector::new("any_unused", |_| true),
    ]
}

// ============================================================================
// Rest Computation
// ============================================================================

/// Primary-role rest: clamp the exercise default to the role bounds (the
/// weight-loss goal uses tighter bounds), then apply the pain floor. Pain
/// overrides goal. Returns the rest and whether the pain floor fired.
fn primary_rest(
    default_rest: u32,
    goal: Goal,
    max_pain: u8,
    params: &AssemblyParams,
) -> (u32, bool) {
    let (lo, hi) = if goal == Goal::Emagrecimento {
        PRIMARY_REST_BOUNDS_WEIGHT_LOSS
    } else {
        PRIMARY_REST_BOUNDS
    };
    let mut rest = default_rest.clamp(lo, hi);

    let pain_override = max_pain >= params.pain_intensity_threshold;
    if pain_override && rest < params.pain_rest_floor_seconds {
        rest = params.pain_rest_floor_seconds;
    }
    (rest, pain_override)
}

fn integrated_rest(default_rest: u32) -> u32 {
    let (lo, hi) = INTEGRATED_REST_BOUNDS;
    default_rest.clamp(lo, hi)
}

fn core_rest(default_rest: u32) -> u32 {
    let (lo, hi) = CORE_REST_BOUNDS;
    default_rest.clamp(lo, hi)
}

// ============================================================================
// Assembly
// ============================================================================

/// Assemble a daily workout plan from an assessment.
///
/// The only hard failures are an absent assessment and an assessment that
/// violates its structural invariants; catalog misses degrade to the
/// documented selection fallbacks instead.
pub fn assemble_workout(
    assessment: Option<&Assessment>,
    catalog: &Catalog,
    params: &AssemblyParams,
) -> Result<WorkoutPlan> {
    let assessment = assessment.ok_or(Error::MissingAssessment)?;

    let invariant_errors = assessment.validate();
    if !invariant_errors.is_empty() {
        return Err(Error::Assessment(invariant_errors.join("; ")));
    }

    // Selection fallbacks degrade to the catalog's first entry, so an
    // injected catalog must have at least one exercise.
    if catalog.exercises.is_empty() {
        return Err(Error::CatalogValidation(
            "catalog has no exercises".into(),
        ));
    }

    let mut audit = Vec::new();

    let level = derive_level(assessment);
    audit.push(format!("level:{}", level.as_str()));

    let count = block_count(level);
    audit.push(format!("blocks:{}", count));

    let pattern = primary_deficient_pattern(assessment);
    audit.push(format!("primaryPattern:{}", pattern.as_str()));

    tracing::info!(
        level = level.as_str(),
        pattern = pattern.as_str(),
        blocks = count,
        goal = assessment.primary_goal.as_str(),
        "assembling workout"
    );

    let max_pain = assessment.max_pain_intensity();
    let goal = assessment.primary_goal;
    let mut pain_override_fired = false;

    let mut blocks = Vec::with_capacity(count);
    for index in 0..count {
        let block_no = index + 1;
        let mut used: HashSet<String> = HashSet::new();
        let mut exercises = Vec::with_capacity(3);

        // Primary focus
        let primary = match select_exercise(catalog, &used, &primary_chain(pattern)) {
            Some((exercise, _)) => exercise,
            None => {
                audit.push(format!("block{}:primary:fallback", block_no));
                &catalog.exercises[0]
            }
        };
        used.insert(primary.id.clone());
        let (rest, fired) = primary_rest(primary.default_rest_seconds, goal, max_pain, params);
        pain_override_fired |= fired;
        exercises.push(ExerciseInstance {
            exercise_id: primary.id.clone(),
            name: primary.name.clone(),
            role: ExerciseRole::Primary,
            execution: ExecutionSpec::RepsRange {
                reps: PRIMARY_REPS.into(),
            },
            rest_seconds: rest,
            rationale: format!(
                "Trabalho do padrao mais deficitario ({})",
                pattern.as_str()
            ),
        });

        // Integrated push/pull
        let (integrated, selector) = select_exercise(catalog, &used, &integrated_chain())
            .unwrap_or((&catalog.exercises[0], "first_entry"));
        if selector != "push_pull" {
            audit.push(format!("block{}:integrated:fallback", block_no));
        }
        used.insert(integrated.id.clone());
        exercises.push(ExerciseInstance {
            exercise_id: integrated.id.clone(),
            name: integrated.name.clone(),
            role: ExerciseRole::Integrated,
            execution: ExecutionSpec::RepsRange {
                reps: INTEGRATED_REPS.into(),
            },
            rest_seconds: integrated_rest(integrated.default_rest_seconds),
            rationale: "Integracao empurrar/puxar".into(),
        });

        // Core / stability
        let (core, selector) = select_exercise(catalog, &used, &core_chain())
            .unwrap_or((&catalog.exercises[0], "first_entry"));
        if selector != "stability" {
            audit.push(format!("block{}:core:fallback", block_no));
        }
        used.insert(core.id.clone());
        exercises.push(ExerciseInstance {
            exercise_id: core.id.clone(),
            name: core.name.clone(),
            role: ExerciseRole::Core,
            execution: ExecutionSpec::TimedHold {
                hold: CORE_HOLD.into(),
            },
            rest_seconds: core_rest(core.default_rest_seconds),
            rationale: "Estabilidade de tronco".into(),
        });

        blocks.push(Block {
            id: format!("bloco_{}", block_no),
            name: format!("Bloco {}", block_no),
            exercises,
            rest_after_block_seconds: params.inter_block_rest_seconds,
            rationale: format!("Enfase no padrao {}", pattern.as_str()),
        });
    }

    if pain_override_fired {
        audit.push("rest:painOverride".to_string());
    }

    let preparation = PreparationPhase {
        duration_minutes: params.preparation_minutes,
        elements: vec![
            "mobility".into(),
            "stability".into(),
            "neuromuscular activation".into(),
        ],
    };

    let protocol = match goal {
        Goal::Emagrecimento => Some(Protocol {
            kind: ProtocolKind::Hiit,
            name: "HIIT Curto".into(),
            duration_minutes: 8,
        }),
        Goal::Saude => Some(Protocol {
            kind: ProtocolKind::Regenerativo,
            name: "Regenerativo".into(),
            duration_minutes: 6,
        }),
        _ => None,
    };
    match &protocol {
        Some(p) => audit.push(format!("protocol:{}", p.kind.as_str())),
        None => audit.push("protocol:none".to_string()),
    }

    Ok(WorkoutPlan {
        id: Uuid::new_v4(),
        generated_at: Utc::now(),
        goal,
        level,
        primary_pattern: pattern,
        preparation,
        blocks,
        protocol,
        audit,
    })
}
