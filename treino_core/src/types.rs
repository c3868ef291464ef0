//! Core domain types for the training-plan engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Movement patterns, capacities and risk levels
//! - Assessments (the immutable input record)
//! - Exercise definitions and per-plan exercise instances
//! - Blocks, preparation phase, protocols and the assembled plan

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

// ============================================================================
// Movement and Capacity Types
// ============================================================================

/// One of the 7 fundamental movement patterns.
///
/// Declaration order matters: it is the tie-break order when picking the
/// most deficient pattern from an assessment's movement scores.
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum MovementPattern {
    Squat,
    Hinge,
    Lunge,
    Push,
    Pull,
    Rotation,
    Gait,
}

impl MovementPattern {
    /// All patterns in declaration (tie-break) order.
    pub const ALL: [MovementPattern; 7] = [
        MovementPattern::Squat,
        MovementPattern::Hinge,
        MovementPattern::Lunge,
        MovementPattern::Push,
        MovementPattern::Pull,
        MovementPattern::Rotation,
        MovementPattern::Gait,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MovementPattern::Squat => "squat",
            MovementPattern::Hinge => "hinge",
            MovementPattern::Lunge => "lunge",
            MovementPattern::Push => "push",
            MovementPattern::Pull => "pull",
            MovementPattern::Rotation => "rotation",
            MovementPattern::Gait => "gait",
        }
    }
}

/// Physical capacity an exercise primarily trains.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Capacity {
    Strength,
    Stability,
    Mobility,
    Endurance,
    Coordination,
}

impl Capacity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capacity::Strength => "strength",
            Capacity::Stability => "stability",
            Capacity::Mobility => "mobility",
            Capacity::Endurance => "endurance",
            Capacity::Coordination => "coordination",
        }
    }
}

/// Injury-risk classification of an exercise.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

// ============================================================================
// Assessment Types
// ============================================================================

/// Training level, derived from weekly frequency or set explicitly.
///
/// Serialized values use the product's Portuguese labels.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrainingLevel {
    Iniciante,
    Intermediario,
    Avancado,
}

impl TrainingLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingLevel::Iniciante => "iniciante",
            TrainingLevel::Intermediario => "intermediario",
            TrainingLevel::Avancado => "avancado",
        }
    }
}

/// Primary training goal of a client.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Emagrecimento,
    Saude,
    Performance,
    Recondicionamento,
    HipertrofiaFuncional,
}

impl Goal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::Emagrecimento => "emagrecimento",
            Goal::Saude => "saude",
            Goal::Performance => "performance",
            Goal::Recondicionamento => "recondicionamento",
            Goal::HipertrofiaFuncional => "hipertrofia_funcional",
        }
    }
}

/// A single entry in an assessment's pain map.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PainPoint {
    pub region: String,
    /// Intensity on a 0-10 scale.
    pub intensity: u8,
}

/// A client assessment: the immutable input record for the engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Assessment {
    #[serde(default)]
    pub complaints: Vec<String>,
    #[serde(default)]
    pub pain_map: Vec<PainPoint>,
    /// Score per movement pattern, lower = more deficient.
    /// Must contain all 7 patterns.
    pub movement_scores: BTreeMap<MovementPattern, f64>,
    #[serde(default)]
    pub limiting_capacities: Vec<Capacity>,
    pub primary_goal: Goal,
    pub frequency_per_week: u32,
    /// Explicit level override; when absent the level is derived from
    /// weekly frequency.
    #[serde(default)]
    pub level: Option<TrainingLevel>,
}

impl Assessment {
    /// Check the assessment's structural invariants.
    ///
    /// Returns a list of violations, or empty Vec if well-formed.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for pattern in MovementPattern::ALL {
            if !self.movement_scores.contains_key(&pattern) {
                errors.push(format!(
                    "movement_scores missing pattern '{}'",
                    pattern.as_str()
                ));
            }
        }

        if self.frequency_per_week == 0 {
            errors.push("frequency_per_week must be positive".to_string());
        }

        for pain in &self.pain_map {
            if pain.intensity > 10 {
                errors.push(format!(
                    "pain intensity {} for region '{}' exceeds 10",
                    pain.intensity, pain.region
                ));
            }
        }

        errors
    }

    /// Highest pain intensity across the pain map (0 when empty).
    pub fn max_pain_intensity(&self) -> u8 {
        self.pain_map.iter().map(|p| p.intensity).max().unwrap_or(0)
    }
}

// ============================================================================
// Exercise Types
// ============================================================================

/// A catalog exercise definition. Built once at startup, never mutated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseDef {
    pub id: String,
    pub name: String,
    /// Movement patterns this exercise serves.
    pub patterns: Vec<MovementPattern>,
    pub primary_capacity: Capacity,
    pub risk: RiskLevel,
    #[serde(default)]
    pub contraindications: Vec<String>,
    pub default_rest_seconds: u32,
}

impl ExerciseDef {
    pub fn serves(&self, pattern: MovementPattern) -> bool {
        self.patterns.contains(&pattern)
    }
}

/// Role an exercise plays within a block.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseRole {
    Primary,
    Integrated,
    Core,
}

impl ExerciseRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseRole::Primary => "primary",
            ExerciseRole::Integrated => "integrated",
            ExerciseRole::Core => "core",
        }
    }
}

/// How an exercise is executed within a block.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ExecutionSpec {
    /// Repetition range (e.g. "6-12").
    RepsRange { reps: String },
    /// Timed hold (e.g. "30-45s").
    TimedHold { hold: String },
}

/// A per-plan exercise instance. References an [`ExerciseDef`] by id and
/// carries the computed execution and rest for one plan. Never mutated
/// after assembly.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseInstance {
    pub exercise_id: String,
    pub name: String,
    pub role: ExerciseRole,
    pub execution: ExecutionSpec,
    pub rest_seconds: u32,
    pub rationale: String,
}

// ============================================================================
// Plan Types
// ============================================================================

/// A training block: exactly 3 exercises, the first always primary-focus.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    pub name: String,
    pub exercises: Vec<ExerciseInstance>,
    pub rest_after_block_seconds: u32,
    pub rationale: String,
}

/// Fixed warm-up phase preceding the blocks.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PreparationPhase {
    pub duration_minutes: u32,
    pub elements: Vec<String>,
}

/// Kind of closing protocol.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolKind {
    Hiit,
    Regenerativo,
}

impl ProtocolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolKind::Hiit => "hiit",
            ProtocolKind::Regenerativo => "regenerativo",
        }
    }
}

/// Optional closing segment of a session, chosen by goal.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Protocol {
    pub kind: ProtocolKind,
    pub name: String,
    pub duration_minutes: u32,
}

/// A fully assembled daily workout plan.
///
/// Owned by the caller once generated; the engine keeps no reference.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub goal: Goal,
    pub level: TrainingLevel,
    pub primary_pattern: MovementPattern,
    pub preparation: PreparationPhase,
    pub blocks: Vec<Block>,
    pub protocol: Option<Protocol>,
    /// Ordered trace of the decision branches taken during assembly.
    pub audit: Vec<String>,
}
