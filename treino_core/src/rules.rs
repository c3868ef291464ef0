//! Rule engine for routing assessments to training-block codes.
//!
//! Rules are persisted configuration: an ordered condition list plus an
//! action. The engine is deterministic and side-effect-free; it reports
//! which rule matched so the persistence layer can track usage itself.
//!
//! Priority semantics: ascending — a numerically lower priority value is
//! evaluated first and wins. Ties keep the rule set's insertion order
//! (stable sort).

use crate::condition::{evaluate_all, trace, Condition, ConditionTrace};
use crate::types::Assessment;
use serde::{Deserialize, Serialize};

/// Action taken when a rule matches.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleAction {
    /// Route the client to a specific training-block code.
    SetNextBlock { block_code: String },
}

/// A persisted routing rule.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub name: String,
    pub conditions: Vec<Condition>,
    /// Lower value = evaluated first.
    pub priority: i32,
    #[serde(default = "default_active")]
    pub active: bool,
    pub action: RuleAction,
}

fn default_active() -> bool {
    true
}

/// A set of rules, as loaded from the rule store.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RuleSet {
    pub rules: Vec<Rule>,
}

/// Result of a successful block selection.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockSelection {
    pub rule_id: String,
    pub block_code: String,
}

/// Select a training block for an assessment.
///
/// Filters to active rules, orders them by ascending priority (ties keep
/// insertion order) and returns the action of the first rule whose combined
/// conditions evaluate true. `None` means no rule matched and the caller
/// should fall back to its default path (e.g. the assembler's
/// pattern-deficiency heuristic).
pub fn select_block(record: &Assessment, rules: &[Rule]) -> Option<BlockSelection> {
    let mut candidates: Vec<&Rule> = rules.iter().filter(|r| r.active).collect();
    candidates.sort_by_key(|r| r.priority);

    for rule in candidates {
        if evaluate_all(&rule.conditions, record) {
            let RuleAction::SetNextBlock { block_code } = &rule.action;
            tracing::info!(rule_id = %rule.id, block_code = %block_code, "rule matched");
            return Some(BlockSelection {
                rule_id: rule.id.clone(),
                block_code: block_code.clone(),
            });
        }
        tracing::debug!(rule_id = %rule.id, "rule did not match");
    }

    tracing::info!("no rule matched, caller falls back to default selection");
    None
}

/// Dry-run evaluation detail for one rule.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RuleTrace {
    pub rule_id: String,
    pub rule_name: String,
    pub active: bool,
    pub priority: i32,
    pub matched: bool,
    pub conditions: Vec<ConditionTrace>,
}

/// Dry-run every rule (including inactive ones) against a record.
///
/// Returns per-rule match results with per-condition actual/expected
/// values, in the same priority order `select_block` uses. Inactive rules
/// are evaluated but flagged, so the rule-testing surface can show why a
/// rule was skipped.
pub fn explain_all(record: &Assessment, rules: &[Rule]) -> Vec<RuleTrace> {
    let mut ordered: Vec<&Rule> = rules.iter().collect();
    ordered.sort_by_key(|r| r.priority);

    ordered
        .iter()
        .map(|rule| RuleTrace {
            rule_id: rule.id.clone(),
            rule_name: rule.name.clone(),
            active: rule.active,
            priority: rule.priority,
            matched: evaluate_all(&rule.conditions, record),
            conditions: rule
                .conditions
                .iter()
                .map(|c| trace(c, record))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{ConditionValue, Operator};
    use crate::types::*;
    use std::collections::BTreeMap;

    fn assessment(goal: Goal, frequency: u32) -> Assessment {
        let movement_scores: BTreeMap<MovementPattern, f64> = MovementPattern::ALL
            .iter()
            .map(|p| (*p, 5.0))
            .collect();
        Assessment {
            complaints: vec![],
            pain_map: vec![],
            movement_scores,
            limiting_capacities: vec![],
            primary_goal: goal,
            frequency_per_week: frequency,
            level: None,
        }
    }

    fn goal_rule(id: &str, goal: &str, priority: i32, block_code: &str) -> Rule {
        Rule {
            id: id.into(),
            name: format!("route {}", goal),
            conditions: vec![Condition {
                field: "primary_goal".into(),
                operator: Operator::Eq,
                value: ConditionValue::Text(goal.into()),
                logical: None,
            }],
            priority,
            active: true,
            action: RuleAction::SetNextBlock {
                block_code: block_code.into(),
            },
        }
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let rules = vec![
            goal_rule("r1", "performance", 1, "BLOCO_A"),
            goal_rule("r2", "saude", 2, "BLOCO_B"),
        ];
        let selection = select_block(&assessment(Goal::Saude, 3), &rules).unwrap();
        assert_eq!(selection.rule_id, "r2");
        assert_eq!(selection.block_code, "BLOCO_B");
    }

    #[test]
    fn test_lower_priority_value_wins() {
        // Both rules match; the one with the lower priority number wins
        // regardless of input order.
        let rules = vec![
            goal_rule("later", "saude", 10, "BLOCO_X"),
            goal_rule("first", "saude", 1, "BLOCO_Y"),
        ];
        let selection = select_block(&assessment(Goal::Saude, 3), &rules).unwrap();
        assert_eq!(selection.rule_id, "first");
    }

    #[test]
    fn test_priority_tie_keeps_insertion_order() {
        let rules = vec![
            goal_rule("a", "saude", 5, "BLOCO_A"),
            goal_rule("b", "saude", 5, "BLOCO_B"),
        ];
        let selection = select_block(&assessment(Goal::Saude, 3), &rules).unwrap();
        assert_eq!(selection.rule_id, "a");
    }

    #[test]
    fn test_inactive_rules_skipped() {
        let mut rule = goal_rule("r1", "saude", 1, "BLOCO_A");
        rule.active = false;
        let rules = vec![rule, goal_rule("r2", "saude", 2, "BLOCO_B")];
        let selection = select_block(&assessment(Goal::Saude, 3), &rules).unwrap();
        assert_eq!(selection.rule_id, "r2");
    }

    #[test]
    fn test_no_match_returns_none() {
        let rules = vec![goal_rule("r1", "performance", 1, "BLOCO_A")];
        assert!(select_block(&assessment(Goal::Saude, 3), &rules).is_none());
    }

    #[test]
    fn test_selection_is_deterministic() {
        let rules = vec![
            goal_rule("r1", "saude", 3, "BLOCO_A"),
            goal_rule("r2", "saude", 3, "BLOCO_B"),
            goal_rule("r3", "performance", 1, "BLOCO_C"),
        ];
        let record = assessment(Goal::Saude, 3);
        let first = select_block(&record, &rules);
        for _ in 0..10 {
            assert_eq!(select_block(&record, &rules), first);
        }
    }

    #[test]
    fn test_conjunction_rule() {
        let rule = Rule {
            id: "combo".into(),
            name: "saude with high frequency".into(),
            conditions: vec![
                Condition {
                    field: "primary_goal".into(),
                    operator: Operator::Eq,
                    value: ConditionValue::Text("saude".into()),
                    logical: None,
                },
                Condition {
                    field: "frequency_per_week".into(),
                    operator: Operator::Ge,
                    value: ConditionValue::Number(4.0),
                    logical: Some(crate::condition::LogicalOp::And),
                },
            ],
            priority: 1,
            active: true,
            action: RuleAction::SetNextBlock {
                block_code: "BLOCO_FREQ".into(),
            },
        };

        assert!(select_block(&assessment(Goal::Saude, 5), &[rule.clone()]).is_some());
        assert!(select_block(&assessment(Goal::Saude, 3), &[rule]).is_none());
    }

    #[test]
    fn test_explain_all_includes_inactive() {
        let mut inactive = goal_rule("off", "saude", 1, "BLOCO_A");
        inactive.active = false;
        let rules = vec![inactive, goal_rule("on", "saude", 2, "BLOCO_B")];

        let traces = explain_all(&assessment(Goal::Saude, 3), &rules);
        assert_eq!(traces.len(), 2);
        assert_eq!(traces[0].rule_id, "off");
        assert!(!traces[0].active);
        assert!(traces[0].matched);
        assert!(traces[1].matched);
        assert_eq!(traces[1].conditions.len(), 1);
        assert_eq!(traces[1].conditions[0].actual, "saude");
    }
}
