//! Boundary conversion of loose request payloads into typed selections.
//!
//! The request layer hands us arbitrary key/value maps (form posts, JSON
//! bodies). Entries are converted into typed id pairs here, and anything
//! malformed is dropped before it reaches the pricing engine.

use std::collections::HashMap;

use serde_json::Value;

use crate::types::DbId;

/// One chosen attribute option: "for attribute X, the user picked option Y".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSelection {
    pub attribute_id: DbId,
    pub option_id: DbId,
}

/// One answered evaluation criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CriterionAnswer {
    pub criterion_id: DbId,
    pub answered_yes: bool,
}

/// Whether an answer string counts as "yes" (case-insensitive).
/// Every other value means "no".
pub fn answer_is_yes(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("yes")
}

/// Parse an `attribute_id → option_id` map.
///
/// Entries whose key or value is not a positive integer are dropped.
/// Output is sorted by attribute id for deterministic processing.
pub fn parse_attribute_selections(raw: &HashMap<String, Value>) -> Vec<AttributeSelection> {
    let mut selections: Vec<AttributeSelection> = raw
        .iter()
        .filter_map(|(key, value)| {
            let attribute_id = parse_db_id(key)?;
            let option_id = id_from_value(value)?;
            Some(AttributeSelection {
                attribute_id,
                option_id,
            })
        })
        .collect();
    selections.sort_by_key(|s| s.attribute_id);
    selections
}

/// Parse a `criterion_id → answer` map.
///
/// Answers may be strings (`"yes"`/`"no"`, case-insensitive) or booleans;
/// entries with a malformed key or a non-answer value are dropped.
pub fn parse_criterion_answers(raw: &HashMap<String, Value>) -> Vec<CriterionAnswer> {
    let mut answers: Vec<CriterionAnswer> = raw
        .iter()
        .filter_map(|(key, value)| {
            let criterion_id = parse_db_id(key)?;
            let answered_yes = match value {
                Value::String(s) => answer_is_yes(s),
                Value::Bool(b) => *b,
                _ => return None,
            };
            Some(CriterionAnswer {
                criterion_id,
                answered_yes,
            })
        })
        .collect();
    answers.sort_by_key(|a| a.criterion_id);
    answers
}

/// Parse a positive database id out of a string key.
fn parse_db_id(raw: &str) -> Option<DbId> {
    match raw.trim().parse::<DbId>() {
        Ok(id) if id > 0 => Some(id),
        _ => None,
    }
}

/// Parse a positive database id out of a JSON value (number or string).
fn id_from_value(value: &Value) -> Option<DbId> {
    match value {
        Value::Number(n) => n.as_i64().filter(|id| *id > 0),
        Value::String(s) => parse_db_id(s),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(entries: &[(&str, Value)]) -> HashMap<String, Value> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    // -- answer_is_yes --

    #[test]
    fn yes_is_case_insensitive() {
        assert!(answer_is_yes("yes"));
        assert!(answer_is_yes("YES"));
        assert!(answer_is_yes(" Yes "));
    }

    #[test]
    fn anything_else_is_no() {
        assert!(!answer_is_yes("no"));
        assert!(!answer_is_yes("maybe"));
        assert!(!answer_is_yes(""));
        assert!(!answer_is_yes("y"));
    }

    // -- parse_attribute_selections --

    #[test]
    fn parses_numeric_and_string_ids() {
        let raw = map(&[("3", json!(7)), ("1", json!("12"))]);
        let parsed = parse_attribute_selections(&raw);
        assert_eq!(
            parsed,
            vec![
                AttributeSelection {
                    attribute_id: 1,
                    option_id: 12
                },
                AttributeSelection {
                    attribute_id: 3,
                    option_id: 7
                },
            ]
        );
    }

    #[test]
    fn drops_malformed_attribute_entries() {
        let raw = map(&[
            ("2", json!(5)),
            ("abc", json!(4)),
            ("4", json!("")),
            ("5", json!(null)),
            ("0", json!(9)),
            ("-1", json!(9)),
        ]);
        let parsed = parse_attribute_selections(&raw);
        assert_eq!(
            parsed,
            vec![AttributeSelection {
                attribute_id: 2,
                option_id: 5
            }]
        );
    }

    #[test]
    fn empty_map_yields_no_selections() {
        assert!(parse_attribute_selections(&HashMap::new()).is_empty());
    }

    // -- parse_criterion_answers --

    #[test]
    fn parses_string_and_bool_answers() {
        let raw = map(&[("2", json!("Yes")), ("1", json!("no")), ("3", json!(true))]);
        let parsed = parse_criterion_answers(&raw);
        assert_eq!(
            parsed,
            vec![
                CriterionAnswer {
                    criterion_id: 1,
                    answered_yes: false
                },
                CriterionAnswer {
                    criterion_id: 2,
                    answered_yes: true
                },
                CriterionAnswer {
                    criterion_id: 3,
                    answered_yes: true
                },
            ]
        );
    }

    #[test]
    fn unknown_answer_strings_mean_no() {
        let raw = map(&[("1", json!("definitely"))]);
        let parsed = parse_criterion_answers(&raw);
        assert_eq!(parsed.len(), 1);
        assert!(!parsed[0].answered_yes);
    }

    #[test]
    fn drops_malformed_criterion_entries() {
        let raw = map(&[("x", json!("yes")), ("2", json!(3.5)), ("3", json!("yes"))]);
        let parsed = parse_criterion_answers(&raw);
        assert_eq!(
            parsed,
            vec![CriterionAnswer {
                criterion_id: 3,
                answered_yes: true
            }]
        );
    }
}
