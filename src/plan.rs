//! Robot action plans and the parser that validates model output.
//!
//! The model is asked for a JSON array of actions drawn from a fixed
//! vocabulary. [`parse_action_plan`] turns that untrusted text into a
//! validated [`ActionPlan`] or fails with an error carrying the raw output.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::GeminiError;

/// The fixed, closed list of permissible `action_type` values.
pub const ALLOWED_ACTIONS: [&str; 8] = [
    "move", "pick", "place", "grab", "pour", "activate", "wait", "present",
];

/// One planned robot action.
///
/// `parameters` is an open mapping whose semantics depend on `action_type`;
/// it is not interpreted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotAction {
    /// Type of action, a member of [`ALLOWED_ACTIONS`]
    pub action_type: String,
    /// Parameters for the action
    pub parameters: Map<String, Value>,
}

/// An ordered sequence of validated actions, meant to be executed in
/// sequence by a downstream robot controller. May be empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionPlan {
    /// The actions, in execution order
    pub actions: Vec<RobotAction>,
}

/// Strips a fenced code block wrapper from model output, if present.
///
/// Models sometimes wrap the array in ```` ```json ... ``` ```` despite
/// being told not to; drop the fence lines and re-trim.
fn strip_code_fence(raw: &str) -> &str {
    let mut cleaned = raw.trim();
    if cleaned.starts_with("```") {
        cleaned = cleaned.split_once('\n').map(|(_, rest)| rest).unwrap_or("");
        let trimmed = cleaned.trim_end();
        if let Some(body) = trimmed.strip_suffix("```") {
            cleaned = body;
        }
        cleaned = cleaned.trim();
    }
    cleaned
}

/// Converts untrusted model output into a validated [`ActionPlan`].
///
/// The parser only accepts a JSON array at the top level. Every element
/// must be an object with an `action_type` drawn from [`ALLOWED_ACTIONS`]
/// and a `parameters` object. Array order is preserved. An empty array is
/// a legal, successful result meaning "no valid actions for this
/// instruction".
///
/// # Errors
///
/// * [`GeminiError::ResponseFormatError`] - the cleaned text is not a JSON
///   array or is not valid JSON
/// * [`GeminiError::SchemaValidationError`] - an element has an unknown
///   `action_type` or a missing/ill-typed field
///
/// Both variants carry the raw, uncleaned output; no partial plan is ever
/// returned.
pub fn parse_action_plan(raw: &str) -> Result<ActionPlan, GeminiError> {
    let cleaned = strip_code_fence(raw);

    if !cleaned.starts_with('[') {
        return Err(GeminiError::ResponseFormatError {
            message: "model output is not a JSON array".to_string(),
            raw_response: raw.to_string(),
        });
    }

    let elements: Vec<Value> =
        serde_json::from_str(cleaned).map_err(|e| GeminiError::ResponseFormatError {
            message: format!("invalid JSON: {e}"),
            raw_response: raw.to_string(),
        })?;

    // Validate every action_type before constructing anything
    for element in &elements {
        let action_type = element.get("action_type");
        let known = action_type
            .and_then(Value::as_str)
            .is_some_and(|t| ALLOWED_ACTIONS.contains(&t));
        if !known {
            return Err(GeminiError::SchemaValidationError {
                message: format!(
                    "invalid action_type: {}",
                    action_type.unwrap_or(&Value::Null)
                ),
                raw_response: raw.to_string(),
            });
        }
    }

    let mut actions = Vec::with_capacity(elements.len());
    for element in elements {
        let action_type = element
            .get("action_type")
            .and_then(Value::as_str)
            .expect("action_type validated above")
            .to_string();

        let parameters = match element.get("parameters") {
            Some(Value::Object(map)) => map.clone(),
            Some(other) => {
                return Err(GeminiError::SchemaValidationError {
                    message: format!("parameters must be an object, got {other} for {action_type}"),
                    raw_response: raw.to_string(),
                })
            }
            None => {
                return Err(GeminiError::SchemaValidationError {
                    message: format!("missing parameters for action {action_type}"),
                    raw_response: raw.to_string(),
                })
            }
        };

        actions.push(RobotAction {
            action_type,
            parameters,
        });
    }

    Ok(ActionPlan { actions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_array_is_an_empty_plan() {
        let plan = parse_action_plan("[]").unwrap();
        assert!(plan.actions.is_empty());
    }

    #[test]
    fn single_move_action_parses() {
        let raw = r#"[{"action_type":"move","parameters":{"direction":"forward","distance":2}}]"#;
        let plan = parse_action_plan(raw).unwrap();
        assert_eq!(plan.actions.len(), 1);
        assert_eq!(plan.actions[0].action_type, "move");
        assert_eq!(plan.actions[0].parameters["direction"], "forward");
        assert_eq!(plan.actions[0].parameters["distance"], 2);
    }

    #[test]
    fn order_is_preserved() {
        let raw = r#"[
            {"action_type": "move", "parameters": {"direction": "forward"}},
            {"action_type": "grab", "parameters": {"object": "cup"}},
            {"action_type": "pour", "parameters": {"target": "glass"}}
        ]"#;
        let plan = parse_action_plan(raw).unwrap();
        let types: Vec<&str> = plan
            .actions
            .iter()
            .map(|a| a.action_type.as_str())
            .collect();
        assert_eq!(types, vec!["move", "grab", "pour"]);
    }

    #[test]
    fn unknown_action_type_names_the_offender() {
        let raw = r#"[{"action_type":"fly","parameters":{}}]"#;
        let err = parse_action_plan(raw).unwrap_err();
        assert!(matches!(err, GeminiError::SchemaValidationError { .. }));
        assert!(err.to_string().contains("fly"));
        assert_eq!(err.raw_response(), Some(raw));
    }

    #[test]
    fn missing_action_type_is_a_validation_error() {
        let err = parse_action_plan(r#"[{"parameters":{}}]"#).unwrap_err();
        assert!(matches!(err, GeminiError::SchemaValidationError { .. }));
    }

    #[test]
    fn missing_parameters_is_a_validation_error() {
        let err = parse_action_plan(r#"[{"action_type":"wait"}]"#).unwrap_err();
        assert!(matches!(err, GeminiError::SchemaValidationError { .. }));
        assert!(err.to_string().contains("wait"));
    }

    #[test]
    fn non_object_parameters_is_a_validation_error() {
        let err = parse_action_plan(r#"[{"action_type":"wait","parameters":3}]"#).unwrap_err();
        assert!(matches!(err, GeminiError::SchemaValidationError { .. }));
    }

    #[test]
    fn bad_action_type_reported_before_missing_parameters() {
        // action_type validation is a separate pass over all elements
        let raw = r#"[{"action_type":"move"},{"action_type":"swim","parameters":{}}]"#;
        let err = parse_action_plan(raw).unwrap_err();
        assert!(err.to_string().contains("swim"));
    }

    #[test]
    fn fenced_block_is_stripped() {
        let plan = parse_action_plan("```json\n[]\n```").unwrap();
        assert!(plan.actions.is_empty());

        let raw = "```json\n[{\"action_type\": \"wait\", \"parameters\": {\"seconds\": 5}}]\n```";
        let plan = parse_action_plan(raw).unwrap();
        assert_eq!(plan.actions[0].action_type, "wait");
    }

    #[test]
    fn fence_without_trailing_delimiter_still_parses() {
        let plan = parse_action_plan("```json\n[]").unwrap();
        assert!(plan.actions.is_empty());
    }

    #[test]
    fn top_level_object_is_a_format_error() {
        let err = parse_action_plan(r#"{"action_type":"move"}"#).unwrap_err();
        assert!(matches!(err, GeminiError::ResponseFormatError { .. }));
    }

    #[test]
    fn invalid_json_is_a_format_error_with_raw_output() {
        let raw = "[{\"action_type\": \"move\",]";
        let err = parse_action_plan(raw).unwrap_err();
        assert!(matches!(err, GeminiError::ResponseFormatError { .. }));
        assert_eq!(err.raw_response(), Some(raw));
    }

    #[test]
    fn reparsing_a_serialized_plan_is_idempotent() {
        let raw = r#"[
            {"action_type": "pick", "parameters": {"object": "bottle"}},
            {"action_type": "place", "parameters": {"target": "table"}}
        ]"#;
        let plan = parse_action_plan(raw).unwrap();
        let serialized = serde_json::to_string(&plan).unwrap();
        let reparsed = parse_action_plan(&serialized).unwrap();
        assert_eq!(plan, reparsed);
    }

    #[test]
    fn plan_serializes_as_a_bare_array() {
        let plan = ActionPlan {
            actions: vec![RobotAction {
                action_type: "wait".to_string(),
                parameters: json!({"seconds": 2}).as_object().unwrap().clone(),
            }],
        };
        let value = serde_json::to_value(&plan).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["action_type"], "wait");
    }
}
