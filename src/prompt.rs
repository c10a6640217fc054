//! Prompt construction for the robot action planner.

use crate::plan::ALLOWED_ACTIONS;

/// Builds the planner instruction prompt for a user request.
///
/// Embeds the quoted allowed-action list, the JSON-array-only directive,
/// the fall-back-to-`[]` directive, one worked example and the user's
/// instruction. Deterministic string template, no branching.
pub fn planner_prompt(instruction: &str) -> String {
    let allowed_actions = ALLOWED_ACTIONS
        .iter()
        .map(|a| format!("\"{a}\""))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are controlling a robot that can only perform the following actions: [{allowed_actions}].\n\
         Given the user's instruction, generate a JSON list of robot actions. \
         Each action must have 'action_type' and 'parameters'.\n\
         If the instruction requires actions outside of the allowed list (such as running a marathon, \
         swimming, flying, or any impossible or unsupported task), respond with an empty JSON array [].\n\
         Respond ONLY with a JSON array, no explanation or extra text. Do not wrap in markdown or code blocks.\n\
         Instruction: {instruction}\n\
         Example output: [{{\"action_type\": \"move\", \"parameters\": {{\"direction\": \"forward\", \"distance\": 2}}}}]"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_quoted_vocabulary() {
        let prompt = planner_prompt("bring me water");
        assert!(prompt.contains(
            r#"["move", "pick", "place", "grab", "pour", "activate", "wait", "present"]"#
        ));
    }

    #[test]
    fn prompt_embeds_instruction_and_example() {
        let prompt = planner_prompt("bring me water");
        assert!(prompt.contains("Instruction: bring me water"));
        assert!(prompt.contains(r#"Example output: [{"action_type": "move""#));
        assert!(prompt.contains("respond with an empty JSON array []"));
    }

    #[test]
    fn prompt_is_deterministic() {
        assert_eq!(planner_prompt("stack the cups"), planner_prompt("stack the cups"));
    }
}
