//! Robot action planner: reads one instruction from stdin, asks Gemini for
//! a JSON action plan and validates it against the allowed vocabulary.

use std::io::{self, BufRead, Write};

use gemini_kit::builder::GeminiBuilder;
use gemini_kit::chat::ChatProvider;
use gemini_kit::config::Config;
use gemini_kit::plan::parse_action_plan;
use gemini_kit::prompt::planner_prompt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    gemini_kit::init_logging();

    // Fatal before any network call if the API key is missing
    let config = Config::from_env()?;
    let llm = GeminiBuilder::from_config(&config).build()?;

    print!("Describe the task for the robot: ");
    io::stdout().flush()?;
    let mut instruction = String::new();
    io::stdin().lock().read_line(&mut instruction)?;

    let prompt = planner_prompt(instruction.trim());
    let llm_output = llm.generate(&prompt).await?;

    // All-or-nothing: a parse failure is terminal for this invocation and
    // is reported with the raw output instead of crashing
    match parse_action_plan(&llm_output) {
        Ok(plan) => {
            println!("Generated action plan:");
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Err(e) => {
            println!("Failed to parse LLM output: {e}");
            println!("Raw output: {llm_output}");
        }
    }

    Ok(())
}
