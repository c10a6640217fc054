//! BMI assistant: reads one prompt from stdin and lets the model invoke the
//! registered `calculate_bmi` function before answering.

use std::io::{self, BufRead, Write};

use gemini_kit::bmi::bmi_function;
use gemini_kit::builder::GeminiBuilder;
use gemini_kit::chat::ChatProvider;
use gemini_kit::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    gemini_kit::init_logging();

    let config = Config::from_env()?;
    let llm = GeminiBuilder::from_config(&config)
        .function(bmi_function())
        .build()?;

    print!(">>> ");
    io::stdout().flush()?;
    let mut user_prompt = String::new();
    io::stdin().lock().read_line(&mut user_prompt)?;

    // The client executes the function call and returns the final text
    let response = llm.generate(user_prompt.trim()).await?;
    println!("{response}");

    Ok(())
}
