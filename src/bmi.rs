//! Body Mass Index calculator, exposed to the model as a callable function.
//!
//! The calculation itself is a pure function with no awareness of the
//! calling protocol; [`bmi_function`] wraps it in a declaration the model
//! can invoke.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::builder::{FunctionBuilder, ParamBuilder};
use crate::error::GeminiError;

/// Weight classification for a BMI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    #[serde(rename = "Normal weight")]
    NormalWeight,
    Overweight,
    Obesity,
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BmiCategory::Underweight => write!(f, "Underweight"),
            BmiCategory::NormalWeight => write!(f, "Normal weight"),
            BmiCategory::Overweight => write!(f, "Overweight"),
            BmiCategory::Obesity => write!(f, "Obesity"),
        }
    }
}

/// Result of a BMI calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    /// The BMI value, rounded to 2 decimal places
    pub bmi: f64,
    /// The weight category
    pub category: BmiCategory,
}

/// Calculates the Body Mass Index (BMI) given weight and height.
///
/// `bmi = weight_kg / (height_cm / 100)^2`. The category is classified
/// from the unrounded ratio with half-open thresholds at 18.5, 25 and 30;
/// the reported value is rounded to 2 decimal places.
///
/// # Errors
///
/// A zero height makes the ratio non-finite and is rejected as an
/// `InvalidRequest`. Negative inputs are not guarded.
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> Result<BmiResult, GeminiError> {
    let height_m = height_cm / 100.0;
    let bmi = weight_kg / (height_m * height_m);

    if !bmi.is_finite() {
        return Err(GeminiError::InvalidRequest(format!(
            "BMI is undefined for height_cm = {height_cm}"
        )));
    }

    let category = if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::NormalWeight
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obesity
    };

    Ok(BmiResult {
        bmi: (bmi * 100.0).round() / 100.0,
        category,
    })
}

/// Returns the `calculate_bmi` function declaration with its handler wired
/// to [`calculate_bmi`]. Whether and when to invoke it is left entirely to
/// the model.
pub fn bmi_function() -> FunctionBuilder {
    FunctionBuilder::new("calculate_bmi")
        .description(
            "Calculates the Body Mass Index (BMI) given weight and height, \
             returning the BMI value and a category string.",
        )
        .param(
            ParamBuilder::new("weight_kg")
                .type_of("number")
                .description("Weight in kilograms"),
        )
        .param(
            ParamBuilder::new("height_cm")
                .type_of("number")
                .description("Height in centimeters"),
        )
        .required(vec!["weight_kg".to_string(), "height_cm".to_string()])
        .handler(|args| {
            let weight_kg = number_arg(args, "weight_kg")?;
            let height_cm = number_arg(args, "height_cm")?;
            let result = calculate_bmi(weight_kg, height_cm)?;
            serde_json::to_value(result).map_err(|e| GeminiError::ToolError(e.to_string()))
        })
}

fn number_arg(args: &Value, name: &str) -> Result<f64, GeminiError> {
    args.get(name).and_then(Value::as_f64).ok_or_else(|| {
        GeminiError::ToolError(format!("calculate_bmi requires a numeric {name} argument"))
    })
}
