use crate::advisor::CycleOutcome;
use crate::footprint::{FootprintEstimate, UsageInputs, GLOBAL_AVERAGE_NOTE};
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("failed to serialize json: {}", e),
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct ErrorOut<'a> {
    pub code: &'a str,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'a str>,
}

pub fn print_json_error(code: &str, message: &str, hint: Option<&str>) {
    let err = ErrorOut { code, message, hint };
    print_json(&err);
}

#[derive(Serialize, Debug)]
pub struct EstimateOut<'a> {
    pub inputs: &'a UsageInputs,
    pub liters_per_day: FootprintEstimate,
    pub note: &'a str,
}

#[derive(Serialize, Debug)]
pub struct AdviceOut<'a> {
    #[serde(flatten)]
    pub estimate: EstimateOut<'a>,
    pub model: &'a str,
    pub advice: Option<&'a str>,
    pub error: Option<String>,
}

pub fn render_estimate(estimate: FootprintEstimate) {
    println!("📊 Estimated Daily Water Footprint");
    println!("💧 Liters per Day: {} L", estimate);
    println!("💡 {}", GLOBAL_AVERAGE_NOTE);
}

pub fn render_advice(text: &str) {
    println!();
    println!("### ✨ Your Personalized Action Plan ✨");
    println!();
    println!("{}", text);
}

/// In text mode the estimate has already been printed before the request went out.
pub fn render_outcome(outcome: &CycleOutcome, model: &str, json: bool) {
    if json {
        let out = AdviceOut {
            estimate: EstimateOut { inputs: &outcome.inputs, liters_per_day: outcome.estimate, note: GLOBAL_AVERAGE_NOTE },
            model,
            advice: outcome.advice.as_ref().ok().map(String::as_str),
            error: outcome.advice.as_ref().err().map(|e| e.to_string()),
        };
        print_json(&out);
        return;
    }
    match &outcome.advice {
        Ok(text) => render_advice(text),
        Err(e) => eprintln!("❌ Error generating response: {}", e),
    }
}
