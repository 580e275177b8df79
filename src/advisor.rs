use crate::error::GenerationError;
use crate::footprint::{estimate, FootprintEstimate, FootprintFactors, UsageInputs};
use crate::llm::TextGenerator;
use crate::prompt::build_advice_prompt;

/// Phases of one compute-and-advise cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Computing,
    RequestingAdvice,
    Displaying,
    Failed,
}

fn enter(phase: Phase) {
    tracing::debug!(?phase, "cycle phase");
}

/// Result of one trigger. The estimate is always present; the advice may have failed.
#[derive(Debug)]
pub struct CycleOutcome {
    pub inputs: UsageInputs,
    pub estimate: FootprintEstimate,
    pub advice: Result<String, GenerationError>,
}

impl CycleOutcome {
    pub fn final_phase(&self) -> Phase {
        if self.advice.is_ok() { Phase::Displaying } else { Phase::Failed }
    }
}

/// A cycle whose estimate is known and whose advice has not been requested yet.
#[derive(Debug)]
pub struct PendingCycle {
    pub inputs: UsageInputs,
    pub estimate: FootprintEstimate,
}

/// Computes the footprint. Callers display it before asking for advice.
pub fn begin_cycle(inputs: UsageInputs, factors: &FootprintFactors) -> PendingCycle {
    enter(Phase::Idle);
    enter(Phase::Computing);
    let footprint = estimate(&inputs, factors);
    tracing::info!(liters_per_day = footprint.liters_per_day(), "footprint computed");
    PendingCycle { inputs, estimate: footprint }
}

impl PendingCycle {
    /// Makes the single generator call for this cycle. Never retries.
    pub async fn request_advice(self, generator: &dyn TextGenerator) -> CycleOutcome {
        enter(Phase::RequestingAdvice);
        let prompt = build_advice_prompt(&self.inputs, self.estimate);
        let advice = generator
            .generate(&prompt)
            .await
            .map(|text| text.trim().to_string())
            .and_then(|text| if text.is_empty() { Err(GenerationError::Empty) } else { Ok(text) });

        let outcome = CycleOutcome { inputs: self.inputs, estimate: self.estimate, advice };
        if let Err(e) = &outcome.advice {
            tracing::info!(error = %e, "advice request failed");
        }
        enter(outcome.final_phase());
        outcome
    }
}
