use crate::footprint::{FootprintEstimate, UsageInputs};

pub const TIP_COUNT: usize = 3;

/// Builds the advisor prompt. The five facts are rendered as labeled lines
/// so the model can pick out the user's heaviest consumption areas.
pub fn build_advice_prompt(inputs: &UsageInputs, estimate: FootprintEstimate) -> String {
    format!(
        "You are an AI Water Conservation and Sanitation Specialist named AquaAdvisor.
Your goal is to provide actionable, encouraging, and personalized advice based on a user's water consumption data.
The user wants to reduce their water footprint and learn about sanitation.

User's Data:
- Daily Shower Time: {shower} minutes
- Daily Toilet Flushes: {flushes}
- Weekly Laundry Loads: {laundry}
- Weekly Bottled Water Consumption: {bottled:?} Liters
- Calculated Daily Water Footprint: {estimate} Liters

Based on this data, provide {tips} distinct and practical tips. For each tip:
1. Directly address one of the user's highest consumption areas.
2. Explain the potential water savings in simple terms.
3. Conclude with a general, encouraging tip about the importance of clean water access or simple sanitation practices (like proper handwashing or not pouring fats down the drain).

Keep the tone friendly and helpful. Use emojis and markdown formatting where appropriate.
",
        shower = inputs.shower_minutes_per_day,
        flushes = inputs.toilet_flushes_per_day,
        laundry = inputs.laundry_loads_per_week,
        bottled = inputs.bottled_water_liters_per_week,
        estimate = estimate,
        tips = TIP_COUNT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::footprint::{estimate, WATER_FOOTPRINT_FACTORS};

    #[test]
    fn embeds_all_five_facts_as_labeled_lines() {
        let inputs = UsageInputs::default();
        let e = estimate(&inputs, &WATER_FOOTPRINT_FACTORS);
        let p = build_advice_prompt(&inputs, e);
        let lines: Vec<&str> = p.lines().collect();
        for expected in [
            "- Daily Shower Time: 10 minutes",
            "- Daily Toilet Flushes: 5",
            "- Weekly Laundry Loads: 3",
            "- Weekly Bottled Water Consumption: 2.0 Liters",
            "- Calculated Daily Water Footprint: 153.0 Liters",
        ] {
            assert!(lines.contains(&expected), "missing line: {expected}\n{p}");
        }
    }

    #[test]
    fn asks_for_exactly_three_tips() {
        let inputs = UsageInputs::new(4.5, 0, 0, 0.25).unwrap();
        let p = build_advice_prompt(&inputs, estimate(&inputs, &WATER_FOOTPRINT_FACTORS));
        assert!(p.contains("provide 3 distinct and practical tips"));
        assert!(p.contains("Water Conservation and Sanitation"));
        assert!(p.contains("- Daily Shower Time: 4.5 minutes"));
        assert!(p.contains("- Weekly Bottled Water Consumption: 0.25 Liters"));
        assert!(p.contains("- Calculated Daily Water Footprint: 40.6 Liters"));
    }
}
