use crate::assessment::domain::Submission;
use crate::assessment::scoring::ScoreResult;

use super::AdvisoryError;

/// Rendered user message sent to the advisory model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryPrompt {
    pub text: String,
}

impl AdvisoryPrompt {
    pub fn build(submission: &Submission, result: &ScoreResult) -> Result<Self, AdvisoryError> {
        let data = serde_json::to_string_pretty(submission)?;

        let mut text = String::new();
        text.push_str("You are an HSE (Health, Safety, Environment) advisor.\n");
        text.push_str("Here is workplace risk data:\n\n");
        text.push_str(&data);
        text.push_str("\n\n");

        text.push_str(&format!(
            "A rule-based screening rated this {} risk (score {}).\n",
            result.risk, result.score
        ));
        if result.reasons.is_empty() {
            text.push_str("No individual rule was triggered.\n");
        } else {
            text.push_str("Triggered factors:\n");
            for reason in &result.reasons {
                text.push_str(&format!("- {reason}\n"));
            }
        }

        text.push_str("\nTasks:\n");
        text.push_str("1. Predict risk level (Low, Medium, High).\n");
        text.push_str("2. Explain key reasons for this risk.\n");
        text.push_str("3. Recommend preventive actions to reduce or avoid it.\n");

        Ok(Self { text })
    }
}
