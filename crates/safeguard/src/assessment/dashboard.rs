use serde::Serialize;

use super::scoring::{RiskTier, Scorecard, MAX_ATTAINABLE_SCORE};

/// Colour band of the overall risk gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GaugeBand {
    Green,
    Orange,
    Red,
}

impl GaugeBand {
    pub const fn from_percent(percent: u8) -> Self {
        if percent > 70 {
            GaugeBand::Red
        } else if percent > 40 {
            GaugeBand::Orange
        } else {
            GaugeBand::Green
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            GaugeBand::Green => "green",
            GaugeBand::Orange => "orange",
            GaugeBand::Red => "red",
        }
    }
}

/// One bar of the risk-factor chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactorShare {
    pub name: &'static str,
    pub weight: u32,
    /// Share of the total score, in percent.
    pub value: u8,
}

/// Chart-ready view of a scorecard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskBreakdown {
    pub risk: RiskTier,
    pub score: u32,
    pub risk_percent: u8,
    pub gauge: GaugeBand,
    pub factors: Vec<FactorShare>,
}

impl RiskBreakdown {
    pub fn from_scorecard(scorecard: &Scorecard) -> Self {
        let score = scorecard.total();
        let risk_percent = percent_of(score, MAX_ATTAINABLE_SCORE);
        let factors = scorecard
            .hits
            .iter()
            .filter(|hit| hit.weight > 0)
            .map(|hit| FactorShare {
                name: hit.factor.label(),
                weight: hit.weight,
                value: percent_of(hit.weight, score),
            })
            .collect();

        Self {
            risk: scorecard.tier(),
            score,
            risk_percent,
            gauge: GaugeBand::from_percent(risk_percent),
            factors,
        }
    }
}

fn percent_of(part: u32, whole: u32) -> u8 {
    if whole == 0 {
        return 0;
    }
    let percent = (f64::from(part) * 100.0 / f64::from(whole)).round();
    percent.min(100.0) as u8
}
