use crate::infra::{build_advisor, InMemorySubmissionStore};
use clap::Args;
use futures::StreamExt;
use safeguard::assessment::{
    RiskAssessmentService, RiskBreakdown, RiskScorer, RiskTier, ScoreResult, Submission,
    SubmissionCsvImporter,
};
use safeguard::config::AppConfig;
use safeguard::error::AppError;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

#[derive(Args, Debug, Default)]
pub(crate) struct AssessArgs {
    /// Submission JSON file (reads stdin when omitted)
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
    /// Include the dashboard breakdown with per-factor shares
    #[arg(long)]
    pub(crate) breakdown: bool,
    /// Stream safety advice for High risk submissions
    #[arg(long)]
    pub(crate) advice: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV export whose header row names submission fields
    #[arg(long)]
    pub(crate) csv: PathBuf,
}

pub(crate) async fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs {
        input,
        breakdown,
        advice,
    } = args;

    let raw = match input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            tokio::io::stdin().read_to_string(&mut buffer).await?;
            buffer
        }
    };
    let submission = Submission::from_json(serde_json::from_str(&raw)?)?;

    let scorecard = RiskScorer.scorecard(&submission);
    print!("{}", render_result(&scorecard.result()));
    if breakdown {
        print!(
            "{}",
            render_breakdown(&RiskBreakdown::from_scorecard(&scorecard))
        );
    }

    if advice {
        stream_advice(&submission).await?;
    }

    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let submissions = SubmissionCsvImporter::from_path(&args.csv)?;
    print!("{}", render_batch(&submissions));
    Ok(())
}

async fn stream_advice(submission: &Submission) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let advisor = build_advisor(&config.advisory)?;
    let service =
        RiskAssessmentService::new(Arc::new(InMemorySubmissionStore::default()), advisor);

    let Some(mut stream) = service.advise(submission).await? else {
        println!("\nAdvice is only requested for High risk submissions.");
        return Ok(());
    };

    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"\nSafety advice\n").await?;
    while let Some(fragment) = stream.next().await {
        stdout.write_all(fragment?.as_bytes()).await?;
        stdout.flush().await?;
    }
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
    Ok(())
}

pub(crate) fn render_result(result: &ScoreResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("Risk: {} (score {})\n", result.risk, result.score));
    if result.reasons.is_empty() {
        out.push_str("Reasons: none\n");
    } else {
        out.push_str("Reasons:\n");
        for reason in &result.reasons {
            out.push_str(&format!("- {reason}\n"));
        }
    }
    out
}

pub(crate) fn render_breakdown(breakdown: &RiskBreakdown) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "\nGauge: {}% ({})\n",
        breakdown.risk_percent,
        breakdown.gauge.label()
    ));
    if breakdown.factors.is_empty() {
        out.push_str("Risk factors: none\n");
        return out;
    }

    out.push_str("Risk factors:\n");
    for factor in &breakdown.factors {
        out.push_str(&format!(
            "  {:<22} {:>2} pts {:>3}%\n",
            factor.name, factor.weight, factor.value
        ));
    }
    out
}

pub(crate) fn render_batch(submissions: &[Submission]) -> String {
    let mut out = String::new();
    let mut tally: BTreeMap<RiskTier, usize> = BTreeMap::new();

    for (index, submission) in submissions.iter().enumerate() {
        let result = RiskScorer.score(submission);
        *tally.entry(result.risk).or_default() += 1;
        out.push_str(&format!(
            "{:>4}  {:<6} {:>2}  {}\n",
            index + 1,
            result.risk.label(),
            result.score,
            submission.employee_name.as_deref().unwrap_or("-")
        ));
    }

    let summary: Vec<String> = [RiskTier::High, RiskTier::Medium, RiskTier::Low]
        .iter()
        .map(|tier| format!("{} {}", tally.get(tier).copied().unwrap_or(0), tier))
        .collect();
    out.push_str(&format!(
        "\n{} submissions: {}\n",
        submissions.len(),
        summary.join(", ")
    ));
    out
}
