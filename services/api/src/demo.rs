use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use provider_intel::error::AppError;
use provider_intel::scoring::{
    RankQuery, RankingResult, ScoringService, SnapshotImporter,
};

use crate::infra::{seed_providers, InMemoryProviderSource};

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// Registry CSV export to rank
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Restrict to one state (two-letter code)
    #[arg(long)]
    pub(crate) state: Option<String>,
    /// Only include providers in certificate-of-need states
    #[arg(long)]
    pub(crate) con_state_only: bool,
    /// Drop results below this composite score
    #[arg(long)]
    pub(crate) min_score: Option<f64>,
    /// Cap the number of results
    #[arg(long)]
    pub(crate) limit: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Cap the ranking table printed by the demo
    #[arg(long, default_value_t = 10)]
    pub(crate) top: usize,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let RankArgs {
        csv,
        state,
        con_state_only,
        min_score,
        limit,
    } = args;

    let records = SnapshotImporter::from_path(&csv)?;
    let service = ScoringService::new(Arc::new(InMemoryProviderSource::default()))
        .map_err(provider_intel::scoring::ScoringServiceError::Config)?;

    let results = service.rank_records(
        &records,
        RankQuery {
            weights: None,
            state,
            con_state_only,
            min_score,
            limit,
        },
    )?;

    println!(
        "Ranked {} of {} providers from {}",
        results.len(),
        records.len(),
        csv.display()
    );
    print_ranking_table(&results);

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let source = Arc::new(InMemoryProviderSource::with_records(seed_providers()));
    let service = ScoringService::new(source)
        .map_err(provider_intel::scoring::ScoringServiceError::Config)?;

    println!("Provider acquisition scoring demo");

    println!("\nComposite ranking (top {})", args.top);
    let results = service.rank(RankQuery {
        limit: Some(args.top),
        ..RankQuery::default()
    })?;
    print_ranking_table(&results);

    println!("\nWhat-if preview: raise the overall-score bar to 75");
    let mut hypothetical = service.default_profile().clone();
    hypothetical.name = "stricter-overall".to_string();
    hypothetical.thresholds.min_overall = 75.0;
    let outcome = service.preview(hypothetical)?;
    println!(
        "  counts   green {:>3}  yellow {:>3}  red {:>3}",
        outcome.counts.green, outcome.counts.yellow, outcome.counts.red
    );
    println!(
        "  baseline green {:>3}  yellow {:>3}  red {:>3}",
        outcome.baseline.green, outcome.baseline.yellow, outcome.baseline.red
    );
    println!(
        "  delta    green {:>+3}  yellow {:>+3}  red {:>+3}",
        outcome.delta.green, outcome.delta.yellow, outcome.delta.red
    );

    println!("\nReconciling records without a stored tier");
    let summary = service.reconcile()?;
    println!(
        "  assigned {} (skipped {}): green {} / yellow {} / red {}",
        summary.assigned,
        summary.skipped,
        summary.distribution.green,
        summary.distribution.yellow,
        summary.distribution.red
    );

    let rerun = service.reconcile()?;
    println!("  second pass assigned {} (idempotent)", rerun.assigned);

    Ok(())
}

fn print_ranking_table(results: &[RankingResult]) {
    println!(
        "  {:<14} {:>7}  {:>6} {:>8} {:>7} {:>10} {:>10} {:>13}",
        "provider", "score", "adc", "quality", "market", "financial", "ownership", "demographics"
    );
    for result in results {
        println!(
            "  {:<14} {:>7.1}  {:>6.1} {:>8.1} {:>7.1} {:>10.1} {:>10.1} {:>13.1}",
            result.provider_id.0,
            result.composite_score,
            result.breakdown.adc,
            result.breakdown.quality,
            result.breakdown.market,
            result.breakdown.financial,
            result.breakdown.ownership,
            result.breakdown.demographics
        );
    }
}
