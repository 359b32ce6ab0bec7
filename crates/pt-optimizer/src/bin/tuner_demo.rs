//! Non-interactive demo: optimize a synthetic coupled oracle and print the
//! report as JSON. Budget and variable count come from the environment.

use rand::Rng;

use pt_optimizer::Optimizer;
use pt_oracle::FnOracle;
use pt_types::TunerConfig;

fn env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let variable_count = env_usize("POINTTUNER_VARS", 8);
    let total_points = env_usize("POINTTUNER_BUDGET", 40) as u32;

    // Synthetic oracle: per-variable linear weights plus a few pairwise
    // coupling terms, the shape the optimizer is built for.
    let mut rng = rand::rng();
    let weights: Vec<f64> = (0..variable_count)
        .map(|_| rng.random_range(0.5..3.0))
        .collect();
    let couplings: Vec<(usize, usize, f64)> = (0..variable_count / 2)
        .map(|_| {
            (
                rng.random_range(0..variable_count),
                rng.random_range(0..variable_count),
                rng.random_range(0.1..0.5),
            )
        })
        .collect();

    let mut oracle = FnOracle::new(move |points: &[u32]| {
        let linear: f64 = points
            .iter()
            .zip(&weights)
            .map(|(&p, w)| w * p as f64)
            .sum();
        let coupled: f64 = couplings
            .iter()
            .map(|&(a, b, w)| w * (points[a] * points[b]) as f64)
            .sum();
        1.0 + linear + coupled
    });

    let optimizer = Optimizer::new(TunerConfig::default())?;
    let report = optimizer.run(&mut oracle, variable_count, total_points)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    println!(
        "score {:.3} -> {:.3} (+{:.1}%) in {} oracle calls",
        report.initial_score,
        report.final_score,
        report.improvement_pct(),
        report.oracle_calls
    );
    Ok(())
}
