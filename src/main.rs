use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use tracing::info;

mod config;
mod engine;
mod model;
mod tuning;

use config::{Config, OutputFormat};
use engine::{predict, PredictionInput, PredictionResult};
use model::{GameLog, H2hGame, MatchupProfile, OpponentAllowedStats, TeamProfile, TeamRanks};
use tuning::FormulaConfig;

/// On-disk input: everything one prediction needs, as supplied by
/// whatever gathered the game logs.
#[derive(Debug, Deserialize)]
struct MatchupFixture {
    as_of: chrono::NaiveDate,
    home: TeamFixture,
    away: TeamFixture,
    #[serde(default)]
    h2h_games: Vec<H2hGame>,
}

#[derive(Debug, Deserialize)]
struct TeamFixture {
    team_id: String,
    ranks: TeamRanks,
    rest_days: u32,
    game_logs: Vec<GameLog>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let tuning = load_tuning(&config)?;
    let raw = std::fs::read_to_string(&config.input)
        .with_context(|| format!("reading fixture {}", config.input.display()))?;
    let fixture: MatchupFixture = serde_json::from_str(&raw)
        .with_context(|| format!("parsing fixture {}", config.input.display()))?;

    let input = build_input(&fixture, config.line, &tuning)?;
    info!(
        home = %input.home.team_id,
        away = %input.away.team_id,
        as_of = %fixture.as_of,
        "fixture loaded"
    );

    let result = predict(&input, &tuning);

    match config.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => print_text(&result, config.line),
    }
    Ok(())
}

fn load_tuning(config: &Config) -> Result<FormulaConfig> {
    match &config.tuning {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading tuning file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing tuning file {}", path.display()))
        }
        None => Ok(FormulaConfig::default()),
    }
}

fn build_input(
    fixture: &MatchupFixture,
    line: Option<f64>,
    tuning: &FormulaConfig,
) -> Result<PredictionInput> {
    let home = TeamProfile::build(
        &fixture.home.team_id,
        fixture.home.ranks,
        &fixture.home.game_logs,
        fixture.as_of,
    )?;
    let away = TeamProfile::build(
        &fixture.away.team_id,
        fixture.away.ranks,
        &fixture.away.game_logs,
        fixture.as_of,
    )?;
    let matchup = MatchupProfile::build(
        &fixture.home.team_id,
        &fixture.away.team_id,
        &fixture.h2h_games,
        &fixture.home.game_logs,
        &fixture.away.game_logs,
        &tuning.matchup,
        fixture.as_of,
    );
    let home_allowed =
        OpponentAllowedStats::from_logs(&fixture.home.game_logs, &tuning.league, fixture.as_of);
    let away_allowed =
        OpponentAllowedStats::from_logs(&fixture.away.game_logs, &tuning.league, fixture.as_of);

    Ok(PredictionInput {
        home,
        away,
        matchup,
        home_allowed,
        away_allowed,
        rest_days_home: fixture.home.rest_days,
        rest_days_away: fixture.away.rest_days,
        reference_line: line,
    })
}

fn print_text(result: &PredictionResult, line: Option<f64>) {
    println!(
        "{} @ {}  (formula v{})",
        result.away_team, result.home_team, result.formula_version
    );
    println!();
    for entry in &result.breakdown {
        println!("  {:<18} {}", entry.stage(), entry.rationale);
    }
    println!();
    println!(
        "  {:<10} {:>6.1}",
        result.home_team, result.home_projected
    );
    println!(
        "  {:<10} {:>6.1}",
        result.away_team, result.away_projected
    );
    println!(
        "  total      {:>6.1}  (pace {:?})",
        result.predicted_total, result.projected_pace
    );
    if let Some(line) = line {
        println!(
            "  line       {:>6.1}  (edge {:+.1})",
            line,
            result.predicted_total - line
        );
    }
}
