use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use fiefdom::{GameManager, ScenarioLoader};

#[derive(Debug, Parser)]
#[command(author, version, about = "fiefdom headless game runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/heartlands.yaml")]
    scenario: PathBuf,

    /// Override round count (uses scenario default when omitted)
    #[arg(long)]
    rounds: Option<u32>,

    /// Override world seed
    #[arg(long)]
    seed: Option<u64>,

    /// Emit the final scores as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let mut scenario = loader.load(&cli.scenario)?;
    if let Some(rounds) = cli.rounds {
        scenario.rounds = rounds;
    }
    if let Some(seed) = cli.seed {
        scenario.seed = seed;
    }

    let mut game = GameManager::new(&scenario)?;
    while !game.is_game_over() {
        game.end_turn()?;
    }

    let ranking = game.calculate_scores();
    if cli.json {
        let report = json!({
            "scenario": scenario.name,
            "rounds": game.total_rounds(),
            "scores": ranking
                .iter()
                .rev()
                .map(|(score, name)| json!({ "player": name, "score": score }))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Final scores for '{}' after {} rounds:", scenario.name, game.total_rounds());
        for (place, (score, name)) in ranking.iter().rev().enumerate() {
            println!("  {}. {name}: {score}", place + 1);
        }
    }
    Ok(())
}
