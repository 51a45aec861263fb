use std::fs;

use fiefdom::error::GameError;
use fiefdom::scenario::{GeneratorKind, MapConfig, PlayerConfig, Scenario};
use fiefdom::{GameManager, ScenarioLoader};

const MINIMAL: &str = "\
name: smoke
seed: 7
players:
  - name: Aino
";

fn base_scenario() -> Scenario {
    Scenario {
        name: "base".into(),
        seed: 1,
        rounds: 30,
        map: MapConfig { width: 10, height: 10 },
        generator: GeneratorKind::Weighted,
        players: vec![
            PlayerConfig {
                name: "Aino".into(),
                color: None,
            },
            PlayerConfig {
                name: "Veikko".into(),
                color: None,
            },
        ],
    }
}

#[test]
fn minimal_scenario_fills_in_defaults() {
    let scenario = Scenario::from_yaml(MINIMAL).unwrap();
    assert_eq!(scenario.name, "smoke");
    assert_eq!(scenario.seed, 7);
    assert_eq!(scenario.rounds, 30);
    assert_eq!(scenario.map.width, 30);
    assert_eq!(scenario.map.height, 20);
    assert_eq!(scenario.generator, GeneratorKind::Noise);
    assert_eq!(scenario.players.len(), 1);
    assert!(scenario.players[0].color.is_none());
    scenario.validate().unwrap();
}

#[test]
fn explicit_fields_override_defaults() {
    let text = "\
name: custom
seed: 11
rounds: 100
map:
  width: 16
  height: 9
generator: weighted
players:
  - name: Aino
    color: \"#123456\"
";
    let scenario = Scenario::from_yaml(text).unwrap();
    assert_eq!(scenario.rounds, 100);
    assert_eq!(scenario.map.width, 16);
    assert_eq!(scenario.map.height, 9);
    assert_eq!(scenario.generator, GeneratorKind::Weighted);
    assert_eq!(scenario.players[0].color.as_deref(), Some("#123456"));
}

#[test]
fn round_and_map_limits_are_enforced() {
    let mut scenario = base_scenario();
    scenario.rounds = 5;
    assert!(matches!(scenario.validate(), Err(GameError::InvalidScenario(_))));

    let mut scenario = base_scenario();
    scenario.rounds = 1001;
    assert!(matches!(scenario.validate(), Err(GameError::InvalidScenario(_))));

    let mut scenario = base_scenario();
    scenario.map.width = 2;
    assert!(matches!(scenario.validate(), Err(GameError::InvalidScenario(_))));

    let mut scenario = base_scenario();
    scenario.map.height = 1;
    assert!(matches!(scenario.validate(), Err(GameError::InvalidScenario(_))));
}

#[test]
fn roster_rules_are_enforced() {
    let mut scenario = base_scenario();
    scenario.players.clear();
    assert!(matches!(scenario.validate(), Err(GameError::InvalidScenario(_))));

    let mut scenario = base_scenario();
    scenario.players[1].name = "Aino".into();
    assert!(matches!(scenario.validate(), Err(GameError::InvalidScenario(_))));

    let mut scenario = base_scenario();
    scenario.players[0].name = "Thirteen chars".into();
    assert!(matches!(scenario.validate(), Err(GameError::InvalidScenario(_))));

    let mut scenario = base_scenario();
    scenario.players[0].color = Some("#123456".into());
    scenario.players[1].color = Some("#123456".into());
    assert!(matches!(scenario.validate(), Err(GameError::InvalidScenario(_))));

    let mut scenario = base_scenario();
    scenario.players = (0..9)
        .map(|i| PlayerConfig {
            name: format!("Player {i}"),
            color: None,
        })
        .collect();
    assert!(matches!(scenario.validate(), Err(GameError::InvalidScenario(_))));
}

#[test]
fn loader_resolves_relative_to_its_base_dir() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("game.yaml"), MINIMAL).unwrap();

    let scenario = ScenarioLoader::new(dir.path()).load("game.yaml").unwrap();
    assert_eq!(scenario.name, "smoke");

    assert!(ScenarioLoader::new(dir.path()).load("missing.yaml").is_err());
}

#[test]
fn shipped_scenario_parses_and_validates() {
    let loader = ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"));
    let scenario = loader.load("scenarios/heartlands.yaml").unwrap();
    scenario.validate().unwrap();
    assert_eq!(scenario.players.len(), 2);
}

#[test]
fn invalid_scenarios_never_become_games() {
    let mut scenario = base_scenario();
    scenario.rounds = 5;
    assert!(matches!(
        GameManager::new(&scenario),
        Err(GameError::InvalidScenario(_))
    ));
}
