//! Turn and player orchestration: the state machine driving claim, build,
//! hire and end-of-turn production, plus final scoring.

use tracing::{debug, info};

use crate::building::{kind_can_place, BuildingKind};
use crate::error::{GameError, GameResult};
use crate::object::ObjectId;
use crate::player::{Player, PlayerId, Players, PLAYER_PALETTE};
use crate::registry::ObjectManager;
use crate::resources::{self, ResourceKind, ResourceMap};
use crate::scenario::{GeneratorKind, Scenario, MAX_PLAYER_NAME_LEN, MIN_ROUND_COUNT};
use crate::tile::TileKind;
use crate::worker::WorkerKind;
use crate::worldgen::{self, NoiseBands, WeightedTable};

/// Points granted for each owned tile at scoring time.
const TILE_SCORE: i64 = 50;

/// Drives a whole game: `not started → player N's turn (round R) → game
/// over`. All player-initiated actions validate fully before mutating
/// anything; a returned error leaves the game state untouched.
#[derive(Debug)]
pub struct GameManager {
    registry: ObjectManager,
    players: Players,
    current_player: usize,
    current_round: u32,
    total_rounds: u32,
    game_over: bool,
    map_width: u32,
    map_height: u32,
}

impl GameManager {
    /// Builds the roster, generates the world and stands at round 1,
    /// player 0.
    pub fn new(scenario: &Scenario) -> GameResult<Self> {
        scenario.validate()?;

        let mut manager = Self {
            registry: ObjectManager::new(),
            players: Players::new(),
            current_player: 0,
            current_round: 1,
            total_rounds: scenario.rounds,
            game_over: false,
            map_width: scenario.map.width,
            map_height: scenario.map.height,
        };

        for (index, config) in scenario.players.iter().enumerate() {
            let color = config
                .color
                .clone()
                .unwrap_or_else(|| PLAYER_PALETTE[index % PLAYER_PALETTE.len()].to_string());
            manager.add_player(&config.name, &color)?;
        }

        match scenario.generator {
            GeneratorKind::Noise => worldgen::generate_noise(
                &mut manager.registry,
                &NoiseBands::classic(),
                manager.map_width,
                manager.map_height,
                scenario.seed,
            ),
            GeneratorKind::Weighted => worldgen::generate_weighted(
                &mut manager.registry,
                &WeightedTable::classic(),
                manager.map_width,
                manager.map_height,
                scenario.seed,
            ),
        }

        Ok(manager)
    }

    fn add_player(&mut self, name: &str, color: &str) -> GameResult<PlayerId> {
        if name.is_empty() {
            return Err(GameError::InvalidScenario("player name can't be empty".into()));
        }
        if name.len() > MAX_PLAYER_NAME_LEN {
            return Err(GameError::InvalidScenario(format!("player name too long: {name}")));
        }
        if self.players.iter().any(|(_, p)| p.name == name) {
            return Err(GameError::InvalidScenario(format!("player name taken: {name}")));
        }
        if self.players.iter().any(|(_, p)| p.color == color) {
            return Err(GameError::InvalidScenario(format!("player color taken: {color}")));
        }
        Ok(self.players.add(Player::new(name, color)))
    }

    //
    // Queries
    //

    pub fn registry(&self) -> &ObjectManager {
        &self.registry
    }

    /// Direct registry access for the presentation layer and tooling.
    pub fn registry_mut(&mut self) -> &mut ObjectManager {
        &mut self.registry
    }

    pub fn players(&self) -> &Players {
        &self.players
    }

    pub fn players_mut(&mut self) -> &mut Players {
        &mut self.players
    }

    pub fn map_size(&self) -> (u32, u32) {
        (self.map_width, self.map_height)
    }

    pub fn current_player(&self) -> PlayerId {
        PlayerId(self.current_player as u32)
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Ids of the player's still-standing buildings and workers. Dead ids
    /// are pruned from the player's list as they are discovered.
    pub fn player_holdings(&mut self, player: PlayerId) -> Vec<ObjectId> {
        let registry = &self.registry;
        self.players
            .get_mut(player)
            .map(|p| p.live_objects(|id| registry.is_live(id)))
            .unwrap_or_default()
    }

    /// Changes the total round count mid-game. Rejected (returning `false`)
    /// below the minimum or below the round already reached.
    pub fn set_round_count(&mut self, rounds: u32) -> bool {
        if rounds >= MIN_ROUND_COUNT && rounds >= self.current_round {
            self.total_rounds = rounds;
            true
        } else {
            false
        }
    }

    //
    // Actions
    //

    /// Claims an unowned tile for the acting player at the fixed claim cost.
    pub fn claim_area(&mut self, tile_id: ObjectId) -> GameResult<()> {
        let tile = self
            .registry
            .tile(tile_id)
            .ok_or_else(|| GameError::KeyNotFound(format!("tile {tile_id}")))?;
        if tile.core.owner().is_some() {
            return Err(GameError::OwnerConflict);
        }
        let player = self.current_player();
        if !self
            .players
            .modify_resources(Some(player), &resources::claim_cost(), true)
        {
            return Err(GameError::InsufficientFunds);
        }
        self.registry
            .tile_mut(tile_id)
            .expect("checked above")
            .core
            .set_owner(Some(player));
        Ok(())
    }

    /// Constructs a building of `kind` on a tile the acting player owns.
    ///
    /// Validation order: tile capacity, tile ownership, kind placement rules
    /// (including the water restrictions), then affordability; the cost is
    /// deducted only once everything else has passed.
    pub fn add_building_on_tile(
        &mut self,
        tile_id: ObjectId,
        kind: BuildingKind,
    ) -> GameResult<ObjectId> {
        let player = self.current_player();
        let tile = self
            .registry
            .tile(tile_id)
            .ok_or_else(|| GameError::KeyNotFound(format!("tile {tile_id}")))?;

        if !self.registry.has_space_for_buildings(tile, 1) {
            return Err(GameError::InsufficientSpace { tile: tile_id });
        }
        if tile.core.owner() != Some(player) {
            return Err(GameError::OwnerConflict);
        }
        if !kind_can_place(kind, Some(player), tile) {
            return Err(GameError::IllegalPlacement(format!(
                "{} can't be built on {}",
                kind.name(),
                tile.kind.name()
            )));
        }
        // Water tiles only take amphibious structures.
        if tile.kind == TileKind::Ocean && kind != BuildingKind::FishingBoat {
            return Err(GameError::IllegalPlacement(format!(
                "{} can't be built on Ocean",
                kind.name()
            )));
        }
        if tile.kind == TileKind::Lake
            && !matches!(kind, BuildingKind::FishingBoat | BuildingKind::Cottage)
        {
            return Err(GameError::IllegalPlacement(format!(
                "{} can't be built on Lake",
                kind.name()
            )));
        }

        let cost = resources::multiply(&kind.build_cost(), &resources::negate_all());
        if !self.players.modify_resources(Some(player), &cost, true) {
            return Err(GameError::InsufficientFunds);
        }

        let building_id = self.registry.create_building(kind, Some(player));
        self.registry.add_building_to_tile(tile_id, building_id)?;
        self.registry.apply_build_effects(building_id)?;
        if let Some(p) = self.players.get_mut(player) {
            p.add_object(building_id);
        }
        Ok(building_id)
    }

    /// Hires a worker of `kind` onto a tile the acting player owns.
    pub fn add_worker_on_tile(
        &mut self,
        tile_id: ObjectId,
        kind: WorkerKind,
    ) -> GameResult<ObjectId> {
        let player = self.current_player();
        let tile = self
            .registry
            .tile(tile_id)
            .ok_or_else(|| GameError::KeyNotFound(format!("tile {tile_id}")))?;

        if tile.core.owner() != Some(player) {
            return Err(GameError::OwnerConflict);
        }
        if !self.registry.has_space_for_workers(tile, 1) {
            return Err(GameError::InsufficientSpace { tile: tile_id });
        }

        let cost = resources::multiply(&kind.recruitment_cost(), &resources::negate_all());
        if !self.players.modify_resources(Some(player), &cost, true) {
            return Err(GameError::InsufficientFunds);
        }

        let worker_id = self.registry.create_worker(kind, Some(player));
        self.registry.add_worker_to_tile(tile_id, worker_id)?;
        if let Some(p) = self.players.get_mut(player) {
            p.add_object(worker_id);
        }
        Ok(worker_id)
    }

    /// Tears down a building wherever it stands.
    pub fn remove_building(&mut self, building_id: ObjectId) -> GameResult<()> {
        self.registry.remove_building(building_id)
    }

    /// Dismisses a worker wherever it stands.
    pub fn remove_worker(&mut self, worker_id: ObjectId) -> GameResult<()> {
        self.registry.remove_worker(worker_id)
    }

    /// Net production the tile would yield this turn, without committing
    /// anything.
    pub fn production_preview(&mut self, tile_id: ObjectId) -> GameResult<ResourceMap> {
        self.registry.preview_production(tile_id, &mut self.players)
    }

    //
    // Turn progression
    //

    /// Runs production for every tile and advances to the next player,
    /// wrapping to player 0 and bumping the round counter after the last
    /// player. Once the round counter would pass the total, the game is
    /// over and further calls do nothing.
    pub fn end_turn(&mut self) -> GameResult<()> {
        if self.game_over {
            return Ok(());
        }
        self.run_production()?;

        if self.current_player == self.players.len().saturating_sub(1) {
            self.current_player = 0;
            self.current_round += 1;
            info!(round = self.current_round, "round finished");

            if self.current_round > self.total_rounds {
                self.game_over = true;
                self.current_round = self.total_rounds;
                info!("game over");
            }
        } else {
            self.current_player += 1;
        }
        Ok(())
    }

    /// Production step: every tile attempts production first; only after all
    /// tiles have contributed are the occupants of the tiles that couldn't
    /// pay stripped. The two passes let a rich tile feed the treasury before
    /// a poor one is punished.
    fn run_production(&mut self) -> GameResult<()> {
        let tile_ids: Vec<ObjectId> = self.registry.tiles().map(|(id, _)| id).collect();
        let mut starved = Vec::new();

        for tile_id in &tile_ids {
            if !self.registry.generate_resources(*tile_id, &mut self.players)? {
                starved.push(*tile_id);
            }
        }

        for tile_id in starved {
            debug!(tile = %tile_id, "tile starved, removing occupants");
            let (workers, buildings) = match self.registry.tile(tile_id) {
                Some(tile) => (tile.workers.clone(), tile.buildings.clone()),
                None => continue,
            };
            for worker in workers {
                self.registry.remove_worker(worker)?;
            }
            for building in buildings {
                self.registry.remove_building(building)?;
            }
        }
        Ok(())
    }

    //
    // Scoring
    //

    /// Final ranking: (score, player name) sorted ascending by score, names
    /// breaking ties.
    ///
    /// Score = resource ledger (WOOD/FOOD/STONE at face value, ORE and MONEY
    /// double) + 50 per owned tile + the sunk build and recruitment costs of
    /// every owned building and worker, weighted the same way.
    pub fn calculate_scores(&self) -> Vec<(i64, String)> {
        let mut scores: Vec<i64> = self
            .players
            .iter()
            .map(|(_, p)| score_value(p.ledger()))
            .collect();

        // Owners outside the roster are skipped, matching the defensive
        // read policy for every other dangling reference.
        let credit = |scores: &mut Vec<i64>, owner: Option<PlayerId>, points: i64| {
            if let Some(slot) = owner.and_then(|o| scores.get_mut(o.0 as usize)) {
                *slot += points;
            }
        };

        for (_, tile) in self.registry.tiles() {
            credit(&mut scores, tile.core.owner(), TILE_SCORE);
            for id in &tile.buildings {
                if let Some(building) = self.registry.building(*id) {
                    let points = score_value(&building.kind.build_cost());
                    credit(&mut scores, building.core.owner(), points);
                }
            }
            for id in &tile.workers {
                if let Some(worker) = self.registry.worker(*id) {
                    let points = score_value(&worker.kind.recruitment_cost());
                    credit(&mut scores, worker.core.owner(), points);
                }
            }
        }

        let mut ranking: Vec<(i64, String)> = self
            .players
            .iter()
            .map(|(id, p)| (scores[id.0 as usize], p.name.clone()))
            .collect();
        ranking.sort();
        ranking
    }
}

/// Scoring weight of a resource map: WOOD, FOOD and STONE count 1:1, ORE and
/// MONEY count double.
fn score_value(map: &ResourceMap) -> i64 {
    map.get(ResourceKind::Wood)
        + map.get(ResourceKind::Food)
        + map.get(ResourceKind::Stone)
        + map.get(ResourceKind::Ore) * 2
        + map.get(ResourceKind::Money) * 2
}
