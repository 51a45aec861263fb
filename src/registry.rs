//! The object registry: the single authoritative owner of every tile,
//! building and worker, plus the placement and production operations that
//! keep their cross-references consistent.
//!
//! All cross-references between entities are bare [`ObjectId`]s; whether a
//! reference is still valid is answered by an arena lookup at read time.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::building::{Building, BuildingKind};
use crate::coordinate::Coordinate;
use crate::error::{GameError, GameResult};
use crate::object::ObjectId;
use crate::player::{PlayerId, Players};
use crate::resources::{self, EfficiencyMap, ResourceKind, ResourceMap};
use crate::tile::{Tile, TileKind};
use crate::worker::{Worker, WorkerKind};

#[derive(Debug, Default)]
pub struct ObjectManager {
    next_id: u64,
    tiles: BTreeMap<ObjectId, Tile>,
    buildings: BTreeMap<ObjectId, Building>,
    workers: BTreeMap<ObjectId, Worker>,
    by_coordinate: HashMap<Coordinate, ObjectId>,
}

impl ObjectManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    /// True when the id resolves to any live entity.
    pub fn is_live(&self, id: ObjectId) -> bool {
        self.tiles.contains_key(&id)
            || self.buildings.contains_key(&id)
            || self.workers.contains_key(&id)
    }

    //
    // Tiles
    //

    /// Registers a tile built around a freshly allocated id. World generation
    /// is the only caller; tiles are never destroyed afterwards.
    pub fn add_tile(&mut self, build: impl FnOnce(ObjectId) -> Tile) -> ObjectId {
        let id = self.alloc_id();
        let tile = build(id);
        self.by_coordinate.insert(tile.coordinate(), id);
        self.tiles.insert(id, tile);
        id
    }

    pub fn tile(&self, id: ObjectId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    pub fn tile_mut(&mut self, id: ObjectId) -> Option<&mut Tile> {
        self.tiles.get_mut(&id)
    }

    pub fn tile_at(&self, coordinate: Coordinate) -> Option<ObjectId> {
        self.by_coordinate.get(&coordinate).copied()
    }

    /// Tile ids for every coordinate that has a tile, preserving the order of
    /// the queried coordinates.
    pub fn tiles_at(&self, coordinates: &[Coordinate]) -> Vec<ObjectId> {
        coordinates
            .iter()
            .filter_map(|c| self.tile_at(*c))
            .collect()
    }

    /// All tiles in creation order.
    pub fn tiles(&self) -> impl Iterator<Item = (ObjectId, &Tile)> {
        self.tiles.iter().map(|(id, t)| (*id, t))
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    //
    // Buildings and workers
    //

    pub fn create_building(&mut self, kind: BuildingKind, owner: Option<PlayerId>) -> ObjectId {
        let id = self.alloc_id();
        let mut building = Building::new(id, kind);
        building.core.set_owner(owner);
        self.buildings.insert(id, building);
        id
    }

    pub fn create_worker(&mut self, kind: WorkerKind, owner: Option<PlayerId>) -> ObjectId {
        let id = self.alloc_id();
        let mut worker = Worker::new(id, kind);
        worker.core.set_owner(owner);
        self.workers.insert(id, worker);
        id
    }

    pub fn building(&self, id: ObjectId) -> Option<&Building> {
        self.buildings.get(&id)
    }

    pub fn building_mut(&mut self, id: ObjectId) -> Option<&mut Building> {
        self.buildings.get_mut(&id)
    }

    pub fn worker(&self, id: ObjectId) -> Option<&Worker> {
        self.workers.get(&id)
    }

    pub fn worker_mut(&mut self, id: ObjectId) -> Option<&mut Worker> {
        self.workers.get_mut(&id)
    }

    /// Removes a building from the arena, detaching it from its tile first.
    /// Unknown ids are a registry-level error.
    pub fn remove_building(&mut self, id: ObjectId) -> GameResult<()> {
        if !self.buildings.contains_key(&id) {
            return Err(GameError::KeyNotFound(format!("building {id}")));
        }
        if let Some(tile_id) = self.buildings[&id].tile {
            self.detach_building(tile_id, id);
        }
        self.buildings.remove(&id);
        Ok(())
    }

    /// Removes a worker from the arena, detaching it from its tile first.
    pub fn remove_worker(&mut self, id: ObjectId) -> GameResult<()> {
        if !self.workers.contains_key(&id) {
            return Err(GameError::KeyNotFound(format!("worker {id}")));
        }
        if let Some(tile_id) = self.workers[&id].tile {
            self.detach_worker(tile_id, id);
        }
        self.workers.remove(&id);
        Ok(())
    }

    //
    // Occupancy accounting
    //

    /// Tile space taken by the tile's buildings. Ids that no longer resolve
    /// count as zero.
    pub fn building_space_used(&self, tile: &Tile) -> u32 {
        tile.buildings
            .iter()
            .filter_map(|id| self.buildings.get(id))
            .map(|b| b.spaces)
            .sum()
    }

    pub fn worker_space_used(&self, tile: &Tile) -> u32 {
        tile.workers
            .iter()
            .filter_map(|id| self.workers.get(id))
            .map(|w| w.spaces)
            .sum()
    }

    pub fn has_space_for_buildings(&self, tile: &Tile, amount: u32) -> bool {
        self.building_space_used(tile) + amount <= tile.max_buildings
    }

    pub fn has_space_for_workers(&self, tile: &Tile, amount: u32) -> bool {
        self.worker_space_used(tile) + amount <= tile.max_workers
    }

    //
    // Placement
    //

    /// Places a building on a tile: re-resolves both entities from the arena,
    /// checks the placement predicate and remaining capacity, then commits
    /// the coordinate, the back-reference and the occupant entry. Nothing is
    /// mutated on failure. A Forest tile stamps one hold marker on the new
    /// building (construction delay).
    pub fn add_building_to_tile(&mut self, tile_id: ObjectId, building_id: ObjectId) -> GameResult<()> {
        let tile = self
            .tiles
            .get(&tile_id)
            .ok_or_else(|| GameError::Integrity(format!("tile {tile_id} not registered")))?;
        let building = self
            .buildings
            .get(&building_id)
            .ok_or_else(|| GameError::Integrity(format!("building {building_id} not registered")))?;

        if !building.can_place_on(tile) {
            return Err(GameError::IllegalPlacement(format!(
                "can't place building {building_id} on tile {tile_id}"
            )));
        }
        if !self.has_space_for_buildings(tile, building.spaces) {
            return Err(GameError::InsufficientSpace { tile: tile_id });
        }

        let coordinate = tile.coordinate();
        let forest = tile.kind == TileKind::Forest;
        let building = self.buildings.get_mut(&building_id).expect("checked above");
        building.core.set_coordinate(coordinate);
        building.tile = Some(tile_id);
        if forest {
            building.hold_markers += 1;
        }
        self.tiles
            .get_mut(&tile_id)
            .expect("checked above")
            .buildings
            .push(building_id);
        Ok(())
    }

    /// Places a worker on a tile; same contract as
    /// [`add_building_to_tile`](Self::add_building_to_tile).
    pub fn add_worker_to_tile(&mut self, tile_id: ObjectId, worker_id: ObjectId) -> GameResult<()> {
        let tile = self
            .tiles
            .get(&tile_id)
            .ok_or_else(|| GameError::Integrity(format!("tile {tile_id} not registered")))?;
        let worker = self
            .workers
            .get(&worker_id)
            .ok_or_else(|| GameError::Integrity(format!("worker {worker_id} not registered")))?;

        if !worker.can_place_on(tile) {
            return Err(GameError::IllegalPlacement(format!(
                "can't place worker {worker_id} on tile {tile_id}"
            )));
        }
        if !self.has_space_for_workers(tile, worker.spaces) {
            return Err(GameError::InsufficientSpace { tile: tile_id });
        }

        let coordinate = tile.coordinate();
        let worker = self.workers.get_mut(&worker_id).expect("checked above");
        worker.core.set_coordinate(coordinate);
        worker.tile = Some(tile_id);
        self.tiles
            .get_mut(&tile_id)
            .expect("checked above")
            .workers
            .push(worker_id);
        Ok(())
    }

    /// Detaches a building from a tile's occupant list and clears its
    /// placement. A building the tile doesn't hold is a logged no-op.
    pub fn detach_building(&mut self, tile_id: ObjectId, building_id: ObjectId) {
        let held = self
            .tiles
            .get_mut(&tile_id)
            .map(|tile| {
                let before = tile.buildings.len();
                tile.buildings.retain(|id| *id != building_id);
                tile.buildings.len() != before
            })
            .unwrap_or(false);
        if held {
            if let Some(building) = self.buildings.get_mut(&building_id) {
                building.core.unset_coordinate();
                building.tile = None;
            }
        } else {
            debug!(tile = %tile_id, building = %building_id, "tile doesn't hold building");
        }
    }

    /// Worker counterpart of [`detach_building`](Self::detach_building).
    pub fn detach_worker(&mut self, tile_id: ObjectId, worker_id: ObjectId) {
        let held = self
            .tiles
            .get_mut(&tile_id)
            .map(|tile| {
                let before = tile.workers.len();
                tile.workers.retain(|id| *id != worker_id);
                tile.workers.len() != before
            })
            .unwrap_or(false);
        if held {
            if let Some(worker) = self.workers.get_mut(&worker_id) {
                worker.core.unset_coordinate();
                worker.tile = None;
            }
        } else {
            debug!(tile = %tile_id, worker = %worker_id, "tile doesn't hold worker");
        }
    }

    //
    // Build effects
    //

    /// Runs a building's on-build claim: every unowned tile within the
    /// kind's claim radius becomes the builder's, and the building's own
    /// tile is claimed regardless of prior ownership.
    pub fn apply_build_effects(&mut self, building_id: ObjectId) -> GameResult<()> {
        let building = self
            .buildings
            .get(&building_id)
            .ok_or_else(|| GameError::Integrity(format!("building {building_id} not registered")))?;
        let Some(radius) = building.kind.claim_radius() else {
            return Ok(());
        };
        let owner = building.core.owner();
        let center = building.core.coordinate()?;

        let neighbours = self.tiles_at(&center.neighbours_within_radius(radius));
        for tile_id in neighbours {
            let tile = self.tiles.get_mut(&tile_id).expect("id from coordinate index");
            if tile.core.owner().is_none() {
                tile.core.set_owner(owner);
            }
        }
        if let Some(own_tile) = self.tile_at(center) {
            self.tiles
                .get_mut(&own_tile)
                .expect("id from coordinate index")
                .core
                .set_owner(owner);
        }
        Ok(())
    }

    //
    // Production
    //

    /// Runs the tile's per-turn production and applies the net result to the
    /// owner's ledger. Worker upkeep is committed as part of the work action
    /// and building hold markers age by one. Returns whether the ledger
    /// modification succeeded; `false` marks the tile resource-starved for
    /// this turn.
    pub fn generate_resources(&mut self, tile_id: ObjectId, players: &mut Players) -> GameResult<bool> {
        let tile = self
            .tiles
            .get(&tile_id)
            .ok_or_else(|| GameError::Integrity(format!("tile {tile_id} not registered")))?;
        let worker_ids = tile.workers.clone();
        let building_ids = tile.buildings.clone();
        let base_production = tile.base_production.clone();
        let tile_owner = tile.core.owner();

        let mut efficiency = EfficiencyMap::zeroed();
        for id in worker_ids {
            let Some(worker) = self.workers.get(&id) else {
                debug!(tile = %tile_id, worker = %id, "stale worker reference");
                continue;
            };
            let satisfaction = upkeep_satisfaction(players, worker.core.owner(), true);
            let modifier = worker.work_modifier(satisfaction);
            efficiency = resources::merge_efficiency(&efficiency, &modifier);
        }

        let mut total = resources::multiply(&base_production, &efficiency);
        for id in building_ids {
            let Some(building) = self.buildings.get_mut(&id) else {
                debug!(tile = %tile_id, building = %id, "stale building reference");
                continue;
            };
            total = resources::merge(&total, &building.production());
        }

        Ok(players.modify_resources(tile_owner, &total, true))
    }

    /// What [`generate_resources`](Self::generate_resources) would yield for
    /// the tile this turn, without mutating ledgers or hold markers.
    pub fn preview_production(&self, tile_id: ObjectId, players: &mut Players) -> GameResult<ResourceMap> {
        let tile = self
            .tiles
            .get(&tile_id)
            .ok_or_else(|| GameError::Integrity(format!("tile {tile_id} not registered")))?;

        let mut efficiency = EfficiencyMap::zeroed();
        for id in &tile.workers {
            let Some(worker) = self.workers.get(id) else {
                continue;
            };
            let satisfaction = upkeep_satisfaction(players, worker.core.owner(), false);
            efficiency =
                resources::merge_efficiency(&efficiency, &worker.work_modifier(satisfaction));
        }

        let mut total = resources::multiply(&tile.base_production, &efficiency);
        for id in &tile.buildings {
            if let Some(building) = self.buildings.get(id) {
                total = resources::merge(&total, &building.peek_production());
            }
        }
        Ok(total)
    }
}

/// Upkeep-derived productivity scalar: 0.5 once the owner affords 1 FOOD,
/// 1.0 once they afford 1 MONEY on top, 0 otherwise. With `commit` the
/// affordable deductions are applied to the ledger.
fn upkeep_satisfaction(players: &mut Players, owner: Option<PlayerId>, commit: bool) -> f64 {
    if owner.is_none() {
        return 0.0;
    }
    let mut satisfaction = 0.0;
    if players.modify_resource(owner, ResourceKind::Food, -1, commit) {
        satisfaction = 0.5;
        if players.modify_resource(owner, ResourceKind::Money, -1, commit) {
            satisfaction = 1.0;
        }
    }
    satisfaction
}
