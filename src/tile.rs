//! Map tiles: biome kinds, capacity limits and base production.

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::object::{ObjectCore, ObjectId};
use crate::resources::{ResourceKind, ResourceMap};

/// The closed set of tile biomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Forest,
    Grassland,
    Mountain,
    Lake,
    Ocean,
}

impl TileKind {
    pub fn name(self) -> &'static str {
        match self {
            TileKind::Forest => "Forest",
            TileKind::Grassland => "Grassland",
            TileKind::Mountain => "Mountain",
            TileKind::Lake => "Lake",
            TileKind::Ocean => "Ocean",
        }
    }

    /// (building capacity, worker capacity). Ocean takes no workers.
    pub fn capacities(self) -> (u32, u32) {
        match self {
            TileKind::Forest => (2, 3),
            TileKind::Grassland => (3, 3),
            TileKind::Mountain => (2, 3),
            TileKind::Lake => (2, 3),
            TileKind::Ocean => (4, 0),
        }
    }

    /// Default per-turn base production, scaled by worker efficiency.
    pub fn base_production(self) -> ResourceMap {
        match self {
            TileKind::Forest => ResourceMap::from([
                (ResourceKind::Money, 1),
                (ResourceKind::Food, 3),
                (ResourceKind::Wood, 5),
                (ResourceKind::Stone, 1),
            ]),
            TileKind::Grassland => ResourceMap::from([
                (ResourceKind::Money, 2),
                (ResourceKind::Food, 5),
                (ResourceKind::Wood, 1),
                (ResourceKind::Stone, 1),
            ]),
            TileKind::Mountain => ResourceMap::from([
                (ResourceKind::Money, 5),
                (ResourceKind::Stone, 5),
                (ResourceKind::Ore, 3),
            ]),
            TileKind::Lake => ResourceMap::from([
                (ResourceKind::Money, 2),
                (ResourceKind::Food, 8),
            ]),
            TileKind::Ocean => ResourceMap::from([
                (ResourceKind::Money, 2),
                (ResourceKind::Food, 8),
            ]),
        }
    }
}

/// One cell of the game grid. Created once during world generation and never
/// destroyed; buildings and workers attach and detach over its lifetime
/// through the object registry. Occupant lists hold bare ids and are read
/// defensively.
#[derive(Debug, Clone)]
pub struct Tile {
    pub core: ObjectCore,
    pub kind: TileKind,
    pub max_buildings: u32,
    pub max_workers: u32,
    pub base_production: ResourceMap,
    pub buildings: Vec<ObjectId>,
    pub workers: Vec<ObjectId>,
}

impl Tile {
    /// Tile with the kind's default capacities and production.
    pub fn new(id: ObjectId, kind: TileKind, coordinate: Coordinate) -> Self {
        let (max_buildings, max_workers) = kind.capacities();
        Self::with_profile(id, kind, coordinate, max_buildings, max_workers, kind.base_production())
    }

    /// Tile with explicit capacities and production; the noise generator uses
    /// this to force its biome overrides.
    pub fn with_profile(
        id: ObjectId,
        kind: TileKind,
        coordinate: Coordinate,
        max_buildings: u32,
        max_workers: u32,
        base_production: ResourceMap,
    ) -> Self {
        let mut core = ObjectCore::new(id);
        core.set_coordinate(coordinate);
        Self {
            core,
            kind,
            max_buildings,
            max_workers,
            base_production,
            buildings: Vec::new(),
            workers: Vec::new(),
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        // Tiles are constructed with a coordinate and never lose it.
        self.core
            .coordinate_opt()
            .expect("tile always has a coordinate")
    }
}
