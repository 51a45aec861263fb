//! Workers: per-kind efficiency/cost tables, resource focus and the
//! satisfaction-scaled work contribution.

use serde::{Deserialize, Serialize};

use crate::object::{ObjectCore, ObjectId};
use crate::resources::{EfficiencyMap, ResourceKind, ResourceMap};
use crate::tile::Tile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerKind {
    Basic,
    Farmer,
    Miner,
}

impl WorkerKind {
    pub const ALL: [WorkerKind; 3] = [WorkerKind::Basic, WorkerKind::Farmer, WorkerKind::Miner];

    pub fn name(self) -> &'static str {
        match self {
            WorkerKind::Basic => "Basic Worker",
            WorkerKind::Farmer => "Farmer",
            WorkerKind::Miner => "Miner",
        }
    }

    pub fn recruitment_cost(self) -> ResourceMap {
        match self {
            WorkerKind::Basic => ResourceMap::from([
                (ResourceKind::Money, 10),
                (ResourceKind::Food, 25),
            ]),
            WorkerKind::Farmer => ResourceMap::from([
                (ResourceKind::Money, 25),
                (ResourceKind::Food, 25),
            ]),
            WorkerKind::Miner => ResourceMap::from([
                (ResourceKind::Money, 10),
                (ResourceKind::Food, 30),
                (ResourceKind::Stone, 25),
                (ResourceKind::Ore, 25),
            ]),
        }
    }

    pub fn efficiency(self) -> EfficiencyMap {
        match self {
            WorkerKind::Basic => EfficiencyMap::from([
                (ResourceKind::Money, 1.0),
                (ResourceKind::Food, 1.0),
                (ResourceKind::Wood, 0.75),
                (ResourceKind::Stone, 0.5),
                (ResourceKind::Ore, 0.5),
            ]),
            WorkerKind::Farmer => EfficiencyMap::from([
                (ResourceKind::Money, 1.0),
                (ResourceKind::Food, 2.0),
                (ResourceKind::Wood, 0.5),
                (ResourceKind::Stone, 0.5),
                (ResourceKind::Ore, 0.5),
            ]),
            WorkerKind::Miner => EfficiencyMap::from([
                (ResourceKind::Money, 2.0),
                (ResourceKind::Food, 0.5),
                (ResourceKind::Wood, 0.5),
                (ResourceKind::Stone, 2.0),
                (ResourceKind::Ore, 2.0),
            ]),
        }
    }
}

/// A placeable labourer occupying one worker slot on a tile.
#[derive(Debug, Clone)]
pub struct Worker {
    pub core: ObjectCore,
    pub kind: WorkerKind,
    /// Back-reference to the occupied tile; `None` while unplaced.
    pub tile: Option<ObjectId>,
    /// Chosen resource kind that receives the flat focus bonus.
    pub focus: Option<ResourceKind>,
    /// Tile-space cost of this worker.
    pub spaces: u32,
}

impl Worker {
    pub fn new(id: ObjectId, kind: WorkerKind) -> Self {
        Self {
            core: ObjectCore::new(id),
            kind,
            tile: None,
            focus: None,
            spaces: 1,
        }
    }

    /// Workers may only stand on tiles whose owner matches their own
    /// (including the both-unowned case).
    pub fn can_place_on(&self, tile: &Tile) -> bool {
        self.core.owner() == tile.core.owner()
    }

    /// Efficiency contribution for a given upkeep satisfaction level.
    ///
    /// A focused worker yields a single entry, `efficiency[focus] *
    /// (satisfaction + 0.25)`; the flat bonus applies even at zero
    /// satisfaction. An unfocused worker scales the whole table by
    /// satisfaction and so produces nothing when starved.
    pub fn work_modifier(&self, satisfaction: f64) -> EfficiencyMap {
        let table = self.kind.efficiency();
        match self.focus {
            Some(focus) => {
                let mut out = EfficiencyMap::new();
                out.set(focus, table.get(focus) * (satisfaction + 0.25));
                out
            }
            None => {
                let mut out = EfficiencyMap::new();
                for (kind, value) in table.iter() {
                    out.set(kind, value * satisfaction);
                }
                out
            }
        }
    }
}
