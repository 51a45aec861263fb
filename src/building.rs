//! Buildings: per-kind cost/production tables, placement predicates and the
//! hold-marker construction-delay mechanic.

use serde::{Deserialize, Serialize};

use crate::object::{ObjectCore, ObjectId};
use crate::resources::{ResourceKind, ResourceMap};
use crate::tile::{Tile, TileKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    Farm,
    HeadQuarters,
    Outpost,
    Mine,
    Cottage,
    FishingBoat,
}

impl BuildingKind {
    pub const ALL: [BuildingKind; 6] = [
        BuildingKind::Farm,
        BuildingKind::HeadQuarters,
        BuildingKind::Outpost,
        BuildingKind::Mine,
        BuildingKind::Cottage,
        BuildingKind::FishingBoat,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuildingKind::Farm => "Farm",
            BuildingKind::HeadQuarters => "HeadQuarters",
            BuildingKind::Outpost => "Outpost",
            BuildingKind::Mine => "Mine",
            BuildingKind::Cottage => "Lake Cottage",
            BuildingKind::FishingBoat => "Fishing Boat",
        }
    }

    pub fn build_cost(self) -> ResourceMap {
        match self {
            BuildingKind::Farm => ResourceMap::from([
                (ResourceKind::Money, 50),
                (ResourceKind::Food, 100),
                (ResourceKind::Wood, 25),
            ]),
            BuildingKind::HeadQuarters => ResourceMap::from([
                (ResourceKind::Money, 750),
                (ResourceKind::Food, 1000),
                (ResourceKind::Wood, 500),
                (ResourceKind::Stone, 250),
            ]),
            BuildingKind::Outpost => ResourceMap::from([
                (ResourceKind::Money, 150),
                (ResourceKind::Food, 200),
                (ResourceKind::Wood, 200),
                (ResourceKind::Stone, 25),
            ]),
            BuildingKind::Mine => ResourceMap::from([
                (ResourceKind::Money, 100),
                (ResourceKind::Food, 150),
                (ResourceKind::Wood, 200),
                (ResourceKind::Stone, 100),
            ]),
            BuildingKind::Cottage => ResourceMap::from([
                (ResourceKind::Money, 50),
                (ResourceKind::Food, 50),
                (ResourceKind::Wood, 100),
                (ResourceKind::Stone, 50),
            ]),
            BuildingKind::FishingBoat => ResourceMap::from([
                (ResourceKind::Money, 50),
                (ResourceKind::Food, 100),
                (ResourceKind::Wood, 25),
            ]),
        }
    }

    pub fn production_effect(self) -> ResourceMap {
        match self {
            BuildingKind::Farm => ResourceMap::from([
                (ResourceKind::Money, 1),
                (ResourceKind::Food, 5),
            ]),
            BuildingKind::HeadQuarters => ResourceMap::from([
                (ResourceKind::Money, 10),
                (ResourceKind::Food, 2),
            ]),
            BuildingKind::Outpost => ResourceMap::from([
                (ResourceKind::Money, -5),
                (ResourceKind::Food, -2),
            ]),
            BuildingKind::Mine => ResourceMap::from([
                (ResourceKind::Money, 5),
                (ResourceKind::Stone, 8),
                (ResourceKind::Ore, 8),
            ]),
            BuildingKind::Cottage => ResourceMap::from([
                (ResourceKind::Money, 4),
                (ResourceKind::Food, 8),
            ]),
            BuildingKind::FishingBoat => ResourceMap::from([
                (ResourceKind::Money, 2),
                (ResourceKind::Food, 10),
            ]),
        }
    }

    /// Radius in which an on-build claim grabs unowned neighbouring tiles.
    pub fn claim_radius(self) -> Option<i32> {
        match self {
            BuildingKind::HeadQuarters => Some(3),
            BuildingKind::Outpost => Some(1),
            _ => None,
        }
    }

    /// Outpost upkeep applies every turn, hold markers or not.
    pub fn ignores_hold(self) -> bool {
        matches!(self, BuildingKind::Outpost)
    }
}

/// A placeable production structure occupying one building slot.
#[derive(Debug, Clone)]
pub struct Building {
    pub core: ObjectCore,
    pub kind: BuildingKind,
    /// Back-reference to the occupied tile; `None` while unplaced.
    pub tile: Option<ObjectId>,
    /// While positive, suppresses production for one turn per marker.
    pub hold_markers: u32,
    /// Tile-space cost of this building.
    pub spaces: u32,
}

impl Building {
    pub fn new(id: ObjectId, kind: BuildingKind) -> Self {
        Self {
            core: ObjectCore::new(id),
            kind,
            tile: None,
            hold_markers: 0,
            spaces: 1,
        }
    }

    /// Placement-legality predicate against a target tile.
    ///
    /// Farm/HeadQuarters/Outpost use the shared ownership rule (legal when the
    /// tile is unowned, the building is unowned, or both share an owner).
    /// Cottage, Mine and Fishing Boat *replace* that rule with a pure
    /// tile-kind restriction; the action layer still enforces tile
    /// ownership before any build.
    pub fn can_place_on(&self, tile: &Tile) -> bool {
        kind_can_place(self.kind, self.core.owner(), tile)
    }

    /// Per-turn production. A positive hold count consumes one marker and
    /// yields nothing, except for kinds whose effect always applies.
    pub fn production(&mut self) -> ResourceMap {
        if self.kind.ignores_hold() {
            return self.kind.production_effect();
        }
        if self.hold_markers > 0 {
            self.hold_markers -= 1;
            return ResourceMap::new();
        }
        self.kind.production_effect()
    }

    /// Production as `production` would report it, without aging holds.
    /// Used by the preview calculation.
    pub fn peek_production(&self) -> ResourceMap {
        if self.kind.ignores_hold() {
            return self.kind.production_effect();
        }
        if self.hold_markers > 0 {
            return ResourceMap::new();
        }
        self.kind.production_effect()
    }
}

/// Kind-level placement rule, usable before a building exists.
pub fn kind_can_place(
    kind: BuildingKind,
    owner: Option<crate::player::PlayerId>,
    tile: &Tile,
) -> bool {
    match kind {
        BuildingKind::Cottage => tile.kind == TileKind::Lake,
        BuildingKind::Mine => tile.kind == TileKind::Mountain,
        BuildingKind::FishingBoat => matches!(tile.kind, TileKind::Ocean | TileKind::Lake),
        BuildingKind::Farm | BuildingKind::HeadQuarters | BuildingKind::Outpost => {
            shares_owner_or_unowned(owner, tile)
        }
    }
}

/// The default placement rule: legal when either side is unowned or both
/// belong to the same player.
pub fn shares_owner_or_unowned(owner: Option<crate::player::PlayerId>, tile: &Tile) -> bool {
    match (tile.core.owner(), owner) {
        (None, _) | (_, None) => true,
        (Some(tile_owner), Some(own)) => tile_owner == own,
    }
}
