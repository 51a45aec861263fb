//! Players, their resource ledgers, and the ledger-modification rules the
//! rest of the engine goes through.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::object::ObjectId;
use crate::resources::{self, ResourceKind, ResourceMap};

/// Display colors handed out to players in join order.
pub const PLAYER_PALETTE: [&str; 8] = [
    "#e6194b", "#3cb44b", "#4363d8", "#f58231", "#911eb4", "#46f0f0", "#f032e6", "#ffe119",
];

/// Index into the player roster. Players are never removed, so ids stay
/// valid for the whole game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

#[derive(Debug, Clone)]
pub struct Player {
    pub name: String,
    pub color: String,
    ledger: ResourceMap,
    objects: Vec<ObjectId>,
}

impl Player {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            ledger: resources::starting_resources(),
            objects: Vec::new(),
        }
    }

    pub fn ledger(&self) -> &ResourceMap {
        &self.ledger
    }

    pub fn set_ledger(&mut self, ledger: ResourceMap) {
        self.ledger = ledger;
    }

    pub fn add_object(&mut self, id: ObjectId) {
        self.objects.push(id);
    }

    /// Owned-object ids still alive according to `is_live`, pruning the dead
    /// ones from the stored list as a side effect.
    pub fn live_objects(&mut self, is_live: impl Fn(ObjectId) -> bool) -> Vec<ObjectId> {
        self.objects.retain(|id| is_live(*id));
        self.objects.clone()
    }
}

/// The player roster plus the resource-modification operations every
/// production and purchase goes through.
///
/// A modification succeeds only when each post-modification balance stays
/// non-negative; with `commit = false` the check runs without touching the
/// ledger (affordability probing).
#[derive(Debug, Default)]
pub struct Players {
    roster: Vec<Player>,
}

impl Players {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, player: Player) -> PlayerId {
        let id = PlayerId(self.roster.len() as u32);
        self.roster.push(player);
        id
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.roster.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.roster.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &Player)> {
        self.roster
            .iter()
            .enumerate()
            .map(|(i, p)| (PlayerId(i as u32), p))
    }

    /// Applies `delta` to the owner's ledger. An absent owner is a
    /// successful no-op: production on unowned tiles evaporates.
    pub fn modify_resources(
        &mut self,
        owner: Option<PlayerId>,
        delta: &ResourceMap,
        commit: bool,
    ) -> bool {
        let Some(id) = owner else {
            return true;
        };
        let Some(player) = self.roster.get_mut(id.0 as usize) else {
            warn!(player = id.0, "resource modification for unknown player");
            return false;
        };
        let merged = resources::merge(&player.ledger, delta);
        if !merged.all_non_negative() {
            return false;
        }
        if commit {
            player.ledger = merged;
        }
        true
    }

    /// Single-kind variant of [`modify_resources`](Self::modify_resources).
    pub fn modify_resource(
        &mut self,
        owner: Option<PlayerId>,
        kind: ResourceKind,
        amount: i64,
        commit: bool,
    ) -> bool {
        self.modify_resources(owner, &ResourceMap::from([(kind, amount)]), commit)
    }
}
