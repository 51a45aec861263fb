//! Identity and the fields every game object shares.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::error::{GameError, GameResult};
use crate::player::PlayerId;

/// Stable identity of a game object. Allocated by the object registry from a
/// monotonically increasing counter; never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Fields common to tiles, buildings and workers: owner, location and
/// free-form metadata. Owner and coordinate are plain optional values; the
/// referent of `owner` is looked up defensively at read time.
#[derive(Debug, Clone)]
pub struct ObjectCore {
    pub id: ObjectId,
    owner: Option<PlayerId>,
    coordinate: Option<Coordinate>,
    descriptions: BTreeMap<String, String>,
}

impl ObjectCore {
    pub fn new(id: ObjectId) -> Self {
        Self {
            id,
            owner: None,
            coordinate: None,
            descriptions: BTreeMap::new(),
        }
    }

    pub fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    pub fn set_owner(&mut self, owner: Option<PlayerId>) {
        self.owner = owner;
    }

    /// The object's coordinate, or `NoLocation` when it has none. Having no
    /// coordinate is distinct from being at the origin.
    pub fn coordinate(&self) -> GameResult<Coordinate> {
        self.coordinate.ok_or(GameError::NoLocation)
    }

    pub fn coordinate_opt(&self) -> Option<Coordinate> {
        self.coordinate
    }

    pub fn set_coordinate(&mut self, coordinate: Coordinate) {
        self.coordinate = Some(coordinate);
    }

    pub fn unset_coordinate(&mut self) {
        self.coordinate = None;
    }

    /// Exclusive insert: fails with `DuplicateKey` when the key exists.
    pub fn add_description(&mut self, key: &str, content: &str) -> GameResult<()> {
        if self.descriptions.contains_key(key) {
            return Err(GameError::DuplicateKey(key.to_string()));
        }
        self.descriptions.insert(key.to_string(), content.to_string());
        Ok(())
    }

    /// Upsert: always succeeds.
    pub fn set_description(&mut self, key: &str, content: &str) {
        self.descriptions.insert(key.to_string(), content.to_string());
    }

    pub fn remove_description(&mut self, key: &str) -> GameResult<()> {
        if self.descriptions.remove(key).is_none() {
            return Err(GameError::KeyNotFound(key.to_string()));
        }
        Ok(())
    }

    pub fn description(&self, key: &str) -> GameResult<&str> {
        self.descriptions
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| GameError::KeyNotFound(key.to_string()))
    }

    pub fn descriptions(&self) -> &BTreeMap<String, String> {
        &self.descriptions
    }
}
