//! Resource kinds and the sparse quantity/efficiency maps every production
//! calculation is built from.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The closed set of tradable resource kinds.
///
/// "No focus" for a worker is `Option::<ResourceKind>::None`; resource maps
/// never carry a sentinel key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Money,
    Food,
    Wood,
    Stone,
    Ore,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Money,
        ResourceKind::Food,
        ResourceKind::Wood,
        ResourceKind::Stone,
        ResourceKind::Ore,
    ];
}

/// Sparse map of resource kind to a signed amount. Negative = consumption.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceMap(BTreeMap<ResourceKind, i64>);

/// Sparse map of resource kind to a fractional multiplier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyMap(BTreeMap<ResourceKind, f64>);

impl ResourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: ResourceKind) -> i64 {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    pub fn set(&mut self, kind: ResourceKind, amount: i64) {
        self.0.insert(kind, amount);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, i64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    /// True when every stored balance is non-negative.
    pub fn all_non_negative(&self) -> bool {
        self.0.values().all(|v| *v >= 0)
    }
}

impl<const N: usize> From<[(ResourceKind, i64); N]> for ResourceMap {
    fn from(entries: [(ResourceKind, i64); N]) -> Self {
        Self(entries.into_iter().collect())
    }
}

impl EfficiencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map with an explicit 0.0 entry for every resource kind. Used to seed
    /// worker-efficiency accumulation so that multiplication never drops a
    /// base-production key.
    pub fn zeroed() -> Self {
        Self(ResourceKind::ALL.iter().map(|k| (*k, 0.0)).collect())
    }

    pub fn get(&self, kind: ResourceKind) -> f64 {
        self.0.get(&kind).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, kind: ResourceKind, factor: f64) {
        self.0.insert(kind, factor);
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

impl<const N: usize> From<[(ResourceKind, f64); N]> for EfficiencyMap {
    fn from(entries: [(ResourceKind, f64); N]) -> Self {
        Self(entries.into_iter().collect())
    }
}

/// Key-wise sum of two resource maps; a key absent on one side contributes 0.
pub fn merge(left: &ResourceMap, right: &ResourceMap) -> ResourceMap {
    let mut out = left.0.clone();
    for (kind, amount) in &right.0 {
        *out.entry(*kind).or_insert(0) += amount;
    }
    ResourceMap(out)
}

/// Key-wise sum of two efficiency maps.
pub fn merge_efficiency(left: &EfficiencyMap, right: &EfficiencyMap) -> EfficiencyMap {
    let mut out = left.0.clone();
    for (kind, factor) in &right.0 {
        *out.entry(*kind).or_insert(0.0) += factor;
    }
    EfficiencyMap(out)
}

/// Multiplies every entry of `resmap` with the matching factor. A key absent
/// from `factors` truncates the entry to 0 rather than passing it through;
/// the fractional product is truncated toward zero.
pub fn multiply(resmap: &ResourceMap, factors: &EfficiencyMap) -> ResourceMap {
    let out = resmap
        .0
        .iter()
        .map(|(kind, amount)| {
            let factor = factors.0.get(kind).copied().unwrap_or(0.0);
            (*kind, (*amount as f64 * factor) as i64)
        })
        .collect();
    ResourceMap(out)
}

/// Key-wise product of two efficiency maps, truncating keys missing from the
/// factor map to 0.0.
pub fn multiply_efficiency(left: &EfficiencyMap, factors: &EfficiencyMap) -> EfficiencyMap {
    let out = left
        .0
        .iter()
        .map(|(kind, value)| (*kind, value * factors.0.get(kind).copied().unwrap_or(0.0)))
        .collect();
    EfficiencyMap(out)
}

/// Resources every player starts the game with.
pub fn starting_resources() -> ResourceMap {
    ResourceMap::from([
        (ResourceKind::Money, 200),
        (ResourceKind::Food, 200),
        (ResourceKind::Wood, 200),
        (ResourceKind::Stone, 200),
        (ResourceKind::Ore, 0),
    ])
}

/// Cost of claiming an unowned tile, expressed as a (negative) delta.
pub fn claim_cost() -> ResourceMap {
    ResourceMap::from([(ResourceKind::Money, -25)])
}

/// All-kinds −1 multiplier, used to turn a cost table into a ledger delta.
pub fn negate_all() -> EfficiencyMap {
    EfficiencyMap::from([
        (ResourceKind::Money, -1.0),
        (ResourceKind::Food, -1.0),
        (ResourceKind::Wood, -1.0),
        (ResourceKind::Stone, -1.0),
        (ResourceKind::Ore, -1.0),
    ])
}
