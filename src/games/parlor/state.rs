/// Scoop Parlor game state definitions.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::config::ParlorConfig;

/// Golden sundae multiplier window.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SundaeState {
    /// Mirrors `multiplier_until > now` as of the last recompute.
    pub active: bool,
    /// Epoch ms at which the multiplier ends. 0 means no multiplier.
    pub multiplier_until: u64,
}

/// All numeric game state. Serialized as-is for the persisted snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Spendable scoops.
    pub scoops_banked: f64,
    /// Everything ever earned (never decreases).
    pub lifetime_scoops: f64,
    /// Derived production rate. Cache only; recomputed on restore.
    pub sps: f64,
    /// Derived scoops per click. Cache only; recomputed on restore.
    pub click_power: f64,
    pub last_save_timestamp: u64,
    pub owned_generators: BTreeMap<String, u32>,
    pub owned_upgrades: BTreeMap<String, bool>,
    pub sundae: SundaeState,
}

impl GameState {
    /// Fresh state with every configured id present at zero / not owned.
    pub fn new(config: &ParlorConfig, now_ms: u64) -> Self {
        Self {
            scoops_banked: 0.0,
            lifetime_scoops: 0.0,
            sps: 0.0,
            click_power: 1.0,
            last_save_timestamp: now_ms,
            owned_generators: config
                .generators
                .iter()
                .map(|g| (g.id.to_string(), 0))
                .collect(),
            owned_upgrades: config
                .upgrades
                .iter()
                .map(|u| (u.id.to_string(), false))
                .collect(),
            sundae: SundaeState::default(),
        }
    }

    pub fn generator_count(&self, id: &str) -> u32 {
        self.owned_generators.get(id).copied().unwrap_or(0)
    }

    pub fn owns_upgrade(&self, id: &str) -> bool {
        self.owned_upgrades.get(id).copied().unwrap_or(false)
    }

    /// Overlay a persisted patch. Absent fields keep their current value;
    /// map entries are merged per key and ids unknown to `config` are dropped.
    pub fn merge(&mut self, patch: &SnapshotPatch, config: &ParlorConfig) {
        if let Some(v) = patch.scoops_banked.filter(|v| is_valid_amount(*v)) {
            self.scoops_banked = v;
        }
        if let Some(v) = patch.lifetime_scoops.filter(|v| is_valid_amount(*v)) {
            self.lifetime_scoops = v;
        }
        if let Some(v) = patch.sps.filter(|v| is_valid_amount(*v)) {
            self.sps = v;
        }
        if let Some(v) = patch.click_power.filter(|v| is_valid_amount(*v)) {
            self.click_power = v;
        }
        if let Some(ts) = patch.last_save_timestamp {
            self.last_save_timestamp = ts;
        }
        if let Some(ref gens) = patch.owned_generators {
            for (id, count) in gens {
                if config.generator(id).is_some() {
                    self.owned_generators.insert(id.clone(), *count);
                }
            }
        }
        if let Some(ref upgs) = patch.owned_upgrades {
            for (id, owned) in upgs {
                if config.upgrade(id).is_some() {
                    self.owned_upgrades.insert(id.clone(), *owned);
                }
            }
        }
        if let Some(ref sundae) = patch.sundae {
            if let Some(active) = sundae.active {
                self.sundae.active = active;
            }
            if let Some(until) = sundae.multiplier_until {
                self.sundae.multiplier_until = until;
            }
        }
    }
}

fn is_valid_amount(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

/// Persisted snapshot as read back from storage: every field optional so that
/// older or partial records merge over fresh defaults.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SnapshotPatch {
    pub scoops_banked: Option<f64>,
    pub lifetime_scoops: Option<f64>,
    pub sps: Option<f64>,
    pub click_power: Option<f64>,
    pub last_save_timestamp: Option<u64>,
    pub owned_generators: Option<BTreeMap<String, u32>>,
    pub owned_upgrades: Option<BTreeMap<String, bool>>,
    pub sundae: Option<SundaePatch>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SundaePatch {
    pub active: Option<bool>,
    pub multiplier_until: Option<u64>,
}

impl From<&GameState> for SnapshotPatch {
    fn from(state: &GameState) -> Self {
        Self {
            scoops_banked: Some(state.scoops_banked),
            lifetime_scoops: Some(state.lifetime_scoops),
            sps: Some(state.sps),
            click_power: Some(state.click_power),
            last_save_timestamp: Some(state.last_save_timestamp),
            owned_generators: Some(state.owned_generators.clone()),
            owned_upgrades: Some(state.owned_upgrades.clone()),
            sundae: Some(SundaePatch {
                active: Some(state.sundae.active),
                multiplier_until: Some(state.sundae.multiplier_until),
            }),
        }
    }
}
