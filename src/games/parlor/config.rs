//! Static shop configuration and timing constants for the parlor.

/// Cost growth per unit already owned.
pub const GENERATOR_COST_MULTIPLIER: f64 = 1.15;

/// Production multiplier granted by a golden sundae.
pub const SUNDAE_MULTIPLIER_VALUE: f64 = 10.0;
/// How long the sundae multiplier lasts (ms).
pub const SUNDAE_MULTIPLIER_DURATION_MS: u64 = 30_000;
/// Windfall size in seconds of current SpS.
pub const SUNDAE_WINDFALL_SECONDS: f64 = 60.0;
/// Probability that a sundae pays out a windfall instead of a multiplier.
pub const SUNDAE_WINDFALL_CHANCE: f64 = 0.5;

/// Wait window before the next sundae appears (ms, half-open).
pub const SUNDAE_MIN_WAIT_MS: u64 = 120_000;
pub const SUNDAE_MAX_WAIT_MS: u64 = 360_000;
/// How long an unclaimed sundae stays on screen (ms).
pub const SUNDAE_LIFETIME_MS: u64 = 13_000;

/// Fixed tick period (ms).
pub const TICK_INTERVAL_MS: u64 = 100;
/// Autosave period (ms).
pub const AUTOSAVE_INTERVAL_MS: u64 = 30_000;
/// Offline progress is credited for at most this many seconds.
pub const OFFLINE_PROGRESS_CAP_SECONDS: u64 = 2 * 60 * 60;

/// A repeatable purchase that adds passive production.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorConfig {
    pub id: &'static str,
    pub name: &'static str,
    pub base_cost: f64,
    pub base_output_sps: f64,
}

/// What an upgrade does once owned.
#[derive(Clone, Debug, PartialEq)]
pub enum UpgradeEffect {
    /// Multiplies click power (applied after all additions).
    ClickMult(f64),
    /// Adds to the base click power of 1.
    ClickAdd(f64),
    /// Multiplies the per-unit output of one generator.
    GeneratorMult { target: &'static str, value: f64 },
    /// Multiplies total production.
    GlobalMult(f64),
}

/// A one-time purchase.
#[derive(Clone, Debug, PartialEq)]
pub struct UpgradeConfig {
    pub id: &'static str,
    pub name: &'static str,
    pub cost: f64,
    pub description: &'static str,
    pub effects: &'static [UpgradeEffect],
}

/// The full shop, in display order.
#[derive(Debug, PartialEq)]
pub struct ParlorConfig {
    pub generators: &'static [GeneratorConfig],
    pub upgrades: &'static [UpgradeConfig],
}

impl ParlorConfig {
    pub fn generator(&self, id: &str) -> Option<&'static GeneratorConfig> {
        self.generators.iter().find(|g| g.id == id)
    }

    pub fn upgrade(&self, id: &str) -> Option<&'static UpgradeConfig> {
        self.upgrades.iter().find(|u| u.id == id)
    }
}

pub const GENERATORS: &[GeneratorConfig] = &[
    GeneratorConfig {
        id: "taster_spoon",
        name: "Taster Spoon",
        base_cost: 15.0,
        base_output_sps: 0.1,
    },
    GeneratorConfig {
        id: "parlor_nonna",
        name: "Parlor Nonna",
        base_cost: 100.0,
        base_output_sps: 1.0,
    },
    GeneratorConfig {
        id: "freezer",
        name: "Freezer",
        base_cost: 1_100.0,
        base_output_sps: 8.0,
    },
    GeneratorConfig {
        id: "mixer",
        name: "Mixer",
        base_cost: 12_000.0,
        base_output_sps: 47.0,
    },
    GeneratorConfig {
        id: "ice_cream_truck",
        name: "Ice Cream Truck",
        base_cost: 130_000.0,
        base_output_sps: 260.0,
    },
];

pub const UPGRADES: &[UpgradeConfig] = &[
    UpgradeConfig {
        id: "waffle_cones",
        name: "Waffle Cones",
        cost: 500.0,
        description: "Doubles click power.",
        effects: &[UpgradeEffect::ClickMult(2.0)],
    },
    UpgradeConfig {
        id: "extra_scoop",
        name: "Extra Scoop",
        cost: 1_000.0,
        description: "Adds +1 to each click.",
        effects: &[UpgradeEffect::ClickAdd(1.0)],
    },
    UpgradeConfig {
        id: "insulated_spoons",
        name: "Insulated Spoons",
        cost: 100.0,
        description: "Taster Spoon output x2.",
        effects: &[UpgradeEffect::GeneratorMult {
            target: "taster_spoon",
            value: 2.0,
        }],
    },
    UpgradeConfig {
        id: "family_recipe",
        name: "Family Recipe",
        cost: 1_000.0,
        description: "Parlor Nonna output x2.",
        effects: &[UpgradeEffect::GeneratorMult {
            target: "parlor_nonna",
            value: 2.0,
        }],
    },
    UpgradeConfig {
        id: "deep_chill",
        name: "Deep Chill",
        cost: 10_000.0,
        description: "Freezer output x2.",
        effects: &[UpgradeEffect::GeneratorMult {
            target: "freezer",
            value: 2.0,
        }],
    },
    UpgradeConfig {
        id: "high_speed_whisks",
        name: "High-Speed Whisks",
        cost: 100_000.0,
        description: "Mixer output x2.",
        effects: &[UpgradeEffect::GeneratorMult {
            target: "mixer",
            value: 2.0,
        }],
    },
    UpgradeConfig {
        id: "route_optimization",
        name: "Route Optimization",
        cost: 1_000_000.0,
        description: "Ice Cream Truck output x2.",
        effects: &[UpgradeEffect::GeneratorMult {
            target: "ice_cream_truck",
            value: 2.0,
        }],
    },
    UpgradeConfig {
        id: "premium_cream",
        name: "Premium Cream",
        cost: 50_000.0,
        description: "Global production x1.2.",
        effects: &[UpgradeEffect::GlobalMult(1.2)],
    },
];

pub static CONFIG: ParlorConfig = ParlorConfig {
    generators: GENERATORS,
    upgrades: UPGRADES,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_generators_in_ascending_cost() {
        assert_eq!(GENERATORS.len(), 5);
        for pair in GENERATORS.windows(2) {
            assert!(pair[0].base_cost < pair[1].base_cost);
            assert!(pair[0].base_output_sps < pair[1].base_output_sps);
        }
    }

    #[test]
    fn every_generator_mult_targets_a_known_generator() {
        for upg in UPGRADES {
            for effect in upg.effects {
                if let UpgradeEffect::GeneratorMult { target, .. } = effect {
                    assert!(CONFIG.generator(target).is_some(), "{} -> {}", upg.id, target);
                }
            }
        }
    }

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<&str> = GENERATORS
            .iter()
            .map(|g| g.id)
            .chain(UPGRADES.iter().map(|u| u.id))
            .collect();
        let before = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), before);
    }

    #[test]
    fn lookup_by_id() {
        assert_eq!(CONFIG.generator("freezer").map(|g| g.base_cost), Some(1_100.0));
        assert_eq!(CONFIG.upgrade("premium_cream").map(|u| u.cost), Some(50_000.0));
        assert!(CONFIG.generator("waffle_cones").is_none());
        assert!(CONFIG.upgrade("nope").is_none());
    }
}
