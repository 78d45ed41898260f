//! Scoop Parlor economy. All numeric rules live here, no rendering.
//!
//! Every operation that can change a rate input (generator counts, owned
//! upgrades, the sundae window) recomputes `sps` and `click_power` before it
//! returns, so readers never observe stale derived stats.

use thiserror::Error;

use super::config::{
    ParlorConfig, UpgradeEffect, CONFIG, GENERATOR_COST_MULTIPLIER, SUNDAE_MULTIPLIER_DURATION_MS,
    SUNDAE_MULTIPLIER_VALUE, SUNDAE_WINDFALL_CHANCE, SUNDAE_WINDFALL_SECONDS,
};
use super::random::RandomSource;
use super::state::{GameState, SnapshotPatch};

/// Why a purchase was refused. The state is untouched in every case.
#[derive(Debug, Error, PartialEq)]
pub enum PurchaseError {
    #[error("unknown shop item `{0}`")]
    UnknownId(String),
    #[error("already owned")]
    AlreadyOwned,
    #[error("not enough scoops (cost {cost}, banked {banked})")]
    InsufficientFunds { cost: f64, banked: f64 },
    #[error("no more can be owned")]
    LimitReached,
}

/// Outcome of claiming a golden sundae.
#[derive(Clone, Debug, PartialEq)]
pub enum BonusReward {
    /// Instant payout of `SUNDAE_WINDFALL_SECONDS` of production.
    Windfall { amount: f64 },
    /// Production multiplied by `value` until `until_ms`.
    Multiplier { value: f64, until_ms: u64 },
}

pub struct Economy {
    state: GameState,
    config: &'static ParlorConfig,
}

impl Economy {
    pub fn new(now_ms: u64) -> Self {
        Self::with_config(&CONFIG, now_ms)
    }

    pub fn with_config(config: &'static ParlorConfig, now_ms: u64) -> Self {
        let mut economy = Self {
            state: GameState::new(config, now_ms),
            config,
        };
        economy.recompute_stats(now_ms);
        economy
    }

    /// Build from a persisted snapshot merged over a fresh state.
    pub fn restore(patch: &SnapshotPatch, now_ms: u64) -> Self {
        let mut economy = Self::new(now_ms);
        economy.state.merge(patch, economy.config);
        economy.recompute_stats(now_ms);
        economy
    }

    pub fn config(&self) -> &'static ParlorConfig {
        self.config
    }

    /// Read-only view for rendering.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Owned copy of the state, e.g. for persistence.
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    pub fn sps(&self) -> f64 {
        self.state.sps
    }

    pub fn click_power(&self) -> f64 {
        self.state.click_power
    }

    pub fn multiplier_active(&self, now_ms: u64) -> bool {
        self.state.sundae.multiplier_until > now_ms
    }

    /// Accrue production for `elapsed_seconds`, then expire the sundae window.
    pub fn advance(&mut self, elapsed_seconds: f64, now_ms: u64) {
        if elapsed_seconds.is_finite() && elapsed_seconds > 0.0 {
            self.credit(self.state.sps * elapsed_seconds);
        }
        let until = self.state.sundae.multiplier_until;
        if until > 0 && now_ms >= until {
            self.state.sundae.multiplier_until = 0;
            self.recompute_stats(now_ms);
        }
    }

    /// One manual click. Returns the amount earned.
    pub fn click_once(&mut self) -> f64 {
        let amount = self.state.click_power;
        self.credit(amount);
        amount
    }

    /// Add scoops to both balances (production, windfalls, offline gain).
    pub fn credit(&mut self, amount: f64) {
        if amount.is_finite() && amount > 0.0 {
            self.state.scoops_banked += amount;
            self.state.lifetime_scoops += amount;
        }
    }

    pub fn mark_saved(&mut self, now_ms: u64) {
        self.state.last_save_timestamp = now_ms;
    }

    /// Cost of the next unit: `round(base_cost * 1.15^owned)`.
    pub fn generator_cost(&self, id: &str) -> Option<f64> {
        let gen = self.config.generator(id)?;
        let owned = self.state.generator_count(id);
        Some((gen.base_cost * GENERATOR_COST_MULTIPLIER.powf(f64::from(owned))).round())
    }

    /// Effective per-unit output after generator multipliers.
    pub fn generator_output(&self, id: &str) -> Option<f64> {
        let gen = self.config.generator(id)?;
        let mut multiplier = 1.0;
        for upg in self.owned_upgrade_configs() {
            for effect in upg.effects {
                if let UpgradeEffect::GeneratorMult { target, value } = effect {
                    if *target == id {
                        multiplier *= value;
                    }
                }
            }
        }
        Some(gen.base_output_sps * multiplier)
    }

    /// Buy one generator. Returns the price paid.
    pub fn purchase_generator(&mut self, id: &str, now_ms: u64) -> Result<f64, PurchaseError> {
        let cost = self
            .generator_cost(id)
            .ok_or_else(|| PurchaseError::UnknownId(id.to_string()))?;
        if self.state.scoops_banked < cost {
            return Err(PurchaseError::InsufficientFunds {
                cost,
                banked: self.state.scoops_banked,
            });
        }
        let count = self
            .state
            .generator_count(id)
            .checked_add(1)
            .ok_or(PurchaseError::LimitReached)?;
        self.state.scoops_banked -= cost;
        self.state.owned_generators.insert(id.to_string(), count);
        self.recompute_stats(now_ms);
        Ok(cost)
    }

    /// Buy a one-shot upgrade. Returns the price paid.
    pub fn purchase_upgrade(&mut self, id: &str, now_ms: u64) -> Result<f64, PurchaseError> {
        let upg = self
            .config
            .upgrade(id)
            .ok_or_else(|| PurchaseError::UnknownId(id.to_string()))?;
        if self.state.owns_upgrade(id) {
            return Err(PurchaseError::AlreadyOwned);
        }
        if self.state.scoops_banked < upg.cost {
            return Err(PurchaseError::InsufficientFunds {
                cost: upg.cost,
                banked: self.state.scoops_banked,
            });
        }
        self.state.scoops_banked -= upg.cost;
        self.state.owned_upgrades.insert(id.to_string(), true);
        self.recompute_stats(now_ms);
        Ok(upg.cost)
    }

    /// Resolve a claimed golden sundae with a single draw from `rng`.
    pub fn trigger_bonus_event(&mut self, rng: &mut dyn RandomSource, now_ms: u64) -> BonusReward {
        if rng.next_f64() < SUNDAE_WINDFALL_CHANCE {
            let amount = SUNDAE_WINDFALL_SECONDS * self.state.sps;
            self.credit(amount);
            BonusReward::Windfall { amount }
        } else {
            let until_ms = now_ms + SUNDAE_MULTIPLIER_DURATION_MS;
            self.state.sundae.multiplier_until = until_ms;
            self.recompute_stats(now_ms);
            BonusReward::Multiplier {
                value: SUNDAE_MULTIPLIER_VALUE,
                until_ms,
            }
        }
    }

    fn owned_upgrade_configs(&self) -> impl Iterator<Item = &'static super::config::UpgradeConfig> + '_ {
        self.config
            .upgrades
            .iter()
            .filter(|u| self.state.owns_upgrade(u.id))
    }

    /// Recompute `click_power` and `sps` from owned items and the sundae window.
    ///
    /// Fold order is fixed: click additions before click multipliers,
    /// generator multipliers before the global multiplier, sundae last.
    fn recompute_stats(&mut self, now_ms: u64) {
        let mut power = 1.0;
        let mut click_mult = 1.0;
        let mut global_mult = 1.0;
        for upg in self.owned_upgrade_configs() {
            for effect in upg.effects {
                match effect {
                    UpgradeEffect::ClickAdd(v) => power += v,
                    UpgradeEffect::ClickMult(v) => click_mult *= v,
                    UpgradeEffect::GlobalMult(v) => global_mult *= v,
                    UpgradeEffect::GeneratorMult { .. } => {}
                }
            }
        }

        let mut total = 0.0;
        for gen in self.config.generators {
            let count = self.state.generator_count(gen.id) as f64;
            let output = self.generator_output(gen.id).unwrap_or(0.0);
            total += count * output;
        }

        let mut sps = total * global_mult;
        let active = self.multiplier_active(now_ms);
        if active {
            sps *= SUNDAE_MULTIPLIER_VALUE;
        }

        self.state.click_power = power * click_mult;
        self.state.sps = sps;
        self.state.sundae.active = active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::parlor::random::SequenceRng;

    const NOW: u64 = 1_700_000_000_000;

    fn rich(amount: f64) -> Economy {
        let mut eco = Economy::new(NOW);
        eco.credit(amount);
        eco
    }

    #[test]
    fn fresh_economy_has_unit_click_and_no_production() {
        let eco = Economy::new(NOW);
        assert!((eco.click_power() - 1.0).abs() < f64::EPSILON);
        assert!((eco.sps() - 0.0).abs() < f64::EPSILON);
        assert!(!eco.state().sundae.active);
    }

    #[test]
    fn first_taster_spoon_costs_15_then_17() {
        let mut eco = rich(15.0);
        assert_eq!(eco.generator_cost("taster_spoon"), Some(15.0));
        assert_eq!(eco.purchase_generator("taster_spoon", NOW), Ok(15.0));
        assert_eq!(eco.state().generator_count("taster_spoon"), 1);
        assert!((eco.state().scoops_banked - 0.0).abs() < f64::EPSILON);
        assert_eq!(eco.generator_cost("taster_spoon"), Some(17.0));
    }

    #[test]
    fn purchase_generator_short_of_funds_changes_nothing() {
        let mut eco = rich(14.0);
        let before = eco.snapshot();
        assert_eq!(
            eco.purchase_generator("taster_spoon", NOW),
            Err(PurchaseError::InsufficientFunds {
                cost: 15.0,
                banked: 14.0
            })
        );
        assert_eq!(eco.snapshot(), before);
    }

    #[test]
    fn restored_count_past_i32_range_keeps_cost_rising() {
        let patch: SnapshotPatch = serde_json::from_str(
            r#"{"scoops_banked": 1e9, "owned_generators": {"ice_cream_truck": 2147483648}}"#,
        )
        .unwrap();
        let mut eco = Economy::restore(&patch, NOW);
        let cost = eco.generator_cost("ice_cream_truck").unwrap();
        assert!(cost > 525_923.0);
        assert!(cost.is_infinite());
        let before = eco.snapshot();
        assert!(matches!(
            eco.purchase_generator("ice_cream_truck", NOW),
            Err(PurchaseError::InsufficientFunds { .. })
        ));
        assert_eq!(eco.snapshot(), before);
    }

    #[test]
    fn restored_count_at_u32_max_cannot_be_bought() {
        let mut eco = rich(1e6);
        eco.state.owned_generators.insert("taster_spoon".into(), u32::MAX);
        assert_eq!(eco.generator_cost("taster_spoon"), Some(f64::INFINITY));
        let before = eco.snapshot();
        assert!(eco.purchase_generator("taster_spoon", NOW).is_err());
        assert_eq!(eco.snapshot(), before);

        // Even an unbounded bank cannot push the count past the top.
        eco.state.scoops_banked = f64::INFINITY;
        let before = eco.snapshot();
        assert_eq!(
            eco.purchase_generator("taster_spoon", NOW),
            Err(PurchaseError::LimitReached)
        );
        assert_eq!(eco.snapshot(), before);
        assert_eq!(eco.state().generator_count("taster_spoon"), u32::MAX);
    }

    #[test]
    fn purchase_unknown_id() {
        let mut eco = rich(1e9);
        assert_eq!(
            eco.purchase_generator("warp_core", NOW),
            Err(PurchaseError::UnknownId("warp_core".into()))
        );
        assert_eq!(
            eco.purchase_upgrade("warp_core", NOW),
            Err(PurchaseError::UnknownId("warp_core".into()))
        );
    }

    #[test]
    fn upgrade_bought_once_only() {
        let mut eco = rich(1_000.0);
        assert_eq!(eco.purchase_upgrade("waffle_cones", NOW), Ok(500.0));
        assert_eq!(
            eco.purchase_upgrade("waffle_cones", NOW),
            Err(PurchaseError::AlreadyOwned)
        );
        assert!((eco.state().scoops_banked - 500.0).abs() < f64::EPSILON);
        assert!(eco.state().owns_upgrade("waffle_cones"));
    }

    #[test]
    fn click_add_applies_before_click_mult() {
        let mut eco = rich(1_500.0);
        eco.purchase_upgrade("waffle_cones", NOW).unwrap();
        eco.purchase_upgrade("extra_scoop", NOW).unwrap();
        assert!((eco.click_power() - 4.0).abs() < f64::EPSILON);
        let earned = eco.click_once();
        assert!((earned - 4.0).abs() < f64::EPSILON);
        assert!((eco.state().scoops_banked - 4.0).abs() < f64::EPSILON);
        assert!((eco.state().lifetime_scoops - 1_504.0).abs() < f64::EPSILON);
    }

    #[test]
    fn generator_mult_targets_only_its_generator() {
        let mut eco = rich(1e6);
        eco.purchase_generator("taster_spoon", NOW).unwrap();
        eco.purchase_generator("parlor_nonna", NOW).unwrap();
        assert!((eco.sps() - 1.1).abs() < 1e-9);
        eco.purchase_upgrade("insulated_spoons", NOW).unwrap();
        assert_eq!(eco.generator_output("taster_spoon"), Some(0.2));
        assert_eq!(eco.generator_output("parlor_nonna"), Some(1.0));
        assert!((eco.sps() - 1.2).abs() < 1e-9);
    }

    #[test]
    fn global_mult_applies_after_generator_sum() {
        let mut eco = rich(1e6);
        for _ in 0..10 {
            eco.purchase_generator("parlor_nonna", NOW).unwrap();
        }
        eco.purchase_upgrade("family_recipe", NOW).unwrap();
        eco.purchase_upgrade("premium_cream", NOW).unwrap();
        let expected = (10.0 * (1.0 * 2.0)) * 1.2;
        assert_eq!(eco.sps(), expected);
    }

    #[test]
    fn advance_accrues_sps_times_elapsed() {
        let mut eco = rich(100.0);
        eco.purchase_generator("parlor_nonna", NOW).unwrap();
        let banked = eco.state().scoops_banked;
        let lifetime = eco.state().lifetime_scoops;
        eco.advance(2.5, NOW);
        assert!((eco.state().scoops_banked - (banked + 2.5)).abs() < 1e-9);
        assert!((eco.state().lifetime_scoops - (lifetime + 2.5)).abs() < 1e-9);
    }

    #[test]
    fn advance_zero_or_negative_is_noop() {
        let mut eco = rich(100.0);
        eco.purchase_generator("parlor_nonna", NOW).unwrap();
        let before = eco.snapshot();
        eco.advance(0.0, NOW);
        eco.advance(-3.0, NOW);
        eco.advance(f64::NAN, NOW);
        assert_eq!(eco.snapshot(), before);
    }

    #[test]
    fn windfall_pays_sixty_seconds_of_production() {
        let mut eco = rich(1_000.0);
        for _ in 0..5 {
            eco.purchase_generator("parlor_nonna", NOW).unwrap();
        }
        let banked = eco.state().scoops_banked;
        let mut rng = SequenceRng::new(&[0.2]);
        let reward = eco.trigger_bonus_event(&mut rng, NOW);
        assert_eq!(reward, BonusReward::Windfall { amount: 300.0 });
        assert!((eco.state().scoops_banked - (banked + 300.0)).abs() < 1e-9);
        assert_eq!(eco.state().sundae.multiplier_until, 0);
    }

    #[test]
    fn multiplier_window_tenfolds_then_expires() {
        let mut eco = rich(1_000.0);
        for _ in 0..5 {
            eco.purchase_generator("parlor_nonna", NOW).unwrap();
        }
        let base = eco.sps();
        let mut rng = SequenceRng::new(&[0.7]);
        let reward = eco.trigger_bonus_event(&mut rng, NOW);
        assert_eq!(
            reward,
            BonusReward::Multiplier {
                value: 10.0,
                until_ms: NOW + 30_000
            }
        );
        assert_eq!(eco.sps(), base * 10.0);
        assert!(eco.state().sundae.active);

        eco.advance(0.1, NOW + 29_999);
        assert_eq!(eco.sps(), base * 10.0);

        eco.advance(0.1, NOW + 30_000);
        assert_eq!(eco.sps(), base);
        assert_eq!(eco.state().sundae.multiplier_until, 0);
        assert!(!eco.state().sundae.active);
    }

    #[test]
    fn purchase_during_multiplier_keeps_multiplier() {
        let mut eco = rich(1_000.0);
        let mut rng = SequenceRng::new(&[0.9]);
        eco.trigger_bonus_event(&mut rng, NOW);
        eco.purchase_generator("parlor_nonna", NOW + 1_000).unwrap();
        assert!((eco.sps() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn restore_of_snapshot_reproduces_derived_stats() {
        let mut eco = rich(1e7);
        for id in ["taster_spoon", "parlor_nonna", "freezer", "mixer"] {
            for _ in 0..3 {
                eco.purchase_generator(id, NOW).unwrap();
            }
        }
        for id in ["waffle_cones", "extra_scoop", "deep_chill", "premium_cream"] {
            eco.purchase_upgrade(id, NOW).unwrap();
        }
        let patch = SnapshotPatch::from(&eco.snapshot());
        let restored = Economy::restore(&patch, NOW);
        assert_eq!(restored.sps(), eco.sps());
        assert_eq!(restored.click_power(), eco.click_power());
        assert_eq!(restored.state(), eco.state());
    }

    #[test]
    fn restore_ignores_persisted_derived_stats() {
        let patch: SnapshotPatch = serde_json::from_str(
            r#"{"sps": 9999.0, "click_power": 500.0, "owned_generators": {"parlor_nonna": 2}}"#,
        )
        .unwrap();
        let eco = Economy::restore(&patch, NOW);
        assert!((eco.sps() - 2.0).abs() < 1e-9);
        assert!((eco.click_power() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn restore_with_expired_multiplier_uses_base_rate() {
        let patch: SnapshotPatch = serde_json::from_str(
            r#"{"owned_generators": {"parlor_nonna": 1}, "sundae": {"active": true, "multiplier_until": 1000}}"#,
        )
        .unwrap();
        let eco = Economy::restore(&patch, NOW);
        assert!((eco.sps() - 1.0).abs() < 1e-9);
        assert!(!eco.state().sundae.active);
    }

    #[test]
    fn snapshot_is_detached_copy() {
        let mut eco = rich(100.0);
        let snap = eco.snapshot();
        eco.click_once();
        assert!((snap.scoops_banked - 100.0).abs() < f64::EPSILON);
        assert!((eco.state().scoops_banked - 101.0).abs() < f64::EPSILON);
    }

    #[test]
    fn purchase_error_messages() {
        assert_eq!(PurchaseError::AlreadyOwned.to_string(), "already owned");
        assert_eq!(
            PurchaseError::UnknownId("x".into()).to_string(),
            "unknown shop item `x`"
        );
    }
}
