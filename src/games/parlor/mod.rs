/// Scoop Parlor: an incremental ice-cream idle game.

pub mod actions;
pub mod bonus;
pub mod config;
pub mod display;
pub mod logic;
pub mod random;
pub mod render;
pub mod save;
pub mod state;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::games::Game;
use crate::input::{ClickState, InputEvent, KEY_ESC};
use crate::time::{IntervalTimer, TickDriver};

use actions::*;
use bonus::{BonusScheduler, SchedulerEvent};
use config::{UpgradeConfig, AUTOSAVE_INTERVAL_MS, TICK_INTERVAL_MS};
use display::{format_number, StatsDisplay};
use logic::{BonusReward, Economy, PurchaseError};
use random::{RandomSource, XorShiftRng};
use save::SaveStore;

/// Upgrade hotkeys, skipping letters bound to other actions.
pub const UPGRADE_KEYS: &[char] = &['a', 'b', 'd', 'e', 'f', 'h', 'i', 'j', 'k', 'l'];

const MAX_LOG_ENTRIES: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShopTab {
    Generators,
    Upgrades,
}

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub text: String,
    pub is_important: bool,
}

pub struct ParlorGame {
    pub economy: Economy,
    store: Box<dyn SaveStore>,
    rng: Box<dyn RandomSource>,
    ticker: TickDriver,
    autosave: IntervalTimer,
    pub scheduler: BonusScheduler,
    pub tab: ShopTab,
    pub confirm_reset: bool,
    pub log: Vec<LogEntry>,
    pub stats: StatsDisplay,
    /// Clock as of the last `tick`; input handlers act at this time.
    pub now_ms: u64,
}

impl ParlorGame {
    /// Load from the platform store (localStorage in the browser).
    pub fn new(now_ms: u64) -> Self {
        Self::with_parts(
            save::default_store(),
            Box::new(XorShiftRng::from_timestamp(now_ms)),
            now_ms,
        )
    }

    pub fn with_parts(
        mut store: Box<dyn SaveStore>,
        mut rng: Box<dyn RandomSource>,
        now_ms: u64,
    ) -> Self {
        let (economy, offline) = match save::load_economy(store.as_mut(), now_ms) {
            Some((economy, offline)) => (economy, offline),
            None => (Economy::new(now_ms), None),
        };
        let scheduler = BonusScheduler::new(now_ms, rng.as_mut());
        let mut ticker = TickDriver::new(TICK_INTERVAL_MS);
        ticker.reset(now_ms);

        let mut game = Self {
            economy,
            store,
            rng,
            ticker,
            autosave: IntervalTimer::new(AUTOSAVE_INTERVAL_MS, now_ms),
            scheduler,
            tab: ShopTab::Generators,
            confirm_reset: false,
            log: Vec::new(),
            stats: StatsDisplay::new(),
            now_ms,
        };

        game.add_log("Welcome to Scoop Parlor! Press C to scoop.", false);
        if let Some(progress) = offline {
            game.add_log(
                &format!(
                    "Welcome back! You earned {} scoops while away.",
                    format_number(progress.gain.floor())
                ),
                true,
            );
        }
        game.refresh_stats();
        game
    }

    pub fn add_log(&mut self, text: &str, is_important: bool) {
        self.log.push(LogEntry {
            text: text.to_string(),
            is_important,
        });
        if self.log.len() > MAX_LOG_ENTRIES {
            self.log.remove(0);
        }
    }

    /// Save without feedback (autosave, page unload).
    pub fn persist(&mut self, now_ms: u64) {
        if !save::save_economy(self.store.as_mut(), &mut self.economy, now_ms) {
            #[cfg(target_arch = "wasm32")]
            web_sys::console::warn_1(&"Scoop Parlor: failed to serialize save".into());
        }
    }

    pub fn save_now(&mut self) {
        let now = self.now_ms;
        self.persist(now);
        self.autosave.restart(now);
        self.add_log("Game Saved!", false);
    }

    /// Wipe the persisted record and start over in place.
    pub fn reset(&mut self) {
        let now = self.now_ms;
        self.store.clear();
        self.economy = Economy::new(now);
        self.scheduler = BonusScheduler::new(now, self.rng.as_mut());
        self.ticker.reset(now);
        self.autosave.restart(now);
        self.tab = ShopTab::Generators;
        self.confirm_reset = false;
        self.log.clear();
        self.add_log("Progress reset. A fresh parlor awaits!", true);
        self.stats = StatsDisplay::new();
        self.refresh_stats();
    }

    /// Unowned upgrades in config order, paired with their config index.
    pub fn shown_upgrades(&self) -> Vec<(usize, &'static UpgradeConfig)> {
        let state = self.economy.state();
        self.economy
            .config()
            .upgrades
            .iter()
            .enumerate()
            .filter(|(_, u)| !state.owns_upgrade(u.id))
            .collect()
    }

    fn refresh_stats(&mut self) {
        let state = self.economy.state();
        let (banked, lifetime) = (state.scoops_banked, state.lifetime_scoops);
        let sps = self.economy.sps();
        let active = self.economy.multiplier_active(self.now_ms);
        self.stats.update(banked, lifetime, sps, active);
    }

    fn click_scoop(&mut self) -> bool {
        self.economy.click_once();
        true
    }

    fn claim_sundae(&mut self) -> bool {
        let now = self.now_ms;
        if !self.scheduler.claim(now, self.rng.as_mut()) {
            return false;
        }
        match self.economy.trigger_bonus_event(self.rng.as_mut(), now) {
            BonusReward::Windfall { amount } => self.add_log(
                &format!("Golden Sundae! +{} scoops!", format_number(amount.floor())),
                true,
            ),
            BonusReward::Multiplier { value, .. } => self.add_log(
                &format!("Golden Sundae! Production x{} for 30s!", value),
                true,
            ),
        }
        true
    }

    fn buy_generator(&mut self, index: usize) -> bool {
        let Some(gen) = self.economy.config().generators.get(index) else {
            return false;
        };
        match self.economy.purchase_generator(gen.id, self.now_ms) {
            Ok(cost) => self.add_log(
                &format!("Bought {} for {} scoops.", gen.name, format_number(cost)),
                false,
            ),
            Err(e) => self.log_refusal(gen.name, &e),
        }
        true
    }

    fn buy_upgrade(&mut self, config_index: usize) -> bool {
        let Some(upg) = self.economy.config().upgrades.get(config_index) else {
            return false;
        };
        match self.economy.purchase_upgrade(upg.id, self.now_ms) {
            Ok(_) => self.add_log(&format!("Upgrade unlocked: {}!", upg.name), true),
            Err(e) => self.log_refusal(upg.name, &e),
        }
        true
    }

    fn log_refusal(&mut self, name: &str, err: &PurchaseError) {
        let text = match err {
            PurchaseError::InsufficientFunds { cost, .. } => {
                format!("Not enough scoops for {} (costs {}).", name, format_number(*cost))
            }
            PurchaseError::AlreadyOwned => format!("{} is already owned.", name),
            PurchaseError::LimitReached => format!("You cannot own any more {}.", name),
            PurchaseError::UnknownId(_) => err.to_string(),
        };
        self.add_log(&text, false);
    }

    fn request_reset(&mut self) -> bool {
        self.confirm_reset = true;
        self.add_log("Reset all progress? Press Y to confirm, N to cancel.", true);
        true
    }

    fn cancel_reset(&mut self) -> bool {
        self.confirm_reset = false;
        self.add_log("Reset cancelled.", false);
        true
    }

    fn toggle_tab(&mut self) -> bool {
        self.tab = match self.tab {
            ShopTab::Generators => ShopTab::Upgrades,
            ShopTab::Upgrades => ShopTab::Generators,
        };
        true
    }

    fn handle_key(&mut self, key: char) -> bool {
        if self.confirm_reset {
            return match key {
                'y' | 'Y' => {
                    self.reset();
                    true
                }
                'n' | 'N' | KEY_ESC => self.cancel_reset(),
                _ => false,
            };
        }

        match key {
            'c' | ' ' => self.click_scoop(),
            'g' => self.claim_sundae(),
            'u' => self.toggle_tab(),
            's' => {
                self.save_now();
                true
            }
            'r' => self.request_reset(),
            '1'..='9' => self.buy_generator((key as u8 - b'1') as usize),
            _ if self.tab == ShopTab::Upgrades => {
                let Some(pos) = UPGRADE_KEYS.iter().position(|&k| k == key) else {
                    return false;
                };
                match self.shown_upgrades().get(pos) {
                    Some(&(config_index, _)) => self.buy_upgrade(config_index),
                    None => false,
                }
            }
            _ => false,
        }
    }

    fn handle_click(&mut self, action_id: u16) -> bool {
        if self.confirm_reset {
            return match action_id {
                CONFIRM_RESET => {
                    self.reset();
                    true
                }
                CANCEL_RESET => self.cancel_reset(),
                _ => false,
            };
        }

        match action_id {
            CLICK_SCOOP => self.click_scoop(),
            CLAIM_SUNDAE => self.claim_sundae(),
            TAB_GENERATORS => {
                self.tab = ShopTab::Generators;
                true
            }
            TAB_UPGRADES => {
                self.tab = ShopTab::Upgrades;
                true
            }
            SAVE => {
                self.save_now();
                true
            }
            RESET => self.request_reset(),
            id if (BUY_GENERATOR_BASE..BUY_UPGRADE_BASE).contains(&id) => {
                self.buy_generator((id - BUY_GENERATOR_BASE) as usize)
            }
            id if (BUY_UPGRADE_BASE..SAVE).contains(&id) => {
                self.buy_upgrade((id - BUY_UPGRADE_BASE) as usize)
            }
            _ => false,
        }
    }
}

impl Game for ParlorGame {
    fn handle_input(&mut self, event: &InputEvent) -> bool {
        let consumed = match event {
            InputEvent::Key(c) => self.handle_key(*c),
            InputEvent::Click(id) => self.handle_click(*id),
        };
        self.refresh_stats();
        consumed
    }

    /// Production tick, then the sundae schedule, then autosave.
    fn tick(&mut self, now_ms: u64) {
        self.now_ms = now_ms;

        if let Some(elapsed) = self.ticker.update(now_ms) {
            self.economy.advance(elapsed, now_ms);
        }

        match self.scheduler.poll(now_ms, self.rng.as_mut()) {
            Some(SchedulerEvent::Spawned) => {
                self.add_log("A golden sundae appeared! Press G to claim it.", true)
            }
            Some(SchedulerEvent::Expired) => self.add_log("The golden sundae melted away...", false),
            None => {}
        }

        if self.autosave.due(now_ms) {
            self.persist(now_ms);
        }

        self.refresh_stats();
    }

    fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(self, f, area, click_state);
    }
}
