//! Semantic action IDs for Scoop Parlor click targets.
//!
//! Registered during render and dispatched via `InputEvent::Click`.

// ── Core actions ────────────────────────────────────────────────
pub const CLICK_SCOOP: u16 = 0;
pub const CLAIM_SUNDAE: u16 = 1;

// ── Shop tabs ───────────────────────────────────────────────────
pub const TAB_GENERATORS: u16 = 10;
pub const TAB_UPGRADES: u16 = 11;

// ── Generator purchase (base + config index) ────────────────────
pub const BUY_GENERATOR_BASE: u16 = 100;

// ── Upgrade purchase (base + config index) ──────────────────────
pub const BUY_UPGRADE_BASE: u16 = 200;

// ── Footer ──────────────────────────────────────────────────────
pub const SAVE: u16 = 300;
pub const RESET: u16 = 301;
pub const CONFIRM_RESET: u16 = 302;
pub const CANCEL_RESET: u16 = 303;
