//! Scoop Parlor のセーブ/ロード機能。
//!
//! ## 保存形式
//!
//! `GameState` をそのまま JSON にした 1 レコードを `STORAGE_KEY` に保存する。
//! バージョン番号は持たない。読み込み時は全フィールド省略可能な
//! `SnapshotPatch` として解釈し、新規状態の上にマージする。
//! 未知のフィールドは無視し、欠けているフィールドは初期値のままになる。
//!
//! ## オフライン進行
//!
//! ロードは二段階で行う。まずスナップショットを新しい `Economy` に復元して
//! 正しい SpS を求め、その SpS で経過時間 (最大 2 時間) 分の収益を加算する。

use super::config::OFFLINE_PROGRESS_CAP_SECONDS;
use super::logic::Economy;
use super::state::{GameState, SnapshotPatch};

/// localStorage のキー。
pub const STORAGE_KEY: &str = "iceCreamParlorSave";

/// 永続化先。ブラウザでは localStorage、テストやネイティブではメモリ。
pub trait SaveStore {
    fn save(&mut self, json: &str);
    fn load(&self) -> Option<String>;
    fn clear(&mut self);
}

/// オフライン中に得た収益。
#[derive(Clone, Debug, PartialEq)]
pub struct OfflineProgress {
    pub seconds: u64,
    pub gain: f64,
}

/// スナップショットを JSON 文字列にする。
pub fn to_json(state: &GameState) -> Option<String> {
    serde_json::to_string(state).ok()
}

/// JSON をパッチとして解釈する。壊れたデータは `None`（セーブ無し扱い）。
pub fn parse_snapshot(json: &str) -> Option<SnapshotPatch> {
    serde_json::from_str(json).ok()
}

/// 保存時刻から `now_ms` までのオフライン秒数。切り捨て、上限 2 時間。
pub fn offline_seconds(last_save_timestamp: u64, now_ms: u64) -> u64 {
    let elapsed_ms = now_ms.saturating_sub(last_save_timestamp);
    (elapsed_ms / 1000).min(OFFLINE_PROGRESS_CAP_SECONDS)
}

/// 二段階ロード: 復元 → 復元後の SpS でオフライン収益を計算 → 両残高に加算。
pub fn load_with_offline_progress(
    json: &str,
    now_ms: u64,
) -> Option<(Economy, Option<OfflineProgress>)> {
    let patch = parse_snapshot(json)?;
    let mut economy = Economy::restore(&patch, now_ms);

    let seconds = offline_seconds(economy.state().last_save_timestamp, now_ms);
    if seconds == 0 {
        return Some((economy, None));
    }
    let gain = seconds as f64 * economy.sps();
    economy.credit(gain);
    Some((economy, Some(OfflineProgress { seconds, gain })))
}

/// 保存時刻を打ってから保存する。
pub fn save_economy(store: &mut dyn SaveStore, economy: &mut Economy, now_ms: u64) -> bool {
    economy.mark_saved(now_ms);
    match to_json(economy.state()) {
        Some(json) => {
            store.save(&json);
            true
        }
        None => false,
    }
}

/// ストアから復元する。無い・壊れている場合は `None`（新規ゲーム）。
/// 壊れたデータはストアから削除する。
pub fn load_economy(
    store: &mut dyn SaveStore,
    now_ms: u64,
) -> Option<(Economy, Option<OfflineProgress>)> {
    let json = store.load()?;
    let loaded = load_with_offline_progress(&json, now_ms);
    if loaded.is_none() {
        #[cfg(target_arch = "wasm32")]
        web_sys::console::warn_1(&"Scoop Parlor: セーブデータのパースに失敗（破棄します）".into());
        store.clear();
    }
    loaded
}

/// メモリ上のストア。ネイティブ実行とテスト用。
#[derive(Default)]
pub struct MemoryStore {
    pub data: Option<String>,
}

impl SaveStore for MemoryStore {
    fn save(&mut self, json: &str) {
        self.data = Some(json.to_string());
    }

    fn load(&self) -> Option<String> {
        self.data.clone()
    }

    fn clear(&mut self) {
        self.data = None;
    }
}

/// localStorage にアクセスする。WASM 環境でのみ動作。
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

#[cfg(target_arch = "wasm32")]
impl SaveStore for LocalStorage {
    /// 失敗時はサイレントに無視（コンソールにログ出力）。
    fn save(&mut self, json: &str) {
        match Self::storage() {
            Some(storage) => {
                if let Err(e) = storage.set_item(STORAGE_KEY, json) {
                    web_sys::console::warn_1(
                        &format!("Scoop Parlor: localStorage への保存に失敗: {e:?}").into(),
                    );
                }
            }
            None => web_sys::console::warn_1(&"Scoop Parlor: localStorage が使えません".into()),
        }
    }

    fn load(&self) -> Option<String> {
        Self::storage()?.get_item(STORAGE_KEY).ok()?
    }

    fn clear(&mut self) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(STORAGE_KEY);
        }
    }
}

/// 実行環境に応じたストアを返す。
pub fn default_store() -> Box<dyn SaveStore> {
    #[cfg(target_arch = "wasm32")]
    {
        Box::new(LocalStorage)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Box::new(MemoryStore::default())
    }
}
