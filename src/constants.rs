// Defaults for the config file; the config layer is the only reader.

// === Playback ===
pub const DEFAULT_SKIP_SECONDS: f64 = 10.0;
/// Offsets within this many seconds of the end count as "finished"
pub const DEFAULT_COMPLETION_EPSILON_SECS: f64 = 1.0;
pub const DEFAULT_COUNTDOWN_SECONDS: u32 = 5;
/// Tick of the headless media clock
pub const DEFAULT_PROGRESS_TICK_MS: u64 = 250;

// === Gestures ===
pub const DEFAULT_DEMOTE_THRESHOLD: f64 = 200.0;
pub const DEFAULT_DOUBLE_TAP_WINDOW_MS: u64 = 300;

// === Catalog ===
pub const DEFAULT_CATALOG_FILE: &str = "videos.json";
/// Videos shown per category before "show more"
pub const CATEGORY_PREVIEW_LIMIT: usize = 6;

// === Runtime ===
pub const APP_NAME: &str = "reelcast";
pub const LEDGER_FILE: &str = "ledger.json";
pub const EVENT_BUS_CAPACITY: usize = 256;
pub const DEFAULT_LOG_FILTER: &str = "reelcast=info";
