// src/config/consts.rs

// Net config
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/104.0.0.0 Safari/537.36";
pub const REQUEST_TIMEOUT_SECS: u64 = 120;

// Env overrides (read by the CLI, `.env` honoured)
pub const ENV_USER_AGENT: &str = "OAC_USER_AGENT";
pub const ENV_OUT_DIR: &str = "OAC_OUT_DIR";

// Fixed-width reports
pub const BODY_START_LINE: usize = 15;
pub const FOOTER_SENTINEL: &str = "COMMENTS AND NOTES";

// Canonical schema
pub const REASON_COLUMN_INDEX: usize = 18;
pub const REASON_HEADER: &str = "Qty Reason";
pub const REASON_PLACEHOLDER: &str = " ";

// Export
pub const DEFAULT_OUT_DIR: &str = "out";

// Concurrency
pub const REQUEST_PAUSE_MS: u64 = 75; // be polite
pub const JITTER_MS: u64 = 50; // extra 0..50 ms
