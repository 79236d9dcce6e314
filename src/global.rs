pub const LOG_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/logs");
pub const CRASH_LOG: &str = "crash.log";
pub const LATEST_LOG: &str = "latest.log";
pub const DIST_DIR: &str = "frontend/dist";
pub const TEST_COOKIE_EXP_SECONDS: i64 = 60;