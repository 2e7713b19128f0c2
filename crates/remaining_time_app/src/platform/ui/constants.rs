/// Character columns of the target display.
pub const DISPLAY_COLUMNS: usize = 20;
pub const NO_ESTIMATE: &str = "--:--:--";
pub const STALE_MARKER: &str = "(stale)";
pub const WAITING_TEXT: &str = "waiting for printer";
