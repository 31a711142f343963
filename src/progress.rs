//! Progress feedback for assessment passes.
//!
//! - **Quiet Mode**: no progress output (`CHAINRISK_QUIET` or `--quiet`)
//! - **Non-TTY**: progress bars are hidden in CI and piped output
//!
//! ```rust,no_run
//! use chainrisk::progress::{ProgressConfig, TEMPLATE_SUPPLIERS};
//!
//! let config = ProgressConfig::from_env(false);
//! let bar = config.create_bar(100, TEMPLATE_SUPPLIERS);
//! bar.set_message("Assessing suppliers");
//! bar.inc(1);
//! bar.finish_and_clear();
//! ```

use indicatif::{ProgressBar, ProgressStyle};

pub const TEMPLATE_SUPPLIERS: &str = "🏭 {msg} {pos}/{len} suppliers ({percent}%) - {eta}";
pub const TEMPLATE_PARTS: &str = "📦 {msg} {pos}/{len} parts ({percent}%) - {eta}";
pub const TEMPLATE_RECOMMENDATIONS: &str = "🔁 {msg} {pos}/{len} parts - {eta}";

#[derive(Debug, Clone, Default)]
pub struct ProgressConfig {
    pub quiet_mode: bool,
}

impl ProgressConfig {
    pub fn from_env(quiet: bool) -> Self {
        let env_quiet = std::env::var("CHAINRISK_QUIET").is_ok();
        Self {
            quiet_mode: quiet || env_quiet,
        }
    }

    /// Never shows progress; used by library callers and tests.
    pub fn hidden() -> Self {
        Self { quiet_mode: true }
    }

    pub fn should_show_progress(&self) -> bool {
        if self.quiet_mode {
            return false;
        }

        use std::io::IsTerminal;
        std::io::stderr().is_terminal()
    }

    /// A bar with the given template, or a hidden bar when progress is off.
    pub fn create_bar(&self, len: u64, template: &str) -> ProgressBar {
        if !self.should_show_progress() {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len);
        match ProgressStyle::default_bar().template(template) {
            Ok(style) => pb.set_style(style.progress_chars("█▓▒░  ")),
            Err(e) => log::debug!("Invalid progress bar template {:?}: {}", template, e),
        }
        pb
    }
}
