//! Implements GenerationObserver with an indicatif progress bar.

use crate::domain::WeekPage;
use crate::ports::GenerationObserver;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

const TEMPLATE: &str = "[{elapsed_precise}] {bar:40.red/yellow} {pos:>3}/{len:3} {msg}";

/// Progress bar sized on `started`. Hidden until then.
pub struct ProgressObserver {
    bar: ProgressBar,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationObserver for ProgressObserver {
    fn started(&self, total_pages: usize) {
        self.bar.set_length(total_pages as u64);
        self.bar.set_position(0);
        let style = ProgressStyle::default_bar()
            .template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");
        self.bar.set_style(style);
        self.bar
            .set_draw_target(indicatif::ProgressDrawTarget::stderr());
    }

    fn page_done(&self, page: &WeekPage) {
        self.bar.set_message(format!("week {}", page.week_number));
        self.bar.inc(1);
    }

    fn finished(&self, artifact: &Path) {
        self.bar
            .finish_with_message(format!("saved {}", artifact.display()));
    }
}
