use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{bright_green, bright_red, bright_yellow};

/// Spinner shown on stderr while a fetch cycle runs
pub struct FetchProgress {
    pb: ProgressBar,
}

impl FetchProgress {
    pub fn start(target: &str) -> Self {
        let pb = create_spinner(bright_yellow(format!("Fetching {target}")).to_string());
        Self { pb }
    }

    pub fn finish(self, records: usize) {
        self.pb
            .finish_with_message(bright_green(format!("Fetched {records} summaries ✓")).to_string());
    }

    pub fn fail(self) {
        self.pb
            .abandon_with_message(bright_red("Fetch failed ✗").to_string());
    }
}

fn create_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {msg} {spinner}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
