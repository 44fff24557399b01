pub mod grid;
pub mod orient;

use indicatif::{ProgressBar, ProgressStyle};

/// A progress bar in the house style, hidden under `--quiet` via indicatif's
/// draw-target detection.
pub fn progress_bar(len: u64, message: &'static str) -> ProgressBar {
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::with_template("{msg:<24} [{bar:40.cyan/blue}] {pos}/{len}")
            .expect("progress template is valid")
            .progress_chars("=> "),
    );
    bar.set_message(message);
    bar
}
