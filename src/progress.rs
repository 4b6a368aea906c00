use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Spinner counting files while the tree is walked. Draws to stderr.
pub fn walk_spinner(enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner} Scanning: {pos} files found")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.enable_steady_tick(TICK_INTERVAL);
    spinner
}

/// Bar for the content hashing stage.
pub fn hash_bar(enabled: bool, total: u64) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(total);
    let style = ProgressStyle::with_template("Hashing [{bar:40}] {pos}/{len} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style.progress_chars("=> "));
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_bars_are_hidden() {
        assert!(walk_spinner(false).is_hidden());
        assert!(hash_bar(false, 10).is_hidden());
    }

    #[test]
    fn test_hash_bar_length() {
        let bar = hash_bar(true, 42);
        assert_eq!(bar.length(), Some(42));
        bar.finish_and_clear();
    }
}
