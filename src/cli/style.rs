//! Terminal output helpers

use anstream::println;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::time::Duration;

/// Start a spinner with `message`; the caller clears it when done
pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message.to_string());
    bar.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}").expect("spinner template is valid"),
    );
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

/// Print a success line with a green check mark
pub fn success(message: impl AsRef<str>) {
    println!("{} {}", "✓".green(), message.as_ref());
}
