//! Worked example: a small CLI driving the halflight mechanism.
//!
//! Demonstrates the full lifecycle a real host goes through:
//!
//! 1. Startup guard first (`boot::startup`) so the very first output
//!    already uses the correct mode.
//! 2. Provider construction and attach.
//! 3. Explicit preference changes (`set`), slot inspection (`status`),
//!    slot removal (`clear`), and a cooperative poll loop (`watch`)
//!    that re-resolves live while the preference is "system".

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use console::Style;

use halflight::{
    boot, ColorMode, FilePreferenceStore, OsSignal, Preference, ProcessMarker, ThemeProvider,
};

#[derive(Parser)]
#[command(name = "halflight", about = "Light/dark theme preference demo")]
struct Cli {
    /// Path of the persisted preference slot.
    #[arg(long, default_value = "halflight.theme", global = true)]
    slot: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the stored preference and the resolved mode.
    Status,
    /// Store an explicit preference.
    Set {
        /// The preference to store.
        preference: PreferenceArg,
    },
    /// Remove the stored preference (back to "follow system").
    Clear,
    /// Follow OS theme flips until interrupted.
    Watch {
        /// Poll interval in milliseconds.
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PreferenceArg {
    Light,
    Dark,
    System,
}

impl From<PreferenceArg> for Preference {
    fn from(arg: PreferenceArg) -> Self {
        match arg {
            PreferenceArg::Light => Preference::Light,
            PreferenceArg::Dark => Preference::Dark,
            PreferenceArg::System => Preference::System,
        }
    }
}

fn mode_style(mode: ColorMode) -> Style {
    match mode {
        ColorMode::Light => Style::new().black().on_white(),
        ColorMode::Dark => Style::new().white().on_black(),
    }
}

fn print_state(provider: &ThemeProvider) {
    let mode = provider.resolved();
    println!(
        "preference: {}  resolved: {}",
        provider.preference(),
        mode_style(mode).apply_to(mode),
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Before anything renders: the guard paints the root marker.
    boot::startup(&cli.slot);

    let signal = Arc::new(OsSignal::new());
    let mut provider = ThemeProvider::new(
        Box::new(FilePreferenceStore::new(&cli.slot)),
        Arc::clone(&signal) as Arc<dyn halflight::SignalSource>,
        Box::new(ProcessMarker::new()),
    );
    provider.attach();

    match cli.command {
        Command::Status => print_state(&provider),
        Command::Set { preference } => {
            provider.set_preference(preference.into());
            print_state(&provider);
        }
        Command::Clear => {
            // Absent slot and "system" are equivalent; writing system
            // keeps the slot well-formed for other tools.
            provider.set_preference(Preference::System);
            print_state(&provider);
        }
        Command::Watch { interval_ms } => {
            println!("watching for OS theme changes (ctrl-c to stop)");
            print_state(&provider);
            let mut last = provider.resolved();
            loop {
                signal.poll();
                let now = provider.resolved();
                if now != last {
                    print_state(&provider);
                    last = now;
                }
                std::thread::sleep(Duration::from_millis(interval_ms));
            }
        }
    }

    Ok(())
}
