//! Flare CLI
//!
//! Plays, scrubs and inspects keyframe timelines without a renderer. Every
//! command runs against `--file` when given, otherwise against the built-in
//! explosion sequence.

mod config;
mod player;
mod report;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::TimelineFile;
use crate::player::{PlayOptions, PlayOutcome, Player};
use crate::report::Format;

/// Headless keyframe timeline player
#[derive(Parser, Debug)]
#[command(name = "flare")]
#[command(about = "Play, seek, and inspect keyframe timelines")]
#[command(version)]
struct Cli {
    /// Timeline file (TOML); defaults to the explosion preset
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Explicit tracing filter, overrides -v and RUST_LOG
    #[arg(long, global = true)]
    log_filter: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play the timeline in real time
    Play {
        /// Frames per second, defaults to the file's playback.fps
        #[arg(long)]
        fps: Option<u32>,

        /// Start timestamp in ms, defaults to the file's playback.start_ms
        #[arg(long)]
        from: Option<f64>,

        /// Pause once this timestamp is reached
        #[arg(long)]
        pause_at: Option<f64>,

        /// Print property values every N frames (0 for none)
        #[arg(long, default_value = "0")]
        every: u64,
    },

    /// Seek to a timestamp and print every property
    Seek {
        /// Timestamp in ms
        #[arg(allow_negative_numbers = true)]
        ms: f64,

        #[arg(long)]
        json: bool,
    },

    /// Print property values over a range of timestamps
    Sample {
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        start: f64,

        #[arg(long, default_value = "2000")]
        end: f64,

        #[arg(long, default_value = "100")]
        step: f64,

        #[arg(long)]
        json: bool,
    },

    /// Show each track's compiled intervals
    Inspect,

    /// Write the explosion preset as a timeline file
    Init {
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// List the easing catalog
    Easings {
        /// Points sampled across [0, 1]
        #[arg(long, default_value = "5")]
        samples: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_filter.as_deref());

    match cli.command {
        Command::Play {
            fps,
            from,
            pause_at,
            every,
        } => {
            let file = TimelineFile::load_or_preset(cli.file.as_deref())?;
            let fps = fps.unwrap_or(file.playback.fps);
            let options = PlayOptions {
                from_ms: from.unwrap_or(file.playback.start_ms),
                pause_at,
                every,
            };

            let mut player = Player::new(&file, fps)?;
            let outcome = player.play(options, |frame, sample| {
                print!("frame {frame}: {}", report::sample_text(&sample));
            });

            match outcome {
                PlayOutcome::Completed {
                    frames,
                    timestamp_ms,
                } => println!("completed after {frames} frames at {timestamp_ms:.3} ms"),
                PlayOutcome::Paused {
                    frames,
                    timestamp_ms,
                } => println!("paused after {frames} frames at {timestamp_ms:.3} ms"),
            }
            print!("{}", report::sample_text(&player.sample()));
        }

        Command::Seek { ms, json } => {
            if !ms.is_finite() {
                bail!("timestamp must be finite, got {ms}");
            }
            let file = TimelineFile::load_or_preset(cli.file.as_deref())?;
            let mut player = Player::new(&file, file.playback.fps)?;
            let sample = player.seek(ms);
            println!("{}", report::render_sample(&sample, Format::from_flag(json))?.trim_end());
        }

        Command::Sample {
            start,
            end,
            step,
            json,
        } => {
            let file = TimelineFile::load_or_preset(cli.file.as_deref())?;
            let mut player = Player::new(&file, file.playback.fps)?;
            let samples = player.sample_range(start, end, step)?;
            println!(
                "{}",
                report::render_samples(&samples, Format::from_flag(json))?.trim_end()
            );
        }

        Command::Inspect => {
            let file = TimelineFile::load_or_preset(cli.file.as_deref())?;
            let player = Player::new(&file, file.playback.fps)?;
            print!("{}", report::inspect(&file, player.timeline()));
        }

        Command::Init { path, force } => {
            if path.exists() && !force {
                bail!(
                    "{} already exists, pass --force to overwrite",
                    path.display()
                );
            }
            let content = TimelineFile::preset().to_toml()?;
            fs::write(&path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote explosion preset");
            println!("Wrote {}", path.display());
        }

        Command::Easings { samples } => {
            print!("{}", report::easing_table(samples));
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8, explicit: Option<&str>) {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = EnvFilter::try_new(log_directives(verbose, explicit, from_env.as_deref()))
        .unwrap_or_else(|_| EnvFilter::new(verbosity_level(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn verbosity_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// `--log-filter` wins over `RUST_LOG`, which wins over `-v`
fn log_directives(verbose: u8, explicit: Option<&str>, from_env: Option<&str>) -> String {
    explicit
        .or(from_env.filter(|directives| !directives.trim().is_empty()))
        .unwrap_or_else(|| verbosity_level(verbose))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["flare", "seek", "250", "--json", "-vv", "--file", "t.toml"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.file, Some(PathBuf::from("t.toml")));
        assert!(matches!(cli.command, Command::Seek { ms, json: true } if ms == 250.0));
    }

    #[test]
    fn log_filter_precedence() {
        assert_eq!(log_directives(0, None, None), "warn");
        assert_eq!(log_directives(2, None, None), "debug");
        assert_eq!(log_directives(5, None, None), "trace");
        assert_eq!(log_directives(1, None, Some("flare_animation=trace")), "flare_animation=trace");
        assert_eq!(log_directives(1, None, Some("  ")), "info");
        assert_eq!(log_directives(3, Some("off"), Some("debug")), "off");
    }

    #[test]
    fn sample_defaults_cover_the_slider_range() {
        let cli = Cli::parse_from(["flare", "sample"]);
        match cli.command {
            Command::Sample {
                start, end, step, ..
            } => {
                assert_eq!((start, end, step), (0.0, 2000.0, 100.0));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
