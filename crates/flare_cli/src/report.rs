//! Terminal and JSON output

use anyhow::Result;
use flare_animation::{Clock, Easing, FrameScheduler, Timeline};
use std::fmt::Write as _;

use crate::config::TimelineFile;
use crate::player::Sample;

/// Output format shared by the sampling commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl Format {
    pub fn from_flag(json: bool) -> Self {
        if json {
            Format::Json
        } else {
            Format::Text
        }
    }
}

/// One sample as aligned name and value columns
pub fn sample_text(sample: &Sample) -> String {
    let width = sample
        .values
        .iter()
        .map(|p| p.name.len())
        .max()
        .unwrap_or(0);

    let mut out = format!("t = {:.3} ms\n", sample.timestamp_ms);
    for property in &sample.values {
        let _ = writeln!(out, "  {:<width$}  {:>10.6}", property.name, property.value);
    }
    out
}

pub fn render_sample(sample: &Sample, format: Format) -> Result<String> {
    match format {
        Format::Text => Ok(sample_text(sample)),
        Format::Json => Ok(serde_json::to_string_pretty(sample)?),
    }
}

/// A table with one row per timestamp, or a JSON array
pub fn render_samples(samples: &[Sample], format: Format) -> Result<String> {
    if format == Format::Json {
        return Ok(serde_json::to_string_pretty(samples)?);
    }

    let Some(first) = samples.first() else {
        return Ok(String::new());
    };

    let mut out = String::from("time_ms");
    for property in &first.values {
        let _ = write!(out, "\t{}", property.name);
    }
    out.push('\n');

    for sample in samples {
        let _ = write!(out, "{}", sample.timestamp_ms);
        for property in &sample.values {
            let _ = write!(out, "\t{:.6}", property.value);
        }
        out.push('\n');
    }
    Ok(out)
}

/// Per-track structure of a compiled timeline
pub fn inspect<S: FrameScheduler, C: Clock>(
    file: &TimelineFile,
    timeline: &Timeline<S, C>,
) -> String {
    let width = file.tracks.iter().map(|t| t.name.len()).max().unwrap_or(0);
    let mut out = format!(
        "{} tracks, {} ms total, {} fps\n",
        file.tracks.len(),
        timeline.duration_ms(),
        file.playback.fps
    );

    for (track, variable) in file.tracks.iter().zip(timeline.variables()) {
        let end = variable.end_at();
        let _ = writeln!(
            out,
            "  {:<width$}  {:>3} keyframes  ends {:>8} ms  {} -> {}",
            variable.name(),
            track.keyframes.len(),
            end,
            track.initial_value,
            variable.value_at(end)
        );
        for interval in variable.intervals() {
            let _ = writeln!(
                out,
                "  {:<width$}    [{:>8} .. {:>8}]  {} -> {}  {}",
                "", interval.start_at, interval.end_at, interval.from, interval.to, interval.easing
            );
        }
    }
    out
}

/// ASCII curve of every easing function
pub fn easing_table(samples: usize) -> String {
    let samples = samples.max(2);
    let mut out = String::new();
    for easing in Easing::ALL {
        let _ = write!(out, "{:<18}", easing.name());
        for i in 0..samples {
            let x = i as f64 / (samples - 1) as f64;
            let _ = write!(out, " {:>6.3}", easing.apply(x));
        }
        out.push('\n');
    }
    out
}
