use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};

use tapline::config::{Difficulty, GameConfig, Settings};
use tapline::game::RunEngine;
use tapline::model::{Beatmap, Track, builtin_tracks};
use tapline::submit::{BeatmapSubmission, SubmitClient};

#[derive(Parser)]
#[command(name = "tapline", version, about = "Tap-rhythm engine and beatmap tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the built-in tracks
    Tracks,
    /// Run a track headless with machine-perfect taps and print the summary
    Autoplay {
        /// Track id, or a path to a track JSON file
        track: String,
        #[arg(long, default_value = "normal")]
        difficulty: Difficulty,
    },
    /// Submit a recorded beatmap (a JSON array of ms timestamps) to a
    /// collection endpoint
    Submit {
        file: PathBuf,
        #[arg(long)]
        endpoint: String,
        /// Track the beatmap was recorded against
        #[arg(long)]
        track: String,
        /// Author name; defaults to the saved player name
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value = "")]
        comment: String,
        /// Calibration offset that was in effect while recording, in ms
        #[arg(long, default_value_t = 0)]
        offset: i64,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Tracks => list_tracks(),
        Command::Autoplay { track, difficulty } => autoplay(&track, difficulty),
        Command::Submit {
            file,
            endpoint,
            track,
            name,
            comment,
            offset,
        } => submit(&file, endpoint, &track, name, &comment, offset),
    }
}

fn list_tracks() -> Result<()> {
    for track in builtin_tracks() {
        println!(
            "{:<8} {:<12} {} beats, rating {}",
            track.id,
            track.name,
            track.beatmap.len(),
            track.difficulty_rating
        );
    }
    Ok(())
}

fn find_track(id_or_path: &str) -> Result<Track> {
    if let Some(track) = builtin_tracks().into_iter().find(|t| t.id == id_or_path) {
        return Ok(track);
    }
    let path = PathBuf::from(id_or_path);
    if path.exists() {
        return Track::load(&path);
    }
    bail!("no such track: {id_or_path}");
}

/// Drive a run to completion, tapping every note exactly on target.
fn autoplay(track: &str, difficulty: Difficulty) -> Result<()> {
    let track = find_track(track)?;
    let duration_ms = track.fallback_duration_ms() as f64;
    let targets: Vec<f64> = (0..track.beatmap.len())
        .filter_map(|i| track.beat_target_ms(i))
        .collect();

    let mut engine = RunEngine::new(track, GameConfig::default(), difficulty)?;
    let mut next_target = 0;
    let mut t = 0.0;
    while !engine.is_finished() {
        engine.tick(t, Some(duration_ms));
        while next_target < targets.len() && targets[next_target] <= t {
            engine.tap(targets[next_target]);
            next_target += 1;
        }
        if t >= duration_ms {
            engine.notify_track_ended();
        }
        t += 16.0;
    }

    let summary = engine
        .summary()
        .context("run ended without a summary")?;
    println!(
        "score {}  max combo {}  accuracy {:.1}%  {}",
        summary.score,
        summary.max_combo,
        summary.accuracy,
        if summary.success { "CLEAR" } else { "FAILED" }
    );
    if let Some(medal) = summary.medal {
        println!("medal: {medal:?}");
    }
    Ok(())
}

fn submit(
    file: &PathBuf,
    endpoint: String,
    track: &str,
    name: Option<String>,
    comment: &str,
    offset: i64,
) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read beatmap file: {}", file.display()))?;
    let beatmap: Beatmap = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse beatmap file: {}", file.display()))?;
    if beatmap.is_empty() {
        bail!("beatmap file contains no beats");
    }

    let name = name.unwrap_or_else(|| {
        let saved = Settings::load().player_name;
        if saved.is_empty() {
            "anonymous".to_string()
        } else {
            saved
        }
    });

    let payload = BeatmapSubmission::new(&name, track, &beatmap, comment, offset, Utc::now());
    let client = SubmitClient::new(endpoint)?;
    client.submit(&payload)?;
    println!("submitted {} beats for '{track}'", payload.beat_count);
    Ok(())
}
