//! Brain-Radio CLI
//!
//! Usage:
//!   brainradio --mode focus                       # Generate from the demo catalog
//!   brainradio --mode relax --genre Jazz          # Genre hint replaces defaults
//!   brainradio --mode focus --candidates c.json   # Verify your own candidates
//!   brainradio --mode sleep --json                # JSON output
//!   brainradio --serve                            # HTTP API server

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use brainradio::core::{
    demo_catalog, demo_search, run_server, CandidateSource, PipelineConfig, RunState,
    SessionStore, StaticCatalog, Supervisor,
};
use brainradio::types::{Mode, PipelineError, PlaylistRequest, TrackCandidate};
use brainradio::{DEFAULT_DURATION_MINUTES, VERSION};

/// Tracks shown in the summary before "... and N more"
const MAX_TRACKS_TO_DISPLAY: usize = 10;

#[derive(Parser, Debug)]
#[command(
    name = "brainradio",
    version = VERSION,
    about = "Brain-Radio - Generate neuro-protocol playlists from verified tracks",
    long_about = "Brain-Radio translates a cognitive-state mode into strict constraints\n\
                  and verifies candidate tracks against them.\n\n\
                  Modes:\n  \
                  focus       120-140 BPM, no vocals, no live/remaster/feat\n  \
                  relax       60-90 BPM, vocals allowed, major key preferred\n  \
                  sleep       <= 60 BPM, very low energy\n  \
                  meditation  <= 70 BPM, no vocals"
)]
struct Args {
    /// Neuro-protocol mode: focus, relax, sleep, meditation
    #[arg(short, long, default_value = "focus")]
    mode: String,

    /// Genre preference (replaces the mode's default genres)
    #[arg(short, long)]
    genre: Option<String>,

    /// Target playlist duration in minutes (0 = unset)
    #[arg(short, long, default_value_t = DEFAULT_DURATION_MINUTES)]
    duration: u32,

    /// JSON file with a list of candidate tracks (default: built-in demo catalog)
    #[arg(short, long)]
    candidates: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Show every verification decision
    #[arg(short, long)]
    verbose: bool,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address
    #[arg(long, env = "BRAINRADIO_ADDR", default_value = "127.0.0.1:8000")]
    addr: String,

    /// Timeout for one fallback BPM search (milliseconds)
    #[arg(long, env = "BRAINRADIO_SEARCH_TIMEOUT_MS", default_value_t = brainradio::DEFAULT_SEARCH_TIMEOUT_MS)]
    search_timeout_ms: u64,

    /// Candidates verified concurrently
    #[arg(long, env = "BRAINRADIO_MAX_CONCURRENT", default_value_t = brainradio::DEFAULT_MAX_CONCURRENT_VERIFICATIONS)]
    max_concurrent: usize,
}

impl Args {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::default()
            .with_search_timeout(Duration::from_millis(self.search_timeout_ms))
            .with_max_concurrent(self.max_concurrent)
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("BRAINRADIO_LOG")
                .from_env_lossy(),
        )
        .init();

    if args.no_color {
        colored::control::set_override(false);
    }

    let outcome = if args.serve {
        run_serve(&args).await
    } else {
        run_generate(&args).await
    };

    if let Err(e) = outcome {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Load candidates from a JSON file, or fall back to the demo catalog
fn load_catalog(path: Option<&PathBuf>) -> Result<StaticCatalog, PipelineError> {
    let Some(path) = path else {
        return Ok(demo_catalog());
    };
    let content = std::fs::read_to_string(path)?;
    let tracks: Vec<TrackCandidate> = serde_json::from_str(&content)?;
    for track in &tracks {
        track.validate()?;
    }
    Ok(StaticCatalog::new(tracks))
}

fn build_supervisor(args: &Args) -> Result<Supervisor, PipelineError> {
    let catalog: Arc<dyn CandidateSource> = Arc::new(load_catalog(args.candidates.as_ref())?);
    Ok(Supervisor::new(
        catalog,
        Arc::new(demo_search()),
        args.pipeline_config(),
    ))
}

/// Generate one playlist and print it
async fn run_generate(args: &Args) -> Result<(), PipelineError> {
    let mode: Mode = args.mode.parse()?;
    let supervisor = build_supervisor(args)?;

    let mut request = PlaylistRequest::new(mode)
        .with_duration_minutes((args.duration > 0).then_some(args.duration));
    if let Some(genre) = &args.genre {
        request = request.with_genre(genre.clone());
    }

    if !args.json {
        print_header(mode);
        if let Some(genre) = &args.genre {
            println!("Genre preference: {}", genre);
        }
        match request.duration_minutes {
            Some(minutes) => println!("Target duration: {} minutes", minutes),
            None => println!("Target duration: unset"),
        }
        println!();
    }

    let state = supervisor.execute(request).await;

    if args.verbose && !args.json {
        print_decisions(&state);
    }

    let result = state.into_result()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "{} Generated playlist with {} tracks",
        "[SUCCESS]".green().bold(),
        result.tracks.len()
    );
    println!("Total duration: {:.1} minutes", result.total_minutes());
    println!();
    println!("Verification summary:");
    let summary = &result.verification_summary;
    println!("  total_candidates: {}", summary.total_candidates);
    println!("  approved: {}", summary.approved);
    println!("  rejected: {}", summary.rejected);

    if !result.tracks.is_empty() {
        println!();
        println!("Tracks:");
        for (i, track) in result.tracks.iter().take(MAX_TRACKS_TO_DISPLAY).enumerate() {
            println!("  {}. {}", i + 1, track.display_name());
        }
        if result.tracks.len() > MAX_TRACKS_TO_DISPLAY {
            println!(
                "  ... and {} more",
                result.tracks.len() - MAX_TRACKS_TO_DISPLAY
            );
        }
    }

    Ok(())
}

/// Print header
fn print_header(mode: Mode) {
    println!("{}", "========================================".bold());
    println!("  Brain-Radio v{} - {} mode", VERSION, mode.to_string().bold());
    println!("{}", "========================================".bold());
    println!();
}

/// Print one line per verification decision
fn print_decisions(state: &RunState) {
    if let Some(constraints) = &state.constraints {
        println!(
            "Constraints: tempo {} | genres {}",
            constraints.tempo_label(),
            constraints.preferred_genres().join(", ")
        );
    }
    for (track, decision) in state.candidates.iter().zip(&state.decisions) {
        let line = format!("{:<40} {}", track.display_name(), decision.to_parseable_string());
        if decision.accepted {
            println!("{}", line.green());
        } else {
            println!("{}", line.red());
            for reason in &decision.reasons {
                println!("{}", format!("  └─ {}", reason).dimmed());
            }
        }
    }
    println!();
}

/// Run HTTP API server
async fn run_serve(args: &Args) -> Result<(), PipelineError> {
    println!();
    println!("{}", "Brain-Radio API Server".bold());
    println!("Version: {}", VERSION);
    println!();

    let supervisor = build_supervisor(args)?;
    let sessions = Arc::new(SessionStore::new());
    run_server(&args.addr, supervisor, sessions).await
}
