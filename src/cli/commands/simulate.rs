//! `vitrine simulate`: run the page's animation machines headlessly.
//!
//! By default the run happens in virtual time and finishes instantly.
//! With `--realtime` the tokio drivers run on the wall clock and the
//! scripted inputs are fed to the cursor engine as they come due.

use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, trace, warn};

use crate::cli::args::{OutputFormat, SimulateArgs};
use crate::clock::{Clock, TokioClock, as_millis};
use crate::config::{VitrineConfig, load_or_default};
use crate::cursor::{CursorElements, CursorEngine, RecordingSurface, particle_rng};
use crate::driver::{
    CursorInput, InputAction, ScriptedInput, Simulation, SimulationReport, spawn_cursor,
    spawn_typewriter,
};
use crate::error::VitrineError;
use crate::observability::events::{Event, EventEmitter};
use crate::typewriter::{RecordingSink, Typewriter};

/// Counters from a wall-clock run.
#[derive(Debug, Serialize)]
struct RealtimeSummary {
    duration_ms: u64,
    writes: usize,
    final_text: Option<String>,
    cursor_attached: bool,
    skip_reason: Option<String>,
    effects_spawned: usize,
    effects_expired: usize,
    live_effects: usize,
    active_section: Option<String>,
}

/// Run a simulation and print its report.
///
/// # Errors
///
/// Returns an error if the configuration or script cannot be loaded, or
/// the event file cannot be created.
pub async fn run(args: &SimulateArgs) -> Result<(), VitrineError> {
    let loaded = load_or_default(args.config.as_deref())?;
    for warning in &loaded.warnings {
        warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }

    let mut config = (*loaded.config).clone();
    if args.seed.is_some() {
        config.cursor.seed = args.seed;
    }

    let script = match &args.script {
        Some(path) => load_script(path)?,
        None => Vec::new(),
    };

    let events = match &args.events {
        Some(path) => Some(Arc::new(EventEmitter::from_file(path)?)),
        None => None,
    };

    info!(
        duration_ms = as_millis(args.duration),
        inputs = script.len(),
        realtime = args.realtime,
        "simulation starting"
    );

    if args.realtime {
        let summary = run_realtime(&config, script, args, events).await;
        print_realtime(&summary, args.format)?;
    } else {
        let mut simulation = Simulation::new(&config, args.viewport_width, script, events);
        let report = simulation.run(args.duration);
        print_report(&report, args.format)?;
    }
    Ok(())
}

/// Reads a YAML input timeline.
///
/// # Errors
///
/// Returns an I/O error for unreadable files and a YAML error for
/// malformed timelines.
pub fn load_script(path: &Path) -> Result<Vec<ScriptedInput>, VitrineError> {
    let raw = std::fs::read_to_string(path)?;
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(&raw);
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_yaml::from_str(raw)?)
}

async fn run_realtime(
    config: &VitrineConfig,
    script: Vec<ScriptedInput>,
    args: &SimulateArgs,
    events: Option<Arc<EventEmitter>>,
) -> RealtimeSummary {
    let clock = TokioClock::start();
    let cancel = CancellationToken::new();

    let sink = RecordingSink::new();
    let mut typewriter = Typewriter::start(
        config.typewriter.phrase_sequence(),
        sink.clone(),
        config.typewriter.initial_delay(),
        config.typewriter.speeds(),
        clock.now(),
    );
    if let Some(events) = &events {
        typewriter = typewriter.with_events(Arc::clone(events));
    }
    let typing = spawn_typewriter(typewriter, clock, cancel.clone());

    let surface = RecordingSurface::new();
    let mut attachment = CursorEngine::attach(
        surface.clone(),
        CursorElements::page_defaults(),
        args.viewport_width,
        config.cursor.settings(),
        particle_rng(config.cursor.seed),
    );
    let skip_reason = attachment.skip_reason().map(ToString::to_string);
    if let Some(events) = &events {
        if let Some(reason) = &skip_reason {
            events.emit(Event::AttachSkipped {
                timestamp: Utc::now(),
                component: "cursor".to_string(),
                reason: reason.clone(),
            });
        }
        attachment = attachment.with_events(Arc::clone(events));
    }

    let (tx, rx) = mpsc::channel(64);
    let cursor = spawn_cursor(attachment, rx, clock, cancel.clone());

    let scroll = Arc::new(Mutex::new(config.scroll.tracker()));
    let feeder = {
        let scroll = Arc::clone(&scroll);
        let events = events.clone();
        tokio::spawn(async move {
            for input in script {
                tokio::time::sleep_until(clock.instant_at(input.at())).await;
                match CursorInput::try_from(input.action) {
                    Ok(cursor_input) => {
                        if tx.send(cursor_input).await.is_err() {
                            trace!(at_ms = input.at_ms, "input dropped: cursor engine not running");
                        }
                    }
                    Err(InputAction::Scroll { y, header_height }) => {
                        let update = scroll
                            .lock()
                            .expect("scroll lock poisoned")
                            .on_scroll(y, header_height);
                        if let (Some(section), Some(events)) = (update.active_changed, &events) {
                            events.emit(Event::SectionChanged {
                                timestamp: Utc::now(),
                                page_ms: input.at_ms,
                                section,
                                header_scrolled: update.header_scrolled,
                            });
                        }
                    }
                    Err(_) => {}
                }
            }
        })
    };

    tokio::select! {
        () = tokio::time::sleep(args.duration) => {}
        _ = tokio::signal::ctrl_c() => info!("simulation interrupted"),
    }
    cancel.cancel();
    feeder.abort();

    if let Err(err) = typing.await {
        warn!(error = %err, "typewriter task failed");
    }
    let cursor_attached = cursor.is_some();
    if let Some(handle) = cursor {
        if let Err(err) = handle.await {
            warn!(error = %err, "cursor task failed");
        }
    }

    let writes = sink.writes();
    RealtimeSummary {
        duration_ms: as_millis(clock.now()),
        writes: writes.len(),
        final_text: writes.last().cloned(),
        cursor_attached,
        skip_reason,
        effects_spawned: surface.created_count(),
        effects_expired: surface.removed_count(),
        live_effects: surface.live_count(),
        active_section: scroll
            .lock()
            .expect("scroll lock poisoned")
            .active()
            .map(ToString::to_string),
    }
}

fn print_report(report: &SimulationReport, format: OutputFormat) -> Result<(), VitrineError> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Human => {
            println!("typewriter ({} frames)", report.frames.len());
            for frame in &report.frames {
                println!("  {:>7}ms  {:?}", frame.at_ms, frame.text);
            }
            println!();
            match &report.skip_reason {
                None => println!(
                    "cursor: attached ({} listeners), {} inputs applied",
                    report.listener_count, report.inputs_applied
                ),
                Some(reason) => println!("cursor: not attached ({reason})"),
            }
            println!(
                "effects: {} spawned, {} expired, {} live",
                report.effects_spawned, report.effects_expired, report.live_effects
            );
            println!(
                "pointer: {}",
                if report.pointer_active { "active" } else { "idle" }
            );
            println!(
                "scroll: section {} ({} changes), header {}",
                report.active_section.as_deref().unwrap_or("-"),
                report.section_changes,
                if report.header_scrolled { "compact" } else { "full" }
            );
            println!("page time: {}ms", report.duration_ms);
        }
    }
    Ok(())
}

fn print_realtime(summary: &RealtimeSummary, format: OutputFormat) -> Result<(), VitrineError> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(summary)?),
        OutputFormat::Human => {
            println!(
                "typewriter: {} writes, showing {:?}",
                summary.writes,
                summary.final_text.as_deref().unwrap_or("")
            );
            match &summary.skip_reason {
                None => println!("cursor: attached"),
                Some(reason) => println!("cursor: not attached ({reason})"),
            }
            println!(
                "effects: {} spawned, {} expired, {} live",
                summary.effects_spawned, summary.effects_expired, summary.live_effects
            );
            println!(
                "scroll: section {}",
                summary.active_section.as_deref().unwrap_or("-")
            );
            println!("page time: {}ms", summary.duration_ms);
        }
    }
    Ok(())
}
