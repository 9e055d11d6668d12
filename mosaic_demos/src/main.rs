// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sprite and group demos.
//!
//! Every demo runs the same clear → update → draw → present loop through
//! [`FrameDriver`]. Without `--window` the loop runs headless for a fixed
//! number of frames, driven by an optional key script, and prints damage
//! statistics at the end:
//!
//! ```text
//! mosaic-demos attack --frames 80 --script "0+right 40-right 50*space" --trace
//! mosaic-demos layers --script "10*2 20*3" --record layers.jsonl --snapshot layers.png
//! ```

mod assets;
mod demos;
mod host;
mod intent;

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mosaic_core::assets::ImageProvider;
use mosaic_core::backend::{Clock, Presenter};
use mosaic_core::driver::{FrameContext, FrameDriver};
use mosaic_core::image::Image;
use mosaic_core::surface::Background;
use mosaic_core::timing::{FrameConfig, FramePacer};
use mosaic_core::trace::Tracer;
use mosaic_debug::pretty::PrettyPrintSink;
use mosaic_debug::recorder::RecorderSink;

use crate::assets::{DirectoryAssets, ProceduralAssets, save_png};
use crate::demos::{DemoKind, Stage};
use crate::host::{DemoSink, HeadlessHost, StdClock};
use crate::intent::{InputSource, Script};

/// Frames run headless when `--frames` is not given.
const DEFAULT_HEADLESS_FRAMES: u64 = 120;

#[derive(Debug, Parser)]
#[command(name = "mosaic-demos", about = "Sprite and group demos", version)]
struct Cli {
    /// Which demo to run.
    #[arg(value_enum)]
    demo: DemoKind,

    /// Stop after this many frames. Headless runs default to 120.
    #[arg(long)]
    frames: Option<u64>,

    /// Load ball.png, button.png, and teddy.png from this directory instead
    /// of drawing them.
    #[arg(long, value_name = "DIR")]
    assets: Option<PathBuf>,

    /// Key script for headless runs, e.g. "0+right 30-right 40*space".
    #[arg(long)]
    script: Option<Script>,

    /// Surface width and height in pixels.
    #[arg(long, default_value_t = 700)]
    size: u32,

    /// Target frame rate.
    #[arg(long, default_value_t = 40)]
    fps: u32,

    /// Repaint the whole background every frame instead of only dirty
    /// rectangles.
    #[arg(long)]
    full_redraw: bool,

    /// Print frame events to stderr.
    #[arg(long)]
    trace: bool,

    /// Write frame events to this file as JSON lines.
    #[arg(long, value_name = "PATH")]
    record: Option<PathBuf>,

    /// Save the final frame as a PNG.
    #[arg(long, value_name = "PATH")]
    snapshot: Option<PathBuf>,

    /// Show the demo in a window (needs the `window` feature).
    #[arg(long)]
    window: bool,
}

/// What a run of the frame loop produced.
struct RunOutcome {
    frames: u64,
    late_frames: u64,
    backbuffer: Image,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut stage = {
        let mut procedural = ProceduralAssets;
        let mut directory;
        let provider: &mut dyn ImageProvider = match &cli.assets {
            Some(root) => {
                directory = DirectoryAssets::new(root);
                &mut directory
            }
            None => &mut procedural,
        };
        demos::build(cli.demo, provider, cli.size)
            .with_context(|| format!("cannot build the {:?} demo", cli.demo))?
    };

    let mut sink = DemoSink {
        pretty: cli.trace.then(PrettyPrintSink::stderr),
        recorder: cli.record.is_some().then(RecorderSink::new),
    };

    let outcome = if cli.window {
        run_windowed(&cli, &mut stage, &mut sink)?
    } else {
        let mut host = HeadlessHost {
            script: cli.script.clone().unwrap_or_default(),
            ..HeadlessHost::default()
        };
        let budget = cli.frames.unwrap_or(DEFAULT_HEADLESS_FRAMES);
        let outcome = run_frames(&cli, &mut stage, &mut host, &mut sink, Some(budget), false)?;
        let stats = &host.presenter;
        println!(
            "{:?}: {} frames ({} late), {} full-damage, {} damage rects",
            cli.demo, outcome.frames, outcome.late_frames, stats.full_frames, stats.damage_rects,
        );
        outcome
    };

    if let (Some(path), Some(recorder)) = (&cli.record, sink.recorder.take()) {
        let file =
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
        recorder
            .write_json_lines(BufWriter::new(file))
            .with_context(|| format!("cannot write {}", path.display()))?;
    }
    if let Some(path) = &cli.snapshot {
        save_png(&outcome.backbuffer, path)
            .with_context(|| format!("cannot save snapshot {}", path.display()))?;
    }
    Ok(())
}

#[cfg(feature = "window")]
fn run_windowed(cli: &Cli, stage: &mut Stage, sink: &mut DemoSink) -> Result<RunOutcome> {
    let title = format!("mosaic: {:?}", cli.demo);
    let mut host = host::WindowHost::open(&title, cli.size, cli.size)?;
    run_frames(cli, stage, &mut host, sink, cli.frames, true)
}

#[cfg(not(feature = "window"))]
fn run_windowed(_cli: &Cli, _stage: &mut Stage, _sink: &mut DemoSink) -> Result<RunOutcome> {
    anyhow::bail!("this build has no window support; rebuild with `--features window`")
}

/// Runs frames until the budget is spent or the host asks to quit.
///
/// With `pace` set, sleeps out the remainder of each frame interval.
fn run_frames<H: InputSource + Presenter>(
    cli: &Cli,
    stage: &mut Stage,
    host: &mut H,
    sink: &mut DemoSink,
    budget: Option<u64>,
    pace: bool,
) -> Result<RunOutcome> {
    let clock = StdClock::new();
    let config = FrameConfig::new(cli.fps);
    let mut pacer = FramePacer::new(&config);
    let mut driver = FrameDriver::new(config).with_background_repaint(cli.full_redraw);
    let mut backbuffer = stage.background.clone();

    while budget.is_none_or(|b| driver.frames_run() < b) {
        let tick = pacer.tick(clock.now());
        let input = host.poll(tick.frame_index);
        if input.quit_requested() {
            break;
        }
        for intent in stage.demo.intents(&input) {
            stage.demo.apply(&mut stage.scene, intent)?;
        }

        let mut tracer = if sink.is_active() {
            Tracer::new(&mut *sink)
        } else {
            Tracer::none()
        };
        driver.frame(
            &mut stage.scene,
            stage.group,
            &mut backbuffer,
            Background::Image(&stage.background),
            FrameContext {
                tick: &tick,
                clock: &clock,
                presenter: &mut *host,
                tracer: &mut tracer,
            },
        )?;

        if pace {
            let wait = pacer.wait_time(clock.now());
            std::thread::sleep(std::time::Duration::from_nanos(wait.nanos()));
        }
    }

    Ok(RunOutcome {
        frames: driver.frames_run(),
        late_frames: pacer.late_frames(),
        backbuffer,
    })
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_parses_a_scripted_run() {
        let cli = Cli::try_parse_from([
            "mosaic-demos",
            "regions",
            "--frames",
            "10",
            "--script",
            "2*right 4*down",
            "--full-redraw",
        ])
        .unwrap();
        assert_eq!(cli.demo, DemoKind::Regions);
        assert_eq!(cli.frames, Some(10));
        assert!(cli.full_redraw);
        assert!(cli.script.is_some());
    }

    #[test]
    fn bad_scripts_fail_to_parse() {
        let parsed = Cli::try_parse_from(["mosaic-demos", "stay", "--script", "2+nope"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn headless_run_respects_the_budget() {
        let cli = Cli::try_parse_from(["mosaic-demos", "attack", "--size", "140"]).unwrap();
        let mut stage = demos::build(cli.demo, &mut ProceduralAssets, cli.size).unwrap();
        let mut host = HeadlessHost {
            script: "0+right 2-right".parse().unwrap(),
            ..HeadlessHost::default()
        };
        let mut sink = DemoSink::default();
        let outcome = run_frames(&cli, &mut stage, &mut host, &mut sink, Some(5), false).unwrap();
        assert_eq!(outcome.frames, 5);
        assert_eq!(host.presenter.frames, 5);
        assert_eq!(host.presenter.full_frames, 1, "only the first frame is full");
    }

    #[test]
    fn quit_key_ends_the_run() {
        let cli = Cli::try_parse_from(["mosaic-demos", "stay", "--size", "140"]).unwrap();
        let mut stage = demos::build(cli.demo, &mut ProceduralAssets, cli.size).unwrap();
        let mut host = HeadlessHost {
            script: "3*q".parse().unwrap(),
            ..HeadlessHost::default()
        };
        let mut sink = DemoSink {
            recorder: Some(RecorderSink::new()),
            ..DemoSink::default()
        };
        let outcome = run_frames(&cli, &mut stage, &mut host, &mut sink, None, false).unwrap();
        assert_eq!(outcome.frames, 3);
        let recorder = sink.recorder.unwrap();
        assert_eq!(recorder.events().last().map(|e| e.frame_index()), Some(2));
    }
}
