// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use clap::Parser;

use fingerik_core::{geometry::normalize_angle, Chain, Skeleton};

mod config;
mod program;
mod trace;

#[derive(Parser)]
#[command(author = "Copyright (C) 2024 Laixer Equipment B.V.")]
#[command(version, propagate_version = true)]
#[command(about = "Finger inverse kinematics simulator", long_about = None)]
struct Args {
    /// Configuration file.
    #[arg(short = 'c', long = "config", alias = "conf", value_name = "FILE")]
    config: Option<std::path::PathBuf>,
    /// Target program, a JSON array of [x, y, z] points.
    #[arg(short = 'p', long, value_name = "FILE")]
    program: Option<std::path::PathBuf>,
    /// Frame rate in hertz.
    #[arg(long, default_value_t = 90.0)]
    rate: f32,
    /// Number of frames each target is held.
    #[arg(long, default_value_t = 90)]
    frames: usize,
    /// Write the frame trace to a CSV file instead of stdout.
    #[arg(long, value_name = "FILE")]
    trace: Option<std::path::PathBuf>,
    /// Quiet output (no logging).
    #[arg(long)]
    quiet: bool,
    /// Plain log output without time and colors.
    #[arg(long)]
    plain: bool,
    /// Level of verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    use log::LevelFilter;

    let args = Args::parse();

    let mut log_config = simplelog::ConfigBuilder::new();
    if args.plain {
        log_config.set_time_level(LevelFilter::Off);
        log_config.set_thread_level(LevelFilter::Off);
    } else {
        log_config.set_time_offset_to_local().ok();
        log_config.set_time_format_rfc2822();
    }

    log_config.set_target_level(LevelFilter::Off);
    log_config.set_location_level(LevelFilter::Off);

    let log_level = if args.quiet {
        LevelFilter::Off
    } else {
        match args.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    let color_choice = if args.plain {
        simplelog::ColorChoice::Never
    } else {
        simplelog::ColorChoice::Auto
    };

    // Logging goes to stderr so the trace can be piped from stdout.
    simplelog::TermLogger::init(
        log_level,
        log_config.build(),
        simplelog::TerminalMode::Stderr,
        color_choice,
    )?;

    let config: config::SimConfig = match &args.config {
        Some(path) => fingerik_core::from_file(path)?,
        None => config::SimConfig::default(),
    };

    log::trace!("{:#?}", config);

    if !(args.rate > 0.0) {
        anyhow::bail!("frame rate must be positive, got {}", args.rate);
    }

    run(&args, &config)
}

fn run(args: &Args, config: &config::SimConfig) -> anyhow::Result<()> {
    let mut rig = config.rig.build();

    let mut chain = Chain::from_config(&config.chain)?;
    chain.initialize(&mut rig)?;

    log::info!("Fingerik simulator {}", fingerik_core::VERSION);
    log::debug!("Rig: {}", rig);

    let reach = chain
        .reach(&rig)
        .ok_or_else(|| anyhow::anyhow!("chain nodes not found in rig"))?;
    log::info!("Chain reach: {:.4}", reach);

    let mut program = match &args.program {
        Some(path) => program::Program::load(path)?,
        None => program::Program::sweep(reach),
    };

    if program.is_empty() {
        log::warn!("Program has no targets");
        return Ok(());
    }

    log::info!("Running {} targets at {} Hz", program.len(), args.rate);

    let mut tracer = match &args.trace {
        Some(path) => trace::CsvTracer::from_path(path)?,
        None => trace::CsvTracer::stdout(),
    };

    let dt = 1.0 / args.rate;

    let mut frame = 0;
    let mut frames_converged = 0;
    let mut last_error = 0.0;

    while let Some(target) = program.next() {
        log::debug!(
            "Target: [{:.4}, {:.4}, {:.4}]",
            target.x,
            target.y,
            target.z
        );

        for _ in 0..args.frames {
            let outcome = chain.update(&mut rig, target, dt);
            if outcome.is_converged() {
                frames_converged += 1;
            }

            let effector = rig
                .position(chain.effector())
                .ok_or_else(|| anyhow::anyhow!("end effector not found in rig"))?;
            last_error = fingerik_core::nalgebra::distance(&effector, &target);

            let [proximal, middle, distal] = chain.angles();

            tracer.write_record(&trace::FrameRecord {
                frame,
                time: frame as f32 * dt,
                target_x: target.x,
                target_y: target.y,
                target_z: target.z,
                effector_x: effector.x,
                effector_y: effector.y,
                effector_z: effector.z,
                error: last_error,
                solve: outcome.to_string(),
                proximal: normalize_angle(proximal),
                middle: normalize_angle(middle),
                distal: normalize_angle(distal),
            })?;

            frame += 1;
        }

        log::debug!("Chain: {}", chain);
    }

    tracer.flush()?;

    log::info!(
        "Ran {} frames, {} converged, final error {:.4}",
        frame,
        frames_converged,
        last_error
    );

    Ok(())
}
