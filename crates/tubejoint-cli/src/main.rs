//! tubejoint CLI - joint detection for tube scenes
//!
//! Reads JSON scene files, reports potential joints and replays scripted
//! editor sessions.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tubejoint_detect::{JointDetector, JointPreview};
use tubejoint_editor::{notification, CountNotifier, EditCommand, Editor};
use tubejoint_ir::Scene;

mod config;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "tubejoint")]
#[command(about = "Detect potential joints between tubes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List potential joints in a scene
    Detect {
        /// Scene JSON file
        scene: PathBuf,
        /// Proximity threshold (overrides the config file)
        #[arg(short, long)]
        threshold: Option<f64>,
        /// TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print previews as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarize a scene
    Info {
        /// Scene JSON file
        scene: PathBuf,
    },
    /// Apply a JSON list of edit commands and report previews after each
    Replay {
        /// Command script (JSON array)
        commands: PathBuf,
        /// Starting scene (default: empty)
        #[arg(short, long)]
        scene: Option<PathBuf>,
        /// Write the final scene here
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tubejoint=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Detect {
            scene,
            threshold,
            config,
            json,
        } => {
            let config = CliConfig::load(config.as_deref())?.with_threshold(threshold);
            run_detect(&scene, &config, json)?;
        }
        Commands::Info { scene } => {
            show_info(&scene)?;
        }
        Commands::Replay {
            commands,
            scene,
            output,
            config,
        } => {
            let config = CliConfig::load(config.as_deref())?;
            run_replay(&commands, scene.as_deref(), output.as_deref(), &config)?;
        }
    }

    Ok(())
}

fn read_scene(path: &Path) -> Result<Scene> {
    let json =
        fs::read_to_string(path).with_context(|| format!("reading scene {}", path.display()))?;
    Scene::from_json(&json).with_context(|| format!("parsing scene {}", path.display()))
}

fn run_detect(path: &Path, config: &CliConfig, json: bool) -> Result<()> {
    let scene = read_scene(path)?;
    detect_report(&scene, config, json, &mut io::stdout().lock())
        .with_context(|| format!("detecting joints in {}", path.display()))
}

/// Write the previews for `scene` as text lines or a JSON array.
fn detect_report(
    scene: &Scene,
    config: &CliConfig,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let detector = JointDetector::new(config.detector.clone())?;
    let previews = detector.detect(&scene.tubes)?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&previews)?)?;
        return Ok(());
    }

    match notification(previews.len()) {
        Some(msg) => writeln!(out, "{msg}")?,
        None => writeln!(out, "No potential joints")?,
    }
    for p in &previews {
        write_preview(out, p)?;
    }
    Ok(())
}

fn write_preview(out: &mut impl Write, p: &JointPreview) -> io::Result<()> {
    let at = p.intersection_point;
    writeln!(
        out,
        "  {} <-> {}: {:>3} deg, distance {:.2}, at ({:.3}, {:.3}, {:.3})",
        p.tube1_id, p.tube2_id, p.angle_deg, p.distance, at.x, at.y, at.z
    )
}

fn show_info(path: &Path) -> Result<()> {
    let scene = read_scene(path)?;
    writeln!(io::stdout(), "tube scene: {}", path.display())?;
    info_report(&scene, &mut io::stdout().lock())
}

fn info_report(scene: &Scene, out: &mut impl Write) -> Result<()> {
    writeln!(out, "  Version: {}", scene.version)?;
    writeln!(out, "  Tubes: {}", scene.tubes.len())?;
    writeln!(out, "  Connections: {}", scene.connections.len())?;

    if !scene.tubes.is_empty() {
        writeln!(out, "\nTubes:")?;
        for tube in &scene.tubes {
            let pos = tube.position;
            writeln!(
                out,
                "  {}: {} {}x{} wall {} length {} at ({}, {}, {})",
                tube.id,
                tube.cross_section,
                tube.width,
                tube.height,
                tube.wall_thickness,
                tube.length,
                pos.x,
                pos.y,
                pos.z
            )?;
            if !tube.is_hollow() {
                writeln!(out, "    warning: wall thickness leaves no hollow interior")?;
            }
            if let Some(parent) = &tube.parent_id {
                writeln!(
                    out,
                    "    jointed to {} at {} deg",
                    parent,
                    tube.joint_angle_deg.unwrap_or_default()
                )?;
            }
        }
    }

    if !scene.connections.is_empty() {
        writeln!(out, "\nConnections:")?;
        for c in &scene.connections {
            writeln!(out, "  {} -> {} ({} deg)", c.parent_id, c.child_id, c.angle_deg)?;
        }
    }

    Ok(())
}

fn run_replay(
    commands: &Path,
    scene: Option<&Path>,
    output: Option<&Path>,
    config: &CliConfig,
) -> Result<()> {
    let script = fs::read_to_string(commands)
        .with_context(|| format!("reading commands {}", commands.display()))?;
    let script = EditCommand::parse_script(&script)
        .with_context(|| format!("parsing commands {}", commands.display()))?;

    let start = match scene {
        Some(path) => read_scene(path)?,
        None => Scene::new(),
    };
    let mut editor = Editor::from_scene(start, config.editor_config())?;
    editor.add_listener(Box::new(CountNotifier::new()));
    replay(&mut editor, script, &mut io::stdout().lock())?;

    if let Some(out) = output {
        fs::write(out, editor.scene().to_json()?)
            .with_context(|| format!("writing scene {}", out.display()))?;
        println!("Wrote scene to {}", out.display());
    }
    Ok(())
}

/// Apply `script` step by step, writing the preview count after each one.
/// Stops at the first rejected command.
fn replay(editor: &mut Editor, script: Vec<EditCommand>, out: &mut impl Write) -> Result<()> {
    for (step, command) in script.into_iter().enumerate() {
        let label = format!("{command:?}");
        editor
            .apply(command)
            .with_context(|| format!("step {}: {label}", step + 1))?;
        writeln!(out, "{:>3}: {} previews", step + 1, editor.previews().len())?;
    }
    info!(
        tubes = editor.tubes().len(),
        connections = editor.connections().len(),
        "replay finished"
    );
    Ok(())
}
