use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use glam::{Quat, Vec3};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use xrview_common::Pose;
use xrview_input::FrameScript;
use xrview_locomotion::{Locomotion, Motion, NavConfig, PlayerRig};
use xrview_render::{DebugTextRenderer, RenderView, Renderer};
use xrview_scene::Scene;

#[derive(Parser)]
#[command(name = "xrview-cli", about = "CLI tool for xrview locomotion and scenes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions and the default locomotion settings
    Info,
    /// Print a locomotion config (the default unless --config is given)
    Config {
        #[arg(short, long, value_enum, default_value = "yaml")]
        format: Format,
        /// Validate and re-emit this file instead of the defaults
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Run a recorded input script through locomotion
    Simulate {
        /// Script file (YAML or JSON)
        script: PathBuf,
        /// Locomotion config (YAML or JSON)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Only print the final rig state
        #[arg(long)]
        summary: bool,
    },
    /// Print the demo scene as seen from the starting rig
    Scene,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

/// One simulated frame.
struct StepRow {
    index: usize,
    dt: f32,
    motion: Motion,
    rig: PlayerRig,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<NavConfig> {
    match path {
        Some(path) => NavConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(NavConfig::default()),
    }
}

fn simulate(script: &FrameScript, config: NavConfig) -> Vec<StepRow> {
    let mut loco = Locomotion::new(config);
    script
        .expanded()
        .enumerate()
        .map(|(index, (dt, frame))| {
            let motion = loco.step(frame, dt);
            StepRow {
                index,
                dt,
                motion,
                rig: loco.rig,
            }
        })
        .collect()
}

fn format_row(row: &StepRow) -> String {
    let t = row.motion.translation;
    let p = row.rig.position;
    format!(
        "{:>5} dt={:.3} {:<20} d=({:+.3}, {:+.3}, {:+.3}) turn={:+.3}  rig=({:.3}, {:.3}, {:.3}) yaw={:.3}",
        row.index,
        row.dt,
        mode_label(&row.motion),
        t.x,
        t.y,
        t.z,
        row.motion.yaw,
        p.x,
        p.y,
        p.z,
        row.rig.yaw
    )
}

fn mode_label(motion: &Motion) -> String {
    use xrview_locomotion::MotionMode::*;
    match motion.mode {
        AxisDrive(side) | PinchStep(side) | Gesture(side) => {
            format!("{}:{}", motion.mode.name(), side.as_str())
        }
        Idle | DualPinchReverse => motion.mode.name().to_string(),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            let config = NavConfig::default();
            println!("xrview-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("input: {}", xrview_input::crate_info());
            println!("locomotion: {}", xrview_locomotion::crate_info());
            println!("render: {}", xrview_render::crate_info());
            println!(
                "defaults: move_speed={} step_speed={} deadzone={} pinch_distance={} pinch_mode={:?}",
                config.move_speed,
                config.step_speed,
                config.deadzone,
                config.pinch_distance,
                config.pinch_mode
            );
        }
        Commands::Config { format, config } => {
            let config = load_config(config.as_deref())?;
            let text = match format {
                Format::Yaml => serde_yaml::to_string(&config)?,
                Format::Json => serde_json::to_string_pretty(&config)?,
            };
            println!("{}", text.trim_end());
        }
        Commands::Simulate {
            script,
            config,
            summary,
        } => {
            let config = load_config(config.as_deref())?;
            let frames = FrameScript::load(&script)
                .with_context(|| format!("loading script {}", script.display()))?;
            tracing::info!(
                script = %script.display(),
                frames = frames.total_frames(),
                "simulating"
            );

            let rows = simulate(&frames, config);
            if !summary {
                for row in &rows {
                    println!("{}", format_row(row));
                }
            }
            let rig = rows.last().map(|r| r.rig).unwrap_or_default();
            let moving = rows.iter().filter(|r| !r.motion.is_still()).count();
            println!(
                "final: frames={} moving={} rig=({:.3}, {:.3}, {:.3}) yaw={:.3}",
                rows.len(),
                moving,
                rig.position.x,
                rig.position.y,
                rig.position.z,
                rig.yaw
            );
        }
        Commands::Scene => {
            let scene = Scene::demo();
            let head = Pose::new(Vec3::new(0.0, 1.6, 0.0), Quat::IDENTITY);
            let view = RenderView::from_pose(&PlayerRig::default().head_world(&head), 60.0);
            print!("{}", DebugTextRenderer::new().render(&scene, &view));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALK: &str = r#"
frames:
  - dt: 0.05
    repeat: 4
    head: { position: [0.0, 1.6, 0.0], orientation: [0.0, 0.0, 0.0, 1.0] }
    sources:
      - handedness: left
        gamepad: { axes: [0.0, -1.0] }
  - dt: 0.05
    head: { position: [0.0, 1.6, 0.0], orientation: [0.0, 0.0, 0.0, 1.0] }
"#;

    fn walk_script() -> FrameScript {
        serde_yaml::from_str(WALK).unwrap()
    }

    #[test]
    fn simulate_walks_forward_then_stops() {
        let rows = simulate(&walk_script(), NavConfig::default());
        assert_eq!(rows.len(), 5);
        // 2 m/s for 4 frames of 50 ms.
        assert!((rows[3].rig.position.z + 0.4).abs() < 1e-5);
        assert!(rows[4].motion.is_still());
        assert_eq!(rows[4].rig, rows[3].rig);
    }

    #[test]
    fn rows_name_the_driving_hand() {
        let rows = simulate(&walk_script(), NavConfig::default());
        let line = format_row(&rows[0]);
        assert!(line.contains(":left"), "{line}");
        assert!(format_row(&rows[4]).contains("idle"));
    }

    #[test]
    fn cli_parses_simulate() {
        let cli = Cli::parse_from(["xrview-cli", "simulate", "walk.yaml", "--summary"]);
        match cli.command {
            Commands::Simulate { script, summary, config } => {
                assert_eq!(script, PathBuf::from("walk.yaml"));
                assert!(summary);
                assert!(config.is_none());
            }
            _ => panic!("expected simulate"),
        }
    }
}
