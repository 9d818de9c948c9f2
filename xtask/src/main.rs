use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for xrview")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, doc, scenarios
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Replay every script under demos/ through the CLI simulator
    Scenarios,
    /// Run the locomotion step benchmark
    Bench,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            cargo("fmt --check", &["fmt", "--all", "--", "--check"])?;
            run_clippy()?;
            cargo("test", &["test", "--workspace"])?;
            cargo("doc", &["doc", "--workspace", "--no-deps"])?;
            run_scenarios()?;
        }
        Commands::Fmt => cargo("fmt --check", &["fmt", "--all", "--", "--check"])?,
        Commands::Clippy => run_clippy()?,
        Commands::Test => cargo("test", &["test", "--workspace"])?,
        Commands::Doc => cargo("doc", &["doc", "--workspace", "--no-deps"])?,
        Commands::Build => cargo("build", &["build", "--workspace"])?,
        Commands::Scenarios => run_scenarios()?,
        Commands::Bench => cargo("bench", &["bench", "-p", "xrview-locomotion"])?,
    }

    Ok(())
}

fn cargo(step: &str, args: &[&str]) -> Result<()> {
    println!("==> Running cargo {step}");
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {step} failed");
    }
    Ok(())
}

fn run_clippy() -> Result<()> {
    cargo(
        "clippy",
        &[
            "clippy",
            "--workspace",
            "--all-targets",
            "--",
            "-D",
            "warnings",
        ],
    )
}

fn run_scenarios() -> Result<()> {
    let demos = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../demos");
    let mut scripts: Vec<PathBuf> = std::fs::read_dir(&demos)
        .with_context(|| format!("reading {}", demos.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            matches!(
                p.extension().and_then(|e| e.to_str()),
                Some("yaml" | "yml" | "json")
            )
        })
        .filter(|p| !p.file_stem().is_some_and(|s| s.to_string_lossy().ends_with(".config")))
        .collect();
    scripts.sort();

    for script in &scripts {
        let path = script.to_string_lossy();
        let config = script.with_extension("config.yaml");
        let config_path = config.to_string_lossy();
        let mut args = vec!["run", "-q", "-p", "xrview-cli", "--", "simulate", &*path, "--summary"];
        if config.exists() {
            args.extend(["--config", &*config_path]);
        }
        cargo(&format!("simulate {}", script.display()), &args)?;
    }
    println!("==> {} scenario(s) passed", scripts.len());
    Ok(())
}
