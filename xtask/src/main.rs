use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for the sketchbook")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, doc
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
    /// Open a sketch in the desktop app
    Run {
        /// pong, sierpinski, solar or polyhedra
        #[arg(default_value = "pong")]
        sketch: String,
        /// Build with optimisations
        #[arg(long)]
        release: bool,
    },
    /// Run every sketch headless through the CLI checks
    Smoke,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            run_fmt()?;
            run_clippy()?;
            run_tests()?;
            run_doc()?;
        }
        Commands::Fmt => run_fmt()?,
        Commands::Clippy => run_clippy()?,
        Commands::Test => run_tests()?,
        Commands::Doc => run_doc()?,
        Commands::Build => cargo("build", &["build", "--workspace"])?,
        Commands::Run { sketch, release } => {
            let mut args = vec!["run", "-p", "sketchbook-desktop"];
            if release {
                args.push("--release");
            }
            args.extend(["--", sketch.as_str()]);
            cargo("run", &args)?;
        }
        Commands::Smoke => {
            for sketch in [
                &["pong", "--random-input"][..],
                &["sierpinski"],
                &["polyhedra"],
                &["solar"],
            ] {
                let mut args = vec!["run", "-q", "-p", "sketchbook-cli", "--"];
                args.extend_from_slice(sketch);
                cargo(&format!("smoke {}", sketch[0]), &args)?;
            }
        }
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

fn run_fmt() -> Result<()> {
    cargo("fmt --check", &["fmt", "--all", "--", "--check"])
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

fn run_tests() -> Result<()> {
    cargo("test", &["test", "--workspace"])
}

fn run_doc() -> Result<()> {
    cargo("doc", &["doc", "--workspace", "--no-deps"])
}
