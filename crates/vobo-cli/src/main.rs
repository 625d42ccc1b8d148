use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vobo_engine::{pick_relevant, render_finding, render_text, Config, Engine, CONFIG_FILE};

#[derive(Parser)]
#[command(name = "vobo", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default vobo.toml
    Init {
        #[arg(long, default_value = CONFIG_FILE)]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate a transformation matrix workbook (exit 0 approved, 2 rejected)
    Validate {
        path: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,
        /// Skip the advisory oracle even when the config enables it
        #[arg(long)]
        no_oracle: bool,
    },

    /// Show the findings a free-text question refers to ("Hoja 2", an attribute name)
    Pick {
        path: PathBuf,
        #[arg(long)]
        query: String,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
}

fn build_engine(config: Option<&PathBuf>, no_oracle: bool) -> anyhow::Result<Engine> {
    let cfg = Config::resolve(config.map(PathBuf::as_path))?;
    let source = config.map_or_else(|| CONFIG_FILE.to_string(), |p| p.display().to_string());
    tracing::info!(config = %source, oracle = cfg.oracle.enabled && !no_oracle, "configuration resolved");
    if no_oracle {
        Ok(Engine::new(cfg))
    } else {
        Engine::from_config(cfg)
    }
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Init { path, force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            Config::default().save_to(&path)?;
            println!("Wrote {}", path.display());
        }
        Command::Validate {
            path,
            config,
            json,
            no_oracle,
        } => {
            let engine = build_engine(config.as_ref(), no_oracle)?;
            let verdict = engine.validate_path(&path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&verdict).context("serialize verdict")?);
            } else {
                print!("{}", render_text(&verdict));
            }
            tracing::info!(vobo = verdict.vobo, findings = verdict.details.len(), "verdict ready");
            if !verdict.vobo {
                return Ok(ExitCode::from(2));
            }
        }
        Command::Pick {
            path,
            query,
            config,
            json,
        } => {
            let engine = build_engine(config.as_ref(), true)?;
            let verdict = engine.validate_path(&path)?;
            let sheets = vobo_engine::sheet_names(&path)?;
            let picked = pick_relevant(&verdict.details, &sheets, &query);
            if json {
                println!("{}", serde_json::to_string_pretty(&picked).context("serialize findings")?);
            } else if picked.is_empty() {
                println!("Sin hallazgos");
            } else {
                for f in picked {
                    println!("[{}] {}", f.sheet, render_finding(f));
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
