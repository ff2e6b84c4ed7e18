// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! MetalWeight CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use metalweight::classify::classify;
use metalweight::geometry::analyze;
use metalweight::host::{Answers, Scene, TerminalHost};
use metalweight::{CommandOutcome, UnitSystem, WeightCommand, WeightConfig};
use serde::Serialize;
use std::io::IsTerminal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "metalweight")]
#[command(about = "Estimate the weight of solids and meshes from their volume and a material density", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to ./metalweight.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Weigh the objects in STL and JSON scene files
    Weigh {
        /// Input files (.stl, .json)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Density in grams per cubic model unit (skips the prompt)
        #[arg(short, long)]
        density: Option<f64>,

        /// Continue when problem geometry is found
        #[arg(short, long, conflicts_with = "no")]
        yes: bool,

        /// Abort when problem geometry is found
        #[arg(long)]
        no: bool,

        /// Pre-select objects by name
        #[arg(short, long)]
        select: Vec<String>,

        /// Model units (mm, cm, m, in, ft)
        #[arg(short, long)]
        units: Option<UnitSystem>,

        /// Worker threads for the classification pass
        #[arg(short, long)]
        threads: Option<usize>,

        /// Write the result as JSON
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,

        /// Never prompt; use defaults
        #[arg(long)]
        batch: bool,
    },

    /// Classify every object and print its geometry statistics
    Inspect {
        /// Input files (.stl, .json)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let mut config = match &cli.config {
        Some(path) => WeightConfig::from_file(path)?,
        None => WeightConfig::load()?,
    };
    config.verbose |= cli.verbose;

    match cli.command {
        Commands::Weigh {
            files,
            density,
            yes,
            no,
            select,
            units,
            threads,
            json,
            batch,
        } => {
            if threads.is_some() {
                config.parallelism = threads;
            }
            let answers = Answers {
                density,
                confirm: if yes {
                    Some(true)
                } else if no {
                    Some(false)
                } else {
                    None
                },
            };
            weigh_command(config, &files, answers, &select, units, json, batch)?;
        }
        Commands::Inspect { files, json } => {
            inspect_command(&config, &files, json)?;
        }
        Commands::Version => {
            println!("MetalWeight v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn weigh_command(
    config: WeightConfig,
    files: &[PathBuf],
    answers: Answers,
    select: &[String],
    units: Option<UnitSystem>,
    json: Option<PathBuf>,
    batch: bool,
) -> Result<()> {
    let mut scene = Scene::load_files(files, config.weld_tolerance)?;
    if let Some(units) = units {
        scene.set_units(units);
    }
    if !select.is_empty() {
        scene.select_names(select)?;
    }

    if config.verbose {
        println!("{} {} objects", "Loaded".bold(), scene.objects().len());
    }

    let interactive = !batch && std::io::stdin().is_terminal();
    let mut host = TerminalHost::new(&scene, answers, interactive, std::io::stdin().lock());
    let command = WeightCommand::new(config)?;

    let outcome = command.run(&scene, &mut host)?;
    match &outcome {
        CommandOutcome::Success(report) => {
            report.print();
            if let Some(path) = json {
                report.write_json(&path)?;
                println!("{} Wrote report: {}", "Success:".green(), path.display());
            }
        }
        CommandOutcome::Cancelled(reason) => {
            log::info!("Command cancelled: {:?}", reason);
            std::process::exit(1);
        }
        CommandOutcome::NothingToDo => {
            std::process::exit(2);
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct InspectRow {
    id: metalweight::ObjectId,
    name: String,
    kind: metalweight::GeometryKind,
    classification: metalweight::Classification,
    stats: metalweight::geometry::GeometryStats,
}

fn inspect_command(config: &WeightConfig, files: &[PathBuf], json: bool) -> Result<()> {
    let scene = Scene::load_files(files, config.weld_tolerance)?;

    let rows: Vec<InspectRow> = scene
        .objects()
        .iter()
        .map(|object| InspectRow {
            id: object.id,
            name: object.name.clone(),
            kind: object.kind,
            classification: classify(object),
            stats: analyze(&object.mesh, config.weld_tolerance),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("\n{}", "═".repeat(80).white());
    println!("{}", "Object Inspection".bold());
    println!("{}", "═".repeat(80).white());

    for row in &rows {
        let label = row.classification.label();
        let status = if row.classification.is_valid() {
            format!("✓ {}", label).green()
        } else {
            format!("✗ {}", label).red()
        };
        let volume = row
            .classification
            .volume()
            .map(|v| format!("{:.3}", v))
            .unwrap_or_else(|| "-".to_string());

        println!(
            "  {:<6} {:<24} {:<6} {:<24} {:>8} tris  volume {}",
            row.id.to_string().bright_black(),
            row.name.cyan(),
            row.kind.as_str(),
            status,
            row.stats.triangle_count,
            volume
        );
    }

    let valid = rows.iter().filter(|r| r.classification.is_valid()).count();
    println!("{}", "─".repeat(80).white());
    println!(
        "  {} {} valid, {} with problems",
        "Total:".white(),
        valid.to_string().green(),
        if valid < rows.len() {
            (rows.len() - valid).to_string().red()
        } else {
            "0".green()
        }
    );

    Ok(())
}
