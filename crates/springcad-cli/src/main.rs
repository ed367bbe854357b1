//! springcad CLI - evaluate spring definition files
//!
//! Reads a TOML spring file, runs the geometry pipeline and prints the
//! partition, design calculations and a summary of the solid.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use springcad::{
    EndType, FeatureReport, Partition, SpringDocument, SpringFeature, TraceConfig, TraceLevel,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "springcad")]
#[command(about = "Parametric helical spring generator", long_about = None)]
struct Cli {
    /// Enable pipeline tracing
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a spring and print its report
    Eval {
        /// Spring definition file (.toml)
        file: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the pitch and coil partition of a spring
    Partition {
        /// Spring definition file (.toml)
        file: PathBuf,
    },
    /// Print a starter spring definition
    Template {
        /// End type of the template
        #[arg(short, long, default_value = "closed_ground")]
        end_type: EndType,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Eval { file, json } => {
            let doc = load_document(&file, cli.verbose)?;
            let report = evaluate(doc)?;
            if json {
                println!("{}", report.to_json()?);
            } else {
                print!("{}", format_report(&report));
            }
        }
        Commands::Partition { file } => {
            let doc = load_document(&file, cli.verbose)?;
            let partition = Partition::compute(&doc.spring, &doc.pipeline)
                .with_context(|| format!("cannot partition {}", file.display()))?;
            println!("{partition}");
        }
        Commands::Template { end_type } => {
            print!("{}", SpringDocument::template(end_type).to_toml_string()?);
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let default = if verbose {
        "springcad=debug"
    } else {
        "springcad=info"
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_document(path: &Path, verbose: bool) -> Result<SpringDocument> {
    let text =
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    let mut doc = SpringDocument::from_toml_str(&text)
        .with_context(|| format!("invalid spring file {}", path.display()))?;
    if verbose {
        doc.pipeline.trace = TraceConfig::on(TraceLevel::Debug);
    }
    Ok(doc)
}

fn evaluate(doc: SpringDocument) -> Result<FeatureReport> {
    let SpringDocument {
        spring,
        pipeline,
        material,
    } = doc;
    let mut feature = SpringFeature::with_config(spring, pipeline);
    feature
        .ensure_current()
        .context("spring recompute failed")?;
    let report = feature.report(&material);
    if report.solid.is_none() {
        bail!("spring produced no solid");
    }
    info!(
        length = report.length,
        height = report.height,
        "spring evaluated"
    );
    Ok(report)
}

fn format_report(report: &FeatureReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "end type           {}", report.params.effective_end_type());
    if let Some(h) = report.height {
        let _ = writeln!(out, "height             {h:>12.4} mm");
    }
    if let Some(l) = report.length {
        let _ = writeln!(out, "path length        {l:>12.4} mm");
    }
    if let Some(partition) = &report.partition {
        let _ = writeln!(out, "\n{partition}");
    }
    let _ = writeln!(out, "\n{}", report.design);
    if let Some(solid) = &report.solid {
        let _ = writeln!(
            out,
            "solid: {} piece(s), {} triangles, volume {:.4} mm³",
            solid.solids, solid.triangles, solid.volume
        );
        let _ = writeln!(
            out,
            "bounds: [{:.3}, {:.3}, {:.3}] - [{:.3}, {:.3}, {:.3}]",
            solid.min[0], solid.min[1], solid.min[2], solid.max[0], solid.max[1], solid.max[2]
        );
    }
    out
}
