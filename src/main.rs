use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod error;
mod log;
mod model;
mod pipeline;
mod plot;
mod raw;
mod render;
mod schema;
mod source;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "scaling-report")]
#[command(about = "Scaling plots from distributed renderer logs", long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate run summaries from logs and write the scaling plots.
    Report {
        /// Directory holding the logs.
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// File name pattern of the logs.
        #[arg(long, default_value = "slurm-*.out")]
        pattern: String,

        /// Directory the plot artifacts are written to.
        #[arg(short = 'o', long, default_value = "plots")]
        out: PathBuf,

        /// Label table (JSON). Overrides --convention.
        #[arg(long)]
        labels: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = schema::Convention::Standard)]
        convention: schema::Convention,

        /// Tolerate unrelated lines between the labeled lines of one summary.
        #[arg(long)]
        interleaved: bool,

        /// Abort on the first malformed file instead of skipping it.
        #[arg(long)]
        strict: bool,

        /// Also write a self-contained HTML summary here.
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Convert raw RGB frame dumps into PNG images.
    Convert {
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        #[arg(long, default_value = "*.bmp")]
        pattern: String,

        /// Keep the raw dumps after conversion.
        #[arg(long)]
        keep: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Commands::Report {
            dir,
            pattern,
            out,
            labels,
            convention,
            interleaved,
            strict,
            html,
        } => {
            // 1) Label table.
            let table = match labels {
                Some(path) => schema::LabelTable::from_json_file(&path)?,
                None => schema::LabelTable::convention(convention),
            };
            let table = if interleaved {
                table.with_interleaving(true)
            } else {
                table
            };
            let extractor = log::Extractor::new(table)?;

            let policy = if strict {
                model::FailurePolicy::Abort
            } else {
                model::FailurePolicy::SkipFile
            };

            // 2) Aggregate + build plots.
            let analysis = pipeline::analyze(&dir, &pattern, &extractor, policy)?;

            // 3) Render.
            let mut sink = render::SvgSink::new(&out);
            let artifacts = pipeline::publish(&analysis, &mut sink, html.as_deref())?;
            println!(
                "Wrote {} plots for {} runs to {}",
                artifacts.len(),
                analysis.run_set.len(),
                sink.out_dir().display()
            );
        }
        Commands::Convert { dir, pattern, keep } => {
            let paths = source::discover(&dir, &pattern)?;
            tracing::info!(files = paths.len(), "matched raw dumps");
            for path in &paths {
                let png = raw::convert_file(path, keep)?;
                println!("Wrote {}", png.display());
            }
        }
    }

    Ok(())
}
