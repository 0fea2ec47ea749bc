use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader, BufWriter};

use dp_config::PipelineConfig;
use dp_runtime::Pipeline;
use dp_runtime::tracing_init::init_tracing;

#[derive(Parser)]
#[command(name = "dateparts", about = "Date-parts enrichment for JSON-lines events")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enrich a JSON-lines stream
    Run {
        /// Path to dateparts.toml config file
        #[arg(short, long)]
        config: PathBuf,
        /// Input file (defaults to stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a config file and exit
    Check {
        /// Path to dateparts.toml config file
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            input,
            output,
        } => {
            let (config_path, pipeline_config) = load_config(&config)?;
            let base_dir = config_path
                .parent()
                .ok_or_else(|| anyhow::anyhow!("config path has no parent directory"))?;
            let _guard = init_tracing(&pipeline_config.logging, base_dir)?;

            let pipeline = Pipeline::new(&pipeline_config).map_err(|e| anyhow::anyhow!("{e}"))?;
            tracing::info!(domain = "sys", config = %config_path.display(), "dateparts started");

            let reader: Box<dyn AsyncBufRead + Unpin + Send> = match input {
                Some(path) => Box::new(BufReader::new(tokio::fs::File::open(&path).await.map_err(
                    |e| anyhow::anyhow!("input '{}': {e}", path.display()),
                )?)),
                None => Box::new(BufReader::new(tokio::io::stdin())),
            };
            let writer: Box<dyn AsyncWrite + Unpin + Send> = match output {
                Some(path) => Box::new(BufWriter::new(tokio::fs::File::create(&path).await.map_err(
                    |e| anyhow::anyhow!("output '{}': {e}", path.display()),
                )?)),
                None => Box::new(BufWriter::new(tokio::io::stdout())),
            };

            let report = pipeline
                .run(reader, writer)
                .await
                .map_err(|e| anyhow::anyhow!("{e}"))?;
            tracing::info!(domain = "sys", %report, "dateparts finished");
        }
        Commands::Check { config } => {
            let (config_path, pipeline_config) = load_config(&config)?;
            Pipeline::new(&pipeline_config).map_err(|e| anyhow::anyhow!("{e}"))?;
            println!("{}: ok", config_path.display());
        }
    }

    Ok(())
}

fn load_config(config: &Path) -> Result<(PathBuf, PipelineConfig)> {
    let config_path = config
        .canonicalize()
        .map_err(|e| anyhow::anyhow!("config path '{}': {e}", config.display()))?;
    let pipeline_config = PipelineConfig::load(&config_path)?;
    Ok((config_path, pipeline_config))
}
