use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

use yc_pipeline::app::clean_use_case::CleanUseCase;
use yc_pipeline::app::ports::RecordSourcePort;
use yc_pipeline::app::quality_gate_use_case::{render_report, QualityGateUseCase};
use yc_pipeline::constants;
use yc_pipeline::infra::json_file_adapter::{JsonFileOutput, JsonFileSource};
use yc_pipeline::logging;
use yc_pipeline::pipeline::processing::clean::TracingObserver;
use yc_pipeline::pipeline::processing::profile::profile_raw;
use yc_pipeline::PipelineConfig;

#[derive(Parser)]
#[command(name = "yc-pipeline")]
#[command(about = "Clean, normalize and validate accelerator company datasets")]
#[command(version = "0.1.0")]
struct Cli {
    /// Pipeline config file (TOML). Falls back to $YC_PIPELINE_CONFIG, then defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deduplicate the raw export and normalize batch labels
    Clean {
        #[arg(long, default_value = constants::DEFAULT_RAW_INPUT)]
        input: PathBuf,
        #[arg(long, default_value = constants::DEFAULT_CLEAN_OUTPUT)]
        output: PathBuf,
        #[arg(long, default_value = constants::DEFAULT_METADATA_OUTPUT)]
        metadata: PathBuf,
    },
    /// Check a finished dataset; exits non-zero when any defect is found
    Validate {
        #[arg(long, default_value = constants::DEFAULT_VALIDATION_INPUT)]
        input: PathBuf,
        /// Print the verdict as JSON instead of a report
        #[arg(long)]
        json: bool,
    },
    /// Analyze a raw export without writing anything
    Profile {
        #[arg(long, default_value = constants::DEFAULT_RAW_INPUT)]
        input: PathBuf,
    },
}

fn load_config(flag: Option<PathBuf>) -> anyhow::Result<PipelineConfig> {
    let path = flag.or_else(|| std::env::var_os(constants::CONFIG_PATH_ENV).map(PathBuf::from));
    PipelineConfig::load_or_default(path.as_deref()).context("Failed to load pipeline config")
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = load_config(cli.config)?;

    match cli.command {
        Commands::Clean { input, output, metadata } => {
            println!("🔧 Processing raw data from {}...", input.display());

            let use_case = CleanUseCase::new(
                Box::new(JsonFileSource::new(&input)),
                Box::new(JsonFileOutput::new(&output).with_metadata(&metadata)),
                config.cleaning,
            );
            let report = use_case
                .run(&mut TracingObserver)
                .with_context(|| format!("Failed to clean {}", input.display()))?;

            let stats = report.stats;
            println!("✅ Data cleaning completed:");
            println!(
                "   • {} → {} companies (removed {} duplicates)",
                stats.raw_count, stats.clean_count, stats.duplicates_removed
            );
            println!("   • {} batch names normalized", stats.normalizations_applied);
            println!("💾 Clean data saved to: {}", output.display());
            Ok(true)
        }
        Commands::Validate { input, json } => {
            let use_case = QualityGateUseCase::with_thresholds(
                Box::new(JsonFileSource::new(&input)),
                config.validation,
            );
            let verdict = use_case
                .run()
                .with_context(|| format!("Failed to validate {}", input.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&verdict)?);
            } else {
                println!("🔍 Validated {}", input.display());
                println!("{}", render_report(&verdict));
            }
            Ok(verdict.passed)
        }
        Commands::Profile { input } => {
            let records = JsonFileSource::new(&input)
                .load_records()
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let profile = profile_raw(&records, config.cleaning.high_duplicate_rate);

            println!("📊 Raw data analysis:");
            println!("   • Total companies: {}", profile.total_records);
            println!("   • Companies with long-form batch names: {}", profile.long_form_batches);
            println!("   • Unique batches: {}", profile.unique_batches);
            println!("   • Duplicate companies: {}", profile.duplicate_slugs);
            if profile.high_duplicate_rate {
                println!("⚠️  WARNING: High duplicate rate detected!");
            }
            Ok(true)
        }
    }
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let _log_guard = logging::init_logging();

    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("❌ ERROR: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
