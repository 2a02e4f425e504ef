// Fertilizer recommendation shell
//
// One-shot when every field flag is given, interactive otherwise.
// Usage: cargo run --release --bin recommend -- [--temperature 26 --humidity 52 ...] [--format json]

use anyhow::Context;
use clap::{Parser, ValueEnum};
use fertilizer_advisor::{
    telemetry, AdvisorConfig, AdvisoryTable, Dataset, FertilizerAdvisor, JsonFormatter, MarkdownFormatter,
    ModelArtifacts, Observation, Prompter, Recommendation,
};
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Markdown,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "recommend", about = "Recommend a fertilizer and explain why", version)]
struct Cli {
    /// Dataset CSV used for the feature profiles (overrides FERTILIZER_DATA)
    #[arg(long)]
    data: Option<PathBuf>,
    /// Directory holding the trained artifacts (overrides FERTILIZER_MODEL_DIR)
    #[arg(long)]
    model_dir: Option<PathBuf>,
    /// Advisory notes JSON (overrides FERTILIZER_ADVISORY)
    #[arg(long)]
    advisory: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    format: OutputFormat,

    #[arg(long)]
    temperature: Option<f64>,
    #[arg(long)]
    humidity: Option<f64>,
    #[arg(long)]
    moisture: Option<f64>,
    #[arg(long)]
    soil_type: Option<String>,
    #[arg(long)]
    crop_type: Option<String>,
    #[arg(long)]
    nitrogen: Option<f64>,
    #[arg(long)]
    potassium: Option<f64>,
    #[arg(long)]
    phosphorous: Option<f64>,
}

impl Cli {
    /// The observation given entirely on the command line, if any
    fn one_shot(&self) -> Option<Observation> {
        Some(Observation {
            temperature: self.temperature?,
            humidity: self.humidity?,
            moisture: self.moisture?,
            soil_type: self.soil_type.clone()?,
            crop_type: self.crop_type.clone()?,
            nitrogen: self.nitrogen?,
            potassium: self.potassium?,
            phosphorous: self.phosphorous?,
        })
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = AdvisorConfig::from_env();
    if let Some(data) = cli.data.clone() {
        config.data_path = data;
    }
    if let Some(dir) = cli.model_dir.clone() {
        config.model_dir = dir;
    }
    if let Some(path) = cli.advisory.clone() {
        config.advisory_path = Some(path);
    }
    telemetry::init(&config.log_filter)?;
    config.log_config();

    let dataset = Dataset::load(&config.data_path)?;
    let artifacts = ModelArtifacts::load(&config.model_dir)
        .with_context(|| format!("Failed to load model from {}", config.model_dir.display()))?;
    let advisories = match &config.advisory_path {
        Some(path) => AdvisoryTable::load(path)?,
        None => AdvisoryTable::default(),
    };
    let advisor = FertilizerAdvisor::from_parts(&dataset, artifacts, advisories)?;
    tracing::info!("Advisor ready");

    if let Some(observation) = cli.one_shot() {
        let recommendation = advisor.recommend(&observation)?;
        print_recommendation(&recommendation, cli.format)?;
        return Ok(());
    }

    run_interactive(&advisor, cli.format)
}

fn run_interactive(advisor: &FertilizerAdvisor, format: OutputFormat) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    println!("🌱 Fertilizer Recommendation System");
    println!("Enter soil and weather conditions. Press Enter to accept the default; Ctrl-D to quit.\n");

    loop {
        let observation = match prompter.read_observation(advisor.context())? {
            Some(obs) => obs,
            None => return Ok(()),
        };

        match advisor.recommend(&observation) {
            Ok(recommendation) => print_recommendation(&recommendation, format)?,
            Err(err) if err.is_recoverable() => {
                tracing::warn!("Request rejected: {}", err);
                println!("⚠️ {}\n", err);
            }
            Err(err) => return Err(err.into()),
        }
        println!("----------------------------------------\n");
    }
}

fn print_recommendation(recommendation: &Recommendation, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Markdown => {
            println!("\n✅ Recommended Fertilizer: {}\n", recommendation.fertilizer);
            println!("{}", MarkdownFormatter::format(&recommendation.explanation));
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::format(recommendation)?);
        }
    }
    Ok(())
}
