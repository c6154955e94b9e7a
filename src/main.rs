//! Student Placement Predictor - Main Entry Point
//!
//! Loads the pre-trained classifier once, then either serves the input form
//! over HTTP or scores a single profile from the command line.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use placement_predictor::{
    assess,
    config::AppConfig,
    feature_extractor::FeatureExtractor,
    models::{ModelLoader, Predictor},
    server::{run_server, AppState},
    types::profile::{parse_toggle, StudentProfile},
};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "placement-predictor",
    about = "Predict student placement from six academic and experience attributes."
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Classifier artifact (.onnx or .json), overrides the configured path
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the prediction form over HTTP
    Serve {
        /// Address to bind to, overrides the configured address
        #[arg(long)]
        bind: Option<SocketAddr>,
    },

    /// Score one profile and print the assessment
    Predict {
        /// IQ score (50-200)
        #[arg(long)]
        iq: u32,

        /// Overall academic performance (0-10)
        #[arg(long)]
        academic_performance: u32,

        /// Previous semester result (0.0-10.0)
        #[arg(long)]
        prev_sem_result: f64,

        /// Communication skills (0-10)
        #[arg(long)]
        communication_skills: u32,

        /// Internship experience: yes or no
        #[arg(long, default_value = "no")]
        internship: String,

        /// Projects completed (0-20)
        #[arg(long)]
        projects_completed: u32,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Summary,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_path(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => AppConfig::load()?,
    };
    config.apply_env_overrides();
    if let Some(path) = cli.model {
        config.model.path = path;
    }

    init_logging(&config)?;

    match cli.command {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            let predictor = load_predictor(&config)?;
            run_server(config.server.bind, Arc::new(AppState::new(predictor))).await
        }
        Commands::Predict {
            iq,
            academic_performance,
            prev_sem_result,
            communication_skills,
            internship,
            projects_completed,
            format,
        } => {
            let profile = StudentProfile::new(
                iq,
                academic_performance,
                prev_sem_result,
                communication_skills,
                parse_toggle(&internship)?,
                projects_completed,
            )?;
            let predictor = load_predictor(&config)?;
            print_assessment(&predictor, &profile, format)
        }
    }
}

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(
        format!("placement_predictor={}", config.logging.level).parse()?,
    );

    // stdout carries `predict` output; logs go to stderr
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.logging.format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
    Ok(())
}

/// Load the artifact before anything else runs; failure names the file.
fn load_predictor(config: &AppConfig) -> Result<Predictor> {
    let model = ModelLoader::with_threads(config.model.onnx_threads)
        .load(&config.model.path)
        .context("Failed to load classifier")?;

    let extractor = FeatureExtractor::new();
    info!(
        path = %model.path.display(),
        format = %model.format,
        features = extractor.feature_count(),
        columns = ?extractor.feature_names(),
        "Model loaded"
    );

    Ok(Predictor::new(model))
}

fn print_assessment(predictor: &Predictor, profile: &StudentProfile, format: OutputFormat) -> Result<()> {
    let assessment = assess(predictor, profile)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&assessment)?);
        }
        OutputFormat::Summary => {
            let prediction = &assessment.prediction;
            println!("Student Placement Prediction");
            println!("============================");
            println!(
                "Profile:        IQ {} | Academics {} | Prev. semester {:.1} | Communication {} | Internship {} | Projects {}",
                profile.iq(),
                profile.academic_performance(),
                profile.prev_sem_result(),
                profile.communication_skills(),
                profile.internship_label(),
                profile.projects_completed()
            );
            println!("Prediction:     {}", prediction.headline());
            println!("Probability:    {:.1}%", prediction.probability_percent);
            println!("                {}", prediction.summary());

            if !assessment.insights.strengths.is_empty() {
                println!();
                println!("Key Strengths:");
                for bullet in &assessment.insights.strengths {
                    println!("  {} {}", bullet.attribute.icon(), bullet.text);
                }
            }
            if !assessment.insights.weaknesses.is_empty() {
                println!();
                println!("Areas for Improvement:");
                for bullet in &assessment.insights.weaknesses {
                    println!("  {} {}", bullet.attribute.icon(), bullet.text);
                }
            }

            println!();
            println!("Recommendations:");
            for (i, recommendation) in assessment.insights.recommendations.iter().enumerate() {
                println!("  {}. {}", i + 1, recommendation);
            }
        }
    }
    Ok(())
}
