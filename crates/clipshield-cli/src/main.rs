//! ClipShield CLI
//!
//! Command-line interface for scanning and redacting sensitive text

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use clipshield_config_file::{AppConfig, ConfigFile};
use clipshield_pii::{
    DetectionResult, PIIDetector, PIIRedactor, PIIType, RedactionMode, RegexPIIDetector,
    StandardRedactor,
};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "clipshield")]
#[command(about = "ClipShield - detect and redact sensitive data in text", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file or directory (JSON, YAML or TOML)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides logging.level
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report which kinds of sensitive data the input contains
    Scan {
        #[command(flatten)]
        input: InputArgs,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the input with sensitive data redacted
    Redact {
        #[command(flatten)]
        input: InputArgs,

        /// auto, mask, tokenize or remove
        #[arg(long, default_value = "auto")]
        strategy: RedactionMode,
    },
    /// Print the input with every match replaced by a token
    Tokenize {
        #[command(flatten)]
        input: InputArgs,
    },
    /// List detection rules
    Rules {
        #[arg(long)]
        json: bool,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the resolved configuration file path
    Path,
    /// Write the default configuration if none exists
    Init,
    /// Print the configuration file contents
    Print,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct InputArgs {
    /// Text to process
    #[arg(long)]
    text: Option<String>,

    /// Read input from a file
    #[arg(long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Read input from standard input
    #[arg(long)]
    stdin: bool,
}

impl InputArgs {
    fn read(&self) -> Result<String> {
        if let Some(text) = &self.text {
            return Ok(text.clone());
        }

        if let Some(path) = &self.file {
            return std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file {}", path.display()));
        }

        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read standard input")?;
        Ok(buf)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RuleRow {
    id: String,
    label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pattern: Option<String>,
    enabled: bool,
    builtin: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let file = ConfigFile::resolve(cli.config.as_deref())
        .context("Failed to resolve configuration path")?;

    if let Commands::Config {
        action: ConfigAction::Path,
    } = cli.command
    {
        init_tracing(cli.log_level.as_deref().unwrap_or("info"))?;
        println!("{}", file.path().display());
        return Ok(());
    }

    let created = file
        .ensure()
        .with_context(|| format!("Failed to create configuration {}", file.path().display()))?;
    let config = file
        .load()
        .with_context(|| format!("Failed to load configuration {}", file.path().display()))?;
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    init_tracing(&level)?;
    debug!("Using configuration {:?}", file.path());

    match cli.command {
        Commands::Scan { input, json } => {
            let text = input.read()?;
            let result = detect(&text, &config)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result.to_summary())?);
            } else {
                println!("Types: {}", result.summary());
                println!("Matches: {}", result.matches.len());
                for m in &result.matches {
                    println!("  {} {}..{}", m.pii_type.as_str(), m.start, m.end);
                }
            }
        }
        Commands::Redact { input, strategy } => {
            let text = input.read()?;
            print_text(&redact(&text, strategy, &config)?);
        }
        Commands::Tokenize { input } => {
            let text = input.read()?;
            print_text(&redact(&text, RedactionMode::Tokenize, &config)?);
        }
        Commands::Rules { json } => {
            let rows = rule_rows(&config);
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for row in &rows {
                    let state = if row.enabled { "on " } else { "off" };
                    let detail = row
                        .description
                        .as_deref()
                        .or(row.pattern.as_deref())
                        .unwrap_or_default();
                    println!("[{}] {:<12} {:<16} {}", state, row.id, row.label, detail);
                }
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Path => println!("{}", file.path().display()),
            ConfigAction::Init => println!("{}", init_message(file.path(), created)),
            ConfigAction::Print => {
                let raw = file
                    .read_raw()
                    .with_context(|| format!("Failed to read {}", file.path().display()))?;
                print_text(&raw);
            }
        },
    }

    Ok(())
}

fn init_message(path: &Path, created: bool) -> String {
    if created {
        format!("Config initialized at {}", path.display())
    } else {
        format!("Config already exists at {}", path.display())
    }
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level.to_lowercase()).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn detect(text: &str, config: &AppConfig) -> Result<DetectionResult> {
    let detector = RegexPIIDetector::new()?;
    Ok(detector.detect(text, &config.shield))
}

fn redact(text: &str, mode: RedactionMode, config: &AppConfig) -> Result<String> {
    let result = detect(text, config)?;
    let redactor = StandardRedactor::new();
    Ok(redactor.redact(text, &result.matches, mode, &config.shield))
}

fn print_text(text: &str) {
    if text.ends_with('\n') {
        print!("{}", text);
    } else {
        println!("{}", text);
    }
}

fn rule_rows(config: &AppConfig) -> Vec<RuleRow> {
    let detection = &config.shield.detection;

    let builtins = PIIType::BUILTIN.iter().map(|pii_type| RuleRow {
        id: pii_type.as_str().to_string(),
        label: pii_type.display_name().to_string(),
        description: Some(pii_type.description().to_string()),
        pattern: None,
        enabled: detection.is_enabled(*pii_type),
        builtin: true,
    });

    let custom = detection.custom_rules.iter().map(|rule| RuleRow {
        id: rule.id.clone(),
        label: rule.label.clone(),
        description: None,
        pattern: Some(rule.pattern.clone()),
        enabled: rule.enabled,
        builtin: false,
    });

    builtins.chain(custom).collect()
}
