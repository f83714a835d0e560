use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use research_cite::config::{
    default_config_path, find_config_file, load_config, load_env_config, Config,
};
use research_cite::extract::{Extraction, Extractor};
use research_cite::models::{DetectedInput, Metadata};
use research_cite::ui::{self, Spinner, Status};
use research_cite::utils::{classify, get_structured_citation, CitationStyle, StructuredCitation};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Research Cite - Turn URLs, DOIs, ISBNs and YouTube links into formatted citations
#[derive(Parser, Debug)]
#[command(name = "research-cite")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "hongkongkiwi")]
#[command(about = "Turn URLs, DOIs, ISBNs and YouTube links into formatted citations", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Show all environment variables
    #[arg(long)]
    env: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

/// Citation styles
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Style {
    Apa,
    Mla,
    Chicago,
    Harvard,
    Ieee,
}

impl From<Style> for CitationStyle {
    fn from(style: Style) -> Self {
        match style {
            Style::Apa => CitationStyle::Apa,
            Style::Mla => CitationStyle::Mla,
            Style::Chicago => CitationStyle::Chicago,
            Style::Harvard => CitationStyle::Harvard,
            Style::Ieee => CitationStyle::Ieee,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Look up an input and print its citation
    #[command(alias = "e")]
    Extract {
        /// URL, DOI, ISBN or YouTube link
        input: String,

        /// Citation style (defaults to the configured style)
        #[arg(long, short, value_enum)]
        style: Option<Style>,

        /// Print the citation in every style
        #[arg(long, conflicts_with = "style")]
        all_styles: bool,
    },

    /// Classify an input without looking it up
    #[command(alias = "d")]
    Detect {
        /// Text to classify
        input: String,
    },

    /// List the supported citation styles
    Styles,

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Write a configuration file with default values
    Init {
        /// Where to write it (defaults to the user config directory)
        #[arg(long, short)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration as TOML
    Show,
}

/// Print all available environment variables
fn print_env_vars() {
    println!("Research Cite - Environment Variables");
    println!();
    println!("API Keys:");
    println!("  SEMANTIC_SCHOLAR_API_KEY    API key for Semantic Scholar (higher rate limits)");
    println!("  OPENALEX_EMAIL              Email for OpenAlex 'polite pool' access");
    println!();
    println!("Configuration overrides (nested keys use a double underscore):");
    println!("  RESEARCH_CITE__HTTP__TIMEOUT_SECS           Request timeout (default: 30)");
    println!("  RESEARCH_CITE__HTTP__MAX_ATTEMPTS           Attempts per request (default: 1)");
    println!("  RESEARCH_CITE__HTTP__MAILTO                 Contact address for CrossRef");
    println!("  RESEARCH_CITE__CITATION__DEFAULT_STYLE      apa, mla, chicago, harvard or ieee");
    println!("  RESEARCH_CITE__ENDPOINTS__CROSSREF          CrossRef base URL");
    println!();
    println!("Other Settings:");
    println!("  RUST_LOG                    Rust logging level (e.g., debug, info, warn, error)");
    std::process::exit(0);
}

fn init_logging(cli: &Cli, config: &Config) {
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => config.logging.level.as_str(),
        (false, 1) => "debug",
        (false, _) => "trace",
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("research_cite={}", level)));

    let json = config.logging.format.as_deref() == Some("json");

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

fn load_effective_config(cli: &Cli) -> Result<(Config, Option<PathBuf>)> {
    let path = cli.config.clone().or_else(find_config_file);

    let mut config = match &path {
        Some(path) => load_config(path)?,
        None => load_env_config()?,
    };

    if let Some(timeout) = cli.timeout {
        config.http.timeout_secs = timeout;
    }

    Ok((config, path))
}

fn resolve_format(format: OutputFormat) -> OutputFormat {
    if format == OutputFormat::Auto {
        if ui::is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        }
    } else {
        format
    }
}

#[derive(Serialize)]
struct ExtractReport<'a> {
    input: &'a DetectedInput,
    metadata: &'a Metadata,
    citations: Vec<StructuredCitation>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.env {
        print_env_vars();
    }

    let (config, config_path) = load_effective_config(&cli)?;
    init_logging(&cli, &config);

    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    let format = resolve_format(cli.output);

    match cli.command {
        Some(Commands::Extract {
            ref input,
            style,
            all_styles,
        }) => {
            let styles: Vec<CitationStyle> = if all_styles {
                CitationStyle::ALL.to_vec()
            } else {
                vec![style.map(Into::into).unwrap_or(config.citation.default_style)]
            };

            let extractor = Extractor::from_config(&config)?;

            let spinner = (format != OutputFormat::Json && !cli.quiet && ui::is_terminal())
                .then(|| Spinner::new(&format!("Looking up {}", input.trim())));

            let extraction = match extractor.extract(input).await {
                Ok(extraction) => {
                    if let Some(spinner) = &spinner {
                        spinner.clear();
                    }
                    extraction
                }
                Err(e) => {
                    match &spinner {
                        Some(spinner) => spinner.finish_with_error(&e.user_message()),
                        None => ui::print_status(Status::Error, &e.user_message()),
                    }
                    std::process::exit(1);
                }
            };

            output_extraction(&extraction, &styles, format, cli.quiet)?;
        }
        Some(Commands::Detect { ref input }) => {
            let detected = classify(input);
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&detected)?),
                OutputFormat::Plain => println!("{}\t{}", detected.kind.id(), detected.value),
                _ => ui::print_detected(&detected),
            }
        }
        Some(Commands::Styles) => {
            for style in CitationStyle::ALL {
                let marker = if style == config.citation.default_style {
                    " (default)"
                } else {
                    ""
                };
                println!("{}{}", style, marker);
            }
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { path, force } => {
                let path = path
                    .or_else(default_config_path)
                    .ok_or_else(|| anyhow::anyhow!("Could not determine a config directory"))?;

                if path.exists() && !force {
                    anyhow::bail!(
                        "{} already exists (use --force to overwrite)",
                        path.display()
                    );
                }

                Config::default().save(&path)?;
                if !cli.quiet {
                    ui::print_status(
                        Status::Success,
                        &format!("Wrote default configuration to {}", path.display()),
                    );
                }
            }
            ConfigAction::Show => {
                print!("{}", config.to_toml_string()?);
            }
        },
        Some(Commands::Completions { shell }) => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "research-cite", &mut std::io::stdout());
        }
        None => {
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

fn output_extraction(
    extraction: &Extraction,
    styles: &[CitationStyle],
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let report = ExtractReport {
                input: &extraction.input,
                metadata: &extraction.metadata,
                citations: styles
                    .iter()
                    .map(|style| {
                        get_structured_citation(&extraction.metadata, *style, extraction.input.kind)
                    })
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Plain => {
            for style in styles {
                if styles.len() > 1 {
                    println!("{}: {}", style, extraction.citation(*style));
                } else {
                    println!("{}", extraction.citation(*style));
                }
            }
        }
        OutputFormat::Table | OutputFormat::Auto => {
            if !quiet {
                ui::print_detected(&extraction.input);
                ui::print_metadata_table(&extraction.metadata);
                ui::print_section("Citation");
            }
            for style in styles {
                ui::print_citation(*style, &extraction.citation(*style));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_version() {
        let version = env!("CARGO_PKG_VERSION");
        assert!(!version.is_empty());
        let parts: Vec<&str> = version.split('.').collect();
        assert!(parts.len() >= 2);
        assert!(parts[0].parse::<u32>().is_ok());
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_extract() {
        let cli = Cli::try_parse_from([
            "research-cite",
            "extract",
            "10.1038/nature12373",
            "--style",
            "harvard",
            "-o",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.output, OutputFormat::Json);
        match cli.command {
            Some(Commands::Extract {
                input,
                style,
                all_styles,
            }) => {
                assert_eq!(input, "10.1038/nature12373");
                assert_eq!(style, Some(Style::Harvard));
                assert!(!all_styles);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_all_styles_conflicts_with_style() {
        let result = Cli::try_parse_from([
            "research-cite",
            "extract",
            "x.com",
            "--style",
            "apa",
            "--all-styles",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_style_mapping() {
        assert_eq!(CitationStyle::from(Style::Apa), CitationStyle::Apa);
        assert_eq!(CitationStyle::from(Style::Ieee), CitationStyle::Ieee);
    }

    #[test]
    fn test_resolve_format_explicit() {
        assert_eq!(resolve_format(OutputFormat::Plain), OutputFormat::Plain);
        assert_eq!(resolve_format(OutputFormat::Json), OutputFormat::Json);
    }
}
