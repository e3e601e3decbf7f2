use anyhow::{Context, Result};
use changelint::{
    ChangelogParser, ChangelogValidator, ManifestReference, ParseResult, ToolConfig,
    ValidationReference, format_changelog, load_source,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "changelint")]
#[command(version, about = "changelog validator and formatter", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// output format (json or human)
    #[arg(short, long, default_value = "human", global = true)]
    format: OutputFormat,

    /// configuration file (defaults to changelint.toml in the current directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Json,
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "human" => Ok(OutputFormat::Human),
            _ => Err(format!(
                "invalid output format: {}, use 'json' or 'human'",
                s
            )),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// parse and validate a changelog, report every problem found
    Validate {
        /// changelog file path or url
        source: String,

        /// expected project name (the changelog title)
        #[arg(long)]
        name: Option<String>,

        /// expected changelog description
        #[arg(long)]
        description: Option<String>,

        /// version expected as the newest release
        #[arg(long)]
        release: Option<String>,

        /// take name, description and version from a Cargo.toml
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// only print the problem listing
        #[arg(long)]
        no_header: bool,

        /// print progress and the formatted changelog
        #[arg(short, long)]
        verbose: bool,
    },

    /// print a changelog in canonical form
    Format {
        /// changelog file path or url
        source: String,

        /// fail when the changelog is not already in canonical form
        #[arg(long)]
        check: bool,
    },
}

struct ValidateOptions {
    name: Option<String>,
    description: Option<String>,
    release: Option<String>,
    manifest: Option<PathBuf>,
    no_header: bool,
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Validate {
            source,
            name,
            description,
            release,
            manifest,
            no_header,
            verbose,
        } => {
            let options = ValidateOptions {
                name,
                description,
                release,
                manifest,
                no_header,
                verbose,
            };
            handle_validate(&source, &config, &cli.format, options)?;
        }
        Commands::Format { source, check } => {
            handle_format(&source, &config, &cli.format, check)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<ToolConfig> {
    match path {
        Some(path) => ToolConfig::load_from_file(path)
            .with_context(|| format!("failed to load configuration {}", path.display())),
        None => Ok(ToolConfig::load_or_default(".")),
    }
}

fn read_and_parse(source: &str, config: &ToolConfig) -> Result<(String, ParseResult)> {
    let text = load_source(source, &config.changelog)
        .with_context(|| format!("could not read {}", source))?;
    let result = ChangelogParser::new(&config.changelog)
        .parse(&text)
        .with_context(|| format!("could not parse {}", source))?;
    Ok((text, result))
}

fn build_reference(options: &ValidateOptions) -> Result<ValidationReference> {
    let mut reference = match &options.manifest {
        Some(path) => ManifestReference::read(path)
            .context("failed to read manifest")?
            .to_reference(options.description.is_none()),
        None => ValidationReference::new(),
    };

    if let Some(name) = &options.name {
        reference = reference.project_name(name.clone());
    }
    if let Some(description) = &options.description {
        reference = reference.description(description.clone());
    }
    if let Some(release) = &options.release {
        reference = reference.version(release.clone());
    }
    Ok(reference)
}

fn handle_validate(
    source: &str,
    config: &ToolConfig,
    format: &OutputFormat,
    options: ValidateOptions,
) -> Result<()> {
    let human = matches!(format, OutputFormat::Human);
    if human && options.verbose {
        println!("reading changelog from {}", source);
    }

    let (_, result) = read_and_parse(source, config)?;
    let reference = build_reference(&options)?;
    let validator =
        ChangelogValidator::new(&config.changelog).context("invalid changelog configuration")?;

    let mut report = result.errors.clone();
    report.merge(validator.validate(&result.changelog, &reference));

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "source": source,
                "title": result.changelog.title,
                "entries": result.changelog.entries.len(),
                "valid": report.is_empty(),
                "error_count": report.len(),
                "errors": report,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            if options.verbose {
                println!(
                    "parsed {} entries, {} problem(s) found",
                    result.changelog.entries.len(),
                    report.len()
                );
            }

            if !report.is_empty() {
                if !options.no_header {
                    println!("Validation errors found in {}:", source);
                }
                print!("{}", report);
            } else if options.verbose {
                println!("Validated changelog {}:", source);
                print!("{}", format_changelog(&result.changelog, &config.changelog));
            }
        }
    }

    if !report.is_empty() {
        // return error to cause non-zero exit code
        anyhow::bail!("validation failed with {} error(s)", report.len());
    }

    Ok(())
}

fn handle_format(source: &str, config: &ToolConfig, format: &OutputFormat, check: bool) -> Result<()> {
    let (text, result) = read_and_parse(source, config)?;
    let formatted = format_changelog(&result.changelog, &config.changelog);
    let canonical = text.replace('\r', "") == formatted;

    match format {
        OutputFormat::Json => {
            let output = if check {
                serde_json::json!({
                    "source": source,
                    "canonical": canonical,
                })
            } else {
                serde_json::json!({
                    "source": source,
                    "text": formatted,
                    "errors": result.errors,
                })
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            if check {
                if canonical {
                    println!("{} is in canonical form", source);
                } else {
                    println!("{} is not in canonical form", source);
                }
            } else {
                print!("{}", formatted);
            }
        }
    }

    if check && !canonical {
        anyhow::bail!("{} is not in canonical form", source);
    }

    Ok(())
}
