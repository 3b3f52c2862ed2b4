use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use openapi_normalizer_core::{Pipeline, RuleKind, SpecVersion};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "openapi-normalizer")]
#[command(about = "Normalize OpenAPI 2.0/3.x documents into generator-friendly shapes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the standard rule pipeline over a document
    Normalize {
        /// Input OpenAPI document (JSON, or YAML by extension)
        input: PathBuf,

        /// Output normalized document file (defaults to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Rules to leave out of the standard pipeline
        #[arg(long, value_enum)]
        skip: Vec<RuleArg>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },

    /// List the standard rule order for a document version
    Rules {
        /// Document version to list the catalog for
        #[arg(long, value_enum, default_value_t = VersionArg::V3)]
        spec: VersionArg,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum RuleArg {
    MoveQueryPaths,
    RemovePathsWithServers,
    HoistPathParameters,
    RemoveHtmlContent,
    RemoveResponseHeaders,
    RemoveDefaultOnlyProduces,
    PruneEmptyArrayBranches,
    CollapseSingleOf,
    NullableToTypeNull,
    FormatToType,
    BinaryTypeToFile,
}

impl From<RuleArg> for RuleKind {
    fn from(val: RuleArg) -> Self {
        match val {
            RuleArg::MoveQueryPaths => RuleKind::MoveQueryPaths,
            RuleArg::RemovePathsWithServers => RuleKind::RemovePathsWithServers,
            RuleArg::HoistPathParameters => RuleKind::HoistPathParameters,
            RuleArg::RemoveHtmlContent => RuleKind::RemoveHtmlContent,
            RuleArg::RemoveResponseHeaders => RuleKind::RemoveResponseHeaders,
            RuleArg::RemoveDefaultOnlyProduces => RuleKind::RemoveDefaultOnlyProduces,
            RuleArg::PruneEmptyArrayBranches => RuleKind::PruneEmptyArrayBranches,
            RuleArg::CollapseSingleOf => RuleKind::CollapseSingleOf,
            RuleArg::NullableToTypeNull => RuleKind::NullableToTypeNull,
            RuleArg::FormatToType => RuleKind::FormatToType,
            RuleArg::BinaryTypeToFile => RuleKind::BinaryTypeToFile,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum VersionArg {
    V2,
    V3,
}

impl From<VersionArg> for SpecVersion {
    fn from(val: VersionArg) -> Self {
        match val {
            VersionArg::V2 => SpecVersion::V2,
            VersionArg::V3 => SpecVersion::V3,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormat {
    Pretty,
    Compact,
    Yaml,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing — logs go to stderr so stdout stays clean for output
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Normalize {
            input,
            output,
            skip,
            format,
        } => {
            let document = read_document(&input)?;

            let version = SpecVersion::detect(&document)
                .map_err(|e| anyhow::Error::from(e).context("Version detection failed"))?;
            tracing::debug!(%version, "detected document version");

            let skip: Vec<RuleKind> = skip.into_iter().map(RuleKind::from).collect();
            let result = Pipeline::standard_without(version, &skip)
                .run(&document)
                .map_err(|e| anyhow::Error::from(e).context("Normalization failed"))?;

            write_document(&result, output.as_ref(), format)?;
        }
        Commands::Rules { spec } => {
            for kind in RuleKind::standard_order(spec.into()) {
                // RuleKind serializes as the rule's kebab-case name.
                let name = serde_json::to_value(kind).context("Failed to render rule name")?;
                println!("{}", name.as_str().unwrap_or_default());
            }
        }
    }

    Ok(())
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn read_document(path: &Path) -> Result<serde_json::Value> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    let reader = BufReader::new(file);

    if is_yaml(path) {
        serde_yaml::from_reader(reader)
            .with_context(|| format!("Failed to parse document from: {}", path.display()))
    } else {
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse document from: {}", path.display()))
    }
}

fn write_document(
    val: &serde_json::Value,
    path: Option<&PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let mut writer: Box<dyn Write> = if let Some(p) = path {
        let file = File::create(p)
            .with_context(|| format!("Failed to create output file: {}", p.display()))?;
        Box::new(BufWriter::new(file))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };

    match format {
        OutputFormat::Pretty => {
            serde_json::to_writer_pretty(&mut writer, val).context("Failed to write JSON")?;
            writeln!(writer).context("Failed to write trailing newline")?;
        }
        OutputFormat::Compact => {
            serde_json::to_writer(&mut writer, val).context("Failed to write JSON")?;
            writeln!(writer).context("Failed to write trailing newline")?;
        }
        OutputFormat::Yaml => {
            serde_yaml::to_writer(&mut writer, val).context("Failed to write YAML")?;
        }
    }

    Ok(())
}
