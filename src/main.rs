use std::path::{
    Path,
    PathBuf
};

use clap::{
    Parser,
    Subcommand,
    ValueEnum
};

use dosemetrics::configuration::AnalysisConfiguration;
use dosemetrics::profile::profilekind::ProfileKind;
use dosemetrics::reader::filereader::parse_directory_date;
use dosemetrics::reader::measurement::Measurement;
use dosemetrics::report::metricsummary::analyse;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "dosemetrics")]
#[command(about = "Dosimetric metrics of measured depth and lateral dose profiles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands
}

#[derive(Subcommand)]
enum Commands {
    /// Print the metric summary of one measurement table as JSON.
    Analyse {
        /// Path to the `.dat` measurement table.
        file: PathBuf,

        /// JSON analysis configuration; defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the profile kind inferred from the scan axis.
        #[arg(long, value_enum)]
        kind: Option<KindArg>,

        /// Report metrics of the raw profile.
        #[arg(long)]
        no_normalize: bool
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Depth,
    Lateral
}

impl KindArg {
    fn to_core(self) -> ProfileKind {
        match self {
            KindArg::Depth => ProfileKind::Depth,
            KindArg::Lateral => ProfileKind::Lateral
        }
    }
}

fn run_analyse(file: &Path, config: Option<&Path>, kind: Option<KindArg>, no_normalize: bool) -> CliResult<()> {
    let mut config = match config {
        Some(path) => AnalysisConfiguration::from_reader(path)?,
        None => AnalysisConfiguration::new()
    };
    if no_normalize {
        config = config.without_normalization();
    }

    let mut measurement = Measurement::from_path(file, config.reader())?;
    if let Some(kind) = kind {
        measurement = measurement.with_kind(kind.to_core());
    }
    let measured_at = parse_directory_date(file, config.reader().directory_date_format()).ok();
    let measurement = measurement.with_measured_at(measured_at);

    let summary = analyse(measurement, &config)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn main() -> CliResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyse { file, config, kind, no_normalize } => {
            run_analyse(&file, config.as_deref(), kind, no_normalize)
        }
    }
}
