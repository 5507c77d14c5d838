use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use beachsafe::api::AppState;
use beachsafe::config::LoggingConfig;
use beachsafe::recommendations::guide_error_placeholder;
use beachsafe::render::render_report;
use beachsafe::{
    AnalyzeRequest, BeachSafeConfig, GuideText, LocationQuery, ReportAssembler, SessionContext,
    StreamEvent, web,
};

#[derive(Debug, Parser)]
#[command(name = "beachsafe", version)]
#[command(about = "Beach safety analyzer: weather, tides, safety rating and packing advice")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze a beach or travel destination
    Analyze {
        /// Beach name or location, e.g. "Puri Beach, Odisha"
        location: String,

        /// Where you are travelling from, for a flight distance estimate
        #[arg(long = "from")]
        origin: Option<String>,

        /// Active hazard advisory; repeat for several
        #[arg(long = "hazard")]
        hazards: Vec<String>,

        /// Skip the AI travel guide
        #[arg(long)]
        no_guide: bool,
    },
    /// Serve the dashboard and JSON API
    Serve {
        /// Port to listen on, overrides the configured one
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match BeachSafeConfig::load_from_path(cli.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e:#}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.logging, cli.verbose);

    match run(cli, config).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("❌ {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(logging: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("beachsafe={level},warn")));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if logging.format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

async fn run(cli: Cli, config: BeachSafeConfig) -> Result<ExitCode> {
    let Some(command) = cli.command else {
        print_hints(cli.config, &config, cli.verbose);
        return Ok(ExitCode::SUCCESS);
    };

    let assembler = ReportAssembler::from_config(&config)?;
    match command {
        Command::Analyze {
            location,
            origin,
            hazards,
            no_guide,
        } => {
            let request = AnalyzeRequest {
                query: location,
                origin,
                hazards,
            };
            analyze(&assembler, &request, !no_guide).await
        }
        Command::Serve { port } => {
            let port = port.unwrap_or(config.display.port);
            web::run(port, AppState::new(assembler)).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn analyze(
    assembler: &ReportAssembler,
    request: &AnalyzeRequest,
    with_guide: bool,
) -> Result<ExitCode> {
    let mut session = SessionContext::new();
    let report = match assembler.analyze(request, &mut session).await {
        Ok(report) => report,
        Err(e) if e.is_warning() => {
            eprintln!("⚠️ {}", e.user_message());
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => {
            debug!("Analysis failed: {:?}", e);
            eprintln!("❌ {}", e.user_message());
            return Ok(ExitCode::FAILURE);
        }
    };

    println!("{}", render_report(&report, assembler.timezone()));

    if with_guide {
        println!("\n📚 Travel Guide");
        let query = LocationQuery::parse(&report.query)?;
        match assembler.guide(&query, &report.weather).await {
            GuideText::Ready(text) => println!("{text}"),
            GuideText::Streaming(mut stream) => {
                let mut stdout = std::io::stdout();
                loop {
                    match stream.next_event().await {
                        StreamEvent::Fragment(text) => {
                            write!(stdout, "{text}")?;
                            stdout.flush()?;
                        }
                        StreamEvent::Completed => {
                            writeln!(stdout)?;
                            break;
                        }
                        StreamEvent::Failed(err) => {
                            writeln!(stdout, "\n{}", guide_error_placeholder(&err))?;
                            break;
                        }
                    }
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_hints(config_path: Option<PathBuf>, config: &BeachSafeConfig, verbose: bool) {
    println!("🏖️ BeachSafe v{}", beachsafe::VERSION);
    println!("Run `beachsafe analyze \"Puri Beach\"` for a report or `beachsafe serve` for the dashboard.");

    if verbose {
        let path = config_path.or_else(BeachSafeConfig::get_config_path);
        match path {
            Some(path) => println!("Using config from: {}", path.display()),
            None => println!("Using default configuration"),
        }
        println!("Log level: {}", config.logging.level);
        println!("Display timezone: {}", config.display.timezone);
    }
}
