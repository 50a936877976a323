mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};

use routeviz_cli::logging::{init_logging, LoggingConfig};
use routeviz_cli::output::OutputFormat;
use routeviz_lib::RouteVariant;

use crate::commands::route::{handle_route_command, RouteCommandArgs};

#[derive(Parser, Debug)]
#[command(author, version, about = "Driving route alternatives and shortest-path exploration")]
struct Cli {
    /// Log at debug level (overrides RUST_LOG).
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch fastest, shortest and eco routes between two coordinates.
    Route(RouteArgs),
}

#[derive(Args, Debug)]
struct RouteArgs {
    /// Start as "lat, lon".
    #[arg(long = "from", allow_hyphen_values = true)]
    from: String,
    /// Destination as "lat, lon".
    #[arg(long = "to", allow_hyphen_values = true)]
    to: String,
    /// Route to make active once the routes are drawn.
    #[arg(long, value_enum, default_value_t = SelectArg::Fastest)]
    select: SelectArg,
    /// Draw the active route vertex by vertex.
    #[arg(long)]
    animate: bool,
    /// Animation speed, 0 (slow) to 195 (fast).
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=195))]
    speed: Option<u32>,
    /// Skip the shortest-path exploration overlay.
    #[arg(long)]
    no_search: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// OpenRouteService API key (defaults to ROUTEVIZ_ORS_API_KEY).
    #[arg(long)]
    ors_api_key: Option<String>,
    /// OpenRouteService base URL.
    #[arg(long)]
    ors_url: Option<String>,
    /// OSRM base URL.
    #[arg(long)]
    osrm_url: Option<String>,
    /// Do not fall back to OSRM when OpenRouteService fails.
    #[arg(long, conflicts_with = "osrm_url")]
    no_fallback: bool,
    /// HTTP timeout in seconds.
    #[arg(long)]
    timeout: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SelectArg {
    Fastest,
    Shortest,
    Eco,
}

impl From<SelectArg> for RouteVariant {
    fn from(value: SelectArg) -> Self {
        match value {
            SelectArg::Fastest => RouteVariant::Fastest,
            SelectArg::Shortest => RouteVariant::Shortest,
            SelectArg::Eco => RouteVariant::Eco,
        }
    }
}

impl From<RouteArgs> for RouteCommandArgs {
    fn from(args: RouteArgs) -> Self {
        RouteCommandArgs {
            from: args.from,
            to: args.to,
            select: args.select.into(),
            animate: args.animate,
            speed: args.speed,
            show_search: !args.no_search,
            format: args.format,
            ors_api_key: args.ors_api_key,
            ors_url: args.ors_url,
            osrm_url: args.osrm_url,
            no_fallback: args.no_fallback,
            timeout_secs: args.timeout,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&LoggingConfig::from_env().with_verbose(cli.verbose));

    match cli.command {
        Command::Route(args) => handle_route_command(&args.into()).await,
    }
}
