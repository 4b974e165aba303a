mod commands;
mod examples;
mod output;

use std::fmt::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{
    ColorChoice, Command, CommandFactory, FromArgMatches, Parser, Subcommand,
    builder::styling::{AnsiColor, Styles},
};
use colored::control::ShouldColorize;

use commands::{
    listings::{SearchArgs, UpdateArgs, handle_delete, handle_search, handle_seed, handle_show, handle_update},
    serve::handle_serve,
};
use examples::{ExampleGroup, command_examples};
use nest::config::{DEFAULT_CONFIG_FILE, NestConfig};
use output::{GlobalOptions, OutputFormat, OutputManager, Tone};

const ENVIRONMENT_VARIABLES: &[(&str, &str)] = &[
    ("REDIS_URL", "Redis Stack URL, used when store.backend = \"redis\""),
    ("FRONTEND_URL", "Origin allowed to call the API from a browser"),
    ("HOST", "Bind host for 'serve', overrides [server].host"),
    ("PORT", "Bind port for 'serve', overrides [server].port"),
    ("RUST_LOG", "Log filter; info by default, debug with --verbose"),
];

#[derive(Parser)]
#[command(name = "nest", version)]
#[command(about = "Himalayan Nest listing service")]
#[command(
    long_about = "Himalayan Nest listing service.\n\n\
                  Serves the property search API and maintains listings from the command line.\n\
                  Searches take the same filters as GET /api/properties: location, category,\n\
                  purpose (buy or rent), a price band and free-text keywords."
)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Configuration file; a missing file means built-in defaults
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    output: OutputFormat,

    /// Only print errors
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Print progress details and log at debug level
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve,

    /// Search listings with the same filters as the API
    Search(SearchArgs),

    /// Show one listing
    Show {
        /// Listing id
        id: String,
    },

    /// Load listings from a JSON array file
    Seed {
        /// Seed file path
        file: PathBuf,
    },

    /// Change purpose, price or visibility of a listing
    Update(UpdateArgs),

    /// Remove a listing
    Delete {
        /// Listing id
        id: String,
    },
}

fn parse_cli() -> Cli {
    let matches = build_cli_command().get_matches();
    Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit())
}

fn build_cli_command() -> Command {
    let use_color = ShouldColorize::from_env().should_colorize();
    let mut command = Cli::command()
        .styles(help_styles())
        .color(if use_color { ColorChoice::Auto } else { ColorChoice::Never })
        .after_long_help(environment_appendix(use_color));

    for example in command_examples() {
        command = command.mut_subcommand(example.name, |sub| {
            sub.after_long_help(render_examples(example.groups, use_color))
        });
    }
    command
}

fn render_examples(groups: &[ExampleGroup], use_color: bool) -> String {
    let mut text = Tone::Heading.paint("Examples:", true, use_color);
    text.push('\n');
    for group in groups {
        let _ = writeln!(text, "  {}", Tone::Info.paint(group.title, true, use_color));
        for line in group.commands {
            let _ = writeln!(text, "    {}", Tone::Accent.paint(line, false, use_color));
        }
    }
    text
}

fn environment_appendix(use_color: bool) -> String {
    let mut text = Tone::Heading.paint("Environment:", true, use_color);
    text.push('\n');
    for (name, meaning) in ENVIRONMENT_VARIABLES {
        let _ = writeln!(text, "  {:<14}{meaning}", Tone::Accent.paint(name, true, use_color));
    }
    let _ = write!(
        text,
        "\nA .env file in the working directory is loaded first. Run 'nest <command> --help' for examples."
    );
    text
}

fn help_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().bold())
        .usage(AnsiColor::Cyan.on_default().bold())
        .literal(AnsiColor::Magenta.on_default())
        .placeholder(AnsiColor::BrightBlack.on_default())
        .error(AnsiColor::Red.on_default().bold())
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Yellow.on_default())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let cli = parse_cli();
    init_logging(cli.verbose);

    let output = OutputManager::new(GlobalOptions {
        output_format: cli.output.clone(),
        quiet: cli.quiet,
        verbose: cli.verbose,
        no_color: cli.no_color,
    });

    if let Err(err) = execute(cli, &output).await {
        output.error(&format!("Error: {err:#}"));
        std::process::exit(1);
    }
}

async fn execute(cli: Cli, output: &OutputManager) -> Result<()> {
    let config = NestConfig::load(&cli.config)?;
    output.verbose(&format!("config: {}", cli.config.display()));

    match cli.command {
        Commands::Serve => handle_serve(&config, output).await,
        Commands::Search(args) => handle_search(args, &config, output).await,
        Commands::Show { id } => handle_show(id, &config, output).await,
        Commands::Seed { file } => handle_seed(file, &config, output).await,
        Commands::Update(args) => handle_update(args, &config, output).await,
        Commands::Delete { id } => handle_delete(id, &config, output).await,
    }
}
