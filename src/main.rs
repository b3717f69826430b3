use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};

use gtour::config::Config;
use gtour::engine::{TerminalSession, TourEngine, TourRuntime};
use gtour::error::{AppError, AppResult};
use gtour::logging::{self, LogTarget};
use gtour::page::{HeadlessPage, TerminalPage};
use gtour::plan::plan_tour;
use gtour::tour::{Catalog, StepRegistry};

#[derive(Debug, Parser)]
#[command(name = "gtour", version, about = "Self-running guided tour of a product page")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Mount the page and run the tour (the default).
    Run(RunArgs),
    /// Print when each step of an untouched run would show.
    Plan(PlanArgs),
}

#[derive(Debug, Default, Args)]
struct SourceArgs {
    /// TOML config file. Defaults to GTOUR_CONFIG_PATH or the user config dir.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// TOML catalog replacing the built-in page content.
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,
}

#[derive(Debug, Default, Args)]
struct RunArgs {
    /// Narrate the tour through logs instead of drawing it.
    #[arg(long)]
    headless: bool,
    /// Append logs to this file.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
    #[command(flatten)]
    sources: SourceArgs,
}

#[derive(Debug, Default, Args)]
struct PlanArgs {
    /// Emit the plan as JSON.
    #[arg(long)]
    json: bool,
    #[command(flatten)]
    sources: SourceArgs,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    if let Err(err) = run(Cli::parse()).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    match cli.command.unwrap_or(Command::Run(RunArgs::default())) {
        Command::Run(args) => run_tour(args).await,
        Command::Plan(args) => print_plan(&args),
    }
}

fn log_target(args: &RunArgs) -> LogTarget {
    match (&args.log_file, args.headless) {
        (Some(path), _) => LogTarget::File(path.clone()),
        (None, true) => LogTarget::Stderr,
        (None, false) => LogTarget::Discard,
    }
}

fn load_sources(args: &SourceArgs) -> AppResult<(Config, Catalog)> {
    let config = match &args.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    let catalog = match &args.catalog {
        Some(path) => Catalog::load_from_path(path)?,
        None => Catalog::builtin(),
    };
    Ok((config, catalog))
}

async fn run_tour(args: RunArgs) -> AppResult<()> {
    logging::init(&log_target(&args))?;
    let (config, catalog) = load_sources(&args.sources)?;
    let registry = StepRegistry::build(&catalog, &config.tour);
    let engine = TourEngine::new(registry, &config, Instant::now());

    if args.headless {
        let mut page = HeadlessPage::new(&catalog);
        let mut runtime = TourRuntime::new(engine).exit_on_completion(true);
        return runtime.run(&mut page).await;
    }

    let session = TerminalSession::enter(&catalog.title)?;
    let mut page = TerminalPage::new(session, catalog, config.page.home_route.clone())?;
    let mut runtime = TourRuntime::new(engine).with_terminal_input();
    runtime.run(&mut page).await
}

fn print_plan(args: &PlanArgs) -> AppResult<()> {
    let (config, catalog) = load_sources(&args.sources)?;
    let plan = plan_tour(&catalog, &config);
    if args.json {
        let json = serde_json::to_string_pretty(&plan)
            .map_err(|err| AppError::unsupported(format!("plan serialization failed: {err}")))?;
        println!("{json}");
    } else {
        print!("{}", plan.render_text());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use gtour::logging::LogTarget;

    use super::{Cli, Command, RunArgs, log_target};

    #[test]
    fn bare_invocation_runs_the_tour() {
        let cli = Cli::try_parse_from(["gtour"]).expect("no args should parse");
        assert!(cli.command.is_none());
    }

    #[test]
    fn run_accepts_headless_and_sources() {
        let cli = Cli::try_parse_from([
            "gtour",
            "run",
            "--headless",
            "--config",
            "tour.toml",
            "--catalog",
            "page.toml",
        ])
        .expect("run args should parse");
        let Some(Command::Run(args)) = cli.command else {
            panic!("expected run command");
        };
        assert!(args.headless);
        assert_eq!(args.sources.config, Some(PathBuf::from("tour.toml")));
        assert_eq!(args.sources.catalog, Some(PathBuf::from("page.toml")));
        assert_eq!(log_target(&args), LogTarget::Stderr);
    }

    #[test]
    fn plan_takes_json_flag_and_rejects_unknown_args() {
        let cli = Cli::try_parse_from(["gtour", "plan", "--json"]).expect("plan should parse");
        assert!(matches!(cli.command, Some(Command::Plan(args)) if args.json));
        assert!(Cli::try_parse_from(["gtour", "plan", "--frames"]).is_err());
    }

    #[test]
    fn log_file_wins_over_terminal_default() {
        let args = RunArgs {
            log_file: Some(PathBuf::from("tour.log")),
            ..RunArgs::default()
        };
        assert_eq!(log_target(&args), LogTarget::File(PathBuf::from("tour.log")));
        assert_eq!(log_target(&RunArgs::default()), LogTarget::Discard);
    }
}
