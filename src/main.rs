use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::prelude::*;

use growth_scenario_explorer::{
    analysis::{summarize, ScenarioEvaluation},
    config::DEFAULT_CONFIG_FILE,
    io,
    visualization::{
        print_curve_table, print_issues, print_line_chart, print_scenario_table,
        print_summary_table,
    },
    Explorer, ExplorerConfig, ModelKind, ScenarioRow, ScenarioTable, TimeConfig,
};

const CHART_WIDTH: usize = 60;
const CHART_HEIGHT: usize = 16;

#[derive(Parser)]
#[command(
    name = "growth-explorer",
    about = "Growth Scenario Explorer - compare exponential and logistic population growth",
    version,
    author
)]
struct Cli {
    /// Path to a TOML config file (defaults to ./growth-explorer.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Time and output flags shared by the evaluating subcommands.
#[derive(Args)]
struct TimeArgs {
    /// Time horizon (overrides the config file)
    #[arg(long)]
    horizon: Option<f64>,

    /// Number of evaluation points (overrides the config file)
    #[arg(long)]
    resolution: Option<usize>,

    /// Number of time rows shown in the curve table
    #[arg(short, long, default_value = "11")]
    samples: usize,

    /// Draw an ASCII chart of the curves
    #[arg(long)]
    chart: bool,
}

impl TimeArgs {
    fn apply(&self, base: TimeConfig) -> TimeConfig {
        TimeConfig {
            horizon: self.horizon.unwrap_or(base.horizon),
            resolution: self.resolution.unwrap_or(base.resolution),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a scenario table (CSV or JSON) and display the curves
    Run {
        /// Path to a scenario file; the seeded default table is used if omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        time: TimeArgs,

        /// Write the evaluated curves to this file (.csv or .json)
        #[arg(short, long)]
        export: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Fail if any row is invalid instead of skipping it
        #[arg(long)]
        strict: bool,
    },

    /// Evaluate a single scenario given on the command line
    Simulate {
        /// Scenario name
        #[arg(short, long, default_value = "Scenario")]
        name: String,

        /// Growth model
        #[arg(short, long, value_enum)]
        model: Option<ModelKind>,

        /// Initial population
        #[arg(long)]
        n0: Option<f64>,

        /// Intrinsic growth rate
        #[arg(short, long)]
        rate: Option<f64>,

        /// Carrying capacity (logistic model)
        #[arg(short = 'k', long)]
        capacity: Option<f64>,

        #[command(flatten)]
        time: TimeArgs,
    },

    /// Evaluate the same parameters under both models side by side
    Compare {
        /// Initial population
        #[arg(long)]
        n0: Option<f64>,

        /// Intrinsic growth rate
        #[arg(short, long)]
        rate: Option<f64>,

        /// Carrying capacity for the logistic curve
        #[arg(short = 'k', long)]
        capacity: Option<f64>,

        #[command(flatten)]
        time: TimeArgs,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Start the HTTP API server
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a config file with the default settings
    Init {
        /// Output path
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("growth_explorer={level},growth_scenario_explorer={level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_table(path: &Path) -> Result<ScenarioTable> {
    let reader = io::reader_for(path)?;
    Ok(reader.read(path)?)
}

fn export_curves(evaluation: &ScenarioEvaluation, path: &Path, pretty: bool) -> Result<()> {
    let ext = io::extension(path);

    match ext.as_str() {
        "csv" => io::write_curves_csv(evaluation, path)?,
        "json" => io::write_curves_json(evaluation, path, pretty)?,
        _ => anyhow::bail!("Unsupported export format: .{ext}. Use .csv or .json"),
    }

    println!(
        "{} Exported {} curves -> {}",
        "Success:".green().bold(),
        evaluation.num_valid(),
        path.display()
    );
    Ok(())
}

fn show_results(evaluation: &ScenarioEvaluation, time: &TimeArgs) {
    print_summary_table(&summarize(evaluation));
    print_curve_table(evaluation, time.samples);
    if time.chart {
        print_line_chart(evaluation, CHART_WIDTH, CHART_HEIGHT);
    }
    print_issues(&evaluation.issues);
    println!();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ExplorerConfig::load(cli.config.as_deref())?;
    let defaults = config.defaults;

    match cli.command {
        Commands::Run {
            input,
            time,
            export,
            pretty,
            strict,
        } => {
            let table = match &input {
                Some(path) => load_table(path)?,
                None => ScenarioTable::seeded(&defaults),
            };
            let explorer = Explorer::new(time.apply(config.time))?;
            let tc = explorer.time_config();

            let source = input
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "default scenarios".to_string());
            println!(
                "\n{}",
                format!(
                    "Growth Scenarios: {source} (horizon {}, {} points)",
                    tc.horizon, tc.resolution
                )
                .bold()
                .cyan()
            );

            print_scenario_table(&table);
            let evaluation = explorer.evaluate(&table);

            if strict && evaluation.has_issues() {
                print_issues(&evaluation.issues);
                anyhow::bail!(
                    "{} invalid scenario row(s) in strict mode",
                    evaluation.num_skipped()
                );
            }

            show_results(&evaluation, &time);

            if let Some(path) = export {
                export_curves(&evaluation, &path, pretty)?;
            }
        }

        Commands::Simulate {
            name,
            model,
            n0,
            rate,
            capacity,
            time,
        } => {
            let model = model.unwrap_or(defaults.model);
            let row = ScenarioRow::new(
                name,
                model,
                n0.unwrap_or(defaults.n0),
                rate.unwrap_or(defaults.r),
                capacity.unwrap_or(defaults.k),
            );
            let explorer = Explorer::new(time.apply(config.time))?;
            let evaluation = explorer.evaluate_rows(&[row]);

            if evaluation.has_issues() {
                print_issues(&evaluation.issues);
                anyhow::bail!("Invalid scenario parameters");
            }

            println!(
                "\n{}",
                format!(
                    "Simulation: {model} over horizon {}",
                    explorer.time_config().horizon
                )
                .bold()
                .cyan()
            );
            show_results(&evaluation, &time);
        }

        Commands::Compare {
            n0,
            rate,
            capacity,
            time,
        } => {
            let n0 = n0.unwrap_or(defaults.n0);
            let r = rate.unwrap_or(defaults.r);
            let k = capacity.unwrap_or(defaults.k);
            let rows = [
                ScenarioRow::new("Exponential", ModelKind::Exponential, n0, r, k),
                ScenarioRow::new("Logistic", ModelKind::Logistic, n0, r, k),
            ];
            let explorer = Explorer::new(time.apply(config.time))?;
            let evaluation = explorer.evaluate_rows(&rows);

            if evaluation.has_issues() {
                print_issues(&evaluation.issues);
                anyhow::bail!("Invalid scenario parameters");
            }

            println!(
                "\n{}",
                format!("Model Comparison: N0={n0}, r={r}, K={k}")
                    .bold()
                    .cyan()
            );
            show_results(&evaluation, &time);
        }

        Commands::Config { action } => match action {
            ConfigAction::Init { output, force } => {
                if output.exists() && !force {
                    anyhow::bail!(
                        "{} already exists; pass --force to overwrite",
                        output.display()
                    );
                }
                ExplorerConfig::default().save(&output)?;
                println!(
                    "{} Wrote default config -> {}",
                    "Success:".green().bold(),
                    output.display()
                );
            }
            ConfigAction::Show => {
                print!("{}", config.to_toml_string()?);
            }
        },

        #[cfg(feature = "web")]
        Commands::Serve { port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(growth_scenario_explorer::web::start_server(port, config))?;
        }
    }

    Ok(())
}
