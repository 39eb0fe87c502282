use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use mcdm_engine::analysis::{self, Comparison, SensitivityReport};
use mcdm_engine::config::{Config, ConfigOverrides};
use mcdm_engine::output::csv::{comparison_to_csv, ranking_to_csv, weights_to_csv};
use mcdm_engine::output::render_json;
use mcdm_engine::output::table::{
    render_comparison_table, render_methods_table, render_ranking_table,
    render_sensitivity_table, render_weights_table,
};
use mcdm_engine::ranking::{self, ParamOverrides, RankMethod, RankingParams, RankingResult};
use mcdm_engine::server::run_server;
use mcdm_engine::types::{catalog, Problem};
use mcdm_engine::weighting::{WeightMethod, WeightResult};
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "mcdm",
    about = "Multi-criteria decision making: weight criteria and rank alternatives"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    /// Decimal places for table and CSV output.
    #[arg(long)]
    decimals: Option<usize>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Args, Clone, Default)]
struct ParamArgs {
    #[arg(long = "vikor-v")]
    vikor_v: Option<f64>,
    #[arg(long = "waspas-lambda")]
    waspas_lambda: Option<f64>,
    #[arg(long = "codas-tau")]
    codas_tau: Option<f64>,
    #[arg(long = "gra-zeta")]
    gra_zeta: Option<f64>,
    #[arg(long = "todim-theta")]
    todim_theta: Option<f64>,
}

impl From<&ParamArgs> for ParamOverrides {
    fn from(value: &ParamArgs) -> Self {
        Self {
            vikor_v: value.vikor_v,
            waspas_lambda: value.waspas_lambda,
            codas_tau: value.codas_tau,
            gra_zeta: value.gra_zeta,
            todim_theta: value.todim_theta,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the supported weighting and ranking methods.
    Methods,
    Weigh {
        #[arg(long)]
        method: String,
        #[arg(long)]
        input: PathBuf,
    },
    Rank {
        #[arg(long)]
        method: String,
        #[arg(long)]
        input: PathBuf,
        /// Weighting method to apply before ranking.
        #[arg(long)]
        weights: Option<String>,
        #[command(flatten)]
        params: ParamArgs,
    },
    Compare {
        #[arg(long, value_delimiter = ',', required = true)]
        methods: Vec<String>,
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        weights: Option<String>,
        #[command(flatten)]
        params: ParamArgs,
    },
    Sensitivity {
        #[arg(long)]
        method: String,
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        weights: Option<String>,
        /// Weight variation percentages, e.g. -20,-10,0,10,20.
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        variations: Option<Vec<f64>>,
        #[command(flatten)]
        params: ParamArgs,
    },
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[derive(Debug, Serialize)]
struct Weighted<'a, T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    weights: Option<&'a WeightResult>,
    result: &'a T,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    let (host, port, variations) = match &cli.command {
        Commands::Serve { host, port } => (host.clone(), *port, None),
        Commands::Sensitivity { variations, .. } => (None, None, variations.clone()),
        _ => (None, None, None),
    };
    config.apply_overrides(ConfigOverrides {
        variations,
        host,
        port,
        decimals: cli.decimals,
    });
    let decimals = config.output.decimals;

    match &cli.command {
        Commands::Config { init, show } => {
            if *init {
                Config::write_template(&config_path)?;
                println!("Wrote config template to {}", config_path.display());
            }
            if *show || !*init {
                println!("{}", render_json(&config)?);
            }
        }
        Commands::Serve { .. } => {
            let bind = format!("{}:{}", config.server.host, config.server.port);
            let addr: SocketAddr = bind
                .parse()
                .map_err(|e| anyhow!("invalid bind address {bind}: {e}"))?;
            run_server(config, addr).await?;
        }
        Commands::Methods => {
            let catalog = catalog();
            match cli.output {
                OutputFormat::Table => println!("{}", render_methods_table(&catalog)),
                OutputFormat::Json => println!("{}", render_json(&catalog)?),
                OutputFormat::Csv => {
                    warn!("CSV output for methods not implemented, using JSON");
                    println!("{}", render_json(&catalog)?);
                }
            }
        }
        Commands::Weigh { method, input } => {
            let problem = load_problem(input)?;
            let method: WeightMethod = method.parse()?;
            let result = problem
                .weights(method)
                .with_context(|| format!("{method} weighting failed"))?;
            print_weights(&result, &problem, cli.output, decimals)?;
        }
        Commands::Rank {
            method,
            input,
            weights,
            params,
        } => {
            let problem = load_problem(input)?;
            let method: RankMethod = method.parse()?;
            let params = ranking_params(&config, &problem, params)?;
            let (matrix, weight_result) = problem.prepare(parse_weighting(weights.as_deref())?)?;
            let result = ranking::rank(method, &matrix, &params)
                .with_context(|| format!("{method} ranking failed"))?;
            print_ranking(&result, weight_result.as_ref(), &problem, cli.output, decimals)?;
        }
        Commands::Compare {
            methods,
            input,
            weights,
            params,
        } => {
            let problem = load_problem(input)?;
            let methods = parse_method_list(methods)?;
            let params = ranking_params(&config, &problem, params)?;
            let (matrix, weight_result) = problem.prepare(parse_weighting(weights.as_deref())?)?;
            let comparison = analysis::compare(&matrix, &methods, &params).await?;
            print_comparison(&comparison, weight_result.as_ref(), cli.output, decimals)?;
        }
        Commands::Sensitivity {
            method,
            input,
            weights,
            params,
            ..
        } => {
            let problem = load_problem(input)?;
            let method: RankMethod = method.parse()?;
            let params = ranking_params(&config, &problem, params)?;
            let (matrix, _) = problem.prepare(parse_weighting(weights.as_deref())?)?;
            let report =
                analysis::sensitivity(method, &matrix, &params, &config.sensitivity.variations)?;
            print_sensitivity(&report, cli.output, decimals)?;
        }
    }

    Ok(())
}

fn load_problem(path: &Path) -> Result<Problem> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed reading input: {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("failed parsing input JSON: {}", path.display()))
}

/// Config file, then the input file, then command-line flags.
fn ranking_params(config: &Config, problem: &Problem, args: &ParamArgs) -> Result<RankingParams> {
    let params = config
        .ranking
        .params()
        .with_overrides(&problem.ranking)
        .with_overrides(&ParamOverrides::from(args));
    params.validate()?;
    Ok(params)
}

fn parse_weighting(raw: Option<&str>) -> Result<Option<WeightMethod>> {
    Ok(raw.map(str::parse::<WeightMethod>).transpose()?)
}

fn parse_method_list(raw: &[String]) -> Result<Vec<RankMethod>> {
    let mut out = Vec::new();
    for piece in raw {
        let trimmed = piece.trim();
        if trimmed.is_empty() {
            continue;
        }
        out.push(trimmed.parse::<RankMethod>()?);
    }
    if out.is_empty() {
        return Err(anyhow!("method list is empty"));
    }
    Ok(out)
}

fn print_weights(
    result: &WeightResult,
    problem: &Problem,
    format: OutputFormat,
    decimals: usize,
) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_weights_table(result, &problem.criteria, decimals)),
        OutputFormat::Json => println!("{}", render_json(result)?),
        OutputFormat::Csv => print!("{}", weights_to_csv(result, &problem.criteria, decimals)?),
    }
    Ok(())
}

fn print_ranking(
    result: &RankingResult,
    weights: Option<&WeightResult>,
    problem: &Problem,
    format: OutputFormat,
    decimals: usize,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            if let Some(weights) = weights {
                println!("{}", render_weights_table(weights, &problem.criteria, decimals));
            }
            println!("{}", render_ranking_table(result, decimals));
        }
        OutputFormat::Json => println!("{}", render_json(&Weighted { weights, result })?),
        OutputFormat::Csv => print!("{}", ranking_to_csv(result, decimals)?),
    }
    Ok(())
}

fn print_comparison(
    comparison: &Comparison,
    weights: Option<&WeightResult>,
    format: OutputFormat,
    decimals: usize,
) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_comparison_table(comparison, decimals)),
        OutputFormat::Json => println!(
            "{}",
            render_json(&Weighted {
                weights,
                result: comparison
            })?
        ),
        OutputFormat::Csv => print!("{}", comparison_to_csv(comparison, decimals)?),
    }
    Ok(())
}

fn print_sensitivity(report: &SensitivityReport, format: OutputFormat, decimals: usize) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_sensitivity_table(report, decimals)),
        OutputFormat::Json => println!("{}", render_json(report)?),
        OutputFormat::Csv => {
            warn!("CSV output for sensitivity not implemented, using JSON");
            println!("{}", render_json(report)?);
        }
    }
    Ok(())
}
