mod config;
mod output;
mod project;

use ahp_core::{
    aggregate_judgment_sets, analyze, AggregationMethod, AhpError, AnalysisOptions,
    CollaborationStatus, EigenNormalization, MissingJudgments, ScaleFamily, WeightMethod,
};
use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::Level;

use crate::config::AhpConfig;
use crate::project::ProjectFile;

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "ahp", version, about = "Rank alternatives with the Analytic Hierarchy Process")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Rank alternatives from one judge's pairwise judgments
    Rank(RankArgs),
    /// Pool several experts' judgments into one group ranking
    Aggregate(AggregateArgs),
    /// Show the ratios, gradations and widths of a scale family
    Scale(ScaleArgs),
    /// Create a default config file at ~/.config/ahp/config.toml
    Init,
}

#[derive(Parser)]
struct RankArgs {
    /// Project file (TOML, or JSON if it starts with '{')
    #[arg(long)]
    project: PathBuf,

    /// Weight method: "eigenvector" or "geometric-mean"
    #[arg(long)]
    method: Option<String>,

    /// Eigenvector normalization: "absolute" or "plain"
    #[arg(long)]
    normalization: Option<String>,

    /// Fail if any pair has no judgment instead of assuming indifference
    #[arg(long)]
    strict: bool,

    /// Scale family for graded judgments (overrides the project file)
    #[arg(long)]
    scale: Option<String>,

    /// Output JSON instead of table
    #[arg(long)]
    json: bool,

    /// Log pipeline details to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Path to config file (default: ~/.config/ahp/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser)]
struct AggregateArgs {
    /// Project file with an `experts` list
    #[arg(long)]
    project: PathBuf,

    /// Aggregation method. Only "AIJ" is supported.
    #[arg(long)]
    method: Option<String>,

    /// Scale family for graded judgments (overrides the project file)
    #[arg(long)]
    scale: Option<String>,

    /// Output JSON instead of table
    #[arg(long)]
    json: bool,

    /// Log pipeline details to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Path to config file (default: ~/.config/ahp/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser)]
struct ScaleArgs {
    /// Scale family: integer, balanced, power, ma-zheng, donegan (or 1..5)
    #[arg(long, default_value = "integer")]
    family: String,

    /// Number of gradations (clamped to 3..9)
    #[arg(long, default_value_t = 9)]
    gradations: usize,

    /// Output JSON instead of table
    #[arg(long)]
    json: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_or_bail<T: FromStr<Err = AhpError>>(value: &str) -> T {
    value.parse().unwrap_or_else(|e: AhpError| bail(e))
}

fn load_config(path: Option<PathBuf>) -> AhpConfig {
    let config_path = path.unwrap_or_else(config::config_path);
    config::load_config(&config_path)
}

/// CLI flag, then project file, then config, then the integer scale.
fn resolve_scale(cli: Option<&str>, project: &ProjectFile, cfg: &AhpConfig) -> ScaleFamily {
    cli.or(project.scale.as_deref())
        .or(cfg.scale.as_deref())
        .map(parse_or_bail)
        .unwrap_or_default()
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Rank(args) => run_rank(args),
        Commands::Aggregate(args) => run_aggregate(args),
        Commands::Scale(args) => run_scale(args),
        Commands::Init => {
            let path = config::create_default_config();
            println!("Created config at {}", path.display());
            println!("Edit it to set your default method, scale, etc.");
        }
    }
}

fn run_rank(args: RankArgs) {
    init_logging(args.verbose);

    // Load config file, merge with CLI args (CLI wins)
    let cfg = load_config(args.config.clone());
    let project = project::load_project(&args.project);

    let normalization: EigenNormalization = args
        .normalization
        .as_deref()
        .or(cfg.normalization.as_deref())
        .map(parse_or_bail)
        .unwrap_or_default();
    let method = match args
        .method
        .as_deref()
        .or(cfg.method.as_deref())
        .map(parse_or_bail)
        .unwrap_or_default()
    {
        WeightMethod::Eigenvector(_) => WeightMethod::Eigenvector(normalization),
        WeightMethod::GeometricMean => {
            if args.normalization.is_some() {
                eprintln!("Warning: --normalization has no effect with the geometric-mean method.");
            }
            WeightMethod::GeometricMean
        }
    };
    let missing = if args.strict || cfg.strict.unwrap_or(false) {
        MissingJudgments::Strict
    } else {
        MissingJudgments::Indifference
    };
    let family = resolve_scale(args.scale.as_deref(), &project, &cfg);

    let set = project.single_judge_set(family).unwrap_or_else(|e| bail(e));
    if !project.experts.is_empty() && set.is_empty() {
        bail("Project has only expert judgments. Use `ahp aggregate` to rank it.");
    }

    tracing::debug!(
        title = project.title.as_deref().unwrap_or("untitled"),
        alternatives = project.num_alternatives(),
        judgments = set.len(),
        required = set.required_count(),
        scale = %family,
        "loaded project"
    );
    if !set.is_complete() && missing == MissingJudgments::Indifference {
        for (i, j) in set.missing_pairs() {
            tracing::warn!(
                a = %project.alternatives[i],
                b = %project.alternatives[j],
                "no judgment for pair, assuming equal importance"
            );
        }
    }

    let options = AnalysisOptions { method, missing };
    let result = analyze(project.num_alternatives(), &set.to_vec(), &options)
        .unwrap_or_else(|e| bail(e));

    let method_name = method.to_string();
    if args.json {
        output::print_analysis_json(&result, &project.alternatives, &method_name);
    } else {
        output::print_analysis_table(&result, &project.alternatives, &method_name);
    }
}

fn run_aggregate(args: AggregateArgs) {
    init_logging(args.verbose);

    let cfg = load_config(args.config.clone());
    let project = project::load_project(&args.project);

    let method: AggregationMethod = args
        .method
        .as_deref()
        .or(cfg.aggregation.as_deref())
        .map(parse_or_bail)
        .unwrap_or_default();
    if method != AggregationMethod::Aij {
        bail(AhpError::UnsupportedMethod(format!(
            "{method} (only AIJ is currently supported)"
        )));
    }

    let family = resolve_scale(args.scale.as_deref(), &project, &cfg);
    let sets = project.expert_sets(family).unwrap_or_else(|e| bail(e));
    if sets.is_empty() {
        bail(format!(
            "No experts in {}. Add an `experts` list to aggregate.",
            args.project.display()
        ));
    }

    let completed = sets.values().filter(|s| s.is_complete()).count();
    for (id, set) in &sets {
        let status = CollaborationStatus::evaluate(set.is_complete(), completed, sets.len());
        tracing::debug!(
            expert = id,
            judgments = set.len(),
            required = set.required_count(),
            ?status,
            "expert status"
        );
        if !set.is_complete() {
            tracing::warn!(
                expert = %project.expert_name(*id),
                have = set.len(),
                need = set.required_count(),
                "expert has not finished, leaving them out of the group result"
            );
        }
    }

    let result = aggregate_judgment_sets(project.num_alternatives(), &sets)
        .unwrap_or_else(|e| bail(e));
    let expert_names: Vec<String> = result
        .individual
        .iter()
        .map(|e| project.expert_name(e.expert_id))
        .collect();

    if args.json {
        output::print_aggregation_json(&result, &project.alternatives, &expert_names);
    } else {
        output::print_aggregation_table(&result, &project.alternatives, &expert_names);
    }
}

fn run_scale(args: ScaleArgs) {
    let family: ScaleFamily = parse_or_bail(&args.family);
    if args.json {
        output::print_scale_json(family, args.gradations);
    } else {
        output::print_scale_table(family, args.gradations);
    }
}
