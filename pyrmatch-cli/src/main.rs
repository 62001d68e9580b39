use clap::Parser;
use pyrmatch::io::load_gray_image;
use pyrmatch::{
    CpuKernel, Match, MatchMethod, Matcher, MaxLevel, SearchConfig, SearchRegion, SearchState,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "PyrMatch CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum MethodConfig {
    Sqdiff,
    SqdiffNormed,
    Ccorr,
    CcorrNormed,
    Ccoeff,
    CcoeffNormed,
}

impl From<MethodConfig> for MatchMethod {
    fn from(value: MethodConfig) -> Self {
        match value {
            MethodConfig::Sqdiff => MatchMethod::SumSquaredDifference,
            MethodConfig::SqdiffNormed => MatchMethod::SumSquaredDifferenceNormalized,
            MethodConfig::Ccorr => MatchMethod::CrossCorrelation,
            MethodConfig::CcorrNormed => MatchMethod::CrossCorrelationNormalized,
            MethodConfig::Ccoeff => MatchMethod::CorrelationCoefficient,
            MethodConfig::CcoeffNormed => MatchMethod::CorrelationCoefficientNormalized,
        }
    }
}

/// `"auto"` or an explicit level.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MaxLevelConfig {
    Named(AutoLevel),
    Fixed(usize),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum AutoLevel {
    Auto,
}

impl From<MaxLevelConfig> for MaxLevel {
    fn from(value: MaxLevelConfig) -> Self {
        match value {
            MaxLevelConfig::Named(AutoLevel::Auto) => MaxLevel::Auto,
            MaxLevelConfig::Fixed(level) => MaxLevel::Fixed(level),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SearchConfigJson {
    method: MethodConfig,
    weak_threshold: f32,
    strict_threshold: f32,
    max_level: MaxLevelConfig,
    search_level_zero: bool,
    parallel: bool,
}

impl Default for SearchConfigJson {
    fn default() -> Self {
        let cfg = SearchConfig::default();
        Self {
            method: MethodConfig::CcoeffNormed,
            weak_threshold: cfg.weak_threshold,
            strict_threshold: cfg.strict_threshold,
            max_level: MaxLevelConfig::Named(AutoLevel::Auto),
            search_level_zero: cfg.search_level_zero,
            parallel: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RegionJson {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    scene_path: String,
    template_path: String,
    output_path: Option<String>,
    region: Option<RegionJson>,
    search: SearchConfigJson,
}

#[derive(Debug, Serialize)]
struct MatchRecord {
    x: usize,
    y: usize,
    score: f32,
    level: usize,
}

impl From<Match> for MatchRecord {
    fn from(value: Match) -> Self {
        Self {
            x: value.x,
            y: value.y,
            score: value.score,
            level: value.level,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    found: bool,
    best: Option<MatchRecord>,
    start_level: usize,
    state: &'static str,
}

fn state_name(state: &SearchState) -> &'static str {
    match state {
        SearchState::Searching { .. } => "searching",
        SearchState::Tracking { .. } => "tracking",
        SearchState::Escalated { .. } => "escalated",
        SearchState::Lost { .. } => "lost",
        SearchState::Exhausted { .. } => "exhausted",
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("pyrmatch=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.scene_path.is_empty() || config.template_path.is_empty() {
        return Err("scene_path and template_path must be set in the config".into());
    }

    let scene = load_gray_image(&config.scene_path)?;
    let template = load_gray_image(&config.template_path)?;

    let kernel = if config.search.parallel {
        CpuKernel::parallel()
    } else {
        CpuKernel::new()
    };
    let matcher = Matcher::with_kernel(kernel).with_config(SearchConfig {
        method: config.search.method.into(),
        weak_threshold: config.search.weak_threshold,
        strict_threshold: config.search.strict_threshold,
        max_level: config.search.max_level.into(),
        search_level_zero: config.search.search_level_zero,
    });

    let (scene_view, offset) = match &config.region {
        Some(r) => {
            let region = SearchRegion::new(r.x, r.y, r.width, r.height);
            (scene.view().region(&region)?, region.origin())
        }
        None => (scene.view(), Default::default()),
    };
    let outcome = matcher.search(scene_view, template.view())?;
    let best = outcome.matched.map(|m| {
        MatchRecord::from(Match {
            x: m.x + offset.x,
            y: m.y + offset.y,
            ..m
        })
    });
    let output = Output {
        found: best.is_some(),
        best,
        start_level: outcome.start_level,
        state: state_name(&outcome.state),
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
