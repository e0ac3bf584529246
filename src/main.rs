use clap::{Parser, Subcommand};
use project_atlas_rs::{
    AtlasError, ClusterPlacer, DeviceSignals, EffectiveConnection, FilterState,
    JsonFilePreferences, MemoryPreferences, PreferenceStore, QualityProfile, QualityTier,
    ViewerConfig, build_project_tags_map, filter_projects, load_projects, markers_to_geojson,
    place_markers, set_quality_override,
};
use serde_json::json;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Cluster and filter research projects for the map viewer")]
struct Args {
    /// Viewer config JSON (cluster and camera settings)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print cluster offsets keyed by project id
    Cluster {
        /// Projects file (.csv or JSON)
        file: PathBuf,
    },

    /// Print marker positions as a GeoJSON FeatureCollection
    Markers {
        /// Projects file (.csv or JSON)
        file: PathBuf,
    },

    /// List projects passing the given filters
    Filter {
        /// Projects file (.csv or JSON)
        file: PathBuf,

        #[arg(long)]
        search: Option<String>,

        /// Theme tag; repeatable
        #[arg(long)]
        theme: Vec<String>,

        #[arg(long)]
        category: Vec<String>,

        #[arg(long)]
        year: Vec<i64>,

        #[arg(long)]
        product: Vec<String>,
    },

    /// Score device signals and print the renderer settings
    Quality {
        #[arg(long)]
        user_agent: Option<String>,

        #[arg(long)]
        threads: Option<u32>,

        /// Device memory in GB
        #[arg(long)]
        memory: Option<f64>,

        /// WebGL renderer string
        #[arg(long)]
        gpu: Option<String>,

        /// Effective connection type (slow-2g, 2g, 3g, 4g)
        #[arg(long)]
        connection: Option<String>,

        #[arg(long)]
        save_data: bool,

        /// Screen width in CSS pixels
        #[arg(long, default_value_t = 1920.0)]
        width: f64,

        /// Screen height in CSS pixels
        #[arg(long, default_value_t = 1080.0)]
        height: f64,

        #[arg(long, default_value_t = 1.0)]
        pixel_ratio: f64,

        #[arg(long)]
        reduced_motion: bool,

        /// Preferences file holding the quality override
        #[arg(long)]
        prefs: Option<PathBuf>,

        /// Store an override (low, medium, high) or clear it (auto)
        #[arg(long)]
        set_override: Option<String>,
    },
}

fn main() -> Result<(), AtlasError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => ViewerConfig::from_json_file(path)?,
        None => ViewerConfig::default(),
    };

    match args.command {
        Command::Cluster { file } => {
            let projects = load_projects(&file)?;
            let metadata = ClusterPlacer::new(config.cluster).place(&projects);
            info!(
                entries = metadata.len(),
                clusters = metadata.clusters().len(),
                "clustered projects"
            );
            println!("{}", serde_json::to_string_pretty(metadata.entries())?);
        }
        Command::Markers { file } => {
            let projects = load_projects(&file)?;
            let metadata = ClusterPlacer::new(config.cluster).place(&projects);
            let markers = place_markers(&projects, &metadata);
            println!("{}", serde_json::to_string_pretty(&markers_to_geojson(&markers))?);
        }
        Command::Filter {
            file,
            search,
            theme,
            category,
            year,
            product,
        } => {
            let projects = load_projects(&file)?;
            let tags_map = build_project_tags_map(&projects);

            let mut state = FilterState::new().search(search.unwrap_or_default());
            theme.into_iter().for_each(|t| state.toggle_tag(t));
            category.into_iter().for_each(|c| state.toggle_category(c));
            year.into_iter().for_each(|y| state.toggle_year(y));
            product.into_iter().for_each(|p| state.toggle_product(p));

            let matches = filter_projects(&projects, &state, &tags_map);
            info!(total = projects.len(), matched = matches.len(), "filtered projects");
            for project in matches {
                println!(
                    "{}\t{}",
                    project.id.as_deref().unwrap_or("-"),
                    project.name.as_deref().unwrap_or("")
                );
            }
        }
        Command::Quality {
            user_agent,
            threads,
            memory,
            gpu,
            connection,
            save_data,
            width,
            height,
            pixel_ratio,
            reduced_motion,
            prefs,
            set_override,
        } => {
            let mut signals = DeviceSignals::new()
                .screen(width, height, pixel_ratio)
                .connection(
                    connection.as_deref().and_then(EffectiveConnection::parse),
                    save_data,
                )
                .reduced_motion(reduced_motion);
            if let Some(ua) = user_agent.as_deref() {
                signals = signals.user_agent(ua, width.min(height));
            }
            if let Some(threads) = threads {
                signals = signals.hardware_threads(threads);
            }
            if let Some(memory) = memory {
                signals = signals.device_memory_gb(memory);
            }
            if let Some(gpu) = gpu.as_deref() {
                signals = signals.gpu_renderer(gpu);
            }

            let profile = QualityProfile::from_signals(&signals);
            let mut store: Box<dyn PreferenceStore> = match prefs {
                Some(path) => Box::new(JsonFilePreferences::open(path)?),
                None => Box::new(MemoryPreferences::new()),
            };

            if let Some(value) = set_override.as_deref() {
                let tier = match value {
                    "auto" => None,
                    other => Some(other.parse::<QualityTier>()?),
                };
                set_quality_override(&mut *store, tier)?;
            }

            let report = json!({
                "score": signals.score(),
                "profile": profile,
                "effectiveTier": profile.effective_tier(&*store),
                "settings": profile.settings(&*store),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
