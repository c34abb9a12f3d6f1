//! Draft Recommendation CLI
//!
//! Trains the win classifier from a historical games table and serves
//! win-rate predictions and pick/ban recommendations.

use clap::{Parser, Subcommand};
use draftrec::{Config, Result};

#[derive(Parser)]
#[command(name = "draftrec")]
#[command(about = "Hero draft win-rate prediction and pick/ban recommendation", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Data management commands
    Data {
        #[command(subcommand)]
        action: DataCommands,
    },
    /// Train the win classifier and derive the statistic matrices
    Train {
        /// Override number of epochs
        #[arg(long)]
        epochs: Option<usize>,
        /// Override learning rate
        #[arg(long)]
        lr: Option<f64>,
    },
    /// Predict the win probability for a draft state
    Predict {
        #[command(flatten)]
        draft: DraftArgs,
        /// Team to report the probability for
        #[arg(long, default_value = "team1")]
        team: draftrec::Team,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Recommend the next pick or ban
    Recommend {
        #[command(subcommand)]
        action: RecommendCommands,
    },
    /// Initialize a new project with default config
    Init,
}

#[derive(Subcommand)]
enum DataCommands {
    /// Show games table status
    Status,
}

#[derive(Subcommand)]
enum RecommendCommands {
    /// Recommend the next pick for a team
    Pick {
        #[command(flatten)]
        draft: DraftArgs,
        /// Team to recommend for
        #[arg(long, default_value = "team1")]
        team: draftrec::Team,
        /// Number of recommendations
        #[arg(long, default_value = "5")]
        top_k: usize,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Recommend the next ban for a team
    Ban {
        #[command(flatten)]
        draft: DraftArgs,
        /// Team the ban should benefit
        #[arg(long, default_value = "team1")]
        team: draftrec::Team,
        /// Number of recommendations
        #[arg(long, default_value = "5")]
        top_k: usize,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
}

/// Draft state passed as comma-separated hero lists
#[derive(clap::Args)]
struct DraftArgs {
    /// Team1 picks in draft order (comma-separated)
    #[arg(long, default_value = "")]
    t1_picks: String,
    /// Team2 picks in draft order (comma-separated)
    #[arg(long, default_value = "")]
    t2_picks: String,
    /// Team1 bans (comma-separated)
    #[arg(long, default_value = "")]
    t1_bans: String,
    /// Team2 bans (comma-separated)
    #[arg(long, default_value = "")]
    t2_bans: String,
}

impl DraftArgs {
    fn to_state(&self) -> draftrec::DraftState {
        use draftrec::data::loader::parse_list_field;
        draftrec::DraftState {
            team1_picks: parse_list_field(&self.t1_picks),
            team2_picks: parse_list_field(&self.t2_picks),
            team1_bans: parse_list_field(&self.t1_bans),
            team2_bans: parse_list_field(&self.t2_bans),
        }
    }
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use table or json.", s)),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    // Run command
    let result = match cli.command {
        Commands::Data { action } => match action {
            DataCommands::Status => commands::data_status(&config),
        },
        Commands::Train { epochs, lr } => commands::train(&config, epochs, lr),
        Commands::Predict {
            draft,
            team,
            format,
        } => commands::predict(&config, &draft.to_state(), team, format),
        Commands::Recommend { action } => match action {
            RecommendCommands::Pick {
                draft,
                team,
                top_k,
                format,
            } => commands::recommend(&config, &draft.to_state(), team, top_k, false, format),
            RecommendCommands::Ban {
                draft,
                team,
                top_k,
                format,
            } => commands::recommend(&config, &draft.to_state(), team, top_k, true, format),
        },
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use burn::backend::{Autodiff, NdArray};
    use draftrec::data::{loader, HeroRegistry};
    use draftrec::features::stats::StatsArtifact;
    use draftrec::features::DraftStatistics;
    use draftrec::model::{WinClassifier, WinModelConfig};
    use draftrec::predict::DraftEngine;
    use draftrec::training::{DraftDataset, WinTrainer};
    use draftrec::{DraftState, Recommendation, Team};

    type ServeBackend = NdArray<f32>;
    type TrainBackend = Autodiff<ServeBackend>;

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        std::fs::create_dir_all("data")?;
        std::fs::create_dir_all("model")?;
        println!("Created data/ and model/ directories");

        println!("\nNext steps:");
        println!("  1. Edit {} to customize settings", config_path);
        println!("  2. Put the games table at data/games.csv");
        println!("  3. Run 'draftrec train' to train the model");
        println!("  4. Run 'draftrec recommend pick --team team1' during a draft");

        Ok(())
    }

    pub fn data_status(config: &Config) -> Result<()> {
        let (records, stats) = loader::load_games(&config.data.games_path)?;
        let registry = HeroRegistry::build(&records);

        println!("Games Table Status");
        println!("───────────────────────────────");
        println!("  Path:     {}", config.data.games_path);
        println!("  Rows:     {}", stats.total_rows);
        println!("  Usable:   {}", stats.usable);
        println!("  Dropped:  {}", stats.dropped);
        println!("  Heroes:   {}", registry.len());

        Ok(())
    }

    pub fn train(config: &Config, epochs: Option<usize>, lr: Option<f64>) -> Result<()> {
        let mut training_config = config.training.clone();
        if let Some(e) = epochs {
            training_config.epochs = e;
        }
        if let Some(lr) = lr {
            training_config.learning_rate = lr;
        }

        println!("Loading games from {}...", config.data.games_path);
        let (records, _) = loader::load_games(&config.data.games_path)?;

        println!("Building hero registry...");
        let registry = HeroRegistry::build(&records);
        println!("  {} heroes", registry.len());

        println!("Computing counter/synergy matrices (alpha={})...", config.stats.alpha);
        let stats = DraftStatistics::compute(&records, &registry, config.stats.alpha);

        println!("Encoding {} games...", records.len());
        let dataset = DraftDataset::from_records(&records, &registry, &stats);
        println!("  feature dimension {}", dataset.dim());

        let device = Default::default();
        let trainer = WinTrainer::<TrainBackend>::new(device, training_config);
        let model_config = WinModelConfig::from_model_config(dataset.dim(), &config.model);

        println!("\nStarting training...\n");
        let (model, report) = trainer.train(&dataset, model_config)?;

        if let Some(parent) = std::path::Path::new(&config.data.model_path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        println!("Saving model to {}...", config.data.model_path);
        model.save(&config.data.model_path)?;

        println!("Saving statistics to {}...", config.data.stats_path);
        StatsArtifact::new(&registry, &stats).save(&config.data.stats_path)?;

        println!("\nTraining complete!");
        println!("  {}", report);

        Ok(())
    }

    /// Reconstruct the serving engine from the persisted artifacts
    fn load_engine(config: &Config) -> Result<DraftEngine<WinClassifier<ServeBackend>>> {
        let (registry, stats) = StatsArtifact::load(&config.data.stats_path)?.into_parts();

        let input_dim = 6 * registry.len() + 4;
        let model_config = WinModelConfig::from_model_config(input_dim, &config.model);
        let device = Default::default();
        let classifier = WinClassifier::load(device, &config.data.model_path, model_config)?;

        let engine = DraftEngine::new(registry, stats, classifier);
        log::debug!("Serving engine loaded: {} heroes", engine.registry().len());
        Ok(engine)
    }

    pub fn predict(
        config: &Config,
        state: &DraftState,
        team: Team,
        format: OutputFormat,
    ) -> Result<()> {
        let engine = load_engine(config)?;
        let winrate = engine.predict_winrate(state, team);

        match format {
            OutputFormat::Table => {
                println!("Predicted win rate for {}: {:.1}%", team, winrate * 100.0);
            }
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "team": format!("{}", team),
                    "winrate": winrate,
                });
                println!("{}", serde_json::to_string_pretty(&json).unwrap());
            }
        }

        Ok(())
    }

    pub fn recommend(
        config: &Config,
        state: &DraftState,
        team: Team,
        top_k: usize,
        ban: bool,
        format: OutputFormat,
    ) -> Result<()> {
        let engine = load_engine(config)?;

        let recommendations = if ban {
            engine.recommend_ban(state, team, top_k)
        } else {
            engine.recommend_pick(state, team, top_k)
        };

        if recommendations.is_empty() {
            println!("No heroes available to recommend");
            return Ok(());
        }

        let label = if ban { "priority" } else { "win rate" };
        print_recommendations(&recommendations, label, format);

        Ok(())
    }

    fn print_recommendations(recs: &[Recommendation], label: &str, format: OutputFormat) {
        match format {
            OutputFormat::Table => {
                println!("{:>4}  {:<24} {}", "#", "hero", label);
                println!("{}", "-".repeat(42));
                for (i, rec) in recs.iter().enumerate() {
                    println!("{:>4}  {:<24} {:.1}%", i + 1, rec.hero, rec.score * 100.0);
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(recs).unwrap());
            }
        }
    }
}
