//! gymtracky - Weekly gym routine tracker with an AI coach

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use gymtracky::coach::{
    self, ChatSession, CoachSettings, DEFAULT_API_BASE, DEFAULT_MODEL, GeminiClient,
    ImagePayload, SUGGEST_ERROR,
};
use gymtracky::config::{self, Preferences, Theme};
use gymtracky::exercises::{Difficulty, Equipment, LibraryFilter, MuscleGroup, filter_exercises};
use gymtracky::tui::App;

#[derive(Parser)]
#[command(name = "gymtracky")]
#[command(author, version, about = "Weekly gym routine tracker with an AI coach")]
struct Cli {
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Gemini model name
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL, global = true)]
    model: String,

    /// Gemini API base URL
    #[arg(long, env = "GEMINI_API_BASE", default_value = DEFAULT_API_BASE, global = true)]
    api_base: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open TUI dashboard
    Tui,

    /// Browse the exercise library
    Library {
        /// Chest, Back, Legs, Shoulders, Arms or Core
        #[arg(short, long)]
        muscle: Option<String>,

        /// Beginner, Intermediate or Advanced
        #[arg(short, long)]
        difficulty: Option<String>,

        /// Barbell, Dumbbell, Machine, Bodyweight or Kettlebell
        #[arg(short, long)]
        equipment: Option<String>,
    },

    /// Ask the AI for exercises matching a workout focus
    Suggest {
        /// Workout focus (e.g., "Legs")
        focus: String,
    },

    /// Ask the AI coach a question
    Ask {
        message: Vec<String>,
    },

    /// Web-grounded answer with sources
    Search {
        query: Vec<String>,
    },

    /// AI feedback on a photo of your form
    Feedback {
        /// Exercise shown in the photo
        exercise: String,

        /// Path to the image
        image: PathBuf,
    },

    /// Show or set the saved theme
    Theme {
        /// light or dark
        value: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let interactive = matches!(cli.command, None | Some(Commands::Tui));
    init_logging(interactive);

    let client = GeminiClient::new(CoachSettings {
        api_key: cli.api_key,
        model: cli.model,
        base_url: cli.api_base,
    });

    match cli.command {
        Some(Commands::Tui) | None => {
            let prefs = Preferences::open_default()
                .inspect_err(|e| warn!("Theme preference unavailable: {:#}", e))
                .ok();
            let mut app = App::new(client, prefs);
            tokio::task::block_in_place(|| app.run())?;
        }

        Some(Commands::Library { muscle, difficulty, equipment }) => {
            let filter = LibraryFilter {
                muscle_group: muscle
                    .map(|m| MuscleGroup::parse(&m).with_context(|| format!("unknown muscle group '{m}'")))
                    .transpose()?,
                difficulty: difficulty
                    .map(|d| Difficulty::parse(&d).with_context(|| format!("unknown difficulty '{d}'")))
                    .transpose()?,
                equipment: equipment
                    .map(|e| Equipment::parse(&e).with_context(|| format!("unknown equipment '{e}'")))
                    .transpose()?,
            };

            let exercises = filter_exercises(&filter);
            if exercises.is_empty() {
                println!("No exercises match your filters.");
            }
            for ex in exercises {
                println!(
                    "{:20} | {:10} | {:12} | {}",
                    ex.name,
                    ex.muscle_group.name(),
                    ex.difficulty.name(),
                    ex.equipment.name()
                );
            }
        }

        Some(Commands::Suggest { focus }) => match client.suggest_exercises(&focus).await {
            Ok(suggestions) => {
                println!("Suggested exercises for {}:", focus);
                for (i, name) in suggestions.iter().enumerate() {
                    println!("  {}. {}", i + 1, name);
                }
            }
            Err(e) => {
                warn!("Error fetching suggestions: {}", e);
                eprintln!("{}", SUGGEST_ERROR);
            }
        },

        Some(Commands::Ask { message }) => {
            let mut chat = ChatSession::new(client);
            let reply = coach::reply_or_fallback(chat.send(&message.join(" ")).await);
            println!("{}", reply);
        }

        Some(Commands::Search { query }) => {
            let result = coach::search_or_fallback(client.grounded_search(&query.join(" ")).await);
            println!("{}", result.text);
            if !result.sources.is_empty() {
                println!("\nSources:");
                for (i, source) in result.sources.iter().enumerate() {
                    println!("  {}. {} <{}>", i + 1, source.label(), source.uri);
                }
            }
        }

        Some(Commands::Feedback { exercise, image }) => {
            let payload = ImagePayload::from_path(&image)
                .await
                .with_context(|| format!("reading {}", image.display()))?;
            let feedback = coach::feedback_or_fallback(client.form_feedback(&exercise, &payload).await);
            println!("Form feedback for {}:\n\n{}", exercise, feedback);
        }

        Some(Commands::Theme { value }) => {
            let prefs = Preferences::open_default()?;
            match value {
                Some(value) => {
                    let theme: Theme = value.parse()?;
                    prefs.save_theme(theme)?;
                    println!("Theme set to {} ({})", theme, prefs.path().display());
                }
                None => println!("{}", prefs.load_theme()),
            }
        }
    }

    Ok(())
}

/// The TUI owns the terminal, so it logs to a file; everything else logs to stderr
fn init_logging(to_file: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if !to_file {
        builder.with_writer(std::io::stderr).init();
        return;
    }

    let file = config::log_file_path().and_then(|path| {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).ok()?;
        }
        OpenOptions::new().create(true).append(true).open(path).ok()
    });
    match file {
        Some(file) => builder.with_ansi(false).with_writer(Mutex::new(file)).init(),
        None => builder.with_writer(std::io::sink).init(),
    }
}
