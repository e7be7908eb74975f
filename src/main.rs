use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{ArgGroup, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use playlister::{
    db::MemoryStore,
    generation_id::GenerationId,
    models::{GenerationRequest, QuizAnswer, SongId, UserId},
    services::{PlaylistService, QuizService, SongCatalog},
    AppError, Config,
};

#[derive(Parser, Debug)]
#[clap(about = "Build house-music playlists from quiz feedback")]
struct CliArgs {
    /// Catalog JSON file, overrides PLAYLISTER_CATALOG_PATH
    #[clap(long)]
    catalog: Option<PathBuf>,

    /// Feedback JSON file, overrides PLAYLISTER_FEEDBACK_PATH
    #[clap(long)]
    feedback: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a ranked playlist preview for a user
    Generate {
        #[clap(long)]
        user: u64,

        #[clap(long, default_value_t = 20)]
        count: usize,

        #[clap(long)]
        subgenre: Option<String>,

        /// Seed song id
        #[clap(long, conflicts_with = "seed_title")]
        seed_song: Option<u64>,

        /// Seed song looked up by partial title
        #[clap(long)]
        seed_title: Option<String>,

        /// Fixed RNG seed for reproducible tie-breaking
        #[clap(long)]
        rng_seed: Option<u64>,

        /// Generation id to tag logs and output with
        #[clap(long)]
        generation_id: Option<String>,
    },
    /// Print quiz songs for a user, unrated songs first
    Quiz {
        #[clap(long)]
        user: u64,

        #[clap(long)]
        n: Option<usize>,

        #[clap(long)]
        rng_seed: Option<u64>,
    },
    /// Record one quiz answer and write it to the feedback file
    #[clap(group(ArgGroup::new("verdict").required(true).args(["like", "dislike", "skip"])))]
    Answer {
        #[clap(long)]
        user: u64,

        #[clap(long)]
        song: u64,

        #[clap(long)]
        like: bool,

        #[clap(long)]
        dislike: bool,

        #[clap(long)]
        skip: bool,
    },
    /// List catalog songs matching a title/artist query and subgenre
    Search {
        #[clap(long)]
        query: Option<String>,

        #[clap(long)]
        subgenre: Option<String>,
    },
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Exit status for requests the caller got wrong, as opposed to failures
const EXIT_CLIENT_ERROR: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,playlister=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(CliArgs::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            let client_error = e
                .downcast_ref::<AppError>()
                .map_or(false, AppError::is_client_error);
            if client_error {
                ExitCode::from(EXIT_CLIENT_ERROR)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(args: CliArgs) -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let catalog_path = args
        .catalog
        .unwrap_or_else(|| PathBuf::from(&config.catalog_path));
    let feedback_path = args
        .feedback
        .unwrap_or_else(|| PathBuf::from(&config.feedback_path));

    let store = Arc::new(
        MemoryStore::load(&catalog_path, &feedback_path)
            .await
            .with_context(|| format!("Failed to load catalog {}", catalog_path.display()))?,
    );

    let output = match args.command {
        Command::Generate {
            user,
            count,
            subgenre,
            seed_song,
            seed_title,
            rng_seed,
            generation_id,
        } => {
            let seed = match (seed_song, seed_title) {
                (Some(id), _) => Some(SongId(id)),
                (None, Some(title)) => {
                    let song = store
                        .find_by_title(&title)
                        .await?
                        .with_context(|| format!("No song found matching '{}'", title))?;
                    Some(song.id)
                }
                (None, None) => None,
            };

            let mut request = GenerationRequest::new(UserId(user), count);
            request.subgenre = subgenre;
            request.seed_song_id = seed;

            let service = PlaylistService::new(store.clone(), store.clone(), &config);
            let preview = service
                .generate_preview_with_id(
                    GenerationId::parse_or_new(generation_id.as_deref()),
                    request,
                    &mut make_rng(rng_seed),
                )
                .await?;
            serde_json::to_string_pretty(&preview)?
        }
        Command::Quiz { user, n, rng_seed } => {
            let service = QuizService::new(store.clone(), store.clone(), store.clone(), &config);
            let songs = service
                .quiz_songs(UserId(user), n, &mut make_rng(rng_seed))
                .await?;
            serde_json::to_string_pretty(&songs)?
        }
        Command::Answer {
            user,
            song,
            like,
            dislike,
            skip: _,
        } => {
            let answer = if like {
                QuizAnswer::Like
            } else if dislike {
                QuizAnswer::Dislike
            } else {
                QuizAnswer::Skip
            };

            let service = QuizService::new(store.clone(), store.clone(), store.clone(), &config);
            let recorded = service.answer(UserId(user), SongId(song), answer).await?;
            if recorded.is_some() {
                store
                    .save_feedback(&feedback_path)
                    .await
                    .with_context(|| format!("Failed to save feedback {}", feedback_path.display()))?;
            }
            serde_json::to_string_pretty(&recorded)?
        }
        Command::Search { query, subgenre } => {
            let songs = store.search(query.as_deref(), subgenre.as_deref()).await;
            serde_json::to_string_pretty(&songs)?
        }
    };

    println!("{}", output);
    Ok(())
}
