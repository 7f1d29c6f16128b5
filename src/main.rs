use std::path::PathBuf;

use clap::{Parser, Subcommand};
use uuid::Uuid;

use moodspace::config::Config;
use moodspace::models::MoodEntryUpdate;
use moodspace::screens::auth::AuthScreen;
use moodspace::screens::mood_capture::{date_label, MoodCapture, ShareDestination, LOADING, SAVED};
use moodspace::screens::{Alert, Surface};
use moodspace::services::mood_entries::{CREATE_FAILED, DELETE_FAILED, UPDATE_FAILED};
use moodspace::AppState;

const DEFAULT_SESSION_FILE: &str = ".moodspace/session.json";

#[derive(Parser)]
#[command(name = "moodspace")]
#[command(about = "MoodSpace: record how you feel, share it if you like")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password.
    SignIn {
        #[arg(long, env = "MOODSPACE_EMAIL")]
        email: String,
        #[arg(long, env = "MOODSPACE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account.
    SignUp {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        username: String,
    },
    SignOut,
    /// Show who the stored session belongs to.
    Whoami,
    /// List mood types.
    Moods,
    /// List visibility levels.
    Visibility,
    /// List your entries, newest first.
    Entries,
    /// Record a mood and share it.
    Log {
        #[arg(long)]
        mood: i64,
        /// private, friends or public
        #[arg(long)]
        share: ShareDestination,
        #[arg(long)]
        realtalk: bool,
        /// 1-5, shown back to you but not stored.
        #[arg(long)]
        intensity: Option<u8>,
        #[arg(long)]
        note: Option<String>,
    },
    /// Change one of your entries.
    Edit {
        id: Uuid,
        #[arg(long)]
        mood: Option<i64>,
        #[arg(long, conflicts_with = "clear_note")]
        note: Option<String>,
        /// Remove the journal note.
        #[arg(long)]
        clear_note: bool,
        #[arg(long)]
        realtalk: Option<bool>,
        #[arg(long, conflicts_with = "unshare")]
        share: Option<ShareDestination>,
        /// Reset the visibility to none.
        #[arg(long)]
        unshare: bool,
    },
    Delete {
        id: Uuid,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodspace=info".into()),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    config
        .session_path
        .get_or_insert_with(|| PathBuf::from(DEFAULT_SESSION_FILE));

    let mut state = AppState::new(config)?;
    state.gate.restore().await;

    match cli.command {
        Commands::SignIn { email, password } => {
            let mut screen = AuthScreen::sign_in(email, password);
            match screen.submit(&mut state.gate).await {
                Some(alert) => show(&alert),
                None => {
                    if let Some(user) = state.gate.user() {
                        println!("Signed in as {}", user.email.as_deref().unwrap_or("(no email)"));
                    }
                }
            }
        }
        Commands::SignUp {
            email,
            password,
            username,
        } => {
            let mut screen = AuthScreen::sign_up(email, password, username);
            if let Some(alert) = screen.submit(&mut state.gate).await {
                show(&alert);
            }
        }
        Commands::SignOut => {
            state.gate.sign_out().await;
            println!("Signed out");
        }
        Commands::Whoami => match state.gate.current_user().await {
            Ok(user) => println!(
                "{}  {}  {}",
                user.id,
                user.email.as_deref().unwrap_or("(no email)"),
                user.username.as_deref().unwrap_or("")
            ),
            Err(e) => show(&Alert::error(e.user_message("Could not fetch the current user"))),
        },
        Commands::Moods => {
            let moods = state.mood_types.load().await;
            for mood in moods {
                println!("{:>4}  {}  {}", mood.id, mood.emoji, mood.name);
            }
            if let Some(err) = state.mood_types.error() {
                show(&Alert::error(err));
            }
        }
        Commands::Visibility => {
            let levels = state.visibility_levels.load().await;
            for level in levels {
                println!("{:>4}  {}", level.id, level.level_name);
            }
            if let Some(err) = state.visibility_levels.error() {
                show(&Alert::error(err));
            }
        }
        Commands::Entries => {
            if require_tabs(&state) {
                let session = state.gate.fresh_session().await.cloned();
                let entries = state.mood_entries.load(session.as_ref()).await;
                for e in entries {
                    let mood = e
                        .mood_types
                        .as_ref()
                        .map(|m| format!("{} {}", m.emoji, m.name))
                        .unwrap_or_else(|| "?".into());
                    let when = e
                        .entry
                        .created_at
                        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_default();
                    let realtalk = if e.entry.realtalk_mode.unwrap_or(false) { " [RealTalk]" } else { "" };
                    println!("{}  {}  {}{}", e.entry.id, when, mood, realtalk);
                    if let Some(journal) = &e.entry.journal {
                        println!("    {}", journal);
                    }
                }
                if let Some(err) = state.mood_entries.error() {
                    show(&Alert::error(err));
                }
            }
        }
        Commands::Log {
            mood,
            share,
            realtalk,
            intensity,
            note,
        } => {
            if require_tabs(&state) {
                let session = state.gate.fresh_session().await.cloned();
                if MoodCapture::is_loading(&state.mood_types, &state.visibility_levels) {
                    eprintln!("{}", LOADING);
                }
                state.mood_types.load().await;
                let levels = state.visibility_levels.load().await.to_vec();

                println!("{}", date_label(chrono::Local::now().date_naive()));

                if let Some(note) = note {
                    let visibility_id = share.resolve(&levels);
                    match state
                        .mood_entries
                        .create(session.as_ref(), mood, Some(note), visibility_id, realtalk)
                        .await
                    {
                        Ok(_) => show(&Alert::success(SAVED)),
                        Err(e) => show(&Alert::error(e.user_message(CREATE_FAILED))),
                    }
                } else {
                    let mut capture = MoodCapture::new();
                    capture.select_mood(mood);
                    if let Some(level) = intensity {
                        capture.set_intensity(level);
                    }
                    if realtalk {
                        capture.toggle_realtalk();
                    }
                    println!("Intensity {}/5", capture.intensity());
                    if let Some(alert) = capture
                        .share(share, &levels, &mut state.mood_entries, session.as_ref())
                        .await
                    {
                        show(&alert);
                    }
                }
            }
        }
        Commands::Edit {
            id,
            mood,
            note,
            clear_note,
            realtalk,
            share,
            unshare,
        } => {
            if require_tabs(&state) {
                let session = state.gate.fresh_session().await.cloned();
                let visibility_id = match share {
                    Some(dest) => dest.resolve(state.visibility_levels.load().await).map(Some),
                    None if unshare => Some(None),
                    None => None,
                };
                let journal = if clear_note { Some(None) } else { note.map(Some) };
                let patch = MoodEntryUpdate {
                    mood_type_id: mood.map(Some),
                    realtalk_mode: realtalk.map(Some),
                    journal,
                    visibility_id,
                };
                match state.mood_entries.update(session.as_ref(), id, &patch).await {
                    Ok(_) => println!("Updated {}", id),
                    Err(e) => show(&Alert::error(e.user_message(UPDATE_FAILED))),
                }
            }
        }
        Commands::Delete { id } => {
            if require_tabs(&state) {
                let session = state.gate.fresh_session().await.cloned();
                match state.mood_entries.delete(session.as_ref(), id).await {
                    Ok(()) => println!("Deleted {}", id),
                    Err(e) => show(&Alert::error(e.user_message(DELETE_FAILED))),
                }
            }
        }
    }

    Ok(())
}

/// Commands behind the tab bar need a signed-in user.
fn require_tabs(state: &AppState) -> bool {
    match Surface::for_gate(&state.gate) {
        Surface::Tabs => true,
        _ => {
            eprintln!("Not signed in. Run `moodspace sign-in` first.");
            false
        }
    }
}

fn show(alert: &Alert) {
    if alert.is_error() {
        eprintln!("{}: {}", alert.title, alert.message);
    } else {
        println!("{}: {}", alert.title, alert.message);
    }
}
