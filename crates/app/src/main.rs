//! Image Feed client - Main Entry Point
//!
//! Loads settings, initializes logging, wires the services and runs one
//! subcommand.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use imagefeed::config::DEFAULT_CONFIG_FILE;
use imagefeed::{ConsoleAuthorizationPrompt, Services, Settings};
use imagefeed_application::{PageOutcome, SessionRoute};
use imagefeed_domain::{Photo, Profile};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "imagefeed", version, about = "Browse and like photos from the terminal")]
struct Cli {
    /// Configuration file; missing is fine.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in, resuming the stored session when possible.
    Login,
    /// Show the signed-in user's profile.
    Profile,
    /// List photos from the feed.
    Feed {
        /// Number of pages to load.
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Like a photo.
    Like {
        /// Photo id.
        id: String,
    },
    /// Remove a like from a photo.
    Unlike {
        /// Photo id.
        id: String,
    },
    /// Sign out and delete the stored token.
    Logout,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(&cli.config)
        .with_context(|| format!("reading {}", cli.config.display()))?;
    let services = Services::from_settings(&settings, Arc::new(ConsoleAuthorizationPrompt::new()))?;

    tracing::debug!(command = ?cli.command, "starting");
    match cli.command {
        Command::Login => sign_in(&services, false).await,
        Command::Profile => sign_in(&services, true).await,
        Command::Feed { pages } => list_feed(&services, pages).await,
        Command::Like { id } => toggle_like(&services, &id, true).await,
        Command::Unlike { id } => toggle_like(&services, &id, false).await,
        Command::Logout => {
            services.logout.logout().await?;
            println!("Signed out.");
            Ok(())
        }
    }
}

async fn sign_in(services: &Services, show_profile: bool) -> anyhow::Result<()> {
    match services.session.start().await? {
        SessionRoute::Feed { profile } => {
            if show_profile {
                print_profile(services, &profile);
            } else {
                println!("Signed in as {} ({}).", profile.name, profile.login_name);
            }
            Ok(())
        }
        SessionRoute::Login => bail!("sign-in was cancelled"),
    }
}

fn print_profile(services: &Services, profile: &Profile) {
    println!("{}", profile.name);
    println!("{}", profile.login_name);
    if let Some(bio) = &profile.bio {
        println!("{bio}");
    }
    if let Some(avatar) = services.profiles.avatar_url() {
        println!("avatar: {avatar}");
    }
}

async fn require_token(services: &Services) -> anyhow::Result<()> {
    if services.tokens.is_authenticated().await {
        Ok(())
    } else {
        bail!("not signed in; run `imagefeed login` first")
    }
}

async fn list_feed(services: &Services, pages: u32) -> anyhow::Result<()> {
    require_token(services).await?;
    for _ in 0..pages {
        if let PageOutcome::Loaded { page, added } = services.feed.fetch_next_page().await? {
            tracing::debug!(page, added, "page merged");
        }
    }
    for photo in services.feed.photos() {
        print_photo(&photo);
    }
    Ok(())
}

fn print_photo(photo: &Photo) {
    let heart = if photo.is_liked { "♥" } else { " " };
    let date = photo
        .created_at
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    println!(
        "{heart} {:<12} {:>5}x{:<5} {:>10} {:>6} likes  {}",
        photo.id,
        photo.size.width,
        photo.size.height,
        date,
        photo.likes,
        photo.description.as_deref().unwrap_or(""),
    );
}

async fn toggle_like(services: &Services, id: &str, liked: bool) -> anyhow::Result<()> {
    require_token(services).await?;
    services.feed.set_like(id, liked).await?;
    println!("{} {id}.", if liked { "Liked" } else { "Unliked" });
    Ok(())
}
