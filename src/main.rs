mod cli;

use std::error::Error;

use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, CreateAdminArgs, ExportArgs, ImportArgs, ServeArgs};
use flashcards_app::database::Scope;
use flashcards_app::export::{export_json_to_path, import_json};
use flashcards_app::models::user::normalize_email;
use flashcards_app::models::{Deck, SchedulerConfig};
use flashcards_app::{AppState, Store, User, auth, router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,flashcards_app=debug")),
        )
        .init();

    match Cli::parse().command {
        Commands::Serve(args) => serve(args).await,
        Commands::CreateAdmin(args) => create_admin(args),
        Commands::Export(args) => export_deck(args),
        Commands::Import(args) => import_deck(args),
    }
}

async fn serve(args: ServeArgs) -> Result<(), Box<dyn Error>> {
    let config = args.into_config()?;
    config.validate()?;

    let store = Store::open(&config.database)?;
    let state = AppState::new(store, config.jwt.clone(), config.scheduler);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shut down");
    Ok(())
}

fn create_admin(args: CreateAdminArgs) -> Result<(), Box<dyn Error>> {
    let store = Store::open(&args.db.database)?;
    let admin = auth::create_admin(&store, &args.email, &args.password)?;
    println!("Admin '{}' ready (id {}).", admin.email, admin.id);
    Ok(())
}

fn export_deck(args: ExportArgs) -> Result<(), Box<dyn Error>> {
    let store = Store::open(&args.db.database)?;
    let user = find_user(&store, &args.email)?;

    let cards = store.list_flashcards(Scope::Owner(user.id), Some(&args.deck))?;
    if cards.is_empty() {
        return Err(format!("deck '{}' of {} is empty or missing", args.deck, user.email).into());
    }
    let deck = Deck::from_flashcards(args.deck, &cards);
    export_json_to_path(&deck, &args.out)?;

    println!(
        "Deck '{}' ({} cards) exported to '{}'",
        deck.name,
        deck.flashcards.len(),
        args.out.display()
    );
    Ok(())
}

fn import_deck(args: ImportArgs) -> Result<(), Box<dyn Error>> {
    let store = Store::open(&args.db.database)?;
    let user = find_user(&store, &args.email)?;

    let deck = import_json(&args.file)?;
    let errors = deck.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("  {}: {}", e.field, e.message);
        }
        return Err(format!("'{}' is not a valid deck", args.file.display()).into());
    }

    let imported = store.import_deck(
        user.id,
        &deck,
        SchedulerConfig::default().initial_ease,
        Utc::now(),
    )?;
    println!("Deck '{}' imported for {} ({imported} cards)", deck.name, user.email);
    Ok(())
}

fn find_user(store: &Store, email: &str) -> Result<User, Box<dyn Error>> {
    let email = normalize_email(email);
    Ok(store
        .find_user_by_email(&email)?
        .ok_or_else(|| format!("no account registered for {email}"))?)
}

async fn shutdown_signal() {
    use tokio::signal;
    let ctrl_c = async {
        signal::ctrl_c().await.ok();
    };
    #[cfg(unix)]
    let term = async {
        if let Ok(mut s) = signal::unix::signal(signal::unix::SignalKind::terminate()) {
            s.recv().await;
        }
    };
    #[cfg(not(unix))]
    let term = std::future::pending::<()>();
    tokio::select! {
        _ = ctrl_c => tracing::info!("received SIGINT, shutting down"),
        _ = term => tracing::info!("received SIGTERM, shutting down"),
    }
}
