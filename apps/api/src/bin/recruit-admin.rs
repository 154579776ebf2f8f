//! Maintenance commands run against the same environment as the API.

use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use rand::seq::SliceRandom;
use serde_json::{json, Map, Value};
use sqlx::PgPool;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use recruit_api::admin::{password::hash_password, repository as admins};
use recruit_api::candidates::repository::{self as candidates, NewCandidate};
use recruit_api::config::Config;
use recruit_api::db::{create_pool, run_migrations};
use recruit_api::forms::template::{english_levels, ENGLISH_LEVEL_KEY, QUESTIONNAIRE_FIELDS};
use recruit_api::models::{CandidateStatus, EvalStatus, FormStatus, HiringStatus};
use recruit_api::storage::{s3::S3Store, Storage};

#[derive(Parser, Debug)]
#[command(
    name = "recruit-admin",
    about = "Maintenance tasks for the recruitment tracking API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an administrator account
    AddAdmin(AddAdminArgs),
    /// Print every administrator account
    ListAdmins,
    /// Delete every candidate record
    PurgeCandidates(PurgeArgs),
    /// Insert sample candidates for local testing
    SeedCandidates(SeedArgs),
    /// Create the storage buckets and apply their public-read policy
    InitStorage,
}

#[derive(Args, Debug)]
struct AddAdminArgs {
    username: String,
    password: String,
}

#[derive(Args, Debug)]
struct PurgeArgs {
    /// Required; the purge cannot be undone
    #[arg(long)]
    yes: bool,
}

#[derive(Args, Debug)]
struct SeedArgs {
    #[arg(long, default_value_t = 5)]
    count: usize,
}

const LAST_NAMES: &[&str] = &["Alami", "Bennani", "Chraibi", "El Idrissi", "Fassi", "Tazi"];
const FIRST_NAMES: &[&str] = &["Sara", "Youssef", "Imane", "Mehdi", "Salma", "Omar"];
const POSITIONS: &[&str] = &["Technicien", "Ingénieur études", "Dessinateur", "Chef de projet"];
const LEVELS: &[&str] = &["Moyen", "Bien", "Très bien"];

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("recruit_admin={0},recruit_api={0}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Command::AddAdmin(args) => {
            let pool = connect(&config).await?;
            let hash = hash_password(&args.password);
            match admins::insert(&pool, &args.username, &hash).await? {
                Some(admin) => println!("Created admin {} ({})", admin.username, admin.id),
                None => bail!("Admin {} already exists", args.username),
            }
        }
        Command::ListAdmins => {
            let pool = connect(&config).await?;
            for admin in admins::list(&pool).await? {
                println!("{}\t{}\t{}", admin.id, admin.username, admin.created_at);
            }
        }
        Command::PurgeCandidates(args) => {
            if !args.yes {
                bail!("Refusing to purge without --yes");
            }
            let pool = connect(&config).await?;
            let deleted = candidates::delete_all(&pool).await?;
            println!("Deleted {deleted} candidates");
        }
        Command::SeedCandidates(args) => {
            let pool = connect(&config).await?;
            for _ in 0..args.count {
                let candidate = candidates::insert(&pool, &sample_candidate()).await?;
                println!("{}\t{}", candidate.id, candidate.display_name());
            }
        }
        Command::InitStorage => init_storage(&config).await?,
    }
    Ok(())
}

async fn connect(config: &Config) -> Result<PgPool> {
    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

async fn init_storage(config: &Config) -> Result<()> {
    let store = S3Store::from_config(config).await;
    let storage = Storage::new(Arc::new(store), config.s3_public_url.clone());
    storage.ensure_buckets().await;
    info!("Buckets initialised at {}", config.s3_endpoint);
    Ok(())
}

fn pick(values: &[&'static str]) -> &'static str {
    values.choose(&mut rand::thread_rng()).copied().unwrap_or_default()
}

fn sample_candidate() -> NewCandidate {
    let mut profile = Map::new();
    profile.insert("Nom".to_string(), json!(pick(LAST_NAMES)));
    profile.insert("Prénom".to_string(), json!(pick(FIRST_NAMES)));
    profile.insert("Date de naissance".to_string(), json!("01/01/1995"));
    profile.insert("Post Actuel".to_string(), json!(pick(POSITIONS)));
    profile.insert(ENGLISH_LEVEL_KEY.to_string(), english_levels(pick(LEVELS)));
    for field in QUESTIONNAIRE_FIELDS {
        profile.insert(field.to_string(), Value::String("-".to_string()));
    }

    NewCandidate {
        profile,
        status: CandidateStatus::Pending,
        hiring_status: HiringStatus::AwaitingClient,
        form_status: FormStatus::Submitted,
        form_token: None,
        eval_status: EvalStatus::Inactive,
        original_cv_path: None,
    }
}
