// src/main.rs
//! diagcli - desktop client for the Yagnostic document-diagnostics API
//!
//! Handles multi-user session caching, white-label branding, LGPD
//! consent, document upload and local file history.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod api;
mod branding;
mod consent;
mod history;
mod models;
mod session;
mod store;

use api::{build_mock_credential, ApiClient, ApiClientError};
use branding::BrandingStore;
use consent::ConsentStore;
use history::HistoryStore;
use session::SessionManager;

#[derive(Parser)]
#[command(name = "diagcli", about = "Yagnostic diagnostics client", version)]
struct Cli {
    /// API endpoint (default: DIAGCLI_API_URL or http://localhost:8080)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Data directory (default: DIAGCLI_DATA_DIR or ~/.diagcli)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Authenticate and cache a new session
    Login {
        /// Raw three-segment mock credential
        credential: Option<String>,

        /// Build a credential for this mock email instead
        #[arg(long, conflicts_with = "credential")]
        email: Option<String>,

        /// Optional client id echoed into the token audience
        #[arg(long)]
        client_id: Option<String>,
    },

    /// List cached sessions
    Sessions,

    /// Activate a cached session
    Switch { id: String },

    /// Remove a session (the active one when no id is given)
    Logout { id: Option<String> },

    /// Purge expired sessions
    Cleanup,

    /// Refresh tokens that are close to expiry
    Refresh,

    /// Show the active session
    Whoami,

    /// Inspect or change white-label branding
    Branding {
        #[command(subcommand)]
        action: BrandingAction,
    },

    /// Record or show LGPD consent
    Consent {
        /// Accept data processing (required before uploads)
        #[arg(long)]
        accept: bool,

        /// Also accept communications
        #[arg(long)]
        communications: bool,
    },

    /// Submit a document for diagnostics
    Upload {
        file: PathBuf,

        /// Ask the pipeline to generate an audio summary
        #[arg(long)]
        generate_audio: bool,

        /// TTS voice selector forwarded with the upload
        #[arg(long)]
        voice_id: Option<String>,
    },

    /// List past uploads
    History {
        #[arg(long, default_value_t = 20)]
        limit: i64,

        #[arg(long, default_value_t = 0)]
        offset: i64,
    },

    /// Show API status
    Status,
}

#[derive(Subcommand)]
enum BrandingAction {
    /// Show the effective configuration
    Show,
    /// Read one stored override
    Get { key: String },
    /// Store one override
    Set { key: String, value: String },
    /// Drop all overrides
    Reset,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let data_dir = store::resolve_data_dir(cli.data_dir.clone())?;
    let pool = store::open_store(&data_dir).await?;
    let api = ApiClient::from_env(cli.api_url.clone());

    let sessions = SessionManager::new(pool.clone());
    let branding_store = BrandingStore::new(pool.clone());
    let consent_store = ConsentStore::new(pool.clone());
    let history_store = HistoryStore::new(pool.clone());

    match cli.command {
        Command::Login {
            credential,
            email,
            client_id,
        } => {
            let credential = match (credential, email) {
                (Some(c), _) => c,
                (None, Some(email)) => build_mock_credential(&email),
                (None, None) => {
                    anyhow::bail!("provide a credential or --email <address>");
                }
            };

            let auth = api.login(&credential, client_id.as_deref()).await?;

            let session = SessionManager::create_user_session(&auth, "mock");
            sessions.add_user_session(&session).await?;
            let active = sessions.switch_user_session(&session.id).await?;

            println!("Logged in as {} <{}>", active.name, active.email);
            println!("Session id: {}", active.id);
            println!("Request id: {}", auth.request_id);
        }

        Command::Sessions => {
            let all = sessions.list_sessions().await?;
            if all.is_empty() {
                println!("No cached sessions.");
            } else {
                for session in all {
                    let marker = if session.is_active { "*" } else { " " };
                    let state = if session.is_expired(chrono::Utc::now()) {
                        "expired"
                    } else {
                        "valid"
                    };
                    println!(
                        "{} {}  {} <{}>  [{}]  expires {}",
                        marker, session.id, session.name, session.email, state, session.expires_at
                    );
                }
            }
        }

        Command::Switch { id } => {
            let session = sessions.switch_user_session(&id).await?;
            println!("Active session: {} <{}>", session.name, session.email);
        }

        Command::Logout { id } => {
            let target = match id {
                Some(id) => Some(id),
                None => sessions
                    .get_current_user_session()
                    .await?
                    .map(|s| s.id),
            };

            match target {
                Some(id) => {
                    if sessions.remove_session(&id).await? {
                        println!("Session {} removed.", id);
                    } else {
                        println!("Session {} was not found.", id);
                    }
                }
                None => println!("No active session to log out."),
            }
        }

        Command::Cleanup => {
            let removed = sessions.cleanup_expired_sessions().await?;
            println!("Removed {} expired session(s).", removed);
        }

        Command::Refresh => {
            let summary = sessions.auto_refresh_tokens(&api).await?;
            println!(
                "Refreshed {}, failed {}, skipped {}.",
                summary.refreshed, summary.failed, summary.skipped
            );
        }

        Command::Whoami => match sessions.get_current_user_session().await? {
            Some(session) => {
                println!("{} <{}>", session.name, session.email);
                println!("Session id: {}", session.id);
                println!("Expires at: {}", session.expires_at);
            }
            None => println!("No active session."),
        },

        Command::Branding { action } => match action {
            BrandingAction::Show => {
                let config = branding_store.get_config().await;
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
            BrandingAction::Get { key } => match branding_store.get(&key).await? {
                Some(value) => println!("{}", value),
                None => println!("(default)"),
            },
            BrandingAction::Set { key, value } => {
                branding_store.set(&key, &value).await?;
                println!("Branding key '{}' updated.", key);
            }
            BrandingAction::Reset => {
                let removed = branding_store.reset().await?;
                println!("Removed {} branding override(s).", removed);
            }
        },

        Command::Consent {
            accept,
            communications,
        } => {
            if accept || communications {
                let record = consent_store.record(accept, communications).await?;
                println!(
                    "Consent recorded at {} (data processing: {}, communications: {}).",
                    record.accepted_at, record.data_processing, record.communications
                );
            } else {
                match consent_store.current().await? {
                    Some(record) => {
                        println!(
                            "Data processing: {}\nCommunications: {}\nAccepted at: {}",
                            record.data_processing, record.communications, record.accepted_at
                        );
                    }
                    None => println!("No consent recorded. Run: diagcli consent --accept"),
                }
            }
        }

        Command::Upload {
            file,
            generate_audio,
            voice_id,
        } => {
            let session = sessions
                .get_current_user_session()
                .await?
                .ok_or_else(|| anyhow::anyhow!("no active session; run `diagcli login` first"))?;

            if !consent_store.has_accepted_data_processing().await? {
                anyhow::bail!(
                    "data-processing consent is required before uploading; run `diagcli consent --accept`"
                );
            }

            let filename = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "document.pdf".to_string());
            let data = tokio::fs::read(&file).await?;
            let size = data.len() as i64;

            match api
                .submit_diagnostics(
                    &session.token,
                    &filename,
                    data,
                    generate_audio,
                    voice_id.as_deref(),
                )
                .await
            {
                Ok(diagnostic) => {
                    let record = history_store
                        .record(
                            &filename,
                            size,
                            "processed",
                            Some(&diagnostic.to_string()),
                            &session.id,
                        )
                        .await?;
                    println!("Upload {} processed.", record.id);
                    println!("{}", serde_json::to_string_pretty(&diagnostic)?);
                }
                Err(ApiClientError::Unreachable(e)) => {
                    // Degrade to a locally simulated diagnostic
                    warn!(error = %e, "API unreachable, falling back to simulated diagnostic");
                    let simulated = simulated_diagnostic(&filename);
                    let record = history_store
                        .record(
                            &filename,
                            size,
                            "simulated",
                            Some(&simulated.to_string()),
                            &session.id,
                        )
                        .await?;
                    println!("API unreachable; recorded a simulated diagnostic.");
                    println!("Upload {} simulated.", record.id);
                    println!("{}", serde_json::to_string_pretty(&simulated)?);
                }
                Err(e) => {
                    history_store
                        .record(&filename, size, "failed", None, &session.id)
                        .await?;
                    return Err(e.into());
                }
            }
        }

        Command::History { limit, offset } => {
            let total = history_store.count().await?;
            let page = history_store.list(limit, offset).await?;

            println!("{} upload(s) recorded.", total);
            for record in page {
                println!(
                    "{}  {}  {}  {} bytes  [{}]",
                    record.submitted_at, record.id, record.filename, record.size, record.status
                );
            }
        }

        Command::Status => {
            println!("API endpoint: {}", api.base_url());
            let status = api.auth_status().await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }

    Ok(())
}

/// Offline fallback payload recorded when the API cannot be reached.
fn simulated_diagnostic(filename: &str) -> serde_json::Value {
    serde_json::json!({
        "status": "simulated",
        "filename": filename,
        "diagnostic": {
            "summary": "Análise simulada localmente: o serviço de diagnóstico não pôde ser contatado.",
            "findings": [],
        },
    })
}
