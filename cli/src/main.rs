//! `clinic`: command-line client for the Eye Clinic API.
//!
//! Drives the same `SessionStore` as the web client, with the session kept
//! in a JSON file so `login` in one invocation is restored by the next.


use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyeclinic::api::HttpApi;
use eyeclinic::config::{self, ClientConfig, ConfigError};
use eyeclinic::resources::{
    Appointment, Notification, Order, Prescription, Product, Resource, ResourceKind, fetch_list,
};
use eyeclinic::session::NoticeLevel;
use eyeclinic::storage::FileStorage;
use eyeclinic::{ApiError, Credentials, GuardDecision, RegisterRequest, SessionEvent, SessionStore, User, routes};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("not logged in; run `clinic login` first")]
    NotLoggedIn,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "clinic", about = "Eye Clinic portal command-line client")]
struct Cli {
    #[arg(long, env = config::API_URL_VAR, default_value = config::DEFAULT_API_URL)]
    api_url: String,

    #[arg(long, env = config::SESSION_FILE_VAR)]
    session_file: Option<PathBuf>,

    /// Allow plain http to a non-local API host.
    #[arg(long, default_value_t = false)]
    insecure_http: bool,

    /// Print raw JSON instead of one-line summaries.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "EYECLINIC_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create a client account and log in.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "EYECLINIC_PASSWORD", hide_env_values = true)]
        password: String,
        /// Defaults to `--password`.
        #[arg(long)]
        password_confirmation: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// End the session locally and on the server.
    Logout,
    /// Show the restored session.
    Whoami,
    /// Show what the portal router would do with `path` for this session.
    Route { path: String },
    /// List a resource visible to the current role.
    List { resource: ResourceKind },
}

type Store = SessionStore<HttpApi, FileStorage>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    tracing::debug!(
        api_url = %config.api_base_url,
        session_file = %config.session_file.display(),
        insecure_http = config.allow_insecure_http,
        "starting"
    );

    let store = SessionStore::new(HttpApi::new(config.api_base_url)?, FileStorage::new(config.session_file));
    store.subscribe(|event| {
        if let SessionEvent::Notice(notice) = event {
            let tag = match notice.level {
                NoticeLevel::Success => "ok",
                NoticeLevel::Info => "info",
                NoticeLevel::Error => "error",
            };
            eprintln!("[{tag}] {}", notice.message);
        }
    });

    let result = run(&store, cli.command, cli.json).await;
    store.teardown();
    result
}

async fn run(store: &Store, command: Command, json: bool) -> Result<(), CliError> {
    match command {
        Command::Login { email, password } => {
            let user = store.login(&Credentials::new(email, password)).await?;
            print_user(&user, json)
        }
        Command::Register { name, email, password, password_confirmation, phone } => {
            let request = build_register_request(name, email, password, password_confirmation, phone)?;
            let user = store.register(&request).await?;
            print_user(&user, json)
        }
        Command::Logout => {
            let target = store.logout().await;
            println!("logged out; landing page is {target}");
            Ok(())
        }
        Command::Whoami => match store.restore().await.user {
            Some(user) => print_user(&user, json),
            None => {
                println!("not logged in");
                Ok(())
            }
        },
        Command::Route { path } => {
            let session = store.restore().await;
            println!("{}", describe_route(&path, routes::decide(&path, &session)));
            Ok(())
        }
        Command::List { resource } => {
            let session = store.restore().await;
            if session.user.is_none() && !resource.is_public() {
                return Err(CliError::NotLoggedIn);
            }
            let role = session.role();
            let token = store.token();
            let api = store.api();
            match resource {
                ResourceKind::Users => print_rows(fetch_list::<User, _>(api, role, token.as_deref()).await?, json),
                ResourceKind::Products => print_rows(fetch_list::<Product, _>(api, role, token.as_deref()).await?, json),
                ResourceKind::Orders => print_rows(fetch_list::<Order, _>(api, role, token.as_deref()).await?, json),
                ResourceKind::Appointments => {
                    print_rows(fetch_list::<Appointment, _>(api, role, token.as_deref()).await?, json)
                }
                ResourceKind::Prescriptions => {
                    print_rows(fetch_list::<Prescription, _>(api, role, token.as_deref()).await?, json)
                }
                ResourceKind::Notifications => {
                    print_rows(fetch_list::<Notification, _>(api, role, token.as_deref()).await?, json)
                }
            }
        }
    }
}

/// Environment config with the parsed flags taking precedence.
fn load_config(cli: &Cli) -> Result<ClientConfig, ConfigError> {
    ClientConfig::from_lookup(|key| match key {
        config::API_URL_VAR => Some(cli.api_url.clone()),
        config::SESSION_FILE_VAR => cli.session_file.as_ref().map(|p| p.display().to_string()),
        config::INSECURE_HTTP_VAR if cli.insecure_http => Some("1".to_owned()),
        _ => std::env::var(key).ok(),
    })
}

fn build_register_request(
    name: String,
    email: String,
    password: String,
    password_confirmation: Option<String>,
    phone: Option<String>,
) -> Result<RegisterRequest, CliError> {
    let password_confirmation = password_confirmation.unwrap_or_else(|| password.clone());
    if password_confirmation != password {
        return Err(CliError::PasswordMismatch);
    }
    Ok(RegisterRequest { name, email, password, password_confirmation, phone })
}

fn describe_user(user: &User) -> String {
    format!(
        "{} <{}> role={} home={}",
        user.name,
        user.email,
        user.role,
        user.role.home_route()
    )
}

fn describe_route(path: &str, decision: Option<GuardDecision>) -> String {
    match decision {
        None => format!("{path}: not found"),
        Some(GuardDecision::Render) => format!("{path}: render"),
        Some(GuardDecision::Redirect(to)) => format!("{path}: redirect -> {to}"),
        Some(GuardDecision::Loading) => format!("{path}: loading"),
    }
}

fn print_user(user: &User, json: bool) -> Result<(), CliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(user)?);
    } else {
        println!("{}", describe_user(user));
    }
    Ok(())
}

fn print_rows<R: Resource + serde::Serialize>(rows: Vec<R>, json: bool) -> Result<(), CliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    if rows.is_empty() {
        println!("(no {})", R::KIND);
    }
    for row in &rows {
        println!("{}", row.summary());
    }
    Ok(())
}
