//! sessionkit CLI - demo programs for the session layer
//!
//! Runs the session lifecycle against either backend so the behaviour can be
//! inspected from a terminal.

mod app_session;

use app_session::{AppSession, User};
use clap::{Parser, Subcommand, ValueEnum};
use http::header::{COOKIE, SET_COOKIE};
use http::{HeaderMap, HeaderValue};
use sessionkit_core::{
    init_logging, log_operation_error, log_operation_start, log_operation_success,
    ErrorContext, SessionBackend, SessionBackendStub, SessionConfig, SessionError, SessionKitConfig,
    SessionResult,
};
use sessionkit_http::{CookieSessionBackend, HttpContext, SessionStore};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "sessionkit")]
#[command(about = "Exercise the session lifecycle against a backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend to run against
    #[arg(short, long, value_enum, default_value = "cookie")]
    backend: BackendKind,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BackendKind {
    /// In-memory stub
    Stub,
    /// Cookie + server-side store
    Cookie,
}

#[derive(Subcommand)]
enum Commands {
    /// Attach a user to the session unless one is already present
    User {
        /// User name to store
        #[arg(default_value = "guest")]
        name: String,
    },

    /// Increment a counter across several simulated requests
    Counter {
        /// Number of requests to simulate
        #[arg(short, long, default_value = "3")]
        requests: u32,
    },
}

fn main() -> SessionResult<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    let mut logging_config = config.logging.clone();
    if cli.verbose {
        logging_config.level = "debug".to_string();
        logging_config
            .filter_directives
            .retain(|directive| !directive.starts_with("sessionkit"));
    }

    init_logging(&logging_config).map_err(|e| SessionError::Config {
        message: format!("Failed to initialize logging: {}", e),
        source: Some(e),
        context: ErrorContext::new("cli")
            .with_operation("init_logging")
            .with_suggestion("Check the [logging] section of the config file"),
    })?;

    info!("Starting sessionkit CLI v{}", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::User { name } => handle_user(cli.backend, &config.session, name),
        Commands::Counter { requests } => handle_counter(cli.backend, &config.session, requests),
    };

    if let Err(e) = &result {
        e.log();
    }
    result
}

fn load_config(config_path: Option<&PathBuf>) -> SessionResult<SessionKitConfig> {
    if let Some(path) = config_path {
        return SessionKitConfig::from_file(path);
    }

    let default_paths = [
        dirs::config_dir().map(|d| d.join("sessionkit").join("config.toml")),
        Some(PathBuf::from("sessionkit.toml")),
    ];

    for path in default_paths.iter().flatten() {
        if path.exists() {
            return SessionKitConfig::from_file(path);
        }
    }

    Ok(SessionKitConfig::default())
}

fn handle_user(backend: BackendKind, config: &SessionConfig, name: String) -> SessionResult<()> {
    log_operation_start!("user", backend = ?backend, user = %name);

    match backend {
        BackendKind::Stub => {
            let mut app = AppSession::new(SessionBackendStub::new());
            attach_user(&mut app, config, &name)?;
            report(&app)?;
        }
        BackendKind::Cookie => {
            let backend = CookieSessionBackend::new(SessionStore::new(), HttpContext::new());
            let mut app = AppSession::new(backend);
            attach_user(&mut app, config, &name)?;
            report(&app)?;

            let mut response = HeaderMap::new();
            app.into_session()
                .into_backend()
                .into_context()
                .apply_to(&mut response)?;
            for value in response.get_all(SET_COOKIE) {
                println!("Set-Cookie: {}", value.to_str().unwrap_or("<binary>"));
            }
        }
    }

    log_operation_success!("user");
    Ok(())
}

fn report<B: SessionBackend>(app: &AppSession<B>) -> SessionResult<()> {
    println!("has user: {}", app.has_user());
    println!("user: {:?}", app.user()?);
    Ok(())
}

fn attach_user<B: SessionBackend>(
    app: &mut AppSession<B>,
    config: &SessionConfig,
    name: &str,
) -> SessionResult<()> {
    app.session().configure(config.clone())?;
    app.session().start()?;

    if !app.has_user() {
        app.set_user(&User {
            name: name.to_string(),
        })?;
    }
    app.session().commit()
}

fn handle_counter(backend: BackendKind, config: &SessionConfig, requests: u32) -> SessionResult<()> {
    log_operation_start!("counter", backend = ?backend, requests = requests);

    let result = match backend {
        BackendKind::Stub => count_with_stub(config, requests),
        BackendKind::Cookie => count_with_cookies(config, requests),
    };

    match &result {
        Ok(()) => {
            log_operation_success!("counter");
        }
        Err(e) => {
            log_operation_error!("counter", e);
        }
    }
    result
}

/// The stub keeps its data between sessions, standing in for a client that
/// always comes back to the same store.
fn count_with_stub(config: &SessionConfig, requests: u32) -> SessionResult<()> {
    let mut backend = SessionBackendStub::new();

    for request in 1..=requests {
        let mut app = AppSession::new(backend);
        app.session().configure(config.clone())?;
        app.session().start()?;
        let counter = app.increment_counter()?;
        app.session().commit()?;

        println!("request {}: id={} counter={}", request, app.session().id()?, counter);
        backend = app.into_session().into_backend();
    }

    Ok(())
}

/// Each request gets a fresh backend and context; the cookie from each
/// response is sent back on the next request like a browser would.
fn count_with_cookies(config: &SessionConfig, requests: u32) -> SessionResult<()> {
    let store = SessionStore::new();
    let mut request_headers = HeaderMap::new();

    for request in 1..=requests {
        let context = HttpContext::from_headers(&request_headers);
        let mut app = AppSession::new(CookieSessionBackend::new(store.clone(), context));
        app.session().configure(config.clone())?;
        app.session().start()?;
        let counter = app.increment_counter()?;
        app.session().commit()?;
        let id = app.session().id()?;

        let context = app.into_session().into_backend().into_context();
        for cookie in context.response_cookies() {
            let pair = format!("{}={}", cookie.name(), cookie.value());
            let value = HeaderValue::from_str(&pair).map_err(|e| {
                SessionError::backend("cookie", format!("Invalid Cookie value: {}", e))
            })?;
            request_headers.insert(COOKIE, value);
        }

        println!(
            "request {}: id={} counter={} set-cookie={}",
            request,
            id,
            counter,
            !context.response_cookies().is_empty()
        );
    }

    Ok(())
}
