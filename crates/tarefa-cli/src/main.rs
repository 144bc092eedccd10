//! tarefa - terminal client for the task API
//!
//! # Configuration
//!
//! Configuration is loaded from multiple sources with priority:
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`TAREFA_*`)
//! 3. Config file (`tarefa.toml` in the current directory, or `--config`)
//! 4. Default values (lowest priority)
//!
//! The access token is issued by the identity provider; pass it with
//! `--token` or `TAREFA_ACCESS_TOKEN`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use tarefa_core::domain::{TaskId, ViewState, ViewerError, parse_optional_prioridade};
use tarefa_core::ports::AlertSink;
use tarefa_core::{AppBuilder, ClientConfig, ConfigLoader, TaskViewer};

/// tarefa - list, create and delete tasks
#[derive(Parser, Debug)]
#[command(name = "tarefa")]
#[command(version, about, long_about = None)]
struct Args {
    /// Config file (default: ./tarefa.toml when present)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Base URL of the task API (overrides TAREFA_API_URL)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Bearer token issued by the identity provider (overrides TAREFA_ACCESS_TOKEN)
    #[arg(long, value_name = "TOKEN")]
    token: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the whole page (header, form for ADMIN, task table)
    Show,

    /// List tasks
    List {
        /// Print the tasks as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a task (ADMIN)
    Create {
        #[arg(long, default_value = "")]
        titulo: String,

        #[arg(long, default_value = "")]
        descricao: String,

        /// BAIXA, MEDIA or ALTA (empty or omitted leaves it unselected)
        #[arg(long, default_value = "")]
        prioridade: String,
    },

    /// Delete a task by id (ADMIN)
    Delete {
        id: String,
    },

    /// Show the signed-in user and roles
    Whoami,

    /// Sign out
    Logout,
}

/// Alerts go to stderr so that stdout stays the rendered view.
struct ConsoleAlerts;

impl AlertSink for ConsoleAlerts {
    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }
}

fn init_tracing(args: &Args) {
    // HTTP crates are held at WARN so that --debug shows our own events.
    let filter = if args.debug {
        EnvFilter::new("debug,hyper=warn,hyper_util=warn,h2=warn,reqwest=warn,rustls=warn")
    } else if args.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter);
    tracing_subscriber::registry().with(layer).init();
}

fn resolve_config(args: &Args) -> Result<ClientConfig> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.with_file(path);
    }
    let mut config = loader.load().context("Config error")?;

    if let Some(url) = &args.api_url {
        config.api_base_url = url.clone();
    }
    if let Some(token) = &args.token {
        config.access_token = Some(token.clone());
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(&args);

    let config = resolve_config(&args)?;
    debug!(?config, "resolved config");

    let mut viewer = AppBuilder::from_config(&config)?
        .alerts(Arc::new(ConsoleAlerts))
        .build()?;

    match viewer.mount().await {
        ViewState::Ready => {}
        state => {
            print!("{}", viewer.render());
            if state == ViewState::Redirecting {
                match &config.login_url {
                    Some(url) => eprintln!("Login: {url}"),
                    None => eprintln!("Set TAREFA_ACCESS_TOKEN (or --token) after signing in."),
                }
            }
            return Ok(ExitCode::from(2));
        }
    }

    let outcome = run(&mut viewer, args.command, &config).await?;
    Ok(outcome)
}

async fn run(viewer: &mut TaskViewer, command: Command, config: &ClientConfig) -> Result<ExitCode> {
    let result = match command {
        Command::Show => Ok(()),
        Command::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(viewer.tasks())?);
                return Ok(ExitCode::SUCCESS);
            }
            Ok(())
        }
        Command::Create {
            titulo,
            descricao,
            prioridade,
        } => {
            let prioridade = parse_optional_prioridade(&prioridade)?;
            let form = viewer.form_mut();
            form.set_titulo(titulo);
            form.set_descricao(descricao);
            form.set_prioridade(prioridade);
            viewer.submit_form().await
        }
        Command::Delete { id } => viewer.delete(&TaskId::parse(&id)).await,
        Command::Whoami => {
            print_session(viewer);
            return Ok(ExitCode::SUCCESS);
        }
        Command::Logout => {
            viewer.logout().await;
            print!("{}", viewer.render());
            if let Some(url) = &config.logout_url {
                eprintln!("Logout: {url}");
            }
            return Ok(ExitCode::SUCCESS);
        }
    };

    match result {
        Ok(()) => {
            print!("{}", viewer.render());
            Ok(ExitCode::SUCCESS)
        }
        // API failures were already shown as alerts
        Err(ViewerError::Api(_)) => Ok(ExitCode::FAILURE),
        Err(e) => {
            eprintln!("{e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_session(viewer: &TaskViewer) {
    let Some(session) = viewer.session() else {
        println!("not signed in");
        return;
    };
    println!("name:    {}", session.user.name);
    println!("email:   {}", session.user.email);
    let roles: Vec<&str> = session.roles().iter().collect();
    println!("roles:   {}", if roles.is_empty() { "-".to_string() } else { roles.join(", ") });
    println!("admin:   {}", session.is_admin());
    match session.expires_at() {
        Some(exp) => println!("expires: {}", exp.to_rfc3339()),
        None => println!("expires: -"),
    }
}
