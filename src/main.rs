use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use interview_room::media::MISSING_CREDENTIALS;
use interview_room::{
    create_router, AppState, BackendGateway, Config, InterviewSubmission, MediaConnection,
    SessionController, SessionStatus, StatusView,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "interview-room", version, about = "AI video interview session host")]
struct Cli {
    /// Configuration file (defaults and INTERVIEW__* variables apply on top)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the local control API for a browser front-end
    Serve,

    /// Provision a room and start the interviewer without a front-end
    Start {
        /// File holding the resume text
        #[arg(long)]
        resume: PathBuf,

        /// File holding the job description
        #[arg(long)]
        job: PathBuf,

        /// Print connection details as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(cli.config.as_deref())?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("Using API key: {}", cfg.api.masked_key());

    let gateway = BackendGateway::new(&cfg.api)?;
    let controller = SessionController::new(Arc::new(gateway));

    match cli.command {
        Command::Serve => serve(&cfg, controller).await,
        Command::Start { resume, job, json } => run_headless(controller, resume, job, json).await,
    }
}

async fn serve(cfg: &Config, controller: Arc<SessionController>) -> Result<()> {
    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Control API listening on http://{}", addr);

    axum::serve(listener, create_router(AppState::new(controller)))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutting down control API");
        })
        .await
        .context("Control API server failed")
}

async fn run_headless(
    controller: Arc<SessionController>,
    resume: PathBuf,
    job: PathBuf,
    json: bool,
) -> Result<()> {
    let resume = tokio::fs::read_to_string(&resume)
        .await
        .with_context(|| format!("Failed to read resume from {}", resume.display()))?;
    let job = tokio::fs::read_to_string(&job)
        .await
        .with_context(|| format!("Failed to read job description from {}", job.display()))?;

    let submission = InterviewSubmission::new(resume, job)?;
    let provisioning = controller.submit(submission)?;

    println!("{}", StatusView::for_session(&controller.snapshot()).description);

    let status = provisioning.await.context("Room provisioning task failed")?;
    let session = controller.snapshot();

    if status != SessionStatus::Active {
        let view = StatusView::for_session(&session);
        bail!("{}: {}", view.title, view.description);
    }

    let connection = match session.connection() {
        Some(connection) if connection.has_credentials() => connection,
        _ => bail!(MISSING_CREDENTIALS),
    };
    print_connection(connection, json)?;

    println!("Press Ctrl-C to leave the interview");
    let mut updates = controller.subscribe();
    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            if let Err(e) = controller.leave() {
                warn!("Leave ignored: {}", e);
            }
        }
        _ = updates.wait_for(|s| s.status() != SessionStatus::Active) => {}
    }

    let view = StatusView::for_session(&controller.snapshot());
    println!("{} {}", view.title, view.description);
    Ok(())
}

fn print_connection(connection: &MediaConnection, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(connection)?);
    } else {
        info!(
            "Media connection details: token={}, url={}, room={}",
            connection.token_preview(),
            connection.server_url,
            connection.room_name
        );
        println!("Room:      {}", connection.room_name);
        println!("Server:    {}", connection.server_url);
        println!("Token:     {}", connection.token);
    }
    Ok(())
}
