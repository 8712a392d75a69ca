//! Todo HTTP server entry point.
//!
//! # Responsibility
//! - Load configuration, start logging, open the database.
//! - Serve the router until SIGINT/SIGTERM, then drain within a grace period.

mod config;

use config::ServerConfig;
use log::{error, info, warn};
use std::error::Error;
use std::future::IntoFuture;
use std::process::ExitCode;
use todo_core::db::{open_db, open_db_in_memory};
use todo_core::init_logging;
use todo_http::{router, AppState};
use tokio::sync::oneshot;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=server status=error error={err}");
            eprintln!("todo-server: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let config = ServerConfig::from_env()?;
    let log_dir = config
        .log_dir
        .to_str()
        .ok_or("TODO_LOG_DIR must be valid UTF-8")?;
    init_logging(&config.log_level, log_dir)?;

    let conn = match &config.db_path {
        Some(path) => open_db(path)?,
        None => {
            warn!("event=server_start module=server status=warn reason=in_memory_db");
            open_db_in_memory()?
        }
    };

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(
        "event=server_start module=server status=ok addr={} version={}",
        listener.local_addr()?,
        todo_core::core_version()
    );

    let (signalled_tx, signalled_rx) = oneshot::channel::<()>();
    let server = axum::serve(listener, router(AppState::new(conn)))
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = signalled_tx.send(());
        })
        .into_future();

    let grace = config.shutdown_grace;
    let drain_deadline = async move {
        match signalled_rx.await {
            Ok(()) => tokio::time::sleep(grace).await,
            Err(_) => std::future::pending::<()>().await,
        }
    };

    let served = tokio::select! {
        result = server => Some(result),
        () = drain_deadline => None,
    };

    match served {
        Some(result) => result?,
        None => warn!(
            "event=server_stop module=server status=timeout grace_secs={}",
            grace.as_secs()
        ),
    }
    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("event=signal module=server status=error signal=SIGINT error={err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!("event=signal module=server status=error signal=SIGTERM error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("event=signal module=server status=received signal=SIGINT"),
        () = terminate => info!("event=signal module=server status=received signal=SIGTERM"),
    }
}
