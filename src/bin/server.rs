//! `chatwire-server <port>` — run the broadcast server.

use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chatwire::Server;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let port: u16 = match args.as_slice() {
        [_, port] => match port.parse() {
            Ok(p) => p,
            Err(_) => {
                eprintln!("invalid port: {}", port);
                return ExitCode::FAILURE;
            }
        },
        _ => {
            eprintln!("usage: chatwire-server <port>");
            return ExitCode::FAILURE;
        }
    };

    let server = match Server::bind(("0.0.0.0", port)).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("failed to bind port {}: {}", port, e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("listening on 0.0.0.0:{}", port);

    if let Err(e) = server.run().await {
        eprintln!("server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
