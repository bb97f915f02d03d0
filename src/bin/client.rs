//! `chatwire-client <host> <port>` — connect, print broadcasts, send
//! typed lines.
//!
//! Console input is blocking, so it runs on its own thread; each line gets
//! its application-layer `\n` terminator back before framing. The socket
//! pipelines run on the tokio runtime.

use std::io::{BufRead, Write};
use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chatwire::Client;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let (host, port) = match args.as_slice() {
        [_, host, port] => match port.parse::<u16>() {
            Ok(p) => (host.clone(), p),
            Err(_) => {
                eprintln!("invalid port: {}", port);
                return ExitCode::FAILURE;
            }
        },
        _ => {
            eprintln!("usage: chatwire-client <host> <port>");
            return ExitCode::FAILURE;
        }
    };

    let client = match Client::connect((host.as_str(), port), |body| {
        let mut stdout = std::io::stdout().lock();
        let _ = stdout.write_all(&body);
        let _ = stdout.flush();
    })
    .await
    {
        Ok(c) => c,
        Err(e) => {
            eprintln!("failed to connect to {}:{}: {}", host, port, e);
            return ExitCode::FAILURE;
        }
    };

    let handle = client.handle();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let mut body = line.into_bytes();
            body.push(b'\n');
            if handle.send(&body).is_err() {
                break;
            }
        }
        // stdin closed: ask for an orderly shutdown.
        handle.close();
    });

    client.wait_for_shutdown().await;
    ExitCode::SUCCESS
}
