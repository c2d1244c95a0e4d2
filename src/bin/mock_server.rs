//! Standalone mock book service for manual harness runs
//!
//! Serves the same in-memory implementation the integration tests use:
//!
//! ```text
//! mock-server [ADDR]    # default 127.0.0.1:8080
//! ```

use bookwire::common::logging;
use bookwire::mock::MockServer;

#[tokio::main]
async fn main() {
    logging::init_cli();

    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:8080".to_string());

    let server = match MockServer::bind(&addr).await {
        Ok(server) => server,
        Err(e) => {
            eprintln!("Error: failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };

    println!("Serving mock book API at {}", server.url());

    if let Err(e) = server.run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
