//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use path_mux::config::MuxConfig;
use path_mux::{HttpServer, Shutdown};

/// A server running on an ephemeral port.
pub struct RunningServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    #[allow(dead_code)]
    pub updates: mpsc::UnboundedSender<MuxConfig>,
}

impl RunningServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start `server` on 127.0.0.1 with a random port.
pub async fn start(server: HttpServer) -> RunningServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let (updates, config_updates) = mpsc::unbounded_channel();
    let signal = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, signal).await;
    });

    RunningServer {
        addr,
        shutdown,
        updates,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

/// Poll `url` until it returns `expected` or the deadline passes.
#[allow(dead_code)]
pub async fn wait_for_body(client: &reqwest::Client, url: &str, expected: &str) -> bool {
    for _ in 0..50 {
        if let Ok(res) = client.get(url).send().await {
            if res.text().await.ok().as_deref() == Some(expected) {
                return true;
            }
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}
