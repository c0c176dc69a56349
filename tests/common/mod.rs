//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use kv_server::http::{ServerError, ShutdownOutcome};
use kv_server::{HttpServer, ServerConfig, Shutdown, Store};

/// A server running in the background on an ephemeral port.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub store: Store,
    pub shutdown: Shutdown,
    pub task: JoinHandle<Result<ShutdownOutcome, ServerError>>,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger shutdown and wait for the server to stop.
    pub async fn stop(self) {
        self.shutdown.trigger();
        let outcome = self.task.await.unwrap().unwrap();
        assert_eq!(outcome, ShutdownOutcome::Drained);
    }
}

/// Start a server with the given config on 127.0.0.1 with an OS-assigned port.
#[allow(dead_code)]
pub async fn start_server(config: ServerConfig) -> TestServer {
    let store = Store::with_capacity(config.store.initial_capacity);
    let server = HttpServer::new(config, store.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    TestServer {
        addr,
        store,
        shutdown,
        task,
    }
}

/// HTTP client that never goes through a system proxy.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap()
}

/// Reserve a free port by binding and releasing it.
#[allow(dead_code)]
pub fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Wait until something accepts connections on `addr`.
#[allow(dead_code)]
pub async fn wait_until_listening(addr: SocketAddr) {
    for _ in 0..100 {
        if TcpStream::connect(addr).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("nothing listening on {addr}");
}
