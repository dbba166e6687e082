//! End-to-end tests against a live listener.
//!
//! # Design
//! Each test starts the server on a random port in a background thread with
//! its own tokio runtime, then talks to it over real HTTP using ureq. The
//! shutdown sender lets a test stop the server and observe the drain.

use std::io::Write;
use std::net::{SocketAddr, TcpStream};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use todo_core::Todo;
use todo_server::{app, serve};
use tokio::sync::oneshot;

struct Running {
    addr: SocketAddr,
    base: String,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<std::io::Result<()>>,
}

fn start() -> Running {
    start_with_drain(Duration::from_millis(500))
}

fn start_with_drain(drain_timeout: Duration) -> Running {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let handle = thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            let shutdown = async {
                let _ = shutdown_rx.await;
            };
            serve(listener, app(), shutdown, drain_timeout).await
        })
    });

    Running {
        addr,
        base: format!("http://{addr}"),
        shutdown: shutdown_tx,
        handle,
    }
}

/// Agent that returns 4xx/5xx as responses instead of errors.
fn agent() -> ureq::Agent {
    ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent()
}

/// Status code and body text.
fn read(mut response: ureq::http::Response<ureq::Body>) -> (u16, String) {
    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();
    (status, body)
}

#[test]
fn crud_lifecycle_over_http() {
    let server = start();
    let agent = agent();
    let url = |path: &str| format!("{}{path}", server.base);

    let (status, body) = read(agent.get(url("/health")).call().unwrap());
    assert_eq!(status, 200);
    assert_eq!(body, "Healthy");

    let (status, body) = read(agent.get(url("/api/todos")).call().unwrap());
    assert_eq!(status, 200);
    assert_eq!(body, "[]");

    let (status, body) = read(
        agent
            .post(url("/api/todos"))
            .content_type("application/json")
            .send(r#"{"value":"buy milk","complete":false}"#.as_bytes())
            .unwrap(),
    );
    assert_eq!(status, 201);
    assert_eq!(body, r#"{"id":1,"value":"buy milk","complete":false}"#);

    let (status, body) = read(agent.get(url("/api/todos/1")).call().unwrap());
    assert_eq!(status, 200);
    assert_eq!(body, r#"{"id":1,"value":"buy milk","complete":false}"#);

    let (status, body) = read(
        agent
            .put(url("/api/todos/1"))
            .content_type("application/json")
            .send(r#"{"value":"buy milk","complete":true}"#.as_bytes())
            .unwrap(),
    );
    assert_eq!(status, 200);
    assert_eq!(body, r#"{"id":1,"value":"buy milk","complete":true}"#);

    let (status, body) = read(agent.get(url("/api/todos/999")).call().unwrap());
    assert_eq!(status, 404);
    assert_eq!(body, r#"{"error":"Todo with ID '999' could not be found."}"#);

    let (status, body) = read(agent.get(url("/api/todos")).call().unwrap());
    assert_eq!(status, 200);
    let todos: Vec<Todo> = serde_json::from_str(&body).unwrap();
    assert_eq!(todos.len(), 1);
    assert!(todos[0].complete);

    let (status, _) = read(agent.delete(url("/api/todos/1")).call().unwrap());
    assert_eq!(status, 204);
    let (status, _) = read(agent.delete(url("/api/todos/1")).call().unwrap());
    assert_eq!(status, 404);

    server.shutdown.send(()).unwrap();
    server.handle.join().unwrap().unwrap();
}

#[test]
fn concurrent_clients_get_unique_ids() {
    let server = start();
    let (tx, rx) = mpsc::channel();

    let workers: Vec<_> = (0..8)
        .map(|i| {
            let tx = tx.clone();
            let url = format!("{}/api/todos", server.base);
            thread::spawn(move || {
                let agent = agent();
                for j in 0..5 {
                    let (status, body) = read(
                        agent
                            .post(&url)
                            .content_type("application/json")
                            .send(format!(r#"{{"value":"{i}-{j}"}}"#).as_bytes())
                            .unwrap(),
                    );
                    assert_eq!(status, 201);
                    let todo: Todo = serde_json::from_str(&body).unwrap();
                    tx.send(todo.id).unwrap();
                }
            })
        })
        .collect();
    drop(tx);
    for worker in workers {
        worker.join().unwrap();
    }

    let mut ids: Vec<i64> = rx.iter().collect();
    ids.sort_unstable();
    assert_eq!(ids, (1..=40).collect::<Vec<i64>>());

    server.shutdown.send(()).unwrap();
    server.handle.join().unwrap().unwrap();
}

#[test]
fn shutdown_stops_accepting_connections() {
    let server = start();
    let base = server.base.clone();

    let (status, _) = read(agent().get(format!("{base}/health")).call().unwrap());
    assert_eq!(status, 200);

    server.shutdown.send(()).unwrap();
    server.handle.join().unwrap().unwrap();

    assert!(agent().get(format!("{base}/health")).call().is_err());
}

#[test]
fn shutdown_is_bounded_by_drain_timeout_when_a_request_stalls() {
    let drain = Duration::from_millis(300);
    let server = start_with_drain(drain);

    // Request line and one header, never the blank line that ends the head.
    let mut stalled = TcpStream::connect(server.addr).unwrap();
    stalled
        .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\n")
        .unwrap();
    thread::sleep(Duration::from_millis(100));

    let started = Instant::now();
    server.shutdown.send(()).unwrap();
    server.handle.join().unwrap().unwrap();
    let took = started.elapsed();

    assert!(took < drain + Duration::from_secs(2), "serve took {took:?}");
    drop(stalled);
}
