//! Scripted local HTTP server for integration tests.
//!
//! Every connection carries one request and is closed after the reply, so the
//! request log matches what the client actually sent over the wire.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// 2025-01-15T00:00:00Z.
pub const T0: i64 = 1_736_899_200_000;
pub const DAY_MS: i64 = 86_400_000;

/// One scripted response.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl Reply {
    pub fn json(body: Value) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: json!({ "error": "scripted" }).to_string(),
            delay: Duration::ZERO,
        }
    }

    /// Close the connection without answering.
    pub fn hang_up() -> Self {
        Self {
            status: 0,
            body: String::new(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

type Handler = dyn Fn(&str) -> Reply + Send + Sync;

pub struct MockServer {
    pub url: String,
    requests: Arc<Mutex<Vec<(String, Instant)>>>,
}

impl MockServer {
    /// Serve every request with `handler(path_and_query)`.
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&str) -> Reply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: Arc<Handler> = Arc::new(handler);

        let log = requests.clone();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let log = log.clone();
                let handler = handler.clone();
                tokio::spawn(async move {
                    let Some(path) = read_request_path(&mut socket).await else {
                        return;
                    };
                    log.lock().unwrap().push((path.clone(), Instant::now()));
                    let reply = handler(&path);
                    if reply.status == 0 {
                        return;
                    }
                    if !reply.delay.is_zero() {
                        tokio::time::sleep(reply.delay).await;
                    }
                    let response = format!(
                        "HTTP/1.1 {} Scripted\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        reply.status,
                        reply.body.len(),
                        reply.body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            url: format!("http://{}", addr),
            requests,
        }
    }

    /// Replies from `script` in order, repeating the last one once exhausted.
    pub async fn scripted(script: Vec<Reply>) -> Self {
        let script = Arc::new(script);
        let next = Arc::new(Mutex::new(0usize));
        Self::start(move |_| {
            let mut i = next.lock().unwrap();
            let reply = script[(*i).min(script.len() - 1)].clone();
            *i += 1;
            reply
        })
        .await
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(p, _)| p.clone())
            .collect()
    }

    /// Time between consecutive requests, in arrival order.
    pub fn gaps(&self) -> Vec<Duration> {
        let log = self.requests.lock().unwrap();
        log.windows(2).map(|w| w[1].1.duration_since(w[0].1)).collect()
    }

    /// Requests whose path contains `needle`.
    pub fn hits(&self, needle: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p.contains(needle))
            .count()
    }
}

async fn read_request_path(socket: &mut tokio::net::TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    let head = String::from_utf8_lossy(&buf);
    let request_line = head.lines().next()?;
    request_line.split_whitespace().nth(1).map(str::to_string)
}

/// A port with nothing listening on it.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

/// `market_chart` body with one point per day ending at `T0`.
pub fn market_chart(prices: &[f64]) -> Value {
    let start = T0 - (prices.len() as i64 - 1) * DAY_MS;
    let rows: Vec<Value> = prices
        .iter()
        .enumerate()
        .map(|(i, p)| json!([start + i as i64 * DAY_MS, p]))
        .collect();
    json!({ "prices": rows, "market_caps": [], "total_volumes": [] })
}

/// Steadily rising year history: 366 points.
pub fn rising_year() -> Value {
    let prices: Vec<f64> = (0..366).map(|i| 30_000.0 + i as f64 * 10.0).collect();
    market_chart(&prices)
}

pub fn simple_price(coin_id: &str, price: f64, change: f64) -> Value {
    json!({ coin_id: { "usd": price, "usd_24h_change": change } })
}

/// Routes CoinGecko endpoints to fixture bodies.
pub fn coingecko_route(path: &str, coin_id: &str, week: &Value, year: &Value) -> Reply {
    if path.starts_with("/simple/price") {
        Reply::json(simple_price(coin_id, 67_123.456, 1.5))
    } else if path.contains("days=365") {
        Reply::json(year.clone())
    } else if path.contains("days=7") {
        Reply::json(week.clone())
    } else {
        Reply::status(404)
    }
}
