//! Fixed-window request limiting keyed by client address.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    net::{IpAddr, SocketAddr},
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::{debug, warn};

/// Number of tracked addresses above which expired windows are swept.
const SWEEP_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Shared request budget per client address.
///
/// Every route draws from the same budget. Requests without a known peer
/// address share a single bucket.
#[derive(Debug)]
pub struct RateLimiter {
    max: u32,
    window: Duration,
    windows: Mutex<HashMap<Option<IpAddr>, Window>>,
}

impl RateLimiter {
    pub fn new(max: u32, window: Duration) -> Self {
        Self {
            max,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Message sent with every rejected request.
    pub fn message(&self) -> String {
        let secs = self.window.as_secs();
        let wait = if secs >= 60 && secs % 60 == 0 {
            count(secs / 60, "minute")
        } else {
            count(secs, "second")
        };
        format!("Too many requests from this IP, please try again after {wait}")
    }

    /// Count a request from `client`; `false` when it exceeds the budget.
    pub fn admit(&self, client: Option<IpAddr>) -> bool {
        self.admit_at(client, Instant::now())
    }

    /// [`admit`](Self::admit) with an explicit clock reading.
    pub fn admit_at(&self, client: Option<IpAddr>, now: Instant) -> bool {
        let mut windows = self.windows.lock();
        if windows.len() > SWEEP_THRESHOLD {
            let span = self.window;
            windows.retain(|_, w| now.duration_since(w.started) < span);
        }
        let entry = windows.entry(client).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }
        if entry.count >= self.max {
            return false;
        }
        entry.count += 1;
        true
    }

    /// Number of addresses currently tracked.
    pub fn tracked(&self) -> usize {
        self.windows.lock().len()
    }
}

fn count(n: u64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

/// Middleware rejecting requests over the budget before any handler runs.
pub async fn enforce(State(limiter): State<Arc<RateLimiter>>, req: Request, next: Next) -> Response {
    let client = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    if !limiter.admit(client) {
        warn!(?client, "rate limit exceeded");
        return (StatusCode::TOO_MANY_REQUESTS, limiter.message()).into_response();
    }
    debug!(?client, "request admitted");
    next.run(req).await
}
