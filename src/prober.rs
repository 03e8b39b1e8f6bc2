use std::io;
use std::time::Duration;

use async_trait::async_trait;
use std::future::Future;
use tokio::net::{lookup_host, TcpStream};
use tokio::time::timeout;

use crate::targets::AddressRecord;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// How a single connection attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    Open,
    Refused,
    TimedOut,
    Unresolved,
    Unreachable,
}

impl ProbeStatus {
    pub fn is_reachable(self) -> bool {
        self == ProbeStatus::Open
    }
}

impl std::fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeStatus::Open => write!(f, "open"),
            ProbeStatus::Refused => write!(f, "refused"),
            ProbeStatus::TimedOut => write!(f, "timed out"),
            ProbeStatus::Unresolved => write!(f, "unresolved"),
            ProbeStatus::Unreachable => write!(f, "unreachable"),
        }
    }
}

#[async_trait]
pub trait Prober: Send + Sync {
    /// Attempt one connection to the target.
    async fn probe(&self, target: &AddressRecord) -> ProbeStatus;

    async fn is_reachable(&self, target: &AddressRecord) -> bool {
        self.probe(target).await.is_reachable()
    }
}

/// TCP connect prober. Resolution and connect share one deadline.
#[derive(Debug, Clone)]
pub struct TcpProber {
    timeout: Duration,
}

impl TcpProber {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn dial(authority: &str) -> ProbeStatus {
        let addrs = match lookup_host(authority).await {
            Ok(addrs) => addrs,
            Err(e) => {
                tracing::debug!(proxy = authority, error = %e, "resolution failed");
                return ProbeStatus::Unresolved;
            }
        };

        let mut status = ProbeStatus::Unresolved;
        for addr in addrs {
            match TcpStream::connect(addr).await {
                Ok(stream) => {
                    // Close right away, only the handshake matters.
                    drop(stream);
                    return ProbeStatus::Open;
                }
                Err(e) => {
                    tracing::debug!(%addr, error = %e, "connect failed");
                    status = classify(&e);
                }
            }
        }

        status
    }
}

impl Default for TcpProber {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

/// Run `attempt` for at most `limit`; running out of time is `TimedOut`.
async fn with_deadline<F>(limit: Duration, attempt: F) -> ProbeStatus
where
    F: Future<Output = ProbeStatus>,
{
    timeout(limit, attempt).await.unwrap_or(ProbeStatus::TimedOut)
}

fn classify(error: &io::Error) -> ProbeStatus {
    match error.kind() {
        io::ErrorKind::ConnectionRefused => ProbeStatus::Refused,
        io::ErrorKind::TimedOut => ProbeStatus::TimedOut,
        _ => ProbeStatus::Unreachable,
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, target: &AddressRecord) -> ProbeStatus {
        let authority = target.authority();

        let status = with_deadline(self.timeout, Self::dial(&authority)).await;

        tracing::debug!(proxy = %authority, %status, "probe finished");
        status
    }
}
