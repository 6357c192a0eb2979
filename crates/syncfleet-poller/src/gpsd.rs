//! TCP telemetry poller for the GPS service
//!
//! The telemetry protocol is line oriented: the poller writes `?POLL;`
//! and reads back one JSON document per line. A zero-byte read means the
//! service hung up and the poller reconnects; a blank or undecodable
//! line is logged and the session stays up.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::broadcast;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::event::{PollReply, PollerEvent, PollerEventDetail, PollerKind};

const POLL_COMMAND: &[u8] = b"?POLL;";

/// Timing and endpoint settings for a [`GpsdPoller`].
#[derive(Debug, Clone)]
pub struct GpsdPollerConfig {
    /// Host and port, e.g. `sts-1-gpsd.timing:2947`.
    pub endpoint: String,
    /// Pause between failed connection attempts.
    pub connect_retry: Duration,
    /// Pause between polls.
    pub cycle_interval: Duration,
}

impl GpsdPollerConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            connect_retry: Duration::from_secs(5),
            cycle_interval: Duration::from_secs(30),
        }
    }
}

/// Polls one node's GPS telemetry service over TCP.
pub struct GpsdPoller {
    node: String,
    config: GpsdPollerConfig,
    event_tx: broadcast::Sender<PollerEvent>,
}

impl GpsdPoller {
    pub fn new(
        node: impl Into<String>,
        config: GpsdPollerConfig,
        event_tx: broadcast::Sender<PollerEvent>,
    ) -> Self {
        Self {
            node: node.into(),
            config,
            event_tx,
        }
    }

    /// Run until aborted. Never returns on its own.
    pub async fn run(self) {
        'session: loop {
            let stream = self.connect().await;
            self.emit(PollerEventDetail::Connected {
                endpoint: self.config.endpoint.clone(),
            });

            let (read_half, mut write_half) = stream.into_split();
            let mut reader = BufReader::new(read_half);

            loop {
                if let Err(error) = write_half.write_all(POLL_COMMAND).await {
                    warn!(node = %self.node, error = %error, "gpsd write failed, reconnecting");
                    self.emit(PollerEventDetail::ConnectionLost {
                        reason: error.to_string(),
                    });
                    continue 'session;
                }

                let mut line = String::new();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        warn!(node = %self.node, "gpsd closed the connection, reconnecting");
                        self.emit(PollerEventDetail::ConnectionLost {
                            reason: "connection closed".to_string(),
                        });
                        continue 'session;
                    }
                    Ok(_) => self.report(line.trim()),
                    Err(error) => {
                        warn!(node = %self.node, error = %error, "gpsd read failed, reconnecting");
                        self.emit(PollerEventDetail::ConnectionLost {
                            reason: error.to_string(),
                        });
                        continue 'session;
                    }
                }

                sleep(self.config.cycle_interval).await;
            }
        }
    }

    async fn connect(&self) -> TcpStream {
        loop {
            match TcpStream::connect(&self.config.endpoint).await {
                Ok(stream) => {
                    info!(node = %self.node, endpoint = %self.config.endpoint, "connected to gpsd");
                    return stream;
                }
                Err(error) => {
                    warn!(
                        node = %self.node,
                        endpoint = %self.config.endpoint,
                        error = %error,
                        "gpsd endpoint unreachable, retrying"
                    );
                    sleep(self.config.connect_retry).await;
                }
            }
        }
    }

    fn report(&self, line: &str) {
        if line.is_empty() {
            warn!(node = %self.node, "empty poll response from gpsd");
            self.emit(PollerEventDetail::SoftError {
                detail: "empty poll response".to_string(),
            });
            return;
        }

        match serde_json::from_str::<PollReply>(line) {
            Ok(reply) => {
                for fix in &reply.tpv {
                    info!(
                        node = %self.node,
                        time = %fix.time,
                        lat = fix.lat,
                        lon = fix.lon,
                        "gps fix"
                    );
                }
                self.emit(PollerEventDetail::GpsFixes { fixes: reply.tpv });
            }
            Err(error) => {
                warn!(
                    node = %self.node,
                    error = %error,
                    raw = %line,
                    "undecodable poll response from gpsd"
                );
                self.emit(PollerEventDetail::SoftError {
                    detail: error.to_string(),
                });
            }
        }
    }

    fn emit(&self, detail: PollerEventDetail) {
        let _ = self
            .event_tx
            .send(PollerEvent::new(&self.node, PollerKind::Gpsd, detail));
    }
}
