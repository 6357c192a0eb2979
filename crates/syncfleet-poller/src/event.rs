//! Poller identity and event types
//!
//! Pollers never return values to their callers; they broadcast
//! [`PollerEvent`]s and log as they go. Events carry the raw wire payload
//! so subscribers decide how much to interpret.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which poller family a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollerKind {
    /// gRPC poller against the synchronization daemon.
    Tsync,
    /// TCP poller against the GPS telemetry service.
    Gpsd,
}

impl fmt::Display for PollerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollerKind::Tsync => write!(f, "tsync"),
            PollerKind::Gpsd => write!(f, "gpsd"),
        }
    }
}

/// Registry key of a poller task: one per node and kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PollerKey {
    /// Node the poller watches.
    pub node: String,
    /// Poller family.
    pub kind: PollerKind,
}

impl PollerKey {
    pub fn new(node: impl Into<String>, kind: PollerKind) -> Self {
        Self {
            node: node.into(),
            kind,
        }
    }
}

impl fmt::Display for PollerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.node, self.kind)
    }
}

/// The three unary queries issued against the synchronization daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsyncQuery {
    Status,
    Mode,
    Time,
}

impl TsyncQuery {
    /// Query order within one polling cycle.
    pub const ALL: [TsyncQuery; 3] = [TsyncQuery::Status, TsyncQuery::Mode, TsyncQuery::Time];
}

impl fmt::Display for TsyncQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TsyncQuery::Status => write!(f, "status"),
            TsyncQuery::Mode => write!(f, "mode"),
            TsyncQuery::Time => write!(f, "time"),
        }
    }
}

/// One position fix from a gpsd `POLL` response.
///
/// Unknown fields are ignored; the telemetry service reports many more
/// than the controller consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TpvFix {
    /// Fix timestamp as reported, untouched.
    #[serde(default)]
    pub time: String,
    /// Latitude in degrees.
    #[serde(default)]
    pub lat: f32,
    /// Longitude in degrees.
    #[serde(default)]
    pub lon: f32,
}

/// Decoded gpsd `POLL` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PollReply {
    /// Position fixes, possibly empty while the receiver acquires.
    #[serde(default)]
    pub tpv: Vec<TpvFix>,
}

/// Event broadcast by a running poller.
#[derive(Debug, Clone)]
pub struct PollerEvent {
    /// Node the poller watches.
    pub node: String,
    /// Poller family that emitted the event.
    pub kind: PollerKind,
    /// When the event was emitted.
    pub at: DateTime<Utc>,
    /// What happened.
    pub detail: PollerEventDetail,
}

impl PollerEvent {
    pub fn new(node: impl Into<String>, kind: PollerKind, detail: PollerEventDetail) -> Self {
        Self {
            node: node.into(),
            kind,
            at: Utc::now(),
            detail,
        }
    }
}

/// Payload of a [`PollerEvent`].
#[derive(Debug, Clone)]
pub enum PollerEventDetail {
    /// A session to the endpoint was established.
    Connected { endpoint: String },
    /// The session died; the poller reconnects on its own.
    ConnectionLost { reason: String },
    /// Reply to one daemon query, raw as received.
    DaemonReply { query: TsyncQuery, message: String },
    /// Position fixes from one telemetry poll.
    GpsFixes { fixes: Vec<TpvFix> },
    /// A recoverable failure; the session stays up.
    SoftError { detail: String },
    /// The supervisor tore the poller down.
    Stopped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_reply_decodes_gpsd_json() {
        let raw = r#"{"class":"POLL","time":"2024-05-01T00:00:00.000Z","active":1,"tpv":[{"class":"TPV","device":"/dev/ttyS0","mode":3,"time":"2024-05-01T00:00:00.000Z","lat":52.5,"lon":13.4,"alt":34.1}],"sky":[]}"#;
        let reply: PollReply = serde_json::from_str(raw).unwrap();
        assert_eq!(reply.tpv.len(), 1);
        assert_eq!(reply.tpv[0].time, "2024-05-01T00:00:00.000Z");
        assert!((reply.tpv[0].lat - 52.5).abs() < f32::EPSILON);
        assert!((reply.tpv[0].lon - 13.4).abs() < f32::EPSILON);
    }

    #[test]
    fn poll_reply_tolerates_missing_fields() {
        let reply: PollReply = serde_json::from_str("{}").unwrap();
        assert!(reply.tpv.is_empty());

        let reply: PollReply = serde_json::from_str(r#"{"tpv":[{}]}"#).unwrap();
        assert_eq!(reply.tpv[0], TpvFix::default());
    }

    #[test]
    fn poller_key_display_names_node_and_kind() {
        let key = PollerKey::new("sts-1", PollerKind::Gpsd);
        assert_eq!(key.to_string(), "sts-1/gpsd");
    }
}
