//! gRPC status poller for the on-node synchronization daemon
//!
//! One poller runs per node. It holds a session to the daemon's tsynctl
//! endpoint and walks the three unary queries every cycle. Failures fall
//! into two classes: transport failures tear the session down and trigger
//! a reconnect, per-query failures are logged and the cycle carries on.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::sleep;
use tracing::{info, warn};

use syncfleet_types::DaemonStatus;

use crate::event::{PollerEvent, PollerEventDetail, PollerKind, TsyncQuery};
use crate::pb::tsynctl::v1::tsynctl_client::TsynctlClient;
use crate::pb::tsynctl::v1::Empty;

/// Timing and endpoint settings for a [`TsyncPoller`].
#[derive(Debug, Clone)]
pub struct TsyncPollerConfig {
    /// Endpoint URI, e.g. `http://sts-1-tsyncd.timing:50051`.
    pub endpoint: String,
    /// Delay before the first connection attempt, giving a freshly
    /// rendered daemon time to come up.
    pub initial_delay: Duration,
    /// Pause between failed connection attempts.
    pub connect_retry: Duration,
    /// Upper bound on each unary query.
    pub query_timeout: Duration,
    /// Pause between polling cycles.
    pub cycle_interval: Duration,
}

impl TsyncPollerConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            initial_delay: Duration::from_secs(30),
            connect_retry: Duration::from_secs(5),
            query_timeout: Duration::from_secs(30),
            cycle_interval: Duration::from_secs(30),
        }
    }
}

/// Polls one node's synchronization daemon over gRPC.
pub struct TsyncPoller {
    node: String,
    config: TsyncPollerConfig,
    event_tx: broadcast::Sender<PollerEvent>,
}

impl TsyncPoller {
    pub fn new(
        node: impl Into<String>,
        config: TsyncPollerConfig,
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
        sleep(self.config.initial_delay).await;

        'session: loop {
            let mut client = self.connect().await;
            self.emit(PollerEventDetail::Connected {
                endpoint: self.config.endpoint.clone(),
            });

            loop {
                for query in TsyncQuery::ALL {
                    let reply = tokio::time::timeout(
                        self.config.query_timeout,
                        Self::dispatch(&mut client, query),
                    )
                    .await;

                    match reply {
                        Ok(Ok(message)) => self.report(query, message),
                        Ok(Err(status)) if is_transport_failure(&status) => {
                            warn!(
                                node = %self.node,
                                query = %query,
                                error = %status,
                                "tsyncd session lost, reconnecting"
                            );
                            self.emit(PollerEventDetail::ConnectionLost {
                                reason: status.to_string(),
                            });
                            continue 'session;
                        }
                        Ok(Err(status)) => {
                            warn!(
                                node = %self.node,
                                query = %query,
                                error = %status,
                                "tsyncd query failed"
                            );
                            self.emit(PollerEventDetail::SoftError {
                                detail: status.to_string(),
                            });
                        }
                        Err(_) => {
                            warn!(node = %self.node, query = %query, "tsyncd query timed out");
                            self.emit(PollerEventDetail::SoftError {
                                detail: format!("{query} query timed out"),
                            });
                        }
                    }
                }
                sleep(self.config.cycle_interval).await;
            }
        }
    }

    async fn connect(&self) -> TsynctlClient<tonic::transport::Channel> {
        loop {
            match TsynctlClient::connect(self.config.endpoint.clone()).await {
                Ok(client) => {
                    info!(node = %self.node, endpoint = %self.config.endpoint, "connected to tsyncd");
                    return client;
                }
                Err(error) => {
                    warn!(
                        node = %self.node,
                        endpoint = %self.config.endpoint,
                        error = %error,
                        "tsyncd endpoint unreachable, retrying"
                    );
                    sleep(self.config.connect_retry).await;
                }
            }
        }
    }

    async fn dispatch(
        client: &mut TsynctlClient<tonic::transport::Channel>,
        query: TsyncQuery,
    ) -> Result<String, tonic::Status> {
        let reply = match query {
            TsyncQuery::Status => client.get_status(Empty {}).await?,
            TsyncQuery::Mode => client.get_mode(Empty {}).await?,
            TsyncQuery::Time => client.get_time(Empty {}).await?,
        };
        Ok(reply.into_inner().message)
    }

    fn report(&self, query: TsyncQuery, message: String) {
        match query {
            TsyncQuery::Status => {
                let decoded = message
                    .trim()
                    .parse::<i32>()
                    .map(DaemonStatus::describe)
                    .unwrap_or_else(|_| format!("unparseable: {message}"));
                info!(node = %self.node, reply = %message, decoded = %decoded, "tsyncd status");
            }
            TsyncQuery::Mode | TsyncQuery::Time => {
                info!(node = %self.node, query = %query, reply = %message, "tsyncd reply");
            }
        }
        self.emit(PollerEventDetail::DaemonReply { query, message });
    }

    fn emit(&self, detail: PollerEventDetail) {
        let _ = self
            .event_tx
            .send(PollerEvent::new(&self.node, PollerKind::Tsync, detail));
    }
}

/// A dead connection surfaces as `Unknown` from the client's ready check
/// or `Unavailable` from the transport. Anything else came back from the
/// daemon and keeps the session.
fn is_transport_failure(status: &tonic::Status) -> bool {
    matches!(
        status.code(),
        tonic::Code::Unavailable | tonic::Code::Unknown
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pb::tsynctl::v1::tsynctl_server::{Tsynctl, TsynctlServer};
    use crate::pb::tsynctl::v1::MessageReply;
    use tokio::net::TcpListener;
    use tokio_stream::wrappers::TcpListenerStream;
    use tonic::transport::Server;
    use tonic::{Request, Response, Status};

    async fn spawn_tsyncd<S: Tsynctl>(service: S) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            Server::builder()
                .add_service(TsynctlServer::new(service))
                .serve_with_incoming(TcpListenerStream::new(listener))
                .await
                .unwrap();
        });
        format!("http://{addr}")
    }

    fn test_config(endpoint: &str) -> TsyncPollerConfig {
        let mut config = TsyncPollerConfig::new(endpoint);
        config.initial_delay = Duration::from_millis(0);
        config.connect_retry = Duration::from_millis(50);
        config.query_timeout = Duration::from_secs(5);
        config.cycle_interval = Duration::from_millis(50);
        config
    }

    async fn next_event(events: &mut broadcast::Receiver<PollerEvent>) -> PollerEvent {
        tokio::time::timeout(Duration::from_secs(5), events.recv())
            .await
            .expect("timed out waiting for poller event")
            .expect("event channel closed")
    }

    struct HealthyTsyncd;

    #[tonic::async_trait]
    impl Tsynctl for HealthyTsyncd {
        async fn get_status(
            &self,
            _request: Request<Empty>,
        ) -> Result<Response<MessageReply>, Status> {
            Ok(Response::new(MessageReply {
                message: "1".to_string(),
            }))
        }

        async fn get_mode(
            &self,
            _request: Request<Empty>,
        ) -> Result<Response<MessageReply>, Status> {
            Ok(Response::new(MessageReply {
                message: "T-GM.8275.1".to_string(),
            }))
        }

        async fn get_time(
            &self,
            _request: Request<Empty>,
        ) -> Result<Response<MessageReply>, Status> {
            Ok(Response::new(MessageReply {
                message: "2024-05-01T00:00:00Z".to_string(),
            }))
        }
    }

    struct BusyModeTsyncd;

    #[tonic::async_trait]
    impl Tsynctl for BusyModeTsyncd {
        async fn get_status(
            &self,
            _request: Request<Empty>,
        ) -> Result<Response<MessageReply>, Status> {
            Ok(Response::new(MessageReply {
                message: "3".to_string(),
            }))
        }

        async fn get_mode(
            &self,
            _request: Request<Empty>,
        ) -> Result<Response<MessageReply>, Status> {
            Err(Status::internal("daemon busy"))
        }

        async fn get_time(
            &self,
            _request: Request<Empty>,
        ) -> Result<Response<MessageReply>, Status> {
            Ok(Response::new(MessageReply {
                message: "2024-05-01T00:00:05Z".to_string(),
            }))
        }
    }

    #[tokio::test]
    async fn reports_all_three_queries_in_order() {
        let endpoint = spawn_tsyncd(HealthyTsyncd).await;
        let (event_tx, mut events) = broadcast::channel(64);
        let handle = tokio::spawn(TsyncPoller::new("sts-1", test_config(&endpoint), event_tx).run());

        let mut replies = Vec::new();
        while replies.len() < 3 {
            if let PollerEventDetail::DaemonReply { query, message } =
                next_event(&mut events).await.detail
            {
                replies.push((query, message));
            }
        }
        handle.abort();

        assert_eq!(replies[0], (TsyncQuery::Status, "1".to_string()));
        assert_eq!(replies[1], (TsyncQuery::Mode, "T-GM.8275.1".to_string()));
        assert_eq!(replies[2], (TsyncQuery::Time, "2024-05-01T00:00:00Z".to_string()));
    }

    #[tokio::test]
    async fn query_errors_keep_the_session() {
        let endpoint = spawn_tsyncd(BusyModeTsyncd).await;
        let (event_tx, mut events) = broadcast::channel(64);
        let handle = tokio::spawn(TsyncPoller::new("sts-1", test_config(&endpoint), event_tx).run());

        let mut saw_soft_error = false;
        loop {
            match next_event(&mut events).await.detail {
                PollerEventDetail::SoftError { .. } => saw_soft_error = true,
                PollerEventDetail::ConnectionLost { .. } => {
                    panic!("a query error must not drop the session")
                }
                PollerEventDetail::DaemonReply { query, message }
                    if query == TsyncQuery::Time =>
                {
                    assert_eq!(message, "2024-05-01T00:00:05Z");
                    break;
                }
                _ => {}
            }
        }
        handle.abort();

        assert!(saw_soft_error);
    }

    #[test]
    fn transport_codes_end_the_session() {
        assert!(is_transport_failure(&Status::unavailable("gone")));
        assert!(is_transport_failure(&Status::unknown("not ready")));
        assert!(!is_transport_failure(&Status::internal("daemon busy")));
        assert!(!is_transport_failure(&Status::unimplemented("no rpc")));
    }
}
