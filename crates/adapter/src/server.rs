//! TCP server for the renderer bridge
//!
//! Handles incoming connections and manages client lifecycle.
//! Uses tokio for async networking.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, RwLock};
use tracing::{debug, info, warn};

use crate::protocol::{parse_client_line, ClientMessage, ErrorCode, ProtocolError, ServerMessage};
use crate::runtime::{InboundCommand, OutboundMessage};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_pending_commands: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
            max_pending_commands: 16,
        }
    }
}

impl ServerConfig {
    /// Create from `PLANET_REPAIR_BRIDGE_*` environment variables.
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        let host = env::var("PLANET_REPAIR_BRIDGE_HOST")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);
        let port = env::var("PLANET_REPAIR_BRIDGE_PORT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);

        Self {
            host,
            port,
            max_pending_commands: defaults.max_pending_commands,
        }
    }

    /// Check if the bridge is disabled via environment
    pub fn is_disabled() -> bool {
        std::env::var("PLANET_REPAIR_BRIDGE_DISABLED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bridge address {}:{}", self.host, self.port))
    }
}

/// Handle to a connected client
struct ClientHandle {
    id: usize,
    handshaken: bool,
    last_seq: Option<u64>,
    tx: mpsc::UnboundedSender<String>,
}

/// Shared server state
struct ServerState {
    clients: RwLock<Vec<ClientHandle>>,
}

impl ServerState {
    fn new() -> Self {
        Self {
            clients: RwLock::new(Vec::new()),
        }
    }

    async fn register(&self, id: usize, tx: mpsc::UnboundedSender<String>) {
        self.clients.write().await.push(ClientHandle {
            id,
            handshaken: false,
            last_seq: None,
            tx,
        });
    }

    async fn unregister(&self, id: usize) {
        self.clients.write().await.retain(|c| c.id != id);
    }

    async fn is_handshaken(&self, id: usize) -> bool {
        self.clients
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.handshaken)
            .unwrap_or(false)
    }

    async fn mark_handshaken(&self, id: usize) {
        if let Some(c) = self.clients.write().await.iter_mut().find(|c| c.id == id) {
            c.handshaken = true;
        }
    }

    /// Record `seq` if it is strictly greater than the last one seen.
    async fn check_and_update_seq(&self, id: usize, seq: u64) -> bool {
        let mut clients = self.clients.write().await;
        let Some(client) = clients.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        match client.last_seq {
            Some(prev) if seq <= prev => false,
            _ => {
                client.last_seq = Some(seq);
                true
            }
        }
    }

    async fn route(&self, msg: OutboundMessage) {
        let clients = self.clients.read().await;
        match msg {
            OutboundMessage::ToClient { client_id, message } => {
                if let Some(c) = clients.iter().find(|c| c.id == client_id) {
                    send_message(&c.tx, &message);
                }
            }
            OutboundMessage::Broadcast(message) => {
                let Some(line) = encode(&message) else {
                    return;
                };
                for c in clients.iter().filter(|c| c.handshaken) {
                    let _ = c.tx.send(line.clone());
                }
            }
        }
    }
}

fn encode(message: &ServerMessage) -> Option<String> {
    match message.to_line() {
        Ok(line) => Some(line),
        Err(e) => {
            warn!(error = %e, "failed to encode bridge message");
            None
        }
    }
}

fn send_message(tx: &mpsc::UnboundedSender<String>, message: &ServerMessage) {
    if let Some(line) = encode(message) {
        let _ = tx.send(line);
    }
}

/// Start the TCP server.
///
/// `ready_tx` receives the bound address once the listener is up, which lets
/// callers bind port 0 and learn the real port.
pub async fn run_server(
    config: ServerConfig,
    command_tx: mpsc::Sender<InboundCommand>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind bridge on {}", addr))?;
    let bound = listener.local_addr()?;
    info!(%bound, "bridge listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let state = Arc::new(ServerState::new());

    // Outbound dispatcher.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                state.route(msg).await;
            }
        });
    }

    let mut client_id_counter = 0usize;
    loop {
        let (socket, peer) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;
        info!(client_id, %peer, "bridge client connected");

        let state = Arc::clone(&state);
        let command_tx = command_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, client_id, state, command_tx).await {
                warn!(client_id, error = %e, "bridge client error");
            }
            info!(client_id, "bridge client disconnected");
        });
    }
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    client_id: usize,
    state: Arc<ServerState>,
    command_tx: mpsc::Sender<InboundCommand>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = socket.into_split();
    let mut lines = BufReader::new(reader).lines();

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    state.register(client_id, tx.clone()).await;

    let write_task = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if writer.write_all(line.as_bytes()).await.is_err()
                || writer.write_all(b"\n").await.is_err()
                || writer.flush().await.is_err()
            {
                break;
            }
        }
    });

    let result = read_loop(&mut lines, client_id, &state, &command_tx, &tx).await;

    state.unregister(client_id).await;
    drop(tx);
    let _ = write_task.await;
    result
}

async fn read_loop(
    lines: &mut tokio::io::Lines<BufReader<tokio::net::tcp::OwnedReadHalf>>,
    client_id: usize,
    state: &ServerState,
    command_tx: &mpsc::Sender<InboundCommand>,
    tx: &mpsc::UnboundedSender<String>,
) -> anyhow::Result<()> {
    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let reject = |err: ProtocolError| {
            warn!(client_id, code = ?err.code, message = %err.message, "bridge rejected line");
            send_message(tx, &ServerMessage::from(err));
        };

        match parse_client_line(trimmed) {
            Err(err) => reject(err),
            Ok(ClientMessage::Hello(hello)) => {
                if !state.check_and_update_seq(client_id, hello.seq).await {
                    reject(stale_seq(hello.seq));
                    continue;
                }
                debug!(client_id, name = %hello.client.name, version = %hello.client.version, "bridge hello");
                state.mark_handshaken(client_id).await;
                send_message(tx, &ServerMessage::welcome(hello.seq));
            }
            Ok(ClientMessage::Command(cmd)) => {
                if !state.is_handshaken(client_id).await {
                    reject(ProtocolError::new(
                        Some(cmd.seq),
                        ErrorCode::HandshakeRequired,
                        "send hello first",
                    ));
                    continue;
                }
                if !state.check_and_update_seq(client_id, cmd.seq).await {
                    reject(stale_seq(cmd.seq));
                    continue;
                }
                match cmd.to_action() {
                    Err(err) => reject(err),
                    Ok(action) => {
                        let inbound = InboundCommand {
                            client_id,
                            seq: cmd.seq,
                            action,
                        };
                        if command_tx.send(inbound).await.is_err() {
                            // Game loop is gone.
                            break;
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

fn stale_seq(seq: u64) -> ProtocolError {
    ProtocolError::new(
        Some(seq),
        ErrorCode::StaleSeq,
        "seq must increase with every message",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_binds_loopback() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:7878");
    }

    #[test]
    fn bad_host_is_an_error() {
        let config = ServerConfig {
            host: "not an address".into(),
            ..ServerConfig::default()
        };
        assert!(config.socket_addr().is_err());
    }

    #[tokio::test]
    async fn seq_must_strictly_increase() {
        let state = ServerState::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        state.register(1, tx).await;

        assert!(state.check_and_update_seq(1, 1).await);
        assert!(state.check_and_update_seq(1, 5).await);
        assert!(!state.check_and_update_seq(1, 5).await);
        assert!(!state.check_and_update_seq(1, 2).await);
        assert!(state.check_and_update_seq(1, 6).await);
    }

    #[tokio::test]
    async fn broadcast_skips_clients_without_handshake() {
        let state = ServerState::new();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        state.register(1, tx_a).await;
        state.register(2, tx_b).await;
        state.mark_handshaken(2).await;

        state
            .route(OutboundMessage::Broadcast(ServerMessage::welcome(1)))
            .await;

        assert!(rx_a.try_recv().is_err());
        assert!(rx_b.try_recv().unwrap().contains("\"welcome\""));
    }
}
