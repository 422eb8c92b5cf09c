//! Bridge runtime integration.
//!
//! Bridges the sync game loop with the async TCP server.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::runtime::Runtime;
use tokio::sync::{mpsc, oneshot};
use tracing::warn;

use crate::core::{ActionOutcome, SessionSnapshot};
use crate::protocol::ServerMessage;
use crate::server::{run_server, ServerConfig};
use crate::types::{SessionAction, TransitionError};

/// Command delivered to the game loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundCommand {
    pub client_id: usize,
    pub seq: u64,
    pub action: SessionAction,
}

/// Outbound message to be delivered by the server.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    ToClient {
        client_id: usize,
        message: ServerMessage,
    },
    Broadcast(ServerMessage),
}

/// Running bridge instance.
pub struct Bridge {
    _rt: Runtime,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
    local_addr: SocketAddr,
    observation_seq: u64,
}

impl Bridge {
    /// Start the bridge from environment variables.
    ///
    /// Returns `Ok(None)` if `PLANET_REPAIR_BRIDGE_DISABLED` is set.
    pub fn start_from_env() -> anyhow::Result<Option<Self>> {
        if ServerConfig::is_disabled() {
            return Ok(None);
        }
        Self::start(ServerConfig::from_env()).map(Some)
    }

    /// Spin up a runtime, bind the listener, and wait until it is ready.
    pub fn start(config: ServerConfig) -> anyhow::Result<Self> {
        let max_pending = config.max_pending_commands.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
        let (ready_tx, ready_rx) = oneshot::channel();

        let rt = Runtime::new().context("failed to create tokio runtime")?;
        let server = rt.spawn(run_server(config, cmd_tx, out_rx, Some(ready_tx)));

        let local_addr = match rt.block_on(ready_rx) {
            Ok(addr) => addr,
            // The server dropped the ready sender, so it failed before listening.
            Err(_) => {
                return match rt.block_on(server) {
                    Ok(Err(e)) => Err(e),
                    Ok(Ok(())) => Err(anyhow::anyhow!("bridge stopped before listening")),
                    Err(e) => Err(e).context("bridge task panicked"),
                };
            }
        };

        Ok(Self {
            _rt: rt,
            cmd_rx,
            out_tx,
            local_addr,
            observation_seq: 0,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn try_recv(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.try_recv().ok()
    }

    pub fn send(&self, msg: OutboundMessage) {
        if self.out_tx.send(msg).is_err() {
            warn!("bridge server is gone; dropping outbound message");
        }
    }

    /// Reply to a command with the session's verdict.
    pub fn acknowledge(
        &self,
        cmd: &InboundCommand,
        result: &Result<ActionOutcome, TransitionError>,
    ) {
        if let Err(e) = result {
            warn!(client_id = cmd.client_id, seq = cmd.seq, action = cmd.action.as_str(), reason = %e, "bridge command rejected");
        }
        self.send(OutboundMessage::ToClient {
            client_id: cmd.client_id,
            message: ServerMessage::ack(cmd.seq, result),
        });
    }

    /// Push the current state to every handshaken client.
    pub fn broadcast_snapshot(&mut self, snapshot: &SessionSnapshot) {
        self.observation_seq += 1;
        self.send(OutboundMessage::Broadcast(ServerMessage::observation(
            self.observation_seq,
            snapshot.clone(),
        )));
    }
}
