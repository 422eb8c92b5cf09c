//! Renderer bridge: drive a session over a TCP socket with a JSON protocol
//!
//! An external renderer (a web canvas, a test harness) connects, sends
//! session commands, and receives a snapshot after every state change.
//!
//! # Protocol Overview
//!
//! Line-delimited JSON over TCP:
//!
//! 1. **Connection**: client connects (default: 127.0.0.1:7878)
//! 2. **Handshake**: client sends `hello`, server answers `welcome`
//! 3. **Commanding**: client sends `command` messages naming an action
//! 4. **Acknowledgement**: every command gets an `ack` with `ok` or `rejected`
//! 5. **Observation**: every handshaken client receives an `observation`
//!    after each mutation and clock tick
//!
//! Malformed lines, commands before `hello`, unknown actions, and
//! non-increasing `seq` numbers produce an `error` message instead.
//!
//! # Environment Variables
//!
//! - `PLANET_REPAIR_BRIDGE_HOST`: bind address (default: "127.0.0.1")
//! - `PLANET_REPAIR_BRIDGE_PORT`: port number (default: 7878, 0 picks one)
//! - `PLANET_REPAIR_BRIDGE_DISABLED`: "1" or "true" turns the bridge off
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"client":{"name":"canvas","version":"0.1.0"}}
//! Server -> Client: {"type":"welcome","seq":1,"protocol_version":"1.0.0"}
//! Client -> Server: {"type":"command","seq":2,"action":"selectBuilding","building":3}
//! Server -> Client: {"type":"ack","seq":2,"status":"ok"}
//! Server -> Client: {"type":"observation","seq":1,"snapshot":{...}}
//! ```
//!
//! The game loop stays synchronous: [`Bridge`] owns a tokio runtime and
//! exposes non-blocking `try_recv` / `send` calls.

pub use planet_repair_core as core;
pub use planet_repair_types as types;

pub mod protocol;
pub mod runtime;
pub mod server;

pub use protocol::{
    create_command, create_hello, parse_client_line, AckStatus, ClientMessage, CommandMessage,
    ErrorCode, ProtocolError, ServerMessage, PROTOCOL_VERSION,
};
pub use runtime::{Bridge, InboundCommand, OutboundMessage};
pub use server::{run_server, ServerConfig};
