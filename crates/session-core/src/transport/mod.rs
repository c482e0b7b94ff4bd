//! TCP plumbing for negotiated media sessions

pub mod chunk;
pub mod connection;
pub mod manager;

pub use chunk::{ChunkTransport, RawChunkTransport};
pub use connection::MsrpConnection;
pub use manager::{ConnectionEvent, ConnectionManager};
