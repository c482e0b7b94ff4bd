//! Hand-off point to the chunk transport that frames payloads on the wire

use std::path::Path;

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::errors::Result;
use crate::transport::connection::MsrpConnection;

/// Frames and sends session payloads over an established connection
///
/// Implementations own chunking, message ids and reports. The session only
/// guarantees the connection is live and exclusively its own while a call
/// is in progress.
#[async_trait]
pub trait ChunkTransport: Send + Sync {
    /// Send a text message body with its MIME type
    async fn send_text(&self, conn: &MsrpConnection, content: &str, content_type: &str) -> Result<()>;

    /// Send the contents of a file
    async fn send_file(&self, conn: &MsrpConnection, path: &Path) -> Result<()>;
}

const FILE_BUFFER_SIZE: usize = 16 * 1024;

/// Writes payload bytes as-is, without framing
///
/// The default transport of a session. Useful for tests and for peers that
/// agreed on a raw byte stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawChunkTransport;

#[async_trait]
impl ChunkTransport for RawChunkTransport {
    async fn send_text(&self, conn: &MsrpConnection, content: &str, content_type: &str) -> Result<()> {
        debug!(peer = %conn.peer_addr(), content_type, bytes = content.len(), "sending text");
        conn.write_all(content.as_bytes()).await?;
        Ok(())
    }

    async fn send_file(&self, conn: &MsrpConnection, path: &Path) -> Result<()> {
        let mut file = File::open(path).await?;
        let mut buf = vec![0u8; FILE_BUFFER_SIZE];
        let mut total = 0usize;
        loop {
            let n = file.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            conn.write_all(&buf[..n]).await?;
            total += n;
        }
        debug!(peer = %conn.peer_addr(), path = %path.display(), bytes = total, "sent file");
        Ok(())
    }
}
