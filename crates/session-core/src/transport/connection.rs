//! The live duplex socket of a connected media session

use std::fmt;
use std::io;
use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::trace;

/// A connected TCP stream, split so one task can read while another writes
///
/// Owned by exactly one [`MediaSession`](crate::MediaSession); dropping it
/// closes the socket.
pub struct MsrpConnection {
    reader: Mutex<OwnedReadHalf>,
    writer: Mutex<OwnedWriteHalf>,
    local: SocketAddr,
    peer: SocketAddr,
}

impl MsrpConnection {
    pub(crate) fn from_stream(stream: TcpStream) -> io::Result<Self> {
        let local = stream.local_addr()?;
        let peer = stream.peer_addr()?;
        stream.set_nodelay(true)?;
        let (reader, writer) = stream.into_split();
        Ok(Self {
            reader: Mutex::new(reader),
            writer: Mutex::new(writer),
            local,
            peer,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Write the whole buffer; concurrent writers are serialized
    pub async fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        let mut writer = self.writer.lock().await;
        writer.write_all(buf).await?;
        writer.flush().await?;
        trace!(peer = %self.peer, bytes = buf.len(), "wrote to media connection");
        Ok(())
    }

    /// Read into `buf`, returning 0 once the peer has closed
    pub async fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.lock().await.read(buf).await
    }

    /// Half-close the write side
    pub async fn shutdown(&self) -> io::Result<()> {
        self.writer.lock().await.shutdown().await
    }
}

impl fmt::Debug for MsrpConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MsrpConnection")
            .field("local", &self.local)
            .field("peer", &self.peer)
            .finish()
    }
}
