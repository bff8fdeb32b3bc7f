use crate::constants::{BUFFER_SIZE, PASV_ACCEPT_TIMEOUT};
use crate::session::Session;
use crate::Config;
use log::debug;
use std::io;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Opens the data connection negotiated earlier: accept on the passive
/// listener, or connect out to the address the client sent with PORT.
pub async fn open_data_connection(
    session: &mut Session,
    _config: &Config,
) -> io::Result<TcpStream> {
    if session.passive {
        let listener = session.pasv_listener.as_ref().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotConnected, "no passive listener bound")
        })?;
        let (stream, addr) = timeout(PASV_ACCEPT_TIMEOUT, listener.accept())
            .await
            .map_err(|_| {
                io::Error::new(io::ErrorKind::TimedOut, "data connection accept timed out")
            })??;
        debug!("accepted data connection from {}", addr);
        Ok(stream)
    } else {
        let peer = session.data_peer.ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotConnected, "no data peer negotiated")
        })?;
        let stream = TcpStream::connect(peer).await?;
        debug!("connected data connection to {}", peer);
        Ok(stream)
    }
}

/// Releases the passive listener after a transfer. A fixed configured
/// data port keeps its listener for reuse by the next PASV.
pub fn finish_data(session: &mut Session, config: &Config) {
    if config.server.data_port == 0 {
        session.pasv_listener = None;
    }
}

/// Copies a byte stream verbatim with a fixed-size buffer and returns
/// the byte count. `timeout_secs` bounds each read; 0 means unlimited.
pub async fn copy_data<R, W>(reader: &mut R, writer: &mut W, timeout_secs: u64) -> io::Result<u64>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buffer = vec![0u8; BUFFER_SIZE];
    let mut total: u64 = 0;
    loop {
        let n = if timeout_secs > 0 {
            timeout(Duration::from_secs(timeout_secs), reader.read(&mut buffer))
                .await
                .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "data read timed out"))??
        } else {
            reader.read(&mut buffer).await?
        };
        if n == 0 {
            break;
        }
        writer.write_all(&buffer[..n]).await?;
        total += n as u64;
    }
    writer.flush().await?;
    Ok(total)
}
