//! A blocking TCP link between two peers.
//!
//! The link writes frames from the caller's thread. Reads happen on a
//! background thread that forwards each message, and finally the reason
//! the connection ended, over a channel. There's no read timeout: a peer
//! that goes silent without closing the socket leaves the session waiting.

use anyhow::{Error, bail};
use log::{info, warn};
use std::{
    net::{Ipv4Addr, Shutdown, SocketAddr, TcpListener, TcpStream},
    sync::mpsc::Sender,
    thread::{self, JoinHandle},
    time::Duration,
};

use super::{messages::PeerMessage, utils};

/// Default timeout for writing to the peer.
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(1);

/// What the receive loop reports.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PeerEvent {
    Message(PeerMessage),
    /// The loop stopped and won't report anything else.
    Disconnected(String),
}

#[derive(Debug)]
pub struct PeerLink {
    stream: TcpStream,
    peer_addr: SocketAddr,
}

impl PeerLink {
    /// Listen on every interface at `port` and wait for one client.
    ///
    /// # Errors
    ///
    /// Returns an error if the port can't be bound or the accept fails.
    pub fn host(port: u16) -> Result<Self, Error> {
        let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))?;
        info!("waiting for a peer on {}", listener.local_addr()?);
        Self::accept(&listener)
    }

    /// Wait for one client on an already bound listener.
    ///
    /// # Errors
    ///
    /// Returns an error if the accept fails.
    pub fn accept(listener: &TcpListener) -> Result<Self, Error> {
        let (stream, peer_addr) = listener.accept()?;
        info!("{peer_addr} joined");
        Self::from_stream(stream, peer_addr)
    }

    /// Connect to a host.
    ///
    /// This method tries three times with decreasing timeouts (1s, 500ms,
    /// 100ms) before giving up.
    ///
    /// # Errors
    ///
    /// Returns an error if no attempt connects.
    pub fn connect(addr: &SocketAddr) -> Result<Self, Error> {
        let mut connect_timeouts = vec![
            Duration::from_millis(100),
            Duration::from_millis(500),
            Duration::from_secs(1),
        ];
        while let Some(connect_timeout) = connect_timeouts.pop() {
            match TcpStream::connect_timeout(addr, connect_timeout) {
                Ok(stream) => {
                    info!("connected to {addr}");
                    return Self::from_stream(stream, *addr);
                }
                Err(error) => {
                    warn!("couldn't reach {addr}: {error}");
                    thread::sleep(connect_timeout);
                }
            }
        }
        bail!("couldn't connect to {addr}")
    }

    fn from_stream(stream: TcpStream, peer_addr: SocketAddr) -> Result<Self, Error> {
        stream.set_write_timeout(Some(WRITE_TIMEOUT))?;
        stream.set_nodelay(true)?;
        Ok(Self { stream, peer_addr })
    }

    /// # Errors
    ///
    /// Returns an error if the frame can't be written.
    pub fn send(&mut self, message: &PeerMessage) -> Result<(), Error> {
        utils::write_prefixed(&mut self.stream, message)?;
        Ok(())
    }

    /// Start the receive loop. Every frame becomes a
    /// [`PeerEvent::Message`]; the first read error, including the peer
    /// closing the socket, becomes [`PeerEvent::Disconnected`] and ends the
    /// loop. The loop also ends quietly once the receiver is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket can't be cloned for the thread.
    pub fn spawn_receiver<T>(&self, tx: Sender<T>) -> Result<JoinHandle<()>, Error>
    where
        T: From<PeerEvent> + Send + 'static,
    {
        let mut stream = self.stream.try_clone()?;
        let peer_addr = self.peer_addr;
        let handle = thread::Builder::new()
            .name("peer-receiver".to_string())
            .spawn(move || {
                loop {
                    match utils::read_prefixed::<PeerMessage, TcpStream>(&mut stream) {
                        Ok(message) => {
                            if tx.send(PeerEvent::Message(message).into()).is_err() {
                                break;
                            }
                        }
                        Err(error) => {
                            warn!("connection to {peer_addr} ended: {error}");
                            let _ = tx.send(PeerEvent::Disconnected(error.to_string()).into());
                            break;
                        }
                    }
                }
            })?;
        Ok(handle)
    }

    #[must_use]
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// Close both directions, which also ends the receive loop.
    pub fn shutdown(&self) {
        if let Err(error) = self.stream.shutdown(Shutdown::Both) {
            warn!("couldn't shut down the link to {}: {error}", self.peer_addr);
        }
    }
}
