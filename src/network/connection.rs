//! Server Connection
//!
//! One buffered TCP connection to the server.

use std::io::{BufReader, BufWriter};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::protocol::{read_reply_with, write_command, Command, DecodeLimits, Reply};

/// A connection to a single server
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered to avoid packet fragmentation)
    writer: BufWriter<TcpStream>,

    /// Limits applied to every decoded reply
    limits: DecodeLimits,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Connect to the server named by `config`
    ///
    /// Every resolved address is tried in turn; the last failure is returned
    /// if none accepts.
    pub fn connect(config: &Config) -> Result<Self> {
        config.validate()?;

        let addrs: Vec<SocketAddr> = config.addr().to_socket_addrs()?.collect();
        let mut last_err = None;

        for addr in addrs {
            let attempt = match config.connect_timeout() {
                Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
                None => TcpStream::connect(addr),
            };
            match attempt {
                Ok(stream) => return Self::from_stream(stream, config),
                Err(e) => {
                    tracing::debug!("Connect to {} failed: {}", addr, e);
                    last_err = Some(e);
                }
            }
        }

        Err(match last_err {
            Some(e) => Error::Io(e),
            None => Error::Config(format!("{} did not resolve to any address", config.addr())),
        })
    }

    /// Wrap an already connected stream
    ///
    /// Sets up buffered I/O and configures timeouts.
    pub fn from_stream(stream: TcpStream, config: &Config) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm; each command is already one write
        stream.set_nodelay(true)?;
        stream.set_read_timeout(config.read_timeout())?;
        stream.set_write_timeout(config.write_timeout())?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        tracing::debug!("Connected to {}", peer_addr);

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::with_capacity(config.write_buffer_size, write_stream),
            limits: config.decode_limits(),
            peer_addr,
        })
    }

    /// Send one command, flushing it to the socket
    pub fn send(&mut self, command: &Command) -> Result<()> {
        tracing::trace!(
            "Sending {} ({} args) to {}",
            command.name(),
            command.arguments().len(),
            self.peer_addr
        );
        write_command(&mut self.writer, command)
    }

    /// Block until one complete reply has been read
    pub fn receive(&mut self) -> Result<Reply> {
        let reply = read_reply_with(&mut self.reader, &self.limits)?;
        tracing::trace!("Received {} reply from {}", reply.kind(), self.peer_addr);
        Ok(reply)
    }

    /// Send a command and read its reply
    pub fn request(&mut self, command: &Command) -> Result<Reply> {
        self.send(command)?;
        self.receive()
    }

    /// Shut down both directions of the socket
    pub fn shutdown(self) -> Result<()> {
        tracing::debug!("Closing connection to {}", self.peer_addr);
        match self.writer.get_ref().shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            // Peer already gone
            Err(e) if e.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}
