//! Client Module
//!
//! The request/reply entry point over a single connection.
//!
//! ## Concurrency Model
//! - One outstanding request per connection; replies carry no request ID
//! - `Client` methods take `&mut self`, so a client has a single owner
//! - `SharedClient` serializes callers on a mutex for cross-thread use

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::network::Connection;
use crate::protocol::{Command, FromReply, Reply};

/// A blocking client bound to one server connection
///
/// ```no_run
/// use simpleredis::{Client, Command};
///
/// let mut client = Client::open("127.0.0.1", 6379)?;
/// let _: () = client.query(&Command::new("SET").arg("greeting").arg("hello"))?;
/// let value: Option<String> = client.query(&Command::new("GET").arg("greeting"))?;
/// assert_eq!(value.as_deref(), Some("hello"));
/// # Ok::<(), simpleredis::Error>(())
/// ```
pub struct Client {
    /// Live connection; `None` once closed or after a fatal error
    connection: Option<Connection>,

    config: Config,
}

impl Client {
    /// Connect using the given config
    pub fn connect(config: Config) -> Result<Self> {
        let connection = Connection::connect(&config)?;
        Ok(Self {
            connection: Some(connection),
            config,
        })
    }

    /// Connect to `host:port` with default settings otherwise
    pub fn open(host: impl Into<String>, port: u16) -> Result<Self> {
        Self::connect(Config::builder().host(host).port(port).build())
    }

    /// Use an existing connection
    pub fn from_connection(connection: Connection, config: Config) -> Self {
        Self {
            connection: Some(connection),
            config,
        }
    }

    /// Send a command and return its undecoded reply
    ///
    /// Error replies are returned as `Reply::Error`; they only fail once
    /// converted. A framing or transport error closes the client.
    pub fn execute(&mut self, command: &Command) -> Result<Reply> {
        let connection = self.connection.as_mut().ok_or(Error::ClientClosed)?;

        match connection.request(command) {
            Ok(reply) => Ok(reply),
            Err(e) if e.is_fatal() => {
                tracing::warn!(
                    "Dropping connection to {} after {}: {}",
                    connection.peer_addr(),
                    command.name(),
                    e
                );
                if let Some(connection) = self.connection.take() {
                    if let Err(close_err) = connection.shutdown() {
                        tracing::debug!("Error closing connection: {}", close_err);
                    }
                }
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Send a command and convert its reply
    pub fn query<T: FromReply>(&mut self, command: &Command) -> Result<T> {
        self.execute(command)?.convert()
    }

    /// Close the connection; later calls fail with `ClientClosed`
    pub fn close(&mut self) -> Result<()> {
        match self.connection.take() {
            Some(connection) => connection.shutdown(),
            None => Ok(()),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.connection.is_none()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Wrap this client for use from several threads
    pub fn into_shared(self) -> SharedClient {
        SharedClient::new(self)
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::debug!("Error closing client: {}", e);
        }
    }
}

/// A client shared between threads
///
/// Each request holds the lock from send until its reply is decoded, so
/// commands from different threads never interleave on the wire.
#[derive(Clone)]
pub struct SharedClient {
    inner: Arc<Mutex<Client>>,
}

impl SharedClient {
    pub fn new(client: Client) -> Self {
        Self {
            inner: Arc::new(Mutex::new(client)),
        }
    }

    pub fn execute(&self, command: &Command) -> Result<Reply> {
        self.inner.lock().execute(command)
    }

    pub fn query<T: FromReply>(&self, command: &Command) -> Result<T> {
        self.inner.lock().query(command)
    }

    pub fn close(&self) -> Result<()> {
        self.inner.lock().close()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().is_closed()
    }
}
