/// Connection Management Module
///
/// This module owns the single PostgreSQL connection for the lifetime of
/// the process: opening it from the startup configuration, driving the
/// wire protocol on a background task, and releasing it exactly once.
use crate::config::Config;
use crate::core::Result;
use tokio::task::JoinHandle;
use tokio_postgres::{Client, NoTls};
use tracing::{debug, info};

/// A live database connection, exclusively owned by the execution driver.
///
/// The driver half of the tokio-postgres split runs on a spawned task and
/// resolves once the client is dropped, so `close` both terminates the
/// wire connection and waits for the protocol task to finish.
pub struct Db {
    client: Client,
    driver: JoinHandle<()>,
}

impl Db {
    /// Opens a connection using the resolved configuration.
    ///
    /// The statement timeout travels as a startup option, so every query on
    /// this connection is bounded server-side without further setup.
    pub async fn connect(config: &Config) -> Result<Db> {
        info!(host = %config.host, port = config.port, "connecting");

        let (client, connection) = config.pg().connect(NoTls).await?;
        let driver = tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("connection error: {e}");
            }
        });

        debug!("connection established");
        Ok(Db { client, driver })
    }

    /// The client handle used to issue queries.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Closes the connection and waits for the protocol task to wind down.
    ///
    /// Consuming `self` makes a double close unrepresentable.
    pub async fn close(self) {
        drop(self.client);
        let _ = self.driver.await;
        debug!("connection closed");
    }
}
