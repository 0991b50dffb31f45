use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tracing::{debug, error, info, instrument};

use crate::commands::executable::Executable;
use crate::commands::{reply, Command};
use crate::connection::Connection;
use crate::frame;
use crate::snapshot;
use crate::stats::ServerStats;
use crate::store::Store;
use crate::Error;

/// Per-connection state: the registration id and the currently selected
/// database. New connections always start on database 0.
pub struct Session {
    pub id: u64,
    pub db_index: usize,
}

/// State shared by every connection task: the engine, the counters, the
/// connection table and the shutdown signal.
pub struct Shared {
    pub store: Store,
    pub stats: ServerStats,
    connections: Mutex<HashMap<u64, SocketAddr>>,
    shutdown: broadcast::Sender<()>,
    save_path: PathBuf,
}

impl Shared {
    pub fn new(save_path: PathBuf) -> Shared {
        let (shutdown, _) = broadcast::channel(1);
        Shared {
            store: Store::new(),
            stats: ServerStats::new(),
            connections: Mutex::new(HashMap::new()),
            shutdown,
            save_path,
        }
    }

    pub fn connected_clients(&self) -> usize {
        self.connections.lock().len()
    }

    pub(crate) fn register_connection(&self, id: u64, addr: SocketAddr) {
        self.connections.lock().insert(id, addr);
    }

    pub(crate) fn deregister_connection(&self, id: u64) {
        self.connections.lock().remove(&id);
    }

    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown.subscribe()
    }

    /// Signals the accept loop and every connection task to wind down.
    pub fn begin_shutdown(&self) {
        let _ = self.shutdown.send(());
    }

    /// Synchronous snapshot of all databases, holding the engine lock for
    /// the duration. Publishes the last-save time on success.
    pub fn save(&self) -> crate::Result<()> {
        let store = self.store.lock();
        let saved_at = snapshot::write_snapshot(&store, &self.save_path)?;
        self.stats.record_save(saved_at);
        Ok(())
    }
}

pub async fn run(port: u16, save_path: PathBuf) -> Result<(), Error> {
    let _ = tracing_subscriber::fmt()
        .try_init()
        .map_err(|e| debug!("Failed to initialize global tracing: {}", e));

    let listener = TcpListener::bind(("127.0.0.1", port)).await?;
    let shared = Arc::new(Shared::new(save_path));

    info!("Server listening on {}", listener.local_addr()?);

    let mut shutdown_rx = shared.subscribe_shutdown();
    let mut next_connection_id: u64 = 0;

    loop {
        let (socket, client_address) = tokio::select! {
            accepted = listener.accept() => accepted?,
            _ = shutdown_rx.recv() => break,
        };

        let id = next_connection_id;
        next_connection_id += 1;

        shared.register_connection(id, client_address);
        shared.stats.connection_received();
        info!("Accepted connection from {:?}", client_address);

        let shared = Arc::clone(&shared);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, id, &shared).await {
                error!("connection {id}: {e}");
            }
            shared.deregister_connection(id);
        });
    }

    info!("Listener closed");
    Ok(())
}

#[instrument(name = "connection", skip(stream, shared), fields(connection_id = id))]
async fn handle_connection(
    stream: TcpStream,
    id: u64,
    shared: &Arc<Shared>,
) -> Result<(), Error> {
    let mut conn = Connection::new(stream);
    let mut session = Session { id, db_index: 0 };
    let mut shutdown_rx = shared.subscribe_shutdown();

    loop {
        let read = tokio::select! {
            read = conn.read_frame() => read,
            _ = shutdown_rx.recv() => return Ok(()),
        };

        let frame = match read {
            Ok(Some(frame)) => frame,
            // Peer closed the connection.
            Ok(None) => break,
            Err(e) if e.is::<frame::Error>() => {
                // Malformed input gets an error reply; the connection stays.
                debug!("protocol error: {e}");
                conn.write_frame(&reply::invalid_command()).await?;
                continue;
            }
            Err(e) => return Err(e),
        };

        debug!("received frame: {:?}", frame);

        let cmd = match Command::try_from(frame) {
            Ok(cmd) => cmd,
            Err(e) => {
                debug!("command parse error: {e}");
                conn.write_frame(&e.to_frame()).await?;
                continue;
            }
        };

        match cmd {
            Command::Quit(_) => {
                shared.stats.command_processed();
                break;
            }
            Command::Shutdown(_) => {
                if let Err(e) = shared.save() {
                    error!("snapshot failed during shutdown: {e}");
                    std::process::exit(1);
                }
                shared.begin_shutdown();
                break;
            }
            cmd => {
                let response = match cmd.exec(shared, &mut session) {
                    Ok(frame) => frame,
                    // Only snapshot I/O failures propagate out of exec, and
                    // those are fatal to the whole process.
                    Err(e) => {
                        error!("snapshot failed: {e}");
                        std::process::exit(1);
                    }
                };
                debug!("sending response: {:?}", response);
                conn.write_frame(&response).await?;
                shared.stats.command_processed();
            }
        }
    }

    info!("Connection closed");
    Ok(())
}
