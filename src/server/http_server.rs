//! HTTP server implementation.

use std::future::Future;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::signal;
use log::{info, error};
use std::net::SocketAddr;

use crate::parser::WireReader;
use crate::server::config::ServerConfig;
use crate::server::error::Error;
use crate::server::observer::{Event, LogObserver, Observer};
use crate::server::response::{HttpResponse, StatusCode};
use crate::server::router::{RouteTable, Router};

/// An HTTP server.
pub struct HttpServer {
    /// The server configuration.
    pub config: ServerConfig,
    /// The router every connection dispatches through.
    pub router: Router,
}

impl HttpServer {
    /// Create a new HTTP server serving the default routes under `config.base_dir`.
    pub fn new(config: ServerConfig) -> Self {
        let table = RouteTable::with_default_routes(&config.base_dir);
        Self::with_routes(config, table)
    }

    /// Create a server with a custom route table.
    pub fn with_routes(config: ServerConfig, table: RouteTable) -> Self {
        Self {
            config,
            router: Router::new(Arc::new(table), Arc::new(LogObserver)),
        }
    }

    /// Replace the observer that receives connection events.
    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.router = Router::new(self.router.table().clone(), observer);
        self
    }

    /// Display the registered endpoints.
    fn display_server_info(&self) {
        info!("Registered endpoints:");
        for route in self.router.table().routes() {
            info!("  {route}");
        }
        info!("Serving files from {}", self.config.base_dir.display());
    }

    /// Set up the TCP listener.
    async fn setup_listener(&self) -> Result<TcpListener, Error> {
        let listener = TcpListener::bind(&self.config.addr).await?;
        info!("Server listening on http://{addr}", addr = self.config.addr);
        Ok(listener)
    }

    /// Wait for Ctrl+C.
    async fn ctrl_c() {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown"),
            Err(e) => {
                error!("Error setting up Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    }

    /// Handle a new connection.
    fn handle_new_connection(
        mut socket: TcpStream,
        addr: SocketAddr,
        semaphore: Arc<Semaphore>,
        router: Router,
        config: ServerConfig,
        tasks: &mut JoinSet<()>,
    ) {
        // Try to acquire a permit from the semaphore
        let permit = semaphore.try_acquire_owned();

        tasks.spawn(async move {
            let Ok(_permit) = permit else {
                router.observer().on_event(&Event::ConnectionRejected { peer: addr });
                let response = HttpResponse::text(
                    StatusCode::ServiceUnavailable,
                    "Server is at capacity, please try again later",
                );
                let _ = response.write_to(&mut socket).await;
                let _ = socket.shutdown().await;
                return;
            };

            router.observer().on_event(&Event::ConnectionAccepted { peer: addr });
            if let Err(e) = Self::handle_connection(&mut socket, &router, &config).await {
                let error = e.to_string();
                router.observer().on_event(&Event::ConnectionFailed { error: &error });
            }
            let _ = socket.shutdown().await;
        });
    }

    /// Handle connection errors.
    async fn handle_connection_error(e: std::io::Error) {
        error!("Error accepting connection: {e}");
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    }

    /// Perform graceful shutdown.
    async fn perform_shutdown(tasks: &mut JoinSet<()>) {
        // Wait for all tasks to complete (with timeout)
        info!("Waiting for {len} active connections to complete...", len = tasks.len());
        let shutdown_timeout = tokio::time::Duration::from_secs(30);
        let _ = tokio::time::timeout(shutdown_timeout, async {
            while let Some(res) = tasks.join_next().await {
                if let Err(e) = res {
                    error!("Task failed during shutdown: {e}");
                }
            }
        }).await;

        info!("Server shutdown complete");
    }

    /// Start the server and listen for incoming connections until Ctrl+C.
    pub async fn start(&self) -> Result<(), Error> {
        self.display_server_info();
        let listener = self.setup_listener().await?;
        self.serve(listener, Self::ctrl_c()).await
    }

    /// Accept connections on `listener` until `shutdown` resolves.
    ///
    /// Each accepted connection is handled on its own task; at most
    /// `max_connections` are handled at once, the rest get a 503.
    pub async fn serve(&self, listener: TcpListener, shutdown: impl Future<Output = ()>) -> Result<(), Error> {
        // Create a semaphore to limit concurrent connections
        let semaphore = Arc::new(Semaphore::new(self.config.max_connections));

        // Use JoinSet to keep track of all spawned tasks
        let mut tasks = JoinSet::new();

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // Check for shutdown signal
                _ = &mut shutdown => {
                    info!("Shutting down server...");
                    break;
                }

                // Reap finished connections
                Some(res) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = res {
                        error!("Connection task failed: {e}");
                    }
                }

                // Accept new connections
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((socket, addr)) => {
                            Self::handle_new_connection(
                                socket,
                                addr,
                                semaphore.clone(),
                                self.router.clone(),
                                self.config.clone(),
                                &mut tasks,
                            );
                        },
                        Err(e) => Self::handle_connection_error(e).await,
                    }
                }
            }
        }

        // Perform graceful shutdown
        Self::perform_shutdown(&mut tasks).await;

        Ok(())
    }

    /// Handle a single request/response exchange on `socket`.
    ///
    /// Parse and write failures are returned as errors and no response is
    /// attempted; every other failure has already become an error response.
    pub async fn handle_connection(
        socket: &mut (impl AsyncRead + AsyncWrite + Unpin),
        router: &Router,
        config: &ServerConfig,
    ) -> Result<StatusCode, Error> {
        let request = {
            let mut reader = WireReader::with_capacity(config.read_buffer_size, &mut *socket)
                .with_max_line(config.max_line_length);
            reader.read_request(config.body_read_timeout()).await?
        };

        router.observer().on_event(&Event::RequestParsed {
            method: &request.method,
            target: &request.target,
            body_len: request.body.len(),
        });

        let response = router.dispatch(request).await;
        let status = response.status;
        response.write_to(socket).await?;

        router.observer().on_event(&Event::ResponseSent { status });
        Ok(status)
    }
}
