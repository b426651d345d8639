//! HTTP server implementation.
//!
//! # Request Pipeline
//!
//! 1. Collect the body, bounded by the configured size limit and timeout
//! 2. Match the method and path against the [`Router`]
//! 3. Build an [`ExtractionContext`] carrying the path captures
//! 4. Run the handler registered for the route id, bounded by the timeout
//!
//! Unknown paths yield 404, known paths with the wrong method yield 405
//! with an `Allow` header.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use agora_extract::ExtractionContext;
use agora_router::Router;
use bytes::Bytes;
use http::header::{HeaderValue, ALLOW};
use http::{Request, StatusCode};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::handler::HandlerRegistry;
use crate::response::{self, HttpResponse};
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// The Agora HTTP server.
///
/// Cloning is cheap; clones share the router and handlers.
///
/// # Example
///
/// ```rust,no_run
/// use agora_router::Router;
/// use agora_server::{response, HandlerRegistry, Server, ServerConfig};
/// use http::{Method, StatusCode};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut router = Router::new();
/// router.route(Method::GET, "/ping", "ping")?;
///
/// let mut handlers = HandlerRegistry::new();
/// handlers.register("ping", |_| async { response::text(StatusCode::OK, "pong") });
///
/// let server = Server::new(ServerConfig::default(), router, handlers)?;
/// server.run().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Server {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    config: ServerConfig,
    router: Router,
    handlers: HandlerRegistry,
}

impl Server {
    /// Creates a server.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::MissingHandler`] if a route id in `router`
    /// has no handler.
    pub fn new(
        config: ServerConfig,
        router: Router,
        handlers: HandlerRegistry,
    ) -> Result<Self, ServerError> {
        let mut missing: Vec<&str> = router
            .route_ids()
            .filter(|id| !handlers.contains(id))
            .collect();
        missing.sort_unstable();
        if let Some(route_id) = missing.first() {
            return Err(ServerError::MissingHandler {
                route_id: (*route_id).to_string(),
            });
        }

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                router,
                handlers,
            }),
        })
    }

    /// Returns the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Returns the router.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.inner.router
    }

    /// Runs until SIGINT or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured address is invalid or cannot be
    /// bound.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_with_shutdown(ShutdownSignal::with_os_signals()).await
    }

    /// Binds the configured address and runs until `shutdown` fires.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured address is invalid or cannot be
    /// bound.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr_str = self.inner.config.http_addr();
        let addr = self
            .inner
            .config
            .socket_addr()
            .map_err(|source| ServerError::InvalidAddress {
                addr: addr_str.to_string(),
                source,
            })?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.to_string(),
                source,
            })?;

        self.serve(listener, shutdown).await
    }

    /// Accepts connections on `listener` until `shutdown` fires, then waits
    /// up to the shutdown timeout for open connections to finish.
    ///
    /// # Errors
    ///
    /// Currently infallible once the listener exists.
    pub async fn serve(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let local_addr = listener.local_addr().ok();
        tracing::info!(
            addr = ?local_addr,
            routes = self.inner.router.len(),
            "server listening"
        );

        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                () = shutdown.recv() => {
                    tracing::info!("shutdown signal received, no longer accepting connections");
                    break;
                }
                accepted = listener.accept() => match accepted {
                    Ok((stream, remote_addr)) => {
                        let token = tracker.acquire();
                        let server = self.clone();
                        let shutdown = shutdown.clone();
                        tokio::spawn(async move {
                            server.serve_connection(stream, remote_addr, shutdown).await;
                            drop(token);
                        });
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to accept connection");
                    }
                },
            }
        }

        let drain = tokio::time::timeout(self.inner.config.shutdown_timeout(), tracker.wait_for_idle());
        if drain.await.is_err() {
            tracing::warn!(
                active = tracker.active_connections(),
                "shutdown timeout elapsed with connections still open"
            );
        }

        tracing::info!("server stopped");
        Ok(())
    }

    async fn serve_connection(&self, stream: TcpStream, remote_addr: SocketAddr, shutdown: ShutdownSignal) {
        let io = TokioIo::new(stream);
        let server = self.clone();
        let service = service_fn(move |req: Request<Incoming>| {
            let server = server.clone();
            async move { Ok::<_, Infallible>(server.handle(req).await) }
        });

        let conn = http1::Builder::new().serve_connection(io, service);
        tokio::pin!(conn);

        let result = tokio::select! {
            result = conn.as_mut() => result,
            () = shutdown.recv() => {
                conn.as_mut().graceful_shutdown();
                conn.await
            }
        };

        if let Err(e) = result {
            tracing::debug!(remote = %remote_addr, error = %e, "connection closed with error");
        }
    }

    async fn handle(&self, req: Request<Incoming>) -> HttpResponse {
        let (parts, body) = req.into_parts();
        let config = &self.inner.config;

        let limited = Limited::new(body, config.max_body_bytes());
        let collected = tokio::time::timeout(config.request_timeout(), limited.collect()).await;

        let body = match collected {
            Ok(Ok(collected)) => collected.to_bytes(),
            Ok(Err(e)) if e.downcast_ref::<LengthLimitError>().is_some() => {
                return response::error_json(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "PAYLOAD_TOO_LARGE",
                    &format!("Request body exceeds {} bytes", config.max_body_bytes()),
                );
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "failed to read request body");
                return response::error_json(
                    StatusCode::BAD_REQUEST,
                    "BODY_READ_ERROR",
                    "Failed to read request body",
                );
            }
            Err(_) => {
                tracing::warn!(path = parts.uri.path(), "request body collection timed out");
                return response::error_json(
                    StatusCode::REQUEST_TIMEOUT,
                    "REQUEST_TIMEOUT",
                    "Request body collection timed out",
                );
            }
        };

        self.dispatch(Request::from_parts(parts, body)).await
    }

    /// Routes a request with a fully collected body and runs its handler.
    ///
    /// This is the whole pipeline after body collection, so it can be
    /// driven directly without a socket.
    pub async fn dispatch(&self, request: Request<Bytes>) -> HttpResponse {
        let started = Instant::now();
        let (parts, body) = request.into_parts();
        let method = parts.method.clone();
        let path = parts.uri.path().to_string();
        let router = &self.inner.router;

        let response = if let Some(matched) = router.match_route(&method, &path) {
            let route_id = matched.route_id;
            match self.inner.handlers.get(route_id) {
                Some(handler) => {
                    let ctx = ExtractionContext::new(parts.method, parts.uri, parts.headers, body, matched.params)
                        .with_body_limit(self.inner.config.max_body_bytes());
                    let timeout = self.inner.config.request_timeout();
                    if let Ok(response) = tokio::time::timeout(timeout, handler(ctx)).await {
                        response
                    } else {
                        tracing::warn!(route = route_id, "handler timed out");
                        response::error_json(
                            StatusCode::GATEWAY_TIMEOUT,
                            "HANDLER_TIMEOUT",
                            "Handler execution timed out",
                        )
                    }
                }
                None => response::error_json(
                    StatusCode::NOT_IMPLEMENTED,
                    "NOT_IMPLEMENTED",
                    &format!("No handler for route '{route_id}'"),
                ),
            }
        } else if let Some((methods, _)) = router.match_path(&path) {
            let mut response = response::error_json(
                StatusCode::METHOD_NOT_ALLOWED,
                "METHOD_NOT_ALLOWED",
                &format!("Method {method} not allowed for {path}"),
            );
            if let Ok(allow) = HeaderValue::from_str(&methods.allow_header()) {
                response.headers_mut().insert(ALLOW, allow);
            }
            response
        } else {
            response::error_json(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                &format!("No route for {method} {path}"),
            )
        };

        tracing::info!(
            method = %method,
            path = %path,
            status = response.status().as_u16(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "request completed"
        );
        response
    }
}
