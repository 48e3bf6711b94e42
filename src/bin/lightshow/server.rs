//! HTTP front end: one request per connection, fades on the blocking pool.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use rgb_crossfade::{
    CrossfadeError, FadeOutcome, LightCommand, SharedEngine, Show, StdDelay, colors,
};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;

use crate::Sink;
use crate::args::ServeArgs;
use crate::routes::{Route, RouteError};

pub type Engine = SharedEngine<Sink, StdDelay>;

/// Legs in the hue-cycle show.
const HUE_LEGS: usize = colors::HUE_CYCLE.len();

/// Header lines read before giving up on a request.
const MAX_HEADER_LINES: usize = 64;

/// Bytes of request line and headers read before a request is rejected.
const MAX_HEAD_BYTES: u64 = 8 * 1024;

#[derive(Debug, PartialEq)]
struct Response {
    status: u16,
    reason: &'static str,
    body: String,
}

impl Response {
    fn new(status: u16, reason: &'static str, body: impl Into<String>) -> Self {
        Self {
            status,
            reason,
            body: body.into(),
        }
    }

    fn ok(body: impl Into<String>) -> Self {
        Self::new(200, "OK", body)
    }

    fn to_http(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status,
            self.reason,
            self.body.len(),
            self.body
        )
    }
}

impl From<RouteError> for Response {
    fn from(err: RouteError) -> Self {
        match err {
            RouteError::BadRequest(message) => Response::new(400, "Bad Request", message),
            RouteError::NotFound => Response::new(404, "Not Found", "no such route"),
            RouteError::MethodNotAllowed => {
                Response::new(405, "Method Not Allowed", "only GET is supported")
            }
        }
    }
}

fn fade_response(result: Result<FadeOutcome, CrossfadeError>, done: &str) -> Response {
    match result {
        Ok(FadeOutcome::Completed) => Response::ok(done),
        Ok(FadeOutcome::Cancelled) => Response::ok("Cancelled."),
        Err(CrossfadeError::Busy) => Response::new(409, "Conflict", "a fade is already running"),
        Err(err) => Response::new(500, "Internal Server Error", err.to_string()),
    }
}

/// Accepts connections until `/shutdown` or Ctrl-C.
pub async fn serve(engine: Engine, args: &ServeArgs) -> Result<()> {
    let listener = TcpListener::bind((args.host.as_str(), args.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", args.host, args.port))?;
    info!("listening on {}", listener.local_addr()?);

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(connection) => connection,
                    Err(err) => {
                        warn!("failed to accept connection: {}", err);
                        continue;
                    }
                };
                debug!("connection from {}", peer);
                let engine = engine.clone();
                let shutdown = shutdown_tx.clone();
                let period = args.period;
                tokio::spawn(async move {
                    if let Err(err) = handle_connection(stream, engine, shutdown, period).await {
                        warn!("connection from {} failed: {}", peer, err);
                    }
                });
            }
            _ = shutdown_rx.changed() => {
                info!("shutdown requested");
                break;
            }
            _ = &mut ctrl_c => {
                info!("interrupted, shutting down");
                break;
            }
        }
    }

    engine.close();
    Ok(())
}

async fn handle_connection(
    stream: TcpStream,
    engine: Engine,
    shutdown: watch::Sender<bool>,
    default_period: Duration,
) -> std::io::Result<()> {
    let (reader, mut writer) = stream.into_split();

    let response = match read_head(reader).await? {
        Some(request_line) => {
            let response = match Route::parse(&request_line) {
                Ok(route) => dispatch(route, &engine, &shutdown, default_period).await,
                Err(err) => Response::from(err),
            };
            debug!("{} -> {}", request_line.trim_end(), response.status);
            response
        }
        None => {
            debug!("request head over {} bytes", MAX_HEAD_BYTES);
            Response::new(431, "Request Header Fields Too Large", "request head too large")
        }
    };

    writer.write_all(response.to_http().as_bytes()).await?;
    writer.shutdown().await
}

/// Reads the request line and drains the headers after it.
///
/// Returns `None` when the head does not fit in `MAX_HEAD_BYTES`.
async fn read_head<R>(reader: R) -> std::io::Result<Option<String>>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader.take(MAX_HEAD_BYTES));

    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;

    let mut header = String::new();
    for _ in 0..MAX_HEADER_LINES {
        header.clear();
        if reader.read_line(&mut header).await? == 0 || header.trim().is_empty() {
            break;
        }
    }

    if reader.get_ref().limit() == 0 {
        return Ok(None);
    }
    Ok(Some(request_line))
}

async fn dispatch(
    route: Route,
    engine: &Engine,
    shutdown: &watch::Sender<bool>,
    default_period: Duration,
) -> Response {
    match route {
        Route::Lightshow { iterations, period } => {
            info!("received request to perform {} lightshow iterations", iterations);
            let period = period.unwrap_or(default_period);
            let show = match Show::<HUE_LEGS>::hue_cycle(iterations, period) {
                Ok(show) => show,
                Err(err) => return Response::new(500, "Internal Server Error", err.to_string()),
            };
            run_blocking(engine, LightCommand::Play(show), "Watch the show!").await
        }
        Route::Color(color) => {
            info!("received request to fade to {:?}", color);
            let command = LightCommand::<HUE_LEGS>::Fade {
                target: color,
                period: default_period,
            };
            run_blocking(engine, command, "Color set.").await
        }
        Route::Cancel => {
            info!("received request to cancel the running fade");
            engine.cancel();
            Response::ok("Cancelling.")
        }
        Route::Shutdown => {
            info!("received request to shut server down");
            engine.close();
            let _ = shutdown.send(true);
            Response::ok("Server shutting down...")
        }
    }
}

async fn run_blocking(
    engine: &Engine,
    command: LightCommand<HUE_LEGS>,
    done: &str,
) -> Response {
    let engine = engine.clone();
    match tokio::task::spawn_blocking(move || engine.handle_command(command)).await {
        Ok(result) => fade_response(result, done),
        Err(err) => Response::new(500, "Internal Server Error", format!("fade task failed: {err}")),
    }
}
