//! CLI front-end for seatplan - HTTP server plus local preview/generate
//!
//! Usage:
//!   seatplan_cli serve [--bind 0.0.0.0] [--port 8080]
//!   seatplan_cli preview --students s.xlsx --rooms rooms.xlsx
//!   seatplan_cli generate --students s.csv --rows 5 --columns 6 -o chart.pdf

use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{ensure, Context};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use seatplan::server::config::{DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT};
use seatplan::server::{self, ServerConfig};
use seatplan::service::{self, RoomSource, SeatingRequest, Upload};
use seatplan::{AllocationOrder, RoomSpec};

/// Seat allocation and seating chart generator.
#[derive(Debug, Parser)]
#[command(name = "seatplan_cli", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server.
    Serve(ServeArgs),
    /// Print the preview JSON for local files.
    Preview(InputArgs),
    /// Write the seating chart PDF for local files.
    Generate {
        #[command(flatten)]
        input: InputArgs,
        /// Output PDF path.
        #[arg(short, long, default_value = "seating_chart.pdf")]
        output: PathBuf,
    },
}

#[derive(Debug, Args)]
struct ServeArgs {
    /// Address to listen on.
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED), env = "SEATPLAN_BIND")]
    bind: IpAddr,

    #[arg(long, default_value_t = DEFAULT_PORT, env = "SEATPLAN_PORT")]
    port: u16,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30, env = "SEATPLAN_TIMEOUT_SECS")]
    timeout_secs: u64,

    /// Maximum size of a request body in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES, env = "SEATPLAN_MAX_UPLOAD_BYTES")]
    max_upload_bytes: usize,

    /// Disable permissive CORS headers.
    #[arg(long, env = "SEATPLAN_NO_CORS")]
    no_cors: bool,
}

impl ServeArgs {
    fn into_server_config(self) -> anyhow::Result<ServerConfig> {
        ensure!(self.timeout_secs > 0, "--timeout-secs must be at least 1");
        ensure!(
            self.max_upload_bytes > 0,
            "--max-upload-bytes must be at least 1"
        );
        Ok(ServerConfig {
            bind_addr: SocketAddr::new(self.bind, self.port),
            request_timeout: Duration::from_secs(self.timeout_secs),
            max_upload_bytes: self.max_upload_bytes,
            cors: !self.no_cors,
        })
    }
}

#[derive(Debug, Args)]
struct InputArgs {
    /// Student roster (XLSX, CSV or TSV).
    #[arg(long)]
    students: Option<PathBuf>,

    /// Room matrix (XLSX, CSV or TSV).
    #[arg(long, conflicts_with = "rows")]
    rooms: Option<PathBuf>,

    /// Manual room: number of seat rows.
    #[arg(long, requires = "columns")]
    rows: Option<u32>,

    /// Manual room: number of seat columns.
    #[arg(long, requires = "rows")]
    columns: Option<u32>,

    /// Manual room: students sharing one seat.
    #[arg(long, default_value_t = 1)]
    per_seat: u32,

    /// `roll` or `alphabetical`.
    #[arg(long, default_value = "roll")]
    order: String,
}

fn read_upload(path: &Path) -> anyhow::Result<Upload> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned());
    Ok(Upload::new(file_name, bytes))
}

impl InputArgs {
    fn into_request(self) -> anyhow::Result<SeatingRequest> {
        let order: AllocationOrder = self.order.parse()?;
        let rooms = match (self.rows, self.columns, &self.rooms) {
            (Some(rows), Some(columns), _) => {
                RoomSource::Manual(RoomSpec::new(rows, columns, self.per_seat)?)
            }
            (_, _, Some(path)) => RoomSource::File(read_upload(path)?),
            _ => anyhow::bail!("either --rooms or --rows/--columns is required"),
        };
        let students = self.students.as_deref().map(read_upload).transpose()?;
        Ok(SeatingRequest {
            students,
            rooms,
            order,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,seatplan=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Serve(args) => {
            let config = args.into_server_config()?;
            server::run(config).await.context("server failed")?;
        }
        Command::Preview(input) => {
            let request = input.into_request()?;
            let response = service::preview(&request).context("preview failed")?;
            let json = serde_json::to_string_pretty(&response).context("serializing preview")?;
            println!("{json}");
        }
        Command::Generate { input, output } => {
            let request = input.into_request()?;
            let document = service::generate(&request).context("generate failed")?;
            fs::write(&output, &document.bytes)
                .with_context(|| format!("writing {}", output.display()))?;
            tracing::info!(
                path = %output.display(),
                placed = document.placed,
                unassigned = document.unassigned,
                "seating chart written"
            );
            for row_error in &document.row_errors {
                tracing::warn!(%row_error, "row skipped");
            }
            for warning in &document.warnings {
                tracing::warn!(%warning, "load warning");
            }
        }
    }
    Ok(())
}
