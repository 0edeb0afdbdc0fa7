//! # tillprint CLI
//!
//! Command-line interface for receipt printing.
//!
//! ## Usage
//!
//! ```bash
//! # List reachable printers
//! tillprint devices
//!
//! # List supported printer types
//! tillprint profiles
//!
//! # Print a test page
//! tillprint test --type GENERIC_A --interface /dev/ttyUSB0
//! tillprint test --type STAR --interface usb:0519:0001 --connection usb
//!
//! # Print a receipt described in JSON
//! tillprint print --type EPSON --interface /dev/usb/lp0 receipt.json
//!
//! # Serve the HTTP API
//! tillprint serve --listen 0.0.0.0:8080
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use tillprint::{
    api::{PrintRequest, PrintService, PrinterConfigRequest, ReceiptContent},
    job::{DEFAULT_TIMEOUT_MS, PrintResult},
    server::{self, ServerConfig},
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// tillprint - Thermal receipt printer utility
#[derive(Parser, Debug)]
#[command(name = "tillprint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List serial ports and USB printers
    Devices,

    /// List supported printer types
    Profiles,

    /// Open a printer, check it is alive and print a test page
    Test {
        #[command(flatten)]
        printer: PrinterArgs,
    },

    /// Print a receipt from a JSON file ({header, items, total, footer, logo})
    Print {
        #[command(flatten)]
        printer: PrinterArgs,

        /// Receipt content file
        #[arg(value_name = "FILE")]
        receipt: PathBuf,
    },

    /// Serve the HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, env = "TILLPRINT_LISTEN", default_value = "127.0.0.1:8080")]
        listen: String,

        /// Connect timeout for requests that do not set one
        #[arg(long, env = "TILLPRINT_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS)]
        timeout_ms: u64,
    },
}

#[derive(Args, Debug)]
struct PrinterArgs {
    /// Printer type (GENERIC_A/EPSON, GENERIC_B/STAR, GENERIC_C/TANCA)
    #[arg(long = "type", value_name = "TYPE")]
    printer_type: String,

    /// Port path, or usb:<vendorIdHex>:<productIdHex>
    #[arg(long)]
    interface: String,

    /// Connection type: serial or usb
    #[arg(long, default_value = "serial")]
    connection: String,

    /// Connect timeout in milliseconds
    #[arg(long, env = "TILLPRINT_TIMEOUT_MS")]
    timeout_ms: Option<u64>,
}

impl From<PrinterArgs> for PrinterConfigRequest {
    fn from(args: PrinterArgs) -> Self {
        Self {
            printer_type: args.printer_type,
            interface: args.interface,
            connection_type: args.connection,
            timeout_ms: args.timeout_ms,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tillprint=info,tower_http=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether the command succeeded.
async fn run() -> Result<bool, BoxError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Devices => {
            let devices = PrintService::system().list_devices().await;
            if devices.is_empty() {
                println!("No devices found.");
            }
            for device in devices {
                let ids = match (&device.vendor_id, &device.product_id) {
                    (Some(vid), Some(pid)) => format!("{}:{}", vid, pid),
                    _ => "-".to_string(),
                };
                println!(
                    "{:<24} {:<6} {:<10} {}",
                    device.path,
                    device.device_type.unwrap_or("serial"),
                    ids,
                    device.manufacturer.as_deref().unwrap_or("")
                );
            }
            Ok(true)
        }
        Commands::Profiles => {
            for profile in PrintService::system().profiles() {
                println!(
                    "{:<10} {:<6} {:>3} cols  {:<9} {}",
                    profile.id,
                    profile.alias,
                    profile.columns,
                    if profile.raster { "raster" } else { "text-only" },
                    profile.name
                );
            }
            Ok(true)
        }
        Commands::Test { printer } => {
            let config: PrinterConfigRequest = printer.into();
            let result = PrintService::system().test_connection(&config).await;
            Ok(report(&result))
        }
        Commands::Print { printer, receipt } => {
            let text = std::fs::read_to_string(&receipt)
                .map_err(|e| format!("cannot read {}: {}", receipt.display(), e))?;
            let content: ReceiptContent = serde_json::from_str(&text)
                .map_err(|e| format!("{} is not a receipt: {}", receipt.display(), e))?;
            let request = PrintRequest {
                config: printer.into(),
                content,
            };
            let result = PrintService::system().print_receipt(&request).await;
            Ok(report(&result))
        }
        Commands::Serve { listen, timeout_ms } => {
            server::serve(ServerConfig {
                listen_addr: listen,
                default_timeout_ms: timeout_ms,
            })
            .await?;
            Ok(true)
        }
    }
}

fn report(result: &PrintResult) -> bool {
    if result.success {
        println!("{}", result.message);
    } else {
        eprintln!("{}", result.message);
    }
    result.success
}
