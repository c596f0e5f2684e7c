//! SimpleRedis CLI Client
//!
//! Sends a single command to the server and prints the reply.

use std::process::ExitCode;

use clap::Parser;
use simpleredis::{Client, Command, Config, Reply};
use tracing_subscriber::{fmt, EnvFilter};

/// SimpleRedis CLI
#[derive(Parser, Debug)]
#[command(name = "simpleredis-cli")]
#[command(about = "Send one command to a Redis-compatible server")]
#[command(version)]
struct Args {
    /// Server host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short, long, default_value = "6379")]
    port: u16,

    /// Connect/read/write timeout in milliseconds (0 = none)
    #[arg(short, long, default_value = "0")]
    timeout_ms: u64,

    /// Command name, e.g. PING or GET
    command: String,

    /// Command arguments
    args: Vec<String>,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .host(&args.host)
        .port(args.port)
        .connect_timeout_ms(args.timeout_ms)
        .read_timeout_ms(args.timeout_ms)
        .write_timeout_ms(args.timeout_ms)
        .build();

    let mut client = match Client::connect(config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Could not connect to {}:{}: {}", args.host, args.port, e);
            return ExitCode::FAILURE;
        }
    };

    let command = Command::new(&args.command).args(&args.args);
    let reply = match client.execute(&command) {
        Ok(reply) => reply,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut out = String::new();
    render(&reply, 0, &mut out);
    print!("{}", out);

    if reply.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Format a reply the way redis-cli does
fn render(reply: &Reply, indent: usize, out: &mut String) {
    match reply {
        Reply::Status(_) => out.push_str(&format!("{}\n", reply)),
        Reply::Error(_) => out.push_str(&format!("(error) {}\n", reply)),
        Reply::Integer(_) => out.push_str(&format!("(integer) {}\n", reply)),
        Reply::Bulk(Some(_)) => out.push_str(&format!("{:?}\n", reply.to_string())),
        Reply::Bulk(None) | Reply::MultiBulk(None) => out.push_str("(nil)\n"),
        Reply::MultiBulk(Some(items)) if items.is_empty() => out.push_str("(empty array)\n"),
        Reply::MultiBulk(Some(items)) => {
            let width = items.len().to_string().len();
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(&" ".repeat(indent));
                }
                let prefix = format!("{:>width$}) ", i + 1, width = width);
                out.push_str(&prefix);
                render(item, indent + prefix.len(), out);
            }
        }
    }
}
