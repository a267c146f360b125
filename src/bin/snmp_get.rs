//! snmp-get: Retrieve SNMP OID values.
//!
//! Part of the snmp-walker CLI utilities.

use clap::Parser;
use snmp_walker::cli::args::{CommonArgs, OutputArgs};
use snmp_walker::cli::output::{OutputContext, write_error};
use std::io;
use std::process::ExitCode;
use std::time::Instant;

/// Retrieve one or more SNMP OID values.
#[derive(Debug, Parser)]
#[command(name = "snmp-get", version, about)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    output: OutputArgs,

    /// Send GETNEXT instead of GET.
    #[arg(long = "next")]
    next: bool,

    /// OIDs to retrieve (dotted notation).
    #[arg(required = true, value_name = "OID")]
    oids: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    args.output.init_tracing();

    let session = match args.common.session_builder(&args.output).connect().await {
        Ok(session) => session,
        Err(e) => {
            write_error(&e);
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();
    let oids: Vec<&str> = args.oids.iter().map(String::as_str).collect();
    let result = match (args.next, oids.as_slice()) {
        (true, [oid]) => session.get_next(oid).await,
        (true, _) => {
            eprintln!("Error: --next takes exactly one OID");
            return ExitCode::FAILURE;
        }
        (false, [oid]) => session.get(oid).await,
        (false, _) => session.get_multi(&oids).await,
    };
    let elapsed = start.elapsed();

    match result {
        Ok(response) => {
            let ctx = OutputContext {
                format: args.output.format,
                force_hex: args.output.hex,
            };
            let mut stdout = io::stdout().lock();
            if let Err(e) = ctx.write_varbinds(&mut stdout, &response.varbinds) {
                eprintln!("Error writing output: {}", e);
                return ExitCode::FAILURE;
            }
            if args.output.timing {
                let _ = ctx.write_timing(
                    &mut stdout,
                    &args.common.display_target(),
                    response.varbinds.len(),
                    elapsed,
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            write_error(&e);
            ExitCode::FAILURE
        }
    }
}
