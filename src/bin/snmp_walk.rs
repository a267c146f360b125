//! snmp-walk: Walk SNMP subtrees.
//!
//! Part of the snmp-walker CLI utilities.

use clap::Parser;
use snmp_walker::cli::args::{CommonArgs, OutputArgs, WalkArgs};
use snmp_walker::cli::output::{OutputContext, write_error};
use snmp_walker::{UdpSession, VarBind, result_channel};
use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Instant;

/// Walk an SNMP subtree using GETBULK or GETNEXT.
#[derive(Debug, Parser)]
#[command(name = "snmp-walk", version, about)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    walk: WalkArgs,

    /// OID subtree to walk (dotted notation).
    #[arg(value_name = "OID", default_value = "1.3.6.1.2.1")]
    oid: String,
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

    let ctx = OutputContext {
        format: args.output.format,
        force_hex: args.output.hex,
    };

    let start = Instant::now();
    let result = if args.walk.stream {
        stream_walk(&session, &args, ctx).await
    } else {
        collect_walk(&session, &args, ctx).await
    };

    match result {
        Ok(count) => {
            if args.output.timing {
                let _ = ctx.write_timing(
                    &mut io::stdout().lock(),
                    &args.common.display_target(),
                    count,
                    start.elapsed(),
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

async fn collect_walk(
    session: &UdpSession,
    args: &Args,
    ctx: OutputContext,
) -> snmp_walker::Result<usize> {
    let varbinds = if args.walk.use_getnext(args.common.snmp_version) {
        session.walk(&args.oid).await?
    } else {
        session
            .bulk_walk(args.walk.max_repetitions, &args.oid)
            .await?
    };

    let mut stdout = io::stdout().lock();
    if let Err(e) = ctx.write_varbinds(&mut stdout, &varbinds) {
        eprintln!("Error writing output: {}", e);
    }
    Ok(varbinds.len())
}

async fn stream_walk(
    session: &UdpSession,
    args: &Args,
    ctx: OutputContext,
) -> snmp_walker::Result<usize> {
    let (tx, mut stream) = result_channel(64);

    let producer = async {
        if args.walk.use_getnext(args.common.snmp_version) {
            session.stream_walk(&args.oid, tx).await
        } else {
            session
                .stream_bulk_walk(args.walk.max_repetitions, &args.oid, tx)
                .await
        }
    };

    let consumer = async {
        let mut count = 0;
        while let Some(vb) = stream.next().await {
            count += 1;
            print_one(ctx, &vb);
        }
        count
    };

    let (result, count) = tokio::join!(producer, consumer);
    result.map(|()| count)
}

fn print_one(ctx: OutputContext, vb: &VarBind) {
    let mut stdout = io::stdout().lock();
    if ctx.write_varbind(&mut stdout, vb).is_err() {
        return;
    }
    let _ = stdout.flush();
}
