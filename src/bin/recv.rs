//! Receiver: acknowledges every byte read with 0xFF until interrupted.

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use uart_ack::config::ReceiverArgs;
use uart_ack::{logging, signal, Receiver, SerialLink};

fn main() {
    let args = ReceiverArgs::parse();
    logging::init(args.variant.precision());

    if let Err(e) = run(&args) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: &ReceiverArgs) -> Result<()> {
    let shutdown = signal::shutdown_flag().context("failed to install signal handlers")?;
    let settings = args.port_settings();
    let link = SerialLink::open(&settings)
        .with_context(|| format!("error opening serial port {}", settings.path))?;
    info!("Listening on {}... Press Ctrl+C to exit.", settings.path);

    let mut receiver = Receiver::new(link, args.variant.options());
    let result = receiver.run(&shutdown, args.idle());
    let stats = receiver.close();
    result.context("link failed")?;

    info!(
        "Exiting after {} bytes ({} repeated frame ids).",
        stats.received, stats.repeated_ids
    );
    Ok(())
}
