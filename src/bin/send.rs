//! Frame sender.
//!
//! Opens the port, sends the first frame, then one frame per ack received,
//! until interrupted.

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use uart_ack::config::SenderArgs;
use uart_ack::logging::{self, Precision};
use uart_ack::{signal, Sender, SerialLink};

fn main() {
    let args = SenderArgs::parse();
    logging::init(Precision::Seconds);

    if let Err(e) = run(&args) {
        error!("Serial error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: &SenderArgs) -> Result<()> {
    let shutdown = signal::shutdown_flag().context("failed to install signal handlers")?;
    let settings = args.port_settings();
    let link = SerialLink::open(&settings)
        .with_context(|| format!("failed to open {}", settings.path))?;
    info!("Connected to {} at {} baud", settings.path, settings.baud);

    let mut sender = Sender::new(link, args.timing());
    let result = sender.run(&shutdown);
    let sent = sender.close();
    result.context("link failed")?;

    info!("Program terminated after {} frames.", sent);
    Ok(())
}
