//! Echo side of the link: every byte read is answered with [`ACK`].

use core::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use embedded_hal::serial::{Read, Write};
use log::{debug, info, warn};

use crate::error::{Error, PortError};
use crate::frame::{Counter, Frame, ACK};

/// Tries at an ack write, or at its flush, that reports `WouldBlock` before
/// the receiver gives up with `Error::Stalled`.
const ACK_ATTEMPTS: u32 = 10_000;

/// How the receiver acknowledges.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Options {
    /// Flush the port after each ack.
    pub flush_ack: bool,
    /// Log a line for each ack sent.
    pub log_ack: bool,
}

impl Options {
    /// Variant A: flush every ack, log receptions only.
    pub fn flushing() -> Options {
        Options {
            flush_ack: true,
            log_ack: false,
        }
    }

    /// Variant B: no explicit flush, log every ack as well.
    pub fn logging() -> Options {
        Options {
            flush_ack: false,
            log_ack: true,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub received: u64,
    /// Frames carrying the same counter as the frame before them.
    pub repeated_ids: u64,
}

pub struct Receiver<P>
where
    P: Read<u8> + Write<u8>,
    <P as Read<u8>>::Error: fmt::Debug,
    <P as Write<u8>>::Error: fmt::Debug,
{
    port: P,
    options: Options,
    last_counter: Option<Counter>,
    stats: Stats,
}

impl<P> Receiver<P>
where
    P: Read<u8> + Write<u8>,
    <P as Read<u8>>::Error: fmt::Debug,
    <P as Write<u8>>::Error: fmt::Debug,
{
    pub fn new(port: P, options: Options) -> Receiver<P> {
        Receiver {
            port,
            options,
            last_counter: None,
            stats: Stats::default(),
        }
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Take one byte off the port and acknowledge it.
    ///
    /// Returns `Error::WouldBlock` if nothing has arrived. Once a byte has
    /// been read the ack is written before returning, or `Error::Stalled`
    /// if the port never accepts it.
    pub fn poll(&mut self) -> Result<u8, PortError<P>> {
        let byte = match self.port.read() {
            Ok(b) => b,
            Err(e) => return Err(Error::from_read(e)),
        };
        info!("Received: 0x{:02X}", byte);
        self.stats.received += 1;
        self.inspect(byte);

        self.push_ack(false)?;
        if self.options.flush_ack {
            self.push_ack(true)?;
        }
        if self.options.log_ack {
            info!("Sent ACK: 0x{:02X}", ACK);
        }
        Ok(byte)
    }

    /// Acknowledge bytes until `shutdown` is raised or the port fails,
    /// sleeping `idle` whenever the input buffer is empty.
    pub fn run(&mut self, shutdown: &AtomicBool, idle: Duration) -> Result<(), PortError<P>> {
        while !shutdown.load(Ordering::Relaxed) {
            match self.poll() {
                Ok(_) => {}
                Err(Error::WouldBlock) => std::thread::sleep(idle),
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Write the ack (or flush it when `flush` is set), retrying a bounded
    /// number of times while the port reports `WouldBlock`.
    fn push_ack(&mut self, flush: bool) -> Result<(), PortError<P>> {
        for _ in 0..ACK_ATTEMPTS {
            let result = if flush {
                self.port.flush()
            } else {
                self.port.write(ACK)
            };
            match result {
                Ok(()) => return Ok(()),
                Err(nb::Error::WouldBlock) => {}
                Err(nb::Error::Other(e)) => return Err(Error::Writer(e)),
            }
        }
        Err(Error::Stalled)
    }

    /// The id check covers every byte; bit 4 only gates the field dump.
    fn inspect(&mut self, byte: u8) {
        let counter = Counter::of_byte(byte);
        match Frame::from_byte(byte) {
            Some(frame) => debug!("Frame id {} value {}", counter.value(), frame.value()),
            None => debug!("0x{:02X} has no marker bit, id {}", byte, counter.value()),
        }
        if self.last_counter == Some(counter) {
            warn!("Frame id {} repeated", counter.value());
            self.stats.repeated_ids += 1;
        }
        self.last_counter = Some(counter);
    }

    /// Release the port.
    pub fn close(self) -> Stats {
        let Receiver { port, stats, .. } = self;
        drop(port);
        info!("Serial port closed.");
        stats
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }
}
