//! Command line configuration. With no flags given, both tools run with
//! the fixed link parameters: 9600 baud, 8-N-1.

use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::link::PortSettings;
use crate::logging::Precision;
use crate::receiver::Options;
use crate::sender::Timing;

pub const DEFAULT_BAUD: u32 = 9600;

/// Send counter/value frames, one per acknowledgement.
#[derive(Clone, Debug, Parser)]
#[command(name = "uart-ack-send", version)]
pub struct SenderArgs {
    /// Serial device to open
    #[arg(short, long, default_value = "/dev/ttyUSB0")]
    pub port: String,

    #[arg(short, long, default_value_t = DEFAULT_BAUD)]
    pub baud: u32,

    /// Port timeout in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub timeout_ms: u64,

    /// Interval between input buffer checks while waiting for an ack
    #[arg(long, default_value_t = 100)]
    pub poll_ms: u64,

    /// Delay after each frame
    #[arg(long, default_value_t = 500)]
    pub throttle_ms: u64,
}

impl SenderArgs {
    pub fn port_settings(&self) -> PortSettings {
        PortSettings {
            path: self.port.clone(),
            baud: self.baud,
            timeout: Duration::from_millis(self.timeout_ms),
        }
    }

    pub fn timing(&self) -> Timing {
        Timing {
            poll_interval: Duration::from_millis(self.poll_ms),
            throttle: Duration::from_millis(self.throttle_ms),
        }
    }
}

/// Which receiver behaviour to run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Variant {
    /// Flush after every ack, second-resolution timestamps
    A,
    /// Log every ack, microsecond timestamps
    B,
}

impl Variant {
    pub fn options(self) -> Options {
        match self {
            Variant::A => Options::flushing(),
            Variant::B => Options::logging(),
        }
    }

    pub fn precision(self) -> Precision {
        match self {
            Variant::A => Precision::Seconds,
            Variant::B => Precision::Micros,
        }
    }
}

/// Acknowledge every byte received with 0xFF.
#[derive(Clone, Debug, Parser)]
#[command(name = "uart-ack-recv", version)]
pub struct ReceiverArgs {
    /// Serial device to open
    #[arg(short, long, default_value = "/dev/ttyUSB1")]
    pub port: String,

    #[arg(short, long, default_value_t = DEFAULT_BAUD)]
    pub baud: u32,

    #[arg(long, value_enum, default_value_t = Variant::A)]
    pub variant: Variant,

    /// Port timeout in milliseconds; bounds ack writes
    #[arg(long, default_value_t = 1000)]
    pub timeout_ms: u64,

    /// Sleep while no byte is pending, in milliseconds
    #[arg(long, default_value_t = 10)]
    pub idle_ms: u64,
}

impl ReceiverArgs {
    pub fn port_settings(&self) -> PortSettings {
        PortSettings {
            path: self.port.clone(),
            baud: self.baud,
            timeout: Duration::from_millis(self.timeout_ms),
        }
    }

    pub fn idle(&self) -> Duration {
        Duration::from_millis(self.idle_ms)
    }
}
