//! # uart-ack
//!
//! Host-side test tools for a single-byte UART link with an ack per byte.
//!
//! The sender transmits frames built from a 3-bit rolling counter, a marker
//! bit and a value (see [`frame`]). The receiver answers every byte it reads
//! with [`ACK`]. After its first frame the sender will not transmit again
//! until it has seen an ack.
//!
//! [`Sender`] and [`Receiver`] are written against the `embedded-hal`
//! serial traits; [`SerialLink`] provides those traits for a host serial
//! port.

pub mod config;
pub mod error;
pub mod frame;
pub mod link;
pub mod logging;
pub mod receiver;
pub mod sender;
pub mod signal;

#[cfg(test)]
mod testing;

pub use error::{Error, PortError};
pub use frame::{Counter, Frame, FrameSource, ACK};
pub use link::{PortSettings, SerialLink};
pub use receiver::Receiver;
pub use sender::Sender;
