//! Host serial port exposed through the `embedded-hal` serial traits.

use std::io::{self, Read as _, Write as _};
use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};

/// Where and how to open the port. Framing is always 8-N-1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSettings {
    pub path: String,
    pub baud: u32,
    /// Bounds a single write on the port.
    pub timeout: Duration,
}

pub struct SerialLink {
    port: Box<dyn SerialPort>,
}

impl SerialLink {
    pub fn open(settings: &PortSettings) -> serialport::Result<SerialLink> {
        let port = serialport::new(settings.path.as_str(), settings.baud)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(settings.timeout)
            .open()?;
        Ok(SerialLink { port })
    }
}

fn would_block(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

/// Read side: a timeout only means nothing has arrived yet.
fn to_nb(e: io::Error) -> nb::Error<io::Error> {
    if would_block(&e) {
        nb::Error::WouldBlock
    } else {
        nb::Error::Other(e)
    }
}

/// Write side: the port timeout bounds a write, so running out of it is a
/// fault rather than a retry.
fn write_to_nb(e: io::Error) -> nb::Error<io::Error> {
    match e.kind() {
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => nb::Error::WouldBlock,
        _ => nb::Error::Other(e),
    }
}

/// Never waits: reports `WouldBlock` while the input buffer is empty.
impl embedded_hal::serial::Read<u8> for SerialLink {
    type Error = io::Error;

    fn read(&mut self) -> nb::Result<u8, Self::Error> {
        let pending = self
            .port
            .bytes_to_read()
            .map_err(|e| nb::Error::Other(io::Error::from(e)))?;
        if pending == 0 {
            return Err(nb::Error::WouldBlock);
        }
        let mut buf = [0u8; 1];
        match self.port.read(&mut buf) {
            Ok(1) => Ok(buf[0]),
            Ok(_) => Err(nb::Error::WouldBlock),
            Err(e) => Err(to_nb(e)),
        }
    }
}

impl embedded_hal::serial::Write<u8> for SerialLink {
    type Error = io::Error;

    fn write(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        match self.port.write(&[byte]) {
            Ok(1) => Ok(()),
            Ok(_) => Err(nb::Error::WouldBlock),
            Err(e) => Err(write_to_nb(e)),
        }
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        self.port.flush().map_err(write_to_nb)
    }
}
