//! Frame sender: sends the first frame straight away, then waits for an
//! ack before each following one.

use core::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use embedded_hal::serial::{Read, Write};
use log::{debug, info};

use crate::error::{Error, PortError};
use crate::frame::{Frame, FrameSource, ACK};

/// Delays applied by the sender.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Timing {
    /// Gap between two checks of the input buffer while waiting for an ack.
    pub poll_interval: Duration,
    /// Pause after each frame before waiting for the next ack.
    pub throttle: Duration,
}

impl Default for Timing {
    fn default() -> Timing {
        Timing {
            poll_interval: Duration::from_millis(100),
            throttle: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum State {
    AwaitingAckOrFirst,
    Sending,
    Throttling { until: Instant },
}

/// Object for holding sender state.
pub struct Sender<P>
where
    P: Read<u8> + Write<u8>,
    <P as Read<u8>>::Error: fmt::Debug,
    <P as Write<u8>>::Error: fmt::Debug,
{
    port: P,
    timing: Timing,
    frames: FrameSource,
    first: bool,
    state: State,
    sent: u64,
}

impl<P> Sender<P>
where
    P: Read<u8> + Write<u8>,
    <P as Read<u8>>::Error: fmt::Debug,
    <P as Write<u8>>::Error: fmt::Debug,
{
    pub fn new(port: P, timing: Timing) -> Sender<P> {
        Sender {
            port,
            timing,
            frames: FrameSource::new(),
            first: true,
            state: State::AwaitingAckOrFirst,
            sent: 0,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn frames_sent(&self) -> u64 {
        self.sent
    }

    /// Perform one state transition. Returns the frame if one went out on
    /// this call.
    ///
    /// A write that would block leaves the sender in `Sending` and returns
    /// `Error::WouldBlock`; the same frame is retried on the next call.
    pub fn poll(&mut self) -> Result<Option<Frame>, PortError<P>> {
        let (state, sent) = match self.state {
            State::AwaitingAckOrFirst => {
                if self.first || self.drain_for_ack()? {
                    (State::Sending, None)
                } else {
                    (State::AwaitingAckOrFirst, None)
                }
            }
            State::Sending => {
                let frame = self.frames.peek();
                let byte = frame.to_byte();
                if let Err(e) = self.port.write(byte) {
                    return Err(Error::from_write(e));
                }
                self.frames.next();
                self.first = false;
                self.sent += 1;
                info!("Sent: {:08b} (Hex: {:02X}, Dec: {})", byte, byte, byte);
                let until = Instant::now() + self.timing.throttle;
                (State::Throttling { until }, Some(frame))
            }
            State::Throttling { until } => {
                if Instant::now() >= until {
                    (State::AwaitingAckOrFirst, None)
                } else {
                    (self.state, None)
                }
            }
        };
        self.state = state;
        Ok(sent)
    }

    /// How long a caller can sleep after a `poll` that made no progress.
    pub fn next_wake(&self) -> Duration {
        match self.state {
            State::AwaitingAckOrFirst if self.first => Duration::from_secs(0),
            State::AwaitingAckOrFirst | State::Sending => self.timing.poll_interval,
            State::Throttling { until } => until.saturating_duration_since(Instant::now()),
        }
    }

    /// Drive the sender until `shutdown` is raised or the port fails.
    pub fn run(&mut self, shutdown: &AtomicBool) -> Result<(), PortError<P>> {
        while !shutdown.load(Ordering::Relaxed) {
            let before = self.state;
            match self.poll() {
                Ok(_) | Err(Error::WouldBlock) => {}
                Err(e) => return Err(e),
            }
            if self.state == before {
                std::thread::sleep(self.next_wake());
            }
        }
        Ok(())
    }

    /// Read everything waiting in the input buffer. True if an ack was in it.
    fn drain_for_ack(&mut self) -> Result<bool, PortError<P>> {
        let mut seen = false;
        loop {
            match self.port.read() {
                Ok(ACK) => seen = true,
                Ok(other) => debug!("Ignoring 0x{:02X} while waiting for ack", other),
                Err(nb::Error::WouldBlock) => return Ok(seen),
                Err(e) => return Err(Error::from_read(e)),
            }
        }
    }

    /// Release the port. Returns the number of frames sent.
    pub fn close(self) -> u64 {
        let Sender { port, sent, .. } = self;
        drop(port);
        info!("Serial port closed.");
        sent
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }
}
