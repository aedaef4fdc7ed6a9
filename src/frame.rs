//! The single-byte frame format.
//!
//! ```text
//!  7   6   5   4   3   2   1   0
//! +-----------+---+---------------+
//! |  counter  | 1 |     value     |
//! +-----------+---+---------------+
//! ```

/// Sent back by the receiver after every byte it takes off the wire.
pub const ACK: u8 = 0xFF;

/// Bit 4 is always set in a frame byte.
pub const MARKER: u8 = 0x10;

/// The values the sender steps through, in order.
pub const VALUES: [u8; 6] = [0, 3, 6, 9, 12, 15];

const COUNTER_MASK: u8 = 0x07;
const COUNTER_SHIFT: u8 = 5;
const VALUE_MASK: u8 = 0x0F;

/// A 3-bit rolling counter.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Counter(u8);

impl Counter {
    pub const fn new() -> Counter {
        Counter(0)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// The counter field (bits 7..5) of any byte, marker bit or not.
    pub fn of_byte(byte: u8) -> Counter {
        Counter::from(byte >> COUNTER_SHIFT)
    }

    /// The following counter value, wrapping from 7 back to 0.
    pub fn next(self) -> Counter {
        Counter((self.0 + 1) & COUNTER_MASK)
    }
}

impl From<u8> for Counter {
    fn from(raw: u8) -> Counter {
        Counter(raw & COUNTER_MASK)
    }
}

/// One frame: a counter and a 4-bit value.
///
/// Both fields are masked on construction, so every `Frame` maps to a
/// well-formed byte.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Frame {
    counter: Counter,
    value: u8,
}

impl Frame {
    pub fn new(counter: Counter, value: u8) -> Frame {
        Frame {
            counter,
            value: value & VALUE_MASK,
        }
    }

    /// Decode a byte off the wire. Returns `None` if the marker bit is clear.
    pub fn from_byte(byte: u8) -> Option<Frame> {
        if byte & MARKER == 0 {
            return None;
        }
        Some(Frame {
            counter: Counter::of_byte(byte),
            value: byte & VALUE_MASK,
        })
    }

    pub fn to_byte(self) -> u8 {
        (self.counter.value() << COUNTER_SHIFT) | MARKER | self.value
    }

    pub fn counter(self) -> Counter {
        self.counter
    }

    pub fn value(self) -> u8 {
        self.value
    }
}

/// Endless supply of frames: the value walks [`VALUES`] and the counter
/// steps by one for every frame produced.
#[derive(Debug, Clone, Default)]
pub struct FrameSource {
    counter: Counter,
    index: usize,
}

impl FrameSource {
    pub fn new() -> FrameSource {
        FrameSource::default()
    }

    /// The frame the next call to `next` will yield.
    pub fn peek(&self) -> Frame {
        Frame::new(self.counter, VALUES[self.index])
    }
}

impl Iterator for FrameSource {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        let frame = self.peek();
        self.counter = self.counter.next();
        self.index = (self.index + 1) % VALUES.len();
        Some(frame)
    }
}
