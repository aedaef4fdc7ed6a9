use core::fmt;

/// The possible errors the sender and receiver can return.
#[derive(Debug)]
pub enum Error<WE, RE>
where
    WE: fmt::Debug,
    RE: fmt::Debug,
{
    /// Nothing to do yet; call again later.
    WouldBlock,
    /// A write kept reporting `WouldBlock` and was abandoned.
    Stalled,
    Writer(WE),
    Reader(RE),
}

impl<WE, RE> Error<WE, RE>
where
    WE: fmt::Debug,
    RE: fmt::Debug,
{
    pub fn is_would_block(&self) -> bool {
        matches!(self, Error::WouldBlock)
    }

    pub(crate) fn from_write(err: nb::Error<WE>) -> Error<WE, RE> {
        match err {
            nb::Error::WouldBlock => Error::WouldBlock,
            nb::Error::Other(e) => Error::Writer(e),
        }
    }

    pub(crate) fn from_read(err: nb::Error<RE>) -> Error<WE, RE> {
        match err {
            nb::Error::WouldBlock => Error::WouldBlock,
            nb::Error::Other(e) => Error::Reader(e),
        }
    }
}

impl<WE, RE> fmt::Display for Error<WE, RE>
where
    WE: fmt::Debug + fmt::Display,
    RE: fmt::Debug + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::WouldBlock => f.write_str("operation would block"),
            Error::Stalled => f.write_str("serial write stalled"),
            Error::Writer(e) => write!(f, "serial write failed: {}", e),
            Error::Reader(e) => write!(f, "serial read failed: {}", e),
        }
    }
}

impl<WE, RE> std::error::Error for Error<WE, RE>
where
    WE: fmt::Debug + fmt::Display,
    RE: fmt::Debug + fmt::Display,
{
}

/// Error type for a port that implements both serial traits.
pub type PortError<P> = Error<
    <P as embedded_hal::serial::Write<u8>>::Error,
    <P as embedded_hal::serial::Read<u8>>::Error,
>;
