//! Error types for cowstream.

use std::io;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
/// This is a common Rust pattern (see `std::io::Result`).
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in cowstream.
///
/// By having a single error type, error handling stays consistent across
/// the whole crate. Note what is *not* here: negative counts and
/// out-of-bounds buffer slices cannot be expressed against `&[u8]` /
/// `&mut [u8]`, and a non-seekable backing source is rejected by the
/// `Seek` trait bound at compile time.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error from the backing source.
    ///
    /// This wraps `std::io::Error` from read/seek operations against the
    /// source the stream was constructed over.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The page size passed at construction was zero.
    #[error("page size must be a positive number of bytes")]
    InvalidPageSize,

    /// A seek target resolved to a negative offset or overflowed `u64`.
    #[error("seek target out of the representable offset range")]
    SeekOverflow,

    /// A seek target resolved past the current logical length.
    ///
    /// Unlike raw file handles, this stream does not allow positioning
    /// past end-of-stream.
    #[error("seek target {target} is past end of stream (length {len})")]
    SeekPastEnd { target: u64, len: u64 },

    /// A write's end offset would overflow `u64`.
    #[error("write would extend the stream past the maximum length")]
    LengthOverflow,

    /// `set_len` was called; truncation and explicit resize are unsupported.
    #[error("set_len is not supported; the stream only grows via appends")]
    SetLenUnsupported,
}

/// Lets the `std::io` trait impls surface crate errors losslessly.
///
/// `Io` unwraps back to the inner error; everything else becomes an
/// `io::Error` with this `Error` preserved as its source.
impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(e) => e,
            Error::SetLenUnsupported => io::Error::new(io::ErrorKind::Unsupported, err),
            _ => io::Error::new(io::ErrorKind::InvalidInput, err),
        }
    }
}
