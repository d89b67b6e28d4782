//! Byte-stream transports.
//!
//! The bulb speaks over a Bluetooth serial (RFCOMM) channel. Pairing and
//! binding the channel is left to the operating system; this module only
//! needs something that reads and writes bytes, such as `/dev/rfcomm0` or a
//! TCP bridge to the serial port.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;

use aurabulb_protocol::{FrameReader, Unstuffing};
use tracing::trace;

/// Size of a single read from the stream.
const READ_CHUNK_SIZE: usize = 4096;

/// A blocking request/response link to a bulb.
pub trait Transport {
    /// Write one complete frame and block until one complete reply frame has
    /// been received.
    fn exchange(&mut self, frame: &[u8]) -> io::Result<Vec<u8>>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn exchange(&mut self, frame: &[u8]) -> io::Result<Vec<u8>> {
        (**self).exchange(frame)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn exchange(&mut self, frame: &[u8]) -> io::Result<Vec<u8>> {
        (**self).exchange(frame)
    }
}

/// Transport over any bidirectional byte stream.
///
/// Replies are delimited by the bulb's STX/ETX markers, so a reply split
/// across several reads is reassembled before it is returned. How the end
/// of a reply is found follows the [`Unstuffing`] policy, see
/// [`FrameReader`].
#[derive(Debug)]
pub struct StreamTransport<S> {
    stream: S,
    reader: FrameReader,
}

impl<S: Read + Write> StreamTransport<S> {
    /// Wrap an already connected stream.
    pub fn new(stream: S) -> Self {
        StreamTransport {
            stream,
            reader: FrameReader::new(),
        }
    }

    /// Set how reply boundaries are found.
    pub fn with_unstuffing(mut self, unstuffing: Unstuffing) -> Self {
        self.reader = FrameReader::new().with_unstuffing(unstuffing);
        self
    }

    /// Read and drop whatever the bulb sends right after connecting.
    ///
    /// The greeting is not framed like a reply, so exactly one read is
    /// consumed. Returns the discarded bytes.
    pub fn discard_greeting(&mut self) -> io::Result<Vec<u8>> {
        let mut buf = [0u8; READ_CHUNK_SIZE];
        let n = self.stream.read(&mut buf)?;
        trace!(greeting = %hex::encode(&buf[..n]), "discarded greeting");
        Ok(buf[..n].to_vec())
    }

    /// Block until one complete frame has been read.
    pub fn read_frame(&mut self) -> io::Result<Vec<u8>> {
        let mut buf = [0u8; READ_CHUNK_SIZE];
        loop {
            if let Some(frame) = self.reader.decode() {
                return Ok(frame);
            }
            let n = match self.stream.read(&mut buf) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if n == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "link closed before a complete reply arrived",
                ));
            }
            self.reader.push(&buf[..n]);
        }
    }

    /// Get the underlying stream.
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Consume the transport, returning the underlying stream.
    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl StreamTransport<File> {
    /// Open a serial device node, e.g. a bound RFCOMM channel.
    pub fn open_device(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Ok(StreamTransport::new(file))
    }
}

impl StreamTransport<TcpStream> {
    /// Connect to a TCP bridge in front of the serial link.
    ///
    /// Without a read timeout a reply that never arrives blocks forever.
    pub fn connect_tcp(
        addr: impl ToSocketAddrs,
        read_timeout: Option<Duration>,
    ) -> io::Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_read_timeout(read_timeout)?;
        stream.set_nodelay(true)?;
        Ok(StreamTransport::new(stream))
    }
}

impl<S: Read + Write> Transport for StreamTransport<S> {
    fn exchange(&mut self, frame: &[u8]) -> io::Result<Vec<u8>> {
        // Only one request is ever in flight, so anything still buffered
        // is a stray frame that does not answer this request.
        if self.reader.buffered_len() > 0 {
            trace!(bytes = self.reader.buffered_len(), "dropping stale input");
            self.reader.clear();
        }
        self.stream.write_all(frame)?;
        self.stream.flush()?;
        self.read_frame()
    }
}
