// libril/src/transport/socket.rs

//! Unix-domain socket transport, the modem daemon's native channel.

use std::io::BufReader;
use std::net::Shutdown;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

use log::debug;

use crate::constants::MAX_FRAME_LEN;
use crate::protocol::frame::Frame;
use crate::transport::traits::{FrameSink, FrameSource, Transport};
use crate::{Error, Result};

enum Endpoint {
    Path(PathBuf),
    /// A pre-connected stream, usable for a single connection.
    Stream(Option<UnixStream>),
}

/// Length-prefixed frames over a Unix stream socket.
pub struct UnixSocketTransport {
    endpoint: Endpoint,
    max_frame_len: usize,
}

impl UnixSocketTransport {
    /// Connect to the daemon socket at `path` on each `connect`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            endpoint: Endpoint::Path(path.as_ref().to_path_buf()),
            max_frame_len: MAX_FRAME_LEN,
        }
    }

    /// Wrap an already connected stream (e.g. one end of a socket pair).
    pub fn from_stream(stream: UnixStream) -> Self {
        Self {
            endpoint: Endpoint::Stream(Some(stream)),
            max_frame_len: MAX_FRAME_LEN,
        }
    }

    pub fn with_max_frame_len(mut self, max_frame_len: usize) -> Self {
        self.max_frame_len = max_frame_len;
        self
    }

    fn open(&mut self) -> Result<UnixStream> {
        match &mut self.endpoint {
            Endpoint::Path(path) => {
                debug!("connecting to {}", path.display());
                Ok(UnixStream::connect(path)?)
            }
            Endpoint::Stream(stream) => stream
                .take()
                .ok_or_else(|| Error::InvalidState("socket stream already consumed".into())),
        }
    }
}

struct SocketSource {
    reader: BufReader<UnixStream>,
    max_frame_len: usize,
}

struct SocketSink {
    stream: UnixStream,
    closed: bool,
}

impl Transport for UnixSocketTransport {
    fn connect(&mut self) -> Result<(Box<dyn FrameSource>, Box<dyn FrameSink>)> {
        let stream = self.open()?;
        let read_half = stream.try_clone()?;
        let source = SocketSource {
            reader: BufReader::new(read_half),
            max_frame_len: self.max_frame_len,
        };
        let sink = SocketSink {
            stream,
            closed: false,
        };
        Ok((Box::new(source), Box::new(sink)))
    }

    fn describe(&self) -> String {
        match &self.endpoint {
            Endpoint::Path(path) => format!("unix:{}", path.display()),
            Endpoint::Stream(_) => "unix:<stream>".to_string(),
        }
    }
}

impl FrameSource for SocketSource {
    fn read_frame(&mut self) -> Result<Vec<u8>> {
        Frame::read_from(&mut self.reader, self.max_frame_len)
    }
}

impl FrameSink for SocketSink {
    fn write_frame(&mut self, body: &[u8]) -> Result<()> {
        if self.closed {
            return Err(Error::Transport("socket closed".into()));
        }
        Frame::write_to(&mut self.stream, body)
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        // shutting down both directions wakes the reader with EOF
        match self.stream.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
