//! Session operations abstraction
//!
//! A session is the connection for exactly one request/response exchange.
//! `SessionOps` is the transport seam: `FdSessionOps` drives a real
//! `TcpStream`, tests plug in in-memory connections. `HttpSession` layers
//! timeouts and the exchange primitives (send everything, half-close, read
//! until the peer closes) on top.

use super::{Error, Result};
use bytes::{Bytes, BytesMut};
use log::{debug, trace};
use socket2::{Domain, Protocol, Socket, Type};
use std::io::{self, ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::os::fd::AsRawFd;
use std::time::Duration;

/// Default size of a single read
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Session operations trait
pub trait SessionOps {
    /// Wait until the session is ready for the requested operation
    ///
    /// Returns false if the timeout expired first.
    fn poll(&self, events: PollEvents, timeout: Option<Duration>) -> Result<bool>;

    /// Read data from the session; 0 means the peer closed its side
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Write data to the session
    fn write(&mut self, buf: &[u8]) -> Result<usize>;

    /// Signal that nothing more will be sent, keeping the read side open
    fn shutdown_write(&mut self) -> Result<()>;

    /// Release the session
    fn close(&mut self) -> Result<()>;
}

/// Poll events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollEvents {
    Read,
    Write,
}

/// HTTP session wrapping a transport with session operations
pub struct HttpSession<S: SessionOps> {
    session: S,
    timeout: Option<Duration>,
}

impl<S: SessionOps> HttpSession<S> {
    /// Create a new HTTP session; operations wait indefinitely by default
    pub fn new(session: S) -> Self {
        HttpSession {
            session,
            timeout: None,
        }
    }

    /// Set the timeout for each read and write
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    /// Read data with timeout
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if !self.session.poll(PollEvents::Read, self.timeout)? {
            return Err(Error::Timeout);
        }

        self.session.read(buf)
    }

    /// Write data with timeout
    pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if !self.session.poll(PollEvents::Write, self.timeout)? {
            return Err(Error::Timeout);
        }

        self.session.write(buf)
    }

    /// Write the whole buffer, across as many partial writes as it takes
    pub fn send(&mut self, buf: &[u8]) -> Result<()> {
        let mut written = 0;

        while written < buf.len() {
            match self.write(&buf[written..]) {
                Ok(0) => return Err(Error::ConnectionClosed),
                Ok(n) => written += n,
                Err(Error::Connection(e)) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        trace!("sent {} bytes", written);
        Ok(())
    }

    /// Half-close: tell the peer the request is complete
    pub fn finish_sending(&mut self) -> Result<()> {
        self.session.shutdown_write()
    }

    /// Read until the peer closes the connection
    ///
    /// Reads at most `chunk_size` bytes at a time and accumulates them; only
    /// a zero-length read ends the loop.
    pub fn receive_all(&mut self, chunk_size: usize) -> Result<Bytes> {
        let mut chunk = vec![0u8; chunk_size.max(1)];
        let mut buffer = BytesMut::with_capacity(chunk.len());

        loop {
            match self.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => {
                    trace!("received chunk of {} bytes", n);
                    buffer.extend_from_slice(&chunk[..n]);
                }
                Err(Error::Connection(e)) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        debug!("received {} bytes in total", buffer.len());
        Ok(buffer.freeze())
    }

    /// Close the session
    pub fn close(&mut self) -> Result<()> {
        self.session.close()
    }

    /// Get a reference to the underlying session
    pub fn get_ref(&self) -> &S {
        &self.session
    }
}

/// Plain file descriptor session operations
pub struct FdSessionOps {
    stream: TcpStream,
}

impl FdSessionOps {
    /// Create a new FD session operations from a TCP stream
    pub fn new(stream: TcpStream) -> Self {
        FdSessionOps { stream }
    }
}

impl SessionOps for FdSessionOps {
    fn poll(&self, events: PollEvents, timeout: Option<Duration>) -> Result<bool> {
        use libc::{poll, pollfd, POLLIN, POLLOUT};

        let mut pfd = pollfd {
            fd: self.stream.as_raw_fd(),
            events: match events {
                PollEvents::Read => POLLIN,
                PollEvents::Write => POLLOUT,
            },
            revents: 0,
        };

        let timeout_ms = poll_timeout_ms(timeout);

        loop {
            let result = unsafe { poll(&mut pfd as *mut pollfd, 1, timeout_ms) };

            if result >= 0 {
                return Ok(result > 0);
            }

            let err = io::Error::last_os_error();
            if err.kind() != ErrorKind::Interrupted {
                return Err(Error::Connection(err));
            }
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.stream.read(buf).map_err(Error::from)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.stream.write(buf).map_err(Error::from)
    }

    fn shutdown_write(&mut self) -> Result<()> {
        self.stream.shutdown(Shutdown::Write).map_err(Error::from)
    }

    fn close(&mut self) -> Result<()> {
        match self.stream.shutdown(Shutdown::Both) {
            // The peer closing first is the normal end of an exchange
            Err(e) if e.kind() == ErrorKind::NotConnected => Ok(()),
            other => other.map_err(Error::from),
        }
    }
}

/// Open a TCP connection to `host:port`
///
/// Every resolved address is tried in turn; the last failure is returned if
/// none accepts.
pub fn connect(host: &str, port: u16, timeout: Option<Duration>) -> Result<FdSessionOps> {
    let addrs = (host, port).to_socket_addrs()?;
    let mut last_err = None;

    for addr in addrs {
        debug!("connecting to {}", addr);

        let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
        let connected = match timeout {
            Some(timeout) => socket.connect_timeout(&addr.into(), timeout),
            None => socket.connect(&addr.into()),
        };

        match connected {
            Ok(()) => {
                socket.set_nodelay(true)?;
                return Ok(FdSessionOps::new(socket.into()));
            }
            Err(e) => {
                debug!("connection to {} failed: {}", addr, e);
                last_err = Some(e);
            }
        }
    }

    Err(Error::Connection(last_err.unwrap_or_else(|| {
        io::Error::new(
            ErrorKind::NotFound,
            format!("No addresses found for {}:{}", host, port),
        )
    })))
}

/// Milliseconds argument for `poll(2)`
///
/// Rounds up, so a sub-millisecond timeout still waits instead of becoming
/// a zero-length poll. `None` maps to -1 (wait forever).
fn poll_timeout_ms(timeout: Option<Duration>) -> i32 {
    timeout
        .map(|d| i32::try_from(d.as_nanos().div_ceil(1_000_000)).unwrap_or(i32::MAX))
        .unwrap_or(-1)
}
