//! In-memory serial port used by the unit tests.

use std::collections::VecDeque;

use embedded_io_async::{ErrorKind, ErrorType, Read, Write};
use log::LevelFilter;

pub fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(LevelFilter::max())
        .is_test(true)
        .try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

impl embedded_io_async::Error for MockError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Scripted receive side plus a record of everything written.
///
/// `None` entries in the receive queue stand for a read that times out.
pub struct MockSerial {
    rx: VecDeque<Option<u8>>,
    pub tx: Vec<u8>,
    chunk: usize,
    fail_when_drained: bool,
    stall_when_drained: bool,
    fail_writes: bool,
}

impl MockSerial {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            rx: bytes.iter().copied().map(Some).collect(),
            tx: Vec::new(),
            chunk: usize::MAX,
            fail_when_drained: false,
            stall_when_drained: false,
            fail_writes: false,
        }
    }

    /// Queues more bytes after the current ones.
    pub fn then(mut self, bytes: &[u8]) -> Self {
        self.rx.extend(bytes.iter().copied().map(Some));
        self
    }

    /// Makes the next read after the queued bytes come back empty.
    pub fn pause(mut self) -> Self {
        self.rx.push_back(None);
        self
    }

    /// Limits every read to at most `chunk` bytes.
    pub fn chunked(mut self, chunk: usize) -> Self {
        self.chunk = chunk;
        self
    }

    /// Reads fail once the queued bytes are consumed.
    pub fn failing(mut self) -> Self {
        self.fail_when_drained = true;
        self
    }

    /// Reads never complete once the queued bytes are consumed.
    pub fn stalling(mut self) -> Self {
        self.stall_when_drained = true;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn is_drained(&self) -> bool {
        self.rx.iter().all(Option::is_none)
    }
}

impl ErrorType for MockSerial {
    type Error = MockError;
}

impl Read for MockSerial {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, MockError> {
        if self.rx.is_empty() {
            if self.fail_when_drained {
                return Err(MockError);
            }
            if self.stall_when_drained {
                core::future::pending::<()>().await;
            }
            return Ok(0);
        }

        if let Some(None) = self.rx.front() {
            self.rx.pop_front();
            return Ok(0);
        }

        let limit = buf.len().min(self.chunk);
        let mut n = 0;
        while n < limit {
            match self.rx.front() {
                Some(Some(byte)) => {
                    buf[n] = *byte;
                    self.rx.pop_front();
                    n += 1;
                }
                _ => break,
            }
        }
        Ok(n)
    }
}

impl Write for MockSerial {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, MockError> {
        if self.fail_writes {
            return Err(MockError);
        }
        self.tx.extend_from_slice(buf);
        Ok(buf.len())
    }

    async fn flush(&mut self) -> Result<(), MockError> {
        Ok(())
    }
}
