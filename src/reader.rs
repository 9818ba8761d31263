//! Resynchronising reader for sensor to host frames.
//!
//! Frames are `HEAD, command, payload[8]`. The reader scans one byte at a
//! time for `HEAD`, so it recovers on its own after garbage, a truncated
//! frame, or joining the stream mid-frame. Nothing is buffered between calls:
//! a frame split across two calls is lost and the next call rescans.

use embassy_time::{with_timeout, Duration, Instant};
use embedded_io_async::Read;
use log::{debug, trace, warn};

use crate::config::DEFAULT_READ_TIMEOUT;
use crate::constants::*;
use crate::error::Error;
use crate::frame::{decode_measurement, Frame, Payload, Reply};

/// A byte stream whose reads give up after a timeout.
///
/// Returning fewer bytes than requested, including zero, means no more data
/// arrived in time. It is not an error.
#[allow(async_fn_in_trait)]
pub trait ByteSource {
    type Error: core::fmt::Debug;

    async fn read_timeout(
        &mut self,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, Self::Error>;
}

impl<T: Read> ByteSource for T {
    type Error = T::Error;

    async fn read_timeout(
        &mut self,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, Self::Error> {
        match with_timeout(timeout, self.read(buf)).await {
            Ok(result) => result,
            Err(_) => Ok(0),
        }
    }
}

/// Scans `source` for the next frame.
///
/// `read_timeout` bounds every single read. `time_budget` bounds the whole
/// scan: zero makes exactly one attempt (one header byte), anything else keeps
/// scanning until a frame arrives or the budget has elapsed, in which case
/// [`Frame::NoFrame`] is returned.
///
/// Only transport failures are returned as errors. Stray bytes, unknown
/// command bytes and truncated payloads are logged and skipped.
pub async fn decode_stream<S: ByteSource>(
    source: &mut S,
    read_timeout: Duration,
    time_budget: Duration,
) -> Result<Frame, Error<S::Error>> {
    let start = Instant::now();

    loop {
        if let Some(frame) = scan_once(source, read_timeout).await? {
            return Ok(frame);
        }

        if time_budget.as_ticks() == 0 || start.elapsed() > time_budget {
            trace!("No frame within {} ms", time_budget.as_millis());
            return Ok(Frame::NoFrame);
        }
    }
}

/// [`decode_stream`] with the default per-read timeout.
pub async fn try_read_measurement<S: ByteSource>(
    transport: &mut S,
    budget: Duration,
) -> Result<Frame, Error<S::Error>> {
    decode_stream(transport, DEFAULT_READ_TIMEOUT, budget).await
}

// One scan attempt: a header byte, then possibly a command byte and a payload.
async fn scan_once<S: ByteSource>(
    source: &mut S,
    timeout: Duration,
) -> Result<Option<Frame>, Error<S::Error>> {
    let mut byte = [0u8; 1];

    if read_up_to(source, &mut byte, timeout).await? == 0 {
        return Ok(None);
    }
    if byte[0] != HEAD {
        trace!("Skipping byte {:02X} while looking for frame head", byte[0]);
        return Ok(None);
    }

    if read_up_to(source, &mut byte, timeout).await? == 0 {
        debug!("Frame head without a command byte");
        return Ok(None);
    }

    match byte[0] {
        DATA_REPORT_ID => {
            let Some(payload) = read_payload(source, DATA_REPORT_ID, timeout).await? else {
                return Ok(None);
            };
            debug!("Measurement frame: {:02X?}", payload);
            Ok(Some(Frame::Measurement(decode_measurement(&payload))))
        }
        REPLY_ID => {
            let Some(payload) = read_payload(source, REPLY_ID, timeout).await? else {
                return Ok(None);
            };
            debug!("Reply received: {:02X?}", payload);
            Ok(Some(Frame::Acknowledgment(Reply { payload })))
        }
        other => {
            // False head: the command byte is dropped, not rescanned.
            debug!("Unexpected command byte {:02X} after frame head", other);
            Ok(None)
        }
    }
}

async fn read_payload<S: ByteSource>(
    source: &mut S,
    command: u8,
    timeout: Duration,
) -> Result<Option<Payload>, Error<S::Error>> {
    let mut payload = [0u8; PAYLOAD_LEN];
    let read = read_up_to(source, &mut payload, timeout).await?;
    if read < PAYLOAD_LEN {
        warn!(
            "Incomplete {:02X} frame, got {} of {} payload bytes: {:02X?}",
            command,
            read,
            PAYLOAD_LEN,
            &payload[..read]
        );
        return Ok(None);
    }
    Ok(Some(payload))
}

// Fills `buf` until it is full or a read times out. Returns the bytes read.
async fn read_up_to<S: ByteSource>(
    source: &mut S,
    buf: &mut [u8],
    timeout: Duration,
) -> Result<usize, S::Error> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = source.read_timeout(&mut buf[filled..], timeout).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
