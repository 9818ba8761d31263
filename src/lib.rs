//! Frame codec and driver for the SDS011 particulate matter sensor.
//!
//! The sensor talks over a 9600 baud UART. The host sends fixed 19-byte
//! command frames ([`command`]) and the sensor answers with 10-byte
//! measurement or reply frames, which [`reader::decode_stream`] picks out of
//! the byte stream. [`Sds011`] ties both to an injected serial port.
#![cfg_attr(not(test), no_std)]

use embassy_time::Duration;
use embedded_io_async::{Read, Write};
use log::debug;

mod constants;
pub use constants::*;

mod error;
pub use error::*;

mod config;
pub use config::*;

pub mod command;
pub use command::{CommandKind, Mode, OutgoingCommand, ReportingMode, WireFrame};

pub mod frame;
pub use frame::{Frame, Measurement, PacketStatus, Reply};

pub mod reader;
pub use reader::ByteSource;

#[cfg(test)]
mod mock;

/// Longest rest period the sensor accepts, in minutes.
pub const MAX_DUTY_CYCLE_MINUTES: u8 = 30;

/// Represents an SDS011 air quality sensor attached to a serial port.
///
/// The port is owned by the caller, who opens and configures it; the driver
/// only reads and writes frames.
///
/// # Type Parameters
///
/// * `Serial`: The serial interface used to communicate with the sensor.
///   It must implement `embedded_io_async::Read` and `embedded_io_async::Write`.
pub struct Sds011<Serial> {
    serial: Serial,
    config: Config,
}

impl<S> Sds011<S>
where
    S: Read + Write,
{
    /// Creates a new `Sds011` driver over `serial`.
    pub fn new(serial: S, config: Config) -> Self {
        Self { serial, config }
    }

    /// Returns the serial port, consuming the driver.
    pub fn release(self) -> S {
        self.serial
    }

    /// Sets the rest period between 60 second measurement windows.
    ///
    /// # Arguments
    ///
    /// * `minutes`: Rest period in minutes, 0 (continuous) to 30.
    ///
    /// # Returns
    ///
    /// * `Err(Error::InvalidArgument)` if `minutes` is greater than 30; nothing is sent.
    /// * `Err(Error::Transport)` if the write failed.
    pub async fn set_duty_cycle(&mut self, minutes: u8) -> Result<(), Error<S::Error>> {
        if minutes > MAX_DUTY_CYCLE_MINUTES {
            log::error!("Duty cycle {} out of range (0-30)", minutes);
            return Err(Error::InvalidArgument);
        }
        debug!("Setting sds011 to read every {} minutes", minutes);
        self.send(OutgoingCommand::new(CommandKind::DutyCycle, Mode::Set, minutes))
            .await
    }

    /// Wakes the sensor up.
    pub async fn wake(&mut self) -> Result<(), Error<S::Error>> {
        debug!("Sending wake command");
        self.send(OutgoingCommand::new(CommandKind::SleepWake, Mode::Set, 0x01))
            .await
    }

    /// Puts the sensor to sleep.
    pub async fn sleep(&mut self) -> Result<(), Error<S::Error>> {
        debug!("Sending sleep command");
        self.send(OutgoingCommand::new(CommandKind::SleepWake, Mode::Set, 0x00))
            .await
    }

    /// Switches between active and passive reporting.
    pub async fn set_reporting_mode(
        &mut self,
        mode: ReportingMode,
    ) -> Result<(), Error<S::Error>> {
        debug!("Setting reporting mode to {:?}", mode);
        self.send(OutgoingCommand::new(
            CommandKind::ReportingMode,
            Mode::Set,
            mode as u8,
        ))
        .await
    }

    /// Asks the sensor for a setting. The answer arrives as
    /// [`Frame::Acknowledgment`] on a later [`read_frame`](Self::read_frame).
    pub async fn query(&mut self, kind: CommandKind) -> Result<(), Error<S::Error>> {
        debug!("Querying {:?}", kind);
        self.send(OutgoingCommand::new(kind, Mode::Get, 0x00)).await
    }

    /// Reads the next frame of any kind within `budget`.
    ///
    /// See [`reader::decode_stream`] for the budget semantics.
    pub async fn read_frame(&mut self, budget: Duration) -> Result<Frame, Error<S::Error>> {
        reader::decode_stream(&mut self.serial, self.config.read_timeout, budget).await
    }

    /// Reads frames until a measurement arrives, skipping replies.
    ///
    /// Returns `Ok(None)` if `budget` runs out first. A zero budget makes a
    /// single attempt.
    pub async fn read_measurement(
        &mut self,
        budget: Duration,
    ) -> Result<Option<Measurement>, Error<S::Error>> {
        let start = embassy_time::Instant::now();
        loop {
            let remaining = budget
                .checked_sub(start.elapsed())
                .unwrap_or(Duration::from_ticks(0));
            match self.read_frame(remaining).await? {
                Frame::Measurement(measurement) => return Ok(Some(measurement)),
                Frame::NoFrame => return Ok(None),
                Frame::Acknowledgment(reply) => {
                    debug!("Skipping reply to command {:02X}", reply.opcode());
                    if remaining.as_ticks() == 0 {
                        return Ok(None);
                    }
                }
            }
        }
    }

    async fn send(&mut self, command: OutgoingCommand) -> Result<(), Error<S::Error>> {
        let frame = command::build_addressed_command(command, self.config.id);
        debug!("Executing command: {:02X?}", frame);
        self.serial.write_all(&frame).await?;
        self.serial.flush().await?;
        Ok(())
    }
}
