//! Host to sensor command frames.
//!
//! Every command is a fixed 19-byte frame:
//!
//! ```text
//! AA B4 | opcode | mode | param | 00 x10 | id1 id2 | checksum | AB
//! ```
//!
//! The checksum is the low byte of the sum of bytes 2 through 16.

use log::debug;

use crate::config::DeviceID;
use crate::constants::*;

/// A fully encoded command frame, ready to be written to the transport.
pub type WireFrame = [u8; COMMAND_FRAME_LEN];

/// Command opcodes understood by the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandKind {
    /// Active (unsolicited reports) or passive (query only) reporting.
    ReportingMode = 0x02,
    /// Sleep (0) or work (1).
    SleepWake = 0x06,
    /// Minutes of rest between 60 second working windows, 0 to 30.
    DutyCycle = 0x08,
}

/// Whether a command sets a value or queries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Mode {
    Get = 0x00,
    Set = 0x01,
}

/// Reporting mode parameter of [`CommandKind::ReportingMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ReportingMode {
    /// The sensor sends a measurement frame on its own after every working window.
    Active = 0x00,
    /// The sensor only reports when queried.
    Passive = 0x01,
}

/// A single command to send to the sensor.
///
/// The parameter's meaning depends on the opcode; no range is enforced here
/// beyond it fitting in a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutgoingCommand {
    pub opcode: u8,
    pub mode: u8,
    pub parameter: u8,
}

impl OutgoingCommand {
    pub const fn new(kind: CommandKind, mode: Mode, parameter: u8) -> Self {
        Self {
            opcode: kind as u8,
            mode: mode as u8,
            parameter,
        }
    }
}

/// Builds a broadcast command frame.
///
/// The checksum covers the opcode, mode and parameter bytes and the two
/// `0xFF` sentinel bytes. Encoding is pure: the same inputs always produce
/// the same bytes.
pub fn build_command(kind: CommandKind, mode: Mode, parameter: u8) -> WireFrame {
    build_addressed_command(OutgoingCommand::new(kind, mode, parameter), DeviceID::default())
}

/// Builds a command frame addressed to a specific sensor.
///
/// With the default (broadcast) id the result is identical to [`build_command`].
pub fn build_addressed_command(command: OutgoingCommand, id: DeviceID) -> WireFrame {
    let mut frame = [0u8; COMMAND_FRAME_LEN];
    frame[0] = HEAD;
    frame[1] = COMMAND_ID;
    frame[2] = command.opcode;
    frame[3] = command.mode;
    frame[4] = command.parameter;
    // 5..15 reserved, zero
    frame[15] = id.id1;
    frame[16] = id.id2;
    frame[17] = checksum(&frame[2..=16]);
    frame[18] = TAIL;
    frame
}

/// Low byte of the sum of `data`.
pub fn checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
}

/// Sets the rest period between measurements, in minutes.
///
/// The sensor accepts 0 (continuous) through 30; larger values are encoded as
/// given.
pub fn encode_set_duty_cycle(minutes: u8) -> WireFrame {
    let frame = build_command(CommandKind::DutyCycle, Mode::Set, minutes);
    debug!("Encoded duty cycle of {} minutes: {:02X?}", minutes, frame);
    frame
}

/// Wakes the sensor up.
pub fn encode_wake() -> WireFrame {
    let frame = build_command(CommandKind::SleepWake, Mode::Set, 0x01);
    debug!("Encoded wake command: {:02X?}", frame);
    frame
}

/// Puts the sensor to sleep.
pub fn encode_sleep() -> WireFrame {
    let frame = build_command(CommandKind::SleepWake, Mode::Set, 0x00);
    debug!("Encoded sleep command: {:02X?}", frame);
    frame
}

/// Switches between active and passive reporting.
pub fn encode_set_reporting_mode(mode: ReportingMode) -> WireFrame {
    let frame = build_command(CommandKind::ReportingMode, Mode::Set, mode as u8);
    debug!("Encoded reporting mode {:?}: {:02X?}", mode, frame);
    frame
}

/// Asks the sensor for the current value of a setting. The answer arrives as
/// a reply frame.
pub fn encode_query(kind: CommandKind) -> WireFrame {
    let frame = build_command(kind, Mode::Get, 0x00);
    debug!("Encoded query for {:?}: {:02X?}", kind, frame);
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected_checksum(opcode: u8, mode: u8, parameter: u8) -> u8 {
        ((opcode as u32 + mode as u32 + parameter as u32 + 255 + 255) % 256) as u8
    }

    #[test]
    fn frame_layout() {
        let frame = build_command(CommandKind::SleepWake, Mode::Set, 0x01);
        assert_eq!(frame.len(), 19);
        assert_eq!(&frame[0..2], &[0xAA, 0xB4]);
        assert_eq!(frame[2], 0x06);
        assert_eq!(frame[3], 0x01);
        assert_eq!(frame[4], 0x01);
        assert_eq!(&frame[5..15], &[0u8; 10]);
        assert_eq!(&frame[15..17], &[0xFF, 0xFF]);
        assert_eq!(frame[18], 0xAB);
    }

    #[test]
    fn checksum_over_every_input() {
        for kind in [
            CommandKind::ReportingMode,
            CommandKind::SleepWake,
            CommandKind::DutyCycle,
        ] {
            for mode in [Mode::Get, Mode::Set] {
                for parameter in 0..=u8::MAX {
                    let frame = build_command(kind, mode, parameter);
                    assert_eq!(
                        frame[17],
                        expected_checksum(kind as u8, mode as u8, parameter)
                    );
                    assert_eq!(&frame[0..2], &[0xAA, 0xB4]);
                    assert_eq!(frame[18], 0xAB);
                }
            }
        }
    }

    #[test]
    fn duty_cycle_of_five_minutes() {
        // 0x08 + 0x01 + 0x05 + 0xFF + 0xFF = 0x20C
        let frame = encode_set_duty_cycle(5);
        assert_eq!(
            frame,
            [
                0xAA, 0xB4, 0x08, 0x01, 0x05, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
                0x00, 0x00, 0xFF, 0xFF, 0x0C, 0xAB
            ]
        );
    }

    #[test]
    fn sleep_and_wake() {
        // Known-good frames from the sensor's datasheet.
        assert_eq!(
            encode_sleep(),
            [
                0xAA, 0xB4, 0x06, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
                0x00, 0x00, 0xFF, 0xFF, 0x05, 0xAB
            ]
        );
        assert_eq!(
            encode_wake(),
            [
                0xAA, 0xB4, 0x06, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
                0x00, 0x00, 0xFF, 0xFF, 0x06, 0xAB
            ]
        );
    }

    #[test]
    fn reporting_mode_and_query() {
        let frame = encode_set_reporting_mode(ReportingMode::Passive);
        assert_eq!(&frame[2..5], &[0x02, 0x01, 0x01]);
        assert_eq!(frame[17], 0x02);

        let frame = encode_query(CommandKind::DutyCycle);
        assert_eq!(&frame[2..5], &[0x08, 0x00, 0x00]);
        assert_eq!(frame[17], 0x06);
    }

    #[test]
    fn encoding_is_idempotent() {
        assert_eq!(encode_set_duty_cycle(17), encode_set_duty_cycle(17));
        assert_eq!(encode_wake(), encode_wake());
    }

    #[test]
    fn addressed_command() {
        let command = OutgoingCommand::new(CommandKind::DutyCycle, Mode::Set, 5);
        assert_eq!(
            build_addressed_command(command, DeviceID::default()),
            encode_set_duty_cycle(5)
        );

        let frame = build_addressed_command(command, DeviceID { id1: 0xA1, id2: 0x60 });
        assert_eq!(&frame[15..17], &[0xA1, 0x60]);
        assert_eq!(frame[17], 0x0F); // 0x08 + 0x01 + 0x05 + 0xA1 + 0x60
    }
}
