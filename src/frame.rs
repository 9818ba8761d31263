use log::{debug, warn};

use crate::command::checksum;
use crate::config::DeviceID;
use crate::constants::*;

/// The 8 bytes following HEAD and the command byte of a sensor frame.
pub type Payload = [u8; PAYLOAD_LEN];

/// Integrity of a decoded measurement frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketStatus {
    /// Checksum and tail both matched.
    Valid,
    /// Checksum or tail did not match. The values are still reported.
    Invalid,
}

/// A single measurement reported by the sensor.
///
/// Concentrations are `f32`; the raw reading is a tenth of a µg/m³ in a
/// `u16`, so no precision is lost against `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// PM2.5 concentration in µg/m³.
    pub pm2_5: f32,
    /// PM10 concentration in µg/m³.
    pub pm10: f32,
    /// The reporting sensor.
    pub id: DeviceID,
    pub status: PacketStatus,
}

impl Measurement {
    pub fn is_valid(&self) -> bool {
        self.status == PacketStatus::Valid
    }
}

/// A reply to a command, echoing the setting that was applied or queried.
///
/// Layout: `opcode, mode, parameter, 0x00, id1, id2, checksum, tail`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reply {
    pub payload: Payload,
}

impl Reply {
    /// Opcode of the command this reply answers.
    pub fn opcode(&self) -> u8 {
        self.payload[0]
    }

    pub fn mode(&self) -> u8 {
        self.payload[1]
    }

    pub fn parameter(&self) -> u8 {
        self.payload[2]
    }
}

/// Outcome of one call to the stream reader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Frame {
    /// A measurement frame (`0xC0`), valid or not.
    Measurement(Measurement),
    /// A command reply frame (`0xC5`).
    Acknowledgment(Reply),
    /// The time budget ran out before a complete frame arrived.
    NoFrame,
}

/// Decodes the payload of a measurement frame.
///
/// Never fails: a checksum or tail mismatch yields [`PacketStatus::Invalid`]
/// alongside the decoded values.
pub fn decode_measurement(payload: &Payload) -> Measurement {
    let pm2_5_raw = u16::from_le_bytes([payload[0], payload[1]]);
    let pm10_raw = u16::from_le_bytes([payload[2], payload[3]]);
    let id = DeviceID {
        id1: payload[4],
        id2: payload[5],
    };

    let checksum_ok = checksum(&payload[0..6]) == payload[6];
    let tail_ok = payload[7] == TAIL;
    let status = if checksum_ok && tail_ok {
        PacketStatus::Valid
    } else {
        warn!(
            "Invalid measurement frame (checksum ok: {}, tail ok: {}): {:02X?}",
            checksum_ok, tail_ok, payload
        );
        PacketStatus::Invalid
    };

    let measurement = Measurement {
        pm2_5: f32::from(pm2_5_raw) / 10.0,
        pm10: f32::from(pm10_raw) / 10.0,
        id,
        status,
    };
    debug!(
        "Decoded measurement - PM2.5: {}, PM10: {}, status: {:?}",
        measurement.pm2_5, measurement.pm10, measurement.status
    );
    measurement
}
