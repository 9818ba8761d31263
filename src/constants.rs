// HEAD is the byte that marks the beginning of any frame (command or data).
pub const HEAD: u8 = 0xAA;

// COMMAND_ID is the byte that identifies a command frame sent to the sensor.
pub const COMMAND_ID: u8 = 0xB4;

// DATA_REPORT_ID is the byte that identifies a measurement frame received from the sensor.
pub const DATA_REPORT_ID: u8 = 0xC0;

// REPLY_ID is the byte that identifies a reply frame received from the sensor
// in response to a command.
pub const REPLY_ID: u8 = 0xC5;

// TAIL is the byte that marks the end of any frame (command or data).
pub const TAIL: u8 = 0xAB;

// BROADCAST is written in both device ID slots of a command addressed to any sensor.
pub const BROADCAST: u8 = 0xFF;

// COMMAND_FRAME_LEN is the fixed length of a host to sensor frame.
pub const COMMAND_FRAME_LEN: usize = 19;

// PAYLOAD_LEN is the number of bytes following HEAD and the command byte in a
// sensor to host frame.
pub const PAYLOAD_LEN: usize = 8;
