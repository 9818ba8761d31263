use embassy_time::Duration;

use crate::constants::BROADCAST;

/// Represents the unique identifier of the SDS011 sensor.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct DeviceID {
    /// The first byte of the device ID.
    pub id1: u8,
    /// The second byte of the device ID.
    pub id2: u8,
}

impl DeviceID {
    /// Returns true when this id addresses every sensor on the line.
    pub fn is_broadcast(&self) -> bool {
        self.id1 == BROADCAST && self.id2 == BROADCAST
    }
}

impl Default for DeviceID {
    /// Returns the broadcast device id `0xFFFF`.
    fn default() -> DeviceID {
        DeviceID {
            id1: BROADCAST,
            id2: BROADCAST,
        }
    }
}

/// How long a single transport read may wait before giving up, matching the
/// 10 ms UART timeout the sensor is usually wired with.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(10);

/// Configuration settings for the SDS011 driver.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Config {
    /// The device ID commands are addressed to.
    pub id: DeviceID,
    /// Upper bound for one transport read. The scanner composes many of these
    /// within its overall time budget.
    pub read_timeout: Duration,
}

impl Config {
    /// Creates a new `Config` instance.
    ///
    /// # Arguments
    ///
    /// * `id` - The `DeviceID` commands are addressed to.
    /// * `read_timeout` - The per-read transport timeout.
    pub fn new(id: DeviceID, read_timeout: Duration) -> Config {
        Config { id, read_timeout }
    }

    /// Sets the device ID for the configuration.
    pub fn id(mut self, id: DeviceID) -> Self {
        self.id = id;
        self
    }

    /// Sets the per-read transport timeout.
    pub fn read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }
}

/// Provides default configuration values for the SDS011 driver.
impl Default for Config {
    /// The default configuration broadcasts to device `0xFFFF` and waits
    /// [`DEFAULT_READ_TIMEOUT`] per read.
    fn default() -> Config {
        Config {
            id: DeviceID::default(),
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}
