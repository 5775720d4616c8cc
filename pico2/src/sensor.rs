//! MLX90640 adapter over blocking I2C0.
//!
//! The `mlx9064x` driver extracts the EEPROM calibration at construction,
//! reads subpages and converts them to temperatures. This module configures
//! it (rate, pattern, resolution, emissivity), keeps the reflected
//! temperature tracking the sensor's ambient reading, replaces bad pixels,
//! and turns the driver's "image if ready" polling into an async
//! [`ThermalSensor`].
//!
//! The driver does not handle broken or outlier pixels, so their calibration
//! words are scanned straight from EEPROM before the driver takes the bus.
//!
//! In chess mode each ready subpage refreshes half of the pixels. The other
//! half keeps the previous subpage's values, which is why the acquisition loop
//! reuses one sample buffer across reads.

use embassy_rp::i2c::{self, Blocking, Config as I2cConfig, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::Timer;
use mlx9064x::{AccessPattern, FrameRate, Mlx90640Driver, Resolution};
use thermocam_common::ThermalSensor;
use thermocam_common::acquisition::{AdcResolution, ReadoutPattern, RefreshRate, SensorSettings};
use thermocam_common::config::{SENSOR_HEIGHT, SENSOR_WIDTH};
use thermocam_common::correction::{BadPixels, TooManyBadPixels, correct_bad_pixels};
use thermocam_common::frame::SensorFrame;

use crate::config::{I2C_FREQUENCY_HZ, PIXEL_CALIBRATION_ADDRESS, SENSOR_ADDRESS, SENSOR_POLL_INTERVAL_MS};

/// I2C bus the sensor sits on.
pub type SensorBus = I2c<'static, I2C0, Blocking>;

/// Bus or calibration failure reported by the driver.
pub type SensorError = mlx9064x::Error<SensorBus>;

/// Start-up failure.
#[derive(Debug)]
pub enum SetupError {
    /// EEPROM scan failed on the bus.
    Bus(i2c::Error),
    /// Driver construction or configuration failed.
    Driver(SensorError),
    /// EEPROM marks more bad pixels than the sensor may have.
    TooManyBadPixels,
}

impl From<SensorError> for SetupError {
    fn from(error: SensorError) -> Self { Self::Driver(error) }
}

impl From<TooManyBadPixels> for SetupError {
    fn from(_: TooManyBadPixels) -> Self { Self::TooManyBadPixels }
}

/// I2C configuration for the MLX90640.
pub fn sensor_i2c_config() -> I2cConfig {
    let mut config = I2cConfig::default();
    config.frequency = I2C_FREQUENCY_HZ;
    config
}

const fn frame_rate(rate: RefreshRate) -> FrameRate {
    match rate {
        RefreshRate::HalfHz => FrameRate::Half,
        RefreshRate::OneHz => FrameRate::One,
        RefreshRate::TwoHz => FrameRate::Two,
        RefreshRate::FourHz => FrameRate::Four,
        RefreshRate::EightHz => FrameRate::Eight,
        RefreshRate::SixteenHz => FrameRate::Sixteen,
        RefreshRate::ThirtyTwoHz => FrameRate::ThirtyTwo,
        RefreshRate::SixtyFourHz => FrameRate::SixtyFour,
    }
}

const fn access_pattern(pattern: ReadoutPattern) -> AccessPattern {
    match pattern {
        ReadoutPattern::Chess => AccessPattern::Chess,
        ReadoutPattern::Interleaved => AccessPattern::Interleave,
    }
}

const fn resolution(resolution: AdcResolution) -> Resolution {
    match resolution {
        AdcResolution::SixteenBit => Resolution::Sixteen,
        AdcResolution::SeventeenBit => Resolution::Seventeen,
        AdcResolution::EighteenBit => Resolution::Eighteen,
        AdcResolution::NineteenBit => Resolution::Nineteen,
    }
}

/// Read every pixel calibration word (one EEPROM row per transfer) and list
/// the pixels marked broken or outlier.
fn scan_bad_pixels(bus: &mut SensorBus) -> Result<BadPixels, SetupError> {
    let mut bad_pixels = BadPixels::new();
    let mut row = [0u8; SENSOR_WIDTH * 2];

    for y in 0..SENSOR_HEIGHT {
        let address = PIXEL_CALIBRATION_ADDRESS + (y * SENSOR_WIDTH) as u16;
        bus.blocking_write_read(SENSOR_ADDRESS, &address.to_be_bytes(), &mut row)
            .map_err(SetupError::Bus)?;
        for (x, word) in row.chunks_exact(2).enumerate() {
            bad_pixels.record(y * SENSOR_WIDTH + x, u16::from_be_bytes([word[0], word[1]]))?;
        }
    }
    Ok(bad_pixels)
}

/// Configured MLX90640.
pub struct Mlx90640Sensor {
    driver: Mlx90640Driver<SensorBus>,
    settings: SensorSettings,
    bad_pixels: BadPixels,
}

impl Mlx90640Sensor {
    /// Scan for bad pixels, read the calibration EEPROM and apply `settings`.
    pub fn new(
        mut bus: SensorBus,
        settings: SensorSettings,
    ) -> Result<Self, SetupError> {
        let bad_pixels = scan_bad_pixels(&mut bus)?;

        let mut driver = Mlx90640Driver::new(bus, SENSOR_ADDRESS)?;
        driver.set_frame_rate(frame_rate(settings.refresh_rate))?;
        driver.set_access_pattern(access_pattern(settings.pattern))?;
        driver.set_resolution(resolution(settings.resolution))?;
        driver.override_emissivity(settings.emissivity);

        Ok(Self {
            driver,
            settings,
            bad_pixels,
        })
    }

    /// Pixels replaced in every frame.
    pub fn bad_pixels(&self) -> &BadPixels { &self.bad_pixels }
}

impl ThermalSensor for Mlx90640Sensor {
    type Error = SensorError;

    async fn read_frame(
        &mut self,
        out: &mut SensorFrame,
    ) -> Result<(), Self::Error> {
        while !self.driver.generate_image_if_ready(out)? {
            Timer::after_millis(SENSOR_POLL_INTERVAL_MS).await;
        }

        // The next subpage is converted against the background the scene
        // reflects, derived from this subpage's ambient reading
        if let Some(ambient) = self.driver.ambient_temperature() {
            self.driver
                .set_reflected_temperature(Some(self.settings.reflected_temperature(ambient)));
        }

        correct_bad_pixels(out, &self.bad_pixels, self.settings.pattern);
        Ok(())
    }
}
