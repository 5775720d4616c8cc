//! Sensor-side control loop.
//!
//! One cycle:
//!
//! 1. Read and calibrate a full frame from the sensor into a private sample
//!    buffer. This is the slow part (tens of milliseconds over I2C) and runs
//!    while the render loop still owns the frame buffer.
//! 2. Scan the samples for min/max.
//! 3. Take the frame buffer back from the render loop.
//! 4. Quantize into it and hand it over for display.
//!
//! A failed read skips steps 2 to 4 entirely, so the exchange is never
//! touched with a half-read frame.

use core::fmt::Debug;
use core::ops::DerefMut;

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::exchange::AcquisitionPort;
use crate::frame::{FrameBuffer, SensorFrame, min_max};

// =============================================================================
// Sensor Abstraction
// =============================================================================

/// A source of calibrated 32×24 temperature frames in degrees Celsius.
///
/// Implementations own the whole sensor pipeline: bus transport, EEPROM
/// calibration, temperature conversion and bad-pixel correction.
#[allow(async_fn_in_trait)]
pub trait ThermalSensor {
    type Error: Debug;

    /// Fill `out` with the next frame, row-major.
    ///
    /// On error the contents of `out` are unspecified.
    async fn read_frame(
        &mut self,
        out: &mut SensorFrame,
    ) -> Result<(), Self::Error>;
}

/// Sensor refresh rate (the MLX90640 control register's rate field).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RefreshRate {
    HalfHz,
    OneHz,
    TwoHz,
    FourHz,
    EightHz,
    SixteenHz,
    ThirtyTwoHz,
    SixtyFourHz,
}

impl RefreshRate {
    /// Subpage rate in hertz.
    pub const fn hz(self) -> f32 {
        match self {
            Self::HalfHz => 0.5,
            Self::OneHz => 1.0,
            Self::TwoHz => 2.0,
            Self::FourHz => 4.0,
            Self::EightHz => 8.0,
            Self::SixteenHz => 16.0,
            Self::ThirtyTwoHz => 32.0,
            Self::SixtyFourHz => 64.0,
        }
    }

    /// Raw 3-bit register value.
    pub const fn register_value(self) -> u8 { self as u8 }
}

/// Order in which the two subpages cover the pixel array.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadoutPattern {
    /// Subpages form a checkerboard (calibrated default).
    Chess,
    /// Subpages are alternating rows.
    Interleaved,
}

/// ADC resolution of the sensor's pixel conversions.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcResolution {
    SixteenBit,
    SeventeenBit,
    EighteenBit,
    NineteenBit,
}

impl AdcResolution {
    /// Raw 2-bit register value.
    pub const fn register_value(self) -> u8 { self as u8 }

    /// Bits per conversion.
    pub const fn bits(self) -> u8 { 16 + self as u8 }
}

/// Sensor configuration applied by the device adapter at start-up.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorSettings {
    pub refresh_rate: RefreshRate,
    pub pattern: ReadoutPattern,
    pub resolution: AdcResolution,
    /// Emissivity of the observed objects (1.0 is a black body).
    pub emissivity: f32,
    /// Offset from the sensor's own ambient temperature to the temperature
    /// reflected by the scene, in degrees Celsius.
    pub ambient_shift: f32,
}

impl SensorSettings {
    /// 32 Hz, chess pattern, 19-bit conversions, emissivity 0.95, and a
    /// reflected temperature 8 °C below the sensor (open-air mounting).
    pub const DEFAULT: Self = Self {
        refresh_rate: RefreshRate::ThirtyTwoHz,
        pattern: ReadoutPattern::Chess,
        resolution: AdcResolution::NineteenBit,
        emissivity: 0.95,
        ambient_shift: -8.0,
    };

    /// Temperature reflected by the scene, given the sensor's ambient reading.
    #[inline]
    pub fn reflected_temperature(
        &self,
        ambient: f32,
    ) -> f32 {
        ambient + self.ambient_shift
    }
}

impl Default for SensorSettings {
    fn default() -> Self { Self::DEFAULT }
}

// =============================================================================
// Acquisition Loop
// =============================================================================

/// Reads frames and feeds them to the render loop through the exchange.
pub struct Acquisition<'a, M: RawMutex, S, T> {
    port: AcquisitionPort<'a, M, T>,
    sensor: S,
    samples: SensorFrame,
    failed_reads: u32,
}

impl<'a, M, S, T> Acquisition<'a, M, S, T>
where
    M: RawMutex,
    S: ThermalSensor,
    T: DerefMut<Target = FrameBuffer>,
{
    pub const fn new(
        port: AcquisitionPort<'a, M, T>,
        sensor: S,
    ) -> Self {
        Self {
            port,
            sensor,
            samples: [0.0; crate::config::SENSOR_PIXELS],
            failed_reads: 0,
        }
    }

    /// Run one read → quantize → hand-off cycle.
    ///
    /// Suspends on the sensor read and while waiting for the render loop to
    /// return the frame buffer. A failed read is counted and returned before
    /// the exchange is touched.
    pub async fn cycle(&mut self) -> Result<(), S::Error> {
        if let Err(error) = self.sensor.read_frame(&mut self.samples).await {
            self.failed_reads = self.failed_reads.wrapping_add(1);
            return Err(error);
        }

        let (min, max) = min_max(&self.samples);
        let mut frame = self.port.receive().await;
        frame.load(&self.samples, min, max);
        self.port.send(frame).await;
        Ok(())
    }

    /// Run cycles forever, retrying after failed reads.
    pub async fn run(&mut self) -> ! {
        loop {
            if let Err(_error) = self.cycle().await {
                #[cfg(feature = "defmt")]
                defmt::warn!("sensor read failed (#{}): {}", self.failed_reads, defmt::Debug2Format(&_error));
            }
        }
    }

    /// Number of failed sensor reads since start-up.
    #[inline]
    pub const fn failed_reads(&self) -> u32 { self.failed_reads }

    /// Samples of the last read, successful or not.
    #[inline]
    pub const fn samples(&self) -> &SensorFrame { &self.samples }
}

// =============================================================================
// Tests
// =============================================================================
