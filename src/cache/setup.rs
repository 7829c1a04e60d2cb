//! Configuration fingerprint and hardware snapshots stored with each entry.
//!
//! A [`SetupFingerprint`] captures every scan parameter that influences the
//! shading calibration outcome. [`FrontendSnapshot`] and [`SensorSnapshot`]
//! capture the analog front-end and sensor configuration that was live when the
//! calibration ran, so that drift in gain, offset or exposure invalidates an
//! entry even when the fingerprint still matches.
//!
//! All types compare structurally; there is no approximate matching.

use std::io::{self, Write};

use crate::codec::{Codec, DecodeError, Decoder, Encoder};
use crate::registry::{
    AdcId, AsicType, ColorFilter, ColorOrder, GpioId, ModelId, MotorFlags, MotorId,
    ScanColorMode, ScanFlags, ScanMethod, SensorId, StepType,
};

/// Hardware identity of the device a calibration belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DeviceIds {
    pub model: ModelId,
    pub asic: AsicType,
    pub sensor: SensorId,
    pub adc: AdcId,
    pub gpio: GpioId,
    pub motor: MotorId,
    /// Sheet-fed devices move the paper instead of the sensor.
    pub sheetfed: bool,
}

impl Codec for DeviceIds {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> io::Result<()> {
        enc.put(&self.model)?;
        enc.put(&self.asic)?;
        enc.put(&self.sensor)?;
        enc.put(&self.adc)?;
        enc.put(&self.gpio)?;
        enc.put(&self.motor)?;
        enc.put(&self.sheetfed)
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            model: dec.take()?,
            asic: dec.take()?,
            sensor: dec.take()?,
            adc: dec.take()?,
            gpio: dec.take()?,
            motor: dec.take()?,
            sheetfed: dec.take()?,
        })
    }
}

/// Requested scan parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SetupParams {
    pub xres: u32,
    pub yres: u32,
    pub startx: u32,
    pub starty: u32,
    pub pixels: u32,
    pub requested_pixels: u32,
    pub lines: u32,
    pub depth: u32,
    pub channels: u32,
    pub scan_method: ScanMethod,
    pub scan_mode: ScanColorMode,
    pub color_filter: ColorFilter,
    pub flags: ScanFlags,
}

impl Codec for SetupParams {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> io::Result<()> {
        enc.put(&self.xres)?;
        enc.put(&self.yres)?;
        enc.put(&self.startx)?;
        enc.put(&self.starty)?;
        enc.put(&self.pixels)?;
        enc.put(&self.requested_pixels)?;
        enc.put(&self.lines)?;
        enc.put(&self.depth)?;
        enc.put(&self.channels)?;
        enc.put(&self.scan_method)?;
        enc.put(&self.scan_mode)?;
        enc.put(&self.color_filter)?;
        enc.put(&self.flags)
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            xres: dec.take()?,
            yres: dec.take()?,
            startx: dec.take()?,
            starty: dec.take()?,
            pixels: dec.take()?,
            requested_pixels: dec.take()?,
            lines: dec.take()?,
            depth: dec.take()?,
            channels: dec.take()?,
            scan_method: dec.take()?,
            scan_mode: dec.take()?,
            color_filter: dec.take()?,
            flags: dec.take()?,
        })
    }
}

/// Derived setup the device was actually programmed with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CurrentSetup {
    pub pixels: u32,
    pub lines: u32,
    pub exposure_time: i32,
    pub xres: u32,
    pub ccd_size_divisor: u32,
    pub stagger: u32,
    pub max_shift: u32,
    pub step_type: StepType,
    pub motor_flags: MotorFlags,
}

impl Codec for CurrentSetup {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> io::Result<()> {
        enc.put(&self.pixels)?;
        enc.put(&self.lines)?;
        enc.put(&self.exposure_time)?;
        enc.put(&self.xres)?;
        enc.put(&self.ccd_size_divisor)?;
        enc.put(&self.stagger)?;
        enc.put(&self.max_shift)?;
        enc.put(&self.step_type)?;
        enc.put(&self.motor_flags)
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            pixels: dec.take()?,
            lines: dec.take()?,
            exposure_time: dec.take()?,
            xres: dec.take()?,
            ccd_size_divisor: dec.take()?,
            stagger: dec.take()?,
            max_shift: dec.take()?,
            step_type: dec.take()?,
            motor_flags: dec.take()?,
        })
    }
}

/// Everything that decides whether a stored calibration can be reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SetupFingerprint {
    pub device: DeviceIds,
    pub params: SetupParams,
    pub current: CurrentSetup,
}

impl SetupFingerprint {
    #[must_use]
    pub fn new(device: DeviceIds, params: SetupParams, current: CurrentSetup) -> Self {
        Self {
            device,
            params,
            current,
        }
    }
}

impl Codec for SetupFingerprint {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> io::Result<()> {
        enc.put(&self.device)?;
        enc.newline()?;
        enc.put(&self.params)?;
        enc.newline()?;
        enc.put(&self.current)
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            device: dec.take()?,
            params: dec.take()?,
            current: dec.take()?,
        })
    }
}

/// One register write applied to the front-end or sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RegisterSetting {
    pub address: u16,
    pub value: u16,
}

impl RegisterSetting {
    #[must_use]
    pub const fn new(address: u16, value: u16) -> Self {
        Self { address, value }
    }
}

impl Codec for RegisterSetting {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> io::Result<()> {
        enc.put(&self.address)?;
        enc.put(&self.value)
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            address: dec.take()?,
            value: dec.take()?,
        })
    }
}

/// Analog front-end configuration at calibration time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FrontendSnapshot {
    pub id: AdcId,
    pub registers: Vec<RegisterSetting>,
    /// Per-channel offset (red, green, blue).
    pub offset: [u16; 3],
    /// Per-channel gain (red, green, blue).
    pub gain: [u16; 3],
    pub reg2: [u16; 3],
}

impl Codec for FrontendSnapshot {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> io::Result<()> {
        enc.put(&self.id)?;
        enc.seq(&self.registers)?;
        enc.put(&self.offset)?;
        enc.put(&self.gain)?;
        enc.put(&self.reg2)
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            id: dec.take()?,
            registers: dec.seq()?,
            offset: dec.take()?,
            gain: dec.take()?,
            reg2: dec.take()?,
        })
    }
}

/// Sensor configuration at calibration time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SensorSnapshot {
    pub id: SensorId,
    pub optical_res: u32,
    pub black_pixels: u32,
    pub dummy_pixel: u32,
    pub ccd_start_xoffset: u32,
    pub sensor_pixels: u32,
    pub gain_white_ref: u32,
    /// Exposure per channel (red, green, blue).
    pub exposure: [u16; 3],
    pub color_order: ColorOrder,
    pub custom_regs: Vec<RegisterSetting>,
}

impl Codec for SensorSnapshot {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> io::Result<()> {
        enc.put(&self.id)?;
        enc.put(&self.optical_res)?;
        enc.put(&self.black_pixels)?;
        enc.put(&self.dummy_pixel)?;
        enc.put(&self.ccd_start_xoffset)?;
        enc.put(&self.sensor_pixels)?;
        enc.put(&self.gain_white_ref)?;
        enc.put(&self.exposure)?;
        enc.put(&self.color_order)?;
        enc.seq(&self.custom_regs)
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            id: dec.take()?,
            optical_res: dec.take()?,
            black_pixels: dec.take()?,
            dummy_pixel: dec.take()?,
            ccd_start_xoffset: dec.take()?,
            sensor_pixels: dec.take()?,
            gain_white_ref: dec.take()?,
            exposure: dec.take()?,
            color_order: dec.take()?,
            custom_regs: dec.seq()?,
        })
    }
}

/// The device's current front-end and sensor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct LiveConfig {
    pub frontend: FrontendSnapshot,
    pub sensor: SensorSnapshot,
}

impl LiveConfig {
    #[must_use]
    pub fn new(frontend: FrontendSnapshot, sensor: SensorSnapshot) -> Self {
        Self { frontend, sensor }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip<T: Codec + PartialEq + std::fmt::Debug>(value: &T) -> T {
        let mut enc = Encoder::new(Vec::new());
        value.encode(&mut enc).unwrap();
        let text = String::from_utf8(enc.finish().unwrap()).unwrap();
        let mut dec = Decoder::new(&text);
        let decoded = T::decode(&mut dec).unwrap();
        assert!(dec.is_exhausted(), "trailing tokens after {text:?}");
        decoded
    }

    fn sample_fingerprint() -> SetupFingerprint {
        SetupFingerprint::new(
            DeviceIds {
                model: ModelId::CanonLide210,
                asic: AsicType::Gl124,
                sensor: SensorId::CisCanonLide210,
                adc: AdcId::CanonLide110,
                gpio: GpioId::CanonLide210,
                motor: MotorId::CanonLide210,
                sheetfed: false,
            },
            SetupParams {
                xres: 600,
                yres: 600,
                pixels: 5100,
                requested_pixels: 5100,
                lines: 1,
                depth: 16,
                channels: 3,
                scan_mode: ScanColorMode::ColorSinglePass,
                flags: ScanFlags::CALIBRATION.union(ScanFlags::DISABLE_GAMMA),
                ..Default::default()
            },
            CurrentSetup {
                pixels: 5100,
                lines: 1,
                exposure_time: 11000,
                xres: 600,
                ccd_size_divisor: 1,
                step_type: StepType::Quarter,
                motor_flags: MotorFlags::AUTO_GO_HOME,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_fingerprint_roundtrip() {
        let fingerprint = sample_fingerprint();
        assert_eq!(roundtrip(&fingerprint), fingerprint);
    }

    #[test]
    fn test_fingerprint_spans_three_lines() {
        let mut enc = Encoder::new(Vec::new());
        sample_fingerprint().encode(&mut enc).unwrap();
        let text = String::from_utf8(enc.finish().unwrap()).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("13 7 31 4 6 5 0\n"));
    }

    #[test]
    fn test_snapshots_roundtrip() {
        let frontend = FrontendSnapshot {
            id: AdcId::WolfsonHp2400,
            registers: vec![RegisterSetting::new(0x00, 0x03), RegisterSetting::new(0x28, 0xc8)],
            offset: [0x70, 0x72, 0x74],
            gain: [0x1a, 0x1b, 0x1c],
            reg2: [0, 0, 0],
        };
        assert_eq!(roundtrip(&frontend), frontend);

        let sensor = SensorSnapshot {
            id: SensorId::CcdHp2400,
            optical_res: 1200,
            black_pixels: 48,
            dummy_pixel: 15,
            sensor_pixels: 10872,
            gain_white_ref: 210,
            exposure: [0x1f00, 0x1f00, 0x1f00],
            color_order: ColorOrder::Bgr,
            custom_regs: vec![RegisterSetting::new(0x16, 0xbf)],
            ..Default::default()
        };
        assert_eq!(roundtrip(&sensor), sensor);
    }

    #[test]
    fn test_single_field_change_breaks_equality() {
        let base = sample_fingerprint();
        let mut other = base.clone();
        other.current.step_type = StepType::Eighth;
        assert_ne!(base, other);

        let mut other = base.clone();
        other.device.sheetfed = true;
        assert_ne!(base, other);

        let mut other = base.clone();
        other.params.flags.insert(ScanFlags::REVERSE);
        assert_ne!(base, other);
    }

    #[test]
    fn test_default_snapshot_roundtrip() {
        let live = LiveConfig::default();
        assert_eq!(roundtrip(&live.frontend), live.frontend);
        assert_eq!(roundtrip(&live.sensor), live.sensor);
    }
}
