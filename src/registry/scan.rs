//! Scan configuration choices recorded in a setup fingerprint.

use std::cmp::Ordering;
use std::str::FromStr;

use super::UnknownOption;

wire_enum! {
    /// Light path used for the scan.
    pub enum ScanMethod : "scan method" {
        /// Normal reflective scan.
        #[default]
        Flatbed = 0,
        /// Scan through the transparency adaptor.
        Transparency = 1,
        /// Transparency adaptor via the infrared channel.
        TransparencyInfrared = 2,
    }
}

impl ScanMethod {
    /// Option string shown to frontends.
    #[must_use]
    pub fn option_str(self) -> &'static str {
        match self {
            Self::Flatbed => "Flatbed",
            Self::Transparency => "Transparency Adapter",
            Self::TransparencyInfrared => "Transparency Adapter Infrared",
        }
    }
}

impl FromStr for ScanMethod {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Flatbed" => Ok(Self::Flatbed),
            "Transparency Adapter" => Ok(Self::Transparency),
            "Transparency Adapter Infrared" => Ok(Self::TransparencyInfrared),
            _ => Err(UnknownOption {
                kind: Self::KIND,
                value: s.to_string(),
            }),
        }
    }
}

wire_enum! {
    /// Pixel format of the scan.
    pub enum ScanColorMode : "color mode" {
        Lineart = 0,
        Halftone = 1,
        #[default]
        Gray = 2,
        ColorSinglePass = 3,
    }
}

impl ScanColorMode {
    /// Option string shown to frontends.
    #[must_use]
    pub fn option_str(self) -> &'static str {
        match self {
            Self::Lineart => "Lineart",
            Self::Halftone => "Halftone",
            Self::Gray => "Gray",
            Self::ColorSinglePass => "Color",
        }
    }

    /// Number of color channels captured in this mode.
    #[must_use]
    pub fn channels(self) -> usize {
        match self {
            Self::ColorSinglePass => 3,
            _ => 1,
        }
    }
}

impl FromStr for ScanColorMode {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Lineart" => Ok(Self::Lineart),
            "Halftone" => Ok(Self::Halftone),
            "Gray" => Ok(Self::Gray),
            "Color" => Ok(Self::ColorSinglePass),
            _ => Err(UnknownOption {
                kind: Self::KIND,
                value: s.to_string(),
            }),
        }
    }
}

wire_enum! {
    /// Channel selected for single-channel scans.
    pub enum ColorFilter : "color filter" {
        Red = 0,
        #[default]
        Green = 1,
        Blue = 2,
        NoFilter = 3,
    }
}

wire_enum! {
    /// Order in which the sensor delivers color channels.
    pub enum ColorOrder : "color order" {
        #[default]
        Rgb = 0,
        Gbr = 1,
        Bgr = 2,
    }
}

wire_enum! {
    /// Motor microstepping mode. Finer steps have higher codes.
    pub enum StepType : "step type" {
        #[default]
        Full = 0,
        Half = 1,
        Quarter = 2,
        Eighth = 3,
    }
}

impl PartialOrd for StepType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StepType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.code().cmp(&other.code())
    }
}
