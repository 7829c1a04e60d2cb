//! Device identifiers: model, sensor, front-end, GPIO map, motor and ASIC.
//!
//! `Unknown` (code 0) is a member of every set and means "unspecified".

wire_enum! {
    /// Scanner device model.
    ///
    /// Canon models omit the "CanoScan" product line prefix.
    pub enum ModelId : "device model" {
        #[default]
        Unknown = 0,
        Canon4400f = 1,
        Canon5600f = 2,
        Canon8400f = 3,
        Canon8600f = 4,
        CanonImageFormula101 = 5,
        CanonLide50 = 6,
        CanonLide60 = 7,
        CanonLide80 = 8,
        CanonLide100 = 9,
        CanonLide110 = 10,
        CanonLide120 = 11,
        CanonLide200 = 12,
        CanonLide210 = 13,
        CanonLide220 = 14,
        CanonLide700f = 15,
        DctDocketport487 = 16,
        HpScanjet2300c = 17,
        HpScanjet2400c = 18,
        HpScanjet3670c = 19,
        HpScanjet4850c = 20,
        HpScanjetG4010 = 21,
        HpScanjetG4050 = 22,
        HpScanjetN6310 = 23,
        MedionMd5345 = 24,
        PanasonicKvSs080 = 25,
        PentaxDsmobile600 = 26,
        PlustekOpticbook3800 = 27,
        PlustekOpticfilm7200i = 28,
        PlustekOpticfilm7300 = 29,
        PlustekOpticfilm7500i = 30,
        PlustekOpticpro3600 = 31,
        PlustekOpticproSt12 = 32,
        PlustekOpticproSt24 = 33,
        SyscanDocketport465 = 34,
        SyscanDocketport467 = 35,
        SyscanDocketport485 = 36,
        SyscanDocketport665 = 37,
        SyscanDocketport685 = 38,
        UmaxAstra4500 = 39,
        Visioneer7100 = 40,
        VisioneerRoadwarrior = 41,
        VisioneerStrobeXp100Revision3 = 42,
        VisioneerStrobeXp200 = 43,
        VisioneerStrobeXp300 = 44,
        Xerox2400 = 45,
        XeroxTravelscanner100 = 46,
    }
}

wire_enum! {
    /// Image sensor (CCD or CIS) fitted to a device.
    pub enum SensorId : "sensor" {
        #[default]
        Unknown = 0,
        Ccd5345 = 1,
        CcdCanon4400f = 2,
        CcdCanon8400f = 3,
        CcdCanon8600f = 4,
        CcdDp665 = 5,
        CcdDp685 = 6,
        CcdDsmobile600 = 7,
        CcdG4050 = 8,
        CcdHp2300 = 9,
        CcdHp2400 = 10,
        CcdHp3670 = 11,
        CcdHpN6310 = 12,
        CcdImg101 = 13,
        CcdKvss080 = 14,
        CcdPlustekOpticbook3800 = 15,
        CcdPlustekOpticfilm7200i = 16,
        CcdPlustekOpticfilm7300 = 17,
        CcdPlustekOpticfilm7500i = 18,
        CcdPlustekOpticpro3600 = 19,
        CcdRoadwarrior = 20,
        /// Sony ILX548, 5340 pixels.
        CcdSt12 = 21,
        /// Sony ILX569, 10680 pixels.
        CcdSt24 = 22,
        CcdUmax = 23,
        CcdXp300 = 24,
        CisCanonLide35 = 25,
        CisCanonLide80 = 26,
        CisCanonLide100 = 27,
        CisCanonLide110 = 28,
        CisCanonLide120 = 29,
        CisCanonLide200 = 30,
        CisCanonLide210 = 31,
        CisCanonLide220 = 32,
        CisCanonLide700f = 33,
        CisXp200 = 34,
    }
}

wire_enum! {
    /// Analog front-end (ADC) chip configuration.
    pub enum AdcId : "analog front-end" {
        #[default]
        Unknown = 0,
        AdXp200 = 1,
        CanonLide35 = 2,
        CanonLide80 = 3,
        CanonLide110 = 4,
        CanonLide120 = 5,
        CanonLide200 = 6,
        CanonLide700f = 7,
        Canon4400f = 8,
        Canon8400f = 9,
        Canon8600f = 10,
        G4050 = 11,
        Img101 = 12,
        Kvss080 = 13,
        PlustekOpticbook3800 = 14,
        PlustekOpticfilm7200i = 15,
        PlustekOpticfilm7300 = 16,
        PlustekOpticfilm7500i = 17,
        PlustekOpticpro3600 = 18,
        Wolfson5345 = 19,
        WolfsonDsm600 = 20,
        WolfsonHp2300 = 21,
        WolfsonHp2400 = 22,
        WolfsonHp3670 = 23,
        WolfsonSt12 = 24,
        WolfsonSt24 = 25,
        WolfsonUmax = 26,
        WolfsonXp300 = 27,
    }
}

wire_enum! {
    /// GPIO pin map of a device.
    pub enum GpioId : "gpio map" {
        #[default]
        Unknown = 0,
        CanonLide35 = 1,
        CanonLide80 = 2,
        CanonLide110 = 3,
        CanonLide120 = 4,
        CanonLide200 = 5,
        CanonLide210 = 6,
        CanonLide700f = 7,
        Canon4400f = 8,
        Canon8400f = 9,
        Canon8600f = 10,
        Dp665 = 11,
        Dp685 = 12,
        G4050 = 13,
        Hp2300 = 14,
        Hp2400 = 15,
        Hp3670 = 16,
        HpN6310 = 17,
        Img101 = 18,
        Kvss080 = 19,
        Md5345 = 20,
        PlustekOpticbook3800 = 21,
        PlustekOpticfilm7200i = 22,
        PlustekOpticfilm7300 = 23,
        PlustekOpticfilm7500i = 24,
        PlustekOpticpro3600 = 25,
        St12 = 26,
        St24 = 27,
        Umax = 28,
        Xp200 = 29,
        Xp300 = 30,
    }
}

wire_enum! {
    /// Stepper motor profile.
    pub enum MotorId : "motor" {
        #[default]
        Unknown = 0,
        CanonLide100 = 1,
        CanonLide110 = 2,
        CanonLide120 = 3,
        CanonLide200 = 4,
        CanonLide210 = 5,
        CanonLide35 = 6,
        CanonLide700 = 7,
        CanonLide80 = 8,
        Canon4400f = 9,
        Canon8400f = 10,
        Canon8600f = 11,
        Dp665 = 12,
        Dsmobile600 = 13,
        G4050 = 14,
        Hp2300 = 15,
        Hp2400 = 16,
        Hp3670 = 17,
        Img101 = 18,
        Kvss080 = 19,
        Md5345 = 20,
        PlustekOpticbook3800 = 21,
        PlustekOpticfilm7200i = 22,
        PlustekOpticfilm7300 = 23,
        PlustekOpticfilm7500i = 24,
        PlustekOpticpro3600 = 25,
        Roadwarrior = 26,
        St24 = 27,
        Umax = 28,
        Xp200 = 29,
        Xp300 = 30,
    }
}

wire_enum! {
    /// Genesys Logic scanner controller ASIC.
    pub enum AsicType : "asic" {
        #[default]
        Unknown = 0,
        Gl646 = 1,
        Gl841 = 2,
        Gl843 = 3,
        Gl845 = 4,
        Gl846 = 5,
        Gl847 = 6,
        Gl124 = 7,
    }
}
