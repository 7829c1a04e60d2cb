//! Scan-time and motor-time flag masks.

wire_flags! {
    /// Options applied to a single scan request.
    pub struct ScanFlags : "scan flags" {
        const SINGLE_LINE = 1 << 0 => is_single_line;
        const DISABLE_SHADING = 1 << 1 => is_shading_disabled;
        const DISABLE_GAMMA = 1 << 2 => is_gamma_disabled;
        const DISABLE_BUFFER_FULL_MOVE = 1 << 3 => is_buffer_full_move_disabled;
        const IGNORE_LINE_DISTANCE = 1 << 4 => ignores_line_distance;
        const DISABLE_LAMP = 1 << 5 => is_lamp_disabled;
        const CALIBRATION = 1 << 6 => is_calibration;
        const FEEDING = 1 << 7 => is_feeding;
        const USE_XPA = 1 << 8 => uses_xpa;
        const ENABLE_LEDADD = 1 << 9 => is_ledadd_enabled;
        const USE_XCORRECTION = 1 << 10 => uses_xcorrection;
        const REVERSE = 1 << 11 => is_reverse;
    }
}

wire_flags! {
    /// Options applied to the motor profile of a scan.
    pub struct MotorFlags : "motor flags" {
        const AUTO_GO_HOME = 1 << 0 => goes_home_automatically;
        // bit 1 is unassigned
        const DISABLE_BUFFER_FULL_MOVE = 1 << 2 => is_buffer_full_move_disabled;
        const FEED = 1 << 3 => is_feed;
        const USE_XPA = 1 << 4 => uses_xpa;
        const REVERSE = 1 << 5 => is_reverse;
    }
}
