//! Barcode scanner tuning
//!
//! The camera and the ZXing decoder live in the browser; this module holds
//! the timing constants and the decisions that do not need them: which
//! camera to open, which formats to try, when to zoom and when a read is
//! trusted enough to fire.

/// Identical consecutive reads needed before a code is accepted
pub const REQUIRED_HITS: u32 = 2;

/// Delay between decode attempts in fast mode
pub const FAST_SCAN_DELAY_MS: u32 = 20;
/// Delay between decode attempts in robust mode
pub const ROBUST_SCAN_DELAY_MS: u32 = 40;
/// Without a read for this long, switch to robust mode
pub const ROBUST_AFTER_MS: u32 = 900;
pub const ZOOM_INTERVAL_MS: u32 = 700;
/// Zoom increment when the camera does not report one
pub const DEFAULT_ZOOM_STEP: f64 = 0.2;

/// Requested stream size for a mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSize {
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
}

pub const FAST_STREAM: StreamSize = StreamSize {
    width: 1280,
    height: 720,
    frame_rate: 60,
};

pub const ROBUST_STREAM: StreamSize = StreamSize {
    width: 1920,
    height: 1080,
    frame_rate: 30,
};

/// ZXing `BarcodeFormat` names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarcodeFormat {
    Ean13,
    Ean8,
    UpcA,
    UpcE,
    Code128,
    Itf,
}

impl BarcodeFormat {
    pub fn zxing_name(self) -> &'static str {
        match self {
            BarcodeFormat::Ean13 => "EAN_13",
            BarcodeFormat::Ean8 => "EAN_8",
            BarcodeFormat::UpcA => "UPC_A",
            BarcodeFormat::UpcE => "UPC_E",
            BarcodeFormat::Code128 => "CODE_128",
            BarcodeFormat::Itf => "ITF",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Retail formats only, short delay
    Fast,
    /// Adds CODE-128 and ITF with TRY_HARDER
    Robust,
}

impl ScanMode {
    pub fn formats(self) -> &'static [BarcodeFormat] {
        const FAST: [BarcodeFormat; 4] = [
            BarcodeFormat::Ean13,
            BarcodeFormat::Ean8,
            BarcodeFormat::UpcA,
            BarcodeFormat::UpcE,
        ];
        const ROBUST: [BarcodeFormat; 6] = [
            BarcodeFormat::Ean13,
            BarcodeFormat::Ean8,
            BarcodeFormat::UpcA,
            BarcodeFormat::UpcE,
            BarcodeFormat::Code128,
            BarcodeFormat::Itf,
        ];
        match self {
            ScanMode::Fast => &FAST,
            ScanMode::Robust => &ROBUST,
        }
    }

    pub fn try_harder(self) -> bool {
        self == ScanMode::Robust
    }

    /// Robust mode also decodes light-on-dark codes
    pub fn also_inverted(self) -> bool {
        self == ScanMode::Robust
    }

    pub fn delay_ms(self) -> u32 {
        match self {
            ScanMode::Fast => FAST_SCAN_DELAY_MS,
            ScanMode::Robust => ROBUST_SCAN_DELAY_MS,
        }
    }

    pub fn stream(self) -> StreamSize {
        match self {
            ScanMode::Fast => FAST_STREAM,
            ScanMode::Robust => ROBUST_STREAM,
        }
    }

    /// Mode to use after `elapsed_ms` without an accepted read
    pub fn for_elapsed(elapsed_ms: u32) -> Self {
        if elapsed_ms >= ROBUST_AFTER_MS {
            ScanMode::Robust
        } else {
            ScanMode::Fast
        }
    }
}

/// Camera as listed by `enumerateDevices`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    pub device_id: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Back,
    Front,
}

impl Facing {
    fn keyword(self) -> &'static str {
        match self {
            Facing::Back => "back",
            Facing::Front => "front",
        }
    }
}

/// Camera whose label mentions the wanted side, else the first one
pub fn pick_camera(devices: &[CameraDevice], facing: Facing) -> Option<&CameraDevice> {
    let keyword = facing.keyword();
    devices
        .iter()
        .find(|d| d.label.to_lowercase().contains(keyword))
        .or_else(|| devices.first())
}

/// Next zoom level, capped at the camera's maximum
pub fn next_zoom(current: f64, step: Option<f64>, max: f64) -> f64 {
    let step = step.filter(|s| *s > 0.0).unwrap_or(DEFAULT_ZOOM_STEP);
    (current + step).min(max)
}

/// Confirms a code once it was read [`REQUIRED_HITS`] times in a row
///
/// After firing it stays silent until [`ReadConfirmer::reset`], so one scan
/// session adds one product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadConfirmer {
    last: Option<String>,
    hits: u32,
    fired: bool,
}

impl ReadConfirmer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one decoded text; returns the code when it is confirmed
    pub fn push(&mut self, text: &str) -> Option<String> {
        if self.fired {
            return None;
        }
        let code = text.trim();
        if code.is_empty() {
            return None;
        }
        if self.last.as_deref() == Some(code) {
            self.hits += 1;
        } else {
            self.last = Some(code.to_string());
            self.hits = 1;
        }
        if self.hits >= REQUIRED_HITS {
            self.fired = true;
            return self.last.clone();
        }
        None
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cam(id: &str, label: &str) -> CameraDevice {
        CameraDevice {
            device_id: id.into(),
            label: label.into(),
        }
    }

    #[test]
    fn test_two_equal_reads_fire_once() {
        let mut confirm = ReadConfirmer::new();
        assert_eq!(confirm.push("7801234"), None);
        assert_eq!(confirm.push("7809999"), None);
        assert_eq!(confirm.push("7809999"), Some("7809999".to_string()));
        assert_eq!(confirm.push("7809999"), None);
        assert!(confirm.has_fired());

        confirm.reset();
        assert_eq!(confirm.push(" 7801234 "), None);
        assert_eq!(confirm.push("7801234"), Some("7801234".to_string()));
    }

    #[test]
    fn test_pick_camera() {
        let devices = vec![cam("a", "Front Camera"), cam("b", "Back Camera 0")];
        assert_eq!(pick_camera(&devices, Facing::Back).unwrap().device_id, "b");
        assert_eq!(pick_camera(&devices, Facing::Front).unwrap().device_id, "a");

        let unlabeled = vec![cam("x", ""), cam("y", "")];
        assert_eq!(pick_camera(&unlabeled, Facing::Back).unwrap().device_id, "x");
        assert!(pick_camera(&[], Facing::Back).is_none());
    }

    #[test]
    fn test_modes() {
        assert_eq!(ScanMode::for_elapsed(100), ScanMode::Fast);
        assert_eq!(ScanMode::for_elapsed(900), ScanMode::Robust);
        assert_eq!(ScanMode::Fast.formats().len(), 4);
        assert!(ScanMode::Robust.formats().contains(&BarcodeFormat::Itf));
        assert!(ScanMode::Robust.try_harder());
        assert!(ScanMode::Robust.also_inverted());
        assert!(!ScanMode::Fast.also_inverted());
        assert_eq!(ScanMode::Robust.delay_ms(), 40);
        assert_eq!(ScanMode::Fast.stream().frame_rate, 60);
    }

    #[test]
    fn test_zoom_steps_cap_at_max() {
        assert!((next_zoom(1.0, None, 3.0) - 1.2).abs() < 1e-9);
        assert!((next_zoom(1.0, Some(0.5), 3.0) - 1.5).abs() < 1e-9);
        assert_eq!(next_zoom(2.9, Some(0.5), 3.0), 3.0);
    }
}
