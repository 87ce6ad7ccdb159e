// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants
//!
//! These reproduce the fixed build-time configuration of the pipeline. They
//! seed [`crate::config::PipelineConfig::default`].

use crate::backends::framework::{Encoding, SourcePattern};
use std::time::Duration;

/// Framework component names
pub mod components {
    /// Synthetic video source
    pub const SOURCE: &str = "vc.ril.source";
    /// Image signal processor
    pub const ISP: &str = "vc.ril.isp";
    /// Video renderer
    pub const RENDER: &str = "vc.ril.video_render";
}

/// Frame format defaults
pub mod format {
    use super::*;

    /// Encoding produced by the source and consumed by the ISP
    pub const SOURCE_ENCODING: Encoding = Encoding::I420;
    /// Encoding produced by the ISP and consumed by the renderer
    pub const ISP_OUTPUT_ENCODING: Encoding = Encoding::I420;
    /// Visible frame width in pixels
    pub const WIDTH: u32 = 3265;
    /// Visible frame height in pixels
    pub const HEIGHT: u32 = 4096;
    /// Pattern generated by the source
    pub const SOURCE_PATTERN: SourcePattern = SourcePattern::Random;
    /// Zero-copy setting applied to every data port
    pub const ZERO_COPY: bool = false;
}

/// Hardware buffer alignment
pub mod alignment {
    /// Buffer width must be a multiple of this
    pub const WIDTH: u32 = 32;
    /// Buffer height must be a multiple of this
    pub const HEIGHT: u32 = 16;
}

/// Timing constants
pub mod timing {
    use super::Duration;

    /// How long the pipeline streams before the program exits
    pub const RUN_DURATION_SECS: u64 = 5;

    /// Timeout when waiting for GStreamer state changes
    pub const STATE_CHANGE_TIMEOUT_MS: u64 = 5000;

    /// Poll interval of the control event thread
    pub const BUS_POLL_INTERVAL: Duration = Duration::from_millis(100);
}

/// Round `value` up to the next multiple of `align` (a power of two)
///
/// `None` when the padded value does not fit in a `u32`.
pub const fn align_up(value: u32, align: u32) -> Option<u32> {
    match value.checked_add(align - 1) {
        Some(padded) => Some(padded & !(align - 1)),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_up() {
        assert_eq!(align_up(3265, alignment::WIDTH), Some(3296));
        assert_eq!(align_up(4096, alignment::HEIGHT), Some(4096));
        assert_eq!(align_up(4097, alignment::HEIGHT), Some(4112));
        assert_eq!(align_up(0, alignment::WIDTH), Some(0));
        assert_eq!(align_up(32, alignment::WIDTH), Some(32));
    }

    #[test]
    fn test_align_up_overflow() {
        assert_eq!(align_up(u32::MAX - 4, alignment::WIDTH), None);
        assert_eq!(align_up(u32::MAX, alignment::HEIGHT), None);
        assert_eq!(align_up(u32::MAX - 31, alignment::WIDTH), Some(u32::MAX - 31));
    }
}
