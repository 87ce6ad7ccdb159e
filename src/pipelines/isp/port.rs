// SPDX-License-Identifier: GPL-3.0-only

//! Port format configuration

use crate::backends::framework::{
    Encoding, FrameworkResult, MediaFramework, PortRef, Rect, Status, VideoFormat,
};
use crate::constants::{align_up, alignment};
use tracing::{debug, warn};

/// Format for a `width` x `height` frame padded to the hardware alignment
///
/// The buffer dimensions are rounded up; the crop keeps the requested size at
/// the origin. `None` if a padded dimension overflows.
pub fn aligned_format(encoding: Encoding, width: u32, height: u32) -> Option<VideoFormat> {
    Some(VideoFormat {
        encoding,
        width: align_up(width, alignment::WIDTH)?,
        height: align_up(height, alignment::HEIGHT)?,
        crop: Rect {
            x: 0,
            y: 0,
            width,
            height,
        },
    })
}

/// Apply an encoding and frame size to a data port and commit it
///
/// A size that cannot be aligned is rejected with `EINVAL` without reaching
/// the framework.
pub fn configure_port(
    framework: &dyn MediaFramework,
    port: PortRef,
    encoding: Encoding,
    width: u32,
    height: u32,
) -> FrameworkResult<()> {
    let format = aligned_format(encoding, width, height).ok_or_else(|| {
        warn!(?port, width, height, "Frame size overflows port alignment");
        Status::Invalid
    })?;
    debug!(?port, %format, "Committing port format");
    framework.port_format_commit(port, &format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::framework::recording::RecordingFramework;
    use crate::constants::components::SOURCE;

    #[test]
    fn test_aligned_format_keeps_crop() {
        let format = aligned_format(Encoding::I420, 3265, 4096).unwrap();
        assert_eq!(format.width, 3296);
        assert_eq!(format.height, 4096);
        assert_eq!(
            format.crop,
            Rect {
                x: 0,
                y: 0,
                width: 3265,
                height: 4096
            }
        );
    }

    #[test]
    fn test_configure_port_commits_format() {
        let fw = RecordingFramework::new();
        let src = fw.component_create(SOURCE).unwrap();
        let port = PortRef::output(src, 0);
        configure_port(&fw, port, Encoding::NV12, 1000, 1001).unwrap();

        let committed = fw.port_format(port).unwrap();
        assert_eq!(committed.encoding, Encoding::NV12);
        assert_eq!(committed.width, 1024);
        assert_eq!(committed.height, 1008);
        assert_eq!(committed.crop.width, 1000);
        assert_eq!(committed.crop.height, 1001);
    }

    #[test]
    fn test_configure_missing_port_fails() {
        let fw = RecordingFramework::new();
        let src = fw.component_create(SOURCE).unwrap();
        let result = configure_port(&fw, PortRef::input(src, 0), Encoding::I420, 64, 64);
        assert_eq!(result, Err(Status::Invalid));
    }

    #[test]
    fn test_oversized_frame_rejected_before_commit() {
        assert_eq!(aligned_format(Encoding::I420, u32::MAX - 4, 64), None);
        assert_eq!(aligned_format(Encoding::I420, 64, u32::MAX), None);

        let fw = RecordingFramework::new();
        let src = fw.component_create(SOURCE).unwrap();
        let port = PortRef::output(src, 0);
        let result = configure_port(&fw, port, Encoding::I420, u32::MAX - 4, 64);
        assert_eq!(result, Err(Status::Invalid));
        assert_eq!(fw.calls().len(), 1);
        assert_eq!(fw.port_format(port), Err(Status::NotConfigured));
    }
}
