use crate::{Result, VideoError};
use cv_core::{CaptureRegion, FragmentBuffer, RawFrame};

/// Platform screen grabber: returns the pixels currently shown in `region`.
pub trait RegionGrabber {
    fn grab(&mut self, region: &CaptureRegion) -> Result<RawFrame>;
}

/// Collects fragments from one fixed region, one grab per capture request.
///
/// The session owns its fragment buffer; hand it to the stitcher with
/// [`CaptureSession::finish`] once capturing is over.
#[derive(Debug)]
pub struct CaptureSession<G> {
    region: CaptureRegion,
    grabber: G,
    fragments: FragmentBuffer,
}

impl<G: RegionGrabber> CaptureSession<G> {
    pub fn new(region: CaptureRegion, grabber: G) -> Self {
        Self {
            region,
            grabber,
            fragments: FragmentBuffer::new(),
        }
    }

    pub fn region(&self) -> &CaptureRegion {
        &self.region
    }

    /// Grab one fragment and append it. Returns the number captured so far.
    pub fn capture(&mut self) -> Result<usize> {
        let frame = self.grabber.grab(&self.region)?;
        if frame.width != self.region.width || frame.height != self.region.height {
            return Err(VideoError::CaptureFailed(format!(
                "grabbed {}x{} frame for a {}x{} region",
                frame.width, frame.height, self.region.width, self.region.height
            )));
        }
        self.fragments.push(frame.into_fragment()?)?;

        let count = self.fragments.len();
        tracing::info!("Captured fragment #{}", count);
        Ok(count)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn fragments(&self) -> &FragmentBuffer {
        &self.fragments
    }

    pub fn finish(self) -> FragmentBuffer {
        self.fragments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cv_core::PixelLayout;

    #[derive(Debug)]
    struct SolidGrabber {
        grabs: u8,
        size_override: Option<(u32, u32)>,
    }

    impl RegionGrabber for SolidGrabber {
        fn grab(&mut self, region: &CaptureRegion) -> Result<RawFrame> {
            self.grabs += 1;
            let (w, h) = self.size_override.unwrap_or((region.width, region.height));
            let px = [self.grabs, 0, 0, 255];
            let data = px.repeat(w as usize * h as usize);
            Ok(RawFrame::new(w, h, PixelLayout::Bgra, data)?)
        }
    }

    #[test]
    fn captures_accumulate_in_order() {
        let region = CaptureRegion::new(5, 5, 12, 20).unwrap();
        let mut session = CaptureSession::new(
            region,
            SolidGrabber {
                grabs: 0,
                size_override: None,
            },
        );
        assert!(session.is_empty());
        assert_eq!(session.capture().unwrap(), 1);
        assert_eq!(session.capture().unwrap(), 2);

        let buffer = session.finish();
        assert_eq!(buffer.width(), Some(12));
        // BGRA blue channel lands in the RGB blue slot.
        let blues: Vec<u8> = buffer.iter().map(|f| f.image().get_pixel(0, 0)[2]).collect();
        assert_eq!(blues, vec![1, 2]);
    }

    #[test]
    fn frame_of_wrong_size_is_rejected() {
        let region = CaptureRegion::new(0, 0, 12, 20).unwrap();
        let mut session = CaptureSession::new(
            region,
            SolidGrabber {
                grabs: 0,
                size_override: Some((12, 19)),
            },
        );
        assert!(matches!(
            session.capture(),
            Err(VideoError::CaptureFailed(_))
        ));
        assert_eq!(session.len(), 0);
    }
}
