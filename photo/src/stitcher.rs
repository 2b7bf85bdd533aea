use crate::alignment::{align_pair, AlignConfig, AlignmentResult};
use crate::{Error, Result};
use cv_core::Fragment;
use image::{ImageBuffer, RgbImage};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StitchConfig {
    pub align: AlignConfig,
}

impl StitchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template_height(mut self, rows: u32) -> Self {
        self.align = self.align.with_template_height(rows);
        self
    }

    pub fn with_min_confidence(mut self, score: f32) -> Self {
        self.align = self.align.with_min_confidence(score);
        self
    }
}

/// Outcome of joining fragment `index` onto its predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeamReport {
    pub index: usize,
    pub alignment: AlignmentResult,
    pub rows_appended: u32,
}

/// Joins scroll-capture fragments into one tall image.
#[derive(Debug, Clone, Default)]
pub struct Stitcher {
    config: StitchConfig,
}

impl Stitcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StitchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StitchConfig {
        &self.config
    }

    pub fn stitch(&self, fragments: &[Fragment]) -> Result<RgbImage> {
        self.stitch_with_report(fragments).map(|(image, _)| image)
    }

    /// Stitch and also return how each fragment was joined.
    ///
    /// Every fragment is aligned against the fragment captured just before it,
    /// never against the growing composite. All seams are resolved before any
    /// pixels are copied, so an alignment error leaves no partial output.
    pub fn stitch_with_report(
        &self,
        fragments: &[Fragment],
    ) -> Result<(RgbImage, Vec<SeamReport>)> {
        let (first, rest) = fragments.split_first().ok_or(Error::EmptyInput)?;
        if rest.is_empty() {
            return Ok((first.image().clone(), Vec::new()));
        }

        tracing::info!("Stitching {} fragments", fragments.len());

        let mut seams = Vec::with_capacity(rest.len());
        let mut previous = first;
        for (offset, current) in rest.iter().enumerate() {
            let index = offset + 1;
            let alignment = align_pair(previous, current, index, &self.config.align)?;
            let rows_appended = alignment.new_rows(current.height());
            if rows_appended == 0 {
                tracing::warn!(
                    "fragment #{} adds no new rows (match at row {}), skipping",
                    index,
                    alignment.match_row
                );
            }
            seams.push(SeamReport {
                index,
                alignment,
                rows_appended,
            });
            previous = current;
        }

        let width = first.width();
        let height = first.height() + seams.iter().map(|s| s.rows_appended).sum::<u32>();
        let stride = width as usize * 3;

        let mut data = Vec::with_capacity(stride * height as usize);
        data.extend_from_slice(first.image().as_raw());
        for (seam, current) in seams.iter().zip(rest) {
            if seam.rows_appended > 0 {
                let start = seam.alignment.crop_start() as usize * stride;
                data.extend_from_slice(&current.image().as_raw()[start..]);
            }
        }

        let composite: RgbImage = ImageBuffer::from_raw(width, height, data).ok_or_else(|| {
            Error::InvalidFrame(format!("composite buffer does not fit {}x{}", width, height))
        })?;

        tracing::info!(
            "Composite is {}x{} from {} fragments",
            composite.width(),
            composite.height(),
            fragments.len()
        );
        Ok((composite, seams))
    }
}

/// Stitch with the default configuration.
pub fn stitch(fragments: &[Fragment]) -> Result<RgbImage> {
    Stitcher::new().stitch(fragments)
}
