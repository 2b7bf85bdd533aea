use crate::{Error, Result};
use cv_core::Fragment;
use cv_imgproc::{match_template, min_max_loc, TemplateMatchMethod};
use image::imageops;
use serde::{Deserialize, Serialize};

/// Rows taken from the bottom of the previous fragment as the search pattern.
pub const DEFAULT_TEMPLATE_HEIGHT: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignConfig {
    pub template_height: u32,
    /// Reject best matches scoring below this value. `None` accepts any match.
    pub min_confidence: Option<f32>,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            template_height: DEFAULT_TEMPLATE_HEIGHT,
            min_confidence: None,
        }
    }
}

impl AlignConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template_height(mut self, rows: u32) -> Self {
        self.template_height = rows;
        self
    }

    pub fn with_min_confidence(mut self, score: f32) -> Self {
        self.min_confidence = Some(score);
        self
    }
}

/// Where the bottom strip of the previous fragment was found in the current one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentResult {
    /// Top row of the best match in the current fragment.
    pub match_row: u32,
    /// Normalized correlation of the best match, in [-1, 1].
    pub score: f32,
    pub template_height: u32,
}

impl AlignmentResult {
    /// First row of the current fragment that is not covered by the previous one.
    pub fn crop_start(&self) -> u32 {
        self.match_row + self.template_height
    }

    /// Rows of a fragment of `height` rows that lie below the matched strip.
    pub fn new_rows(&self, height: u32) -> u32 {
        height.saturating_sub(self.crop_start())
    }
}

/// Align `current` against the bottom strip of `previous`.
///
/// The strip spans the full fragment width, so only vertical offsets are
/// searched. Content is assumed to scroll without horizontal drift.
pub fn align(
    previous: &Fragment,
    current: &Fragment,
    config: &AlignConfig,
) -> Result<AlignmentResult> {
    align_pair(previous, current, 1, config)
}

pub(crate) fn align_pair(
    previous: &Fragment,
    current: &Fragment,
    index: usize,
    config: &AlignConfig,
) -> Result<AlignmentResult> {
    let fail = |reason: String| Error::AlignmentFailed { index, reason };

    if previous.width() != current.width() {
        return Err(Error::WidthMismatch {
            expected: previous.width(),
            actual: current.width(),
        });
    }

    let template_height = config.template_height.min(previous.height());
    if template_height == 0 {
        return Err(fail("template strip is empty".into()));
    }
    if current.height() < template_height {
        return Err(fail(format!(
            "fragment height {} is smaller than the {}-row template strip",
            current.height(),
            template_height
        )));
    }

    let template = imageops::crop_imm(
        previous.image(),
        0,
        previous.height() - template_height,
        previous.width(),
        template_height,
    )
    .to_image();

    let scores = match_template(current.image(), &template, TemplateMatchMethod::CcoeffNormed)
        .map_err(|e| fail(e.to_string()))?;
    let (_, (_, match_row, score)) = min_max_loc(&scores);

    if let Some(min) = config.min_confidence {
        if score < min {
            return Err(fail(format!(
                "best match at row {} scored {:.3}, below the {:.3} threshold",
                match_row, score, min
            )));
        }
    }

    tracing::debug!(
        "fragment #{}: strip of {} rows matched at row {} (score {:.4})",
        index,
        template_height,
        match_row,
        score
    );

    Ok(AlignmentResult {
        match_row,
        score,
        template_height,
    })
}
