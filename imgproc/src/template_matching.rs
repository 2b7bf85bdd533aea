use crate::{validate_image_size, ImgprocError, Result};
use image::{ImageBuffer, Pixel};
use rayon::prelude::*;

/// Similarity measures, named after their OpenCV counterparts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateMatchMethod {
    SqDiff,
    SqDiffNormed,
    Ccorr,
    CcorrNormed,
    Ccoeff,
    CcoeffNormed,
}

impl TemplateMatchMethod {
    /// Whether the best match is the minimum of the score map.
    pub fn lower_is_better(self) -> bool {
        matches!(self, Self::SqDiff | Self::SqDiffNormed)
    }
}

/// Score map with one entry per candidate top-left position.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub data: Vec<f32>,
    pub width: u32,
    pub height: u32,
}

impl MatchResult {
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[(y * self.width + x) as usize]
    }
}

/// Slide `templ` over `image` and score every position.
///
/// Multi-channel images are scored over all channels at once; the `Ccoeff*`
/// methods subtract a separate mean per channel. Rows of the score map are
/// computed in parallel on the global rayon pool.
pub fn match_template<P>(
    image: &ImageBuffer<P, Vec<u8>>,
    templ: &ImageBuffer<P, Vec<u8>>,
    method: TemplateMatchMethod,
) -> Result<MatchResult>
where
    P: Pixel<Subpixel = u8> + Sync,
{
    validate_image_size(templ.width(), templ.height())
        .map_err(|_| ImgprocError::DimensionMismatch("template cannot be empty".into()))?;
    if image.width() < templ.width() || image.height() < templ.height() {
        return Err(ImgprocError::DimensionMismatch(format!(
            "template {}x{} must fit inside source image {}x{}",
            templ.width(),
            templ.height(),
            image.width(),
            image.height()
        )));
    }

    let ch = P::CHANNEL_COUNT as usize;
    let out_w = image.width() - templ.width() + 1;
    let out_h = image.height() - templ.height() + 1;

    let tw = templ.width() as usize;
    let th = templ.height() as usize;
    let t_stride = tw * ch;
    let i_stride = image.width() as usize * ch;
    let t_raw = templ.as_raw();
    let i_raw = image.as_raw();

    let n = (tw * th) as f64;
    let t_sums = channel_sums(t_raw, ch);
    let t_sq_sum = sum_sq_u8(t_raw);
    let t_var_sum = t_sq_sum - t_sums.iter().map(|s| s * s / n).sum::<f64>();

    let mut out = vec![0.0f32; (out_w * out_h) as usize];

    out.par_chunks_mut(out_w as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let mut sum_i = vec![0.0f64; ch];
            for (x, score) in row.iter_mut().enumerate() {
                sum_i.iter_mut().for_each(|s| *s = 0.0);
                let mut sum_i_sq = 0.0f64;
                let mut cross = 0.0f64;

                for j in 0..th {
                    let start = (y + j) * i_stride + x * ch;
                    let src = &i_raw[start..start + t_stride];
                    let tpl = &t_raw[j * t_stride..(j + 1) * t_stride];
                    for (k, (&iv, &tv)) in src.iter().zip(tpl).enumerate() {
                        let iv = iv as f64;
                        sum_i[k % ch] += iv;
                        sum_i_sq += iv * iv;
                        cross += iv * tv as f64;
                    }
                }

                let value = match method {
                    TemplateMatchMethod::SqDiff => {
                        // ||I - T||^2 = ||I||^2 + ||T||^2 - 2 * <I, T>
                        sum_i_sq + t_sq_sum - 2.0 * cross
                    }
                    TemplateMatchMethod::SqDiffNormed => {
                        let sqdiff = sum_i_sq + t_sq_sum - 2.0 * cross;
                        normalize(sqdiff, sum_i_sq * t_sq_sum)
                    }
                    TemplateMatchMethod::Ccorr => cross,
                    TemplateMatchMethod::CcorrNormed => normalize(cross, sum_i_sq * t_sq_sum),
                    TemplateMatchMethod::Ccoeff => cross - mean_product(&sum_i, &t_sums, n),
                    TemplateMatchMethod::CcoeffNormed => {
                        let coeff = cross - mean_product(&sum_i, &t_sums, n);
                        let i_var = sum_i_sq - sum_i.iter().map(|s| s * s / n).sum::<f64>();
                        normalize(coeff, i_var * t_var_sum)
                    }
                };
                *score = value as f32;
            }
        });

    Ok(MatchResult {
        data: out,
        width: out_w,
        height: out_h,
    })
}

/// Locate the minimum and maximum of a score map as `(x, y, value)`.
///
/// Ties resolve to the first position in row-major order.
pub fn min_max_loc(result: &MatchResult) -> ((u32, u32, f32), (u32, u32, f32)) {
    let mut min_val = f32::INFINITY;
    let mut max_val = f32::NEG_INFINITY;
    let mut min_xy = (0u32, 0u32);
    let mut max_xy = (0u32, 0u32);

    for y in 0..result.height {
        for x in 0..result.width {
            let v = result.get(x, y);
            if v < min_val {
                min_val = v;
                min_xy = (x, y);
            }
            if v > max_val {
                max_val = v;
                max_xy = (x, y);
            }
        }
    }

    ((min_xy.0, min_xy.1, min_val), (max_xy.0, max_xy.1, max_val))
}

fn normalize(value: f64, denom_sq: f64) -> f64 {
    let denom = denom_sq.max(0.0).sqrt();
    if denom > 1e-12 {
        value / denom
    } else {
        0.0
    }
}

// sum((I - meanI) * (T - meanT)) = <I,T> - sum_c(sumI_c * sumT_c) / N
fn mean_product(sum_i: &[f64], sum_t: &[f64], n: f64) -> f64 {
    sum_i.iter().zip(sum_t).map(|(a, b)| a * b / n).sum()
}

fn channel_sums(values: &[u8], channels: usize) -> Vec<f64> {
    let mut sums = vec![0.0f64; channels];
    for (k, &v) in values.iter().enumerate() {
        sums[k % channels] += v as f64;
    }
    sums
}

fn sum_sq_u8(values: &[u8]) -> f64 {
    values
        .iter()
        .map(|&v| {
            let f = v as f64;
            f * f
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    fn noise(x: u32, y: u32, c: u32) -> u8 {
        let mut h = x
            .wrapping_mul(374_761_393)
            .wrapping_add(y.wrapping_mul(668_265_263))
            .wrapping_add(c.wrapping_mul(1_274_126_177));
        h = (h ^ (h >> 13)).wrapping_mul(1_274_126_177);
        (h ^ (h >> 16)) as u8
    }

    #[test]
    fn ccorr_finds_exact_patch_at_max() {
        let mut img = GrayImage::new(8, 8);
        for y in 2..5 {
            for x in 3..6 {
                img.put_pixel(x, y, Luma([200]));
            }
        }

        let mut templ = GrayImage::new(3, 3);
        for y in 0..3 {
            for x in 0..3 {
                templ.put_pixel(x, y, Luma([200]));
            }
        }

        let res = match_template(&img, &templ, TemplateMatchMethod::CcorrNormed).unwrap();
        let (_min, max) = min_max_loc(&res);
        assert_eq!((max.0, max.1), (3, 2));
    }

    #[test]
    fn sqdiff_finds_exact_patch_at_min() {
        let mut img = GrayImage::new(8, 8);
        for y in 1..4 {
            for x in 2..5 {
                img.put_pixel(x, y, Luma([120]));
            }
        }

        let mut templ = GrayImage::new(3, 3);
        for y in 0..3 {
            for x in 0..3 {
                templ.put_pixel(x, y, Luma([120]));
            }
        }

        let res = match_template(&img, &templ, TemplateMatchMethod::SqDiff).unwrap();
        let (min, _max) = min_max_loc(&res);
        assert_eq!((min.0, min.1), (2, 1));
        assert!(min.2.abs() < 1e-5);
    }

    #[test]
    fn ccoeff_normed_scores_exact_rgb_strip_as_one() {
        let img = RgbImage::from_fn(6, 20, |x, y| Rgb([noise(x, y, 0), noise(x, y, 1), noise(x, y, 2)]));
        let templ = image::imageops::crop_imm(&img, 0, 11, 6, 4).to_image();

        let res = match_template(&img, &templ, TemplateMatchMethod::CcoeffNormed).unwrap();
        assert_eq!(res.width, 1);
        assert_eq!(res.height, 17);

        let (_min, max) = min_max_loc(&res);
        assert_eq!((max.0, max.1), (0, 11));
        assert!((max.2 - 1.0).abs() < 1e-4);
    }

    #[test]
    fn oversized_template_is_rejected() {
        let img = GrayImage::new(4, 4);
        let templ = GrayImage::new(4, 5);
        let err = match_template(&img, &templ, TemplateMatchMethod::CcoeffNormed).unwrap_err();
        assert!(matches!(err, ImgprocError::DimensionMismatch(_)));
    }

    #[test]
    fn empty_template_is_rejected() {
        let img = GrayImage::new(4, 4);
        let templ = GrayImage::new(0, 0);
        assert!(match_template(&img, &templ, TemplateMatchMethod::Ccorr).is_err());
    }

    #[test]
    fn constant_template_yields_zero_normed_scores() {
        let img = GrayImage::from_fn(3, 10, |_, y| Luma([(y * 20) as u8]));
        let templ = GrayImage::from_pixel(3, 2, Luma([90]));
        let res = match_template(&img, &templ, TemplateMatchMethod::CcoeffNormed).unwrap();
        assert!(res.data.iter().all(|&v| v == 0.0));
        let (_min, max) = min_max_loc(&res);
        assert_eq!((max.0, max.1), (0, 0));
    }
}
