use crate::{Error, Result};
use image::{ImageBuffer, RgbImage};

/// Channel order of a raw grabbed buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    Rgb,
    Rgba,
    Bgr,
    Bgra,
}

impl PixelLayout {
    pub fn channels(self) -> usize {
        match self {
            PixelLayout::Rgb | PixelLayout::Bgr => 3,
            PixelLayout::Rgba | PixelLayout::Bgra => 4,
        }
    }

    fn is_bgr(self) -> bool {
        matches!(self, PixelLayout::Bgr | PixelLayout::Bgra)
    }
}

/// A pixel buffer as handed over by a screen grabber, before color conversion.
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
    pub data: Vec<u8>,
}

impl RawFrame {
    pub fn new(width: u32, height: u32, layout: PixelLayout, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * layout.channels();
        if data.len() != expected {
            return Err(Error::InvalidFrame(format!(
                "{}x{} {:?} frame needs {} bytes, got {}",
                width,
                height,
                layout,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    /// Convert to a 3-channel RGB fragment. Alpha is dropped.
    pub fn into_fragment(self) -> Result<Fragment> {
        let channels = self.layout.channels();
        let rgb = if self.layout == PixelLayout::Rgb {
            self.data
        } else {
            let swap = self.layout.is_bgr();
            let mut out = Vec::with_capacity(self.width as usize * self.height as usize * 3);
            for px in self.data.chunks_exact(channels) {
                if swap {
                    out.extend_from_slice(&[px[2], px[1], px[0]]);
                } else {
                    out.extend_from_slice(&px[..3]);
                }
            }
            out
        };
        Fragment::from_raw(self.width, self.height, rgb)
    }
}

/// One captured screenshot. Never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    image: RgbImage,
}

impl Fragment {
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    pub fn from_raw(width: u32, height: u32, rgb: Vec<u8>) -> Result<Self> {
        let len = rgb.len();
        ImageBuffer::from_raw(width, height, rgb)
            .map(Self::new)
            .ok_or_else(|| {
                Error::InvalidFrame(format!(
                    "{} bytes cannot hold a {}x{} RGB image",
                    len, width, height
                ))
            })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }
}

impl From<RgbImage> for Fragment {
    fn from(image: RgbImage) -> Self {
        Self::new(image)
    }
}

/// Fragments in capture order. All fragments share the width of the first one.
#[derive(Debug, Clone, Default)]
pub struct FragmentBuffer {
    fragments: Vec<Fragment>,
}

impl FragmentBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fragment: Fragment) -> Result<()> {
        if let Some(width) = self.width() {
            if fragment.width() != width {
                return Err(Error::WidthMismatch {
                    expected: width,
                    actual: fragment.width(),
                });
            }
        }
        self.fragments.push(fragment);
        Ok(())
    }

    /// Common width, or `None` while empty.
    pub fn width(&self) -> Option<u32> {
        self.fragments.first().map(Fragment::width)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn as_slice(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fragment> {
        self.fragments.iter()
    }

    pub fn into_vec(self) -> Vec<Fragment> {
        self.fragments
    }
}

impl<'a> IntoIterator for &'a FragmentBuffer {
    type Item = &'a Fragment;
    type IntoIter = std::slice::Iter<'a, Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.fragments.iter()
    }
}
