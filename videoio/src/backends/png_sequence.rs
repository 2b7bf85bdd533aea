use crate::{Result, VideoCapture, VideoError, VideoWriter};
use cv_core::FragmentBuffer;
use image::RgbImage;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads `*.png` files from a directory in file-name order.
#[derive(Debug)]
pub struct PngSequenceCapture {
    files: Vec<PathBuf>,
    current_idx: usize,
}

impl PngSequenceCapture {
    pub fn new<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let directory = directory.as_ref();
        let mut files = Vec::new();
        for entry in fs::read_dir(directory)? {
            let path = entry?.path();
            let is_png = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
            if is_png && path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        tracing::debug!("{} PNG frames found in {}", files.len(), directory.display());
        Ok(Self {
            files,
            current_idx: 0,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.files.len()
    }
}

impl VideoCapture for PngSequenceCapture {
    fn is_opened(&self) -> bool {
        !self.files.is_empty()
    }

    fn grab(&mut self) -> Result<()> {
        if self.current_idx < self.files.len() {
            Ok(())
        } else {
            Err(VideoError::CaptureFailed("End of stream".to_string()))
        }
    }

    fn retrieve(&mut self) -> Result<RgbImage> {
        let path = self
            .files
            .get(self.current_idx)
            .ok_or_else(|| VideoError::CaptureFailed("End of stream".to_string()))?;
        let img = image::open(path).map_err(|e| {
            VideoError::Backend(format!("Failed to decode {}: {}", path.display(), e))
        })?;
        self.current_idx += 1;
        Ok(img.to_rgb8())
    }
}

/// Load every fragment of a PNG sequence into a buffer, in capture order.
pub fn read_fragments<P: AsRef<Path>>(directory: P) -> Result<FragmentBuffer> {
    let mut capture = PngSequenceCapture::new(directory)?;
    let mut buffer = FragmentBuffer::new();
    for _ in 0..capture.frame_count() {
        buffer.push(capture.read()?.into())?;
    }
    Ok(buffer)
}

#[derive(Debug)]
pub struct PngSequenceWriter {
    directory: PathBuf,
    prefix: String,
    frame_count: usize,
}

impl PngSequenceWriter {
    pub fn new<P: AsRef<Path>>(directory: P, prefix: &str) -> Result<Self> {
        let directory = directory.as_ref();
        if !directory.exists() {
            fs::create_dir_all(directory)?;
        }

        Ok(Self {
            directory: directory.to_path_buf(),
            prefix: prefix.to_string(),
            frame_count: 0,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }
}

impl VideoWriter for PngSequenceWriter {
    fn write(&mut self, frame: &RgbImage) -> Result<()> {
        let filename = format!("{}_{:06}.png", self.prefix, self.frame_count);
        let path = self.directory.join(filename);

        frame
            .save(&path)
            .map_err(|e| VideoError::Backend(format!("Failed to save frame: {}", e)))?;
        self.frame_count += 1;
        Ok(())
    }
}
