use cv_videoio::{
    backends::{read_fragments, PngSequenceCapture, PngSequenceWriter},
    write_composite, VideoCapture, VideoError, VideoWriter,
};
use image::{Rgb, RgbImage};
use tempfile::tempdir;

#[test]
fn test_png_sequence_roundtrip() {
    let dir = tempdir().expect("Failed to create temp dir");

    // 1. Write frames
    let mut writer = PngSequenceWriter::new(dir.path(), "fragment").unwrap();
    let width = 64;
    let height = 48;

    for i in 0..5 {
        let img = RgbImage::from_pixel(width, height, Rgb([i as u8 * 10, 7, 200]));
        writer.write(&img).unwrap();
    }
    assert_eq!(writer.frame_count(), 5);

    // 2. Read frames back
    let mut capture = PngSequenceCapture::new(dir.path()).unwrap();
    assert!(capture.is_opened());
    assert_eq!(capture.frame_count(), 5);

    for i in 0..5 {
        let img = capture.read().unwrap();
        assert_eq!(img.dimensions(), (width, height));
        assert_eq!(img.get_pixel(0, 0), &Rgb([i as u8 * 10, 7, 200]));
    }

    // 3. Verify end of stream
    assert!(capture.read().is_err());
}

#[test]
fn test_png_sequence_invalid_dir() {
    let res = PngSequenceCapture::new("/non/existent/path");
    assert!(matches!(res, Err(VideoError::Io(_))));
}

#[test]
fn test_sequence_ignores_other_files_and_sorts_by_name() {
    let dir = tempdir().unwrap();
    RgbImage::from_pixel(4, 4, Rgb([2, 0, 0]))
        .save(dir.path().join("b.png"))
        .unwrap();
    RgbImage::from_pixel(4, 4, Rgb([1, 0, 0]))
        .save(dir.path().join("a.PNG"))
        .unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not a frame").unwrap();

    let buffer = read_fragments(dir.path()).unwrap();
    let reds: Vec<u8> = buffer.iter().map(|f| f.image().get_pixel(0, 0)[0]).collect();
    assert_eq!(reds, vec![1, 2]);
}

#[test]
fn test_read_fragments_rejects_mixed_widths() {
    let dir = tempdir().unwrap();
    let mut writer = PngSequenceWriter::new(dir.path(), "frame").unwrap();
    writer.write(&RgbImage::new(10, 10)).unwrap();
    writer.write(&RgbImage::new(11, 10)).unwrap();

    let err = read_fragments(dir.path()).unwrap_err();
    assert!(matches!(
        err,
        VideoError::Core(cv_core::Error::WidthMismatch { .. })
    ));
}

#[test]
fn test_empty_directory_gives_empty_buffer() {
    let dir = tempdir().unwrap();
    let buffer = read_fragments(dir.path()).unwrap();
    assert!(buffer.is_empty());
    assert!(!PngSequenceCapture::new(dir.path()).unwrap().is_opened());
}

#[test]
fn test_write_composite() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scroll_capture.png");
    let img = RgbImage::from_fn(3, 9, |x, y| Rgb([x as u8, y as u8, 0]));
    write_composite(&path, &img).unwrap();

    let back = image::open(&path).unwrap().to_rgb8();
    assert_eq!(back, img);
}
