use cv_imgproc::{match_template, min_max_loc, TemplateMatchMethod};
use image::{imageops, Rgb, RgbImage};
use rayon::ThreadPoolBuilder;

#[test]
fn test_single_thread_pool_gives_same_scores() {
    // A strict pool with 1 thread must reproduce the parallel result exactly
    let pool = ThreadPoolBuilder::new().num_threads(1).build().unwrap();

    let img = RgbImage::from_fn(40, 120, |x, y| {
        let h = (y.wrapping_mul(2_654_435_761) >> 20) ^ x.wrapping_mul(97);
        Rgb([h as u8, (h >> 4) as u8, (x * 3) as u8])
    });
    let templ = imageops::crop_imm(&img, 0, 70, 40, 30).to_image();

    let parallel = match_template(&img, &templ, TemplateMatchMethod::CcoeffNormed).unwrap();
    let serial = pool
        .install(|| match_template(&img, &templ, TemplateMatchMethod::CcoeffNormed))
        .unwrap();

    assert_eq!(parallel.data, serial.data);
    let (_min, max) = min_max_loc(&serial);
    assert_eq!((max.0, max.1), (0, 70));
}
