use image::imageops::FilterType;
use image::DynamicImage;
use ndarray::Array4;

// ImageNet normalization constants, shared by both backends.
pub const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Resizes (not crops) to `size`×`size`, scales pixels to [0,1] and applies
/// per-channel ImageNet normalization. Output is NCHW with batch dim 1.
pub fn preprocess(image: &DynamicImage, size: u32) -> Array4<f32> {
    let rgb = image.to_rgb8();
    let resized = image::imageops::resize(&rgb, size, size, FilterType::Triangle);

    let mut tensor = Array4::<f32>::zeros((1, 3, size as usize, size as usize));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] =
                (pixel[c] as f32 / 255.0 - MEAN[c]) / STD[c];
        }
    }
    tensor
}
