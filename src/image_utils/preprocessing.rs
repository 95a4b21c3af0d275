use crate::error::{Result, WeedDetectionError};
use crate::image_utils::image_conversion::convert_rgb_image_to_owned_array;
use image::DynamicImage;
use image::imageops::{self, FilterType};
use ndarray::Array4;

/// Resizes an image to the square network input and scales it to [0, 1].
///
/// The output is a (1, 3, input_size, input_size) array. Aspect ratio is not preserved, the
/// classifier was designed around stretched field photos.
pub fn preprocess_image(image: &DynamicImage, input_size: u32) -> Result<Array4<f32>> {
    if image.width() == 0 || image.height() == 0 {
        return Err(WeedDetectionError::inference(format!(
            "cannot analyze an empty image ({}x{}).",
            image.width(),
            image.height()
        )));
    }
    if input_size == 0 {
        return Err(WeedDetectionError::inference("network input size is zero."));
    }
    let rgb = image.to_rgb8();
    let resized = if rgb.dimensions() == (input_size, input_size) {
        rgb
    } else {
        imageops::resize(&rgb, input_size, input_size, FilterType::Triangle)
    };
    log::debug!(
        "Preprocessed {}x{} image to {}x{}",
        image.width(),
        image.height(),
        input_size,
        input_size
    );
    Ok(convert_rgb_image_to_owned_array(&resized))
}
