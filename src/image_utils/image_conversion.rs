use image::RgbImage;
use ndarray::{Array, Array4};

/// Converts an RGB8 image to a (1, 3, height, width) array scaled to [0, 1].
pub fn convert_rgb_image_to_owned_array(rgb_image: &RgbImage) -> Array4<f32> {
    let mut image_array = Array::zeros((
        1,
        3,
        rgb_image.height() as usize,
        rgb_image.width() as usize,
    ));
    for (x, y, pixel) in rgb_image.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        let [r, g, b] = pixel.0;
        image_array[[0, 0, y, x]] = (r as f32) / 255.;
        image_array[[0, 1, y, x]] = (g as f32) / 255.;
        image_array[[0, 2, y, x]] = (b as f32) / 255.;
    }
    image_array
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gradient_image() -> RgbImage {
        RgbImage::from_fn(4, 2, |x, y| Rgb([(x * 60) as u8, (y * 200) as u8, 255]))
    }

    #[test]
    fn rgb_image_to_array_layout() {
        let arr = convert_rgb_image_to_owned_array(&gradient_image());
        // Dimensions encode (image, channel, row, column).
        assert_eq!(arr.shape(), &[1, 3, 2, 4]);
        assert_eq!(arr[[0, 0, 0, 3]], 180.0 / 255.0);
        assert_eq!(arr[[0, 1, 1, 0]], 200.0 / 255.0);
        assert_eq!(arr[[0, 2, 1, 2]], 1.0);
        assert!(arr.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn black_and_white_hit_the_range_ends() {
        let img = RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        let arr = convert_rgb_image_to_owned_array(&img);
        assert_eq!(
            (arr[[0, 0, 0, 0]], arr[[0, 1, 0, 0]], arr[[0, 2, 0, 0]]),
            (0.0, 0.0, 0.0)
        );
        assert_eq!(
            (arr[[0, 0, 0, 1]], arr[[0, 1, 0, 1]], arr[[0, 2, 0, 1]]),
            (1.0, 1.0, 1.0)
        );
    }
}
