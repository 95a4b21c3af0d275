use crate::error::Result;
use image::DynamicImage;
use std::path::Path;

/// File extensions the CLI treats as images when walking a directory.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "webp"];

pub fn read_image(filepath: &Path) -> Result<DynamicImage> {
    Ok(image::open(filepath)?)
}

/// Decodes an uploaded image buffer, guessing the format from its magic bytes.
pub fn decode_image_bytes(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

pub fn has_image_extension(filepath: &Path) -> bool {
    filepath
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::io::Cursor;

    fn test_image() -> RgbImage {
        let mut img = RgbImage::new(3, 3);
        img.put_pixel(0, 1, Rgb([255, 0, 0]));
        img.put_pixel(1, 1, Rgb([0, 255, 0]));
        img.put_pixel(2, 1, Rgb([0, 0, 255]));
        for x in 0..3 {
            img.put_pixel(x, 2, Rgb([255, 255, 255]));
        }
        img
    }

    #[test]
    fn read_test_data_as_rgb8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_image.png");
        test_image().save(&path).unwrap();

        let img = read_image(&path).unwrap().into_rgb8();
        assert_eq!(img.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(img.get_pixel(0, 1), &Rgb([255, 0, 0]));
        assert_eq!(img.get_pixel(1, 1), &Rgb([0, 255, 0]));
        assert_eq!(img.get_pixel(2, 1), &Rgb([0, 0, 255]));
        assert_eq!(img.get_pixel(2, 2), &Rgb([255, 255, 255]));
    }

    #[test]
    fn decode_png_bytes() {
        let mut bytes: Vec<u8> = Vec::new();
        DynamicImage::ImageRgb8(test_image())
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        let img = decode_image_bytes(&bytes).unwrap();
        assert_eq!((img.width(), img.height()), (3, 3));
    }

    #[test]
    fn garbage_bytes_are_an_error() {
        assert!(decode_image_bytes(b"definitely not an image").is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read_image(Path::new("./does/not/exist.png")).is_err());
    }

    #[test]
    fn recognizes_image_extensions() {
        assert!(has_image_extension(Path::new("field/plot_03.JPG")));
        assert!(has_image_extension(Path::new("a.png")));
        assert!(!has_image_extension(Path::new("notes.txt")));
        assert!(!has_image_extension(Path::new("no_extension")));
    }
}
