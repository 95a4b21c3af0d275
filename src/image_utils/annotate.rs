use crate::annotations::detection::DetectedRegion;
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

const OUTLINE_COLOUR: Rgb<u8> = Rgb([34, 197, 94]);
const BAR_BACKGROUND: Rgb<u8> = Rgb([20, 20, 20]);
const OUTLINE_THICKNESS: u32 = 3;
const BAR_HEIGHT: u32 = 6;

/// Draws every region onto a copy of the image.
///
/// Each region gets an outline and, just above it, a bar whose filled length is the region
/// confidence. Used for the report image exported next to a detection result.
pub fn draw_regions(image: &DynamicImage, regions: &[DetectedRegion]) -> RgbImage {
    let mut canvas = image.to_rgb8();
    let (image_width, image_height) = canvas.dimensions();
    for region in regions {
        let (left, top, width, height) = region.annotation.to_pixels(image_width, image_height);
        for inset in 0..OUTLINE_THICKNESS.min(width / 2).min(height / 2) {
            let rect = Rect::at(left + inset as i32, top + inset as i32)
                .of_size(width - 2 * inset, height - 2 * inset);
            draw_hollow_rect_mut(&mut canvas, rect, OUTLINE_COLOUR);
        }

        let bar_top = (top - BAR_HEIGHT as i32 - 2).max(0);
        draw_filled_rect_mut(
            &mut canvas,
            Rect::at(left, bar_top).of_size(width, BAR_HEIGHT),
            BAR_BACKGROUND,
        );
        let filled = ((width as f32 * region.confidence).round() as u32).max(1);
        draw_filled_rect_mut(
            &mut canvas,
            Rect::at(left, bar_top).of_size(filled, BAR_HEIGHT),
            OUTLINE_COLOUR,
        );
    }
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_is_drawn_at_region_edges() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(100, 100));
        let region = DetectedRegion::new(0.2, 0.3, 0.5, 0.4, 0.9).unwrap();
        let out = draw_regions(&img, &[region]);
        assert_eq!(out.dimensions(), (100, 100));
        assert_eq!(out.get_pixel(20, 50), &OUTLINE_COLOUR);
        assert_eq!(out.get_pixel(45, 30), &OUTLINE_COLOUR);
        // Interior stays untouched.
        assert_eq!(out.get_pixel(45, 50), &Rgb([0, 0, 0]));
    }

    #[test]
    fn no_regions_returns_copy() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([1, 2, 3])));
        assert_eq!(draw_regions(&img, &[]), img.to_rgb8());
    }
}
