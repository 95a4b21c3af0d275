use crate::error::{Result, WeedDetectionError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Slack allowed when checking that a box stays inside the image.
const EDGE_TOLERANCE: f32 = 1e-6;

/// A bounding box in normalized image coordinates.
///
/// Every field is relative to the image dimensions, so a box is independent of the resolution
/// of the photo it was found in. The left side of the image is x=0 and the top is y=0; a box
/// never extends past the right or bottom edge (x + width <= 1, y + height <= 1).
///
/// Boxes carry no identity beyond their position. The UI scales them by the canvas size to draw
/// the outline of a suspected weed.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct BoundingBox {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl BoundingBox {
    /// Checks if a box has valid parameters before constructing.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Result<Self> {
        for (name, value) in [("x", x), ("y", y), ("width", width), ("height", height)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(WeedDetectionError::InvalidRegion(format!(
                    "{} must lie in [0, 1], got {}.",
                    name, value
                )));
            }
        }
        if x + width > 1.0 + EDGE_TOLERANCE {
            Err(WeedDetectionError::InvalidRegion(format!(
                "box extends past the right edge (x + width = {}).",
                x + width
            )))
        } else if y + height > 1.0 + EDGE_TOLERANCE {
            Err(WeedDetectionError::InvalidRegion(format!(
                "box extends past the bottom edge (y + height = {}).",
                y + height
            )))
        } else {
            Ok(BoundingBox { x, y, width, height })
        }
    }

    /// Builds a box from corner coordinates, clipping it to the unit square.
    ///
    /// Model outputs routinely overshoot the image border by a few pixels, so the corners are
    /// clamped rather than rejected. Corners that collapse after clipping are an error.
    pub fn from_xyxy_clipped(left: f32, top: f32, right: f32, bottom: f32) -> Result<Self> {
        let left = left.clamp(0.0, 1.0);
        let top = top.clamp(0.0, 1.0);
        let right = right.clamp(0.0, 1.0);
        let bottom = bottom.clamp(0.0, 1.0);
        if left >= right || top >= bottom {
            return Err(WeedDetectionError::InvalidRegion(format!(
                "degenerate box after clipping ({}, {}, {}, {}).",
                left, top, right, bottom
            )));
        }
        BoundingBox::new(left, top, right - left, bottom - top)
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Scales the box to pixel coordinates as (left, top, width, height).
    pub fn to_pixels(&self, image_width: u32, image_height: u32) -> (i32, i32, u32, u32) {
        let left = (self.x * image_width as f32).round() as i32;
        let top = (self.y * image_height as f32).round() as i32;
        let width = ((self.width * image_width as f32).round() as u32).max(1);
        let height = ((self.height * image_height as f32).round() as u32).max(1);
        (left, top, width, height)
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BoundingBox {{ x: {:.3}, y: {:.3}, width: {:.3}, height: {:.3} }}",
            self.x, self.y, self.width, self.height
        )
    }
}

pub trait BoundingBoxGeometry {
    fn left(&self) -> f32;
    fn top(&self) -> f32;
    fn right(&self) -> f32;
    fn bottom(&self) -> f32;

    fn area(&self) -> f32 {
        (self.right() - self.left()) * (self.bottom() - self.top())
    }

    fn center(&self) -> (f32, f32) {
        (
            (self.left() + self.right()) / 2.0,
            (self.top() + self.bottom()) / 2.0,
        )
    }

    fn as_xyxy(&self) -> (f32, f32, f32, f32) {
        (self.left(), self.top(), self.right(), self.bottom())
    }

    fn intersection_over_union<T: BoundingBoxGeometry>(&self, other: &T) -> f32 {
        let inter_width = (self.right().min(other.right()) - self.left().max(other.left())).max(0.0);
        let inter_height =
            (self.bottom().min(other.bottom()) - self.top().max(other.top())).max(0.0);
        let intersection = inter_width * inter_height;
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            0.0
        } else {
            intersection / union
        }
    }
}

impl BoundingBoxGeometry for BoundingBox {
    fn left(&self) -> f32 {
        self.x
    }

    fn top(&self) -> f32 {
        self.y
    }

    fn right(&self) -> f32 {
        self.x + self.width
    }

    fn bottom(&self) -> f32 {
        self.y + self.height
    }
}
