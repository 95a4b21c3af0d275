use crate::error::{Result, WeedDetectionError};
use std::fmt;

/// One layer of a sequential network description.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Layer {
    /// 3x3-style convolution with "valid" padding and ReLU.
    Conv2d { filters: usize, kernel_size: usize },
    MaxPool2d { pool_size: usize },
    Flatten,
    Dense { units: usize },
    Dropout { rate: f32 },
    /// Dense output layer with a softmax over `units` classes.
    Softmax { units: usize },
}

/// The tensor shape flowing between layers, batch dimension omitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TensorShape {
    /// (height, width, channels)
    Spatial(usize, usize, usize),
    Flat(usize),
}

impl fmt::Display for TensorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TensorShape::Spatial(h, w, c) => write!(f, "[{}, {}, {}]", h, w, c),
            TensorShape::Flat(n) => write!(f, "[{}]", n),
        }
    }
}

/// A sequential network definition with no weights attached.
///
/// Building one checks that the layer stack is consistent for the input size and records the
/// shape after every layer. This is what "constructing the graph" amounts to until trained
/// weights are supplied as an ONNX file.
#[derive(Clone, Debug)]
pub struct NetworkDefinition {
    name: &'static str,
    input_shape: TensorShape,
    layers: Vec<Layer>,
    output_shapes: Vec<TensorShape>,
    parameter_count: usize,
}

impl NetworkDefinition {
    pub fn build(name: &'static str, input_size: usize, layers: Vec<Layer>) -> Result<Self> {
        let input_shape = TensorShape::Spatial(input_size, input_size, 3);
        let mut shape = input_shape;
        let mut output_shapes = Vec::with_capacity(layers.len());
        let mut parameter_count = 0;
        for (index, layer) in layers.iter().enumerate() {
            let (next, params) = apply_layer(*layer, shape).ok_or_else(|| {
                WeedDetectionError::initialization(format!(
                    "{}: layer {} ({:?}) cannot accept input of shape {}",
                    name, index, layer, shape
                ))
            })?;
            shape = next;
            parameter_count += params;
            output_shapes.push(shape);
        }
        log::debug!(
            "Built {} network: {} layers, output {}, {} parameters",
            name,
            layers.len(),
            shape,
            parameter_count
        );
        Ok(NetworkDefinition {
            name,
            input_shape,
            layers,
            output_shapes,
            parameter_count,
        })
    }

    /// The classification stack: three blocks of paired convolutions (16, 32, 64 filters)
    /// each followed by 2x2 max pooling, then dense 128, dropout 0.3 and a softmax head.
    pub fn classifier(input_size: usize, num_classes: usize) -> Result<Self> {
        let mut layers = Vec::new();
        for filters in [16, 32, 64] {
            layers.push(Layer::Conv2d { filters, kernel_size: 3 });
            layers.push(Layer::Conv2d { filters, kernel_size: 3 });
            layers.push(Layer::MaxPool2d { pool_size: 2 });
        }
        layers.extend([
            Layer::Flatten,
            Layer::Dense { units: 128 },
            Layer::Dropout { rate: 0.3 },
            Layer::Softmax { units: num_classes },
        ]);
        Self::build("classification", input_size, layers)
    }

    /// The region stack: a shallower convolutional trunk whose head scores a fixed grid of
    /// candidate boxes (4 coordinates plus one score per class for each cell).
    pub fn region_proposer(input_size: usize, num_classes: usize) -> Result<Self> {
        let mut layers = Vec::new();
        for filters in [16, 32, 64, 64] {
            layers.push(Layer::Conv2d { filters, kernel_size: 3 });
            layers.push(Layer::MaxPool2d { pool_size: 2 });
        }
        layers.push(Layer::Conv2d {
            filters: 4 + num_classes,
            kernel_size: 1,
        });
        Self::build("region", input_size, layers)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn input_shape(&self) -> TensorShape {
        self.input_shape
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn output_shape(&self) -> TensorShape {
        self.output_shapes
            .last()
            .copied()
            .unwrap_or(self.input_shape)
    }

    pub fn parameter_count(&self) -> usize {
        self.parameter_count
    }
}

/// Shape after the layer and the number of trainable parameters it holds.
fn apply_layer(layer: Layer, shape: TensorShape) -> Option<(TensorShape, usize)> {
    match (layer, shape) {
        (Layer::Conv2d { filters, kernel_size }, TensorShape::Spatial(h, w, c)) => {
            if kernel_size == 0 || h < kernel_size || w < kernel_size {
                return None;
            }
            let params = (kernel_size * kernel_size * c + 1) * filters;
            Some((
                TensorShape::Spatial(h - kernel_size + 1, w - kernel_size + 1, filters),
                params,
            ))
        }
        (Layer::MaxPool2d { pool_size }, TensorShape::Spatial(h, w, c)) => {
            if pool_size == 0 || h < pool_size || w < pool_size {
                return None;
            }
            Some((TensorShape::Spatial(h / pool_size, w / pool_size, c), 0))
        }
        (Layer::Flatten, TensorShape::Spatial(h, w, c)) => Some((TensorShape::Flat(h * w * c), 0)),
        (Layer::Dense { units } | Layer::Softmax { units }, TensorShape::Flat(n)) => {
            Some((TensorShape::Flat(units), (n + 1) * units))
        }
        (Layer::Dropout { rate }, shape) if (0.0..1.0).contains(&rate) => Some((shape, 0)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifier_shapes_for_400_input() {
        let net = NetworkDefinition::classifier(400, 8).unwrap();
        // 400 -> 398 -> 396 -> 198 -> 196 -> 194 -> 97 -> 95 -> 93 -> 46
        assert_eq!(net.output_shapes[8], TensorShape::Spatial(46, 46, 64));
        assert_eq!(net.output_shapes[9], TensorShape::Flat(46 * 46 * 64));
        assert_eq!(net.output_shape(), TensorShape::Flat(8));
        assert_eq!(net.layers().len(), 13);
    }

    #[test]
    fn classifier_parameter_count() {
        let net = NetworkDefinition::classifier(400, 8).unwrap();
        let convs = (27 + 1) * 16
            + (144 + 1) * 16
            + (144 + 1) * 32
            + (288 + 1) * 32
            + (288 + 1) * 64
            + (576 + 1) * 64;
        let dense = (46 * 46 * 64 + 1) * 128 + (128 + 1) * 8;
        assert_eq!(net.parameter_count(), convs + dense);
    }

    #[test]
    fn region_head_emits_box_and_class_channels() {
        let net = NetworkDefinition::region_proposer(400, 8).unwrap();
        // 400 -> 398 -> 199 -> 197 -> 98 -> 96 -> 48 -> 46 -> 23 -> 23
        assert_eq!(net.output_shape(), TensorShape::Spatial(23, 23, 12));
    }

    #[test]
    fn too_small_input_fails_to_build() {
        let err = NetworkDefinition::classifier(16, 8).unwrap_err();
        assert!(matches!(err, WeedDetectionError::Initialization(_)));
    }

    #[test]
    fn dense_before_flatten_is_rejected() {
        let result = NetworkDefinition::build("bad", 32, vec![Layer::Dense { units: 4 }]);
        assert!(result.is_err());
    }
}
