//! Row-major `f32` tensor with an explicit shape.

/// A dense tensor. The first dimension is conventionally the batch
/// (parallel-instance) dimension.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

impl Tensor {
    /// Builds a tensor from a shape and matching flat data.
    ///
    /// # Panics
    /// Panics if the product of `shape` does not equal `data.len()`.
    #[must_use]
    pub fn from_vec(shape: Vec<usize>, data: Vec<f32>) -> Self {
        assert_eq!(shape.iter().product::<usize>(), data.len());
        Self { shape, data }
    }

    /// A zero-filled tensor of the given shape.
    #[must_use]
    pub fn zeros(shape: Vec<usize>) -> Self {
        let len = shape.iter().product();
        Self {
            shape,
            data: vec![0.0; len],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of elements under one index of the first dimension.
    #[must_use]
    pub fn stride(&self) -> usize {
        self.shape.iter().skip(1).product()
    }

    /// Read-only view of row `i` of the first dimension.
    ///
    /// # Panics
    /// Panics if `i` is out of range or the tensor has no dimensions.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f32] {
        let stride = self.stride();
        assert!(i < self.shape[0]);
        &self.data[i * stride..(i + 1) * stride]
    }

    /// Mutable view of row `i` of the first dimension.
    ///
    /// # Panics
    /// Panics if `i` is out of range or the tensor has no dimensions.
    pub fn row_mut(&mut self, i: usize) -> &mut [f32] {
        let stride = self.stride();
        assert!(i < self.shape[0]);
        &mut self.data[i * stride..(i + 1) * stride]
    }

    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Raw little-endian byte view, for handing the buffer across an
    /// exchange boundary without copying.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::Tensor;

    #[test]
    fn rows_follow_leading_dimension() {
        let t = Tensor::from_vec(vec![2, 3], vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(t.stride(), 3);
        assert_eq!(t.row(0), &[0.0, 1.0, 2.0]);
        assert_eq!(t.row(1), &[3.0, 4.0, 5.0]);
    }

    #[test]
    fn zeros_match_shape_product() {
        let t = Tensor::zeros(vec![4, 2, 5]);
        assert_eq!(t.len(), 40);
        assert!(t.data.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn byte_view_covers_every_element() {
        let t = Tensor::from_vec(vec![3], vec![1.0, 2.0, 3.0]);
        assert_eq!(t.as_bytes().len(), 12);
    }

    #[test]
    #[should_panic(expected = "assertion")]
    fn mismatched_data_length_panics() {
        let _ = Tensor::from_vec(vec![2, 2], vec![0.0; 3]);
    }
}
