//! Camera frames and the landmark model's input tensor

/// Packed 8-bit RGB image, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    rgb: Vec<u8>,
}

impl Frame {
    /// Wrap raw pixels; `None` if the buffer does not match the size
    pub fn new(width: usize, height: usize, rgb: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 || rgb.len() != width * height * 3 {
            return None;
        }
        Some(Self { width, height, rgb })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * 3;
        [self.rgb[i], self.rgb[i + 1], self.rgb[i + 2]]
    }

    /// Flip left-to-right in place, like a mirror
    pub fn mirror_horizontal(&mut self) {
        let row_len = self.width * 3;
        for row in self.rgb.chunks_exact_mut(row_len) {
            let (mut left, mut right) = (0, self.width - 1);
            while left < right {
                for c in 0..3 {
                    row.swap(left * 3 + c, right * 3 + c);
                }
                left += 1;
                right -= 1;
            }
        }
    }

    /// Nearest-neighbour resize to `size`x`size`, planar RGB scaled to [0, 1]
    pub fn to_input_tensor(&self, size: usize) -> InputTensor {
        let plane = size * size;
        let mut data = vec![0.0; plane * 3];
        for ty in 0..size {
            let sy = ty * self.height / size;
            for tx in 0..size {
                let sx = tx * self.width / size;
                let px = self.pixel(sx, sy);
                let at = ty * size + tx;
                for (c, value) in px.iter().enumerate() {
                    data[c * plane + at] = *value as f32 / 255.0;
                }
            }
        }
        InputTensor { size, data }
    }
}

/// 1x3xNxN float tensor
#[derive(Debug, Clone, PartialEq)]
pub struct InputTensor {
    size: usize,
    data: Vec<f32>,
}

impl InputTensor {
    pub fn shape(&self) -> [usize; 4] {
        [1, 3, self.size, self.size]
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// One colour plane (0 = R, 1 = G, 2 = B)
    pub fn channel(&self, c: usize) -> &[f32] {
        let plane = self.size * self.size;
        &self.data[c * plane..(c + 1) * plane]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: usize, height: usize) -> Frame {
        let mut rgb = Vec::with_capacity(width * height * 3);
        for y in 0..height {
            for x in 0..width {
                rgb.extend_from_slice(&[x as u8, y as u8, 255]);
            }
        }
        Frame::new(width, height, rgb).unwrap()
    }

    #[test]
    fn test_frame_rejects_bad_buffer() {
        assert!(Frame::new(2, 2, vec![0; 11]).is_none());
        assert!(Frame::new(0, 2, Vec::new()).is_none());
    }

    #[test]
    fn test_mirror_swaps_columns() {
        let mut frame = gradient(3, 2);
        frame.mirror_horizontal();
        assert_eq!(frame.pixel(0, 0), [2, 0, 255]);
        assert_eq!(frame.pixel(1, 1), [1, 1, 255]);
        assert_eq!(frame.pixel(2, 1), [0, 1, 255]);
    }

    #[test]
    fn test_tensor_layout_and_scale() {
        let frame = gradient(8, 4);
        let tensor = frame.to_input_tensor(4);
        assert_eq!(tensor.shape(), [1, 3, 4, 4]);
        assert_eq!(tensor.data().len(), 48);

        // Column 3 of the 4-wide tensor samples source column 6
        assert!((tensor.channel(0)[3] - 6.0 / 255.0).abs() < 1e-6);
        // Row 2 samples source row 2
        assert!((tensor.channel(1)[2 * 4] - 2.0 / 255.0).abs() < 1e-6);
        assert!(tensor.channel(2).iter().all(|v| (*v - 1.0).abs() < 1e-6));
    }
}
