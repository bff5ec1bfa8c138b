use crate::physics::error::MotionFieldError;
use bevy::math::Vec2;

/// One cell of the sensor motion field.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlowSample {
    pub flow: Vec2,
    pub depth: f32,
}

impl FlowSample {
    pub const ZERO: Self = Self {
        flow: Vec2::ZERO,
        depth: 0.0,
    };

    /// Non-finite cells read as zero.
    pub fn sanitized(self) -> Self {
        if self.flow.is_finite() && self.depth.is_finite() {
            self
        } else {
            Self::ZERO
        }
    }
}

/// Dense `(flowX, flowY, depth)` grid. Row 0 is `v = 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorMotionField {
    width: u32,
    height: u32,
    cells: Vec<FlowSample>,
}

impl SensorMotionField {
    pub fn zeros(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![FlowSample::ZERO; (width * height) as usize],
        }
    }

    pub fn from_cells(
        width: u32,
        height: u32,
        cells: Vec<FlowSample>,
    ) -> Result<Self, MotionFieldError> {
        let expected = (width * height) as usize;
        if cells.len() != expected {
            return Err(MotionFieldError::CellCountMismatch {
                width,
                height,
                expected,
                found: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// A field with the same sample everywhere.
    pub fn uniform(width: u32, height: u32, sample: FlowSample) -> Self {
        Self {
            width,
            height,
            cells: vec![sample; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cells(&self) -> &[FlowSample] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [FlowSample] {
        &mut self.cells
    }

    pub fn get(&self, x: u32, y: u32) -> FlowSample {
        if x >= self.width || y >= self.height {
            return FlowSample::ZERO;
        }
        self.cells[(y * self.width + x) as usize].sanitized()
    }

    /// Bilinear sample over texel centres, clamped to the edge cells.
    pub fn sample(&self, uv: Vec2) -> FlowSample {
        if self.width == 0 || self.height == 0 || !uv.is_finite() {
            return FlowSample::ZERO;
        }

        let size = Vec2::new(self.width as f32, self.height as f32);
        let texel = (uv * size - 0.5).clamp(Vec2::ZERO, size - 1.0);
        let base = texel.floor();
        let frac = texel - base;

        let x0 = base.x as u32;
        let y0 = base.y as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);

        let lerp = |a: FlowSample, b: FlowSample, t: f32| FlowSample {
            flow: a.flow.lerp(b.flow, t),
            depth: a.depth + (b.depth - a.depth) * t,
        };
        let bottom = lerp(self.get(x0, y0), self.get(x1, y0), frac.x);
        let top = lerp(self.get(x0, y1), self.get(x1, y1), frac.x);
        lerp(bottom, top, frac.y)
    }

    /// Scale every flow vector, leaving depth untouched.
    pub fn decay(&mut self, factor: f32) {
        for cell in &mut self.cells {
            cell.flow *= factor;
        }
    }

    /// Largest flow magnitude in the field.
    pub fn peak_flow(&self) -> f32 {
        self.cells
            .iter()
            .map(|c| c.sanitized().flow.length())
            .fold(0.0, f32::max)
    }

    /// RGBA32F texture bytes `(flowX, flowY, depth, 1)`, row 0 first.
    pub fn to_texture_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.cells.len() * 16);
        for cell in &self.cells {
            let cell = cell.sanitized();
            for value in [cell.flow.x, cell.flow.y, cell.depth, 1.0] {
                bytes.extend_from_slice(&value.to_le_bytes());
            }
        }
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(x: f32, y: f32, depth: f32) -> FlowSample {
        FlowSample {
            flow: Vec2::new(x, y),
            depth,
        }
    }

    #[test]
    fn texel_centres_return_cell_values() {
        let field =
            SensorMotionField::from_cells(2, 1, vec![sample(1.0, 0.0, 0.0), sample(3.0, 0.0, 2.0)])
                .unwrap();

        assert_eq!(field.sample(Vec2::new(0.25, 0.5)), sample(1.0, 0.0, 0.0));
        assert_eq!(field.sample(Vec2::new(0.75, 0.5)), sample(3.0, 0.0, 2.0));
        assert_eq!(field.sample(Vec2::new(0.5, 0.5)), sample(2.0, 0.0, 1.0));
    }

    #[test]
    fn sampling_clamps_to_edges() {
        let field =
            SensorMotionField::from_cells(2, 1, vec![sample(1.0, 0.0, 0.0), sample(3.0, 0.0, 2.0)])
                .unwrap();

        assert_eq!(field.sample(Vec2::new(-0.5, 0.5)), sample(1.0, 0.0, 0.0));
        assert_eq!(field.sample(Vec2::new(1.5, 0.5)), sample(3.0, 0.0, 2.0));
    }

    #[test]
    fn non_finite_cells_read_as_zero() {
        let field = SensorMotionField::uniform(1, 1, sample(f32::NAN, 1.0, 0.0));
        assert_eq!(field.sample(Vec2::splat(0.5)), FlowSample::ZERO);
        assert_eq!(field.peak_flow(), 0.0);
    }

    #[test]
    fn wrong_cell_count_is_rejected() {
        assert!(matches!(
            SensorMotionField::from_cells(4, 4, vec![FlowSample::ZERO; 3]),
            Err(MotionFieldError::CellCountMismatch {
                expected: 16,
                found: 3,
                ..
            })
        ));
    }

    #[test]
    fn texture_bytes_carry_flow_depth_and_one() {
        let field = SensorMotionField::uniform(1, 1, sample(0.5, -0.25, 2.0));
        let bytes = field.to_texture_bytes();
        let values: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(values, vec![0.5, -0.25, 2.0, 1.0]);
    }
}
