/// Subdivided plane mesh
///
/// Positions and UVs are index-aligned. The grid runs row by row from the top
/// edge down, left to right within a row, with `u` growing to the right and `v`
/// growing upward.

#[derive(Debug, Clone)]
pub struct PlaneGeometry {
    pub width: f32,
    pub height: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
    /// Set whenever positions change; cleared by whoever uploads them
    pub positions_dirty: bool,
}

impl PlaneGeometry {
    pub fn new(width: f32, height: f32, width_segments: u32, height_segments: u32) -> Self {
        let gx = width_segments.max(1);
        let gy = height_segments.max(1);
        let half_width = width * 0.5;
        let half_height = height * 0.5;
        let segment_width = width / gx as f32;
        let segment_height = height / gy as f32;

        let vertex_count = ((gx + 1) * (gy + 1)) as usize;
        let mut positions = Vec::with_capacity(vertex_count);
        let mut uvs = Vec::with_capacity(vertex_count);

        for iy in 0..=gy {
            let y = iy as f32 * segment_height - half_height;
            for ix in 0..=gx {
                let x = ix as f32 * segment_width - half_width;
                positions.push([x, -y, 0.0]);
                uvs.push([ix as f32 / gx as f32, 1.0 - iy as f32 / gy as f32]);
            }
        }

        let row = gx + 1;
        let mut indices = Vec::with_capacity((gx * gy * 6) as usize);
        for iy in 0..gy {
            for ix in 0..gx {
                let a = ix + row * iy;
                let b = ix + row * (iy + 1);
                let c = (ix + 1) + row * (iy + 1);
                let d = (ix + 1) + row * iy;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        Self {
            width,
            height,
            width_segments: gx,
            height_segments: gy,
            positions,
            uvs,
            indices,
            positions_dirty: true,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Take the dirty flag, returning whether an upload is needed
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.positions_dirty, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_counts() {
        let plane = PlaneGeometry::new(16.0, 9.0, 4, 2);
        assert_eq!(plane.vertex_count(), 15);
        assert_eq!(plane.uvs.len(), plane.positions.len());
        assert_eq!(plane.indices.len(), 4 * 2 * 6);
        assert!(plane.indices.iter().all(|&i| (i as usize) < plane.vertex_count()));
    }

    #[test]
    fn test_corners_and_uvs() {
        let plane = PlaneGeometry::new(16.0, 9.0, 4, 2);
        // Top-left first, bottom-right last
        assert_eq!(plane.positions[0], [-8.0, 4.5, 0.0]);
        assert_eq!(plane.uvs[0], [0.0, 1.0]);
        assert_eq!(plane.positions[14], [8.0, -4.5, 0.0]);
        assert_eq!(plane.uvs[14], [1.0, 0.0]);
    }

    #[test]
    fn test_take_dirty() {
        let mut plane = PlaneGeometry::new(1.0, 1.0, 1, 1);
        assert!(plane.take_dirty());
        assert!(!plane.take_dirty());
    }
}
