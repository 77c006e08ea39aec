//! Flat point-cloud buffers.
//!
//! A [`PointCloud`] is `3 × N` floats holding N consecutive `(x, y, z)` triples.
//! Index `i` of a target cloud drives particle `i` of the animation state, so
//! the order of points is stable for as long as the cloud lives.

use crate::Vec3;

/// A flat buffer of 3D particle positions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointCloud {
    data: Vec<f32>,
}

impl PointCloud {
    /// Create an empty cloud with room for `count` points.
    pub fn with_capacity(count: usize) -> Self {
        Self {
            data: Vec::with_capacity(count * 3),
        }
    }

    /// Wrap an existing flat buffer.
    ///
    /// Returns `None` when the length is not a multiple of three.
    pub fn from_flat(data: Vec<f32>) -> Option<Self> {
        if data.len() % 3 == 0 {
            Some(Self { data })
        } else {
            None
        }
    }

    /// Build a cloud from points.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut cloud = Self::default();
        for p in points {
            cloud.push(p);
        }
        cloud
    }

    /// Append a point.
    #[inline]
    pub fn push(&mut self, p: Vec3) {
        self.data.extend_from_slice(&[p.x, p.y, p.z]);
    }

    /// Number of points (N).
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Point at index `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len()`.
    #[inline]
    pub fn point(&self, i: usize) -> Vec3 {
        let o = i * 3;
        Vec3::new(self.data[o], self.data[o + 1], self.data[o + 2])
    }

    /// Overwrite the point at index `i`.
    #[inline]
    pub fn set_point(&mut self, i: usize, p: Vec3) {
        let o = i * 3;
        self.data[o] = p.x;
        self.data[o + 1] = p.y;
        self.data[o + 2] = p.z;
    }

    /// Iterate over all points in order.
    pub fn points(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.data
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
    }

    /// The raw `3 × N` buffer.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// The raw buffer as bytes, ready for a GPU upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// True when every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Largest distance of any point from the origin.
    pub fn max_radius(&self) -> f32 {
        self.points().map(Vec3::length).fold(0.0, f32::max)
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_read_back() {
        let mut cloud = PointCloud::with_capacity(2);
        cloud.push(Vec3::new(1.0, 2.0, 3.0));
        cloud.push(Vec3::new(-1.0, 0.5, 4.0));

        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.as_slice().len(), 6);
        assert_eq!(cloud.point(1), Vec3::new(-1.0, 0.5, 4.0));
    }

    #[test]
    fn test_from_flat_rejects_partial_triples() {
        assert!(PointCloud::from_flat(vec![0.0; 7]).is_none());
        assert_eq!(PointCloud::from_flat(vec![0.0; 9]).map(|c| c.len()), Some(3));
    }

    #[test]
    fn test_is_finite() {
        let mut cloud = PointCloud::from_points([Vec3::ONE, Vec3::ZERO]);
        assert!(cloud.is_finite());
        cloud.set_point(0, Vec3::new(f32::NAN, 0.0, 0.0));
        assert!(!cloud.is_finite());
    }

    #[test]
    fn test_as_bytes_length() {
        let cloud = PointCloud::from_points([Vec3::ONE; 4]);
        assert_eq!(cloud.as_bytes().len(), 4 * 3 * 4);
    }
}
