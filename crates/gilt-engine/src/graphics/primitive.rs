/// Topology used to interpret a vertex sequence.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum PrimitiveType {
    /// Each vertex is a point.
    #[default]
    Points,
    /// Each pair of vertices is a line segment.
    Lines,
    /// Consecutive vertices form a connected polyline.
    LineStrip,
    /// Each triple of vertices is a triangle.
    Triangles,
    /// Each vertex after the second forms a triangle with the previous two.
    TriangleStrip,
    /// Each vertex after the second forms a triangle with the previous one and the first.
    TriangleFan,
}

impl PrimitiveType {
    /// Number of complete primitives `vertex_count` vertices produce.
    pub fn primitive_count(self, vertex_count: usize) -> usize {
        match self {
            PrimitiveType::Points => vertex_count,
            PrimitiveType::Lines => vertex_count / 2,
            PrimitiveType::LineStrip => vertex_count.saturating_sub(1),
            PrimitiveType::Triangles => vertex_count / 3,
            PrimitiveType::TriangleStrip | PrimitiveType::TriangleFan => vertex_count.saturating_sub(2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_counts() {
        assert_eq!(PrimitiveType::Points.primitive_count(5), 5);
        assert_eq!(PrimitiveType::Lines.primitive_count(5), 2);
        assert_eq!(PrimitiveType::LineStrip.primitive_count(5), 4);
        assert_eq!(PrimitiveType::Triangles.primitive_count(7), 2);
        assert_eq!(PrimitiveType::TriangleStrip.primitive_count(5), 3);
        assert_eq!(PrimitiveType::TriangleFan.primitive_count(1), 0);
    }
}
