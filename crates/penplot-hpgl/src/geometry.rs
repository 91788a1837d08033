//! Drawing-space geometry handed to the encoder.

use serde::{Deserialize, Serialize};

/// A point in drawing space (caller units, e.g. pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The point on a circle of `radius` around `self` at `angle` radians.
    pub fn on_circle(&self, radius: f64, angle: f64) -> Point {
        Point::new(self.x + angle.cos() * radius, self.y + angle.sin() * radius)
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

/// An ordered-vertex outline that can be sent through the polygon buffer.
pub trait Shape {
    /// Number of vertices in the outline.
    fn vertex_count(&self) -> usize;

    /// Vertex at `index`, `0 <= index < vertex_count()`.
    fn vertex(&self, index: usize) -> Point;

    /// Iterate over the vertices in order.
    fn vertices(&self) -> ShapeVertices<'_, Self> {
        ShapeVertices {
            shape: self,
            next: 0,
        }
    }
}

/// Iterator returned by [`Shape::vertices`].
pub struct ShapeVertices<'a, S: ?Sized> {
    shape: &'a S,
    next: usize,
}

impl<S: Shape + ?Sized> Iterator for ShapeVertices<'_, S> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.next >= self.shape.vertex_count() {
            return None;
        }
        let v = self.shape.vertex(self.next);
        self.next += 1;
        Some(v)
    }
}

impl Shape for [Point] {
    fn vertex_count(&self) -> usize {
        self.len()
    }

    fn vertex(&self, index: usize) -> Point {
        self[index]
    }
}

impl Shape for Vec<Point> {
    fn vertex_count(&self) -> usize {
        self.len()
    }

    fn vertex(&self, index: usize) -> Point {
        self[index]
    }
}

/// A closed polygon outline. The closing edge back to the first vertex is
/// implicit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    /// Outline vertices, in drawing order.
    pub vertices: Vec<Point>,
}

impl Polygon {
    /// Create a polygon from anything convertible to points.
    pub fn new<P: Into<Point>>(vertices: impl IntoIterator<Item = P>) -> Self {
        Self {
            vertices: vertices.into_iter().map(Into::into).collect(),
        }
    }

    /// Axis-aligned rectangle with its corner at `origin`.
    pub fn rect(origin: Point, width: f64, height: f64) -> Self {
        Self::new([
            origin,
            Point::new(origin.x + width, origin.y),
            Point::new(origin.x + width, origin.y + height),
            Point::new(origin.x, origin.y + height),
        ])
    }
}

impl Shape for Polygon {
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn vertex(&self, index: usize) -> Point {
        self.vertices[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_on_circle() {
        let p = Point::new(0.0, 0.0).on_circle(5.0, 0.0);
        assert_relative_eq!(p.x, 5.0);
        assert_relative_eq!(p.y, 0.0);

        let q = Point::new(1.0, 1.0).on_circle(2.0, FRAC_PI_2);
        assert_relative_eq!(q.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(q.y, 3.0);
    }

    #[test]
    fn test_rect_vertices() {
        let r = Polygon::rect(Point::new(1.0, 2.0), 3.0, 4.0);
        let v: Vec<_> = r.vertices().collect();
        assert_eq!(
            v,
            vec![
                Point::new(1.0, 2.0),
                Point::new(4.0, 2.0),
                Point::new(4.0, 6.0),
                Point::new(1.0, 6.0),
            ]
        );
    }

    #[test]
    fn test_slice_shape() {
        let pts = [Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        let shape: &[Point] = &pts;
        assert_eq!(shape.vertex_count(), 2);
        assert_eq!(shape.vertex(1), Point::new(1.0, 1.0));
    }
}
