//! Paths and their derived segments
//!
//! A path is open exactly when its first point is a `Move`. Segments are
//! never stored: they are read off the point list on demand.

use super::point::{EditPoint, PointType};
use crate::geometry::bezier;
use kurbo::{Affine, BezPath, CubicBez, Line, ParamCurveNearest, PathSeg, Point, Rect, Shape};
use serde::{Deserialize, Serialize};

/// Kind of a derived segment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Line,
    Curve,
}

/// A line (2 points) or cubic (4 points) window into a path's point list.
///
/// Closed paths wrap around, so `end` can be smaller than `start`. Runs of
/// off-curve points other than exactly two are read as lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
    pub kind: SegmentKind,
    path_len: usize,
}

impl Segment {
    /// Point indices of the window, start to end
    pub fn indices(&self) -> Vec<usize> {
        match self.kind {
            SegmentKind::Line => vec![self.start, self.end],
            SegmentKind::Curve => vec![
                self.start,
                (self.start + 1) % self.path_len,
                (self.start + 2) % self.path_len,
                self.end,
            ],
        }
    }

    /// Indices of the two handles of a curve segment
    pub fn handles(&self) -> Option<(usize, usize)> {
        match self.kind {
            SegmentKind::Line => None,
            SegmentKind::Curve => Some((
                (self.start + 1) % self.path_len,
                (self.start + 2) % self.path_len,
            )),
        }
    }

    /// True if `index` is one of the points in the window
    pub fn contains(&self, index: usize) -> bool {
        self.indices().contains(&index)
    }

    pub fn is_curve(&self) -> bool {
        self.kind == SegmentKind::Curve
    }

    /// Geometry of the segment within `path`
    pub fn to_path_seg(&self, path: &Path) -> PathSeg {
        let pts = &path.points;
        match self.handles() {
            None => PathSeg::Line(Line::new(pts[self.start].position(), pts[self.end].position())),
            Some((h1, h2)) => PathSeg::Cubic(CubicBez::new(
                pts[self.start].position(),
                pts[h1].position(),
                pts[h2].position(),
                pts[self.end].position(),
            )),
        }
    }

    /// The segment as a cubic; lines get handles at 1/3 and 2/3
    pub fn to_cubic(&self, path: &Path) -> CubicBez {
        match self.to_path_seg(path) {
            PathSeg::Cubic(c) => c,
            PathSeg::Line(l) => {
                let (c1, c2) = bezier::line_handles(l.p0, l.p1);
                CubicBez::new(l.p0, c1, c2, l.p1)
            }
            PathSeg::Quad(q) => q.raise(),
        }
    }

    /// Closest point on the segment: `(t, distance)`
    pub fn nearest(&self, path: &Path, point: Point) -> (f64, f64) {
        match self.to_path_seg(path) {
            PathSeg::Line(line) => {
                let hit = line.nearest(point, bezier::NEAREST_ACCURACY);
                (hit.t, hit.distance_sq.sqrt())
            }
            _ => bezier::nearest(&self.to_cubic(path), point),
        }
    }
}

/// An ordered list of points, open or closed
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub(crate) points: Vec<EditPoint>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: Vec<EditPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[EditPoint] {
        &self.points
    }

    /// Point at `index`; panics when out of range, like slice indexing
    pub fn point(&self, index: usize) -> &EditPoint {
        &self.points[index]
    }

    pub fn get(&self, index: usize) -> Option<&EditPoint> {
        self.points.get(index)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Open iff the first point is a `Move`
    pub fn is_open(&self) -> bool {
        self.points
            .first()
            .is_some_and(|p| p.point_type == PointType::Move)
    }

    pub fn is_closed(&self) -> bool {
        !self.points.is_empty() && !self.is_open()
    }

    /// Derived selection: every point selected
    pub fn is_selected(&self) -> bool {
        !self.points.is_empty() && self.points.iter().all(|p| p.selected)
    }

    pub fn has_selection(&self) -> bool {
        self.points.iter().any(|p| p.selected)
    }

    pub fn on_curve_indices(&self) -> Vec<usize> {
        self.points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_on_curve())
            .map(|(i, _)| i)
            .collect()
    }

    /// Index after `index`, wrapping on closed paths
    pub fn next_index(&self, index: usize) -> Option<usize> {
        if index + 1 < self.points.len() {
            Some(index + 1)
        } else if self.is_closed() && self.points.len() > 1 {
            Some(0)
        } else {
            None
        }
    }

    /// Index before `index`, wrapping on closed paths
    pub fn prev_index(&self, index: usize) -> Option<usize> {
        if index > 0 {
            Some(index - 1)
        } else if self.is_closed() && self.points.len() > 1 {
            Some(self.points.len() - 1)
        } else {
            None
        }
    }

    /// Derived segment views in outline order
    pub fn segments(&self) -> Vec<Segment> {
        let n = self.points.len();
        let on_curve = self.on_curve_indices();
        if n < 2 || on_curve.is_empty() {
            return Vec::new();
        }
        let make = |start: usize, end: usize| {
            let gap = (end + n - start) % n;
            let gap = if gap == 0 { n } else { gap };
            let kind = if gap == 3 {
                SegmentKind::Curve
            } else {
                SegmentKind::Line
            };
            Segment {
                start,
                end,
                kind,
                path_len: n,
            }
        };

        if self.is_open() {
            on_curve.windows(2).map(|w| make(w[0], w[1])).collect()
        } else {
            let m = on_curve.len();
            if m == 1 && n == 1 {
                return Vec::new();
            }
            (0..m)
                .map(|k| make(on_curve[k], on_curve[(k + 1) % m]))
                .collect()
        }
    }

    /// Segment whose window starts at `start`
    pub fn segment_starting_at(&self, start: usize) -> Option<Segment> {
        self.segments().into_iter().find(|s| s.start == start)
    }

    /// Segment arriving at on-curve point `end`
    pub fn segment_ending_at(&self, end: usize) -> Option<Segment> {
        self.segments().into_iter().find(|s| s.end == end)
    }

    /// Outline as a kurbo path
    pub fn to_bezpath(&self) -> BezPath {
        let mut bez = BezPath::new();
        let segments = self.segments();
        let Some(first) = segments.first() else {
            if let Some(p) = self.points.iter().find(|p| p.is_on_curve()) {
                bez.move_to(p.position());
            }
            return bez;
        };
        bez.move_to(self.points[first.start].position());
        for seg in &segments {
            match seg.to_path_seg(self) {
                PathSeg::Line(l) => bez.line_to(l.p1),
                PathSeg::Cubic(c) => bez.curve_to(c.p1, c.p2, c.p3),
                PathSeg::Quad(q) => bez.quad_to(q.p1, q.p2),
            }
        }
        if self.is_closed() {
            bez.close_path();
        }
        bez
    }

    /// Tight bounds of the outline, or `None` for an empty path
    pub fn bounds(&self) -> Option<Rect> {
        if self.points.is_empty() {
            return None;
        }
        let segments = self.segments();
        if segments.is_empty() {
            let p = self.points[0].position();
            return Some(Rect::from_points(p, p));
        }
        Some(self.to_bezpath().bounding_box())
    }

    /// Signed area; positive for counter-clockwise in y-up coordinates
    pub fn signed_area(&self) -> f64 {
        if !self.is_closed() {
            return 0.0;
        }
        self.to_bezpath().area()
    }

    pub fn is_clockwise(&self) -> bool {
        self.signed_area() < 0.0
    }

    /// A copy with every point transformed
    pub fn transformed(&self, transform: Affine) -> Path {
        let points = self
            .points
            .iter()
            .map(|p| p.clone().with_position(transform * p.position()))
            .collect();
        Path { points }
    }
}

#[cfg(test)]
pub(crate) mod test_paths {
    use super::*;

    /// Closed square of four line points, counter-clockwise
    pub fn square(size: f64) -> Path {
        Path::from_points(vec![
            EditPoint::line_to(0.0, 0.0),
            EditPoint::line_to(size, 0.0),
            EditPoint::line_to(size, size),
            EditPoint::line_to(0.0, size),
        ])
    }

    /// Closed square offset by `(x, y)`
    pub fn square_at(x: f64, y: f64, size: f64) -> Path {
        square(size).transformed(Affine::translate((x, y)))
    }

    /// Closed circle-like path of four smooth curve points
    pub fn blob(radius: f64) -> Path {
        let k = radius * 0.5523;
        let r = radius;
        Path::from_points(vec![
            EditPoint::curve_to(r, 0.0).with_smooth(true),
            EditPoint::off_curve(r, k),
            EditPoint::off_curve(k, r),
            EditPoint::curve_to(0.0, r).with_smooth(true),
            EditPoint::off_curve(-k, r),
            EditPoint::off_curve(-r, k),
            EditPoint::curve_to(-r, 0.0).with_smooth(true),
            EditPoint::off_curve(-r, -k),
            EditPoint::off_curve(-k, -r),
            EditPoint::curve_to(0.0, -r).with_smooth(true),
            EditPoint::off_curve(k, -r),
            EditPoint::off_curve(r, -k),
        ])
    }

    /// Open two-point line
    pub fn open_line(x0: f64, y0: f64, x1: f64, y1: f64) -> Path {
        Path::from_points(vec![EditPoint::move_to(x0, y0), EditPoint::line_to(x1, y1)])
    }
}

#[cfg(test)]
mod tests {
    use super::test_paths::*;
    use super::*;

    #[test]
    fn test_segment_nearest_on_lines_and_curves() {
        let square = square(100.0);
        let (t, distance) = square.segments()[0].nearest(&square, Point::new(50.0, 2.0));
        assert!((t - 0.5).abs() < 1e-9);
        assert!((distance - 2.0).abs() < 1e-9);

        use kurbo::ParamCurve;
        let blob = blob(100.0);
        let segment = blob.segments()[0];
        let on_curve = segment.to_cubic(&blob).eval(0.3);
        let (t, distance) = segment.nearest(&blob, on_curve + kurbo::Vec2::new(1.0, 1.0));
        assert!((t - 0.3).abs() < 0.05);
        assert!(distance < 1.5);
    }

    #[test]
    fn test_closedness_from_first_point() {
        assert!(square(10.0).is_closed());
        assert!(open_line(0.0, 0.0, 1.0, 1.0).is_open());
        assert!(!Path::new().is_open());
        assert!(!Path::new().is_closed());
    }

    #[test]
    fn test_square_segments_wrap() {
        let path = square(10.0);
        let segments = path.segments();
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[3].start, 3);
        assert_eq!(segments[3].end, 0);
        assert!(segments.iter().all(|s| s.kind == SegmentKind::Line));
    }

    #[test]
    fn test_curve_segments_wrap_handles() {
        let path = blob(100.0);
        let segments = path.segments();
        assert_eq!(segments.len(), 4);
        let last = segments[3];
        assert_eq!(last.kind, SegmentKind::Curve);
        assert_eq!(last.indices(), vec![9, 10, 11, 0]);
        assert_eq!(last.handles(), Some((10, 11)));
    }

    #[test]
    fn test_open_path_segments() {
        let path = Path::from_points(vec![
            EditPoint::move_to(0.0, 0.0),
            EditPoint::off_curve(0.0, 50.0),
            EditPoint::off_curve(50.0, 100.0),
            EditPoint::curve_to(100.0, 100.0),
            EditPoint::line_to(200.0, 100.0),
        ]);
        let segments = path.segments();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].kind, SegmentKind::Curve);
        assert_eq!(segments[1].kind, SegmentKind::Line);
        assert_eq!(path.segment_ending_at(4).map(|s| s.start), Some(3));
    }

    #[test]
    fn test_bounds_and_orientation() {
        let path = square(10.0);
        assert_eq!(path.bounds(), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert!(!path.is_clockwise());
        assert!((path.signed_area() - 100.0).abs() < 1e-9);

        let mut reversed = path.clone();
        reversed.points.reverse();
        assert!(reversed.is_clockwise());
    }

    #[test]
    fn test_blob_bounds_hug_curve() {
        let bounds = blob(100.0).bounds().unwrap();
        assert!((bounds.x1 - 100.0).abs() < 1e-9);
        assert!((bounds.y0 + 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_next_prev_wrap_only_when_closed() {
        let closed = square(10.0);
        assert_eq!(closed.next_index(3), Some(0));
        assert_eq!(closed.prev_index(0), Some(3));
        let open = open_line(0.0, 0.0, 5.0, 5.0);
        assert_eq!(open.next_index(1), None);
        assert_eq!(open.prev_index(0), None);
    }

    #[test]
    fn test_bezpath_round_trip_shape() {
        let bez = blob(50.0).to_bezpath();
        // move + 4 curves + close
        assert_eq!(bez.elements().len(), 6);
    }
}
