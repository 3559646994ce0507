//! Primitive geometry and intersection algorithms
//!
//! Pure functions over explicit world coordinates. The shape variants build
//! every pairwise test out of these: segment intersection, Cohen-Sutherland
//! sector classification, the circle distance tests and the grid-line
//! traversal.

use bitflags::bitflags;

use crate::foundation::math::{Rect, Vec2};

/// A line segment between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// First endpoint
    pub start: Vec2,
    /// Second endpoint
    pub end: Vec2,
}

impl Segment {
    /// Creates a segment from two endpoints
    pub const fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Direction vector from start to end (not normalized)
    pub fn delta(&self) -> Vec2 {
        self.end - self.start
    }

    /// Same segment moved by `offset`
    pub fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.start + offset, self.end + offset)
    }

    /// Point on the segment closest to `point`
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        let delta = self.delta();
        let length_squared = delta.norm_squared();
        if length_squared == 0.0 {
            return self.start;
        }
        let t = ((point - self.start).dot(&delta) / length_squared).clamp(0.0, 1.0);
        self.start + delta * t
    }

    /// Axis-aligned bounds of the segment (zero-size extents allowed)
    pub fn bounds(&self) -> Rect {
        Rect::from_bounds(
            self.start.x.min(self.end.x),
            self.start.y.min(self.end.y),
            self.start.x.max(self.end.x),
            self.start.y.max(self.end.y),
        )
    }
}

bitflags! {
    /// Position of a point relative to a rectangle, Cohen-Sutherland style
    ///
    /// `LEFT`/`RIGHT` and `TOP`/`BOTTOM` are mutually exclusive; the empty
    /// set means the point is inside.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Sector: u8 {
        /// `x < left`
        const LEFT = 0b0001;
        /// `x >= right`
        const RIGHT = 0b0010;
        /// `y < top`
        const TOP = 0b0100;
        /// `y >= bottom`
        const BOTTOM = 0b1000;
    }
}

impl Sector {
    /// Inside the rectangle
    pub const CENTER: Self = Self::empty();

    /// Classify `point` against the half-open bounds of `rect`
    pub fn classify(rect: &Rect, point: Vec2) -> Self {
        let mut sector = Self::CENTER;
        if point.x < rect.left() {
            sector |= Self::LEFT;
        } else if point.x >= rect.right() {
            sector |= Self::RIGHT;
        }
        if point.y < rect.top() {
            sector |= Self::TOP;
        } else if point.y >= rect.bottom() {
            sector |= Self::BOTTOM;
        }
        sector
    }

    /// Rectangle edges bordering this sector, as segments
    pub fn edges(self, rect: &Rect) -> impl Iterator<Item = Segment> {
        let (left, top, right, bottom) = (rect.left(), rect.top(), rect.right(), rect.bottom());
        [
            (Self::LEFT, Segment::new(Vec2::new(left, top), Vec2::new(left, bottom))),
            (Self::RIGHT, Segment::new(Vec2::new(right, top), Vec2::new(right, bottom))),
            (Self::TOP, Segment::new(Vec2::new(left, top), Vec2::new(right, top))),
            (Self::BOTTOM, Segment::new(Vec2::new(left, bottom), Vec2::new(right, bottom))),
        ]
        .into_iter()
        .filter_map(move |(flag, edge)| self.contains(flag).then_some(edge))
    }
}

/// Intersection point of two segments
///
/// Parallel segments (zero cross product, collinear included) never
/// intersect; otherwise both parametric coordinates must lie in `[0, 1]`.
pub fn segment_intersection(a: &Segment, b: &Segment) -> Option<Vec2> {
    let r = a.delta();
    let s = b.delta();
    let denominator = r.perp(&s);
    if denominator == 0.0 {
        return None;
    }

    let offset = b.start - a.start;
    let t = offset.perp(&s) / denominator;
    let u = offset.perp(&r) / denominator;
    if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
        return None;
    }
    Some(a.start + r * t)
}

/// Whether two segments cross
pub fn segments_intersect(a: &Segment, b: &Segment) -> bool {
    segment_intersection(a, b).is_some()
}

/// Strict circle/point test: touching is not colliding
pub fn circle_contains_point(center: Vec2, radius: f32, point: Vec2) -> bool {
    (point - center).norm_squared() < radius * radius
}

/// Circle against a segment via the clamped closest point
pub fn circle_intersects_segment(center: Vec2, radius: f32, segment: &Segment) -> bool {
    circle_contains_point(center, radius, segment.closest_point(center))
}

/// Circle against circle, strict on the sum of radii
pub fn circle_intersects_circle(a_center: Vec2, a_radius: f32, b_center: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    (a_center - b_center).norm_squared() < reach * reach
}

/// Half-open point containment
pub fn rect_contains_point(rect: &Rect, point: Vec2) -> bool {
    rect.contains(point)
}

/// Half-open overlap of two rectangles
pub fn rect_intersects_rect(a: &Rect, b: &Rect) -> bool {
    a.intersects(b)
}

/// Rectangle against circle
///
/// A center inside the rectangle collides outright; otherwise only the
/// edges facing the center's sector can be the closest feature.
pub fn rect_intersects_circle(rect: &Rect, center: Vec2, radius: f32) -> bool {
    let sector = Sector::classify(rect, center);
    if sector == Sector::CENTER {
        return true;
    }
    sector
        .edges(rect)
        .any(|edge| circle_intersects_segment(center, radius, &edge))
}

/// Rectangle against segment using Cohen-Sutherland sector rejection
pub fn rect_intersects_segment(rect: &Rect, segment: &Segment) -> bool {
    let start = Sector::classify(rect, segment.start);
    let end = Sector::classify(rect, segment.end);

    if start == Sector::CENTER || end == Sector::CENTER {
        return true;
    }
    // Both endpoints beyond the same edge
    if start.intersects(end) {
        return false;
    }
    (start | end)
        .edges(rect)
        .any(|edge| segments_intersect(segment, &edge))
}

/// Part of a segment inside the closed bounds of `rect` (Liang-Barsky)
///
/// Works in `f64` so that very long segments keep their precision near the
/// rectangle. Endpoints already inside are returned unchanged.
pub fn clip_segment(rect: &Rect, segment: &Segment) -> Option<Segment> {
    let (x0, y0) = (f64::from(segment.start.x), f64::from(segment.start.y));
    let (dx, dy) = (
        f64::from(segment.end.x) - x0,
        f64::from(segment.end.y) - y0,
    );
    let boundaries = [
        (-dx, x0 - f64::from(rect.left())),
        (dx, f64::from(rect.right()) - x0),
        (-dy, y0 - f64::from(rect.top())),
        (dy, f64::from(rect.bottom()) - y0),
    ];

    let (mut enter, mut exit) = (0.0_f64, 1.0_f64);
    for (p, q) in boundaries {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            enter = enter.max(t);
        } else {
            exit = exit.min(t);
        }
        if enter > exit {
            return None;
        }
    }

    let at = |t: f64| Vec2::new((x0 + dx * t) as f32, (y0 + dy * t) as f32);
    let start = if enter > 0.0 { at(enter) } else { segment.start };
    let end = if exit < 1.0 { at(exit) } else { segment.end };
    Some(Segment::new(start, end))
}

/// Cells crossed by a segment in cell space, in order from start to end
///
/// Supercover walk: every cell whose half-open square the segment passes
/// through is produced exactly once. A segment passing exactly through a
/// cell corner steps diagonally and does not report the two side cells,
/// which the half-open convention excludes.
#[derive(Debug, Clone)]
pub struct GridTraversal {
    cell: (i32, i32),
    step: (i32, i32),
    remaining: (u32, u32),
    t_max: (f32, f32),
    t_delta: (f32, f32),
    done: bool,
}

impl GridTraversal {
    /// Start a walk between two points already divided by the cell size
    pub fn new(start: Vec2, end: Vec2) -> Self {
        let cell = (start.x.floor() as i32, start.y.floor() as i32);
        let last = (end.x.floor() as i32, end.y.floor() as i32);
        let delta = end - start;

        let (step_x, t_max_x, t_delta_x) = Self::axis(start.x, delta.x, cell.0);
        let (step_y, t_max_y, t_delta_y) = Self::axis(start.y, delta.y, cell.1);

        Self {
            cell,
            step: (step_x, step_y),
            remaining: (last.0.abs_diff(cell.0), last.1.abs_diff(cell.1)),
            t_max: (t_max_x, t_max_y),
            t_delta: (t_delta_x, t_delta_y),
            done: false,
        }
    }

    /// Step direction, parameter of the first boundary crossing and the
    /// parameter distance between crossings along one axis
    fn axis(origin: f32, delta: f32, cell: i32) -> (i32, f32, f32) {
        if delta > 0.0 {
            (1, (cell as f32 + 1.0 - origin) / delta, 1.0 / delta)
        } else if delta < 0.0 {
            (-1, (origin - cell as f32) / -delta, -1.0 / delta)
        } else {
            (0, f32::INFINITY, f32::INFINITY)
        }
    }

    fn step_x(&mut self) {
        self.cell.0 += self.step.0;
        self.t_max.0 += self.t_delta.0;
        self.remaining.0 -= 1;
    }

    fn step_y(&mut self) {
        self.cell.1 += self.step.1;
        self.t_max.1 += self.t_delta.1;
        self.remaining.1 -= 1;
    }
}

impl Iterator for GridTraversal {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.cell;

        match self.remaining {
            (0, 0) => self.done = true,
            (_, 0) => self.step_x(),
            (0, _) => self.step_y(),
            _ => {
                if self.t_max.0 < self.t_max.1 {
                    self.step_x();
                } else if self.t_max.1 < self.t_max.0 {
                    self.step_y();
                } else {
                    self.step_x();
                    self.step_y();
                }
            }
        }

        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let (x, y) = (self.remaining.0 as usize, self.remaining.1 as usize);
        let upper = x.saturating_add(y).saturating_add(1);
        (x.max(y).saturating_add(1), Some(upper))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::vec2;
    use approx::assert_relative_eq;

    fn seg(x0: f32, y0: f32, x1: f32, y1: f32) -> Segment {
        Segment::new(vec2(x0, y0), vec2(x1, y1))
    }

    #[test]
    fn test_clip_segment_to_rect() {
        let rect = Rect::new(0.0, 0.0, 4.0, 4.0);

        let inside = seg(1.0, 1.0, 3.0, 2.0);
        assert_eq!(clip_segment(&rect, &inside), Some(inside));

        let across = clip_segment(&rect, &seg(-2.0, 1.0, 6.0, 3.0)).expect("crosses the rect");
        assert_relative_eq!(across.start, vec2(0.0, 1.5), epsilon = 1e-5);
        assert_relative_eq!(across.end, vec2(4.0, 2.5), epsilon = 1e-5);

        let far_ray = clip_segment(&rect, &seg(-1.0e9, 1.5, 1.0e9, 1.5)).expect("crosses the rect");
        assert_relative_eq!(far_ray.start, vec2(0.0, 1.5), epsilon = 1e-3);
        assert_relative_eq!(far_ray.end, vec2(4.0, 1.5), epsilon = 1e-3);

        assert_eq!(clip_segment(&rect, &seg(5.0, -1.0, 9.0, 3.0)), None);
        assert_eq!(clip_segment(&rect, &seg(-1.0, 5.0, 5.0, 5.0)), None);
    }

    #[test]
    fn test_traversal_size_hint_saturates() {
        let walk = GridTraversal::new(vec2(-3.0e9, -3.0e9), vec2(3.0e9, 3.0e9));
        let (lower, upper) = walk.size_hint();
        assert!(lower >= 1);
        assert!(upper.is_some_and(|upper| upper >= lower));
    }

    #[test]
    fn test_crossing_segments_intersect_at_expected_point() {
        let hit = segment_intersection(&seg(0.0, 0.0, 10.0, 10.0), &seg(0.0, 10.0, 10.0, 0.0))
            .expect("diagonals cross");
        assert_relative_eq!(hit, vec2(5.0, 5.0), epsilon = 1e-5);
    }

    #[test]
    fn test_parallel_and_collinear_segments_do_not_intersect() {
        assert!(!segments_intersect(&seg(0.0, 0.0, 10.0, 0.0), &seg(0.0, 1.0, 10.0, 1.0)));
        assert!(!segments_intersect(&seg(0.0, 0.0, 10.0, 0.0), &seg(5.0, 0.0, 15.0, 0.0)));
    }

    #[test]
    fn test_segments_outside_parameter_range() {
        // Lines cross at (5, 5) but the second segment stops short
        assert!(!segments_intersect(&seg(0.0, 0.0, 10.0, 10.0), &seg(10.0, 0.0, 6.0, 4.0)));
        // Touching at an endpoint counts
        assert!(segments_intersect(&seg(0.0, 0.0, 5.0, 5.0), &seg(5.0, 5.0, 10.0, 0.0)));
    }

    #[test]
    fn test_sector_classification() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(Sector::classify(&rect, vec2(5.0, 5.0)), Sector::CENTER);
        assert_eq!(Sector::classify(&rect, vec2(0.0, 0.0)), Sector::CENTER);
        assert_eq!(Sector::classify(&rect, vec2(10.0, 5.0)), Sector::RIGHT);
        assert_eq!(Sector::classify(&rect, vec2(-1.0, 5.0)), Sector::LEFT);
        assert_eq!(Sector::classify(&rect, vec2(-1.0, -1.0)), Sector::LEFT | Sector::TOP);
        assert_eq!(Sector::classify(&rect, vec2(12.0, 10.0)), Sector::RIGHT | Sector::BOTTOM);
    }

    #[test]
    fn test_sector_edges() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let edges: Vec<_> = (Sector::LEFT | Sector::TOP).edges(&rect).collect();
        assert_eq!(edges, vec![seg(0.0, 0.0, 0.0, 10.0), seg(0.0, 0.0, 10.0, 0.0)]);
        assert_eq!(Sector::CENTER.edges(&rect).count(), 0);
    }

    #[test]
    fn test_closest_point_is_clamped() {
        let segment = seg(0.0, 0.0, 10.0, 0.0);
        assert_eq!(segment.closest_point(vec2(5.0, 3.0)), vec2(5.0, 0.0));
        assert_eq!(segment.closest_point(vec2(-4.0, 3.0)), vec2(0.0, 0.0));
        assert_eq!(segment.closest_point(vec2(14.0, -3.0)), vec2(10.0, 0.0));
        assert_eq!(seg(2.0, 2.0, 2.0, 2.0).closest_point(vec2(9.0, 9.0)), vec2(2.0, 2.0));
    }

    #[test]
    fn test_circle_tests_are_strict() {
        assert!(!circle_contains_point(vec2(0.0, 0.0), 5.0, vec2(5.0, 0.0)));
        assert!(circle_contains_point(vec2(0.0, 0.0), 5.0, vec2(4.99, 0.0)));
        assert!(!circle_intersects_circle(vec2(0.0, 0.0), 2.0, vec2(5.0, 0.0), 3.0));
        assert!(circle_intersects_circle(vec2(0.0, 0.0), 2.0, vec2(4.9, 0.0), 3.0));
        assert!(!circle_intersects_segment(vec2(0.0, 0.0), 1.0, &seg(-5.0, 1.0, 5.0, 1.0)));
        assert!(circle_intersects_segment(vec2(0.0, 0.0), 1.0, &seg(-5.0, 0.5, 5.0, 0.5)));
    }

    #[test]
    fn test_rect_circle() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect_intersects_circle(&rect, vec2(5.0, 5.0), 0.1));
        assert!(rect_intersects_circle(&rect, vec2(-1.0, 5.0), 1.5));
        assert!(!rect_intersects_circle(&rect, vec2(-1.0, 5.0), 1.0));
        // Corner sector: distance to (10, 10) is sqrt(2)
        assert!(!rect_intersects_circle(&rect, vec2(11.0, 11.0), 1.4));
        assert!(rect_intersects_circle(&rect, vec2(11.0, 11.0), 1.5));
    }

    #[test]
    fn test_rect_segment_sector_cases() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        // Endpoint inside
        assert!(rect_intersects_segment(&rect, &seg(5.0, 5.0, 50.0, 50.0)));
        // Both beyond the left edge
        assert!(!rect_intersects_segment(&rect, &seg(-5.0, -20.0, -1.0, 30.0)));
        // Straight through, left to right
        assert!(rect_intersects_segment(&rect, &seg(-5.0, 5.0, 15.0, 5.0)));
        // Diagonal past the top-right corner
        assert!(!rect_intersects_segment(&rect, &seg(5.0, -10.0, 20.0, 5.0)));
        // Diagonal clipping the top-left corner
        assert!(rect_intersects_segment(&rect, &seg(-2.0, 3.0, 3.0, -2.0)));
    }

    #[test]
    fn test_traversal_horizontal_and_reverse() {
        let cells: Vec<_> = GridTraversal::new(vec2(0.5, 2.5), vec2(3.5, 2.5)).collect();
        assert_eq!(cells, vec![(0, 2), (1, 2), (2, 2), (3, 2)]);

        let cells: Vec<_> = GridTraversal::new(vec2(3.5, 0.2), vec2(0.5, 0.2)).collect();
        assert_eq!(cells, vec![(3, 0), (2, 0), (1, 0), (0, 0)]);
    }

    #[test]
    fn test_traversal_single_cell() {
        let cells: Vec<_> = GridTraversal::new(vec2(1.2, 1.2), vec2(1.8, 1.9)).collect();
        assert_eq!(cells, vec![(1, 1)]);
    }

    #[test]
    fn test_traversal_shallow_slope_visits_supercover() {
        let cells: Vec<_> = GridTraversal::new(vec2(0.5, 0.5), vec2(4.5, 2.5)).collect();
        assert_eq!(cells, vec![(0, 0), (1, 0), (1, 1), (2, 1), (3, 1), (3, 2), (4, 2)]);
    }

    #[test]
    fn test_traversal_exact_diagonal_steps_through_corners() {
        let cells: Vec<_> = GridTraversal::new(vec2(0.0, 0.0), vec2(3.0, 3.0)).collect();
        assert_eq!(cells, vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn test_traversal_negative_coordinates() {
        let cells: Vec<_> = GridTraversal::new(vec2(-1.5, 0.5), vec2(0.5, -0.5)).collect();
        assert_eq!(cells.first(), Some(&(-2, 0)));
        assert_eq!(cells.last(), Some(&(0, -1)));
        assert_eq!(cells.len(), 4);
    }
}
