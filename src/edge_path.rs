//! Smooth-step edge routing between a source handle (right edge) and a target handle (left edge).
//!
//! Every edge the editor creates is a smooth-step edge. A route is computed once and then
//! either flattened into points for the canvas painter or written out as SVG path data for
//! the export capture.

use std::fmt::Write as _;

use crate::constants;
use crate::types::Viewport;

/// Orthogonal segments through `corners`, with each interior corner rounded by up to `radius`.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgePath {
    /// First point, interior corners, last point
    pub corners: Vec<(f32, f32)>,
    /// Corner rounding; zero for sharp corners
    pub radius: f32,
}

/// Routes an edge leaving `source` to the right and entering `target` from the left.
pub fn smooth_step(source: (f32, f32), target: (f32, f32)) -> EdgePath {
    EdgePath {
        corners: step_corners(source, target),
        radius: constants::STEP_BORDER_RADIUS,
    }
}

/// Orthogonal corner points; routes around both nodes when the target is behind the source.
fn step_corners(source: (f32, f32), target: (f32, f32)) -> Vec<(f32, f32)> {
    let offset = constants::STEP_OFFSET;
    let mut corners = if target.0 > source.0 {
        let mid_x = (source.0 + target.0) / 2.0;
        vec![source, (mid_x, source.1), (mid_x, target.1), target]
    } else {
        let mid_y = (source.1 + target.1) / 2.0;
        vec![
            source,
            (source.0 + offset, source.1),
            (source.0 + offset, mid_y),
            (target.0 - offset, mid_y),
            (target.0 - offset, target.1),
            target,
        ]
    };
    corners.dedup();
    corners
}

impl EdgePath {
    /// Maps the route into container coordinates, scaling the corner radius with the zoom.
    pub fn to_screen(&self, viewport: &Viewport) -> EdgePath {
        EdgePath {
            corners: self.corners.iter().map(|p| viewport.to_screen(*p)).collect(),
            radius: self.radius * viewport.zoom,
        }
    }

    /// Approximates the route with straight segments; `steps` is the number of segments per corner.
    pub fn flatten(&self, steps: usize) -> Vec<(f32, f32)> {
        let steps = steps.max(1);
        let mut points = Vec::with_capacity(self.corners.len() * (steps + 1));
        for (i, &corner) in self.corners.iter().enumerate() {
            match rounded_corner(&self.corners, i, self.radius) {
                Some((entry, exit)) => {
                    for s in 0..=steps {
                        let t = s as f32 / steps as f32;
                        points.push(quadratic(entry, corner, exit, t));
                    }
                }
                None => points.push(corner),
            }
        }
        points
    }

    /// SVG path data (`d` attribute) for the route.
    pub fn to_svg_data(&self) -> String {
        let mut d = String::new();
        for (i, &corner) in self.corners.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            match rounded_corner(&self.corners, i, self.radius) {
                Some((entry, exit)) => {
                    let _ = write!(
                        d,
                        "{}{:.1},{:.1} Q{:.1},{:.1} {:.1},{:.1} ",
                        cmd, entry.0, entry.1, corner.0, corner.1, exit.0, exit.1
                    );
                }
                None => {
                    let _ = write!(d, "{}{:.1},{:.1} ", cmd, corner.0, corner.1);
                }
            }
        }
        d.trim_end().to_string()
    }
}

/// Entry and exit points of the rounded corner at `index`, or `None` if it stays sharp.
fn rounded_corner(corners: &[(f32, f32)], index: usize, radius: f32) -> Option<((f32, f32), (f32, f32))> {
    if radius <= 0.0 || index == 0 || index + 1 >= corners.len() {
        return None;
    }
    let prev = corners[index - 1];
    let corner = corners[index];
    let next = corners[index + 1];
    let len_in = distance(prev, corner);
    let len_out = distance(corner, next);
    if len_in <= f32::EPSILON || len_out <= f32::EPSILON {
        return None;
    }
    // Collinear points need no rounding
    let cross = (corner.0 - prev.0) * (next.1 - corner.1) - (corner.1 - prev.1) * (next.0 - corner.0);
    if cross.abs() <= f32::EPSILON {
        return None;
    }
    let r = radius.min(len_in / 2.0).min(len_out / 2.0);
    let entry = (
        corner.0 + (prev.0 - corner.0) / len_in * r,
        corner.1 + (prev.1 - corner.1) / len_in * r,
    );
    let exit = (
        corner.0 + (next.0 - corner.0) / len_out * r,
        corner.1 + (next.1 - corner.1) / len_out * r,
    );
    Some((entry, exit))
}

fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt()
}

fn quadratic(p0: (f32, f32), p1: (f32, f32), p2: (f32, f32), t: f32) -> (f32, f32) {
    let omt = 1.0 - t;
    (
        omt * omt * p0.0 + 2.0 * omt * t * p1.0 + t * t * p2.0,
        omt * omt * p0.1 + 2.0 * omt * t * p1.1 + t * t * p2.1,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_route_turns_at_midpoint() {
        let path = smooth_step((0.0, 0.0), (100.0, 50.0));
        assert_eq!(path.corners, vec![(0.0, 0.0), (50.0, 0.0), (50.0, 50.0), (100.0, 50.0)]);
        assert_eq!(path.radius, constants::STEP_BORDER_RADIUS);
    }

    #[test]
    fn backward_route_goes_around() {
        let path = smooth_step((100.0, 0.0), (0.0, 80.0));
        assert_eq!(path.corners.len(), 6);
        assert_eq!(path.corners[1], (100.0 + constants::STEP_OFFSET, 0.0));
        assert_eq!(path.corners[4], (0.0 - constants::STEP_OFFSET, 80.0));
    }

    #[test]
    fn aligned_handles_collapse_to_a_straight_run() {
        let points = smooth_step((0.0, 10.0), (100.0, 10.0)).flatten(4);
        assert_eq!(points.first(), Some(&(0.0, 10.0)));
        assert_eq!(points.last(), Some(&(100.0, 10.0)));
        assert!(points.iter().all(|p| (p.1 - 10.0).abs() < 1e-4));
    }

    #[test]
    fn flattened_route_keeps_endpoints() {
        for target in [(240.0, -60.0), (-120.0, 90.0), (3.0, 300.0)] {
            let points = smooth_step((3.0, 4.0), target).flatten(8);
            assert_eq!(points.first(), Some(&(3.0, 4.0)), "{:?}", target);
            let last = points.last().copied().unwrap();
            assert!((last.0 - target.0).abs() < 1e-3 && (last.1 - target.1).abs() < 1e-3, "{:?}", target);
        }
    }

    #[test]
    fn svg_data_uses_quadratic_corners() {
        let d = smooth_step((0.0, 0.0), (100.0, 50.0)).to_svg_data();
        assert!(d.starts_with("M0.0,0.0"));
        assert_eq!(d.matches('Q').count(), 2);
        assert!(d.ends_with("L100.0,50.0"));
    }

    #[test]
    fn screen_mapping_scales_radius() {
        let viewport = Viewport {
            offset: (10.0, 0.0),
            zoom: 2.0,
            size: (0.0, 0.0),
        };
        let path = smooth_step((0.0, 0.0), (100.0, 50.0)).to_screen(&viewport);
        assert_eq!(path.corners[0], (10.0, 0.0));
        assert_eq!(path.radius, constants::STEP_BORDER_RADIUS * 2.0);
    }
}
