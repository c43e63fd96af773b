//! Recursive fractal tree renderer.
//!
//! The whole tree is rebuilt from scratch on every call: clear the surface,
//! then walk branches depth-first from the trunk. Orientation is measured
//! from the upward vertical, so a branch of length `l` at angle `a` ends at
//! `(x - l sin a, y - l cos a)`.

use crate::config::{Layout, TreeParams};
use crate::surface::Surface;

/// One branch waiting to be drawn. Lives only on the recursion stack.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Branch {
    x: f64,
    y: f64,
    length: f64,
    thickness: f64,
    orientation: f64,
    depth: u32,
}

struct TreePainter<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
    params: &'a TreeParams,
    layout: &'a Layout,
    angle_increment: f64,
    length_ratio: f64,
    drawn: u64,
}

impl<S: Surface + ?Sized> TreePainter<'_, S> {
    fn draw_branch(&mut self, branch: Branch) {
        if branch.depth > self.params.max_depth {
            return;
        }

        let end_x = branch.x - branch.length * branch.orientation.sin();
        let end_y = branch.y - branch.length * branch.orientation.cos();
        self.surface.stroke_line(
            branch.x,
            branch.y,
            end_x,
            end_y,
            branch.thickness,
            self.layout.line_color,
        );
        self.drawn += 1;

        let length = branch.length * self.length_ratio;
        let thickness = branch.thickness * self.layout.thickness_decay;
        for orientation in child_orientations(
            branch.orientation,
            self.params.branch_propagation,
            self.angle_increment,
        ) {
            self.draw_branch(Branch {
                x: end_x,
                y: end_y,
                length,
                thickness,
                orientation,
                depth: branch.depth + 1,
            });
        }
    }
}

/// Clear `surface` and draw the tree. Returns the number of segments drawn.
///
/// A surface with a zero dimension is treated as not yet available and left
/// untouched.
pub fn render<S: Surface + ?Sized>(surface: &mut S, params: &TreeParams, layout: &Layout) -> u64 {
    let (w, h) = surface.size();
    if w == 0 || h == 0 {
        log::debug!("surface {}x{} not ready, skipping render", w, h);
        return 0;
    }
    let (w, h) = (w as f64, h as f64);

    surface.fill_rect(0.0, 0.0, w, h, layout.background);

    let trunk = Branch {
        x: w / 2.0,
        y: h - layout.ground_offset,
        length: h * layout.trunk_ratio,
        thickness: params.thickness,
        orientation: layout.root_orientation + params.rotation_angle.to_radians(),
        depth: 0,
    };

    let mut painter = TreePainter {
        surface,
        params,
        layout,
        angle_increment: params.angle.to_radians(),
        length_ratio: layout.fixed_height_ratio.unwrap_or(params.height_factor),
        drawn: 0,
    };
    painter.draw_branch(trunk);

    log::debug!(
        "rendered {} segments (depth {}, fan {})",
        painter.drawn,
        params.max_depth,
        params.branch_propagation
    );
    painter.drawn
}

/// Orientation of the first child so the fan is centred on `orientation`
pub fn fan_start(orientation: f64, branches: u32, increment: f64) -> f64 {
    let half = (branches / 2) as f64;
    if branches % 2 == 0 {
        orientation - increment / 2.0 - (half - 1.0) * increment
    } else {
        orientation - half * increment
    }
}

/// Orientations of the `branches` children of a branch
pub fn child_orientations(orientation: f64, branches: u32, increment: f64) -> impl Iterator<Item = f64> {
    let start = fan_start(orientation, branches, increment);
    (0..branches).map(move |i| start + i as f64 * increment)
}

/// Segments a render draws for the given fan-out and depth
pub fn expected_segments(branches: u32, max_depth: u32) -> u64 {
    match branches {
        0 => 1,
        1 => max_depth as u64 + 1,
        b => {
            let b = b as u64;
            (b.saturating_pow(max_depth + 1) - 1) / (b - 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FIXED_HEIGHT_RATIO;
    use crate::surface::{DrawOp, Recorder, Rgb};
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-9;

    fn params(max_depth: u32, branch_propagation: u32) -> TreeParams {
        TreeParams { max_depth, branch_propagation, ..TreeParams::default() }
    }

    fn lines(rec: &Recorder) -> Vec<(f64, f64, f64, f64, f64)> {
        rec.lines()
            .map(|op| match *op {
                DrawOp::Line { x1, y1, x2, y2, width, .. } => (x1, y1, x2, y2, width),
                DrawOp::Fill { .. } => unreachable!(),
            })
            .collect()
    }

    #[test_log::test]
    fn segment_count_matches_closed_form() {
        for b in 1..=5 {
            for d in 0..=4 {
                let mut rec = Recorder::new(800, 600);
                let drawn = render(&mut rec, &params(d, b), &Layout::default());
                assert_eq!(drawn, expected_segments(b, d), "b={} d={}", b, d);
                assert_eq!(rec.lines().count() as u64, drawn);
            }
        }
    }

    #[test]
    fn expected_segments_formula() {
        assert_eq!(expected_segments(1, 6), 7);
        assert_eq!(expected_segments(2, 3), 15);
        assert_eq!(expected_segments(5, 7), 97_656);
        assert_eq!(expected_segments(10, 2), 111);
    }

    #[test]
    fn depth_zero_draws_only_the_trunk() {
        let mut rec = Recorder::new(800, 600);
        assert_eq!(render(&mut rec, &params(0, 7), &Layout::default()), 1);
        assert_eq!(rec.lines().count(), 1);
    }

    #[test]
    fn background_is_filled_first() {
        let mut rec = Recorder::new(320, 200);
        render(&mut rec, &params(1, 2), &Layout::default());
        assert_eq!(
            rec.ops[0],
            DrawOp::Fill { x: 0.0, y: 0.0, w: 320.0, h: 200.0, color: Rgb::BACKGROUND }
        );
        assert_eq!(rec.ops.iter().filter(|op| matches!(op, DrawOp::Fill { .. })).count(), 1);
    }

    #[test]
    fn render_is_deterministic() {
        let p = params(4, 3);
        let mut a = Recorder::new(640, 480);
        let mut b = Recorder::new(640, 480);
        render(&mut a, &p, &Layout::default());
        render(&mut b, &p, &Layout::default());
        assert_eq!(a.ops, b.ops);
    }

    #[test]
    fn fan_is_symmetric_about_parent() {
        let inc = 36f64.to_radians();
        for b in 1..=10 {
            let parent = 0.7;
            let offsets: Vec<f64> = child_orientations(parent, b, inc).map(|o| o - parent).collect();
            assert_eq!(offsets.len(), b as usize);
            let mean = offsets.iter().sum::<f64>() / b as f64;
            assert!(mean.abs() < EPS, "b={} mean={}", b, mean);
        }
    }

    #[test]
    fn fan_start_even_and_odd() {
        assert!((fan_start(0.0, 2, 1.0) + 0.5).abs() < EPS);
        assert!((fan_start(0.0, 4, 1.0) + 1.5).abs() < EPS);
        assert!((fan_start(0.0, 3, 1.0) + 1.0).abs() < EPS);
        assert!(fan_start(0.25, 1, 1.0) == 0.25);
    }

    #[test]
    fn reference_scene_geometry() {
        let p = TreeParams {
            thickness: 0.5,
            height_factor: 0.65,
            max_depth: 1,
            branch_propagation: 2,
            angle: 36.0,
            rotation_angle: 0.0,
        };
        let mut rec = Recorder::new(800, 600);
        render(&mut rec, &p, &Layout::default());
        let segs = lines(&rec);
        assert_eq!(segs.len(), 3);

        let (x1, y1, x2, y2, w) = segs[0];
        assert_eq!((x1, y1), (400.0, 500.0));
        assert!((x2 - (400.0 - 175.0)).abs() < EPS);
        assert!((y2 - 500.0).abs() < EPS);
        assert_eq!(w, 0.5);

        let half = 18f64.to_radians();
        let child_len = 175.0 * 0.65;
        for (seg, orientation) in segs[1..].iter().zip([FRAC_PI_2 - half, FRAC_PI_2 + half]) {
            let (cx1, cy1, cx2, cy2, cw) = *seg;
            assert!((cx1 - x2).abs() < EPS && (cy1 - y2).abs() < EPS);
            assert!((cx2 - (cx1 - child_len * orientation.sin())).abs() < EPS);
            assert!((cy2 - (cy1 - child_len * orientation.cos())).abs() < EPS);
            assert!((cw - 0.5 * 2.0 / 3.0).abs() < EPS);
        }
    }

    #[test]
    fn rotation_turns_the_trunk() {
        let mut rec = Recorder::new(800, 600);
        let p = params(0, 1).with_rotation(-90.0);
        render(&mut rec, &p, &Layout::default());
        let (_, _, x2, y2, _) = lines(&rec)[0];
        assert!((x2 - 400.0).abs() < EPS);
        assert!((y2 - (500.0 - 175.0)).abs() < EPS);
    }

    #[test]
    fn rotating_layout_starts_upright() {
        let mut rec = Recorder::new(800, 600);
        render(&mut rec, &params(0, 1), &Layout::default().rotating());
        let (x1, y1, x2, y2, _) = lines(&rec)[0];
        assert_eq!((x1, y1), (400.0, 500.0));
        assert!((x2 - 400.0).abs() < EPS, "trunk not upright: x2={}", x2);
        assert!((y2 - 325.0).abs() < EPS, "trunk not upright: y2={}", y2);

        // a quarter turn of rotation tips it over to the left
        let mut rec = Recorder::new(800, 600);
        render(&mut rec, &params(0, 1).with_rotation(90.0), &Layout::default().rotating());
        let (_, _, x2, y2, _) = lines(&rec)[0];
        assert!((x2 - 225.0).abs() < EPS);
        assert!((y2 - 500.0).abs() < EPS);
    }

    #[test]
    fn fixed_ratio_overrides_height_factor() {
        let layout = Layout { fixed_height_ratio: Some(FIXED_HEIGHT_RATIO), ..Layout::default() };
        let mut rec = Recorder::new(800, 600);
        render(&mut rec, &params(1, 1), &layout);
        let segs = lines(&rec);
        let child_len = ((segs[1].2 - segs[1].0).powi(2) + (segs[1].3 - segs[1].1).powi(2)).sqrt();
        assert!((child_len - 175.0 * 8.0 / 12.0).abs() < 1e-6);
    }

    #[test]
    fn empty_surface_is_skipped() {
        let mut rec = Recorder::new(0, 600);
        assert_eq!(render(&mut rec, &TreeParams::default(), &Layout::default()), 0);
        assert!(rec.ops.is_empty());
    }
}
