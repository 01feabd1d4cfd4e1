//! Path Sampler
//!
//! Turns a glyph outline into the ordered reference path used for scoring.
//!
//! Supported path-data commands:
//! - `M`/`m` move: sets the current position, emits a start point
//! - `L`/`l` line: emits each destination point
//! - `C`/`c` cubic Bézier: emits `CUBIC_STEPS + 1` samples of
//!   B(t) = (1-t)³P0 + 3(1-t)²tP1 + 3(1-t)t²P2 + t³P3
//!
//! `Q`/`q` start a segment but are not interpreted. Anything else is operand
//! text and gets filtered by [`sanitize::parse_operands`].

use crate::sanitize;
use crate::types::{GlyphOutline, PathCommand, Point, ReferencePoint, CUBIC_STEPS};

/// Letters that open a new path-data segment
const SEGMENT_LETTERS: &[char] = &['M', 'L', 'C', 'Q', 'm', 'l', 'c', 'q'];

// ==================== Parsing ====================

/// Parse an SVG-style path description into drawing commands.
///
/// Text before the first segment letter is ignored. Incomplete operand groups
/// at the end of a segment are discarded.
pub fn parse_path_data(data: &str) -> Vec<PathCommand> {
    let mut commands = Vec::new();

    for (letter, operands) in split_segments(data) {
        let args = sanitize::parse_operands(operands);
        let relative = letter.is_ascii_lowercase();

        match letter.to_ascii_uppercase() {
            'M' => {
                // only the first pair counts for a move
                if let [x, y, ..] = args[..] {
                    commands.push(PathCommand::MoveTo {
                        to: Point::new(x, y),
                        relative,
                    });
                }
            }
            'L' => {
                for pair in args.chunks_exact(2) {
                    commands.push(PathCommand::LineTo {
                        to: Point::new(pair[0], pair[1]),
                        relative,
                    });
                }
            }
            'C' => {
                for group in args.chunks_exact(6) {
                    commands.push(PathCommand::CubicTo {
                        ctrl1: Point::new(group[0], group[1]),
                        ctrl2: Point::new(group[2], group[3]),
                        to: Point::new(group[4], group[5]),
                        relative,
                    });
                }
            }
            _ => {}
        }
    }

    commands
}

/// Split path data into `(letter, operand text)` segments
fn split_segments(data: &str) -> Vec<(char, &str)> {
    let starts: Vec<(usize, char)> = data
        .char_indices()
        .filter(|(_, c)| SEGMENT_LETTERS.contains(c))
        .collect();

    starts
        .iter()
        .enumerate()
        .map(|(i, &(pos, letter))| {
            let body_start = pos + letter.len_utf8();
            let body_end = starts.get(i + 1).map(|&(next, _)| next).unwrap_or(data.len());
            (letter, &data[body_start..body_end])
        })
        .collect()
}

// ==================== Sampling ====================

/// Evaluate one coordinate of a cubic Bézier at parameter `t`
#[inline]
pub fn cubic_bezier(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    mt * mt * mt * p0 + 3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t * p3
}

/// Flattens outlines into reference points
#[derive(Debug, Clone, Copy, Default)]
pub struct PathSampler;

impl PathSampler {
    pub fn new() -> Self {
        Self
    }

    /// Flatten an outline into its reference path, in drawing order
    pub fn flatten(&self, outline: &GlyphOutline) -> Vec<ReferencePoint> {
        flatten_commands(&outline.commands)
    }
}

/// Flatten a command list starting from the origin
pub fn flatten_commands(commands: &[PathCommand]) -> Vec<ReferencePoint> {
    let mut points = Vec::new();
    let mut current = Point::default();

    let resolve = |current: Point, p: Point, relative: bool| {
        if relative {
            current.offset(p.x, p.y)
        } else {
            p
        }
    };

    for command in commands {
        match *command {
            PathCommand::MoveTo { to, relative } => {
                current = resolve(current, to, relative);
                points.push(ReferencePoint::start(current));
            }
            PathCommand::LineTo { to, relative } => {
                current = resolve(current, to, relative);
                points.push(ReferencePoint::on_path(current));
            }
            PathCommand::CubicTo {
                ctrl1,
                ctrl2,
                to,
                relative,
            } => {
                // relative control points are all anchored at the segment start
                let p0 = current;
                let p1 = resolve(p0, ctrl1, relative);
                let p2 = resolve(p0, ctrl2, relative);
                let p3 = resolve(p0, to, relative);

                points.reserve(CUBIC_STEPS as usize + 1);
                for step in 0..=CUBIC_STEPS {
                    let t = f64::from(step) / f64::from(CUBIC_STEPS);
                    points.push(ReferencePoint::on_path(Point::new(
                        cubic_bezier(p0.x, p1.x, p2.x, p3.x, t),
                        cubic_bezier(p0.y, p1.y, p2.y, p3.y, t),
                    )));
                }
                current = p3;
            }
        }
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outline(commands: Vec<PathCommand>) -> GlyphOutline {
        GlyphOutline {
            id: "test".into(),
            commands,
            guide_dots: vec![],
            start_point: None,
        }
    }

    #[test]
    fn test_parse_move_and_lines() {
        let cmds = parse_path_data("M 10 20 L 30 40 50 60");
        assert_eq!(
            cmds,
            vec![
                PathCommand::MoveTo { to: Point::new(10.0, 20.0), relative: false },
                PathCommand::LineTo { to: Point::new(30.0, 40.0), relative: false },
                PathCommand::LineTo { to: Point::new(50.0, 60.0), relative: false },
            ]
        );
    }

    #[test]
    fn test_parse_relative_flags() {
        let cmds = parse_path_data("m1,2 l3,4 c1 1 2 2 3 3");
        assert!(matches!(cmds[0], PathCommand::MoveTo { relative: true, .. }));
        assert!(matches!(cmds[1], PathCommand::LineTo { relative: true, .. }));
        assert!(matches!(cmds[2], PathCommand::CubicTo { relative: true, .. }));
    }

    #[test]
    fn test_parse_move_ignores_extra_pairs() {
        let cmds = parse_path_data("M 1 2 3 4");
        assert_eq!(cmds.len(), 1);
    }

    #[test]
    fn test_parse_ignores_quadratic_and_unknown_letters() {
        // Q opens a segment (its operands never leak into L); Z is just a bad token
        let cmds = parse_path_data("M 0 0 L 10 10 Q 1 2 3 4 Z");
        assert_eq!(cmds.len(), 2);
    }

    #[test]
    fn test_parse_drops_incomplete_groups() {
        let cmds = parse_path_data("M 0 0 L 10 10 20 C 1 2 3 4 5");
        assert_eq!(cmds.len(), 2);
    }

    #[test]
    fn test_parse_filters_malformed_tokens_before_grouping() {
        let cmds = parse_path_data("M 0 0 L 10 oops 20");
        assert_eq!(
            cmds[1],
            PathCommand::LineTo { to: Point::new(10.0, 20.0), relative: false }
        );
    }

    #[test]
    fn test_parse_ignores_leading_text() {
        let cmds = parse_path_data("  5 5 M 1 1");
        assert_eq!(cmds.len(), 1);
        assert!(parse_path_data("").is_empty());
    }

    #[test]
    fn test_flatten_move_marks_start() {
        let points = flatten_commands(&parse_path_data("M 10 10 L 20 10 M 0 0 L 5 5"));
        let starts: Vec<bool> = points.iter().map(|p| p.is_start).collect();
        assert_eq!(starts, vec![true, false, true, false]);
    }

    #[test]
    fn test_flatten_relative_lines_accumulate() {
        let points = flatten_commands(&parse_path_data("M 10 10 l 5 0 5 0 m 0 10"));
        let coords: Vec<(f64, f64)> = points.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(coords, vec![(10.0, 10.0), (15.0, 10.0), (20.0, 10.0), (20.0, 20.0)]);
    }

    #[test]
    fn test_flatten_cubic_sample_count_and_endpoints() {
        let points = flatten_commands(&parse_path_data("M 0 0 C 0 50 100 50 100 0"));
        // 1 move point + 51 curve samples
        assert_eq!(points.len(), 1 + CUBIC_STEPS as usize + 1);

        let first = points[1];
        assert_eq!((first.x, first.y), (0.0, 0.0));
        assert!(!first.is_start);

        let last = points[points.len() - 1];
        assert!((last.x - 100.0).abs() < 1e-9);
        assert!(last.y.abs() < 1e-9);
    }

    #[test]
    fn test_flatten_cubic_midpoint() {
        let points = flatten_commands(&parse_path_data("M 0 0 C 0 40 100 40 100 0"));
        // t = 0.5 is sample 25 after the move point
        let mid = points[1 + 25];
        assert!((mid.x - 50.0).abs() < 1e-9);
        assert!((mid.y - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_flatten_relative_cubic_anchored_at_segment_start() {
        let abs = flatten_commands(&parse_path_data("M 10 10 C 10 20 30 20 30 10"));
        let rel = flatten_commands(&parse_path_data("M 10 10 c 0 10 20 10 20 0"));
        assert_eq!(abs.len(), rel.len());
        for (a, r) in abs.iter().zip(rel.iter()) {
            assert!((a.x - r.x).abs() < 1e-9 && (a.y - r.y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_flatten_continues_from_cubic_endpoint() {
        let points = flatten_commands(&parse_path_data("M 0 0 C 1 1 2 2 3 3 l 1 1"));
        let last = points[points.len() - 1];
        assert_eq!((last.x, last.y), (4.0, 4.0));
    }

    #[test]
    fn test_sampler_flatten_outline() {
        let sampler = PathSampler::new();
        let points = sampler.flatten(&outline(parse_path_data("M 0 0 L 1 1")));
        assert_eq!(points.len(), 2);
        assert!(sampler.flatten(&outline(vec![])).is_empty());
    }

    #[test]
    fn test_cubic_bezier_endpoints() {
        assert_eq!(cubic_bezier(1.0, 5.0, 7.0, 9.0, 0.0), 1.0);
        assert_eq!(cubic_bezier(1.0, 5.0, 7.0, 9.0, 1.0), 9.0);
    }
}
