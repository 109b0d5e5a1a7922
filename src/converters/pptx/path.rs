//! Interprets SVG path data (`d` attribute) into DrawingML drawing operations.
//!
//! The interpreter is a small state machine over a token stream. It keeps the current
//! command letter (so numbers without a new letter repeat it), the relative/absolute mode,
//! the current point and the start of the current figure.
//!
//! Supported: `M/m`, `L/l`, `C/c`, `A/a` and `Z/z`. `H/h`, `V/v`, `S/s`, `Q/q` and `T/t`
//! are consumed with their fixed arity and skipped: no operation is emitted for them, but
//! the current point still moves to their endpoint so later relative commands stay aligned.

use log::{debug, warn};
use std::f64::consts::PI;

use super::constants::ANGLE_UNITS_PER_DEGREE;
use super::coords::CoordinateMapper;
use super::error::{ConversionError, Result};
use super::utils::numeric_prefix_len;
use crate::models::geometry::{DrawingOp, Point};

/// Letters recognised as path commands, in either case.
const COMMAND_ALPHABET: &str = "mzlhvcsqta";

/// Full circle in DrawingML angle units.
const FULL_TURN_UNITS: i64 = 360 * ANGLE_UNITS_PER_DEGREE as i64;

/// A lexical token of path data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathToken {
    Command(char),
    Number(f64),
}

/// Splits path data into command letters and numbers.
///
/// Whitespace and commas separate tokens. Numbers may be signed, use decimals and carry an
/// exponent, and may follow each other without a separator (`10-5`, `1.5.5`).
///
/// # Returns
/// `ConversionError::MalformedPath` on any character that is neither.
pub fn tokenize_path(d: &str) -> Result<Vec<PathToken>> {
    let mut tokens = Vec::new();
    let mut offset = 0;

    while offset < d.len() {
        let rest = &d[offset..];
        let Some(c) = rest.chars().next() else { break };

        if c.is_whitespace() || c == ',' {
            offset += c.len_utf8();
        } else if c.is_ascii_alphabetic() && COMMAND_ALPHABET.contains(c.to_ascii_lowercase()) {
            tokens.push(PathToken::Command(c));
            offset += 1;
        } else {
            let len = numeric_prefix_len(rest);
            if len == 0 {
                return Err(ConversionError::MalformedPath(format!(
                    "unexpected character '{}' at offset {}",
                    c, offset
                )));
            }
            let value = rest[..len].parse::<f64>().map_err(|_| {
                ConversionError::MalformedPath(format!("invalid number '{}'", &rest[..len]))
            })?;
            tokens.push(PathToken::Number(value));
            offset += len;
        }
    }
    Ok(tokens)
}

/// Result of interpreting one path's data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathInterpretation {
    pub ops: Vec<DrawingOp>,
    /// Command letters that were skipped, each listed once, in order of first appearance.
    pub skipped_commands: Vec<char>,
}

/// Interprets path data into drawing operations in destination space.
///
/// # Arguments
/// * `d` - The raw `d` attribute.
/// * `mapper` - Maps source coordinates to EMU.
/// * `offset` - Translation (source units) added to every absolute coordinate.
///
/// # Returns
/// The drawing operations, or `ConversionError::MalformedPath` if the data cannot be read
/// (unknown characters, missing numbers, numbers before the first command).
pub fn interpret_path(
    d: &str,
    mapper: &CoordinateMapper,
    offset: (f64, f64),
) -> Result<PathInterpretation> {
    if d.to_ascii_lowercase().contains("nan") {
        debug!("Path data contains NaN, emitting an empty path");
        return Ok(PathInterpretation::default());
    }
    let tokens = tokenize_path(d)?;
    let mut interpreter = PathInterpreter::new(tokens, mapper, offset);
    interpreter.run()?;
    Ok(interpreter.finish())
}

struct PathInterpreter<'a> {
    tokens: Vec<PathToken>,
    pos: usize,
    mapper: &'a CoordinateMapper,
    offset: (f64, f64),
    /// Last command letter as written (case preserved).
    command: Option<char>,
    relative: bool,
    current: (f64, f64),
    figure_start: (f64, f64),
    ops: Vec<DrawingOp>,
    skipped: Vec<char>,
}

impl<'a> PathInterpreter<'a> {
    fn new(tokens: Vec<PathToken>, mapper: &'a CoordinateMapper, offset: (f64, f64)) -> Self {
        Self {
            tokens,
            pos: 0,
            mapper,
            offset,
            command: None,
            relative: false,
            // The pen starts at the translated origin, so a leading relative `m` is offset too.
            current: offset,
            figure_start: offset,
            ops: Vec::new(),
            skipped: Vec::new(),
        }
    }

    fn run(&mut self) -> Result<()> {
        while let Some(token) = self.tokens.get(self.pos).copied() {
            let letter = match token {
                PathToken::Command(c) => {
                    self.command = Some(c);
                    self.relative = c.is_ascii_lowercase();
                    self.pos += 1;
                    c
                }
                // Implicit repetition of the previous command.
                PathToken::Number(_) => match self.command {
                    Some(c) if c.eq_ignore_ascii_case(&'z') => {
                        return Err(ConversionError::MalformedPath(
                            "numbers after a closepath command".to_string(),
                        ))
                    }
                    // Pairs after a moveto are implicit linetos.
                    Some('m') => {
                        self.command = Some('l');
                        'l'
                    }
                    Some('M') => {
                        self.command = Some('L');
                        'L'
                    }
                    Some(c) => c,
                    None => {
                        return Err(ConversionError::MalformedPath(
                            "path data must begin with a command".to_string(),
                        ))
                    }
                },
            };
            self.execute(letter)?;
        }
        Ok(())
    }

    fn finish(self) -> PathInterpretation {
        PathInterpretation {
            ops: self.ops,
            skipped_commands: self.skipped,
        }
    }

    fn execute(&mut self, letter: char) -> Result<()> {
        match letter.to_ascii_lowercase() {
            'm' => {
                let [x, y] = self.take::<2>(letter)?;
                let p = self.resolve(x, y);
                self.ops.push(DrawingOp::MoveTo(self.map(p)));
                self.current = p;
                self.figure_start = p;
            }
            'l' => {
                let [x, y] = self.take::<2>(letter)?;
                let p = self.resolve(x, y);
                self.ops.push(DrawingOp::LineTo(self.map(p)));
                self.current = p;
            }
            'c' => {
                let [x1, y1, x2, y2, x, y] = self.take::<6>(letter)?;
                // All three points are relative to the point before the curve.
                let c1 = self.resolve(x1, y1);
                let c2 = self.resolve(x2, y2);
                let end = self.resolve(x, y);
                self.ops.push(DrawingOp::CubicBezierTo {
                    control1: self.map(c1),
                    control2: self.map(c2),
                    end: self.map(end),
                });
                self.current = end;
            }
            'a' => {
                let [rx, ry, _rotation, large_arc, sweep, x, y] = self.take::<7>(letter)?;
                let end = self.resolve(x, y);
                let arc = self.arc_ops(rx, ry, large_arc != 0.0, sweep != 0.0, end);
                self.ops.extend(arc);
                self.current = end;
            }
            'z' => {
                self.ops.push(DrawingOp::Close);
                self.current = self.figure_start;
            }
            'h' => {
                let [x] = self.take::<1>(letter)?;
                let x = if self.relative {
                    self.current.0 + x
                } else {
                    x + self.offset.0
                };
                self.skip(letter, (x, self.current.1));
            }
            'v' => {
                let [y] = self.take::<1>(letter)?;
                let y = if self.relative {
                    self.current.1 + y
                } else {
                    y + self.offset.1
                };
                self.skip(letter, (self.current.0, y));
            }
            's' | 'q' => {
                let [_, _, x, y] = self.take::<4>(letter)?;
                let end = self.resolve(x, y);
                self.skip(letter, end);
            }
            't' => {
                let [x, y] = self.take::<2>(letter)?;
                let end = self.resolve(x, y);
                self.skip(letter, end);
            }
            other => {
                // The tokenizer only produces letters from the command alphabet.
                return Err(ConversionError::MalformedPath(format!(
                    "unknown command '{}'",
                    other
                )));
            }
        }
        Ok(())
    }

    /// Reads exactly `N` numbers for `letter`.
    fn take<const N: usize>(&mut self, letter: char) -> Result<[f64; N]> {
        let mut values = [0.0; N];
        for value in values.iter_mut() {
            match self.tokens.get(self.pos) {
                Some(PathToken::Number(n)) => {
                    *value = *n;
                    self.pos += 1;
                }
                _ => {
                    return Err(ConversionError::MalformedPath(format!(
                        "command '{}' expects {} numbers",
                        letter, N
                    )))
                }
            }
        }
        Ok(values)
    }

    /// Absolute source point for a coordinate pair in the current mode.
    /// Relative pairs are deltas from the current point, which already includes the offset.
    fn resolve(&self, x: f64, y: f64) -> (f64, f64) {
        if self.relative {
            (self.current.0 + x, self.current.1 + y)
        } else {
            (x + self.offset.0, y + self.offset.1)
        }
    }

    fn map(&self, (x, y): (f64, f64)) -> Point {
        Point::new(self.mapper.map_x(x), self.mapper.map_y(y))
    }

    fn skip(&mut self, letter: char, end: (f64, f64)) {
        if !self.skipped.contains(&letter) {
            warn!("Path command '{}' is not supported, skipping it", letter);
            self.skipped.push(letter);
        }
        self.current = end;
    }

    /// Converts an SVG endpoint arc into DrawingML operations.
    ///
    /// The arc is converted to centre form (radii scaled up when too small to span the
    /// endpoints) and written as one `arcTo`. DrawingML arcs cannot be rotated, so the
    /// x-axis rotation is ignored. Degenerate arcs follow SVG: a zero radius draws a
    /// straight line and identical endpoints draw nothing.
    fn arc_ops(
        &self,
        rx: f64,
        ry: f64,
        large_arc: bool,
        sweep: bool,
        end: (f64, f64),
    ) -> Vec<DrawingOp> {
        let (x1, y1) = self.current;
        let (x2, y2) = end;
        if x1 == x2 && y1 == y2 {
            return Vec::new();
        }
        let (mut rx, mut ry) = (rx.abs(), ry.abs());
        if rx == 0.0 || ry == 0.0 {
            return vec![DrawingOp::LineTo(self.map(end))];
        }

        // Midpoint-relative start point (x1', y1').
        let hx = (x1 - x2) / 2.0;
        let hy = (y1 - y2) / 2.0;

        let lambda = (hx * hx) / (rx * rx) + (hy * hy) / (ry * ry);
        if lambda > 1.0 {
            let scale = lambda.sqrt();
            rx *= scale;
            ry *= scale;
        }

        let num = rx * rx * ry * ry - rx * rx * hy * hy - ry * ry * hx * hx;
        let den = rx * rx * hy * hy + ry * ry * hx * hx;
        let mut coef = (num / den).max(0.0).sqrt();
        if large_arc == sweep {
            coef = -coef;
        }
        let cx = coef * (rx * hy / ry);
        let cy = coef * (-ry * hx / rx);

        let (ux, uy) = ((hx - cx) / rx, (hy - cy) / ry);
        let (vx, vy) = ((-hx - cx) / rx, (-hy - cy) / ry);
        let theta1 = uy.atan2(ux);
        let mut delta = (ux * vy - uy * vx).atan2(ux * vx + uy * vy);
        if !sweep && delta > 0.0 {
            delta -= 2.0 * PI;
        } else if sweep && delta < 0.0 {
            delta += 2.0 * PI;
        }

        let width_radius = self.mapper.map_x(rx);
        let height_radius = self.mapper.map_y(ry);
        if width_radius == 0 || height_radius == 0 {
            return vec![DrawingOp::LineTo(self.map(end))];
        }

        // DrawingML angles are visual angles on the destination ellipse.
        let (wr, hr) = (width_radius as f64, height_radius as f64);
        let visual = |t: f64| (hr * t.sin()).atan2(wr * t.cos());
        let start = visual(theta1);
        let mut swing = visual(theta1 + delta) - start;
        if delta > 0.0 && swing < 0.0 {
            swing += 2.0 * PI;
        } else if delta < 0.0 && swing > 0.0 {
            swing -= 2.0 * PI;
        }

        vec![DrawingOp::ArcTo {
            width_radius,
            height_radius,
            start_angle: radians_to_angle_units(start).rem_euclid(FULL_TURN_UNITS),
            swing_angle: radians_to_angle_units(swing),
        }]
    }
}

fn radians_to_angle_units(radians: f64) -> i64 {
    (radians.to_degrees() * ANGLE_UNITS_PER_DEGREE).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mapper whose scale is exactly 10 EMU per source unit on both axes.
    fn unit_mapper() -> CoordinateMapper {
        CoordinateMapper::new(Some(1000.0), Some(1000.0), 10_000, 10_000).unwrap()
    }

    fn ops(d: &str) -> Vec<DrawingOp> {
        interpret_path(d, &unit_mapper(), (0.0, 0.0)).unwrap().ops
    }

    fn pt(x: i64, y: i64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_tokenize_numbers_and_commands() {
        let tokens = tokenize_path("M10-5L1.5.5,1e2 z").unwrap();
        assert_eq!(
            tokens,
            vec![
                PathToken::Command('M'),
                PathToken::Number(10.0),
                PathToken::Number(-5.0),
                PathToken::Command('L'),
                PathToken::Number(1.5),
                PathToken::Number(0.5),
                PathToken::Number(100.0),
                PathToken::Command('z'),
            ]
        );
        assert!(tokenize_path("M 0 0 X 1").is_err());
    }

    #[test]
    fn test_simple_absolute_path() {
        assert_eq!(
            ops("M0 0 L10 10 Z"),
            vec![
                DrawingOp::MoveTo(pt(0, 0)),
                DrawingOp::LineTo(pt(100, 100)),
                DrawingOp::Close
            ]
        );
    }

    #[test]
    fn test_relative_path_matches_absolute_equivalent() {
        assert_eq!(ops("m0 0 l10 0 l0 10 z"), ops("M0 0 L10 0 L10 10 Z"));
    }

    #[test]
    fn test_implicit_command_repetition() {
        assert_eq!(
            ops("M0 0 L10 0 20 0 30 0"),
            vec![
                DrawingOp::MoveTo(pt(0, 0)),
                DrawingOp::LineTo(pt(100, 0)),
                DrawingOp::LineTo(pt(200, 0)),
                DrawingOp::LineTo(pt(300, 0)),
            ]
        );
    }

    #[test]
    fn test_pairs_after_moveto_are_lines() {
        assert_eq!(ops("M0 0 10 0 10 10"), ops("M0 0 L10 0 L10 10"));
        assert_eq!(ops("m5 5 5 0 0 5"), ops("M5 5 L10 5 L10 10"));
    }

    #[test]
    fn test_relative_curve_is_anchored_on_pre_curve_point() {
        assert_eq!(
            ops("M10 10 c1 1 2 2 3 3"),
            vec![
                DrawingOp::MoveTo(pt(100, 100)),
                DrawingOp::CubicBezierTo {
                    control1: pt(110, 110),
                    control2: pt(120, 120),
                    end: pt(130, 130),
                },
            ]
        );
    }

    #[test]
    fn test_offset_applies_to_absolute_points_once() {
        let result = interpret_path("M0 0 l5 0 L5 5", &unit_mapper(), (10.0, 20.0)).unwrap();
        assert_eq!(
            result.ops,
            vec![
                DrawingOp::MoveTo(pt(100, 200)),
                DrawingOp::LineTo(pt(150, 200)),
                DrawingOp::LineTo(pt(150, 250)),
            ]
        );
    }

    #[test]
    fn test_leading_relative_moveto_is_offset() {
        let mapper = unit_mapper();
        let relative = interpret_path("m0 0 l10 0", &mapper, (10.0, 20.0)).unwrap();
        let absolute = interpret_path("M0 0 L10 0", &mapper, (10.0, 20.0)).unwrap();
        assert_eq!(relative.ops, absolute.ops);
        assert_eq!(
            relative.ops,
            vec![DrawingOp::MoveTo(pt(100, 200)), DrawingOp::LineTo(pt(200, 200))]
        );
    }

    #[test]
    fn test_close_returns_to_figure_start() {
        assert_eq!(
            ops("M10 10 l10 0 z l0 5"),
            vec![
                DrawingOp::MoveTo(pt(100, 100)),
                DrawingOp::LineTo(pt(200, 100)),
                DrawingOp::Close,
                DrawingOp::LineTo(pt(100, 150)),
            ]
        );
    }

    #[test]
    fn test_unsupported_commands_skipped_with_fixed_arity() {
        let result = interpret_path("M0 0 h10 v10 Q0 0 5 5 l1 1", &unit_mapper(), (0.0, 0.0))
            .unwrap();
        assert_eq!(
            result.ops,
            vec![DrawingOp::MoveTo(pt(0, 0)), DrawingOp::LineTo(pt(60, 60))]
        );
        assert_eq!(result.skipped_commands, vec!['h', 'v', 'Q']);
    }

    #[test]
    fn test_semicircle_arc() {
        // Half circle of radius 10 from (0,10) to (20,10), sweeping clockwise over the top.
        assert_eq!(
            ops("M0 10 A10 10 0 0 1 20 10"),
            vec![
                DrawingOp::MoveTo(pt(0, 100)),
                DrawingOp::ArcTo {
                    width_radius: 100,
                    height_radius: 100,
                    start_angle: 180 * 60000,
                    swing_angle: 180 * 60000,
                },
            ]
        );
    }

    #[test]
    fn test_quarter_arc_counter_clockwise() {
        // From (10,0) to (0,10) around the centre (10,10), counter-clockwise in screen space.
        let result = ops("M10 0 A10 10 0 0 0 0 10");
        assert_eq!(
            result[1],
            DrawingOp::ArcTo {
                width_radius: 100,
                height_radius: 100,
                start_angle: 270 * 60000,
                swing_angle: -90 * 60000,
            }
        );
    }

    #[test]
    fn test_degenerate_arcs() {
        assert_eq!(
            ops("M0 0 A0 5 0 0 1 10 0"),
            vec![DrawingOp::MoveTo(pt(0, 0)), DrawingOp::LineTo(pt(100, 0))]
        );
        assert_eq!(ops("M0 0 A5 5 0 0 1 0 0"), vec![DrawingOp::MoveTo(pt(0, 0))]);
    }

    #[test]
    fn test_malformed_paths() {
        let mapper = unit_mapper();
        for d in ["M0", "L", "10 10", "M0 0 Z 5 5", "M0 0 C1 1 2 2"] {
            let err = interpret_path(d, &mapper, (0.0, 0.0)).unwrap_err();
            assert!(matches!(err, ConversionError::MalformedPath(_)), "{d}");
        }
    }

    #[test]
    fn test_nan_yields_empty_path() {
        assert!(ops("M nan 0 L 1 1").is_empty());
    }
}
