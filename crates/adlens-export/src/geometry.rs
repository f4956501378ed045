//! Output-space points and line paths.

use serde::{Deserialize, Serialize};
use svg::node::Value;
use svg::node::element::path::Data;

/// A point in chart output coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One drawing command of a line path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
}

/// A piecewise-linear path: a move to the first point followed by a
/// line to each later point, in series order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinePath(Vec<PathCommand>);

impl LinePath {
    /// Build the path through `points` in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use adlens_export::geometry::{LinePath, PathCommand, Point};
    ///
    /// let path = LinePath::through(&[Point::new(60.0, 260.0), Point::new(470.0, 40.0)]);
    /// assert_eq!(path.commands()[0], PathCommand::MoveTo(Point::new(60.0, 260.0)));
    /// assert_eq!(path.to_svg_data(), "M60,260 L470,40");
    /// ```
    #[must_use]
    pub fn through(points: &[Point]) -> Self {
        Self(
            points
                .iter()
                .enumerate()
                .map(|(i, &p)| {
                    if i == 0 {
                        PathCommand::MoveTo(p)
                    } else {
                        PathCommand::LineTo(p)
                    }
                })
                .collect(),
        )
    }

    #[must_use]
    pub fn commands(&self) -> &[PathCommand] {
        &self.0
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Format as an SVG path `d` attribute.
    ///
    /// Coordinates are formatted by the [`svg`] crate using `f32`
    /// precision.
    #[must_use]
    pub fn to_svg_data(&self) -> String {
        let data = self.0.iter().fold(Data::new(), |data, command| match *command {
            PathCommand::MoveTo(p) => data.move_to((p.x, p.y)),
            PathCommand::LineTo(p) => data.line_to((p.x, p.y)),
        });
        String::from(Value::from(data))
    }
}
