//! Edge anchor-side selection.
//!
//! Each node is treated as its bounding box, with one anchor at the middle of each side. An edge
//! leaves its source through one anchor and enters its target through another:
//! - with an `angle`, edges deviating from vertical by at most `angle / 2` connect top/bottom,
//!   all others connect left/right
//! - without one, the closest of the 4 x 4 anchor pairs wins, first pair in [`Side::ALL`] order
//!   on ties
//!
//! Coincident centers (self-loops included) always get `(Top, Top)`.

use crate::error::{Error, Result};
use crate::geom::{Point, vector};
use semgraph_core::Side;

const COINCIDENT_EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeBox {
    pub center: Point,
    pub width: f64,
    pub height: f64,
}

impl NodeBox {
    pub fn new(center: Point, width: f64, height: f64) -> Self {
        Self {
            center,
            width,
            height,
        }
    }

    /// Middle of `side`, in plot space (y up).
    pub fn anchor(&self, side: Side) -> Point {
        let (hw, hh) = (self.width / 2.0, self.height / 2.0);
        match side {
            Side::Top => self.center + vector(0.0, hh),
            Side::Bottom => self.center + vector(0.0, -hh),
            Side::Left => self.center + vector(-hw, 0.0),
            Side::Right => self.center + vector(hw, 0.0),
        }
    }
}

pub fn validate_angle(angle: Option<f64>) -> Result<()> {
    match angle {
        Some(a) if !(a.is_finite() && (0.0..=180.0).contains(&a)) => {
            Err(Error::InvalidAngle { angle: a })
        }
        _ => Ok(()),
    }
}

fn coincident(from: &NodeBox, to: &NodeBox) -> bool {
    let d = to.center - from.center;
    d.x.abs() < COINCIDENT_EPS && d.y.abs() < COINCIDENT_EPS
}

/// Sides chosen by the angular rule.
fn sides_by_angle(from: &NodeBox, to: &NodeBox, angle: f64) -> (Side, Side) {
    let d = to.center - from.center;
    let deviation = d.x.abs().atan2(d.y.abs()).to_degrees();
    if deviation <= angle / 2.0 {
        if d.y > 0.0 {
            (Side::Top, Side::Bottom)
        } else {
            (Side::Bottom, Side::Top)
        }
    } else if d.x > 0.0 {
        (Side::Right, Side::Left)
    } else {
        (Side::Left, Side::Right)
    }
}

/// Closest anchor pair among the allowed sides.
fn nearest_sides(from: &NodeBox, to: &NodeBox, from_sides: &[Side], to_sides: &[Side]) -> (Side, Side) {
    let mut best = (from_sides[0], to_sides[0]);
    let mut best_dist = f64::INFINITY;
    for &fs in from_sides {
        for &ts in to_sides {
            let dist = (to.anchor(ts) - from.anchor(fs)).length();
            if dist < best_dist {
                best_dist = dist;
                best = (fs, ts);
            }
        }
    }
    best
}

/// Picks the source and target side of an edge between `from` and `to`.
pub fn select_sides(from: &NodeBox, to: &NodeBox, angle: Option<f64>) -> Result<(Side, Side)> {
    resolve_sides(from, to, angle, None, None)
}

/// Like [`select_sides`], keeping any side that is already fixed.
pub fn resolve_sides(
    from: &NodeBox,
    to: &NodeBox,
    angle: Option<f64>,
    fixed_from: Option<Side>,
    fixed_to: Option<Side>,
) -> Result<(Side, Side)> {
    validate_angle(angle)?;
    if let (Some(f), Some(t)) = (fixed_from, fixed_to) {
        return Ok((f, t));
    }
    if coincident(from, to) {
        return Ok((fixed_from.unwrap_or(Side::Top), fixed_to.unwrap_or(Side::Top)));
    }
    let sides = match angle {
        Some(angle) => {
            let (f, t) = sides_by_angle(from, to, angle);
            (fixed_from.unwrap_or(f), fixed_to.unwrap_or(t))
        }
        None => {
            let from_sides = fixed_from.map_or(Side::ALL.to_vec(), |s| vec![s]);
            let to_sides = fixed_to.map_or(Side::ALL.to_vec(), |s| vec![s]);
            nearest_sides(from, to, &from_sides, &to_sides)
        }
    };
    tracing::trace!(from = %sides.0, to = %sides.1, ?angle, "anchored edge");
    Ok(sides)
}
