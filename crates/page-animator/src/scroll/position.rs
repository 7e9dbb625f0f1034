//! Scroll positions: where an element edge meets a viewport edge.

use crate::result::{AnimatorError, AnimatorResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A point along an element or the viewport
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Anchor {
    /// Fraction of the size: `top`/`left` = 0, `center` = 0.5, `bottom`/`right` = 1, `N%`
    Ratio(f64),
    /// Fixed offset from the leading edge: `Npx` or a bare number
    Pixels(f64),
}

impl Anchor {
    /// Offset from the leading edge of something `size` long
    #[must_use]
    pub fn offset(&self, size: f64) -> f64 {
        match *self {
            Self::Ratio(r) => r * size,
            Self::Pixels(px) => px,
        }
    }

    fn parse(token: &str, input: &str) -> AnimatorResult<Self> {
        let number = |text: &str| {
            text.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| AnimatorError::scroll_position(input, format!("bad offset '{token}'")))
        };
        match token {
            "top" | "left" => Ok(Self::Ratio(0.0)),
            "center" => Ok(Self::Ratio(0.5)),
            "bottom" | "right" => Ok(Self::Ratio(1.0)),
            _ => {
                if let Some(pct) = token.strip_suffix('%') {
                    Ok(Self::Ratio(number(pct)? / 100.0))
                } else if let Some(px) = token.strip_suffix("px") {
                    Ok(Self::Pixels(number(px)?))
                } else {
                    Ok(Self::Pixels(number(token)?))
                }
            }
        }
    }
}

/// Start or end of a scroll trigger.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ScrollPosition {
    /// `"<element anchor> <viewport anchor>"`, e.g. `"top 85%"`
    Edges {
        /// Point on the trigger element
        element: Anchor,
        /// Point on the viewport
        viewport: Anchor,
    },
    /// `"+=N"`: N pixels past the start (only meaningful as an end)
    AfterStart(f64),
}

impl ScrollPosition {
    /// `top top`
    pub const TOP_TOP: Self = Self::Edges {
        element: Anchor::Ratio(0.0),
        viewport: Anchor::Ratio(0.0),
    };

    /// `bottom top`, the default end
    pub const BOTTOM_TOP: Self = Self::Edges {
        element: Anchor::Ratio(1.0),
        viewport: Anchor::Ratio(0.0),
    };

    /// Scroll offset at which this position is reached.
    ///
    /// `element_start` and `element_size` are along the scroll axis;
    /// `start` is the already-resolved start for relative ends.
    #[must_use]
    pub fn resolve(&self, element_start: f64, element_size: f64, viewport_size: f64, start: f64) -> f64 {
        match *self {
            Self::Edges { element, viewport } => {
                element_start + element.offset(element_size) - viewport.offset(viewport_size)
            }
            Self::AfterStart(distance) => start + distance,
        }
    }
}

impl FromStr for ScrollPosition {
    type Err = AnimatorError;

    fn from_str(s: &str) -> AnimatorResult<Self> {
        let input = s.trim();
        if let Some(rest) = input.strip_prefix("+=") {
            let distance = rest
                .trim()
                .trim_end_matches("px")
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .ok_or_else(|| AnimatorError::scroll_position(input, "bad relative distance"))?;
            return Ok(Self::AfterStart(distance));
        }

        let mut tokens = input.split_whitespace();
        let element = tokens
            .next()
            .ok_or_else(|| AnimatorError::scroll_position(input, "empty position"))?;
        let viewport = tokens
            .next()
            .ok_or_else(|| AnimatorError::scroll_position(input, "missing viewport edge"))?;
        if tokens.next().is_some() {
            return Err(AnimatorError::scroll_position(input, "too many parts"));
        }
        Ok(Self::Edges {
            element: Anchor::parse(element, input)?,
            viewport: Anchor::parse(viewport, input)?,
        })
    }
}

impl TryFrom<String> for ScrollPosition {
    type Error = AnimatorError;

    fn try_from(value: String) -> AnimatorResult<Self> {
        value.parse()
    }
}

impl From<ScrollPosition> for String {
    fn from(position: ScrollPosition) -> Self {
        position.to_string()
    }
}

impl std::fmt::Display for ScrollPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let anchor = |a: Anchor| match a {
            Anchor::Ratio(r) => format!("{}%", r * 100.0),
            Anchor::Pixels(px) => format!("{px}px"),
        };
        match *self {
            Self::Edges { element, viewport } => {
                write!(f, "{} {}", anchor(element), anchor(viewport))
            }
            Self::AfterStart(d) => write!(f, "+={d}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveal_start() {
        let pos: ScrollPosition = "top 85%".parse().unwrap();
        // element at 2000px, viewport 800px tall: 2000 - 680
        assert!((pos.resolve(2000.0, 300.0, 800.0, 0.0) - 1320.0).abs() < 1e-9);
    }

    #[test]
    fn test_nav_start_negative_pixels() {
        let pos: ScrollPosition = "top -50px".parse().unwrap();
        assert_eq!(pos.resolve(0.0, 5000.0, 800.0, 0.0), 50.0);
    }

    #[test]
    fn test_bottom_top_end() {
        let pos: ScrollPosition = "bottom top".parse().unwrap();
        assert_eq!(pos, ScrollPosition::BOTTOM_TOP);
        assert_eq!(pos.resolve(100.0, 400.0, 800.0, 0.0), 500.0);
    }

    #[test]
    fn test_horizontal_keywords() {
        let pos: ScrollPosition = "left 90%".parse().unwrap();
        assert!((pos.resolve(1500.0, 400.0, 1000.0, 0.0) - 600.0).abs() < 1e-9);
        let right: ScrollPosition = "right center".parse().unwrap();
        assert_eq!(right.resolve(0.0, 400.0, 1000.0, 0.0), -100.0);
    }

    #[test]
    fn test_relative_end() {
        let pos: ScrollPosition = "+=1200".parse().unwrap();
        assert_eq!(pos, ScrollPosition::AfterStart(1200.0));
        assert_eq!(pos.resolve(0.0, 0.0, 0.0, 300.0), 1500.0);
        assert!("+=-5".parse::<ScrollPosition>().is_err());
    }

    #[test]
    fn test_parse_errors() {
        let err = "top".parse::<ScrollPosition>().unwrap_err();
        assert!(err.to_string().contains("missing viewport edge"));
        assert!("".parse::<ScrollPosition>().is_err());
        assert!("top 85% extra".parse::<ScrollPosition>().is_err());
        assert!("top eighty%".parse::<ScrollPosition>().is_err());
    }

    #[test]
    fn test_serde_string_form() {
        let pos: ScrollPosition = serde_json::from_str("\"top 50%\"").unwrap();
        let json = serde_json::to_string(&pos).unwrap();
        let again: ScrollPosition = serde_json::from_str(&json).unwrap();
        assert_eq!(pos, again);
    }
}
