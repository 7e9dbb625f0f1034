//! Easing curves.
//!
//! Names follow the GSAP vocabulary the page's stylesheet and markup were
//! designed around (`power4.out`, `power3.inOut`, `none`, ...).

use crate::result::{AnimatorError, AnimatorResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which end of the curve the easing applies to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EaseDirection {
    /// Slow start
    In,
    /// Slow finish
    Out,
    /// Slow start and finish
    InOut,
}

impl EaseDirection {
    fn suffix(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::InOut => "inOut",
        }
    }
}

/// Easing function mapping normalized time to normalized progress.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ease {
    /// Linear interpolation (`none`)
    Linear,
    /// Polynomial of degree `power + 1` (`power1` is quadratic)
    Power {
        /// 1 through 4
        power: u8,
        /// Curve direction
        direction: EaseDirection,
    },
    /// Sinusoidal
    Sine(EaseDirection),
    /// Bounce settling at the end
    BounceOut,
    /// CSS-style cubic bezier with control points (x1, y1, x2, y2)
    CubicBezier(f64, f64, f64, f64),
}

impl Default for Ease {
    fn default() -> Self {
        Self::Power {
            power: 1,
            direction: EaseDirection::Out,
        }
    }
}

impl Ease {
    /// `power4.out`, the page's default entrance curve
    pub const POWER4_OUT: Self = Self::Power {
        power: 4,
        direction: EaseDirection::Out,
    };

    /// `power3.inOut`, used by the testimonial slider
    pub const POWER3_IN_OUT: Self = Self::Power {
        power: 3,
        direction: EaseDirection::InOut,
    };

    /// Evaluate the easing function at time t (0.0-1.0).
    ///
    /// Returns the interpolated value; `t` is clamped first.
    #[must_use]
    pub fn evaluate(&self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match *self {
            Self::Linear => t,
            Self::Power { power, direction } => {
                let exp = i32::from(power) + 1;
                match direction {
                    EaseDirection::In => t.powi(exp),
                    EaseDirection::Out => 1.0 - (1.0 - t).powi(exp),
                    EaseDirection::InOut => {
                        if t < 0.5 {
                            0.5 * (2.0 * t).powi(exp)
                        } else {
                            1.0 - 0.5 * (2.0 * (1.0 - t)).powi(exp)
                        }
                    }
                }
            }
            Self::Sine(direction) => {
                use std::f64::consts::FRAC_PI_2;
                match direction {
                    EaseDirection::In => 1.0 - (t * FRAC_PI_2).cos(),
                    EaseDirection::Out => (t * FRAC_PI_2).sin(),
                    EaseDirection::InOut => -0.5 * ((std::f64::consts::PI * t).cos() - 1.0),
                }
            }
            Self::BounceOut => bounce_ease_out(t),
            Self::CubicBezier(x1, y1, x2, y2) => cubic_bezier(t, x1, y1, x2, y2),
        }
    }

    /// Canonical name, parseable by [`FromStr`]
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Linear => "none".to_string(),
            Self::Power { power, direction } => format!("power{power}.{}", direction.suffix()),
            Self::Sine(direction) => format!("sine.{}", direction.suffix()),
            Self::BounceOut => "bounce.out".to_string(),
            Self::CubicBezier(x1, y1, x2, y2) => format!("cubic-bezier({x1},{y1},{x2},{y2})"),
        }
    }
}

impl FromStr for Ease {
    type Err = AnimatorError;

    fn from_str(s: &str) -> AnimatorResult<Self> {
        let name = s.trim();
        let unknown = || AnimatorError::UnknownEase {
            name: name.to_string(),
        };

        if name == "none" || name == "linear" {
            return Ok(Self::Linear);
        }
        if let Some(args) = name
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let values: Vec<f64> = args
                .split(',')
                .map(|v| v.trim().parse::<f64>())
                .collect::<Result<_, _>>()
                .map_err(|_| unknown())?;
            return match values.as_slice() {
                [x1, y1, x2, y2] if (0.0..=1.0).contains(x1) && (0.0..=1.0).contains(x2) => {
                    Ok(Self::CubicBezier(*x1, *y1, *x2, *y2))
                }
                _ => Err(unknown()),
            };
        }

        // a bare family name defaults to `.out`
        let (family, dir) = name.split_once('.').unwrap_or((name, "out"));
        let direction = match dir {
            "in" => EaseDirection::In,
            "out" => EaseDirection::Out,
            "inOut" => EaseDirection::InOut,
            _ => return Err(unknown()),
        };

        match family {
            "power1" | "quad" => Ok(Self::Power { power: 1, direction }),
            "power2" | "cubic" => Ok(Self::Power { power: 2, direction }),
            "power3" | "quart" => Ok(Self::Power { power: 3, direction }),
            "power4" | "quint" | "strong" => Ok(Self::Power { power: 4, direction }),
            "sine" => Ok(Self::Sine(direction)),
            "bounce" if direction == EaseDirection::Out => Ok(Self::BounceOut),
            _ => Err(unknown()),
        }
    }
}

impl TryFrom<String> for Ease {
    type Error = AnimatorError;

    fn try_from(value: String) -> AnimatorResult<Self> {
        value.parse()
    }
}

impl From<Ease> for String {
    fn from(ease: Ease) -> Self {
        ease.name()
    }
}

impl std::fmt::Display for Ease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}

fn bounce_ease_out(t: f64) -> f64 {
    if t < 1.0 / 2.75 {
        7.5625 * t * t
    } else if t < 2.0 / 2.75 {
        let t = t - 1.5 / 2.75;
        7.5625 * t * t + 0.75
    } else if t < 2.5 / 2.75 {
        let t = t - 2.25 / 2.75;
        7.5625 * t * t + 0.9375
    } else {
        let t = t - 2.625 / 2.75;
        7.5625 * t * t + 0.984_375
    }
}

/// Solve the bezier for x == t (Newton, then bisection), return y.
fn cubic_bezier(t: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let coord = |s: f64, p1: f64, p2: f64| {
        let ms = 1.0 - s;
        3.0 * ms * ms * s * p1 + 3.0 * ms * s * s * p2 + s * s * s
    };
    let slope = |s: f64, p1: f64, p2: f64| {
        let ms = 1.0 - s;
        3.0 * ms * ms * p1 + 6.0 * ms * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
    };

    let mut s = t;
    for _ in 0..8 {
        let err = coord(s, x1, x2) - t;
        if err.abs() < 1e-7 {
            return coord(s, y1, y2);
        }
        let d = slope(s, x1, x2);
        if d.abs() < 1e-6 {
            break;
        }
        s -= err / d;
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    s = t;
    for _ in 0..50 {
        let x = coord(s, x1, x2);
        if (x - t).abs() < 1e-7 {
            break;
        }
        if x < t {
            lo = s;
        } else {
            hi = s;
        }
        s = 0.5 * (lo + hi);
    }
    coord(s, y1, y2)
}

/// A sampled point on an easing curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe {
    /// Normalized time (0.0-1.0)
    pub t: f64,
    /// Eased value
    pub value: f64,
}

/// Sample an easing function at N equally spaced points.
#[must_use]
pub fn sample_ease(ease: &Ease, num_samples: usize) -> Vec<Keyframe> {
    if num_samples == 0 {
        return Vec::new();
    }
    if num_samples == 1 {
        return vec![Keyframe {
            t: 0.0,
            value: ease.evaluate(0.0),
        }];
    }

    (0..num_samples)
        .map(|i| {
            let t = i as f64 / (num_samples - 1) as f64;
            Keyframe {
                t,
                value: ease.evaluate(t),
            }
        })
        .collect()
}
