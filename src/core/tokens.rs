//! Size and duration tokens (`60vh`, `400px`, `0.5s`, `250ms`).

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{StackError, StackResult};

/// Largest card height a size token may resolve to, in absolute units.
pub const MAX_CARD_HEIGHT: f64 = 500.0;

/// A length either relative to the viewport or absolute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeToken {
    /// Percentage of the viewport height (`60vh`).
    ViewportHeight(f64),
    /// Absolute units (`400px` or a bare `400`).
    Units(f64),
}

impl SizeToken {
    /// Resolve against a viewport, capped at [`MAX_CARD_HEIGHT`].
    pub fn resolve(self, viewport_height: f64) -> f64 {
        let raw = match self {
            SizeToken::ViewportHeight(pct) => viewport_height * pct / 100.0,
            SizeToken::Units(u) => u,
        };
        raw.clamp(0.0, MAX_CARD_HEIGHT)
    }
}

impl Default for SizeToken {
    fn default() -> Self {
        SizeToken::ViewportHeight(60.0)
    }
}

impl FromStr for SizeToken {
    type Err = StackError;

    fn from_str(s: &str) -> StackResult<Self> {
        let s = s.trim();
        let (number, build): (&str, fn(f64) -> SizeToken) = if let Some(n) = s.strip_suffix("vh") {
            (n, SizeToken::ViewportHeight)
        } else if let Some(n) = s.strip_suffix("px") {
            (n, SizeToken::Units)
        } else {
            (s, SizeToken::Units)
        };
        match number.trim().parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => Ok(build(v)),
            _ => Err(StackError::token("size", s)),
        }
    }
}

impl fmt::Display for SizeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeToken::ViewportHeight(v) => write!(f, "{v}vh"),
            SizeToken::Units(v) => write!(f, "{v}px"),
        }
    }
}

/// Parse `0.5s` / `500ms` into a [`Duration`].
pub fn parse_duration(s: &str) -> StackResult<Duration> {
    let s = s.trim();
    let (number, millis_per_unit) = if let Some(n) = s.strip_suffix("ms") {
        (n, 1.0)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1000.0)
    } else {
        return Err(StackError::token("duration", s));
    };
    match number.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => {
            Ok(Duration::from_millis((v * millis_per_unit).round() as u64))
        }
        _ => Err(StackError::token("duration", s)),
    }
}

/// Inverse of [`parse_duration`], preferring seconds when exact.
pub fn format_duration(d: Duration) -> String {
    let ms = d.as_millis();
    if ms % 1000 == 0 || ms >= 1000 {
        format!("{}s", d.as_secs_f64())
    } else {
        format!("{ms}ms")
    }
}
