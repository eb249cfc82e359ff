use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::layout::Rect;

static LENGTH_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-]?(?:\d+(?:\.\d*)?|\.\d+))(px|%)?$").expect("valid length pattern")
});

/// Errors from parsing a root margin string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RootMarginError {
    #[error("Invalid root margin value '{0}': expected pixels or a percentage")]
    InvalidToken(String),

    #[error("Root margin takes 1 to 4 values, got {0}")]
    WrongArity(usize),
}

/// A margin length: absolute pixels or a percentage of the root size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f64),
    Percent(f64),
}

impl Default for Length {
    fn default() -> Self {
        Length::Px(0.0)
    }
}

impl Length {
    /// Resolve against the root dimension percentages refer to.
    pub fn resolve(&self, basis: f64) -> f64 {
        match self {
            Length::Px(px) => *px,
            Length::Percent(pct) => basis * pct / 100.0,
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Px(px) => write!(f, "{px}px"),
            Length::Percent(pct) => write!(f, "{pct}%"),
        }
    }
}

impl FromStr for Length {
    type Err = RootMarginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RootMarginError::InvalidToken(s.to_string());
        let caps = LENGTH_TOKEN.captures(s).ok_or_else(invalid)?;
        let value: f64 = caps[1].parse().map_err(|_| invalid())?;
        match caps.get(2).map(|m| m.as_str()) {
            Some("px") => Ok(Length::Px(value)),
            Some("%") => Ok(Length::Percent(value)),
            // A unitless length is only meaningful for zero.
            _ if value == 0.0 => Ok(Length::Px(0.0)),
            _ => Err(invalid()),
        }
    }
}

/// Margin grown around the root before intersecting, in CSS `margin` order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RootMargin {
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

impl RootMargin {
    pub const fn new(top: Length, right: Length, bottom: Length, left: Length) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub const fn all(length: Length) -> Self {
        Self::new(length, length, length, length)
    }

    /// Expand the root rectangle. Horizontal percentages refer to the root
    /// width, vertical ones to its height.
    pub fn apply(&self, root: Rect) -> Rect {
        root.expand(
            self.top.resolve(root.height),
            self.right.resolve(root.width),
            self.bottom.resolve(root.height),
            self.left.resolve(root.width),
        )
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

impl FromStr for RootMargin {
    type Err = RootMarginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split_whitespace()
            .map(Length::from_str)
            .collect::<Result<Vec<_>, _>>()?;

        match values.as_slice() {
            [] => Ok(RootMargin::default()),
            [all] => Ok(RootMargin::all(*all)),
            [vertical, horizontal] => Ok(RootMargin::new(
                *vertical,
                *horizontal,
                *vertical,
                *horizontal,
            )),
            [top, horizontal, bottom] => Ok(RootMargin::new(*top, *horizontal, *bottom, *horizontal)),
            [top, right, bottom, left] => Ok(RootMargin::new(*top, *right, *bottom, *left)),
            more => Err(RootMarginError::WrongArity(more.len())),
        }
    }
}
