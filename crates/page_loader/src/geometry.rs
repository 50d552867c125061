//! Viewport geometry for proximity checks.
//!
//! All values are CSS pixels in document coordinates. The root used for
//! visibility decisions is the viewport rectangle grown (or shrunk) by a
//! `RootMargin`, mirroring the `rootMargin` of the web's intersection
//! observer.

use anyhow::{Error, anyhow, bail};
use core::fmt;
use core::str::FromStr;
use serde::Serialize;

/// Axis-aligned rectangle in document coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width, never negative
    pub width: f32,
    /// Height, never negative
    pub height: f32,
}

impl Rect {
    /// Construct a rectangle, clamping negative sizes to zero.
    #[inline]
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Right edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Area in square pixels
    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Overlap of two rectangles. Edge-adjacent rectangles overlap with a
    /// zero-sized result.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        (left <= right && top <= bottom).then(|| Self::new(left, top, right - left, bottom - top))
    }
}

/// Scroll position and size of the visible area.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Viewport {
    /// Horizontal scroll offset
    pub scroll_x: f32,
    /// Vertical scroll offset
    pub scroll_y: f32,
    /// Visible width
    pub width: f32,
    /// Visible height
    pub height: f32,
}

impl Viewport {
    /// An unscrolled viewport of the given size.
    #[inline]
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width,
            height,
        }
    }

    /// Same size, scrolled vertically to `scroll_y`.
    #[inline]
    #[must_use]
    pub const fn scrolled_to(self, scroll_y: f32) -> Self {
        Self { scroll_y, ..self }
    }

    /// The visible area in document coordinates.
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.scroll_x, self.scroll_y, self.width, self.height)
    }
}

/// A margin length: absolute pixels or a percentage of the root size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    /// CSS pixels
    Px(f32),
    /// Percentage of the root's width (left/right) or height (top/bottom)
    Percent(f32),
}

impl Length {
    /// Resolve against the root dimension on the same axis.
    #[inline]
    pub fn resolve(self, basis: f32) -> f32 {
        match self {
            Self::Px(px) => px,
            Self::Percent(pct) => basis * pct / 100.0,
        }
    }
}

impl FromStr for Length {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let (number, percent) = if let Some(num) = trimmed.strip_suffix("px") {
            (num, false)
        } else if let Some(num) = trimmed.strip_suffix('%') {
            (num, true)
        } else if trimmed == "0" {
            (trimmed, false)
        } else {
            bail!("margin length {trimmed:?} must be in px or %");
        };
        let value = number
            .parse::<f32>()
            .map_err(|err| anyhow!("invalid margin length {trimmed:?}: {err}"))?;
        if !value.is_finite() {
            bail!("margin length {trimmed:?} is not finite");
        }
        Ok(if percent {
            Self::Percent(value)
        } else {
            Self::Px(value)
        })
    }
}

impl fmt::Display for Length {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(px) => write!(formatter, "{px}px"),
            Self::Percent(pct) => write!(formatter, "{pct}%"),
        }
    }
}

/// Proximity margin around the viewport, in CSS shorthand order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootMargin {
    /// Top edge offset
    pub top: Length,
    /// Right edge offset
    pub right: Length,
    /// Bottom edge offset
    pub bottom: Length,
    /// Left edge offset
    pub left: Length,
}

impl RootMargin {
    /// Default proximity below the viewport bottom.
    pub const DEFAULT_BOTTOM_PX: f32 = 320.0;

    /// Margin that only extends the bottom edge.
    #[inline]
    #[must_use]
    pub const fn bottom_px(px: f32) -> Self {
        Self {
            top: Length::Px(0.0),
            right: Length::Px(0.0),
            bottom: Length::Px(px),
            left: Length::Px(0.0),
        }
    }

    /// Grow `root` by this margin. Negative margins shrink it.
    pub fn expand(&self, root: Rect) -> Rect {
        let top = self.top.resolve(root.height);
        let bottom = self.bottom.resolve(root.height);
        let left = self.left.resolve(root.width);
        let right = self.right.resolve(root.width);
        Rect::new(
            root.x - left,
            root.y - top,
            root.width + left + right,
            root.height + top + bottom,
        )
    }
}

impl Default for RootMargin {
    fn default() -> Self {
        Self::bottom_px(Self::DEFAULT_BOTTOM_PX)
    }
}

impl FromStr for RootMargin {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let parts = raw
            .split_whitespace()
            .map(str::parse::<Length>)
            .collect::<Result<Vec<_>, _>>()?;
        let (top, right, bottom, left) = match parts.as_slice() {
            [all] => (*all, *all, *all, *all),
            [vertical, horizontal] => (*vertical, *horizontal, *vertical, *horizontal),
            [top, horizontal, bottom] => (*top, *horizontal, *bottom, *horizontal),
            [top, right, bottom, left] => (*top, *right, *bottom, *left),
            _ => bail!("root margin {raw:?} must have one to four lengths"),
        };
        Ok(Self {
            top,
            right,
            bottom,
            left,
        })
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{} {} {} {}",
            self.top, self.right, self.bottom, self.left
        )
    }
}

/// Result of testing a target against a root rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    /// Overlap area divided by target area, in `[0, 1]`
    pub ratio: f32,
    /// Whether the rectangles touch or overlap
    pub is_intersecting: bool,
}

/// Test `target` against `root`.
///
/// A zero-area target that touches the root counts as fully visible.
pub fn intersect(target: &Rect, root: &Rect) -> Intersection {
    let Some(overlap) = target.intersection(root) else {
        return Intersection {
            ratio: 0.0,
            is_intersecting: false,
        };
    };
    let area = target.area();
    let ratio = if area > 0.0 {
        (overlap.area() / area).clamp(0.0, 1.0)
    } else {
        1.0
    };
    Intersection {
        ratio,
        is_intersecting: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margin_shorthand_follows_css_order() -> Result<(), Error> {
        let one: RootMargin = "320px".parse()?;
        assert_eq!(one.left, Length::Px(320.0));
        let two: RootMargin = "10px 5%".parse()?;
        assert_eq!(two.bottom, Length::Px(10.0));
        assert_eq!(two.right, Length::Percent(5.0));
        let four: RootMargin = "0px 0px 320px 0px".parse()?;
        assert_eq!(four, RootMargin::default());
        assert!("1px 2px 3px 4px 5px".parse::<RootMargin>().is_err());
        assert!("12em".parse::<RootMargin>().is_err());
        Ok(())
    }

    #[test]
    fn default_margin_extends_viewport_bottom() {
        let root = RootMargin::default().expand(Viewport::new(1280.0, 800.0).rect());
        assert!((root.bottom() - 1120.0).abs() < f32::EPSILON);
        assert!(root.y.abs() < f32::EPSILON);
    }

    #[test]
    fn percentage_margins_resolve_per_axis() {
        let margin = RootMargin {
            top: Length::Percent(10.0),
            right: Length::Percent(10.0),
            bottom: Length::Px(0.0),
            left: Length::Px(0.0),
        };
        let root = margin.expand(Rect::new(0.0, 0.0, 1000.0, 500.0));
        assert!((root.y + 50.0).abs() < f32::EPSILON);
        assert!((root.width - 1100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn ratio_is_overlap_over_target_area() {
        let root = Rect::new(0.0, 0.0, 100.0, 100.0);
        let half = intersect(&Rect::new(0.0, 50.0, 100.0, 100.0), &root);
        assert!(half.is_intersecting);
        assert!((half.ratio - 0.5).abs() < f32::EPSILON);

        let touching = intersect(&Rect::new(0.0, 100.0, 100.0, 100.0), &root);
        assert!(touching.is_intersecting);
        assert!(touching.ratio.abs() < f32::EPSILON);

        let outside = intersect(&Rect::new(0.0, 101.0, 100.0, 100.0), &root);
        assert!(!outside.is_intersecting);

        let empty = intersect(&Rect::new(10.0, 10.0, 0.0, 0.0), &root);
        assert!((empty.ratio - 1.0).abs() < f32::EPSILON);
    }
}
