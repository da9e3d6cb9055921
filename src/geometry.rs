//! Page geometry: sizes, page boxes and scale factors

use std::fmt;
use crate::error::{Error, Result};

/// Points per millimeter (1pt = 1/72 inch)
const POINTS_PER_MM: f64 = 72.0 / 25.4;

/// Page width and height in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// US Letter size (8.5" × 11"), the default when a page declares no box
    pub fn letter() -> Self {
        Self::new(612.0, 792.0)
    }

    /// A4 size (210mm × 297mm)
    pub fn a4() -> Self {
        Self::new(210.0 * POINTS_PER_MM, 297.0 * POINTS_PER_MM)
    }

    /// Both dimensions multiplied by `factor`
    pub fn scaled(&self, factor: ScaleFactor) -> Self {
        Self::new(self.width * factor.get(), self.height * factor.get())
    }

    pub fn width_mm(&self) -> f64 {
        self.width / POINTS_PER_MM
    }

    pub fn height_mm(&self) -> f64 {
        self.height / POINTS_PER_MM
    }

    /// Equal in both dimensions within `tolerance` points
    pub fn approx_eq(&self, other: &PageSize, tolerance: f64) -> bool {
        (self.width - other.width).abs() <= tolerance
            && (self.height - other.height).abs() <= tolerance
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2} x {:.2} pt ({:.1} x {:.1} mm)",
            self.width,
            self.height,
            self.width_mm(),
            self.height_mm()
        )
    }
}

/// A page box rectangle `[llx lly urx ury]` as stored in a PDF
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub llx: f64,
    pub lly: f64,
    pub urx: f64,
    pub ury: f64,
}

impl PageBox {
    /// Normalize corner order so width and height are never negative
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            llx: x1.min(x2),
            lly: y1.min(y2),
            urx: x1.max(x2),
            ury: y1.max(y2),
        }
    }

    pub fn size(&self) -> PageSize {
        PageSize::new(self.urx - self.llx, self.ury - self.lly)
    }

    /// Same lower-left corner, new width and height
    pub fn with_size(&self, size: PageSize) -> Self {
        Self {
            llx: self.llx,
            lly: self.lly,
            urx: self.llx + size.width,
            ury: self.lly + size.height,
        }
    }

    pub fn approx_eq(&self, other: &PageBox) -> bool {
        const EPSILON: f64 = 1e-3;
        (self.llx - other.llx).abs() < EPSILON
            && (self.lly - other.lly).abs() < EPSILON
            && (self.urx - other.urx).abs() < EPSILON
            && (self.ury - other.ury).abs() < EPSILON
    }
}

/// Uniform page scale factor, always positive and finite
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ScaleFactor(f64);

impl ScaleFactor {
    /// Factors offered to users by default
    pub const PRESETS: [f64; 6] = [0.5, 0.75, 1.0, 1.25, 1.5, 2.0];

    pub fn new(factor: f64) -> Result<Self> {
        if factor.is_finite() && factor > 0.0 {
            Ok(Self(factor))
        } else {
            Err(Error::InvalidScale(factor))
        }
    }

    pub fn get(&self) -> f64 {
        self.0
    }

    /// The factor that undoes this one
    pub fn inverse(&self) -> Result<Self> {
        Self::new(1.0 / self.0)
    }
}

impl Default for ScaleFactor {
    fn default() -> Self {
        Self(1.0)
    }
}

impl std::str::FromStr for ScaleFactor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().trim_end_matches('%');
        let value: f64 = trimmed
            .parse()
            .map_err(|_| Error::InvalidScale(f64::NAN))?;
        // "150%" is accepted as 1.5
        if s.trim().ends_with('%') {
            Self::new(value / 100.0)
        } else {
            Self::new(value)
        }
    }
}
