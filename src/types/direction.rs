//! Grid axes and outward face normals.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coordinate axis of the structured grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in storage order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Array position of this axis.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Face normal pointing toward +axis.
    #[inline]
    pub const fn upper(self) -> FaceNormal {
        match self {
            Axis::X => FaceNormal::XUpper,
            Axis::Y => FaceNormal::YUpper,
            Axis::Z => FaceNormal::ZUpper,
        }
    }

    /// Face normal pointing toward -axis.
    #[inline]
    pub const fn lower(self) -> FaceNormal {
        match self {
            Axis::X => FaceNormal::XLower,
            Axis::Y => FaceNormal::YLower,
            Axis::Z => FaceNormal::ZLower,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// Outward unit normal of a cell face.
///
/// Exactly one component is non-zero, which the enum makes impossible to
/// violate.
///
/// # Example
///
/// ```
/// use richards_fv::types::{Axis, FaceNormal};
///
/// let n = FaceNormal::ZUpper;
/// assert_eq!(n.axis(), Axis::Z);
/// assert_eq!(n.sign(), 1.0);
/// assert_eq!(n.components(), [0, 0, 1]);
/// assert_eq!(n.opposite(), FaceNormal::ZLower);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceNormal {
    XLower,
    XUpper,
    YLower,
    YUpper,
    ZLower,
    ZUpper,
}

impl FaceNormal {
    /// All six normals: lower then upper per axis.
    pub const ALL: [FaceNormal; 6] = [
        FaceNormal::XLower,
        FaceNormal::XUpper,
        FaceNormal::YLower,
        FaceNormal::YUpper,
        FaceNormal::ZLower,
        FaceNormal::ZUpper,
    ];

    #[inline]
    pub const fn axis(self) -> Axis {
        match self {
            FaceNormal::XLower | FaceNormal::XUpper => Axis::X,
            FaceNormal::YLower | FaceNormal::YUpper => Axis::Y,
            FaceNormal::ZLower | FaceNormal::ZUpper => Axis::Z,
        }
    }

    /// True for normals pointing toward +axis.
    #[inline]
    pub const fn is_upper(self) -> bool {
        matches!(
            self,
            FaceNormal::XUpper | FaceNormal::YUpper | FaceNormal::ZUpper
        )
    }

    /// `+1.0` or `-1.0`.
    #[inline]
    pub const fn sign(self) -> f64 {
        if self.is_upper() { 1.0 } else { -1.0 }
    }

    /// Integer components `[dx, dy, dz]`.
    #[inline]
    pub const fn components(self) -> [i32; 3] {
        match self {
            FaceNormal::XLower => [-1, 0, 0],
            FaceNormal::XUpper => [1, 0, 0],
            FaceNormal::YLower => [0, -1, 0],
            FaceNormal::YUpper => [0, 1, 0],
            FaceNormal::ZLower => [0, 0, -1],
            FaceNormal::ZUpper => [0, 0, 1],
        }
    }

    /// Normal from integer components, `None` unless exactly one is ±1.
    pub fn from_components(c: [i32; 3]) -> Option<Self> {
        FaceNormal::ALL.into_iter().find(|n| n.components() == c)
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            FaceNormal::XLower => FaceNormal::XUpper,
            FaceNormal::XUpper => FaceNormal::XLower,
            FaceNormal::YLower => FaceNormal::YUpper,
            FaceNormal::YUpper => FaceNormal::YLower,
            FaceNormal::ZLower => FaceNormal::ZUpper,
            FaceNormal::ZUpper => FaceNormal::ZLower,
        }
    }
}

impl fmt::Display for FaceNormal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_upper() { '+' } else { '-' };
        write!(f, "{}{}", sign, self.axis())
    }
}
