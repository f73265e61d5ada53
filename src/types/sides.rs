//! Per-side values for the six faces of a box domain.
//!
//! Named fields instead of a `[T; 6]` so nobody has to remember whether
//! index 3 is `y_upper` or `z_lower`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::FaceNormal;

/// One value per side of a box: x_lower, x_upper, y_lower, y_upper,
/// z_lower, z_upper.
///
/// # Example
///
/// ```
/// use richards_fv::types::{BoxSides, FaceNormal};
///
/// let sides = BoxSides::uniform(0.0).with(FaceNormal::ZUpper, -1.5);
/// assert_eq!(sides.z_upper, -1.5);
/// assert_eq!(*sides.get(FaceNormal::XLower), 0.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxSides<T> {
    /// West side (x = x_min)
    pub x_lower: T,
    /// East side (x = x_max)
    pub x_upper: T,
    /// South side (y = y_min)
    pub y_lower: T,
    /// North side (y = y_max)
    pub y_upper: T,
    /// Bottom (z = z_min)
    pub z_lower: T,
    /// Land surface (z = z_max)
    pub z_upper: T,
}

impl<T> BoxSides<T> {
    /// Order: x_lower, x_upper, y_lower, y_upper, z_lower, z_upper.
    pub fn new(x_lower: T, x_upper: T, y_lower: T, y_upper: T, z_lower: T, z_upper: T) -> Self {
        Self {
            x_lower,
            x_upper,
            y_lower,
            y_upper,
            z_lower,
            z_upper,
        }
    }

    /// Create with the same value on all sides.
    pub fn uniform(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            x_lower: value.clone(),
            x_upper: value.clone(),
            y_lower: value.clone(),
            y_upper: value.clone(),
            z_lower: value.clone(),
            z_upper: value,
        }
    }

    /// Replace the value on one side.
    pub fn with(mut self, side: FaceNormal, value: T) -> Self {
        *self.get_mut(side) = value;
        self
    }

    /// Map a function over all sides.
    pub fn map<U, F>(self, mut f: F) -> BoxSides<U>
    where
        F: FnMut(T) -> U,
    {
        BoxSides {
            x_lower: f(self.x_lower),
            x_upper: f(self.x_upper),
            y_lower: f(self.y_lower),
            y_upper: f(self.y_upper),
            z_lower: f(self.z_lower),
            z_upper: f(self.z_upper),
        }
    }

    /// Value on the side whose outward normal is `side`.
    pub fn get(&self, side: FaceNormal) -> &T {
        match side {
            FaceNormal::XLower => &self.x_lower,
            FaceNormal::XUpper => &self.x_upper,
            FaceNormal::YLower => &self.y_lower,
            FaceNormal::YUpper => &self.y_upper,
            FaceNormal::ZLower => &self.z_lower,
            FaceNormal::ZUpper => &self.z_upper,
        }
    }

    pub fn get_mut(&mut self, side: FaceNormal) -> &mut T {
        match side {
            FaceNormal::XLower => &mut self.x_lower,
            FaceNormal::XUpper => &mut self.x_upper,
            FaceNormal::YLower => &mut self.y_lower,
            FaceNormal::YUpper => &mut self.y_upper,
            FaceNormal::ZLower => &mut self.z_lower,
            FaceNormal::ZUpper => &mut self.z_upper,
        }
    }

    /// Iterate over `(normal, value)` in [`FaceNormal::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (FaceNormal, &T)> {
        FaceNormal::ALL.into_iter().map(move |n| (n, self.get(n)))
    }
}

impl<T: Default> Default for BoxSides<T> {
    fn default() -> Self {
        Self {
            x_lower: T::default(),
            x_upper: T::default(),
            y_lower: T::default(),
            y_upper: T::default(),
            z_lower: T::default(),
            z_upper: T::default(),
        }
    }
}

impl<T: fmt::Display> fmt::Display for BoxSides<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "-x:{} +x:{} -y:{} +y:{} -z:{} +z:{}",
            self.x_lower, self.x_upper, self.y_lower, self.y_upper, self.z_lower, self.z_upper
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_matches_fields() {
        let sides = BoxSides::new(1, 2, 3, 4, 5, 6);
        assert_eq!(*sides.get(FaceNormal::XLower), 1);
        assert_eq!(*sides.get(FaceNormal::XUpper), 2);
        assert_eq!(*sides.get(FaceNormal::YLower), 3);
        assert_eq!(*sides.get(FaceNormal::YUpper), 4);
        assert_eq!(*sides.get(FaceNormal::ZLower), 5);
        assert_eq!(*sides.get(FaceNormal::ZUpper), 6);
    }

    #[test]
    fn test_iter_order() {
        let sides = BoxSides::new('a', 'b', 'c', 'd', 'e', 'f');
        let collected: String = sides.iter().map(|(_, c)| *c).collect();
        assert_eq!(collected, "abcdef");
    }

    #[test]
    fn test_map_and_with() {
        let sides = BoxSides::uniform(2).with(FaceNormal::YUpper, 7).map(|v| v * 10);
        assert_eq!(sides.y_upper, 70);
        assert_eq!(sides.z_lower, 20);
    }

    #[test]
    fn test_display() {
        let sides = BoxSides::new(1, 2, 3, 4, 5, 6);
        assert_eq!(format!("{}", sides), "-x:1 +x:2 -y:3 +y:4 -z:5 +z:6");
    }

    #[test]
    fn test_serde_roundtrip() {
        let sides = BoxSides::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        let json = serde_json::to_string(&sides).unwrap();
        let back: BoxSides<f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sides);
    }
}
