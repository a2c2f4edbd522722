mod retained;

pub use retained::{Animation, Element, ElementId, RetainedSurface, Shape};

use std::fmt;
use std::time::Duration;

use crate::layout::{ArcPath, Coord};

#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    Number(f64),
    Text(String),
}

impl AttrValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.parse().ok(),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => t * (2.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

/// The primitives a diagram needs from whatever paints it. Handles are
/// opaque to the core; it only hands them back to the same surface.
pub trait DrawingSurface {
    type Handle: Copy + Eq + fmt::Debug;

    fn create_circle(&mut self, center: Coord, radius: f64) -> Self::Handle;

    fn create_path(&mut self, path: &ArcPath) -> Self::Handle;

    fn add_class(&mut self, handle: Self::Handle, class: &str);

    fn remove_class(&mut self, handle: Self::Handle, class: &str);

    fn has_class(&self, handle: Self::Handle, class: &str) -> bool;

    fn set_attribute(&mut self, handle: Self::Handle, name: &str, value: AttrValue);

    fn attribute(&self, handle: Self::Handle, name: &str) -> Option<AttrValue>;

    fn animate(
        &mut self,
        handle: Self::Handle,
        targets: &[(&str, AttrValue)],
        duration: Duration,
        easing: Easing,
    );

    /// Moves the element above every other element.
    fn raise_to_front(&mut self, handle: Self::Handle);

    fn remove(&mut self, handle: Self::Handle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_hits_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
        ] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
        }
        assert!(Easing::EaseOut.apply(0.5) > 0.5);
    }

    #[test]
    fn text_attributes_parse_as_numbers() {
        assert_eq!(AttrValue::from("2.5").as_number(), Some(2.5));
        assert_eq!(AttrValue::from("none").as_number(), None);
        assert_eq!(AttrValue::from(3.0).to_string(), "3");
    }
}
