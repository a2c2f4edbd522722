use serde::Deserialize;

use crate::error::{Result, ThreadArcsError};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn label(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

/// How arc directions are chosen during a draw pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArcPlacement {
    /// Each arc keeps the direction stored on its adjacency entry.
    #[default]
    Signed,
    /// A node's arcs go to the positive side and its targets' arcs to the
    /// negative side; the first placement of an edge wins.
    Alternating,
}

/// Caller-facing options. Every field is optional; unset fields fall back to
/// defaults derived from the other options in [`ThreadArcsOptions::resolve`].
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThreadArcsOptions {
    pub space: Option<f64>,
    pub max_arc_height: Option<f64>,
    pub padding: Option<f64>,
    pub lambda: Option<f64>,
    pub radius: Option<f64>,
    pub orientation: Option<Orientation>,
    pub axis_pos: Option<f64>,
    pub size: Option<f64>,
    pub disable_tooltip: bool,
    pub placement: Option<ArcPlacement>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    pub space: f64,
    pub max_arc_height: f64,
    pub padding: f64,
    pub lambda: f64,
    pub radius: f64,
    pub orientation: Orientation,
    pub axis_pos: f64,
    pub size: f64,
    pub disable_tooltip: bool,
    pub placement: ArcPlacement,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            space: 40.0,
            max_arc_height: 100.0,
            padding: 20.0,
            lambda: 0.5,
            radius: 5.0,
            orientation: Orientation::Horizontal,
            axis_pos: 100.0,
            size: 200.0,
            disable_tooltip: false,
            placement: ArcPlacement::Signed,
        }
    }
}

impl ThreadArcsOptions {
    /// Overlays `other` on top of `self`: fields set in `other` win.
    pub fn merged_with(&self, other: &ThreadArcsOptions) -> ThreadArcsOptions {
        ThreadArcsOptions {
            space: other.space.or(self.space),
            max_arc_height: other.max_arc_height.or(self.max_arc_height),
            padding: other.padding.or(self.padding),
            lambda: other.lambda.or(self.lambda),
            radius: other.radius.or(self.radius),
            orientation: other.orientation.or(self.orientation),
            axis_pos: other.axis_pos.or(self.axis_pos),
            size: other.size.or(self.size),
            disable_tooltip: self.disable_tooltip || other.disable_tooltip,
            placement: other.placement.or(self.placement),
        }
    }

    pub fn resolve(&self) -> Result<LayoutConfig> {
        let defaults = LayoutConfig::default();

        let space = positive("space", self.space.unwrap_or(defaults.space))?;
        let max_arc_height = positive(
            "maxArcHeight",
            self.max_arc_height.unwrap_or(defaults.max_arc_height),
        )?;
        let padding = non_negative("padding", self.padding.unwrap_or(space / 2.0))?;
        let lambda = positive("lambda", self.lambda.unwrap_or(defaults.lambda))?;
        let radius = positive("radius", self.radius.unwrap_or(defaults.radius))?;
        let axis_pos = finite("axisPos", self.axis_pos.unwrap_or(max_arc_height))?;
        let size = non_negative("size", self.size.unwrap_or(max_arc_height * 2.0))?;

        Ok(LayoutConfig {
            space,
            max_arc_height,
            padding,
            lambda,
            radius,
            orientation: self.orientation.unwrap_or_default(),
            axis_pos,
            size,
            disable_tooltip: self.disable_tooltip,
            placement: self.placement.unwrap_or_default(),
        })
    }
}

fn finite(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ThreadArcsError::InvalidOption { name, value })
    }
}

fn positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ThreadArcsError::InvalidOption { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ThreadArcsError::InvalidOption { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_derive_from_space_and_arc_height() {
        let config = ThreadArcsOptions::default().resolve().unwrap();
        assert_eq!(config, LayoutConfig::default());

        let options = ThreadArcsOptions {
            space: Some(30.0),
            max_arc_height: Some(60.0),
            ..Default::default()
        };
        let config = options.resolve().unwrap();
        assert_eq!(config.padding, 15.0);
        assert_eq!(config.axis_pos, 60.0);
        assert_eq!(config.size, 120.0);
    }

    #[test]
    fn rejects_non_positive_spacing() {
        let options = ThreadArcsOptions {
            space: Some(0.0),
            ..Default::default()
        };
        assert_eq!(
            options.resolve(),
            Err(ThreadArcsError::InvalidOption {
                name: "space",
                value: 0.0
            })
        );
    }

    #[test]
    fn parses_camel_case_json() {
        let options: ThreadArcsOptions = serde_json::from_str(
            r#"{ "maxArcHeight": 80, "orientation": "vertical", "disableTooltip": true, "placement": "alternating" }"#,
        )
        .unwrap();
        assert_eq!(options.max_arc_height, Some(80.0));
        assert_eq!(options.orientation, Some(Orientation::Vertical));
        assert!(options.disable_tooltip);
        assert_eq!(options.placement, Some(ArcPlacement::Alternating));
    }

    #[test]
    fn later_options_override_earlier_ones() {
        let file = ThreadArcsOptions {
            space: Some(20.0),
            lambda: Some(1.0),
            ..Default::default()
        };
        let cli = ThreadArcsOptions {
            space: Some(50.0),
            ..Default::default()
        };
        let merged = file.merged_with(&cli);
        assert_eq!(merged.space, Some(50.0));
        assert_eq!(merged.lambda, Some(1.0));
    }
}
