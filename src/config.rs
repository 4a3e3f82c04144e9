use std::time::Duration;

use crate::layout::LayoutConfig;
use crate::ui::breadcrumb::BreadcrumbDims;

/// Recognized options for the sunburst view.
#[derive(Debug, Clone, PartialEq)]
pub struct SunburstConfig {
    /// Wedges narrower than this (radians) are not laid out or drawn
    pub visibility_threshold_radians: f64,
    /// Re-root (zoom) transition length
    pub zoom_transition_ms: u64,
    /// Leave-triggered opacity reset length
    pub reset_transition_ms: u64,
    /// Percentages below this print as "< {cutoff}%"
    pub percentage_low_cutoff: f64,
    pub percentage_significant_digits: u32,
    /// Opacity of wedges outside the hovered chain
    pub dimmed_opacity: f32,
    /// Logical size of the chart area (px); radius is half the smaller side
    pub chart_width: f32,
    pub chart_height: f32,
    pub breadcrumb: BreadcrumbDims,
}

impl Default for SunburstConfig {
    fn default() -> Self {
        Self {
            visibility_threshold_radians: 0.005, // 0.29 degrees
            zoom_transition_ms: 750,
            reset_transition_ms: 1000,
            percentage_low_cutoff: 0.1,
            percentage_significant_digits: 3,
            dimmed_opacity: 0.3,
            chart_width: 900.0,
            chart_height: 600.0,
            breadcrumb: BreadcrumbDims::default(),
        }
    }
}

impl SunburstConfig {
    /// Clamp every option into a usable range.
    pub fn validated(mut self) -> Self {
        if !self.visibility_threshold_radians.is_finite() || self.visibility_threshold_radians < 0.0 {
            self.visibility_threshold_radians = 0.0;
        }
        if !self.percentage_low_cutoff.is_finite() || self.percentage_low_cutoff < 0.0 {
            self.percentage_low_cutoff = 0.0;
        }
        self.percentage_significant_digits = self.percentage_significant_digits.clamp(1, 21);
        self.dimmed_opacity = self.dimmed_opacity.clamp(0.0, 1.0);
        self.chart_width = self.chart_width.max(1.0);
        self.chart_height = self.chart_height.max(1.0);
        self
    }

    pub fn zoom_duration(&self) -> Duration {
        Duration::from_millis(self.zoom_transition_ms)
    }

    pub fn reset_duration(&self) -> Duration {
        Duration::from_millis(self.reset_transition_ms)
    }

    pub fn chart_radius(&self) -> f32 {
        self.chart_width.min(self.chart_height) / 2.0
    }

    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            visibility_threshold: self.visibility_threshold_radians,
            ..LayoutConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_options() {
        let config = SunburstConfig::default();
        assert_eq!(config.visibility_threshold_radians, 0.005);
        assert_eq!(config.zoom_duration(), Duration::from_millis(750));
        assert_eq!(config.reset_duration(), Duration::from_millis(1000));
        assert_eq!(config.percentage_low_cutoff, 0.1);
        assert_eq!(config.percentage_significant_digits, 3);
        assert_eq!(config.chart_radius(), 300.0);
    }

    #[test]
    fn validated_clamps_out_of_range_values() {
        let config = SunburstConfig {
            visibility_threshold_radians: -1.0,
            percentage_significant_digits: 0,
            dimmed_opacity: 4.0,
            ..SunburstConfig::default()
        }
        .validated();
        assert_eq!(config.visibility_threshold_radians, 0.0);
        assert_eq!(config.percentage_significant_digits, 1);
        assert_eq!(config.dimmed_opacity, 1.0);
    }
}
