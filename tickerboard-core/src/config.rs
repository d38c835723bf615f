//! Compiled-in dashboard configuration: slider bounds, defaults and the registry.

use serde::{Deserialize, Serialize};

use crate::dashboard::DashboardInput;
use crate::data::registry::InstrumentRegistry;
use crate::reshape::{RangeBound, Selection};

/// Integer slider bounds with a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaysBounds {
    pub min: u32,
    pub max: u32,
    pub default: u32,
}

impl DaysBounds {
    pub fn clamp(&self, days: u32) -> u32 {
        days.clamp(self.min, self.max)
    }
}

/// Inclusive bounds of the price-range slider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBounds {
    pub min: f64,
    pub max: f64,
}

impl PriceBounds {
    pub fn clamp(&self, price: f64) -> f64 {
        price.clamp(self.min, self.max)
    }
}

/// Everything the dashboard needs that is fixed at build time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub days: DaysBounds,
    pub price: PriceBounds,
    pub default_range: RangeBound,
    pub default_selection: Vec<String>,
    pub registry: InstrumentRegistry,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            days: DaysBounds {
                min: 1,
                max: 50,
                default: 20,
            },
            price: PriceBounds {
                min: 0.0,
                max: 3500.0,
            },
            default_range: RangeBound::new(0.0, 3500.0),
            default_selection: vec!["google".into(), "amazon".into()],
            registry: InstrumentRegistry::default_us(),
        }
    }
}

impl DashboardConfig {
    /// The input a fresh session starts from.
    pub fn default_input(&self) -> DashboardInput {
        DashboardInput {
            days: self.days.default,
            selection: self.default_selection.iter().cloned().collect::<Selection>(),
            range: self.default_range,
        }
    }

    /// Apply the widget-side constraints: days and prices inside their
    /// slider bounds, and `min <= max`.
    pub fn clamp_input(&self, input: DashboardInput) -> DashboardInput {
        let range = RangeBound::new(
            self.price.clamp(input.range.min),
            self.price.clamp(input.range.max),
        )
        .ordered();
        DashboardInput {
            days: self.days.clamp(input.days),
            selection: input.selection,
            range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard_sliders() {
        let c = DashboardConfig::default();
        let input = c.default_input();
        assert_eq!(input.days, 20);
        assert_eq!(input.range, RangeBound::new(0.0, 3500.0));
        assert!(input.selection.contains("google"));
        assert!(input.selection.contains("amazon"));
        assert_eq!(input.selection.len(), 2);
        assert_eq!(c.registry.len(), 5);
    }

    #[test]
    fn clamp_input_enforces_widget_constraints() {
        let c = DashboardConfig::default();
        let input = DashboardInput {
            days: 90,
            selection: Selection::new(),
            range: RangeBound::new(4000.0, -5.0),
        };
        let clamped = c.clamp_input(input);
        assert_eq!(clamped.days, 50);
        assert_eq!(clamped.range, RangeBound::new(0.0, 3500.0));

        let zero = c.clamp_input(DashboardInput {
            days: 0,
            ..c.default_input()
        });
        assert_eq!(zero.days, 1);
    }
}
