//! Scenario selection for the demo binary.

use simulation::SimConfig;

/// Named scenarios the binary can run.
pub const SCENARIOS: &[&str] = &["default", "demo", "stress", "tight"];

/// Resolve a scenario name to a configuration.
pub fn scenario(name: &str) -> Option<SimConfig> {
    match name {
        "default" => Some(SimConfig::default()),
        "demo" => Some(SimConfig::demo()),
        "stress" => Some(SimConfig::stress_test()),
        "tight" => Some(SimConfig::tight_market()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_listed_scenario_resolves() {
        for name in SCENARIOS {
            assert!(scenario(name).is_some(), "scenario {} missing", name);
        }
        assert!(scenario("nope").is_none());
    }
}
