//! Configuration for the connection finder.

/// Configuration parameters for connection search.
#[derive(Debug, Clone)]
pub struct FinderConfig {
    /// Maximum number of itineraries to return.
    pub max_results: usize,

    /// Maximum wait at the connection point (minutes).
    /// Longer waits are discarded as impractical.
    pub max_wait_mins: u32,

    /// Minimum wait at the connection point (minutes).
    /// Tighter transfers are discarded. Zero disables the filter.
    pub min_wait_mins: u32,
}

impl FinderConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(max_results: usize, max_wait_mins: u32, min_wait_mins: u32) -> Self {
        Self {
            max_results,
            max_wait_mins,
            min_wait_mins,
        }
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            max_results: 5,
            max_wait_mins: 180, // 3 hours
            min_wait_mins: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = FinderConfig::default();

        assert_eq!(config.max_results, 5);
        assert_eq!(config.max_wait_mins, 180);
        assert_eq!(config.min_wait_mins, 0);
    }

    #[test]
    fn custom_config() {
        let config = FinderConfig::new(10, 90, 15);

        assert_eq!(config.max_results, 10);
        assert_eq!(config.max_wait_mins, 90);
        assert_eq!(config.min_wait_mins, 15);
    }
}
