//! Token generator configuration.

/// Configuration for a [`TokenGenerator`](crate::TokenGenerator).
///
/// All values are read once at construction; changing a config after the
/// generator is built has no effect on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// First raw value the counter issues.
    ///
    /// Default: 1. Zero is reserved for [`Token::NONE`](crate::Token::NONE),
    /// so a configured value of 0 is raised to 1 by the generator.
    pub first: u64,

    /// Whether released tokens are reissued before the counter advances.
    ///
    /// Default: `false`. With recycling off, a generator never hands out the
    /// same value twice. With it on, [`release`](crate::TokenGenerator::release)
    /// pushes a token onto a free list that [`create`](crate::TokenGenerator::create)
    /// drains first.
    pub recycle: bool,
}

impl GeneratorConfig {
    /// Default first value.
    pub const DEFAULT_FIRST: u64 = 1;

    /// Default recycling policy.
    pub const DEFAULT_RECYCLE: bool = false;

    /// Create a config with default values.
    pub fn new() -> Self {
        Self {
            first: Self::DEFAULT_FIRST,
            recycle: Self::DEFAULT_RECYCLE,
        }
    }

    /// Create a config that reissues released tokens.
    pub fn recycling() -> Self {
        Self {
            recycle: true,
            ..Self::new()
        }
    }

    /// Start the counter at `first` instead of the default.
    pub fn starting_at(mut self, first: u64) -> Self {
        self.first = first;
        self
    }

    /// The first value the generator will actually issue.
    pub(crate) fn effective_first(&self) -> u64 {
        self.first.max(1)
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_start_at_one_without_recycling() {
        let config = GeneratorConfig::default();
        assert_eq!(config.first, 1);
        assert!(!config.recycle);
    }

    #[test]
    fn zero_first_is_raised_to_one() {
        let config = GeneratorConfig::new().starting_at(0);
        assert_eq!(config.effective_first(), 1);
    }

    #[test]
    fn recycling_keeps_default_first() {
        let config = GeneratorConfig::recycling();
        assert!(config.recycle);
        assert_eq!(config.first, GeneratorConfig::DEFAULT_FIRST);
    }
}
