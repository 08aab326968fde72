use serde::{Deserialize, Serialize};

/// Proxy and sort configuration
///
/// Built with chained setters, or loaded from JSON:
///
/// ```
/// use fieldbag::ProxyConfig;
///
/// let config = ProxyConfig::new()
///     .class_name("MyArrayObject")
///     .warn_on_undefined(false);
/// assert_eq!(config.class_name, "MyArrayObject");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Log a warning when a read hits an undefined field
    pub warn_on_undefined: bool,

    /// Runs up to this length are insertion-sorted before merging
    pub insertion_sort_threshold: usize,

    /// Class name reported in undefined-property warnings
    pub class_name: String,
}

impl ProxyConfig {
    pub fn new() -> Self {
        Self {
            warn_on_undefined: true,
            insertion_sort_threshold: 16,
            class_name: "ArrayObject".to_string(),
        }
    }

    /// Enable or disable undefined-field warnings
    pub fn warn_on_undefined(mut self, enabled: bool) -> Self {
        self.warn_on_undefined = enabled;
        self
    }

    /// Set the insertion sort threshold
    pub fn insertion_sort_threshold(mut self, threshold: usize) -> Self {
        self.insertion_sort_threshold = threshold;
        self
    }

    /// Set the class name used in diagnostics
    pub fn class_name(mut self, name: &str) -> Self {
        self.class_name = name.to_string();
        self
    }

    /// Parse from a JSON document; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: Self = serde_json::from_str(json).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.insertion_sort_threshold == 0 {
            return Err("insertion_sort_threshold must be > 0".to_string());
        }

        if self.class_name.is_empty() {
            return Err("class_name cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self::new()
    }
}
