//! Lowering configuration.

use crate::frontend::conversions::ConversionPolicy;

/// Configuration for lowering a compilation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoweringOptions {
    /// Emit `[Obsolete]` for the `ObsoleteAttribute` class.
    pub strip_attribute_suffix: bool,
    /// Keep the namespace of dotted attribute names; otherwise only the last segment is emitted.
    pub qualify_annotation_names: bool,
    /// Conversion rules used when validating attribute arguments.
    pub conversions: ConversionPolicy,
}

impl Default for LoweringOptions {
    fn default() -> Self {
        Self {
            strip_attribute_suffix: true,
            qualify_annotation_names: true,
            conversions: ConversionPolicy::default(),
        }
    }
}

impl LoweringOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strip_attribute_suffix(mut self, strip: bool) -> Self {
        self.strip_attribute_suffix = strip;
        self
    }

    pub fn with_qualified_annotation_names(mut self, qualify: bool) -> Self {
        self.qualify_annotation_names = qualify;
        self
    }

    pub fn with_conversions(mut self, conversions: ConversionPolicy) -> Self {
        self.conversions = conversions;
        self
    }

    /// The name an annotation tag is emitted under.
    pub fn annotation_name<'n>(&self, native_name: &'n str) -> &'n str {
        let name = if self.qualify_annotation_names {
            native_name
        } else {
            native_name.rsplit('.').next().unwrap_or(native_name)
        };
        match name.strip_suffix("Attribute") {
            Some(stripped) if self.strip_attribute_suffix && !stripped.is_empty() && !stripped.ends_with('.') => {
                stripped
            }
            _ => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = LoweringOptions::default();
        assert!(options.strip_attribute_suffix);
        assert!(options.qualify_annotation_names);
        assert!(options.conversions.allow_boxing);
    }

    #[test]
    fn test_annotation_names() {
        let options = LoweringOptions::new();
        assert_eq!(options.annotation_name("ObsoleteAttribute"), "Obsolete");
        assert_eq!(options.annotation_name("System.SerializableAttribute"), "System.Serializable");
        assert_eq!(options.annotation_name("Attribute"), "Attribute");
        assert_eq!(options.annotation_name("Transaction"), "Transaction");

        let short = options.with_qualified_annotation_names(false);
        assert_eq!(short.annotation_name("System.SerializableAttribute"), "Serializable");

        let verbatim = LoweringOptions::new().with_strip_attribute_suffix(false);
        assert_eq!(verbatim.annotation_name("ObsoleteAttribute"), "ObsoleteAttribute");
    }
}
