//! Name canonicalization.
//!
//! [`NamingConfig`] holds every table the canonicalizer consults and replaces what would
//! otherwise be process-wide registries. It is passed by reference into ingestion and
//! stays unchanged for the whole run, which makes [`NamingConfig::canonicalize`] a pure
//! function of its input.
//!
//! # Algorithm
//!
//! 1. Override table hit → returned verbatim, nothing else applies.
//! 2. Type prefix (`Vk`) → stripped.
//! 3. Scalar suffix (`_t`) → looked up in the primitive table, a miss is fatal.
//! 4. Anything else → passed through with a naming-convention warning.
//! 5. The first vendor suffix the candidate ends with is replaced by its short form.
//!
//! ```
//! use vkbind_core::NamingConfig;
//!
//! let naming = NamingConfig::vulkan();
//! assert_eq!(
//!     naming.canonicalize("VkSurfaceCapabilitiesKHR", "struct").unwrap(),
//!     "SurfaceCapabilitiesKhr"
//! );
//! assert_eq!(naming.canonicalize("uint32_t", "member").unwrap(), "UInt32");
//! assert_eq!(naming.canonicalize("HWND", "member").unwrap(), "IntPtr");
//! ```

use rustc_hash::FxHashMap;

use crate::{CanonicalName, NamingError};

/// Which rule produced a canonical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameConvention {
    /// Taken from the override table.
    Override,
    /// The type prefix was stripped.
    Prefixed,
    /// Mapped through the primitive table.
    Primitive,
    /// Matched no convention and was passed through unchanged.
    Unconventional,
}

/// A canonical name together with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub name: CanonicalName,
    pub convention: NameConvention,
}

impl ResolvedName {
    pub fn is_unconventional(&self) -> bool {
        self.convention == NameConvention::Unconventional
    }
}

/// Naming tables for one generation run.
#[derive(Debug, Clone)]
pub struct NamingConfig {
    type_prefix: String,
    scalar_suffix: String,
    overrides: FxHashMap<String, String>,
    primitives: FxHashMap<String, String>,
    /// Ordered: the first matching token wins.
    vendor_suffixes: Vec<(String, String)>,
    /// Canonical names that are byte-copyable before any structure is seen.
    transferable_scalars: Vec<String>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self::vulkan()
    }
}

impl NamingConfig {
    /// Empty tables with the given prefix and scalar suffix.
    pub fn empty(type_prefix: impl Into<String>, scalar_suffix: impl Into<String>) -> Self {
        Self {
            type_prefix: type_prefix.into(),
            scalar_suffix: scalar_suffix.into(),
            overrides: FxHashMap::default(),
            primitives: FxHashMap::default(),
            vendor_suffixes: Vec::new(),
            transferable_scalars: Vec::new(),
        }
    }

    /// Tables for the Vulkan registry.
    pub fn vulkan() -> Self {
        let mut config = Self::empty("Vk", "_t");

        for platform in ["ANativeWindow", "HWND", "HINSTANCE"] {
            config = config.with_override(platform, "IntPtr");
        }

        config = config
            .with_primitive("int32_t", "Int32")
            .with_primitive("uint32_t", "UInt32")
            .with_primitive("uint64_t", "UInt64")
            .with_primitive("uint8_t", "Byte")
            .with_primitive("size_t", "UIntPtr")
            .with_primitive("xcb_connection_t", "IntPtr")
            .with_primitive("xcb_window_t", "IntPtr")
            .with_primitive("xcb_visualid_t", "IntPtr");

        config = config
            .with_vendor_suffix("EXT", "Ext")
            .with_vendor_suffix("IMG", "Img")
            .with_vendor_suffix("KHR", "Khr");

        for scalar in [
            "Byte",
            "SByte",
            "Int32",
            "UInt32",
            "Int64",
            "UInt64",
            "float",
            "double",
            "IntPtr",
            "UIntPtr",
            "Bool32",
            "DeviceSize",
        ] {
            config = config.with_transferable(scalar);
        }

        config
    }

    /// Map a raw platform name straight to a representation.
    pub fn with_override(mut self, raw: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.overrides.insert(raw.into(), canonical.into());
        self
    }

    /// Map a scalar-suffixed name to a canonical primitive.
    pub fn with_primitive(mut self, raw: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.primitives.insert(raw.into(), canonical.into());
        self
    }

    /// Append a vendor suffix rule. Rules are tried in insertion order.
    pub fn with_vendor_suffix(
        mut self,
        token: impl Into<String>,
        short: impl Into<String>,
    ) -> Self {
        self.vendor_suffixes.push((token.into(), short.into()));
        self
    }

    /// Seed a canonical name into the directly-transferable set.
    pub fn with_transferable(mut self, canonical: impl Into<String>) -> Self {
        let canonical = canonical.into();
        if !self.transferable_scalars.contains(&canonical) {
            self.transferable_scalars.push(canonical);
        }
        self
    }

    pub fn type_prefix(&self) -> &str {
        &self.type_prefix
    }

    pub fn scalar_suffix(&self) -> &str {
        &self.scalar_suffix
    }

    pub fn vendor_suffixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vendor_suffixes
            .iter()
            .map(|(token, short)| (token.as_str(), short.as_str()))
    }

    /// The initial directly-transferable set.
    pub fn transferable_scalars(&self) -> impl Iterator<Item = CanonicalName> + '_ {
        self.transferable_scalars
            .iter()
            .map(|s| CanonicalName::new(s.as_str()))
    }

    /// Canonicalize `raw`. `label` names what is being canonicalized ("handle",
    /// "struct", "member", ...) and only shows up in the convention warning.
    pub fn canonicalize(&self, raw: &str, label: &str) -> Result<CanonicalName, NamingError> {
        self.resolve(raw, label).map(|resolved| resolved.name)
    }

    /// Canonicalize `raw` and report which rule applied.
    pub fn resolve(&self, raw: &str, label: &str) -> Result<ResolvedName, NamingError> {
        if let Some(name) = self.overrides.get(raw) {
            return Ok(ResolvedName {
                name: CanonicalName::new(name.as_str()),
                convention: NameConvention::Override,
            });
        }

        let (candidate, convention) = if let Some(stripped) = raw.strip_prefix(&*self.type_prefix) {
            (stripped, NameConvention::Prefixed)
        } else if raw.ends_with(&*self.scalar_suffix) {
            let mapped = self.primitives.get(raw).ok_or_else(|| {
                NamingError::UnsupportedPrimitiveType {
                    name: raw.to_string(),
                }
            })?;
            (mapped.as_str(), NameConvention::Primitive)
        } else {
            tracing::warn!(
                label,
                name = raw,
                "{} name '{}' doesn't start with {} prefix or end with {} suffix",
                label,
                raw,
                self.type_prefix,
                self.scalar_suffix
            );
            (raw, NameConvention::Unconventional)
        };

        Ok(ResolvedName {
            name: CanonicalName::new(self.normalize_vendor_suffix(candidate)),
            convention,
        })
    }

    fn normalize_vendor_suffix(&self, candidate: &str) -> String {
        for (token, short) in &self.vendor_suffixes {
            if let Some(stem) = candidate.strip_suffix(token.as_str()) {
                return format!("{stem}{short}");
            }
        }
        candidate.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins_over_everything() {
        let naming = NamingConfig::vulkan().with_override("VkSpecialKHR", "Special");
        let resolved = naming.resolve("VkSpecialKHR", "struct").unwrap();
        assert_eq!(resolved.name, "Special");
        assert_eq!(resolved.convention, NameConvention::Override);
        assert_eq!(naming.canonicalize("ANativeWindow", "member").unwrap(), "IntPtr");
    }

    #[test]
    fn strips_type_prefix() {
        let naming = NamingConfig::vulkan();
        let resolved = naming.resolve("VkExtent2D", "struct").unwrap();
        assert_eq!(resolved.name, "Extent2D");
        assert_eq!(resolved.convention, NameConvention::Prefixed);
    }

    #[test]
    fn maps_primitives() {
        let naming = NamingConfig::vulkan();
        assert_eq!(naming.canonicalize("uint8_t", "member").unwrap(), "Byte");
        assert_eq!(naming.canonicalize("size_t", "member").unwrap(), "UIntPtr");
        assert_eq!(naming.canonicalize("xcb_window_t", "member").unwrap(), "IntPtr");
        assert_eq!(
            naming.resolve("int32_t", "member").unwrap().convention,
            NameConvention::Primitive
        );
    }

    #[test]
    fn unknown_primitive_is_fatal() {
        let naming = NamingConfig::vulkan();
        let err = naming.canonicalize("int16_t", "member").unwrap_err();
        assert_eq!(
            err,
            NamingError::UnsupportedPrimitiveType {
                name: "int16_t".into()
            }
        );
    }

    #[test]
    fn unconventional_passes_through() {
        let naming = NamingConfig::vulkan();
        let resolved = naming.resolve("float", "member").unwrap();
        assert_eq!(resolved.name, "float");
        assert!(resolved.is_unconventional());
    }

    #[test]
    fn vendor_suffixes_rewrite_only_the_suffix() {
        let naming = NamingConfig::vulkan();
        assert_eq!(
            naming.canonicalize("VkDebugReportCallbackEXT", "handle").unwrap(),
            "DebugReportCallbackExt"
        );
        assert_eq!(
            naming.canonicalize("VkSurfaceKHR", "handle").unwrap(),
            "SurfaceKhr"
        );
        assert_eq!(
            naming.canonicalize("VkFilterCubicIMG", "struct").unwrap(),
            "FilterCubicImg"
        );
        assert_eq!(
            naming.canonicalize("VkKHRSurface", "struct").unwrap(),
            "KHRSurface"
        );
    }

    #[test]
    fn vendor_suffix_applies_once_in_table_order() {
        let naming = NamingConfig::empty("Vk", "_t")
            .with_vendor_suffix("KHR", "Khr")
            .with_vendor_suffix("HR", "Hr");
        assert_eq!(naming.canonicalize("VkFooKHR", "struct").unwrap(), "FooKhr");

        let naming = NamingConfig::empty("Vk", "_t")
            .with_vendor_suffix("HR", "Hr")
            .with_vendor_suffix("KHR", "Khr");
        assert_eq!(naming.canonicalize("VkFooKHR", "struct").unwrap(), "FooKHr");
    }

    #[test]
    fn vendor_suffix_applies_to_unconventional_names() {
        let naming = NamingConfig::vulkan();
        assert_eq!(
            naming.canonicalize("PlatformEXT", "member").unwrap(),
            "PlatformExt"
        );
    }

    #[test]
    fn canonicalize_is_idempotent() {
        let naming = NamingConfig::vulkan();
        for raw in ["VkDeviceCreateInfo", "uint64_t", "HINSTANCE", "char", "VkSwapchainKHR"] {
            let first = naming.canonicalize(raw, "type").unwrap();
            let second = naming.canonicalize(raw, "type").unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn transferable_seeds_are_unique() {
        let naming = NamingConfig::vulkan()
            .with_transferable("Bool32")
            .with_transferable("Int16");
        let seeds: Vec<_> = naming.transferable_scalars().collect();
        assert_eq!(seeds.len(), 13);
        assert!(seeds.iter().any(|s| s == "Int16"));
    }
}
