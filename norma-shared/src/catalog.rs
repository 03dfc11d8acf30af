/// Static module catalog
///
/// The catalog of purchasable feature bundles is compiled into the binary
/// and immutable at runtime. Tenants buy or trial modules by key; the
/// per-tenant state lives in `organization_modules`, never here.
///
/// Two core modules (`dashboard`, `employees`) are base-included: every
/// organization has them regardless of billing state, and the access
/// resolver short-circuits on them before looking at any row.
///
/// # Example
///
/// ```
/// use norma_shared::catalog;
///
/// let def = catalog::find("psi").unwrap();
/// assert_eq!(def.name_ro, "Prevenirea si stingerea incendiilor");
/// assert!(catalog::is_base_included("dashboard"));
/// assert!(!catalog::is_base_included("psi"));
/// ```

use serde::{Deserialize, Serialize};

/// Pricing/packaging category of a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleCategory {
    /// Part of the base product
    Core,

    /// Individually purchasable
    Standalone,

    /// Premium add-on
    Premium,
}

impl ModuleCategory {
    /// Converts category to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleCategory::Core => "core",
            ModuleCategory::Standalone => "standalone",
            ModuleCategory::Premium => "premium",
        }
    }
}

/// One catalog entry
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ModuleDefinition {
    /// Stable key used in URLs, subscriptions and state rows
    pub key: &'static str,

    /// Romanian display name
    pub name_ro: &'static str,

    /// English display name
    pub name_en: &'static str,

    /// Pricing category
    pub category: ModuleCategory,

    /// Position in listings
    pub sort_order: u8,

    /// Granted to every organization without a state row
    pub base_included: bool,
}

/// The full catalog, in display order
pub const MODULE_CATALOG: &[ModuleDefinition] = &[
    ModuleDefinition {
        key: "dashboard",
        name_ro: "Panou de control",
        name_en: "Dashboard",
        category: ModuleCategory::Core,
        sort_order: 1,
        base_included: true,
    },
    ModuleDefinition {
        key: "employees",
        name_ro: "Evidenta angajatilor",
        name_en: "Employee registry",
        category: ModuleCategory::Core,
        sort_order: 2,
        base_included: true,
    },
    ModuleDefinition {
        key: "ssm",
        name_ro: "Securitate si sanatate in munca",
        name_en: "Occupational health & safety",
        category: ModuleCategory::Core,
        sort_order: 3,
        base_included: false,
    },
    ModuleDefinition {
        key: "psi",
        name_ro: "Prevenirea si stingerea incendiilor",
        name_en: "Fire prevention",
        category: ModuleCategory::Standalone,
        sort_order: 4,
        base_included: false,
    },
    ModuleDefinition {
        key: "medical",
        name_ro: "Medicina muncii",
        name_en: "Occupational medicine",
        category: ModuleCategory::Standalone,
        sort_order: 5,
        base_included: false,
    },
    ModuleDefinition {
        key: "equipment",
        name_ro: "Echipamente de munca",
        name_en: "Work equipment",
        category: ModuleCategory::Standalone,
        sort_order: 6,
        base_included: false,
    },
    ModuleDefinition {
        key: "training",
        name_ro: "Instruiri",
        name_en: "Trainings",
        category: ModuleCategory::Standalone,
        sort_order: 7,
        base_included: false,
    },
    ModuleDefinition {
        key: "gdpr",
        name_ro: "Protectia datelor (GDPR)",
        name_en: "Data protection (GDPR)",
        category: ModuleCategory::Standalone,
        sort_order: 8,
        base_included: false,
    },
    ModuleDefinition {
        key: "nis2",
        name_ro: "Securitate cibernetica (NIS2)",
        name_en: "Cybersecurity (NIS2)",
        category: ModuleCategory::Premium,
        sort_order: 9,
        base_included: false,
    },
];

/// Finds a catalog entry by key
pub fn find(key: &str) -> Option<&'static ModuleDefinition> {
    MODULE_CATALOG.iter().find(|def| def.key == key)
}

/// Whether a key exists in the catalog
pub fn is_known_module(key: &str) -> bool {
    find(key).is_some()
}

/// Whether a key is granted to every organization
pub fn is_base_included(key: &str) -> bool {
    find(key).map(|def| def.base_included).unwrap_or(false)
}

/// All module keys that can be subscribed/trialed (not base-included)
pub fn purchasable_keys() -> impl Iterator<Item = &'static str> {
    MODULE_CATALOG
        .iter()
        .filter(|def| !def.base_included)
        .map(|def| def.key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keys_are_unique() {
        let keys: HashSet<_> = MODULE_CATALOG.iter().map(|d| d.key).collect();
        assert_eq!(keys.len(), MODULE_CATALOG.len());
    }

    #[test]
    fn test_sort_orders_are_unique_and_ascending() {
        let mut orders: Vec<_> = MODULE_CATALOG.iter().map(|d| d.sort_order).collect();
        let mut sorted = orders.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), MODULE_CATALOG.len());
        orders.sort_unstable();
        assert_eq!(orders, sorted);
    }

    #[test]
    fn test_base_included_set() {
        let base: Vec<_> = MODULE_CATALOG
            .iter()
            .filter(|d| d.base_included)
            .map(|d| d.key)
            .collect();
        assert_eq!(base, vec!["dashboard", "employees"]);
    }

    #[test]
    fn test_find() {
        assert!(find("psi").is_some());
        assert!(find("nis2").is_some());
        assert!(find("does-not-exist").is_none());
    }

    #[test]
    fn test_purchasable_excludes_base() {
        let purchasable: Vec<_> = purchasable_keys().collect();
        assert!(!purchasable.contains(&"dashboard"));
        assert!(purchasable.contains(&"ssm"));
        assert!(purchasable.contains(&"nis2"));
    }
}
