//! Named collections of rule files.

use crate::{EndpointValidation, ParserError, Result, RuleFormat, ValidationConfig, parse_file};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Rule sets keyed by name.
///
/// Each rule set is one rule file. A service typically lists the rule sets it
/// uses in its configuration (e.g. `orders,customers`) and loads them all
/// from one directory at startup.
///
/// # Example
///
/// ```no_run
/// use rules_parser::RuleCatalog;
/// use std::path::Path;
///
/// let catalog = RuleCatalog::load_from_list(Path::new("rules"), "orders, customers").unwrap();
/// let rules = catalog.request_validation("orders", "createOrder").unwrap();
/// assert!(rules.is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    rule_sets: BTreeMap<String, ValidationConfig>,
}

impl RuleCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads one rule file per name from `dir`.
    ///
    /// For a name `orders` the files `orders.yml`, `orders.yaml`,
    /// `orders.toml` and `orders.json` are probed in that order; the first
    /// one that exists is loaded.
    pub fn load<I, S>(dir: &Path, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut catalog = Self::new();

        for name in names {
            let name = name.as_ref();
            let path = find_rule_file(dir, name)?;
            let config = parse_file(&path)?;
            catalog.insert(name, config);
        }

        info!(
            "Loaded {} rule sets from {}",
            catalog.len(),
            dir.display()
        );
        Ok(catalog)
    }

    /// Loads the rule sets named in a comma-separated list.
    ///
    /// Names are trimmed and empty entries are skipped, so `"orders, ,users,"`
    /// loads `orders` and `users`.
    pub fn load_from_list(dir: &Path, names: &str) -> Result<Self> {
        Self::load(dir, split_names(names))
    }

    /// Adds or replaces a rule set.
    pub fn insert(&mut self, name: impl Into<String>, config: ValidationConfig) {
        let name = name.into();
        debug!(
            rule_set = %name,
            requests = config.requests.len(),
            responses = config.responses.len(),
            "Adding rule set"
        );
        self.rule_sets.insert(name, config);
    }

    /// Returns a rule set by name.
    pub fn get(&self, name: &str) -> Option<&ValidationConfig> {
        self.rule_sets.get(name)
    }

    /// Returns the request rules for `endpoint` in `rule_set`.
    ///
    /// Fails if the rule set is unknown; an unknown endpoint is `Ok(None)`.
    pub fn request_validation(
        &self,
        rule_set: &str,
        endpoint: &str,
    ) -> Result<Option<&EndpointValidation>> {
        Ok(self.rule_set(rule_set)?.request_validation(endpoint))
    }

    /// Returns the response rules for `endpoint` in `rule_set`.
    ///
    /// Fails if the rule set is unknown; an unknown endpoint is `Ok(None)`.
    pub fn response_validation(
        &self,
        rule_set: &str,
        endpoint: &str,
    ) -> Result<Option<&EndpointValidation>> {
        Ok(self.rule_set(rule_set)?.response_validation(endpoint))
    }

    /// Returns the names of all rule sets, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rule_sets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rule_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rule_sets.is_empty()
    }

    fn rule_set(&self, name: &str) -> Result<&ValidationConfig> {
        self.rule_sets
            .get(name)
            .ok_or_else(|| ParserError::UnknownRuleSet(name.to_string()))
    }
}

fn split_names(names: &str) -> impl Iterator<Item = &str> {
    names.split(',').map(str::trim).filter(|name| !name.is_empty())
}

fn find_rule_file(dir: &Path, name: &str) -> Result<PathBuf> {
    RuleFormat::EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", name, ext)))
        .find(|path| path.is_file())
        .ok_or_else(|| ParserError::RuleFileNotFound {
            name: name.to_string(),
            dir: dir.to_path_buf(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_yaml;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_names() {
        let names: Vec<&str> = split_names(" orders, ,users,").collect();
        assert_eq!(names, vec!["orders", "users"]);
        assert_eq!(split_names("").count(), 0);
    }

    #[test]
    fn test_unknown_rule_set() {
        let catalog = RuleCatalog::new();
        let err = catalog.request_validation("orders", "createOrder").unwrap_err();
        assert!(matches!(err, ParserError::UnknownRuleSet(name) if name == "orders"));
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut catalog = RuleCatalog::new();
        let config = parse_yaml(
            "requests:\n  createOrder:\n    path: /api/orders\n    method: POST\n",
        )
        .unwrap();
        catalog.insert("orders", config);

        let endpoint = catalog
            .request_validation("orders", "createOrder")
            .unwrap()
            .unwrap();
        assert_eq!(endpoint.method.as_deref(), Some("POST"));
        assert!(
            catalog
                .response_validation("orders", "createOrder")
                .unwrap()
                .is_none()
        );
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["orders"]);
    }

    #[test]
    fn test_insert_replaces() {
        let mut catalog = RuleCatalog::new();
        catalog.insert("orders", ValidationConfig::default());
        catalog.insert(
            "orders",
            parse_yaml("responses:\n  getOrder: {}\n").unwrap(),
        );

        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("orders").unwrap().responses.contains_key("getOrder"));
    }
}
