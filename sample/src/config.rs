//! Environment-derived settings.
//!
//! All nine variables are required. Loading collects every missing name so
//! the user gets the full list at once, and nothing remote is attempted when
//! any are absent. Variable spellings match the published sample's setup
//! instructions.

/// Environment variables the sample requires, in the order they are
/// reported when missing.
pub const REQUIRED_VARS: [&str; 9] = [
    "AZS_ACTTIVEDIRECTORY",
    "AZS_ACTTIVEDIRECTORYRESOURCEID",
    "AZS_MANAGEMENTENDPOINT",
    "AZS_STORAGENDPOINT",
    "AZS_SUBID",
    "AZS_TENANTID",
    "AZS_CLIENTID",
    "AZS_SECRETKEY",
    "AZS_LOCATION",
];

/// Immutable configuration passed into every stage of the sample.
#[derive(Clone, Debug)]
pub struct Config {
    /// Identity (AAD or ADFS) authority URL.
    pub active_directory_endpoint: String,
    /// Token audience for the management plane.
    pub active_directory_resource_id: String,
    /// Resource-manager base URL.
    pub management_endpoint: String,
    /// DNS suffix of the storage data plane, e.g. `local.azurestack.external`.
    pub storage_endpoint_suffix: String,
    pub subscription_id: String,
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub location: String,
}

/// All required variables that were unset or empty.
#[derive(Debug, thiserror::Error)]
#[error("missing required environment variables: {}", .0.join(", "))]
pub struct MissingVars(pub Vec<&'static str>);

impl Config {
    pub fn from_env() -> Result<Self, MissingVars> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary lookup, so tests never touch the process
    /// environment. Empty values count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, MissingVars> {
        let mut missing = Vec::new();
        let mut require = |name: &'static str| -> String {
            match lookup(name) {
                Some(value) if !value.is_empty() => value,
                _ => {
                    missing.push(name);
                    String::new()
                }
            }
        };

        let config = Config {
            active_directory_endpoint: require(REQUIRED_VARS[0]),
            active_directory_resource_id: require(REQUIRED_VARS[1]),
            management_endpoint: require(REQUIRED_VARS[2]),
            storage_endpoint_suffix: require(REQUIRED_VARS[3]),
            subscription_id: require(REQUIRED_VARS[4]),
            tenant_id: require(REQUIRED_VARS[5]),
            client_id: require(REQUIRED_VARS[6]),
            client_secret: require(REQUIRED_VARS[7]),
            location: require(REQUIRED_VARS[8]),
        };

        if missing.is_empty() {
            Ok(config)
        } else {
            Err(MissingVars(missing))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_environment() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("AZS_ACTTIVEDIRECTORY", "https://login.microsoftonline.com/"),
            ("AZS_ACTTIVEDIRECTORYRESOURCEID", "https://management.azurestack.example/"),
            ("AZS_MANAGEMENTENDPOINT", "https://management.local.azurestack.external"),
            ("AZS_STORAGENDPOINT", "local.azurestack.external"),
            ("AZS_SUBID", "sub-1"),
            ("AZS_TENANTID", "tenant-1"),
            ("AZS_CLIENTID", "client-1"),
            ("AZS_SECRETKEY", "secret-1"),
            ("AZS_LOCATION", "local"),
        ])
    }

    #[test]
    fn loads_when_all_present() {
        let env = full_environment();
        let config = Config::from_lookup(|name| env.get(name).map(|v| v.to_string()))
            .expect("complete environment should load");
        assert_eq!(config.subscription_id, "sub-1");
        assert_eq!(config.storage_endpoint_suffix, "local.azurestack.external");
        assert_eq!(config.location, "local");
    }

    #[test]
    fn reports_every_missing_variable_at_once() {
        let mut env = full_environment();
        env.remove("AZS_SUBID");
        env.insert("AZS_SECRETKEY", ""); // empty counts as missing

        let error = Config::from_lookup(|name| env.get(name).map(|v| v.to_string()))
            .expect_err("incomplete environment must fail");
        assert_eq!(error.0, vec!["AZS_SUBID", "AZS_SECRETKEY"]);
    }

    #[test]
    fn empty_environment_reports_all_nine() {
        let error = Config::from_lookup(|_| None).expect_err("empty environment must fail");
        assert_eq!(error.0.len(), REQUIRED_VARS.len());
        assert_eq!(error.0, REQUIRED_VARS.to_vec());
    }
}
