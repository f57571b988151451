//! Destination table: logical service name -> base url of the current
//! tenant and landscape.

pub mod service_name;

use std::collections::HashMap;

use crate::error::ConfigurationError;
pub use service_name::ServiceName;

#[derive(Debug, Clone, Default)]
pub struct Navigator {
    destinations: HashMap<String, String>,
}

impl Navigator {
    pub fn new(destinations: HashMap<String, String>) -> Self {
        let destinations = destinations
            .into_iter()
            .map(|(name, url)| (name, url.trim_end_matches('/').to_owned()))
            .collect();
        Self { destinations }
    }

    /// Legacy table: `https://{service}.cfapps.{landscape}.{host}` for every known service.
    pub fn for_landscape(landscape: &str, host: &str) -> Self {
        let destinations = ServiceName::ALL
            .iter()
            .map(|service| {
                (
                    service.as_str().to_owned(),
                    format!("https://{}.cfapps.{landscape}.{host}", service.as_str()),
                )
            })
            .collect();
        Self { destinations }
    }

    pub fn get_destination(&self, name: &str) -> Result<&str, ConfigurationError> {
        self.destinations
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ConfigurationError::UnknownDestination(name.to_owned()))
    }

    pub fn destination(&self, service: ServiceName) -> Result<&str, ConfigurationError> {
        self.get_destination(service.as_str())
    }

    pub fn destinations(&self) -> &HashMap<String, String> {
        &self.destinations
    }

    pub fn authorization(&self) -> Result<&str, ConfigurationError> {
        self.destination(ServiceName::Authorization)
    }

    pub fn business_partner(&self) -> Result<&str, ConfigurationError> {
        self.destination(ServiceName::BusinessPartner)
    }

    pub fn config_package(&self) -> Result<&str, ConfigurationError> {
        self.destination(ServiceName::ConfigPackageSap)
    }

    pub fn config_thing(&self) -> Result<&str, ConfigurationError> {
        self.destination(ServiceName::ConfigThingSap)
    }

    pub fn appiot_mds(&self) -> Result<&str, ConfigurationError> {
        self.destination(ServiceName::AppiotMds)
    }

    pub fn tm_data_mapping(&self) -> Result<&str, ConfigurationError> {
        self.destination(ServiceName::TmDataMapping)
    }

    pub fn appiot_coldstore(&self) -> Result<&str, ConfigurationError> {
        self.destination(ServiceName::AppiotColdstore)
    }
}
