use std::fmt;
use std::str::FromStr;

use crate::error::ConfigurationError;

/// Logical microservices a base url can be set for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceName {
    BusinessPartner,
    Location,
    Authorization,
    TenantAdministration,
    AppcoreConf,
    AppiotMds,
    AppiotColdstore,
    AnalyticsThingSap,
    AppiotThingHierarchy,
    AppiotTes,
    CompositeThings,
    CompositeThingsOdata,
    CompositeEventsOdata,
    ConfigThingSap,
    ConfigPackageSap,
    TmDataMapping,
}

impl ServiceName {
    pub const ALL: [ServiceName; 16] = [
        ServiceName::BusinessPartner,
        ServiceName::Location,
        ServiceName::Authorization,
        ServiceName::TenantAdministration,
        ServiceName::AppcoreConf,
        ServiceName::AppiotMds,
        ServiceName::AppiotColdstore,
        ServiceName::AnalyticsThingSap,
        ServiceName::AppiotThingHierarchy,
        ServiceName::AppiotTes,
        ServiceName::CompositeThings,
        ServiceName::CompositeThingsOdata,
        ServiceName::CompositeEventsOdata,
        ServiceName::ConfigThingSap,
        ServiceName::ConfigPackageSap,
        ServiceName::TmDataMapping,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceName::BusinessPartner => "business-partner",
            ServiceName::Location => "location",
            ServiceName::Authorization => "authorization",
            ServiceName::TenantAdministration => "tenant-administration",
            ServiceName::AppcoreConf => "appcore-conf",
            ServiceName::AppiotMds => "appiot-mds",
            ServiceName::AppiotColdstore => "appiot-coldstore",
            ServiceName::AnalyticsThingSap => "analytics-thing-sap",
            ServiceName::AppiotThingHierarchy => "appiot-thing-hierarchy",
            ServiceName::AppiotTes => "appiot-tes",
            ServiceName::CompositeThings => "composite-things",
            ServiceName::CompositeThingsOdata => "composite-things-odata",
            ServiceName::CompositeEventsOdata => "composite-events-odata",
            ServiceName::ConfigThingSap => "config-thing-sap",
            ServiceName::ConfigPackageSap => "config-package-sap",
            ServiceName::TmDataMapping => "tm-data-mapping",
        }
    }
}

impl FromStr for ServiceName {
    type Err = ConfigurationError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ServiceName::ALL
            .into_iter()
            .find(|service| service.as_str() == name)
            .ok_or_else(|| ConfigurationError::UnknownService(name.to_owned()))
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
