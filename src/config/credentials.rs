use serde::Deserialize;

use crate::error::ConfigurationError;

/// OAuth client credentials of an identity zone, in the shape service
/// bindings deliver them (`credentials.uaa` of the IoT binding, or
/// `credentials` of the identity broker binding).
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct UaaCredentials {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub clientid: String,
    #[serde(default)]
    pub clientsecret: String,
    pub uaadomain: Option<String>,
    pub identityzone: Option<String>,
    pub identityzoneid: Option<String>,
    pub xsappname: Option<String>,
    /// PEM encoded public key used to verify tokens issued by this zone.
    pub verificationkey: Option<String>,
}

impl UaaCredentials {
    pub fn new(
        url: impl Into<String>,
        clientid: impl Into<String>,
        clientsecret: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            clientid: clientid.into(),
            clientsecret: clientsecret.into(),
            ..Default::default()
        }
    }

    /// Credentials of a tenant addressed by tenant, landscape and host.
    pub fn for_tenant(
        tenant: &str,
        landscape: &str,
        host: &str,
        clientid: impl Into<String>,
        clientsecret: impl Into<String>,
    ) -> Self {
        Self {
            uaadomain: Some(format!("authentication.{landscape}.{host}")),
            identityzone: Some(tenant.to_owned()),
            ..Self::new(
                format!("https://{tenant}.authentication.{landscape}.{host}"),
                clientid,
                clientsecret,
            )
        }
    }

    pub fn token_url(&self) -> String {
        format!("{}/oauth/token", self.url.trim_end_matches('/'))
    }

    pub fn token_keys_url(&self) -> String {
        format!("{}/token_keys", self.url.trim_end_matches('/'))
    }

    pub fn validate(&self, source_name: &'static str) -> Result<(), ConfigurationError> {
        let missing: Vec<&'static str> = [
            ("url", &self.url),
            ("clientid", &self.clientid),
            ("clientsecret", &self.clientsecret),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigurationError::Incomplete {
                source_name,
                missing,
            })
        }
    }
}
