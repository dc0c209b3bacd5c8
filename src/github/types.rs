//! GraphQL payloads for the SAML external identity lookup.

use serde::{Deserialize, Serialize};

/// Fetches the SAML `nameId` GitHub holds for one member of an organization.
pub const EXTERNAL_IDENTITY_QUERY: &str = r#"
query($org: String!, $login: String!) {
  organization(login: $org) {
    samlIdentityProvider {
      externalIdentities(first: 1, login: $login) {
        edges {
          node {
            samlIdentity {
              nameId
            }
          }
        }
      }
    }
  }
}
"#;

#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: ExternalIdentityVariables<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExternalIdentityVariables<'a> {
    pub org: &'a str,
    pub login: &'a str,
}

impl<'a> GraphQlRequest<'a> {
    pub fn external_identity(org: &'a str, login: &'a str) -> Self {
        Self {
            query: EXTERNAL_IDENTITY_QUERY,
            variables: ExternalIdentityVariables { org, login },
        }
    }
}

/// Response envelope. Every level is optional because GitHub answers with
/// `data: null` (plus `errors`) when the org has no SAML provider or the
/// token lacks the `admin:org` scope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalIdentityResponse {
    #[serde(default)]
    pub data: Option<ExternalIdentityData>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExternalIdentityData {
    pub organization: Option<Organization>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub saml_identity_provider: Option<SamlIdentityProvider>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamlIdentityProvider {
    pub external_identities: ExternalIdentities,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExternalIdentities {
    #[serde(default)]
    pub edges: Vec<ExternalIdentityEdge>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExternalIdentityEdge {
    pub node: ExternalIdentityNode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalIdentityNode {
    pub saml_identity: Option<SamlIdentity>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamlIdentity {
    pub name_id: Option<String>,
}

impl ExternalIdentityResponse {
    /// The returned identity edges, empty when any level of the path is missing
    pub fn edges(&self) -> &[ExternalIdentityEdge] {
        self.data
            .as_ref()
            .and_then(|data| data.organization.as_ref())
            .and_then(|org| org.saml_identity_provider.as_ref())
            .map(|provider| provider.external_identities.edges.as_slice())
            .unwrap_or(&[])
    }

    /// `nameId` of the first edge, if there is one
    pub fn first_name_id(&self) -> Option<&str> {
        self.edges()
            .first()
            .and_then(|edge| edge.node.saml_identity.as_ref())
            .and_then(|identity| identity.name_id.as_deref())
    }
}
