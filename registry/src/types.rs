//! Wire types of the internal console API.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    #[serde(rename = "ceo")]
    Ceo,
    #[serde(rename = "tech")]
    Tech,
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "mediaBuyer")]
    MediaBuyer,
    #[serde(rename = "other")]
    Other,
}

impl Role {
    /// Unknown role strings map to `Other` rather than failing the whole
    /// session payload.
    pub fn parse(value: &str) -> Role {
        let value = value.trim();
        if value.eq_ignore_ascii_case("ceo") {
            Role::Ceo
        } else if value.eq_ignore_ascii_case("tech") {
            Role::Tech
        } else if value.eq_ignore_ascii_case("admin") {
            Role::Admin
        } else if value.eq_ignore_ascii_case("mediaBuyer") {
            Role::MediaBuyer
        } else {
            Role::Other
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Ceo => "ceo",
            Role::Tech => "tech",
            Role::Admin => "admin",
            Role::MediaBuyer => "mediaBuyer",
            Role::Other => "other",
        }
    }

    pub const fn is_privileged(self) -> bool {
        matches!(self, Role::Ceo | Role::Tech | Role::Admin)
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Role::parse(&value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: Role,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub route: String,
    #[serde(default)]
    pub template: String,
    #[serde(default, rename = "rtkID")]
    pub rtk_id: String,
    #[serde(default, rename = "ringbaID")]
    pub ringba_id: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    pub domain: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default, rename = "rtkID")]
    pub rtk_id: String,
    #[serde(default)]
    pub certification_tags: Vec<String>,
    #[serde(default)]
    pub assigned_to: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl Domain {
    /// A domain-level RT id, when present, takes precedence over any
    /// route-level value entered in the wizard.
    pub fn has_rtk_id(&self) -> bool {
        !self.rtk_id.trim().is_empty()
    }

    /// Older records predate `assignedTo` and only carry the creator.
    pub fn owner(&self) -> &str {
        if self.assigned_to.trim().is_empty() {
            &self.created_by
        } else {
            &self.assigned_to
        }
    }
}

/// Body of `POST /domain`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDomain {
    pub domain: String,
    pub organization: String,
    pub id: String,
    pub platform: String,
    #[serde(rename = "rtkID")]
    pub rtk_id: String,
    pub certification_tags: Vec<String>,
    pub assigned_to: String,
    pub created_by: String,
}

/// Body of `PUT /updateDomain`: the backend matches on the old values and
/// writes the new ones, so every field travels as a pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainUpdate {
    pub old_domain: String,
    pub new_domain: String,
    pub old_organization: String,
    pub new_organization: String,
    pub old_id: String,
    pub new_id: String,
    pub old_platform: String,
    pub new_platform: String,
    #[serde(rename = "oldRtkID")]
    pub old_rtk_id: String,
    #[serde(rename = "newRtkID")]
    pub new_rtk_id: String,
    pub old_certification_tags: Vec<String>,
    pub new_certification_tags: Vec<String>,
    pub old_assigned_to: String,
    pub new_assigned_to: String,
}

/// The edited values of a full domain edit; unchanged fields repeat the
/// current value.
#[derive(Debug, Clone, Default)]
pub struct DomainEdit {
    pub domain: String,
    pub organization: String,
    pub id: String,
    pub platform: String,
    pub rtk_id: String,
    pub certification_tags: Vec<String>,
    pub assigned_to: String,
}

impl DomainUpdate {
    pub fn from_edit(current: &Domain, edit: &DomainEdit) -> Self {
        DomainUpdate {
            old_domain: current.domain.clone(),
            new_domain: edit.domain.clone(),
            old_organization: current.organization.clone(),
            new_organization: edit.organization.clone(),
            old_id: current.id.clone(),
            new_id: edit.id.clone(),
            old_platform: current.platform.clone(),
            new_platform: edit.platform.clone(),
            old_rtk_id: current.rtk_id.clone(),
            new_rtk_id: edit.rtk_id.clone(),
            old_certification_tags: current.certification_tags.clone(),
            new_certification_tags: edit.certification_tags.clone(),
            old_assigned_to: current.owner().to_string(),
            new_assigned_to: edit.assigned_to.clone(),
        }
    }

    /// The media-buyer affordance: every pair repeats the current value
    /// except the RT id.
    pub fn rtk_id_only(current: &Domain, new_rtk_id: &str) -> Self {
        let owner = current.owner().to_string();
        DomainUpdate {
            old_domain: current.domain.clone(),
            new_domain: current.domain.clone(),
            old_organization: current.organization.clone(),
            new_organization: current.organization.clone(),
            old_id: current.id.clone(),
            new_id: current.id.clone(),
            old_platform: current.platform.clone(),
            new_platform: current.platform.clone(),
            old_rtk_id: current.rtk_id.clone(),
            new_rtk_id: new_rtk_id.to_string(),
            old_certification_tags: current.certification_tags.clone(),
            new_certification_tags: current.certification_tags.clone(),
            old_assigned_to: owner.clone(),
            new_assigned_to: owner,
        }
    }
}

/// Body of `PUT /updateData`, keyed by the old route value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteUpdate {
    pub domain: String,
    pub route: String,
    pub new_route: String,
    pub old_template: String,
    pub new_template: String,
    pub organization: String,
    #[serde(rename = "rtkID", default, skip_serializing_if = "String::is_empty")]
    pub rtk_id: String,
    #[serde(rename = "ringbaID")]
    pub ringba_id: String,
    pub phone_number: String,
    pub created_by: String,
}

/// Body of `POST /route`, assembled by the wizard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRouteRequest {
    pub organization: String,
    pub domain: String,
    pub route: String,
    pub template: String,
    pub platform: String,
    #[serde(rename = "rtkID")]
    pub rtk_id: String,
    #[serde(rename = "ringbaID")]
    pub ringba_id: String,
    pub phone_number: String,
    pub created_by: String,
}
