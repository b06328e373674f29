#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum WizardError {
    #[error("select an organization first")]
    MissingOrganization,
    #[error("select a vertical")]
    MissingVertical,
    #[error("select a campaign")]
    MissingCampaign,
    #[error("select a media buyer")]
    MissingMediaBuyer,
    #[error("enter a domain")]
    MissingDomain,
    #[error("enter a route path")]
    MissingRoute,
    #[error("select a template")]
    MissingTemplate,
    #[error("enter an RT campaign id")]
    MissingRtkId,
    #[error("vertical {vertical} is not available for {organization}")]
    VerticalUnavailable {
        organization: &'static str,
        vertical: &'static str,
    },
    #[error("domain {0} is not assigned to you")]
    DomainNotAssigned(String),
    #[error("{0} is not a valid domain name")]
    InvalidDomain(String),
    #[error("enter a valid {0}")]
    InvalidField(&'static str),
    #[error("log in before creating a landing page")]
    NotAuthenticated,
}
