//! Organizations, verticals, templates and the static campaign lists.
//!
//! Everything that pairs a UI selection with a stored value lives here so
//! the wizard and the resolution engine cannot drift apart.

use crate::types::Campaign;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Organization {
    ParagonMedia,
    Elite,
}

impl Organization {
    pub const fn as_str(self) -> &'static str {
        match self {
            Organization::ParagonMedia => "paragon media",
            Organization::Elite => "elite",
        }
    }

    pub fn parse(value: &str) -> Option<Organization> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("paragon media") {
            Some(Organization::ParagonMedia)
        } else if value.eq_ignore_ascii_case("elite") {
            Some(Organization::Elite)
        } else {
            None
        }
    }
}

impl fmt::Display for Organization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vertical {
    MedicarePpc,
    DebtPpc,
    Sweeps,
    Nutra,
    Casino,
}

impl Vertical {
    pub const ALL: &'static [Vertical] = &[
        Vertical::MedicarePpc,
        Vertical::DebtPpc,
        Vertical::Sweeps,
        Vertical::Nutra,
        Vertical::Casino,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Vertical::MedicarePpc => "Medicare PPC",
            Vertical::DebtPpc => "Debt PPC",
            Vertical::Sweeps => "Sweeps",
            Vertical::Nutra => "Nutra",
            Vertical::Casino => "Casino",
        }
    }

    pub fn parse(value: &str) -> Option<Vertical> {
        Vertical::ALL
            .iter()
            .copied()
            .find(|v| v.as_str().eq_ignore_ascii_case(value.trim()))
    }

    /// Medicare and Debt campaigns come from the call-tracking provider;
    /// the rest use the static lists below.
    pub const fn uses_provider(self) -> bool {
        matches!(self, Vertical::MedicarePpc | Vertical::DebtPpc)
    }
}

impl fmt::Display for Vertical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Elite runs Medicare only.
pub fn verticals_for(organization: Organization) -> &'static [Vertical] {
    match organization {
        Organization::Elite => &[Vertical::MedicarePpc],
        Organization::ParagonMedia => Vertical::ALL,
    }
}

/// Canonical provider campaign names. Lookups match these exactly
/// (case-insensitively); anything else in the account is ignored.
pub const PARAGON_MEDICARE: &str = "Paragon - Medicare";
pub const PARAGON_SPANISH_MEDICARE: &str = "Paragon - Spanish Medicare";
pub const PARAGON_DEBT: &str = "Paragon - Debt";
/// Display label for the Medicare campaign when Elite is selected; the
/// external id underneath stays the Paragon one.
pub const ELITE_MEDICARE_LABEL: &str = "Elite - Medicare";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub value: &'static str,
    pub label: &'static str,
}

pub fn templates_for(vertical: Vertical) -> &'static [Template] {
    match vertical {
        Vertical::MedicarePpc => &[
            Template { value: "cb-groc", label: "Chatbot Grocery" },
            Template { value: "cb-ss", label: "Chatbot Social Security" },
            Template { value: "cb-groc-short", label: "Chatbot Grocery Short" },
            Template { value: "cb-ss-short", label: "Chatbot Social Security Short" },
            Template { value: "es-cb-groc", label: "Chatbot Grocery Spanish" },
            Template { value: "es-cb-ss", label: "Chatbot Social Security Spanish" },
            Template { value: "es-cb-groc-short", label: "Chatbot Grocery Short" },
            Template { value: "es-cb-ss-short", label: "Chatbot Social Security Short" },
        ],
        Vertical::DebtPpc => &[Template { value: "gg-debt-v1", label: "debt" }],
        Vertical::Sweeps => &[
            Template { value: "sweep", label: "Sweep" },
            Template { value: "stimulus", label: "Stimulus" },
        ],
        Vertical::Nutra => &[
            Template { value: "nutra-lp1", label: "Nutra Landing Page 1" },
            Template { value: "nutra-lp2", label: "Nutra Landing Page 2" },
            Template { value: "nutra-supplement", label: "Supplement Sales" },
        ],
        Vertical::Casino => &[
            Template { value: "casino-lp1", label: "Casino Landing Page 1" },
            Template { value: "casino-lp2", label: "Casino Landing Page 2" },
            Template { value: "casino-signup", label: "Casino Signup" },
        ],
    }
}

pub fn is_known_template(vertical: Vertical, value: &str) -> bool {
    templates_for(vertical).iter().any(|t| t.value == value)
}

/// The stored template value for the create-route request. Elite + Medicare
/// swaps in the Elite-prefixed variants at submit time only; the UI-level
/// selection stays generic.
pub fn submit_template(template: &str, organization: Organization, vertical: Vertical) -> &str {
    if organization == Organization::Elite && vertical == Vertical::MedicarePpc {
        match template {
            "cb-groc" => return "el-cb-groc",
            "cb-ss" => return "el-cb-ss",
            _ => {}
        }
    }
    template
}

/// Campaigns for the verticals that never talk to the provider.
pub fn static_campaigns(vertical: Vertical) -> Vec<Campaign> {
    let entries: &[(&str, &str)] = match vertical {
        Vertical::Sweeps => &[("sweep", "$750 Walmart Gift Card"), ("stimulus", "Stimulus")],
        Vertical::Nutra => &[
            ("nutra-campaign-1", "Weight Loss Supplement Campaign"),
            ("nutra-campaign-2", "Muscle Building Campaign"),
            ("nutra-campaign-3", "Vitamin Supplement Campaign"),
        ],
        Vertical::Casino => &[
            ("casino-campaign-1", "Casino Signup Bonus Campaign"),
            ("casino-campaign-2", "Online Casino Promo Campaign"),
            ("casino-campaign-3", "Casino Welcome Bonus Campaign"),
        ],
        Vertical::MedicarePpc | Vertical::DebtPpc => &[],
    };
    entries
        .iter()
        .map(|(id, name)| Campaign {
            id: (*id).to_string(),
            name: (*name).to_string(),
        })
        .collect()
}
