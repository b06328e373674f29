//! The media-buyer roster, the per-person routing constants, and the fuzzy
//! match that auto-selects a buyer for mediaBuyer-role users.

use crate::types::{CampaignDetails, MediaBuyer, RoutingDetails};

#[derive(Debug, Clone, Copy)]
pub struct NamedBuyer {
    pub name: &'static str,
    pub email: &'static str,
    pub details: RoutingDetails,
}

pub const JAKE: NamedBuyer = NamedBuyer {
    name: "Jake Hunter",
    email: "jake@paragonmedia.io",
    details: RoutingDetails {
        ringba_id: "CAd4c016a37829477688c3482fb6fd01de",
        phone_number: "+18664982822",
    },
};

pub const ADDY: NamedBuyer = NamedBuyer {
    name: "Addy Jaloudi",
    email: "addy@paragonmedia.io",
    details: RoutingDetails {
        ringba_id: "CAd4c016a37829477688c3482fb6fd01de",
        phone_number: "+18447840433",
    },
};

pub const SEAN: NamedBuyer = NamedBuyer {
    name: "Sean Luc",
    email: "sean@paragonmedia.io",
    details: RoutingDetails {
        ringba_id: "CAd4c016a37829477688c3482fb6fd01de",
        phone_number: "+18333530496",
    },
};

/// Pinned routing pair for the Elite organization, used regardless of
/// vertical or buyer.
pub const ELITE_DETAILS: RoutingDetails = RoutingDetails {
    ringba_id: "CA96589cff1d5d4fa48f459da7dbd3a728",
    phone_number: "+13213980346",
};

/// The fixed roster for verticals with no provider-backed campaign.
pub const FIXED_ROSTER: &[NamedBuyer] = &[JAKE, ADDY, SEAN];

pub fn roster_media_buyers() -> Vec<MediaBuyer> {
    FIXED_ROSTER
        .iter()
        .map(|buyer| MediaBuyer {
            name: buyer.name.to_string(),
            campaign_id: buyer.details.ringba_id.to_string(),
            e164_number: buyer.details.phone_number.to_string(),
        })
        .collect()
}

/// Map a buyer display name to the account email, tolerating the short
/// first-name-only form the provider sometimes returns.
pub fn buyer_email(name: &str) -> Option<&'static str> {
    let name = name.trim();
    for buyer in FIXED_ROSTER {
        let first_name = buyer.name.split_whitespace().next().unwrap_or(buyer.name);
        if name.eq_ignore_ascii_case(buyer.name) || name.eq_ignore_ascii_case(first_name) {
            return Some(buyer.email);
        }
    }
    None
}

/// One buyer per tag entry; a tag without a previous number still surfaces
/// so the operator can pick it and enter the number manually.
pub fn media_buyers_from(details: &CampaignDetails) -> Vec<MediaBuyer> {
    details
        .js_tags
        .values()
        .map(|tag| MediaBuyer {
            name: tag.name.clone(),
            campaign_id: tag.campaign_id.clone(),
            e164_number: tag
                .previous_number
                .as_ref()
                .map(|n| n.e164_number.clone())
                .unwrap_or_else(|| "N/A".to_string()),
        })
        .collect()
}

/// Four-tier fuzzy match of a user against the buyer list, in priority
/// order:
/// 1. exact full-name match;
/// 2. case-insensitive first-name match;
/// 3. buyer name contains the first name (case-insensitive);
/// 4. first name contains the buyer name (case-insensitive).
pub fn match_media_buyer<'a>(
    buyers: &'a [MediaBuyer],
    first_name: &str,
    last_name: &str,
) -> Option<&'a MediaBuyer> {
    let full_name = format!("{} {}", first_name.trim(), last_name.trim())
        .trim()
        .to_string();

    if let Some(buyer) = buyers.iter().find(|b| b.name.trim() == full_name) {
        return Some(buyer);
    }

    let first_lower = first_name.trim().to_lowercase();
    if first_lower.is_empty() {
        return None;
    }

    buyers
        .iter()
        .find(|b| b.name.trim().to_lowercase() == first_lower)
        .or_else(|| {
            buyers
                .iter()
                .find(|b| b.name.trim().to_lowercase().contains(&first_lower))
        })
        .or_else(|| {
            buyers.iter().find(|b| {
                let name = b.name.trim().to_lowercase();
                !name.is_empty() && first_lower.contains(&name)
            })
        })
}
