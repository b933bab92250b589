//! Template tier catalog.
//!
//! A tier is a price bracket grouping several templates that are unlocked
//! together by one purchase. The catalog is static product data: every
//! template id belongs to exactly one tier, and a tier's price applies
//! uniformly to all of its templates.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Free,
    Premium,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateEntry {
    pub id: &'static str,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: TemplateKind,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierDefinition {
    pub title: &'static str,
    pub description: &'static str,
    /// Local-currency price. `None` marks the tier as free.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usd_price: Option<f64>,
    pub templates: &'static [TemplateEntry],
}

impl TierDefinition {
    pub fn is_free(&self) -> bool {
        self.price.is_none()
    }

    /// Whether `template_id` is in this tier's sibling set, the set a
    /// single purchase unlocks together.
    pub fn contains(&self, template_id: &str) -> bool {
        self.templates.iter().any(|t| t.id == template_id)
    }
}

const fn free(id: &'static str, name: &'static str) -> TemplateEntry {
    TemplateEntry {
        id,
        name,
        kind: TemplateKind::Free,
    }
}

const fn premium(id: &'static str, name: &'static str) -> TemplateEntry {
    TemplateEntry {
        id,
        name,
        kind: TemplateKind::Premium,
    }
}

pub const TIERS: &[TierDefinition] = &[
    TierDefinition {
        title: "Free",
        description: "Get started with our classic, professional template.",
        price: None,
        usd_price: None,
        templates: &[free("classic", "Classic")],
    },
    TierDefinition {
        title: "Standard",
        description: "Well-balanced templates for a variety of roles.",
        price: Some(400),
        usd_price: Some(1.5),
        templates: &[
            premium("modern", "Modern"),
            premium("creative", "Creative"),
            premium("professional", "Professional"),
            premium("minimalist", "Minimalist"),
            premium("executive", "Executive"),
        ],
    },
    TierDefinition {
        title: "Premium",
        description: "Elegant and bold designs to make you stand out.",
        price: Some(700),
        usd_price: Some(2.5),
        templates: &[
            premium("elegant", "Elegant"),
            premium("bold", "Bold"),
            premium("academic", "Academic"),
            premium("tech", "Tech"),
            premium("designer", "Designer"),
        ],
    },
    TierDefinition {
        title: "Executive",
        description: "Top-tier templates for leadership and artistic roles.",
        price: Some(900),
        usd_price: Some(3.0),
        templates: &[
            premium("corporate", "Corporate"),
            premium("artistic", "Artistic"),
            premium("sleek", "Sleek"),
            premium("vintage", "Vintage"),
            premium("premium-plus", "Premium Plus"),
        ],
    },
    TierDefinition {
        title: "Platinum",
        description: "Exclusive designs for the ultimate professional impression.",
        price: Some(1500),
        usd_price: Some(5.0),
        templates: &[
            premium("platinum", "Platinum"),
            premium("luxe", "Luxe"),
            premium("visionary", "Visionary"),
            premium("prestige", "Prestige"),
            premium("avant-garde", "Avant-Garde"),
        ],
    },
];

/// Resolves the tier a template belongs to. `None` for unknown ids; callers
/// degrade to "locked" rather than erroring.
pub fn tier_for(template_id: &str) -> Option<&'static TierDefinition> {
    TIERS.iter().find(|t| t.contains(template_id))
}

pub fn is_known_template(template_id: &str) -> bool {
    tier_for(template_id).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_template_belongs_to_exactly_one_tier() {
        let mut seen = HashSet::new();
        for tier in TIERS {
            for t in tier.templates {
                assert!(seen.insert(t.id), "template {} appears twice", t.id);
            }
        }
        assert_eq!(seen.len(), 21);
    }

    #[test]
    fn test_free_tier_has_no_price() {
        let tier = tier_for("classic").unwrap();
        assert!(tier.is_free());
        assert_eq!(tier.usd_price, None);
    }

    #[test]
    fn test_priced_tiers_contain_only_premium_templates() {
        for tier in TIERS.iter().filter(|t| !t.is_free()) {
            assert!(tier.templates.iter().all(|t| t.kind == TemplateKind::Premium));
        }
    }

    #[test]
    fn test_tier_for_resolves_siblings() {
        let tier = tier_for("modern").unwrap();
        assert_eq!(tier.title, "Standard");
        assert!(tier.contains("creative"));
        assert!(!tier.contains("elegant"));
    }

    #[test]
    fn test_unknown_template_resolves_to_none() {
        assert!(tier_for("does-not-exist").is_none());
        assert!(!is_known_template(""));
    }
}
