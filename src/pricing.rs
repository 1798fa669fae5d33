//! Static pricing catalog for the three proxy products.

/// A proxy product line with its own tier table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Product {
    Residential,
    ResidentialMobile,
    Datacenter,
}

impl Product {
    pub const ALL: [Product; 3] = [
        Product::Residential,
        Product::ResidentialMobile,
        Product::Datacenter,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Product::Residential => "Residential",
            Product::ResidentialMobile => "Residential Mobile",
            Product::Datacenter => "Datacenter",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Product::Residential => "",
            Product::ResidentialMobile => "",
            Product::Datacenter => "󰒋",
        }
    }

    pub fn tiers(&self) -> &'static [PlanTier; 4] {
        match self {
            Product::Residential => &RESIDENTIAL,
            Product::ResidentialMobile => &RESIDENTIAL_MOBILE,
            Product::Datacenter => &DATACENTER,
        }
    }
}

/// One row of a product's pricing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanTier {
    pub name: &'static str,
    pub price_per_gb: &'static str,
    pub traffic_limit: &'static str,
    pub badge: Option<&'static str>,
}

impl PlanTier {
    /// Tiers without self-serve pricing are quoted by sales.
    pub fn is_custom(&self) -> bool {
        self.price_per_gb == "Custom Pricing"
    }

    pub fn action(&self) -> &'static str {
        if self.is_custom() {
            "Contact Sales"
        } else {
            "Choose Plan"
        }
    }
}

const RESIDENTIAL: [PlanTier; 4] = [
    PlanTier {
        name: "Starter",
        price_per_gb: "$2.00",
        traffic_limit: "Up to 500GB",
        badge: None,
    },
    PlanTier {
        name: "Business",
        price_per_gb: "$1.50",
        traffic_limit: "Up to 2TB",
        badge: Some("Most Popular"),
    },
    PlanTier {
        name: "Business Plus+",
        price_per_gb: "$1.25",
        traffic_limit: "Up to 10TB",
        badge: None,
    },
    PlanTier {
        name: "Ultra Enterprise",
        price_per_gb: "Custom Pricing",
        traffic_limit: "Unlimited",
        badge: None,
    },
];

const RESIDENTIAL_MOBILE: [PlanTier; 4] = [
    PlanTier {
        name: "Starter",
        price_per_gb: "$2.50",
        traffic_limit: "Up to 500GB",
        badge: None,
    },
    PlanTier {
        name: "Business",
        price_per_gb: "$1.80",
        traffic_limit: "Up to 2TB",
        badge: None,
    },
    PlanTier {
        name: "Business Plus+",
        price_per_gb: "$1.50",
        traffic_limit: "Up to 10TB",
        badge: None,
    },
    PlanTier {
        name: "Ultra Enterprise",
        price_per_gb: "Custom Pricing",
        traffic_limit: "Unlimited",
        badge: None,
    },
];

const DATACENTER: [PlanTier; 4] = [
    PlanTier {
        name: "Starter",
        price_per_gb: "$1.00",
        traffic_limit: "Up to 5TB",
        badge: None,
    },
    PlanTier {
        name: "Business",
        price_per_gb: "$0.75",
        traffic_limit: "Up to 20TB",
        badge: None,
    },
    PlanTier {
        name: "Business Plus+",
        price_per_gb: "$0.50",
        traffic_limit: "Up to 50TB",
        badge: None,
    },
    PlanTier {
        name: "Ultra Enterprise",
        price_per_gb: "Custom Pricing",
        traffic_limit: "Unlimited",
        badge: None,
    },
];

/// The one-line selling points shown above the tier table.
pub const PERKS: [(&str, &str); 3] = [
    (
        "Better Rates Over Time",
        "As you use more bandwidth, you unlock lower pricing tiers, ensuring the best rates for high-volume users.",
    ),
    (
        "Scalable Plans",
        "Upgrade seamlessly as your needs grow. Flexible pricing ensures cost efficiency for all user levels.",
    ),
    (
        "Enterprise Discounts",
        "Custom pricing is available for high-volume clients with special requirements. Contact our sales team for exclusive offers.",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_product_has_four_tiers_ending_in_a_custom_quote() {
        for product in Product::ALL {
            let tiers = product.tiers();
            assert_eq!(tiers.len(), 4);
            let last = &tiers[3];
            assert_eq!(last.name, "Ultra Enterprise");
            assert!(last.is_custom());
            assert_eq!(last.action(), "Contact Sales");
            assert_eq!(last.traffic_limit, "Unlimited");
        }
    }

    #[test]
    fn self_serve_tiers_offer_checkout() {
        let starter = &Product::Residential.tiers()[0];
        assert!(!starter.is_custom());
        assert_eq!(starter.action(), "Choose Plan");
    }

    #[test]
    fn only_residential_business_carries_the_badge() {
        assert_eq!(Product::Residential.tiers()[1].badge, Some("Most Popular"));
        assert!(Product::ResidentialMobile.tiers()[1].badge.is_none());
        assert!(Product::Datacenter.tiers()[1].badge.is_none());
    }
}
