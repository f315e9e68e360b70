//! Fixed catalogs the wizard selects from: resume templates, payment plans
//! and the suggested-skill list shown while building.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::BillingPeriod;

/// Identifier of a resume template in [`TEMPLATES`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(String);

impl TemplateId {
    /// Wrap a raw identifier. Whitespace is trimmed; blank ids are refused.
    pub fn new(id: impl AsRef<str>) -> Option<Self> {
        let id = id.as_ref().trim();
        if id.is_empty() {
            None
        } else {
            Some(Self(id.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a payment plan in [`PLANS`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanId(String);

impl PlanId {
    /// Wrap a raw identifier. Whitespace is trimmed; blank ids are refused.
    pub fn new(id: impl AsRef<str>) -> Option<Self> {
        let id = id.as_ref().trim();
        if id.is_empty() {
            None
        } else {
            Some(Self(id.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A resume layout the renderer knows how to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const TEMPLATES: &[Template] = &[
    Template {
        id: "professional",
        name: "Professional",
        description: "Clean and structured layout, perfect for corporate roles",
    },
    Template {
        id: "modern",
        name: "Modern",
        description: "Contemporary design with a creative touch",
    },
    Template {
        id: "minimal",
        name: "Minimal",
        description: "Simple and elegant, focuses on content",
    },
    Template {
        id: "creative",
        name: "Creative",
        description: "Bold design for creative industries",
    },
];

/// Look up a template by id.
pub fn find_template(id: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.id == id)
}

/// How many resumes a plan allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResumeAllowance {
    Limited(u32),
    Unlimited,
}

impl fmt::Display for ResumeAllowance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlimited => f.write_str("Unlimited Resumes"),
            Self::Limited(1) => f.write_str("1 Resume"),
            Self::Limited(n) => write!(f, "{} Resumes", n),
        }
    }
}

/// A purchasable plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    pub id: &'static str,
    pub name: &'static str,
    /// Price in whole US dollars
    pub price_usd: u32,
    pub description: &'static str,
    pub features: &'static [&'static str],
    pub allowance: ResumeAllowance,
    pub billing: BillingPeriod,
}

impl Plan {
    /// Call-to-action label, e.g. "Buy Now ($35/month)".
    pub fn call_to_action(&self) -> String {
        match self.billing {
            BillingPeriod::OneTime => format!("Buy Now (${})", self.price_usd),
            BillingPeriod::Monthly => format!("Buy Now (${}/month)", self.price_usd),
        }
    }
}

pub const PLANS: &[Plan] = &[
    Plan {
        id: "basic",
        name: "Basic",
        price_usd: 5,
        description: "Perfect for one-time job applications",
        features: &[
            "AI Resume Optimization",
            "Keyword Enhancement",
            "All Premium Templates",
            "ATS Compatibility Check",
            "PDF & Word Downloads",
        ],
        allowance: ResumeAllowance::Limited(1),
        billing: BillingPeriod::OneTime,
    },
    Plan {
        id: "standard",
        name: "Standard",
        price_usd: 20,
        description: "Ideal for active job seekers",
        features: &[
            "Everything in Basic",
            "Multiple Resume Versions",
            "Advanced Keyword Integration",
            "Customizable Sections",
            "Priority Support",
        ],
        allowance: ResumeAllowance::Limited(5),
        billing: BillingPeriod::OneTime,
    },
    Plan {
        id: "premium",
        name: "Premium",
        price_usd: 35,
        description: "Best for intensive job hunting",
        features: &[
            "Everything in Standard",
            "Unlimited Resume Optimizations",
            "Advanced Content Suggestions",
            "Priority Support",
            "Early Access to New Features",
        ],
        allowance: ResumeAllowance::Unlimited,
        billing: BillingPeriod::Monthly,
    },
];

/// Look up a plan by id.
pub fn find_plan(id: &str) -> Option<&'static Plan> {
    PLANS.iter().find(|p| p.id == id)
}

/// Skills offered as one-keypress additions on the building step.
pub const SUGGESTED_SKILLS: &[&str] = &[
    "Project Management",
    "React.js",
    "Data Analysis",
    "Communication",
    "Problem Solving",
    "Leadership",
    "JavaScript",
    "Python",
    "Marketing",
];
