//! Safety assessment records: hazards, compliance verdicts, and the
//! reduced score/risk view consumed by the safety panel and the assistant.

use serde::{Deserialize, Serialize};

/// Category of a detected unsafe condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardKind {
    Overcurrent,
    Overvoltage,
    ShortCircuit,
    GroundFault,
    Thermal,
    ArcFlash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardSeverity {
    Low,
    Medium,
    High,
    Critical,
}

/// A detected unsafe condition, independent of any named standard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyHazard {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: HazardKind,
    pub severity: HazardSeverity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    pub description: String,
    pub mitigation: String,
}

impl SafetyHazard {
    pub fn new(
        kind: HazardKind,
        severity: HazardSeverity,
        description: impl Into<String>,
        mitigation: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            severity,
            component: None,
            description: description.into(),
            mitigation: mitigation.into(),
        }
    }

    pub fn for_component(mut self, id: impl Into<String>) -> Self {
        self.component = Some(id.into());
        self
    }

    /// Deduplication key: hazards describing the same condition on the same
    /// component are the same hazard regardless of which detector pass
    /// produced them.
    pub fn dedup_key(&self) -> (HazardKind, String, String) {
        (
            self.kind,
            self.component.clone().unwrap_or_else(|| "global".to_string()),
            self.description.clone(),
        )
    }
}

/// The regulatory standards the engine checks against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Standard {
    #[serde(rename = "NEC")]
    Nec,
    #[serde(rename = "OSHA")]
    Osha,
    #[serde(rename = "NFPA")]
    Nfpa,
}

impl Standard {
    pub fn label(&self) -> &'static str {
        match self {
            Standard::Nec => "NEC",
            Standard::Osha => "OSHA",
            Standard::Nfpa => "NFPA 70E",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Compliant,
    Warning,
    NonCompliant,
}

/// One verdict against one named standard. The description always spells
/// out the numeric comparison it rests on; it is the primary user-facing
/// explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceCheck {
    pub standard: Standard,
    pub status: ComplianceStatus,
    pub description: String,
}

/// Risk tier reduced from hazards and score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// The full safety verdict for one circuit snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyAssessment {
    /// 0-100; higher is safer.
    pub safety_score: f64,
    pub hazards: Vec<SafetyHazard>,
    pub compliance: Vec<ComplianceCheck>,
    /// Deduplicated, order-preserving mitigation texts plus boilerplate.
    pub recommendations: Vec<String>,
    pub risk_level: RiskLevel,
}

impl SafetyAssessment {
    pub fn worst_hazard(&self) -> Option<HazardSeverity> {
        self.hazards.iter().map(|h| h.severity).max()
    }

    pub fn non_compliant_count(&self) -> usize {
        self.compliance
            .iter()
            .filter(|c| c.status == ComplianceStatus::NonCompliant)
            .count()
    }
}
