use std::{fmt::Display, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Kind of timed constraint between two activities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintKind {
    /// The source activity must precede the target activity by at least some time
    ///
    /// Timed DCR _condition_ relation (rule `DELAY`)
    MinDelay,
    /// The source activity must be followed by the target activity within some time
    ///
    /// Timed DCR _response_ relation (rule `DEADLINE`)
    MaxDeadline,
}

/// Constant translation between constraint kinds, DCR relation names and timing rule names
pub static DCR_RULE_MAPPING: [(ConstraintKind, &str, &str); 2] = [
    (ConstraintKind::MinDelay, "CONDITION", "DELAY"),
    (ConstraintKind::MaxDeadline, "RESPONSE", "DEADLINE"),
];

impl ConstraintKind {
    /// All constraint kinds, in the order timed relations are analyzed
    pub const ALL: [ConstraintKind; 2] = [ConstraintKind::MinDelay, ConstraintKind::MaxDeadline];

    fn mapping(&self) -> &'static (ConstraintKind, &'static str, &'static str) {
        match self {
            ConstraintKind::MinDelay => &DCR_RULE_MAPPING[0],
            ConstraintKind::MaxDeadline => &DCR_RULE_MAPPING[1],
        }
    }

    /// Name of the DCR relation carrying this constraint (`CONDITION` or `RESPONSE`)
    pub fn dcr_relation(&self) -> &'static str {
        self.mapping().1
    }

    /// Name of the timing rule (`DELAY` or `DEADLINE`)
    pub fn rule_name(&self) -> &'static str {
        self.mapping().2
    }

    /// Look up a constraint kind by DCR relation name or rule name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        DCR_RULE_MAPPING
            .iter()
            .find(|(_, relation, rule)| {
                relation.eq_ignore_ascii_case(name) || rule.eq_ignore_ascii_case(name)
            })
            .map(|(kind, _, _)| *kind)
    }
}

impl Display for ConstraintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dcr_relation())
    }
}

/// Error returned when parsing an unknown [`ConstraintKind`] name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownConstraintKind(pub String);

impl Display for UnknownConstraintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown constraint kind: {}", self.0)
    }
}

impl std::error::Error for UnknownConstraintKind {}

impl FromStr for ConstraintKind {
    type Err = UnknownConstraintKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownConstraintKind(s.to_string()))
    }
}

///
/// A timed constraint between two activities, identifying one unit of timing analysis
///
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct ConstraintSpec {
    /// Constraint kind
    pub kind: ConstraintKind,
    /// Source activity (opening the interval)
    pub from_event: String,
    /// Target activity (closing the interval)
    pub to_event: String,
}

impl ConstraintSpec {
    /// Create a new constraint specification
    pub fn new<S: Into<String>, T: Into<String>>(
        kind: ConstraintKind,
        from_event: S,
        to_event: T,
    ) -> Self {
        Self {
            kind,
            from_event: from_event.into(),
            to_event: to_event.into(),
        }
    }
}

impl Display for ConstraintSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {} --> {}", self.kind, self.from_event, self.to_event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_mapping() {
        assert_eq!(ConstraintKind::MinDelay.dcr_relation(), "CONDITION");
        assert_eq!(ConstraintKind::MinDelay.rule_name(), "DELAY");
        assert_eq!(ConstraintKind::MaxDeadline.dcr_relation(), "RESPONSE");
        assert_eq!(ConstraintKind::MaxDeadline.rule_name(), "DEADLINE");
        for kind in ConstraintKind::ALL {
            assert_eq!(kind.dcr_relation().parse::<ConstraintKind>(), Ok(kind));
            assert_eq!(kind.rule_name().parse::<ConstraintKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("response".parse::<ConstraintKind>(), Ok(ConstraintKind::MaxDeadline));
        assert_eq!(
            "INCLUDE".parse::<ConstraintKind>(),
            Err(UnknownConstraintKind("INCLUDE".to_string()))
        );
    }

    #[test]
    fn test_display() {
        let spec = ConstraintSpec::new(ConstraintKind::MaxDeadline, "a", "b");
        assert_eq!(spec.to_string(), "RESPONSE, a --> b");
        let json = serde_json::to_string(&spec.kind).unwrap();
        assert_eq!(json, "\"MAX_DEADLINE\"");
    }
}
