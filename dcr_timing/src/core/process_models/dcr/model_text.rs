use std::{collections::HashMap, fmt::Display, path::Path};

use serde::{Deserialize, Serialize};

use super::{ConstraintKind, ConstraintSpec};

/// Error type for reading and writing [`DcrModel`] text
#[derive(Debug)]
pub enum DcrModelError {
    /// IO Error
    Io(std::io::Error),
    /// A line is missing an event name required by its keyword
    MissingEvent {
        /// Line number (1-based)
        line: usize,
        /// Keyword of the line (e.g., `CONDITION`)
        keyword: String,
    },
}

impl Display for DcrModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DcrModelError::Io(e) => write!(f, "IO Error: {e}"),
            DcrModelError::MissingEvent { line, keyword } => {
                write!(f, "Missing event name for {keyword} at line {line}")
            }
        }
    }
}

impl std::error::Error for DcrModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DcrModelError::Io(e) => Some(e),
            DcrModelError::MissingEvent { .. } => None,
        }
    }
}

impl From<std::io::Error> for DcrModelError {
    fn from(e: std::io::Error) -> Self {
        DcrModelError::Io(e)
    }
}

/// Relation types of a DCR graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DcrRelation {
    /// Source must have happened before target can happen
    Condition,
    /// Source requires target to eventually happen afterwards
    Response,
    /// Source includes target
    Include,
    /// Source excludes target
    Exclude,
}

impl DcrRelation {
    /// Keyword of this relation in DCR model text
    pub fn keyword(&self) -> &'static str {
        match self {
            DcrRelation::Condition => "CONDITION",
            DcrRelation::Response => "RESPONSE",
            DcrRelation::Include => "INCLUDE",
            DcrRelation::Exclude => "EXCLUDE",
        }
    }

    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "CONDITION" => Some(DcrRelation::Condition),
            "RESPONSE" => Some(DcrRelation::Response),
            "INCLUDE" => Some(DcrRelation::Include),
            "EXCLUDE" => Some(DcrRelation::Exclude),
            _ => None,
        }
    }

    /// The timed constraint kind carried by this relation, if any
    pub fn constraint_kind(&self) -> Option<ConstraintKind> {
        ConstraintKind::from_name(self.keyword())
    }
}

/// A single line of DCR model text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DcrLine {
    /// Event declaration (`EVENT,<name>`)
    Event(String),
    /// Relation between two events (`<RELATION>,<from>,<to>[,<extra>...]`)
    Relation {
        /// Relation type
        relation: DcrRelation,
        /// Source event
        from_event: String,
        /// Target event
        to_event: String,
        /// Additional fields after the two events (e.g., a previously written bound)
        extra: Vec<String>,
    },
    /// Any other line, kept verbatim
    Other(String),
}

impl Display for DcrLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DcrLine::Event(name) => write!(f, "EVENT,{name}"),
            DcrLine::Relation {
                relation,
                from_event,
                to_event,
                extra,
            } => {
                write!(f, "{},{from_event},{to_event}", relation.keyword())?;
                for field in extra {
                    write!(f, ",{field}")?;
                }
                Ok(())
            }
            DcrLine::Other(line) => write!(f, "{line}"),
        }
    }
}

///
/// DCR model in its line-based text representation
///
/// Each line has the shape `KEYWORD,arg1,arg2,...`:
///
/// ```text
/// EVENT,Create Fine
/// EVENT,Send Fine
/// CONDITION,Create Fine,Send Fine
/// RESPONSE,Create Fine,Send Fine
/// ```
///
/// Lines with unknown keywords are kept as-is, so that writing a model back preserves them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DcrModel {
    /// Lines of the model, in file order
    pub lines: Vec<DcrLine>,
}

impl DcrModel {
    /// Parse DCR model text
    ///
    /// Surrounding whitespace of every field is removed, matching how the CSV event table import reads activity names.
    pub fn parse(text: &str) -> Result<Self, DcrModelError> {
        let lines = text
            .lines()
            .enumerate()
            .map(|(index, line)| parse_line(index + 1, line.trim()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { lines })
    }

    /// Read and parse DCR model text from a file
    pub fn import_from_path<P: AsRef<Path>>(path: P) -> Result<Self, DcrModelError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Names of all declared events
    pub fn events(&self) -> impl Iterator<Item = &str> + '_ {
        self.lines.iter().filter_map(|l| match l {
            DcrLine::Event(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// `(from, to)` event pairs of all relations of the given type
    pub fn relations(&self, relation_type: DcrRelation) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.lines.iter().filter_map(move |l| match l {
            DcrLine::Relation {
                relation,
                from_event,
                to_event,
                ..
            } if *relation == relation_type => Some((from_event.as_str(), to_event.as_str())),
            _ => None,
        })
    }

    ///
    /// Timed constraints to analyze for this model
    ///
    /// All condition relations (as [`ConstraintKind::MinDelay`]) come first, followed by all response relations (as [`ConstraintKind::MaxDeadline`]).
    pub fn timing_constraints(&self) -> Vec<ConstraintSpec> {
        [DcrRelation::Condition, DcrRelation::Response]
            .into_iter()
            .flat_map(|relation| {
                let kind = relation.constraint_kind();
                self.relations(relation)
                    .filter_map(move |(from, to)| kind.map(|k| ConstraintSpec::new(k, from, to)))
            })
            .collect()
    }

    ///
    /// Render the model as text, annotating timed relations with the given bounds (in days)
    ///
    /// A relation with a bound is written as `<RELATION>,<from>,<to>,<bound>`, replacing previously written extra fields.
    /// Relations without a bound are written unchanged.
    pub fn to_text_with_bounds(&self, bounds: &HashMap<ConstraintSpec, f64>) -> String {
        let mut text = String::new();
        for line in &self.lines {
            let bound = match line {
                DcrLine::Relation {
                    relation,
                    from_event,
                    to_event,
                    ..
                } => relation.constraint_kind().and_then(|kind| {
                    bounds.get(&ConstraintSpec::new(kind, from_event.as_str(), to_event.as_str()))
                }),
                _ => None,
            };
            match (line, bound) {
                (
                    DcrLine::Relation {
                        relation,
                        from_event,
                        to_event,
                        ..
                    },
                    Some(bound),
                ) => {
                    text.push_str(&format!(
                        "{},{from_event},{to_event},{bound}",
                        relation.keyword()
                    ));
                }
                (line, _) => text.push_str(&line.to_string()),
            }
            text.push('\n');
        }
        text
    }

    /// Write the model annotated with bounds (see [`DcrModel::to_text_with_bounds`]) to a file
    pub fn export_with_bounds_to_path<P: AsRef<Path>>(
        &self,
        path: P,
        bounds: &HashMap<ConstraintSpec, f64>,
    ) -> Result<(), DcrModelError> {
        std::fs::write(path, self.to_text_with_bounds(bounds))?;
        Ok(())
    }
}

impl Display for DcrModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

fn parse_line(line_number: usize, line: &str) -> Result<DcrLine, DcrModelError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let missing = || DcrModelError::MissingEvent {
        line: line_number,
        keyword: fields[0].to_string(),
    };
    if fields[0] == "EVENT" {
        return match fields.get(1) {
            Some(name) if !name.is_empty() => Ok(DcrLine::Event(name.to_string())),
            _ => Err(missing()),
        };
    }
    let Some(relation) = DcrRelation::from_keyword(fields[0]) else {
        return Ok(DcrLine::Other(line.to_string()));
    };
    match (fields.get(1), fields.get(2)) {
        (Some(from), Some(to)) if !from.is_empty() && !to.is_empty() => Ok(DcrLine::Relation {
            relation,
            from_event: from.to_string(),
            to_event: to.to_string(),
            extra: fields[3..].iter().map(|f| f.to_string()).collect(),
        }),
        _ => Err(missing()),
    }
}
