/// Project file loading: alternatives plus one judge's or several experts'
/// pairwise judgments.
///
/// TOML by default; content starting with `{` is read as JSON. Alternatives
/// in a judgment can be referenced by index or by name.
use ahp_core::{Direction, Judgment, JudgmentSet, ScaleFamily};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::bail;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AlternativeRef {
    Index(usize),
    Name(String),
}

#[derive(Debug, Deserialize)]
pub struct JudgmentEntry {
    pub a: AlternativeRef,
    pub b: AlternativeRef,
    /// Ratio of a over b. Mutually exclusive with `grade`.
    pub value: Option<f64>,
    /// Grade 1..9 on the project's scale family.
    pub grade: Option<i32>,
    /// Whether `a` is more or less important than `b`. Default: more.
    pub direction: Option<Direction>,
}

#[derive(Debug, Deserialize)]
pub struct ExpertEntry {
    pub id: i64,
    pub name: Option<String>,
    #[serde(default)]
    pub judgments: Vec<JudgmentEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectFile {
    pub title: Option<String>,
    pub alternatives: Vec<String>,
    /// Scale family name or id (1..5). Falls back to config, then integer.
    pub scale: Option<String>,
    #[serde(default)]
    pub judgments: Vec<JudgmentEntry>,
    #[serde(default)]
    pub experts: Vec<ExpertEntry>,
}

/// Parse project content, auto-detecting JSON vs TOML.
pub fn parse_project_str(content: &str) -> Result<ProjectFile, String> {
    let trimmed = content.trim();
    let project: ProjectFile = if trimmed.starts_with('{') {
        serde_json::from_str(trimmed).map_err(|e| format!("invalid JSON project: {e}"))?
    } else {
        toml::from_str(trimmed).map_err(|e| format!("invalid TOML project: {e}"))?
    };

    if project.alternatives.len() < 2 {
        return Err(format!(
            "Need at least 2 alternatives to rank, got {}",
            project.alternatives.len()
        ));
    }
    for (i, name) in project.alternatives.iter().enumerate() {
        if project.alternatives[..i].contains(name) {
            return Err(format!("Duplicate alternative \"{name}\""));
        }
    }
    Ok(project)
}

pub fn load_project(path: &Path) -> ProjectFile {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| bail(format!("Failed to read project file {}: {e}", path.display())));
    parse_project_str(&content)
        .unwrap_or_else(|e| bail(format!("{}: {e}", path.display())))
}

impl ProjectFile {
    pub fn num_alternatives(&self) -> usize {
        self.alternatives.len()
    }

    fn resolve(&self, alt: &AlternativeRef) -> Result<usize, String> {
        match alt {
            AlternativeRef::Index(idx) if *idx < self.alternatives.len() => Ok(*idx),
            AlternativeRef::Index(idx) => Err(format!(
                "alternative index {idx} out of range ({} alternatives)",
                self.alternatives.len()
            )),
            AlternativeRef::Name(name) => self
                .alternatives
                .iter()
                .position(|a| a == name)
                .ok_or_else(|| format!("unknown alternative \"{name}\"")),
        }
    }

    fn to_judgment(&self, entry: &JudgmentEntry, family: ScaleFamily) -> Result<Judgment, String> {
        let a = self.resolve(&entry.a)?;
        let b = self.resolve(&entry.b)?;
        if a == b {
            return Err(format!(
                "\"{}\" is compared with itself",
                self.alternatives[a]
            ));
        }

        let direction = entry.direction.unwrap_or_default();
        match (entry.value, entry.grade) {
            (Some(value), None) => {
                if !(value > 0.0) || !value.is_finite() {
                    return Err(format!(
                        "ratio for \"{}\" vs \"{}\" must be positive, got {value}",
                        self.alternatives[a], self.alternatives[b]
                    ));
                }
                let value = match direction {
                    Direction::More => value,
                    Direction::Less => 1.0 / value,
                };
                Ok(Judgment::new(a, b, value))
            }
            (None, Some(grade)) => Ok(Judgment::from_grade(a, b, grade, direction, family)),
            (Some(_), Some(_)) => Err(format!(
                "judgment \"{}\" vs \"{}\" has both value and grade",
                self.alternatives[a], self.alternatives[b]
            )),
            (None, None) => Err(format!(
                "judgment \"{}\" vs \"{}\" needs a value or a grade",
                self.alternatives[a], self.alternatives[b]
            )),
        }
    }

    fn judgment_set(&self, entries: &[JudgmentEntry], family: ScaleFamily) -> Result<JudgmentSet, String> {
        let mut set = JudgmentSet::new(self.num_alternatives());
        for entry in entries {
            let judgment = self.to_judgment(entry, family)?;
            if let Some(previous) = set.insert(judgment).map_err(|e| e.to_string())? {
                tracing::warn!(
                    a = %self.alternatives[previous.i],
                    b = %self.alternatives[previous.j],
                    "pair judged twice, keeping the later judgment"
                );
            }
        }
        Ok(set)
    }

    /// The single judge's judgments (top-level `judgments`).
    pub fn single_judge_set(&self, family: ScaleFamily) -> Result<JudgmentSet, String> {
        self.judgment_set(&self.judgments, family)
    }

    /// Every expert's judgments, keyed by expert ID.
    pub fn expert_sets(&self, family: ScaleFamily) -> Result<BTreeMap<i64, JudgmentSet>, String> {
        let mut sets = BTreeMap::new();
        for expert in &self.experts {
            let set = self
                .judgment_set(&expert.judgments, family)
                .map_err(|e| format!("expert {}: {e}", expert.id))?;
            if sets.insert(expert.id, set).is_some() {
                return Err(format!("duplicate expert id {}", expert.id));
            }
        }
        Ok(sets)
    }

    /// Display name for an expert ID (falls back to the ID).
    pub fn expert_name(&self, id: i64) -> String {
        self.experts
            .iter()
            .find(|e| e.id == id)
            .and_then(|e| e.name.clone())
            .unwrap_or_else(|| format!("expert {id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOML_PROJECT: &str = r#"
title = "Laptop"
alternatives = ["Alpha", "Beta", "Gamma"]
scale = "power"

[[judgments]]
a = 0
b = 1
value = 3.0

[[judgments]]
a = "Alpha"
b = "Gamma"
grade = 9

[[judgments]]
a = "Gamma"
b = "Beta"
grade = 5
direction = "less"
"#;

    #[test]
    fn test_parse_toml_project() {
        let project = parse_project_str(TOML_PROJECT).unwrap();
        assert_eq!(project.title.as_deref(), Some("Laptop"));
        assert_eq!(project.num_alternatives(), 3);

        let set = project.single_judge_set(ScaleFamily::Power).unwrap();
        assert!(set.is_complete());
        assert_eq!(set.get(0, 1).unwrap().value, 3.0);
        assert!((set.get(0, 2).unwrap().value - 9.0).abs() < 1e-9);
        // Gamma less important than Beta by 9^(1/2) -> Beta over Gamma is 3.
        assert!((set.get(1, 2).unwrap().value - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_json_project_with_experts() {
        let json = r#"{
            "alternatives": ["A", "B"],
            "experts": [
                {"id": 1, "name": "Ann", "judgments": [{"a": 0, "b": 1, "value": 4.0}]},
                {"id": 2, "judgments": [{"a": 1, "b": 0, "value": 2.0}]}
            ]
        }"#;
        let project = parse_project_str(json).unwrap();
        let sets = project.expert_sets(ScaleFamily::Integer).unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[&2].get(0, 1).unwrap().value, 0.5);
        assert_eq!(project.expert_name(1), "Ann");
        assert_eq!(project.expert_name(2), "expert 2");
    }

    #[test]
    fn test_rejects_bad_projects() {
        assert!(parse_project_str("alternatives = [\"only\"]").is_err());
        assert!(parse_project_str("alternatives = [\"A\", \"A\"]").is_err());
        assert!(parse_project_str("{ not json").is_err());
    }

    #[test]
    fn test_rejects_bad_judgments() {
        let unknown = "alternatives = [\"A\", \"B\"]\n[[judgments]]\na = \"A\"\nb = \"Z\"\nvalue = 2.0\n";
        let project = parse_project_str(unknown).unwrap();
        assert!(project.single_judge_set(ScaleFamily::Integer).is_err());

        let both = "alternatives = [\"A\", \"B\"]\n[[judgments]]\na = 0\nb = 1\nvalue = 2.0\ngrade = 3\n";
        let project = parse_project_str(both).unwrap();
        assert!(project.single_judge_set(ScaleFamily::Integer).is_err());

        let neither = "alternatives = [\"A\", \"B\"]\n[[judgments]]\na = 0\nb = 1\n";
        let project = parse_project_str(neither).unwrap();
        assert!(project.single_judge_set(ScaleFamily::Integer).is_err());

        let negative = "alternatives = [\"A\", \"B\"]\n[[judgments]]\na = 0\nb = 1\nvalue = -2.0\n";
        let project = parse_project_str(negative).unwrap();
        assert!(project.single_judge_set(ScaleFamily::Integer).is_err());
    }

    #[test]
    fn test_duplicate_expert_ids() {
        let json = r#"{"alternatives": ["A", "B"], "experts": [{"id": 1}, {"id": 1}]}"#;
        let project = parse_project_str(json).unwrap();
        assert!(project.expert_sets(ScaleFamily::Integer).is_err());
    }
}
