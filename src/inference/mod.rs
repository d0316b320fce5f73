//! Prediction collaborators
//!
//! Pure text-in, label-out models behind the prediction endpoints.
//! Each is a lexical model loaded once at startup from a JSON file and
//! read-only afterwards; none of them touch the document store or the
//! analytics core.

pub mod text;

use std::collections::HashSet;
use std::fs;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::ModelsConfig;
use text::clean_text;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiseasePrediction {
    pub disease: String,
    pub cures: String,
    pub doctor: String,
    #[serde(rename = "riskLevel")]
    pub risk_level: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Answer {
    pub answer: String,
    pub category: String,
}

#[derive(Debug, Clone, Deserialize)]
struct DiseaseEntry {
    keywords: Vec<String>,
    #[serde(flatten)]
    prediction: DiseasePrediction,
}

/// Symptom-keyword disease classifier. The entry with the most keyword
/// hits wins; earlier entries win ties.
pub struct DiseaseModel {
    entries: Vec<DiseaseEntry>,
}

impl DiseaseModel {
    pub fn load(path: &str) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading disease model from {path}"))?;
        let entries: Vec<DiseaseEntry> =
            serde_json::from_str(&raw).with_context(|| format!("parsing disease model {path}"))?;
        Ok(Self { entries })
    }

    pub fn classify(&self, symptoms: &str) -> Option<DiseasePrediction> {
        let cleaned = clean_text(symptoms);
        if cleaned.is_empty() {
            return None;
        }
        best_match(&self.entries, &cleaned, |entry| &entry.keywords)
            .map(|entry| entry.prediction.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ConditionEntry {
    keywords: Vec<String>,
    label: String,
}

/// Mental-health condition classifier over the same keyword scheme.
/// No keyword hit falls back to the default label.
pub struct MentalHealthModel {
    entries: Vec<ConditionEntry>,
    default_label: String,
}

#[derive(Debug, Clone, Deserialize)]
struct MentalHealthFile {
    default_label: String,
    entries: Vec<ConditionEntry>,
}

impl MentalHealthModel {
    pub fn load(path: &str) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading mental-health model from {path}"))?;
        let file: MentalHealthFile = serde_json::from_str(&raw)
            .with_context(|| format!("parsing mental-health model {path}"))?;
        Ok(Self {
            entries: file.entries,
            default_label: file.default_label,
        })
    }

    pub fn classify(&self, message: &str) -> String {
        let cleaned = clean_text(message);
        best_match(&self.entries, &cleaned, |entry| &entry.keywords)
            .map(|entry| entry.label.clone())
            .unwrap_or_else(|| self.default_label.clone())
    }
}

fn best_match<'a, T>(
    entries: &'a [T],
    cleaned: &str,
    keywords: impl Fn(&T) -> &Vec<String>,
) -> Option<&'a T> {
    let mut best: Option<(usize, &T)> = None;
    for entry in entries {
        let score = keywords(entry)
            .iter()
            .filter(|keyword| cleaned.contains(keyword.as_str()))
            .count();
        if score > 0 && best.map_or(true, |(top, _)| score > top) {
            best = Some((score, entry));
        }
    }
    best.map(|(_, entry)| entry)
}

#[derive(Debug, Clone, Deserialize)]
struct QaEntry {
    question: String,
    answer: String,
    category: String,
}

/// Question-answer retrieval index. Queries are matched against the
/// indexed questions by token overlap; `search` returns the top-n
/// answers by score.
pub struct AnswerIndex {
    entries: Vec<(HashSet<String>, Answer)>,
}

impl AnswerIndex {
    pub fn load(path: &str) -> Result<Self> {
        let raw =
            fs::read_to_string(path).with_context(|| format!("reading QA index from {path}"))?;
        let entries: Vec<QaEntry> =
            serde_json::from_str(&raw).with_context(|| format!("parsing QA index {path}"))?;
        Ok(Self {
            entries: entries
                .into_iter()
                .map(|entry| {
                    let tokens = tokens(&clean_text(&entry.question));
                    (
                        tokens,
                        Answer {
                            answer: entry.answer,
                            category: entry.category,
                        },
                    )
                })
                .collect(),
        })
    }

    pub fn search(&self, query: &str, top_n: usize) -> Vec<Answer> {
        let query_tokens = tokens(&clean_text(query));
        if query_tokens.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(f64, &Answer)> = self
            .entries
            .iter()
            .filter_map(|(question_tokens, answer)| {
                let overlap = question_tokens.intersection(&query_tokens).count();
                if overlap == 0 {
                    return None;
                }
                let union = question_tokens.union(&query_tokens).count();
                Some((overlap as f64 / union as f64, answer))
            })
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored
            .into_iter()
            .take(top_n)
            .map(|(_, answer)| answer.clone())
            .collect()
    }
}

fn tokens(cleaned: &str) -> HashSet<String> {
    cleaned.split_whitespace().map(str::to_string).collect()
}

/// All prediction models, loaded once at startup.
pub struct Models {
    pub disease: DiseaseModel,
    pub mental_health: MentalHealthModel,
    pub medical_qa: AnswerIndex,
}

impl Models {
    pub fn load(config: &ModelsConfig) -> Result<Self> {
        let models = Self {
            disease: DiseaseModel::load(&config.disease)?,
            mental_health: MentalHealthModel::load(&config.mental_health)?,
            medical_qa: AnswerIndex::load(&config.medical_qa)?,
        };
        tracing::info!("prediction models loaded");
        Ok(models)
    }

    pub fn names(&self) -> Vec<&'static str> {
        vec!["disease", "mental_health", "medical_qa"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn disease_model() -> DiseaseModel {
        let entries = json!([
            {
                "keywords": ["fever", "cough", "sore throat"],
                "disease": "Flu",
                "cures": "Rest and fluids",
                "doctor": "General physician",
                "riskLevel": "Low"
            },
            {
                "keywords": ["wheezing", "shortness of breath", "cough"],
                "disease": "Asthma",
                "cures": "Inhaler",
                "doctor": "Pulmonologist",
                "riskLevel": "Medium"
            }
        ]);
        DiseaseModel {
            entries: serde_json::from_value(entries).unwrap(),
        }
    }

    #[test]
    fn disease_picks_highest_keyword_overlap() {
        let model = disease_model();
        let prediction = model.classify("High Fever and a bad cough!").unwrap();
        assert_eq!(prediction.disease, "Flu");

        let prediction = model.classify("wheezing, cough, shortness of breath").unwrap();
        assert_eq!(prediction.disease, "Asthma");
    }

    #[test]
    fn disease_rejects_empty_or_unmatched_input() {
        let model = disease_model();
        assert!(model.classify("").is_none());
        assert!(model.classify("!!! 123").is_none());
        assert!(model.classify("perfectly healthy").is_none());
    }

    #[test]
    fn mental_health_falls_back_to_default_label() {
        let model = MentalHealthModel {
            entries: serde_json::from_value(json!([
                { "keywords": ["hopeless", "worthless"], "label": "Depressed" },
                { "keywords": ["panic", "worried"], "label": "Anxiety" }
            ]))
            .unwrap(),
            default_label: "Normal".to_string(),
        };
        assert_eq!(model.classify("I feel hopeless lately"), "Depressed");
        assert_eq!(model.classify("had a nice day"), "Normal");
    }

    #[test]
    fn answer_index_ranks_by_token_overlap() {
        let entries = vec![
            (
                tokens("what are the symptoms of diabetes"),
                Answer {
                    answer: "Common symptoms include thirst and fatigue.".into(),
                    category: "symptoms".into(),
                },
            ),
            (
                tokens("how is diabetes treated"),
                Answer {
                    answer: "Treatment includes insulin therapy.".into(),
                    category: "treatment".into(),
                },
            ),
        ];
        let index = AnswerIndex { entries };

        let results = index.search("what symptoms does diabetes have", 1);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].category, "symptoms");

        assert!(index.search("", 3).is_empty());
        assert!(index.search("unrelated query entirely", 3).is_empty());
    }
}
