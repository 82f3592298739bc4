use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

const SUMMARY_TAG: &str = "analytics config";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphsConfig {
    pub show: bool,
    pub width: u32,
    pub height: u32,
    pub color: String,
    pub dir: String,
}

impl Default for GraphsConfig {
    fn default() -> Self {
        Self {
            show: true,
            width: 400,
            height: 100,
            color: "#4e79a7".to_string(),
            dir: "stats".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguagesConfig {
    pub show_breakdown: bool,
    pub ignore: Vec<String>,
}

impl Default for LanguagesConfig {
    fn default() -> Self {
        Self {
            show_breakdown: true,
            ignore: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContributorsConfig {
    pub show: bool,
    pub max: usize,
}

impl Default for ContributorsConfig {
    fn default() -> Self {
        Self { show: true, max: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionsConfig {
    pub include: Vec<String>,
}

impl Default for SectionsConfig {
    fn default() -> Self {
        Self {
            include: ["OVERVIEW", "SUMMARY", "LANGUAGE", "COMMITS", "PULSE"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    pub range: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub timeframes: Map<String, Value>,
    pub graphs: GraphsConfig,
    pub languages: LanguagesConfig,
    pub contributors: ContributorsConfig,
    pub sections: SectionsConfig,
    pub diff: DiffConfig,
}

impl Default for Config {
    fn default() -> Self {
        let timeframes = json!({
            "All Time": null,
            "Last 30 Days": "30d",
            "Last 7 Days": "7d",
            "Last 24 Hours": "24h"
        });
        Self {
            timeframes: timeframes.as_object().cloned().unwrap_or_default(),
            graphs: GraphsConfig::default(),
            languages: LanguagesConfig::default(),
            contributors: ContributorsConfig::default(),
            sections: SectionsConfig::default(),
            diff: DiffConfig::default(),
        }
    }
}

impl Config {
    /// Reads the config block embedded in `document`. Never fails: a
    /// missing or malformed block yields defaults.
    pub fn from_document(document: &str) -> Self {
        let Some(raw) = find_config_block(document) else {
            info!("no analytics config found in document, using defaults");
            return Self::default();
        };
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_value(value),
            Err(e) => {
                warn!(error = %e, "invalid JSON in analytics config, using defaults");
                Self::default()
            }
        }
    }

    /// Overlays each recognised section of `value` on the defaults. A
    /// section that fails validation keeps its default.
    pub fn from_value(value: Value) -> Self {
        let mut config = Self::default();
        let Value::Object(fields) = value else {
            warn!("analytics config is not a JSON object, using defaults");
            return config;
        };

        for (key, section) in fields {
            match key.as_str() {
                "timeframes" => match section {
                    Value::Object(map) => config.timeframes = map,
                    other => warn!(found = %other, "timeframes must be an object, using defaults"),
                },
                "graphs" => overlay(&key, section, &mut config.graphs),
                "languages" => overlay(&key, section, &mut config.languages),
                "contributors" => overlay(&key, section, &mut config.contributors),
                "sections" => overlay(&key, section, &mut config.sections),
                "diff" => overlay(&key, section, &mut config.diff),
                _ => debug!(key = %key, "ignoring unknown config option"),
            }
        }
        config
    }
}

fn overlay<T: DeserializeOwned>(key: &str, section: Value, target: &mut T) {
    match serde_json::from_value(section) {
        Ok(parsed) => *target = parsed,
        Err(e) => warn!(section = key, error = %e, "invalid config section, using defaults"),
    }
}

/// Locates the JSON fence inside a `<details>` element whose summary
/// mentions "Analytics Config".
pub fn find_config_block(document: &str) -> Option<&str> {
    let lower = document.to_ascii_lowercase();
    let mut from = 0;

    while let Some(offset) = lower[from..].find("<details>") {
        let start = from + offset;
        let end = lower[start..]
            .find("</details>")
            .map_or(lower.len(), |i| start + i);
        if let Some(json) = json_in_details(document, &lower, start, end) {
            return Some(json);
        }
        from = start + "<details>".len();
    }
    None
}

fn json_in_details<'a>(document: &'a str, lower: &str, start: usize, end: usize) -> Option<&'a str> {
    let section = &lower[start..end];
    let summary_open = section.find("<summary>")?;
    let summary_close = section[summary_open..].find("</summary>")? + summary_open;
    if !section[summary_open..summary_close].contains(SUMMARY_TAG) {
        return None;
    }
    let fence = section[summary_close..].find("```json")? + summary_close + "```json".len();
    let close = section[fence..].find("```")? + fence;
    Some(document[start + fence..start + close].trim())
}
