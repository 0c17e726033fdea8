//! Settings Models
//!
//! Application configuration and settings data structures.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Nested register entries supplied through config:
/// category -> level -> point index -> sensitive point text.
pub type RegisterEntries = HashMap<String, HashMap<String, HashMap<u32, String>>>;

/// Tuning knobs for the `search_knowledge` tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchToolConfig {
    /// Number of documents returned per search
    pub top_k: usize,
    /// Minimum relevance score in 0..1; results below it are dropped
    pub score_threshold: f32,
}

impl Default for SearchToolConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            score_threshold: 0.0,
        }
    }
}

/// A knowledge base definition: what it is called, what it holds, and which
/// metadata schema (if any) tags its documents at ingestion time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBaseConfig {
    /// Unique knowledge base name, used as the tool's `database` argument
    pub name: String,
    /// Human-readable description, surfaced in the tool description
    pub description: String,
    /// Metadata schema name, or None to ingest with base fields only
    #[serde(default)]
    pub schema: Option<String>,
}

/// Application configuration stored in config.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Search tool tuning
    #[serde(default)]
    pub search_tool: SearchToolConfig,
    /// Knowledge bases served by this instance
    #[serde(default = "default_knowledge_bases")]
    pub knowledge_bases: Vec<KnowledgeBaseConfig>,
    /// Additional sensitive-point registers, referenced from
    /// `knowledge_bases[].schema` by name
    #[serde(default)]
    pub custom_registers: HashMap<String, RegisterEntries>,
    /// Enable debug mode
    #[serde(default)]
    pub debug_mode: bool,
}

fn default_knowledge_bases() -> Vec<KnowledgeBaseConfig> {
    vec![
        KnowledgeBaseConfig {
            name: "research_archive".to_string(),
            description: "Positive research trade-secret samples".to_string(),
            schema: Some("research_register".to_string()),
        },
        KnowledgeBaseConfig {
            name: "research_archive_neg".to_string(),
            description: "Research samples with positive and negative examples".to_string(),
            schema: Some("research_register".to_string()),
        },
        KnowledgeBaseConfig {
            name: "casework_archive".to_string(),
            description: "Casework complaint samples".to_string(),
            schema: Some("casework_register".to_string()),
        },
    ]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            search_tool: SearchToolConfig::default(),
            knowledge_bases: default_knowledge_bases(),
            custom_registers: HashMap::new(),
            debug_mode: false,
        }
    }
}

/// Settings update request (partial update)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SettingsUpdate {
    pub search_top_k: Option<usize>,
    pub search_score_threshold: Option<f32>,
    pub knowledge_bases: Option<Vec<KnowledgeBaseConfig>>,
    pub debug_mode: Option<bool>,
}

impl AppConfig {
    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(top_k) = update.search_top_k {
            self.search_tool.top_k = top_k;
        }
        if let Some(threshold) = update.search_score_threshold {
            self.search_tool.score_threshold = threshold;
        }
        if let Some(knowledge_bases) = update.knowledge_bases {
            self.knowledge_bases = knowledge_bases;
        }
        if let Some(debug) = update.debug_mode {
            self.debug_mode = debug;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        // Validate search tool knobs
        if self.search_tool.top_k == 0 {
            return Err("search_tool.top_k must be at least 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.search_tool.score_threshold) {
            return Err(format!(
                "search_tool.score_threshold must be within 0.0..1.0, got {}",
                self.search_tool.score_threshold
            ));
        }

        // Validate knowledge base definitions
        let mut seen = std::collections::HashSet::new();
        for kb in &self.knowledge_bases {
            if kb.name.trim().is_empty() {
                return Err("knowledge base name cannot be empty".to_string());
            }
            if !seen.insert(kb.name.as_str()) {
                return Err(format!("duplicate knowledge base name: {}", kb.name));
            }
            if let Some(schema) = &kb.schema {
                if schema.trim().is_empty() {
                    return Err(format!(
                        "knowledge base '{}' has an empty schema name",
                        kb.name
                    ));
                }
            }
        }

        // Validate custom registers
        for (name, entries) in &self.custom_registers {
            if name.trim().is_empty() {
                return Err("custom register name cannot be empty".to_string());
            }
            if entries.is_empty() {
                return Err(format!("custom register '{}' has no entries", name));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.search_tool.top_k, 3);
        assert_eq!(config.search_tool.score_threshold, 0.0);
        assert_eq!(config.knowledge_bases.len(), 3);
        assert_eq!(config.knowledge_bases[0].name, "research_archive");
    }

    #[test]
    fn test_apply_update() {
        let mut config = AppConfig::default();
        let update = SettingsUpdate {
            search_top_k: Some(5),
            search_score_threshold: Some(0.4),
            ..Default::default()
        };
        config.apply_update(update);
        assert_eq!(config.search_tool.top_k, 5);
        assert_eq!(config.search_tool.score_threshold, 0.4);
        // Other fields should remain unchanged
        assert_eq!(config.knowledge_bases.len(), 3);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_top_k() {
        let mut config = AppConfig::default();
        config.search_tool.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_threshold_out_of_range() {
        let mut config = AppConfig::default();
        config.search_tool.score_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_duplicate_kb_names() {
        let mut config = AppConfig::default();
        config.knowledge_bases.push(KnowledgeBaseConfig {
            name: "research_archive".to_string(),
            description: "Duplicate".to_string(),
            schema: None,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_with_missing_fields_uses_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.search_tool.top_k, 3);
        assert_eq!(config.knowledge_bases.len(), 3);
        assert!(config.custom_registers.is_empty());
        assert!(!config.debug_mode);
    }

    #[test]
    fn test_custom_register_roundtrip() {
        let json = r#"{
            "custom_registers": {
                "contracts": {
                    "pricing": { "internal": { "1": "Discount schedules" } }
                }
            }
        }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        let register = &config.custom_registers["contracts"];
        assert_eq!(register["pricing"]["internal"][&1], "Discount schedules");
        assert!(config.validate().is_ok());
    }
}
