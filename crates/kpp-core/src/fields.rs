use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ConfigError;

/// A canonical checkpoint attribute that is resolved from source properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalField {
    Id,
    Name,
    Type,
    Status,
    Subject,
    Country,
}

impl LogicalField {
    pub const ALL: [LogicalField; 6] = [
        LogicalField::Id,
        LogicalField::Name,
        LogicalField::Type,
        LogicalField::Status,
        LogicalField::Subject,
        LogicalField::Country,
    ];
}

impl std::fmt::Display for LogicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogicalField::Id => write!(f, "id"),
            LogicalField::Name => write!(f, "name"),
            LogicalField::Type => write!(f, "type"),
            LogicalField::Status => write!(f, "status"),
            LogicalField::Subject => write!(f, "subject"),
            LogicalField::Country => write!(f, "country"),
        }
    }
}

/// Ordered source keys for one logical field, plus the value used when none
/// of them carries a usable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRule {
    pub keys: Vec<String>,
    pub default: String,
}

impl FieldRule {
    fn new(keys: &[&str], default: &str) -> Self {
        Self {
            keys: keys.iter().map(|k| (*k).to_string()).collect(),
            default: default.to_string(),
        }
    }
}

/// Logical field → candidate keys table.
///
/// Fields omitted from a YAML override keep their built-in rule, and a rule
/// without `default` keeps the built-in default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FieldTableOverride")]
pub struct FieldTable {
    pub id: FieldRule,
    pub name: FieldRule,
    #[serde(rename = "type")]
    pub checkpoint_type: FieldRule,
    pub status: FieldRule,
    pub subject: FieldRule,
    pub country: FieldRule,
}

impl Default for FieldTable {
    fn default() -> Self {
        Self {
            id: FieldRule::new(&["checkpoint_id", "id", "uid"], ""),
            name: FieldRule::new(
                &["checkpoint_name", "name", "title", "name_ru"],
                "Без названия",
            ),
            checkpoint_type: FieldRule::new(&["checkpoint_type", "type", "transport_type"], ""),
            status: FieldRule::new(&["checkpoint_status", "status", "current_status"], ""),
            subject: FieldRule::new(&["subject_name", "subject", "region", "region_rf"], "—"),
            country: FieldRule::new(&["neighbor_country", "country", "border_country"], "—"),
        }
    }
}

#[derive(Deserialize)]
struct RuleOverride {
    keys: Vec<String>,
    default: Option<String>,
}

#[derive(Deserialize)]
struct FieldTableOverride {
    id: Option<RuleOverride>,
    name: Option<RuleOverride>,
    #[serde(rename = "type")]
    checkpoint_type: Option<RuleOverride>,
    status: Option<RuleOverride>,
    subject: Option<RuleOverride>,
    country: Option<RuleOverride>,
}

fn merge_rule(builtin: FieldRule, over: Option<RuleOverride>) -> FieldRule {
    match over {
        None => builtin,
        Some(over) => FieldRule {
            keys: over.keys,
            default: over.default.unwrap_or(builtin.default),
        },
    }
}

impl From<FieldTableOverride> for FieldTable {
    fn from(over: FieldTableOverride) -> Self {
        let builtin = FieldTable::default();
        Self {
            id: merge_rule(builtin.id, over.id),
            name: merge_rule(builtin.name, over.name),
            checkpoint_type: merge_rule(builtin.checkpoint_type, over.checkpoint_type),
            status: merge_rule(builtin.status, over.status),
            subject: merge_rule(builtin.subject, over.subject),
            country: merge_rule(builtin.country, over.country),
        }
    }
}

impl FieldTable {
    #[must_use]
    pub fn rule(&self, field: LogicalField) -> &FieldRule {
        match field {
            LogicalField::Id => &self.id,
            LogicalField::Name => &self.name,
            LogicalField::Type => &self.checkpoint_type,
            LogicalField::Status => &self.status,
            LogicalField::Subject => &self.subject,
            LogicalField::Country => &self.country,
        }
    }

    /// First candidate key holding a usable value, rendered as a trimmed string.
    ///
    /// Strings, numbers and booleans are usable when non-blank; `null`,
    /// arrays and objects are skipped.
    #[must_use]
    pub fn lookup(&self, props: &Map<String, Value>, field: LogicalField) -> Option<String> {
        self.rule(field)
            .keys
            .iter()
            .find_map(|key| props.get(key).and_then(scalar_text))
    }

    /// [`lookup`](Self::lookup), falling back to the rule's default.
    #[must_use]
    pub fn resolve(&self, props: &Map<String, Value>, field: LogicalField) -> String {
        self.lookup(props, field)
            .unwrap_or_else(|| self.rule(field).default.clone())
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Load and validate a field table override from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_field_table(path: &Path) -> Result<FieldTable, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FieldsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let table: FieldTable =
        serde_yaml::from_str(&content).map_err(ConfigError::FieldsFileParse)?;

    validate_field_table(&table)?;

    Ok(table)
}

fn validate_field_table(table: &FieldTable) -> Result<(), ConfigError> {
    for field in LogicalField::ALL {
        let rule = table.rule(field);
        let needs_placeholder = matches!(
            field,
            LogicalField::Name | LogicalField::Subject | LogicalField::Country
        );
        if needs_placeholder && rule.default.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "field '{field}' must have a non-blank default"
            )));
        }
        if rule.keys.is_empty() {
            return Err(ConfigError::Validation(format!(
                "field '{field}' must list at least one source key"
            )));
        }

        let mut seen = HashSet::new();
        for key in &rule.keys {
            if key.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "field '{field}' has a blank source key"
                )));
            }
            if !seen.insert(key.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "field '{field}' lists source key '{key}' more than once"
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "fields_test.rs"]
mod tests;
