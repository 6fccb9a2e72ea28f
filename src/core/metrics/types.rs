use serde::{Deserialize, Serialize};

/// How the host should interpret consecutive values of a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricMode {
    /// Each value is a standalone reading valid at its timestamp
    AbsolutePoint,
}

/// Storage type of the metric values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Double,
}

/// Description of one metric handed to the host when a metric name is declared
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricProperty {
    /// Name the host uses to collect this metric
    pub name: String,
    pub description: String,
    /// Unit as reported by the device layer
    pub unit: String,
    pub mode: MetricMode,
    pub value_type: ValueType,
}

impl MetricProperty {
    /// Creates an absolute point, double precision property whose description is its name
    pub fn new(name: impl Into<String>, unit: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            description: name.clone(),
            name,
            unit: unit.into(),
            mode: MetricMode::AbsolutePoint,
            value_type: ValueType::Double,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Serializes the property to JSON for hosts that exchange metric metadata as text
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
