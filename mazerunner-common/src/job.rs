use crate::error::{MazerunnerError, MazerunnerResult};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProcessorMode {
    Whole,
    Partitioned,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PartitionDescription {
    #[serde(deserialize_with = "string_or_number")]
    pub partition_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_label: Option<String>,
}

impl PartitionDescription {
    pub fn new(partition_id: impl Into<String>) -> Self {
        Self {
            partition_id: partition_id.into(),
            partition_label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.partition_label = Some(label.into());
        self
    }
}

/// A graph analysis request as it arrives from the graph database.
///
/// `path` is the location of the input edge list. The dispatcher never rewrites it;
/// the resolved output location travels separately.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobDescriptor {
    pub analysis: String,
    pub path: String,
    pub mode: ProcessorMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_description: Option<PartitionDescription>,
}

impl JobDescriptor {
    pub fn whole(analysis: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            analysis: analysis.into(),
            path: path.into(),
            mode: ProcessorMode::Whole,
            partition_description: None,
        }
    }

    pub fn partitioned(
        analysis: impl Into<String>,
        path: impl Into<String>,
        partition: PartitionDescription,
    ) -> Self {
        Self {
            analysis: analysis.into(),
            path: path.into(),
            mode: ProcessorMode::Partitioned,
            partition_description: Some(partition),
        }
    }

    pub fn from_json(bytes: &[u8]) -> MazerunnerResult<Self> {
        let job: Self = serde_json::from_slice(bytes).map_err(|e| {
            MazerunnerError::InvalidArgument(format!("invalid job descriptor: {e}"))
        })?;
        job.validate()?;
        Ok(job)
    }

    /// A partition description is present exactly when the mode is partitioned.
    pub fn validate(&self) -> MazerunnerResult<()> {
        match (self.mode, &self.partition_description) {
            (ProcessorMode::Partitioned, None) => Err(MazerunnerError::InvalidArgument(
                "partitioned job is missing its partition description".to_string(),
            )),
            (ProcessorMode::Whole, Some(_)) => Err(MazerunnerError::InvalidArgument(
                "whole-graph job must not carry a partition description".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "partition id must be a string or number, got {other}"
        ))),
    }
}
