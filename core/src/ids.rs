//! Customer ID assignment for rows without an id column value.
//!
//! The strategy is injected into the normalizer so runs can be
//! reproduced exactly. Only RandomIds is non-deterministic.

use crate::types::CustomerId;
use uuid::Uuid;

pub trait IdStrategy {
    /// Produce an id for the row at `row_index` (0-based, input order).
    fn assign(&mut self, name: &str, row_index: usize) -> CustomerId;
}

/// The display name itself. Two customers with the same name share an id.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameIds;

impl IdStrategy for NameIds {
    fn assign(&mut self, name: &str, _row_index: usize) -> CustomerId {
        name.trim().to_string()
    }
}

/// Monotonic counter: `c-000001`, `c-000002`, ...
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdStrategy for SequentialIds {
    fn assign(&mut self, _name: &str, _row_index: usize) -> CustomerId {
        self.next += 1;
        format!("c-{:06}", self.next)
    }
}

/// UUID v5 over the row index and name. Same input, same id.
#[derive(Debug, Clone, Copy)]
pub struct ContentHashIds {
    namespace: Uuid,
}

impl Default for ContentHashIds {
    fn default() -> Self {
        Self { namespace: Uuid::NAMESPACE_OID }
    }
}

impl ContentHashIds {
    pub fn with_namespace(namespace: Uuid) -> Self {
        Self { namespace }
    }
}

impl IdStrategy for ContentHashIds {
    fn assign(&mut self, name: &str, row_index: usize) -> CustomerId {
        let key = format!("{row_index}:{name}");
        Uuid::new_v5(&self.namespace, key.as_bytes()).to_string()
    }
}

/// Random UUID v4 per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdStrategy for RandomIds {
    fn assign(&mut self, _name: &str, _row_index: usize) -> CustomerId {
        Uuid::new_v4().to_string()
    }
}

/// Serializable choice of strategy, for config files and IPC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategyKind {
    #[default]
    Name,
    Sequential,
    ContentHash,
    Random,
}

impl IdStrategyKind {
    pub fn build(self) -> Box<dyn IdStrategy> {
        match self {
            Self::Name        => Box::new(NameIds),
            Self::Sequential  => Box::new(SequentialIds::new()),
            Self::ContentHash => Box::new(ContentHashIds::default()),
            Self::Random      => Box::new(RandomIds),
        }
    }
}
