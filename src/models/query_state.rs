use serde::{Deserialize, Serialize};

/// Progress of one question round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum QueryState {
    #[default]
    Idle,
    Embedding,
    Scoring,
    Ranked,
    PromptBuilt,
    Generating,
    Complete,
    Failed,
}

impl QueryState {
    /// Whether the round trip may move from `self` to `next`.
    ///
    /// `Failed` is only reachable from `Embedding` and `Generating`. A new
    /// round trip always restarts from `Idle`, which any terminal state
    /// (and `Idle` itself) may move to.
    pub fn can_transition_to(self, next: QueryState) -> bool {
        use QueryState::*;
        matches!(
            (self, next),
            (Idle | Complete | Failed, Idle)
                | (Idle, Embedding)
                | (Embedding, Scoring)
                | (Embedding, Failed)
                | (Scoring, Ranked)
                | (Ranked, PromptBuilt)
                | (PromptBuilt, Generating)
                | (Generating, Complete)
                | (Generating, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, QueryState::Complete | QueryState::Failed)
    }
}

impl std::fmt::Display for QueryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            QueryState::Idle => "idle",
            QueryState::Embedding => "embedding",
            QueryState::Scoring => "scoring",
            QueryState::Ranked => "ranked",
            QueryState::PromptBuilt => "prompt-built",
            QueryState::Generating => "generating",
            QueryState::Complete => "complete",
            QueryState::Failed => "failed",
        };
        f.write_str(name)
    }
}
