use thiserror::Error;

/// Misuse of the attributed-string builder API.
///
/// Every variant is a programming error at the call site: a mutation
/// after sealing, or a handle that outlived the layout it pointed into.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttributedStringError {
    #[error("Attempt to mutate a sealed {what}")]
    Sealed { what: &'static str },
    #[error("Fragment handle ({shard_index}, {fragment_index}) is out of range")]
    HandleOutOfRange {
        shard_index: usize,
        fragment_index: usize,
    },
    #[error("Shard index {index} is out of range")]
    ShardOutOfRange { index: usize },
}
