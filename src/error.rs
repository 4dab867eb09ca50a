use thiserror::Error;

pub type Result<T> = std::result::Result<T, CfError>;

#[derive(Debug, Error)]
pub enum CfError {
    #[error("activity references unknown user `{0}`")]
    UnknownUser(String),

    #[error("activity references unknown item `{0}`")]
    UnknownItem(String),

    /// A holdout can only be drawn from a non-empty interaction list.
    #[error("user `{0}` has no interactions to hold out")]
    EmptyHistory(String),

    #[error("no held out item for user `{0}`, build the holdout map first")]
    MissingHoldout(String),

    #[error("cannot predict with an empty item catalog")]
    EmptyCatalog,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
