use std::fmt;

/// Pipeline stage an error surfaced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extract,
    Transform,
    Match,
    Load,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extract => write!(f, "extract"),
            Self::Transform => write!(f, "transform"),
            Self::Match => write!(f, "match"),
            Self::Load => write!(f, "load"),
        }
    }
}

#[derive(Debug)]
pub enum LinkageError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad threshold, empty column list, etc.).
    ConfigValidation(String),
    /// Missing required column in a dataset's header row.
    MissingColumn { dataset: String, column: String },
    /// Malformed CSV input or a failure while rendering CSV output.
    Csv { dataset: String, message: String },
    /// IO error (file read/write, JSON rendering).
    Io(String),
    /// Any of the above, tagged with the stage that raised it.
    Stage { stage: Stage, source: Box<LinkageError> },
}

impl LinkageError {
    /// Tag this error with the pipeline stage it came from. Already tagged
    /// errors keep their original stage.
    pub fn in_stage(self, stage: Stage) -> Self {
        match self {
            Self::Stage { .. } => self,
            other => Self::Stage { stage, source: Box::new(other) },
        }
    }

    /// The stage this error was raised in, if it has been tagged.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

impl fmt::Display for LinkageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { dataset, column } => {
                write!(f, "dataset '{dataset}': missing column '{column}'")
            }
            Self::Csv { dataset, message } => {
                write!(f, "dataset '{dataset}': CSV error: {message}")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Stage { stage, source } => write!(f, "{stage} stage failed: {source}"),
        }
    }
}

impl std::error::Error for LinkageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Stage { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
