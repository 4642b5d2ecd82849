use std::path::PathBuf;

/// Error type for code generation and emission.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// No convention is registered for the definition's deriving.
    #[error("{definition}: no convention registered for deriving '{deriving}' in namespace '{namespace}'")]
    UnknownDeriving {
        definition: String,
        deriving: String,
        namespace: String,
    },

    /// The convention's validation hook rejected the constructor.
    #[error("{definition}: {reason}")]
    ConventionViolation { definition: String, reason: String },

    /// The requested convention namespace does not exist.
    #[error("unknown convention namespace '{namespace}'")]
    UnknownNamespace { namespace: String },

    /// A conventions file could not be read or parsed.
    #[error("invalid conventions file {path}: {message}")]
    InvalidConventions { path: String, message: String },

    /// A composer.json could not be read or parsed.
    #[error("invalid composer file {path}: {message}")]
    InvalidComposer { path: String, message: String },

    /// No autoload prefix covers the class.
    #[error("could not find psr autoloading path for {class}")]
    PathResolution { class: String },

    /// Writing generated output failed.
    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
