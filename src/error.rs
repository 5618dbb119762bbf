use thiserror::Error;

/// Represents all possible errors that can occur within the `stache` crate.
///
/// Parse errors carry the byte offset of the offending tag's begin
/// delimiter. Errors from a partial's or lambda's sub-template surface
/// verbatim: the sub-parse fails with one of these variants and the outer
/// render propagates it unchanged.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// The scanner reached the end of input before finding the closing
    /// delimiter of a tag.
    #[error("Unclosed tag at {0}")]
    UnclosedTag(usize),

    /// A malformed `={{ }}=` style set-delimiter tag (bad length, missing
    /// trailing `=`, missing interior space, or a forbidden character).
    #[error("Invalid set delimiter tag at {0}")]
    InvalidSetDelimiter(usize),

    /// A section-end tag appeared with no matching section-begin.
    #[error("Unopened section \"{name}\" at {position}")]
    UnopenedSection { name: String, position: usize },

    /// A section-begin tag had no matching section-end (detected after the
    /// scan completes).
    #[error("Unclosed section \"{name}\" at {position}")]
    UnclosedSection { name: String, position: usize },

    /// A value could not be serialized into the template data model.
    #[error("Serialize error: {0}")]
    Serialize(String),

    /// The output sink failed while writing rendered chunks.
    #[error("Write error: {0}")]
    Io(#[from] std::io::Error),
}

impl serde::ser::Error for TemplateError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        TemplateError::Serialize(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TemplateError>;
