use shapegen_messages::TemplateError;

/// Failure to turn a source document into a model.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("malformed {format} input: {message}")]
    Format { format: &'static str, message: String },

    #[error("document is empty")]
    EmptyDocument,

    #[error("schema `{0}` not found")]
    SchemaNotFound(String),

    #[error("not a schema document: {0}")]
    NotASchemaDocument(String),

    #[error("unresolved reference `{reference}` at {path}")]
    UnresolvedReference { reference: String, path: String },

    #[error("message `{key}`: {source}")]
    Template {
        key: String,
        #[source]
        source: TemplateError,
    },
}

impl ParseError {
    pub fn format(format: &'static str, message: impl std::fmt::Display) -> Self {
        Self::Format {
            format,
            message: message.to_string(),
        }
    }
}
