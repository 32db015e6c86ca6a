use std::path::PathBuf;

/// Errors raised while writing the site.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("writing {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template {template}: {message}")]
    Template {
        template: &'static str,
        message: String,
    },

    #[error("rendering {what}: {source}")]
    Page {
        what: String,
        #[source]
        source: Box<RenderError>,
    },

    #[error("static asset {}: {message}", path.display())]
    Asset { path: PathBuf, message: String },
}

impl RenderError {
    pub fn template(template: &'static str, message: impl Into<String>) -> Self {
        Self::Template {
            template,
            message: message.into(),
        }
    }

    /// Wrap an error with the page it happened on.
    pub fn page(what: impl Into<String>, source: RenderError) -> Self {
        Self::Page {
            what: what.into(),
            source: Box::new(source),
        }
    }
}
