use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidReference {
    #[error("reference is empty")]
    Empty,
    #[error("invalid character {0:?} in reference {1:?}")]
    InvalidCharacter(char, String),
    #[error("reference {0:?} is missing a namespace, expected [registry/]namespace/repository")]
    MissingNamespace(String),
    #[error("reference {0:?} carries a tag, expected a whole repository")]
    UnexpectedTag(String),
    #[error("malformed reference {0:?}")]
    Malformed(String),
}

/// A repository-level reference of the form `[registry[:port]/]namespace/repository`.
///
/// A `Reference` never carries a tag: it addresses every tag of a repository
/// at once. Use [`Reference::with_tag`] to address one concrete image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    registry: Option<String>,
    repository: String,
}

impl Reference {
    pub fn parse(input: &str) -> Result<Self, InvalidReference> {
        let input = input.trim();
        if input.is_empty() {
            return Err(InvalidReference::Empty);
        }

        for c in input.chars() {
            if !c.is_ascii_alphanumeric() && !matches!(c, '/' | ':' | '.' | '-' | '_') {
                return Err(InvalidReference::InvalidCharacter(c, input.to_string()));
            }
        }

        // A registry port colon is always followed by a path segment; a tag
        // colon never is.
        if let Some((_, after)) = input.rsplit_once(':') {
            if !after.contains('/') {
                return Err(InvalidReference::UnexpectedTag(input.to_string()));
            }
        }

        // The first component is a registry host if it contains a dot or a
        // port, or is "localhost"
        let (registry, path) = match input.split_once('/') {
            Some((first, rest))
                if first.contains('.') || first.contains(':') || first == "localhost" =>
            {
                (Some(first.to_string()), rest)
            }
            _ => (None, input),
        };

        if path.contains(':') || path.split('/').any(str::is_empty) {
            return Err(InvalidReference::Malformed(input.to_string()));
        }
        if !path.contains('/') {
            return Err(InvalidReference::MissingNamespace(input.to_string()));
        }

        Ok(Self {
            registry,
            repository: path.to_string(),
        })
    }

    pub fn registry(&self) -> Option<&str> {
        self.registry.as_deref()
    }

    /// The `namespace/repository` path, without the registry host.
    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn with_tag(&self, tag: &str) -> Image {
        Image {
            reference: self.clone(),
            tag: tag.to_string(),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(registry) = &self.registry {
            write!(f, "{registry}/")?;
        }
        write!(f, "{}", self.repository)
    }
}

/// A fully qualified single image: a [`Reference`] resolved to one tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    reference: Reference,
    tag: String,
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.reference, self.tag)
    }
}
