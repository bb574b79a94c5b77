//! Container codec: the hierarchical location tag of a metadata record.
//!
//! A container identifies where a variable declaration lives on the host
//! or scheme side: the enclosing module, optionally a derived type, and
//! optionally the requesting subroutine. Containers travel through the
//! tables as single token strings (`MODULE_<m> SUBROUTINE_<s>`) and are
//! decoded into an ordered segment chain for inspection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a single container segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentKind {
    /// Enclosing Fortran module.
    Module,
    /// Derived type within a module.
    Type,
    /// Requesting subroutine within a module.
    Subroutine,
}

impl SegmentKind {
    /// Token prefix used in the encoded form.
    pub fn token(self) -> &'static str {
        match self {
            SegmentKind::Module => "MODULE",
            SegmentKind::Type => "TYPE",
            SegmentKind::Subroutine => "SUBROUTINE",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "MODULE" => Some(SegmentKind::Module),
            "TYPE" => Some(SegmentKind::Type),
            "SUBROUTINE" => Some(SegmentKind::Subroutine),
            _ => None,
        }
    }
}

/// One segment of a container chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub name: String,
}

/// Ordered chain of location segments.
///
/// Every well-formed container starts with a [`SegmentKind::Module`]
/// segment; the consumers that require it check via [`Container::module`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Container {
    segments: Vec<Segment>,
}

/// Error produced when decoding a malformed container string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerError {
    /// A token did not carry a `KIND_name` shape.
    MalformedToken(String),
    /// A token used a kind outside `MODULE`/`TYPE`/`SUBROUTINE`.
    UnknownKind(String),
}

impl fmt::Display for ContainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerError::MalformedToken(token) => {
                write!(f, "malformed container token '{}'", token)
            }
            ContainerError::UnknownKind(kind) => {
                write!(f, "unknown container segment kind '{}'", kind)
            }
        }
    }
}

impl std::error::Error for ContainerError {}

impl Container {
    /// Container for a bare module-level declaration.
    pub fn module(name: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment {
                kind: SegmentKind::Module,
                name: name.into(),
            }],
        }
    }

    /// Container for a declaration inside a derived type.
    pub fn module_type(module: impl Into<String>, type_name: impl Into<String>) -> Self {
        let mut container = Self::module(module);
        container.segments.push(Segment {
            kind: SegmentKind::Type,
            name: type_name.into(),
        });
        container
    }

    /// Container for a request made by a scheme subroutine.
    pub fn module_subroutine(module: impl Into<String>, subroutine: impl Into<String>) -> Self {
        let mut container = Self::module(module);
        container.segments.push(Segment {
            kind: SegmentKind::Subroutine,
            name: subroutine.into(),
        });
        container
    }

    /// Decodes the token string form.
    ///
    /// Each whitespace-separated token splits at its first underscore into
    /// a segment kind and a name; the name itself may contain underscores.
    pub fn decode(encoded: &str) -> Result<Self, ContainerError> {
        let mut segments = Vec::new();
        for token in encoded.split_whitespace() {
            let Some((kind_token, name)) = token.split_once('_') else {
                return Err(ContainerError::MalformedToken(token.to_string()));
            };
            let Some(kind) = SegmentKind::from_token(kind_token) else {
                return Err(ContainerError::UnknownKind(kind_token.to_string()));
            };
            segments.push(Segment {
                kind,
                name: name.to_string(),
            });
        }
        Ok(Self { segments })
    }

    /// Encodes back into the single token string form.
    pub fn encode(&self) -> String {
        self.segments
            .iter()
            .map(|segment| format!("{}_{}", segment.kind.token(), segment.name))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// All segments in declaration order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    fn find(&self, kind: SegmentKind) -> Option<&str> {
        self.segments
            .iter()
            .find(|segment| segment.kind == kind)
            .map(|segment| segment.name.as_str())
    }

    /// Name of the enclosing module, if present.
    ///
    /// Absence is a malformed-input condition; callers report it with
    /// their own diagnostics.
    pub fn module_name(&self) -> Option<&str> {
        self.find(SegmentKind::Module)
    }

    /// Name of the enclosing derived type, if any.
    pub fn type_name(&self) -> Option<&str> {
        self.find(SegmentKind::Type)
    }

    /// Name of the requesting subroutine, if any.
    pub fn subroutine(&self) -> Option<&str> {
        self.find(SegmentKind::Subroutine)
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl TryFrom<String> for Container {
    type Error = ContainerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Container::decode(&value)
    }
}

impl From<Container> for String {
    fn from(container: Container) -> Self {
        container.encode()
    }
}
