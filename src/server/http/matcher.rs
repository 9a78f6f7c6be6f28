use {
    std::collections,
    super::error::RouteError,
};

/// Marks a pattern segment as a capture; the rest of the segment is the variable name.
pub const CAPTURE_PREFIX: char = ':';

pub type Vars = collections::HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Capture(String),
}

/// A path pattern split once at registration, e.g. `/users/:id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    raw: String,
    segments: Vec<Segment>,
}

impl Pattern {
    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        if !raw.starts_with('/') {
            return Err(RouteError::InvalidPattern(raw.to_string()));
        }
        let mut segments = Vec::new();
        for chunk in raw.split('/') {
            let segment = match chunk.strip_prefix(CAPTURE_PREFIX) {
                Some("") => return Err(RouteError::EmptyVariableName(raw.to_string())),
                Some(name) => {
                    if segments.iter().any(|s| matches!(s, Segment::Capture(n) if n == name)) {
                        return Err(RouteError::DuplicateVariable {
                            pattern: raw.to_string(),
                            name: name.to_string(),
                        });
                    }
                    Segment::Capture(name.to_string())
                },
                None => Segment::Literal(chunk.to_string()),
            };
            segments.push(segment);
        }
        Ok(Pattern { raw: raw.to_string(), segments })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Matches a concrete request path, returning the captured variables.
    ///
    /// A path equal to the raw pattern always matches with no captures. Otherwise
    /// both must have the same number of `/`-separated segments, literals must be
    /// equal and captures bind whatever sits in their position, empty string included.
    pub fn matches(&self, path: &str) -> Option<Vars> {
        let mut vars = Vars::new();
        if path == self.raw {
            return Some(vars);
        }
        if path.split('/').count() != self.segments.len() {
            return None;
        }
        for (value, segment) in path.split('/').zip(self.segments.iter()) {
            match segment {
                Segment::Literal(literal) if literal == value => continue,
                Segment::Literal(_) => return None,
                Segment::Capture(name) => {
                    vars.insert(name.clone(), value.to_string());
                },
            }
        }
        Some(vars)
    }
}
