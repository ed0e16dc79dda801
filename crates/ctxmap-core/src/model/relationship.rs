//! Relationships between bounded contexts.

use std::fmt;

/// A relationship declared inside a context map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relationship {
    Symmetric(SymmetricRelationship),
    UpstreamDownstream(UpstreamDownstreamRelationship),
}

impl Relationship {
    /// Names of the two participating bounded contexts, in source order.
    pub fn participants(&self) -> (&str, &str) {
        match self {
            Relationship::Symmetric(rel) => (&rel.participant1, &rel.participant2),
            Relationship::UpstreamDownstream(rel) => (&rel.upstream, &rel.downstream),
        }
    }

    /// Returns `true` if both sides name the same bounded context.
    pub fn is_self_relationship(&self) -> bool {
        let (a, b) = self.participants();
        a == b
    }
}

impl From<SymmetricRelationship> for Relationship {
    fn from(rel: SymmetricRelationship) -> Self {
        Relationship::Symmetric(rel)
    }
}

impl From<UpstreamDownstreamRelationship> for Relationship {
    fn from(rel: UpstreamDownstreamRelationship) -> Self {
        Relationship::UpstreamDownstream(rel)
    }
}

/// Kind of a symmetric relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymmetricKind {
    Partnership,
    SharedKernel,
}

impl SymmetricKind {
    /// Keyword form, as in `A Partnership B`.
    pub fn as_str(self) -> &'static str {
        match self {
            SymmetricKind::Partnership => "Partnership",
            SymmetricKind::SharedKernel => "SharedKernel",
        }
    }
}

impl fmt::Display for SymmetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A partnership or shared kernel between two contexts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymmetricRelationship {
    pub kind: SymmetricKind,
    pub participant1: String,
    pub participant2: String,
}

impl SymmetricRelationship {
    pub fn new(
        kind: SymmetricKind,
        participant1: impl Into<String>,
        participant2: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            participant1: participant1.into(),
            participant2: participant2.into(),
        }
    }
}

/// Integration pattern offered by the upstream side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpstreamPattern {
    OpenHostService,
    PublishedLanguage,
}

impl UpstreamPattern {
    pub fn as_str(self) -> &'static str {
        match self {
            UpstreamPattern::OpenHostService => "OHS",
            UpstreamPattern::PublishedLanguage => "PL",
        }
    }
}

impl fmt::Display for UpstreamPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Integration pattern adopted by the downstream side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DownstreamPattern {
    AntiCorruptionLayer,
    Conformist,
}

impl DownstreamPattern {
    pub fn as_str(self) -> &'static str {
        match self {
            DownstreamPattern::AntiCorruptionLayer => "ACL",
            DownstreamPattern::Conformist => "CF",
        }
    }
}

impl fmt::Display for DownstreamPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed relationship where `downstream` depends on `upstream`.
///
/// Pattern lists hold each pattern at most once, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpstreamDownstreamRelationship {
    pub upstream: String,
    pub downstream: String,
    pub upstream_patterns: Vec<UpstreamPattern>,
    pub downstream_patterns: Vec<DownstreamPattern>,
    /// Aggregates of the upstream context exposed to the downstream.
    pub exposed_aggregates: Vec<String>,
    pub implementation_technology: Option<String>,
}

impl UpstreamDownstreamRelationship {
    pub fn new(upstream: impl Into<String>, downstream: impl Into<String>) -> Self {
        Self {
            upstream: upstream.into(),
            downstream: downstream.into(),
            ..Self::default()
        }
    }

    /// Adds an upstream pattern unless it is already present.
    pub fn add_upstream_pattern(&mut self, pattern: UpstreamPattern) {
        if !self.upstream_patterns.contains(&pattern) {
            self.upstream_patterns.push(pattern);
        }
    }

    /// Adds a downstream pattern unless it is already present.
    pub fn add_downstream_pattern(&mut self, pattern: DownstreamPattern) {
        if !self.downstream_patterns.contains(&pattern) {
            self.downstream_patterns.push(pattern);
        }
    }
}
