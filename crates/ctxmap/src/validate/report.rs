//! Findings and the report that collects them.

use std::fmt;

use ctxmap_parser::Severity;

/// Identifies the rule that produced a [`Finding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationCode {
    /// Duplicate bounded context name
    E200,
    /// Duplicate aggregate name within a bounded context
    E201,
    /// Duplicate entity name within an aggregate
    E202,
    /// Duplicate value object name within an aggregate
    E203,
    /// More than one aggregate root
    E204,
    /// Aggregate with entities but no root
    E205,
    /// Domain object name used in more than one place
    E206,
    /// Reference to an unknown bounded context
    E207,
    /// Symmetric relationship of a context with itself
    E208,
    /// Upstream-downstream relationship of a context with itself
    E209,
    /// Exposed aggregate not found in the upstream context
    E210,
    /// Invalid attribute, parameter or return type
    E211,
    /// Reserved domain object name
    E212,
}

impl ValidationCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E200 => "E200",
            Self::E201 => "E201",
            Self::E202 => "E202",
            Self::E203 => "E203",
            Self::E204 => "E204",
            Self::E205 => "E205",
            Self::E206 => "E206",
            Self::E207 => "E207",
            Self::E208 => "E208",
            Self::E209 => "E209",
            Self::E210 => "E210",
            Self::E211 => "E211",
            Self::E212 => "E212",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::E200 => "Duplicate bounded context",
            Self::E201 => "Duplicate aggregate",
            Self::E202 => "Duplicate entity",
            Self::E203 => "Duplicate value object",
            Self::E204 => "Multiple aggregate roots",
            Self::E205 => "Missing aggregate root",
            Self::E206 => "Domain object name not unique",
            Self::E207 => "Unknown bounded context",
            Self::E208 => "Symmetric self-relationship",
            Self::E209 => "Upstream-downstream self-relationship",
            Self::E210 => "Unknown exposed aggregate",
            Self::E211 => "Invalid type",
            Self::E212 => "Reserved name",
        }
    }
}

impl fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Path from the model root to the element a finding is about.
///
/// # Examples
///
/// ```
/// use ctxmap::validate::Location;
///
/// let location = Location::root()
///     .child("BoundedContext", "Sales")
///     .child("Module", "billing")
///     .child("Aggregate", "Invoice");
/// assert_eq!(
///     location.to_string(),
///     "BoundedContext 'Sales' > Module 'billing' > Aggregate 'Invoice'"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    segments: Vec<(&'static str, String)>,
}

impl Location {
    /// The model itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// Extends the path by one element of kind `kind`.
    pub fn child(&self, kind: &'static str, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push((kind, name.into()));
        Self { segments }
    }

    /// The `(kind, name)` pairs from outermost to innermost.
    pub fn segments(&self) -> &[(&'static str, String)] {
        &self.segments
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("model");
        }
        for (i, (kind, name)) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(" > ")?;
            }
            if name.is_empty() {
                f.write_str(kind)?;
            } else {
                write!(f, "{kind} '{name}'")?;
            }
        }
        Ok(())
    }
}

/// One problem found in a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    severity: Severity,
    code: ValidationCode,
    message: String,
    location: Location,
    suggestion: Option<String>,
}

impl Finding {
    pub fn error(code: ValidationCode, message: impl Into<String>, location: Location) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            location,
            suggestion: None,
        }
    }

    pub fn warning(code: ValidationCode, message: impl Into<String>, location: Location) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(code, message, location)
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> ValidationCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}]: {} (at {})",
            self.severity, self.code, self.message, self.location
        )?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, "; help: {suggestion}")?;
        }
        Ok(())
    }
}

/// Every finding of one validation run, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    findings: Vec<Finding>,
}

impl ValidationReport {
    pub(crate) fn new(findings: Vec<Finding>) -> Self {
        Self { findings }
    }

    /// Returns `true` if no finding is an error.
    pub fn is_valid(&self) -> bool {
        !self.findings.iter().any(|f| f.severity.is_error())
    }

    pub fn has_warnings(&self) -> bool {
        self.findings.iter().any(|f| f.severity.is_warning())
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity.is_warning())
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = self.errors().count();
        let warnings = self.warnings().count();
        write!(
            f,
            "{errors} error{}, {warnings} warning{}",
            if errors == 1 { "" } else { "s" },
            if warnings == 1 { "" } else { "s" }
        )
    }
}
