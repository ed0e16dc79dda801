//! Reserved words of the ctxmap language.
//!
//! Two word lists live here:
//!
//! - the keyword table recognised by the lexer ([`Keyword`]). Structural
//!   keywords drive the grammar; the remaining words are reserved so that
//!   documents stay compatible with the wider Context Mapper vocabulary.
//!   Attribute names that collide with any of them are written with a `^`
//!   escape.
//! - the short list of names a domain object may never carry
//!   ([`RESERVED_DOMAIN_OBJECT_NAMES`]). Unlike keywords these cannot be
//!   escaped; editing operations reject them outright.

use std::fmt;

macro_rules! keywords {
    ($($variant:ident => $text:literal,)*) => {
        /// A keyword token of the language.
        ///
        /// Structural keywords are individual variants. Words that are
        /// reserved but carry no grammar meaning are [`Keyword::Reserved`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $($variant,)*
            /// A reserved word without a grammar role.
            Reserved(&'static str),
        }

        impl Keyword {
            const STRUCTURAL: &'static [(&'static str, Keyword)] = &[
                $(($text, Keyword::$variant),)*
            ];

            /// Returns the source text of this keyword.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Keyword::$variant => $text,)*
                    Keyword::Reserved(text) => *text,
                }
            }
        }
    };
}

keywords! {
    ContextMap => "ContextMap",
    BoundedContext => "BoundedContext",
    Aggregate => "Aggregate",
    Module => "Module",
    Entity => "Entity",
    ValueObject => "ValueObject",
    DomainEvent => "DomainEvent",
    Command => "Command",
    Service => "Service",
    Type => "type",
    State => "state",
    Contains => "contains",
    DomainVisionStatement => "domainVisionStatement",
    Responsibilities => "responsibilities",
    ImplementationTechnology => "implementationTechnology",
    KnowledgeLevel => "knowledgeLevel",
    AggregateRoot => "aggregateRoot",
    Key => "key",
    Nullable => "nullable",
    ExposedAggregates => "exposedAggregates",
    Def => "def",
    List => "List",
    Set => "Set",
    Partnership => "Partnership",
    SharedKernel => "SharedKernel",
    U => "U",
    D => "D",
    Upstream => "Upstream",
    Downstream => "Downstream",
    Ohs => "OHS",
    Pl => "PL",
    Acl => "ACL",
    Cf => "CF",
    P => "P",
    Sk => "SK",
    AsIs => "AS_IS",
    ToBe => "TO_BE",
    Meta => "META",
    Concrete => "CONCRETE",
    Feature => "FEATURE",
    Application => "APPLICATION",
    System => "SYSTEM",
    Team => "TEAM",
    SystemLandscape => "SYSTEM_LANDSCAPE",
    Organizational => "ORGANIZATIONAL",
}

/// Words the lexer treats as keywords although no production uses them.
const RESERVED_WORDS: &[&str] = &[
    "Domain",
    "Subdomain",
    "Flow",
    "Repository",
    "Resource",
    "Consumer",
    "Event",
    "Trait",
    "UseCase",
    "Stakeholders",
    "enum",
    "abstract",
    "extends",
    "package",
    "import",
    "hint",
    "query",
    "gap",
    "nogap",
    "scaffold",
    "cache",
    "inverse",
    "opposite",
    "required",
    "transient",
    "index",
    "length",
    "belongsTo",
    "owner",
    "realizes",
    "implements",
    "refines",
    "service",
    "module",
    "entity",
    "event",
    "command",
    "aggregate",
    "domain",
    "version",
    "basePackage",
];

/// Names a domain object (aggregate, entity, value object, event, command,
/// service) may not use, compared case-insensitively.
pub const RESERVED_DOMAIN_OBJECT_NAMES: &[&str] = &[
    "Resource",
    "Service",
    "Repository",
    "Module",
    "Entity",
    "ValueObject",
    "DomainEvent",
    "Command",
    "Aggregate",
    "BoundedContext",
    "ContextMap",
    "Domain",
    "Subdomain",
    "Application",
    "Event",
];

impl Keyword {
    /// Classifies a complete word, returning `None` for plain identifiers.
    ///
    /// Matching is exact and case-sensitive; the caller is expected to pass
    /// the whole word so that `ServiceNowPlatform` never matches `Service`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ctxmap_core::keywords::Keyword;
    ///
    /// assert_eq!(Keyword::lookup("Entity"), Some(Keyword::Entity));
    /// assert_eq!(Keyword::lookup("query"), Some(Keyword::Reserved("query")));
    /// assert_eq!(Keyword::lookup("ServiceNowPlatform"), None);
    /// ```
    pub fn lookup(word: &str) -> Option<Keyword> {
        Self::STRUCTURAL
            .iter()
            .find(|(text, _)| *text == word)
            .map(|(_, keyword)| *keyword)
            .or_else(|| {
                RESERVED_WORDS
                    .iter()
                    .copied()
                    .find(|text| *text == word)
                    .map(Keyword::Reserved)
            })
    }

    /// Returns `true` if this keyword may appear unescaped where an
    /// attribute or parameter name is expected.
    ///
    /// Lower-case keywords (`type`, `state`, `key`, `service`, `module`, ...)
    /// collide with everyday domain vocabulary and are admitted as names.
    pub fn is_attribute_name(&self) -> bool {
        self.as_str()
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_lowercase())
    }

    /// Iterates over the text of every keyword the lexer recognises.
    pub fn all_words() -> impl Iterator<Item = &'static str> {
        Self::STRUCTURAL
            .iter()
            .map(|(text, _)| *text)
            .chain(RESERVED_WORDS.iter().copied())
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns `true` if `word` is exactly a keyword token.
pub fn is_keyword(word: &str) -> bool {
    Keyword::lookup(word).is_some()
}

/// Returns `true` if `word` matches a keyword ignoring ASCII case.
///
/// Attribute names for which this holds are escaped on output.
pub fn is_reserved_word(word: &str) -> bool {
    Keyword::all_words().any(|kw| kw.eq_ignore_ascii_case(word))
}

/// Returns the canonical spelling of a reserved domain-object name that
/// matches `name` ignoring ASCII case.
pub fn reserved_domain_object_name(name: &str) -> Option<&'static str> {
    RESERVED_DOMAIN_OBJECT_NAMES
        .iter()
        .copied()
        .find(|reserved| reserved.eq_ignore_ascii_case(name))
}
