//! Non-fatal ingestion diagnostics.
//!
//! Conditions that do not abort ingestion are collected into [`Diagnostics`] and handed
//! back with the catalog. The code raising a diagnostic also emits the matching
//! `tracing` event; the collection itself only stores.

use std::fmt;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Something that may produce a wrong or colliding binding.
    Warning,
    /// A conservative decision the classifier made on its own.
    Info,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Warning => f.write_str("warning"),
            DiagnosticKind::Info => f.write_str("info"),
        }
    }
}

/// What a diagnostic is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// A name follows neither the type-prefix nor the scalar-suffix convention.
    NamingConvention,
    /// A field type was not in the catalog when its structure was classified.
    UnresolvedFieldType,
    /// A canonical name was declared more than once; the later declaration won.
    DuplicateDeclaration,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::NamingConvention => "naming-convention",
            DiagnosticCode::UnresolvedFieldType => "unresolved-field-type",
            DiagnosticCode::DuplicateDeclaration => "duplicate-declaration",
        }
    }
}

/// A single diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub code: DiagnosticCode,
    pub message: String,
    /// Raw name of the declaration being processed, if any.
    pub entity: Option<String>,
}

impl Diagnostic {
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::Warning,
            code,
            message: message.into(),
            entity: None,
        }
    }

    pub fn info(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::Info,
            code,
            message: message.into(),
            entity: None,
        }
    }

    /// Attach the declaration this diagnostic was raised in.
    pub fn in_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entity {
            Some(entity) => write!(
                f,
                "{}: {}[{}]: {}",
                entity,
                self.kind,
                self.code.as_str(),
                self.message
            ),
            None => write!(f, "{}[{}]: {}", self.kind, self.code.as_str(), self.message),
        }
    }
}

/// Diagnostics collected over one ingestion run, in the order they were raised.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::Warning)
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Diagnostics with the given code.
    pub fn with_code(&self, code: DiagnosticCode) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.code == code)
    }

    pub fn has_code(&self, code: DiagnosticCode) -> bool {
        self.with_code(code).next().is_some()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diagnostic in &self.diagnostics {
            writeln!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_collection() {
        let diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());
        assert_eq!(diagnostics.warning_count(), 0);
        assert_eq!(diagnostics.to_string(), "");
    }

    #[test]
    fn counts_and_filters() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(
            Diagnostic::warning(DiagnosticCode::NamingConvention, "odd name 'float'")
                .in_entity("VkViewport"),
        );
        diagnostics.push(Diagnostic::info(
            DiagnosticCode::UnresolvedFieldType,
            "'StructureType' is not in the catalog",
        ));

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.warning_count(), 1);
        assert!(diagnostics.has_code(DiagnosticCode::UnresolvedFieldType));
        assert!(!diagnostics.has_code(DiagnosticCode::DuplicateDeclaration));
        assert_eq!(
            diagnostics.with_code(DiagnosticCode::NamingConvention).count(),
            1
        );
    }

    #[test]
    fn display_format() {
        let d = Diagnostic::warning(
            DiagnosticCode::DuplicateDeclaration,
            "Foo declared twice",
        )
        .in_entity("VkFoo");
        assert_eq!(
            d.to_string(),
            "VkFoo: warning[duplicate-declaration]: Foo declared twice"
        );

        let d = Diagnostic::info(DiagnosticCode::UnresolvedFieldType, "x");
        assert_eq!(d.to_string(), "info[unresolved-field-type]: x");
    }
}
