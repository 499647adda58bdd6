use crate::span::Span;

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A related source location providing additional context for a diagnostic.
#[derive(Debug, Clone)]
pub struct RelatedSpan {
    pub span: Span,
    pub message: String,
}

/// A compiler diagnostic (error or warning).
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: Option<Span>,
    pub related: Vec<RelatedSpan>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            span: None,
            related: Vec::new(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            span: None,
            related: Vec::new(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_related(mut self, span: Span, message: impl Into<String>) -> Self {
        self.related.push(RelatedSpan {
            span,
            message: message.into(),
        });
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        match self.span {
            Some(ref span) => write!(f, "{}: {}: {}", span, prefix, self.message),
            None => write!(f, "{}: {}", prefix, self.message),
        }
    }
}

/// Ordered, append-only collector for diagnostics during compilation.
///
/// The bag can be temporarily disabled with [`set_enabled`]; while
/// disabled, reports are dropped. Callers use this to evaluate an
/// expression speculatively without committing its diagnostics.
///
/// [`set_enabled`]: DiagnosticBag::set_enabled
#[derive(Debug, Default)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
    disabled: bool,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        if !self.disabled {
            self.diagnostics.push(diagnostic);
        }
    }

    pub fn error(&mut self, message: impl Into<String>, span: Span) {
        self.report(Diagnostic::error(message).with_span(span));
    }

    pub fn warning(&mut self, message: impl Into<String>, span: Span) {
        self.report(Diagnostic::warning(message).with_span(span));
    }

    /// Enable or disable reporting. Returns the previous state so the
    /// caller can restore it.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        let was = !self.disabled;
        self.disabled = !enabled;
        was
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// All errors, in report order.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    /// All warnings, in report order.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
