use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::fmt;

/// Half-open range of character offsets into the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn single(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos + 1,
        }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(&self, other: &Span) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    LexError,
    SyntaxError,
    BindingError,
    EvalError,
}

impl ErrorKind {
    fn title(&self) -> &'static str {
        match self {
            ErrorKind::LexError => "Lexical Error",
            ErrorKind::SyntaxError => "Syntax Error",
            ErrorKind::BindingError => "Binding Error",
            ErrorKind::EvalError => "Evaluation Error",
        }
    }

    fn color(&self) -> Color {
        match self {
            ErrorKind::LexError => Color::Red,
            ErrorKind::SyntaxError => Color::Yellow,
            ErrorKind::BindingError => Color::Magenta,
            ErrorKind::EvalError => Color::Blue,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuillError {
    pub kind: ErrorKind,
    pub span: Span,
    pub message: String,
    pub help: Option<String>,
}

impl QuillError {
    pub fn new(kind: ErrorKind, span: Span, message: String) -> Self {
        Self {
            kind,
            span,
            message,
            help: None,
        }
    }

    pub fn new_with_help(kind: ErrorKind, span: Span, message: String, help: String) -> Self {
        Self {
            kind,
            span,
            message,
            help: Some(help),
        }
    }

    pub fn lex_error(span: Span, message: String) -> Self {
        Self::new(ErrorKind::LexError, span, message)
    }

    pub fn syntax_error(span: Span, message: String) -> Self {
        Self::new(ErrorKind::SyntaxError, span, message)
    }

    pub fn syntax_error_with_help(span: Span, message: String, help: String) -> Self {
        Self::new_with_help(ErrorKind::SyntaxError, span, message, help)
    }

    pub fn binding_error(span: Span, message: String) -> Self {
        Self::new(ErrorKind::BindingError, span, message)
    }

    pub fn eval_error_with_help(span: Span, message: String, help: String) -> Self {
        Self::new_with_help(ErrorKind::EvalError, span, message, help)
    }

    /// Prints a labelled diagnostic for this error against `source` to stderr.
    pub fn report(&self, source: &str, filename: Option<&str>) {
        let filename = filename.unwrap_or("<repl>");
        let color = self.kind.color();

        // EndOfFile spans sit one past the last character; keep the label inside the source.
        let len = source.chars().count();
        let start = self.span.start.min(len);
        let end = self.span.end.clamp(start, len.max(start));

        let mut report_builder = Report::build(ReportKind::Error, filename, start)
            .with_message(format!("{}: {}", self.kind.title().fg(color), self.message))
            .with_label(
                Label::new((filename, start..end))
                    .with_message(&self.message)
                    .with_color(color),
            );

        if let Some(ref help_text) = self.help {
            report_builder =
                report_builder.with_note(format!("{}: {}", "help".fg(Color::Cyan), help_text));
        }

        if let Err(e) = report_builder
            .finish()
            .eprint((filename, Source::from(source)))
        {
            // Fall back to the plain message if the terminal rejects the report.
            eprintln!("{}: {} ({})", self.kind.title(), self.message, e);
        }
    }
}

impl fmt::Display for QuillError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for QuillError {}
