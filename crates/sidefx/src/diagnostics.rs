//! The fixed diagnostic vocabulary and an append-only sink.
//!
//! Wording is part of the contract: downstream tooling matches on these exact
//! phrasings, so `Message`'s `Display` impl must never be "improved".

use std::fmt;

use oxc_span::Span;

/// One of the fixed diagnostic messages this engine is allowed to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message {
    CallingGlobal,
    CallingMember,
    CallingParameter,
    CallingCallResult,
    CallingImport,
    CallingDestructured,
    CallingSuper,
    AssignmentToGlobal,
    MutatingGlobal,
    MutatingImport,
    MutatingParameter,
    MutatingCallResult,
    MutatingDestructured,
    MutatingMember,
    MutatingUnknownThis,
    IteratingOverIterable,
    DeleteNonMember,
    ArrowCalledWithNew,
    Debugger,
    Throwing,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Message::CallingGlobal => "Cannot determine side-effects of calling global function",
            Message::CallingMember => "Cannot determine side-effects of calling member function",
            Message::CallingParameter => {
                "Cannot determine side-effects of calling function parameter"
            }
            Message::CallingCallResult => {
                "Cannot determine side-effects of calling function return value"
            }
            Message::CallingImport => {
                "Cannot determine side-effects of calling imported function"
            }
            Message::CallingDestructured => {
                "Cannot determine side-effects of calling destructured variable"
            }
            Message::CallingSuper => "Cannot determine side-effects of calling super",
            Message::AssignmentToGlobal => {
                "Cannot determine side-effects of assignment to global variable"
            }
            Message::MutatingGlobal => "Cannot determine side-effects of mutating global variable",
            Message::MutatingImport => {
                "Cannot determine side-effects of mutating imported variable"
            }
            Message::MutatingParameter => {
                "Cannot determine side-effects of mutating function parameter"
            }
            Message::MutatingCallResult => {
                "Cannot determine side-effects of mutating function return value"
            }
            Message::MutatingDestructured => {
                "Cannot determine side-effects of mutating destructured variable"
            }
            Message::MutatingMember => "Cannot determine side-effects of mutating member",
            Message::MutatingUnknownThis => {
                "Cannot determine side-effects of mutating unknown this value"
            }
            Message::IteratingOverIterable => {
                "Cannot determine side-effects of iterating over an iterable"
            }
            Message::DeleteNonMember => {
                "Cannot determine side-effects of deleting anything but a MemberExpression"
            }
            Message::ArrowCalledWithNew => "Calling an arrow function with \"new\" is a side-effect",
            Message::Debugger => "Debugger statements are side-effects",
            Message::Throwing => "Throwing an error is a side-effect",
        };
        f.write_str(text)
    }
}

/// A single reported effect, anchored at the span where it was detected.
#[derive(Debug, Clone, Copy)]
pub struct Diagnostic {
    pub span: Span,
    pub message: Message,
}

impl Diagnostic {
    pub fn new(span: Span, message: Message) -> Self {
        Self { span, message }
    }
}

/// Ordered, append-only collector for diagnostics.
///
/// The walk never short-circuits on a diagnostic: a single span can receive
/// multiple independent findings (e.g. `for (ext of ext2())` reports both the
/// iteration and the call).
#[derive(Debug, Default)]
pub struct Sink {
    diagnostics: Vec<Diagnostic>,
}

impl Sink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, span: Span, message: Message) {
        tracing::debug!(?span, %message, "side effect detected");
        self.diagnostics.push(Diagnostic::new(span, message));
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }
}
