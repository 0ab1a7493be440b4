// crates/contract-forge-gen/src/blocks.rs
// ============================================================================
// Module: Code Block Assembler
// Description: Stack machine for given/when/then/and sections.
// Purpose: Assemble indentation-correct blocks with explicit frame checks.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Generated methods are assembled from explicit block frames rather than
//! string concatenation. A frame stack tracks the open sections; every close
//! verifies the frame kind it pops, so a producer that forgets to close (or
//! closes the wrong section) fails at assembly time instead of emitting
//! malformed text.
//!
//! `and` frames are a continuation of the preceding `then` frame: opening one
//! closes the current `then`/`and` frame and reopens at the same indent, so
//! sibling assertion sections always render flush with each other.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Section kind of one block frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Request preparation section.
    Given,
    /// The call under test.
    When,
    /// Primary assertion section.
    Then,
    /// Continuation assertion section, flush with its `then`.
    And,
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Given => "given",
            Self::When => "when",
            Self::Then => "then",
            Self::And => "and",
        };
        f.write_str(label)
    }
}

/// One rendered line inside a block.
///
/// `indent_delta` is added to the block indent at render time; chained
/// builder calls conventionally sit two levels deeper than their statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Extra indent levels relative to the block body.
    pub indent_delta: usize,
    /// Line text without indentation or terminator.
    pub text: String,
}

/// One closed block in assembly order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Section kind.
    pub kind: BlockKind,
    /// Indent level of the section label; statements render one deeper.
    pub indent: usize,
    /// Statement lines in insertion order.
    pub lines: Vec<Line>,
}

/// Structural assembly failure.
///
/// These are programming errors in the producer pipeline, surfaced as
/// values so generation reports them against the offending contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    /// A close named a kind that does not match the open frame.
    #[error("close expected open {expected} block, found {found}")]
    KindMismatch {
        /// Kind the caller tried to close.
        expected: BlockKind,
        /// Kind actually on top of the stack, rendered for the message.
        found: String,
    },
    /// A statement or close arrived with no open frame.
    #[error("no open block for {operation}")]
    NoOpenBlock {
        /// Operation that required an open frame.
        operation: &'static str,
    },
    /// An `and` frame was opened without a preceding `then`.
    #[error("and block requires an open then block")]
    AndWithoutThen,
    /// Assembly finished with frames still open.
    #[error("{count} block(s) left open at finish")]
    UnclosedBlocks {
        /// Number of frames still on the stack.
        count: usize,
    },
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Stack-machine assembler for generated method sections.
///
/// # Invariants
/// - Frames close in LIFO order with kind verification.
/// - `and` frames reuse the indent of the `then`/`and` frame they replace.
/// - The terminator is appended at most once per statement run.
#[derive(Debug)]
pub struct BlockBuilder {
    /// Statement terminator, empty for frameworks without one.
    ending: String,
    /// Indent level of the enclosing method body.
    base_indent: usize,
    /// Open frames, innermost last.
    stack: Vec<CodeBlock>,
    /// Closed frames in assembly order.
    finished: Vec<CodeBlock>,
    /// Whether the last appended statement still awaits its terminator.
    open_statement: bool,
}

impl BlockBuilder {
    /// Creates a builder for a method body at the given indent level.
    #[must_use]
    pub fn new(ending: &str, base_indent: usize) -> Self {
        Self {
            ending: ending.to_string(),
            base_indent,
            stack: Vec::new(),
            finished: Vec::new(),
            open_statement: false,
        }
    }

    /// Opens a new frame.
    ///
    /// Non-`and` kinds nest one level below the current frame (or one below
    /// the base indent when the stack is empty). Opening an `and` frame
    /// closes the current `then`/`and` frame and reopens at the same indent.
    ///
    /// # Errors
    /// Returns [`BlockError::AndWithoutThen`] when an `and` frame is opened
    /// without an open `then` or `and` frame.
    pub fn open(&mut self, kind: BlockKind) -> Result<(), BlockError> {
        let indent = if kind == BlockKind::And {
            let Some((top_kind, top_indent)) =
                self.stack.last().map(|top| (top.kind, top.indent))
            else {
                return Err(BlockError::AndWithoutThen);
            };
            if top_kind != BlockKind::Then && top_kind != BlockKind::And {
                return Err(BlockError::AndWithoutThen);
            }
            self.close(top_kind)?;
            top_indent
        } else {
            self.stack.last().map_or(self.base_indent + 1, |top| top.indent + 1)
        };
        self.stack.push(CodeBlock {
            kind,
            indent,
            lines: Vec::new(),
        });
        self.open_statement = false;
        Ok(())
    }

    /// Closes the innermost frame, verifying its kind.
    ///
    /// Trailing blank lines are dropped so no section ends with padding.
    ///
    /// # Errors
    /// Returns [`BlockError::NoOpenBlock`] on an empty stack and
    /// [`BlockError::KindMismatch`] when the top frame has another kind.
    pub fn close(&mut self, kind: BlockKind) -> Result<(), BlockError> {
        let Some(top) = self.stack.last() else {
            return Err(BlockError::NoOpenBlock {
                operation: "close",
            });
        };
        if top.kind != kind {
            return Err(BlockError::KindMismatch {
                expected: kind,
                found: top.kind.to_string(),
            });
        }
        self.add_ending_if_not_present();
        let Some(mut frame) = self.stack.pop() else {
            return Err(BlockError::NoOpenBlock {
                operation: "close",
            });
        };
        while frame.lines.last().is_some_and(|line| line.text.is_empty()) {
            frame.lines.pop();
        }
        self.finished.push(frame);
        self.open_statement = false;
        Ok(())
    }

    /// Appends a statement line to the open frame.
    ///
    /// # Errors
    /// Returns [`BlockError::NoOpenBlock`] when no frame is open.
    pub fn add_statement(&mut self, text: &str) -> Result<(), BlockError> {
        self.push_line(0, text)
    }

    /// Appends a chained continuation line, two levels deeper.
    ///
    /// # Errors
    /// Returns [`BlockError::NoOpenBlock`] when no frame is open.
    pub fn add_continuation(&mut self, text: &str) -> Result<(), BlockError> {
        self.push_line(2, text)
    }

    /// Appends one blank separator line.
    ///
    /// Idempotent at boundaries: never emits a leading blank and never two
    /// consecutive blanks, so producers may call it unconditionally.
    pub fn add_empty_line(&mut self) {
        self.add_ending_if_not_present();
        if let Some(top) = self.stack.last_mut()
            && top.lines.last().is_some_and(|line| !line.text.is_empty())
        {
            top.lines.push(Line {
                indent_delta: 0,
                text: String::new(),
            });
        }
    }

    /// Terminates the current statement run, exactly once.
    ///
    /// With an empty terminator this only clears the pending flag.
    pub fn add_ending_if_not_present(&mut self) {
        if !self.open_statement {
            return;
        }
        self.open_statement = false;
        if self.ending.is_empty() {
            return;
        }
        if let Some(top) = self.stack.last_mut()
            && let Some(line) = top.lines.last_mut()
            && !line.text.is_empty()
            && !line.text.ends_with(&self.ending)
        {
            line.text.push_str(&self.ending);
        }
    }

    /// Consumes the builder, returning closed blocks in assembly order.
    ///
    /// # Errors
    /// Returns [`BlockError::UnclosedBlocks`] when frames remain open.
    pub fn finish(self) -> Result<Vec<CodeBlock>, BlockError> {
        if !self.stack.is_empty() {
            return Err(BlockError::UnclosedBlocks {
                count: self.stack.len(),
            });
        }
        Ok(self.finished)
    }

    /// Appends one line to the open frame, marking the statement pending.
    fn push_line(&mut self, indent_delta: usize, text: &str) -> Result<(), BlockError> {
        let Some(top) = self.stack.last_mut() else {
            return Err(BlockError::NoOpenBlock {
                operation: "add_statement",
            });
        };
        top.lines.push(Line {
            indent_delta,
            text: text.to_string(),
        });
        self.open_statement = true;
        Ok(())
    }
}
