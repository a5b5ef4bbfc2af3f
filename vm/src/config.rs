// tokpeg. Token-stream PEG parsing
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

/// Number of tokens shown on each side of the failure in source excerpts.
pub const SOURCE_CODE_TOKENS_WINDOW: usize = 30;

/// Per-parser options.
///
/// ```
/// # use tokpeg_vm::ParserConfig;
/// let config = ParserConfig::default()
///     .with_extended_stack_trace(true)
///     .with_source_window(5);
///
/// assert!(config.memoization);
/// assert_eq!(config.source_window, 5);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParserConfig {
    /// Cache results per (matcher, position) so that backtracking stays linear.
    pub memoization: bool,
    /// Record the chain of rules active at the furthest failure.
    pub extended_stack_trace: bool,
    /// Include an excerpt of the tokens around the failure in reports.
    pub display_source_code: bool,
    /// Tokens shown on each side of the failure in the excerpt.
    pub source_window: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            memoization: true,
            extended_stack_trace: false,
            display_source_code: true,
            source_window: SOURCE_CODE_TOKENS_WINDOW,
        }
    }
}

impl ParserConfig {
    pub fn with_memoization(mut self, memoization: bool) -> Self {
        self.memoization = memoization;
        self
    }

    pub fn with_extended_stack_trace(mut self, extended_stack_trace: bool) -> Self {
        self.extended_stack_trace = extended_stack_trace;
        self
    }

    pub fn with_source_code(mut self, display_source_code: bool) -> Self {
        self.display_source_code = display_source_code;
        self
    }

    pub fn with_source_window(mut self, source_window: usize) -> Self {
        self.source_window = source_window;
        self
    }
}
