// tokpeg. Token-stream PEG parsing
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

/// Observer of a parse.
///
/// Rule events fire for every rule invocation, including the ones answered from the memo, so
/// that an observer sees the same sequence of events whether memoization is enabled or not.
/// Token positions are indices in the token stream.
///
/// Listeners are shared by every parse of a [`Parser`](crate::Parser) and must therefore be
/// `Send + Sync`; listeners keeping state use interior mutability.
///
/// ```
/// # use std::sync::atomic::{AtomicUsize, Ordering};
/// # use tokpeg_vm::ParsingEventListener;
/// #[derive(Default)]
/// struct RuleCounter(AtomicUsize);
///
/// impl ParsingEventListener for RuleCounter {
///     fn enter_rule(&self, _rule: &str, _index: usize) {
///         self.0.fetch_add(1, Ordering::Relaxed);
///     }
/// }
/// ```
pub trait ParsingEventListener: Send + Sync {
    fn begin_lex(&self) {}

    fn end_lex(&self) {}

    fn begin_parse(&self) {}

    fn end_parse(&self) {}

    fn enter_rule(&self, _rule: &str, _index: usize) {}

    /// The rule matched tokens `[start, end)`.
    fn exit_with_match_rule(&self, _rule: &str, _start: usize, _end: usize) {}

    /// The rule entered at `start` did not match.
    fn exit_without_match_rule(&self, _rule: &str, _start: usize) {}
}
