// tokpeg. Token-stream PEG parsing
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

/// Grammar definition errors. They are programming errors in the grammar itself and are
/// raised while the grammar is being defined or built, never while parsing.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum GrammarError {
    /// A rule was defined with nothing to match.
    #[error("The rule '{0}' should at least contains one matcher.")]
    EmptyDefinition(String),
    /// `is` was called on a rule which already has a definition.
    #[error("The rule '{0}' has already been defined somewhere in the grammar.")]
    AlreadyDefined(String),
    /// `or` was called on a rule which has no definition yet.
    #[error("The rule '{0}' hasn't been defined yet, an alternative can't be added to it.")]
    AlternativeBeforeDefinition(String),
    /// A rule is used but was never defined.
    #[error("The rule '{0}' is used but has never been defined.")]
    UndefinedRule(String),
    /// A combinator nested in the definition has nothing to match.
    #[error("The rule '{rule}' contains an empty '{combinator}' combinator.")]
    EmptyCombinator {
        rule: String,
        combinator: &'static str,
    },
    /// No root rule was set before building.
    #[error("The grammar has no root rule.")]
    MissingRoot,
}
