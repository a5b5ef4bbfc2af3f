// tokpeg. Token-stream PEG parsing
// Copyright (c) 2018 Dragoș Tiselice
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use std::sync::Arc;

use once_cell::sync::Lazy;

use tokpeg::generic::{EOF, IDENTIFIER};
use tokpeg_meta::{
    and, o2n, one2n, opt, or, unwrap_or_report, Grammar, GrammarBuilder, GrammarError, RuleId,
};

use super::keywords::*;
use super::punctuators::*;
use super::INTEGER;

static GRAMMAR: Lazy<Arc<Grammar>> = Lazy::new(|| Arc::new(unwrap_or_report(build())));

/// The Mini-C grammar, rooted at `compilationUnit`.
pub fn grammar() -> Arc<Grammar> {
    Arc::clone(&GRAMMAR)
}

/// Builds a fresh copy of the Mini-C grammar.
pub fn build() -> Result<Grammar, Vec<GrammarError>> {
    let mut g = GrammarBuilder::new();
    let root = define(&mut g).map_err(|error| vec![error])?;
    g.set_root(root);

    g.build()
}

fn define(g: &mut GrammarBuilder) -> Result<RuleId, GrammarError> {
    let bin_type = g.rule("binType");
    let bin_function_definition = g.rule("binFunctionDefinition");
    let bin_parameter = g.rule("binParameter");
    let bin_variable_definition = g.rule("binVariableDefinition");
    let bin_function_reference = g.rule("binFunctionReference");
    let bin_variable_reference = g.rule("binVariableReference");

    let compilation_unit = g.rule("compilationUnit");
    let definition = g.rule("definition");
    let struct_definition = g.rule("structDefinition");
    let struct_member = g.rule("structMember");
    let function_definition = g.rule("functionDefinition");
    let variable_definition = g.rule("variableDefinition");
    let parameters_list = g.rule("parametersList");
    let parameter_declaration = g.rule("parameterDeclaration");
    let compound_statement = g.rule("compoundStatement");
    let variable_initializer = g.rule("variableInitializer");
    let argument_expression_list = g.rule("argumentExpressionList");

    let statement = g.rule("statement");
    let expression_statement = g.rule("expressionStatement");
    let return_statement = g.rule("returnStatement");
    let continue_statement = g.rule("continueStatement");
    let break_statement = g.rule("breakStatement");
    let if_statement = g.rule("ifStatement");
    let while_statement = g.rule("whileStatement");
    let condition_clause = g.rule("conditionClause");
    let else_clause = g.rule("elseClause");
    let no_statement = g.rule("noStatement");

    let expression = g.rule("expression");
    let assignment_expression = g.rule("assignmentExpression");
    let relational_expression = g.rule("relationalExpression");
    let relational_operator = g.rule("relationalOperator");
    let additive_expression = g.rule("additiveExpression");
    let additive_operator = g.rule("additiveOperator");
    let multiplicative_expression = g.rule("multiplicativeExpression");
    let multiplicative_operator = g.rule("multiplicativeOperator");
    let unary_expression = g.rule("unaryExpression");
    let unary_operator = g.rule("unaryOperator");
    let postfix_expression = g.rule("postfixExpression");
    let postfix_operator = g.rule("postfixOperator");
    let primary_expression = g.rule("primaryExpression");

    // Bins: named identifiers, so that tools can tell definitions from references.
    g.define(bin_type).is(or!(INT, VOID))?;
    g.define(bin_function_definition).is(IDENTIFIER)?;
    g.define(bin_parameter).is(IDENTIFIER)?;
    g.define(bin_variable_definition).is(IDENTIFIER)?;
    g.define(bin_function_reference).is(IDENTIFIER)?;
    g.define(bin_variable_reference).is(IDENTIFIER)?;

    // Definitions
    g.define(compilation_unit).is(and!(o2n!(definition), EOF))?;
    g.define(definition)
        .is_or([struct_definition, function_definition, variable_definition])?;
    g.define(struct_definition).is(and!(
        STRUCT,
        IDENTIFIER,
        BRACE_L,
        one2n!(struct_member, SEMICOLON),
        BRACE_R
    ))?;
    g.define(struct_member).is(and!(bin_type, IDENTIFIER))?;
    g.define(function_definition).is(and!(
        bin_type,
        bin_function_definition,
        PAREN_L,
        opt!(parameters_list),
        PAREN_R,
        compound_statement
    ))?;
    g.define(variable_definition).is(and!(
        bin_type,
        bin_variable_definition,
        opt!(variable_initializer),
        SEMICOLON
    ))?;
    g.define(parameters_list).is(and!(
        parameter_declaration,
        o2n!(COMMA, parameter_declaration)
    ))?;
    g.define(parameter_declaration).is(and!(bin_type, bin_parameter))?;
    g.define(compound_statement).is(and!(
        BRACE_L,
        o2n!(variable_definition),
        o2n!(statement),
        BRACE_R
    ))?;
    g.define(variable_initializer).is(and!(EQ, expression))?;
    g.define(argument_expression_list).is(and!(expression, o2n!(COMMA, expression)))?;

    // Statements
    g.define(statement).is_or([
        compound_statement,
        expression_statement,
        if_statement,
        while_statement,
        return_statement,
        continue_statement,
        break_statement,
        no_statement,
    ])?;
    g.define(expression_statement).is(and!(expression, SEMICOLON))?;
    g.define(if_statement)
        .is(and!(IF, condition_clause, statement, opt!(else_clause)))?;
    g.define(else_clause).is(and!(ELSE, statement))?;
    g.define(while_statement)
        .is(and!(WHILE, condition_clause, statement))?;
    g.define(condition_clause)
        .is(and!(PAREN_L, expression, PAREN_R))?;
    g.define(return_statement)
        .is(and!(RETURN, expression, SEMICOLON))?;
    g.define(continue_statement).is(and!(CONTINUE, SEMICOLON))?;
    g.define(break_statement).is(and!(BREAK, SEMICOLON))?;
    g.define(no_statement).is(SEMICOLON)?;

    // Expressions
    g.define(expression).is(assignment_expression)?;
    g.define(assignment_expression)
        .is(and!(
            relational_expression,
            opt!(EQ, relational_expression)
        ))?
        .skip_if_one_child();
    g.define(relational_expression)
        .is(and!(
            additive_expression,
            opt!(relational_operator, relational_expression)
        ))?
        .skip_if_one_child();
    g.define(relational_operator)
        .is(or!(EQEQ, NE, LTE, LT, GTE, GT))?;
    g.define(additive_expression)
        .is(and!(
            multiplicative_expression,
            opt!(additive_operator, additive_expression)
        ))?
        .skip_if_one_child();
    g.define(additive_operator).is(or!(ADD, SUB))?;
    g.define(multiplicative_expression)
        .is(and!(
            unary_expression,
            opt!(multiplicative_operator, multiplicative_expression)
        ))?
        .skip_if_one_child();
    g.define(multiplicative_operator).is(or!(MUL, DIV))?;
    g.define(unary_expression)
        .is(or!(
            and!(unary_operator, primary_expression),
            postfix_expression
        ))?
        .skip_if_one_child();
    g.define(unary_operator).is(or!(INC, DEC))?;
    g.define(postfix_expression)
        .is(or!(
            and!(primary_expression, postfix_operator),
            and!(
                bin_function_reference,
                PAREN_L,
                opt!(argument_expression_list),
                PAREN_R
            ),
            primary_expression
        ))?
        .skip_if_one_child();
    g.define(postfix_operator).is(or!(INC, DEC))?;
    g.define(primary_expression).is(or!(
        INTEGER,
        bin_variable_reference,
        and!(PAREN_L, expression, PAREN_R)
    ))?;

    Ok(compilation_unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds() {
        let grammar = build().unwrap();

        assert_eq!(grammar.rule(grammar.root()).name(), "compilationUnit");
        assert_eq!(
            grammar.ebnf(grammar.rule_id("parametersList").unwrap()),
            "parametersList := parameterDeclaration (COMMA parameterDeclaration)*"
        );
        assert_eq!(
            grammar.ebnf(grammar.rule_id("binType").unwrap()),
            "binType := (INT | VOID)"
        );
    }
}
