// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use regex::RegexBuilder;

use mal_expressions::{
    AggregationExpression, AggregationOperator, ArithmeticOperator, DownsamplingExpression,
    DownsamplingHint, EndpointScope, HistogramExpression, HistogramPercentileExpression,
    InstanceScope, MalExpression, PipelineOperation, ProcessRelationScope, QueryLocation,
    RetagExpression, RetagRuleKind, ScopeExpression, ServiceRelationScope, ServiceScope,
    SourceExpression, TagFilterExpression, TagLiteralFilter, TagRegexFilter, TagRewriteExpression,
    ValueLiteralFilter, WindowedExpression, WindowedOperation,
};

use crate::closure_matcher::{match_tag_closure, parse_foreach_table};
use crate::duration::parse_iso8601_duration_seconds;
use crate::tokenizer::{tokenize, Token, TokenKind};
use crate::ParserError;

/// One parsed call-style argument: `arg`, `arg, arg`, `['a', 'b']`, or a
/// `{ ... }` closure body.
#[derive(Debug, Clone)]
enum Arg {
    Ident(Box<str>, QueryLocation),
    String(Box<str>, QueryLocation),
    Number(f64, QueryLocation),
    Array(Vec<Arg>, QueryLocation),
    Closure(Box<str>, QueryLocation),
}

impl Arg {
    fn location(&self) -> &QueryLocation {
        match self {
            Arg::Ident(_, l) | Arg::String(_, l) | Arg::Number(_, l) | Arg::Array(_, l) | Arg::Closure(_, l) => l,
        }
    }

    fn as_text(&self) -> Result<Box<str>, ParserError> {
        match self {
            Arg::Ident(s, _) | Arg::String(s, _) => Ok(s.clone()),
            other => Err(ParserError::UnexpectedToken(
                other.location().clone(),
                "expected a string or identifier argument".into(),
            )),
        }
    }

    fn as_number(&self) -> Result<f64, ParserError> {
        match self {
            Arg::Number(n, _) => Ok(*n),
            other => Err(ParserError::UnexpectedToken(
                other.location().clone(),
                "expected a numeric argument".into(),
            )),
        }
    }

    fn as_string_array(&self) -> Result<Vec<Box<str>>, ParserError> {
        match self {
            Arg::Array(items, _) => items.iter().map(|a| a.as_text()).collect(),
            other => Err(ParserError::UnexpectedToken(
                other.location().clone(),
                "expected an array literal argument".into(),
            )),
        }
    }

    fn as_number_array(&self) -> Result<Vec<f64>, ParserError> {
        match self {
            Arg::Array(items, _) => items.iter().map(|a| a.as_number()).collect(),
            other => Err(ParserError::UnexpectedToken(
                other.location().clone(),
                "expected an array literal argument".into(),
            )),
        }
    }
}

/// Parses one composed rule expression string into a [`MalExpression`] tree
/// (spec §4.2, §9). The grammar is closed, so this is a small hand-written
/// recursive-descent parser rather than a general-purpose language host.
pub fn parse(query: &str) -> Result<MalExpression, ParserError> {
    let tokens = tokenize(query)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expression = parser.parse_additive()?;
    parser.expect_eof()?;
    Ok(expression)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn loc(&self, token: &Token) -> QueryLocation {
        QueryLocation::new(token.start, token.end, token.line, token.column)
            .unwrap_or_else(|_| QueryLocation::new_fake())
    }

    fn expect_eof(&mut self) -> Result<(), ParserError> {
        match &self.peek().kind {
            TokenKind::Eof => Ok(()),
            other => Err(ParserError::UnexpectedToken(
                self.loc(self.peek()),
                format!("unexpected trailing token {other:?}"),
            )),
        }
    }

    // expr := term (('+' | '-') term)*
    fn parse_additive(&mut self) -> Result<MalExpression, ParserError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let operator = match &self.peek().kind {
                TokenKind::Plus => ArithmeticOperator::Add,
                TokenKind::Minus => ArithmeticOperator::Subtract,
                _ => break,
            };
            let op_token = self.advance();
            let right = self.parse_multiplicative()?;
            left = MalExpression::Arithmetic {
                query_location: self.loc(&op_token),
                operator,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    // term := factor (('*' | '/') factor)*
    fn parse_multiplicative(&mut self) -> Result<MalExpression, ParserError> {
        let mut left = self.parse_factor()?;

        loop {
            let operator = match &self.peek().kind {
                TokenKind::Star => ArithmeticOperator::Multiply,
                TokenKind::Slash => ArithmeticOperator::Divide,
                _ => break,
            };
            let op_token = self.advance();
            let right = self.parse_factor()?;
            left = MalExpression::Arithmetic {
                query_location: self.loc(&op_token),
                operator,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    // factor := number | '(' expr ')' | pipeline
    fn parse_factor(&mut self) -> Result<MalExpression, ParserError> {
        match &self.peek().kind {
            TokenKind::Number(n) => {
                let n = *n;
                let token = self.advance();
                Ok(MalExpression::Literal(self.loc(&token), n))
            }
            TokenKind::LParen => {
                let _ = self.advance();
                let inner = self.parse_additive()?;
                self.expect(TokenKind::RParen)?;
                self.parse_pipeline_tail(inner)
            }
            TokenKind::Ident(_) => self.parse_pipeline(),
            other => Err(ParserError::UnexpectedToken(
                self.loc(self.peek()),
                format!("expected a value, got {other:?}"),
            )),
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParserError> {
        if self.peek().kind == kind {
            Ok(self.advance())
        } else {
            Err(ParserError::UnexpectedToken(
                self.loc(self.peek()),
                format!("expected {kind:?}, got {:?}", self.peek().kind),
            ))
        }
    }

    fn ident(&mut self) -> Result<(Box<str>, Token), ParserError> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                let token = self.advance();
                Ok((name, token))
            }
            other => Err(ParserError::UnexpectedToken(
                self.loc(self.peek()),
                format!("expected an identifier, got {other:?}"),
            )),
        }
    }

    // pipeline := ident ('.' step)*
    fn parse_pipeline(&mut self) -> Result<MalExpression, ParserError> {
        let (name, token) = self.ident()?;
        let source = MalExpression::Source(SourceExpression::new(self.loc(&token), name));
        self.parse_pipeline_tail(source)
    }

    // Consumes any `('.' step)*` trailing a already-parsed expression,
    // so a parenthesized sub-expression can be piped into further steps
    // exactly like a bare source (spec §4.5: `(expr).expSuffix` composition
    // relies on this).
    fn parse_pipeline_tail(&mut self, mut expr: MalExpression) -> Result<MalExpression, ParserError> {
        while self.peek().kind == TokenKind::Dot {
            let _ = self.advance();
            let operation = self.parse_step()?;
            expr = expr.pipe(operation);
        }

        Ok(expr)
    }

    fn parse_step(&mut self) -> Result<PipelineOperation, ParserError> {
        let (name, name_token) = self.ident()?;
        let location = self.loc(&name_token);
        self.expect(TokenKind::LParen)?;
        let args = self.parse_args()?;
        self.expect(TokenKind::RParen)?;

        build_operation(&name, location, args)
    }

    fn parse_args(&mut self) -> Result<Vec<Arg>, ParserError> {
        let mut args = Vec::new();
        if self.peek().kind == TokenKind::RParen {
            return Ok(args);
        }
        loop {
            args.push(self.parse_arg()?);
            if self.peek().kind == TokenKind::Comma {
                let _ = self.advance();
                continue;
            }
            break;
        }
        Ok(args)
    }

    fn parse_arg(&mut self) -> Result<Arg, ParserError> {
        match &self.peek().kind {
            TokenKind::String(s) => {
                let s = s.clone();
                let token = self.advance();
                Ok(Arg::String(s, self.loc(&token)))
            }
            TokenKind::Number(n) => {
                let n = *n;
                let token = self.advance();
                Ok(Arg::Number(n, self.loc(&token)))
            }
            TokenKind::Ident(name) => {
                let name = name.clone();
                let token = self.advance();
                Ok(Arg::Ident(name, self.loc(&token)))
            }
            TokenKind::Closure(text) => {
                let text = text.clone();
                let token = self.advance();
                Ok(Arg::Closure(text, self.loc(&token)))
            }
            TokenKind::LBracket => {
                let open = self.advance();
                let mut items = Vec::new();
                if self.peek().kind != TokenKind::RBracket {
                    loop {
                        items.push(self.parse_arg()?);
                        if self.peek().kind == TokenKind::Comma {
                            let _ = self.advance();
                            continue;
                        }
                        break;
                    }
                }
                self.expect(TokenKind::RBracket)?;
                Ok(Arg::Array(items, self.loc(&open)))
            }
            other => Err(ParserError::UnexpectedToken(
                self.loc(self.peek()),
                format!("expected an argument, got {other:?}"),
            )),
        }
    }
}

fn build_operation(
    name: &str,
    location: QueryLocation,
    args: Vec<Arg>,
) -> Result<PipelineOperation, ParserError> {
    match name {
        "tagEqual" | "tagNotEqual" => {
            let key = args.first().ok_or_else(|| missing_arg(&location, name, 0))?.as_text()?;
            let value = args.get(1).ok_or_else(|| missing_arg(&location, name, 1))?.as_text()?;
            let filter = TagLiteralFilter::new(location, key, value);
            Ok(PipelineOperation::Filter(if name == "tagEqual" {
                TagFilterExpression::TagEqual(filter)
            } else {
                TagFilterExpression::TagNotEqual(filter)
            }))
        }
        "tagMatch" | "tagNotMatch" => {
            let key = args.first().ok_or_else(|| missing_arg(&location, name, 0))?.as_text()?;
            let pattern = args.get(1).ok_or_else(|| missing_arg(&location, name, 1))?.as_text()?;
            let anchored = format!("^(?:{pattern})$");
            let regex = RegexBuilder::new(&anchored)
                .build()
                .map_err(|e| ParserError::InvalidLiteral(location.clone(), e.to_string()))?;
            let filter = TagRegexFilter::new(location, key, pattern, regex);
            Ok(PipelineOperation::Filter(if name == "tagMatch" {
                TagFilterExpression::TagMatch(filter)
            } else {
                TagFilterExpression::TagNotMatch(filter)
            }))
        }
        "valueEqual" => {
            let value = args.first().ok_or_else(|| missing_arg(&location, name, 0))?.as_number()?;
            Ok(PipelineOperation::Filter(TagFilterExpression::ValueEqual(
                ValueLiteralFilter::new(location, value),
            )))
        }
        "tag" => {
            let closure_text = match args.first() {
                Some(Arg::Closure(text, _)) => text.clone(),
                Some(other) => {
                    return Err(ParserError::UnexpectedToken(
                        other.location().clone(),
                        "tag() expects a closure argument".into(),
                    ));
                }
                None => return Err(missing_arg(&location, name, 0)),
            };
            let closure = match_tag_closure(&location, &closure_text)?;
            Ok(PipelineOperation::Rewrite(TagRewriteExpression::new(
                location, closure,
            )))
        }
        "forEach" => {
            let keys = args.first().ok_or_else(|| missing_arg(&location, name, 0))?.as_string_array()?;
            let closure_text = match args.get(1) {
                Some(Arg::Closure(text, _)) => text.clone(),
                Some(other) => {
                    return Err(ParserError::UnexpectedToken(
                        other.location().clone(),
                        "forEach() expects a closure as its second argument".into(),
                    ));
                }
                None => return Err(missing_arg(&location, name, 1)),
            };
            let closure = parse_foreach_table(&location, keys, &closure_text)?;
            Ok(PipelineOperation::Rewrite(TagRewriteExpression::new(
                location, closure,
            )))
        }
        "retagByK8sMeta" => {
            let new_key = args.first().ok_or_else(|| missing_arg(&location, name, 0))?.as_text()?;
            let rule_name = args.get(1).ok_or_else(|| missing_arg(&location, name, 1))?.as_text()?;
            let rule = RetagRuleKind::parse(&rule_name).ok_or_else(|| {
                ParserError::UnknownOperator(location.clone(), rule_name.to_string())
            })?;
            let input_keys = args[2..]
                .iter()
                .map(|a| a.as_text())
                .collect::<Result<Vec<_>, _>>()?;
            Ok(PipelineOperation::Retag(RetagExpression::new(
                location, new_key, rule, input_keys,
            )))
        }
        "sum" | "avg" | "max" | "min" => {
            let group_keys = args.first().ok_or_else(|| missing_arg(&location, name, 0))?.as_string_array()?;
            let operator = match name {
                "sum" => AggregationOperator::Sum,
                "avg" => AggregationOperator::Avg,
                "max" => AggregationOperator::Max,
                _ => AggregationOperator::Min,
            };
            Ok(PipelineOperation::Aggregate(AggregationExpression::new(
                location,
                operator,
                group_keys,
            )))
        }
        "rate" | "increase" => {
            let window_text = args.first().ok_or_else(|| missing_arg(&location, name, 0))?.as_text()?;
            let seconds = parse_iso8601_duration_seconds(&location, &window_text)?;
            let op = WindowedOperation::new(location, seconds);
            Ok(PipelineOperation::Windowed(if name == "rate" {
                WindowedExpression::Rate(op)
            } else {
                WindowedExpression::Increase(op)
            }))
        }
        "irate" => Ok(PipelineOperation::Windowed(WindowedExpression::Irate(
            location,
        ))),
        "downsampling" => {
            let hint_name = args.first().ok_or_else(|| missing_arg(&location, name, 0))?.as_text()?;
            let hint = DownsamplingHint::parse(&hint_name).ok_or_else(|| {
                ParserError::UnknownOperator(location.clone(), hint_name.to_string())
            })?;
            Ok(PipelineOperation::Windowed(WindowedExpression::Downsampling(
                DownsamplingExpression::new(location, hint),
            )))
        }
        "histogram" => Ok(PipelineOperation::Histogram(HistogramExpression::new(
            location,
        ))),
        "histogram_percentile" => {
            let percentiles = args.first().ok_or_else(|| missing_arg(&location, name, 0))?.as_number_array()?;
            Ok(PipelineOperation::HistogramPercentile(
                HistogramPercentileExpression::new(location, percentiles),
            ))
        }
        "service" => {
            let service_keys = args.first().ok_or_else(|| missing_arg(&location, name, 0))?.as_string_array()?;
            let layer = args.get(1).ok_or_else(|| missing_arg(&location, name, 1))?.as_text()?;
            Ok(PipelineOperation::Scope(ScopeExpression::Service(
                ServiceScope::new(location, service_keys, layer),
            )))
        }
        "instance" => {
            let service_keys = args.first().ok_or_else(|| missing_arg(&location, name, 0))?.as_string_array()?;
            let instance_keys = args.get(1).ok_or_else(|| missing_arg(&location, name, 1))?.as_string_array()?;
            let layer = args.get(2).ok_or_else(|| missing_arg(&location, name, 2))?.as_text()?;
            Ok(PipelineOperation::Scope(ScopeExpression::Instance(
                InstanceScope::new(location, service_keys, instance_keys, layer),
            )))
        }
        "endpoint" => {
            let service_keys = args.first().ok_or_else(|| missing_arg(&location, name, 0))?.as_string_array()?;
            let endpoint_keys = args.get(1).ok_or_else(|| missing_arg(&location, name, 1))?.as_string_array()?;
            let layer = args.get(2).ok_or_else(|| missing_arg(&location, name, 2))?.as_text()?;
            Ok(PipelineOperation::Scope(ScopeExpression::Endpoint(
                EndpointScope::new(location, service_keys, endpoint_keys, layer),
            )))
        }
        "serviceRelation" => {
            let detect_point = args.first().ok_or_else(|| missing_arg(&location, name, 0))?.as_text()?;
            let source_keys = args.get(1).ok_or_else(|| missing_arg(&location, name, 1))?.as_string_array()?;
            let dest_keys = args.get(2).ok_or_else(|| missing_arg(&location, name, 2))?.as_string_array()?;
            let layer = args.get(3).ok_or_else(|| missing_arg(&location, name, 3))?.as_text()?;
            Ok(PipelineOperation::Scope(ScopeExpression::ServiceRelation(
                ServiceRelationScope::new(location, detect_point, source_keys, dest_keys, layer),
            )))
        }
        "processRelation" => {
            let side_key = args.first().ok_or_else(|| missing_arg(&location, name, 0))?.as_text()?;
            let service_keys = args.get(1).ok_or_else(|| missing_arg(&location, name, 1))?.as_string_array()?;
            let instance_keys = args.get(2).ok_or_else(|| missing_arg(&location, name, 2))?.as_string_array()?;
            let source_process_key = args.get(3).ok_or_else(|| missing_arg(&location, name, 3))?.as_text()?;
            let dest_process_key = args.get(4).ok_or_else(|| missing_arg(&location, name, 4))?.as_text()?;
            let component_key = args.get(5).ok_or_else(|| missing_arg(&location, name, 5))?.as_text()?;
            Ok(PipelineOperation::Scope(ScopeExpression::ProcessRelation(
                ProcessRelationScope::new(
                    location,
                    side_key,
                    service_keys,
                    instance_keys,
                    source_process_key,
                    dest_process_key,
                    component_key,
                ),
            )))
        }
        other => Err(ParserError::UnknownOperator(location, other.to_string())),
    }
}

fn missing_arg(location: &QueryLocation, operator: &str, index: usize) -> ParserError {
    ParserError::UnexpectedEndOfInput(
        location.clone(),
        format!("{operator}() is missing argument #{index}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_constant_multiply() {
        let expr = parse("process_cpu_usage * 100").unwrap();
        let mut names = Vec::new();
        expr.collect_source_names(&mut names);
        assert_eq!(names, vec!["process_cpu_usage"]);
        assert!(matches!(expr, MalExpression::Arithmetic { .. }));
    }

    #[test]
    fn parses_sum_then_rate_pipeline() {
        let expr = parse(
            "kong_bandwidth_bytes.sum(['host_name','direction']).rate('PT1M')",
        )
        .unwrap();
        assert!(matches!(expr, MalExpression::Pipe { .. }));
    }

    #[test]
    fn parses_scope_binder() {
        let expr = parse("process_cpu_usage.instance(['service'], ['instance'], 'GENERAL')")
            .unwrap();
        assert!(expr.is_scoped());
    }

    #[test]
    fn rejects_unknown_operator() {
        assert!(parse("process_cpu_usage.bogus()").is_err());
    }

    #[test]
    fn parses_histogram_percentile_chain() {
        let expr = parse(
            "http_server_requests_latency.histogram().histogram_percentile([50,75,90,95,99])",
        )
        .unwrap();
        assert!(matches!(expr, MalExpression::Pipe { .. }));
    }

    #[test]
    fn parses_scope_piped_onto_a_parenthesized_arithmetic_expression() {
        // The shape `mal_rules::compose` produces for an `expSuffix` scope
        // binder: `(expr).step(...)`.
        let expr = parse("(process_cpu_usage * 100).instance(['service'], ['instance'], 'GENERAL')")
            .unwrap();
        assert!(expr.is_scoped());
    }
}
