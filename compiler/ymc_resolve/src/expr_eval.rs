use indexmap::IndexMap;

use ymc_ast::{Document, Value};
use ymc_diagnostic::{Diagnostic, ErrorCode};
use ymc_expr::{ExprNode, ScalarTemplate, TemplatePart};
use ymc_lexer_core::Literal;

use crate::context::ResolveContext;
use crate::node_resolve::resolve_node;
use crate::traverse::{traverse_ast, traverse_value};

/// Maps a directive-table literal reading to a resolved [`Value`]
/// (`SPEC_FULL.md` §3.2): used both for `%PARAM`/`%LOCAL` defaults here and
/// by the entry driver (C8) when it pre-loads an `%IMPORT`'s declared
/// default params ahead of the call-site merge.
pub fn literal_to_value(literal: &Literal) -> Value {
    match literal {
        Literal::Undefined => Value::Undefined,
        Literal::Null => Value::Null,
        Literal::Bool(b) => Value::Bool(*b),
        Literal::String(s) => Value::String(s.clone()),
        Literal::Number(n) => {
            if n.fract() == 0.0 && n.abs() < 9e15 {
                Value::Int(*n as i64)
            } else {
                Value::Float(*n)
            }
        }
    }
}

/// Evaluates one scalar's parsed template (`SPEC_FULL.md` §4.6.4): verbatim
/// text is concatenated with the stringified result of each expression. A
/// free expression (the whole scalar was `$Expr`) returns the raw value,
/// unstringified.
pub fn evaluate_scalar(ctx: &mut ResolveContext<'_>, document: &Document, template: &ScalarTemplate) -> Value {
    if template.free_expr {
        let Some(TemplatePart::Expr(node)) = template.parts.first() else {
            return Value::Undefined;
        };
        return evaluate_expr(ctx, document, node);
    }

    let mut out = String::new();
    for part in &template.parts {
        match part {
            TemplatePart::Literal(s, _) => out.push_str(s),
            TemplatePart::Expr(node) => {
                let value = evaluate_expr(ctx, document, node);
                out.push_str(&value.interpolate_to_string());
            }
        }
    }
    Value::String(out)
}

pub fn evaluate_expr(ctx: &mut ResolveContext<'_>, document: &Document, node: &ExprNode) -> Value {
    let value = match node.base.text.as_str() {
        "this" => eval_this(ctx, document, node),
        "import" => eval_import(ctx, document, node),
        "param" => eval_param(ctx, node),
        "local" => eval_local(ctx, node),
        other => {
            ctx.errors.push(Diagnostic::error(
                ErrorCode::R008,
                node.span,
                format!("invalid expression base `{other}`, expected this|import|param|local"),
            ));
            Value::Undefined
        }
    };

    match &node.type_annotation {
        Some(ty) if !value.matches_type_annotation(&ty.text) => {
            ctx.errors.push(Diagnostic::error(
                ErrorCode::R005,
                ty.span,
                format!("value does not match annotation `as {}`", ty.text),
            ));
            Value::Undefined
        }
        _ => value,
    }
}

fn eval_this(ctx: &mut ResolveContext<'_>, document: &Document, node: &ExprNode) -> Value {
    let Some(root) = document.root else {
        return Value::Undefined;
    };
    if node.path.is_empty() {
        ctx.errors.push(Diagnostic::error(
            ErrorCode::T010,
            node.span,
            "`this` requires at least one path segment",
        ));
        return Value::Undefined;
    }

    let pushed_locals = node.args.as_ref().map(|args| {
        let mut frame = IndexMap::new();
        for arg in args {
            let value = evaluate_scalar(ctx, document, &arg.value);
            frame.insert(arg.key.text.clone(), value);
        }
        frame
    });
    if let Some(frame) = pushed_locals.clone() {
        ctx.locals.push(frame);
    }

    let Some(target) = traverse_ast(document, root, &node.path) else {
        if pushed_locals.is_some() {
            ctx.locals.pop();
        }
        ctx.errors.push(Diagnostic::error(
            ErrorCode::R004,
            node.span,
            "path segment not found in this-traversal",
        ));
        return Value::Undefined;
    };

    let target_order = document.get(target).order_index;
    let result = if target_order > ctx.counter {
        ctx.errors.push(Diagnostic::error(
            ErrorCode::R002,
            node.span,
            "tried to access node before being defined",
        ));
        Value::Undefined
    } else if pushed_locals.is_some() {
        // A this(...) call re-runs the target fresh under the new locals
        // frame, so local.* placeholders inside it see this invocation's
        // arguments rather than whichever values were bound last time.
        resolve_node(ctx, document, target)
    } else {
        ctx.resolved.get(&target).cloned().unwrap_or(Value::Undefined)
    };

    if pushed_locals.is_some() {
        ctx.locals.pop();
    }
    result
}

fn eval_import(ctx: &mut ResolveContext<'_>, document: &Document, node: &ExprNode) -> Value {
    let Some(alias_tok) = node.path.first() else {
        ctx.errors.push(Diagnostic::error(
            ErrorCode::R004,
            node.span,
            "`import` requires an alias path segment",
        ));
        return Value::Undefined;
    };
    let alias = alias_tok.text.clone();
    let Some(import_directive) = ctx.directives.find_import(&alias) else {
        ctx.errors.push(Diagnostic::error(
            ErrorCode::R003,
            alias_tok.span,
            format!("unknown import alias `{alias}`"),
        ));
        return Value::Undefined;
    };

    let mut merged: IndexMap<String, Value> = IndexMap::new();
    for (key, param) in &import_directive.params {
        merged.insert(key.clone(), literal_to_value(&param.value.value));
    }
    if let Some(args) = &node.args {
        for arg in args {
            let value = evaluate_scalar(ctx, document, &arg.value);
            merged.insert(arg.key.text.clone(), value);
        }
    }

    let imported = ctx.host.resolve_import(&alias, merged, node.span, &mut ctx.errors);
    let rest = &node.path[1..];
    match traverse_value(&imported, rest) {
        Some(value) => value,
        None => {
            ctx.errors.push(Diagnostic::error(
                ErrorCode::R004,
                node.span,
                "path segment not found in imported value",
            ));
            Value::Undefined
        }
    }
}

fn eval_param(ctx: &mut ResolveContext<'_>, node: &ExprNode) -> Value {
    let Some(alias_tok) = node.path.first() else {
        ctx.errors.push(Diagnostic::error(
            ErrorCode::R004,
            node.span,
            "`param` requires an alias path segment",
        ));
        return Value::Undefined;
    };
    let alias = &alias_tok.text;
    let Some(directive) = ctx.directives.find_param(alias) else {
        ctx.errors.push(Diagnostic::error(
            ErrorCode::R003,
            alias_tok.span,
            format!("unknown parameter alias `{alias}`"),
        ));
        return Value::Undefined;
    };

    let value = ctx
        .params
        .get(alias)
        .or_else(|| ctx.universal_params.get(alias))
        .cloned()
        .or_else(|| directive.default.as_ref().map(|tok| literal_to_value(&tok.value)))
        .unwrap_or(Value::Undefined);

    let rest = &node.path[1..];
    if rest.is_empty() {
        return value;
    }
    traverse_value(&value, rest).unwrap_or_else(|| {
        ctx.errors.push(Diagnostic::error(
            ErrorCode::R004,
            node.span,
            "path segment not found in parameter value",
        ));
        Value::Undefined
    })
}

fn eval_local(ctx: &mut ResolveContext<'_>, node: &ExprNode) -> Value {
    let Some(alias_tok) = node.path.first() else {
        ctx.errors.push(Diagnostic::error(
            ErrorCode::R004,
            node.span,
            "`local` requires an alias path segment",
        ));
        return Value::Undefined;
    };
    let alias = &alias_tok.text;
    let Some(directive) = ctx.directives.find_local(alias) else {
        ctx.errors.push(Diagnostic::error(
            ErrorCode::R003,
            alias_tok.span,
            format!("unknown local alias `{alias}`"),
        ));
        return Value::Undefined;
    };

    let value = ctx
        .find_local(alias)
        .cloned()
        .or_else(|| directive.default.as_ref().map(|tok| literal_to_value(&tok.value)))
        .unwrap_or(Value::Undefined);

    let rest = &node.path[1..];
    if rest.is_empty() {
        return value;
    }
    traverse_value(&value, rest).unwrap_or_else(|| {
        ctx.errors.push(Diagnostic::error(
            ErrorCode::R004,
            node.span,
            "path segment not found in local value",
        ));
        Value::Undefined
    })
}
