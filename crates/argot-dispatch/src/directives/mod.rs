//! Built-in directives.
//!
//! Directives are bracketed first arguments such as `[parse]`. Each is a
//! middleware step that does nothing unless its directive is present.
//! Unknown directives are left in the token stream for application
//! middleware to inspect.

mod cmdlog;
mod parse;
mod report;
mod suggest;
mod suggest_helper;

use crate::pipeline::{Middleware, Stage};

/// Directive middleware in pipeline order.
pub(crate) fn middleware() -> Vec<Middleware> {
    vec![
        Middleware::new("directive:parse-help", Stage::Tokenize, -100, parse::help_stage),
        Middleware::new(
            "directive:suggest-helper",
            Stage::Tokenize,
            -90,
            suggest_helper::stage,
        ),
        Middleware::new(
            "directive:parse",
            Stage::PostParseInputPreBindValues,
            -300,
            parse::report_stage,
        ),
        Middleware::new(
            "directive:suggest",
            Stage::PostParseInputPreBindValues,
            -200,
            suggest::stage,
        ),
        Middleware::new(
            "directive:cmdlog",
            Stage::PostBindValuesPreInvoke,
            i32::MIN,
            cmdlog::stage,
        ),
    ]
}

/// Names of the directives handled here.
pub const BUILTIN_DIRECTIVES: [&str; 4] = [
    parse::NAME,
    suggest::NAME,
    suggest_helper::NAME,
    cmdlog::NAME,
];
