//! Failure message classification

use anyhow::Result;
use clap::Args;

use market_common::error::{classify_failure, ErrorCategory};

use super::output::print_json;
use super::Context;

/// Arguments for the explain-error command
#[derive(Args)]
pub struct ExplainErrorArgs {
    /// Raw message from the wallet, provider or contract
    pub message: String,
}

fn category_name(category: ErrorCategory) -> &'static str {
    match category {
        ErrorCategory::Transient => "transient",
        ErrorCategory::Permanent => "permanent",
        ErrorCategory::Configuration => "configuration",
        ErrorCategory::UserAction => "user_action",
        ErrorCategory::Internal => "internal",
    }
}

pub fn execute(ctx: &Context, args: ExplainErrorArgs) -> Result<()> {
    let kind = classify_failure(&args.message);
    let category = category_name(kind.category());

    if ctx.json {
        return print_json(&serde_json::json!({
            "kind": kind,
            "category": category,
            "message": kind.user_message(),
        }));
    }

    println!("{}", kind.user_message());
    println!("  kind:     {:?}", kind);
    println!("  category: {}", category);
    Ok(())
}
