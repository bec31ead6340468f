//! Asset-creation draft validation

use anyhow::{Context as _, Result};
use clap::{Args, ValueEnum};
use std::fs;
use std::path::PathBuf;

use market_common::validation::{AssetDraft, WizardStep};

use super::output::{print_json, print_validation, reject};
use super::Context;

/// Wizard step to check
#[derive(Clone, Copy, ValueEnum)]
pub enum StepArg {
    BasicInfo,
    Tokenization,
    Details,
    Review,
}

impl From<StepArg> for WizardStep {
    fn from(step: StepArg) -> Self {
        match step {
            StepArg::BasicInfo => WizardStep::BasicInfo,
            StepArg::Tokenization => WizardStep::Tokenization,
            StepArg::Details => WizardStep::Details,
            StepArg::Review => WizardStep::Review,
        }
    }
}

/// Arguments for the validate-asset command
#[derive(Args)]
pub struct ValidateAssetArgs {
    /// JSON file holding the draft
    pub draft: PathBuf,

    /// Check one step only
    #[arg(long, value_enum)]
    pub step: Option<StepArg>,

    /// Print the contract arguments the draft converts to
    #[arg(long, conflicts_with = "step")]
    pub request: bool,
}

pub fn execute(ctx: &Context, args: ValidateAssetArgs) -> Result<()> {
    let content = fs::read_to_string(&args.draft)
        .with_context(|| format!("failed to read {}", args.draft.display()))?;
    let draft: AssetDraft = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a valid draft", args.draft.display()))?;

    if args.request {
        return match draft.into_request() {
            Ok(request) => print_json(&request),
            Err(result) => reject(ctx.json, "Draft", &result),
        };
    }

    let (label, result) = match args.step {
        Some(step) => {
            let step = WizardStep::from(step);
            (step.to_string(), draft.validate_step(step))
        }
        None => ("Draft".to_string(), draft.validate()),
    };

    if !result.valid {
        return reject(ctx.json, &label, &result);
    }

    if ctx.json {
        return print_json(&result);
    }

    println!("{} is valid", label);
    print_validation(&result);
    Ok(())
}
