use quickadd_domain::{parse_at, suggest, ParsedResult, Suggestion, TokenKind, TokenKindSet};
use serde::Serialize;

use crate::cli::ParseArgs;
use crate::context::CliContext;
use crate::output;

#[derive(Serialize)]
struct CreateCandidate<'a> {
    kind: TokenKind,
    name: &'a str,
}

#[derive(Serialize)]
struct ParseOutput<'a> {
    result: &'a ParsedResult,
    create_candidates: Vec<CreateCandidate<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion: Option<Suggestion>,
}

pub fn handle(ctx: &CliContext, args: ParseArgs) -> anyhow::Result<()> {
    if let Some(caret) = args.caret {
        if caret > args.text.len() || !args.text.is_char_boundary(caret) {
            anyhow::bail!("caret {} is not a position in the text", caret);
        }
    }

    let disabled: TokenKindSet = args.disabled.into_iter().collect();
    let result = parse_at(
        &args.text,
        args.caret,
        ctx.clock.now(),
        &ctx.directory,
        disabled,
    );
    let suggestion = suggest(
        &result,
        &ctx.directory,
        ctx.config.effective_suggestion_limit(),
    );
    let create_candidates = result
        .create_candidates()
        .into_iter()
        .map(|(kind, name)| CreateCandidate { kind, name })
        .collect();

    output::output_success(ParseOutput {
        result: &result,
        create_candidates,
        suggestion,
    });
    Ok(())
}
