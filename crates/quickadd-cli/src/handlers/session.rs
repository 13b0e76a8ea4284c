use anyhow::{anyhow, bail};
use quickadd_domain::{
    Field, FieldUpdate, FieldValue, ParsedResult, Provenance, TaskDraft, TokenKind,
};
use quickadd_session::QuickAddSession;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Read;

use crate::cli::SessionArgs;
use crate::context::CliContext;
use crate::output;

/// One line of a session script.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ScriptCommand {
    /// Type text at the caret, one keystroke per char.
    Type(String),
    /// Delete chars before the caret, one keystroke each.
    Backspace(usize),
    /// Replace the whole input.
    Set(String),
    Clear,
    /// Manual edit through the field's own control; no value clears it.
    Edit(Field, Option<String>),
    Disable(TokenKind),
    Enable(TokenKind),
    Nlp(bool),
    Reset,
}

fn parse_line(line: &str) -> anyhow::Result<Option<ScriptCommand>> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let (verb, rest) = match trimmed.split_once(' ') {
        Some((verb, rest)) => (verb, rest),
        None => (trimmed, ""),
    };
    let argument = rest.trim();

    let command = match verb.to_lowercase().as_str() {
        "type" => ScriptCommand::Type(rest.to_string()),
        "set" => ScriptCommand::Set(rest.to_string()),
        "backspace" => match argument {
            "" => ScriptCommand::Backspace(1),
            count => ScriptCommand::Backspace(
                count
                    .parse()
                    .map_err(|_| anyhow!("backspace expects a count, got '{}'", count))?,
            ),
        },
        "clear" => ScriptCommand::Clear,
        "edit" => {
            let (field, value) = match argument.split_once(' ') {
                Some((field, value)) => (field, Some(value.trim().to_string())),
                None => (argument, None),
            };
            if field.is_empty() {
                bail!("edit needs a field");
            }
            ScriptCommand::Edit(field.parse()?, value.filter(|v| !v.is_empty()))
        }
        "disable" => ScriptCommand::Disable(argument.parse()?),
        "enable" => ScriptCommand::Enable(argument.parse()?),
        "nlp" => match argument.to_lowercase().as_str() {
            "on" | "true" => ScriptCommand::Nlp(true),
            "off" | "false" => ScriptCommand::Nlp(false),
            other => bail!("nlp expects on or off, got '{}'", other),
        },
        "reset" => ScriptCommand::Reset,
        other => bail!("unknown command '{}'", other),
    };
    Ok(Some(command))
}

#[derive(Serialize)]
struct Step {
    line: usize,
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    updates: Vec<FieldUpdate>,
}

#[derive(Serialize)]
struct SessionOutput {
    draft: TaskDraft,
    provenance: BTreeMap<Field, Provenance>,
    nlp_enabled: bool,
    steps: Vec<Step>,
}

pub async fn handle(ctx: CliContext, args: SessionArgs) -> anyhow::Result<()> {
    let script = match &args.script {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| anyhow!("cannot read script {}: {}", path.display(), e))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let mut session = QuickAddSession::new(
        ctx.clock.clone(),
        ctx.directory.clone(),
        ctx.config.clone(),
    );
    let mut draft = TaskDraft::new();
    let mut steps = Vec::new();

    for (index, line) in script.lines().enumerate() {
        let line_no = index + 1;
        let command = match parse_line(line).map_err(|e| anyhow!("line {}: {}", line_no, e))? {
            Some(command) => command,
            None => continue,
        };
        tracing::debug!(line = line_no, ?command, "script command");

        let mut title = None;
        let mut updates = match command {
            ScriptCommand::Type(text) => {
                for c in text.chars() {
                    session.insert_text(c.encode_utf8(&mut [0; 4]));
                }
                Vec::new()
            }
            ScriptCommand::Backspace(count) => {
                for _ in 0..count {
                    session.backspace();
                }
                Vec::new()
            }
            ScriptCommand::Set(text) => {
                session.set_text(&text);
                Vec::new()
            }
            ScriptCommand::Clear => {
                session.clear_text();
                Vec::new()
            }
            ScriptCommand::Edit(field, value) => {
                let value = value
                    .map(|v| {
                        FieldValue::from_input(field, &v, ctx.clock.now(), session.directory())
                    })
                    .transpose()
                    .map_err(|e| anyhow!("line {}: {}", line_no, e))?;
                draft.set_manual(field, value)?;
                session.notify_manual_edit(field);
                Vec::new()
            }
            ScriptCommand::Disable(kind) => {
                let updates = session.disable_kind(kind);
                title = Some(title_for(&session, &session.parse_input()));
                updates
            }
            ScriptCommand::Enable(kind) => {
                let updates = session.enable_kind(kind);
                title = Some(title_for(&session, &session.parse_input()));
                updates
            }
            ScriptCommand::Nlp(enabled) => {
                let updates = session.set_nlp_enabled(enabled);
                title = Some(title_for(&session, &session.parse_input()));
                updates
            }
            ScriptCommand::Reset => {
                session.reset_session();
                draft = TaskDraft::new();
                Vec::new()
            }
        };

        while let Some((result, batch)) = session.next_updates().await {
            title = Some(title_for(&session, &result));
            updates.extend(batch);
        }

        draft.apply_all(&updates);
        if let Some(title) = &title {
            draft.title = title.clone();
        }
        steps.push(Step {
            line: line_no,
            command: line.trim().to_string(),
            title,
            updates,
        });
    }

    let provenance = Field::ALL
        .into_iter()
        .map(|field| (field, session.engine().provenance(field)))
        .collect();
    let nlp_enabled = session.is_nlp_enabled();
    session.close();

    output::output_success(SessionOutput {
        draft,
        provenance,
        nlp_enabled,
        steps,
    });
    Ok(())
}

/// With parsing off the title is the text as typed.
fn title_for(session: &QuickAddSession, result: &ParsedResult) -> String {
    if session.is_nlp_enabled() {
        result.title.clone()
    } else {
        result.original_text.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_commands() {
        assert_eq!(
            parse_line("type Buy milk #").unwrap(),
            Some(ScriptCommand::Type("Buy milk #".to_string()))
        );
        assert_eq!(
            parse_line("set Call mom p1").unwrap(),
            Some(ScriptCommand::Set("Call mom p1".to_string()))
        );
        assert_eq!(parse_line("clear").unwrap(), Some(ScriptCommand::Clear));
        assert_eq!(parse_line("backspace").unwrap(), Some(ScriptCommand::Backspace(1)));
        assert_eq!(parse_line("backspace 3").unwrap(), Some(ScriptCommand::Backspace(3)));
        assert_eq!(
            parse_line("edit priority 2").unwrap(),
            Some(ScriptCommand::Edit(Field::Priority, Some("2".to_string())))
        );
        assert_eq!(
            parse_line("edit due-date").unwrap(),
            Some(ScriptCommand::Edit(Field::DueDate, None))
        );
        assert_eq!(
            parse_line("disable priority").unwrap(),
            Some(ScriptCommand::Disable(TokenKind::Priority))
        );
        assert_eq!(parse_line("nlp off").unwrap(), Some(ScriptCommand::Nlp(false)));
        assert_eq!(parse_line("RESET").unwrap(), Some(ScriptCommand::Reset));
    }

    #[test]
    fn test_parse_line_skips_blank_and_comments() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("# set up the draft").unwrap(), None);
    }

    #[test]
    fn test_parse_line_errors() {
        assert!(parse_line("jump").is_err());
        assert!(parse_line("edit").is_err());
        assert!(parse_line("edit colour red").is_err());
        assert!(parse_line("disable everything").is_err());
        assert!(parse_line("nlp maybe").is_err());
        assert!(parse_line("backspace lots").is_err());
    }
}
