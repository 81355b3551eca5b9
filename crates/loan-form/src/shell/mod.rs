//! Line-oriented terminal shell driving a [`LoanFormSession`].
//!
//! Each input line is one command. Parsing is separate from execution so the
//! command grammar can be tested without a terminal.

use std::io::{self, Write};

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::domain::ports::{DraftStorage, LoanApplicationGateway};
use crate::domain::{
    FieldName, FieldUpdate, FieldUpdateError, LoanFormSession, ParseFieldNameError,
    SubmissionPhase, SubmitOutcome, SubmitRejection,
};

/// Usage text printed by `help`.
pub const HELP: &str = "\
commands:
  set <field> <value>  change a field
  clear <field>        empty a field
  show                 print the form
  submit               validate and submit
  dismiss              dismiss the current notice
  reset                discard the draft and start over
  help                 print this text
  quit                 save the draft and exit
fields: name phone age employed salaryRange loanAmount loanPurpose repaymentYears comments";

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Change one field.
    Set(FieldUpdate),
    /// Restore one field to its default.
    Clear(FieldName),
    /// Print the form.
    Show,
    /// Validate and submit.
    Submit,
    /// Dismiss the current notice.
    Dismiss,
    /// Discard the draft and restore defaults.
    Reset,
    /// Print usage.
    Help,
    /// Leave the shell.
    Quit,
}

/// Errors raised while parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    /// The first word is not a known command.
    #[error("unknown command {command:?}; type help for a list")]
    UnknownCommand {
        /// The unrecognised word.
        command: String,
    },
    /// A required argument is missing.
    #[error("{command} needs a {argument}")]
    MissingArgument {
        /// Command that was typed.
        command: &'static str,
        /// Name of the missing argument.
        argument: &'static str,
    },
    /// The field name is not recognised.
    #[error(transparent)]
    UnknownField(#[from] ParseFieldNameError),
    /// The value cannot be assigned to the field.
    #[error(transparent)]
    InvalidValue(#[from] FieldUpdateError),
}

/// Parse one input line.
///
/// Blank lines yield `Ok(None)`. For `set`, everything after the field name
/// is the value, with surrounding whitespace removed.
///
/// # Errors
///
/// Returns [`ShellError`] for unknown commands, missing arguments, unknown
/// fields, or unusable values.
///
/// # Examples
/// ```
/// use loan_form::domain::FieldUpdate;
/// use loan_form::shell::{Command, parse_command};
///
/// let command = parse_command("set name Anna Svensson").expect("valid");
/// assert_eq!(
///     command,
///     Some(Command::Set(FieldUpdate::Name("Anna Svensson".to_owned())))
/// );
/// assert_eq!(parse_command("   ").expect("blank"), None);
/// ```
pub fn parse_command(line: &str) -> Result<Option<Command>, ShellError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let (word, rest) = trimmed
        .split_once(char::is_whitespace)
        .map_or((trimmed, ""), |(word, rest)| (word, rest.trim_start()));

    let command = match word.to_lowercase().as_str() {
        "set" => {
            let (field, value) = rest
                .split_once(char::is_whitespace)
                .map_or((rest, ""), |(field, value)| (field, value.trim()));
            let field = required_field("set", field)?;
            Command::Set(FieldUpdate::parse(field, value)?)
        }
        "clear" => Command::Clear(required_field("clear", rest)?),
        "show" => Command::Show,
        "submit" => Command::Submit,
        "dismiss" => Command::Dismiss,
        "reset" => Command::Reset,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => {
            return Err(ShellError::UnknownCommand {
                command: word.to_owned(),
            });
        }
    };
    Ok(Some(command))
}

fn required_field(command: &'static str, raw: &str) -> Result<FieldName, ShellError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ShellError::MissingArgument {
            command,
            argument: "field name",
        });
    }
    Ok(name.parse()?)
}

/// Render the form, its errors, the advisory, and the current notice.
#[must_use]
pub fn render_form<S, G>(session: &LoanFormSession<S, G>) -> String
where
    S: DraftStorage,
    G: LoanApplicationGateway,
{
    let values = session.values();
    let mut lines = Vec::new();
    for field in FieldName::ALL {
        let shown = match field {
            FieldName::Employed => match values.employed {
                Some(true) => "yes",
                Some(false) => "no",
                None => "",
            },
            _ => values.text(field).unwrap_or_default(),
        };
        lines.push(format!("{:<15} {shown}", field.as_str()));
        if let Some(message) = session.errors().get(field) {
            lines.push(format!("{:<15} ! {message}", ""));
        }
        if let (FieldName::SalaryRange, Some(warning)) = (field, session.salary_warning()) {
            lines.push(format!("{:<15} note: {warning}", ""));
        }
    }
    lines.push(render_phase(session.phase(), session.submit_enabled()));
    lines.join("\n")
}

fn render_phase(phase: &SubmissionPhase, submit_enabled: bool) -> String {
    let availability = if submit_enabled {
        "submit enabled"
    } else {
        "submit disabled"
    };
    match phase {
        SubmissionPhase::Success(ack) => format!(
            "Thank you for your application! Reference {}. (dismiss to continue)",
            ack.reference
        ),
        SubmissionPhase::Failed(reason) => format!(
            "Submission failed: {reason}. Your draft was kept; submit to retry or dismiss."
        ),
        other => format!("[{}] {availability}", other.name()),
    }
}

/// Run the shell until `quit` or end of input.
///
/// Initialises the session first and flushes and disposes it on exit.
///
/// # Errors
///
/// Returns any I/O error raised while reading commands or writing output.
pub async fn run_shell<S, G, R, W>(
    mut session: LoanFormSession<S, G>,
    input: R,
    output: &mut W,
) -> io::Result<()>
where
    S: DraftStorage,
    G: LoanApplicationGateway,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    session.on_init();
    writeln!(output, "{}", render_form(&session))?;
    writeln!(output, "type help for commands")?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(error) => {
                debug!(error = %error, "rejected shell input");
                writeln!(output, "error: {error}")?;
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        execute(&mut session, command, output).await?;
        output.flush()?;
    }

    session.on_dispose();
    writeln!(output, "bye")?;
    Ok(())
}

async fn execute<S, G, W>(
    session: &mut LoanFormSession<S, G>,
    command: Command,
    output: &mut W,
) -> io::Result<()>
where
    S: DraftStorage,
    G: LoanApplicationGateway,
    W: Write,
{
    match command {
        Command::Set(update) => {
            session.on_field_changed(update);
            if let Some(warning) = session.salary_warning() {
                writeln!(output, "note: {warning}")?;
            }
            Ok(())
        }
        Command::Clear(field) => {
            session.on_field_changed(FieldUpdate::cleared(field));
            Ok(())
        }
        Command::Show => writeln!(output, "{}", render_form(session)),
        Command::Submit => {
            if session.submit_enabled() {
                writeln!(output, "submitting...")?;
                output.flush()?;
            }
            match session.submit().await {
                Ok(SubmitOutcome::Accepted(_) | SubmitOutcome::Failed(_)) => {
                    writeln!(output, "{}", render_phase(session.phase(), session.submit_enabled()))
                }
                Err(SubmitRejection::Invalid(errors)) => {
                    for (field, message) in errors.iter() {
                        writeln!(output, "{field}: {message}")?;
                    }
                    Ok(())
                }
                Err(rejection @ SubmitRejection::Disabled { .. }) => {
                    writeln!(output, "error: {rejection}")
                }
            }
        }
        Command::Dismiss => match session.dismiss_notice() {
            Ok(()) => writeln!(output, "{}", render_form(session)),
            Err(error) => writeln!(output, "error: {error}"),
        },
        Command::Reset => match session.reset() {
            Ok(()) => writeln!(output, "form reset"),
            Err(error) => writeln!(output, "error: {error}"),
        },
        Command::Help => writeln!(output, "{HELP}"),
        Command::Quit => Ok(()),
    }
}
