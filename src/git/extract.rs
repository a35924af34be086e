use std::io::Read;

use tracing::debug;

use super::error::VdiffError;
use super::reference::Reference;
use super::runner::CommandRunner;

/// Keep every token whose leading part is a commit hash or stash slot, in order.
/// Non-matching tokens are noise (log decorations, messages) and are skipped.
pub fn parse_references<I, S>(tokens: I) -> Vec<Reference>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .filter_map(|token| Reference::parse(token.as_ref()))
        .collect()
}

/// Parse one reference per line of command output.
pub fn parse_output(output: &str) -> Vec<Reference> {
    parse_references(output.lines())
}

/// Parse a free-form string as whitespace separated tokens.
pub fn parse_text(text: &str) -> Vec<Reference> {
    parse_references(text.split_whitespace())
}

fn is_stdin_marker(token: &str) -> bool {
    token == "-" || token == "'-'"
}

/// Replace every `-` marker with the whitespace separated contents of `stdin`.
/// Stdin is drained by the first marker; later markers expand to nothing.
pub fn expand_stdin<R: Read>(args: &[String], stdin: &mut R) -> Result<Vec<String>, VdiffError> {
    let mut expanded = Vec::with_capacity(args.len());
    let mut consumed = false;
    for arg in args {
        if !is_stdin_marker(arg) {
            expanded.push(arg.clone());
            continue;
        }
        if consumed {
            continue;
        }
        let mut buf = String::new();
        stdin.read_to_string(&mut buf).map_err(VdiffError::Stdin)?;
        consumed = true;
        expanded.extend(buf.split_whitespace().map(str::to_string));
    }
    Ok(expanded)
}

/// Resolve the references given on the command line.
///
/// With no arguments at all, `default_listing` is run once and its output
/// parsed instead. Arguments that are present but match nothing yield an
/// empty list without running anything.
pub fn extract<R, C>(
    args: &[String],
    stdin: &mut R,
    runner: &C,
    default_listing: &[String],
) -> Result<Vec<Reference>, VdiffError>
where
    R: Read,
    C: CommandRunner + ?Sized,
{
    if args.is_empty() {
        debug!("no references given, running default listing");
        let output = runner.run(default_listing)?;
        return Ok(parse_output(&output));
    }
    let tokens = expand_stdin(args, stdin)?;
    // A single argument may itself hold several whitespace separated tokens.
    let references: Vec<Reference> = tokens.iter().flat_map(|t| parse_text(t)).collect();
    debug!(
        tokens = tokens.len(),
        references = references.len(),
        "extracted references"
    );
    Ok(references)
}
