//! In-memory Dockerfile rewrite.

use super::error::PatchError;
use super::label::{BaseImageUpdate, CpeLabel};
use super::lines::{is_name_key, label_pairs, parse_lines, LineKind};

/// Extra indentation given to a continuation added below a single-line `LABEL`.
const CONTINUATION_INDENT: &str = "      ";

/// Installs `label` into the last label block of `content` and, when `base`
/// is given, repins the watched base image to its digest.
///
/// An existing pair with the same key is replaced in place. Otherwise the
/// label becomes a new continuation line after the block's final line.
///
/// # Errors
///
/// Returns [`PatchError::MissingLabelBlock`] if there is no `LABEL`
/// instruction and [`PatchError::MissingNameKey`] if no label line declares
/// a `name` key.
pub fn patch_dockerfile(
    content: &str,
    label: &CpeLabel,
    base: Option<BaseImageUpdate<'_>>,
) -> Result<String, PatchError> {
    let lines = parse_lines(content);

    if !lines
        .iter()
        .any(|line| matches!(line.kind, LineKind::LabelOpen { .. }))
    {
        return Err(PatchError::MissingLabelBlock);
    }
    if !lines
        .iter()
        .any(|line| label_pairs(line).iter().any(|pair| is_name_key(&pair.key)))
    {
        return Err(PatchError::MissingNameKey);
    }

    let mut output: Vec<String> = Vec::with_capacity(lines.len() + 1);
    let mut replaced = false;
    let mut block_end: Option<(usize, LineKind)> = None;

    for line in &lines {
        if line.kind == LineKind::Plain {
            let eol = line_ending(line.text);
            let rewritten = base
                .filter(|update| update.watch.matches(line.text))
                .and_then(|update| {
                    update
                        .watch
                        .rewrite(line.text.trim_end_matches('\r'), update.digest)
                })
                .map(|rewritten| format!("{rewritten}{eol}"));
            output.push(rewritten.unwrap_or_else(|| line.text.to_string()));
            continue;
        }

        let existing = label_pairs(line)
            .into_iter()
            .find(|pair| pair.key == label.key());
        match existing {
            Some(pair) => {
                replaced = true;
                output.push(format!(
                    "{}{}{}",
                    &line.text[..pair.span.start],
                    label.text(),
                    &line.text[pair.span.end..]
                ));
            }
            None => output.push(line.text.to_string()),
        }

        if line.kind.ends_block() {
            block_end = Some((output.len() - 1, line.kind));
        }
    }

    if !replaced {
        match block_end {
            Some((index, kind)) => {
                let anchor = &output[index];
                let mut indent = leading_whitespace(anchor).to_string();
                if matches!(kind, LineKind::LabelOpen { .. }) {
                    indent.push_str(CONTINUATION_INDENT);
                }
                let eol = line_ending(anchor);
                let continued = format!("{} \\{eol}", anchor.trim_end());
                output[index] = continued;
                output.insert(index + 1, format!("{indent}{label}{eol}"));
            }
            None => {
                let eol = lines.first().map_or("", |line| line_ending(line.text));
                if output.last().is_some_and(String::is_empty) {
                    output.pop();
                }
                output.push(eol.to_string());
                output.push(format!("LABEL {label}{eol}"));
                output.push(String::new());
            }
        }
    }

    Ok(output.join("\n"))
}

/// Returns `"\r"` for lines split out of CRLF content.
fn line_ending(text: &str) -> &'static str {
    if text.ends_with('\r') {
        "\r"
    } else {
        ""
    }
}

fn leading_whitespace(text: &str) -> &str {
    &text[..text.len() - text.trim_start().len()]
}
