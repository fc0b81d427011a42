use terminal_size::{terminal_size, Width};

use crate::constant::FALLBACK_HELP_WIDTH;
use crate::parser::base::Parser;

const INDENT: &str = "    ";
const NAME_DELIMITER: &str = ", ";
const DETAIL_LABEL_WIDTH: usize = "constraint: ".len();

/// Render the full help text: about line, usage line, one row per visible
/// argument with wrapped description, and the per-argument `value:` /
/// `constraint:` detail lines. Accumulated definition errors trail in an
/// `Error:` section.
pub(crate) fn render_help(parser: &Parser) -> String {
    let total_width = parser.width.unwrap_or_else(|| {
        terminal_size().map_or(FALLBACK_HELP_WIDTH, |(Width(w), _)| w as usize)
    });

    let mut out = String::new();
    if !parser.about.is_empty() {
        out.push_str(&parser.about);
        out.push('\n');
    }

    out.push_str(&format!("Usage: {}", parser.program));
    let positionals: Vec<&str> = parser
        .entries
        .iter()
        .filter(|entry| entry.spec.is_positional() && !entry.spec.is_hidden())
        .map(|entry| entry.name.trim_start_matches('-'))
        .collect();
    if !positionals.is_empty() {
        out.push_str(&format!(
            " [POSITIONAL ARGUMENTS: {}]",
            positionals.join(" ")
        ));
    }
    out.push_str(" ...\n");

    let short_width = 2;
    let name_width = parser
        .entries
        .iter()
        .map(|entry| entry.name.len())
        .max()
        .unwrap_or(0)
        + 1;
    let label_width = short_width + NAME_DELIMITER.len() + name_width;
    let text_width = total_width
        .saturating_sub(label_width + DETAIL_LABEL_WIDTH + INDENT.len())
        .max(17);
    let hang = INDENT.len() + label_width + DETAIL_LABEL_WIDTH;

    for entry in &parser.entries {
        if entry.spec.is_hidden() {
            continue;
        }
        let short = match entry.short {
            Some(c) => format!("-{c}{NAME_DELIMITER}"),
            None => " ".repeat(short_width + NAME_DELIMITER.len()),
        };
        out.push_str(INDENT);
        out.push_str(&short);
        out.push_str(&pad_right(&entry.name, name_width));
        let mut description = entry.help.clone();
        if !parser.concise && entry.spec.is_positional() {
            description.push_str(" (positional)");
        }
        for alias in &entry.aliases {
            description.push_str(&format!(" (alias: {alias})"));
        }
        push_wrapped(&mut out, &description, text_width, hang);
        out.push('\n');
        if parser.concise {
            continue;
        }
        let data_desc = entry.spec.data_desc();
        if !data_desc.is_empty() {
            push_detail_label(&mut out, label_width, "value: ");
            push_wrapped(&mut out, &data_desc, text_width, hang);
            out.push('\n');
        }
        if entry.spec.has_constraint() {
            push_detail_label(&mut out, label_width, "constraint: ");
            push_wrapped(&mut out, &entry.spec.constraint_desc(), text_width, hang);
            out.push('\n');
        }
    }

    if !parser.concise && !parser.errors.is_empty() {
        out.push_str("Error:\n");
        for error in &parser.errors {
            out.push_str(&format!("{INDENT}{error}\n"));
        }
    }
    out
}

fn pad_right(text: &str, width: usize) -> String {
    format!("{text}{}", " ".repeat(width.saturating_sub(text.len())))
}

fn push_detail_label(out: &mut String, label_width: usize, label: &str) {
    out.push_str(INDENT);
    out.push_str(&" ".repeat(label_width));
    out.push_str(&" ".repeat(DETAIL_LABEL_WIDTH.saturating_sub(label.len())));
    out.push_str(label);
}

/// Append `text` word-wrapped at `width`, indenting continuation lines by
/// `hang` spaces.
fn push_wrapped(out: &mut String, text: &str, width: usize, hang: usize) {
    let mut line_len = 0usize;
    let mut first = true;
    for word in text.split_whitespace() {
        if first {
            out.push_str(word);
            line_len = word.len();
            first = false;
        } else if line_len + 1 + word.len() <= width {
            out.push(' ');
            out.push_str(word);
            line_len += 1 + word.len();
        } else {
            out.push('\n');
            out.push_str(&" ".repeat(hang));
            out.push_str(word);
            line_len = word.len();
        }
    }
}
