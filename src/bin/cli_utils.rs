use blockscan::normalize::{find_exact_match, fold_case};
use std::io::{self, IsTerminal, Write};
use std::ops::Range;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Pick a color mode for stdout
///
/// Colors only when stdout is a terminal; `ColorChoice::Auto` also honors
/// `NO_COLOR` and `TERM=dumb`.
pub fn color_choice(no_color: bool) -> ColorChoice {
    if no_color || !io::stdout().is_terminal() {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    }
}

pub fn stdout(no_color: bool) -> StandardStream {
    StandardStream::stdout(color_choice(no_color))
}

pub fn write_colored<W: WriteColor>(out: &mut W, color: Color, text: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{}", text)?;
    out.reset()
}

/// Write `line` with the whole-word occurrence of `phrase` highlighted
///
/// When the phrase only matches after whitespace normalization, or its
/// folded range cannot be mapped back onto `line`, the whole line is
/// highlighted instead.
pub fn write_highlighted<W: WriteColor>(out: &mut W, line: &str, phrase: &str) -> io::Result<()> {
    match highlight_range(line, phrase) {
        Some(range) => {
            write!(out, "{}", &line[..range.start])?;
            write_colored(out, Color::Red, &line[range.clone()])?;
            writeln!(out, "{}", &line[range.end..])
        }
        None => {
            write_colored(out, Color::Red, line)?;
            writeln!(out)
        }
    }
}

/// Byte range in `line` of the whole-word occurrence of `phrase`
///
/// The line is folded one character at a time so every folded offset can be
/// mapped back to the character it came from. Folds that change byte length
/// (`İ` grows, `ẞ` shrinks) shift everything after them.
fn highlight_range(line: &str, phrase: &str) -> Option<Range<usize>> {
    // (folded offset, original offset) at every character start, plus the end
    let mut offsets = Vec::with_capacity(line.len() + 1);
    let mut folded = String::with_capacity(line.len());
    for (i, c) in line.char_indices() {
        offsets.push((folded.len(), i));
        folded.extend(c.to_lowercase());
    }
    offsets.push((folded.len(), line.len()));

    // find_exact_match folds again; its range is only ours if that is a no-op
    if fold_case(&folded).len() != folded.len() {
        return None;
    }
    let range = find_exact_match(&folded, phrase)?;

    let to_original = |pos: usize| {
        offsets
            .binary_search_by_key(&pos, |&(folded_at, _)| folded_at)
            .ok()
            .map(|i| offsets[i].1)
    };
    Some(to_original(range.start)?..to_original(range.end)?)
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Format a duration in milliseconds with two decimals
pub fn format_ms(d: std::time::Duration) -> String {
    format!("{:.2}", d.as_secs_f64() * 1000.0)
}

/// File name part of a path for display
pub fn display_name(source: &str) -> &str {
    std::path::Path::new(source)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(source)
}
