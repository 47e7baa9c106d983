//! Output formatting for CLI search results

use crate::index::{FmIndexReader, SearchMatch};
use roaring::RoaringBitmap;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// One match with surrounding text, ready to print
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchLine {
    pub source: String,
    pub offset: usize,
    pub before: String,
    pub matched: String,
    pub after: String,
}

/// Extract `context` code units on each side of every match, clipped to the
/// match's document
pub fn build_match_lines(
    reader: &FmIndexReader,
    matches: &[SearchMatch],
    keyword_len: usize,
    context: usize,
) -> crate::Result<Vec<MatchLine>> {
    let index = reader.index();
    let mut lines = Vec::with_capacity(matches.len());

    for m in matches {
        let Some(span) = index.document_range(m.doc_id) else {
            continue;
        };
        let match_end = (m.position + keyword_len).min(span.end);
        let before_start = m.position.saturating_sub(context).max(span.start);
        let after_end = match_end.saturating_add(context).min(span.end);

        let before = index.substring(before_start, m.position - before_start)?;
        let matched = index.substring(m.position, match_end - m.position)?;
        let after = if after_end > match_end {
            index.substring(match_end, after_end - match_end)?
        } else {
            String::new()
        };

        lines.push(MatchLine {
            source: reader.source_label(m.doc_id),
            offset: m.offset,
            before: flatten(&before),
            matched: flatten(&matched),
            after: flatten(&after),
        });
    }

    Ok(lines)
}

/// Keep each match on one terminal line
fn flatten(text: &str) -> String {
    text.replace(['\n', '\r'], " ")
}

/// Print matches as `source:offset:context` with the match highlighted
pub fn print_match_lines(lines: &[MatchLine], color: bool) -> io::Result<()> {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);

    for line in lines {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        write!(stdout, "{}", line.source)?;
        stdout.reset()?;
        write!(stdout, ":")?;

        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(stdout, "{}", line.offset)?;
        stdout.reset()?;
        write!(stdout, ":")?;

        write!(stdout, "{}", line.before)?;
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(stdout, "{}", line.matched)?;
        stdout.reset()?;
        writeln!(stdout, "{}", line.after)?;
    }

    Ok(())
}

/// Print only the sources with matches (for --files-with-matches)
pub fn print_files_only(reader: &FmIndexReader, doc_ids: &RoaringBitmap) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    for doc in doc_ids {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        writeln!(stdout, "{}", reader.source_label(doc))?;
        stdout.reset()?;
    }

    Ok(())
}

/// Print match count per source (for --count)
pub fn print_match_counts(reader: &FmIndexReader, matches: &[SearchMatch]) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    let mut counts: Vec<(u32, usize)> = Vec::new();
    for m in matches {
        match counts.last_mut() {
            Some((doc, count)) if *doc == m.doc_id => *count += 1,
            _ => counts.push((m.doc_id, 1)),
        }
    }

    for (doc, count) in counts {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        write!(stdout, "{}", reader.source_label(doc))?;
        stdout.reset()?;
        write!(stdout, ":")?;
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        writeln!(stdout, "{}", count)?;
        stdout.reset()?;
    }

    Ok(())
}
