//! Build File Patcher
//!
//! Line-oriented edits applied to the Android project generated from the SDL
//! skeleton:
//! - commenting out one exact line (`CMakeLists.txt`)
//! - commenting or uncommenting a brace-delimited section (`build.gradle`)
//!
//! Line terminators are preserved, so untouched lines stay byte-identical.
//!
//! Sections end at the first line starting with `}` after the marker. A nested
//! block whose closing brace sits on its own line therefore ends the section
//! early; the rest of the outer block is left alone.
//!
//! Uncommenting opens at the first comment line whose text starts with the
//! marker, so a remark such as `// ndkBuild is legacy` above the section is
//! uncommented too and the section runs from there to the next `}`.

use std::path::Path;
use tracing::{debug, info};

use crate::error::{ForgeError, Result};

/// Line comment syntax of the file being patched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `#` (CMake, properties, shell)
    Hash,
    /// `//` (Gradle, Kotlin, C)
    DoubleSlash,
}

impl CommentStyle {
    pub fn marker(&self) -> &'static str {
        match self {
            CommentStyle::Hash => "#",
            CommentStyle::DoubleSlash => "//",
        }
    }

    fn comment(&self, line: &str) -> String {
        format!("{} {}", self.marker(), line)
    }

    /// Remove one leading comment layer, keeping indentation
    fn uncomment(&self, line: &str) -> String {
        let body = line.trim_start();
        let indent = &line[..line.len() - body.len()];

        match body.strip_prefix(self.marker()) {
            Some(rest) => {
                let rest = rest.strip_prefix(' ').unwrap_or(rest);
                format!("{}{}", indent, rest)
            }
            None => line.to_string(),
        }
    }
}

/// Direction of a section toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionAction {
    /// Disable the section by commenting every line of it
    Comment,
    /// Enable a previously commented section
    Uncomment,
}

/// Scanner state while toggling a section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionState {
    Idle,
    Commenting,
    Uncommenting,
}

/// Split a raw line into its content and terminator
fn split_terminator(raw: &str) -> (&str, &str) {
    if let Some(body) = raw.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = raw.strip_suffix('\n') {
        (body, "\n")
    } else {
        (raw, "")
    }
}

/// Comment out the first line equal to `target`.
///
/// Returns `None` when no line matches.
pub fn comment_line_in(contents: &str, target: &str, style: CommentStyle) -> Option<String> {
    let mut output = String::with_capacity(contents.len() + 2);
    let mut found = false;

    for raw in contents.split_inclusive('\n') {
        let (line, ending) = split_terminator(raw);
        if !found && line == target {
            output.push_str(&style.comment(line));
            output.push_str(ending);
            found = true;
        } else {
            output.push_str(raw);
        }
    }

    found.then_some(output)
}

/// Comment out the first line of `file` equal to `target`.
///
/// This is a one-shot edit: once applied, the line no longer matches and a
/// second call fails with [`ForgeError::LineNotFound`]. The file is not
/// written when the line is missing.
pub async fn comment_line(file: &Path, target: &str, style: CommentStyle) -> Result<()> {
    let contents = tokio::fs::read_to_string(file).await?;

    let patched = comment_line_in(&contents, target, style).ok_or_else(|| {
        ForgeError::LineNotFound {
            line: target.to_string(),
            file: file.to_path_buf(),
        }
    })?;

    tokio::fs::write(file, patched).await?;
    info!("Commented out \"{}\" in {:?}", target, file);
    Ok(())
}

/// Toggle the section opened by a line starting with `marker`.
///
/// Returns the patched contents and the number of lines changed. A missing
/// section changes nothing.
pub fn toggle_section_in(
    contents: &str,
    marker: &str,
    action: SectionAction,
    style: CommentStyle,
) -> (String, usize) {
    let mut output = String::with_capacity(contents.len());
    let mut state = SectionState::Idle;
    let mut changed = 0;

    for raw in contents.split_inclusive('\n') {
        let (line, ending) = split_terminator(raw);
        let trimmed = line.trim();

        if state == SectionState::Idle {
            let opens = match action {
                SectionAction::Comment => trimmed.starts_with(marker),
                SectionAction::Uncomment => trimmed
                    .strip_prefix(style.marker())
                    .map(|rest| rest.trim().starts_with(marker))
                    .unwrap_or(false),
            };
            if opens {
                state = match action {
                    SectionAction::Comment => SectionState::Commenting,
                    SectionAction::Uncomment => SectionState::Uncommenting,
                };
            }
        }

        let emitted = match state {
            SectionState::Idle => {
                output.push_str(raw);
                continue;
            }
            SectionState::Commenting => style.comment(line),
            SectionState::Uncommenting => style.uncomment(line),
        };

        if emitted != line {
            changed += 1;
        }

        let closes = match state {
            SectionState::Uncommenting => emitted.trim_start().starts_with('}'),
            _ => trimmed.starts_with('}'),
        };
        if closes {
            state = SectionState::Idle;
        }

        output.push_str(&emitted);
        output.push_str(ending);
    }

    (output, changed)
}

/// Toggle a section of `file` in place, returning the number of lines changed
pub async fn toggle_section(
    file: &Path,
    marker: &str,
    action: SectionAction,
    style: CommentStyle,
) -> Result<usize> {
    let contents = tokio::fs::read_to_string(file).await?;
    let (patched, changed) = toggle_section_in(&contents, marker, action, style);

    if changed > 0 {
        tokio::fs::write(file, patched).await?;
    }

    debug!(
        "{:?} section '{}' in {:?}: {} line(s) changed",
        action, marker, file, changed
    );
    Ok(changed)
}
