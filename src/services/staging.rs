use crate::error::{ModuleError, Result};
use globset::{GlobBuilder, GlobMatcher};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Shared directory where exported task files wait to be archived.
#[derive(Debug, Clone)]
pub struct StagingPool {
    root: PathBuf,
}

impl StagingPool {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Expands a shell-style pattern relative to the pool root.
    ///
    /// Follows POSIX `glob` rules: wildcards never cross a path separator,
    /// backslashes and braces are literal, an unclosed `[` is literal, and an
    /// entry whose name starts with a dot only matches a pattern component
    /// that starts with a dot. A missing root yields no matches. Order is
    /// whatever the filesystem returns.
    pub fn find(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let components: Vec<&str> = pattern.split('/').filter(|c| !c.is_empty()).collect();
        let Some(translated) = translate(&components) else {
            tracing::debug!("Pattern '{}' can never match", pattern);
            return Ok(Vec::new());
        };
        let matcher = compile(&translated, pattern)?;
        let depth = components.len().max(1);

        if !self.root.is_dir() {
            tracing::debug!("Staging root {} is not a directory", self.root.display());
            return Ok(Vec::new());
        }

        let mut matches = Vec::new();
        for entry in WalkDir::new(&self.root)
            .min_depth(depth)
            .max_depth(depth)
            .follow_links(false)
        {
            let entry = entry?;
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            if hides_from(relative, &components) {
                continue;
            }
            if matcher.is_match(relative) {
                matches.push(entry.into_path());
            }
        }

        tracing::debug!(
            "Staging pool matched {} file(s) for '{}'",
            matches.len(),
            pattern
        );
        Ok(matches)
    }
}

fn compile(translated: &str, pattern: &str) -> Result<GlobMatcher> {
    GlobBuilder::new(translated)
        .literal_separator(true)
        .backslash_escape(false)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| ModuleError::Pattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// True when a dot-entry sits where its pattern component does not start with a dot.
fn hides_from(relative: &Path, components: &[&str]) -> bool {
    relative
        .components()
        .zip(components)
        .any(|(c, part)| match c {
            Component::Normal(name) => {
                name.to_string_lossy().starts_with('.') && !part.starts_with('.')
            }
            _ => false,
        })
}

/// Rewrites glob components into globset syntax. `None` when a character
/// class is left empty and the pattern can never match.
fn translate(components: &[&str]) -> Option<String> {
    let mut out = String::new();
    for (i, part) in components.iter().enumerate() {
        if i > 0 {
            out.push('/');
        }
        translate_component(part, &mut out)?;
    }
    Some(out)
}

fn translate_component(part: &str, out: &mut String) -> Option<()> {
    let chars: Vec<char> = part.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        i += 1;
        match c {
            '*' | '?' => out.push(c),
            '[' => {
                let mut j = i;
                if chars.get(j) == Some(&'!') {
                    j += 1;
                }
                if chars.get(j) == Some(&']') {
                    j += 1;
                }
                while j < chars.len() && chars[j] != ']' {
                    j += 1;
                }
                if j >= chars.len() {
                    push_literal('[', out);
                } else {
                    push_class(&chars[i..j], out)?;
                    i = j + 1;
                }
            }
            _ => push_literal(c, out),
        }
    }
    Some(())
}

fn push_literal(c: char, out: &mut String) {
    match c {
        '*' | '?' | '[' | ']' | '{' | '}' => {
            out.push('[');
            out.push(c);
            out.push(']');
        }
        _ => out.push(c),
    }
}

fn push_class(body: &[char], out: &mut String) -> Option<()> {
    let (negated, body) = match body.split_first() {
        Some((&'!', rest)) => (true, rest),
        _ => (false, body),
    };

    let mut ranges = Vec::new();
    let mut singles = Vec::new();
    let mut k = 0;
    while k < body.len() {
        if k + 2 < body.len() && body[k + 1] == '-' {
            // Reversed ranges match nothing.
            if body[k] <= body[k + 2] {
                ranges.push((body[k], body[k + 2]));
            }
            k += 3;
        } else {
            singles.push(body[k]);
            k += 1;
        }
    }

    if ranges.is_empty() && singles.is_empty() {
        if negated {
            out.push('?');
            return Some(());
        }
        return None;
    }
    if !negated && ranges.is_empty() && singles.len() == 1 {
        push_literal(singles[0], out);
        return Some(());
    }

    // `]` only reads as a member first, `-` only first or last, `^` never first.
    let close = singles.contains(&']');
    let dash = singles.contains(&'-');
    let caret = singles.contains(&'^');

    out.push('[');
    if negated {
        out.push('!');
    }
    if close {
        out.push(']');
    } else if dash {
        out.push('-');
    }
    for (lo, hi) in &ranges {
        out.push(*lo);
        out.push('-');
        out.push(*hi);
    }
    for c in singles.iter().filter(|c| !matches!(**c, ']' | '-' | '^')) {
        out.push(*c);
    }
    if caret {
        out.push('^');
    }
    if close && dash {
        out.push('-');
    }
    out.push(']');
    Some(())
}
