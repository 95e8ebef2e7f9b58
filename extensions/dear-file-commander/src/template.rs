use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::shell;

/// A `%` macro recognized in command templates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Macro {
    /// `%%`: a literal percent sign.
    Percent,
    /// `%P`: the working directory.
    WorkingDir,
    /// `%C`: the current file.
    Current,
    /// `%X`: the current file without its last suffix.
    CurrentStem,
    /// `%T`: all marked files.
    Marked,
    /// `%XT`: all marked files, suffixes stripped.
    MarkedStems,
    /// `%M`: one marked file per command.
    Each,
    /// `%XM`: one marked file per command, suffix stripped.
    EachStem,
}

impl Macro {
    /// Whether this macro makes the template run once per marked file.
    pub fn repeats(self) -> bool {
        matches!(self, Macro::Each | Macro::EachStem)
    }
}

const MACROS: &[(&str, Macro)] = &[
    ("%%", Macro::Percent),
    ("%P", Macro::WorkingDir),
    ("%C", Macro::Current),
    ("%X", Macro::CurrentStem),
    ("%T", Macro::Marked),
    ("%XT", Macro::MarkedStems),
    ("%M", Macro::Each),
    ("%XM", Macro::EachStem),
];

/// Longest macro spelled at the start of `input`.
fn match_macro(input: &str) -> Option<(Macro, usize)> {
    MACROS
        .iter()
        .filter(|(spelling, _)| input.starts_with(spelling))
        .max_by_key(|(spelling, _)| spelling.len())
        .map(|(spelling, m)| (*m, spelling.len()))
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Text(String),
    Macro(Macro),
}

/// Parsed command template.
///
/// Unknown `%` sequences are kept literally.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandTemplate {
    source: String,
    tokens: Vec<Token>,
}

impl CommandTemplate {
    /// Tokenize a template string.
    pub fn parse(source: &str) -> Self {
        let mut tokens = Vec::new();
        let mut text = String::new();
        let mut rest = source;
        while let Some(pos) = rest.find('%') {
            text.push_str(&rest[..pos]);
            rest = &rest[pos..];
            match match_macro(rest) {
                Some((m, len)) => {
                    if !text.is_empty() {
                        tokens.push(Token::Text(std::mem::take(&mut text)));
                    }
                    tokens.push(Token::Macro(m));
                    rest = &rest[len..];
                }
                None => {
                    text.push('%');
                    rest = &rest[1..];
                }
            }
        }
        text.push_str(rest);
        if !text.is_empty() {
            tokens.push(Token::Text(text));
        }
        Self {
            source: source.to_string(),
            tokens,
        }
    }

    /// The original template string.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Macros in template order.
    pub fn macros(&self) -> impl Iterator<Item = Macro> + '_ {
        self.tokens.iter().filter_map(|t| match t {
            Token::Macro(m) => Some(*m),
            Token::Text(_) => None,
        })
    }

    /// Whether `%M`/`%XM` appear, i.e. one command per marked file.
    pub fn is_repeating(&self) -> bool {
        self.macros().any(Macro::repeats)
    }

    /// Expand into literal shell commands.
    ///
    /// A repeating template yields one command per marked file, in mark
    /// order, and nothing when no file is marked.
    pub fn expand(&self, ctx: &ExpandContext<'_>) -> Vec<String> {
        let commands: Vec<String> = if self.is_repeating() {
            ctx.marked
                .iter()
                .map(|file| self.render(ctx, Some(file.as_path())))
                .collect()
        } else {
            vec![self.render(ctx, None)]
        };
        trace_template_expanded(&self.source, commands.len());
        commands
    }

    fn render(&self, ctx: &ExpandContext<'_>, each: Option<&Path>) -> String {
        let mut out = String::with_capacity(self.source.len());
        for token in &self.tokens {
            match token {
                Token::Text(text) => out.push_str(text),
                Token::Macro(Macro::Percent) => out.push('%'),
                Token::Macro(Macro::WorkingDir) => {
                    out.push_str(&shell::quote(&ctx.working_dir.to_string_lossy()));
                }
                Token::Macro(Macro::Current) => {
                    if let Some(current) = ctx.current {
                        out.push_str(&shell::quote(&ctx.relative(current)));
                    }
                }
                Token::Macro(Macro::CurrentStem) => {
                    if let Some(current) = ctx.current {
                        out.push_str(&shell::quote(strip_suffix(&ctx.relative(current))));
                    }
                }
                Token::Macro(Macro::Marked) => {
                    let rel: Vec<Cow<'_, str>> = ctx.marked.iter().map(|p| ctx.relative(p)).collect();
                    out.push_str(&shell::quote_join(rel.iter().map(|r| &**r)));
                }
                Token::Macro(Macro::MarkedStems) => {
                    let rel: Vec<Cow<'_, str>> = ctx.marked.iter().map(|p| ctx.relative(p)).collect();
                    out.push_str(&shell::quote_join(rel.iter().map(|r| strip_suffix(r))));
                }
                Token::Macro(Macro::Each) => {
                    if let Some(file) = each {
                        out.push_str(&shell::quote(&ctx.relative(file)));
                    }
                }
                Token::Macro(Macro::EachStem) => {
                    if let Some(file) = each {
                        out.push_str(&shell::quote(strip_suffix(&ctx.relative(file))));
                    }
                }
            }
        }
        out
    }
}

impl fmt::Display for CommandTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// File context a template expands against.
#[derive(Clone, Copy, Debug)]
pub struct ExpandContext<'a> {
    /// Directory the commands run in; `%C`/`%M`/`%T` paths are made relative to it.
    pub working_dir: &'a Path,
    /// File under the cursor.
    pub current: Option<&'a Path>,
    /// Marked files in mark order.
    pub marked: &'a [PathBuf],
}

impl<'a> ExpandContext<'a> {
    /// Context with only a working directory.
    pub fn new(working_dir: &'a Path) -> Self {
        Self {
            working_dir,
            current: None,
            marked: &[],
        }
    }

    /// Set the current file.
    pub fn current(mut self, current: &'a Path) -> Self {
        self.current = Some(current);
        self
    }

    /// Set the marked files.
    pub fn marked(mut self, marked: &'a [PathBuf]) -> Self {
        self.marked = marked;
        self
    }

    fn relative<'p>(&self, path: &'p Path) -> Cow<'p, str> {
        match path.strip_prefix(self.working_dir) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel.to_string_lossy(),
            _ => path.to_string_lossy(),
        }
    }
}

/// Drop the last `.suffix` of the final path component. A leading dot does
/// not start a suffix.
fn strip_suffix(path: &str) -> &str {
    let name_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[name_start..].rfind('.') {
        Some(dot) if dot > 0 => &path[..name_start + dot],
        _ => path,
    }
}

/// Parse and expand `template` in one step.
pub fn expand(template: &str, ctx: &ExpandContext<'_>) -> Vec<String> {
    CommandTemplate::parse(template).expand(ctx)
}

#[cfg(feature = "tracing")]
fn trace_template_expanded(template: &str, commands: usize) {
    tracing::debug!(
        event = "template.expanded",
        template,
        commands,
        "command template expanded"
    );
}

#[cfg(not(feature = "tracing"))]
fn trace_template_expanded(_template: &str, _commands: usize) {}
