//! Netscape Bookmark HTML Parser
//!
//! Recovers folder structure from the bookmark export format written by
//! Chrome, Firefox, Edge and Safari. The format is not well-formed: a folder
//! is an `<H3>` inside a `<DT>`, and its contents are the *following sibling*
//! `<DL>` block. Generic HTML tree builders re-nest that markup and flatten
//! exactly the structure we need, so the parser works on a flat token stream
//! and tracks nesting with an explicit folder stack.
//!
//! # Token stream
//!
//! Four tokens are recognised (case-insensitive), everything else is ignored:
//!
//! - `<DL>` - opens a list; no state change (the folder was pushed at its `<H3>`)
//! - `</DL>` - closes the innermost open folder
//! - `<DT><H3 attrs>name</H3>` - opens a folder
//! - `<DT><A attrs>text</A>` - a bookmark
//!
//! # Toolbar folder
//!
//! The `<H3 PERSONAL_TOOLBAR_FOLDER="true">` folder establishes scope but is
//! never a root folder itself. Folders opened directly beneath it are
//! reported in `root_folders`.
//!
//! # Determinism
//!
//! `parse_bookmark_html` is a pure function: identical input yields identical
//! output, including `order` values and error ordering.

use crate::models::{BookmarkRecord, ParseOutcome, MAX_TITLE_LENGTH, MAX_URL_LENGTH};
use regex::{Captures, Regex};
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

/// Maximum number of simultaneously open folders
///
/// Reaching it aborts the walk; bookmarks found so far are still returned.
pub const MAX_FOLDER_DEPTH: usize = 256;

/// Matches the four structural tokens in document order
static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<DL>|</DL>|<DT>\s*<H3([^>]*)>([^<]*)</H3>|<DT>\s*<A([^>]*)>([^<]*)</A>")
        .unwrap()
});

/// Detects whether any list container exists at all
static LIST_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<DL[\s>]").unwrap());

static TOOLBAR_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)PERSONAL_TOOLBAR_FOLDER\s*=\s*["']?true["']?"#).unwrap()
});

static HREF_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)HREF\s*=\s*["']([^"']*)["']"#).unwrap());

/// Entities decoded in folder names and anchor text, applied in this order
const ENTITIES: [(&str, &str); 6] = [
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&nbsp;", " "),
];

/// Non-fatal problems found while parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseIssue {
    /// A folder whose name was empty after decoding and trimming
    EmptyFolderName,
    /// An anchor with a missing or non-http(s) URL (only reported when titled)
    InvalidUrl { title: String },
    /// No `<DL>` container anywhere in the document
    MissingContainer,
    /// Folder nesting hit [`MAX_FOLDER_DEPTH`]; the rest of the input was skipped
    NestingTooDeep { limit: usize },
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseIssue::EmptyFolderName => write!(f, "Skipped a folder with an empty name"),
            ParseIssue::InvalidUrl { title } => {
                write!(f, "Skipped bookmark \"{}\": URL is missing or not http(s)", title)
            }
            ParseIssue::MissingContainer => {
                write!(f, "No bookmark list (<DL>) found in the file")
            }
            ParseIssue::NestingTooDeep { limit } => write!(
                f,
                "Parse error: folder nesting exceeds {} levels, remaining content ignored",
                limit
            ),
        }
    }
}

#[derive(Debug)]
enum Token<'a> {
    ListOpen,
    ListClose,
    Folder { attrs: &'a str, name: &'a str },
    Anchor { attrs: &'a str, text: &'a str },
}

impl<'a> Token<'a> {
    fn from_captures(caps: &Captures<'a>) -> Option<Self> {
        if let (Some(attrs), Some(name)) = (caps.get(1), caps.get(2)) {
            return Some(Token::Folder {
                attrs: attrs.as_str(),
                name: name.as_str(),
            });
        }
        if let (Some(attrs), Some(text)) = (caps.get(3), caps.get(4)) {
            return Some(Token::Anchor {
                attrs: attrs.as_str(),
                text: text.as_str(),
            });
        }
        let tag = caps.get(0)?.as_str();
        if tag.eq_ignore_ascii_case("<DL>") {
            Some(Token::ListOpen)
        } else if tag.eq_ignore_ascii_case("</DL>") {
            Some(Token::ListClose)
        } else {
            None
        }
    }
}

#[derive(Debug)]
struct FolderFrame {
    name: String,
    is_toolbar: bool,
}

/// Walk state: the open-folder stack plus everything emitted so far
#[derive(Default)]
struct ParserState {
    stack: Vec<FolderFrame>,
    inside_toolbar: bool,
    bookmarks: Vec<BookmarkRecord>,
    root_folders: Vec<String>,
    seen_roots: HashSet<String>,
    issues: Vec<ParseIssue>,
    next_order: usize,
}

impl ParserState {
    /// Names of open folders excluding the toolbar, outermost first
    fn effective_folders(&self) -> impl Iterator<Item = &str> {
        self.stack
            .iter()
            .filter(|f| !f.is_toolbar)
            .map(|f| f.name.as_str())
    }

    fn open_folder(&mut self, attrs: &str, raw_name: &str) -> Result<(), ParseIssue> {
        let name = sanitize_text(&decode_html_entities(raw_name));
        if name.is_empty() {
            // Not pushed: the matching </DL> pops the parent instead, so the
            // children end up one level shallower.
            self.issues.push(ParseIssue::EmptyFolderName);
            return Ok(());
        }

        if self.stack.len() >= MAX_FOLDER_DEPTH {
            return Err(ParseIssue::NestingTooDeep {
                limit: MAX_FOLDER_DEPTH,
            });
        }

        let is_toolbar = TOOLBAR_ATTR.is_match(attrs);
        if is_toolbar {
            self.inside_toolbar = true;
        }
        self.stack.push(FolderFrame {
            name: name.clone(),
            is_toolbar,
        });

        let is_root = !is_toolbar && self.inside_toolbar && self.effective_folders().count() == 1;
        if is_root && self.seen_roots.insert(name.clone()) {
            self.root_folders.push(name);
        }
        Ok(())
    }

    fn close_folder(&mut self) {
        // Unbalanced </DL> with nothing open is ignored
        if let Some(popped) = self.stack.pop() {
            if popped.is_toolbar {
                self.inside_toolbar = false;
            }
        }
    }

    fn add_bookmark(&mut self, attrs: &str, raw_text: &str) {
        let title = sanitize_text(&decode_html_entities(raw_text));
        let url = HREF_ATTR
            .captures(attrs)
            .and_then(|c| c.get(1))
            .map(|m| sanitize_url(m.as_str()))
            .unwrap_or_default();

        if url.is_empty() {
            if !title.is_empty() {
                self.issues.push(ParseIssue::InvalidUrl { title });
            }
            return;
        }

        let mut folders = self.effective_folders().map(str::to_string);
        let root_folder = folders.next();
        let folder_path: Vec<String> = folders.collect();

        let order = self.next_order;
        self.next_order += 1;

        self.bookmarks.push(BookmarkRecord {
            title: if title.is_empty() { url.clone() } else { title },
            url,
            root_folder,
            folder_path,
            order,
        });
    }

    fn into_outcome(self) -> ParseOutcome {
        ParseOutcome {
            bookmarks: self.bookmarks,
            root_folders: self.root_folders,
            errors: self.issues.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Parse a bookmark export into a flat, ordered list of bookmarks
///
/// Never fails: malformed markup degrades to best-effort flattening, and
/// every dropped folder or bookmark is reported in `errors`.
///
/// # Examples
///
/// ```rust
/// use navhub_core::import::parse_bookmark_html;
///
/// let html = r#"<DL><p>
///   <DT><H3>A</H3>
///   <DL><p>
///     <DT><A HREF="https://x.test">X</A>
///   </DL><p>
/// </DL>"#;
/// let outcome = parse_bookmark_html(html);
/// assert_eq!(outcome.bookmarks.len(), 1);
/// assert_eq!(outcome.bookmarks[0].root_folder.as_deref(), Some("A"));
/// ```
pub fn parse_bookmark_html(html: &str) -> ParseOutcome {
    let mut state = ParserState::default();

    if !LIST_PATTERN.is_match(html) {
        state.issues.push(ParseIssue::MissingContainer);
        return state.into_outcome();
    }

    for caps in TAG_PATTERN.captures_iter(html) {
        let Some(token) = Token::from_captures(&caps) else {
            continue;
        };

        match token {
            Token::ListOpen => {}
            Token::ListClose => state.close_folder(),
            Token::Folder { attrs, name } => {
                if let Err(issue) = state.open_folder(attrs, name) {
                    tracing::warn!("Bookmark parse aborted early: {}", issue);
                    state.issues.push(issue);
                    break;
                }
            }
            Token::Anchor { attrs, text } => state.add_bookmark(attrs, text),
        }
    }

    tracing::debug!(
        bookmarks = state.bookmarks.len(),
        root_folders = state.root_folders.len(),
        errors = state.issues.len(),
        "Parsed bookmark HTML"
    );

    state.into_outcome()
}

/// Decode the handful of entities browsers emit in export text
pub fn decode_html_entities(text: &str) -> String {
    ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, replacement)| {
            acc.replace(entity, replacement)
        })
}

/// Trim and cap a title or folder name at [`MAX_TITLE_LENGTH`] characters
pub fn sanitize_text(text: &str) -> String {
    text.trim().chars().take(MAX_TITLE_LENGTH).collect()
}

/// Trim and validate a URL; anything but `http://`/`https://` becomes empty
pub fn sanitize_url(url: &str) -> String {
    let trimmed = url.trim();
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return String::new();
    }
    trimmed.chars().take(MAX_URL_LENGTH).collect()
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod parser_test;
