// src/formatting.rs - Formatting flags and hierarchy levels carried by runs

use serde::{Deserialize, Serialize};

/// Mutually-exclusive structural level of a run. `Body` is plain text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hierarchy {
    #[default]
    Body,
    Title,
    Heading,
    Subheading,
}

/// A single formatting switch as requested by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    Bold,
    Italic,
    Subscript,
    Superscript,
    Hierarchy(Hierarchy),
}

impl std::str::FromStr for FormatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bold" => Ok(FormatKind::Bold),
            "italic" => Ok(FormatKind::Italic),
            // "lowerscript" is the wire name subscript goes by in snapshots
            "subscript" | "lowerscript" => Ok(FormatKind::Subscript),
            "superscript" => Ok(FormatKind::Superscript),
            "body" => Ok(FormatKind::Hierarchy(Hierarchy::Body)),
            "title" => Ok(FormatKind::Hierarchy(Hierarchy::Title)),
            "heading" => Ok(FormatKind::Hierarchy(Hierarchy::Heading)),
            "subheading" => Ok(FormatKind::Hierarchy(Hierarchy::Subheading)),
            other => Err(format!("unknown formatting kind: {}", other)),
        }
    }
}

/// The full formatting state of a run: independent boolean toggles plus the
/// hierarchy level. Subscript and superscript are mutually exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Formatting {
    pub bold: bool,
    pub italic: bool,
    pub subscript: bool,
    pub superscript: bool,
    pub hierarchy: Hierarchy,
}

impl Formatting {
    /// Apply a formatting switch. Booleans flip; setting subscript clears
    /// superscript and vice versa; a hierarchy value replaces the current one.
    pub fn toggle(&mut self, kind: FormatKind) {
        match kind {
            FormatKind::Bold => self.bold = !self.bold,
            FormatKind::Italic => self.italic = !self.italic,
            FormatKind::Subscript => {
                self.subscript = !self.subscript;
                if self.subscript {
                    self.superscript = false;
                }
            }
            FormatKind::Superscript => {
                self.superscript = !self.superscript;
                if self.superscript {
                    self.subscript = false;
                }
            }
            FormatKind::Hierarchy(level) => self.hierarchy = level,
        }
    }
}
