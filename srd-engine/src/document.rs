//! Override documents: format detection, parsing and the requirement list.

use crate::schema::REQUIREMENTS_KEY;
use crate::{EngineResult, OverrideError};
use serde_json::Value;
use srd_model::FormRegistry;
use std::fmt;
use std::path::Path;

/// On-disk text format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// JSON, with `//` and `/* */` comments allowed.
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Maps a file extension (without the dot) to a format.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "json" | "jsonc" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// Parses document bytes into the generic tree shared by all formats.
pub fn parse_tree(bytes: &[u8], format: DocumentFormat) -> Result<Value, String> {
    match format {
        DocumentFormat::Json => {
            let text = std::str::from_utf8(bytes).map_err(|e| e.to_string())?;
            serde_json::from_str(&strip_json_comments(text)).map_err(|e| e.to_string())
        }
        DocumentFormat::Yaml => serde_yaml::from_slice(bytes).map_err(|e| e.to_string()),
    }
}

/// Removes `//` line comments and `/* */` block comments outside of strings.
///
/// Line breaks are kept so parser error positions still point at the right
/// line; a block comment collapses to a single space.
pub fn strip_json_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek().copied()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut previous = '\0';
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                    }
                    if previous == '*' && next == '/' {
                        break;
                    }
                    previous = next;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }
    out
}

/// One clause of a requirement list: a plugin that must (or, negated with a
/// trailing `!`, must not) be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub plugin: String,
    pub negated: bool,
}

impl Requirement {
    pub fn parse(token: &str) -> Self {
        match token.strip_suffix('!') {
            Some(plugin) => Self {
                plugin: plugin.to_string(),
                negated: true,
            },
            None => Self {
                plugin: token.to_string(),
                negated: false,
            },
        }
    }

    pub fn is_satisfied(&self, registry: &dyn FormRegistry) -> bool {
        registry.is_source_loaded(&self.plugin) != self.negated
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "NOT {}", self.plugin)
        } else {
            f.write_str(&self.plugin)
        }
    }
}

/// A named group of records, still in generic form.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub name: String,
    pub body: Value,
}

/// A parsed override document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// File name; used to attribute writes in the ledger.
    pub name: String,
    pub requirements: Vec<Requirement>,
    /// Sections in document order.
    pub sections: Vec<Section>,
}

impl Document {
    /// Parses raw bytes in the given format.
    pub fn parse(name: &str, bytes: &[u8], format: DocumentFormat) -> EngineResult<Self> {
        let tree = parse_tree(bytes, format).map_err(|message| OverrideError::Parse {
            document: name.to_string(),
            message,
        })?;
        Self::from_tree(name, tree)
    }

    /// Convenience for JSON text.
    pub fn from_json_str(name: &str, json: &str) -> EngineResult<Self> {
        Self::parse(name, json.as_bytes(), DocumentFormat::Json)
    }

    /// Splits a generic tree into the requirement list and sections.
    pub fn from_tree(name: &str, tree: Value) -> EngineResult<Self> {
        let invalid = |message: String| OverrideError::Parse {
            document: name.to_string(),
            message,
        };

        let Value::Object(root) = tree else {
            return Err(invalid("document root must be a mapping".into()));
        };

        let mut requirements = Vec::new();
        let mut sections = Vec::new();
        for (key, body) in root {
            if key != REQUIREMENTS_KEY {
                sections.push(Section { name: key, body });
                continue;
            }
            match body {
                Value::Null => {}
                Value::String(token) => requirements.push(Requirement::parse(&token)),
                Value::Array(tokens) => {
                    for token in tokens {
                        let Value::String(token) = token else {
                            return Err(invalid(format!("{} must contain only plugin names", REQUIREMENTS_KEY)));
                        };
                        requirements.push(Requirement::parse(&token));
                    }
                }
                _ => return Err(invalid(format!("{} must be a plugin name or a list", REQUIREMENTS_KEY))),
            }
        }

        Ok(Self {
            name: name.to_string(),
            requirements,
            sections,
        })
    }

    /// Requirements that do not hold against `registry`.
    pub fn unsatisfied_requirements(&self, registry: &dyn FormRegistry) -> Vec<Requirement> {
        self.requirements
            .iter()
            .filter(|requirement| !requirement.is_satisfied(registry))
            .cloned()
            .collect()
    }
}
