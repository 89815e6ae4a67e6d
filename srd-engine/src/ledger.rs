//! Conflict ledger: which documents wrote which fields, in order.

use indexmap::IndexMap;
use srd_model::FormRegistry;
use srd_types::FormId;

type FieldHistory = IndexMap<String, Vec<String>>;

/// What a ledger entry is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerKey {
    /// A field directly on a form.
    Form(FormId),
    /// A field on the sub-record of `parent` identified by `child`.
    SubRecord { parent: FormId, child: FormId },
}

impl LedgerKey {
    fn parent(self) -> FormId {
        match self {
            Self::Form(form) => form,
            Self::SubRecord { parent, .. } => parent,
        }
    }
}

/// One field's write history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerEntry<'a> {
    pub key: LedgerKey,
    pub field: &'a str,
    /// Writers, oldest first. The last one is in effect.
    pub documents: &'a [String],
}

#[derive(Debug, Default)]
struct FormHistory {
    fields: FieldHistory,
    sub_records: IndexMap<FormId, FieldHistory>,
}

/// Append-only record of field writes for one batch.
///
/// Forms keep their first-write order, fields theirs. A field only appears
/// once a document actually wrote it.
#[derive(Debug, Default)]
pub struct Ledger {
    forms: IndexMap<FormId, FormHistory>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `document` to the history of `field` under `key`.
    pub fn record(&mut self, key: LedgerKey, field: &str, document: &str) {
        let history = self.forms.entry(key.parent()).or_default();
        let fields = match key {
            LedgerKey::Form(_) => &mut history.fields,
            LedgerKey::SubRecord { child, .. } => history.sub_records.entry(child).or_default(),
        };
        fields
            .entry(field.to_string())
            .or_default()
            .push(document.to_string());
    }

    /// Records every field in `fields` as written by `document`.
    pub fn record_fields<I, S>(&mut self, key: LedgerKey, fields: I, document: &str)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for field in fields {
            self.record(key, field.as_ref(), document);
        }
    }

    /// The writers of a field, oldest first.
    pub fn writers(&self, key: LedgerKey, field: &str) -> Option<&[String]> {
        let history = self.forms.get(&key.parent())?;
        let fields = match key {
            LedgerKey::Form(_) => &history.fields,
            LedgerKey::SubRecord { child, .. } => history.sub_records.get(&child)?,
        };
        fields.get(field).map(Vec::as_slice)
    }

    /// The document whose write of `field` is currently in effect.
    pub fn last_writer(&self, key: LedgerKey, field: &str) -> Option<&str> {
        self.writers(key, field)
            .and_then(<[String]>::last)
            .map(String::as_str)
    }

    /// Every recorded field, grouped by form in insertion order. A form's own
    /// fields come before those of its sub-records.
    ///
    /// The iterator borrows the ledger; call again to restart.
    pub fn dump(&self) -> impl Iterator<Item = LedgerEntry<'_>> + '_ {
        self.forms.iter().flat_map(|(&form, history)| {
            let own = history.fields.iter().map(move |(field, documents)| LedgerEntry {
                key: LedgerKey::Form(form),
                field: field.as_str(),
                documents: documents.as_slice(),
            });
            let nested = history.sub_records.iter().flat_map(move |(&child, fields)| {
                fields.iter().map(move |(field, documents)| LedgerEntry {
                    key: LedgerKey::SubRecord { parent: form, child },
                    field: field.as_str(),
                    documents: documents.as_slice(),
                })
            });
            own.chain(nested)
        })
    }

    /// Fields written by more than one document.
    pub fn contested(&self) -> impl Iterator<Item = LedgerEntry<'_>> + '_ {
        self.dump().filter(|entry| entry.documents.len() > 1)
    }

    /// Number of recorded fields.
    pub fn len(&self) -> usize {
        self.dump().count()
    }

    pub fn is_empty(&self) -> bool {
        self.dump().next().is_none()
    }

    /// Renders the ledger as indented report lines, one form per block.
    ///
    /// ```text
    /// IronSword
    ///     Equip A_SRD.json -> B_SRD.json
    /// FalkreathRegion
    ///     AMBWindLP
    ///         Chance A_SRD.json
    /// ```
    pub fn render(&self, registry: &dyn FormRegistry) -> Vec<String> {
        let mut lines = Vec::new();
        for (&form, history) in &self.forms {
            let nested = history.sub_records.values().any(|fields| !fields.is_empty());
            if history.fields.is_empty() && !nested {
                continue;
            }
            lines.push(registry.describe(form));
            for (field, documents) in &history.fields {
                lines.push(format!("\t{} {}", field, documents.join(" -> ")));
            }
            for (&child, fields) in &history.sub_records {
                if fields.is_empty() {
                    continue;
                }
                lines.push(format!("\t{}", registry.describe(child)));
                for (field, documents) in fields {
                    lines.push(format!("\t\t{} {}", field, documents.join(" -> ")));
                }
            }
        }
        lines
    }
}
