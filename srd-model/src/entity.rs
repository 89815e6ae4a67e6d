use crate::{EffectSound, RegionSound};
use serde::Serialize;
use srd_types::{FormId, FormType, ReferenceField};
use std::collections::BTreeMap;

/// A form held by [`MemoryRegistry`](crate::MemoryRegistry).
#[derive(Debug, Clone, Serialize)]
pub struct Form {
    pub id: FormId,
    pub form_type: FormType,
    /// Plugin that defines the form. `None` for runtime-generated forms.
    pub file: Option<String>,
    pub local_id: u32,
    pub editor_id: Option<String>,
    pub references: BTreeMap<ReferenceField, FormId>,
    /// Region sound data block. Only regions carry one, and not all of them.
    pub region_sounds: Option<Vec<RegionSound>>,
    pub effect_sounds: Vec<EffectSound>,
}

impl Form {
    pub(crate) fn new(
        id: FormId,
        form_type: FormType,
        file: Option<String>,
        local_id: u32,
        editor_id: Option<String>,
    ) -> Self {
        Self {
            id,
            form_type,
            file,
            local_id,
            editor_id,
            references: BTreeMap::new(),
            region_sounds: None,
            effect_sounds: Vec::new(),
        }
    }

    /// Identifier of this form as shown in diagnostics.
    pub fn identifier(&self) -> String {
        format_identifier(self.editor_id.as_deref(), self.file.as_deref(), self.local_id)
    }
}

/// Formats a form for humans.
///
/// Prefers the editor ID when it is longer than one character, then
/// `<file>|<HEX>`, then `Generated|<HEX>` for forms without an origin plugin.
pub fn format_identifier(editor_id: Option<&str>, file: Option<&str>, local_id: u32) -> String {
    match (editor_id, file) {
        (Some(editor_id), _) if editor_id.len() > 1 => editor_id.to_string(),
        (_, Some(file)) => format!("{}|{:X}", file, local_id),
        _ => format!("Generated|{:X}", local_id),
    }
}
