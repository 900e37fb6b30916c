//! Parser for deb822 control data, the `Field: value` stanza format printed
//! by `apt-cache show` and used by `Packages` index files.

use crate::metadata::MetadataError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlStanza {
    fields: Vec<(String, String)>,
}

impl ControlStanza {
    /// Field names compare case-insensitively.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(field))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn push(&mut self, name: &str, value: &str) {
        self.fields.push((name.to_string(), value.to_string()));
    }

    fn append_continuation(&mut self, line: &str) -> bool {
        match self.fields.last_mut() {
            Some((_, value)) => {
                if !value.is_empty() {
                    value.push('\n');
                }
                value.push_str(line.trim());
                true
            }
            None => false,
        }
    }
}

pub fn parse_stanzas(content: &str) -> Result<Vec<ControlStanza>, MetadataError> {
    let mut stanzas = Vec::new();
    let mut current = ControlStanza::default();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            if !current.is_empty() {
                stanzas.push(std::mem::take(&mut current));
            }
            continue;
        }
        if line.starts_with('#') {
            continue;
        }
        if line.starts_with(' ') || line.starts_with('\t') {
            if !current.append_continuation(line) {
                return Err(MetadataError::Parse {
                    line: line_no,
                    reason: "continuation line before any field".to_string(),
                });
            }
            continue;
        }
        let (name, value) = line.split_once(':').ok_or_else(|| MetadataError::Parse {
            line: line_no,
            reason: format!("expected 'Field: value', found '{}'", line.trim()),
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(MetadataError::Parse {
                line: line_no,
                reason: "empty field name".to_string(),
            });
        }
        current.push(name, value.trim());
    }

    if !current.is_empty() {
        stanzas.push(current);
    }
    Ok(stanzas)
}

pub fn parse_first_stanza(content: &str) -> Result<Option<ControlStanza>, MetadataError> {
    Ok(parse_stanzas(content)?.into_iter().next())
}
