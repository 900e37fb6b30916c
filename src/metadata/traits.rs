use crate::metadata::control::ControlStanza;
use crate::metadata::MetadataError;

/// Control data for one unit, decoupled from where it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitMetadata {
    pub name: String,
    stanza: ControlStanza,
}

impl UnitMetadata {
    pub fn new(name: impl Into<String>, stanza: ControlStanza) -> Self {
        Self {
            name: name.into(),
            stanza,
        }
    }

    pub fn field(&self, field: &str) -> Option<&str> {
        self.stanza.get(field).filter(|value| !value.is_empty())
    }

    pub fn version(&self) -> Option<&str> {
        self.field("Version")
    }

    /// `Source: foo (1.2-3)` splits into `("foo", Some("1.2-3"))`.
    pub fn source(&self) -> Option<(&str, Option<&str>)> {
        let raw = self.field("Source")?.trim();
        let name = raw.split_whitespace().next()?;
        let version = raw
            .split_once('(')
            .and_then(|(_, rest)| rest.split_once(')'))
            .map(|(version, _)| version.trim())
            .filter(|version| !version.is_empty());
        Some((name, version))
    }

    /// Joins the given dependency fields into one comma-separated expression.
    pub fn dependency_expression(&self, fields: &[String]) -> String {
        fields
            .iter()
            .filter_map(|field| self.field(field))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub trait MetadataProvider: Send + Sync {
    fn id(&self) -> &'static str;
    fn lookup(&self, unit: &str) -> Result<UnitMetadata, MetadataError>;
}

impl<P: MetadataProvider + ?Sized> MetadataProvider for Box<P> {
    fn id(&self) -> &'static str {
        (**self).id()
    }

    fn lookup(&self, unit: &str) -> Result<UnitMetadata, MetadataError> {
        (**self).lookup(unit)
    }
}

#[cfg(test)]
mod tests {
    use crate::metadata::control::parse_first_stanza;
    use crate::metadata::traits::UnitMetadata;

    fn metadata(content: &str) -> UnitMetadata {
        let stanza = parse_first_stanza(content)
            .expect("parse")
            .expect("one stanza");
        UnitMetadata::new("unit", stanza)
    }

    #[test]
    fn source_field_splits_embedded_version() {
        let meta = metadata("Package: libfoo1\nSource: foo (1.2-3)\n");
        assert_eq!(meta.source(), Some(("foo", Some("1.2-3"))));

        let meta = metadata("Package: libfoo1\nSource: foo\n");
        assert_eq!(meta.source(), Some(("foo", None)));

        let meta = metadata("Package: libfoo1\n");
        assert_eq!(meta.source(), None);
    }

    #[test]
    fn dependency_expression_joins_requested_fields_in_order() {
        let meta = metadata("Package: a\nPre-Depends: dpkg\nDepends: b, c\nRecommends: d\n");
        let fields = vec!["Pre-Depends".to_string(), "Depends".to_string()];
        assert_eq!(meta.dependency_expression(&fields), "dpkg, b, c");
        assert_eq!(meta.dependency_expression(&["Suggests".to_string()]), "");
    }

    #[test]
    fn empty_fields_read_as_absent() {
        let meta = metadata("Package: a\nVersion:\n");
        assert_eq!(meta.version(), None);
    }
}
