//! Manifest splitting and decoding
//!
//! A manifest template holds one or more YAML documents separated by
//! `---` lines. After substitution the text is split and each document is
//! decoded into untyped JSON, which is what the reconciler compares and
//! submits. Typed schemas would buy nothing here: the controller never
//! interprets the objects beyond identity and revision.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::error::{RenderError, RenderResult};
use crate::template::substitute;

/// Separator between documents in a rendered manifest.
pub const DOCUMENT_SEPARATOR: &str = "\n---";

/// One decoded manifest document.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedObject {
    value: Value,
}

impl RenderedObject {
    /// Wrap an already-decoded document.
    pub fn from_value(value: Value) -> Self {
        Self { value }
    }

    /// `apiVersion` field, or `""` when absent.
    pub fn api_version(&self) -> &str {
        self.str_field(&["apiVersion"])
    }

    /// `kind` field, or `""` when absent.
    pub fn kind(&self) -> &str {
        self.str_field(&["kind"])
    }

    /// `metadata.name`, or `""` when absent.
    pub fn name(&self) -> &str {
        self.str_field(&["metadata", "name"])
    }

    /// `metadata.namespace`, or `""` when absent.
    pub fn namespace(&self) -> &str {
        self.str_field(&["metadata", "namespace"])
    }

    /// `metadata.resourceVersion`, if the object carries one.
    pub fn resource_version(&self) -> Option<&str> {
        self.value.get("metadata")?.get("resourceVersion")?.as_str()
    }

    /// Copy an observed revision onto this object so the cluster accepts
    /// it as an update of the stored version.
    pub fn set_resource_version(&mut self, version: &str) {
        if let Some(root) = self.value.as_object_mut() {
            let metadata = root
                .entry("metadata")
                .or_insert_with(|| Value::Object(Default::default()));
            if let Value::Object(metadata) = metadata {
                metadata.insert(
                    "resourceVersion".to_string(),
                    Value::String(version.to_string()),
                );
            }
        }
    }

    /// Identity of this object within the cluster.
    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef {
            api_version: self.api_version().to_string(),
            kind: self.kind().to_string(),
            namespace: self.namespace().to_string(),
            name: self.name().to_string(),
        }
    }

    /// Borrow the underlying JSON document.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Consume the wrapper, yielding the JSON document.
    pub fn into_value(self) -> Value {
        self.value
    }

    fn str_field(&self, path: &[&str]) -> &str {
        let mut current = &self.value;
        for key in path {
            match current.get(key) {
                Some(next) => current = next,
                None => return "",
            }
        }
        current.as_str().unwrap_or("")
    }
}

/// Identity of a cluster object: API version, kind, namespace, and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    /// `apiVersion` of the object.
    pub api_version: String,
    /// `kind` of the object.
    pub kind: String,
    /// Namespace the object lives in.
    pub namespace: String,
    /// Object name.
    pub name: String,
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} {}/{}",
            self.api_version, self.kind, self.namespace, self.name
        )
    }
}

/// Render a manifest template into its constituent objects.
///
/// Substitution runs over the template as a whole, then the output is
/// split on [`DOCUMENT_SEPARATOR`]. Blank documents and documents that
/// decode to null (separator runs, comment-only segments) are skipped.
pub fn render_manifest(
    template: &str,
    values: &BTreeMap<&'static str, String>,
) -> RenderResult<Vec<RenderedObject>> {
    let rendered = substitute(template, values)?;
    let mut objects = Vec::new();
    for (index, document) in rendered.split(DOCUMENT_SEPARATOR).enumerate() {
        if document.trim().is_empty() {
            continue;
        }
        let value: Value = serde_yaml::from_str(document)
            .map_err(|source| RenderError::Decode { index, source })?;
        if value.is_null() {
            continue;
        }
        objects.push(RenderedObject::from_value(value));
    }
    Ok(objects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TWO_DOC_TEMPLATE: &str = "\
apiVersion: apps/v1
kind: Deployment
metadata:
  name: {{ service_prefix }}-tsyncd
  namespace: {{ namespace }}
---
apiVersion: v1
kind: Service
metadata:
  name: {{ service_prefix }}-tsyncd
  namespace: {{ namespace }}
";

    fn values() -> BTreeMap<&'static str, String> {
        let mut values = BTreeMap::new();
        values.insert("service_prefix", "sts-1".to_string());
        values.insert("namespace", "timing".to_string());
        values
    }

    #[test]
    fn test_splits_into_documents() {
        let objects = render_manifest(TWO_DOC_TEMPLATE, &values()).unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].kind(), "Deployment");
        assert_eq!(objects[1].kind(), "Service");
        assert_eq!(objects[0].name(), "sts-1-tsyncd");
        assert_eq!(objects[1].namespace(), "timing");
    }

    #[test]
    fn test_skips_blank_and_null_documents() {
        let template = "---\n\n---\nkind: Service\n---\n# trailing comment\n";
        let objects = render_manifest(template, &BTreeMap::new()).unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].kind(), "Service");
    }

    #[test]
    fn test_decode_error_carries_document_index() {
        let template = "kind: Service\n---\nkind: [unclosed\n";
        let err = render_manifest(template, &BTreeMap::new()).unwrap_err();
        match err {
            RenderError::Decode { index, .. } => assert_eq!(index, 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_accessors_default_to_empty() {
        let object = RenderedObject::from_value(json!({"spec": {}}));
        assert_eq!(object.api_version(), "");
        assert_eq!(object.kind(), "");
        assert_eq!(object.name(), "");
        assert_eq!(object.namespace(), "");
        assert_eq!(object.resource_version(), None);
    }

    #[test]
    fn test_set_resource_version_creates_metadata() {
        let mut object = RenderedObject::from_value(json!({"kind": "Service"}));
        object.set_resource_version("41");
        assert_eq!(object.resource_version(), Some("41"));

        object.set_resource_version("42");
        assert_eq!(object.resource_version(), Some("42"));
    }

    #[test]
    fn test_object_ref_display() {
        let object = RenderedObject::from_value(json!({
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": {"name": "sts-1-tsyncd", "namespace": "timing"},
        }));
        assert_eq!(
            object.object_ref().to_string(),
            "apps/v1/Deployment timing/sts-1-tsyncd"
        );
    }
}
