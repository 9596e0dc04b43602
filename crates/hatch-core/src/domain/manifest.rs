//! The generated project's `package.json`.

use serde_json::{Map, Value};

use super::{DomainError, ProjectName, TemplateFragment};

/// File name of the generated manifest.
pub const MANIFEST_FILE: &str = "package.json";

/// Version written into every freshly generated manifest.
pub const INITIAL_VERSION: &str = "0.0.1";

/// Manifest sections a template fragment replaces wholesale.
///
/// Replacement is at map level: keys already present in the project (for
/// example scripts added by an earlier install) are dropped.
pub const MERGED_SECTIONS: &[&str] = &["scripts", "devDependencies"];

/// In-memory view of `package.json`.
///
/// Keys keep their file order so rewriting does not reshuffle the user's file.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedManifest {
    fields: Map<String, Value>,
}

impl GeneratedManifest {
    /// `{ name, version: "0.0.1", private: true }`.
    pub fn initial(name: &ProjectName) -> Self {
        let mut fields = Map::new();
        fields.insert("name".into(), Value::String(name.to_string()));
        fields.insert("version".into(), Value::String(INITIAL_VERSION.into()));
        fields.insert("private".into(), Value::Bool(true));
        Self { fields }
    }

    /// # Errors
    ///
    /// Returns [`DomainError::InvalidManifest`] if `raw` is not a JSON object.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(fields)) => Ok(Self { fields }),
            Ok(other) => Err(DomainError::InvalidManifest(format!(
                "expected an object, found {}",
                json_kind(&other)
            ))),
            Err(e) => Err(DomainError::InvalidManifest(e.to_string())),
        }
    }

    /// Replace every [`MERGED_SECTIONS`] map with the fragment's copy.
    ///
    /// A section the fragment omits becomes an empty map.
    pub fn apply_fragment(&mut self, fragment: &TemplateFragment) {
        let package = &fragment.package;
        for &section in MERGED_SECTIONS {
            let replacement = match section {
                "scripts" => package.scripts.clone(),
                "devDependencies" => package.dev_dependencies.clone(),
                _ => None,
            };
            self.fields
                .insert(section.into(), Value::Object(replacement.unwrap_or_default()));
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Look up `section.key`, e.g. `section("scripts", "build")`.
    pub fn section_entry(&self, section: &str, key: &str) -> Option<&Value> {
        self.fields.get(section)?.as_object()?.get(key)
    }

    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }

    /// Pretty JSON with two-space indentation and a trailing newline.
    pub fn to_json(&self) -> String {
        let mut out = serde_json::to_string_pretty(&self.fields).unwrap_or_else(|_| "{}".into());
        out.push('\n');
        out
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name() -> ProjectName {
        ProjectName::parse("my-ext").unwrap()
    }

    #[test]
    fn initial_manifest_shape() {
        let json = GeneratedManifest::initial(&name()).to_json();
        assert_eq!(
            json,
            "{\n  \"name\": \"my-ext\",\n  \"version\": \"0.0.1\",\n  \"private\": true\n}\n"
        );
    }

    #[test]
    fn fragment_replaces_whole_maps() {
        let mut m = GeneratedManifest::parse(
            r#"{"name":"x","scripts":{"old":"gone"},"dependencies":{"jsonwebtoken":"9.0.0"}}"#,
        )
        .unwrap();
        let fragment =
            TemplateFragment::from_json(r#"{"package":{"scripts":{"build":"x"}}}"#).unwrap();

        m.apply_fragment(&fragment);

        assert_eq!(m.section_entry("scripts", "build"), Some(&Value::from("x")));
        assert!(m.section_entry("scripts", "old").is_none());
        assert_eq!(m.get("devDependencies"), Some(&Value::Object(Map::new())));
        // Installed dependencies are left to the installer.
        assert!(m.section_entry("dependencies", "jsonwebtoken").is_some());
    }

    #[test]
    fn key_order_is_preserved() {
        let m = GeneratedManifest::parse(r#"{"z":1,"a":2,"m":3}"#).unwrap();
        let json = m.to_json();
        let (z, a, m_) = (
            json.find("\"z\"").unwrap(),
            json.find("\"a\"").unwrap(),
            json.find("\"m\"").unwrap(),
        );
        assert!(z < a && a < m_);
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(matches!(
            GeneratedManifest::parse("[]"),
            Err(DomainError::InvalidManifest(msg)) if msg.contains("array")
        ));
        assert!(GeneratedManifest::parse("{not json").is_err());
    }
}
