use std::collections::HashMap;

/// Built-in catalogs by id, with a flag marking YAML sources.
pub fn builtin_catalogs() -> HashMap<&'static str, (&'static str, bool)> {
    HashMap::from([
        ("default", (include_str!("../content/catalogs/default.json"), false)),
        ("gentle", (include_str!("../content/catalogs/gentle.yaml"), true)),
    ])
}
