use serde_derive::{Deserialize, Serialize};

/* ============================================================================
   Schema file model
   ============================================================================ */

/* A schema as written in a schema file: a bare type name, a union list, or
 * an object carrying a "type" key */
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum SchemaDef {
    /* Primitive keyword or reference to a previously declared named type */
    Name(String),
    /* Union branches in declaration order */
    Union(Vec<SchemaDef>),
    Complex(ComplexDef),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ComplexDef {
    Record(RecordDef),
    Enum(EnumDef),
    Array {
        items: Box<SchemaDef>,
    },
    Map {
        values: Box<SchemaDef>,
    },
    Fixed(FixedDef),
    /* Primitives spelled in object form, e.g. {"type": "int"} */
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RecordDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    pub fields: Vec<FieldDef>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub schema: SchemaDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    /* Carried through for tooling; not interpreted by the resolver */
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EnumDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    pub symbols: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FixedDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_schema_shape() {
        let json = r#"{
            "type": "record",
            "name": "list",
            "fields": [
                {"name": "value", "type": {"type": "int"}},
                {"name": "tags", "type": {"type": "map", "values": "string"}},
                {"name": "next", "type": ["null", "list"]}
            ]
        }"#;
        let def: SchemaDef = serde_json::from_str(json).expect("parse record");
        let record = match def {
            SchemaDef::Complex(ComplexDef::Record(record)) => record,
            other => panic!("expected record, got {:?}", other),
        };
        assert_eq!(record.name, "list");
        assert_eq!(record.fields.len(), 3);
        assert_eq!(record.fields[0].schema, SchemaDef::Complex(ComplexDef::Int));
        assert_eq!(
            record.fields[2].schema,
            SchemaDef::Union(vec![
                SchemaDef::Name("null".to_string()),
                SchemaDef::Name("list".to_string())
            ])
        );
    }
}
