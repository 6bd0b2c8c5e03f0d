/* Naming rules shared by the schema walk and the renderers */

use avro_types::{Schema, SchemaType};

/* Rust reserved keywords that need to be escaped with r# */
const RUST_KEYWORDS: &[&str] = &[
  "as", "break", "const", "continue", "else", "enum", "extern", "false", "fn", "for", "if", "impl",
  "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "static", "struct",
  "trait", "true", "type", "unsafe", "use", "where", "while", "async", "await", "dyn", "abstract",
  "become", "box", "do", "final", "gen", "macro", "override", "priv", "typeof", "unsized",
  "virtual", "yield", "try",
];

/* Keywords that cannot be raw identifiers */
const RESERVED_PATHS: &[&str] = &["crate", "self", "Self", "super"];

/* Name a schema is declared under in generated output. Primitives use
 * their type name, arrays and maps prefix their element's canonical name,
 * unions join their branch type names, named types use the declared name.
 * Links are named after their target. */
pub fn canonical_name(schema: &Schema) -> String {
  match schema.schema_type() {
    SchemaType::Array => match schema.array_items() {
      Some(items) => format!("array_{}", canonical_name(items)),
      None => "array".to_string(),
    },
    SchemaType::Map => match schema.map_values() {
      Some(values) => format!("map_{}", canonical_name(values)),
      None => "map".to_string(),
    },
    SchemaType::Union => union_name(schema),
    _ => schema.type_name().to_string(),
  }
}

pub fn union_name(schema: &Schema) -> String {
  (0..schema.union_size())
    .filter_map(|i| schema.union_branch(i))
    .map(|branch| branch.type_name())
    .collect::<Vec<_>>()
    .join("_")
}

/* "avro_specific" + "array_person" -> "AvroSpecificArrayPerson". Words
 * written entirely in capitals are lowered after their first letter. */
pub fn camel_case(parts: &[&str]) -> String {
  let mut out = String::new();
  for word in parts.iter().flat_map(|part| part.split(|c: char| !c.is_ascii_alphanumeric())) {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
      continue;
    };
    out.push(first.to_ascii_uppercase());
    let rest = chars.as_str();
    if rest.chars().any(|c| c.is_ascii_lowercase()) {
      out.push_str(rest);
    } else {
      out.push_str(&rest.to_ascii_lowercase());
    }
  }
  if out.starts_with(|c: char| c.is_ascii_digit()) {
    out.insert(0, '_');
  }
  out
}

/* Escape Rust keywords by prefixing with r# */
pub fn field_ident(name: &str) -> String {
  if RESERVED_PATHS.contains(&name) {
    format!("{}_", name)
  } else if RUST_KEYWORDS.contains(&name) {
    format!("r#{}", name)
  } else {
    name.to_string()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn nested_collections_prefix_their_elements() {
    let schema = Schema::array(Schema::map(Schema::string()));
    assert_eq!(canonical_name(&schema), "array_map_string");
  }

  #[test]
  fn unions_join_branch_type_names() {
    let schema = Schema::union(vec![Schema::null(), Schema::long()]).expect("union");
    assert_eq!(canonical_name(&schema), "null_long");
  }

  #[test]
  fn camel_case_words() {
    assert_eq!(camel_case(&["avro_specific", "array_person"]), "AvroSpecificArrayPerson");
    assert_eq!(camel_case(&["", "SPADES"]), "Spades");
    assert_eq!(camel_case(&["my", "httpRequest"]), "MyHttpRequest");
    assert_eq!(camel_case(&["2fa"]), "_2fa");
  }

  #[test]
  fn keywords_are_escaped() {
    assert_eq!(field_ident("type"), "r#type");
    assert_eq!(field_ident("self"), "self_");
    assert_eq!(field_ident("age"), "age");
  }
}
