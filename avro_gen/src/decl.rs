/* Structured output of the schema walk. The definition stream is a
 * direct rendering of this list; the type and implementation streams are
 * derived from it. */

use avro_types::SchemaType;
use std::fmt;

/* Reference from one declaration to another type */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
  Primitive(SchemaType),
  /* canonical name of the items */
  Array(String),
  /* canonical name of the values */
  Map(String),
  Enum(String),
  Fixed(String),
  Record(String),
  /* a record still being declared; the reference closes a cycle */
  Recursive(String),
  Union(String),
}

impl TypeRef {
  /* Canonical name of the referenced type */
  pub fn canonical_name(&self) -> String {
    match self {
      TypeRef::Primitive(t) => t.name().to_string(),
      TypeRef::Array(items) => format!("array_{}", items),
      TypeRef::Map(values) => format!("map_{}", values),
      TypeRef::Enum(name)
      | TypeRef::Fixed(name)
      | TypeRef::Record(name)
      | TypeRef::Recursive(name)
      | TypeRef::Union(name) => name.clone(),
    }
  }

  pub fn is_recursive(&self) -> bool {
    matches!(self, TypeRef::Recursive(_))
  }
}

/* "array, person", "recursive, person", "int, _" */
impl fmt::Display for TypeRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TypeRef::Primitive(t) => write!(f, "{}, _", t.name()),
      TypeRef::Array(items) => write!(f, "array, {}", items),
      TypeRef::Map(values) => write!(f, "map, {}", values),
      TypeRef::Enum(name) => write!(f, "enum, {}", name),
      TypeRef::Fixed(name) => write!(f, "fixed, {}", name),
      TypeRef::Record(name) => write!(f, "record, {}", name),
      TypeRef::Recursive(name) => write!(f, "recursive, {}", name),
      TypeRef::Union(name) => write!(f, "union, {}", name),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
  Array,
  Map,
  Enum,
  Fixed,
  Record,
  Union,
}

impl DeclKind {
  pub fn label(self) -> &'static str {
    match self {
      DeclKind::Array => "array",
      DeclKind::Map => "map",
      DeclKind::Enum => "enum",
      DeclKind::Fixed => "fixed",
      DeclKind::Record => "record",
      DeclKind::Union => "union",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
  pub name: String,
  pub type_ref: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
  /* Arrays and maps are forwarded under their element's canonical name,
   * everything else under its own. */
  Forward { kind: DeclKind, name: String },
  Array { items_name: String, items: TypeRef },
  Map { values_name: String, values: TypeRef },
  Enum { name: String, symbols: Vec<String> },
  Fixed { name: String, size: usize },
  Record { name: String, fields: Vec<FieldDecl> },
  Union { name: String, branches: Vec<TypeRef> },
}

impl Declaration {
  /* Canonical name of the declared type */
  pub fn canonical_name(&self) -> String {
    match self {
      Declaration::Forward { kind: DeclKind::Array, name } | Declaration::Array { items_name: name, .. } => {
        format!("array_{}", name)
      }
      Declaration::Forward { kind: DeclKind::Map, name } | Declaration::Map { values_name: name, .. } => {
        format!("map_{}", name)
      }
      Declaration::Forward { name, .. }
      | Declaration::Enum { name, .. }
      | Declaration::Fixed { name, .. }
      | Declaration::Record { name, .. }
      | Declaration::Union { name, .. } => name.clone(),
    }
  }

  pub fn is_forward(&self) -> bool {
    matches!(self, Declaration::Forward { .. })
  }
}
