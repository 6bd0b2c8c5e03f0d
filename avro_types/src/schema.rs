/* Schema graph
 *
 * A Schema is a counted handle to an immutable node. Compound nodes own
 * their children through ordinary handles; recursion is only expressed
 * through link nodes, which hold a weak reference to a named schema. The
 * strong edges therefore always form a DAG. */

use crate::errors::{SchemaError, SchemaResult};
use crate::refcount::RefCount;
use indexmap::{IndexMap, IndexSet};
use once_cell::sync::{Lazy, OnceCell};
use std::fmt;
use std::sync::{Arc, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
    Record,
    Enum,
    Array,
    Map,
    Fixed,
    Union,
    Link,
}

impl SchemaType {
    pub fn name(self) -> &'static str {
        match self {
            SchemaType::Null => "null",
            SchemaType::Boolean => "boolean",
            SchemaType::Int => "int",
            SchemaType::Long => "long",
            SchemaType::Float => "float",
            SchemaType::Double => "double",
            SchemaType::Bytes => "bytes",
            SchemaType::String => "string",
            SchemaType::Record => "record",
            SchemaType::Enum => "enum",
            SchemaType::Array => "array",
            SchemaType::Map => "map",
            SchemaType::Fixed => "fixed",
            SchemaType::Union => "union",
            SchemaType::Link => "link",
        }
    }

    /* Primitive type for a bare type name, if it is one */
    pub fn primitive_from_name(name: &str) -> Option<SchemaType> {
        match name {
            "null" => Some(SchemaType::Null),
            "boolean" => Some(SchemaType::Boolean),
            "int" => Some(SchemaType::Int),
            "long" => Some(SchemaType::Long),
            "float" => Some(SchemaType::Float),
            "double" => Some(SchemaType::Double),
            "bytes" => Some(SchemaType::Bytes),
            "string" => Some(SchemaType::String),
            _ => None,
        }
    }

    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            SchemaType::Null
                | SchemaType::Boolean
                | SchemaType::Int
                | SchemaType::Long
                | SchemaType::Float
                | SchemaType::Double
                | SchemaType::Bytes
                | SchemaType::String
        )
    }

    pub fn is_named(self) -> bool {
        matches!(self, SchemaType::Record | SchemaType::Enum | SchemaType::Fixed)
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/* Node identity, stable for as long as any handle to the node is alive */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(usize);

pub struct Schema {
    node: Arc<SchemaNode>,
}

struct SchemaNode {
    refcount: RefCount,
    kind: SchemaKind,
}

enum SchemaKind {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
    Record(RecordSchema),
    Enum(EnumSchema),
    Array(Schema),
    Map(Schema),
    Fixed(FixedSchema),
    Union(Vec<Schema>),
    Link(LinkSchema),
}

struct RecordSchema {
    name: String,
    namespace: Option<String>,
    fields: IndexMap<String, Schema>,
}

struct EnumSchema {
    name: String,
    namespace: Option<String>,
    symbols: IndexSet<String>,
}

struct FixedSchema {
    name: String,
    namespace: Option<String>,
    size: usize,
}

struct LinkSchema {
    name: String,
    target: OnceCell<Weak<SchemaNode>>,
}

static NULL: Lazy<Schema> = Lazy::new(|| Schema::immortal(SchemaKind::Null));
static BOOLEAN: Lazy<Schema> = Lazy::new(|| Schema::immortal(SchemaKind::Boolean));
static INT: Lazy<Schema> = Lazy::new(|| Schema::immortal(SchemaKind::Int));
static LONG: Lazy<Schema> = Lazy::new(|| Schema::immortal(SchemaKind::Long));
static FLOAT: Lazy<Schema> = Lazy::new(|| Schema::immortal(SchemaKind::Float));
static DOUBLE: Lazy<Schema> = Lazy::new(|| Schema::immortal(SchemaKind::Double));
static BYTES: Lazy<Schema> = Lazy::new(|| Schema::immortal(SchemaKind::Bytes));
static STRING: Lazy<Schema> = Lazy::new(|| Schema::immortal(SchemaKind::String));

pub fn validate_name(name: &str) -> SchemaResult<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(SchemaError::InvalidName {
            name: name.to_string(),
        })
    }
}

impl Schema {
    fn immortal(kind: SchemaKind) -> Schema {
        Schema {
            node: Arc::new(SchemaNode {
                refcount: RefCount::immortal(),
                kind,
            }),
        }
    }

    fn from_kind(kind: SchemaKind) -> Schema {
        Schema {
            node: Arc::new(SchemaNode {
                refcount: RefCount::new(),
                kind,
            }),
        }
    }

    /* Adopt a node reached through a weak edge as a new counted handle */
    fn from_node(node: Arc<SchemaNode>) -> Schema {
        node.refcount.inc();
        Schema { node }
    }

    /* ------------------------------------------------------------------
       Constructors
       ------------------------------------------------------------------ */

    pub fn null() -> Schema {
        NULL.clone()
    }

    pub fn boolean() -> Schema {
        BOOLEAN.clone()
    }

    pub fn int() -> Schema {
        INT.clone()
    }

    pub fn long() -> Schema {
        LONG.clone()
    }

    pub fn float() -> Schema {
        FLOAT.clone()
    }

    pub fn double() -> Schema {
        DOUBLE.clone()
    }

    pub fn bytes() -> Schema {
        BYTES.clone()
    }

    pub fn string() -> Schema {
        STRING.clone()
    }

    /* Shared primitive schema for a primitive type; None for compound types */
    pub fn primitive(schema_type: SchemaType) -> Option<Schema> {
        match schema_type {
            SchemaType::Null => Some(Schema::null()),
            SchemaType::Boolean => Some(Schema::boolean()),
            SchemaType::Int => Some(Schema::int()),
            SchemaType::Long => Some(Schema::long()),
            SchemaType::Float => Some(Schema::float()),
            SchemaType::Double => Some(Schema::double()),
            SchemaType::Bytes => Some(Schema::bytes()),
            SchemaType::String => Some(Schema::string()),
            _ => None,
        }
    }

    pub fn array(items: Schema) -> Schema {
        Schema::from_kind(SchemaKind::Array(items))
    }

    pub fn map(values: Schema) -> Schema {
        Schema::from_kind(SchemaKind::Map(values))
    }

    pub fn union(branches: Vec<Schema>) -> SchemaResult<Schema> {
        if branches.is_empty() {
            return Err(SchemaError::EmptyUnion);
        }
        let mut seen = IndexSet::new();
        for branch in &branches {
            if branch.schema_type() == SchemaType::Union {
                return Err(SchemaError::NestedUnion);
            }
            if !seen.insert(branch.type_name().to_string()) {
                return Err(SchemaError::DuplicateUnionBranch {
                    type_name: branch.type_name().to_string(),
                });
            }
        }
        Ok(Schema::from_kind(SchemaKind::Union(branches)))
    }

    pub fn enumeration<S: Into<String>>(name: &str, symbols: Vec<S>) -> SchemaResult<Schema> {
        Schema::enumeration_in(name, None, symbols)
    }

    pub fn enumeration_in<S: Into<String>>(
        name: &str,
        namespace: Option<&str>,
        symbols: Vec<S>,
    ) -> SchemaResult<Schema> {
        validate_name(name)?;
        let mut set = IndexSet::with_capacity(symbols.len());
        for symbol in symbols {
            let symbol = symbol.into();
            validate_name(&symbol)?;
            if set.contains(&symbol) {
                return Err(SchemaError::DuplicateSymbol {
                    name: name.to_string(),
                    symbol,
                });
            }
            set.insert(symbol);
        }
        if set.is_empty() {
            return Err(SchemaError::EmptyEnum {
                name: name.to_string(),
            });
        }
        Ok(Schema::from_kind(SchemaKind::Enum(EnumSchema {
            name: name.to_string(),
            namespace: namespace.map(str::to_string),
            symbols: set,
        })))
    }

    pub fn fixed(name: &str, size: usize) -> SchemaResult<Schema> {
        Schema::fixed_in(name, None, size)
    }

    pub fn fixed_in(name: &str, namespace: Option<&str>, size: usize) -> SchemaResult<Schema> {
        validate_name(name)?;
        Ok(Schema::from_kind(SchemaKind::Fixed(FixedSchema {
            name: name.to_string(),
            namespace: namespace.map(str::to_string),
            size,
        })))
    }

    /* An unbound link to the named type `name`; see `bind_link` */
    pub fn link(name: &str) -> Schema {
        Schema::from_kind(SchemaKind::Link(LinkSchema {
            name: name.to_string(),
            target: OnceCell::new(),
        }))
    }

    /* Point a link at its target. The link keeps only a weak reference, so
     * the target must be kept alive by some other handle. */
    pub fn bind_link(&self, target: &Schema) -> SchemaResult<()> {
        let link = match &self.node.kind {
            SchemaKind::Link(link) => link,
            _ => {
                return Err(SchemaError::LinkTargetMismatch {
                    name: self.type_name().to_string(),
                    actual: self.schema_type().to_string(),
                })
            }
        };
        if !target.schema_type().is_named() || target.name() != Some(link.name.as_str()) {
            return Err(SchemaError::LinkTargetMismatch {
                name: link.name.clone(),
                actual: target.type_name().to_string(),
            });
        }
        link.target
            .set(Arc::downgrade(&target.node))
            .map_err(|_| SchemaError::LinkAlreadyBound {
                name: link.name.clone(),
            })
    }

    /* ------------------------------------------------------------------
       Accessors
       ------------------------------------------------------------------ */

    pub fn schema_type(&self) -> SchemaType {
        match &self.node.kind {
            SchemaKind::Null => SchemaType::Null,
            SchemaKind::Boolean => SchemaType::Boolean,
            SchemaKind::Int => SchemaType::Int,
            SchemaKind::Long => SchemaType::Long,
            SchemaKind::Float => SchemaType::Float,
            SchemaKind::Double => SchemaType::Double,
            SchemaKind::Bytes => SchemaType::Bytes,
            SchemaKind::String => SchemaType::String,
            SchemaKind::Record(_) => SchemaType::Record,
            SchemaKind::Enum(_) => SchemaType::Enum,
            SchemaKind::Array(_) => SchemaType::Array,
            SchemaKind::Map(_) => SchemaType::Map,
            SchemaKind::Fixed(_) => SchemaType::Fixed,
            SchemaKind::Union(_) => SchemaType::Union,
            SchemaKind::Link(_) => SchemaType::Link,
        }
    }

    /* Declared name for named types and links, the type keyword otherwise */
    pub fn type_name(&self) -> &str {
        match self.name() {
            Some(name) => name,
            None => self.schema_type().name(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match &self.node.kind {
            SchemaKind::Record(r) => Some(&r.name),
            SchemaKind::Enum(e) => Some(&e.name),
            SchemaKind::Fixed(f) => Some(&f.name),
            SchemaKind::Link(l) => Some(&l.name),
            _ => None,
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        match &self.node.kind {
            SchemaKind::Record(r) => r.namespace.as_deref(),
            SchemaKind::Enum(e) => e.namespace.as_deref(),
            SchemaKind::Fixed(f) => f.namespace.as_deref(),
            _ => None,
        }
    }

    pub fn full_name(&self) -> Option<String> {
        let name = self.name()?;
        Some(match self.namespace() {
            Some(ns) => format!("{}.{}", ns, name),
            None => name.to_string(),
        })
    }

    pub fn record_size(&self) -> usize {
        match &self.node.kind {
            SchemaKind::Record(r) => r.fields.len(),
            _ => 0,
        }
    }

    pub fn record_field(&self, index: usize) -> Option<&Schema> {
        match &self.node.kind {
            SchemaKind::Record(r) => r.fields.get_index(index).map(|(_, s)| s),
            _ => None,
        }
    }

    pub fn record_field_name(&self, index: usize) -> Option<&str> {
        match &self.node.kind {
            SchemaKind::Record(r) => r.fields.get_index(index).map(|(n, _)| n.as_str()),
            _ => None,
        }
    }

    pub fn record_field_by_name(&self, name: &str) -> Option<&Schema> {
        match &self.node.kind {
            SchemaKind::Record(r) => r.fields.get(name),
            _ => None,
        }
    }

    pub fn record_field_index(&self, name: &str) -> Option<usize> {
        match &self.node.kind {
            SchemaKind::Record(r) => r.fields.get_index_of(name),
            _ => None,
        }
    }

    pub fn array_items(&self) -> Option<&Schema> {
        match &self.node.kind {
            SchemaKind::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn map_values(&self) -> Option<&Schema> {
        match &self.node.kind {
            SchemaKind::Map(values) => Some(values),
            _ => None,
        }
    }

    pub fn union_size(&self) -> usize {
        match &self.node.kind {
            SchemaKind::Union(branches) => branches.len(),
            _ => 0,
        }
    }

    pub fn union_branch(&self, index: usize) -> Option<&Schema> {
        match &self.node.kind {
            SchemaKind::Union(branches) => branches.get(index),
            _ => None,
        }
    }

    pub fn enum_size(&self) -> usize {
        match &self.node.kind {
            SchemaKind::Enum(e) => e.symbols.len(),
            _ => 0,
        }
    }

    pub fn enum_symbol(&self, index: usize) -> Option<&str> {
        match &self.node.kind {
            SchemaKind::Enum(e) => e.symbols.get_index(index).map(String::as_str),
            _ => None,
        }
    }

    pub fn enum_symbol_index(&self, symbol: &str) -> Option<usize> {
        match &self.node.kind {
            SchemaKind::Enum(e) => e.symbols.get_index_of(symbol),
            _ => None,
        }
    }

    pub fn fixed_size(&self) -> Option<usize> {
        match &self.node.kind {
            SchemaKind::Fixed(f) => Some(f.size),
            _ => None,
        }
    }

    /* Target of a link, while the target is alive */
    pub fn link_target(&self) -> Option<Schema> {
        match &self.node.kind {
            SchemaKind::Link(link) => link
                .target
                .get()
                .and_then(Weak::upgrade)
                .map(Schema::from_node),
            _ => None,
        }
    }

    /* Follow links until a concrete schema is reached */
    pub fn resolve_link(&self) -> SchemaResult<Schema> {
        let mut current = self.clone();
        while let SchemaKind::Link(link) = &current.node.kind {
            let next = current.link_target().ok_or_else(|| SchemaError::UnboundLink {
                name: link.name.clone(),
            })?;
            current = next;
        }
        Ok(current)
    }

    pub fn ref_count(&self) -> u32 {
        self.node.refcount.get()
    }

    pub fn is_immortal(&self) -> bool {
        self.node.refcount.is_immortal()
    }

    pub fn id(&self) -> SchemaId {
        SchemaId(Arc::as_ptr(&self.node) as usize)
    }

    pub fn ptr_eq(&self, other: &Schema) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }
}

impl Clone for Schema {
    fn clone(&self) -> Self {
        self.node.refcount.inc();
        Schema {
            node: Arc::clone(&self.node),
        }
    }
}

impl Drop for Schema {
    fn drop(&mut self) {
        self.node.refcount.dec();
    }
}

/* Structural equality. Links compare by name, so cyclic graphs terminate. */
impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        match (&self.node.kind, &other.node.kind) {
            (SchemaKind::Record(a), SchemaKind::Record(b)) => {
                a.name == b.name
                    && a.namespace == b.namespace
                    && a.fields.len() == b.fields.len()
                    && a.fields
                        .iter()
                        .zip(b.fields.iter())
                        .all(|((na, sa), (nb, sb))| na == nb && sa == sb)
            }
            (SchemaKind::Enum(a), SchemaKind::Enum(b)) => {
                a.name == b.name && a.namespace == b.namespace && a.symbols == b.symbols
            }
            (SchemaKind::Fixed(a), SchemaKind::Fixed(b)) => {
                a.name == b.name && a.namespace == b.namespace && a.size == b.size
            }
            (SchemaKind::Array(a), SchemaKind::Array(b)) => a == b,
            (SchemaKind::Map(a), SchemaKind::Map(b)) => a == b,
            (SchemaKind::Union(a), SchemaKind::Union(b)) => a == b,
            (SchemaKind::Link(a), SchemaKind::Link(b)) => a.name == b.name,
            (a, b) => a.is_primitive() && std::mem::discriminant(a) == std::mem::discriminant(b),
        }
    }
}

impl SchemaKind {
    fn is_primitive(&self) -> bool {
        matches!(
            self,
            SchemaKind::Null
                | SchemaKind::Boolean
                | SchemaKind::Int
                | SchemaKind::Long
                | SchemaKind::Float
                | SchemaKind::Double
                | SchemaKind::Bytes
                | SchemaKind::String
        )
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node.kind {
            SchemaKind::Record(r) => f
                .debug_struct("Record")
                .field("name", &r.name)
                .field("fields", &r.fields)
                .finish(),
            SchemaKind::Enum(e) => f
                .debug_struct("Enum")
                .field("name", &e.name)
                .field("symbols", &e.symbols)
                .finish(),
            SchemaKind::Fixed(x) => f
                .debug_struct("Fixed")
                .field("name", &x.name)
                .field("size", &x.size)
                .finish(),
            SchemaKind::Array(items) => f.debug_tuple("Array").field(items).finish(),
            SchemaKind::Map(values) => f.debug_tuple("Map").field(values).finish(),
            SchemaKind::Union(branches) => f.debug_tuple("Union").field(branches).finish(),
            SchemaKind::Link(l) => write!(f, "Link({})", l.name),
            _ => f.write_str(self.type_name()),
        }
    }
}

/* ============================================================================
   Record construction
   ============================================================================ */

/* Builds a record schema. Fields may refer back to the record under
 * construction through `link_to_self`; the links are bound in `build`. */
pub struct RecordBuilder {
    name: String,
    namespace: Option<String>,
    fields: IndexMap<String, Schema>,
    self_links: Vec<Schema>,
}

impl RecordBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            namespace: None,
            fields: IndexMap::new(),
            self_links: Vec::new(),
        }
    }

    pub fn namespace(&mut self, namespace: &str) -> &mut Self {
        self.namespace = Some(namespace.to_string());
        self
    }

    pub fn field(&mut self, name: &str, schema: Schema) -> SchemaResult<&mut Self> {
        validate_name(name)?;
        if self.fields.contains_key(name) {
            return Err(SchemaError::DuplicateField {
                record: self.name.clone(),
                field: name.to_string(),
            });
        }
        self.fields.insert(name.to_string(), schema);
        Ok(self)
    }

    /* A link that will point at this record once it is built */
    pub fn link_to_self(&mut self) -> Schema {
        let link = Schema::link(&self.name);
        self.self_links.push(link.clone());
        link
    }

    pub fn build(self) -> SchemaResult<Schema> {
        validate_name(&self.name)?;
        let record = Schema::from_kind(SchemaKind::Record(RecordSchema {
            name: self.name,
            namespace: self.namespace,
            fields: self.fields,
        }));
        for link in &self.self_links {
            link.bind_link(&record)?;
        }
        Ok(record)
    }
}
