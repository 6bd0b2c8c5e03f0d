/* Schema-specific code generator
 *
 * Walks schemas depth first and records a declaration for every compound
 * type it reaches. Compound types are forwarded on first visit, their
 * children are declared next, and the full definition follows. The started
 * set (keyed by canonical name) ends the walk at recursive references; the
 * explicit stack bounds how deeply non-recursive schemas may nest. */

use crate::decl::{DeclKind, Declaration, FieldDecl, TypeRef};
use crate::errors::{GenError, GenResult};
use crate::names::{canonical_name, union_name};
use crate::render::{self, RenderContext};
use crate::writer::LineWriter;
use avro_types::{Schema, SchemaType};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use tracing::{debug, info};

pub const MAX_RECURSION_DEPTH: usize = 64;

pub const HEADER: &str = "/* Autogenerated file.  Do not edit! */\n\n";

pub struct SpecificGenOptions {
  pub output_path: PathBuf,
  pub filename_prefix: String,
  pub type_prefix: String,
}

impl Default for SpecificGenOptions {
  fn default() -> Self {
    Self {
      output_path: PathBuf::from("."),
      filename_prefix: "avro-specific-".to_string(),
      type_prefix: "avro_specific".to_string(),
    }
  }
}

/* Files written by a completed generator */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFiles {
  pub definition: PathBuf,
  pub types: PathBuf,
  pub implementation: PathBuf,
}

pub struct SpecificGenerator {
  files: GeneratedFiles,
  stem: String,
  type_prefix: String,
  def: LineWriter,
  started: HashSet<String>,
  /* branch names of every union seen, by canonical name */
  union_shapes: HashMap<String, Vec<String>>,
  stack: Vec<Schema>,
  declarations: Vec<Declaration>,
}

impl SpecificGenerator {
  /* Creates the definition file `<output_path>/<filename_prefix>.def`; the
   * type and implementation files are written by `close`. */
  pub fn open(options: SpecificGenOptions) -> GenResult<Self> {
    let stem = options.filename_prefix;
    let files = GeneratedFiles {
      definition: options.output_path.join(format!("{}.def", stem)),
      types: options.output_path.join(format!("{}.rs", stem)),
      implementation: options.output_path.join(format!("{}_impl.rs", stem)),
    };

    let mut def = LineWriter::create(&files.definition)?;
    write!(def, "{}", HEADER)?;
    writeln!(def, "#[allow(unused_macros)]")?;
    writeln!(def, "macro_rules! {}_schema_definition {{", options.type_prefix)?;
    writeln!(def, "    ($m:ident) => {{")?;

    Ok(Self {
      files,
      stem,
      type_prefix: options.type_prefix,
      def,
      started: HashSet::new(),
      union_shapes: HashMap::new(),
      stack: Vec::with_capacity(MAX_RECURSION_DEPTH),
      declarations: Vec::new(),
    })
  }

  /* Declares `schema` and everything it references that has not been
   * declared by an earlier call. */
  pub fn output_schema(&mut self, schema: &Schema) -> GenResult<()> {
    let first = self.declarations.len();
    let walked = self.write_def(schema);
    /* a failed walk may leave entries on the stack */
    self.stack.clear();
    walked?;

    for decl in &self.declarations[first..] {
      render::write_definition(&mut self.def, &self.type_prefix, decl)?;
    }
    Ok(())
  }

  pub fn declarations(&self) -> &[Declaration] {
    &self.declarations
  }

  pub fn files(&self) -> &GeneratedFiles {
    &self.files
  }

  /* Ends the definition stream and writes the type and implementation
   * streams for everything declared so far. */
  pub fn close(self) -> GenResult<GeneratedFiles> {
    let mut def = self.def;
    writeln!(def, "    /* end of schema definition */")?;
    writeln!(def, "    }};")?;
    writeln!(def, "}}")?;
    def.finish()?;

    let ctx = RenderContext::new(&self.type_prefix, &self.declarations);

    let mut types = LineWriter::create(&self.files.types)?;
    render::write_types(&mut types, &ctx, &self.stem)?;
    types.finish()?;

    let mut implementation = LineWriter::create(&self.files.implementation)?;
    render::write_impls(&mut implementation, &ctx, &self.stem)?;
    implementation.finish()?;

    debug!("Closed generator for {}", self.stem);
    Ok(self.files)
  }

  fn write_def(&mut self, schema: &Schema) -> GenResult<()> {
    if schema.schema_type() == SchemaType::Link {
      let target = schema.resolve_link()?;
      return self.write_def(&target);
    }

    let name = canonical_name(schema);
    if schema.schema_type() == SchemaType::Union {
      self.check_union_shape(&name, schema)?;
    }
    if self.started.contains(&name) {
      return Ok(());
    }
    if self.stack.len() == MAX_RECURSION_DEPTH {
      return Err(GenError::RecursionLimitExceeded {
        limit: MAX_RECURSION_DEPTH,
      });
    }

    info!("Outputting definitions for {}...", name);
    self.stack.push(schema.clone());
    self.started.insert(name);

    if let Some(forward) = forward_declaration(schema) {
      self.declarations.push(forward);
    }

    for child in children(schema) {
      self.write_def(&child)?;
    }

    if let Some(definition) = self.definition(schema)? {
      self.declarations.push(definition);
    }

    self.stack.pop();
    Ok(())
  }

  fn definition(&self, schema: &Schema) -> GenResult<Option<Declaration>> {
    let decl = match schema.schema_type() {
      SchemaType::Array => {
        let items = schema.array_items().cloned().unwrap_or_else(Schema::null);
        Declaration::Array {
          items_name: canonical_name(&items),
          items: self.type_ref(&items)?,
        }
      }
      SchemaType::Map => {
        let values = schema.map_values().cloned().unwrap_or_else(Schema::null);
        Declaration::Map {
          values_name: canonical_name(&values),
          values: self.type_ref(&values)?,
        }
      }
      SchemaType::Enum => Declaration::Enum {
        name: schema.type_name().to_string(),
        symbols: (0..schema.enum_size())
          .filter_map(|i| schema.enum_symbol(i))
          .map(str::to_string)
          .collect(),
      },
      SchemaType::Fixed => Declaration::Fixed {
        name: schema.type_name().to_string(),
        size: schema.fixed_size().unwrap_or(0),
      },
      SchemaType::Record => {
        let mut fields = Vec::with_capacity(schema.record_size());
        for index in 0..schema.record_size() {
          let (Some(name), Some(field)) = (schema.record_field_name(index), schema.record_field(index)) else {
            continue;
          };
          fields.push(FieldDecl {
            name: name.to_string(),
            type_ref: self.type_ref(field)?,
          });
        }
        Declaration::Record {
          name: schema.type_name().to_string(),
          fields,
        }
      }
      SchemaType::Union => {
        let mut branches = Vec::with_capacity(schema.union_size());
        for branch in (0..schema.union_size()).filter_map(|i| schema.union_branch(i)) {
          branches.push(self.type_ref(branch)?);
        }
        Declaration::Union {
          name: union_name(schema),
          branches,
        }
      }
      _ => return Ok(None),
    };
    Ok(Some(decl))
  }

  /* Union names only keep the branch kinds, so unions that differ deeper
   * down share a name; the generated type could only match one of them. */
  fn check_union_shape(&mut self, name: &str, schema: &Schema) -> GenResult<()> {
    let shape: Vec<String> = (0..schema.union_size())
      .filter_map(|i| schema.union_branch(i))
      .map(canonical_name)
      .collect();
    match self.union_shapes.get(name) {
      Some(seen) if *seen != shape => Err(GenError::NameCollision { name: name.to_string() }),
      Some(_) => Ok(()),
      None => {
        self.union_shapes.insert(name.to_string(), shape);
        Ok(())
      }
    }
  }

  /* A record on the current stack is still being declared. The way back to
   * it must pass through an array, map or union, otherwise no value of the
   * record could ever be finite. */
  fn type_ref(&self, schema: &Schema) -> GenResult<TypeRef> {
    let type_ref = match schema.schema_type() {
      SchemaType::Link => return self.type_ref(&schema.resolve_link()?),
      SchemaType::Array => TypeRef::Array(schema.array_items().map(canonical_name).unwrap_or_default()),
      SchemaType::Map => TypeRef::Map(schema.map_values().map(canonical_name).unwrap_or_default()),
      SchemaType::Enum => TypeRef::Enum(schema.type_name().to_string()),
      SchemaType::Fixed => TypeRef::Fixed(schema.type_name().to_string()),
      SchemaType::Record => {
        let name = schema.type_name().to_string();
        match self.stack.iter().position(|s| s.ptr_eq(schema)) {
          None => TypeRef::Record(name),
          Some(pos) => {
            if self.stack[pos + 1..].iter().all(|s| s.schema_type() == SchemaType::Record) {
              return Err(GenError::UnboundedRecursion { name });
            }
            TypeRef::Recursive(name)
          }
        }
      }
      SchemaType::Union => TypeRef::Union(union_name(schema)),
      primitive => TypeRef::Primitive(primitive),
    };
    Ok(type_ref)
  }
}

fn forward_declaration(schema: &Schema) -> Option<Declaration> {
  let (kind, name) = match schema.schema_type() {
    SchemaType::Array => (DeclKind::Array, schema.array_items().map(canonical_name)?),
    SchemaType::Map => (DeclKind::Map, schema.map_values().map(canonical_name)?),
    SchemaType::Enum => (DeclKind::Enum, schema.type_name().to_string()),
    SchemaType::Fixed => (DeclKind::Fixed, schema.type_name().to_string()),
    SchemaType::Record => (DeclKind::Record, schema.type_name().to_string()),
    SchemaType::Union => (DeclKind::Union, union_name(schema)),
    _ => return None,
  };
  Some(Declaration::Forward { kind, name })
}

fn children(schema: &Schema) -> Vec<Schema> {
  match schema.schema_type() {
    SchemaType::Array => schema.array_items().cloned().into_iter().collect(),
    SchemaType::Map => schema.map_values().cloned().into_iter().collect(),
    SchemaType::Record => (0..schema.record_size()).filter_map(|i| schema.record_field(i).cloned()).collect(),
    SchemaType::Union => (0..schema.union_size()).filter_map(|i| schema.union_branch(i).cloned()).collect(),
    _ => Vec::new(),
  }
}

/* Generates `<output_path>/<filename_prefix><type name>.{def,rs,_impl.rs}`
 * for a single schema. */
pub fn schema_to_specific(
  schema: &Schema,
  output_path: impl Into<PathBuf>,
  filename_prefix: &str,
  type_prefix: &str,
) -> GenResult<GeneratedFiles> {
  let mut generator = SpecificGenerator::open(SpecificGenOptions {
    output_path: output_path.into(),
    filename_prefix: format!("{}{}", filename_prefix, schema.type_name()),
    type_prefix: type_prefix.to_string(),
  })?;
  generator.output_schema(schema)?;
  generator.close()
}
