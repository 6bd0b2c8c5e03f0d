/* Text rendering of declarations
 *
 * The definition stream is a `macro_rules!` table with one `$m!(...)` entry
 * per declaration line, in walk order. The type stream includes it and
 * declares a Rust type per non-forward declaration; the implementation
 * stream includes the type stream and connects each named type to the
 * resolver. Generated code names runtime items by full path so it can be
 * included into any module. */

use crate::decl::{Declaration, TypeRef};
use crate::errors::GenResult;
use crate::generator::HEADER;
use crate::names::{camel_case, field_ident};
use crate::writer::LineWriter;
use avro_types::SchemaType;
use std::collections::HashSet;
use std::io::Write;

const DATA: &str = "avro_specific::avro_data";
const RUNTIME: &str = "avro_specific";

/* ============================================================================
   Definition stream
   ============================================================================ */

pub fn write_definition<W: Write>(out: &mut LineWriter<W>, prefix: &str, decl: &Declaration) -> GenResult<()> {
  let upper_prefix = prefix.to_ascii_uppercase();
  match decl {
    Declaration::Forward { kind, name } => {
      writeln!(out, "        $m!(FORWARD, {}, {}, {});", prefix, kind.label(), name)?;
    }
    Declaration::Array { items_name, items } => {
      writeln!(out, "        $m!(ARRAY, {}, {}, {});", prefix, items_name, items)?;
    }
    Declaration::Map { values_name, values } => {
      writeln!(out, "        $m!(MAP, {}, {}, {});", prefix, values_name, values)?;
    }
    Declaration::Enum { name, symbols } => {
      writeln!(out, "        $m!(ENUM_START, {}, {});", prefix, name)?;
      let upper_name = name.to_ascii_uppercase();
      let last = symbols.len().saturating_sub(1);
      for (i, symbol) in symbols.iter().enumerate() {
        writeln!(
          out,
          "        $m!(ENUM_SYMBOL, {}, {}, {}, {}, {}, {});",
          upper_prefix,
          upper_name,
          symbol,
          i,
          u8::from(i == 0),
          u8::from(i == last)
        )?;
      }
      writeln!(out, "        $m!(ENUM_END, {}, {});", prefix, name)?;
    }
    Declaration::Fixed { name, size } => {
      writeln!(out, "        $m!(FIXED, {}, {}, {});", prefix, name, size)?;
    }
    Declaration::Record { name, fields } => {
      writeln!(out, "        $m!(RECORD_START, {}, {});", prefix, name)?;
      let last = fields.len().saturating_sub(1);
      for (i, field) in fields.iter().enumerate() {
        writeln!(
          out,
          "        $m!(RECORD_FIELD, {}, {}, {}, {}, {}, {}, {});",
          prefix,
          name,
          i,
          field.name,
          field.type_ref,
          u8::from(i == 0),
          u8::from(i == last)
        )?;
      }
      writeln!(out, "        $m!(RECORD_END, {}, {});", prefix, name)?;
    }
    Declaration::Union { name, branches } => {
      writeln!(out, "        $m!(UNION_START, {}, {});", prefix, name)?;
      let last = branches.len().saturating_sub(1);
      for (i, branch) in branches.iter().enumerate() {
        writeln!(
          out,
          "        $m!(UNION_BRANCH, {}, {}, {}, {}, {}, {});",
          prefix,
          name,
          i,
          branch,
          u8::from(i == 0),
          u8::from(i == last)
        )?;
      }
      writeln!(out, "        $m!(UNION_END, {}, {});", prefix, name)?;
    }
  }
  Ok(())
}

/* ============================================================================
   Type and implementation streams
   ============================================================================ */

pub struct RenderContext<'a> {
  prefix: &'a str,
  declarations: &'a [Declaration],
}

impl<'a> RenderContext<'a> {
  pub fn new(prefix: &'a str, declarations: &'a [Declaration]) -> Self {
    Self { prefix, declarations }
  }

  /* Rust type declared for a canonical name */
  pub fn type_ident(&self, canonical_name: &str) -> String {
    camel_case(&[self.prefix, canonical_name])
  }

  /* Rust type holding a referenced value, without indirection */
  pub fn rust_type(&self, type_ref: &TypeRef) -> String {
    match type_ref {
      TypeRef::Primitive(t) => primitive_type(*t),
      _ => self.type_ident(&type_ref.canonical_name()),
    }
  }

  /* Storage for a record field or union branch. References that close a
   * cycle are boxed; collections already store their elements out of line. */
  fn slot_type(&self, type_ref: &TypeRef) -> String {
    if type_ref.is_recursive() {
      format!("Box<{}>", self.rust_type(type_ref))
    } else {
      self.rust_type(type_ref)
    }
  }

  fn definitions(&self) -> impl Iterator<Item = &'a Declaration> {
    self.declarations.iter().filter(|decl| !decl.is_forward())
  }
}

fn primitive_type(t: SchemaType) -> String {
  match t {
    SchemaType::Null => "()".to_string(),
    SchemaType::Boolean => "bool".to_string(),
    SchemaType::Int => "i32".to_string(),
    SchemaType::Long => "i64".to_string(),
    SchemaType::Float => "f32".to_string(),
    SchemaType::Double => "f64".to_string(),
    SchemaType::Bytes => format!("{}::RawBytes", DATA),
    _ => format!("{}::RawString", DATA),
  }
}

/* Variant names for enum symbols, disambiguated by index on collision */
fn symbol_variants(symbols: &[String]) -> Vec<String> {
  let mut seen = HashSet::new();
  symbols
    .iter()
    .enumerate()
    .map(|(i, symbol)| {
      let mut variant = camel_case(&[symbol]);
      if !seen.insert(variant.clone()) {
        variant = format!("{}{}", variant, i);
        seen.insert(variant.clone());
      }
      variant
    })
    .collect()
}

fn branch_variants(branches: &[TypeRef]) -> Vec<String> {
  branches.iter().map(|branch| camel_case(&[&branch.canonical_name()])).collect()
}

/* Default branch of a union: the first one that does not close a cycle, so
 * that defaulting a value never recurses into itself. */
fn default_branch(branches: &[TypeRef]) -> usize {
  branches.iter().position(|branch| !branch.is_recursive()).unwrap_or(0)
}

pub fn write_types<W: Write>(out: &mut LineWriter<W>, ctx: &RenderContext<'_>, stem: &str) -> GenResult<()> {
  write!(out, "{}", HEADER)?;
  writeln!(out, "include!(\"{}.def\");", stem)?;

  for decl in ctx.definitions() {
    writeln!(out)?;
    match decl {
      Declaration::Array { items_name, items } => {
        writeln!(
          out,
          "pub type {} = {}::RawArray<{}>;",
          ctx.type_ident(&format!("array_{}", items_name)),
          DATA,
          ctx.rust_type(items)
        )?;
      }
      Declaration::Map { values_name, values } => {
        writeln!(
          out,
          "pub type {} = {}::RawMap<{}>;",
          ctx.type_ident(&format!("map_{}", values_name)),
          DATA,
          ctx.rust_type(values)
        )?;
      }
      Declaration::Enum { name, symbols } => {
        writeln!(out, "#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]")?;
        writeln!(out, "pub enum {} {{", ctx.type_ident(name))?;
        for (i, variant) in symbol_variants(symbols).iter().enumerate() {
          if i == 0 {
            writeln!(out, "    #[default]")?;
          }
          writeln!(out, "    {},", variant)?;
        }
        writeln!(out, "}}")?;
      }
      Declaration::Fixed { name, size } => {
        let ident = ctx.type_ident(name);
        writeln!(out, "#[derive(Debug, Clone, Copy, PartialEq, Eq)]")?;
        writeln!(out, "pub struct {}(pub [u8; {}]);", ident, size)?;
        writeln!(out)?;
        writeln!(out, "impl Default for {} {{", ident)?;
        writeln!(out, "    fn default() -> Self {{")?;
        writeln!(out, "        {}([0; {}])", ident, size)?;
        writeln!(out, "    }}")?;
        writeln!(out, "}}")?;
      }
      Declaration::Record { name, fields } => {
        writeln!(out, "#[derive(Debug, Default, PartialEq)]")?;
        writeln!(out, "pub struct {} {{", ctx.type_ident(name))?;
        for field in fields {
          writeln!(out, "    pub {}: {},", field_ident(&field.name), ctx.slot_type(&field.type_ref))?;
        }
        writeln!(out, "}}")?;
      }
      Declaration::Union { name, branches } => {
        let ident = ctx.type_ident(name);
        let variants = branch_variants(branches);
        writeln!(out, "#[derive(Debug, PartialEq)]")?;
        writeln!(out, "pub enum {} {{", ident)?;
        for (variant, branch) in variants.iter().zip(branches) {
          writeln!(out, "    {}({}),", variant, ctx.slot_type(branch))?;
        }
        writeln!(out, "}}")?;
        if let Some(variant) = variants.get(default_branch(branches)) {
          writeln!(out)?;
          writeln!(out, "impl Default for {} {{", ident)?;
          writeln!(out, "    fn default() -> Self {{")?;
          writeln!(out, "        {}::{}(Default::default())", ident, variant)?;
          writeln!(out, "    }}")?;
          writeln!(out, "}}")?;
        }
      }
      Declaration::Forward { .. } => {}
    }
  }
  Ok(())
}

fn write_resolve_signature<W: Write>(out: &mut LineWriter<W>, method: &str) -> GenResult<()> {
  writeln!(out, "    fn {}(", method)?;
  writeln!(out, "        ctx: &mut {}::ResolveContext,", RUNTIME)?;
  writeln!(out, "        index: usize,")?;
  writeln!(out, "        wschema: &{}::avro_types::Schema,", RUNTIME)?;
  writeln!(out, "    ) -> {}::SpecificResult<{}::ConsumerId> {{", RUNTIME, RUNTIME)?;
  Ok(())
}

pub fn write_impls<W: Write>(out: &mut LineWriter<W>, ctx: &RenderContext<'_>, stem: &str) -> GenResult<()> {
  write!(out, "{}", HEADER)?;
  writeln!(out, "include!(\"{}.rs\");", stem)?;

  for decl in ctx.definitions() {
    match decl {
      Declaration::Enum { name, symbols } => {
        let ident = ctx.type_ident(name);
        let variants = symbol_variants(symbols);
        let quoted: Vec<String> = symbols.iter().map(|s| format!("\"{}\"", s)).collect();
        writeln!(out)?;
        writeln!(out, "impl {}::SpecificEnum for {} {{", RUNTIME, ident)?;
        writeln!(out, "    const NAME: &'static str = \"{}\";", name)?;
        writeln!(out, "    const SYMBOLS: &'static [&'static str] = &[{}];", quoted.join(", "))?;
        writeln!(out)?;
        writeln!(out, "    fn set_symbol(&mut self, index: usize) {{")?;
        writeln!(out, "        *self = match index {{")?;
        for (i, variant) in variants.iter().enumerate().skip(1) {
          writeln!(out, "            {} => {}::{},", i, ident, variant)?;
        }
        if let Some(first) = variants.first() {
          writeln!(out, "            _ => {}::{},", ident, first)?;
        }
        writeln!(out, "        }};")?;
        writeln!(out, "    }}")?;
        writeln!(out, "}}")?;
        writeln!(out)?;
        writeln!(out, "{}::impl_specific!(enum {});", RUNTIME, ident)?;
      }
      Declaration::Fixed { name, size } => {
        let ident = ctx.type_ident(name);
        writeln!(out)?;
        writeln!(out, "impl {}::SpecificFixed for {} {{", RUNTIME, ident)?;
        writeln!(out, "    const NAME: &'static str = \"{}\";", name)?;
        writeln!(out, "    const SIZE: usize = {};", size)?;
        writeln!(out)?;
        writeln!(out, "    fn bytes_mut(&mut self) -> &mut [u8] {{")?;
        writeln!(out, "        &mut self.0")?;
        writeln!(out, "    }}")?;
        writeln!(out, "}}")?;
        writeln!(out)?;
        writeln!(out, "{}::impl_specific!(fixed {});", RUNTIME, ident)?;
      }
      Declaration::Record { name, fields } => {
        let ident = ctx.type_ident(name);
        let quoted: Vec<String> = fields.iter().map(|f| format!("\"{}\"", f.name)).collect();
        writeln!(out)?;
        writeln!(out, "impl {}::SpecificRecord for {} {{", RUNTIME, ident)?;
        writeln!(out, "    const NAME: &'static str = \"{}\";", name)?;
        writeln!(out, "    const FIELDS: &'static [&'static str] = &[{}];", quoted.join(", "))?;
        writeln!(out)?;
        write_resolve_signature(out, "resolve_field")?;
        writeln!(out, "        match index {{")?;
        for (i, field) in fields.iter().enumerate() {
          writeln!(out, "            {} => ctx.resolve::<{}>(wschema),", i, ctx.rust_type(&field.type_ref))?;
        }
        writeln!(
          out,
          "            _ => Err({}::SpecificError::NotApplicable {{ callback: \"resolve_field\" }}),",
          RUNTIME
        )?;
        writeln!(out, "        }}")?;
        writeln!(out, "    }}")?;
        writeln!(out)?;
        writeln!(out, "    fn field_mut(&mut self, index: usize) -> Option<&mut dyn std::any::Any> {{")?;
        writeln!(out, "        match index {{")?;
        for (i, field) in fields.iter().enumerate() {
          let deref = if field.type_ref.is_recursive() { "*" } else { "" };
          writeln!(out, "            {} => Some(&mut {}self.{}),", i, deref, field_ident(&field.name))?;
        }
        writeln!(out, "            _ => None,")?;
        writeln!(out, "        }}")?;
        writeln!(out, "    }}")?;
        writeln!(out, "}}")?;
        writeln!(out)?;
        writeln!(out, "{}::impl_specific!(record {});", RUNTIME, ident)?;
      }
      Declaration::Union { name, branches } => {
        let ident = ctx.type_ident(name);
        let variants = branch_variants(branches);
        writeln!(out)?;
        writeln!(out, "impl {}::SpecificUnion for {} {{", RUNTIME, ident)?;
        writeln!(out, "    const BRANCHES: usize = {};", branches.len())?;
        writeln!(out)?;
        write_resolve_signature(out, "resolve_branch")?;
        writeln!(out, "        match index {{")?;
        for (i, branch) in branches.iter().enumerate() {
          writeln!(out, "            {} => ctx.resolve::<{}>(wschema),", i, ctx.rust_type(branch))?;
        }
        writeln!(
          out,
          "            _ => Err({}::SpecificError::MissingBranch {{ discriminant: index }}),",
          RUNTIME
        )?;
        writeln!(out, "        }}")?;
        writeln!(out, "    }}")?;
        writeln!(out)?;
        writeln!(out, "    fn select(&mut self, index: usize) -> Option<&mut dyn std::any::Any> {{")?;
        writeln!(out, "        let current = match self {{")?;
        for (i, variant) in variants.iter().enumerate() {
          writeln!(out, "            {}::{}(_) => {},", ident, variant, i)?;
        }
        writeln!(out, "        }};")?;
        writeln!(out, "        if current != index {{")?;
        writeln!(out, "            *self = match index {{")?;
        for (i, variant) in variants.iter().enumerate() {
          writeln!(out, "                {} => {}::{}(Default::default()),", i, ident, variant)?;
        }
        writeln!(out, "                _ => return None,")?;
        writeln!(out, "            }};")?;
        writeln!(out, "        }}")?;
        writeln!(out, "        match self {{")?;
        for (variant, branch) in variants.iter().zip(branches) {
          let deref = if branch.is_recursive() { "&mut **" } else { "" };
          writeln!(out, "            {}::{}(value) => Some({}value),", ident, variant, deref)?;
        }
        writeln!(out, "        }}")?;
        writeln!(out, "    }}")?;
        writeln!(out, "}}")?;
        writeln!(out)?;
        writeln!(out, "{}::impl_specific!(union {});", RUNTIME, ident)?;
      }
      Declaration::Array { .. } | Declaration::Map { .. } | Declaration::Forward { .. } => {}
    }
  }
  Ok(())
}
