use avro_types::{
    ComplexDef, EnumDef, FixedDef, RecordBuilder, RecordDef, Schema, SchemaDef, SchemaType,
};
use std::collections::HashMap;
use tracing::debug;

use crate::errors::{LoadError, LoadResult};

/* Turns parsed schema files into schema graphs.
 *
 * Named types are registered by name (and by full name when they carry a
 * namespace) so later definitions may refer to them. A reference to a
 * record that is still being built becomes a link, bound once the record
 * is complete; this is the only way a cycle can enter the graph. */
pub struct SchemaLoader {
    /* Completed named types */
    named: HashMap<String, Schema>,

    /* Records under construction, with the links handed out for them */
    in_progress: HashMap<String, Vec<Schema>>,
}

impl SchemaLoader {
    pub fn new() -> Self {
        Self {
            named: HashMap::new(),
            in_progress: HashMap::new(),
        }
    }

    /* Look up a previously loaded named type */
    pub fn named(&self, name: &str) -> Option<Schema> {
        self.named.get(name).cloned()
    }

    pub fn load(&mut self, def: &SchemaDef) -> LoadResult<Schema> {
        match def {
            SchemaDef::Name(name) => self.resolve_name(name),
            SchemaDef::Union(branches) => {
                let mut schemas = Vec::with_capacity(branches.len());
                for branch in branches {
                    schemas.push(self.load(branch)?);
                }
                Ok(Schema::union(schemas)?)
            }
            SchemaDef::Complex(complex) => self.load_complex(complex),
        }
    }

    fn load_complex(&mut self, def: &ComplexDef) -> LoadResult<Schema> {
        match def {
            ComplexDef::Record(record) => self.load_record(record),
            ComplexDef::Enum(enumeration) => self.load_enum(enumeration),
            ComplexDef::Fixed(fixed) => self.load_fixed(fixed),
            ComplexDef::Array { items } => Ok(Schema::array(self.load(items)?)),
            ComplexDef::Map { values } => Ok(Schema::map(self.load(values)?)),
            ComplexDef::Null => Ok(Schema::null()),
            ComplexDef::Boolean => Ok(Schema::boolean()),
            ComplexDef::Int => Ok(Schema::int()),
            ComplexDef::Long => Ok(Schema::long()),
            ComplexDef::Float => Ok(Schema::float()),
            ComplexDef::Double => Ok(Schema::double()),
            ComplexDef::Bytes => Ok(Schema::bytes()),
            ComplexDef::String => Ok(Schema::string()),
        }
    }

    fn resolve_name(&mut self, name: &str) -> LoadResult<Schema> {
        if let Some(primitive) = SchemaType::primitive_from_name(name).and_then(Schema::primitive) {
            return Ok(primitive);
        }
        if let Some(schema) = self.named.get(name) {
            return Ok(schema.clone());
        }

        /* Links carry the short name, which is what the record is built with */
        let short = name.rsplit('.').next().unwrap_or(name);
        let key = if self.in_progress.contains_key(name) { name } else { short };
        match self.in_progress.get_mut(key) {
            Some(links) => {
                debug!("Reference to '{}' inside its own definition becomes a link", name);
                let link = Schema::link(short);
                links.push(link.clone());
                Ok(link)
            }
            None => Err(LoadError::UnknownType {
                name: name.to_string(),
            }),
        }
    }

    fn check_new_name(&self, name: &str, namespace: Option<&str>) -> LoadResult<()> {
        let taken = self.named.contains_key(name)
            || self.in_progress.contains_key(name)
            || namespace.is_some_and(|ns| self.named.contains_key(&format!("{}.{}", ns, name)));
        if taken {
            return Err(LoadError::Redefined {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn register(&mut self, schema: &Schema) {
        if let Some(name) = schema.name() {
            self.named.insert(name.to_string(), schema.clone());
        }
        if let (Some(full_name), Some(_)) = (schema.full_name(), schema.namespace()) {
            self.named.insert(full_name, schema.clone());
        }
    }

    fn load_record(&mut self, def: &RecordDef) -> LoadResult<Schema> {
        self.check_new_name(&def.name, def.namespace.as_deref())?;
        self.in_progress.insert(def.name.clone(), Vec::new());

        let built = self.build_record(def);
        let links = self.in_progress.remove(&def.name).unwrap_or_default();
        let record = built?;

        for link in &links {
            link.bind_link(&record)?;
        }
        debug!(
            "Loaded record '{}' with {} fields ({} self references)",
            def.name,
            record.record_size(),
            links.len()
        );
        self.register(&record);
        Ok(record)
    }

    fn build_record(&mut self, def: &RecordDef) -> LoadResult<Schema> {
        let mut builder = RecordBuilder::new(&def.name);
        if let Some(namespace) = &def.namespace {
            builder.namespace(namespace);
        }
        for field in &def.fields {
            let schema = self.load(&field.schema)?;
            builder.field(&field.name, schema)?;
        }
        Ok(builder.build()?)
    }

    fn load_enum(&mut self, def: &EnumDef) -> LoadResult<Schema> {
        self.check_new_name(&def.name, def.namespace.as_deref())?;
        let schema = Schema::enumeration_in(&def.name, def.namespace.as_deref(), def.symbols.clone())?;
        self.register(&schema);
        Ok(schema)
    }

    fn load_fixed(&mut self, def: &FixedDef) -> LoadResult<Schema> {
        self.check_new_name(&def.name, def.namespace.as_deref())?;
        let schema = Schema::fixed_in(&def.name, def.namespace.as_deref(), def.size)?;
        self.register(&schema);
        Ok(schema)
    }
}

impl Default for SchemaLoader {
    fn default() -> Self {
        Self::new()
    }
}
