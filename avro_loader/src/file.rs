use avro_types::{Schema, SchemaDef};
use std::path::Path;
use tracing::debug;

use crate::errors::{LoadError, LoadResult};
use crate::loader::SchemaLoader;

/* Parse a JSON schema document */
pub fn parse_schema(text: &str) -> LoadResult<Schema> {
    let def: SchemaDef = serde_json::from_str(text)?;
    SchemaLoader::new().load(&def)
}

/* Parse the same schema model written as YAML */
pub fn parse_schema_yaml(text: &str) -> LoadResult<Schema> {
    let def: SchemaDef = serde_yml::from_str(text)?;
    SchemaLoader::new().load(&def)
}

/* Load a schema file. `.yaml` and `.yml` files are read as YAML, anything
 * else as JSON. */
pub fn load_schema_file(path: &Path) -> LoadResult<Schema> {
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Loading schema file {} ({} bytes)", path.display(), contents.len());

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    if is_yaml {
        parse_schema_yaml(&contents)
    } else {
        parse_schema(&contents)
    }
}
