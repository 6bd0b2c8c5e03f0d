/* Once-initialized schema holder for value implementations that build
 * their schema on first use. Declare one as a `static` next to the
 * interface. Initialization runs at most once per process; callers racing
 * on first use block until the winner finishes. */

use avro_types::Schema;
use once_cell::sync::OnceCell;
use tracing::debug;

pub struct SchemaCache {
    cell: OnceCell<Schema>,
}

impl SchemaCache {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    pub fn get(&self) -> Option<Schema> {
        self.cell.get().cloned()
    }

    pub fn get_or_init(&self, init: impl FnOnce() -> Schema) -> Schema {
        self.cell
            .get_or_init(|| {
                let schema = init();
                debug!("Cached {} schema", schema.type_name());
                schema
            })
            .clone()
    }

    /* A failed initializer leaves the cache empty for the next caller */
    pub fn get_or_try_init<E>(&self, init: impl FnOnce() -> Result<Schema, E>) -> Result<Schema, E> {
        self.cell
            .get_or_try_init(|| {
                let schema = init()?;
                debug!("Cached {} schema", schema.type_name());
                Ok(schema)
            })
            .cloned()
    }
}

impl Default for SchemaCache {
    fn default() -> Self {
        Self::new()
    }
}
