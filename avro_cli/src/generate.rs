/* Generate command - schema files to schema-specific sources */

use anyhow::Context;
use avro_gen::GeneratedFiles;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct Options {
    pub output_path: PathBuf,
    pub filename_prefix: String,
    pub type_prefix: String,
    pub verbose: bool,
}

/* Stops at the first schema that fails; earlier outputs are kept */
pub fn run(files: &[PathBuf], options: &Options) -> anyhow::Result<()> {
    if options.verbose {
        println!("Avro Schema-Specific Generator");
        println!("==============================\n");
        println!("[~] Configuration:");
        println!("  Output directory: {}", options.output_path.display());
        println!("  Filename prefix: {}", options.filename_prefix);
        println!("  Type prefix: {}", options.type_prefix);
        println!("  Input files: {}", files.len());
        for file in files {
            println!("    - {}", file.display());
        }
        println!();
    }

    std::fs::create_dir_all(&options.output_path)
        .with_context(|| format!("cannot create output directory {}", options.output_path.display()))?;

    for file in files {
        let generated = generate_file(file, options)
            .with_context(|| format!("Error processing schema {}", file.display()))?;
        if options.verbose {
            println!("[✓] Generated {}", generated.definition.display());
            println!("    {}", generated.types.display());
            println!("    {}", generated.implementation.display());
        }
    }

    if options.verbose {
        println!("\n[✓] Code generation complete!");
    }
    Ok(())
}

fn generate_file(file: &Path, options: &Options) -> anyhow::Result<GeneratedFiles> {
    if options.verbose {
        println!("[~] Loading {}...", file.display());
    }
    let schema = avro_loader::load_schema_file(file)?;
    debug!("Loaded {} schema from {}", schema.type_name(), file.display());

    let generated = avro_gen::schema_to_specific(
        &schema,
        &options.output_path,
        &options.filename_prefix,
        &options.type_prefix,
    )?;
    Ok(generated)
}
