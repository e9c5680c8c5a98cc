//! Information display handlers

use crate::cli::output::*;
use crate::vector_store::VectorIndex;
use crate::AppConfig;
use crate::Result;

/// Print the effective configuration and the state of the index
pub fn handle_config_command(config: &AppConfig) -> Result<()> {
    print_config(config);
    println!();

    match VectorIndex::load(config.index_dir()) {
        Ok(index) => {
            let metadata = index.metadata();
            print_success(&format!(
                "Index: {} chunks, {} ({} dimensions), built {}",
                metadata.chunk_count,
                metadata.embedding_model,
                metadata.dimension,
                metadata.built_at.format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }
        Err(e) => print_warning(&e.to_string()),
    }

    if let Err(e) = config.validate() {
        print_warning(&format!("Configuration is incomplete: {e}"));
    }
    Ok(())
}

