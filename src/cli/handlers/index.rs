//! Offline indexing handler

use std::io::stdin;
use std::io::BufRead;

use crate::cli::output::print_index_report;
use crate::cli::output::print_info;
use crate::cli::output::print_prompt;
use crate::cli::output::print_success;
use crate::cli::output::print_warning;
use crate::indexing::Indexer;
use crate::vector_store::VectorIndex;
use crate::AppConfig;
use crate::Result;

/// Build the vector index, asking before an existing one is replaced
pub async fn handle_index_command(config: &AppConfig, force: bool) -> Result<()> {
    println!("🚀 Building the RABOT vector index");
    println!("==================================\n");

    // Ask before the embedder is created; the local model may need a download
    if !confirm_indexing(config, force, &mut stdin().lock())? {
        print_info("Indexing skipped. Using the existing index.");
        return Ok(());
    }

    let indexer = Indexer::load(config).await?;

    print_info(&format!(
        "Indexing {} with {} embeddings...",
        config.document_path().display(),
        config.embedding_provider()
    ));
    let report = indexer.run().await?;

    println!();
    print_success("Vector index built successfully!");
    print_index_report(&report);
    Ok(())
}

/// Whether to go ahead with indexing. An existing index is only replaced
/// with `force` or after the user answers yes on `input`.
fn confirm_indexing(config: &AppConfig, force: bool, input: &mut impl BufRead) -> Result<bool> {
    if force || !VectorIndex::exists(config.index_dir()) {
        return Ok(true);
    }

    print_warning(&format!(
        "A vector index already exists at {}",
        config.index_file().display()
    ));
    print_prompt("Do you want to recreate it? (yes/no): ");

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer_is_yes(&answer))
}

/// Only an explicit "yes" confirms an overwrite
#[must_use]
pub fn answer_is_yes(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("yes")
}
