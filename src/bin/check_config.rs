use std::path::PathBuf;

use rabot::config::EmbeddingProviderKind;
use rabot::vector_store::VectorIndex;
use rabot::AppConfig;
use rabot::Result;

#[tokio::main]
async fn main() -> Result<()> {
    println!("🔍 Checking configuration...");

    // Optional first argument: path of the config file
    let path = std::env::args().nth(1).map(PathBuf::from);

    let config = match AppConfig::load_from(path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            println!("❌ Configuration error: {e}");
            print_fix_hints();
            return Err(e);
        }
    };

    println!("✅ Configuration loaded successfully!");
    println!("📋 Configuration details:");
    println!("  Subject: {}", config.subject_name());
    println!("  LLM endpoint: {}", config.llm_endpoint());
    println!("  LLM model: {}", config.llm_model());
    println!("  LLM API key: {}", config.masked_llm_key());
    println!("  Embedding provider: {}", config.embedding_provider());
    if config.embedding_provider() == EmbeddingProviderKind::Hash {
        println!("  Embedding dimension: {}", config.embeddings.dimension);
    } else {
        println!("  Embedding model: {}", config.embedding_model());
    }
    println!(
        "  Chunking: {} chars, {} overlap, top {}",
        config.chunk_size(),
        config.chunk_overlap(),
        config.top_k()
    );
    println!("  Document: {}", config.document_path().display());
    println!("  Index: {}", config.index_file().display());

    if let Err(e) = config.validate() {
        println!("❌ Configuration error: {e}");
        print_fix_hints();
        return Err(e);
    }

    if !config.document_path().is_file() {
        println!(
            "⚠️  Source document not found at {} (needed only for `rabot index`)",
            config.document_path().display()
        );
    }

    match VectorIndex::load(config.index_dir()) {
        Ok(index) => println!(
            "✅ Vector index found: {} chunks built with {}",
            index.len(),
            index.metadata().embedding_model
        ),
        Err(e) => {
            println!("❌ {e}");
            return Err(e);
        }
    }

    println!("\n🎉 Configuration check completed successfully!");
    Ok(())
}

fn print_fix_hints() {
    println!("\n💡 To fix this:");
    println!("  1. Copy config.example.toml to config.toml");
    println!("  2. Set GROQ_API_KEY in the environment or a .env file");
    println!("  3. Run this check again");
}
