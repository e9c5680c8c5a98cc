//! CLI output formatting utilities
//!
//! This module provides consistent output formatting for the `rabot` CLI

use std::io::Write;

use crate::indexing::IndexReport;
use crate::models::QueryResult;
use crate::models::QueryStats;
use crate::AppConfig;

/// Safely truncate a string at character boundary (not byte boundary)
///
/// Returns the string with a "..." suffix if truncated, otherwise unchanged.
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Print the answer (or guidance message) for one question
pub fn print_query_result(result: &QueryResult) {
    println!();
    if result.success {
        println!("💭 {}", result.retrieval.answer);
    } else {
        println!("{}", result.retrieval.answer);
    }
    println!();
    println!(
        "   Category: {} | Confidence: {:.2} | {}",
        result.validation.category,
        result.validation.confidence,
        result.validation.reason
    );
    if !result.retrieval.context_retrieved.is_empty() {
        println!("   Sources:");
        for (idx, preview) in result.retrieval.context_retrieved.iter().enumerate() {
            println!("     [{}] {}", idx + 1, truncate_str(&preview.replace('\n', " "), 100));
        }
    }
    println!();
}

/// Print the query history, oldest first
pub fn print_history(history: &[QueryResult]) {
    if history.is_empty() {
        print_info("No questions asked yet.");
        return;
    }
    println!("📜 History ({} queries):", history.len());
    for (idx, entry) in history.iter().enumerate() {
        let status = if entry.success { "✅" } else { "❓" };
        println!(
            "  {}. {} [{}] {}",
            idx + 1,
            status,
            entry.timestamp.format("%H:%M:%S"),
            truncate_str(&entry.query, 80)
        );
    }
}

/// Print query statistics
pub fn print_stats(stats: &QueryStats) {
    println!("📊 {} Statistics", stats.system_name);
    println!("  Total queries:      {}", stats.total_queries);
    println!("  Valid queries:      {}", stats.valid_queries);
    println!("  Successful queries: {}", stats.successful_queries);
}

/// Print the summary of an indexing run
pub fn print_index_report(report: &IndexReport) {
    println!("  Document:   {}", report.document_path.display());
    println!("  Characters: {}", report.characters);
    println!("  Chunks:     {}", report.chunk_count);
    println!(
        "  Embeddings: {} ({} dimensions)",
        report.embedding_model, report.dimension
    );
    println!("  Index:      {}", report.index_path.display());
}

/// Print configuration, with the LLM key masked
pub fn print_config(config: &AppConfig) {
    println!("📋 RABOT Configuration:");
    println!();

    println!("👤 Profile:");
    println!("  Subject: {}", config.subject_name());
    println!("  System name: {}", config.system_name());
    println!();

    println!("🤖 LLM:");
    println!("  Endpoint: {}", config.llm_endpoint());
    println!("  Model: {}", config.llm_model());
    println!("  API key: {}", config.masked_llm_key());
    println!("  Temperature: {}", config.llm.temperature);
    println!("  Max tokens: {}", config.llm.max_tokens);
    println!("  Timeout: {}s", config.llm.timeout_secs);
    println!();

    println!("🧮 Embeddings:");
    println!("  Provider: {}", config.embedding_provider());
    println!("  Model: {}", config.embedding_model());
    println!();

    println!("🔎 Retrieval:");
    println!("  Chunk size: {}", config.chunk_size());
    println!("  Chunk overlap: {}", config.chunk_overlap());
    println!("  Top K: {}", config.top_k());
    println!();

    println!("💾 Storage:");
    println!("  Document: {}", config.document_path().display());
    println!("  Index: {}", config.index_file().display());
    println!();

    println!("🌐 Server:");
    println!("  Address: {}:{}", config.server.host, config.server.port);
    println!("  CORS: {}", if config.server.cors { "Enabled" } else { "Disabled" });
    println!();

    println!("📝 Logging:");
    println!("  Level: {}", config.logging.level);
    if config.logging.file_output {
        println!("  Directory: {}", config.logging.directory);
    }
}

pub fn print_info(msg: &str) {
    println!("ℹ️  {msg}");
}

pub fn print_success(msg: &str) {
    println!("✅ {msg}");
}

pub fn print_warning(msg: &str) {
    println!("⚠️  {msg}");
}

pub fn print_error(msg: &str) {
    eprintln!("❌ {msg}");
}

pub fn print_prompt(msg: &str) {
    print!("{msg}");
    let _ = std::io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("exactly10!", 10), "exactly10!");
        assert_eq!(truncate_str("this is longer", 4), "this...");
    }

    #[test]
    fn test_truncate_str_multibyte() {
        assert_eq!(truncate_str("🦀🦀🦀", 2), "🦀🦀...");
    }
}
