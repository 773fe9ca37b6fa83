use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use engine::corpus::DEFAULT_BASE_URL;
use engine::{build_index, search, Category, Corpus, Index, SearchResult};
use serde::Serialize;
use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "wikisearch")]
#[command(about = "Query an in-memory index built from category directories", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CorpusArgs {
    /// Corpus category as NAME=DIR; repeat for more categories
    #[arg(long = "corpus", required = true)]
    categories: Vec<Category>,
    /// Prefix prepended to file names to form document urls
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Tokenize and intern documents on all cores
    #[arg(long, default_value_t = false)]
    parallel: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index and rank documents for a single term
    Search {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Search term (lower-cased before lookup)
        #[arg(long, short)]
        query: String,
        /// Show at most this many results
        #[arg(long)]
        limit: Option<usize>,
        /// Print results as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Build the index and print its size
    Stats {
        #[command(flatten)]
        corpus: CorpusArgs,
    },
}

#[derive(Serialize)]
struct Output<'a> {
    query: &'a str,
    took_s: f64,
    search_results: Option<&'a [SearchResult]>,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { corpus, query, limit, json } => run_search(&corpus, &query, limit, json),
        Commands::Stats { corpus } => run_stats(&corpus),
    }
}

fn load_index(args: &CorpusArgs) -> Result<Index> {
    let corpus = Corpus::new(args.categories.clone()).with_base_url(args.base_url.clone());
    let documents = corpus.load().context("loading corpus")?;
    let index = if args.parallel { Index::build_parallel(&documents) } else { build_index(&documents) };
    tracing::info!(num_docs = index.len(), num_terms = index.dictionary().size(), "index ready");
    Ok(index)
}

fn run_search(args: &CorpusArgs, query: &str, limit: Option<usize>, json: bool) -> Result<()> {
    let index = load_index(args)?;
    let start = Instant::now();
    let mut results = search(&index, query);
    let took_s = start.elapsed().as_secs_f64();
    if let (Some(results), Some(limit)) = (results.as_mut(), limit) {
        results.truncate(limit);
    }

    if json {
        let out = Output { query, took_s, search_results: results.as_deref() };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    print!("{}", render(results.as_deref()));
    Ok(())
}

fn run_stats(args: &CorpusArgs) -> Result<()> {
    let index = load_index(args)?;
    let tokens: usize = index.documents().iter().map(|d| d.term_ids.len()).sum();
    println!("documents: {}", index.len());
    println!("terms:     {}", index.dictionary().size());
    println!("tokens:    {tokens}");
    Ok(())
}

fn render(results: Option<&[SearchResult]>) -> String {
    match results {
        None => "empty query\n".to_string(),
        Some([]) => "no results\n".to_string(),
        Some(results) => results.iter().map(|r| format!("{:.3}\t{}\n", r.score, r.url)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeated_corpus_flags() {
        let cli = Cli::try_parse_from([
            "wikisearch", "search", "--corpus", "games=data/Games", "--corpus", "programming=data/Programming",
            "-q", "chess", "--limit", "5",
        ])
        .unwrap();
        match cli.command {
            Commands::Search { corpus, query, limit, json } => {
                assert_eq!(corpus.categories.len(), 2);
                assert_eq!(corpus.categories[1].name, "programming");
                assert_eq!(corpus.base_url, DEFAULT_BASE_URL);
                assert_eq!(query, "chess");
                assert_eq!(limit, Some(5));
                assert!(!json);
            }
            Commands::Stats { .. } => panic!("expected search"),
        }
    }

    #[test]
    fn corpus_is_required() {
        assert!(Cli::try_parse_from(["wikisearch", "stats"]).is_err());
    }

    #[test]
    fn renders_each_outcome() {
        assert_eq!(render(None), "empty query\n");
        assert_eq!(render(Some(&[])), "no results\n");
        let results = vec![
            SearchResult { url: "b".into(), score: 1.0 },
            SearchResult { url: "a".into(), score: 1.0 / 3.0 },
        ];
        assert_eq!(render(Some(&results)), "1.000\tb\n0.333\ta\n");
    }
}
