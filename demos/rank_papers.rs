//! Rank a handful of paper records against a query, then recommend and evaluate.
//!
//! ```sh
//! RUST_LOG=cbf_recommender=debug cargo run --example rank_papers -- "natural language processing"
//! ```
//!
//! A JSON array of records can be passed as the second argument instead of the built-in sample.

use std::{env, fs};

use cbf_recommender::{summarize, CbfEngine, Document};
use tracing_subscriber::EnvFilter;

const SAMPLE: &str = r#"[
  { "title": "Deep Learning for Natural Language Processing",
    "abstract": "This paper presents a comprehensive survey of deep learning techniques applied to NLP tasks including sentiment analysis, machine translation, and text classification.",
    "authors": "A. Author", "year": "2021", "source": "Semantic Scholar", "citation_count": 120 },
  { "title": "Machine Learning in Healthcare",
    "abstract": "We explore applications of machine learning algorithms in medical diagnosis, patient outcome prediction, and drug discovery.",
    "authors": "B. Author", "year": "2020", "source": "Google Scholar" },
  { "title": "Neural Networks for Image Recognition",
    "abstract": "This study investigates convolutional neural networks for image classification and object detection tasks.",
    "authors": "C. Author", "year": "2019", "source": "Mendeley", "citation_count": 48 },
  { "title": "Text Mining and Sentiment Analysis",
    "abstract": "A study on extracting opinions and sentiments from text data using NLP and machine learning techniques.",
    "authors": "D. Author", "year": "2022", "source": "Semantic Scholar" },
  { "title": "Reinforcement Learning in Robotics",
    "abstract": "Application of reinforcement learning algorithms for robot navigation and manipulation tasks.",
    "authors": "E. Author", "year": "2023", "source": "Google Scholar" }
]"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = env::args().skip(1);
    let query = args
        .next()
        .unwrap_or_else(|| "natural language processing text analysis".to_string());
    let json = match args.next() {
        Some(path) => fs::read_to_string(path)?,
        None => SAMPLE.to_string(),
    };
    let papers: Vec<Document> = serde_json::from_str(&json)?;
    let papers = cbf_recommender::document::with_positional_ids(papers);

    let engine = CbfEngine::new();
    let ranked = engine.rank_by_relevance(&papers, &query);
    println!("query: {query}");
    for r in &ranked {
        println!("{:>3}. {:>6.2}  {}", r.relevance_rank, r.relevance_score(), r.document.title);
    }

    let report = summarize(&ranked, &query);
    println!(
        "\nmean {:.2}, median {:.2}, high {}% / medium {}% / low {}%",
        report.statistics.average,
        report.statistics.median,
        report.distribution.high_percentage,
        report.distribution.medium_percentage,
        report.distribution.low_percentage,
    );
    for advice in report.advisory_messages() {
        println!("  - {advice}");
    }

    if let Some(top) = ranked.first() {
        let recs = engine.recommend_from_selection(std::slice::from_ref(&top.document), &papers, 3);
        println!("\nbecause you picked \"{}\":", top.document.title);
        for r in &recs {
            println!("  {:>6.2}  {}", r.relevance_score(), r.document.title);
        }
    }

    if papers.len() > 1 {
        let explanation = engine.explain(&papers, 0, 1);
        println!("\n{}", serde_json::to_string_pretty(&explanation)?);
    }
    Ok(())
}
