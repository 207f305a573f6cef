//! Demo driver: load the exported tables, train a classifier, and print
//! ranked article predictions.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use jurimap_core::Algorithm;
use jurimap_model::ArticleClassifier;
use jurimap_store::{CaseField, CaseStore};

#[derive(Parser)]
#[command(name = "jurimap", version, about = "Statutory-article assignment for judicial case texts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print per-table counts and descriptive statistics.
    Stats {
        #[arg(long, default_value = "data_export")]
        data_dir: PathBuf,
    },
    /// Search case text for a keyword.
    Search {
        #[arg(long, default_value = "data_export")]
        data_dir: PathBuf,
        keyword: String,
    },
    /// Train a classifier and persist the model blob.
    Train {
        #[arg(long, default_value = "data_export")]
        data_dir: PathBuf,
        #[arg(long, default_value = "models/article_classifier.json")]
        model: PathBuf,
        /// naive_bayes or random_forest.
        #[arg(long, default_value = "naive_bayes")]
        algorithm: String,
        #[arg(long, default_value_t = 0.2)]
        test_size: f64,
    },
    /// Predict top-5 articles for one case text with a saved model.
    Predict {
        #[arg(long, default_value = "models/article_classifier.json")]
        model: PathBuf,
        text: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("jurimap v{}", env!("CARGO_PKG_VERSION"));

    match Cli::parse().command {
        Command::Stats { data_dir } => {
            let store = CaseStore::load(&data_dir)?;
            let info = store.table_info();
            println!(
                "cases: {}  laws: {}  links: {}",
                info.cases, info.laws, info.links
            );

            let law_stats = store.law_stats();
            println!("\nmost-cited laws:");
            for (law_id, count) in law_stats.law_usage.iter().take(5) {
                let name = store
                    .law_by_id(*law_id)
                    .map_or("(unknown)", |l| l.name.as_str());
                println!("  law {law_id} ({name}): {count}");
            }

            let case_stats = store.case_stats();
            println!("\ncourt distribution:");
            for (court, count) in case_stats.court_distribution.iter().take(5) {
                println!("  {court}: {count}");
            }
        }
        Command::Search { data_dir, keyword } => {
            let store = CaseStore::load(&data_dir)?;
            for case in store.search_cases(&keyword, CaseField::Text).iter().take(10) {
                println!("{}  {}", case.id, case.case_name);
            }
        }
        Command::Train {
            data_dir,
            model,
            algorithm,
            test_size,
        } => {
            let algorithm: Algorithm = algorithm.parse()?;
            let store = CaseStore::load(&data_dir)?;
            let rows = store.cases_with_laws();

            let mut classifier = ArticleClassifier::new(algorithm);
            let eval = classifier.train(&rows, test_size)?;

            println!("accuracy: {:.4}", eval.accuracy);
            println!("label  precision  recall  f1      support");
            for m in &eval.per_class {
                println!(
                    "{:<6} {:<10.3} {:<7.3} {:<7.3} {}",
                    m.label, m.precision, m.recall, m.f1, m.support
                );
            }
            println!("\ntop predicted articles:");
            for (i, (article, count)) in eval.top_predictions.iter().take(10).enumerate() {
                println!("  {:2}. article {article}: {count} predictions", i + 1);
            }

            if let Some(parent) = model.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            classifier.save(&model)?;
        }
        Command::Predict { model, text } => {
            let mut classifier = ArticleClassifier::new(Algorithm::NaiveBayes);
            classifier.load(&model)?;
            for p in classifier.predict(&text) {
                println!("{}. article {}: {:.3}", p.rank, p.article, p.confidence);
            }
        }
    }

    Ok(())
}
