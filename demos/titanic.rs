//! Survival classifier demo: train on a labeled CSV, evaluate on a held-out
//! validation slice, then write prediction artifacts for an unlabeled CSV.
//!
//! ```bash
//! cargo run --example titanic -- train.csv test.csv
//! ```

use std::fs::File;

use anyhow::{Context, Result};
use ndarray::s;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use ml_pipeline::eval::{compute_auc, compute_roc, metrics_at_threshold};
use ml_pipeline::ingest::parse_csv_file;
use ml_pipeline::model::{ModelAdapter, ModelConfig, TrainControl};
use ml_pipeline::tabular::{
    encode_dataset, survival_rates_by, write_predictions, write_probabilities, EncodeMode,
    ImputationStats, TabularConfig,
};

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut args = std::env::args().skip(1);
    let train_path = args.next().context("usage: titanic <train.csv> <test.csv>")?;
    let test_path = args.next().context("usage: titanic <train.csv> <test.csv>")?;

    let train_csv = parse_csv_file(&train_path)?;
    let test_csv = parse_csv_file(&test_path)?;
    info!(
        rows = train_csv.rows.len(),
        skipped = train_csv.skipped,
        "loaded training data"
    );
    for (column, pct) in train_csv.missing_percentage() {
        if pct > 0.0 {
            info!(column, missing_pct = format!("{pct:.2}"), "missing values");
        }
    }
    for (sex, rate) in survival_rates_by(&train_csv, "Sex")? {
        info!(group = sex, rate = format!("{rate:.1}%"), "survival by sex");
    }

    // statistics come from the training rows only and are threaded into
    // both encodings
    let stats = ImputationStats::fit(&train_csv);
    let config = TabularConfig::default().with_family_features(true);
    let train = encode_dataset(&train_csv, EncodeMode::Training, &stats, &config)?;
    let test = encode_dataset(&test_csv, EncodeMode::Inference, &stats, &config)?;

    let labels = train
        .labels
        .as_ref()
        .context("training data produced no labels")?;
    let label_matrix = labels.clone().insert_axis(ndarray::Axis(1));

    // 80/20 validation split, prefix/suffix
    let split = train.n_samples() * 8 / 10;
    let x_fit = train.features.slice(s![..split, ..]).to_owned();
    let y_fit = label_matrix.slice(s![..split, ..]).to_owned();
    let x_val = train.features.slice(s![split.., ..]).to_owned();
    let y_val = label_matrix.slice(s![split.., ..]).to_owned();

    let mut adapter = ModelAdapter::new(
        ModelConfig::new(train.n_features(), 1)
            .with_hidden(&[16])
            .with_epochs(50),
    );
    adapter.build();
    adapter.train(&x_fit, &y_fit, &x_val, &y_val, &mut |p| {
        info!(
            epoch = p.epoch + 1,
            epochs = p.epochs,
            loss = format!("{:.4}", p.loss),
            acc = format!("{:.4}", p.accuracy),
            val_loss = format!("{:.4}", p.val_loss),
            val_acc = format!("{:.4}", p.val_accuracy),
            "trained epoch"
        );
        TrainControl::Continue
    })?;

    // threshold-swept evaluation on the validation slice
    let val_probs: Vec<f64> = adapter.predict(&x_val)?.iter().copied().collect();
    let val_truth: Vec<f64> = y_val.iter().copied().collect();
    let roc = compute_roc(&val_truth, &val_probs)?;
    let auc = compute_auc(&roc);
    let metrics = metrics_at_threshold(&roc, 0.5)?;
    info!(
        auc = format!("{auc:.4}"),
        accuracy = format!("{:.4}", metrics.accuracy),
        precision = format!("{:.4}", metrics.precision),
        recall = format!("{:.4}", metrics.recall),
        f1 = format!("{:.4}", metrics.f1),
        "validation metrics at threshold 0.5"
    );

    // prediction artifacts for the unlabeled set
    let probs: Vec<f64> = adapter.predict(&test.features)?.iter().copied().collect();
    let predictions: Vec<u8> = probs.iter().map(|&p| (p >= 0.5) as u8).collect();

    write_predictions(File::create("submission.csv")?, &test.passenger_ids, &predictions)?;
    write_probabilities(File::create("probabilities.csv")?, &test.passenger_ids, &probs)?;
    info!(
        positives = predictions.iter().filter(|&&p| p == 1).count(),
        total = predictions.len(),
        "wrote submission.csv and probabilities.csv"
    );

    Ok(())
}
