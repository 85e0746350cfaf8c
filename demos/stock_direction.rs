//! Multi-stock direction demo: turn an OHLCV CSV into windowed sequences,
//! train a classifier on the chronological prefix, then report accuracy per
//! symbol on the held-out suffix.
//!
//! ```bash
//! cargo run --example stock_direction -- prices.csv
//! ```

use anyhow::{Context, Result};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use ml_pipeline::eval::per_symbol_accuracy;
use ml_pipeline::ingest::parse_csv_file;
use ml_pipeline::model::{flatten_sequences, ModelAdapter, ModelConfig, TrainControl};
use ml_pipeline::series::{build_sequences, PriceTable, SequenceConfig};

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let path = std::env::args()
        .nth(1)
        .context("usage: stock_direction <prices.csv>")?;

    let parsed = parse_csv_file(&path)?;
    let table = PriceTable::from_csv(&parsed)?;
    info!(
        symbols = table.symbols().len(),
        days = table.dates().len(),
        skipped = table.skipped,
        "loaded price table"
    );

    let config = SequenceConfig::new(10, 2);
    let dataset = build_sequences(&table, &config)?;
    info!(
        train = dataset.x_train.dim().0,
        test = dataset.x_test.dim().0,
        "built sequences"
    );

    // the dense classifier takes sequences flattened to [samples, window * features]
    let x_train = flatten_sequences(&dataset.x_train)?;
    let x_test = flatten_sequences(&dataset.x_test)?;

    let mut adapter = ModelAdapter::new(
        ModelConfig::new(x_train.ncols(), dataset.y_train.ncols())
            .with_hidden(&[64, 32])
            .with_epochs(30),
    );
    adapter.build();
    adapter.train(
        &x_train,
        &dataset.y_train,
        &x_test,
        &dataset.y_test,
        &mut |p| {
            info!(
                epoch = p.epoch + 1,
                epochs = p.epochs,
                loss = format!("{:.4}", p.loss),
                val_loss = format!("{:.4}", p.val_loss),
                val_acc = format!("{:.4}", p.val_accuracy),
                "trained epoch"
            );
            TrainControl::Continue
        },
    )?;

    let predictions = adapter.predict(&x_test)?;
    let mut report = per_symbol_accuracy(
        &predictions,
        &dataset.y_test,
        &dataset.symbols,
        dataset.horizon(),
    )?;
    report.sort_by(|a, b| b.accuracy.total_cmp(&a.accuracy));

    for entry in &report {
        info!(
            symbol = %entry.symbol,
            accuracy = format!("{:.2}%", entry.accuracy * 100.0),
            slots = entry.outcomes.len(),
            "direction accuracy"
        );
    }
    let mean = report.iter().map(|e| e.accuracy).sum::<f64>() / report.len().max(1) as f64;
    info!(mean = format!("{:.2}%", mean * 100.0), "mean accuracy");

    Ok(())
}
