use std::env;
use std::error::Error;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use stanza::style::{HAlign, Header, MinWidth, Styles};
use stanza::table::{Cell, Col, Row, Table};
use tracing::{debug, info};

use pitchside::context::ModelStore;
use pitchside::data;
use pitchside::data::PlayerRecord;
use pitchside::feature::RATED_FEATURES;
use pitchside::rating::RatingModel;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// file to source the player dataset from
    data: Option<PathBuf>,

    /// lower bound of the predicted rating scale
    #[clap(long, default_value = "70")]
    floor: f64,

    /// upper bound of the predicted rating scale
    #[clap(long, default_value = "99")]
    ceiling: f64,

    /// number of predictions to display
    #[clap(short = 'n', long, default_value = "10")]
    top: usize,

    /// refit the model a second time to exercise the store swap
    #[clap(long)]
    retrain: bool,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        self.data
            .as_ref()
            .ok_or(anyhow!("dataset file must be specified"))?;
        if self.floor >= self.ceiling {
            return Err(anyhow!(
                "rating floor {} must lie below the ceiling {}",
                self.floor,
                self.ceiling
            ));
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let loaded = data::read_from_file(args.data.unwrap())?;
    info!(
        "loaded {} players ({} rows dropped)",
        loaded.records.len(),
        loaded.dropped
    );
    let records = loaded.records;
    let target = data::ratings(&records)?;

    let store = ModelStore::empty();
    let bounds = args.floor..=args.ceiling;
    store.retrain(&records, &RATED_FEATURES, &target, bounds.clone())?;
    if args.retrain {
        info!("retraining over the same batch");
        store.retrain(&records, &RATED_FEATURES, &target, bounds)?;
    }
    let model = store.current().expect("the store was just trained");

    info!(
        "fit quality: R² {:.4}, adjusted {:.4}",
        model.fit_quality(),
        model.fit_quality_adjusted()
    );
    info!(
        "feature importance:\n{}",
        Console::default().render(&tabulate_importance(&model))
    );

    let predicted = model.predict_batch(&records);
    let mut order: Vec<_> = (0..records.len()).collect();
    order.sort_by(|&a, &b| predicted[b].total_cmp(&predicted[a]));
    order.truncate(args.top);
    info!(
        "predicted ratings:\n{}",
        Console::default().render(&tabulate_predictions(&order, &records, &predicted))
    );
    Ok(())
}

fn tabulate_importance(model: &RatingModel) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(18))),
            Col::new(Styles::default().with(MinWidth(12)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(12)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(11)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(9)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "Feature".into(),
                "Importance".into(),
                "Coefficient".into(),
                "Std. error".into(),
                "P-value".into(),
            ],
        ));
    let features = model.features().to_vec();
    table.push_rows(model.importance().into_iter().map(|(feature, importance)| {
        let ordinal = features
            .iter()
            .position(|candidate| *candidate == feature)
            .expect("importance covers the fitted features");
        Row::new(
            Styles::default(),
            vec![
                feature.to_string().into(),
                format!("{importance:.6}").into(),
                format!("{:.6}", model.coefficient(ordinal)).into(),
                format!("{:.6}", model.std_error(ordinal)).into(),
                format!("{:.6}", model.p_value(ordinal)).into(),
            ],
        )
    }));
    table
}

fn tabulate_predictions(order: &[usize], records: &[PlayerRecord], predicted: &[f64]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(22))),
            Col::new(Styles::default().with(MinWidth(18))),
            Col::new(Styles::default().with(MinWidth(12))),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "Player".into(),
                "Club".into(),
                "Position".into(),
                "Rating".into(),
                "Predicted".into(),
            ],
        ));
    table.push_rows(order.iter().map(|&row| {
        let record = &records[row];
        let rating = record
            .rating
            .map(|rating| format!("{rating:.1}"))
            .unwrap_or_default();
        Row::new(
            Styles::default(),
            vec![
                Cell::new(Styles::default(), record.name.clone().into()),
                Cell::new(Styles::default(), record.club.clone().into()),
                Cell::new(Styles::default(), record.position.to_string().into()),
                Cell::new(Styles::default().with(HAlign::Right), rating.into()),
                Cell::new(
                    Styles::default().with(HAlign::Right),
                    format!("{:.1}", predicted[row]).into(),
                ),
            ],
        )
    }));
    table
}
