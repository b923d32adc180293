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

use pitchside::data;
use pitchside::data::PlayerRecord;
use pitchside::feature::{matrix_of, SCORED_FEATURES};
use pitchside::file::read_json;
use pitchside::insights::{
    club_summaries, correlation_matrix, describe, position_summaries, CorrelationMethod,
    GroupSummary,
};
use pitchside::linear::Matrix;
use pitchside::scale::{Scaler, ScalingMode};
use pitchside::score::{efficiency_scores, performance_scores, Weights};

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// file to source the player dataset from
    data: Option<PathBuf>,

    /// restrict the ranking to one club
    #[clap(short, long)]
    club: Option<String>,

    /// JSON file carrying a custom feature → weight mapping
    #[clap(short, long)]
    weights: Option<PathBuf>,

    /// rank by the efficiency blend instead of the weighted performance score
    #[clap(short, long)]
    efficiency: bool,

    /// number of players to display
    #[clap(short = 'n', long, default_value = "20")]
    top: usize,

    /// also print the per-club and per-position summaries
    #[clap(long)]
    summary: bool,

    /// also print feature/score correlation matrices
    #[clap(long)]
    correlations: bool,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        self.data
            .as_ref()
            .ok_or(anyhow!("dataset file must be specified"))?;
        if self.efficiency && self.weights.is_some() {
            return Err(anyhow!("a weights file only applies to the weighted score"));
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
    let records = match &args.club {
        Some(club) => data::filter_by_club(loaded.records, club)?,
        None => loaded.records,
    };

    let raw = matrix_of(&records, &SCORED_FEATURES);
    let scores = if args.efficiency {
        let (_, standardized) = Scaler::fit_transform(ScalingMode::Standard, &raw)?;
        efficiency_scores(&standardized, &SCORED_FEATURES)?
    } else {
        let weights = match &args.weights {
            Some(path) => read_json(path)?,
            None => Weights::default(),
        };
        let (_, normalized) = Scaler::fit_transform(ScalingMode::MinMax, &raw)?;
        performance_scores(&normalized, &SCORED_FEATURES, &weights)?
    };

    let mut order: Vec<_> = (0..records.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    order.truncate(args.top);
    let table = tabulate_ranking(&order, &records, &scores);
    info!("ranking:\n{}", Console::default().render(&table));

    if args.summary {
        let stats = describe(&scores)?;
        info!(
            "score distribution: mean {:.2}, median {:.2}, std {:.2}, range {:.2}..{:.2}",
            stats.mean, stats.median, stats.std, stats.min, stats.max
        );
        let clubs = club_summaries(&records, &scores)?;
        info!(
            "club summary:\n{}",
            Console::default().render(&tabulate_summaries("Club", &clubs))
        );
        let positions = position_summaries(&records, &scores)?;
        info!(
            "position summary:\n{}",
            Console::default().render(&tabulate_summaries("Position", &positions))
        );
    }

    if args.correlations {
        let mut extended = Matrix::allocate(records.len(), SCORED_FEATURES.len() + 1);
        for row in 0..records.len() {
            let extended_row = extended.row_slice_mut(row);
            extended_row[..SCORED_FEATURES.len()].copy_from_slice(raw.row_slice(row));
            extended_row[SCORED_FEATURES.len()] = scores[row];
        }
        let labels: Vec<_> = SCORED_FEATURES
            .iter()
            .map(ToString::to_string)
            .chain(["Score".to_string()])
            .collect();
        for (name, method) in [
            ("Pearson", CorrelationMethod::Pearson),
            ("Spearman", CorrelationMethod::Spearman),
        ] {
            let correlations = correlation_matrix(&extended, method);
            info!(
                "{name} correlation:\n{}",
                Console::default().render(&tabulate_correlations(&labels, &correlations))
            );
        }
    }

    Ok(())
}

fn tabulate_ranking(order: &[usize], records: &[PlayerRecord], scores: &[f64]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(6))),
            Col::new(Styles::default().with(MinWidth(22))),
            Col::new(Styles::default().with(MinWidth(18))),
            Col::new(Styles::default().with(MinWidth(12))),
            Col::new(Styles::default().with(MinWidth(8))),
            Col::new(Styles::default().with(MinWidth(6))),
            Col::new(Styles::default().with(MinWidth(8))),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "Rank".into(),
                "Player".into(),
                "Club".into(),
                "Position".into(),
                "Score".into(),
                "Goals".into(),
                "Assists".into(),
            ],
        ));
    table.push_rows(order.iter().enumerate().map(|(rank, &row)| {
        let record = &records[row];
        Row::new(
            Styles::default(),
            vec![
                Cell::new(
                    Styles::default().with(HAlign::Right),
                    format!("{}", rank + 1).into(),
                ),
                Cell::new(Styles::default(), record.name.clone().into()),
                Cell::new(Styles::default(), record.club.clone().into()),
                Cell::new(Styles::default(), record.position.to_string().into()),
                Cell::new(
                    Styles::default().with(HAlign::Right),
                    format!("{:.2}", scores[row]).into(),
                ),
                Cell::new(
                    Styles::default().with(HAlign::Right),
                    format!("{}", record.goals).into(),
                ),
                Cell::new(
                    Styles::default().with(HAlign::Right),
                    format!("{}", record.assists).into(),
                ),
            ],
        )
    }));
    table
}

fn tabulate_summaries(key_header: &str, summaries: &[GroupSummary]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(18))),
            Col::new(Styles::default().with(MinWidth(8))),
            Col::new(Styles::default().with(MinWidth(10))),
            Col::new(Styles::default().with(MinWidth(10))),
            Col::new(Styles::default().with(MinWidth(10))),
            Col::new(Styles::default().with(MinWidth(9))),
            Col::new(Styles::default().with(MinWidth(7))),
            Col::new(Styles::default().with(MinWidth(9))),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                key_header.into(),
                "Players".into(),
                "Mean".into(),
                "Median".into(),
                "Std dev".into(),
                "Z-score".into(),
                "Goals".into(),
                "Assists".into(),
            ],
        ));
    table.push_rows(summaries.iter().map(|summary| {
        Row::new(
            Styles::default().with(HAlign::Right),
            vec![
                Cell::new(Styles::default(), summary.key.clone().into()),
                format!("{}", summary.players).into(),
                format!("{:.2}", summary.mean_score).into(),
                format!("{:.2}", summary.median_score).into(),
                format!("{:.2}", summary.std_score).into(),
                format!("{:+.2}", summary.z_score).into(),
                format!("{}", summary.total_goals).into(),
                format!("{}", summary.total_assists).into(),
            ],
        )
    }));
    table
}

fn tabulate_correlations(labels: &[String], correlations: &Matrix) -> Table {
    let mut cols = vec![Col::new(Styles::default().with(MinWidth(16)))];
    cols.extend(
        labels
            .iter()
            .map(|_| Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right))),
    );
    let mut header = vec!["".into()];
    header.extend(labels.iter().map(|label| label.clone().into()));
    let mut table = Table::default()
        .with_cols(cols)
        .with_row(Row::new(Styles::default().with(Header(true)), header));
    table.push_rows(labels.iter().enumerate().map(|(row, label)| {
        let mut cells = vec![Cell::new(Styles::default(), label.clone().into())];
        cells.extend(
            (0..labels.len())
                .map(|col| format!("{:+.3}", correlations[(row, col)]).into()),
        );
        Row::new(Styles::default(), cells)
    }));
    table
}
