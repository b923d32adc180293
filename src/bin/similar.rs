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
use pitchside::feature::{matrix_of, with_position_one_hot, SCORED_FEATURES};
use pitchside::scale::{Scaler, ScalingMode};
use pitchside::similar::{rank, resolve, Neighbour};

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// file to source the player dataset from
    data: Option<PathBuf>,

    /// name of the query player
    #[clap(short, long)]
    player: Option<String>,

    /// row index of the query player, for disambiguating duplicate names
    #[clap(short, long)]
    row: Option<usize>,

    /// number of neighbours to return
    #[clap(short = 'n', long, default_value = "5")]
    top: usize,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        self.data
            .as_ref()
            .ok_or(anyhow!("dataset file must be specified"))?;
        if self.player.is_none() && self.row.is_none() {
            return Err(anyhow!("either a player name or a row index must be specified"));
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

    let query = match args.row {
        Some(row) => {
            if row >= records.len() {
                return Err(anyhow!("row {row} is out of bounds for {} records", records.len()).into());
            }
            row
        }
        None => resolve(&records, args.player.as_ref().unwrap())?,
    };

    let numeric = matrix_of(&records, &SCORED_FEATURES);
    let (_, standardized) = Scaler::fit_transform(ScalingMode::Standard, &numeric)?;
    let encoded = with_position_one_hot(&standardized, &records);
    let neighbours = rank(&encoded, query, args.top);

    let record = &records[query];
    info!(
        "players most similar to {} ({}, {}):\n{}",
        record.name,
        record.club,
        record.position,
        Console::default().render(&tabulate_neighbours(&neighbours, &records))
    );
    Ok(())
}

fn tabulate_neighbours(neighbours: &[Neighbour], records: &[PlayerRecord]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(22))),
            Col::new(Styles::default().with(MinWidth(18))),
            Col::new(Styles::default().with(MinWidth(12))),
            Col::new(Styles::default().with(MinWidth(10))),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "Player".into(),
                "Club".into(),
                "Position".into(),
                "Similarity".into(),
            ],
        ));
    table.push_rows(neighbours.iter().map(|neighbour| {
        let record = &records[neighbour.row];
        Row::new(
            Styles::default(),
            vec![
                Cell::new(Styles::default(), record.name.clone().into()),
                Cell::new(Styles::default(), record.club.clone().into()),
                Cell::new(Styles::default(), record.position.to_string().into()),
                Cell::new(
                    Styles::default().with(HAlign::Right),
                    format!("{:.4}", neighbour.similarity).into(),
                ),
            ],
        )
    }));
    table
}
