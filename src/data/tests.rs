use super::*;

fn read_csv(data: &str) -> Result<Loaded, DataError> {
    read_rows(csv::Reader::from_reader(data.as_bytes()))
}

const HEADER: &str =
    "Player_Name,Club,Position,Rating,Goals,Assists,Passes_Completed,Pass_Accuracy,Shot_Accuracy,Tackles_Won";

#[test]
fn loads_well_formed_rows() {
    let data = format!(
        "{HEADER}\n\
        Erling Haaland,Manchester City,Forward,91.2,27,5,310,78.4,81.0,12\n\
        Declan Rice,Arsenal,Midfielder,84.0,4,7,610,91.2,66.0,88"
    );
    let loaded = read_csv(&data).unwrap();
    assert_eq!(2, loaded.records.len());
    assert_eq!(0, loaded.dropped);

    let haaland = &loaded.records[0];
    assert_eq!("Erling Haaland", haaland.name);
    assert_eq!("Manchester City", haaland.club);
    assert_eq!(Position::Forward, haaland.position);
    assert_eq!(Some(91.2), haaland.rating);
    assert_eq!(27, haaland.goals);
    assert_eq!(78.4, haaland.pass_accuracy);
}

#[test]
fn drops_uncoercible_rows() {
    let data = format!(
        "{HEADER}\n\
        Good Row,Arsenal,Forward,80.0,10,3,200,80.0,70.0,20\n\
        Bad Row,Arsenal,Forward,80.0,n/a,3,200,80.0,70.0,20\n\
        Other Good Row,Arsenal,Defender,75.0,1,2,400,88.0,55.0,90"
    );
    let loaded = read_csv(&data).unwrap();
    assert_eq!(2, loaded.records.len());
    assert_eq!(1, loaded.dropped);
    assert!(loaded.records.iter().all(|record| record.name != "Bad Row"));
}

#[test]
fn drops_rows_with_unknown_position() {
    let data = format!(
        "{HEADER}\n\
        Good Row,Arsenal,Forward,80.0,10,3,200,80.0,70.0,20\n\
        Bad Row,Arsenal,Striker,80.0,10,3,200,80.0,70.0,20"
    );
    let loaded = read_csv(&data).unwrap();
    assert_eq!(1, loaded.records.len());
    assert_eq!(1, loaded.dropped);
}

#[test]
fn missing_column_is_invalid() {
    let data = "Player_Name,Club,Position,Goals,Assists,Passes_Completed,Pass_Accuracy,Shot_Accuracy\n\
        A,B,Forward,1,2,3,4,5";
    match read_csv(data) {
        Err(DataError::InvalidColumn(InvalidColumn::Missing(column))) => {
            assert_eq!(COL_TACKLES_WON, column)
        }
        other => panic!("expected missing column, got {other:?}"),
    }
}

#[test]
fn entirely_non_numeric_column_is_invalid() {
    let data = format!(
        "{HEADER}\n\
        A,Arsenal,Forward,80.0,ten,3,200,80.0,70.0,20\n\
        B,Arsenal,Forward,80.0,eleven,4,210,81.0,71.0,21"
    );
    match read_csv(&data) {
        Err(DataError::InvalidColumn(InvalidColumn::NonNumeric(column))) => {
            assert_eq!(COL_GOALS, column)
        }
        other => panic!("expected non-numeric column, got {other:?}"),
    }
}

#[test]
fn all_rows_dropped_is_empty_batch() {
    let data = format!(
        "{HEADER}\n\
        A,Arsenal,Striker,80.0,1,3,200,80.0,70.0,20\n\
        B,Arsenal,Winger,80.0,2,4,210,81.0,71.0,21"
    );
    assert!(matches!(read_csv(&data), Err(DataError::EmptyBatch(_))));
}

#[test]
fn header_only_is_empty_batch() {
    assert!(matches!(read_csv(HEADER), Err(DataError::EmptyBatch(_))));
}

#[test]
fn rating_column_is_optional() {
    let data = "Player_Name,Club,Position,Goals,Assists,Passes_Completed,Pass_Accuracy,Shot_Accuracy,Tackles_Won\n\
        A,Arsenal,Forward,10,3,200,80.0,70.0,20";
    let loaded = read_csv(data).unwrap();
    assert_eq!(None, loaded.records[0].rating);
    assert!(matches!(
        ratings(&loaded.records),
        Err(InvalidColumn::Missing(COL_RATING))
    ));
}

#[test]
fn filter_by_club_ignores_case() {
    let data = format!(
        "{HEADER}\n\
        A,Arsenal,Forward,80.0,10,3,200,80.0,70.0,20\n\
        B,Liverpool,Forward,80.0,10,3,200,80.0,70.0,20"
    );
    let loaded = read_csv(&data).unwrap();
    let filtered = filter_by_club(loaded.records.clone(), "arsenal").unwrap();
    assert_eq!(1, filtered.len());
    assert_eq!("A", filtered[0].name);
    assert!(filter_by_club(loaded.records, "Chelsea").is_err());
}

#[test]
fn round_trips_through_csv() {
    let records = vec![PlayerRecord {
        name: "Bukayo Saka".to_string(),
        club: "Arsenal".to_string(),
        position: Position::Forward,
        rating: Some(86.5),
        goals: 14,
        assists: 9,
        passes_completed: 420,
        pass_accuracy: 84.3,
        shot_accuracy: 72.1,
        tackles_won: 18,
    }];
    let mut writer = csv::Writer::from_writer(vec![]);
    for record in &records {
        writer.serialize(record).unwrap();
    }
    let data = String::from_utf8(writer.into_inner().unwrap()).unwrap();
    let loaded = read_csv(&data).unwrap();
    assert_eq!(records, loaded.records);
}
