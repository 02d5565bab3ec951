//! Shared test utilities and fixture generators

#![allow(dead_code)]

use std::path::PathBuf;

use pededash::pipeline::Dataset;
use polars::prelude::*;
use tempfile::TempDir;

/// Header of the fixture export, in the column order of the real file
pub const HEADER: &str = "NOME;INSTITUICAO_ENSINO_ALUNO_2020;INDE_2020;IAA_2020;IDA_2020;IEG_2020;IPS_2020;IPP_2020;PONTO_VIRADA_2020;PEDRA_2020;\
INSTITUICAO_ENSINO_ALUNO_2021;INDE_2021;IAA_2021;IDA_2021;IEG_2021;IPS_2021;IPP_2021;PONTO_VIRADA_2021;PEDRA_2021;\
INDE_2022;IAA_2022;IDA_2022;IEG_2022;IPS_2022;IPP_2022;PONTO_VIRADA_2022;PEDRA_2022;NOTA_PORT_2022;NOTA_MAT_2022;NOTA_ING_2022";

/// Fixture rows.
///
/// - ALUNO-1: INDE 10 -> 20 -> 15, turning point in 2020
/// - ALUNO-2: INDE flat at 5, never a turning point
/// - ALUNO-3: INDE rising, turning point in 2021
/// - ALUNO-4: INDE falling, turning point in 2022
/// - ALUNO-5: missing INDE_2021, dropped by cleaning but has all three grades
/// - ALUNO-6: `#NULO!` 2021 tier, never a turning point
pub const ROWS: [&str; 6] = [
    "ALUNO-1;Escola Pública;10;8.0;6.5;7.0;7.5;6.0;Sim;Quartzo;Escola Pública;20;8.5;7.0;8.0;7.0;6.5;Não;Ágata;15;9.0;7.5;8.5;6.5;7.0;Não;Ametista;5;6;7",
    "ALUNO-2;Rede Decisão;5;6.0;4.0;5.5;6.5;5.0;Não;Ágata;Rede Decisão;5;6.5;4.5;5.0;6.0;5.5;Não;Ágata;5;7.0;5.0;6.0;7.5;6.0;Não;Ágata;8;4;6",
    "ALUNO-3;Escola Pública;6;7.5;5.0;6.0;5.0;7.0;Não;Ametista;Escola Pública;7;7.0;6.0;7.5;8.0;6.0;Sim;Ametista;8;8.0;6.5;9.0;5.5;8.0;Não;Topázio;7;7;9",
    "ALUNO-4;Escola Pública;9;9.0;8.5;8.0;6.0;8.5;Não;Topázio;Rede Decisão;8;9.5;8.0;6.5;7.5;8.0;Não;Topázio;7;8.5;9.0;7.0;8.0;9.5;Sim;Topázio;9;10;8",
    "ALUNO-5;Escola Pública;4;5.0;3.5;4.0;5.5;4.5;Sim;Quartzo;Escola Pública;;5.5;4.0;4.5;5.0;5.0;Não;Quartzo;4;6.0;4.5;5.5;6.0;5.5;Não;Quartzo;3;2;1",
    "ALUNO-6;Escola Pública;7;6.5;7.5;6.5;7.0;6.0;Não;Quartzo;Escola Pública;7;6.0;7.0;7.0;6.5;7.5;Não;#NULO!;7;7.5;6.0;8.0;7.0;6.5;Não;Quartzo;6;5;x",
];

/// Write the fixture as a semicolon-delimited CSV in a fresh temp directory
pub fn create_fixture_csv() -> (TempDir, PathBuf) {
    create_csv_with(HEADER, &ROWS)
}

/// Write an arbitrary semicolon-delimited CSV in a fresh temp directory
pub fn create_csv_with(header: &str, rows: &[&str]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("PEDE_PASSOS_DATASET_FIAP.csv");

    let mut content = String::from(header);
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    std::fs::write(&csv_path, content).unwrap();

    (temp_dir, csv_path)
}

/// Load the fixture; keep the `TempDir` alive while the dataset is used
pub fn fixture_dataset() -> (TempDir, Dataset) {
    let (dir, path) = create_fixture_csv();
    let dataset = Dataset::load(&path).unwrap();
    (dir, dataset)
}

/// Create a DataFrame with specific missing value patterns
pub fn create_missing_test_dataframe() -> DataFrame {
    df! {
        "col_complete" => [1.0f64, 2.0, 3.0, 4.0, 5.0],
        "col_20pct_missing" => [Some(1.0f64), None, Some(3.0), Some(4.0), Some(5.0)], // 20% missing
        "col_40pct_missing" => [Some(1.0f64), Some(2.0), None, None, Some(5.0)], // 40% missing
        "col_all_missing" => [None::<f64>, None, None, None, None], // 100% missing
        "label" => ["a", "b", "c", "d", "e"],
    }
    .unwrap()
}

/// Read a numeric cell of a derived table
pub fn f64_at(frame: &DataFrame, column: &str, row: usize) -> Option<f64> {
    frame
        .column(column)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .get(row)
}

/// Read a text cell of a derived table
pub fn str_at(frame: &DataFrame, column: &str, row: usize) -> Option<String> {
    frame
        .column(column)
        .unwrap()
        .str()
        .unwrap()
        .get(row)
        .map(|s| s.to_string())
}
