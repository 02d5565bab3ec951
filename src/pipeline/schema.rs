//! Column schema of the PEDE dataset
//!
//! Yearly fields are stored as `<FIELD>_<YEAR>` columns (e.g. `INDE_2021`,
//! `PONTO_VIRADA_2022`). The enums here are the only place that knows those
//! spellings; everything downstream asks for a column through them.

use clap::ValueEnum;
use serde::Serialize;

/// Institution column prefix (only present for 2020 and 2021)
pub const INSTITUTION: &str = "INSTITUICAO_ENSINO_ALUNO";
/// Turning point flag column prefix
pub const TURNING_POINT: &str = "PONTO_VIRADA";
/// Rock tier column prefix
pub const PEDRA: &str = "PEDRA";
/// Placeholder the source spreadsheet uses for a blank tier
pub const NULL_MARKER: &str = "#NULO!";

/// Survey year
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ValueEnum,
)]
pub enum Year {
    #[value(name = "2020")]
    #[serde(rename = "2020")]
    Y2020,
    #[value(name = "2021")]
    #[serde(rename = "2021")]
    Y2021,
    #[value(name = "2022")]
    #[serde(rename = "2022")]
    Y2022,
}

impl Year {
    pub const ALL: [Year; 3] = [Year::Y2020, Year::Y2021, Year::Y2022];

    pub fn as_str(&self) -> &'static str {
        match self {
            Year::Y2020 => "2020",
            Year::Y2021 => "2021",
            Year::Y2022 => "2022",
        }
    }

    /// Column name for a yearly field, e.g. `column("INDE")` -> `INDE_2020`
    pub fn column(&self, field: &str) -> String {
        format!("{}_{}", field, self.as_str())
    }
}

impl std::fmt::Display for Year {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rock tier ("Pedra"), the four ordinal performance categories
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ValueEnum,
)]
pub enum Pedra {
    #[value(name = "topazio", alias = "topázio")]
    #[serde(rename = "Topázio")]
    Topazio,
    #[value(name = "ametista")]
    #[serde(rename = "Ametista")]
    Ametista,
    #[value(name = "agata", alias = "ágata")]
    #[serde(rename = "Ágata")]
    Agata,
    #[value(name = "quartzo")]
    #[serde(rename = "Quartzo")]
    Quartzo,
}

impl Pedra {
    /// Canonical display order; every tier table is laid out in this order
    pub const CANONICAL: [Pedra; 4] = [Pedra::Topazio, Pedra::Ametista, Pedra::Agata, Pedra::Quartzo];

    pub fn label(&self) -> &'static str {
        match self {
            Pedra::Topazio => "Topázio",
            Pedra::Ametista => "Ametista",
            Pedra::Agata => "Ágata",
            Pedra::Quartzo => "Quartzo",
        }
    }

    /// Parse a cell value; anything outside the four tiers is `None`
    pub fn from_label(value: &str) -> Option<Pedra> {
        Pedra::CANONICAL
            .into_iter()
            .find(|p| p.label() == value.trim())
    }

    /// Position in [`Pedra::CANONICAL`]
    pub fn index(&self) -> usize {
        match self {
            Pedra::Topazio => 0,
            Pedra::Ametista => 1,
            Pedra::Agata => 2,
            Pedra::Quartzo => 3,
        }
    }
}

impl std::fmt::Display for Pedra {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Yearly turning point flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ValueEnum)]
pub enum TurningPoint {
    #[value(name = "sim", alias = "yes")]
    #[serde(rename = "Sim")]
    Yes,
    #[value(name = "nao", alias = "não", alias = "no")]
    #[serde(rename = "Não")]
    No,
}

impl TurningPoint {
    pub fn label(&self) -> &'static str {
        match self {
            TurningPoint::Yes => "Sim",
            TurningPoint::No => "Não",
        }
    }

    pub fn from_label(value: &str) -> Option<TurningPoint> {
        match value.trim() {
            "Sim" => Some(TurningPoint::Yes),
            "Não" => Some(TurningPoint::No),
            _ => None,
        }
    }
}

impl std::fmt::Display for TurningPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Composite index and its yearly sub-indicators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    Inde,
    Iaa,
    Ieg,
    Ips,
    Ida,
    Ipp,
    Ipv,
    Ian,
}

impl Indicator {
    /// Indicators that enter the correlation heatmap, in display order
    pub const CORRELATED: [Indicator; 6] = [
        Indicator::Inde,
        Indicator::Iaa,
        Indicator::Ida,
        Indicator::Ieg,
        Indicator::Ips,
        Indicator::Ipp,
    ];

    pub fn prefix(&self) -> &'static str {
        match self {
            Indicator::Inde => "INDE",
            Indicator::Iaa => "IAA",
            Indicator::Ieg => "IEG",
            Indicator::Ips => "IPS",
            Indicator::Ida => "IDA",
            Indicator::Ipp => "IPP",
            Indicator::Ipv => "IPV",
            Indicator::Ian => "IAN",
        }
    }

    pub fn column(&self, year: Year) -> String {
        year.column(self.prefix())
    }
}

/// 2022 school subjects with recorded grades
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ValueEnum)]
pub enum Subject {
    #[value(name = "portugues", alias = "port")]
    #[serde(rename = "Portugues")]
    Portuguese,
    #[value(name = "matematica", alias = "mat")]
    #[serde(rename = "Matematica")]
    Math,
    #[value(name = "ingles", alias = "ing")]
    #[serde(rename = "Ingles")]
    English,
}

impl Subject {
    pub const ALL: [Subject; 3] = [Subject::Portuguese, Subject::Math, Subject::English];

    pub fn label(&self) -> &'static str {
        match self {
            Subject::Portuguese => "Portugues",
            Subject::Math => "Matematica",
            Subject::English => "Ingles",
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            Subject::Portuguese => "NOTA_PORT_2022",
            Subject::Math => "NOTA_MAT_2022",
            Subject::English => "NOTA_ING_2022",
        }
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Columns the nine views read. A dataset lacking any of them is rejected at load.
pub fn required_columns() -> Vec<String> {
    let mut columns = Vec::new();
    for year in Year::ALL {
        for indicator in Indicator::CORRELATED {
            columns.push(indicator.column(year));
        }
        columns.push(year.column(TURNING_POINT));
        columns.push(year.column(PEDRA));
    }
    columns.push(Year::Y2020.column(INSTITUTION));
    columns.push(Year::Y2021.column(INSTITUTION));
    for subject in Subject::ALL {
        columns.push(subject.column().to_string());
    }
    columns
}

/// Required columns that hold numbers (indicators and grades)
pub fn numeric_columns() -> Vec<String> {
    let mut columns: Vec<String> = Year::ALL
        .iter()
        .flat_map(|&year| Indicator::CORRELATED.iter().map(move |i| i.column(year)))
        .collect();
    columns.extend(Subject::ALL.iter().map(|s| s.column().to_string()));
    columns
}
