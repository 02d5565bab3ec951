//! User selections shared by all views

use serde::Serialize;

use super::chart::{ChartKind, ColorScale};
use crate::pipeline::{Pedra, Subject, TurningPoint, Year};

/// Selections a view may read. Each view reads only the fields it needs.
///
/// Multi-selects default to "everything" except `turning_points`, which
/// defaults to `Sim` only. An explicitly empty selection is valid and yields
/// an empty (zero) result rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Filters {
    pub years: Vec<Year>,
    pub tiers: Vec<Pedra>,
    /// `None` keeps every institution found in the data
    pub institutions_2020: Option<Vec<String>>,
    pub institutions_2021: Option<Vec<String>>,
    pub turning_points: Vec<TurningPoint>,
    pub subjects: Vec<Subject>,
    /// `None` lets the view pick its own default kind
    pub chart: Option<ChartKind>,
    pub color_scale: ColorScale,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            years: Year::ALL.to_vec(),
            tiers: Pedra::CANONICAL.to_vec(),
            institutions_2020: None,
            institutions_2021: None,
            turning_points: vec![TurningPoint::Yes],
            subjects: Subject::ALL.to_vec(),
            chart: None,
            color_scale: ColorScale::default(),
        }
    }
}

impl Filters {
    /// Selected years in chronological order, without duplicates
    pub fn selected_years(&self) -> Vec<Year> {
        Year::ALL
            .into_iter()
            .filter(|y| self.years.contains(y))
            .collect()
    }

    /// Selected tiers in canonical order
    pub fn selected_tiers(&self) -> Vec<Pedra> {
        Pedra::CANONICAL
            .into_iter()
            .filter(|p| self.tiers.contains(p))
            .collect()
    }

    /// Selected subjects in their fixed order
    pub fn selected_subjects(&self) -> Vec<Subject> {
        Subject::ALL
            .into_iter()
            .filter(|s| self.subjects.contains(s))
            .collect()
    }

    /// Chart kind to draw, falling back to `default` when the requested kind
    /// is not one of `allowed`
    pub fn chart_or(&self, default: ChartKind, allowed: &[ChartKind]) -> ChartKind {
        match self.chart {
            Some(kind) if allowed.contains(&kind) => kind,
            _ => default,
        }
    }
}

/// Join display labels with ", " for the view details line
pub fn join_labels<T: std::fmt::Display>(items: &[T]) -> String {
    if items.is_empty() {
        return "nenhum".to_string();
    }
    items
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_years_are_ordered_and_unique() {
        let filters = Filters {
            years: vec![Year::Y2022, Year::Y2020, Year::Y2022],
            ..Filters::default()
        };
        assert_eq!(filters.selected_years(), vec![Year::Y2020, Year::Y2022]);
    }

    #[test]
    fn test_chart_or_rejects_kinds_outside_the_allowed_set() {
        let filters = Filters {
            chart: Some(ChartKind::Violin),
            ..Filters::default()
        };
        assert_eq!(filters.chart_or(ChartKind::Bar, &ChartKind::SERIES), ChartKind::Bar);
        assert_eq!(
            filters.chart_or(ChartKind::Box, &ChartKind::DISTRIBUTION),
            ChartKind::Violin
        );
    }

    #[test]
    fn test_join_labels() {
        assert_eq!(join_labels(&[Year::Y2020, Year::Y2021]), "2020, 2021");
        assert_eq!(join_labels::<Year>(&[]), "nenhum");
    }
}
