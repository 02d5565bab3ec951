//! Mean of yearly values per rock tier

use serde::Serialize;

use super::columns::mean;
use super::schema::{Pedra, Year};

/// Means of one tier. Always present in the output, even when no row matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierMeans {
    pub tier: Pedra,
    /// Rows that contributed to this tier
    pub rows: usize,
    /// Mean per year column, keyed by year
    pub means: Vec<(Year, Option<f64>)>,
    /// Mean of the tier's available yearly means
    pub overall: Option<f64>,
}

impl TierMeans {
    pub fn mean_for(&self, year: Year) -> Option<f64> {
        self.means
            .iter()
            .find(|(y, _)| *y == year)
            .and_then(|(_, m)| *m)
    }
}

/// Group rows by tier and average each yearly column.
///
/// `tiers[i]` is the group of row `i`; `columns` holds one value vector per
/// year, row-aligned with `tiers`. Rows whose tier is missing or not in
/// `selected` are ignored. The result always has four entries in
/// [`Pedra::CANONICAL`] order; a tier without rows has `None` means.
pub fn grouped_means(
    tiers: &[Option<Pedra>],
    columns: &[(Year, Vec<Option<f64>>)],
    selected: &[Pedra],
) -> Vec<TierMeans> {
    Pedra::CANONICAL
        .iter()
        .map(|&tier| {
            let members: Vec<usize> = if selected.contains(&tier) {
                tiers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| **t == Some(tier))
                    .map(|(i, _)| i)
                    .collect()
            } else {
                Vec::new()
            };

            let means: Vec<(Year, Option<f64>)> = columns
                .iter()
                .map(|(year, values)| {
                    let group_values: Vec<Option<f64>> = members
                        .iter()
                        .map(|&i| values.get(i).copied().flatten())
                        .collect();
                    (*year, mean(&group_values))
                })
                .collect();

            let yearly: Vec<Option<f64>> = means.iter().map(|(_, m)| *m).collect();
            let overall = mean(&yearly);

            TierMeans {
                tier,
                rows: members.len(),
                means,
                overall,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_has_four_rows_in_canonical_order() {
        let tiers = vec![Some(Pedra::Quartzo), Some(Pedra::Quartzo)];
        let columns = vec![(Year::Y2020, vec![Some(4.0), Some(6.0)])];

        let result = grouped_means(&tiers, &columns, &Pedra::CANONICAL);

        assert_eq!(result.len(), 4);
        let order: Vec<Pedra> = result.iter().map(|r| r.tier).collect();
        assert_eq!(order, Pedra::CANONICAL.to_vec());
        assert_eq!(result[3].mean_for(Year::Y2020), Some(5.0));
        assert_eq!(result[0].mean_for(Year::Y2020), None);
        assert_eq!(result[0].rows, 0);
    }

    #[test]
    fn test_overall_is_mean_of_available_yearly_means() {
        let tiers = vec![Some(Pedra::Agata), Some(Pedra::Agata)];
        let columns = vec![
            (Year::Y2020, vec![Some(4.0), Some(6.0)]),
            (Year::Y2021, vec![Some(7.0), None]),
            (Year::Y2022, vec![None, None]),
        ];

        let result = grouped_means(&tiers, &columns, &Pedra::CANONICAL);
        let agata = &result[Pedra::Agata.index()];

        assert_eq!(agata.mean_for(Year::Y2021), Some(7.0));
        assert_eq!(agata.mean_for(Year::Y2022), None);
        assert_eq!(agata.overall, Some(6.0));
    }

    #[test]
    fn test_unselected_tier_keeps_its_row_with_missing_means() {
        let tiers = vec![Some(Pedra::Topazio), Some(Pedra::Ametista)];
        let columns = vec![(Year::Y2020, vec![Some(9.0), Some(8.0)])];

        let result = grouped_means(&tiers, &columns, &[Pedra::Ametista]);

        assert_eq!(result.len(), 4);
        assert_eq!(result[0].mean_for(Year::Y2020), None);
        assert_eq!(result[1].mean_for(Year::Y2020), Some(8.0));
    }
}
