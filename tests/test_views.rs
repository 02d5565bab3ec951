//! End-to-end tests of the nine views against the fixture dataset

use pededash::dashboard::{student_trends, ChartKind, Filters, Plot, View};
use pededash::pipeline::{Pedra, Subject, Trend, TurningPoint, Variation, Year};

#[path = "common/mod.rs"]
mod common;

use common::{f64_at, fixture_dataset, str_at};

#[test]
fn test_cleaning_keeps_only_complete_rows() {
    let (_dir, dataset) = fixture_dataset();
    assert_eq!(dataset.raw().height(), 6);
    // ALUNO-5 has an empty INDE_2021
    assert_eq!(dataset.complete().height(), 5);
}

#[test]
fn test_turning_points_counts_and_totals() {
    let (_dir, dataset) = fixture_dataset();
    let output = View::TurningPoints.run(&dataset, &Filters::default()).unwrap();

    let table = output.table("ponto_de_virada").unwrap();
    assert_eq!(table.frame.height(), 3);
    for row in 0..3 {
        assert_eq!(f64_at(&table.frame, "Sim", row), Some(1.0));
        assert_eq!(f64_at(&table.frame, "Não", row), Some(4.0));
        assert_eq!(f64_at(&table.frame, "Variação Sim (%)", row), Some(0.0));
    }

    let yes = output.metric("Total de 'Sim'").unwrap();
    assert_eq!(yes.value, "3");
    assert_eq!(yes.delta.as_deref(), Some("0.00%"));
    assert_eq!(output.metric("Total de 'Não'").unwrap().value, "12");
    assert_eq!(output.charts.len(), 2);
}

#[test]
fn test_turning_points_with_single_year() {
    let (_dir, dataset) = fixture_dataset();
    let filters = Filters {
        years: vec![Year::Y2021],
        ..Filters::default()
    };
    let output = View::TurningPoints.run(&dataset, &filters).unwrap();

    let table = output.table("ponto_de_virada").unwrap();
    assert_eq!(table.frame.height(), 1);
    assert_eq!(str_at(&table.frame, "Ano", 0).as_deref(), Some("2021"));
    assert_eq!(output.metric("Total de 'Sim'").unwrap().value, "1");
}

#[test]
fn test_empty_year_selection_renders_zero_state() {
    let (_dir, dataset) = fixture_dataset();
    let filters = Filters {
        years: Vec::new(),
        ..Filters::default()
    };

    let output = View::TurningPoints.run(&dataset, &filters).unwrap();
    assert_eq!(output.table("ponto_de_virada").unwrap().frame.height(), 0);
    let yes = output.metric("Total de 'Sim'").unwrap();
    assert_eq!(yes.value, "0");
    assert_eq!(yes.delta, None);

    let frequency = View::PedraFrequency.run(&dataset, &filters).unwrap();
    assert_eq!(frequency.metric("Total Topázio").unwrap().value, "0");
}

#[test]
fn test_trend_categorisation() {
    let (_dir, dataset) = fixture_dataset();
    let output = View::IndeTrend.run(&dataset, &Filters::default()).unwrap();

    let summary = output.table("categorizacao_inde").unwrap();
    assert_eq!(summary.frame.height(), Trend::ALL.len());
    let expected = [1.0, 1.0, 1.0, 0.0, 2.0];
    for (row, count) in expected.iter().enumerate() {
        assert_eq!(f64_at(&summary.frame, "Contagem", row), Some(*count));
        assert_eq!(
            str_at(&summary.frame, "Tendência", row).as_deref(),
            Some(Trend::ALL[row].label())
        );
    }

    let students = output.table("categorizacao_inde_alunos").unwrap();
    assert_eq!(str_at(&students.frame, "NOME", 0).as_deref(), Some("ALUNO-1"));
    assert_eq!(
        str_at(&students.frame, "INDE_TENDENCIA", 0).as_deref(),
        Some("Aumento seguido de queda")
    );
    assert_eq!(str_at(&students.frame, "INDE_VARIACAO", 0).as_deref(), Some("50"));

    let increase = output.metric("Aumento").unwrap();
    assert_eq!(increase.value, "1");
    assert_eq!(increase.delta.as_deref(), Some("20.0% do total"));
}

#[test]
fn test_student_trends_on_cleaned_table() {
    let (_dir, dataset) = fixture_dataset();
    let students = student_trends(dataset.complete()).unwrap();

    assert_eq!(students[0].trend, Trend::IncreaseThenDecrease);
    assert_eq!(students[0].variation, Some(Variation::Percent(50.0)));
    assert_eq!(students[1].trend, Trend::Stable);
    assert_eq!(students[1].variation, Some(Variation::Percent(0.0)));
    assert_eq!(students[2].trend, Trend::Increase);
    assert_eq!(students[3].trend, Trend::Decrease);
}

#[test]
fn test_inde_evolution_by_cohort() {
    let (_dir, dataset) = fixture_dataset();
    let output = View::IndeEvolution.run(&dataset, &Filters::default()).unwrap();

    let table = output.table("evolucao_inde").unwrap();
    let with = "INDE Médio Com Ponto de Virada";
    let without = "INDE Médio Sem Ponto de Virada";
    assert!((f64_at(&table.frame, with, 0).unwrap() - 25.0 / 3.0).abs() < 1e-9);
    assert!((f64_at(&table.frame, with, 1).unwrap() - 35.0 / 3.0).abs() < 1e-9);
    assert!((f64_at(&table.frame, with, 2).unwrap() - 10.0).abs() < 1e-9);
    for row in 0..3 {
        assert!((f64_at(&table.frame, without, row).unwrap() - 6.0).abs() < 1e-9);
    }
    assert_eq!(f64_at(&table.frame, "Variação Com Ponto de Virada (%)", 0), Some(0.0));

    let with_metric = output.metric(with).unwrap();
    assert_eq!(with_metric.value, "30.00");
    assert_eq!(with_metric.delta.as_deref(), Some("-14.29%"));
    let without_metric = output.metric(without).unwrap();
    assert_eq!(without_metric.value, "18.00");
    assert_eq!(without_metric.delta.as_deref(), Some("0.00%"));
}

#[test]
fn test_pedra_comparison_groups_by_2020_tier() {
    let (_dir, dataset) = fixture_dataset();
    let output = View::PedraComparison.run(&dataset, &Filters::default()).unwrap();

    let table = output.table("comparacao_pedra").unwrap();
    assert_eq!(table.frame.height(), 4);
    assert_eq!(str_at(&table.frame, "PEDRA", 0).as_deref(), Some("Topázio"));
    assert_eq!(f64_at(&table.frame, "INDE_Media_2020_2022", 0), Some(8.0));
    assert_eq!(f64_at(&table.frame, "INDE_Media_2020_2022", 3), Some(15.0));

    // ALUNO-6 has a #NULO! tier and must not reach the Quartzo group
    assert_eq!(output.metric("INDE Médio Quartzo").unwrap().value, "15.00");
    assert_eq!(output.metric("INDE Médio Ágata").unwrap().value, "5.00");
}

#[test]
fn test_pedra_comparison_deselected_tiers_have_no_means() {
    let (_dir, dataset) = fixture_dataset();
    let filters = Filters {
        tiers: vec![Pedra::Ametista],
        ..Filters::default()
    };
    let output = View::PedraComparison.run(&dataset, &filters).unwrap();
    assert_eq!(output.metric("INDE Médio Ametista").unwrap().value, "7.00");
    assert_eq!(output.metric("INDE Médio Topázio").unwrap().value, "-");
}

#[test]
fn test_institution_distribution() {
    let (_dir, dataset) = fixture_dataset();
    let output = View::InstitutionDistribution
        .run(&dataset, &Filters::default())
        .unwrap();

    let table_2020 = output.table("distribuicao_pedra_2020").unwrap();
    assert_eq!(table_2020.frame.height(), 2);
    assert_eq!(
        str_at(&table_2020.frame, "Instituição", 0).as_deref(),
        Some("Escola Pública")
    );
    assert_eq!(f64_at(&table_2020.frame, "Quartzo", 0), Some(1.0));
    assert_eq!(f64_at(&table_2020.frame, "Ágata", 1), Some(1.0));

    let table_2021 = output.table("distribuicao_pedra_2021").unwrap();
    assert_eq!(f64_at(&table_2021.frame, "Topázio", 1), Some(1.0));

    assert_eq!(output.metric("Topázio 2020").unwrap().value, "25.00%");
    assert_eq!(output.metric("Ágata 2021").unwrap().value, "50.00%");
    assert_eq!(output.metric("Quartzo 2021").unwrap().value, "0.00%");

    match &output.charts[0].plot {
        Plot::Categories { stacked, .. } => assert!(*stacked),
        other => panic!("unexpected plot {:?}", other),
    }
}

#[test]
fn test_institution_selection_per_year() {
    let (_dir, dataset) = fixture_dataset();
    let filters = Filters {
        institutions_2020: Some(vec!["Rede Decisão".to_string()]),
        institutions_2021: Some(Vec::new()),
        ..Filters::default()
    };
    let output = View::InstitutionDistribution.run(&dataset, &filters).unwrap();

    assert_eq!(output.table("distribuicao_pedra_2020").unwrap().frame.height(), 1);
    assert_eq!(output.metric("Ágata 2020").unwrap().value, "100.00%");
    assert_eq!(output.table("distribuicao_pedra_2021").unwrap().frame.height(), 0);
    assert_eq!(output.metric("Ágata 2021").unwrap().value, "0.00%");
}

#[test]
fn test_indicator_correlation_matrix() {
    let (_dir, dataset) = fixture_dataset();
    let output = View::IndicatorCorrelation
        .run(&dataset, &Filters::default())
        .unwrap();

    let table = output.table("matriz_correlacao_indicadores").unwrap();
    assert_eq!(table.frame.height(), 18);
    assert_eq!(table.frame.width(), 19);
    assert_eq!(str_at(&table.frame, "Indicador", 0).as_deref(), Some("INDE_2020"));
    assert_eq!(f64_at(&table.frame, "INDE_2020", 0), Some(1.0));
    assert_eq!(output.metrics.len(), 3);

    match &output.charts[0].plot {
        Plot::Heatmap { labels, values, .. } => {
            assert_eq!(labels.len(), 18);
            for i in 0..labels.len() {
                for j in 0..labels.len() {
                    assert_eq!(values[i][j], values[j][i]);
                    if let Some(r) = values[i][j] {
                        assert!((-1.0..=1.0).contains(&r));
                    }
                }
            }
        }
        other => panic!("unexpected plot {:?}", other),
    }
}

#[test]
fn test_inde_difference_counts() {
    let (_dir, dataset) = fixture_dataset();
    let output = View::IndeDifference.run(&dataset, &Filters::default()).unwrap();

    assert_eq!(output.table("diferenca_inde").unwrap().frame.height(), 3);
    assert_eq!(output.metric("Diferença Positiva INDE 2020-2021").unwrap().value, "2");
    assert_eq!(output.metric("Diferença Negativa INDE 2020-2021").unwrap().value, "1");
    assert_eq!(output.metric("Diferença Positiva INDE 2021-2022").unwrap().value, "1");
    assert_eq!(output.metric("Diferença Negativa INDE 2021-2022").unwrap().value, "2");

    let histogram = output.table("diferenca_inde_2020_2021_histograma").unwrap();
    assert_eq!(histogram.frame.height(), 20);
    let total: f64 = (0..20)
        .filter_map(|row| f64_at(&histogram.frame, "Número de Alunos", row))
        .sum();
    assert_eq!(total, 3.0);
}

#[test]
fn test_inde_difference_with_no_flags_selected() {
    let (_dir, dataset) = fixture_dataset();
    let filters = Filters {
        turning_points: Vec::new(),
        ..Filters::default()
    };
    let output = View::IndeDifference.run(&dataset, &filters).unwrap();
    assert_eq!(output.table("diferenca_inde").unwrap().frame.height(), 0);
    assert_eq!(output.metric("Diferença Positiva INDE 2020-2021").unwrap().value, "0");

    let filters = Filters {
        turning_points: vec![TurningPoint::No],
        ..Filters::default()
    };
    let output = View::IndeDifference.run(&dataset, &filters).unwrap();
    assert_eq!(output.table("diferenca_inde").unwrap().frame.height(), 3);
}

#[test]
fn test_subject_scores_use_uncleaned_rows() {
    let (_dir, dataset) = fixture_dataset();
    let output = View::SubjectScores.run(&dataset, &Filters::default()).unwrap();

    let summary = output.table("resumo_estatistico").unwrap();
    // ALUNO-5 counts (dropped by cleaning), ALUNO-6 does not (unparseable grade)
    assert_eq!(f64_at(&summary.frame, "Portugues", 0), Some(5.0));
    assert!((f64_at(&summary.frame, "Portugues", 1).unwrap() - 6.4).abs() < 1e-9);
    assert_eq!(f64_at(&summary.frame, "Matematica", 7), Some(10.0));

    let means = output.table("media_disciplinas").unwrap();
    assert!((f64_at(&means.frame, "Média", 2).unwrap() - 6.2).abs() < 1e-9);

    assert_eq!(output.metric("Nota Máxima").unwrap().value, "10.00");
    assert_eq!(output.metric("Nota Mínima").unwrap().value, "1.00");
    assert_eq!(output.metric("Média das Notas").unwrap().value, "6.13");
}

#[test]
fn test_subject_scores_chart_kinds() {
    let (_dir, dataset) = fixture_dataset();

    let filters = Filters {
        subjects: vec![Subject::Math],
        chart: Some(ChartKind::Histogram),
        ..Filters::default()
    };
    let output = View::SubjectScores.run(&dataset, &filters).unwrap();
    assert!(matches!(output.charts[0].plot, Plot::Histogram(_)));
    assert_eq!(output.table("resumo_estatistico").unwrap().frame.width(), 2);

    // a series chart kind is not valid here and falls back to the box plot
    let filters = Filters {
        chart: Some(ChartKind::Line),
        ..Filters::default()
    };
    let output = View::SubjectScores.run(&dataset, &filters).unwrap();
    match &output.charts[0].plot {
        Plot::Distribution { kind, samples } => {
            assert_eq!(*kind, ChartKind::Box);
            assert_eq!(samples.len(), 3);
        }
        other => panic!("unexpected plot {:?}", other),
    }
}

#[test]
fn test_pedra_frequency() {
    let (_dir, dataset) = fixture_dataset();
    let output = View::PedraFrequency.run(&dataset, &Filters::default()).unwrap();

    let table = output.table("frequencia_pedra").unwrap();
    assert_eq!(table.frame.height(), 3);
    assert_eq!(f64_at(&table.frame, "Quartzo", 0), Some(2.0));
    // the #NULO! tier of 2021 is not counted
    assert_eq!(f64_at(&table.frame, "Quartzo", 1), Some(0.0));
    assert_eq!(f64_at(&table.frame, "Ágata", 1), Some(2.0));

    assert_eq!(output.metric("Total Topázio").unwrap().value, "4");
    assert_eq!(output.metric("Total Quartzo").unwrap().value, "3");
}

#[test]
fn test_every_view_runs_with_defaults() {
    let (_dir, dataset) = fixture_dataset();
    for view in View::ALL {
        let output = view.run(&dataset, &Filters::default()).unwrap();
        assert_eq!(output.view, view);
        assert!(!output.tables.is_empty(), "{} has no table", view.slug());
        assert!(!output.charts.is_empty(), "{} has no chart", view.slug());
    }
}
