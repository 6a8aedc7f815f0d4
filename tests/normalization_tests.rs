// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Grade-report normalization against the response shapes SUAP has served.

use serde_json::{json, Value};
use suap_boletim::models::grade::{DEFAULT_COURSE, DEFAULT_FINAL_AVERAGE, DEFAULT_STATUS};
use suap_boletim::models::{aggregate, normalize_grade_records, GradeRecord};

/// Current v2 shape: flat row with structured per-stage grades.
fn v2_row() -> Value {
    json!({
        "codigo_diario": "98765",
        "disciplina": "TEC.0025 - Programação Orientada a Objetos",
        "segundo_semestre": false,
        "carga_horaria": 120,
        "carga_horaria_cumprida": 60,
        "numero_faltas": 6,
        "percentual_carga_horaria_frequentada": 90,
        "situacao": "Cursando",
        "quantidade_avaliacoes": 4,
        "nota_etapa_1": {"nota": 7.5, "faltas": 2},
        "nota_etapa_2": {"nota": 8, "faltas": 4},
        "nota_etapa_3": {"nota": null, "faltas": 0},
        "nota_etapa_4": {"nota": null, "faltas": 0},
        "media_disciplina": null,
        "nota_avaliacao_final": {"nota": null, "faltas": 0},
        "media_final_disciplina": null
    })
}

/// Older shape: workload nested under the diary, counters as strings.
fn nested_row() -> Value {
    json!({
        "diario": {
            "id": 555,
            "disciplina": {"descricao": "Física I", "carga_horaria": "90"}
        },
        "aulas_dadas": "30",
        "faltas": "3",
        "nota_etapa_1": "6,5",
        "media_final": "6,5",
        "situacao_disciplina": "Aprovado"
    })
}

/// Sparse row: nothing but a course label and a total.
fn sparse_row() -> Value {
    json!({"descricao": "Educação Física", "ch_total": 30.0})
}

#[test]
fn test_v2_row() {
    let records = normalize_grade_records(&[v2_row()]);
    let record = &records[0];

    assert_eq!(record.course, "TEC.0025 - Programação Orientada a Objetos");
    assert_eq!(record.workload_hours, 120);
    assert_eq!(record.classes_held, 60);
    assert_eq!(record.absences, 6);
    assert_eq!(record.grade_for(1), Some("7.5"));
    assert_eq!(record.grade_for(2), Some("8"));
    assert_eq!(record.grade_for(3), None);
    assert_eq!(record.final_average, DEFAULT_FINAL_AVERAGE);
    assert_eq!(record.status, "Cursando");
}

#[test]
fn test_nested_row() {
    let records = normalize_grade_records(&[nested_row()]);
    let record = &records[0];

    assert_eq!(record.course, "Física I");
    assert_eq!(record.workload_hours, 90);
    assert_eq!(record.classes_held, 30);
    assert_eq!(record.absences, 3);
    assert_eq!(record.grade_for(1), Some("6,5"));
    assert_eq!(record.final_average, "6,5");
    assert_eq!(record.status, "Aprovado");
}

#[test]
fn test_sparse_row_gets_defaults() {
    let records = normalize_grade_records(&[sparse_row()]);
    let record = &records[0];

    assert_eq!(record.course, "Educação Física");
    assert_eq!(record.workload_hours, 30);
    assert_eq!(record.classes_held, 0);
    assert_eq!(record.absences, 0);
    assert!(record.grades.is_empty());
    assert_eq!(record.status, DEFAULT_STATUS);
}

#[test]
fn test_garbage_fields_read_as_absent() {
    let records = normalize_grade_records(&[json!({
        "disciplina": {"unexpected": true},
        "carga_horaria": "a lot",
        "ch_total": 45,
        "numero_faltas": -3,
        "situacao": ""
    })]);
    let record = &records[0];

    assert_eq!(record.course, DEFAULT_COURSE);
    assert_eq!(record.workload_hours, 45);
    assert_eq!(record.absences, 0);
    assert_eq!(record.status, DEFAULT_STATUS);
}

#[test]
fn test_mixed_shapes_aggregate() {
    let records = normalize_grade_records(&[v2_row(), nested_row(), sparse_row()]);
    let totals = aggregate(&records);

    assert_eq!(totals.workload_total, 120 + 90 + 30);
    assert_eq!(totals.classes_held_total, 60 + 30);
    assert_eq!(totals.absences_total, 6 + 3);
    assert!((totals.attendance_pct - 90.0).abs() < 1e-9);
}

#[test]
fn test_aggregate_ignores_order() {
    let mut records: Vec<GradeRecord> =
        normalize_grade_records(&[v2_row(), nested_row(), sparse_row()]);
    let forward = aggregate(&records);
    records.reverse();
    assert_eq!(aggregate(&records), forward);
}
