//! End-to-end tests for sanitize -> compile -> render

use super::*;
use serde_json::{Map, Value, json};

use compile::CompiledSearch;
use query::{IdQuery, Predicate};

fn raw(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {}", other),
    }
}

fn sanitized(value: Value) -> FilterParams {
    sanitize(&raw(value)).unwrap()
}

fn compiled(value: Value) -> CompiledSearch {
    compile(&ICONOGRAPHY, &sanitized(value))
}

fn ids_sql(search: &CompiledSearch) -> (String, Vec<SqlValue>) {
    let mut params = SqlParams::default();
    let sql = search.ids_to_sql(&mut params).unwrap();
    (sql, params.values)
}

fn text_array(values: &[&str]) -> SqlValue {
    SqlValue::TextArray(values.iter().map(|v| v.to_string()).collect())
}

const THEME_JOIN: &str = "JOIN r_iconography_theme AS theme_link \
     ON theme_link.id_iconography = iconography.id \
     JOIN theme ON theme.id = theme_link.id_theme";

// === Concrete scenarios ===

#[test]
fn test_title_values_are_ored_inside_one_predicate() {
    let search = compiled(json!({"title": ["bourse", "théâtre"]}));
    let (sql, values) = ids_sql(&search);

    assert_eq!(
        sql,
        "SELECT DISTINCT iconography.id FROM iconography \
         JOIN title ON title.id_iconography = iconography.id \
         AND title.entry_name ILIKE ANY($1)"
    );
    assert_eq!(values, vec![text_array(&["%bourse%", "%théâtre%"])]);
    assert!(search.alternatives().is_empty());
}

#[test]
fn test_date_exact_matches_one_year_interval() {
    let search = compiled(json!({"date": [{"filter": "dateExact", "data": [1826]}]}));
    let (sql, values) = ids_sql(&search);

    assert_eq!(
        sql,
        "SELECT DISTINCT iconography.id FROM iconography \
         WHERE (iconography.date = int4range($1, $2, '[)'))"
    );
    assert_eq!(values, vec![SqlValue::Int(1826), SqlValue::Int(1827)]);
}

#[test]
fn test_theme_and_not_named_entity() {
    let search = compiled(json!({
        "theme": ["boutique"],
        "named_entity": ["Galerie Vivienne"],
        "named_entity_boolean_op": "not",
    }));
    let (sql, values) = ids_sql(&search);

    assert_eq!(
        sql,
        format!(
            "SELECT DISTINCT iconography.id FROM iconography {THEME_JOIN} \
             AND theme.entry_name = ANY($1) \
             WHERE iconography.id NOT IN (SELECT DISTINCT iconography.id FROM iconography \
             JOIN r_iconography_named_entity AS named_entity_link \
             ON named_entity_link.id_iconography = iconography.id \
             JOIN named_entity ON named_entity.id = named_entity_link.id_named_entity \
             AND named_entity.entry_name = ANY($2))"
        )
    );
    assert_eq!(
        values,
        vec![text_array(&["boutique"]), text_array(&["Galerie Vivienne"])]
    );
    assert_eq!(search.excluded(), &[Field::NamedEntity]);
}

#[test]
fn test_all_or_is_anchored_on_institution() {
    let params = sanitized(json!({
        "institution": ["Paris Musées"],
        "institution_boolean_op": "or",
        "theme": ["mobilier urbain"],
        "theme_boolean_op": "or",
        "title": ["mode"],
        "title_boolean_op": "or",
    }));
    assert_eq!(params.operator(Field::Institution), Some(BooleanOp::And));
    assert_eq!(params.operator(Field::Theme), Some(BooleanOp::Or));
    assert_eq!(params.operator(Field::Title), Some(BooleanOp::Or));

    let search = compile(&ICONOGRAPHY, &params);
    let alternatives: Vec<Field> = search.alternatives().iter().map(|(f, _)| *f).collect();
    assert_eq!(alternatives, vec![Field::Title, Field::Theme]);

    let (sql, values) = ids_sql(&search);
    assert_eq!(
        sql,
        format!(
            "SELECT DISTINCT iconography.id FROM iconography \
             JOIN r_institution AS institution_link \
             ON institution_link.id_iconography = iconography.id \
             JOIN institution ON institution.id = institution_link.id_institution \
             AND institution.entry_name = ANY($1) \
             UNION (SELECT DISTINCT iconography.id FROM iconography \
             JOIN title ON title.id_iconography = iconography.id \
             AND title.entry_name ILIKE ANY($2)) \
             UNION (SELECT DISTINCT iconography.id FROM iconography {THEME_JOIN} \
             AND theme.entry_name = ANY($3))"
        )
    );
    assert_eq!(
        values,
        vec![
            text_array(&["Paris Musées"]),
            text_array(&["%mode%"]),
            text_array(&["mobilier urbain"]),
        ]
    );
}

#[test]
fn test_inclusive_interval_scenario() {
    let interval = inclusive_to_interval(&[1800, 1810]).unwrap().unwrap();
    assert_eq!((interval.lower(), interval.upper()), (1800, 1811));
    assert_eq!(interval_to_inclusive(Some(&interval)), Some([1800, 1810]));
}

// === Rendering ===

#[test]
fn test_empty_params_select_everything() {
    let prepared = prepare(&ICONOGRAPHY, &FilterParams::default());
    assert!(prepared.sql.starts_with("SELECT iconography.id, iconography.id_uuid"));
    assert!(prepared.sql.ends_with("FROM iconography ORDER BY iconography.id"));
    assert!(!prepared.sql.contains("WHERE iconography.id IN"));
    assert!(prepared.values.is_empty());
}

#[test]
fn test_full_statement_wraps_distinct_ids() {
    let prepared = prepare(&ICONOGRAPHY, &sanitized(json!({"title": ["bourse"]})));
    assert!(prepared.sql.starts_with("SELECT iconography.id, "));
    assert!(prepared.sql.contains("AS main_title"));
    assert!(prepared.sql.ends_with(
        "FROM iconography WHERE iconography.id IN (SELECT DISTINCT iconography.id \
         FROM iconography JOIN title ON title.id_iconography = iconography.id \
         AND title.entry_name ILIKE ANY($1)) ORDER BY iconography.id"
    ));
    assert_eq!(prepared.values.len(), 1);
}

#[test]
fn test_placeholders_match_bind_count() {
    let prepared = prepare(
        &ICONOGRAPHY,
        &sanitized(json!({
            "author": ["Jules David"],
            "publisher": ["Aubert"],
            "publisher_boolean_op": "or",
            "theme": ["mode"],
            "theme_boolean_op": "not",
            "date": [
                {"filter": "dateRange", "data": [1815, 1820]},
                {"filter": "dateAfter", "data": [1850]},
            ],
        })),
    );
    for n in 1..=prepared.values.len() {
        assert!(prepared.sql.contains(&format!("${}", n)), "missing ${}", n);
    }
    let next = format!("${}", prepared.values.len() + 1);
    assert!(!prepared.sql.contains(&next));
}

// === AND narrows, OR widens, NOT excludes ===

fn base(search: &CompiledSearch) -> &IdQuery {
    search.base().unwrap()
}

#[test]
fn test_and_adds_joins_to_base() {
    let alone = compiled(json!({"title": ["bourse"]}));
    let narrowed = compiled(json!({"title": ["bourse"], "theme": ["boutique"]}));

    assert_eq!(base(&narrowed).joins[..1], base(&alone).joins[..]);
    assert_eq!(base(&narrowed).joins.len(), base(&alone).joins.len() + 2);
    assert!(narrowed.alternatives().is_empty());
}

#[test]
fn test_or_leaves_base_untouched() {
    let alone = compiled(json!({"title": ["bourse"]}));
    let widened = compiled(json!({
        "title": ["bourse"],
        "theme": ["boutique"],
        "theme_boolean_op": "or",
    }));

    assert_eq!(base(&widened), base(&alone));
    assert_eq!(widened.alternatives().len(), 1);
    assert_eq!(widened.alternatives()[0].0, Field::Theme);
}

#[test]
fn test_not_excludes_from_base() {
    let alone = compiled(json!({"title": ["bourse"]}));
    let excluded = compiled(json!({
        "title": ["bourse"],
        "theme": ["boutique"],
        "theme_boolean_op": "not",
    }));

    assert_eq!(base(&excluded).joins, base(&alone).joins);
    assert!(matches!(
        base(&excluded).filters.as_slice(),
        [Predicate::NotIn(id, _)] if *id == base(&alone).id
    ));
}

#[test]
fn test_only_not_excludes_from_whole_collection() {
    let search = compiled(json!({"theme": ["boutique"], "theme_boolean_op": "not"}));
    let (sql, _) = ids_sql(&search);
    assert!(sql.starts_with("SELECT DISTINCT iconography.id FROM iconography WHERE iconography.id NOT IN ("));
}

#[test]
fn test_or_with_not_unions_onto_excluded_collection() {
    let search = compiled(json!({
        "theme": ["boutique"],
        "theme_boolean_op": "or",
        "institution": ["Paris Musées"],
        "institution_boolean_op": "not",
    }));

    assert!(base(&search).joins.is_empty());
    assert!(matches!(
        base(&search).filters.as_slice(),
        [Predicate::NotIn(_, _)]
    ));
    assert_eq!(search.excluded(), &[Field::Institution]);
    assert_eq!(search.alternatives().len(), 1);
    assert_eq!(search.alternatives()[0].0, Field::Theme);
}

#[test]
fn test_ids_are_distinct_in_every_branch() {
    let search = compiled(json!({
        "title": ["bourse"],
        "theme": ["boutique"],
        "theme_boolean_op": "or",
        "named_entity": ["Galerie Vivienne"],
        "named_entity_boolean_op": "not",
    }));
    let (sql, _) = ids_sql(&search);
    assert_eq!(sql.matches("SELECT DISTINCT").count(), 3);
    assert_eq!(sql.matches("SELECT ").count(), 3);
}

// === Sanitizer properties ===

#[test]
fn test_unknown_keys_are_rejected() {
    for key in [
        "foo",
        "Title",
        "titles",
        "title_op",
        "title_boolean_op_",
        "date_boolean",
        "quicksearch",
        "",
    ] {
        let mut params = raw(json!({"title": ["bourse"]}));
        params.insert(key.to_string(), json!(["x"]));
        let err = sanitize(&params).unwrap_err();
        assert_eq!(err, SearchError::InvalidParameterName(key.to_string()));
    }
}

#[test]
fn test_sanitize_is_idempotent() {
    let inputs = [
        json!({}),
        json!({"title": ["  La  BOURSE ", "100%"], "author": ["Jules_David"]}),
        json!({
            "theme": [" boutique ", "boutique"],
            "named_entity": ["Galerie Vivienne"],
            "named_entity_boolean_op": "NOT",
        }),
        json!({
            "institution": ["Paris Musées"],
            "institution_boolean_op": "or",
            "title": ["mode"],
            "title_boolean_op": "or",
        }),
        json!({"date": [
            {"filter": "dateRange", "data": ["1830", 1815]},
            {"filter": "dateBefore", "data": [1800]},
            {"filter": "dateAfter", "data": []},
        ], "date_boolean_op": "or"}),
    ];
    for input in inputs {
        let once = sanitized(input);
        let twice = sanitize(&once.to_raw()).unwrap();
        assert_eq!(twice, once);
    }
}

#[test]
fn test_coherence_leaves_and_untouched() {
    let params = sanitized(json!({
        "title": ["mode"],
        "title_boolean_op": "or",
        "theme": ["boutique"],
        "publisher": ["Aubert"],
        "publisher_boolean_op": "or",
    }));
    assert_eq!(params.operator(Field::Title), Some(BooleanOp::Or));
    assert_eq!(params.operator(Field::Theme), Some(BooleanOp::And));
    assert_eq!(params.operator(Field::Publisher), Some(BooleanOp::Or));
}

#[test]
fn test_coherence_rewrites_exactly_one_or() {
    let params = sanitized(json!({
        "title": ["mode"],
        "title_boolean_op": "or",
        "author": ["Jules David"],
        "author_boolean_op": "or",
        "date": [{"filter": "dateExact", "data": [1826]}],
        "date_boolean_op": "or",
    }));
    let ands: Vec<Field> = Field::ALL
        .into_iter()
        .filter(|f| params.operator(*f) == Some(BooleanOp::And))
        .collect();
    assert_eq!(ands, vec![Field::Author]);
}

#[test]
fn test_empty_field_does_not_participate() {
    let search = compiled(json!({
        "title": ["   "],
        "title_boolean_op": "not",
        "theme": ["boutique"],
    }));
    assert!(search.excluded().is_empty());
    let (sql, _) = ids_sql(&search);
    assert!(!sql.contains("title"));
}

// === Date intervals ===

#[test]
fn test_inclusive_round_trip() {
    for a in [-500, 0, 1799, 1800, 1826] {
        for width in [0, 1, 10, 200] {
            let b = a + width;
            let interval = inclusive_to_interval(&[a, b]).unwrap();
            assert_eq!(interval_to_inclusive(interval.as_ref()), Some([a, b]));
        }
    }
}

#[test]
fn test_date_range_sanitized_to_half_open() {
    let params = sanitized(json!({"date": [{"filter": "dateRange", "data": [1815, 1820]}]}));
    let dates = params.dates().unwrap();
    assert_eq!(
        dates.filters,
        vec![DateFilter::Range(DateInterval::new(1815, 1821).unwrap())]
    );
}
