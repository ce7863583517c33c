use super::*;
use crate::storage::{Database, Schema};

async fn seeded() -> SqliteCatalogue {
    let catalogue = SqliteCatalogue::new(Database::open_in_memory(Schema::Catalogue).unwrap());
    catalogue
        .insert_descriptor(
            "Mathematics",
            "Resources",
            "recognise",
            "basic",
            "identifies numeric patterns",
        )
        .await
        .unwrap();
    catalogue
        .insert_descriptor(
            "Mathematics",
            "Self-regulation",
            "reflect",
            "advanced",
            "struggles with abstraction",
        )
        .await
        .unwrap();
    catalogue
        .insert_descriptor("History", "Interpretation", "compare", "basic", "compares sources")
        .await
        .unwrap();
    catalogue
}

#[tokio::test]
async fn test_descriptors_for_discipline() {
    let catalogue = seeded().await;
    let rows = catalogue.descriptors_for("Mathematics").await.unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|d| d.discipline == "Mathematics"));
    assert_eq!(rows[0].text, "identifies numeric patterns");
    assert_eq!(rows[0].process_verb, "recognise");
}

#[tokio::test]
async fn test_unknown_or_empty_discipline_is_empty_not_error() {
    let catalogue = seeded().await;
    assert!(catalogue.descriptors_for("Art").await.unwrap().is_empty());
    assert!(catalogue.descriptors_for("").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_disciplines_and_dimensions_are_distinct() {
    let catalogue = seeded().await;
    assert_eq!(
        catalogue.disciplines().await.unwrap(),
        vec!["History".to_string(), "Mathematics".to_string()]
    );
    assert_eq!(
        catalogue.dimensions().await.unwrap(),
        vec![
            "Interpretation".to_string(),
            "Resources".to_string(),
            "Self-regulation".to_string()
        ]
    );
}

#[tokio::test]
async fn test_ensure_discipline_reuses_existing_row() {
    let catalogue = seeded().await;
    let first = catalogue.ensure_discipline("Mathematics").await.unwrap();
    let second = catalogue.ensure_discipline("Mathematics").await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_memory_catalogue_filters_and_fails_on_demand() {
    let catalogue = MemoryCatalogue::new(vec![
        MemoryCatalogue::descriptor(1, "Mathematics", "a"),
        MemoryCatalogue::descriptor(2, "Art", "b"),
    ]);
    assert_eq!(catalogue.descriptors_for("Art").await.unwrap().len(), 1);
    assert_eq!(catalogue.load_count(), 1);

    catalogue.fail_reads();
    assert!(catalogue.descriptors_for("Art").await.is_err());
}

#[test]
fn test_descriptor_id_key() {
    let d = MemoryCatalogue::descriptor(42, "Mathematics", "x");
    assert_eq!(d.id_key(), "42");
}
