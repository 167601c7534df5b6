use rand::SeedableRng;
use rand::rngs::StdRng;
use rask_log_producer::domain::LogLevel;
use rask_log_producer::generator::{Catalog, CatalogEntry, EventGenerator, GeneratorConfig};
use std::collections::HashMap;

fn default_generator() -> EventGenerator {
    EventGenerator::new(GeneratorConfig::default(), Catalog::default()).unwrap()
}

#[test]
fn test_every_event_is_well_formed() {
    let generator = default_generator();

    for _ in 0..1_000 {
        let event = generator.generate();
        assert!(!event.service().is_empty());
        assert!(LogLevel::ALL.contains(&event.level()));
        assert!(!event.message().is_empty());
        assert_eq!(event.metadata().get("env").map(String::as_str), Some("production"));
    }
}

#[test]
fn test_events_come_from_the_catalog() {
    let generator = default_generator();
    let known: Vec<(LogLevel, String)> = generator
        .catalog()
        .entries()
        .iter()
        .map(|e| (e.level, e.message.clone()))
        .collect();

    for _ in 0..200 {
        let event = generator.generate();
        assert!(known.contains(&(event.level(), event.message().to_string())));
    }
}

#[test]
fn test_level_tally_converges_to_catalog_distribution() {
    let generator = default_generator();
    let expected = generator.catalog().level_distribution();
    let mut rng = StdRng::seed_from_u64(2024);

    let draws = 20_000;
    let mut tally: HashMap<LogLevel, usize> = HashMap::new();
    for _ in 0..draws {
        *tally.entry(generator.generate_with(&mut rng).level()).or_insert(0) += 1;
    }

    for (level, share) in expected {
        let observed = tally.get(&level).copied().unwrap_or(0) as f64 / draws as f64;
        assert!(
            (observed - share).abs() < 0.02,
            "{level}: observed {observed}, expected {share}"
        );
    }
}

#[test]
fn test_seeded_generation_is_reproducible() {
    let generator = default_generator();
    let mut a = StdRng::seed_from_u64(99);
    let mut b = StdRng::seed_from_u64(99);

    for _ in 0..50 {
        assert_eq!(generator.generate_with(&mut a), generator.generate_with(&mut b));
    }
}

#[test]
fn test_extra_metadata_is_attached() {
    let mut metadata = HashMap::new();
    metadata.insert("region".to_string(), "us-east-1".to_string());
    let config = GeneratorConfig {
        service_name: "go-demo-service".to_string(),
        metadata,
        ..Default::default()
    };
    let catalog = Catalog::new(vec![CatalogEntry::new(
        LogLevel::Debug,
        "Processing batch #992",
    )])
    .unwrap();

    let event = EventGenerator::new(config, catalog).unwrap().generate();

    assert_eq!(event.service(), "go-demo-service");
    assert_eq!(event.metadata()["region"], "us-east-1");
    assert_eq!(event.metadata()["env"], "production");
    assert_eq!(event.message(), "Processing batch #992");
}
