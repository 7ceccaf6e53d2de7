use super::*;

use std::collections::HashSet;

use rand::Rng;

use crate::io::{FlatFile, HEADER};

fn record(engine_number: &str, brand: &str) -> Record {
    Record::new("2024-06-01", "New", brand, engine_number, "On-hand")
}

fn sorted_keys(inventory: &Inventory) -> Vec<String> {
    inventory
        .list_sorted()
        .into_iter()
        .map(|record| record.engine_number().to_string())
        .collect()
}

#[test]
fn it_lists_records_sorted() {
    let mut inventory = Inventory::new();
    for key in ["E100", "E050", "E075"] {
        inventory.add(record(key, "Honda")).expect("adds");
    }
    assert_eq!(sorted_keys(&inventory), vec!["E050", "E075", "E100"]);
    let descending: Vec<&str> = inventory
        .records(Direction::Descending)
        .map(Record::engine_number)
        .collect();
    assert_eq!(descending, vec!["E100", "E075", "E050"]);
}

#[test]
fn it_fails_to_delete_from_empty_inventory() {
    let mut inventory = Inventory::new();
    assert_eq!(
        inventory.delete("missing"),
        Err(StoreError::NotFound("missing".to_string()))
    );
    assert!(inventory.is_empty());
    inventory.verify().expect("still valid");
}

#[test]
fn it_rejects_duplicate_engine_numbers() {
    let mut inventory = Inventory::new();
    inventory.add(record("E100", "Honda")).expect("adds");
    inventory.add(record("E050", "Honda")).expect("adds");
    let before = sorted_keys(&inventory);

    assert_eq!(
        inventory.add(record("E100", "Yamaha")),
        Err(StoreError::DuplicateKey("E100".to_string()))
    );

    assert_eq!(sorted_keys(&inventory), before);
    assert_eq!(inventory.len(), 2);
    assert_eq!(inventory.get("E100").map(Record::brand), Ok("Honda"));
    inventory.verify().expect("still valid");
}

#[test]
fn it_gets_records() {
    let mut inventory = Inventory::new();
    inventory.add(record("E100", "Honda")).expect("adds");
    assert_eq!(inventory.get("E100"), Ok(&record("E100", "Honda")));
    assert!(inventory.contains("E100"));
    assert_eq!(
        inventory.get("E101"),
        Err(StoreError::NotFound("E101".to_string()))
    );
}

#[test]
fn it_deletes_records() {
    let mut inventory = Inventory::new();
    inventory.add(record("E100", "Honda")).expect("adds");
    inventory.add(record("E200", "Suzuki")).expect("adds");
    assert_eq!(inventory.delete("E100"), Ok(record("E100", "Honda")));
    assert!(!inventory.contains("E100"));
    assert!(inventory.get("E100").is_err());
    assert_eq!(sorted_keys(&inventory), vec!["E200"]);
    inventory.verify().expect("valid");
}

#[test]
fn it_replaces_by_delete_and_add() {
    let mut inventory = Inventory::new();
    inventory.add(record("E100", "Honda")).expect("adds");
    inventory.delete("E100").expect("deletes");
    inventory
        .add(Record::new("2024-06-02", "Used", "Honda", "E100", "Sold"))
        .expect("adds");
    assert_eq!(inventory.get("E100").map(Record::status), Ok("Sold"));
    assert_eq!(inventory.len(), 1);
}

#[test]
fn it_finds_by_brand_ignoring_case() {
    let mut inventory = Inventory::new();
    inventory.add(record("E300", "Honda")).expect("adds");
    inventory.add(record("E100", "HONDA")).expect("adds");
    inventory.add(record("E200", "Yamaha")).expect("adds");

    let found: Vec<&str> = inventory
        .find_by_brand("honda")
        .into_iter()
        .map(Record::engine_number)
        .collect();
    assert_eq!(found, vec!["E100", "E300"]);
    assert!(inventory.find_by_brand("Kawasaki").is_empty());
}

#[test]
fn it_balances_increasing_engine_numbers() {
    let mut inventory = Inventory::new();
    for i in 1..=7 {
        inventory
            .add(record(&format!("E{i:03}"), "Honda"))
            .expect("adds");
    }
    assert!(inventory.ordered.height() <= 3);
    inventory.verify().expect("valid");
}

#[test_log::test]
fn it_keeps_indexes_in_step() {
    let mut rng = rand::thread_rng();
    let mut inventory = Inventory::new();
    for _i in 0..1_000 {
        let key = format!("E{:04}", rng.gen_range(0..300));
        if rng.gen_bool(0.5) {
            let present = inventory.contains(&key);
            assert_eq!(inventory.add(record(&key, "Honda")).is_err(), present);
        } else {
            let present = inventory.contains(&key);
            assert_eq!(inventory.delete(&key).is_ok(), present);
        }

        let ordered: HashSet<String> = sorted_keys(&inventory).into_iter().collect();
        let lookup: HashSet<String> = inventory.lookup.keys().cloned().collect();
        assert_eq!(ordered, lookup);
        inventory.verify().expect("valid");
    }
    let keys = sorted_keys(&inventory);
    assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
    inventory.info();
}

#[test]
fn it_reports_diverged_indexes() {
    let mut inventory = Inventory::new();
    inventory.add(record("E100", "Honda")).expect("adds");
    inventory
        .lookup
        .put("E100".to_string(), Arc::new(record("E100", "Yamaha")));
    assert!(matches!(
        inventory.verify(),
        Err(StoreError::Inconsistent(_))
    ));
    inventory.lookup.remove("E100");
    assert!(matches!(
        inventory.verify(),
        Err(StoreError::Inconsistent(_))
    ));
}

#[test]
fn it_keeps_first_duplicate_from_records() {
    let (inventory, duplicates) = Inventory::from_records(vec![
        record("E100", "Honda"),
        record("E050", "Honda"),
        record("E100", "Yamaha"),
    ]);
    assert_eq!(duplicates, 1);
    assert_eq!(inventory.len(), 2);
    assert_eq!(inventory.get("E100").map(Record::brand), Ok("Honda"));
}

#[test_log::test]
fn it_opens_and_saves_inventory() {
    let path = Path::new("store_open_save.csv");
    std::fs::write(
        path,
        format!("{HEADER}\nd,l,Honda,E100,s\na,b,c\nd,l,Suzuki,E050,s\nd,l,Kawasaki,E100,s\n"),
    )
    .expect("writes");

    let opened = Inventory::open(&FlatFile, path);
    assert_eq!(opened.skipped, 1);
    assert_eq!(opened.duplicates, 1);
    let inventory = opened.inventory;
    assert_eq!(sorted_keys(&inventory), vec!["E050", "E100"]);

    FlatFile
        .save(path, inventory.list_sorted())
        .expect("saves");
    let reopened = Inventory::open(&FlatFile, path);
    assert_eq!(reopened.skipped, 0);
    assert_eq!(reopened.duplicates, 0);
    assert_eq!(
        reopened.inventory.list_sorted(),
        inventory.list_sorted()
    );
    std::fs::remove_file(path).expect("cleanup");
}

#[test_log::test]
fn it_opens_missing_inventory_as_empty() {
    let path = Path::new("store_open_missing.csv");
    let _ = std::fs::remove_file(path);
    let opened = Inventory::open(&FlatFile, path);
    assert!(opened.inventory.is_empty());
    assert_eq!(opened.error, None);
    assert!(path.exists());
    std::fs::remove_file(path).expect("cleanup");
}

#[test_log::test]
fn it_reports_unreadable_inventory() {
    let opened = Inventory::open(&FlatFile, "src");
    assert!(opened.inventory.is_empty());
    assert!(opened.error.is_some());
}
