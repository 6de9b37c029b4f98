use lyrics_translit_rs::mapping::{FuriganaMapping, FuriganaMappingStore, JsonFileMappingStore};

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn json_store_round_trips_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mappings.json");

        let store = JsonFileMappingStore::open(&path).unwrap();
        assert_eq!(store.get("初音", "はつね").unwrap(), None);

        let mut row = FuriganaMapping::new("初音", "はつね");
        store.upsert(&row).unwrap();
        row.segmented_text = Some("初,音".into());
        row.segmented_furigana = Some("はつ,ね".into());
        store.upsert(&row).unwrap();

        // A fresh open sees the curated row.
        let reopened = JsonFileMappingStore::open(&path).unwrap();
        let loaded = reopened.get("初音", "はつね").unwrap().unwrap();
        assert_eq!(loaded.segmented_text.as_deref(), Some("初,音"));
        assert_eq!(loaded.segmented_furigana.as_deref(), Some("はつ,ね"));
    }

    #[test]
    fn file_on_disk_is_valid_json_after_every_upsert() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mappings.json");
        let store = JsonFileMappingStore::open(&path).unwrap();

        store.upsert(&FuriganaMapping::new("食べる", "たべる")).unwrap();
        store.upsert(&FuriganaMapping::new("初音", "はつね")).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let rows: Vec<FuriganaMapping> = serde_json::from_str(&raw).unwrap();
        assert_eq!(rows.len(), 2);
        // Rows are written in a stable order.
        assert_eq!(rows[0].text, "初音");
        assert_eq!(rows[1].text, "食べる");
    }

    #[test]
    fn upsert_replaces_the_existing_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mappings.json");
        let store = JsonFileMappingStore::open(&path).unwrap();

        store.upsert(&FuriganaMapping::new("初音", "はつね")).unwrap();
        let mut curated = FuriganaMapping::new("初音", "はつね");
        curated.segmented_text = Some("初,音".into());
        curated.segmented_furigana = Some("はつ,ね".into());
        store.upsert(&curated).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let rows: Vec<FuriganaMapping> = serde_json::from_str(&raw).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], curated);
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileMappingStore::open(dir.path().join("absent.json")).unwrap();
        assert_eq!(store.get("夢", "ゆめ").unwrap(), None);
    }
}
