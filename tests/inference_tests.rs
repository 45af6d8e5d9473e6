//! Sampling and inference over real files

use std::fs;
use std::path::{Path, PathBuf};

use csv_schema_sdk::inference::{ColumnType, InferenceConfig, InferenceError, InferenceEvent};
use csv_schema_sdk::models::Table;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn column_type(table: &Table, name: &str) -> Option<ColumnType> {
    table
        .columns()
        .get_by_name(name)
        .unwrap()
        .values()
        .inferred_type()
}

mod sampling_tests {
    use super::*;

    #[test]
    fn test_header_names_and_types() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "orders.csv",
            "order_id,qty,price,code,comment\n\
             1,3,9.99,007,first\n\
             2,1,10,012,\\N\n\
             3,8,0.5,100,1.2.3\n",
        );

        let mut table = Table::for_source(&path, "staging", InferenceConfig::default()).unwrap();
        table.sample().unwrap();

        assert_eq!(table.name(), "orders");
        assert_eq!(table.rows().len(), 3);
        assert_eq!(column_type(&table, "order_id"), Some(ColumnType::Integer));
        assert_eq!(column_type(&table, "qty"), Some(ColumnType::Integer));
        assert_eq!(column_type(&table, "price"), Some(ColumnType::Decimal));
        assert_eq!(column_type(&table, "code"), Some(ColumnType::Decimal));
        assert_eq!(column_type(&table, "comment"), Some(ColumnType::Text));

        let comment = table.columns().get_by_name("comment").unwrap();
        assert!(comment.values().is_nullable());
        assert!(!table.columns().get_by_name("qty").unwrap().values().is_nullable());
    }

    #[test]
    fn test_synthesized_names_keep_first_row() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "raw.txt", "1,a\n2,b\n");
        let config = InferenceConfig::builder().has_header(false).build();

        let mut table = Table::for_source(&path, "staging", config).unwrap();
        table.sample().unwrap();

        assert_eq!(table.columns().names(), vec!["c_0", "c_1"]);
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.rows()[0], vec!["1".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_sample_size_caps_data_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "many.csv", "n\n1\n2\n3\n4\n5\n");
        let config = InferenceConfig::builder().sample_size(2).build();

        let mut table = Table::for_source(&path, "staging", config).unwrap();
        table.sample().unwrap();
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.columns().get(0).unwrap().values().len(), 2);
    }

    #[test]
    fn test_zero_sample_size_reads_everything() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "all.csv", "n\n1\n2\n3\n");
        let config = InferenceConfig::builder().sample_size(0).build();

        let mut table = Table::for_source(&path, "staging", config).unwrap();
        table.sample().unwrap();
        assert_eq!(table.rows().len(), 3);
    }

    #[test]
    fn test_custom_delimiter_and_quote() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "semi.csv", "id;label\n1;'a;b'\n2;'c'\n");
        let config = InferenceConfig::builder()
            .delimiter(';')
            .quote('\'')
            .build();

        let mut table = Table::for_source(&path, "staging", config).unwrap();
        table.sample().unwrap();
        assert_eq!(table.rows()[0][1], "a;b");
    }

    #[test]
    fn test_quoted_fields_keep_delimiters() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "quoted.csv", "id,label\n1,\"x,y\"\n");

        let mut table = Table::for_source(&path, "staging", InferenceConfig::default()).unwrap();
        table.sample().unwrap();
        assert_eq!(table.rows()[0][1], "x,y");
        assert_eq!(column_type(&table, "label"), Some(ColumnType::Text));
    }

    #[test]
    fn test_events_record_rules() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "ev.csv", "v\n1\n2.5\n");

        let mut table = Table::for_source(&path, "staging", InferenceConfig::default()).unwrap();
        table.sample().unwrap();

        assert!(matches!(
            table.events()[0],
            InferenceEvent::Sampled { columns: 1, rows: 2 }
        ));
        assert!(table.events().iter().any(|e| matches!(
            e,
            InferenceEvent::RuleApplied { column, .. } if column == "v"
        )));
    }
}

mod error_tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = Table::for_source(
            dir.path().join("nope.csv"),
            "staging",
            InferenceConfig::default(),
        );
        assert!(matches!(result, Err(InferenceError::InputNotFound(_))));
    }

    #[test]
    fn test_directory_is_not_input() {
        let dir = TempDir::new().unwrap();
        let result = Table::for_source(dir.path(), "staging", InferenceConfig::default());
        assert!(matches!(result, Err(InferenceError::InputNotFound(_))));
    }

    #[test]
    fn test_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "empty.csv", "");
        let mut table = Table::for_source(&path, "staging", InferenceConfig::default()).unwrap();
        assert!(matches!(table.sample(), Err(InferenceError::EmptyInput(_))));
    }

    #[test]
    fn test_ragged_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "ragged.csv", "a,b\n1,2\n3\n");
        let mut table = Table::for_source(&path, "staging", InferenceConfig::default()).unwrap();
        assert!(matches!(table.sample(), Err(InferenceError::Csv { .. })));
    }

    #[test]
    fn test_empty_quoted_values_rejected() {
        let dir = TempDir::new().unwrap();
        // A quoted field holding two escaped quotes reads back as `""`
        let path = write_file(&dir, "dq.csv", "a,b\n1,\"\"\"\"\"\"\n2,x\n");
        let mut table = Table::for_source(&path, "staging", InferenceConfig::default()).unwrap();

        match table.sample() {
            Err(InferenceError::DataQuality { path: p, values }) => {
                assert_eq!(p, path_abs(&path));
                assert_eq!(values, vec!["\"\"".to_string()]);
            }
            other => panic!("Expected data quality error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_quoted_values_allowed_when_disabled() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "dq.csv", "a,b\n1,\"\"\"\"\"\"\n");
        let config = InferenceConfig::builder().validate_values(false).build();
        let mut table = Table::for_source(&path, "staging", config).unwrap();
        assert!(table.sample().is_ok());
    }

    #[test]
    fn test_invalid_delimiter() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "x.csv", "a\n1\n");
        let config = InferenceConfig::builder().delimiter('→').build();
        assert!(matches!(
            Table::for_source(&path, "staging", config),
            Err(InferenceError::InvalidConfig(_))
        ));
    }

    fn path_abs(path: &Path) -> PathBuf {
        std::path::absolute(path).unwrap()
    }
}

mod key_detection_tests {
    use super::*;

    #[test]
    fn test_single_key_column() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "tags.csv", "id,tag\n1,a\n2,b\n3,a\n");

        let table = Table::infer(&path, "staging", InferenceConfig::default()).unwrap();
        assert_eq!(table.primary_key_length(), Some(1));

        let id = table.columns().get_by_name("id").unwrap();
        assert_eq!(id.values().inferred_type(), Some(ColumnType::Text));
        assert!(!id.values().is_nullable());
        assert!(table.columns().get_by_name("tag").unwrap().values().is_nullable());
    }

    #[test]
    fn test_keyless_file() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "dupes.csv", "id,tag\n1,a\n1,a\n1,a\n");

        let table = Table::infer(&path, "staging", InferenceConfig::default()).unwrap();
        assert_eq!(table.primary_key_length(), None);
        assert!(table.primary_key_columns().is_empty());
        assert!(table.columns().iter().all(|c| c.values().is_nullable()));
        assert!(table
            .events()
            .iter()
            .any(|e| matches!(e, InferenceEvent::KeyNotFound { rows: 3 })));
    }

    #[test]
    fn test_zero_padded_key_survives_as_text() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "codes.csv", "code,city\n001,x\n002,y\n");

        let table = Table::infer(&path, "staging", InferenceConfig::default()).unwrap();
        assert_eq!(table.primary_key_length(), Some(1));
        assert_eq!(column_type(&table, "code"), Some(ColumnType::Text));
        assert!(table.events().contains(&InferenceEvent::KeyColumnCastToText {
            column: "code".to_string(),
            from: ColumnType::Decimal,
        }));
    }

    #[test]
    fn test_header_only_file_has_no_key() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "header.csv", "a,b\n");

        let table = Table::infer(&path, "staging", InferenceConfig::default()).unwrap();
        assert_eq!(table.columns().len(), 2);
        assert_eq!(table.primary_key_length(), None);
    }
}
