//! Rule-table resolution: detected type → conversion rule-table path.
//!
//! Pure path construction. The table is not opened or checked here; a
//! missing table surfaces when the converter tries to read it.

use crate::pipeline::detect::DetectedType;
use std::path::{Path, PathBuf};

/// `<base_dir>/csv/ms_conversions_<type>.csv`
pub fn rule_table_path(base_dir: &Path, detected: &DetectedType) -> PathBuf {
    rule_tables::table_path(&base_dir.join(rule_tables::RULES_DIR), detected.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_path_under_rules_dir() {
        let t = DetectedType::from_file_name("scan.prz");
        let p = rule_table_path(Path::new("/opt/reader"), &t);
        assert_eq!(p, PathBuf::from("/opt/reader/csv/ms_conversions_prz.csv"));
    }

    #[test]
    fn resolution_is_idempotent() {
        let base = Path::new("/srv/bin");
        for name in ["a.emd", "b.prz", "noext"] {
            let t = DetectedType::from_file_name(name);
            assert_eq!(rule_table_path(base, &t), rule_table_path(base, &t));
        }
    }

    #[test]
    fn empty_type_still_resolves() {
        let t = DetectedType::from_file_name("README");
        let p = rule_table_path(Path::new("/x"), &t);
        assert!(p.ends_with("ms_conversions_.csv"));
    }

    #[test]
    fn does_not_touch_the_file_system() {
        let tmp = tempfile::tempdir().unwrap();
        let t = DetectedType::from_file_name("scan.emd");
        let p = rule_table_path(tmp.path(), &t);
        assert!(!p.exists());
        assert!(!tmp.path().join("csv").exists());
    }
}
