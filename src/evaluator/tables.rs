use std::fs::File;

use eval_core::{SCORE_MAX, TABLE3_SIZE, TABLE5_NODES, TABLE7_NODES};
use lazy_static::lazy_static;
use read_write::VecIO;

/// The precomputed transition tables, generated by the build script.
pub(crate) struct Tables {
    pub table7: Vec<u32>,
    pub table5: Vec<u32>,
    pub table3: Vec<i16>,
}

lazy_static! {
    /// Global read-only tables used for evaluation; loaded on first use and
    /// never mutated again.
    pub(crate) static ref TABLES: Tables = Tables::load();
}

impl Tables {
    /// Loads and validates the table file. Serving evaluations from a
    /// malformed table would silently misrank hands, so any mismatch is
    /// fatal.
    fn load() -> Tables {
        let path = concat!(env!("OUT_DIR"), "/", "poker.dat");
        let expected = (TABLE7_NODES * 52 + TABLE5_NODES * 52) * 4 + TABLE3_SIZE * 2;
        let mut f = File::open(path)
            .unwrap_or_else(|e| panic!("can't open table file {path}: {e}"));
        let size = f
            .metadata()
            .unwrap_or_else(|e| panic!("can't stat table file {path}: {e}"))
            .len();
        if size != expected as u64 {
            panic!("table file {path} has {size} bytes, want {expected}");
        }
        let tables = Tables {
            table7: f
                .read_vec_from_file(TABLE7_NODES * 52)
                .unwrap_or_else(|e| panic!("bad 7-card table in {path}: {e}")),
            table5: f
                .read_vec_from_file(TABLE5_NODES * 52)
                .unwrap_or_else(|e| panic!("bad 5-card table in {path}: {e}")),
            table3: f
                .read_vec_from_file(TABLE3_SIZE)
                .unwrap_or_else(|e| panic!("bad 3-card table in {path}: {e}")),
        };
        // root entries of the walk tables must exist for every legal card
        for table in [&tables.table7, &tables.table5] {
            if table[..52].iter().any(|&v| v == 0) {
                panic!("table file {path} has unreachable root edges");
            }
        }
        if tables.table3.iter().any(|&v| v < 0 || v > SCORE_MAX as i16) {
            panic!("table file {path} has out of range 3-card ranks");
        }
        tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_load_and_validate() {
        assert_eq!(TABLES.table7.len(), TABLE7_NODES * 52);
        assert_eq!(TABLES.table5.len(), TABLE5_NODES * 52);
        assert_eq!(TABLES.table3.len(), TABLE3_SIZE);
    }
}
