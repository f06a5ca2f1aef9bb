//! Builds the flat evaluation tables and persists them as a single binary
//! file, meant to be driven from a build script. The file concatenates the
//! 7-card table (`u32`), the 5-card table (`u32`) and the 3-card table
//! (`i16`), all little-endian.

use std::fs::{self, File};
use std::io::Result;
use std::path::Path;
use std::time::Instant;

use log::info;
use read_write::VecIO;

use eval_core::{eval_slow, Card, Suit, TABLE3_SIZE, TABLE5_NODES, TABLE7_NODES};

mod tree;

/// Name of the generated table file.
pub const TABLE_FILE: &str = "poker.dat";

/// Generates `poker.dat` in the given directory unless it already exists.
///
/// Panics if the build violates one of its invariants: serving evaluations
/// from a miscompiled table would be far worse than failing the build.
pub fn generate(out_dir: &Path) -> Result<()> {
    let path = out_dir.join(TABLE_FILE);
    if path.exists() {
        return Ok(());
    }

    let start = Instant::now();
    let t5 = tree::build_tree(5, None);
    assert_eq!(t5.len() / 52, TABLE5_NODES, "5-card table node count");
    info!("5-card table built after {:?}", start.elapsed());

    let t7 = tree::build_tree(7, Some(&t5));
    assert_eq!(t7.len() / 52, TABLE7_NODES, "7-card table node count");
    info!("7-card table built after {:?}", start.elapsed());

    let t3 = build_table3();

    // Write to a scratch name first so a partial file never looks valid.
    let tmp = out_dir.join(format!("{TABLE_FILE}.tmp"));
    {
        let mut f = File::create(&tmp)?;
        f.write_vec_to_file(&t7)?;
        f.write_vec_to_file(&t5)?;
        f.write_vec_to_file(&t3)?;
    }
    fs::rename(&tmp, &path)?;
    info!("tables written to {} after {:?}", path.display(), start.elapsed());
    Ok(())
}

/// The 3-card table holds the rank of every card triple at index
/// `r0 << 8 | r1 << 4 | r2` over the raw ranks. Suits don't matter for
/// 3-card hands, and neither does order, so fixed distinct suits cover
/// everything.
fn build_table3() -> Vec<i16> {
    let mut table = vec![0i16; TABLE3_SIZE];
    for a in 0..13u8 {
        let ca = Card::new(Suit::Club, a + 2).expect("rank in range");
        for b in 0..13u8 {
            let cb = Card::new(Suit::Diamond, b + 2).expect("rank in range");
            for c in 0..13u8 {
                let cc = Card::new(Suit::Heart, c + 2).expect("rank in range");
                let rank = eval_slow(&[ca, cb, cc]).expect("3-card eval");
                table[usize::from(a) << 8 | usize::from(b) << 4 | usize::from(c)] = rank as i16;
            }
        }
    }
    table
}
