use entities::ENTITIES;
use std::io::Write;
use std::{env, path::PathBuf};

fn main() {
    let out_dir: PathBuf = env::var("OUT_DIR").unwrap().parse().unwrap();

    // The fragment parser hands entity::lookup the bare reference name, "amp"
    // for "&amp;". Only the terminated spellings are kept, sorted so lookups
    // can binary search; the longest name bounds how far a scan may look.
    let mut references = ENTITIES
        .iter()
        .filter(|e| e.entity.starts_with('&') && e.entity.ends_with(';'))
        .map(|e| (&e.entity[1..e.entity.len() - 1], e.characters))
        .collect::<Vec<_>>();
    references.sort_by_key(|(name, _characters)| *name);
    references.dedup_by_key(|(name, _characters)| *name);
    let longest = references
        .iter()
        .map(|(name, _characters)| name.len())
        .max()
        .unwrap_or(0);

    let out = std::fs::File::create(out_dir.join("entitydata.rs")).unwrap();
    let mut bw = std::io::BufWriter::new(out);
    writeln!(bw, "mod entitydata {{").unwrap();
    writeln!(bw, "    pub const MAX_NAME_LENGTH: usize = {};", longest).unwrap();
    writeln!(
        bw,
        "    pub static REFERENCES: &[(&str, &str); {}] = &[",
        references.len()
    )
    .unwrap();
    for (name, characters) in references {
        writeln!(bw, "        ({:?}, {:?}),", name, characters).unwrap();
    }
    writeln!(bw, "    ];").unwrap();
    writeln!(bw, "}}").unwrap();
}
