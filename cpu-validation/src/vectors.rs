//! Reading and writing test vector files: a JSON array of [`TestCase`],
//! gzip-compressed when the file name ends in `.gz`.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

use crate::TestCase;

fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "gz")
}

pub fn load_test_file(path: &Path) -> io::Result<Vec<TestCase>> {
    let file = BufReader::new(File::open(path)?);
    let reader: Box<dyn Read> = if is_gzip(path) {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };
    Ok(serde_json::from_reader(reader)?)
}

pub fn write_test_file(path: &Path, tests: &[TestCase]) -> io::Result<()> {
    let file = BufWriter::new(File::create(path)?);
    if is_gzip(path) {
        let mut encoder = GzEncoder::new(file, Compression::default());
        serde_json::to_writer(&mut encoder, tests)?;
        encoder.finish()?.flush()
    } else {
        let mut file = file;
        serde_json::to_writer_pretty(&mut file, tests)?;
        file.flush()
    }
}

/// Vector files (`*.json`, `*.json.gz`) in `dir`, sorted by name.
pub fn test_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".json") || n.ends_with(".json.gz"))
        })
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CpuState;

    fn sample() -> Vec<TestCase> {
        let state = CpuState {
            pc: 0x4000,
            s: 0x1234,
            u: 0,
            a: 1,
            b: 2,
            dp: 3,
            x: 4,
            y: 5,
            cc: 0x50,
            ram: vec![(0x4000, 0x12)],
        };
        vec![TestCase {
            name: "12".to_string(),
            initial: state.clone(),
            final_state: CpuState { pc: 0x4001, ..state },
            cycles: vec![
                (0x4000, 0x12, "read".to_string()),
                (0xFFFF, 0, "internal".to_string()),
            ],
        }]
    }

    #[test]
    fn plain_and_gzip_files_load_back() {
        let dir = std::env::temp_dir().join(format!("dragon-vectors-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        for name in ["12.json", "12.json.gz"] {
            let path = dir.join(name);
            write_test_file(&path, &sample()).unwrap();
            let loaded = load_test_file(&path).unwrap();
            assert_eq!(loaded.len(), 1);
            assert_eq!(loaded[0].name, "12");
            assert_eq!(loaded[0].final_state.pc, 0x4001);
            assert_eq!(loaded[0].cycles[1].2, "internal");
        }
        fs::write(dir.join("notes.txt"), "x").unwrap();

        let files = test_files(&dir).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["12.json", "12.json.gz"]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn json_field_names() {
        let json = serde_json::to_value(&sample()[0]).unwrap();
        assert!(json.get("final").is_some());
        assert!(json.get("final_state").is_none());
        assert_eq!(json["initial"]["ram"][0], serde_json::json!([0x4000, 0x12]));
    }
}
