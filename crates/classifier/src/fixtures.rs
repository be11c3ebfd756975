use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

const BINS: usize = 10;
const FRAMES: usize = 4;

fn frequency(bin: usize) -> f64 {
    100.0 * (bin + 1) as f64
}

/// Writes a table whose every frame has the given per-bin energy.
pub fn write_table(dir: &Path, name: &str, spectrum: &[f64; BINS]) -> PathBuf {
    let mut text = String::from("frequency");
    for frame in 0..FRAMES {
        text.push_str(&format!(",t{frame}"));
    }
    text.push('\n');
    for (bin, energy) in spectrum.iter().enumerate() {
        text.push_str(&format!("{}", frequency(bin)));
        for _ in 0..FRAMES {
            text.push_str(&format!(",{energy}"));
        }
        text.push('\n');
    }
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

/// Strong 200 Hz ring with `leak` spilling into 100 Hz.
pub fn low_tap(leak: f64) -> [f64; BINS] {
    let mut spectrum = [0.0; BINS];
    spectrum[0] = leak;
    spectrum[1] = 10.0;
    spectrum
}

/// Strong 900 Hz ring with `leak` spilling into 1000 Hz.
pub fn high_tap(leak: f64) -> [f64; BINS] {
    let mut spectrum = [0.0; BINS];
    spectrum[8] = 10.0;
    spectrum[9] = leak;
    spectrum
}

pub fn broadband() -> [f64; BINS] {
    [1.0; BINS]
}

/// Anchors plus two low taps, two high taps and one broadband thump.
pub fn scenario_corpus() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_table(dir.path(), "top.csv", &low_tap(0.0));
    write_table(dir.path(), "bottom.csv", &high_tap(0.0));
    write_table(dir.path(), "low_a.csv", &low_tap(0.5));
    write_table(dir.path(), "low_b.csv", &low_tap(1.0));
    write_table(dir.path(), "high_a.csv", &high_tap(0.5));
    write_table(dir.path(), "high_b.csv", &high_tap(1.0));
    write_table(dir.path(), "thump.csv", &broadband());
    dir
}
