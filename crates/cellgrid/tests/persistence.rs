//! Save/load round trips through the line-per-cell format

use cellgrid::prelude::*;
use cellgrid::ERR_CYCLE;
use pretty_assertions::assert_eq;
use std::fs;

/// Saving and loading into a fresh sheet reproduces every value
#[test]
fn test_round_trip_preserves_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sheet.csv");

    let mut original = Sheet::new(5, 5).unwrap();
    original.set_cell("A0", "5").unwrap();
    original.set_cell("B1", "=A0*2").unwrap();
    original.set_cell("C2", "some, text").unwrap();
    original.set_cell("D3", "=D4").unwrap();
    original.set_cell("D4", "=D3").unwrap();
    original.set_cell("E4", "=(1+").unwrap();
    original.evaluate();

    let written = original.save(&path).unwrap();
    assert_eq!(written, 6);

    let loaded = Sheet::open(&path, 5, 5).unwrap();

    for (address, cell) in original.cells() {
        if !cell.is_empty() {
            assert_eq!(loaded.value(address), cell.display(), "mismatch at {address}");
        }
    }
    assert_eq!(loaded.value_of("B1"), "10.0");
    assert_eq!(loaded.value_of("C2"), "some, text");
    assert_eq!(loaded.value_of("D3"), ERR_CYCLE);
}

/// The file holds a header and one line per non-empty cell
#[test]
fn test_saved_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sheet.csv");

    let mut sheet = Sheet::new(3, 3).unwrap();
    sheet.set_cell("A1", "5").unwrap();
    sheet.set_cell("C2", "=(A1+5)").unwrap();
    sheet.save(&path).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "column,row,content\n0,1,5\n2,2,=(A1+5)\n"
    );
}

/// Loading resets the sheet, skips bad lines and evaluates
#[test]
fn test_load_replaces_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sheet.csv");
    fs::write(&path, "anything\n0,0,2\nbad line\n1,0,=A0*21\n7,7,off the grid\n").unwrap();

    let mut sheet = Sheet::new(3, 3).unwrap();
    sheet.set_cell("C2", "stale").unwrap();
    let loaded = sheet.load(&path).unwrap();

    assert_eq!(loaded, 2);
    assert_eq!(sheet.value_of("C2"), "");
    assert_eq!(sheet.value_of("B0"), "42.0");
}

/// A missing file is an error and leaves the sheet alone
#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut sheet = Sheet::new(3, 3).unwrap();
    sheet.set_cell("A0", "1").unwrap();

    assert!(sheet.load(dir.path().join("missing.csv")).is_err());
    assert_eq!(sheet.value_of("A0"), "1");
}
